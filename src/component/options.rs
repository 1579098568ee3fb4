//! Component Options - Per-instance creation inputs.

use std::rc::Rc;

use crate::props::PropsSource;
use crate::template::AttributeExpression;
use crate::types::{PropMap, Slot};

/// Inputs a parent (or the application entry point) supplies when creating
/// an instance.
///
/// # Example
///
/// ```
/// use spark_component::{prop_map, ComponentOptions, Slot, Value};
///
/// let options = ComponentOptions::new()
///     .with_slots(vec![Slot::new("default", "<p>hi</p>")])
///     .with_props(prop_map([("title", Value::from("Hello"))]));
/// assert_eq!(options.slots.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentOptions {
    /// Slot content, passed through to the template.
    pub slots: Rc<[Slot]>,
    /// Attribute expressions on the component's tag.
    pub attributes: Vec<AttributeExpression>,
    /// Initial static props, applied at mount only.
    pub props: PropsSource,
}

impl ComponentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(mut self, slots: Vec<Slot>) -> Self {
        self.slots = slots.into();
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<AttributeExpression>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_props(mut self, props: PropMap) -> Self {
        self.props = PropsSource::Static(props);
        self
    }

    pub fn with_props_factory(mut self, factory: impl Fn() -> PropMap + 'static) -> Self {
        self.props = PropsSource::Factory(Rc::new(factory));
        self
    }
}
