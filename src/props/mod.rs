//! Props & State reconciliation.
//!
//! Props for a render pass come from three layers, later wins:
//!
//! ```text
//! initial static props (mount only) → DOM attributes → attribute expressions
//! ```
//!
//! State is merged shallowly from the previous state and a caller partial.

mod attributes;

use std::fmt;
use std::rc::Rc;

use crate::dom::Element;
use crate::types::{overlay, PropMap, State};

pub use attributes::{
    coerce_attribute_value, dash_to_camel_case, dom_attributes_to_object,
    generate_props_from_attributes,
};

/// Key the CSS hook writes. Framework plumbing, never a user prop.
pub const IS_DIRECTIVE: &str = "is";

// =============================================================================
// PropsSource
// =============================================================================

/// Initial static props: either a map or a factory called at mount.
#[derive(Clone, Default)]
pub enum PropsSource {
    #[default]
    None,
    Static(PropMap),
    Factory(Rc<dyn Fn() -> PropMap>),
}

impl PropsSource {
    /// Resolve to a map, calling the factory if there is one.
    pub fn resolve(&self) -> PropMap {
        match self {
            PropsSource::None => PropMap::new(),
            PropsSource::Static(map) => map.clone(),
            PropsSource::Factory(factory) => factory(),
        }
    }
}

impl From<PropMap> for PropsSource {
    fn from(map: PropMap) -> Self {
        PropsSource::Static(map)
    }
}

impl fmt::Debug for PropsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropsSource::None => f.write_str("None"),
            PropsSource::Static(map) => f.debug_tuple("Static").field(map).finish(),
            PropsSource::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Props an element starts with: the static props, then its DOM attributes.
/// A DOM attribute overrides a static prop of the same name.
pub fn compute_initial_props(element: &Element, initial: &PropsSource) -> PropMap {
    let attributes = element.attributes();
    overlay(initial.resolve(), dom_attributes_to_object(&attributes))
}

/// Shallow merge of a state partial over the previous state.
pub fn compute_component_state(previous: &State, partial: State) -> State {
    overlay(previous.clone(), partial)
}
