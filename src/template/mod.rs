//! Template Contract - What the lifecycle needs from the template engine.
//!
//! The template engine owns every DOM write for a component's content. The
//! lifecycle only sequences its calls:
//!
//! ```text
//! Template::create_dom(root) → chunk.clone_chunk() → mount → update* → unmount
//! ```
//!
//! Bindings data is the compiler output describing which expressions a
//! chunk evaluates and where. The lifecycle reads it once to learn which root
//! attributes the framework itself writes.

use std::fmt;
use std::rc::Rc;

use anyhow::Result;

use crate::component::Component;
use crate::dom::Element;
use crate::scope::{Scope, ScopeRef};
use crate::types::Value;

// =============================================================================
// Bindings data
// =============================================================================

/// Kind of a compiled expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionType {
    Attribute,
    Event,
    Text,
    Value,
    Ref,
}

/// Compiled expression descriptor as found in bindings data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionData {
    pub kind: ExpressionType,
    /// Attribute/event name. `None` for spread attributes and text nodes.
    pub name: Option<String>,
}

impl ExpressionData {
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            kind: ExpressionType::Attribute,
            name: Some(name.into()),
        }
    }

    pub fn new(kind: ExpressionType, name: Option<&str>) -> Self {
        Self {
            kind,
            name: name.map(str::to_string),
        }
    }
}

/// One binding: a target selector plus its expressions.
///
/// A binding without a selector targets the root node itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingData {
    pub selector: Option<String>,
    pub expressions: Vec<ExpressionData>,
}

/// Names of the root attributes produced by expression bindings.
///
/// Only the first binding can target the root; if it carries a selector the
/// root has no computed attributes.
pub fn root_computed_attribute_names(bindings: &[BindingData]) -> Vec<String> {
    let Some(first) = bindings.first() else {
        return Vec::new();
    };
    if first.selector.is_some() {
        return Vec::new();
    }
    first
        .expressions
        .iter()
        .filter(|expr| expr.kind == ExpressionType::Attribute)
        .filter_map(|expr| expr.name.clone())
        .collect()
}

// =============================================================================
// Attribute expressions
// =============================================================================

/// Expression evaluator. Receives the parent scope, if any.
pub type Evaluate = Rc<dyn Fn(Option<&dyn Scope>) -> Result<Value>>;

/// A compiled attribute expression on the component's own tag
/// (`<my-tag title={ expr }>`), producing props for the component.
#[derive(Clone)]
pub struct AttributeExpression {
    pub kind: ExpressionType,
    /// `None` for spread attributes.
    pub name: Option<String>,
    evaluate: Evaluate,
}

impl AttributeExpression {
    pub fn new(
        kind: ExpressionType,
        name: Option<&str>,
        evaluate: impl Fn(Option<&dyn Scope>) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            kind,
            name: name.map(str::to_string),
            evaluate: Rc::new(evaluate),
        }
    }

    /// Named attribute expression.
    pub fn attribute(
        name: &str,
        evaluate: impl Fn(Option<&dyn Scope>) -> Result<Value> + 'static,
    ) -> Self {
        Self::new(ExpressionType::Attribute, Some(name), evaluate)
    }

    /// Spread attribute expression (`{...obj}`).
    pub fn spread(evaluate: impl Fn(Option<&dyn Scope>) -> Result<Value> + 'static) -> Self {
        Self::new(ExpressionType::Attribute, None, evaluate)
    }

    pub fn evaluate(&self, scope: Option<&dyn Scope>) -> Result<Value> {
        (self.evaluate)(scope)
    }
}

impl fmt::Debug for AttributeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeExpression")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Template traits
// =============================================================================

/// Template blueprint factory held by a component definition.
pub trait Template {
    /// Build the blueprint for `root`. Must not mutate `root`.
    fn create_dom(&self, root: &Element) -> Result<Box<dyn TemplateChunk>>;
}

/// A template instance owned by exactly one component instance.
pub trait TemplateChunk {
    /// Clone the blueprint into an instance the component owns.
    fn clone_chunk(&self) -> Box<dyn TemplateChunk>;

    /// Compiled bindings data.
    fn bindings_data(&self) -> &[BindingData];

    fn mount(
        &mut self,
        root: &Element,
        component: &Component,
        scope: Option<&ScopeRef>,
    ) -> Result<()>;

    fn update(&mut self, component: &Component, scope: Option<&ScopeRef>) -> Result<()>;

    /// `clean_root`: `Some(true)` removes everything including the root,
    /// `Some(false)` removes the children only, `None` leaves the DOM alone.
    fn unmount(
        &mut self,
        component: &Component,
        scope: Option<&ScopeRef>,
        clean_root: Option<bool>,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_computed_names_from_first_binding() {
        let bindings = vec![
            BindingData {
                selector: None,
                expressions: vec![
                    ExpressionData::attribute("class"),
                    ExpressionData::new(ExpressionType::Event, Some("onclick")),
                    ExpressionData::new(ExpressionType::Attribute, None),
                    ExpressionData::attribute("title"),
                ],
            },
            BindingData {
                selector: Some("[expr0]".to_string()),
                expressions: vec![ExpressionData::attribute("href")],
            },
        ];

        assert_eq!(root_computed_attribute_names(&bindings), vec!["class", "title"]);
    }

    #[test]
    fn test_root_computed_names_with_selector() {
        let bindings = vec![BindingData {
            selector: Some("[expr0]".to_string()),
            expressions: vec![ExpressionData::attribute("class")],
        }];

        assert!(root_computed_attribute_names(&bindings).is_empty());
        assert!(root_computed_attribute_names(&[]).is_empty());
    }
}
