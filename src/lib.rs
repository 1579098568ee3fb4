//! # spark-component
//!
//! Lifecycle controller for DOM-bound UI components.
//!
//! A component instance is created from a shared definition, mounted on one
//! element, updated any number of times and unmounted once. Each render pass
//! gets one frozen props snapshot reconciled from static props, DOM
//! attributes and attribute expressions.
//!
//! ## Architecture
//!
//! ```text
//! Component::new ──► plugins ──► mount ──► update* ──► unmount
//!                                  │          │           │
//!                                  └──── TemplateChunk ───┘
//! ```
//!
//! The template engine owns every DOM write for the component's content; this
//! crate only sequences it with the user hooks.
//!
//! ## Modules
//!
//! - [`types`] - Values, frozen props, state, slots
//! - [`dom`] - Element model and element → instance binding
//! - [`props`] - Props/state reconciliation helpers
//! - [`scope`] - Scopes attribute expressions are evaluated against
//! - [`template`] - Template contract and bindings data
//! - [`component`] - Definitions, options and the lifecycle controller
//! - [`plugins`] - Instance post-processing
//!
//! ## Logging
//!
//! Lifecycle operations open `tracing` spans at debug level. Install any
//! subscriber to see them; the crate never installs one itself.

pub mod component;
pub mod dom;
pub mod plugins;
pub mod props;
pub mod scope;
pub mod template;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use types::*;

pub use component::{
    add_css_hook, Component, ComponentDefinition, ComponentOptions, UnmountMode, WeakComponent,
};

pub use dom::{
    bind_dom_node_to_component_instance, bound_count, get_component, reset_bindings, unbind,
    unmount_element, Attribute, Element, ElementFlags, WeakElement,
};

pub use props::{
    compute_component_state, compute_initial_props, dom_attributes_to_object,
    generate_props_from_attributes, PropsSource, IS_DIRECTIVE,
};

pub use scope::{MapScope, Scope, ScopeRef};

pub use template::{
    root_computed_attribute_names, AttributeExpression, BindingData, ExpressionData,
    ExpressionType, Template, TemplateChunk,
};

pub use plugins::{Plugin, PluginError};
