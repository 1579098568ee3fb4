//! Component - Definitions, options and the lifecycle controller.
//!
//! - [`ComponentDefinition`] - user hooks + template, shared by instances
//! - [`ComponentOptions`] - per-instance slots, attribute expressions, props
//! - [`Component`] - the instance: mount, update, unmount
//!
//! # Props layering
//!
//! ```text
//! mount:        static props → DOM attributes → attribute expressions
//!               (later wins)
//! root update:  previous props → static DOM attributes → attribute expressions
//! child update:                  static DOM attributes → attribute expressions
//! ```

mod css_hook;
mod definition;
mod lifecycle;
mod options;

pub use css_hook::add_css_hook;
pub use definition::ComponentDefinition;
pub use lifecycle::{Component, UnmountMode, WeakComponent};
pub use options::ComponentOptions;
