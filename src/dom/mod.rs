//! DOM - Element model and instance binding.
//!
//! - Element: clonable node handle with attributes, children and purity flags
//! - Binding: weak element -> component registry used by external tooling
//!
//! The element model is deliberately small. DOM writing beyond attributes and
//! child links belongs to the template engine.

mod binding;
mod element;

pub use binding::*;
pub use element::{Attribute, Element, ElementFlags, WeakElement};
