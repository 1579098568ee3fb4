//! Scope - What attribute expressions are evaluated against.
//!
//! A parent scope is usually the parent component instance, but loops and
//! other template constructs provide their own scopes layered over it.
//! Children only ever hold a parent scope weakly.

use std::fmt;
use std::rc::Rc;

use crate::types::{PropMap, Value};

/// Something expressions can look names up in.
pub trait Scope {
    fn resolve(&self, key: &str) -> Option<Value>;
}

/// Shared scope handle as passed to `mount` / `update`.
pub type ScopeRef = Rc<dyn Scope>;

// =============================================================================
// MapScope
// =============================================================================

/// A scope backed by a map, optionally falling back to a parent scope.
#[derive(Clone, Default)]
pub struct MapScope {
    values: PropMap,
    parent: Option<ScopeRef>,
}

impl MapScope {
    pub fn new(values: PropMap) -> Self {
        Self {
            values,
            parent: None,
        }
    }

    /// Layer `values` over `parent` (e.g. a loop item over its component).
    pub fn extend(parent: ScopeRef, values: PropMap) -> Self {
        Self {
            values,
            parent: Some(parent),
        }
    }

    pub fn into_ref(self) -> ScopeRef {
        Rc::new(self)
    }
}

impl Scope for MapScope {
    fn resolve(&self, key: &str) -> Option<Value> {
        match self.values.get(key) {
            Some(value) => Some(value.clone()),
            None => self.parent.as_ref().and_then(|parent| parent.resolve(key)),
        }
    }
}

impl fmt::Debug for MapScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapScope")
            .field("values", &self.values)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
