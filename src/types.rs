//! Core types - Values, props, state and slots.
//!
//! Props are an immutable snapshot per render pass. They are backed by a
//! persistent map so that taking a copy is O(1) and no caller can mutate the
//! snapshot a component is currently rendering with.
//!
//! State is a plain persistent map that the owning component replaces on
//! every merge.

use std::fmt;

pub use serde_json::Value;

// =============================================================================
// Maps
// =============================================================================

/// Key -> value mapping used for every props-shaped intermediate result.
pub type PropMap = im::OrdMap<String, Value>;

/// Component state. Merged shallowly, new keys win, keys are never removed.
pub type State = im::OrdMap<String, Value>;

// =============================================================================
// Props - Frozen snapshot
// =============================================================================

/// Frozen props snapshot.
///
/// There is no mutating API. [`Props::to_map`] hands out a copy; changing the
/// copy never changes the snapshot.
#[derive(Clone, Default, PartialEq)]
pub struct Props(PropMap);

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self(PropMap::new())
    }

    /// Get a prop value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check if a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of props.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no props.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Iterate over keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Copy out the underlying map.
    pub fn to_map(&self) -> PropMap {
        self.0.clone()
    }

    /// Layer `top` over these props. Keys in `top` win, keys only present
    /// here survive as defaults.
    pub fn layered(&self, top: PropMap) -> Props {
        Props(overlay(self.0.clone(), top))
    }
}

impl From<PropMap> for Props {
    fn from(map: PropMap) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Props {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PartialEq<PropMap> for Props {
    fn eq(&self, other: &PropMap) -> bool {
        &self.0 == other
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

// =============================================================================
// Slots
// =============================================================================

/// Slot content generated by the template compiler.
///
/// Opaque to the lifecycle: it is stored at creation and exposed read-only
/// after mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: String,
    pub html: String,
}

impl Slot {
    pub fn new(id: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html: html.into(),
        }
    }
}

/// Write every entry of `top` over `base`. Keys in `top` always win.
///
/// `im::OrdMap::union` keeps whichever side is larger, so it cannot be used
/// for layering.
pub fn overlay(base: PropMap, top: PropMap) -> PropMap {
    let mut out = base;
    out.extend(top);
    out
}

/// Build a [`PropMap`] from `(key, value)` pairs.
///
/// ```
/// use spark_component::{prop_map, Value};
///
/// let props = prop_map([("id", Value::from("x"))]);
/// assert_eq!(props.get("id"), Some(&Value::from("x")));
/// ```
pub fn prop_map<K, I>(entries: I) -> PropMap
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
