//! Instance Binding - Element to component lookup.
//!
//! Manages the association between DOM nodes and the component instance
//! mounted on them:
//! - Exactly one instance per node (binding again replaces)
//! - Weak on both sides, so neither the node nor the instance is kept alive
//! - Dead entries are pruned when new bindings are made

use std::cell::RefCell;
use std::collections::HashMap;

use crate::component::{Component, UnmountMode, WeakComponent};
use super::element::{Element, WeakElement};

// =============================================================================
// Registry State
// =============================================================================

struct Binding {
    element: WeakElement,
    component: WeakComponent,
}

impl Binding {
    fn is_alive(&self) -> bool {
        self.element.is_alive() && self.component.is_alive()
    }
}

thread_local! {
    /// Map node id to the instance mounted on it.
    static BINDINGS: RefCell<HashMap<usize, Binding>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Binding
// =============================================================================

/// Link `element` to `component`.
pub fn bind_dom_node_to_component_instance(element: &Element, component: &Component) {
    BINDINGS.with(|bindings| {
        let mut bindings = bindings.borrow_mut();
        bindings.retain(|_, binding| binding.is_alive());
        let previous = bindings.insert(
            element.id(),
            Binding {
                element: element.downgrade(),
                component: component.downgrade(),
            },
        );
        if previous.is_some() {
            tracing::trace!(element = element.id(), "replaced existing instance binding");
        }
    });
}

/// Release the binding for `element`. Returns true if one existed.
pub fn unbind(element: &Element) -> bool {
    BINDINGS.with(|bindings| bindings.borrow_mut().remove(&element.id()).is_some())
}

// =============================================================================
// Lookups
// =============================================================================

/// Get the instance mounted on `element`.
pub fn get_component(element: &Element) -> Option<Component> {
    BINDINGS.with(|bindings| {
        let bindings = bindings.borrow();
        let binding = bindings.get(&element.id())?;
        // Node ids are never reused, but a dead node's entry may linger until
        // the next prune.
        binding.element.upgrade()?;
        binding.component.upgrade()
    })
}

/// Count of live bindings.
pub fn bound_count() -> usize {
    BINDINGS.with(|bindings| {
        bindings
            .borrow()
            .values()
            .filter(|binding| binding.is_alive())
            .count()
    })
}

/// Unmount whatever instance is mounted on `element` and release the binding.
///
/// Returns `Ok(None)` when nothing is bound.
pub fn unmount_element(element: &Element, mode: UnmountMode) -> anyhow::Result<Option<Component>> {
    let Some(component) = get_component(element) else {
        return Ok(None);
    };
    component.unmount(mode)?;
    unbind(element);
    Ok(Some(component))
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Clear every binding (for testing).
pub fn reset_bindings() {
    BINDINGS.with(|bindings| bindings.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use crate::component::ComponentOptions;
    use crate::plugins;
    use crate::testing::{count, new_log, RecordingDefinition, RecordingTemplate};
    use crate::types::State;

    fn mounted(el: &Element) -> (crate::testing::Log, Component) {
        plugins::reset_plugins();
        let log = new_log();
        let definition = Rc::new(RecordingDefinition::new(log.clone(), RecordingTemplate::new(log.clone())));
        let component = Component::new(definition, ComponentOptions::new()).unwrap();
        component.mount(el, State::new(), None).unwrap();
        (log, component)
    }

    #[test]
    fn test_mount_binds_element() {
        reset_bindings();
        let el = Element::new("my-tag");
        let other = Element::new("my-tag");

        let (_log, component) = mounted(&el);

        assert_eq!(get_component(&el), Some(component.clone()));
        assert_eq!(get_component(&other), None);
        assert_eq!(bound_count(), 1);
    }

    #[test]
    fn test_binding_is_weak() {
        reset_bindings();
        let el = Element::new("my-tag");
        let (_log, component) = mounted(&el);

        drop(component);
        assert_eq!(get_component(&el), None);
        assert_eq!(bound_count(), 0);
    }

    #[test]
    fn test_rebinding_replaces() {
        reset_bindings();
        let el = Element::new("my-tag");
        let (_first_log, first) = mounted(&el);
        let (_second_log, second) = mounted(&el);

        assert_eq!(get_component(&el), Some(second.clone()));
        assert_ne!(get_component(&el), Some(first.clone()));
        assert_eq!(bound_count(), 1);
    }

    #[test]
    fn test_unmount_element() {
        reset_bindings();
        let el = Element::new("my-tag");
        let (log, component) = mounted(&el);

        let unmounted = unmount_element(&el, UnmountMode::KeepDom).unwrap();

        assert_eq!(unmounted, Some(component));
        assert_eq!(count(&log, "template.unmount(None)"), 1);
        assert_eq!(get_component(&el), None);
        assert!(unmount_element(&el, UnmountMode::KeepDom).unwrap().is_none());
    }
}
