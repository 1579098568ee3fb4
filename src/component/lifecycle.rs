//! Lifecycle Controller - mount, update, unmount.
//!
//! A [`Component`] wraps a shared [`ComponentDefinition`] and drives it
//! through a fixed state machine:
//!
//! ```text
//! created → mount → update* → unmount
//! ```
//!
//! Call order is the caller's responsibility and is not checked.
//!
//! # Re-entrancy
//!
//! Every operation takes `&self` and no `RefCell` borrow is held while user
//! code (hooks, plugins, expressions, the template) runs, so a hook may call
//! `update` on the same instance. The nested call runs its hooks but never
//! patches the DOM while an outer update is patching it.
//!
//! # Example
//!
//! ```ignore
//! let component = Component::new(definition, ComponentOptions::new())?;
//! component.mount(&element, State::new(), None)?;
//! component.update(state_partial, Some(&parent_scope))?;
//! component.unmount(UnmountMode::RemoveRoot)?;
//! ```

use std::any::{Any, TypeId};
use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use anyhow::Result;

use crate::dom::{self, Attribute, Element};
use crate::plugins;
use crate::props::{
    compute_component_state, compute_initial_props, dom_attributes_to_object,
    generate_props_from_attributes, PropsSource, IS_DIRECTIVE,
};
use crate::scope::{Scope, ScopeRef};
use crate::template::{root_computed_attribute_names, AttributeExpression, TemplateChunk};
use crate::types::{overlay, Props, Slot, State, Value};
use super::css_hook::add_css_hook;
use super::definition::ComponentDefinition;
use super::options::ComponentOptions;

// =============================================================================
// Unmount Mode
// =============================================================================

/// What happens to the DOM on unmount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmountMode {
    /// Remove the content and the root element.
    #[default]
    RemoveRoot,
    /// Remove the content, keep the root element in the document.
    PreserveRoot,
    /// Leave the DOM untouched; the caller removes it (e.g. a parent removing
    /// the whole subtree at once).
    KeepDom,
}

impl UnmountMode {
    /// The template's clean-root argument for this mode.
    pub fn clean_root(self) -> Option<bool> {
        match self {
            UnmountMode::RemoveRoot => Some(true),
            UnmountMode::PreserveRoot => Some(false),
            UnmountMode::KeepDom => None,
        }
    }
}

impl From<bool> for UnmountMode {
    fn from(preserve_root: bool) -> Self {
        if preserve_root {
            UnmountMode::PreserveRoot
        } else {
            UnmountMode::RemoveRoot
        }
    }
}

impl From<Option<bool>> for UnmountMode {
    fn from(preserve_root: Option<bool>) -> Self {
        preserve_root.map_or(UnmountMode::KeepDom, UnmountMode::from)
    }
}

// =============================================================================
// Instance storage
// =============================================================================

struct ComponentCore {
    definition: Rc<dyn ComponentDefinition>,
    attributes: Vec<AttributeExpression>,
    initial_props: PropsSource,
    options_slots: Rc<[Slot]>,

    props: RefCell<Props>,
    state: RefCell<State>,
    template: RefCell<Option<Box<dyn TemplateChunk>>>,
    root: OnceCell<Element>,
    slots: OnceCell<Rc<[Slot]>>,
    parent_scope: RefCell<Option<Weak<dyn Scope>>>,
    root_attribute_names: RefCell<Vec<String>>,
    is_updating: Cell<bool>,
    unmounted: Cell<Option<UnmountMode>>,

    /// Capabilities attached by plugins, keyed by type.
    extensions: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl Scope for ComponentCore {
    fn resolve(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.state.borrow().get(key) {
            return Some(value.clone());
        }
        self.props.borrow().get(key).cloned()
    }
}

/// Clears the in-flight flag when the update pass ends, however it ends.
struct UpdatingGuard<'a>(&'a Cell<bool>);

impl<'a> UpdatingGuard<'a> {
    /// Set the flag and return a guard, or `None` if it was already set.
    fn engage(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for UpdatingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// =============================================================================
// Component handle
// =============================================================================

/// A component instance. Clones share the same instance.
#[derive(Clone)]
pub struct Component(Rc<ComponentCore>);

/// Weak handle to a component instance.
#[derive(Clone)]
pub struct WeakComponent(Weak<ComponentCore>);

impl WeakComponent {
    pub fn upgrade(&self) -> Option<Component> {
        self.0.upgrade().map(Component)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl Component {
    /// Create an instance and run the installed plugins on it.
    pub fn new(definition: Rc<dyn ComponentDefinition>, options: ComponentOptions) -> Result<Self> {
        let ComponentOptions {
            slots,
            attributes,
            props,
        } = options;

        let component = Component(Rc::new(ComponentCore {
            definition,
            attributes,
            initial_props: props,
            options_slots: slots,
            props: RefCell::new(Props::new()),
            state: RefCell::new(State::new()),
            template: RefCell::new(None),
            root: OnceCell::new(),
            slots: OnceCell::new(),
            parent_scope: RefCell::new(None),
            root_attribute_names: RefCell::new(Vec::new()),
            is_updating: Cell::new(false),
            unmounted: Cell::new(None),
            extensions: RefCell::new(HashMap::new()),
        }));

        plugins::run_plugins(&component)?;
        Ok(component)
    }

    // -------------------------------------------------------------------------
    // mount
    // -------------------------------------------------------------------------

    /// Mount the instance on `element`.
    ///
    /// `element` must not already carry a mounted instance.
    pub fn mount(&self, element: &Element, state: State, parent_scope: Option<&ScopeRef>) -> Result<Self> {
        let core = &self.0;
        let _span = tracing::debug_span!("component.mount", component = self.log_name()).entered();

        element.mark_impure();
        *core.parent_scope.borrow_mut() = parent_scope.map(Rc::downgrade);

        let initial_props = compute_initial_props(element, &core.initial_props);
        let expression_props =
            generate_props_from_attributes(&core.attributes, parent_scope.map(|scope| &**scope))?;
        let props = overlay(initial_props, expression_props);
        *core.props.borrow_mut() = Props::from(props);
        self.merge_state(state);

        let template = core.definition.template().create_dom(element)?.clone_chunk();
        // The framework writes these itself; they must never feed back into props.
        *core.root_attribute_names.borrow_mut() = root_computed_attribute_names(template.bindings_data());
        *core.template.borrow_mut() = Some(template);

        dom::bind_dom_node_to_component_instance(element, self);
        if let Some(name) = core.definition.name() {
            add_css_hook(element, name);
        }

        let _ = core.root.set(element.clone());
        let _ = core.slots.set(core.options_slots.clone());

        let (props, state) = self.snapshot();
        core.definition.on_before_mount(self, &props, &state)?;
        self.with_template(|template| template.mount(element, self, parent_scope))?;
        let (props, state) = self.snapshot();
        core.definition.on_mounted(self, &props, &state)?;

        Ok(self.clone())
    }

    // -------------------------------------------------------------------------
    // update
    // -------------------------------------------------------------------------

    /// Recompute props, merge `state` and patch the DOM.
    ///
    /// Returns `Ok(None)` when `should_update` vetoed the update, in which
    /// case nothing changed.
    ///
    /// Passing a parent scope marks this as a child update: props are
    /// replaced outright. Without one (root components) the previous props
    /// stay as defaults under the new ones.
    pub fn update(&self, state: State, parent_scope: Option<&ScopeRef>) -> Result<Option<Self>> {
        let core = &self.0;
        let _span = tracing::debug_span!("component.update", component = self.log_name()).entered();

        if let Some(scope) = parent_scope {
            *core.parent_scope.borrow_mut() = Some(Rc::downgrade(scope));
        }
        let scope = self.parent_scope();

        let static_attributes = self.static_root_attributes();
        let mut new_props = overlay(
            dom_attributes_to_object(&static_attributes),
            generate_props_from_attributes(&core.attributes, scope.as_deref())?,
        );
        new_props.remove(IS_DIRECTIVE);

        let old_props = self.props();
        if !core.definition.should_update(self, &new_props, &old_props) {
            tracing::trace!("update vetoed by should_update");
            return Ok(None);
        }

        let next = if parent_scope.is_some() {
            Props::from(new_props)
        } else {
            old_props.layered(new_props)
        };
        *core.props.borrow_mut() = next;
        self.merge_state(state);

        let (props, state) = self.snapshot();
        core.definition.on_before_update(self, &props, &state)?;

        // Held until on_updated returns: an update fired from that hook is
        // still part of this pass.
        let guard = UpdatingGuard::engage(&core.is_updating);
        match &guard {
            Some(_) => self.with_template(|template| template.update(self, scope.as_ref()))?,
            None => tracing::trace!("update already in flight, skipping template update"),
        }

        let (props, state) = self.snapshot();
        core.definition.on_updated(self, &props, &state)?;
        drop(guard);

        Ok(Some(self.clone()))
    }

    // -------------------------------------------------------------------------
    // unmount
    // -------------------------------------------------------------------------

    /// Tear the instance down. Must be called at most once.
    pub fn unmount(&self, mode: impl Into<UnmountMode>) -> Result<Self> {
        let core = &self.0;
        let mode = mode.into();
        let _span = tracing::debug_span!("component.unmount", component = self.log_name(), ?mode).entered();

        let (props, state) = self.snapshot();
        core.definition.on_before_unmount(self, &props, &state)?;

        if mode == UnmountMode::PreserveRoot {
            if let Some(root) = core.root.get() {
                for name in core.root_attribute_names.borrow().iter() {
                    root.remove_attribute(name);
                }
            }
        }

        let scope = self.parent_scope();
        // The template instance dies with the mount; it is not put back.
        core.unmounted.set(Some(mode));
        let template = core.template.borrow_mut().take();
        match template {
            Some(mut template) => template.unmount(self, scope.as_ref(), mode.clean_root())?,
            None => tracing::trace!("template instance busy or missing, unmount deferred"),
        }

        let (props, state) = self.snapshot();
        core.definition.on_unmounted(self, &props, &state)?;

        Ok(self.clone())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current props snapshot.
    pub fn props(&self) -> Props {
        self.0.props.borrow().clone()
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.0.state.borrow().clone()
    }

    /// Root element, once mounted.
    pub fn root(&self) -> Option<Element> {
        self.0.root.get().cloned()
    }

    /// Slots, once mounted.
    pub fn slots(&self) -> Option<&[Slot]> {
        self.0.slots.get().map(|slots| &**slots)
    }

    pub fn definition(&self) -> &Rc<dyn ComponentDefinition> {
        &self.0.definition
    }

    pub fn name(&self) -> Option<&str> {
        self.0.definition.name()
    }

    /// Current parent scope, if it is still alive.
    pub fn parent_scope(&self) -> Option<ScopeRef> {
        self.0.parent_scope.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Root attribute names written by the template rather than the markup.
    pub fn root_computed_attribute_names(&self) -> Vec<String> {
        self.0.root_attribute_names.borrow().clone()
    }

    /// True while this instance is patching its template.
    pub fn is_updating(&self) -> bool {
        self.0.is_updating.get()
    }

    /// This instance as a scope for its children (state first, then props).
    pub fn as_scope(&self) -> ScopeRef {
        self.0.clone()
    }

    pub fn downgrade(&self) -> WeakComponent {
        WeakComponent(Rc::downgrade(&self.0))
    }

    // -------------------------------------------------------------------------
    // Extensions
    // -------------------------------------------------------------------------

    /// Attach a capability. Replaces any earlier value of the same type.
    pub fn insert_extension<T: Any>(&self, value: T) {
        self.0
            .extensions
            .borrow_mut()
            .insert(TypeId::of::<T>(), Rc::new(value));
    }

    pub fn extension<T: Any>(&self) -> Option<Rc<T>> {
        let value = self.0.extensions.borrow().get(&TypeId::of::<T>()).cloned()?;
        value.downcast::<T>().ok()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn snapshot(&self) -> (Props, State) {
        (self.props(), self.state())
    }

    fn merge_state(&self, partial: State) {
        let next = compute_component_state(&self.0.state.borrow(), partial);
        *self.0.state.borrow_mut() = next;
    }

    fn static_root_attributes(&self) -> Vec<Attribute> {
        let Some(root) = self.0.root.get() else {
            return Vec::new();
        };
        let computed = self.0.root_attribute_names.borrow();
        root.attributes()
            .into_iter()
            .filter(|attr| !computed.contains(&attr.name))
            .collect()
    }

    /// Run `f` with the template instance checked out. A re-entrant call
    /// that finds it checked out skips the template. If the instance was
    /// unmounted meanwhile, the template is unmounted here and dropped.
    fn with_template<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut dyn TemplateChunk) -> Result<()>,
    {
        let taken = self.0.template.borrow_mut().take();
        let Some(mut template) = taken else {
            tracing::trace!("template instance busy or missing, skipping");
            return Ok(());
        };
        let result = f(template.as_mut());
        match self.0.unmounted.get() {
            // Unmounted from inside `f`: finish the teardown it had to skip.
            Some(mode) => {
                result?;
                let scope = self.parent_scope();
                template.unmount(self, scope.as_ref(), mode.clean_root())
            }
            None => {
                *self.0.template.borrow_mut() = Some(template);
                result
            }
        }
    }

    fn log_name(&self) -> &str {
        self.0.definition.name().unwrap_or("anonymous")
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Component {}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name())
            .field("props", &*self.0.props.borrow())
            .field("state", &*self.0.state.borrow())
            .field("mounted", &self.0.root.get().is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
