//! Test doubles - A recording template and a recording definition.
//!
//! Both write into a shared [`Log`] so tests can assert the exact order of
//! hook and template calls.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;

use crate::component::{Component, ComponentDefinition};
use crate::dom::Element;
use crate::scope::ScopeRef;
use crate::template::{BindingData, ExpressionData, Template, TemplateChunk};
use crate::types::{PropMap, Props, State};

pub(crate) type Log = Rc<RefCell<Vec<String>>>;

pub(crate) type Callback = Rc<dyn Fn(&Component) -> Result<()>>;

pub(crate) fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

pub(crate) fn count(log: &Log, entry: &str) -> usize {
    log.borrow().iter().filter(|e| e.as_str() == entry).count()
}

// =============================================================================
// RecordingTemplate
// =============================================================================

/// Template that records calls and writes its root computed attributes.
pub(crate) struct RecordingTemplate {
    log: Log,
    bindings: Vec<BindingData>,
    root_values: Vec<(String, String)>,
    on_update: Option<Callback>,
    fail_update: bool,
}

impl RecordingTemplate {
    pub(crate) fn new(log: Log) -> Self {
        Self {
            log,
            bindings: Vec::new(),
            root_values: Vec::new(),
            on_update: None,
            fail_update: false,
        }
    }

    /// Root attributes the template itself writes on mount and update.
    pub(crate) fn with_root_attributes(mut self, attributes: &[(&str, &str)]) -> Self {
        self.bindings = vec![BindingData {
            selector: None,
            expressions: attributes
                .iter()
                .map(|(name, _)| ExpressionData::attribute(*name))
                .collect(),
        }];
        self.root_values = attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self
    }

    /// Callback run from inside the template's update.
    pub(crate) fn with_on_update(mut self, callback: Callback) -> Self {
        self.on_update = Some(callback);
        self
    }

    pub(crate) fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }
}

impl Template for RecordingTemplate {
    fn create_dom(&self, _root: &Element) -> Result<Box<dyn TemplateChunk>> {
        self.log.borrow_mut().push("template.createDOM".to_string());
        Ok(Box::new(RecordingChunk {
            log: self.log.clone(),
            bindings: self.bindings.clone(),
            root_values: self.root_values.clone(),
            on_update: self.on_update.clone(),
            fail_update: self.fail_update,
            root: None,
        }))
    }
}

#[derive(Clone)]
struct RecordingChunk {
    log: Log,
    bindings: Vec<BindingData>,
    root_values: Vec<(String, String)>,
    on_update: Option<Callback>,
    fail_update: bool,
    root: Option<Element>,
}

impl RecordingChunk {
    fn write_root_attributes(&self) {
        if let Some(root) = &self.root {
            for (name, value) in &self.root_values {
                root.set_attribute(name.as_str(), value.as_str());
            }
        }
    }
}

impl TemplateChunk for RecordingChunk {
    fn clone_chunk(&self) -> Box<dyn TemplateChunk> {
        self.log.borrow_mut().push("template.clone".to_string());
        Box::new(self.clone())
    }

    fn bindings_data(&self) -> &[BindingData] {
        &self.bindings
    }

    fn mount(&mut self, root: &Element, _component: &Component, _scope: Option<&ScopeRef>) -> Result<()> {
        self.log.borrow_mut().push("template.mount".to_string());
        self.root = Some(root.clone());
        root.append_child(&Element::new("p"));
        self.write_root_attributes();
        Ok(())
    }

    fn update(&mut self, component: &Component, _scope: Option<&ScopeRef>) -> Result<()> {
        self.log.borrow_mut().push("template.update".to_string());
        if self.fail_update {
            anyhow::bail!("template update failed");
        }
        self.write_root_attributes();
        if let Some(callback) = &self.on_update {
            callback(component)?;
        }
        Ok(())
    }

    fn unmount(
        &mut self,
        _component: &Component,
        _scope: Option<&ScopeRef>,
        clean_root: Option<bool>,
    ) -> Result<()> {
        self.log
            .borrow_mut()
            .push(format!("template.unmount({clean_root:?})"));
        if let Some(root) = &self.root {
            match clean_root {
                Some(true) => {
                    root.clear_children();
                    root.remove();
                }
                Some(false) => root.clear_children(),
                None => {}
            }
        }
        Ok(())
    }
}

// =============================================================================
// RecordingDefinition
// =============================================================================

/// Definition that logs every hook and can run callbacks from them.
pub(crate) struct RecordingDefinition {
    name: Option<String>,
    template: RecordingTemplate,
    log: Log,
    callbacks: RefCell<HashMap<&'static str, Callback>>,
    allow_update: Cell<bool>,
    seen: RefCell<Vec<(Props, State)>>,
}

impl RecordingDefinition {
    pub(crate) fn new(log: Log, template: RecordingTemplate) -> Self {
        Self {
            name: None,
            template,
            log,
            callbacks: RefCell::new(HashMap::new()),
            allow_update: Cell::new(true),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Run `callback` whenever `hook` fires.
    pub(crate) fn on(&self, hook: &'static str, callback: Callback) {
        self.callbacks.borrow_mut().insert(hook, callback);
    }

    pub(crate) fn set_allow_update(&self, allow: bool) {
        self.allow_update.set(allow);
    }

    /// `(props, state)` each hook received, in call order.
    pub(crate) fn seen(&self) -> Vec<(Props, State)> {
        self.seen.borrow().clone()
    }

    fn record(&self, hook: &'static str, component: &Component, props: &Props, state: &State) -> Result<()> {
        self.log.borrow_mut().push(hook.to_string());
        self.seen.borrow_mut().push((props.clone(), state.clone()));
        let callback = self.callbacks.borrow().get(hook).cloned();
        match callback {
            Some(callback) => callback(component),
            None => Ok(()),
        }
    }
}

impl ComponentDefinition for RecordingDefinition {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn template(&self) -> &dyn Template {
        &self.template
    }

    fn on_before_mount(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        self.record("onBeforeMount", component, props, state)
    }

    fn on_mounted(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        self.record("onMounted", component, props, state)
    }

    fn on_before_update(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        self.record("onBeforeUpdate", component, props, state)
    }

    fn on_updated(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        self.record("onUpdated", component, props, state)
    }

    fn on_before_unmount(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        self.record("onBeforeUnmount", component, props, state)
    }

    fn on_unmounted(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        self.record("onUnmounted", component, props, state)
    }

    fn should_update(&self, _component: &Component, _new_props: &PropMap, _old_props: &Props) -> bool {
        self.log.borrow_mut().push("shouldUpdate".to_string());
        self.allow_update.get()
    }
}
