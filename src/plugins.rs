//! Plugins - Post-processing of freshly created instances.
//!
//! Every installed plugin runs once against each new [`Component`], in
//! install order, before the instance is handed to the caller. Plugins
//! typically attach capabilities through [`Component::insert_extension`].
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use spark_component::plugins::{self, Plugin};
//! use spark_component::Component;
//!
//! let plugin: Plugin = Rc::new(|component: &Component| {
//!     component.insert_extension(42u32);
//!     Ok(())
//! });
//! plugins::install(plugin.clone()).unwrap();
//! assert!(plugins::install(plugin.clone()).is_err());
//! plugins::uninstall(&plugin).unwrap();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::component::Component;

/// A plugin. Identity is the `Rc` allocation.
pub type Plugin = Rc<dyn Fn(&Component) -> anyhow::Result<()>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("this plugin was already installed")]
    AlreadyInstalled,
    #[error("this plugin was never installed")]
    NotInstalled,
}

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Installed plugins in install order.
    static PLUGINS: RefCell<Vec<Plugin>> = RefCell::new(Vec::new());
}

/// Install a plugin for every instance created from now on.
pub fn install(plugin: Plugin) -> Result<(), PluginError> {
    PLUGINS.with(|plugins| {
        let mut plugins = plugins.borrow_mut();
        if plugins.iter().any(|installed| Rc::ptr_eq(installed, &plugin)) {
            return Err(PluginError::AlreadyInstalled);
        }
        plugins.push(plugin);
        tracing::trace!(installed = plugins.len(), "plugin installed");
        Ok(())
    })
}

/// Remove a previously installed plugin.
pub fn uninstall(plugin: &Plugin) -> Result<(), PluginError> {
    PLUGINS.with(|plugins| {
        let mut plugins = plugins.borrow_mut();
        let Some(position) = plugins.iter().position(|installed| Rc::ptr_eq(installed, plugin)) else {
            return Err(PluginError::NotInstalled);
        };
        plugins.remove(position);
        tracing::trace!(installed = plugins.len(), "plugin uninstalled");
        Ok(())
    })
}

/// Number of installed plugins.
pub fn installed_count() -> usize {
    PLUGINS.with(|plugins| plugins.borrow().len())
}

/// Run every installed plugin against `component`.
///
/// The list is copied first so a plugin may install or uninstall plugins.
pub fn run_plugins(component: &Component) -> anyhow::Result<()> {
    let plugins = PLUGINS.with(|plugins| plugins.borrow().clone());
    for plugin in plugins {
        plugin(component)?;
    }
    Ok(())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Remove every plugin (for testing).
pub fn reset_plugins() {
    PLUGINS.with(|plugins| plugins.borrow_mut().clear());
}
