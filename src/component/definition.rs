//! Component Definition - User-authored hooks and template.
//!
//! One definition is usually shared by many instances. Every hook has a
//! no-op default; only [`ComponentDefinition::template`] is required.
//!
//! Hooks receive the owning [`Component`] explicitly, so a hook may read the
//! instance or call back into it (including a re-entrant `update`).

use anyhow::Result;

use crate::template::Template;
use crate::types::{PropMap, Props, State};
use super::lifecycle::Component;

/// Lifecycle hooks and template accessor of a component.
#[allow(unused_variables)]
pub trait ComponentDefinition {
    /// Component name, used for the CSS hook.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Template the instance renders.
    fn template(&self) -> &dyn Template;

    fn on_before_mount(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        Ok(())
    }

    fn on_mounted(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        Ok(())
    }

    fn on_before_update(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        Ok(())
    }

    fn on_updated(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        Ok(())
    }

    fn on_before_unmount(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        Ok(())
    }

    fn on_unmounted(&self, component: &Component, props: &Props, state: &State) -> Result<()> {
        Ok(())
    }

    /// Return `false` to abort an update before it has any effect.
    fn should_update(&self, component: &Component, new_props: &PropMap, old_props: &Props) -> bool {
        true
    }
}
