//! Widget factories by name.
//!
//! A [`WidgetRegistry`] maps widget names to factories that build a boxed
//! [`Widget`] from JSON options. Hosts own their registry and pass it where
//! it is needed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use choice_lattice_core::logging::targets;

use super::widgets::{ChoiceTable, ChoiceTableGroup, CHOICE_TABLE, CHOICE_TABLE_GROUP};
use super::{Widget, WidgetContext};
use crate::error::{Result, WidgetError};

/// Builds a widget from JSON options.
pub type WidgetFactory = Arc<
    dyn Fn(serde_json::Value, &mut WidgetContext<'_>) -> Result<Box<dyn Widget>> + Send + Sync,
>;

/// Named widget factories.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    factories: HashMap<String, WidgetFactory>,
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl WidgetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `ChoiceTable` and `ChoiceTableGroup`.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(CHOICE_TABLE, |options, ctx| {
            Ok(Box::new(ChoiceTable::from_json(options, ctx)?) as Box<dyn Widget>)
        });
        registry.register(CHOICE_TABLE_GROUP, |options, ctx| {
            Ok(Box::new(ChoiceTableGroup::from_json(options, ctx)?) as Box<dyn Widget>)
        });
        registry
    }

    /// Register `factory` under `name`, returning the factory it replaces.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Option<WidgetFactory>
    where
        F: Fn(serde_json::Value, &mut WidgetContext<'_>) -> Result<Box<dyn Widget>>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        tracing::debug!(target: targets::REGISTRY, %name, "widget registered");
        self.factories.insert(name, Arc::new(factory))
    }

    /// Remove the factory of `name`.
    pub fn unregister(&mut self, name: &str) -> Option<WidgetFactory> {
        self.factories.remove(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a `name` widget from `options`.
    pub fn create(
        &self,
        name: &str,
        options: serde_json::Value,
        ctx: &mut WidgetContext<'_>,
    ) -> Result<Box<dyn Widget>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| WidgetError::UnknownWidget(name.to_string()))?;
        let widget = factory(options, ctx);
        if let Err(err) = &widget {
            tracing::warn!(target: targets::REGISTRY, name, error = %err, "widget construction failed");
        }
        widget
    }
}
