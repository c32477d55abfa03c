//! Page host.
//!
//! A [`Page`] owns everything widgets depend on: the document, the random
//! number generator, the clock and the widget registry. Widgets are built
//! through it, appended, wired, and then addressed by [`WidgetId`].
//!
//! Clicks are dispatched like a browser would: from the target up to the
//! nearest element with a click listener, then to the widget owning that
//! listener.

use std::sync::Arc;

use choice_lattice_core::logging::targets;
use choice_lattice_core::{Clock, Document, EventKind, NodeId, SystemClock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slotmap::{new_key_type, SlotMap};

use super::registry::WidgetRegistry;
use super::{Widget, WidgetContext};
use crate::error::{Result, WidgetError};
use crate::validation::{GetValuesOptions, ResetOptions, SetValuesOptions, WidgetValues};

new_key_type! {
    /// Handle of a widget hosted by a [`Page`].
    pub struct WidgetId;
}

/// Document, dependencies and widgets of one page.
pub struct Page {
    doc: Document,
    rng: StdRng,
    clock: Arc<dyn Clock>,
    registry: WidgetRegistry,
    widgets: SlotMap<WidgetId, Box<dyn Widget>>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("widgets", &self.widgets.len())
            .field("registry", &self.registry)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// A page with the built-in widgets, an entropy-seeded RNG and the
    /// system clock.
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            rng: StdRng::from_entropy(),
            clock: Arc::new(SystemClock::new()),
            registry: WidgetRegistry::with_builtin(),
            widgets: SlotMap::with_key(),
        }
    }

    /// Use a seeded RNG, for reproducible shuffles.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Use `clock` for response times.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use `registry` to resolve widget names.
    pub fn with_registry(mut self, registry: WidgetRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The document, mutably.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// The `body` element.
    pub fn body(&self) -> NodeId {
        self.doc.body()
    }

    /// The widget registry.
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// The widget registry, mutably.
    pub fn registry_mut(&mut self) -> &mut WidgetRegistry {
        &mut self.registry
    }

    /// Dependencies for building or driving a widget by hand.
    pub fn context(&mut self) -> WidgetContext<'_> {
        WidgetContext::new(&mut self.doc, &mut self.rng, self.clock.as_ref())
    }

    /// Build the registered widget `name` from JSON `options`, append it
    /// under `parent` and register its listeners.
    pub fn add_widget(
        &mut self,
        name: &str,
        options: serde_json::Value,
        parent: NodeId,
    ) -> Result<WidgetId> {
        let mut ctx = WidgetContext::new(&mut self.doc, &mut self.rng, self.clock.as_ref());
        let widget = self.registry.create(name, options, &mut ctx)?;
        self.mount(widget, parent)
    }

    /// Build a widget with `build`, append it under `parent` and register its
    /// listeners.
    pub fn add<W, F>(&mut self, parent: NodeId, build: F) -> Result<WidgetId>
    where
        W: Widget + 'static,
        F: FnOnce(&mut WidgetContext<'_>) -> Result<W>,
    {
        let widget = build(&mut self.context())?;
        self.mount(Box::new(widget), parent)
    }

    fn mount(&mut self, mut widget: Box<dyn Widget>, parent: NodeId) -> Result<WidgetId> {
        let duplicate = self.find(widget.id()).is_some();
        let mut ctx = WidgetContext::new(&mut self.doc, &mut self.rng, self.clock.as_ref());
        if duplicate {
            let message = format!("widget id `{}` is already in use", widget.id());
            widget.destroy(&mut ctx)?;
            return Err(WidgetError::invalid_option("id", message));
        }
        widget.append(&mut ctx, parent)?;
        widget.listeners(&mut ctx)?;
        tracing::debug!(
            target: targets::PAGE,
            name = widget.widget_name(),
            id = %widget.id(),
            "widget mounted"
        );
        Ok(self.widgets.insert(widget))
    }

    /// Destroy widget `id` and remove its markup.
    pub fn remove_widget(&mut self, id: WidgetId) -> Result<()> {
        let mut widget = self.widgets.remove(id).ok_or(WidgetError::WidgetNotFound)?;
        widget.destroy(&mut self.context())
    }

    /// Widget `id`.
    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.widgets.get(id).map(|widget| &**widget)
    }

    /// Widget `id` as its concrete type.
    pub fn get<T: Widget + 'static>(&self, id: WidgetId) -> Option<&T> {
        self.widgets.get(id)?.as_any().downcast_ref()
    }

    /// Handle of the widget whose id is `widget_id`.
    pub fn find(&self, widget_id: &str) -> Option<WidgetId> {
        self.widgets
            .iter()
            .find(|(_, widget)| widget.id() == widget_id)
            .map(|(id, _)| id)
    }

    /// Widgets of page group `name`, sorted by their position in it.
    pub fn group_members(&self, name: &str) -> Vec<WidgetId> {
        let mut members: Vec<(Option<usize>, WidgetId)> = self
            .widgets
            .iter()
            .filter_map(|(id, widget)| match widget.group() {
                Some((group, order)) if group == name => Some((order, id)),
                _ => None,
            })
            .collect();
        members.sort_by_key(|&(order, _)| order.unwrap_or(usize::MAX));
        members.into_iter().map(|(_, id)| id).collect()
    }

    /// Number of hosted widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether no widget is hosted.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Run `f` on widget `id` with its dependencies.
    pub fn with_widget<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetContext<'_>) -> R,
    ) -> Result<R> {
        let widget = self.widgets.get_mut(id).ok_or(WidgetError::WidgetNotFound)?;
        let mut ctx = WidgetContext::new(&mut self.doc, &mut self.rng, self.clock.as_ref());
        Ok(f(&mut **widget, &mut ctx))
    }

    /// Run `f` on widget `id` as its concrete type.
    pub fn with_widget_as<T, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut T, &mut WidgetContext<'_>) -> R,
    ) -> Result<R>
    where
        T: Widget + 'static,
    {
        let widget = self
            .widgets
            .get_mut(id)
            .and_then(|widget| widget.as_any_mut().downcast_mut::<T>())
            .ok_or(WidgetError::WidgetNotFound)?;
        let mut ctx = WidgetContext::new(&mut self.doc, &mut self.rng, self.clock.as_ref());
        Ok(f(widget, &mut ctx))
    }

    /// Dispatch a click at `target`.
    ///
    /// Returns whether a widget took the click as a choice.
    pub fn click(&mut self, target: NodeId) -> Result<bool> {
        let Some(listener) = self.doc.listening_ancestor(target, EventKind::Click) else {
            tracing::trace!(target: targets::PAGE, ?target, "click without listener");
            return Ok(false);
        };
        let owner = self
            .widgets
            .iter()
            .find(|(_, widget)| widget.widget_base().listens_on(listener))
            .map(|(id, _)| id);
        let Some(owner) = owner else {
            tracing::trace!(target: targets::PAGE, ?listener, "listener owned by no widget");
            return Ok(false);
        };
        self.with_widget(owner, |widget, ctx| widget.handle_click(ctx, target))?
    }

    /// Read widget `id`.
    pub fn get_values(&mut self, id: WidgetId, options: &GetValuesOptions) -> Result<WidgetValues> {
        self.with_widget(id, |widget, ctx| widget.get_values(ctx, options))?
    }

    /// Read every widget without side effects, in insertion order.
    pub fn peek_all(&mut self) -> Result<Vec<WidgetValues>> {
        let ids: Vec<WidgetId> = self.widgets.keys().collect();
        ids.into_iter()
            .map(|id| self.get_values(id, &GetValuesOptions::peek()))
            .collect()
    }

    /// Write an answer into widget `id`.
    pub fn set_values(&mut self, id: WidgetId, options: &SetValuesOptions) -> Result<()> {
        self.with_widget(id, |widget, ctx| widget.set_values(ctx, options))?
    }

    /// Reset widget `id`.
    pub fn reset(&mut self, id: WidgetId, options: &ResetOptions) -> Result<()> {
        self.with_widget(id, |widget, ctx| widget.reset(ctx, options))?
    }

    /// Enable widget `id`.
    pub fn enable(&mut self, id: WidgetId) -> Result<bool> {
        self.with_widget(id, |widget, ctx| widget.enable(ctx))?
    }

    /// Disable widget `id`.
    pub fn disable(&mut self, id: WidgetId) -> Result<bool> {
        self.with_widget(id, |widget, ctx| widget.disable(ctx))?
    }
}

static_assertions::assert_impl_all!(Page: Send, Sync);
