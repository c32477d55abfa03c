//! Core widget trait definitions.
//!
//! # Key Types
//!
//! - [`Widget`] - Lifecycle contract shared by every response widget
//! - [`WidgetContext`] - Explicit dependencies handed to widget operations

use std::any::Any;

use choice_lattice_core::{Clock, Document, NodeId};
use rand::rngs::StdRng;

use super::base::WidgetBase;
use crate::error::Result;
use crate::validation::{GetValuesOptions, ResetOptions, SetValuesOptions, WidgetValues};

/// Dependencies a widget needs while it builds markup or handles input.
///
/// Everything is passed in explicitly; widgets never look up global state.
pub struct WidgetContext<'a> {
    /// Document holding the widget's markup.
    pub doc: &'a mut Document,
    /// Randomness for shuffles and random answers.
    pub rng: &'a mut StdRng,
    /// Step clock for response times.
    pub clock: &'a dyn Clock,
}

impl<'a> WidgetContext<'a> {
    /// Bundle the dependencies.
    pub fn new(doc: &'a mut Document, rng: &'a mut StdRng, clock: &'a dyn Clock) -> Self {
        Self { doc, rng, clock }
    }

    /// Current clock reading.
    pub fn now(&self) -> u64 {
        self.clock.elapsed_ms()
    }
}

/// The lifecycle contract of a response widget.
///
/// A widget is constructed from validated options (building its markup
/// detached), then [`append`](Self::append)ed under a parent node, then
/// wired with [`listeners`](Self::listeners). After that the host reads and
/// writes answers and toggles interactivity.
///
/// Implementors provide the required methods and embed a [`WidgetBase`];
/// the provided methods cover enabling, highlighting and error display.
pub trait Widget: Send + Sync {
    /// Registry name of the widget type.
    fn widget_name(&self) -> &'static str;

    /// Shared widget state.
    fn widget_base(&self) -> &WidgetBase;

    /// Mutable shared widget state.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    /// Register event listeners.
    fn listeners(&mut self, ctx: &mut WidgetContext<'_>) -> Result<()>;

    /// Handle a click dispatched at `target`.
    ///
    /// Returns whether the click landed on a choice.
    fn handle_click(&mut self, ctx: &mut WidgetContext<'_>, target: NodeId) -> Result<bool>;

    /// Read (and validate) the current answer.
    fn get_values(
        &mut self,
        ctx: &mut WidgetContext<'_>,
        options: &GetValuesOptions,
    ) -> Result<WidgetValues>;

    /// Write an answer programmatically.
    fn set_values(&mut self, ctx: &mut WidgetContext<'_>, options: &SetValuesOptions)
        -> Result<()>;

    /// Clear the answer and transient state.
    fn reset(&mut self, ctx: &mut WidgetContext<'_>, options: &ResetOptions) -> Result<()>;

    /// Upcast for downcasting to the concrete widget.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete widget.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    // =========================================================================
    // Provided
    // =========================================================================

    /// Widget id.
    fn id(&self) -> &str {
        self.widget_base().id()
    }

    /// Root node.
    fn root(&self) -> NodeId {
        self.widget_base().root()
    }

    /// Page group name and position inside it.
    fn group(&self) -> Option<(&str, Option<usize>)> {
        None
    }

    /// Attach the widget under `parent`.
    fn append(&mut self, ctx: &mut WidgetContext<'_>, parent: NodeId) -> Result<()> {
        self.widget_base_mut().append(ctx.doc, parent)
    }

    /// Enable interaction. Returns `false` if already enabled.
    fn enable(&mut self, ctx: &mut WidgetContext<'_>) -> Result<bool> {
        self.widget_base_mut().enable(ctx.doc)
    }

    /// Disable interaction. Returns `false` if already disabled.
    fn disable(&mut self, ctx: &mut WidgetContext<'_>) -> Result<bool> {
        self.widget_base_mut().disable(ctx.doc)
    }

    /// Whether the widget is disabled.
    fn is_disabled(&self) -> bool {
        self.widget_base().is_disabled()
    }

    /// Highlight the widget, optionally with a custom border.
    fn highlight(&mut self, ctx: &mut WidgetContext<'_>, border: Option<&str>) -> Result<bool> {
        self.widget_base_mut().highlight(ctx.doc, border)
    }

    /// Remove the highlight.
    fn unhighlight(&mut self, ctx: &mut WidgetContext<'_>) -> Result<bool> {
        self.widget_base_mut().unhighlight(ctx.doc)
    }

    /// Whether the widget is highlighted.
    fn is_highlighted(&self) -> bool {
        self.widget_base().is_highlighted()
    }

    /// Show an error message (and highlight), or clear both.
    fn set_error(&mut self, ctx: &mut WidgetContext<'_>, message: Option<&str>) -> Result<()> {
        self.widget_base_mut().set_error(ctx.doc, message)
    }

    /// Remove the widget's markup.
    fn destroy(&mut self, ctx: &mut WidgetContext<'_>) -> Result<()> {
        self.widget_base_mut().destroy(ctx.doc)
    }
}
