//! Widget system.
//!
//! - [`Widget`] trait: the lifecycle contract of every response widget
//! - [`WidgetBase`]: shared bookkeeping (root, error element, highlight,
//!   enabled state)
//! - [`WidgetRegistry`]: widget factories by name
//! - [`Page`]: host owning the document, the dependencies and the widgets
//!
//! # Lifecycle
//!
//! A widget is built from validated options with its markup detached, then
//! appended under a parent node, then wired with `listeners()`. From then on
//! the host reads values, writes values, resets, enables and disables it.
//!
//! ```ignore
//! use choice_lattice::prelude::*;
//!
//! let mut page = Page::new().with_seed(42);
//! let body = page.body();
//! let id = page.add_widget(
//!     "ChoiceTable",
//!     serde_json::json!({ "id": "q1", "choices": ["A", "B", "C"], "requiredChoice": true }),
//!     body,
//! )?;
//!
//! let cell = page.document().get_element_by_id("q1::1").unwrap();
//! page.click(cell)?;
//! let values = page.get_values(id, &GetValuesOptions::default())?;
//! assert!(values.is_correct());
//! ```

mod base;
mod page;
mod registry;
mod traits;
pub mod widgets;

#[cfg(test)]
mod tests;

pub use base::{Orientation, WidgetBase, DISABLED_CLASS, HIGHLIGHTED_CLASS};
pub use page::{Page, WidgetId};
pub use registry::{WidgetFactory, WidgetRegistry};
pub use traits::{Widget, WidgetContext};
