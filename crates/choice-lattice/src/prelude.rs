//! Prelude module for Choice Lattice.
//!
//! ```ignore
//! use choice_lattice::prelude::*;
//! ```

// ============================================================================
// Document and Notifications
// ============================================================================

pub use choice_lattice_core::{
    Clock, ConnectionId, Document, EventKind, ManualClock, NodeId, Signal, SystemClock,
};

// ============================================================================
// Choices and Selection
// ============================================================================

pub use crate::choice::{Choice, ChoiceRenderer, ChoiceValue, Order, SharedRenderer};
pub use crate::selection::{ChoiceChanged, CurrentChoice, SelectMode, Transition};

// ============================================================================
// Validation
// ============================================================================

pub use crate::validation::{
    ChoiceTableValues, GetValuesOptions, GroupValues, RequiredChoice, ResetOptions,
    SetValuesOptions, WidgetValues,
};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::widgets::{
    ChoiceTable, ChoiceTableGroup, ChoiceTableGroupOptions, ChoiceTableOptions, GroupItemOptions,
};
pub use crate::widget::{Orientation, Page, Widget, WidgetContext, WidgetId, WidgetRegistry};

pub use crate::error::{Result, WidgetError};
