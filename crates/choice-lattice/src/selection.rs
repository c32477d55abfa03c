//! Selection state of a choice table.
//!
//! [`SelectionState`] tracks which choices are selected, how many times the
//! participant clicked, and when the selection last changed. It knows
//! nothing about the document: callers apply the returned [`Transition`] to
//! the cells.
//!
//! # Single vs. multiple selection
//!
//! In [`SelectMode::Single`] at most one value is selected; selecting another
//! value replaces it. What a click on the already-selected value does is set
//! by [`ReclickPolicy`]. In [`SelectMode::Multiple`] each click toggles
//! membership of one value, optionally capped at a maximum.

use serde::{Deserialize, Serialize};

use crate::choice::ChoiceValue;

/// Selection behavior of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "SelectMultiple")]
pub enum SelectMode {
    /// At most one choice selected.
    #[default]
    Single,
    /// Any number of choices, up to `max` if given.
    Multiple {
        /// Maximum number of simultaneously selected choices.
        max: Option<usize>,
    },
}

impl SelectMode {
    /// Multiple selection without a cap.
    pub fn multiple() -> Self {
        Self::Multiple { max: None }
    }

    /// Whether more than one value may be selected.
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple { .. })
    }

    /// Maximum number of selected values.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            Self::Single => Some(1),
            Self::Multiple { max } => *max,
        }
    }
}

/// JSON shape of `selectMultiple`: a flag or a maximum.
#[derive(Deserialize)]
#[serde(untagged)]
enum SelectMultiple {
    Flag(bool),
    Max(usize),
}

impl From<SelectMultiple> for SelectMode {
    fn from(value: SelectMultiple) -> Self {
        match value {
            SelectMultiple::Flag(false) => Self::Single,
            SelectMultiple::Flag(true) => Self::multiple(),
            SelectMultiple::Max(max) => Self::Multiple { max: Some(max) },
        }
    }
}

/// What a click on the currently selected value does in single mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReclickPolicy {
    /// Keep the selection (standalone tables).
    #[default]
    Keep,
    /// Deselect it (items of a group).
    Deselect,
}

/// The current answer: one value, or the selected set in click order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrentChoice {
    /// Single selection.
    Single(ChoiceValue),
    /// Multiple selection.
    Multiple(Vec<ChoiceValue>),
}

impl CurrentChoice {
    /// Selected values as a slice-like vector.
    pub fn values(&self) -> Vec<&ChoiceValue> {
        match self {
            Self::Single(value) => vec![value],
            Self::Multiple(values) => values.iter().collect(),
        }
    }

    /// Compare with another answer, ignoring order in multiple selections.
    pub fn same_answer(&self, other: &CurrentChoice) -> bool {
        let mut a = self.values();
        let mut b = other.values();
        a.sort();
        b.sort();
        a == b
    }
}

/// Effect of a selection operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// `value` became selected; `replaced` lost its selection (single mode).
    Selected {
        value: ChoiceValue,
        replaced: Option<ChoiceValue>,
    },
    /// `value` lost its selection.
    Deselected(ChoiceValue),
    /// Nothing changed.
    Unchanged,
    /// The selection cap was reached.
    Refused,
}

impl Transition {
    /// Whether the selection changed.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Selected { .. } | Self::Deselected(_))
    }
}

/// Payload of the `choice_changed` signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceChanged {
    /// Id of the table (or group item) whose selection changed.
    pub item: String,
    /// Choice that changed.
    pub value: ChoiceValue,
    /// Whether it is now selected.
    pub selected: bool,
}

impl ChoiceChanged {
    /// Notifications for the cells affected by `transition`.
    pub fn from_transition(item: &str, transition: &Transition) -> Vec<Self> {
        let event = |value: &ChoiceValue, selected| Self {
            item: item.to_string(),
            value: value.clone(),
            selected,
        };
        match transition {
            Transition::Selected { value, replaced } => replaced
                .iter()
                .map(|old| event(old, false))
                .chain(std::iter::once(event(value, true)))
                .collect(),
            Transition::Deselected(value) => vec![event(value, false)],
            Transition::Unchanged | Transition::Refused => Vec::new(),
        }
    }
}

/// Current selection, click counter and last-change time.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    mode: SelectMode,
    reclick: ReclickPolicy,
    selected: Vec<ChoiceValue>,
    number_of_clicks: u32,
    time_current_choice: Option<u64>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new(mode: SelectMode, reclick: ReclickPolicy) -> Self {
        Self {
            mode,
            reclick,
            ..Default::default()
        }
    }

    /// Selection mode.
    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    /// Re-click behavior.
    pub fn reclick_policy(&self) -> ReclickPolicy {
        self.reclick
    }

    /// Handle a participant click on `value` at time `now`.
    ///
    /// Every click is counted, whether or not it changes the selection.
    pub fn click(&mut self, value: ChoiceValue, now: u64) -> Transition {
        self.number_of_clicks = self.number_of_clicks.saturating_add(1);
        let transition = match self.mode {
            SelectMode::Single if self.is_selected(&value) => match self.reclick {
                ReclickPolicy::Keep => Transition::Unchanged,
                ReclickPolicy::Deselect => self.remove(&value),
            },
            SelectMode::Single => self.replace(value),
            SelectMode::Multiple { .. } if self.is_selected(&value) => self.remove(&value),
            SelectMode::Multiple { .. } => self.add(value),
        };
        self.touch(&transition, now);
        transition
    }

    /// Select `value` programmatically, without counting a click.
    ///
    /// Selecting an already-selected value is a no-op.
    pub fn set(&mut self, value: ChoiceValue, now: u64) -> Transition {
        let transition = if self.is_selected(&value) {
            Transition::Unchanged
        } else if self.mode.is_multiple() {
            self.add(value)
        } else {
            self.replace(value)
        };
        self.touch(&transition, now);
        transition
    }

    /// Deselect `value`, or everything when `value` is `None`.
    ///
    /// Returns the values that lost their selection.
    pub fn unset(&mut self, value: Option<&ChoiceValue>, now: u64) -> Vec<ChoiceValue> {
        let removed = match value {
            Some(value) => match self.remove(value) {
                Transition::Deselected(v) => vec![v],
                _ => Vec::new(),
            },
            None => std::mem::take(&mut self.selected),
        };
        if !removed.is_empty() {
            self.time_current_choice = Some(now);
        }
        removed
    }

    /// Whether `value` is selected.
    pub fn is_selected(&self, value: &ChoiceValue) -> bool {
        self.selected.contains(value)
    }

    /// Selected values in selection order.
    pub fn selected(&self) -> &[ChoiceValue] {
        &self.selected
    }

    /// Number of selected values.
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// The current answer, or `None` when nothing is selected.
    ///
    /// Multiple-select widgets report a (possibly single-element) set.
    pub fn current(&self) -> Option<CurrentChoice> {
        if self.selected.is_empty() {
            return None;
        }
        Some(match self.mode {
            SelectMode::Single => CurrentChoice::Single(self.selected[0].clone()),
            SelectMode::Multiple { .. } => CurrentChoice::Multiple(self.selected.clone()),
        })
    }

    /// Total clicks on cells since the last reset.
    pub fn number_of_clicks(&self) -> u32 {
        self.number_of_clicks
    }

    /// Clock reading of the last selection change.
    pub fn time_current_choice(&self) -> Option<u64> {
        self.time_current_choice
    }

    /// Forget selection, clicks and time.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.number_of_clicks = 0;
        self.time_current_choice = None;
    }

    fn replace(&mut self, value: ChoiceValue) -> Transition {
        let replaced = self.selected.pop();
        self.selected.clear();
        self.selected.push(value.clone());
        Transition::Selected { value, replaced }
    }

    fn add(&mut self, value: ChoiceValue) -> Transition {
        if self
            .mode
            .capacity()
            .is_some_and(|cap| self.selected.len() >= cap)
        {
            return Transition::Refused;
        }
        self.selected.push(value.clone());
        Transition::Selected {
            value,
            replaced: None,
        }
    }

    fn remove(&mut self, value: &ChoiceValue) -> Transition {
        match self.selected.iter().position(|v| v == value) {
            Some(pos) => Transition::Deselected(self.selected.remove(pos)),
            None => Transition::Unchanged,
        }
    }

    fn touch(&mut self, transition: &Transition, now: u64) {
        if transition.is_change() {
            self.time_current_choice = Some(now);
        }
    }
}
