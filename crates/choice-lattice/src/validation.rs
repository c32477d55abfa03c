//! Required-choice rules and the records returned by `get_values`.
//!
//! Validation never fails with an error. A response that is missing or wrong
//! is reported as `is_correct: false` and, optionally, highlighted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::choice::ChoiceValue;
use crate::selection::CurrentChoice;

/// Error text shown when a standalone table lacks a required answer.
pub const MISSING_CHOICE_MESSAGE: &str = "Please select an option";

/// Error text shown once by a group when required items are unanswered.
pub const MISSING_ITEMS_MESSAGE: &str = "Please answer all required questions";

/// Default border applied by `highlight()`.
pub const DEFAULT_HIGHLIGHT_BORDER: &str = "3px solid red";

/// How many selections a widget needs before its answer counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RequiredWire")]
pub enum RequiredChoice {
    /// No answer needed.
    #[default]
    NotRequired,
    /// At least this many selections.
    AtLeast(usize),
}

impl RequiredChoice {
    /// Whether any selection is required.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::AtLeast(n) if *n > 0)
    }

    /// Minimum number of selections.
    pub fn minimum(&self) -> usize {
        match self {
            Self::NotRequired => 0,
            Self::AtLeast(n) => *n,
        }
    }

    /// Whether `count` selections satisfy the rule.
    pub fn is_satisfied(&self, count: usize) -> bool {
        count >= self.minimum()
    }
}

impl From<bool> for RequiredChoice {
    fn from(required: bool) -> Self {
        if required {
            Self::AtLeast(1)
        } else {
            Self::NotRequired
        }
    }
}

/// JSON shape of `requiredChoice`: a flag or a count.
#[derive(Deserialize)]
#[serde(untagged)]
enum RequiredWire {
    Flag(bool),
    Count(usize),
}

impl From<RequiredWire> for RequiredChoice {
    fn from(wire: RequiredWire) -> Self {
        match wire {
            RequiredWire::Flag(flag) => flag.into(),
            RequiredWire::Count(0) => Self::NotRequired,
            RequiredWire::Count(n) => Self::AtLeast(n),
        }
    }
}

/// Options of `get_values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetValuesOptions {
    /// Highlight the widget when validation fails, clear it when it passes.
    pub highlight: bool,
    /// Record the current selection in the attempts log when it is invalid.
    pub mark_attempt: bool,
    /// Reset the widget after a successful read.
    pub reset: bool,
    /// Include the labels of the selected choices.
    pub add_value: bool,
}

impl Default for GetValuesOptions {
    fn default() -> Self {
        Self {
            highlight: true,
            mark_attempt: true,
            reset: false,
            add_value: false,
        }
    }
}

impl GetValuesOptions {
    /// Read without side effects: no highlight, no attempt, no reset.
    pub fn peek() -> Self {
        Self {
            highlight: false,
            mark_attempt: false,
            reset: false,
            add_value: false,
        }
    }

    /// Set `highlight`.
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Set `mark_attempt`.
    pub fn with_mark_attempt(mut self, mark_attempt: bool) -> Self {
        self.mark_attempt = mark_attempt;
        self
    }

    /// Set `reset`.
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Set `add_value`.
    pub fn with_add_value(mut self, add_value: bool) -> Self {
        self.add_value = add_value;
        self
    }
}

/// Options of `set_values`.
///
/// With neither `values` nor `correct`, a random valid answer is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetValuesOptions {
    /// Explicit values to select.
    pub values: Option<Vec<ChoiceValue>>,
    /// Select the configured correct answer.
    pub correct: bool,
    /// Per-item options for group widgets, keyed by item id.
    pub items: BTreeMap<String, SetValuesOptions>,
}

impl SetValuesOptions {
    /// Select these values.
    pub fn values(values: impl IntoIterator<Item = ChoiceValue>) -> Self {
        Self {
            values: Some(values.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Select the correct answer.
    pub fn correct() -> Self {
        Self {
            correct: true,
            ..Default::default()
        }
    }

    /// Select a random answer.
    pub fn random() -> Self {
        Self::default()
    }

    /// Add options for one group item.
    pub fn with_item(mut self, item: impl Into<String>, options: SetValuesOptions) -> Self {
        self.items.insert(item.into(), options);
        self
    }
}

/// Options of `reset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetOptions {
    /// Draw a fresh order for widgets configured to shuffle.
    pub shuffle: bool,
}

/// Values collected from a `ChoiceTable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceTableValues {
    /// Widget (or item) id.
    pub id: String,
    /// Current answer.
    pub value: Option<CurrentChoice>,
    /// Whether the answer is complete and, if a correct answer is set, right.
    pub is_correct: bool,
    /// Clock reading of the last selection change.
    pub time: Option<u64>,
    /// Answers recorded by invalid reads, oldest first.
    pub attempts: Vec<Option<CurrentChoice>>,
    /// Clicks on cells.
    pub n_clicks: u32,
    /// Display order, when shuffled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<usize>>,
    /// Labels of the selected choices, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Free-text answer, when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
}

/// Values collected from a `ChoiceTableGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupValues {
    /// Group id.
    pub id: String,
    /// Per-item records keyed by item id.
    pub items: BTreeMap<String, ChoiceTableValues>,
    /// Whether every item is correct.
    pub is_correct: bool,
    /// Required items without an answer, in display order.
    pub missing: Vec<String>,
    /// Item display order, when shuffled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<usize>>,
    /// Free-text answer, when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
}

/// Values of any widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WidgetValues {
    /// From a `ChoiceTable`.
    ChoiceTable(ChoiceTableValues),
    /// From a `ChoiceTableGroup`.
    Group(GroupValues),
}

impl WidgetValues {
    /// Overall correctness.
    pub fn is_correct(&self) -> bool {
        match self {
            Self::ChoiceTable(values) => values.is_correct,
            Self::Group(values) => values.is_correct,
        }
    }

    /// Serialize to JSON for sending to a server.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_choice() {
        assert!(!RequiredChoice::NotRequired.is_required());
        assert!(RequiredChoice::NotRequired.is_satisfied(0));
        assert!(!RequiredChoice::AtLeast(2).is_satisfied(1));
        assert!(RequiredChoice::AtLeast(2).is_satisfied(2));
        assert_eq!(RequiredChoice::from(true), RequiredChoice::AtLeast(1));
    }

    #[test]
    fn test_required_choice_from_json() {
        let r: RequiredChoice = serde_json::from_str("true").unwrap();
        assert_eq!(r, RequiredChoice::AtLeast(1));
        let r: RequiredChoice = serde_json::from_str("0").unwrap();
        assert_eq!(r, RequiredChoice::NotRequired);
        let r: RequiredChoice = serde_json::from_str("2").unwrap();
        assert_eq!(r, RequiredChoice::AtLeast(2));
    }

    #[test]
    fn test_get_values_defaults() {
        let opts = GetValuesOptions::default();
        assert!(opts.highlight);
        assert!(opts.mark_attempt);
        assert!(!opts.reset);

        let opts: GetValuesOptions = serde_json::from_str(r#"{"markAttempt": false}"#).unwrap();
        assert!(opts.highlight);
        assert!(!opts.mark_attempt);
    }

    #[test]
    fn test_values_serialize_camel_case() {
        let values = ChoiceTableValues {
            id: "q1".into(),
            value: Some(CurrentChoice::Single(ChoiceValue::Index(1))),
            is_correct: true,
            time: Some(1200),
            attempts: Vec::new(),
            n_clicks: 1,
            order: None,
            labels: None,
            free_text: None,
        };
        let json = WidgetValues::ChoiceTable(values).to_json();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "q1",
                "value": 1,
                "isCorrect": true,
                "time": 1200,
                "attempts": [],
                "nClicks": 1
            })
        );
    }
}
