//! Choices and their logical identity.

use std::fmt;

use choice_lattice_core::NodeId;
use serde::{Deserialize, Deserializer, Serialize};

/// The logical identity of a choice.
///
/// A choice is identified by its original position in the input sequence,
/// unless it is a `[value, label]` pair, in which case the explicit value is
/// used. Serializes as a bare number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    /// Original index in the choice sequence, or a numeric explicit value.
    Index(usize),
    /// Explicit textual value.
    Named(String),
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Named(s) => f.write_str(s),
        }
    }
}

impl From<usize> for ChoiceValue {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        Self::Named(value.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

/// A single selectable option.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    /// Plain text, displayed as is.
    Text(String),
    /// A number, displayed with its shortest representation.
    Number(f64),
    /// An explicit value with a display label.
    Pair {
        /// Value reported when the choice is selected.
        value: ChoiceValue,
        /// Text shown in the cell.
        label: String,
    },
    /// A pre-built node attached to the cell as is.
    Node(NodeId),
}

impl Choice {
    /// Create a `[value, label]` choice.
    pub fn pair(value: impl Into<ChoiceValue>, label: impl Into<String>) -> Self {
        Self::Pair {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The explicit value carried by the choice, if any.
    pub fn explicit_value(&self) -> Option<&ChoiceValue> {
        match self {
            Self::Pair { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The value identifying this choice when it sits at `index` in the
    /// original sequence.
    pub fn resolved_value(&self, index: usize) -> ChoiceValue {
        self.explicit_value()
            .cloned()
            .unwrap_or(ChoiceValue::Index(index))
    }

    /// Display text, or `None` for node choices.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Pair { label, .. } => Some(label.clone()),
            Self::Node(_) => None,
        }
    }
}

impl From<&str> for Choice {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Choice {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for Choice {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Choice {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

/// Wire shape of a choice inside JSON options.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChoiceWire {
    Text(String),
    Number(f64),
    Pair(ChoiceValue, String),
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ChoiceWire::deserialize(deserializer)? {
            ChoiceWire::Text(text) => Self::Text(text),
            ChoiceWire::Number(n) => Self::Number(n),
            ChoiceWire::Pair(value, label) => Self::Pair { value, label },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_value() {
        assert_eq!(Choice::from("A").resolved_value(2), ChoiceValue::Index(2));
        assert_eq!(
            Choice::pair("yes", "Yes please").resolved_value(0),
            ChoiceValue::from("yes")
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(Choice::from(3).label().as_deref(), Some("3"));
        assert_eq!(Choice::from(2.5).label().as_deref(), Some("2.5"));
        assert_eq!(Choice::pair(1usize, "One").label().as_deref(), Some("One"));
    }

    #[test]
    fn test_deserialize_choices() {
        let choices: Vec<Choice> =
            serde_json::from_str(r#"["Red", 7, ["g", "Green"], [10, "Ten"]]"#).unwrap();
        assert_eq!(
            choices,
            vec![
                Choice::from("Red"),
                Choice::Number(7.0),
                Choice::pair("g", "Green"),
                Choice::pair(10usize, "Ten"),
            ]
        );
    }

    #[test]
    fn test_deserialize_rejects_objects() {
        let parsed: Result<Vec<Choice>, _> = serde_json::from_str(r#"[{"a": 1}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_value_serializes_bare() {
        assert_eq!(serde_json::to_string(&ChoiceValue::Index(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ChoiceValue::from("b")).unwrap(),
            "\"b\""
        );
    }
}
