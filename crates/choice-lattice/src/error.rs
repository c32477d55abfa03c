//! Error types for the widget library.
//!
//! Only configuration problems are errors. A response that fails validation
//! is reported as data (`is_correct: false`), and a click that does not land
//! on a choice is silently ignored.

use choice_lattice_core::DomError;

use crate::choice::ChoiceValue;

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Errors raised while configuring or driving a widget.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// A widget was configured without any choices.
    #[error("Widget '{widget}' requires at least one choice")]
    EmptyChoices { widget: String },

    /// An option has a value of the wrong shape or out of range.
    #[error("Invalid value for option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    /// Options could not be deserialized.
    #[error("Invalid widget options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// A choice cannot be rendered.
    #[error("Invalid choice at index {index}: {message}")]
    InvalidChoice { index: usize, message: String },

    /// Two choices of one widget resolve to the same value.
    #[error("Duplicate choice value '{value}' in widget '{widget}'")]
    DuplicateChoiceValue { widget: String, value: ChoiceValue },

    /// Two cells of one widget received the same identifier.
    #[error("Duplicate cell identifier '{0}'")]
    DuplicateCellId(String),

    /// A value does not belong to any choice of the widget.
    #[error("Unknown choice value '{value}' in widget '{widget}'")]
    UnknownChoice { widget: String, value: ChoiceValue },

    /// A value belongs to a choice left out of the rendered subset.
    #[error("Choice value '{value}' is not displayed in widget '{widget}'")]
    HiddenChoice { widget: String, value: ChoiceValue },

    /// No factory is registered under this widget name.
    #[error("Unknown widget '{0}'")]
    UnknownWidget(String),

    /// The widget was already appended to the document.
    #[error("Widget '{0}' is already appended")]
    AlreadyAppended(String),

    /// The widget handle does not refer to a live widget.
    #[error("Widget not found")]
    WidgetNotFound,

    /// Underlying document error.
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl WidgetError {
    /// Create an option error.
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Create a choice error.
    pub fn invalid_choice(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidChoice {
            index,
            message: message.into(),
        }
    }

    /// Whether this error was caused by widget configuration.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::WidgetNotFound | Self::Dom(_))
    }
}
