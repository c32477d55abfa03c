//! Shared widget bookkeeping.
//!
//! [`WidgetBase`] holds what every widget has in common: its id, its root
//! node, the optional error element, the node carrying the click listener,
//! and the highlighted/disabled flags. Widgets embed it and expose it through
//! [`Widget::widget_base`](super::Widget::widget_base), which gives them the
//! provided `enable`, `disable`, `highlight`, `unhighlight` and `set_error`
//! implementations.

use choice_lattice_core::{Document, EventKind, NodeId};
use serde::Deserialize;

use crate::error::{Result, WidgetError};
use crate::validation::DEFAULT_HIGHLIGHT_BORDER;

/// CSS class added while a widget is highlighted.
pub const HIGHLIGHTED_CLASS: &str = "highlighted";

/// CSS class added while a widget is disabled.
pub const DISABLED_CLASS: &str = "disabled";

/// Layout direction of choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Orientation {
    /// Choices side by side in one row.
    #[default]
    #[serde(rename = "H", alias = "h")]
    Horizontal,
    /// One choice per row.
    #[serde(rename = "V", alias = "v")]
    Vertical,
}

/// Common state of every widget.
#[derive(Debug, Clone)]
pub struct WidgetBase {
    id: String,
    root: NodeId,
    error_box: Option<NodeId>,
    listener: Option<NodeId>,
    appended: bool,
    highlighted: bool,
    disabled: bool,
}

impl WidgetBase {
    /// Create the base of a widget whose markup hangs off `root`.
    pub fn new(id: impl Into<String>, root: NodeId) -> Self {
        Self {
            id: id.into(),
            root,
            error_box: None,
            listener: None,
            appended: false,
            highlighted: false,
            disabled: false,
        }
    }

    /// Use `node` to display error messages.
    pub fn with_error_box(mut self, node: NodeId) -> Self {
        self.error_box = Some(node);
        self
    }

    /// Widget id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Root node of the widget's markup.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Error message element, if the widget has one.
    pub fn error_box(&self) -> Option<NodeId> {
        self.error_box
    }

    /// Node carrying the click listener, once listeners are attached.
    pub fn listener_node(&self) -> Option<NodeId> {
        self.listener
    }

    /// Whether clicks on `node` should be routed to this widget.
    pub fn listens_on(&self, node: NodeId) -> bool {
        !self.disabled && self.listener == Some(node)
    }

    /// Whether the widget has been appended.
    pub fn is_appended(&self) -> bool {
        self.appended
    }

    /// Whether the widget is highlighted.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Whether the widget is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Attach the root under `parent`.
    ///
    /// A widget can only be appended once.
    pub fn append(&mut self, doc: &mut Document, parent: NodeId) -> Result<()> {
        if self.appended {
            return Err(WidgetError::AlreadyAppended(self.id.clone()));
        }
        doc.append_child(parent, self.root)?;
        self.appended = true;
        Ok(())
    }

    /// Register the click listener on `node`.
    ///
    /// The listener stays detached while the widget is disabled and is
    /// attached again by [`enable`](Self::enable).
    pub fn attach_listener(&mut self, doc: &mut Document, node: NodeId) -> Result<()> {
        if let Some(previous) = self.listener.replace(node) {
            if previous != node && doc.contains(previous) {
                doc.remove_listener(previous, EventKind::Click)?;
            }
        }
        if !self.disabled {
            doc.add_listener(node, EventKind::Click)?;
        }
        Ok(())
    }

    /// Enable interaction. Returns `false` if already enabled.
    pub fn enable(&mut self, doc: &mut Document) -> Result<bool> {
        if !self.disabled {
            return Ok(false);
        }
        self.disabled = false;
        if let Some(node) = self.listener {
            doc.add_listener(node, EventKind::Click)?;
        }
        doc.remove_class(self.root, DISABLED_CLASS)?;
        Ok(true)
    }

    /// Disable interaction. Returns `false` if already disabled.
    pub fn disable(&mut self, doc: &mut Document) -> Result<bool> {
        if self.disabled {
            return Ok(false);
        }
        self.disabled = true;
        if let Some(node) = self.listener {
            doc.remove_listener(node, EventKind::Click)?;
        }
        doc.add_class(self.root, DISABLED_CLASS)?;
        Ok(true)
    }

    /// Highlight the widget with `border`, or the default border.
    ///
    /// Returns `false` if it was already highlighted; an explicit border
    /// still replaces the current one.
    pub fn highlight(&mut self, doc: &mut Document, border: Option<&str>) -> Result<bool> {
        if self.highlighted {
            if let Some(border) = border {
                doc.set_style(self.root, "border", border)?;
            }
            return Ok(false);
        }
        doc.set_style(self.root, "border", border.unwrap_or(DEFAULT_HIGHLIGHT_BORDER))?;
        doc.add_class(self.root, HIGHLIGHTED_CLASS)?;
        self.highlighted = true;
        Ok(true)
    }

    /// Remove the highlight. Returns `false` if it was not highlighted.
    pub fn unhighlight(&mut self, doc: &mut Document) -> Result<bool> {
        if !self.highlighted {
            return Ok(false);
        }
        doc.remove_style(self.root, "border")?;
        doc.remove_class(self.root, HIGHLIGHTED_CLASS)?;
        self.highlighted = false;
        Ok(true)
    }

    /// Show `message` and highlight, or clear both with `None`.
    ///
    /// This is the only place error text is written, so the text and the
    /// highlight cannot disagree.
    pub fn set_error(&mut self, doc: &mut Document, message: Option<&str>) -> Result<()> {
        let message = message.filter(|m| !m.is_empty());
        if let Some(error_box) = self.error_box {
            doc.set_text(error_box, message.unwrap_or(""))?;
        }
        match message {
            Some(_) => self.highlight(doc, None)?,
            None => self.unhighlight(doc)?,
        };
        Ok(())
    }

    /// Current error text.
    pub fn error_text(&self, doc: &Document) -> String {
        self.error_box
            .map(|node| doc.text_content(node))
            .unwrap_or_default()
    }

    /// Remove the widget's markup from the document.
    pub fn destroy(&mut self, doc: &mut Document) -> Result<()> {
        if doc.contains(self.root) {
            doc.remove(self.root)?;
        }
        self.appended = false;
        self.listener = None;
        Ok(())
    }
}

/// Create a `tag.class` element under `parent` holding `text`.
pub(crate) fn append_text_element(
    doc: &mut Document,
    parent: NodeId,
    tag: &str,
    class: &str,
    text: &str,
) -> Result<NodeId> {
    let node = doc.create_element(tag);
    doc.add_class(node, class)?;
    doc.set_text(node, text)?;
    doc.append_child(parent, node)?;
    Ok(node)
}

/// Add every whitespace-separated class of `class_name` to `node`.
pub(crate) fn add_classes(doc: &mut Document, node: NodeId, class_name: &str) -> Result<()> {
    for class in class_name.split_whitespace() {
        doc.add_class(node, class)?;
    }
    Ok(())
}

/// Check a widget id and the separator used in its cell identifiers.
pub(crate) fn validate_id(id: &str, separator: &str) -> Result<()> {
    if id.is_empty() {
        return Err(WidgetError::invalid_option("id", "must not be empty"));
    }
    if separator.is_empty() {
        return Err(WidgetError::invalid_option("separator", "must not be empty"));
    }
    if id.contains(separator) {
        return Err(WidgetError::invalid_option(
            "separator",
            format!("`{separator}` occurs in id `{id}`"),
        ));
    }
    Ok(())
}

/// `freeText` accepts a flag or a placeholder string.
pub(crate) fn deserialize_free_text<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FreeText {
        Flag(bool),
        Placeholder(String),
    }

    Ok(match Option::<FreeText>::deserialize(deserializer)? {
        None | Some(FreeText::Flag(false)) => None,
        Some(FreeText::Flag(true)) => Some(String::new()),
        Some(FreeText::Placeholder(text)) => Some(text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Document, WidgetBase, NodeId) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let error = doc.create_element("span");
        doc.append_child(root, error).unwrap();
        let base = WidgetBase::new("w", root).with_error_box(error);
        (doc, base, root)
    }

    #[test]
    fn test_append_once() {
        let (mut doc, mut base, root) = setup();
        let body = doc.body();
        base.append(&mut doc, body).unwrap();
        assert!(doc.is_connected(root));
        assert!(matches!(
            base.append(&mut doc, body),
            Err(WidgetError::AlreadyAppended(id)) if id == "w"
        ));
    }

    #[test]
    fn test_highlight_is_idempotent() {
        let (mut doc, mut base, root) = setup();
        assert!(!base.unhighlight(&mut doc).unwrap());
        assert!(base.highlight(&mut doc, None).unwrap());
        assert!(!base.highlight(&mut doc, None).unwrap());
        assert_eq!(doc.style(root, "border"), Some(DEFAULT_HIGHLIGHT_BORDER));
        assert!(base.unhighlight(&mut doc).unwrap());
        assert!(!base.unhighlight(&mut doc).unwrap());
        assert_eq!(doc.style(root, "border"), None);
        assert!(!doc.has_class(root, HIGHLIGHTED_CLASS));
    }

    #[test]
    fn test_set_error_toggles_highlight() {
        let (mut doc, mut base, _) = setup();
        base.set_error(&mut doc, Some("Missing")).unwrap();
        assert!(base.is_highlighted());
        assert_eq!(base.error_text(&doc), "Missing");

        base.set_error(&mut doc, None).unwrap();
        assert!(!base.is_highlighted());
        assert_eq!(base.error_text(&doc), "");

        base.set_error(&mut doc, Some("")).unwrap();
        assert!(!base.is_highlighted());
    }

    #[test]
    fn test_enable_disable() {
        let (mut doc, mut base, root) = setup();
        let table = doc.create_element("table");
        doc.append_child(root, table).unwrap();
        base.attach_listener(&mut doc, table).unwrap();
        assert!(base.listens_on(table));

        assert!(!base.enable(&mut doc).unwrap());
        assert!(base.disable(&mut doc).unwrap());
        assert!(!base.disable(&mut doc).unwrap());
        assert!(!doc.has_listener(table, EventKind::Click));
        assert!(!base.listens_on(table));
        assert!(doc.has_class(root, DISABLED_CLASS));

        assert!(base.enable(&mut doc).unwrap());
        assert!(doc.has_listener(table, EventKind::Click));
        assert!(!doc.has_class(root, DISABLED_CLASS));
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("q1", "::").is_ok());
        assert!(validate_id("", "::").is_err());
        assert!(validate_id("q1", "").is_err());
        let err = validate_id("a::b", "::").unwrap_err();
        assert!(matches!(err, WidgetError::InvalidOption { option, .. } if option == "separator"));
    }

    #[test]
    fn test_orientation_from_json() {
        let o: Orientation = serde_json::from_str("\"V\"").unwrap();
        assert_eq!(o, Orientation::Vertical);
        let o: Orientation = serde_json::from_str("\"h\"").unwrap();
        assert_eq!(o, Orientation::Horizontal);
        assert!(serde_json::from_str::<Orientation>("\"X\"").is_err());
    }
}
