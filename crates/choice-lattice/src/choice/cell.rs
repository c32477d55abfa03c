//! Rendered cells and reverse lookup from click targets.
//!
//! Every rendered choice owns a cell element. Cells get a human-readable
//! identifier (`<containerId><separator><value>`), but clicks are resolved
//! through [`CellMap`], an explicit map from node handle to the logical
//! `(item, choice)` pair. Identifiers are never parsed.

use std::collections::HashMap;
use std::sync::Arc;

use choice_lattice_core::{Document, NodeId};

use super::value::{Choice, ChoiceValue};
use crate::error::{Result, WidgetError};

/// Logical identity of a rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    /// Id of the item (or standalone table) owning the cell.
    pub item: String,
    /// Value of the choice rendered in the cell.
    pub value: ChoiceValue,
}

impl CellKey {
    /// Create a cell key.
    pub fn new(item: impl Into<String>, value: ChoiceValue) -> Self {
        Self {
            item: item.into(),
            value,
        }
    }
}

/// Custom formatting of a choice inside its cell.
///
/// The renderer receives an empty cell element and fills it. It may assign
/// the cell an `id`; when it does not, the widget assigns the default
/// `<containerId><separator><value>` identifier.
pub trait ChoiceRenderer: Send + Sync {
    /// Fill `cell` with the representation of `choice`, which sits at
    /// `index` in the original choice sequence.
    fn render(&self, doc: &mut Document, cell: NodeId, choice: &Choice, index: usize)
        -> Result<()>;
}

impl<F> ChoiceRenderer for F
where
    F: Fn(&mut Document, NodeId, &Choice, usize) -> Result<()> + Send + Sync,
{
    fn render(
        &self,
        doc: &mut Document,
        cell: NodeId,
        choice: &Choice,
        index: usize,
    ) -> Result<()> {
        self(doc, cell, choice, index)
    }
}

/// Shared handle to a renderer, as stored in widget options.
pub type SharedRenderer = Arc<dyn ChoiceRenderer>;

/// Fill `cell` with `choice`, delegating to `renderer` when one is given.
///
/// Text, numbers and pairs become the cell text. Node choices are moved
/// into the cell; a node that no longer exists is a configuration error.
pub fn render_choice(
    doc: &mut Document,
    cell: NodeId,
    choice: &Choice,
    index: usize,
    renderer: Option<&dyn ChoiceRenderer>,
) -> Result<()> {
    if let Some(renderer) = renderer {
        return renderer.render(doc, cell, choice, index);
    }
    match choice {
        Choice::Node(node) => {
            if !doc.contains(*node) {
                return Err(WidgetError::invalid_choice(index, "node no longer exists"));
            }
            doc.append_child(cell, *node)?;
        }
        other => {
            let label = other.label().unwrap_or_default();
            doc.set_text(cell, label)?;
        }
    }
    Ok(())
}

/// Default cell identifier.
pub fn cell_identifier(container_id: &str, separator: &str, value: &ChoiceValue) -> String {
    format!("{container_id}{separator}{value}")
}

/// Bidirectional map between cell nodes and their logical identity.
#[derive(Debug, Clone, Default)]
pub struct CellMap {
    by_node: HashMap<NodeId, CellKey>,
    by_key: HashMap<CellKey, NodeId>,
    identifiers: HashMap<String, NodeId>,
}

impl CellMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cell.
    ///
    /// Fails if the identifier or the key is already taken.
    pub fn insert(&mut self, node: NodeId, key: CellKey, identifier: &str) -> Result<()> {
        if self.identifiers.contains_key(identifier) || self.by_key.contains_key(&key) {
            return Err(WidgetError::DuplicateCellId(identifier.to_string()));
        }
        self.identifiers.insert(identifier.to_string(), node);
        self.by_key.insert(key.clone(), node);
        self.by_node.insert(node, key);
        Ok(())
    }

    /// Logical identity of a cell node.
    pub fn resolve(&self, node: NodeId) -> Option<&CellKey> {
        self.by_node.get(&node)
    }

    /// Cell node of a logical identity.
    pub fn node(&self, key: &CellKey) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    /// Cell node by identifier.
    pub fn node_by_identifier(&self, identifier: &str) -> Option<NodeId> {
        self.identifiers.get(identifier).copied()
    }

    /// Identifiers of the registered cells.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.identifiers.keys().map(String::as_str)
    }

    /// Number of registered cells.
    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    /// Whether no cell is registered.
    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    /// Forget every cell.
    pub fn clear(&mut self) {
        self.by_node.clear();
        self.by_key.clear();
        self.identifiers.clear();
    }

    /// All registered cells.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CellKey)> {
        self.by_node.iter().map(|(&node, key)| (node, key))
    }
}

/// Resolve a click target with `lookup`, retrying once on its parent.
///
/// Clicks on decorations nested inside a cell land on a child of the cell.
/// Anything that does not resolve after one step up is not a cell.
pub fn resolve_target<T>(
    doc: &Document,
    target: NodeId,
    lookup: impl Fn(NodeId) -> Option<T>,
) -> Option<T> {
    lookup(target).or_else(|| doc.parent(target).and_then(&lookup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_and_numbers() {
        let mut doc = Document::new();
        let cell = doc.create_element("td");
        render_choice(&mut doc, cell, &Choice::from("Yes"), 0, None).unwrap();
        assert_eq!(doc.text_content(cell), "Yes");

        let cell = doc.create_element("td");
        render_choice(&mut doc, cell, &Choice::from(4), 1, None).unwrap();
        assert_eq!(doc.text_content(cell), "4");
    }

    #[test]
    fn test_render_node_choice() {
        let mut doc = Document::new();
        let img = doc.create_element("img");
        let cell = doc.create_element("td");
        render_choice(&mut doc, cell, &Choice::Node(img), 0, None).unwrap();
        assert_eq!(doc.children(cell), &[img]);

        doc.remove(img).unwrap();
        let cell = doc.create_element("td");
        let err = render_choice(&mut doc, cell, &Choice::Node(img), 3, None).unwrap_err();
        assert!(matches!(err, WidgetError::InvalidChoice { index: 3, .. }));
    }

    #[test]
    fn test_custom_renderer() {
        let mut doc = Document::new();
        let cell = doc.create_element("td");
        let renderer = |doc: &mut Document, cell: NodeId, choice: &Choice, index: usize| -> Result<()> {
            doc.set_text(cell, format!("{}: {}", index + 1, choice.label().unwrap_or_default()))?;
            Ok(())
        };
        render_choice(&mut doc, cell, &Choice::from("Blue"), 1, Some(&renderer)).unwrap();
        assert_eq!(doc.text_content(cell), "2: Blue");
    }

    #[test]
    fn test_cell_map_round_trip() {
        let mut doc = Document::new();
        let mut map = CellMap::new();
        let a = doc.create_element("td");
        let b = doc.create_element("td");
        let key_a = CellKey::new("q", ChoiceValue::Index(0));
        let key_b = CellKey::new("q", ChoiceValue::from("x"));

        map.insert(a, key_a.clone(), "q::0").unwrap();
        map.insert(b, key_b.clone(), "q::x").unwrap();

        assert_eq!(map.resolve(a), Some(&key_a));
        assert_eq!(map.node(&key_b), Some(b));
        assert_eq!(map.node_by_identifier("q::0"), Some(a));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_cell_map_rejects_duplicates() {
        let mut doc = Document::new();
        let mut map = CellMap::new();
        let a = doc.create_element("td");
        let b = doc.create_element("td");
        map.insert(a, CellKey::new("q", ChoiceValue::Index(0)), "q::0").unwrap();

        let err = map
            .insert(b, CellKey::new("q", ChoiceValue::Index(1)), "q::0")
            .unwrap_err();
        assert!(matches!(err, WidgetError::DuplicateCellId(id) if id == "q::0"));
    }

    #[test]
    fn test_resolve_target_walks_up_once() {
        let mut doc = Document::new();
        let mut map = CellMap::new();
        let cell = doc.create_element("td");
        let span = doc.create_element("span");
        let em = doc.create_element("em");
        doc.append_child(cell, span).unwrap();
        doc.append_child(span, em).unwrap();
        map.insert(cell, CellKey::new("q", ChoiceValue::Index(0)), "q::0").unwrap();

        let lookup = |node| map.resolve(node).cloned();
        assert!(resolve_target(&doc, cell, lookup).is_some());
        assert!(resolve_target(&doc, span, lookup).is_some());
        assert!(resolve_target(&doc, em, lookup).is_none());
    }
}
