//! Headless document model.
//!
//! Widgets never touch a real browser. They build their markup inside a
//! [`Document`], an arena of element and text nodes addressed by [`NodeId`].
//! The document supports the handful of operations the widgets need:
//!
//! - Element and text creation, parent-child ownership, subtree removal
//! - Attributes (including `id`), CSS classes and inline styles
//! - Text content
//! - Per-node event listener registration and ancestor lookup for dispatch
//!
//! Node handles are stable until the node is removed. Removing a node removes
//! its whole subtree.
//!
//! # Example
//!
//! ```
//! use choice_lattice_core::{Document, EventKind};
//!
//! let mut doc = Document::new();
//! let table = doc.create_element("table");
//! let cell = doc.create_element("td");
//! doc.append_child(doc.body(), table).unwrap();
//! doc.append_child(table, cell).unwrap();
//! doc.set_text(cell, "Yes").unwrap();
//!
//! doc.add_listener(table, EventKind::Click).unwrap();
//! assert_eq!(doc.listening_ancestor(cell, EventKind::Click), Some(table));
//! assert_eq!(doc.text_content(table), "Yes");
//! ```

use std::collections::{BTreeMap, HashSet};

use slotmap::{new_key_type, SlotMap};

use crate::error::{DomError, DomResult};
use crate::logging::targets;

new_key_type! {
    /// A stable handle to a node in a [`Document`].
    ///
    /// The handle becomes invalid once the node (or one of its ancestors)
    /// is removed with [`Document::remove`].
    pub struct NodeId;
}

/// Kinds of events a node can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer click.
    Click,
}

/// Element-specific node data.
#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    listeners: HashSet<EventKind>,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn element(&self) -> DomResult<&ElementData> {
        match &self.kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }

    fn element_mut(&mut self) -> DomResult<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }
}

/// An arena-backed tree of element and text nodes.
///
/// Every document owns a `body` element that acts as the root for
/// [`get_element_by_id`](Self::get_element_by_id) and
/// [`is_connected`](Self::is_connected).
#[derive(Debug, Clone)]
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only its `body` element.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(NodeData {
            kind: NodeKind::Element(ElementData {
                tag: "body".to_string(),
                ..Default::default()
            }),
            parent: None,
            children: Vec::new(),
        });
        Self { nodes, body }
    }

    /// The root `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of live nodes, including `body`.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether a node handle is still valid.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    // =========================================================================
    // Creation & Tree Structure
    // =========================================================================

    /// Create a detached element with the given tag name.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(NodeData {
            kind: NodeKind::Element(ElementData {
                tag: tag.to_ascii_lowercase(),
                ..Default::default()
            }),
            parent: None,
            children: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(NodeData {
            kind: NodeKind::Text(text.into()),
            parent: None,
            children: Vec::new(),
        })
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is moved.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(child)?;
        self.node(parent)?.element()?;

        // Reject cycles: parent must not be child or one of its descendants.
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(DomError::CircularParentage);
            }
            cursor = self.nodes[id].parent;
        }

        self.detach(child)?;
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Detach a node from its parent without removing it.
    pub fn detach(&mut self, node: NodeId) -> DomResult<()> {
        let parent = self.node(node)?.parent;
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|&c| c != node);
            }
            self.nodes[node].parent = None;
        }
        Ok(())
    }

    /// Remove a node and its whole subtree from the document.
    ///
    /// The `body` element cannot be removed; removing it only clears it.
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        if node == self.body {
            return self.clear_children(node);
        }
        self.detach(node)?;
        let mut stack = vec![node];
        let mut removed = 0usize;
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(id) {
                stack.extend(data.children);
                removed += 1;
            }
        }
        tracing::trace!(target: targets::DOCUMENT, removed, "removed subtree");
        Ok(())
    }

    /// Remove all children of a node.
    pub fn clear_children(&mut self, node: NodeId) -> DomResult<()> {
        let children = self.node(node)?.children.clone();
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    /// Parent of a node, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// Children of a node in document order.
    ///
    /// Returns an empty slice for invalid handles.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the node is attached (directly or indirectly) to `body`.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == self.body {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    /// Tag name of an element, or `None` for text nodes and invalid handles.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node)?.kind {
            NodeKind::Element(el) => Some(el.tag.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Whether the node is a text node.
    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(node).map(|n| &n.kind),
            Some(NodeKind::Text(_))
        )
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Set an attribute on an element.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> DomResult<()> {
        self.node_mut(node)?
            .element_mut()?
            .attributes
            .insert(name.to_string(), value.into());
        Ok(())
    }

    /// Read an attribute from an element.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node)?
            .element()
            .ok()?
            .attributes
            .get(name)
            .map(String::as_str)
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<bool> {
        Ok(self
            .node_mut(node)?
            .element_mut()?
            .attributes
            .remove(name)
            .is_some())
    }

    /// Set the `id` attribute.
    pub fn set_id(&mut self, node: NodeId, id: impl Into<String>) -> DomResult<()> {
        self.set_attribute(node, "id", id)
    }

    /// The `id` attribute, if any.
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "id")
    }

    /// Find the first connected element with the given `id`, depth first.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack = vec![self.body];
        while let Some(node) = stack.pop() {
            if self.id(node) == Some(id) {
                return Some(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        None
    }

    /// Set the `value` attribute (used by text areas).
    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) -> DomResult<()> {
        self.set_attribute(node, "value", value)
    }

    /// The `value` attribute, or an empty string.
    pub fn value(&self, node: NodeId) -> &str {
        self.attribute(node, "value").unwrap_or("")
    }

    // =========================================================================
    // Classes & Style
    // =========================================================================

    /// Add a CSS class. Returns `true` if the class was not already present.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<bool> {
        let el = self.node_mut(node)?.element_mut()?;
        if el.classes.iter().any(|c| c == class) {
            return Ok(false);
        }
        el.classes.push(class.to_string());
        Ok(true)
    }

    /// Remove a CSS class. Returns `true` if the class was present.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<bool> {
        let el = self.node_mut(node)?.element_mut()?;
        let before = el.classes.len();
        el.classes.retain(|c| c != class);
        Ok(el.classes.len() != before)
    }

    /// Whether an element carries a CSS class.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node)
            .and_then(|n| n.element().ok())
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    /// All CSS classes of an element, in insertion order.
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.nodes
            .get(node)
            .and_then(|n| n.element().ok())
            .map(|el| el.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Set an inline style property.
    pub fn set_style(
        &mut self,
        node: NodeId,
        property: &str,
        value: impl Into<String>,
    ) -> DomResult<()> {
        self.node_mut(node)?
            .element_mut()?
            .style
            .insert(property.to_string(), value.into());
        Ok(())
    }

    /// Remove an inline style property. Returns whether it was set.
    pub fn remove_style(&mut self, node: NodeId, property: &str) -> DomResult<bool> {
        Ok(self
            .node_mut(node)?
            .element_mut()?
            .style
            .remove(property)
            .is_some())
    }

    /// Read an inline style property.
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(node)?
            .element()
            .ok()?
            .style
            .get(property)
            .map(String::as_str)
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Replace the children of an element with a single text node.
    ///
    /// An empty string leaves the element without children.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> DomResult<()> {
        self.node(node)?.element()?;
        self.clear_children(node)?;
        let text = text.into();
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node)?;
        }
        Ok(())
    }

    /// Concatenated text of a node and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for &child in &data.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register interest in an event kind on an element.
    ///
    /// Returns `false` if the listener was already registered.
    pub fn add_listener(&mut self, node: NodeId, kind: EventKind) -> DomResult<bool> {
        Ok(self.node_mut(node)?.element_mut()?.listeners.insert(kind))
    }

    /// Remove interest in an event kind.
    ///
    /// Returns `false` if no listener was registered.
    pub fn remove_listener(&mut self, node: NodeId, kind: EventKind) -> DomResult<bool> {
        Ok(self.node_mut(node)?.element_mut()?.listeners.remove(&kind))
    }

    /// Whether an element listens for an event kind.
    pub fn has_listener(&self, node: NodeId, kind: EventKind) -> bool {
        self.nodes
            .get(node)
            .and_then(|n| n.element().ok())
            .is_some_and(|el| el.listeners.contains(&kind))
    }

    /// The nearest node, starting at `target` itself, that listens for `kind`.
    ///
    /// This is the bubbling path of an event dispatched at `target`.
    pub fn listening_ancestor(&self, target: NodeId, kind: EventKind) -> Option<NodeId> {
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            if self.has_listener(id, kind) {
                return Some(id);
            }
            cursor = self.parent(id);
        }
        None
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn node(&self, node: NodeId) -> DomResult<&NodeData> {
        self.nodes.get(node).ok_or(DomError::InvalidNode)
    }

    fn node_mut(&mut self, node: NodeId) -> DomResult<&mut NodeData> {
        self.nodes.get_mut(node).ok_or(DomError::InvalidNode)
    }
}

static_assertions::assert_impl_all!(Document: Send, Sync);
