//! Logging and debugging facilities for Choice Lattice.
//!
//! This module provides:
//! - Target names for filtering the `tracing` output of each subsystem
//! - [`DocumentTreeDebug`], a textual outline of a [`Document`] subtree
//!
//! # Tracing Integration
//!
//! Choice Lattice uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("choice_lattice::choice_table=debug")
//!     .init();
//! ```

use std::fmt::Write as FmtWrite;

use crate::dom::{Document, NodeId};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Document model target.
    pub const DOCUMENT: &str = "choice_lattice_core::document";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "choice_lattice_core::signal";
    /// Single choice table target.
    pub const CHOICE_TABLE: &str = "choice_lattice::choice_table";
    /// Choice table group target.
    pub const GROUP: &str = "choice_lattice::choice_table_group";
    /// Widget registry target.
    pub const REGISTRY: &str = "choice_lattice::registry";
    /// Page host target.
    pub const PAGE: &str = "choice_lattice::page";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Debug utility rendering a document subtree as an indented outline.
///
/// Elements are written as `tag#id.class1.class2`, text nodes as quoted
/// strings. Listener registrations are shown as `[click]`.
#[derive(Debug, Clone, Default)]
pub struct DocumentTreeDebug {
    style: TreeStyle,
    max_depth: Option<usize>,
}

impl DocumentTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given branch style.
    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// Stop descending below `depth`.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, doc: &Document, root: NodeId) -> String {
        let mut output = String::new();
        self.format_into(doc, root, 0, &mut Vec::new(), &mut output);
        output
    }

    fn format_into(
        &self,
        doc: &Document,
        node: NodeId,
        depth: usize,
        last_flags: &mut Vec<bool>,
        output: &mut String,
    ) {
        if self.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        let (branch, tee, corner) = match self.style {
            TreeStyle::Ascii => ("|  ", "+- ", "`- "),
            TreeStyle::Unicode => ("\u{2502}  ", "\u{251c}\u{2500} ", "\u{2514}\u{2500} "),
        };
        for (i, &last) in last_flags.iter().enumerate() {
            if i + 1 == last_flags.len() {
                output.push_str(if last { corner } else { tee });
            } else {
                output.push_str(if last { "   " } else { branch });
            }
        }

        if doc.is_text(node) {
            let _ = writeln!(output, "{:?}", doc.text_content(node));
            return;
        }

        output.push_str(doc.tag(node).unwrap_or("?"));
        if let Some(id) = doc.id(node) {
            let _ = write!(output, "#{id}");
        }
        for class in doc.classes(node) {
            let _ = write!(output, ".{class}");
        }
        if doc.has_listener(node, crate::dom::EventKind::Click) {
            output.push_str(" [click]");
        }
        output.push('\n');

        let children = doc.children(node);
        let count = children.len();
        for (i, &child) in children.iter().enumerate() {
            last_flags.push(i + 1 == count);
            self.format_into(doc, child, depth + 1, last_flags, output);
            last_flags.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::EventKind;

    #[test]
    fn test_format_subtree() {
        let mut doc = Document::new();
        let table = doc.create_element("table");
        doc.set_id(table, "q1").unwrap();
        doc.add_listener(table, EventKind::Click).unwrap();
        let td = doc.create_element("td");
        doc.add_class(td, "choicetable-maintext").unwrap();
        doc.append_child(table, td).unwrap();
        doc.set_text(td, "Pick one").unwrap();

        let out = DocumentTreeDebug::new()
            .with_style(TreeStyle::Ascii)
            .format_subtree(&doc, table);
        assert_eq!(
            out,
            "table#q1 [click]\n`- td.choicetable-maintext\n   `- \"Pick one\"\n"
        );
    }

    #[test]
    fn test_max_depth() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("span");
        doc.append_child(a, b).unwrap();
        doc.set_text(b, "deep").unwrap();

        let out = DocumentTreeDebug::new().with_max_depth(1).format_subtree(&doc, a);
        assert!(!out.contains("deep"));
    }
}
