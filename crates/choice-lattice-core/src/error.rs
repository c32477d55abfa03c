//! Error types for Choice Lattice core.

/// Result type alias for document operations.
pub type DomResult<T> = std::result::Result<T, DomError>;

/// Errors that can occur while manipulating a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The node ID is invalid or the node has been removed.
    #[error("Invalid or removed node ID")]
    InvalidNode,

    /// The operation requires an element but the node is a text node.
    #[error("Node is not an element")]
    NotAnElement,

    /// Attempted to append a node to itself or to one of its descendants.
    #[error("Cannot append a node to itself or one of its descendants")]
    CircularParentage,
}
