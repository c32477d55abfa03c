//! Core systems for Choice Lattice.
//!
//! This crate provides the foundations the response widgets are built on:
//!
//! - **Document**: a headless element tree with classes, styles and
//!   listener registration, standing in for the browser DOM
//! - **Signal/Slot System**: synchronous change notification
//! - **Clock**: injectable "milliseconds since step start" time source
//! - **Logging**: `tracing` targets and a document tree dumper
//!
//! # Example
//!
//! ```
//! use choice_lattice_core::{Document, Signal};
//!
//! let mut doc = Document::new();
//! let cell = doc.create_element("td");
//! doc.append_child(doc.body(), cell).unwrap();
//!
//! let clicked = Signal::<usize>::new();
//! clicked.connect(|index| println!("clicked choice {index}"));
//! clicked.emit(0);
//! ```

pub mod clock;
pub mod dom;
mod error;
pub mod logging;
pub mod signal;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dom::{Document, EventKind, NodeId};
pub use error::{DomError, DomResult};
pub use logging::{DocumentTreeDebug, TreeStyle};
pub use signal::{ConnectionId, Signal};
