//! Choice Lattice - choice tables for online experiments.
//!
//! Participants answer by clicking cells of a table. This crate builds the
//! tables in a headless [`Document`](choice_lattice_core::Document), maps
//! clicks back to choices, tracks the selection and validates it on read.
//!
//! # Example
//!
//! ```no_run
//! use choice_lattice::prelude::*;
//!
//! fn main() -> choice_lattice::Result<()> {
//!     let mut page = Page::new();
//!     let body = page.body();
//!     let id = page.add(body, |ctx| {
//!         let options = ChoiceTableOptions::new("color", ["Red", "Green", "Blue"])
//!             .with_required_choice(true);
//!         ChoiceTable::new(options, ctx)
//!     })?;
//!
//!     let values = page.get_values(id, &GetValuesOptions::default())?;
//!     println!("{}", values.to_json());
//!     Ok(())
//! }
//! ```

pub use choice_lattice_core::*;

pub mod choice;
mod error;
pub mod prelude;
pub mod selection;
pub mod validation;
pub mod widget;

pub use error::{Result, WidgetError};
