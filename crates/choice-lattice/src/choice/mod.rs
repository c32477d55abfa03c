//! Choice identity, display order and rendered cells.
//!
//! - [`Choice`] / [`ChoiceValue`]: what is shown and how it is identified
//! - [`Order`]: display permutation over the original sequence
//! - [`CellMap`]: explicit node-to-choice lookup for click resolution
//! - [`ChoiceRenderer`]: custom cell formatting

mod cell;
mod order;
mod value;

pub use cell::{
    cell_identifier, render_choice, resolve_target, CellKey, CellMap, ChoiceRenderer,
    SharedRenderer,
};
pub use order::Order;
pub use value::{Choice, ChoiceValue};
