//! Response widgets.
//!
//! - [`ChoiceTable`]: one question, a row (or column) of clickable choices
//! - [`ChoiceTableGroup`]: several questions sharing one table

mod choice_table;
mod choice_table_group;

pub use choice_table::{
    ChoiceTable, ChoiceTableOptions, ClickCallback, CHOICE_TABLE, SELECTED_CLASS,
};
pub use choice_table_group::{
    ChoiceTableGroup, ChoiceTableGroupOptions, GroupItemOptions, CHOICE_TABLE_GROUP,
};
