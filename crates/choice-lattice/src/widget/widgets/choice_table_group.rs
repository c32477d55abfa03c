//! Choice table group widget.
//!
//! A group stacks several [`ChoiceTable`] items (one question per row) in a
//! single table. Items share the group's defaults (choices, orientation,
//! selection mode) unless they override them. One click listener on the
//! group table serves every item.
//!
//! Items are full choice tables with their own order, selection and
//! required rule. Unlike a standalone table, clicking the selected cell of
//! an item deselects it.

use std::any::Any;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use choice_lattice_core::logging::targets;
use choice_lattice_core::{Document, NodeId, Signal};
use serde::Deserialize;

use super::choice_table::{ChoiceTable, ChoiceTableOptions, ClickCallback};
use crate::choice::{resolve_target, Choice, ChoiceValue, Order, SharedRenderer};
use crate::error::{Result, WidgetError};
use crate::selection::{ChoiceChanged, CurrentChoice, SelectMode, Transition};
use crate::validation::{
    GetValuesOptions, GroupValues, RequiredChoice, ResetOptions, SetValuesOptions, WidgetValues,
    MISSING_ITEMS_MESSAGE,
};
use crate::widget::base::{
    add_classes, append_text_element, deserialize_free_text, validate_id, Orientation, WidgetBase,
};
use crate::widget::{Widget, WidgetContext};

/// Registry name of [`ChoiceTableGroup`].
pub const CHOICE_TABLE_GROUP: &str = "ChoiceTableGroup";

/// One row of a group. Unset fields fall back to the group's value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupItemOptions {
    /// Item id, unique in the group.
    pub id: String,
    /// Question text, shown in the first cell of the row.
    pub main_text: Option<String>,
    /// Choices of this item.
    pub choices: Option<Vec<Choice>>,
    /// Extra cell before the choices.
    pub left_cell: Option<String>,
    /// Extra cell after the choices.
    pub right_cell: Option<String>,
    /// Required-choice rule.
    pub required_choice: Option<RequiredChoice>,
    /// Expected answer.
    pub correct_choice: Option<CurrentChoice>,
    /// Selection mode.
    pub select_multiple: Option<SelectMode>,
    /// Shuffle this item's choices.
    pub shuffle_choices: Option<bool>,
    /// Render only the first N choices.
    pub choices_set_size: Option<usize>,
}

impl GroupItemOptions {
    /// An item `id` asking `main_text`.
    pub fn new(id: impl Into<String>, main_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            main_text: Some(main_text.into()),
            ..Default::default()
        }
    }

    /// Use `choices` instead of the group's.
    pub fn with_choices<C>(mut self, choices: impl IntoIterator<Item = C>) -> Self
    where
        C: Into<Choice>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Set the required-choice rule.
    pub fn with_required_choice(mut self, required: impl Into<RequiredChoice>) -> Self {
        self.required_choice = Some(required.into());
        self
    }

    /// Set the expected answer.
    pub fn with_correct_choice(mut self, correct: CurrentChoice) -> Self {
        self.correct_choice = Some(correct);
        self
    }

    /// Set the selection mode.
    pub fn with_select_multiple(mut self, mode: SelectMode) -> Self {
        self.select_multiple = Some(mode);
        self
    }
}

/// Configuration of a [`ChoiceTableGroup`].
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceTableGroupOptions {
    /// Group id.
    pub id: String,
    /// Extra CSS classes on the root.
    pub class_name: Option<String>,
    /// Rows of the group.
    pub items: Vec<GroupItemOptions>,
    /// Choices shared by items that do not set their own.
    pub choices: Vec<Choice>,
    /// Orientation of every item.
    pub orientation: Orientation,
    /// Default selection mode.
    pub select_multiple: SelectMode,
    /// Shuffle the order of the items.
    pub shuffle_items: bool,
    /// Default for shuffling each item's choices.
    pub shuffle_choices: bool,
    /// Default required-choice rule.
    pub required_choice: RequiredChoice,
    /// Joins item id and choice value in cell identifiers.
    pub separator: String,
    /// Text above the table.
    pub main_text: Option<String>,
    /// Hint below the text.
    pub hint: Option<String>,
    /// Default extra cell before each item's choices.
    pub left_cell: Option<String>,
    /// Default extra cell after each item's choices.
    pub right_cell: Option<String>,
    /// Default number of rendered choices per item.
    pub choices_set_size: Option<usize>,
    /// Show a text area; the string is its placeholder.
    #[serde(deserialize_with = "deserialize_free_text")]
    pub free_text: Option<String>,
    /// Make cells tabbable.
    pub tabbable: bool,
    /// Name of the page group.
    pub group: Option<String>,
    /// Position inside `group`.
    pub group_order: Option<usize>,
    /// Cell renderer shared by all items.
    #[serde(skip)]
    pub renderer: Option<SharedRenderer>,
    /// Called on every selection change of any item.
    #[serde(skip)]
    pub on_click: Option<ClickCallback>,
}

impl Default for ChoiceTableGroupOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            class_name: None,
            items: Vec::new(),
            choices: Vec::new(),
            orientation: Orientation::default(),
            select_multiple: SelectMode::Single,
            shuffle_items: false,
            shuffle_choices: false,
            required_choice: RequiredChoice::NotRequired,
            separator: "::".to_string(),
            main_text: None,
            hint: None,
            left_cell: None,
            right_cell: None,
            choices_set_size: None,
            free_text: None,
            tabbable: false,
            group: None,
            group_order: None,
            renderer: None,
            on_click: None,
        }
    }
}

impl fmt::Debug for ChoiceTableGroupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceTableGroupOptions")
            .field("id", &self.id)
            .field("items", &self.items)
            .field("choices", &self.choices)
            .field("shuffle_items", &self.shuffle_items)
            .field("select_multiple", &self.select_multiple)
            .field("required_choice", &self.required_choice)
            .field("renderer", &self.renderer.is_some())
            .finish_non_exhaustive()
    }
}

impl ChoiceTableGroupOptions {
    /// A group `id` of `items` sharing `choices`.
    pub fn new<C>(
        id: impl Into<String>,
        items: impl IntoIterator<Item = GroupItemOptions>,
        choices: impl IntoIterator<Item = C>,
    ) -> Self
    where
        C: Into<Choice>,
    {
        Self {
            id: id.into(),
            items: items.into_iter().collect(),
            choices: choices.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Parse options from JSON.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Shuffle the items.
    pub fn with_shuffle_items(mut self, shuffle: bool) -> Self {
        self.shuffle_items = shuffle;
        self
    }

    /// Shuffle the choices of every item.
    pub fn with_shuffle_choices(mut self, shuffle: bool) -> Self {
        self.shuffle_choices = shuffle;
        self
    }

    /// Default selection mode.
    pub fn with_select_multiple(mut self, mode: SelectMode) -> Self {
        self.select_multiple = mode;
        self
    }

    /// Default required-choice rule.
    pub fn with_required_choice(mut self, required: impl Into<RequiredChoice>) -> Self {
        self.required_choice = required.into();
        self
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the identifier separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the text above the table.
    pub fn with_main_text(mut self, text: impl Into<String>) -> Self {
        self.main_text = Some(text.into());
        self
    }

    /// Add a free-text area with `placeholder`.
    pub fn with_free_text(mut self, placeholder: impl Into<String>) -> Self {
        self.free_text = Some(placeholder.into());
        self
    }

    /// Set the cell renderer.
    pub fn with_renderer(mut self, renderer: SharedRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Call `callback` on every selection change.
    pub fn with_on_click<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ChoiceChanged) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(callback));
        self
    }

    /// Check the group-level options. Items are checked when built.
    pub fn validate(&self) -> Result<()> {
        validate_id(&self.id, &self.separator)?;
        if self.items.is_empty() {
            return Err(WidgetError::invalid_option("items", "at least one item is required"));
        }
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.id == self.id {
                return Err(WidgetError::invalid_option(
                    "items",
                    format!("item id `{}` equals the group id", item.id),
                ));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(WidgetError::invalid_option(
                    "items",
                    format!("duplicate item id `{}`", item.id),
                ));
            }
        }

        // A node can sit in one cell only.
        let inheriting = self.items.iter().filter(|item| item.choices.is_none()).count();
        if inheriting > 1 && self.choices.iter().any(|choice| matches!(choice, Choice::Node(_))) {
            return Err(WidgetError::invalid_option(
                "choices",
                format!("node choices cannot be shared by {inheriting} items"),
            ));
        }
        Ok(())
    }

    /// Options of one item, with group defaults filled in.
    pub fn item_options(&self, item: &GroupItemOptions) -> ChoiceTableOptions {
        ChoiceTableOptions {
            id: item.id.clone(),
            choices: item.choices.clone().unwrap_or_else(|| self.choices.clone()),
            orientation: self.orientation,
            select_multiple: item.select_multiple.unwrap_or(self.select_multiple),
            shuffle_choices: item.shuffle_choices.unwrap_or(self.shuffle_choices),
            required_choice: item.required_choice.unwrap_or(self.required_choice),
            correct_choice: item.correct_choice.clone(),
            separator: self.separator.clone(),
            main_text: item.main_text.clone(),
            left_cell: item.left_cell.clone().or_else(|| self.left_cell.clone()),
            right_cell: item.right_cell.clone().or_else(|| self.right_cell.clone()),
            choices_set_size: item.choices_set_size.or(self.choices_set_size),
            tabbable: self.tabbable,
            renderer: self.renderer.clone(),
            ..Default::default()
        }
    }
}

/// Reject identifiers shared by cells of different items.
fn check_cell_identifiers(items: &[ChoiceTable]) -> Result<()> {
    let mut seen = HashSet::new();
    for identifier in items.iter().flat_map(|item| item.cells().identifiers()) {
        if !seen.insert(identifier) {
            return Err(WidgetError::DuplicateCellId(identifier.to_string()));
        }
    }
    Ok(())
}

/// Several choice tables answered together.
///
/// # Signals
///
/// - `choice_changed`: re-emits the selection changes of every item
pub struct ChoiceTableGroup {
    base: WidgetBase,
    items: Vec<ChoiceTable>,
    items_map: BTreeMap<String, usize>,
    order: Order,
    shuffle_items: bool,
    table: NodeId,
    free_text: Option<NodeId>,
    group: Option<String>,
    group_order: Option<usize>,

    /// Signal emitted when a cell of any item is selected or deselected.
    pub choice_changed: Arc<Signal<ChoiceChanged>>,
}

impl fmt::Debug for ChoiceTableGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceTableGroup")
            .field("id", &self.base.id())
            .field("items", &self.items)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl ChoiceTableGroup {
    /// Build the group and its items. The markup is created detached.
    pub fn new(options: ChoiceTableGroupOptions, ctx: &mut WidgetContext<'_>) -> Result<Self> {
        options.validate()?;

        let choice_changed: Arc<Signal<ChoiceChanged>> = Arc::new(Signal::new());
        if let Some(callback) = &options.on_click {
            let callback = Arc::clone(callback);
            choice_changed.connect(move |event: &ChoiceChanged| callback(event));
        }

        let mut items = Vec::with_capacity(options.items.len());
        for item in &options.items {
            let table = ChoiceTable::new_item(options.item_options(item), ctx)?;
            let forward = Arc::clone(&choice_changed);
            table
                .choice_changed
                .connect(move |event: &ChoiceChanged| forward.emit(event.clone()));
            items.push(table);
        }
        if let Err(err) = check_cell_identifiers(&items) {
            for item in &items {
                ctx.doc.remove(item.body())?;
            }
            return Err(err);
        }
        let order = Order::new(items.len(), options.shuffle_items, &mut *ctx.rng);

        let doc = &mut *ctx.doc;
        let root = doc.create_element("div");
        doc.set_id(root, options.id.as_str())?;
        doc.add_class(root, "choicetable-group")?;
        if let Some(class_name) = &options.class_name {
            add_classes(doc, root, class_name)?;
        }
        if let Some(text) = &options.main_text {
            append_text_element(doc, root, "span", "choicetable-maintext", text)?;
        }
        if let Some(hint) = &options.hint {
            append_text_element(doc, root, "span", "choicetable-hint", hint)?;
        }
        let table = doc.create_element("table");
        doc.set_id(table, format!("{}_table", options.id))?;
        doc.add_class(table, "choicetable-group-table")?;
        doc.append_child(root, table)?;

        let free_text = match &options.free_text {
            Some(placeholder) => {
                let area = doc.create_element("textarea");
                doc.add_class(area, "choicetable-freetext")?;
                if !placeholder.is_empty() {
                    doc.set_attribute(area, "placeholder", placeholder.as_str())?;
                }
                doc.append_child(root, area)?;
                Some(area)
            }
            None => None,
        };
        let error = append_text_element(doc, root, "span", "choicetable-error", "")?;

        let mut group = Self {
            base: WidgetBase::new(options.id.as_str(), root).with_error_box(error),
            items,
            items_map: BTreeMap::new(),
            order,
            shuffle_items: options.shuffle_items,
            table,
            free_text,
            group: options.group,
            group_order: options.group_order,
            choice_changed,
        };
        group.layout_items(doc)?;

        tracing::debug!(
            target: targets::GROUP,
            id = %group.base.id(),
            items = group.items.len(),
            shuffled = group.shuffle_items,
            "choice table group built"
        );
        Ok(group)
    }

    /// Build a group from JSON options.
    pub fn from_json(value: serde_json::Value, ctx: &mut WidgetContext<'_>) -> Result<Self> {
        Self::new(ChoiceTableGroupOptions::from_json(value)?, ctx)
    }

    /// Put the item bodies in display order and refresh `items_map`.
    fn layout_items(&mut self, doc: &mut Document) -> Result<()> {
        self.items_map.clear();
        for (position, index) in self.order.iter().enumerate() {
            let item = &self.items[index];
            doc.append_child(self.table, item.body())?;
            self.items_map
                .insert(item.widget_base().id().to_string(), position);
        }
        Ok(())
    }

    fn index_of(&self, item: &str) -> Option<usize> {
        self.items_map
            .get(item)
            .and_then(|&position| self.order.get(position))
    }

    fn item_index(&self, item: &str) -> Result<usize> {
        self.index_of(item).ok_or_else(|| {
            WidgetError::invalid_option("items", format!("unknown item `{item}`"))
        })
    }

    /// Item and value of the cell `node`, if it is one.
    fn locate(&self, node: NodeId) -> Option<(usize, ChoiceValue)> {
        self.items.iter().enumerate().find_map(|(index, item)| {
            item.cells()
                .resolve(node)
                .map(|key| (index, key.value.clone()))
        })
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Items in their original order.
    pub fn items(&self) -> &[ChoiceTable] {
        &self.items
    }

    /// Item `id`.
    pub fn item(&self, id: &str) -> Option<&ChoiceTable> {
        self.index_of(id).map(|index| &self.items[index])
    }

    /// Mutable item `id`.
    pub fn item_mut(&mut self, id: &str) -> Option<&mut ChoiceTable> {
        let index = self.index_of(id)?;
        Some(&mut self.items[index])
    }

    /// Item displayed at `position`.
    pub fn item_at_position(&self, position: usize) -> Option<&ChoiceTable> {
        self.order.get(position).map(|index| &self.items[index])
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the group has no items. Never true for a built group.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display order of the items.
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Display position of every item, keyed by item id.
    pub fn items_map(&self) -> &BTreeMap<String, usize> {
        &self.items_map
    }

    /// Draw a new item order and move the rows.
    pub fn shuffle_items(&mut self, ctx: &mut WidgetContext<'_>) -> Result<()> {
        self.order = Order::shuffled(self.items.len(), &mut *ctx.rng);
        self.layout_items(ctx.doc)
    }

    /// Select `value` in `item` without counting a click.
    pub fn set_current_choice(
        &mut self,
        ctx: &mut WidgetContext<'_>,
        item: &str,
        value: ChoiceValue,
    ) -> Result<Transition> {
        let index = self.item_index(item)?;
        self.items[index].set_current_choice(ctx, value)
    }

    /// Deselect `value` in `item`, or all of its values when `None`.
    pub fn unset_current_choice(
        &mut self,
        ctx: &mut WidgetContext<'_>,
        item: &str,
        value: Option<&ChoiceValue>,
    ) -> Result<Vec<ChoiceValue>> {
        let index = self.item_index(item)?;
        self.items[index].unset_current_choice(ctx, value)
    }

    /// Whether every item has enough choices selected.
    pub fn is_choice_done(&self) -> bool {
        self.items.iter().all(ChoiceTable::is_choice_done)
    }

    /// Required items without an answer, in display order.
    pub fn missing_items(&self) -> Vec<String> {
        self.order
            .iter()
            .map(|index| &self.items[index])
            .filter(|item| !item.is_choice_done())
            .map(|item| item.widget_base().id().to_string())
            .collect()
    }

    /// The group `table` element.
    pub fn table(&self) -> NodeId {
        self.table
    }

    /// Content of the free-text area.
    pub fn free_text_value(&self, doc: &Document) -> Option<String> {
        self.free_text.map(|area| doc.value(area).to_string())
    }

    /// Replace the content of the free-text area.
    pub fn set_free_text(&mut self, doc: &mut Document, text: &str) -> Result<()> {
        match self.free_text {
            Some(area) => Ok(doc.set_value(area, text)?),
            None => Err(WidgetError::invalid_option("freeText", "not enabled")),
        }
    }

    /// Current error text.
    pub fn error_text(&self, doc: &Document) -> String {
        self.base.error_text(doc)
    }

    /// Collect the records of every item.
    pub fn values_record(
        &mut self,
        ctx: &mut WidgetContext<'_>,
        options: &GetValuesOptions,
    ) -> Result<GroupValues> {
        let item_options = options.with_reset(false);
        let mut records = BTreeMap::new();
        let mut missing = Vec::new();
        let mut is_correct = true;

        for position in 0..self.order.len() {
            let item = &mut self.items[self.order[position]];
            let record = item.values_record(ctx, &item_options)?;
            if !item.is_choice_done() {
                missing.push(record.id.clone());
            }
            is_correct &= record.is_correct;
            records.insert(record.id.clone(), record);
        }

        if options.highlight {
            if !missing.is_empty() {
                self.base.set_error(ctx.doc, Some(MISSING_ITEMS_MESSAGE))?;
            } else {
                self.base.set_error(ctx.doc, None)?;
                if !is_correct {
                    self.base.highlight(ctx.doc, None)?;
                }
            }
        }

        let values = GroupValues {
            id: self.base.id().to_string(),
            items: records,
            is_correct,
            missing,
            order: self.shuffle_items.then(|| self.order.as_slice().to_vec()),
            free_text: self.free_text_value(ctx.doc),
        };
        tracing::debug!(
            target: targets::GROUP,
            id = %values.id,
            is_correct,
            missing = values.missing.len(),
            "values collected"
        );

        if options.reset && is_correct {
            self.reset(ctx, &ResetOptions::default())?;
        }
        Ok(values)
    }
}

impl Widget for ChoiceTableGroup {
    fn widget_name(&self) -> &'static str {
        CHOICE_TABLE_GROUP
    }

    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn group(&self) -> Option<(&str, Option<usize>)> {
        self.group.as_deref().map(|group| (group, self.group_order))
    }

    fn listeners(&mut self, ctx: &mut WidgetContext<'_>) -> Result<()> {
        self.base.attach_listener(ctx.doc, self.table)
    }

    fn handle_click(&mut self, ctx: &mut WidgetContext<'_>, target: NodeId) -> Result<bool> {
        if self.base.is_disabled() {
            return Ok(false);
        }
        let Some((index, value)) = resolve_target(ctx.doc, target, |node| self.locate(node)) else {
            tracing::trace!(
                target: targets::GROUP,
                id = %self.base.id(),
                ?target,
                "click outside any cell dropped"
            );
            return Ok(false);
        };
        self.items[index].click_choice(ctx, value)?;
        Ok(true)
    }

    fn get_values(
        &mut self,
        ctx: &mut WidgetContext<'_>,
        options: &GetValuesOptions,
    ) -> Result<WidgetValues> {
        self.values_record(ctx, options).map(WidgetValues::Group)
    }

    fn set_values(&mut self, ctx: &mut WidgetContext<'_>, options: &SetValuesOptions) -> Result<()> {
        if options.items.is_empty() {
            for item in &mut self.items {
                item.set_values(ctx, options)?;
            }
            return Ok(());
        }
        for (id, item_options) in &options.items {
            let index = self.item_index(id)?;
            self.items[index].set_values(ctx, item_options)?;
        }
        Ok(())
    }

    fn reset(&mut self, ctx: &mut WidgetContext<'_>, options: &ResetOptions) -> Result<()> {
        for item in &mut self.items {
            item.reset(ctx, options)?;
        }
        if let Some(area) = self.free_text {
            ctx.doc.set_value(area, "")?;
        }
        self.base.set_error(ctx.doc, None)?;
        if options.shuffle && self.shuffle_items {
            self.shuffle_items(ctx)?;
        }
        tracing::debug!(target: targets::GROUP, id = %self.base.id(), shuffle = options.shuffle, "reset");
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

static_assertions::assert_impl_all!(ChoiceTableGroup: Send, Sync);
