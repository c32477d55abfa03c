//! Choice table widget.
//!
//! A table of clickable cells, one per choice. Clicking a cell selects its
//! choice. In single-select mode the previous selection is replaced; in
//! multiple-select mode each click toggles one choice.
//!
//! # Example
//!
//! ```ignore
//! use choice_lattice::prelude::*;
//!
//! let options = ChoiceTableOptions::new("color", ["Red", "Green", "Blue"])
//!     .with_required_choice(true)
//!     .with_main_text("Pick a color");
//! let id = page.add(page.body(), |ctx| ChoiceTable::new(options, ctx))?;
//! ```
//!
//! # Markup
//!
//! A standalone table renders as
//!
//! ```text
//! div#<id>.choicetable
//! ├── span.choicetable-maintext
//! ├── span.choicetable-hint
//! ├── table#<id>_table.choicetable-table   (click listener)
//! │   └── tbody
//! │       └── tr > [td.choicetable-left] td.choicetable-cell#<id>::<value>... [td.choicetable-right]
//! ├── textarea.choicetable-freetext
//! └── span.choicetable-error
//! ```
//!
//! Inside a [`ChoiceTableGroup`](super::ChoiceTableGroup) each item is
//! reduced to its `tbody`, with the main text in the first cell and no
//! error element of its own.

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use choice_lattice_core::logging::targets;
use choice_lattice_core::{Document, NodeId, Signal};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::choice::{
    cell_identifier, render_choice, resolve_target, CellKey, CellMap, Choice, ChoiceValue, Order,
    SharedRenderer,
};
use crate::error::{Result, WidgetError};
use crate::selection::{
    ChoiceChanged, CurrentChoice, ReclickPolicy, SelectMode, SelectionState, Transition,
};
use crate::validation::{
    ChoiceTableValues, GetValuesOptions, RequiredChoice, ResetOptions, SetValuesOptions,
    WidgetValues, MISSING_CHOICE_MESSAGE,
};
use crate::widget::base::{
    add_classes, append_text_element, deserialize_free_text, validate_id, Orientation, WidgetBase,
};
use crate::widget::{Widget, WidgetContext};

/// CSS class of a selected cell.
pub const SELECTED_CLASS: &str = "selected";

/// Registry name of [`ChoiceTable`].
pub const CHOICE_TABLE: &str = "ChoiceTable";

/// Callback connected to `choice_changed` at construction.
pub type ClickCallback = Arc<dyn Fn(&ChoiceChanged) + Send + Sync>;

// ============================================================================
// Options
// ============================================================================

/// Configuration of a [`ChoiceTable`].
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceTableOptions {
    /// Widget id; also the prefix of cell identifiers.
    pub id: String,
    /// Extra CSS classes on the root.
    pub class_name: Option<String>,
    /// Choices in their original order.
    pub choices: Vec<Choice>,
    /// Cells in one row, or one row per cell.
    pub orientation: Orientation,
    /// `true`, `false`, or the maximum number of selections.
    pub select_multiple: SelectMode,
    /// Shuffle the display order.
    pub shuffle_choices: bool,
    /// `true`, `false`, or the minimum number of selections.
    pub required_choice: RequiredChoice,
    /// Expected answer.
    pub correct_choice: Option<CurrentChoice>,
    /// Joins the widget id and the choice value in cell identifiers.
    pub separator: String,
    /// Question text.
    pub main_text: Option<String>,
    /// Hint below the question.
    pub hint: Option<String>,
    /// Extra cell before the choices.
    pub left_cell: Option<String>,
    /// Extra cell after the choices.
    pub right_cell: Option<String>,
    /// Render only the first N choices of the display order.
    pub choices_set_size: Option<usize>,
    /// Show a text area; the string is its placeholder.
    #[serde(deserialize_with = "deserialize_free_text")]
    pub free_text: Option<String>,
    /// Make cells reachable with the keyboard.
    pub tabbable: bool,
    /// Name of the group this widget belongs to on the page.
    pub group: Option<String>,
    /// Position inside `group`.
    pub group_order: Option<usize>,
    /// Custom cell formatting.
    #[serde(skip)]
    pub renderer: Option<SharedRenderer>,
    /// Called on every selection change.
    #[serde(skip)]
    pub on_click: Option<ClickCallback>,
}

impl Default for ChoiceTableOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            class_name: None,
            choices: Vec::new(),
            orientation: Orientation::default(),
            select_multiple: SelectMode::Single,
            shuffle_choices: false,
            required_choice: RequiredChoice::NotRequired,
            correct_choice: None,
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

impl fmt::Debug for ChoiceTableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceTableOptions")
            .field("id", &self.id)
            .field("choices", &self.choices)
            .field("orientation", &self.orientation)
            .field("select_multiple", &self.select_multiple)
            .field("shuffle_choices", &self.shuffle_choices)
            .field("required_choice", &self.required_choice)
            .field("correct_choice", &self.correct_choice)
            .field("separator", &self.separator)
            .field("choices_set_size", &self.choices_set_size)
            .field("renderer", &self.renderer.is_some())
            .field("on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

impl ChoiceTableOptions {
    /// Options for a table `id` with `choices`.
    pub fn new<C>(id: impl Into<String>, choices: impl IntoIterator<Item = C>) -> Self
    where
        C: Into<Choice>,
    {
        Self {
            id: id.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Parse options from JSON.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Set the extra CSS classes.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the selection mode.
    pub fn with_select_multiple(mut self, mode: SelectMode) -> Self {
        self.select_multiple = mode;
        self
    }

    /// Shuffle the display order.
    pub fn with_shuffle_choices(mut self, shuffle: bool) -> Self {
        self.shuffle_choices = shuffle;
        self
    }

    /// Set the required-choice rule.
    pub fn with_required_choice(mut self, required: impl Into<RequiredChoice>) -> Self {
        self.required_choice = required.into();
        self
    }

    /// Set the expected answer.
    pub fn with_correct_choice(mut self, correct: CurrentChoice) -> Self {
        self.correct_choice = Some(correct);
        self
    }

    /// Set the identifier separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the question text.
    pub fn with_main_text(mut self, text: impl Into<String>) -> Self {
        self.main_text = Some(text.into());
        self
    }

    /// Set the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Set the cell before the choices.
    pub fn with_left_cell(mut self, text: impl Into<String>) -> Self {
        self.left_cell = Some(text.into());
        self
    }

    /// Set the cell after the choices.
    pub fn with_right_cell(mut self, text: impl Into<String>) -> Self {
        self.right_cell = Some(text.into());
        self
    }

    /// Render only `size` choices.
    pub fn with_choices_set_size(mut self, size: usize) -> Self {
        self.choices_set_size = Some(size);
        self
    }

    /// Add a free-text area with `placeholder`.
    pub fn with_free_text(mut self, placeholder: impl Into<String>) -> Self {
        self.free_text = Some(placeholder.into());
        self
    }

    /// Make cells tabbable.
    pub fn with_tabbable(mut self, tabbable: bool) -> Self {
        self.tabbable = tabbable;
        self
    }

    /// Place the widget in a page group.
    pub fn with_group(mut self, group: impl Into<String>, order: Option<usize>) -> Self {
        self.group = Some(group.into());
        self.group_order = order;
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

    /// Check the options.
    pub fn validate(&self) -> Result<()> {
        validate_id(&self.id, &self.separator)?;
        if self.choices.is_empty() {
            return Err(WidgetError::EmptyChoices {
                widget: self.id.clone(),
            });
        }
        let values = resolve_values(&self.id, &self.choices)?;
        let total = values.len();

        if let Some(size) = self.choices_set_size {
            if size == 0 || size > total {
                return Err(WidgetError::invalid_option(
                    "choicesSetSize",
                    format!("must be between 1 and {total}, got {size}"),
                ));
            }
        }
        let rendered = self.choices_set_size.unwrap_or(total);

        let capacity = self.select_multiple.capacity();
        if capacity == Some(0) {
            return Err(WidgetError::invalid_option(
                "selectMultiple",
                "maximum must be at least 1",
            ));
        }
        if capacity.is_some_and(|cap| cap > rendered) {
            tracing::warn!(
                target: targets::CHOICE_TABLE,
                id = %self.id,
                rendered,
                "selectMultiple maximum exceeds the number of rendered choices"
            );
        }

        let minimum = self.required_choice.minimum();
        if minimum > rendered || capacity.is_some_and(|cap| minimum > cap) {
            return Err(WidgetError::invalid_option(
                "requiredChoice",
                format!("{minimum} selections cannot be made"),
            ));
        }

        if let Some(correct) = &self.correct_choice {
            if let CurrentChoice::Multiple(expected) = correct {
                if !self.select_multiple.is_multiple() && expected.len() != 1 {
                    return Err(WidgetError::invalid_option(
                        "correctChoice",
                        "a single-select table has one correct choice",
                    ));
                }
            }
            for value in correct.values() {
                if !values.contains(value) {
                    return Err(WidgetError::UnknownChoice {
                        widget: self.id.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Resolve the value of every choice, rejecting duplicates.
pub(crate) fn resolve_values(widget: &str, choices: &[Choice]) -> Result<Vec<ChoiceValue>> {
    let mut seen = HashSet::with_capacity(choices.len());
    choices
        .iter()
        .enumerate()
        .map(|(index, choice)| {
            let value = choice.resolved_value(index);
            if !seen.insert(value.clone()) {
                return Err(WidgetError::DuplicateChoiceValue {
                    widget: widget.to_string(),
                    value,
                });
            }
            Ok(value)
        })
        .collect()
}

// ============================================================================
// Widget
// ============================================================================

/// A table of clickable choices.
///
/// # Signals
///
/// - `choice_changed`: emitted for every cell whose selection changed
pub struct ChoiceTable {
    base: WidgetBase,
    embedded: bool,
    choices: Vec<Choice>,
    values: Vec<ChoiceValue>,
    order: Order,
    shuffle_choices: bool,
    choices_set_size: Option<usize>,
    orientation: Orientation,
    separator: String,
    renderer: Option<SharedRenderer>,
    required: RequiredChoice,
    correct: Option<CurrentChoice>,
    main_text: Option<String>,
    left_cell: Option<String>,
    right_cell: Option<String>,
    tabbable: bool,
    group: Option<String>,
    group_order: Option<usize>,
    table: Option<NodeId>,
    body: NodeId,
    free_text: Option<NodeId>,
    cells: CellMap,
    selection: SelectionState,
    attempts: Vec<Option<CurrentChoice>>,

    /// Signal emitted when a cell is selected or deselected.
    pub choice_changed: Signal<ChoiceChanged>,
}

impl fmt::Debug for ChoiceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceTable")
            .field("id", &self.base.id())
            .field("embedded", &self.embedded)
            .field("order", &self.order)
            .field("selection", &self.selection)
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}

impl ChoiceTable {
    /// Build a standalone table. The markup is created detached.
    pub fn new(options: ChoiceTableOptions, ctx: &mut WidgetContext<'_>) -> Result<Self> {
        Self::build(options, ctx, false)
    }

    /// Build a table from JSON options.
    pub fn from_json(value: serde_json::Value, ctx: &mut WidgetContext<'_>) -> Result<Self> {
        Self::new(ChoiceTableOptions::from_json(value)?, ctx)
    }

    /// Build the row of a group: markup reduced to a `tbody`, and a click on
    /// the selected cell deselects it.
    pub(crate) fn new_item(options: ChoiceTableOptions, ctx: &mut WidgetContext<'_>) -> Result<Self> {
        Self::build(options, ctx, true)
    }

    fn build(options: ChoiceTableOptions, ctx: &mut WidgetContext<'_>, embedded: bool) -> Result<Self> {
        options.validate()?;
        let values = resolve_values(&options.id, &options.choices)?;
        let order = Order::new(values.len(), options.shuffle_choices, &mut *ctx.rng);
        let doc = &mut *ctx.doc;

        let body = doc.create_element("tbody");
        let (base, table, free_text) = if embedded {
            doc.set_id(body, options.id.as_str())?;
            doc.add_class(body, "choicetable-item")?;
            if let Some(class_name) = &options.class_name {
                add_classes(doc, body, class_name)?;
            }
            (WidgetBase::new(options.id.as_str(), body), None, None)
        } else {
            let root = doc.create_element("div");
            doc.set_id(root, options.id.as_str())?;
            doc.add_class(root, "choicetable")?;
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
            doc.add_class(table, "choicetable-table")?;
            doc.append_child(table, body)?;
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
            (
                WidgetBase::new(options.id.as_str(), root).with_error_box(error),
                Some(table),
                free_text,
            )
        };

        let reclick = if embedded {
            ReclickPolicy::Deselect
        } else {
            ReclickPolicy::Keep
        };
        let choice_changed: Signal<ChoiceChanged> = Signal::new();
        if let Some(callback) = options.on_click {
            choice_changed.connect(move |event: &ChoiceChanged| callback(event));
        }

        let mut widget = Self {
            base,
            embedded,
            choices: options.choices,
            values,
            order,
            shuffle_choices: options.shuffle_choices,
            choices_set_size: options.choices_set_size,
            orientation: options.orientation,
            separator: options.separator,
            renderer: options.renderer,
            required: options.required_choice,
            correct: options.correct_choice,
            main_text: options.main_text,
            left_cell: options.left_cell,
            right_cell: options.right_cell,
            tabbable: options.tabbable,
            group: options.group,
            group_order: options.group_order,
            table,
            body,
            free_text,
            cells: CellMap::new(),
            selection: SelectionState::new(options.select_multiple, reclick),
            attempts: Vec::new(),
            choice_changed,
        };
        widget.render_body(doc)?;

        tracing::debug!(
            target: targets::CHOICE_TABLE,
            id = %widget.base.id(),
            choices = widget.choices.len(),
            rendered = widget.cells.len(),
            shuffled = widget.shuffle_choices,
            embedded,
            "choice table built"
        );
        Ok(widget)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn rendered_len(&self) -> usize {
        self.choices_set_size
            .unwrap_or(self.order.len())
            .min(self.order.len())
    }

    /// (Re)build the rows of the body in the current order.
    fn render_body(&mut self, doc: &mut Document) -> Result<()> {
        // Node choices live inside the old cells; take them out before the
        // cells are removed.
        for choice in &self.choices {
            if let Choice::Node(node) = *choice {
                if doc
                    .parent(node)
                    .is_some_and(|parent| self.cells.resolve(parent).is_some())
                {
                    doc.detach(node)?;
                }
            }
        }
        doc.clear_children(self.body)?;
        self.cells.clear();

        let mut cells = Vec::with_capacity(self.rendered_len());
        for position in 0..self.rendered_len() {
            cells.push(self.render_cell(doc, position)?);
        }

        let main_text = self.main_text.as_deref().filter(|_| self.embedded);
        let extras_before = [
            (main_text, "choicetable-maintext"),
            (self.left_cell.as_deref(), "choicetable-left"),
        ];
        let extras_after = [(self.right_cell.as_deref(), "choicetable-right")];

        match self.orientation {
            Orientation::Horizontal => {
                let row = doc.create_element("tr");
                doc.append_child(self.body, row)?;
                for (text, class) in extras_before {
                    if let Some(text) = text {
                        append_text_element(doc, row, "td", class, text)?;
                    }
                }
                for cell in cells {
                    doc.append_child(row, cell)?;
                }
                for (text, class) in extras_after {
                    if let Some(text) = text {
                        append_text_element(doc, row, "td", class, text)?;
                    }
                }
            }
            Orientation::Vertical => {
                for (text, class) in extras_before {
                    if let Some(text) = text {
                        let row = doc.create_element("tr");
                        doc.append_child(self.body, row)?;
                        append_text_element(doc, row, "td", class, text)?;
                    }
                }
                for cell in cells {
                    let row = doc.create_element("tr");
                    doc.append_child(self.body, row)?;
                    doc.append_child(row, cell)?;
                }
                for (text, class) in extras_after {
                    if let Some(text) = text {
                        let row = doc.create_element("tr");
                        doc.append_child(self.body, row)?;
                        append_text_element(doc, row, "td", class, text)?;
                    }
                }
            }
        }

        for value in self.selection.selected().to_vec() {
            self.mark_cell(doc, &value, true)?;
        }
        self.warn_hidden_correct();
        Ok(())
    }

    fn warn_hidden_correct(&self) {
        let Some(correct) = &self.correct else {
            return;
        };
        let hidden: Vec<String> = correct
            .values()
            .into_iter()
            .filter(|value| self.cell_node(value).is_none())
            .map(ToString::to_string)
            .collect();
        if !hidden.is_empty() && !self.cells.is_empty() {
            tracing::warn!(
                target: targets::CHOICE_TABLE,
                id = %self.base.id(),
                hidden = ?hidden,
                "correct choice is not displayed"
            );
        }
    }

    fn render_cell(&mut self, doc: &mut Document, position: usize) -> Result<NodeId> {
        let index = self.order[position];
        let value = self.values[index].clone();
        let cell = doc.create_element("td");
        doc.add_class(cell, "choicetable-cell")?;
        if self.tabbable {
            doc.set_attribute(cell, "tabindex", "0")?;
        }
        render_choice(doc, cell, &self.choices[index], index, self.renderer.as_deref())?;

        let identifier = match doc.id(cell) {
            Some(id) => id.to_string(),
            None => {
                let id = cell_identifier(self.base.id(), &self.separator, &value);
                doc.set_id(cell, id.as_str())?;
                id
            }
        };
        self.cells
            .insert(cell, CellKey::new(self.base.id(), value), &identifier)?;
        Ok(cell)
    }

    fn mark_cell(&self, doc: &mut Document, value: &ChoiceValue, selected: bool) -> Result<()> {
        let key = CellKey::new(self.base.id(), value.clone());
        if let Some(cell) = self.cells.node(&key) {
            if selected {
                doc.add_class(cell, SELECTED_CLASS)?;
            } else {
                doc.remove_class(cell, SELECTED_CLASS)?;
            }
        }
        Ok(())
    }

    fn apply(&self, doc: &mut Document, transition: &Transition) -> Result<Vec<ChoiceChanged>> {
        let events = ChoiceChanged::from_transition(self.base.id(), transition);
        for event in &events {
            self.mark_cell(doc, &event.value, event.selected)?;
        }
        for event in &events {
            self.choice_changed.emit(event.clone());
        }
        Ok(events)
    }

    fn ensure_known(&self, value: &ChoiceValue) -> Result<()> {
        if self.values.contains(value) {
            Ok(())
        } else {
            Err(WidgetError::UnknownChoice {
                widget: self.base.id().to_string(),
                value: value.clone(),
            })
        }
    }

    fn ensure_rendered(&self, value: &ChoiceValue) -> Result<()> {
        self.ensure_known(value)?;
        if self.cell_node(value).is_none() {
            return Err(WidgetError::HiddenChoice {
                widget: self.base.id().to_string(),
                value: value.clone(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Treat `value` as clicked by the participant.
    ///
    /// The value must belong to a rendered cell.
    pub fn click_choice(&mut self, ctx: &mut WidgetContext<'_>, value: ChoiceValue) -> Result<Transition> {
        self.ensure_rendered(&value)?;
        let now = ctx.now();
        let transition = self.selection.click(value.clone(), now);
        match &transition {
            Transition::Refused => tracing::debug!(
                target: targets::CHOICE_TABLE,
                id = %self.base.id(),
                %value,
                "selection limit reached, click refused"
            ),
            other => tracing::debug!(
                target: targets::CHOICE_TABLE,
                id = %self.base.id(),
                %value,
                transition = ?other,
                clicks = self.selection.number_of_clicks(),
                "click"
            ),
        }
        self.apply(ctx.doc, &transition)?;
        Ok(transition)
    }

    /// Select `value` without counting a click.
    pub fn set_current_choice(
        &mut self,
        ctx: &mut WidgetContext<'_>,
        value: ChoiceValue,
    ) -> Result<Transition> {
        self.ensure_rendered(&value)?;
        let now = ctx.now();
        let transition = self.selection.set(value, now);
        self.apply(ctx.doc, &transition)?;
        Ok(transition)
    }

    /// Deselect `value`, or every selected value when `None`.
    pub fn unset_current_choice(
        &mut self,
        ctx: &mut WidgetContext<'_>,
        value: Option<&ChoiceValue>,
    ) -> Result<Vec<ChoiceValue>> {
        let now = ctx.now();
        let removed = self.selection.unset(value, now);
        for value in &removed {
            self.apply(ctx.doc, &Transition::Deselected(value.clone()))?;
        }
        Ok(removed)
    }

    /// Whether `value` is selected.
    pub fn is_choice_current(&self, value: &ChoiceValue) -> bool {
        self.selection.is_selected(value)
    }

    /// The current answer.
    pub fn current_choice(&self) -> Option<CurrentChoice> {
        self.selection.current()
    }

    /// Selected values in selection order.
    pub fn selected(&self) -> &[ChoiceValue] {
        self.selection.selected()
    }

    /// Clicks on cells since the last reset.
    pub fn number_of_clicks(&self) -> u32 {
        self.selection.number_of_clicks()
    }

    /// Clock reading of the last selection change.
    pub fn time_current_choice(&self) -> Option<u64> {
        self.selection.time_current_choice()
    }

    /// Selection mode.
    pub fn select_mode(&self) -> SelectMode {
        self.selection.mode()
    }

    /// Answers recorded by invalid reads.
    pub fn attempts(&self) -> &[Option<CurrentChoice>] {
        &self.attempts
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Whether enough choices are selected. Always true when nothing is
    /// required.
    pub fn is_choice_done(&self) -> bool {
        self.required.is_satisfied(self.selection.count())
    }

    /// Compare the selection with the expected answer.
    ///
    /// `None` when no correct choice is configured.
    pub fn verify_choice(&self) -> Option<bool> {
        let correct = self.correct.as_ref()?;
        Some(
            self.selection
                .current()
                .is_some_and(|current| current.same_answer(correct)),
        )
    }

    /// Required-choice rule.
    pub fn required_choice(&self) -> RequiredChoice {
        self.required
    }

    /// Whether an answer is required.
    pub fn is_required(&self) -> bool {
        self.required.is_required()
    }

    /// Expected answer.
    pub fn correct_choice(&self) -> Option<&CurrentChoice> {
        self.correct.as_ref()
    }

    /// Replace the expected answer.
    pub fn set_correct_choice(&mut self, correct: Option<CurrentChoice>) -> Result<()> {
        if let Some(correct) = &correct {
            for value in correct.values() {
                self.ensure_known(value)?;
            }
        }
        self.correct = correct;
        self.warn_hidden_correct();
        Ok(())
    }

    fn missing_message(&self) -> String {
        match self.required.minimum() {
            0 | 1 => MISSING_CHOICE_MESSAGE.to_string(),
            n => format!("Please select at least {n} options"),
        }
    }

    /// Collect the answer record.
    pub fn values_record(
        &mut self,
        ctx: &mut WidgetContext<'_>,
        options: &GetValuesOptions,
    ) -> Result<ChoiceTableValues> {
        let done = self.is_choice_done();
        let is_correct = done && self.verify_choice() != Some(false);
        let value = self.selection.current();

        if !is_correct && options.mark_attempt {
            self.attempts.push(value.clone());
        }
        if options.highlight {
            if !done {
                let message = self.missing_message();
                self.base.set_error(ctx.doc, Some(message.as_str()))?;
            } else {
                self.base.set_error(ctx.doc, None)?;
                if !is_correct {
                    self.base.highlight(ctx.doc, None)?;
                }
            }
        }

        let record = ChoiceTableValues {
            id: self.base.id().to_string(),
            value,
            is_correct,
            time: self.selection.time_current_choice(),
            attempts: self.attempts.clone(),
            n_clicks: self.selection.number_of_clicks(),
            order: self
                .shuffle_choices
                .then(|| self.order.as_slice().to_vec()),
            labels: options.add_value.then(|| self.selected_labels()),
            free_text: self.free_text_value(ctx.doc),
        };
        tracing::debug!(
            target: targets::CHOICE_TABLE,
            id = %record.id,
            is_correct,
            attempts = record.attempts.len(),
            "values collected"
        );

        if options.reset && is_correct {
            self.reset_state(ctx, &ResetOptions::default())?;
        }
        Ok(record)
    }

    fn selected_labels(&self) -> Vec<String> {
        self.selection
            .selected()
            .iter()
            .map(|value| {
                self.choice_for(value)
                    .and_then(|(_, choice)| choice.label())
                    .unwrap_or_else(|| value.to_string())
            })
            .collect()
    }

    /// Pick a valid answer among the rendered choices.
    fn random_answer<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ChoiceValue> {
        let rendered: Vec<&ChoiceValue> = (0..self.rendered_len())
            .map(|position| &self.values[self.order[position]])
            .collect();
        let count = match self.selection.mode() {
            SelectMode::Single => 1,
            SelectMode::Multiple { max } => {
                let high = max.unwrap_or(rendered.len()).min(rendered.len());
                let low = self.required.minimum().clamp(1, high);
                rng.gen_range(low..=high)
            }
        };
        rendered
            .choose_multiple(rng, count)
            .map(|value| (*value).clone())
            .collect()
    }

    fn reset_state(&mut self, ctx: &mut WidgetContext<'_>, options: &ResetOptions) -> Result<()> {
        for value in self.selection.selected().to_vec() {
            self.mark_cell(ctx.doc, &value, false)?;
        }
        self.selection.reset();
        self.attempts.clear();
        if let Some(area) = self.free_text {
            ctx.doc.set_value(area, "")?;
        }
        self.base.set_error(ctx.doc, None)?;
        if options.shuffle && self.shuffle_choices {
            self.order = Order::shuffled(self.values.len(), &mut *ctx.rng);
            self.render_body(ctx.doc)?;
        }
        tracing::debug!(target: targets::CHOICE_TABLE, id = %self.base.id(), shuffle = options.shuffle, "reset");
        Ok(())
    }

    // =========================================================================
    // Layout and lookup
    // =========================================================================

    /// Draw a new display order and re-render the cells.
    ///
    /// Selected values that lose their cell are deselected.
    pub fn shuffle(&mut self, ctx: &mut WidgetContext<'_>) -> Result<()> {
        self.order = Order::shuffled(self.values.len(), &mut *ctx.rng);
        self.render_body(ctx.doc)?;
        for value in self.selection.selected().to_vec() {
            if self.cell_node(&value).is_none() {
                self.unset_current_choice(ctx, Some(&value))?;
            }
        }
        Ok(())
    }

    /// Choices in their original order.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Resolved values in original order.
    pub fn values(&self) -> &[ChoiceValue] {
        &self.values
    }

    /// Display order.
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Value displayed at `position`.
    pub fn get_choice_at_position(&self, position: usize) -> Option<&ChoiceValue> {
        self.order.get(position).map(|index| &self.values[index])
    }

    /// Original index and choice of `value`.
    pub fn choice_for(&self, value: &ChoiceValue) -> Option<(usize, &Choice)> {
        let index = self.values.iter().position(|v| v == value)?;
        Some((index, &self.choices[index]))
    }

    /// Rendered cells.
    pub fn cells(&self) -> &CellMap {
        &self.cells
    }

    /// Cell rendering `value`, if rendered.
    pub fn cell_node(&self, value: &ChoiceValue) -> Option<NodeId> {
        self.cells
            .node(&CellKey::new(self.base.id(), value.clone()))
    }

    /// The `table` element of a standalone widget.
    pub fn table(&self) -> Option<NodeId> {
        self.table
    }

    /// The `tbody` holding the cells.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
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
}

impl Widget for ChoiceTable {
    fn widget_name(&self) -> &'static str {
        CHOICE_TABLE
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
        // Group items are reached through the group's listener.
        match self.table {
            Some(table) => self.base.attach_listener(ctx.doc, table),
            None => Ok(()),
        }
    }

    fn handle_click(&mut self, ctx: &mut WidgetContext<'_>, target: NodeId) -> Result<bool> {
        if self.base.is_disabled() {
            return Ok(false);
        }
        let hit = resolve_target(ctx.doc, target, |node| {
            self.cells.resolve(node).map(|key| key.value.clone())
        });
        let Some(value) = hit else {
            tracing::trace!(
                target: targets::CHOICE_TABLE,
                id = %self.base.id(),
                ?target,
                "click outside any cell dropped"
            );
            return Ok(false);
        };
        self.click_choice(ctx, value)?;
        Ok(true)
    }

    fn get_values(
        &mut self,
        ctx: &mut WidgetContext<'_>,
        options: &GetValuesOptions,
    ) -> Result<WidgetValues> {
        self.values_record(ctx, options).map(WidgetValues::ChoiceTable)
    }

    fn set_values(&mut self, ctx: &mut WidgetContext<'_>, options: &SetValuesOptions) -> Result<()> {
        let answer = if let Some(values) = &options.values {
            values.clone()
        } else if options.correct {
            let correct = self.correct.as_ref().ok_or_else(|| {
                WidgetError::invalid_option("correctChoice", "no correct choice configured")
            })?;
            correct.values().into_iter().cloned().collect()
        } else {
            self.random_answer(&mut *ctx.rng)
        };

        if let Some(cap) = self.selection.mode().capacity() {
            if answer.len() > cap {
                return Err(WidgetError::invalid_option(
                    "values",
                    format!("{} values exceed the limit of {cap}", answer.len()),
                ));
            }
        }
        for value in &answer {
            self.ensure_rendered(value)?;
        }

        self.unset_current_choice(ctx, None)?;
        for value in answer {
            self.set_current_choice(ctx, value)?;
        }
        Ok(())
    }

    fn reset(&mut self, ctx: &mut WidgetContext<'_>, options: &ResetOptions) -> Result<()> {
        self.reset_state(ctx, options)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

static_assertions::assert_impl_all!(ChoiceTable: Send, Sync);
static_assertions::assert_impl_all!(ChoiceTableOptions: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use choice_lattice_core::{EventKind, ManualClock};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct Fixture {
        doc: Document,
        rng: StdRng,
        clock: ManualClock,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                doc: Document::new(),
                rng: StdRng::seed_from_u64(7),
                clock: ManualClock::new(0),
            }
        }

        fn ctx(&mut self) -> WidgetContext<'_> {
            WidgetContext::new(&mut self.doc, &mut self.rng, &self.clock)
        }

        fn build(&mut self, options: ChoiceTableOptions) -> ChoiceTable {
            let mut ctx = self.ctx();
            let mut table = ChoiceTable::new(options, &mut ctx).unwrap();
            let body = ctx.doc.body();
            table.append(&mut ctx, body).unwrap();
            table.listeners(&mut ctx).unwrap();
            table
        }

        fn click(&mut self, table: &mut ChoiceTable, value: usize) -> bool {
            let cell = table.cell_node(&ChoiceValue::Index(value)).unwrap();
            table.handle_click(&mut self.ctx(), cell).unwrap()
        }
    }

    fn abc() -> ChoiceTableOptions {
        ChoiceTableOptions::new("q1", ["A", "B", "C"])
    }

    #[test]
    fn test_renders_cells_in_order() {
        let mut fx = Fixture::new();
        let table = fx.build(abc());

        assert!(table.order().is_identity());
        assert_eq!(table.cells().len(), 3);
        let cell = fx.doc.get_element_by_id("q1::1").unwrap();
        assert_eq!(fx.doc.text_content(cell), "B");
        assert_eq!(table.cell_node(&ChoiceValue::Index(1)), Some(cell));
        assert!(fx.doc.has_listener(table.table().unwrap(), EventKind::Click));
    }

    #[test]
    fn test_single_click() {
        let mut fx = Fixture::new();
        let mut table = fx.build(abc());

        fx.clock.set(1500);
        assert!(fx.click(&mut table, 1));
        assert_eq!(
            table.current_choice(),
            Some(CurrentChoice::Single(ChoiceValue::Index(1)))
        );
        assert_eq!(table.number_of_clicks(), 1);
        assert_eq!(table.time_current_choice(), Some(1500));

        fx.click(&mut table, 2);
        let b = table.cell_node(&ChoiceValue::Index(1)).unwrap();
        let c = table.cell_node(&ChoiceValue::Index(2)).unwrap();
        assert!(!fx.doc.has_class(b, SELECTED_CLASS));
        assert!(fx.doc.has_class(c, SELECTED_CLASS));
    }

    #[test]
    fn test_standalone_reclick_keeps_selection() {
        let mut fx = Fixture::new();
        let mut table = fx.build(abc());

        fx.clock.set(100);
        fx.click(&mut table, 0);
        fx.clock.set(900);
        fx.click(&mut table, 0);

        assert!(table.is_choice_current(&ChoiceValue::Index(0)));
        assert_eq!(table.number_of_clicks(), 2);
        assert_eq!(table.time_current_choice(), Some(100));
    }

    #[test]
    fn test_click_on_nested_decoration() {
        let mut fx = Fixture::new();
        let renderer: SharedRenderer = Arc::new(
            |doc: &mut Document, cell: NodeId, choice: &Choice, _index: usize| -> Result<()> {
                let span = doc.create_element("span");
                doc.set_text(span, choice.label().unwrap_or_default())?;
                doc.append_child(cell, span)?;
                Ok(())
            },
        );
        let mut table = fx.build(abc().with_renderer(renderer));
        let cell = table.cell_node(&ChoiceValue::Index(2)).unwrap();
        let span = fx.doc.children(cell)[0];
        let text = fx.doc.children(span)[0];

        assert!(table.handle_click(&mut fx.ctx(), span).unwrap());
        assert!(table.is_choice_current(&ChoiceValue::Index(2)));

        // Two levels below the cell is too deep.
        assert!(!table.handle_click(&mut fx.ctx(), text).unwrap());
        assert_eq!(table.number_of_clicks(), 1);
    }

    #[test]
    fn test_renderer_identifier_is_kept() {
        let mut fx = Fixture::new();
        let renderer: SharedRenderer = Arc::new(
            |doc: &mut Document, cell: NodeId, _choice: &Choice, index: usize| -> Result<()> {
                doc.set_id(cell, format!("custom-{index}"))?;
                Ok(())
            },
        );
        let table = fx.build(abc().with_renderer(renderer));
        let cell = fx.doc.get_element_by_id("custom-2").unwrap();
        assert_eq!(
            table.cells().resolve(cell).map(|key| &key.value),
            Some(&ChoiceValue::Index(2))
        );
    }

    #[test]
    fn test_disabled_ignores_clicks() {
        let mut fx = Fixture::new();
        let mut table = fx.build(abc());
        assert!(table.disable(&mut fx.ctx()).unwrap());
        assert!(!fx.click(&mut table, 0));
        assert_eq!(table.number_of_clicks(), 0);

        assert!(table.enable(&mut fx.ctx()).unwrap());
        assert!(fx.click(&mut table, 0));
    }

    #[test]
    fn test_multiple_cap_refuses() {
        let mut fx = Fixture::new();
        let mut table = fx.build(abc().with_select_multiple(SelectMode::Multiple { max: Some(2) }));
        fx.click(&mut table, 0);
        fx.click(&mut table, 1);
        fx.click(&mut table, 2);
        assert_eq!(
            table.selected(),
            &[ChoiceValue::Index(0), ChoiceValue::Index(1)]
        );
        assert_eq!(table.number_of_clicks(), 3);
        let c = table.cell_node(&ChoiceValue::Index(2)).unwrap();
        assert!(!fx.doc.has_class(c, SELECTED_CLASS));
    }

    #[test]
    fn test_required_validation() {
        let mut fx = Fixture::new();
        let mut table = fx.build(abc().with_required_choice(true));

        let values = table
            .values_record(&mut fx.ctx(), &GetValuesOptions::default())
            .unwrap();
        assert!(!values.is_correct);
        assert_eq!(values.attempts, vec![None]);
        assert!(table.is_highlighted());
        assert_eq!(table.error_text(&fx.doc), MISSING_CHOICE_MESSAGE);

        fx.click(&mut table, 1);
        let values = table
            .values_record(&mut fx.ctx(), &GetValuesOptions::default())
            .unwrap();
        assert!(values.is_correct);
        assert_eq!(values.attempts.len(), 1);
        assert!(!table.is_highlighted());
        assert_eq!(table.error_text(&fx.doc), "");
    }

    #[test]
    fn test_wrong_answer_highlights_without_message() {
        let mut fx = Fixture::new();
        let mut table = fx.build(
            abc().with_correct_choice(CurrentChoice::Single(ChoiceValue::Index(2))),
        );
        fx.click(&mut table, 0);
        assert_eq!(table.verify_choice(), Some(false));

        let values = table
            .values_record(&mut fx.ctx(), &GetValuesOptions::default())
            .unwrap();
        assert!(!values.is_correct);
        assert!(table.is_highlighted());
        assert_eq!(table.error_text(&fx.doc), "");

        fx.click(&mut table, 2);
        let values = table
            .values_record(&mut fx.ctx(), &GetValuesOptions::default())
            .unwrap();
        assert!(values.is_correct);
        assert!(!table.is_highlighted());
    }

    #[test]
    fn test_peek_has_no_side_effects() {
        let mut fx = Fixture::new();
        let mut table = fx.build(abc().with_required_choice(true));
        let values = table
            .values_record(&mut fx.ctx(), &GetValuesOptions::peek())
            .unwrap();
        assert!(!values.is_correct);
        assert!(values.attempts.is_empty());
        assert!(!table.is_highlighted());
    }

    #[test]
    fn test_reset_after_successful_read() {
        let mut fx = Fixture::new();
        let mut table = fx.build(abc().with_required_choice(true));
        fx.click(&mut table, 0);
        let opts = GetValuesOptions::default().with_reset(true);
        let values = table.values_record(&mut fx.ctx(), &opts).unwrap();

        assert_eq!(
            values.value,
            Some(CurrentChoice::Single(ChoiceValue::Index(0)))
        );
        assert_eq!(table.current_choice(), None);
        assert_eq!(table.number_of_clicks(), 0);
        let a = table.cell_node(&ChoiceValue::Index(0)).unwrap();
        assert!(!fx.doc.has_class(a, SELECTED_CLASS));
    }

    #[test]
    fn test_set_values() {
        let mut fx = Fixture::new();
        let mut table = fx.build(
            abc()
                .with_select_multiple(SelectMode::multiple())
                .with_correct_choice(CurrentChoice::Multiple(vec![
                    ChoiceValue::Index(0),
                    ChoiceValue::Index(2),
                ])),
        );

        table
            .set_values(&mut fx.ctx(), &SetValuesOptions::correct())
            .unwrap();
        assert_eq!(table.verify_choice(), Some(true));
        assert_eq!(table.number_of_clicks(), 0);

        table
            .set_values(
                &mut fx.ctx(),
                &SetValuesOptions::values([ChoiceValue::Index(1)]),
            )
            .unwrap();
        assert_eq!(table.selected(), &[ChoiceValue::Index(1)]);

        let err = table
            .set_values(
                &mut fx.ctx(),
                &SetValuesOptions::values([ChoiceValue::Index(9)]),
            )
            .unwrap_err();
        assert!(matches!(err, WidgetError::UnknownChoice { .. }));

        table
            .set_values(&mut fx.ctx(), &SetValuesOptions::random())
            .unwrap();
        assert!(table.is_choice_done());
        assert!(!table.selected().is_empty());
    }

    #[test]
    fn test_choice_changed_signal() {
        let mut fx = Fixture::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let mut table = fx.build(abc().with_on_click(move |event| {
            if event.selected {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));
        fx.click(&mut table, 0);
        fx.click(&mut table, 0);
        fx.click(&mut table, 1);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shuffle_keeps_identity() {
        let mut fx = Fixture::new();
        let options = ChoiceTableOptions::new("q1", ["A", "B", "C", "D", "E", "F"])
            .with_shuffle_choices(true);
        let mut table = fx.build(options);
        fx.click(&mut table, 4);

        table
            .reset(&mut fx.ctx(), &ResetOptions { shuffle: true })
            .unwrap();
        assert_eq!(table.cells().len(), 6);
        for position in 0..6 {
            let value = table.get_choice_at_position(position).unwrap().clone();
            let cell = table.cell_node(&value).unwrap();
            let (index, _) = table.choice_for(&value).unwrap();
            assert_eq!(fx.doc.text_content(cell), ["A", "B", "C", "D", "E", "F"][index]);
        }
        assert_eq!(table.current_choice(), None);
    }

    #[test]
    fn test_choices_set_size_renders_subset() {
        let mut fx = Fixture::new();
        let options = ChoiceTableOptions::new("q1", ["A", "B", "C", "D"])
            .with_shuffle_choices(true)
            .with_choices_set_size(2);
        let table = fx.build(options);
        assert_eq!(table.order().len(), 4);
        assert_eq!(table.cells().len(), 2);
        for position in 0..2 {
            let value = table.get_choice_at_position(position).unwrap();
            assert!(table.cell_node(value).is_some());
        }
    }

    #[test]
    fn test_hidden_choices_cannot_be_selected() {
        let mut fx = Fixture::new();
        let options = ChoiceTableOptions::new("q1", ["A", "B", "C", "D"]).with_choices_set_size(2);
        let mut table = fx.build(options);
        let hidden = ChoiceValue::Index(3);
        assert!(table.cell_node(&hidden).is_none());

        let err = table
            .set_values(&mut fx.ctx(), &SetValuesOptions::values([hidden.clone()]))
            .unwrap_err();
        assert!(matches!(err, WidgetError::HiddenChoice { ref value, .. } if *value == hidden));
        assert!(table.selected().is_empty());

        let err = table
            .set_current_choice(&mut fx.ctx(), hidden.clone())
            .unwrap_err();
        assert!(matches!(err, WidgetError::HiddenChoice { .. }));
        let err = table.click_choice(&mut fx.ctx(), hidden).unwrap_err();
        assert!(matches!(err, WidgetError::HiddenChoice { .. }));
        assert_eq!(table.number_of_clicks(), 0);
        assert_eq!(table.current_choice(), None);

        table
            .set_values(&mut fx.ctx(), &SetValuesOptions::values([ChoiceValue::Index(1)]))
            .unwrap();
        assert_eq!(table.selected(), &[ChoiceValue::Index(1)]);
    }

    #[test]
    fn test_pair_values_and_labels() {
        let mut fx = Fixture::new();
        let options = ChoiceTableOptions::new(
            "mood",
            [Choice::pair("happy", "Happy"), Choice::pair("sad", "Sad")],
        );
        let mut table = fx.build(options);
        let cell = fx.doc.get_element_by_id("mood::sad").unwrap();
        table.handle_click(&mut fx.ctx(), cell).unwrap();

        let values = table
            .values_record(&mut fx.ctx(), &GetValuesOptions::default().with_add_value(true))
            .unwrap();
        assert_eq!(
            values.value,
            Some(CurrentChoice::Single(ChoiceValue::from("sad")))
        );
        assert_eq!(values.labels, Some(vec!["Sad".to_string()]));
    }

    #[test]
    fn test_free_text() {
        let mut fx = Fixture::new();
        let mut table = fx.build(abc().with_free_text("Comments"));
        table.set_free_text(&mut fx.doc, "none").unwrap();
        let values = table
            .values_record(&mut fx.ctx(), &GetValuesOptions::peek())
            .unwrap();
        assert_eq!(values.free_text.as_deref(), Some("none"));
    }

    #[test]
    fn test_configuration_errors() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();

        let empty = ChoiceTableOptions::new("q1", Vec::<Choice>::new());
        assert!(matches!(
            ChoiceTable::new(empty, &mut ctx),
            Err(WidgetError::EmptyChoices { .. })
        ));

        let duplicate = ChoiceTableOptions::new("q1", [Choice::pair("x", "X"), Choice::pair("x", "Y")]);
        assert!(matches!(
            ChoiceTable::new(duplicate, &mut ctx),
            Err(WidgetError::DuplicateChoiceValue { .. })
        ));

        let too_many = abc()
            .with_select_multiple(SelectMode::Multiple { max: Some(1) })
            .with_required_choice(RequiredChoice::AtLeast(2));
        assert!(matches!(
            ChoiceTable::new(too_many, &mut ctx),
            Err(WidgetError::InvalidOption { .. })
        ));

        let not_array = serde_json::json!({ "id": "q1", "choices": "A" });
        assert!(matches!(
            ChoiceTable::from_json(not_array, &mut ctx),
            Err(WidgetError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let mut fx = Fixture::new();
        let json = serde_json::json!({
            "id": "q2",
            "choices": ["Yes", "No", ["dk", "Don't know"]],
            "orientation": "V",
            "selectMultiple": 2,
            "requiredChoice": true,
            "freeText": true,
        });
        let table = ChoiceTable::from_json(json, &mut fx.ctx()).unwrap();
        assert_eq!(table.orientation(), Orientation::Vertical);
        assert_eq!(table.select_mode(), SelectMode::Multiple { max: Some(2) });
        assert!(table.is_required());
        assert_eq!(table.values()[2], ChoiceValue::from("dk"));
        assert_eq!(fx.doc.children(table.body()).len(), 3);
    }
}
