//! Tests spanning several widgets on one page.

use std::sync::Arc;

use choice_lattice_core::ManualClock;
use serde_json::json;

use super::widgets::{ChoiceTable, ChoiceTableGroup};
use super::*;
use crate::choice::ChoiceValue;
use crate::selection::CurrentChoice;
use crate::validation::{GetValuesOptions, WidgetValues};

fn page() -> Page {
    Page::new()
        .with_seed(9)
        .with_clock(Arc::new(ManualClock::new(0)))
}

#[test]
fn test_clicks_reach_the_owning_widget() {
    let mut page = page();
    let body = page.body();
    let first = page
        .add_widget("ChoiceTable", json!({ "id": "a", "choices": ["x", "y"] }), body)
        .unwrap();
    let second = page
        .add_widget("ChoiceTable", json!({ "id": "b", "choices": ["x", "y"] }), body)
        .unwrap();

    let cell = page.document().get_element_by_id("b::0").unwrap();
    assert!(page.click(cell).unwrap());

    assert_eq!(page.get::<ChoiceTable>(first).unwrap().number_of_clicks(), 0);
    assert_eq!(
        page.get::<ChoiceTable>(second).unwrap().current_choice(),
        Some(CurrentChoice::Single(ChoiceValue::Index(0)))
    );
}

#[test]
fn test_group_and_table_side_by_side() {
    let mut page = page();
    let body = page.body();
    let group = page
        .add_widget(
            "ChoiceTableGroup",
            json!({
                "id": "g",
                "items": [{ "id": "g1", "mainText": "One" }, { "id": "g2", "mainText": "Two" }],
                "choices": ["No", "Yes"],
                "requiredChoice": true,
            }),
            body,
        )
        .unwrap();
    let table = page
        .add_widget("ChoiceTable", json!({ "id": "t", "choices": ["A"] }), body)
        .unwrap();

    for id in ["g1::1", "g2::0", "t::0"] {
        let cell = page.document().get_element_by_id(id).unwrap();
        assert!(page.click(cell).unwrap());
    }

    let values = page.get_values(group, &GetValuesOptions::default()).unwrap();
    let WidgetValues::Group(values) = values else {
        panic!("expected group values");
    };
    assert!(values.is_correct);
    assert_eq!(values.items.len(), 2);
    assert!(page.get::<ChoiceTableGroup>(group).is_some());
    assert!(page.get::<ChoiceTableGroup>(table).is_none());
}

#[test]
fn test_with_widget_as_wrong_type() {
    let mut page = page();
    let body = page.body();
    let table = page
        .add_widget("ChoiceTable", json!({ "id": "t", "choices": ["A"] }), body)
        .unwrap();
    let result = page.with_widget_as::<ChoiceTableGroup, _>(table, |_, _| ());
    assert!(matches!(result, Err(crate::WidgetError::WidgetNotFound)));

    let clicks = page
        .with_widget_as::<ChoiceTable, _>(table, |table, ctx| {
            table.set_current_choice(ctx, ChoiceValue::Index(0)).unwrap();
            table.number_of_clicks()
        })
        .unwrap();
    assert_eq!(clicks, 0);
}

#[test]
fn test_peek_all_leaves_no_trace() {
    let mut page = page();
    let body = page.body();
    let table = page
        .add_widget(
            "ChoiceTable",
            json!({ "id": "t", "choices": ["A", "B"], "requiredChoice": true }),
            body,
        )
        .unwrap();
    let values = page.peek_all().unwrap();
    assert_eq!(values.len(), 1);
    assert!(!values[0].is_correct());

    let widget = page.widget(table).unwrap();
    assert!(!widget.is_highlighted());
    assert!(page.get::<ChoiceTable>(table).unwrap().attempts().is_empty());
}
