//! Choice Lattice Questionnaire Example
//!
//! Builds a single question and a shuffled group on a page, clicks through
//! some answers, prints the document tree and the collected values.
//!
//! Run with: RUST_LOG=choice_lattice=debug cargo run -p choice-lattice --example questionnaire

use choice_lattice::prelude::*;
use choice_lattice::DocumentTreeDebug;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn click(page: &mut Page, cell_id: &str) -> Result<()> {
    match page.document().get_element_by_id(cell_id) {
        Some(cell) => {
            page.click(cell)?;
        }
        None => println!("no cell {cell_id}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut page = Page::new().with_seed(2024);
    let body = page.body();

    let mood = page.add_widget(
        "ChoiceTable",
        json!({
            "id": "mood",
            "mainText": "How do you feel today?",
            "choices": ["Happy", "Neutral", "Sad"],
            "requiredChoice": true,
        }),
        body,
    )?;
    let habits = page.add_widget(
        "ChoiceTableGroup",
        json!({
            "id": "habits",
            "mainText": "Which of these apply to you?",
            "items": [
                { "id": "coffee", "mainText": "I drink coffee" },
                { "id": "sport", "mainText": "I play sports" },
                { "id": "music", "mainText": "I play music" },
            ],
            "choices": ["No", "Yes"],
            "shuffleItems": true,
            "requiredChoice": true,
            "freeText": "Anything else?",
        }),
        body,
    )?;

    // First read: nothing answered yet.
    for values in page.peek_all()? {
        println!("before: {}", values.to_json());
    }
    let first = page.get_values(habits, &GetValuesOptions::default())?;
    println!("habits correct: {}", first.is_correct());

    click(&mut page, "mood::0")?;
    click(&mut page, "coffee::1")?;
    click(&mut page, "sport::0")?;
    page.set_values(
        habits,
        &SetValuesOptions::default().with_item("music", SetValuesOptions::random()),
    )?;

    println!();
    println!("{}", DocumentTreeDebug::new().format_subtree(page.document(), body));

    let options = GetValuesOptions::default().with_add_value(true);
    for id in [mood, habits] {
        let values = page.get_values(id, &options)?;
        println!("after: {}", values.to_json());
    }
    Ok(())
}
