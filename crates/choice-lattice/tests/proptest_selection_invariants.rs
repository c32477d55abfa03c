//! Property-based invariant tests for choice ordering and selection.
//!
//! 1. A shuffled order is a permutation and its inverse undoes it.
//! 2. Every rendered cell maps back to the value it was built for.
//! 3. Single selection never holds more than the last clicked value.
//! 4. Capped multiple selection never exceeds its cap.
//! 5. Group items_map inverts the item order.

use std::sync::Arc;

use choice_lattice::prelude::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ── Helpers ─────────────────────────────────────────────────────────────

fn page(seed: u64) -> Page {
    Page::new()
        .with_seed(seed)
        .with_clock(Arc::new(ManualClock::new(0)))
}

fn choices(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("c{i}")).collect()
}

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)]
}

fn mount(page: &mut Page, options: ChoiceTableOptions) -> WidgetId {
    let body = page.body();
    page.add(body, |ctx| ChoiceTable::new(options, ctx))
        .expect("table builds")
}

fn click_index(page: &mut Page, id: WidgetId, index: usize) {
    let node = page
        .get::<ChoiceTable>(id)
        .and_then(|table| table.cell_node(&ChoiceValue::Index(index)))
        .expect("cell exists");
    page.click(node).expect("click dispatches");
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Shuffled order is a permutation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shuffled_order_is_permutation(n in 0usize..64, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let order = Order::shuffled(n, &mut rng);

        let mut sorted = order.as_slice().to_vec();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());

        let inverse = order.inverse();
        for position in 0..n {
            let index = order[position];
            prop_assert_eq!(inverse[index], position);
            prop_assert_eq!(order.position_of(index), Some(position));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Cells resolve to their values
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rendered_cells_round_trip(
        n in 1usize..12,
        seed in any::<u64>(),
        shuffle in any::<bool>(),
        orientation in orientation_strategy(),
    ) {
        let mut page = page(seed);
        let id = mount(
            &mut page,
            ChoiceTableOptions::new("t", choices(n))
                .with_shuffle_choices(shuffle)
                .with_orientation(orientation),
        );
        let table = page.get::<ChoiceTable>(id).expect("table");

        prop_assert_eq!(table.cells().len(), n);
        for index in 0..n {
            let value = ChoiceValue::Index(index);
            let node = table.cell_node(&value).expect("cell");
            let key = table.cells().resolve(node).expect("key");
            prop_assert_eq!(&key.value, &value);
            let identifier = format!("t::{index}");
            prop_assert_eq!(page.document().id(node), Some(identifier.as_str()));
            prop_assert_eq!(page.document().text_content(node), format!("c{index}"));
        }
        for position in 0..n {
            let value = table.get_choice_at_position(position).expect("position");
            prop_assert_eq!(value, &ChoiceValue::Index(table.order()[position]));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Single selection holds the last click
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_selection_holds_last_click(
        n in 1usize..8,
        clicks in prop::collection::vec(any::<prop::sample::Index>(), 1..20),
    ) {
        let mut page = page(1);
        let id = mount(&mut page, ChoiceTableOptions::new("s", choices(n)));

        let mut last = None;
        for click in &clicks {
            let index = click.index(n);
            click_index(&mut page, id, index);
            last = Some(index);
        }

        let table = page.get::<ChoiceTable>(id).expect("table");
        prop_assert_eq!(table.selected().len(), 1);
        prop_assert_eq!(
            table.current_choice(),
            last.map(|index| CurrentChoice::Single(ChoiceValue::Index(index)))
        );
        prop_assert_eq!(table.number_of_clicks() as usize, clicks.len());

        let marked = (0..n)
            .filter(|&i| {
                let node = table.cell_node(&ChoiceValue::Index(i)).expect("cell");
                page.document().has_class(node, "selected")
            })
            .count();
        prop_assert_eq!(marked, 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Capped multiple selection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn multiple_selection_respects_cap(
        n in 2usize..8,
        max in 1usize..4,
        clicks in prop::collection::vec(any::<prop::sample::Index>(), 0..24),
    ) {
        let mut page = page(2);
        let id = mount(
            &mut page,
            ChoiceTableOptions::new("m", choices(n))
                .with_select_multiple(SelectMode::Multiple { max: Some(max) }),
        );

        for click in &clicks {
            click_index(&mut page, id, click.index(n));
            let table = page.get::<ChoiceTable>(id).expect("table");
            prop_assert!(table.selected().len() <= max);
        }

        let table = page.get::<ChoiceTable>(id).expect("table");
        let mut selected = table.selected().to_vec();
        selected.sort();
        selected.dedup();
        prop_assert_eq!(selected.len(), table.selected().len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Group items_map inverts the order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn group_items_map_inverts_order(items in 1usize..8, seed in any::<u64>()) {
        let mut page = page(seed);
        let body = page.body();
        let options = ChoiceTableGroupOptions::new(
            "g",
            (0..items).map(|i| GroupItemOptions::new(format!("g{i}"), format!("Item {i}"))),
            ["No", "Yes"],
        )
        .with_shuffle_items(true);
        let id = page
            .add(body, |ctx| ChoiceTableGroup::new(options, ctx))
            .expect("group builds");
        let group = page.get::<ChoiceTableGroup>(id).expect("group");

        prop_assert_eq!(group.items_map().len(), items);
        for (index, item) in group.items().iter().enumerate() {
            let position = group.items_map()[item.id()];
            prop_assert_eq!(group.order()[position], index);
        }
    }
}
