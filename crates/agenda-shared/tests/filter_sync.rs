use agenda_shared::fragment::{decode, encode, parse, with_marker};
use agenda_shared::projector::project;
use agenda_shared::{
    ALL, Axis, FilterBinder, FilterView, ListItem, Location, MemoryLocation, Projection,
    SelectorState,
};
use proptest::prelude::*;

#[derive(Default)]
struct Page {
    items: Vec<ListItem>,
    date: String,
    kind: String,
    shown: Vec<bool>,
    empty: bool,
}

impl FilterView for Page {
    fn set_selector(&mut self, axis: Axis, value: &str) {
        match axis {
            Axis::Date => self.date = value.to_string(),
            Axis::Type => self.kind = value.to_string(),
        }
    }

    fn items(&self) -> Vec<ListItem> {
        self.items.clone()
    }

    fn apply(&mut self, projection: &Projection) {
        self.shown = projection.flags().to_vec();
    }

    fn set_empty(&mut self, empty: bool) {
        self.empty = empty;
    }
}

fn fixture() -> Vec<ListItem> {
    serde_json::from_str(
        r#"[
            {"id": "6216", "date": "july 10", "type": "music"},
            {"id": "6217", "date": "july 10", "type": "talk"},
            {"id": "6218", "date": "july 11", "type": "music"},
            {"id": "6219", "date": "july 11", "type": "workshop"}
        ]"#,
    )
    .expect("fixture json")
}

fn visible_ids(state: &SelectorState, items: &[ListItem]) -> Vec<String> {
    project(state, items)
        .select(items)
        .filter_map(|item| item.id.clone())
        .collect()
}

#[test]
fn type_filter_ignores_date() {
    let items = fixture();
    let state = parse("#!date=all&type=music").unwrap();
    assert_eq!(visible_ids(&state, &items), vec!["6216", "6218"]);
}

#[test]
fn date_filter_matches_spaced_label() {
    let items = fixture();
    let state = parse("#!date=july_10&type=all").unwrap();
    assert_eq!(visible_ids(&state, &items), vec!["6216", "6217"]);
}

#[test]
fn combined_filter_reports_empty_state() {
    let items = fixture();
    let hit = project(&parse("#!date=july_10&type=music").unwrap(), &items);
    assert_eq!(hit.visible_count(), 1);
    assert!(!hit.is_empty());

    let miss = project(&parse("#!date=july_10&type=workshop").unwrap(), &items);
    assert!(miss.is_empty());
}

#[test]
fn initial_load_heals_and_widget_edit_keeps_other_axis() {
    let page = Page {
        items: fixture(),
        ..Page::default()
    };
    let mut binder = FilterBinder::new(MemoryLocation::new(""), page);

    binder.on_fragment_change();
    assert_eq!(binder.location().fragment(), "#!date=all&type=all");
    assert_eq!(binder.view().shown, vec![true; 4]);

    binder.on_select(Axis::Date, "july_10");
    binder.on_fragment_change();
    binder.on_select(Axis::Type, "workshop");
    assert_eq!(
        binder.location().fragment(),
        "#!date=july_10&type=workshop"
    );

    binder.on_fragment_change();
    assert_eq!(binder.view().date, "july_10");
    assert_eq!(binder.view().kind, "workshop");
    assert!(binder.view().empty);

    binder.reset();
    binder.on_fragment_change();
    assert_eq!(binder.view().date, ALL);
    assert!(!binder.view().empty);
    assert_eq!(
        binder.location().writes(),
        &[
            "#!date=all&type=all".to_string(),
            "#!date=july_10&type=all".to_string(),
            "#!date=july_10&type=workshop".to_string(),
            "#!date=all&type=all".to_string(),
        ]
    );
}

#[test]
fn browser_escaped_hash_selects_spaced_type() {
    let items = vec![
        ListItem::new("july 10", "poster session").with_id("1"),
        ListItem::new("july 10", "talk").with_id("2"),
    ];
    let state = parse("#!date=all&type=poster%20session").unwrap();
    assert_eq!(state.kind, "poster session");
    assert_eq!(visible_ids(&state, &items), vec!["1"]);
}

#[test]
fn back_navigation_rederives_state() {
    let page = Page {
        items: fixture(),
        ..Page::default()
    };
    let mut binder = FilterBinder::new(MemoryLocation::new("#!date=july_11&type=all"), page);
    binder.on_fragment_change();
    assert_eq!(binder.view().shown, vec![false, false, true, true]);

    let mut location = binder.location().clone();
    location.set_fragment("#!date=all&type=talk");
    let mut binder = FilterBinder::new(location, Page { items: fixture(), ..Page::default() });
    binder.on_fragment_change();
    assert_eq!(binder.view().shown, vec![false, true, false, false]);
}

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(ALL.to_string()),
        "[a-z0-9]{1,8}( [a-z0-9]{1,4})?",
        "[a-z0-9&=%#é]{1,10}",
    ]
}

proptest! {
    #[test]
    fn encode_then_decode_is_identity(date in key(), kind in key()) {
        let state = SelectorState::new(&date, kind);
        let mut location = MemoryLocation::new(with_marker(&state));
        prop_assert_eq!(decode(&mut location), state.clone());
        prop_assert_eq!(parse(&encode(&state)), Some(state));
        prop_assert!(location.writes().is_empty());
    }

    #[test]
    fn unfiltered_projection_keeps_every_item(dates in proptest::collection::vec("[a-z ]{0,6}", 0..12)) {
        let items: Vec<ListItem> = dates.iter().map(|d| ListItem::new(d.clone(), "x")).collect();
        let projection = project(&SelectorState::default(), &items);
        prop_assert_eq!(projection.visible_count(), items.len());
    }
}
