use sortboard_core::{
    BoardAction, BoardConfig, BoardSnapshot, Category, Item, ItemCatalog, ManualClock,
    ReturnCause, SortBoard,
};
use std::time::Duration;

#[test]
fn item_serialization_uses_expected_wire_fields() {
    let item = Item::named("Broccoli", Category::Vegetable);
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], "Broccoli");
    assert_eq!(json["name"], "Broccoli");
    assert_eq!(json["category"], "vegetable");
}

#[test]
fn action_log_is_tagged_by_type() {
    let clock = ManualClock::new();
    let mut board =
        SortBoard::new(ItemCatalog::produce(), BoardConfig::default(), clock.clone()).unwrap();
    board.activate("Orange").unwrap();
    clock.advance(Duration::from_secs(5));
    board.poll_timers().unwrap();

    let json = serde_json::to_value(board.actions()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "type": "move_to_category", "item_id": "Orange", "category": "fruit" },
            { "type": "return_item", "item_id": "Orange", "cause": "timeout" }
        ])
    );

    let decoded: Vec<BoardAction> = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, board.take_actions());
    assert!(board.actions().is_empty());
}

#[test]
fn return_action_rejects_unknown_cause() {
    let value = serde_json::json!({
        "type": "return_item",
        "item_id": "Apple",
        "cause": "eviction"
    });
    let err = serde_json::from_value::<BoardAction>(value).unwrap_err();
    assert!(err.to_string().contains("eviction"), "unexpected error: {err}");
    assert_eq!(ReturnCause::Timeout.as_str(), "timeout");
}

#[test]
fn snapshot_reports_pending_reversals() {
    let clock = ManualClock::new();
    let mut board =
        SortBoard::new(ItemCatalog::produce(), BoardConfig::default(), clock.clone()).unwrap();
    board.activate("Apple").unwrap();
    clock.advance(Duration::from_millis(2_000));
    board.activate("Carrot").unwrap();

    let snapshot = board.snapshot();
    assert_eq!(snapshot.uncategorized.len(), 9);
    assert_eq!(snapshot.pending.len(), 2);
    assert_eq!(snapshot.pending[0].item_id, "Apple");
    assert_eq!(snapshot.pending[0].remaining_ms, 3_000);
    assert_eq!(snapshot.pending[1].item_id, "Carrot");
    assert_eq!(snapshot.pending[1].remaining_ms, 5_000);

    let json = serde_json::to_string(&snapshot).unwrap();
    let decoded: BoardSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, snapshot);
}

#[test]
fn config_deserializes_with_defaults() {
    let config: BoardConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, BoardConfig::default());
    let config: BoardConfig = serde_json::from_str(r#"{"revert_delay_ms": 750}"#).unwrap();
    assert_eq!(config.revert_delay(), Duration::from_millis(750));
}
