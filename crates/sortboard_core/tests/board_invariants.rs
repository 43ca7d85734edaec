use sortboard_core::{
    BoardConfig, BoardError, BoardState, Category, Item, ItemCatalog, ItemLocation, ManualClock,
    SortBoard,
};
use std::collections::HashSet;
use std::time::Duration;

fn setup() -> (SortBoard<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let board = SortBoard::new(ItemCatalog::produce(), BoardConfig::default(), clock.clone())
        .expect("board should build");
    (board, clock)
}

/// Checks both invariants from the outside, without `verify()`.
fn assert_partition(board: &SortBoard<ManualClock>) {
    let mut seen = HashSet::new();
    for item in board
        .uncategorized()
        .iter()
        .chain(board.fruits())
        .chain(board.vegetables())
    {
        assert!(seen.insert(item.id.clone()), "duplicate item {}", item.id);
    }
    let universe: HashSet<String> = board
        .catalog()
        .items()
        .iter()
        .map(|item| item.id.clone())
        .collect();
    assert_eq!(seen, universe);

    for item in board.catalog().items() {
        let categorized = !board.location_of(&item.id).unwrap().is_uncategorized();
        assert_eq!(
            board.has_pending(&item.id),
            categorized,
            "timer registry out of sync for {}",
            item.id
        );
    }
}

/// Small deterministic generator so runs are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }
}

#[test]
fn random_operation_sequences_preserve_invariants() {
    for seed in 0..20_u64 {
        let (mut board, clock) = setup();
        let ids: Vec<String> = board
            .catalog()
            .items()
            .iter()
            .map(|item| item.id.clone())
            .collect();
        let mut rng = Lcg(seed);

        for _ in 0..300 {
            let id = &ids[(rng.next() as usize) % ids.len()];
            match rng.next() % 5 {
                0 => board.activate(id).unwrap(),
                1 => board.deactivate(id).unwrap(),
                2 => {
                    board.handle_select(id).unwrap();
                }
                3 => clock.advance(Duration::from_millis(rng.next() % 3_000)),
                _ => {
                    board.poll_timers().unwrap();
                }
            }
            assert_partition(&board);
            board.verify().unwrap();
        }

        let replayed = BoardState::replay(board.catalog().clone(), board.actions()).unwrap();
        assert_eq!(&replayed, board.state(), "replay diverged for seed {seed}");
    }
}

#[test]
fn unknown_item_is_rejected_without_side_effects() {
    let (mut board, _clock) = setup();
    board.activate("Apple").unwrap();
    let before = board.snapshot();
    let actions_before = board.actions().len();

    for result in [
        board.activate("Durian"),
        board.deactivate("Durian"),
        board.handle_select("Durian").map(|_| ()),
    ] {
        assert_eq!(result, Err(BoardError::UnknownItem("Durian".to_string())));
    }
    assert_eq!(
        board.location_of("Durian"),
        Err(BoardError::UnknownItem("Durian".to_string()))
    );
    assert_eq!(board.snapshot(), before);
    assert_eq!(board.actions().len(), actions_before);
}

#[test]
fn boards_do_not_share_timers() {
    let clock = ManualClock::new();
    let mut first =
        SortBoard::new(ItemCatalog::produce(), BoardConfig::default(), clock.clone()).unwrap();
    let mut second =
        SortBoard::new(ItemCatalog::produce(), BoardConfig::default(), clock.clone()).unwrap();
    assert_ne!(first.id(), second.id());

    first.activate("Apple").unwrap();
    second.activate("Apple").unwrap();
    second.deactivate("Apple").unwrap();
    assert!(first.has_pending("Apple"));
    assert!(!second.has_pending("Apple"));

    second.dispose();
    clock.advance(Duration::from_millis(5_000));
    assert_eq!(first.poll_timers().unwrap(), vec!["Apple".to_string()]);
}

#[test]
fn select_dispatches_on_current_location() {
    let (mut board, _clock) = setup();
    assert_eq!(
        board.handle_select("Pineapple").unwrap(),
        ItemLocation::Categorized(Category::Fruit)
    );
    assert!(board.has_pending("Pineapple"));
    assert_eq!(board.category_a()[0].id, "Pineapple");
    assert!(board.category_b().is_empty());

    assert_eq!(
        board.handle_select("Pineapple").unwrap(),
        ItemLocation::Uncategorized
    );
    assert!(!board.has_pending("Pineapple"));
}

#[test]
fn custom_catalog_drives_its_own_universe() {
    let catalog = ItemCatalog::new(vec![
        Item::new("f-1", "Fig", Category::Fruit),
        Item::new("v-1", "Kale", Category::Vegetable),
    ])
    .unwrap();
    let mut board = SortBoard::new(catalog, BoardConfig::default(), ManualClock::new()).unwrap();

    board.activate("v-1").unwrap();
    assert_eq!(board.bucket(Category::Vegetable)[0].name, "Kale");
    assert_eq!(
        board.activate("Apple"),
        Err(BoardError::UnknownItem("Apple".to_string()))
    );
}

#[test]
fn zero_delay_config_is_rejected() {
    let config = BoardConfig { revert_delay_ms: 0 };
    let err = SortBoard::new(ItemCatalog::produce(), config, ManualClock::new())
        .err()
        .expect("zero delay must be rejected");
    assert!(matches!(err, BoardError::Config(_)));
}
