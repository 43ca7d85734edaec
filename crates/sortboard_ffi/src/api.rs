//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level board functions to Dart via FRB.
//! - Keep error semantics simple: every board call returns an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each `BoardHandle` owns its own engine; no board state is process-wide.
//! - Dart drives reversals by calling `poll` after `next_poll_in_ms` elapses.

use flutter_rust_bridge::frb;
use log::warn;
use sortboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BoardConfig, BoardError, BoardSnapshot, Clock, ConfigError, Item, ItemCatalog, LogTarget,
    SortBoard, SystemClock,
};
use std::sync::{Mutex, MutexGuard};

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Starts the `sortboard_ffi` rolling log once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `log_dir`.
/// - A different `log_dir` after the first success returns an error.
/// - Never panics; returns empty string on success and error message on failure.
#[frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let started = BoardConfig::from_env()
        .map_err(|err| err.to_string())
        .and_then(|config| {
            LogTarget::new("ffi", &level, &log_dir)
                .and_then(|target| init_logging_inner(target, &config))
                .map_err(|err| err.to_string())
        });
    match started {
        Ok(()) => String::new(),
        Err(message) => message,
    }
}

/// One item as rendered by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItemView {
    pub id: String,
    pub name: String,
    /// `fruit|vegetable`.
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReversalView {
    pub item_id: String,
    pub remaining_ms: u64,
}

/// Full board state for one re-render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardView {
    pub uncategorized: Vec<BoardItemView>,
    pub fruits: Vec<BoardItemView>,
    pub vegetables: Vec<BoardItemView>,
    pub pending: Vec<PendingReversalView>,
}

/// Response envelope for every board call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Board state after the call (last known state on failure).
    pub view: BoardView,
}

/// Result of opening a board.
pub struct BoardOpenResponse {
    pub ok: bool,
    pub message: String,
    pub board: Option<BoardHandle>,
}

type HostClock = Box<dyn Clock + Send>;

/// Opaque handle owning one board.
#[frb(opaque)]
pub struct BoardHandle {
    board: Mutex<SortBoard<HostClock>>,
}

/// Opens a produce board.
///
/// `revert_delay_ms = None` reads `SORTBOARD_REVERT_DELAY_MS`, falling back to
/// the built-in default.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; `board` is `None` when configuration is invalid.
#[frb(sync)]
pub fn open_board(revert_delay_ms: Option<u64>) -> BoardOpenResponse {
    let config = match revert_delay_ms {
        Some(revert_delay_ms) => Ok(BoardConfig { revert_delay_ms }),
        None => BoardConfig::from_env(),
    };
    open_with_clock(config, Box::new(SystemClock::new()))
}

fn open_with_clock(
    config: Result<BoardConfig, ConfigError>,
    clock: HostClock,
) -> BoardOpenResponse {
    let opened = config
        .map_err(BoardError::from)
        .and_then(|config| SortBoard::new(ItemCatalog::produce(), config, clock));
    match opened {
        Ok(board) => BoardOpenResponse {
            ok: true,
            message: format!("Board {} opened.", board.id()),
            board: Some(BoardHandle {
                board: Mutex::new(board),
            }),
        },
        Err(err) => BoardOpenResponse {
            ok: false,
            message: format!("open_board failed: {err}"),
            board: None,
        },
    }
}

impl BoardHandle {
    /// Toggles one item (click handler).
    #[frb(sync)]
    pub fn select(&self, item_id: String) -> BoardResponse {
        self.run("select", |board| {
            let location = board.handle_select(item_id.trim())?;
            Ok(format!("{} -> {}", item_id.trim(), location.as_str()))
        })
    }

    #[frb(sync)]
    pub fn activate(&self, item_id: String) -> BoardResponse {
        self.run("activate", |board| {
            board.activate(item_id.trim())?;
            Ok(format!("{} activated.", item_id.trim()))
        })
    }

    #[frb(sync)]
    pub fn deactivate(&self, item_id: String) -> BoardResponse {
        self.run("deactivate", |board| {
            board.deactivate(item_id.trim())?;
            Ok(format!("{} returned.", item_id.trim()))
        })
    }

    /// Fires matured reversals.
    #[frb(sync)]
    pub fn poll(&self) -> BoardResponse {
        self.run("poll", |board| {
            let returned = board.poll_timers()?;
            Ok(if returned.is_empty() {
                "No reversals due.".to_string()
            } else {
                format!("Returned {}.", returned.join(", "))
            })
        })
    }

    #[frb(sync)]
    pub fn snapshot(&self) -> BoardResponse {
        self.run("snapshot", |_| Ok(String::new()))
    }

    /// Milliseconds until Dart should call `poll` again; `None` when idle.
    #[frb(sync)]
    pub fn next_poll_in_ms(&self) -> Option<u64> {
        let board = self.lock().ok()?;
        board
            .time_until_next()
            .map(|left| u64::try_from(left.as_millis()).unwrap_or(u64::MAX))
    }

    /// Cancels every pending reversal. Must be called when the view unmounts.
    #[frb(sync)]
    pub fn dispose(&self) -> BoardResponse {
        match self.lock() {
            Ok(mut board) => {
                let cancelled = board.dispose();
                BoardResponse {
                    ok: true,
                    message: format!("Board disposed; {cancelled} timer(s) cancelled."),
                    view: to_view(board.snapshot()),
                }
            }
            Err(message) => failure(message, BoardView::default()),
        }
    }

    fn run(
        &self,
        op: &str,
        f: impl FnOnce(&mut SortBoard<HostClock>) -> Result<String, BoardError>,
    ) -> BoardResponse {
        let mut board = match self.lock() {
            Ok(board) => board,
            Err(message) => return failure(message, BoardView::default()),
        };
        let outcome = f(&mut board);
        let view = to_view(board.snapshot());
        match outcome {
            Ok(message) => BoardResponse {
                ok: true,
                message,
                view,
            },
            Err(err) => {
                warn!("event=ffi_call module=ffi status=error op={op} error={err}");
                failure(format!("{op} failed: {err}"), view)
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SortBoard<HostClock>>, String> {
        self.board
            .lock()
            .map_err(|_| "board lock poisoned".to_string())
    }
}

fn failure(message: String, view: BoardView) -> BoardResponse {
    BoardResponse {
        ok: false,
        message,
        view,
    }
}

fn to_view(snapshot: BoardSnapshot) -> BoardView {
    BoardView {
        uncategorized: snapshot.uncategorized.into_iter().map(to_item_view).collect(),
        fruits: snapshot.fruits.into_iter().map(to_item_view).collect(),
        vegetables: snapshot.vegetables.into_iter().map(to_item_view).collect(),
        pending: snapshot
            .pending
            .into_iter()
            .map(|pending| PendingReversalView {
                item_id: pending.item_id,
                remaining_ms: pending.remaining_ms,
            })
            .collect(),
    }
}

fn to_item_view(item: Item) -> BoardItemView {
    BoardItemView {
        id: item.id,
        name: item.name,
        category: item.category.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{core_version, init_logging, open_board, open_with_clock, ping, BoardHandle};
    use sortboard_core::{BoardConfig, ManualClock};
    use std::time::Duration;

    fn open(delay_ms: u64) -> BoardHandle {
        let response = open_board(Some(delay_ms));
        assert!(response.ok, "{}", response.message);
        response.board.expect("open should return a board")
    }

    fn open_manual(delay_ms: u64) -> (BoardHandle, ManualClock) {
        let clock = ManualClock::new();
        let config = BoardConfig {
            revert_delay_ms: delay_ms,
        };
        let response = open_with_clock(Ok(config), Box::new(clock.clone()));
        assert!(response.ok, "{}", response.message);
        (response.board.expect("open should return a board"), clock)
    }

    fn ids(items: &[super::BoardItemView]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn open_board_rejects_zero_delay() {
        let response = open_board(Some(0));
        assert!(!response.ok);
        assert!(response.board.is_none());
        assert!(response.message.contains("greater than zero"));
    }

    #[test]
    fn select_toggles_and_reports_view() {
        let board = open(60_000);

        let response = board.select(" Apple ".to_string());
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.message, "Apple -> fruit");
        assert_eq!(ids(&response.view.fruits), vec!["Apple"]);
        assert_eq!(response.view.pending.len(), 1);
        assert!(board.next_poll_in_ms().is_some());

        let response = board.select("Apple".to_string());
        assert!(response.ok, "{}", response.message);
        assert!(response.view.fruits.is_empty());
        assert!(response.view.pending.is_empty());
        assert_eq!(board.next_poll_in_ms(), None);
    }

    #[test]
    fn unknown_item_returns_failure_envelope() {
        let board = open(60_000);
        let response = board.activate("Durian".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("item not found: Durian"));
        assert_eq!(response.view.uncategorized.len(), 11);
    }

    #[test]
    fn poll_returns_matured_items() {
        let (board, clock) = open_manual(5_000);
        assert!(board.activate("Carrot".to_string()).ok);
        clock.advance(Duration::from_millis(2_000));
        assert!(board.activate("Mango".to_string()).ok);
        assert_eq!(board.next_poll_in_ms(), Some(3_000));

        clock.advance(Duration::from_millis(2_999));
        let response = board.poll();
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.message, "No reversals due.");
        assert_eq!(response.view.vegetables.len(), 1);

        clock.advance(Duration::from_millis(1));
        let response = board.poll();
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.message, "Returned Carrot.");
        assert!(response.view.vegetables.is_empty());
        assert_eq!(response.view.pending.len(), 1);
        assert_eq!(response.view.pending[0].item_id, "Mango");
        assert_eq!(board.next_poll_in_ms(), Some(2_000));
    }

    #[test]
    fn dispose_cancels_and_blocks_further_calls() {
        let board = open(60_000);
        assert!(board.activate("Mango".to_string()).ok);
        assert!(board.deactivate("Mango".to_string()).ok);
        assert!(board.activate("Banana".to_string()).ok);

        let response = board.dispose();
        assert!(response.ok);
        assert!(response.message.contains("1 timer(s) cancelled"));
        assert!(response.view.pending.is_empty());

        let response = board.select("Apple".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("disposed"));
        assert!(board.snapshot().ok);
    }
}
