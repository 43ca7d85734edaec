//! Core categorization engine for SortBoard.
//! This crate is the single source of truth for board invariants.

pub mod board;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod timer;

pub use board::action::{BoardAction, ReturnCause};
pub use board::state::{BoardState, ItemLocation};
pub use board::{BoardError, BoardResult};
pub use config::{BoardConfig, ConfigError, DEFAULT_REVERT_DELAY_MS, REVERT_DELAY_ENV};
pub use logging::{init_logging, LogLevel, LogTarget, LoggingError, LOG_DIR_ENV, LOG_LEVEL_ENV};
pub use model::catalog::{CatalogError, ItemCatalog};
pub use model::item::{Category, Item, ItemId};
pub use service::sort_board::{BoardId, BoardSnapshot, PendingReversal, SortBoard};
pub use timer::clock::{Clock, ManualClock, SystemClock};
pub use timer::registry::{TimerHandle, TimerRegistry};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
