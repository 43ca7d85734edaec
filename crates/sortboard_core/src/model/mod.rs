//! Domain model for board items.
//!
//! # Responsibility
//! - Define canonical item structures shared by the engine and its surfaces.
//! - Own the fixed item universe a board is constructed from.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Items are never created or destroyed after a catalog is built.

pub mod catalog;
pub mod item;
