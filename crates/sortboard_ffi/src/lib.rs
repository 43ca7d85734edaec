//! Flutter-facing bridge crate for SortBoard.

pub mod api;
