//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate board state transitions and reversal timers into the
//!   operations rendering surfaces call.
//! - Keep UI/FFI layers decoupled from timer bookkeeping.

pub mod sort_board;
