//! Cooperative reversal timers.
//!
//! # Responsibility
//! - Abstract the time source behind the `Clock` seam.
//! - Track pending per-item reversals owned by one board instance.
//!
//! # Invariants
//! - Timers never fire on their own; the owning board polls them.
//! - No timer state is process-wide.

pub mod clock;
pub mod registry;
