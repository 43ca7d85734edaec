//! Per-board registry of pending reversal timers.
//!
//! # Responsibility
//! - Track at most one live timer per item id.
//! - Hand matured timers back to the owner in deadline order.
//!
//! # Invariants
//! - `by_item` and `queue` always hold the same set of timers.
//! - Tokens increase monotonically and are never reused, so a handle that was
//!   cancelled or replaced can never match a live entry again.

use crate::model::item::ItemId;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle for one scheduled reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle {
    pub token: u64,
    /// Offset on the owning board's clock.
    pub deadline: Duration,
}

#[derive(Debug, Default)]
pub struct TimerRegistry {
    next_token: u64,
    by_item: HashMap<ItemId, TimerHandle>,
    queue: BTreeMap<(Duration, u64), ItemId>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a reversal for `item_id`, cancelling any earlier one.
    pub fn schedule(&mut self, item_id: &str, deadline: Duration) -> TimerHandle {
        self.cancel(item_id);
        self.next_token += 1;
        let handle = TimerHandle {
            token: self.next_token,
            deadline,
        };
        self.by_item.insert(item_id.to_string(), handle);
        self.queue
            .insert((deadline, handle.token), item_id.to_string());
        handle
    }

    /// Cancels the timer for `item_id`. Absent entries are a no-op.
    pub fn cancel(&mut self, item_id: &str) -> Option<TimerHandle> {
        let handle = self.by_item.remove(item_id)?;
        self.queue.remove(&(handle.deadline, handle.token));
        Some(handle)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.by_item.contains_key(item_id)
    }

    pub fn handle(&self, item_id: &str) -> Option<TimerHandle> {
        self.by_item.get(item_id).copied()
    }

    /// Iterates pending timers in deadline order.
    pub fn pending(&self) -> impl Iterator<Item = (&str, TimerHandle)> + '_ {
        self.queue
            .iter()
            .map(|(&(deadline, token), item_id)| (item_id.as_str(), TimerHandle { token, deadline }))
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes and returns every timer whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Duration) -> Vec<(ItemId, TimerHandle)> {
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            let (deadline, token) = *entry.key();
            if deadline > now {
                break;
            }
            let item_id = entry.remove();
            self.by_item.remove(&item_id);
            due.push((item_id, TimerHandle { token, deadline }));
        }
        due
    }

    /// Cancels every pending timer and returns how many were live.
    pub fn clear(&mut self) -> usize {
        let count = self.by_item.len();
        self.by_item.clear();
        self.queue.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.by_item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_item.is_empty()
    }
}
