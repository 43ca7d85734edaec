//! Item categorization engine.
//!
//! # Responsibility
//! - Drive `BoardState` transitions for activate/deactivate/select calls.
//! - Own the pending reversal timers of one board and fire them when polled.
//! - Record every applied transition in a replayable action log.
//!
//! # Invariants
//! - An id has a pending timer iff its item sits in a category collection
//!   (until the board is disposed, after which no timer exists at all).
//! - A matured timer whose item was already returned is reported as
//!   `InconsistentState` and dropped, never applied twice.
//! - Unknown ids and disposed boards are rejected before any mutation.

use crate::board::action::{BoardAction, ReturnCause};
use crate::board::state::{return_action, BoardState, ItemLocation};
use crate::board::{BoardError, BoardResult};
use crate::config::BoardConfig;
use crate::model::catalog::ItemCatalog;
use crate::model::item::{Category, Item, ItemId};
use crate::timer::clock::{Clock, SystemClock};
use crate::timer::registry::TimerRegistry;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Stable identifier for one board instance, used to tell coexisting boards
/// apart in logs.
pub type BoardId = Uuid;

/// One pending auto-reversal as seen by a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReversal {
    pub item_id: ItemId,
    pub remaining_ms: u64,
}

/// Render-ready copy of one board's collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub uncategorized: Vec<Item>,
    pub fruits: Vec<Item>,
    pub vegetables: Vec<Item>,
    /// Ordered by deadline, soonest first.
    pub pending: Vec<PendingReversal>,
}

/// Categorization engine over a fixed catalog.
///
/// All mutations take `&mut self`, so manual calls and timer reversals never
/// interleave. Reversals run only inside [`SortBoard::poll_timers`].
pub struct SortBoard<C: Clock = SystemClock> {
    id: BoardId,
    state: BoardState,
    timers: TimerRegistry,
    clock: C,
    delay: Duration,
    actions: Vec<BoardAction>,
    disposed: bool,
}

impl SortBoard<SystemClock> {
    /// Builds a wall-clock board over the built-in produce catalog.
    pub fn produce(config: BoardConfig) -> BoardResult<Self> {
        Self::new(ItemCatalog::produce(), config, SystemClock::new())
    }
}

impl<C: Clock> SortBoard<C> {
    /// Creates a board with every catalog item uncategorized.
    ///
    /// # Errors
    /// - `Config` when `config` carries a zero delay.
    pub fn new(catalog: ItemCatalog, config: BoardConfig, clock: C) -> BoardResult<Self> {
        config.validate()?;
        let board = Self {
            id: Uuid::new_v4(),
            state: BoardState::new(catalog),
            timers: TimerRegistry::new(),
            clock,
            delay: config.revert_delay(),
            actions: Vec::new(),
            disposed: false,
        };
        info!(
            "event=board_created module=board status=ok board_id={} items={} delay_ms={}",
            board.id,
            board.state.catalog().len(),
            config.revert_delay_ms
        );
        Ok(board)
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn revert_delay(&self) -> Duration {
        self.delay
    }

    pub fn catalog(&self) -> &ItemCatalog {
        self.state.catalog()
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn uncategorized(&self) -> &[Item] {
        self.state.uncategorized()
    }

    pub fn fruits(&self) -> &[Item] {
        self.state.fruits()
    }

    pub fn vegetables(&self) -> &[Item] {
        self.state.vegetables()
    }

    /// Alias for [`SortBoard::fruits`].
    pub fn category_a(&self) -> &[Item] {
        self.fruits()
    }

    /// Alias for [`SortBoard::vegetables`].
    pub fn category_b(&self) -> &[Item] {
        self.vegetables()
    }

    pub fn bucket(&self, category: Category) -> &[Item] {
        self.state.bucket(category)
    }

    pub fn location_of(&self, id: &str) -> BoardResult<ItemLocation> {
        self.state.location_of(id)
    }

    pub fn has_pending(&self, id: &str) -> bool {
        self.timers.contains(id)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Applied transitions since construction or the last `take_actions`.
    pub fn actions(&self) -> &[BoardAction] {
        &self.actions
    }

    pub fn take_actions(&mut self) -> Vec<BoardAction> {
        std::mem::take(&mut self.actions)
    }

    /// Moves an item into its category and (re)starts its reversal timer.
    ///
    /// # Contract
    /// - Any earlier timer for the item is cancelled first.
    /// - The item ends in exactly one category collection with one live timer
    ///   maturing `revert_delay` after this call.
    ///
    /// # Errors
    /// - `UnknownItem` for ids outside the catalog; state is untouched.
    /// - `Disposed` after [`SortBoard::dispose`].
    pub fn activate(&mut self, id: &str) -> BoardResult<()> {
        self.ensure_live()?;
        let category = self.state.item(id)?.category;

        self.timers.cancel(id);
        let action = BoardAction::MoveToCategory {
            item_id: id.to_string(),
            category,
        };
        if self.state.apply(&action)? {
            self.actions.push(action);
        }
        let handle = self.timers.schedule(id, self.clock.now() + self.delay);

        info!(
            "event=item_activated module=board status=ok board_id={} item_id={} category={} deadline_ms={}",
            self.id,
            id,
            category,
            handle.deadline.as_millis()
        );
        self.check_invariants()
    }

    /// Returns an item to `uncategorized` and cancels its pending reversal.
    ///
    /// Calling this on an already uncategorized item changes nothing.
    ///
    /// # Errors
    /// - `UnknownItem` for ids outside the catalog; state is untouched.
    /// - `Disposed` after [`SortBoard::dispose`].
    pub fn deactivate(&mut self, id: &str) -> BoardResult<()> {
        self.ensure_live()?;
        self.state.item(id)?;

        let cancelled = self.timers.cancel(id).is_some();
        let changed = self.return_item(id, ReturnCause::Manual)?;
        info!(
            "event=item_deactivated module=board status=ok board_id={} item_id={} changed={} timer_cancelled={}",
            self.id, id, changed, cancelled
        );
        self.check_invariants()
    }

    /// Toggles an item: activates it when uncategorized, deactivates otherwise.
    ///
    /// Returns the item's location after the call.
    pub fn handle_select(&mut self, id: &str) -> BoardResult<ItemLocation> {
        self.ensure_live()?;
        if self.state.location_of(id)?.is_uncategorized() {
            self.activate(id)?;
        } else {
            self.deactivate(id)?;
        }
        self.state.location_of(id)
    }

    /// Fires every reversal whose deadline has passed on the board clock.
    ///
    /// Returns the ids that were moved back, in deadline order.
    ///
    /// # Errors
    /// - `InconsistentState` when a matured timer belongs to an item that is
    ///   already uncategorized. Every other matured timer is still applied, so
    ///   no categorized item is left without its reversal.
    pub fn poll_timers(&mut self) -> BoardResult<Vec<ItemId>> {
        self.ensure_live()?;
        let now = self.clock.now();
        let mut returned = Vec::new();
        let mut first_error = None;

        for (item_id, handle) in self.timers.take_due(now) {
            match self.fire(&item_id) {
                Ok(()) => {
                    info!(
                        "event=timer_fired module=board status=ok board_id={} item_id={} token={} late_ms={}",
                        self.id,
                        item_id,
                        handle.token,
                        now.saturating_sub(handle.deadline).as_millis()
                    );
                    returned.push(item_id);
                }
                Err(err) => {
                    error!(
                        "event=timer_stale module=board status=error board_id={} item_id={} token={} detail={}",
                        self.id, item_id, handle.token, err
                    );
                    first_error.get_or_insert(err);
                }
            }
        }

        if !returned.is_empty() || first_error.is_some() {
            self.check_invariants()?;
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(returned),
        }
    }

    /// Deadline of the next pending reversal on the board clock.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Time left until the next reversal matures; zero when already due.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    /// Cancels every pending timer and refuses further mutations.
    ///
    /// Returns the number of cancelled timers; repeated calls return 0.
    pub fn dispose(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        self.disposed = true;
        let cancelled = self.timers.clear();
        info!(
            "event=board_disposed module=board status=ok board_id={} cancelled_timers={}",
            self.id, cancelled
        );
        cancelled
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let now = self.clock.now();
        BoardSnapshot {
            uncategorized: self.uncategorized().to_vec(),
            fruits: self.fruits().to_vec(),
            vegetables: self.vegetables().to_vec(),
            pending: self
                .timers
                .pending()
                .map(|(item_id, handle)| PendingReversal {
                    item_id: item_id.to_string(),
                    remaining_ms: u64::try_from(handle.deadline.saturating_sub(now).as_millis())
                        .unwrap_or(u64::MAX),
                })
                .collect(),
        }
    }

    /// Checks collection and timer registry invariants.
    ///
    /// # Errors
    /// - `InconsistentState` describing the first violation found.
    pub fn verify(&self) -> BoardResult<()> {
        self.state.verify()?;
        for (item_id, _) in self.timers.pending() {
            if self.state.location_of(item_id)?.is_uncategorized() {
                return Err(BoardError::InconsistentState(format!(
                    "uncategorized item `{item_id}` still has a pending timer"
                )));
            }
        }
        if !self.disposed {
            for item in self.fruits().iter().chain(self.vegetables()) {
                if !self.timers.contains(&item.id) {
                    return Err(BoardError::InconsistentState(format!(
                        "categorized item `{}` has no pending timer",
                        item.id
                    )));
                }
            }
        }
        Ok(())
    }

    fn return_item(&mut self, id: &str, cause: ReturnCause) -> BoardResult<bool> {
        let action = return_action(id, cause);
        let changed = self.state.apply(&action)?;
        if changed {
            self.actions.push(action);
        }
        debug!(
            "event=item_returned module=board board_id={} item_id={} cause={} changed={}",
            self.id,
            id,
            cause.as_str(),
            changed
        );
        Ok(changed)
    }

    fn fire(&mut self, item_id: &str) -> BoardResult<()> {
        if self.state.location_of(item_id)?.is_uncategorized() {
            return Err(BoardError::InconsistentState(format!(
                "matured timer for uncategorized item `{item_id}`"
            )));
        }
        self.return_item(item_id, ReturnCause::Timeout)?;
        Ok(())
    }

    fn ensure_live(&self) -> BoardResult<()> {
        if self.disposed {
            return Err(BoardError::Disposed);
        }
        Ok(())
    }

    fn check_invariants(&self) -> BoardResult<()> {
        let result = self.verify();
        if let Err(err) = &result {
            error!(
                "event=invariant_violation module=board status=error board_id={} detail={}",
                self.id, err
            );
        }
        debug_assert!(result.is_ok(), "board invariant violated: {result:?}");
        result
    }
}

impl<C: Clock> Drop for SortBoard<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}
