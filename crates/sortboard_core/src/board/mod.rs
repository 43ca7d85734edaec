//! Pure board state and its transition log.
//!
//! # Responsibility
//! - Hold the three ordered item collections of one board.
//! - Apply `BoardAction` transitions without any timer or clock concerns.
//!
//! # Invariants
//! - Every catalog item sits in exactly one collection, exactly once.
//! - Transitions never create or drop items.

use crate::config::ConfigError;
use crate::model::catalog::CatalogError;
use crate::model::item::ItemId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod action;
pub mod state;

pub type BoardResult<T> = Result<T, BoardError>;

/// Board operation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Operation referenced an id outside the fixed universe.
    UnknownItem(ItemId),
    /// Internal invariant violation; indicates a programming error.
    InconsistentState(String),
    /// Board was already disposed.
    Disposed,
    Catalog(CatalogError),
    Config(ConfigError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "item not found: {id}"),
            Self::InconsistentState(detail) => write!(f, "board state is inconsistent: {detail}"),
            Self::Disposed => write!(f, "board has been disposed"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Catalog(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::UnknownItem(_) | Self::InconsistentState(_) | Self::Disposed => None,
        }
    }
}

impl From<CatalogError> for BoardError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<ConfigError> for BoardError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}
