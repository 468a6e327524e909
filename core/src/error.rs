//! Fail-fast errors raised when a caller breaks a simulation contract.

use thiserror::Error;

use crate::CharacterId;

/// Contract violations surfaced by the simulation core.
///
/// Expected false paths, such as dropping a bomb with an empty inventory or
/// walking into a wall, are reported through events and booleans instead.
/// Every variant here indicates a caller bug and is never retried.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A grid access addressed a cell outside the configured dimensions.
    #[error("cell ({column}, {row}) lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Requested column, signed so that negative pixel drift is reportable.
        column: i64,
        /// Requested row, signed so that negative pixel drift is reportable.
        row: i64,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
    /// An operation that requires a level ran before one was loaded.
    #[error("no level is loaded")]
    LevelNotLoaded,
    /// A value violated its documented range.
    #[error("illegal value for {field}: {reason}")]
    IllegalValue {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable description of the violated constraint.
        reason: String,
    },
    /// `remove_one_life` was called on a character whose life is already zero.
    #[error("character {0:?} has no life left to remove")]
    LifeExhausted(CharacterId),
    /// A command referenced a character the world does not know about.
    #[error("unknown character {0:?}")]
    UnknownCharacter(CharacterId),
    /// The map-load collaborator supplied a structurally invalid layout.
    #[error("invalid level layout: {0}")]
    InvalidLayout(String),
}

impl SimulationError {
    /// Convenience constructor for [`SimulationError::IllegalValue`].
    #[must_use]
    pub fn illegal(field: &'static str, reason: impl Into<String>) -> Self {
        Self::IllegalValue {
            field,
            reason: reason.into(),
        }
    }
}
