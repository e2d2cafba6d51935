//! Error types.

use thiserror::Error;

/// Errors raised while building a topology or resolving a request against it.
///
/// Allocation against well-formed demand never fails: scarcity and
/// infeasibility are reported through the shape of
/// [`ScheduleResult`](crate::models::ScheduleResult).
#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("topology has no slots")]
    EmptyTopology,

    #[error("duplicate slot id: {0}")]
    DuplicateSlot(String),

    #[error("topology has no methods")]
    NoMethods,

    #[error("method '{method}' references unknown slot '{slot}'")]
    UnknownMethodSlot { method: String, slot: String },

    #[error("method '{method}' lists slot '{slot}' more than once")]
    RepeatedMethodSlot { method: String, slot: String },

    #[error("method '{method}' takes {take} slots from a group of {available}")]
    InvalidGroupTake {
        method: String,
        take: usize,
        available: usize,
    },

    #[error("slot config is missing slot '{0}'")]
    MissingSlot(String),

    #[error("slot config references unknown slot '{0}'")]
    UnknownSlot(String),

    #[error("demand vector has {actual} entries, topology has {expected} slots")]
    DemandLength { expected: usize, actual: usize },

    #[error("invalid request: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ShiftResult<T> = Result<T, ShiftError>;
