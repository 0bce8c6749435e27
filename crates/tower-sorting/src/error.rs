//! Error types for state construction, move application, instance loading
//! and path replay.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A tower configuration that violates the state invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("a state needs at least one tower")]
    NoTowers,

    #[error("tower capacity must be positive")]
    ZeroCapacity,

    #[error("tower {tower} holds {len} disks but capacity is {capacity}")]
    Overfull {
        tower: usize,
        len: usize,
        capacity: usize,
    },
}

/// Why a move cannot be applied to a state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("tower {tower} does not exist (state has {tower_count} towers)")]
    NoSuchTower { tower: usize, tower_count: usize },

    #[error("source and target are the same tower ({0})")]
    SameTower(usize),

    #[error("tower {0} is empty")]
    EmptySource(usize),

    #[error("tower {tower} is full ({capacity} disks)")]
    TargetFull { tower: usize, capacity: usize },

    #[error("disk {disk} cannot be placed on {top} (tower {tower})")]
    ColorMismatch {
        tower: usize,
        disk: String,
        top: String,
    },
}

/// A malformed instance file.
///
/// Line numbers are 1-based and count the header as line 1.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("instance is empty")]
    Empty,

    #[error("malformed header {line:?}: expected `<tower_count> <size>`")]
    InvalidHeader { line: String },

    #[error("header declares a zero dimension ({tower_count} towers of size {size})")]
    ZeroDimension { tower_count: usize, size: usize },

    #[error("expected {expected} grid rows, found {found}")]
    MissingRows { expected: usize, found: usize },

    #[error("line {line}: expected {expected} tokens, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    State(#[from] StateError),
}

/// A move sequence that stops being legal part-way through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("move {step} is illegal: {source}")]
pub struct ReplayError {
    /// Zero-based index of the rejected move.
    pub step: usize,
    #[source]
    pub source: MoveError,
}
