//! Tower sorting puzzle solver.
//!
//! Towers hold stacks of colored disks. A disk may move onto an empty tower
//! or onto a disk of the same color; the puzzle is solved once every tower
//! is monochrome. This crate formulates the puzzle as a search problem and
//! solves it with uninformed tree or graph search.

pub mod error;
pub mod frontier;
pub mod instance;
pub mod problem;
pub mod replay;
pub mod search;
pub mod state;

#[cfg(test)]
mod property_tests;

// Re-export main types
pub use error::{InstanceError, MoveError, ReplayError, StateError};
pub use instance::{load_instance, parse_instance};
pub use problem::TowerSorting;
pub use replay::{replay, verify_solution, ReplayReport};
pub use search::{
    depth_first_tree_search, search, Problem, SearchConfig, SearchNode, SearchOutcome,
    SearchResult, StopReason, Strategy,
};
pub use state::{Color, Move, TowerState};
