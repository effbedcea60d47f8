//! Error taxonomy for the lattice.
//!
//! Most failure modes described by the planner (invalid start, rejected
//! waypoints, an action set that comes up empty) are not exceptional: they are
//! logged via `tracing` and handled by returning fewer successors, never by
//! propagating an `Err`. `LatticeError` exists only for the handful of calls
//! that fail by contract.

use thiserror::Error;

/// Failures that can be returned from the lattice's fallible-by-contract
/// operations (`set_goal_pose`, `set_goal_configuration`).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LatticeError {
    /// The goal end-effector cell falls outside the occupancy grid. The BFS
    /// heuristic is not (re)run in this case.
    #[error("goal cell {cell:?} is out of bounds for grid of size {dims:?}")]
    GoalOutOfBounds {
        cell: (i32, i32, i32),
        dims: (i32, i32, i32),
    },

    /// Forward kinematics failed on the supplied goal configuration.
    #[error("forward kinematics failed for the goal configuration")]
    FkFailure,
}

pub type Result<T> = std::result::Result<T, LatticeError>;
