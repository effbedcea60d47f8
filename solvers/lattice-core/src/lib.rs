//! Joint-space lattice, goal model, and BFS heuristic for search-based arm
//! motion planning: the graph contract (successor generation, goal test,
//! admissible heuristic) a best-first search consumes, independent of any
//! particular search algorithm, robot stack, or collision library.

mod bfs_heuristic;
mod discretizer;
mod error;
mod goal;
mod lattice;
mod observation;
mod params;
mod state_table;
mod traits;

pub use bfs_heuristic::{BfsHeuristic, UNREACHABLE, WALL};
pub use discretizer::{angles_to_coord, coord_to_angles, normalize_to_signed, Coord};
pub use error::{LatticeError, Result};
pub use goal::{shortest_angular_distance, GoalModel, JointGoal, Pose6, PoseGoal, PoseGoalKind};
pub use lattice::{Lattice, Trajectory};
pub use observation::SearchObservation;
pub use params::{HeuristicKind, JointVar, PlanningParams};
pub use state_table::{hash_coord, HashEntry, StateId, StateTable, DEFAULT_TABLE_SIZE};
pub use traits::{Action, ActionSet, CollisionChecker, FkError, OccupancyGrid, RobotModel, SegmentValidity};
