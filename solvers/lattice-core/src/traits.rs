//! Contracts for the external collaborators the lattice queries: robot
//! kinematics/limits, collision checking, the occupancy grid, and the
//! motion-primitive provider. Production implementations of these traits
//! (real FK/IK, real collision geometry, a real signed-distance grid) are
//! out of scope for this crate — only the contracts live here, plus the
//! trivial fixtures in the sibling `lattice-fixtures` crate used for testing.

use crate::goal::Pose6;

/// Forward kinematics failed for a given joint configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FkError;

/// Joint limits, kinematics, and collision-free-state queries for the arm
/// being planned for.
pub trait RobotModel {
    fn min_limit(&self, joint: usize) -> f64;
    fn max_limit(&self, joint: usize) -> f64;
    /// True iff the joint is bounded (has limits); false means continuous.
    fn has_limit(&self, joint: usize) -> bool;
    fn check_joint_limits(&self, angles: &[f64]) -> bool;
    /// Forward kinematics of the planning link to a 6-DoF pose.
    fn forward_kinematics(&self, angles: &[f64]) -> Result<Pose6, FkError>;
}

/// Result of an interpolated-path collision check between two waypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentValidity {
    pub valid: bool,
    pub path_length: f64,
    pub num_checks: u32,
    pub distance: f64,
}

/// Static and swept-path collision queries.
pub trait CollisionChecker {
    /// Returns whether `angles` is collision-free, and the distance to the
    /// nearest obstacle (only meaningful when valid).
    fn is_state_valid(&self, angles: &[f64]) -> (bool, f64);
    /// Interpolates between `a` and `b` at the checker's chosen resolution
    /// and validates every intermediate state.
    fn is_segment_valid(&self, a: &[f64], b: &[f64]) -> SegmentValidity;
}

/// World↔grid conversions and obstacle-distance queries over a voxelized
/// workspace. Read-only for the duration of a search.
pub trait OccupancyGrid {
    fn dims(&self) -> (i32, i32, i32);
    fn resolution(&self) -> f64;
    fn world_to_grid(&self, x: f64, y: f64, z: f64) -> (i32, i32, i32);
    fn grid_to_world(&self, i: i32, j: i32, k: i32) -> (f64, f64, f64);
    fn distance_to_nearest_obstacle(&self, i: i32, j: i32, k: i32) -> f64;
}

/// A motion primitive: an ordered, non-empty sequence of joint-space
/// waypoints applied from a source configuration. The last waypoint is the
/// successor configuration.
pub type Action = Vec<Vec<f64>>;

/// Produces candidate actions at a given joint configuration.
pub trait ActionSet {
    /// Returns `None` when no actions are available at `source_angles` (the
    /// `ActionUnavailable` condition) rather than an out-param bool.
    fn actions_at(&self, source_angles: &[f64]) -> Option<Vec<Action>>;
}
