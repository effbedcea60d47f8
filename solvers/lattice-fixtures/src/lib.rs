//! Minimal `RobotModel`/`CollisionChecker`/`OccupancyGrid`/`ActionSet`
//! fixtures for exercising `lattice-core`'s graph contract without pulling in
//! a real FK/IK/collision stack.
//!
//! Every fixture here is deliberately trivial — a planar serial-chain arm, a
//! dense-array occupancy grid, sphere obstacles, and a fixed ±1-bin-per-joint
//! action set. None of this is meant to plan for a physical arm.

use lattice_core::{Action, CollisionChecker, FkError, OccupancyGrid, Pose6, RobotModel, SegmentValidity};

/// A planar n-link serial arm: link `i` rotates by `angles[i]` relative to
/// the orientation accumulated by links `0..i`, and contributes `lengths[i]`
/// along that orientation. The end-effector pose's `yaw` is the sum of all
/// joint angles; `roll`/`pitch` are always `0` since the arm is planar.
#[derive(Debug, Clone)]
pub struct PlanarArmRobot {
    pub lengths: Vec<f64>,
    pub min_limits: Vec<f64>,
    pub max_limits: Vec<f64>,
    pub continuous: Vec<bool>,
}

impl PlanarArmRobot {
    /// All joints bounded to `[-limit, limit]`.
    pub fn bounded(lengths: Vec<f64>, limit: f64) -> Self {
        let n = lengths.len();
        Self {
            lengths,
            min_limits: vec![-limit; n],
            max_limits: vec![limit; n],
            continuous: vec![false; n],
        }
    }

    /// All joints continuous (wrap modulo 2π).
    pub fn continuous(lengths: Vec<f64>) -> Self {
        let n = lengths.len();
        Self {
            lengths,
            min_limits: vec![0.0; n],
            max_limits: vec![0.0; n],
            continuous: vec![true; n],
        }
    }

    fn end_effector(&self, angles: &[f64]) -> (f64, f64, f64) {
        let mut theta = 0.0;
        let mut x = 0.0;
        let mut y = 0.0;
        for (&len, &a) in self.lengths.iter().zip(angles.iter()) {
            theta += a;
            x += len * theta.cos();
            y += len * theta.sin();
        }
        (x, y, theta)
    }
}

impl RobotModel for PlanarArmRobot {
    fn min_limit(&self, joint: usize) -> f64 {
        self.min_limits[joint]
    }

    fn max_limit(&self, joint: usize) -> f64 {
        self.max_limits[joint]
    }

    fn has_limit(&self, joint: usize) -> bool {
        !self.continuous[joint]
    }

    fn check_joint_limits(&self, angles: &[f64]) -> bool {
        angles.iter().enumerate().all(|(i, &a)| {
            self.continuous[i] || (a >= self.min_limits[i] && a <= self.max_limits[i])
        })
    }

    fn forward_kinematics(&self, angles: &[f64]) -> Result<Pose6, FkError> {
        if angles.len() != self.lengths.len() {
            return Err(FkError);
        }
        let (x, y, theta) = self.end_effector(angles);
        Ok([x, y, 0.0, 0.0, 0.0, theta])
    }
}

/// A point obstacle: a sphere of `radius` centered at `center`.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub center: (f64, f64, f64),
    pub radius: f64,
}

/// Collision checker that treats the arm's end-effector as a point and
/// rejects any configuration whose end-effector falls inside a sphere
/// obstacle. With no obstacles, every state is valid.
#[derive(Debug, Clone)]
pub struct SphereObstacleChecker {
    pub robot: PlanarArmRobot,
    pub obstacles: Vec<Obstacle>,
    /// Number of interpolation steps `is_segment_valid` checks strictly
    /// between the two endpoints (the endpoints themselves are not
    /// re-checked; callers already validate every waypoint individually).
    pub segment_steps: u32,
}

impl SphereObstacleChecker {
    pub fn obstacle_free(robot: PlanarArmRobot) -> Self {
        Self {
            robot,
            obstacles: Vec::new(),
            segment_steps: 4,
        }
    }

    pub fn with_obstacles(robot: PlanarArmRobot, obstacles: Vec<Obstacle>) -> Self {
        Self {
            robot,
            obstacles,
            segment_steps: 4,
        }
    }

    /// Signed margin to the nearest obstacle surface: negative means
    /// penetrating. `f64::INFINITY` when there are no obstacles.
    fn margin(&self, angles: &[f64]) -> f64 {
        let (x, y, z) = match self.robot.forward_kinematics(angles) {
            Ok(pose) => (pose[0], pose[1], pose[2]),
            Err(_) => return f64::NEG_INFINITY,
        };
        self.obstacles
            .iter()
            .map(|o| {
                let dx = x - o.center.0;
                let dy = y - o.center.1;
                let dz = z - o.center.2;
                (dx * dx + dy * dy + dz * dz).sqrt() - o.radius
            })
            .fold(f64::INFINITY, f64::min)
    }
}

impl CollisionChecker for SphereObstacleChecker {
    fn is_state_valid(&self, angles: &[f64]) -> (bool, f64) {
        let margin = self.margin(angles);
        (margin > 0.0, margin)
    }

    fn is_segment_valid(&self, a: &[f64], b: &[f64]) -> SegmentValidity {
        let steps = self.segment_steps.max(1);
        let mut path_length: f64 = 0.0;
        let mut prev = a.to_vec();
        for step in 1..=steps {
            let t = step as f64 / (steps + 1) as f64;
            let interpolated: Vec<f64> = a
                .iter()
                .zip(b.iter())
                .map(|(&from, &to)| from + (to - from) * t)
                .collect();
            let (valid, _) = self.is_state_valid(&interpolated);
            if !valid {
                return SegmentValidity {
                    valid: false,
                    path_length,
                    num_checks: step,
                    distance: 0.0,
                };
            }
            path_length += prev
                .iter()
                .zip(interpolated.iter())
                .map(|(p, c)| (c - p).abs())
                .sum::<f64>();
            prev = interpolated;
        }
        SegmentValidity {
            valid: true,
            path_length,
            num_checks: steps,
            distance: self.margin(b),
        }
    }
}

/// A dense `Vec<f64>`-backed occupancy grid: obstacle distance per cell is
/// stored explicitly rather than derived from geometry, so tests can set up
/// exact wall layouts (e.g. a wall plane with a single hole).
#[derive(Debug, Clone)]
pub struct DenseOccupancyGrid {
    dims: (i32, i32, i32),
    resolution: f64,
    origin: (f64, f64, f64),
    distances: Vec<f64>,
}

impl DenseOccupancyGrid {
    /// An obstacle-free grid: every cell reports `f64::INFINITY` distance to
    /// the nearest obstacle.
    pub fn obstacle_free(dims: (i32, i32, i32), resolution: f64, origin: (f64, f64, f64)) -> Self {
        let n = (dims.0 as usize) * (dims.1 as usize) * (dims.2 as usize);
        Self {
            dims,
            resolution,
            origin,
            distances: vec![f64::INFINITY; n],
        }
    }

    fn idx(&self, i: i32, j: i32, k: i32) -> usize {
        ((k * self.dims.1 + j) * self.dims.0 + i) as usize
    }

    /// Set `(i, j, k)`'s distance-to-nearest-obstacle directly, used by
    /// tests to carve out wall planes and holes.
    pub fn set_distance(&mut self, i: i32, j: i32, k: i32, distance: f64) {
        let idx = self.idx(i, j, k);
        self.distances[idx] = distance;
    }
}

impl OccupancyGrid for DenseOccupancyGrid {
    fn dims(&self) -> (i32, i32, i32) {
        self.dims
    }

    fn resolution(&self) -> f64 {
        self.resolution
    }

    fn world_to_grid(&self, x: f64, y: f64, z: f64) -> (i32, i32, i32) {
        (
            ((x - self.origin.0) / self.resolution).floor() as i32,
            ((y - self.origin.1) / self.resolution).floor() as i32,
            ((z - self.origin.2) / self.resolution).floor() as i32,
        )
    }

    fn grid_to_world(&self, i: i32, j: i32, k: i32) -> (f64, f64, f64) {
        (
            self.origin.0 + (i as f64 + 0.5) * self.resolution,
            self.origin.1 + (j as f64 + 0.5) * self.resolution,
            self.origin.2 + (k as f64 + 0.5) * self.resolution,
        )
    }

    fn distance_to_nearest_obstacle(&self, i: i32, j: i32, k: i32) -> f64 {
        if i < 0 || i >= self.dims.0 || j < 0 || j >= self.dims.1 || k < 0 || k >= self.dims.2 {
            return 0.0;
        }
        self.distances[self.idx(i, j, k)]
    }
}

/// A fixed-offset action set: at any source configuration, offers two
/// single-waypoint actions per joint — `+offset` and `-offset` on that joint
/// alone, all other joints unchanged — in joint order, `+` before `-`. This
/// is the "identity single-joint ±1-bin primitives" fixture the end-to-end
/// scenarios are built against.
#[derive(Debug, Clone)]
pub struct FixedOffsetActionSet {
    pub offsets: Vec<f64>,
}

impl FixedOffsetActionSet {
    pub fn uniform(num_joints: usize, offset: f64) -> Self {
        Self {
            offsets: vec![offset; num_joints],
        }
    }
}

impl lattice_core::ActionSet for FixedOffsetActionSet {
    fn actions_at(&self, source_angles: &[f64]) -> Option<Vec<Action>> {
        let mut actions = Vec::with_capacity(self.offsets.len() * 2);
        for (i, &offset) in self.offsets.iter().enumerate() {
            let mut plus = source_angles.to_vec();
            plus[i] += offset;
            actions.push(vec![plus]);

            let mut minus = source_angles.to_vec();
            minus[i] -= offset;
            actions.push(vec![minus]);
        }
        Some(actions)
    }
}
