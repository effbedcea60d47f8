//! The central graph contract: successor generation, the goal predicate,
//! and the heuristic, tied together over a `PlanningParams` configuration
//! and the four external collaborator traits.

use crate::bfs_heuristic::BfsHeuristic;
use crate::discretizer::{angles_to_coord, coord_to_angles, normalize_to_signed, Coord};
use crate::error::{LatticeError, Result};
use crate::goal::{GoalModel, JointGoal, Pose6, PoseGoal, PoseGoalKind};
use crate::observation::SearchObservation;
use crate::params::{HeuristicKind, PlanningParams};
use crate::state_table::{StateId, StateTable, DEFAULT_TABLE_SIZE};
use crate::traits::{ActionSet, CollisionChecker, OccupancyGrid, RobotModel};

/// A joint-angle path with names, ready to hand to a downstream executor.
/// Names come from the caller — the lattice has no opinion on joint naming.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub joint_names: Vec<String>,
    pub positions: Vec<Vec<f64>>,
}

/// The joint-space lattice: owns the state table, goal model, and BFS
/// heuristic, and borrows nothing — the four collaborator traits are boxed
/// so the lattice's lifetime doesn't have to track its caller's.
pub struct Lattice {
    params: PlanningParams,
    robot: Box<dyn RobotModel>,
    collision: Box<dyn CollisionChecker>,
    grid: Box<dyn OccupancyGrid>,
    actions: Box<dyn ActionSet>,
    states: StateTable,
    goal: GoalModel,
    bfs: BfsHeuristic,
    observation: SearchObservation,
    start_id: StateId,
    goal_id: StateId,
    expansions: usize,
}

impl Lattice {
    pub fn new(
        params: PlanningParams,
        robot: Box<dyn RobotModel>,
        collision: Box<dyn CollisionChecker>,
        grid: Box<dyn OccupancyGrid>,
        actions: Box<dyn ActionSet>,
    ) -> Self {
        let (dim_x, dim_y, dim_z) = grid.dims();
        let bfs = BfsHeuristic::new(dim_x, dim_y, dim_z, params.cost_per_cell);
        let num_joints = params.num_joints();

        let mut states = StateTable::new(DEFAULT_TABLE_SIZE);
        let start_id = states.create(Coord::zeros(num_joints), (0, 0, 0));
        let goal_id = states.create(Coord::zeros(num_joints), (0, 0, 0));
        states.set_goal_id(goal_id);

        Self {
            params,
            robot,
            collision,
            grid,
            actions,
            states,
            goal: GoalModel::new(),
            bfs,
            observation: SearchObservation::new(),
            start_id,
            goal_id,
            expansions: 0,
        }
    }

    pub fn size_created(&self) -> usize {
        self.states.len()
    }

    pub fn start_state_id(&self) -> StateId {
        self.start_id
    }

    pub fn goal_state_id(&self) -> StateId {
        self.goal_id
    }

    pub fn observation(&self) -> &SearchObservation {
        &self.observation
    }

    /// Install the start configuration. Never fails: joint-limit and
    /// collision violations are logged and the search is left to discover
    /// the start has no valid successors; an FK failure leaves the start
    /// entry's grid cell at whatever it was before this call.
    pub fn set_start(&mut self, angles: &[f64]) {
        if !self.robot.check_joint_limits(angles) {
            tracing::warn!(?angles, "start configuration violates joint limits");
        }
        let (valid, _distance) = self.collision.is_state_valid(angles);
        if !valid {
            tracing::warn!(?angles, "start configuration is in collision");
        }

        let coord = angles_to_coord(&self.params, angles);
        let cell = match self.robot.forward_kinematics(angles) {
            Ok(pose) => Some(self.grid.world_to_grid(pose[0], pose[1], pose[2])),
            Err(_) => {
                tracing::warn!("forward kinematics failed for start configuration");
                None
            }
        };

        let entry = self.states.get_by_id_mut(self.start_id);
        entry.coord = coord;
        entry.continuous_state = angles.to_vec();
        if let Some(cell) = cell {
            entry.end_effector_cell = cell;
        }
    }

    /// Install a 6-DoF pose goal, run the BFS heuristic from the goal cell,
    /// and reset the near-goal latch. Only `goals[0]` is consulted even
    /// though the parameter is a slice; the API accepts a batch but only a
    /// single goal pose is ever in effect at once.
    pub fn set_goal_pose(
        &mut self,
        goals: &[Pose6],
        kind: PoseGoalKind,
        xyz_tol: [f64; 3],
        rpy_tol: [f64; 3],
    ) -> Result<()> {
        let target = goals[0];
        let dims = self.grid.dims();
        let cell = self.grid.world_to_grid(target[0], target[1], target[2]);
        if cell.0 < 0 || cell.0 >= dims.0 || cell.1 < 0 || cell.1 >= dims.1 || cell.2 < 0 || cell.2 >= dims.2 {
            return Err(LatticeError::GoalOutOfBounds { cell, dims });
        }

        self.goal.set_pose_goal(PoseGoal {
            kind,
            target,
            xyz_tol,
            rpy_tol,
        });

        let goal_entry = self.states.get_by_id_mut(self.goal_id);
        goal_entry.coord = Coord::zeros(self.params.num_joints());
        goal_entry.end_effector_cell = cell;

        self.bfs
            .reset_walls_from_grid(self.grid.as_ref(), self.params.planning_link_sphere_radius);
        self.bfs.run(cell.0, cell.1, cell.2);
        self.observation.reset();
        Ok(())
    }

    /// Install a 7-DoF joint-space goal. Derives a 6-DoF pose via FK (the
    /// BFS heuristic always needs a Cartesian cell even when the acceptance
    /// predicate is joint-space) with a uniform 0.05 rad positional
    /// tolerance, then layers the joint-space predicate on top.
    pub fn set_goal_configuration(&mut self, angles: &[f64], tol: &[f64]) -> Result<()> {
        let pose = self
            .robot
            .forward_kinematics(angles)
            .map_err(|_| LatticeError::FkFailure)?;
        self.set_goal_pose(&[pose], PoseGoalKind::Xyz, [0.05; 3], [0.0; 3])?;

        let pose_goal = self.goal.pose_goal().expect("set_goal_pose just set it").clone();
        self.goal.set_joint_goal(
            pose_goal,
            JointGoal {
                angles: angles.to_vec(),
                tol: tol.to_vec(),
            },
        );
        Ok(())
    }

    /// Generate successors of `source_id` by applying every candidate action
    /// from the `ActionSet`, validating and interning each in turn.
    /// Successors are emitted in the `ActionSet`'s order and never sorted.
    pub fn get_succs(&mut self, source_id: StateId) -> Vec<(StateId, i32)> {
        if source_id == self.goal_id {
            return Vec::new();
        }
        self.expansions += 1;

        let source_coord = self.states.get_by_id(source_id).coord.clone();
        let source_angles = coord_to_angles(&self.params, &source_coord);

        let actions = match self.actions.actions_at(&source_angles) {
            Some(actions) => actions,
            None => {
                tracing::warn!(state_id = source_id, "action set has no actions for this state");
                return Vec::new();
            }
        };

        let mut successors = Vec::with_capacity(actions.len());
        'action: for action in &actions {
            let Some(final_wp) = action.last() else {
                continue;
            };

            for wp in action {
                if !self.robot.check_joint_limits(wp) {
                    tracing::debug!(?wp, "waypoint violates joint limits");
                    continue 'action;
                }
                let (valid, _distance) = self.collision.is_state_valid(wp);
                if !valid {
                    tracing::debug!(?wp, "waypoint is in collision");
                    continue 'action;
                }
            }

            let mut prev = source_angles.clone();
            for wp in action {
                let segment = self.collision.is_segment_valid(&prev, wp);
                if !segment.valid {
                    tracing::debug!(?prev, ?wp, "swept path is in collision");
                    continue 'action;
                }
                prev = wp.clone();
            }

            let pose = match self.robot.forward_kinematics(final_wp) {
                Ok(pose) => pose,
                Err(_) => {
                    tracing::debug!(?final_wp, "forward kinematics failed for successor");
                    continue 'action;
                }
            };

            if self.goal.is_near_goal(&pose) {
                self.observation.latch_near_goal(self.expansions);
            }

            let succ_coord = angles_to_coord(&self.params, final_wp);
            let cell = self.grid.world_to_grid(pose[0], pose[1], pose[2]);
            let is_goal = self.goal.accepts(&pose, final_wp);

            if is_goal {
                let goal_entry = self.states.get_by_id_mut(self.goal_id);
                goal_entry.coord = succ_coord.clone();
                goal_entry.end_effector_cell = cell;
                goal_entry.continuous_state = final_wp.clone();
            }

            let succ_id = match self.states.get(&succ_coord, is_goal) {
                Some(id) => id,
                None => {
                    let id = self.states.create(succ_coord.clone(), cell);
                    self.states.get_by_id_mut(id).continuous_state = final_wp.clone();
                    id
                }
            };

            successors.push((succ_id, self.params.cost_multiplier));
        }

        successors
    }

    /// Admissible cost-to-go for `id`'s end-effector cell, via whichever
    /// heuristic `PlanningParams::use_bfs_heuristic` selects.
    pub fn goal_heuristic(&self, id: StateId) -> i32 {
        if id == self.goal_id {
            return 0;
        }
        let (x, y, z) = self.states.get_by_id(id).end_effector_cell;
        match self.params.heuristic_kind() {
            HeuristicKind::Bfs => self.bfs.cost_to_goal(x, y, z),
            HeuristicKind::Euclidean => {
                let (gx, gy, gz) = self.states.get_by_id(self.goal_id).end_effector_cell;
                let goal_world = self.grid.grid_to_world(gx, gy, gz);
                let cell_world = self.grid.grid_to_world(x, y, z);
                let dx = cell_world.0 - goal_world.0;
                let dy = cell_world.1 - goal_world.1;
                let dz = cell_world.2 - goal_world.2;
                let distance = (dx * dx + dy * dy + dz * dz).sqrt();
                (distance * self.params.cost_per_meter as f64 * 500.0) as i32
            }
        }
    }

    /// Decode `id`'s stored coord to joint angles, folding each into
    /// `(-π, π]`.
    pub fn state_id_to_angles(&self, id: StateId) -> Vec<f64> {
        let coord = &self.states.get_by_id(id).coord;
        coord_to_angles(&self.params, coord)
            .into_iter()
            .map(normalize_to_signed)
            .collect()
    }

    pub fn path_to_trajectory(&self, ids: &[StateId], joint_names: Vec<String>) -> Trajectory {
        let positions = ids.iter().map(|&id| self.state_id_to_angles(id)).collect();
        Trajectory { joint_names, positions }
    }

    /// Reserved richer cost model: counts how many `max_mprim_offset`-sized
    /// primitives are needed to cover the largest joint change across the
    /// first six joints, excluding index 4 (forearm/wrist roll). Not called
    /// from `get_succs`'s hot path.
    pub fn action_cost(&self, from: &[f64], to: &[f64]) -> i32 {
        let mut max_diff: f64 = 0.0;
        for i in 0..from.len().min(to.len()).min(6) {
            if i == 4 {
                continue;
            }
            let diff = (from[i] - to[i]).abs();
            if diff > max_diff {
                max_diff = diff;
            }
        }
        let num_prims = (max_diff / self.params.max_mprim_offset).ceil() as i32;
        num_prims * self.params.cost_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::JointVar;
    use crate::traits::{Action, ActionSet, CollisionChecker, FkError, OccupancyGrid, RobotModel, SegmentValidity};
    use pretty_assertions::assert_eq;

    /// Single-joint robot, no limits, FK is the identity onto the x axis.
    struct OneJointRobot;

    impl RobotModel for OneJointRobot {
        fn min_limit(&self, _joint: usize) -> f64 {
            -10.0
        }
        fn max_limit(&self, _joint: usize) -> f64 {
            10.0
        }
        fn has_limit(&self, _joint: usize) -> bool {
            true
        }
        fn check_joint_limits(&self, _angles: &[f64]) -> bool {
            true
        }
        fn forward_kinematics(&self, angles: &[f64]) -> std::result::Result<Pose6, FkError> {
            Ok([angles[0], 0.0, 0.0, 0.0, 0.0, 0.0])
        }
    }

    struct NoCollision;

    impl CollisionChecker for NoCollision {
        fn is_state_valid(&self, _angles: &[f64]) -> (bool, f64) {
            (true, f64::INFINITY)
        }
        fn is_segment_valid(&self, _a: &[f64], _b: &[f64]) -> SegmentValidity {
            SegmentValidity {
                valid: true,
                path_length: 0.0,
                num_checks: 1,
                distance: f64::INFINITY,
            }
        }
    }

    /// Unit-resolution grid along x, 100 cells, everything free.
    struct LineGrid;

    impl OccupancyGrid for LineGrid {
        fn dims(&self) -> (i32, i32, i32) {
            (100, 1, 1)
        }
        fn resolution(&self) -> f64 {
            1.0
        }
        fn world_to_grid(&self, x: f64, _y: f64, _z: f64) -> (i32, i32, i32) {
            (x.floor() as i32, 0, 0)
        }
        fn grid_to_world(&self, i: i32, _j: i32, _k: i32) -> (f64, f64, f64) {
            (i as f64 + 0.5, 0.0, 0.0)
        }
        fn distance_to_nearest_obstacle(&self, _i: i32, _j: i32, _k: i32) -> f64 {
            f64::INFINITY
        }
    }

    /// Offers a single action: step `+step` on joint 0.
    struct StepActionSet {
        step: f64,
    }

    impl ActionSet for StepActionSet {
        fn actions_at(&self, source_angles: &[f64]) -> Option<Vec<Action>> {
            let mut next = source_angles.to_vec();
            next[0] += self.step;
            Some(vec![vec![next]])
        }
    }

    /// Offers nothing — exercises the `ActionUnavailable` path.
    struct NoActionSet;

    impl ActionSet for NoActionSet {
        fn actions_at(&self, _source_angles: &[f64]) -> Option<Vec<Action>> {
            None
        }
    }

    fn one_joint_lattice(step: f64) -> Lattice {
        let params = PlanningParams::new(vec![JointVar::bounded(-10.0, 10.0, 1.0)]);
        Lattice::new(
            params,
            Box::new(OneJointRobot),
            Box::new(NoCollision),
            Box::new(LineGrid),
            Box::new(StepActionSet { step }),
        )
    }

    #[test]
    fn get_succs_on_goal_id_is_empty() {
        let mut lattice = one_joint_lattice(1.0);
        lattice.set_start(&[0.0]);
        assert!(lattice.get_succs(lattice.goal_state_id()).is_empty());
        assert_eq!(lattice.goal_heuristic(lattice.goal_state_id()), 0);
    }

    #[test]
    fn action_unavailable_yields_no_successors() {
        let params = PlanningParams::new(vec![JointVar::bounded(-10.0, 10.0, 1.0)]);
        let mut lattice = Lattice::new(
            params,
            Box::new(OneJointRobot),
            Box::new(NoCollision),
            Box::new(LineGrid),
            Box::new(NoActionSet),
        );
        lattice.set_start(&[0.0]);
        assert!(lattice.get_succs(lattice.start_state_id()).is_empty());
    }

    #[test]
    fn one_step_reaches_a_joint_space_goal() {
        let mut lattice = one_joint_lattice(1.0);
        lattice.set_start(&[0.0]);
        lattice
            .set_goal_configuration(&[1.0], &[0.1])
            .expect("goal is within grid bounds");

        let succs = lattice.get_succs(lattice.start_state_id());
        assert_eq!(succs.len(), 1);
        let (succ_id, cost) = succs[0];
        assert_eq!(succ_id, lattice.goal_state_id());
        assert_eq!(cost, 1000);
        assert!(lattice.get_succs(lattice.goal_state_id()).is_empty());
    }

    #[test]
    fn action_cost_excludes_joint_four() {
        let lattice = one_joint_lattice(1.0);
        // `action_cost` looks at indices 0..6 excluding 4; a 6-joint diff
        // isolated to index 4 alone should report zero primitives.
        let from = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let to = [0.0, 0.0, 0.0, 0.0, 5.0, 0.0];
        assert_eq!(lattice.action_cost(&from, &to), 0);

        let to_joint0 = [0.3, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert!(lattice.action_cost(&from, &to_joint0) > 0);
    }

    #[test]
    fn near_goal_latches_on_position_even_without_orientation_match() {
        let mut lattice = one_joint_lattice(1.0);
        // `4.0` is an exact bin center for delta=1, min=-10, so the stored
        // coord round-trips to exactly `4.0` and the single `+1.0` step
        // lands the successor's FK pose at exactly `5.0`.
        lattice.set_start(&[4.0]);
        // Roll target of 1.0 rad can never be matched by `OneJointRobot`'s
        // FK, which always reports rpy = (0, 0, 0) — so this goal's
        // orientation gate never passes, but its position gate does.
        lattice
            .set_goal_pose(
                &[[5.0, 0.0, 0.0, 1.0, 0.0, 0.0]],
                PoseGoalKind::XyzRpy,
                [0.5, 0.5, 0.5],
                [0.01, 0.01, 0.01],
            )
            .unwrap();

        assert!(!lattice.observation().near_goal());
        let succs = lattice.get_succs(lattice.start_state_id());
        assert!(lattice.observation().near_goal());
        // Near-goal latched, but the successor was never absorbed into the
        // goal state since the orientation gate rejected it.
        assert!(succs.iter().all(|&(id, _)| id != lattice.goal_state_id()));
    }

    #[test]
    fn goal_pose_outside_grid_is_rejected() {
        let mut lattice = one_joint_lattice(1.0);
        let err = lattice
            .set_goal_pose(&[[999.0, 0.0, 0.0, 0.0, 0.0, 0.0]], PoseGoalKind::Xyz, [0.1; 3], [0.0; 3])
            .unwrap_err();
        assert!(matches!(err, LatticeError::GoalOutOfBounds { .. }));
    }
}
