//! The goal model: two mutually-exclusive acceptance predicates over a
//! single active goal, modeled as a sum type rather than a bool plus two
//! parallel structs.

use std::f64::consts::{PI, TAU};

/// A 6-DoF Cartesian pose: `(x, y, z, roll, pitch, yaw)`.
pub type Pose6 = [f64; 6];

/// Whether orientation participates in a pose goal's acceptance test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseGoalKind {
    /// Position tolerance only.
    Xyz,
    /// Position and orientation tolerance.
    XyzRpy,
}

/// A 6-DoF pose goal: position always checked, orientation checked only for
/// `PoseGoalKind::XyzRpy`.
#[derive(Debug, Clone)]
pub struct PoseGoal {
    pub kind: PoseGoalKind,
    pub target: Pose6,
    pub xyz_tol: [f64; 3],
    pub rpy_tol: [f64; 3],
}

/// A 7-DoF joint-space goal: absolute per-joint difference, no wrap.
#[derive(Debug, Clone)]
pub struct JointGoal {
    pub angles: Vec<f64>,
    pub tol: Vec<f64>,
}

/// Shortest signed angular distance from `a` to `b`, wrapped to `(-π, π]`.
pub fn shortest_angular_distance(a: f64, b: f64) -> f64 {
    let diff = (b - a) % TAU;
    let wrapped = if diff > PI {
        diff - TAU
    } else if diff <= -PI {
        diff + TAU
    } else {
        diff
    };
    wrapped
}

/// The active goal. The BFS heuristic always needs a Cartesian cell to BFS
/// from, so `pose` is populated even when `use_7dof` makes `joint` the
/// active acceptance predicate — `set_goal_configuration` derives `pose` via
/// forward kinematics on the joint-space goal for exactly this reason.
#[derive(Debug, Clone, Default)]
pub struct GoalModel {
    pose: Option<PoseGoal>,
    joint: Option<JointGoal>,
    use_7dof: bool,
}

impl GoalModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pose_goal(&mut self, goal: PoseGoal) {
        self.pose = Some(goal);
        self.joint = None;
        self.use_7dof = false;
    }

    pub fn set_joint_goal(&mut self, pose: PoseGoal, joint: JointGoal) {
        self.pose = Some(pose);
        self.joint = Some(joint);
        self.use_7dof = true;
    }

    pub fn pose_goal(&self) -> Option<&PoseGoal> {
        self.pose.as_ref()
    }

    pub fn joint_goal(&self) -> Option<&JointGoal> {
        self.joint.as_ref()
    }

    pub fn uses_7dof_goal(&self) -> bool {
        self.use_7dof
    }

    /// Positional-only acceptance: used to latch `SearchObservation::near_goal`
    /// independent of whether the full (possibly orientation-gated) test
    /// passes.
    pub fn is_near_goal(&self, pose: &Pose6) -> bool {
        match &self.pose {
            Some(g) => {
                (pose[0] - g.target[0]).abs() <= g.xyz_tol[0]
                    && (pose[1] - g.target[1]).abs() <= g.xyz_tol[1]
                    && (pose[2] - g.target[2]).abs() <= g.xyz_tol[2]
            }
            None => false,
        }
    }

    /// Full 6-DoF pose acceptance, honoring `PoseGoalKind`.
    pub fn accepts_pose(&self, pose: &Pose6) -> bool {
        let Some(g) = &self.pose else { return false };
        if !self.is_near_goal(pose) {
            return false;
        }
        match g.kind {
            PoseGoalKind::Xyz => true,
            PoseGoalKind::XyzRpy => {
                let droll = shortest_angular_distance(pose[3], g.target[3]).abs();
                let dpitch = shortest_angular_distance(pose[4], g.target[4]).abs();
                let dyaw = shortest_angular_distance(pose[5], g.target[5]).abs();
                droll < g.rpy_tol[0] && dpitch < g.rpy_tol[1] && dyaw < g.rpy_tol[2]
            }
        }
    }

    /// 7-DoF joint-space acceptance: absolute difference, no wrap.
    pub fn accepts_joint(&self, angles: &[f64]) -> bool {
        match &self.joint {
            Some(g) => angles
                .iter()
                .zip(g.angles.iter())
                .zip(g.tol.iter())
                .all(|((q, target), tol)| (q - target).abs() <= *tol),
            None => false,
        }
    }

    /// Dispatch on `use_7dof` to decide whether a successor satisfies the
    /// goal: the 7-DoF predicate tests `final_angles`, the 6-DoF predicate
    /// tests `end_effector_pose`.
    pub fn accepts(&self, end_effector_pose: &Pose6, final_angles: &[f64]) -> bool {
        if self.use_7dof {
            self.accepts_joint(final_angles)
        } else {
            self.accepts_pose(end_effector_pose)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn xyz_goal(target: Pose6, tol: f64) -> PoseGoal {
        PoseGoal {
            kind: PoseGoalKind::Xyz,
            target,
            xyz_tol: [tol; 3],
            rpy_tol: [0.0; 3],
        }
    }

    #[test]
    fn xyz_goal_ignores_orientation() {
        let mut g = GoalModel::new();
        g.set_pose_goal(xyz_goal([1.0, 2.0, 3.0, 0.0, 0.0, 0.0], 0.1));
        assert!(g.accepts_pose(&[1.05, 2.0, 3.0, 99.0, -5.0, 3.0]));
    }

    #[test]
    fn xyz_rpy_goal_requires_orientation() {
        let mut g = GoalModel::new();
        g.set_pose_goal(PoseGoal {
            kind: PoseGoalKind::XyzRpy,
            target: [0.0; 6],
            xyz_tol: [0.1; 3],
            rpy_tol: [0.05; 3],
        });
        // within position tolerance, outside orientation tolerance
        assert!(g.is_near_goal(&[0.0, 0.0, 0.0, 0.2, 0.0, 0.0]));
        assert!(!g.accepts_pose(&[0.0, 0.0, 0.0, 0.2, 0.0, 0.0]));
        assert!(g.accepts_pose(&[0.0, 0.0, 0.0, 0.01, 0.0, 0.0]));
    }

    #[test]
    fn joint_goal_is_absolute_no_wrap() {
        let mut g = GoalModel::new();
        g.set_joint_goal(xyz_goal([0.0; 6], 0.05), JointGoal { angles: vec![0.0], tol: vec![0.01] });
        assert!(g.uses_7dof_goal());
        assert!(g.accepts(&[0.0; 6], &[0.005]));
        assert!(!g.accepts(&[0.0; 6], &[0.02]));
    }

    #[test]
    fn shortest_angular_distance_wraps() {
        assert!((shortest_angular_distance(0.0, PI) - PI).abs() < 1e-9);
        assert!((shortest_angular_distance(-PI + 0.1, PI - 0.1) - (-0.2)).abs() < 1e-9);
        assert_eq!(shortest_angular_distance(1.0, 1.0), 0.0);
    }
}
