//! Angle↔coordinate mapping, with wrap-around for continuous joints.

use crate::params::PlanningParams;

/// A lattice state's canonical identity: one integer per planning joint.
///
/// Two joint configurations that discretize to the same `Coord` are the same
/// lattice state — `Coord` equality is exactly state equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coord(pub Vec<i32>);

impl Coord {
    pub fn zeros(num_joints: usize) -> Self {
        Coord(vec![0; num_joints])
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Discretize continuous joint angles into a lattice `Coord`.
///
/// Continuous joints are first normalized into `[0, 2π)`, then binned as
/// `floor((a + δ/2) / δ)`; a result equal to `num_vals` wraps to `0`. Bounded
/// joints are binned as `round((a - min_limit) / δ)`.
pub fn angles_to_coord(params: &PlanningParams, angles: &[f64]) -> Coord {
    debug_assert_eq!(angles.len(), params.num_joints());

    let mut coord = Vec::with_capacity(params.num_joints());
    for (joint, &angle) in params.joints.iter().zip(angles.iter()) {
        let bin = if joint.continuous {
            let mut a = angle;
            while a < 0.0 {
                a += std::f64::consts::TAU;
            }
            let num_vals = joint.num_vals();
            let mut bin = ((a + joint.delta * 0.5) / joint.delta).floor() as i32;
            if bin == num_vals {
                bin = 0;
            }
            bin
        } else {
            (((angle - joint.min_limit) / joint.delta) + 0.5).floor() as i32
        };
        coord.push(bin);
    }
    Coord(coord)
}

/// Reconstruct the nearest-bin-center joint angles for a `Coord`.
pub fn coord_to_angles(params: &PlanningParams, coord: &Coord) -> Vec<f64> {
    debug_assert_eq!(coord.len(), params.num_joints());

    params
        .joints
        .iter()
        .zip(coord.as_slice().iter())
        .map(|(joint, &c)| {
            if joint.continuous {
                c as f64 * joint.delta
            } else {
                joint.min_limit + c as f64 * joint.delta
            }
        })
        .collect()
}

/// Normalize an angle in `[0, 2π)` into `(-π, π]`.
pub fn normalize_to_signed(angle: f64) -> f64 {
    if angle >= std::f64::consts::PI {
        angle - std::f64::consts::TAU
    } else {
        angle
    }
}
