//! Planning configuration.
//!
//! `PlanningParams` is the single configuration surface the rest of the crate
//! reads from. It is a plain struct the embedding application constructs
//! directly — this is a library, not a service, so there is no env-var or
//! file loader here.

/// Per-joint discretization and limit description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointVar {
    /// Lower bound in radians. Ignored when `continuous` is true.
    pub min_limit: f64,
    /// Upper bound in radians. Ignored when `continuous` is true.
    pub max_limit: f64,
    /// Whether this joint wraps modulo 2π instead of being bounded.
    pub continuous: bool,
    /// Angular resolution, radians per coordinate unit.
    pub delta: f64,
}

impl JointVar {
    /// A bounded joint with the given limits and resolution.
    pub fn bounded(min_limit: f64, max_limit: f64, delta: f64) -> Self {
        Self {
            min_limit,
            max_limit,
            continuous: false,
            delta,
        }
    }

    /// A continuous (wrap-around) joint with the given resolution.
    pub fn continuous(delta: f64) -> Self {
        Self {
            min_limit: 0.0,
            max_limit: 0.0,
            continuous: true,
            delta,
        }
    }

    /// Number of discrete bins. For continuous joints this is
    /// `round(2π / delta)`; for bounded joints it is `round((max-min)/delta)`.
    pub fn num_vals(&self) -> i32 {
        if self.continuous {
            (std::f64::consts::TAU / self.delta).round() as i32
        } else {
            ((self.max_limit - self.min_limit) / self.delta).round() as i32
        }
    }
}

/// Which cost-to-go function the lattice should consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeuristicKind {
    /// 6-connected BFS over the voxel grid from the goal cell outward.
    #[default]
    Bfs,
    /// Straight-line Euclidean distance, scaled by `cost_per_meter`.
    Euclidean,
}

/// Planning-wide configuration: joint layout plus the cost model.
#[derive(Debug, Clone)]
pub struct PlanningParams {
    pub joints: Vec<JointVar>,
    /// Baseline edge cost. Every real edge in the lattice costs exactly this.
    pub cost_multiplier: i32,
    /// BFS distance (in cells) is multiplied by this to produce a cost-to-go.
    pub cost_per_cell: i32,
    /// Used by the Euclidean heuristic fallback.
    pub cost_per_meter: i32,
    pub use_bfs_heuristic: bool,
    /// Inflation radius (meters) used when marking BFS cells as walls: the
    /// radius of the sphere bounding the planning link.
    pub planning_link_sphere_radius: f64,
    /// Radians per motion-primitive step, used by `action_cost`'s
    /// primitive-count estimate.
    pub max_mprim_offset: f64,
}

impl PlanningParams {
    /// Default constants: `cost_multiplier = 1000`, `cost_per_cell = 100`,
    /// `cost_per_meter = 1000`, BFS heuristic on, `max_mprim_offset = 0.25`
    /// radians. `planning_link_sphere_radius` has no universal default and
    /// is left at `0.0`; callers should override it for their robot.
    pub fn new(joints: Vec<JointVar>) -> Self {
        Self {
            joints,
            cost_multiplier: 1000,
            cost_per_cell: 100,
            cost_per_meter: 1000,
            use_bfs_heuristic: true,
            planning_link_sphere_radius: 0.0,
            max_mprim_offset: 0.25,
        }
    }

    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    pub fn heuristic_kind(&self) -> HeuristicKind {
        if self.use_bfs_heuristic {
            HeuristicKind::Bfs
        } else {
            HeuristicKind::Euclidean
        }
    }
}
