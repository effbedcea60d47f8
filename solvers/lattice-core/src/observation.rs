//! Diagnostic latches observed during a single goal-directed search.
//!
//! These are purely observational: nothing in the lattice's behavior depends
//! on them. They exist so a caller can ask "how long did it take to get
//! close to the goal" without threading extra bookkeeping through every
//! `get_succs` call.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SearchObservation {
    start: Instant,
    near_goal: bool,
    time_to_goal_region: Option<Duration>,
    expansions_at_latch: Option<usize>,
}

impl SearchObservation {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            near_goal: false,
            time_to_goal_region: None,
            expansions_at_latch: None,
        }
    }

    /// Reset the clock and latch. Called from every `set_goal_*`.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Latch `near_goal` the first time it is called; subsequent calls are
    /// no-ops. `expansions_so_far` is whatever counter the caller is tracking
    /// (the lattice itself does not count expansions).
    pub fn latch_near_goal(&mut self, expansions_so_far: usize) {
        if !self.near_goal {
            self.near_goal = true;
            self.time_to_goal_region = Some(self.start.elapsed());
            self.expansions_at_latch = Some(expansions_so_far);
            tracing::debug!(
                elapsed = ?self.time_to_goal_region,
                expansions = expansions_so_far,
                "search reached the goal region"
            );
        }
    }

    pub fn near_goal(&self) -> bool {
        self.near_goal
    }

    pub fn time_to_goal_region(&self) -> Option<Duration> {
        self.time_to_goal_region
    }

    pub fn expansions_at_latch(&self) -> Option<usize> {
        self.expansions_at_latch
    }
}

impl Default for SearchObservation {
    fn default() -> Self {
        Self::new()
    }
}
