//! A weighted A* search over `lattice_core::Lattice`'s graph contract.
//!
//! This is the reference caller the core's invariants are written against:
//! it calls `get_succs`/`goal_heuristic` exactly as §5 of the contract
//! describes (suspension points are the returns from those two calls,
//! nothing more), never calls any backward-search operation, and stops as
//! soon as it pops the goal id off the open list.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use lattice_core::{Lattice, StateId};

/// A single search node on the open list: `f = g + weight * h`, ties broken
/// by insertion order (`seq`) so the heap pop order matches discovery order
/// for equal-priority nodes, keeping the search deterministic.
#[derive(Clone, Eq, PartialEq)]
struct Node {
    id: StateId,
    g: i64,
    f: i64,
    seq: u64,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for a min-heap: lower f is higher priority; break ties by
        // earlier insertion (lower seq) so two equal-f nodes pop in
        // discovery order.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outcome of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    /// State ids from the start to the goal, inclusive.
    pub path: Vec<StateId>,
    pub cost: i64,
    pub expansions: usize,
}

/// Weighted A* (`weight = 1.0` is plain A*; `weight > 1.0` trades
/// optimality for speed, ARA*-style, without the anytime replanning loop).
/// Returns `None` if the open list empties before the goal is reached or
/// `max_expansions` is exceeded.
pub fn search(lattice: &mut Lattice, weight: f64, max_expansions: usize) -> Option<PlanResult> {
    let start = lattice.start_state_id();
    let goal = lattice.goal_state_id();

    let mut g_score: HashMap<StateId, i64> = HashMap::new();
    let mut came_from: HashMap<StateId, StateId> = HashMap::new();
    let mut closed: HashMap<StateId, bool> = HashMap::new();
    let mut open = BinaryHeap::new();
    let mut seq: u64 = 0;

    g_score.insert(start, 0);
    open.push(Node {
        id: start,
        g: 0,
        f: weighted(0, lattice.goal_heuristic(start), weight),
        seq,
    });

    let mut expansions = 0usize;

    while let Some(current) = open.pop() {
        if closed.get(&current.id).copied().unwrap_or(false) {
            continue;
        }
        closed.insert(current.id, true);

        if current.id == goal {
            return Some(PlanResult {
                path: reconstruct(&came_from, start, goal),
                cost: current.g,
                expansions,
            });
        }

        if expansions >= max_expansions {
            return None;
        }
        expansions += 1;

        for (succ_id, edge_cost) in lattice.get_succs(current.id) {
            if closed.get(&succ_id).copied().unwrap_or(false) {
                continue;
            }
            let tentative_g = current.g + edge_cost as i64;
            let better = match g_score.get(&succ_id) {
                Some(&existing) => tentative_g < existing,
                None => true,
            };
            if better {
                g_score.insert(succ_id, tentative_g);
                came_from.insert(succ_id, current.id);
                seq += 1;
                open.push(Node {
                    id: succ_id,
                    g: tentative_g,
                    f: weighted(tentative_g, lattice.goal_heuristic(succ_id), weight),
                    seq,
                });
            }
        }
    }

    tracing::debug!(expansions, "open list exhausted without reaching the goal");
    None
}

fn weighted(g: i64, h: i32, weight: f64) -> i64 {
    if h == i32::MAX {
        i64::MAX
    } else {
        g + (h as f64 * weight) as i64
    }
}

fn reconstruct(came_from: &HashMap<StateId, StateId>, start: StateId, goal: StateId) -> Vec<StateId> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
