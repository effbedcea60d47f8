//! Reference best-first search harness for `lattice-core`.
//!
//! This crate is a test/demo caller, not part of the core's contract: it
//! exists so the lattice's successor/heuristic interface has at least one
//! consumer exercising it end-to-end.

mod astar;

pub use astar::{search, PlanResult};
