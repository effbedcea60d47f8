//! 6-connected BFS over the voxelized workspace, run from the goal cell
//! outward, converted into a per-cell admissible cost-to-go.

use std::collections::VecDeque;

use crate::traits::OccupancyGrid;

/// Sentinel: this cell is inflated/occupied and never traversable.
pub const WALL: i32 = i32::MIN;
/// Sentinel: this cell has not been reached by the BFS (and is not a wall).
pub const UNREACHABLE: i32 = i32::MAX;
/// Distances above this are treated as unreachable by `cost_to_goal`.
const SATURATION_THRESHOLD: i32 = 1_000_000;

/// A 6-connected BFS distance grid with wall/unreachable sentinels.
#[derive(Debug, Clone)]
pub struct BfsHeuristic {
    dim_x: i32,
    dim_y: i32,
    dim_z: i32,
    dist: Vec<i32>,
    cost_per_cell: i32,
}

impl BfsHeuristic {
    pub fn new(dim_x: i32, dim_y: i32, dim_z: i32, cost_per_cell: i32) -> Self {
        let n = (dim_x as usize) * (dim_y as usize) * (dim_z as usize);
        Self {
            dim_x,
            dim_y,
            dim_z,
            dist: vec![UNREACHABLE; n],
            cost_per_cell,
        }
    }

    pub fn dims(&self) -> (i32, i32, i32) {
        (self.dim_x, self.dim_y, self.dim_z)
    }

    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < self.dim_x && y >= 0 && y < self.dim_y && z >= 0 && z < self.dim_z
    }

    fn idx(&self, x: i32, y: i32, z: i32) -> usize {
        ((z * self.dim_y + y) * self.dim_x + x) as usize
    }

    pub fn is_wall(&self, x: i32, y: i32, z: i32) -> bool {
        self.in_bounds(x, y, z) && self.dist[self.idx(x, y, z)] == WALL
    }

    pub fn set_wall(&mut self, x: i32, y: i32, z: i32) {
        if self.in_bounds(x, y, z) {
            let i = self.idx(x, y, z);
            self.dist[i] = WALL;
        }
    }

    /// Mark every cell within `inflation_radius` of an obstacle as a wall.
    ///
    /// Obstacle distance is sampled at `(x, y, z)` for `x in 0..dim_x-2`
    /// (same for y, z), but the wall is written at `(x+1, y+1, z+1)` — this
    /// leaves a one-cell border around the grid that is never written by
    /// this function (and so can only ever be free or unreachable, never a
    /// wall).
    pub fn reset_walls_from_grid(&mut self, grid: &dyn OccupancyGrid, inflation_radius: f64) {
        self.dist.fill(UNREACHABLE);
        for z in 0..(self.dim_z - 2).max(0) {
            for y in 0..(self.dim_y - 2).max(0) {
                for x in 0..(self.dim_x - 2).max(0) {
                    if grid.distance_to_nearest_obstacle(x, y, z) <= inflation_radius {
                        self.set_wall(x + 1, y + 1, z + 1);
                    }
                }
            }
        }
    }

    /// Run a single-source BFS from `(gx, gy, gz)` over non-wall, in-bounds
    /// cells. The goal cell's distance is set to 0 even if it happens to be
    /// marked a wall; the walled goal cell is never special-cased before
    /// seeding the queue.
    pub fn run(&mut self, gx: i32, gy: i32, gz: i32) {
        debug_assert!(self.in_bounds(gx, gy, gz));
        for v in self.dist.iter_mut() {
            if *v != WALL {
                *v = UNREACHABLE;
            }
        }
        let goal_idx = self.idx(gx, gy, gz);
        self.dist[goal_idx] = 0;

        let mut queue = VecDeque::new();
        queue.push_back((gx, gy, gz));

        const NEIGHBORS: [(i32, i32, i32); 6] = [
            (1, 0, 0),
            (-1, 0, 0),
            (0, 1, 0),
            (0, -1, 0),
            (0, 0, 1),
            (0, 0, -1),
        ];

        while let Some((x, y, z)) = queue.pop_front() {
            let d = self.dist[self.idx(x, y, z)];
            for (dx, dy, dz) in NEIGHBORS {
                let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                if !self.in_bounds(nx, ny, nz) {
                    continue;
                }
                let ni = self.idx(nx, ny, nz);
                if self.dist[ni] == UNREACHABLE {
                    self.dist[ni] = d + 1;
                    queue.push_back((nx, ny, nz));
                }
            }
        }
    }

    /// `WALL`, `UNREACHABLE`, or the non-negative BFS distance.
    pub fn distance(&self, x: i32, y: i32, z: i32) -> i32 {
        if !self.in_bounds(x, y, z) {
            return WALL;
        }
        self.dist[self.idx(x, y, z)]
    }

    /// Admissible cost-to-go for `(x, y, z)`. Returns `i32::MAX` — a
    /// dedicated "unreachable" sentinel, not floating infinity, so it stays
    /// usable in the integer edge-cost arithmetic the lattice does — for
    /// walls and for distances beyond the saturation threshold.
    pub fn cost_to_goal(&self, x: i32, y: i32, z: i32) -> i32 {
        let d = self.distance(x, y, z);
        if d == WALL || d == UNREACHABLE || d > SATURATION_THRESHOLD {
            i32::MAX
        } else {
            d * self.cost_per_cell
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_grid_distance_grows_by_one_per_step() {
        let mut bfs = BfsHeuristic::new(10, 10, 10, 100);
        bfs.run(5, 5, 5);
        assert_eq!(bfs.distance(5, 5, 5), 0);
        assert_eq!(bfs.distance(6, 5, 5), 1);
        assert_eq!(bfs.distance(7, 5, 5), 2);
        assert_eq!(bfs.distance(5, 5, 6), 1);
    }

    #[test]
    fn wall_blocks_straight_line_and_forces_detour() {
        let mut bfs = BfsHeuristic::new(10, 10, 3, 100);
        // Wall plane at x = 5 except a hole at y = 5.
        for y in 0..10 {
            if y != 5 {
                bfs.set_wall(5, y, 1);
            }
        }
        bfs.run(5, 5, 1);
        // Straight line would be distance 3, but (2,5,1) is still on the
        // free side, so it should reach in 3 either way; pick a cell that
        // must detour through the hole.
        assert_eq!(bfs.distance(5, 2, 1), bfs.distance(5, 2, 1)); // sanity: no panic
        assert!(bfs.distance(2, 8, 1) > (5 - 2) + (8 - 5));
    }

    #[test]
    fn cost_to_goal_saturates_to_max_for_unreachable() {
        let mut bfs = BfsHeuristic::new(3, 3, 3, 100);
        bfs.set_wall(1, 1, 1);
        bfs.run(0, 0, 0);
        assert_eq!(bfs.cost_to_goal(1, 1, 1), i32::MAX);
    }

    #[test]
    fn cost_to_goal_is_distance_times_cost_per_cell() {
        let mut bfs = BfsHeuristic::new(5, 5, 5, 100);
        bfs.run(0, 0, 0);
        assert_eq!(bfs.cost_to_goal(2, 0, 0), 200);
    }

    #[test]
    fn out_of_bounds_distance_is_wall() {
        let bfs = BfsHeuristic::new(3, 3, 3, 100);
        assert_eq!(bfs.distance(-1, 0, 0), WALL);
        assert_eq!(bfs.distance(3, 0, 0), WALL);
    }
}
