//! State interning: coord→id and id→state, via an open-addressed bucket
//! table with linear-scan collision resolution.
//!
//! The table is modeled as an arena (`Vec<HashEntry>`) holding every entry by
//! value; buckets hold integer ids, never references, so there is no
//! hash-entry/bucket/table cyclic-reference shape to manage.

use crate::discretizer::Coord;

/// Default hash table size: a power of two.
pub const DEFAULT_TABLE_SIZE: usize = 32 * 1024;

pub type StateId = usize;

/// One interned lattice state.
#[derive(Debug, Clone)]
pub struct HashEntry {
    pub state_id: StateId,
    pub coord: Coord,
    pub end_effector_cell: (i32, i32, i32),
    pub continuous_state: Vec<f64>,
    pub cached_heuristic: i32,
    pub cached_obstacle_distance: f64,
}

/// Bucket-table integer-coordinate hash mixer (Bob Jenkins' one-at-a-time
/// style integer hash).
fn int_hash(key: u32) -> u32 {
    let mut k = key;
    k = k.wrapping_add(k << 12);
    k ^= k >> 22;
    k = k.wrapping_add(k << 4);
    k ^= k >> 9;
    k = k.wrapping_add(k << 10);
    k ^= k >> 2;
    k = k.wrapping_add(k << 7);
    k ^= k >> 12;
    k
}

/// Hash a coord into a bucket index for a table of the given size (must be a
/// power of two). The `<< i` term wraps on overflow for long coord vectors;
/// that's fine, `hash` need only be a function, not a bijection. The shift
/// amount is taken mod 32 to stay within what `u32::wrapping_shl` accepts.
pub fn hash_coord(coord: &Coord, table_size: usize) -> usize {
    let mut val: u32 = 0;
    for (i, &c) in coord.as_slice().iter().enumerate() {
        let h = int_hash(c as u32);
        val = val.wrapping_add(h.wrapping_shl(i as u32));
    }
    (int_hash(val) as usize) & (table_size - 1)
}

/// Arena-backed state table with coord-keyed buckets.
#[derive(Debug, Clone)]
pub struct StateTable {
    table_size: usize,
    entries: Vec<HashEntry>,
    buckets: Vec<Vec<StateId>>,
    goal_id: Option<StateId>,
}

impl StateTable {
    pub fn new(table_size: usize) -> Self {
        assert!(table_size.is_power_of_two(), "table_size must be a power of two");
        Self {
            table_size,
            entries: Vec::new(),
            buckets: vec![Vec::new(); table_size],
            goal_id: None,
        }
    }

    /// Designate `id` as the absorbing goal entry. Lookups with `is_goal =
    /// true` always return this entry regardless of the coord passed.
    pub fn set_goal_id(&mut self, id: StateId) {
        self.goal_id = Some(id);
    }

    pub fn goal_id(&self) -> Option<StateId> {
        self.goal_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_by_id(&self, id: StateId) -> &HashEntry {
        &self.entries[id]
    }

    pub fn get_by_id_mut(&mut self, id: StateId) -> &mut HashEntry {
        &mut self.entries[id]
    }

    /// Look up an entry by coord. If `is_goal` is true, the coord is ignored
    /// and the absorbing goal entry is returned instead — this is the
    /// shortcut that folds every goal-satisfying successor into one state.
    pub fn get(&self, coord: &Coord, is_goal: bool) -> Option<StateId> {
        if is_goal {
            return self.goal_id;
        }
        let bucket = &self.buckets[hash_coord(coord, self.table_size)];
        bucket
            .iter()
            .copied()
            .find(|&id| &self.entries[id].coord == coord)
    }

    /// Intern a brand-new entry, assigning it the next dense id.
    pub fn create(&mut self, coord: Coord, end_effector_cell: (i32, i32, i32)) -> StateId {
        let state_id = self.entries.len();
        let bucket_idx = hash_coord(&coord, self.table_size);
        self.entries.push(HashEntry {
            state_id,
            coord,
            end_effector_cell,
            continuous_state: Vec::new(),
            cached_heuristic: 0,
            cached_obstacle_distance: 0.0,
        });
        self.buckets[bucket_idx].push(state_id);
        state_id
    }

    /// Bucket-size histogram, for diagnostics only.
    pub fn bucket_histogram(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hash_is_pure_and_stable() {
        let c = Coord(vec![1, 2, 3, 4]);
        let h1 = hash_coord(&c, DEFAULT_TABLE_SIZE);
        let h2 = hash_coord(&c, DEFAULT_TABLE_SIZE);
        assert_eq!(h1, h2);
    }

    #[test]
    fn create_then_get_round_trips() {
        let mut table = StateTable::new(64);
        let coord = Coord(vec![3, 4]);
        let id = table.create(coord.clone(), (1, 2, 3));
        assert_eq!(table.get(&coord, false), Some(id));
        assert_eq!(table.get_by_id(id).state_id, id);
    }

    #[test]
    fn repeated_create_is_not_deduped_by_table_alone() {
        // StateTable.create always allocates; callers are responsible for
        // calling `get` first. This documents that contract.
        let mut table = StateTable::new(64);
        let coord = Coord(vec![5]);
        let a = table.create(coord.clone(), (0, 0, 0));
        let b = table.create(coord.clone(), (0, 0, 0));
        assert_ne!(a, b);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut table = StateTable::new(64);
        let coord = Coord(vec![7, 7]);
        let first = table.get(&coord, false).unwrap_or_else(|| table.create(coord.clone(), (0, 0, 0)));
        for _ in 0..10 {
            let id = table.get(&coord, false).unwrap_or_else(|| table.create(coord.clone(), (0, 0, 0)));
            assert_eq!(id, first);
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn goal_shortcut_ignores_coord() {
        let mut table = StateTable::new(64);
        let goal_coord = Coord(vec![0, 0]);
        let goal_id = table.create(goal_coord, (0, 0, 0));
        table.set_goal_id(goal_id);

        let other_coord = Coord(vec![9, 9]);
        assert_eq!(table.get(&other_coord, true), Some(goal_id));
    }

    #[test]
    fn distinct_entries_colliding_in_one_bucket_stay_distinct() {
        // Force a tiny table so a collision is certain, then confirm both
        // coords keep separate, stable ids.
        let mut table = StateTable::new(2);
        let a = Coord(vec![1, 0]);
        let b = Coord(vec![0, 1]);
        let id_a = table.create(a.clone(), (0, 0, 0));
        let id_b = table.create(b.clone(), (0, 0, 0));
        assert_ne!(id_a, id_b);
        assert_eq!(table.get(&a, false), Some(id_a));
        assert_eq!(table.get(&b, false), Some(id_b));
    }
}
