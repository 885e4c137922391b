//! Breadth-first hop-count expansion from the agent's cell.

use std::collections::{BTreeMap, btree_map::Entry};

use super::{CellSet, neighbors};
use crate::types::Location;

pub type DistanceMap = BTreeMap<Location, u32>;

/// Assigns every cell reachable from `origin` through `cells` its hop distance.
///
/// Expansion runs one whole layer at a time and stops after the layer that
/// first reaches `target`, or when a layer adds nothing. The origin itself
/// need not be in `cells`.
pub fn wavefront(origin: Location, target: Location, cells: &CellSet) -> DistanceMap {
    let mut distances = DistanceMap::new();
    distances.insert(origin, 0);
    if origin == target {
        return distances;
    }

    let mut frontier = vec![origin];
    while !frontier.is_empty() {
        let mut next_layer = Vec::new();
        for &current in &frontier {
            let dist = distances[&current];
            for neighbor in neighbors(current) {
                if !cells.contains(&neighbor) {
                    continue;
                }
                if let Entry::Vacant(entry) = distances.entry(neighbor) {
                    entry.insert(dist + 1);
                    next_layer.push(neighbor);
                }
            }
        }
        if distances.contains_key(&target) {
            break;
        }
        frontier = next_layer;
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_square(size: i32) -> CellSet {
        (0..size).flat_map(|y| (0..size).map(move |x| Location::new(x, y))).collect()
    }

    #[test]
    fn distances_are_hop_counts_not_straight_line() {
        let cells = open_square(5);
        let origin = Location::new(0, 0);
        let target = Location::new(3, 3);
        let distances = wavefront(origin, target, &cells);
        assert_eq!(distances[&target], 6);
        assert_eq!(distances[&Location::new(2, 1)], 3);
    }

    #[test]
    fn expansion_finishes_the_layer_that_reaches_the_target() {
        let cells = open_square(7);
        let origin = Location::new(3, 3);
        let target = Location::new(3, 4);
        let distances = wavefront(origin, target, &cells);
        assert_eq!(distances[&target], 1);
        // Every other cell of the first layer is also recorded.
        for neighbor in neighbors(origin) {
            assert_eq!(distances.get(&neighbor), Some(&1));
        }
        assert!(distances.values().all(|d| *d <= 1), "no expansion past the target's layer");
    }

    #[test]
    fn unreachable_target_exhausts_the_component() {
        let mut cells = open_square(4);
        cells.retain(|loc| loc.x != 2);
        let distances = wavefront(Location::new(0, 0), Location::new(3, 0), &cells);
        assert!(!distances.contains_key(&Location::new(3, 0)));
        assert_eq!(distances.len(), 8, "both reachable columns are fully expanded");
    }

    #[test]
    fn origin_outside_the_cell_set_still_expands() {
        let cells: CellSet = [Location::new(1, 0), Location::new(2, 0)].into_iter().collect();
        let distances = wavefront(Location::new(0, 0), Location::new(2, 0), &cells);
        assert_eq!(distances[&Location::new(2, 0)], 2);
    }
}
