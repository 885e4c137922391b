//! Backward walk from target to origin over a distance map.

use std::collections::BTreeSet;

use super::{DistanceMap, neighbors};
use crate::types::{Action, Location};

/// How to choose among several distance-optimal predecessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak<'a> {
    /// Closest to the origin by straight-line distance.
    Direct,
    /// Fewest hostiles within one cell.
    Safety { hostiles: &'a [Location] },
}

impl TieBreak<'_> {
    fn key(&self, candidate: Location, origin: Location) -> i64 {
        match self {
            TieBreak::Direct => candidate.distance_sq(origin),
            TieBreak::Safety { hostiles } => {
                hostiles.iter().filter(|hostile| hostile.within(candidate, 1)).count() as i64
            }
        }
    }
}

/// Waypoints from the first step to the target; the next step is at the back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    waypoints: Vec<Location>,
}

impl Route {
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoints in walking order.
    pub fn cells(&self) -> impl Iterator<Item = Location> + '_ {
        self.waypoints.iter().rev().copied()
    }

    pub fn next_step(&mut self, from: Location) -> Action {
        match self.waypoints.pop() {
            Some(next) => Action::Step(next - from),
            None => Action::NoAction,
        }
    }
}

/// Rebuilds a shortest route by descending the distance map from `target`.
///
/// Cells already taken in this walk are skipped. When a cell has no usable
/// predecessor the last waypoint is dropped and the walk resumes from the one
/// before it, so every retry has strictly fewer candidates.
pub fn reconstruct(
    distances: &DistanceMap,
    origin: Location,
    target: Location,
    tie_break: TieBreak<'_>,
) -> Option<Route> {
    if !distances.contains_key(&target) {
        return None;
    }
    if origin == target {
        return Some(Route::default());
    }

    let mut waypoints = vec![target];
    let mut taken = BTreeSet::from([target]);
    let mut position = target;

    loop {
        let wanted = distances[&position].checked_sub(1)?;
        let mut candidates: Vec<Location> = neighbors(position)
            .into_iter()
            .filter(|cell| !taken.contains(cell) && distances.get(cell) == Some(&wanted))
            .collect();
        candidates.sort_by_key(|cell| tie_break.key(*cell, origin));

        match candidates.first() {
            Some(&next) => {
                taken.insert(next);
                if next == origin {
                    break;
                }
                waypoints.push(next);
                position = next;
            }
            None => {
                waypoints.pop();
                position = *waypoints.last()?;
            }
        }
    }

    Some(Route { waypoints })
}
