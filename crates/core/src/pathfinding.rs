//! Wavefront grid search and route reconstruction over a traversable cell set.
//! This module exists so movement rules are shared by every goal behavior.
//! It does not own goal selection or combat policy.

use std::collections::BTreeSet;

use crate::snapshot::LevelSnapshot;
use crate::types::*;

mod nav;
mod route;
mod wavefront;

pub use nav::NavState;
pub use route::{Route, TieBreak, reconstruct};
pub use wavefront::{DistanceMap, wavefront};

pub type CellSet = BTreeSet<Location>;

/// Cells the agent may walk through at the given relaxation level.
///
/// Levels are cumulative: each one keeps everything the previous level allowed.
/// Cells holding hostiles are never included.
pub fn traversable_cells(snapshot: &LevelSnapshot, relaxation: Relaxation) -> CellSet {
    let occupied: BTreeSet<Location> = snapshot
        .items
        .values()
        .map(|item| item.location)
        .chain(snapshot.health_packs.values().map(|pack| pack.location))
        .chain(snapshot.hostiles.values().map(|hostile| hostile.location))
        .collect();

    let field = &snapshot.field;
    let mut cells: CellSet = field
        .cells_of_kind(CellKind::Empty)
        .chain(field.cells_of_kind(CellKind::Exit))
        .chain(field.cells_of_kind(CellKind::Start))
        .filter(|loc| !occupied.contains(loc))
        .collect();

    if relaxation >= Relaxation::HealthPacks {
        cells.extend(snapshot.health_packs.values().map(|pack| pack.location));
    }
    if relaxation >= Relaxation::Items {
        cells.extend(snapshot.items.values().map(|item| item.location));
    }
    if relaxation >= Relaxation::Traps {
        cells.extend(field.cells_of_kind(CellKind::Trap));
    }

    let hostiles: BTreeSet<Location> =
        snapshot.hostiles.values().map(|hostile| hostile.location).collect();
    cells.retain(|loc| !hostiles.contains(loc));
    cells
}

/// Shortest route from `origin` to `target`, shaped by `tie_break`.
pub fn search(
    origin: Location,
    target: Location,
    cells: &CellSet,
    tie_break: TieBreak<'_>,
) -> Option<Route> {
    let distances = wavefront(origin, target, cells);
    reconstruct(&distances, origin, target, tie_break)
}

pub fn neighbors(loc: Location) -> [Location; 4] {
    [
        Location { x: loc.x, y: loc.y - 1 },
        Location { x: loc.x, y: loc.y + 1 },
        Location { x: loc.x - 1, y: loc.y },
        Location { x: loc.x + 1, y: loc.y },
    ]
}
