//! Per-objective navigation state and the relaxation ladder.

use super::{CellSet, Route, TieBreak, search, traversable_cells};
use crate::snapshot::LevelSnapshot;
use crate::types::{Action, Location, Relaxation};

/// Working state for the current objective. Rebuilt on every request, never reused across ticks.
#[derive(Clone, Debug, Default)]
pub struct NavState {
    cells: CellSet,
    route: Route,
    relaxation: Option<Relaxation>,
    target: Option<Location>,
    path_exists: bool,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_exists(&self) -> bool {
        self.path_exists
    }

    /// The level that produced the current route.
    pub fn relaxation(&self) -> Option<Relaxation> {
        self.relaxation
    }

    pub fn target(&self) -> Option<Location> {
        self.target
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Routes toward `target`, widening traversability until a route appears.
    ///
    /// Returns the first step, `NoAction` when already standing on the target,
    /// or `None` when every relaxation level fails. The target cell itself is
    /// always walkable so occupied destinations can be approached.
    pub fn plan(
        &mut self,
        snapshot: &LevelSnapshot,
        target: Location,
        tie_break: TieBreak<'_>,
    ) -> Option<Action> {
        let origin = snapshot.player.location;
        self.reset();
        self.target = Some(target);

        for relaxation in Relaxation::LADDER {
            let mut cells = traversable_cells(snapshot, relaxation);
            cells.insert(target);
            let found = search(origin, target, &cells, tie_break);
            self.cells = cells;
            self.relaxation = Some(relaxation);
            if let Some(route) = found {
                self.route = route;
                self.path_exists = true;
                return Some(self.route.next_step(origin));
            }
        }

        self.relaxation = None;
        None
    }
}
