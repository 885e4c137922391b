//! Shared test fixtures for the crate's unit test suites.
//! This module exists to avoid repeating level and pawn setup across many tests.
//! It does not own production decision logic.

use crate::snapshot::{Field, LevelSnapshot, Pawn};
use crate::types::*;

/// One-row corridor inside a wall border: start at x=1, exit at x=width-2, player on start.
pub(crate) fn corridor_snapshot(width: usize) -> LevelSnapshot {
    let mut field = Field::new(width, 3);
    field.set_cell(Location::new(1, 1), CellKind::Start);
    field.set_cell(Location::new(width as i32 - 2, 1), CellKind::Exit);
    LevelSnapshot::new(field, Pawn::new(Location::new(1, 1), 100, 10, 10))
}

/// Walled room with the start under the player and the given exit.
pub(crate) fn room_snapshot(
    width: usize,
    height: usize,
    player: Location,
    exit: Location,
) -> LevelSnapshot {
    let mut field = Field::new(width, height);
    field.set_cell(player, CellKind::Start);
    field.set_cell(exit, CellKind::Exit);
    LevelSnapshot::new(field, Pawn::new(player, 100, 10, 10))
}

/// Weak hostile: hits for 2 and dies to a single blow from the default player.
pub(crate) fn add_hostile(snapshot: &mut LevelSnapshot, location: Location, health: i32) -> HostileId {
    snapshot.add_hostile(Pawn::new(location, health, 5, 5))
}

/// Hostile the default player can never safely fight.
pub(crate) fn add_brute(snapshot: &mut LevelSnapshot, location: Location) -> HostileId {
    snapshot.add_hostile(Pawn::new(location, 500, 30, 30))
}

pub(crate) fn move_player(snapshot: &mut LevelSnapshot, location: Location) {
    snapshot.player.location = location;
}
