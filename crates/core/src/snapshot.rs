//! Read-only level view handed to the core once per tick.
//! This module exists so the host boundary has one concrete, serializable shape.
//! It does not own any decision logic.

use std::error::Error;
use std::fmt;
use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use xxhash_rust::xxh3::Xxh3;

use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    pub location: Location,
    pub health: i32,
    pub attack: i32,
    pub defence: i32,
    pub total_attack: i32,
    pub total_defence: i32,
}

impl Pawn {
    /// A pawn whose totals equal its innate stats.
    pub fn new(location: Location, health: i32, attack: i32, defence: i32) -> Self {
        Self { location, health, attack, defence, total_attack: attack, total_defence: defence }
    }

    pub fn is_at_baseline(&self) -> bool {
        self.total_attack == self.attack && self.total_defence == self.defence
    }

    /// Combined attack and defence gained from equipment.
    pub fn equipment_bonus(&self) -> i32 {
        self.total_attack + self.total_defence - self.attack - self.defence
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub location: Location,
    pub attack_bonus: i32,
    pub defence_bonus: i32,
}

impl ItemView {
    pub fn bonus(&self) -> i32 {
        self.attack_bonus + self.defence_bonus
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPack {
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<CellKind>,
}

impl Field {
    /// An empty field with a wall border. A field with no rows or columns has no border.
    pub fn new(width: usize, height: usize) -> Self {
        if width == 0 || height == 0 {
            return Self::open(width, height);
        }
        let mut cells = vec![CellKind::Empty; width * height];
        for x in 0..width {
            cells[x] = CellKind::Wall;
            cells[(height - 1) * width + x] = CellKind::Wall;
        }
        for y in 0..height {
            cells[y * width] = CellKind::Wall;
            cells[y * width + (width - 1)] = CellKind::Wall;
        }
        Self { width, height, cells }
    }

    /// A field with no border walls; every cell starts empty.
    pub fn open(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![CellKind::Empty; width * height] }
    }

    pub fn in_bounds(&self, loc: Location) -> bool {
        loc.x >= 0 && loc.y >= 0 && (loc.x as usize) < self.width && (loc.y as usize) < self.height
    }

    /// Cells outside the field, or missing from a short grid, read as wall.
    pub fn cell_at(&self, loc: Location) -> CellKind {
        if !self.in_bounds(loc) {
            return CellKind::Wall;
        }
        self.cells.get(self.index(loc)).copied().unwrap_or(CellKind::Wall)
    }

    pub fn set_cell(&mut self, loc: Location, kind: CellKind) {
        if !self.in_bounds(loc) {
            return;
        }
        let idx = self.index(loc);
        if let Some(cell) = self.cells.get_mut(idx) {
            *cell = kind;
        }
    }

    /// Locations of every cell of `kind`. Cells past `width * height` are ignored.
    pub fn cells_of_kind(&self, kind: CellKind) -> impl Iterator<Item = Location> + '_ {
        self.cells
            .iter()
            .take(self.width * self.height)
            .enumerate()
            .filter(move |(_, cell)| **cell == kind)
            .map(|(idx, _)| Location { x: (idx % self.width) as i32, y: (idx / self.width) as i32 })
    }

    pub fn start(&self) -> Option<Location> {
        self.cells_of_kind(CellKind::Start).next()
    }

    pub fn exit(&self) -> Option<Location> {
        self.cells_of_kind(CellKind::Exit).next()
    }

    fn index(&self, loc: Location) -> usize {
        (loc.y as usize) * self.width + (loc.x as usize)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    MissingStart,
    MultipleStarts,
    MissingExit,
    MultipleExits,
    PlayerOutOfBounds(Location),
    CellCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::MissingStart => f.write_str("field has no start cell"),
            SnapshotError::MultipleStarts => f.write_str("field has more than one start cell"),
            SnapshotError::MissingExit => f.write_str("field has no exit cell"),
            SnapshotError::MultipleExits => f.write_str("field has more than one exit cell"),
            SnapshotError::PlayerOutOfBounds(loc) => {
                write!(f, "player at ({}, {}) is outside the field", loc.x, loc.y)
            }
            SnapshotError::CellCountMismatch { expected, actual } => {
                write!(f, "field declares {expected} cells but holds {actual}")
            }
        }
    }
}

impl Error for SnapshotError {}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub player: Pawn,
    pub hostiles: SlotMap<HostileId, Pawn>,
    pub items: SlotMap<ItemId, ItemView>,
    pub health_packs: SlotMap<HealthPackId, HealthPack>,
    pub field: Field,
}

impl LevelSnapshot {
    pub fn new(field: Field, player: Pawn) -> Self {
        Self {
            player,
            hostiles: SlotMap::with_key(),
            items: SlotMap::with_key(),
            health_packs: SlotMap::with_key(),
            field,
        }
    }

    pub fn add_hostile(&mut self, hostile: Pawn) -> HostileId {
        self.hostiles.insert(hostile)
    }

    pub fn add_item(&mut self, location: Location, attack_bonus: i32, defence_bonus: i32) -> ItemId {
        self.items.insert(ItemView { location, attack_bonus, defence_bonus })
    }

    pub fn add_health_pack(&mut self, location: Location) -> HealthPackId {
        self.health_packs.insert(HealthPack { location })
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        let expected = self.field.width * self.field.height;
        if self.field.cells.len() != expected {
            return Err(SnapshotError::CellCountMismatch { expected, actual: self.field.cells.len() });
        }
        match self.field.cells_of_kind(CellKind::Start).count() {
            0 => return Err(SnapshotError::MissingStart),
            1 => {}
            _ => return Err(SnapshotError::MultipleStarts),
        }
        match self.field.cells_of_kind(CellKind::Exit).count() {
            0 => return Err(SnapshotError::MissingExit),
            1 => {}
            _ => return Err(SnapshotError::MultipleExits),
        }
        if !self.field.in_bounds(self.player.location) {
            return Err(SnapshotError::PlayerOutOfBounds(self.player.location));
        }
        Ok(())
    }

    pub fn hostile_at(&self, loc: Location) -> Option<&Pawn> {
        self.hostiles.values().find(|hostile| hostile.location == loc)
    }

    pub fn adjacent_hostiles(&self) -> impl Iterator<Item = &Pawn> + '_ {
        let me = self.player.location;
        self.hostiles.values().filter(move |hostile| hostile.location.is_adjacent(me))
    }

    pub fn hostile_locations(&self) -> Vec<Location> {
        self.hostiles.values().map(|hostile| hostile.location).collect()
    }

    /// Stable hash of everything the core reads from the snapshot.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hash_pawn(&mut hasher, &self.player);
        hasher.write_usize(self.hostiles.len());
        for hostile in self.hostiles.values() {
            hash_pawn(&mut hasher, hostile);
        }
        hasher.write_usize(self.items.len());
        for item in self.items.values() {
            hash_location(&mut hasher, item.location);
            hasher.write_i32(item.attack_bonus);
            hasher.write_i32(item.defence_bonus);
        }
        hasher.write_usize(self.health_packs.len());
        for pack in self.health_packs.values() {
            hash_location(&mut hasher, pack.location);
        }
        hasher.write_usize(self.field.width);
        hasher.write_usize(self.field.height);
        for cell in &self.field.cells {
            hasher.write_u8(*cell as u8);
        }
        hasher.finish()
    }
}

fn hash_location(hasher: &mut Xxh3, loc: Location) {
    hasher.write_i32(loc.x);
    hasher.write_i32(loc.y);
}

fn hash_pawn(hasher: &mut Xxh3, pawn: &Pawn) {
    hash_location(hasher, pawn.location);
    hasher.write_i32(pawn.health);
    hasher.write_i32(pawn.attack);
    hasher.write_i32(pawn.defence);
    hasher.write_i32(pawn.total_attack);
    hasher.write_i32(pawn.total_defence);
}
