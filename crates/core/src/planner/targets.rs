//! Target selection: equipment, healing pickups, and experience.

use crate::risk::{FightAssessment, assess};
use crate::snapshot::{LevelSnapshot, Pawn};
use crate::types::{Location, PlannerPolicy};

fn nearest<I>(from: Location, locations: I) -> Option<Location>
where
    I: IntoIterator<Item = Location>,
{
    locations.into_iter().min_by_key(|loc| loc.distance_sq(from))
}

pub(super) fn nearest_item(snapshot: &LevelSnapshot) -> Option<Location> {
    nearest(snapshot.player.location, snapshot.items.values().map(|item| item.location))
}

/// Nearest item carrying the highest bonus on the field, if that bonus beats what we wear.
pub(super) fn best_item(snapshot: &LevelSnapshot) -> Option<Location> {
    let best_bonus = snapshot.items.values().map(|item| item.bonus()).max()?;
    if best_bonus <= snapshot.player.equipment_bonus() {
        return None;
    }
    nearest(
        snapshot.player.location,
        snapshot
            .items
            .values()
            .filter(|item| item.bonus() == best_bonus)
            .map(|item| item.location),
    )
}

/// Healing pickups worth walking to right now, nearest first.
pub(super) fn eligible_pickups(
    snapshot: &LevelSnapshot,
    policy: &PlannerPolicy,
    final_room: bool,
) -> Vec<Location> {
    let health = snapshot.player.health;
    let wants_healing = if final_room {
        health <= policy.final_room_heal_at_or_below
    } else {
        health < policy.heal_below
    };
    if !wants_healing {
        return Vec::new();
    }

    let me = snapshot.player.location;
    let mut pickups: Vec<Location> =
        snapshot.health_packs.values().map(|pack| pack.location).collect();
    pickups.sort_by_key(|loc| loc.distance_sq(me));
    pickups
}

/// Cutoff on coordinate sums: hostiles far up-left of the agent are out of sight.
fn in_vision(me: Location, hostile: Location, vision: i32) -> bool {
    hostile.x + hostile.y >= me.x + me.y - vision
}

/// Nearest visible hostile that is safe to fight.
pub(super) fn experience_target(
    snapshot: &LevelSnapshot,
    policy: &PlannerPolicy,
) -> Option<(Pawn, FightAssessment)> {
    let me = snapshot.player.location;
    snapshot
        .hostiles
        .values()
        .filter(|hostile| in_vision(me, hostile.location, policy.vision))
        .map(|hostile| (*hostile, assess(hostile, &snapshot.player)))
        .filter(|(_, fight)| fight.safe_to_engage)
        .min_by_key(|(hostile, _)| hostile.location.distance_sq(me))
}
