//! Fight-or-flight estimates for a single hostile.
//! This module exists to keep the combat arithmetic pure and in one place.
//! It does not decide what to do with an assessment; the planner does.

use crate::snapshot::Pawn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FightAssessment {
    pub damage_to_self: i32,
    pub damage_from_self: i32,
    /// `u32::MAX` when the hostile cannot hurt us.
    pub hits_to_kill_self: u32,
    /// `u32::MAX` when we cannot hurt the hostile.
    pub hits_to_death: u32,
    pub safe_to_engage: bool,
}

/// Estimates one exchange of blows between `hostile` and `me`.
///
/// Damage is integer-truncated on both sides; our own damage is discounted to
/// 90% as a worst-case margin. Zero defence counts as one.
pub fn assess(hostile: &Pawn, me: &Pawn) -> FightAssessment {
    let damage_to_self = damage(hostile.total_attack, hostile.attack, me.total_defence, 10);
    let damage_from_self = damage(me.total_attack, me.attack, hostile.total_defence, 9);

    let hits_to_kill_self = hits(me.health, damage_to_self);
    let hits_to_death = hits(hostile.health, damage_from_self);

    FightAssessment {
        damage_to_self,
        damage_from_self,
        hits_to_kill_self,
        hits_to_death,
        safe_to_engage: hits_to_kill_self.saturating_add(1) > hits_to_death,
    }
}

fn damage(total_attack: i32, attack: i32, total_defence: i32, tenths: i64) -> i32 {
    let numerator = i64::from(total_attack) * i64::from(attack) * tenths;
    let denominator = i64::from(total_defence.max(1)) * 10;
    (numerator / denominator).clamp(0, i64::from(i32::MAX)) as i32
}

fn hits(health: i32, damage: i32) -> u32 {
    if damage <= 0 {
        return u32::MAX;
    }
    (health.max(0) / damage) as u32
}
