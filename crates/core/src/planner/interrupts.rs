//! Reactive checks evaluated before the active goal's own behavior.

use super::targets::{best_item, eligible_pickups, experience_target};
use super::{Planner, Resolution};
use crate::snapshot::LevelSnapshot;
use crate::types::{Goal, PushReason};

impl Planner {
    /// Threat, opportunity, experience, then low health; the first that fires wins.
    pub(super) fn interrupts(&mut self, goal: Goal, snapshot: &LevelSnapshot) -> Option<Resolution> {
        if matches!(goal, Goal::Heal | Goal::Begin) {
            return None;
        }

        let handles_own_target = goal == Goal::GainExperience && self.final_room;
        if !handles_own_target && let Some(resolution) = self.resolve_threat(snapshot) {
            return Some(resolution);
        }

        if goal != Goal::AcquireBestEquipment
            && best_item(snapshot).is_some()
            && self.push(Goal::AcquireBestEquipment, PushReason::BetterEquipment)
        {
            return Some(Resolution::Delegate);
        }

        if goal == Goal::ReachExit
            && experience_target(snapshot, &self.policy).is_some()
            && self.push(Goal::GainExperience, PushReason::Experience)
        {
            return Some(Resolution::Delegate);
        }

        if snapshot.player.health < self.panic_threshold()
            && !eligible_pickups(snapshot, &self.policy, self.final_room).is_empty()
            && self.push(Goal::Heal, PushReason::LowHealth)
        {
            return Some(Resolution::Delegate);
        }

        None
    }
}
