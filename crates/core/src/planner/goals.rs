//! Per-goal behaviors. Each either acts or settles itself and delegates downward.

use super::targets::{best_item, eligible_pickups, experience_target, nearest_item};
use super::{Planner, Resolution};
use crate::pathfinding::TieBreak;
use crate::risk::assess;
use crate::snapshot::LevelSnapshot;
use crate::types::{Action, DecisionEvent, Goal, PushReason};

impl Planner {
    pub(super) fn reach_exit(&mut self, snapshot: &LevelSnapshot) -> Resolution {
        if !eligible_pickups(snapshot, &self.policy, self.final_room).is_empty()
            && self.push(Goal::Heal, PushReason::TopUpBeforeExit)
        {
            return Resolution::Delegate;
        }
        // Bottom goal: an unreachable exit means waiting, never popping.
        self.head_for_exit(snapshot)
    }

    pub(super) fn acquire_best_equipment(&mut self, snapshot: &LevelSnapshot) -> Resolution {
        let target = if snapshot.player.is_at_baseline() {
            nearest_item(snapshot)
        } else {
            best_item(snapshot)
        };
        match target {
            Some(item) => self.travel(snapshot, item, TieBreak::Direct),
            None => self.settle(),
        }
    }

    pub(super) fn gain_experience(&mut self, snapshot: &LevelSnapshot) -> Resolution {
        let Some((hostile, fight)) = experience_target(snapshot, &self.policy) else {
            return self.settle();
        };
        let me = snapshot.player;
        if !hostile.location.is_adjacent(me.location) {
            return self.travel(snapshot, hostile.location, TieBreak::Direct);
        }
        if me.health > self.policy.melee_min_health {
            self.engage(snapshot, &hostile, &fight)
        } else {
            let adjacent = snapshot.adjacent_hostiles().count();
            self.escape(snapshot, adjacent)
        }
    }

    /// Walks to the nearest reachable pickup along the least threatened route.
    ///
    /// Traversability is rebuilt from this tick's snapshot for every candidate.
    pub(super) fn heal(&mut self, snapshot: &LevelSnapshot) -> Resolution {
        let pickups = eligible_pickups(snapshot, &self.policy, self.final_room);
        if pickups.is_empty() {
            return self.settle();
        }

        let hostiles = snapshot.hostile_locations();
        for pickup in pickups {
            match self.try_route(snapshot, pickup, TieBreak::Safety { hostiles: &hostiles }) {
                Some(Action::NoAction) | None => continue,
                Some(action) => return Resolution::Act(action),
            }
        }

        let me = snapshot.player;
        let adjacent: Vec<_> = snapshot.adjacent_hostiles().copied().collect();
        if !adjacent.is_empty() && adjacent.len() < self.policy.mob_size {
            let weakest = adjacent
                .iter()
                .map(|hostile| (hostile, assess(hostile, &me)))
                .min_by_key(|(_, fight)| fight.hits_to_death);
            if let Some((hostile, fight)) = weakest {
                return self.engage(snapshot, hostile, &fight);
            }
        }
        if !adjacent.is_empty() {
            self.log.push(DecisionEvent::Retreated { adjacent: adjacent.len() });
        }
        self.head_for_exit(snapshot)
    }
}
