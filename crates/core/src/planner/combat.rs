//! Fight-or-flee resolution for hostiles standing next to the agent.

use super::{Planner, Resolution};
use crate::risk::{FightAssessment, assess};
use crate::snapshot::{LevelSnapshot, Pawn};
use crate::types::{Action, DecisionEvent, Goal, PushReason};

impl Planner {
    /// Decides on adjacent hostiles; `None` when nothing is adjacent.
    pub(super) fn resolve_threat(&mut self, snapshot: &LevelSnapshot) -> Option<Resolution> {
        let me = &snapshot.player;
        let adjacent: Vec<(Pawn, FightAssessment)> = snapshot
            .adjacent_hostiles()
            .map(|hostile| (*hostile, assess(hostile, me)))
            .collect();

        let resolution = match adjacent.len() {
            0 => return None,
            n if n >= self.policy.mob_size => self.escape(snapshot, n),
            1 => {
                let (hostile, fight) = adjacent[0];
                if fight.safe_to_engage && me.health > self.panic_threshold() {
                    self.engage(snapshot, &hostile, &fight)
                } else {
                    self.escape(snapshot, 1)
                }
            }
            2 => match self.pick_from_pair(me, &adjacent) {
                Some((hostile, fight)) => self.engage(snapshot, &hostile, &fight),
                None => self.escape(snapshot, 2),
            },
            n => self.escape(snapshot, n),
        };
        Some(resolution)
    }

    /// Weakest of two adjacent hostiles, if the fight is affordable.
    fn pick_from_pair(
        &self,
        me: &Pawn,
        adjacent: &[(Pawn, FightAssessment)],
    ) -> Option<(Pawn, FightAssessment)> {
        let total_damage: i64 = adjacent.iter().map(|(_, fight)| i64::from(fight.damage_to_self)).sum();
        let health = i64::from(me.health.max(0));
        let exchanges_survived = if total_damage > 0 { health / total_damage } else { i64::MAX };
        let scaled_panic = i64::from(self.panic_threshold()) * i64::from(self.level);
        let healthy = health >= scaled_panic && health > total_damage;

        let mut by_weakness = adjacent.to_vec();
        by_weakness.sort_by_key(|(_, fight)| fight.hits_to_death);
        by_weakness.into_iter().find(|(_, fight)| {
            let needed = i64::from(fight.hits_to_death.saturating_add(self.policy.gang_margin));
            needed < exchanges_survived || healthy
        })
    }

    pub(super) fn engage(
        &mut self,
        snapshot: &LevelSnapshot,
        hostile: &Pawn,
        fight: &FightAssessment,
    ) -> Resolution {
        self.log.push(DecisionEvent::Engaged {
            target: hostile.location,
            hits_to_death: fight.hits_to_death,
        });
        Resolution::Act(Action::Attack(hostile.location - snapshot.player.location))
    }

    /// Pushes `Heal` and lets it decide; retreats to the exit if healing already gave up this tick.
    pub(super) fn escape(&mut self, snapshot: &LevelSnapshot, adjacent: usize) -> Resolution {
        if self.push(Goal::Heal, PushReason::Escape) {
            self.log.push(DecisionEvent::Escaped { adjacent });
            return Resolution::Delegate;
        }
        self.log.push(DecisionEvent::Retreated { adjacent });
        self.head_for_exit(snapshot)
    }
}
