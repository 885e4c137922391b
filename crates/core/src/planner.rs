//! Reactive goal-stack planner: one action per tick from the top goal.
//! This module owns the per-episode session state and the resolve loop.
//! It does not own grid search or combat arithmetic.

use std::collections::BTreeSet;
use std::mem;

use crate::pathfinding::{NavState, TieBreak};
use crate::snapshot::LevelSnapshot;
use crate::types::*;

mod combat;
mod goals;
mod interrupts;
mod stack;
mod targets;

pub use stack::GoalStack;

/// Upper bound on goal frames visited in one tick.
///
/// Every goal except the bottom one is pushed at most once and popped at most
/// once per tick, so a well-formed tick never gets close.
pub const MAX_RESOLUTION_STEPS: usize = 2 * Goal::ALL.len();

/// Outcome of resolving one goal frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resolution {
    Act(Action),
    /// The stack changed; resolve the new top goal in this same tick.
    Delegate,
}

/// Session state for one level episode.
#[derive(Clone, Debug)]
pub struct Planner {
    stack: GoalStack,
    nav: NavState,
    policy: PlannerPolicy,
    level: u32,
    final_room: bool,
    // Goals popped during the current tick; interrupts may not push them again until the next one.
    settled: BTreeSet<Goal>,
    log: Vec<DecisionEvent>,
}

impl Planner {
    pub fn new(snapshot: &LevelSnapshot, level: u32, policy: PlannerPolicy) -> Self {
        let final_room = policy.final_room_hostiles == Some(snapshot.hostiles.len());
        Self {
            stack: GoalStack::for_episode(),
            nav: NavState::new(),
            policy,
            level,
            final_room,
            settled: BTreeSet::new(),
            log: vec![DecisionEvent::EpisodeStarted { level, final_room }],
        }
    }

    pub fn stack(&self) -> &GoalStack {
        &self.stack
    }

    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_final_room(&self) -> bool {
        self.final_room
    }

    pub fn panic_threshold(&self) -> i32 {
        self.policy.panic_threshold(self.level)
    }

    pub fn log(&self) -> &[DecisionEvent] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<DecisionEvent> {
        mem::take(&mut self.log)
    }

    /// Produces exactly one action for this tick.
    pub fn decide(&mut self, snapshot: &LevelSnapshot) -> Action {
        self.settled.clear();
        for _ in 0..MAX_RESOLUTION_STEPS {
            let goal = self.stack.top();
            self.log.push(DecisionEvent::GoalActive { goal });
            if let Resolution::Act(action) = self.resolve(goal, snapshot) {
                return action;
            }
        }
        self.log.push(DecisionEvent::ResolutionCapReached);
        Action::NoAction
    }

    fn resolve(&mut self, goal: Goal, snapshot: &LevelSnapshot) -> Resolution {
        if let Some(resolution) = self.interrupts(goal, snapshot) {
            return resolution;
        }
        match goal {
            Goal::Begin => self.settle(),
            Goal::ReachExit => self.reach_exit(snapshot),
            Goal::AcquireBestEquipment => self.acquire_best_equipment(snapshot),
            Goal::GainExperience => self.gain_experience(snapshot),
            Goal::Heal => self.heal(snapshot),
        }
    }

    fn push(&mut self, goal: Goal, reason: PushReason) -> bool {
        if self.settled.contains(&goal) || !self.stack.push(goal) {
            return false;
        }
        self.nav.reset();
        self.log.push(DecisionEvent::GoalPushed { goal, reason });
        true
    }

    /// Pops the top goal as done or impossible and hands over to the one below.
    fn settle(&mut self) -> Resolution {
        let goal = self.stack.pop();
        self.settled.insert(goal);
        self.nav.reset();
        self.log.push(DecisionEvent::GoalSettled { goal });
        Resolution::Delegate
    }

    /// Routes toward `target` for a goal that gives up when the route is gone.
    fn travel(
        &mut self,
        snapshot: &LevelSnapshot,
        target: Location,
        tie_break: TieBreak<'_>,
    ) -> Resolution {
        match self.try_route(snapshot, target, tie_break) {
            Some(action) if action != Action::NoAction => Resolution::Act(action),
            _ => self.settle(),
        }
    }

    fn try_route(
        &mut self,
        snapshot: &LevelSnapshot,
        target: Location,
        tie_break: TieBreak<'_>,
    ) -> Option<Action> {
        let Some(action) = self.nav.plan(snapshot, target, tie_break) else {
            self.log.push(DecisionEvent::RouteMissing { target });
            return None;
        };
        if let Some(relaxation) = self.nav.relaxation() {
            let walked = usize::from(action != Action::NoAction);
            let len = u16::try_from(self.nav.route().len() + walked).unwrap_or(u16::MAX);
            self.log.push(DecisionEvent::RouteFound { target, relaxation, len });
        }
        Some(action)
    }

    /// Steps toward the exit, or waits when it cannot be reached.
    fn head_for_exit(&mut self, snapshot: &LevelSnapshot) -> Resolution {
        let action = snapshot
            .field
            .exit()
            .and_then(|exit| self.try_route(snapshot, exit, TieBreak::Direct))
            .unwrap_or(Action::NoAction);
        Resolution::Act(action)
    }
}

#[cfg(test)]
mod tests;
