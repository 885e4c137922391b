//! Host-facing decision agent spanning many level episodes.
//! This module exists to detect episode boundaries and own the planner session between ticks.
//! It does not own goal logic, search, or the simulation it is driving.

use std::mem;

use crate::planner::Planner;
use crate::snapshot::LevelSnapshot;
use crate::trace::{DecisionTrace, TraceRecord};
use crate::types::*;

#[derive(Clone, Debug, Default)]
pub struct Agent {
    policy: PlannerPolicy,
    level: u32,
    planner: Option<Planner>,
    // Level index only advances when the agent newly arrives on a start cell.
    was_on_start: bool,
    ticks: u64,
    log: Vec<DecisionEvent>,
    trace: Option<DecisionTrace>,
}

impl Agent {
    pub fn new(policy: PlannerPolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /// An agent that also records every tick into a [`DecisionTrace`].
    pub fn with_tracing(policy: PlannerPolicy) -> Self {
        Self { trace: Some(DecisionTrace::new()), ..Self::new(policy) }
    }

    pub fn policy(&self) -> &PlannerPolicy {
        &self.policy
    }

    /// One-based index of the current episode; zero before the first tick.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn planner(&self) -> Option<&Planner> {
        self.planner.as_ref()
    }

    pub fn active_goal(&self) -> Option<Goal> {
        self.planner.as_ref().map(|planner| planner.stack().top())
    }

    pub fn log(&self) -> &[DecisionEvent] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<DecisionEvent> {
        mem::take(&mut self.log)
    }

    pub fn trace(&self) -> Option<&DecisionTrace> {
        self.trace.as_ref()
    }

    /// Decides this tick's action. Standing on the start cell starts a fresh episode.
    pub fn decide(&mut self, snapshot: &LevelSnapshot) -> Action {
        let on_start = snapshot.field.cell_at(snapshot.player.location) == CellKind::Start;
        if (on_start && !self.was_on_start) || self.level == 0 {
            self.level += 1;
        }
        if on_start {
            self.planner = None;
        }
        self.was_on_start = on_start;

        let level = self.level;
        let policy = &self.policy;
        let planner =
            self.planner.get_or_insert_with(|| Planner::new(snapshot, level, policy.clone()));
        let action = planner.decide(snapshot);
        let goal = planner.stack().top();
        self.log.append(&mut planner.take_log());

        if let Some(trace) = self.trace.as_mut() {
            trace.record(TraceRecord {
                tick: self.ticks,
                level,
                fingerprint: snapshot.fingerprint(),
                goal,
                action,
            });
        }
        self.ticks += 1;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Field, Pawn};
    use crate::test_support::*;

    #[test]
    fn first_tick_opens_level_one() {
        let snapshot = corridor_snapshot(8);
        let mut agent = Agent::default();
        assert_eq!(agent.level(), 0);
        assert_eq!(agent.active_goal(), None);

        assert_eq!(agent.decide(&snapshot), Action::Step(Offset::new(1, 0)));
        assert_eq!(agent.level(), 1);
        assert_eq!(agent.active_goal(), Some(Goal::ReachExit));
        assert!(matches!(agent.log()[0], DecisionEvent::EpisodeStarted { level: 1, .. }));
    }

    #[test]
    fn planner_state_carries_across_ticks_away_from_start() {
        let mut snapshot = corridor_snapshot(10);
        snapshot.player.health = 10;
        snapshot.add_health_pack(Location::new(5, 1));
        let mut agent = Agent::default();
        agent.decide(&snapshot);
        assert_eq!(agent.active_goal(), Some(Goal::Heal));

        move_player(&mut snapshot, Location::new(2, 1));
        agent.decide(&snapshot);
        assert_eq!(agent.active_goal(), Some(Goal::Heal));
        assert_eq!(agent.level(), 1);
    }

    #[test]
    fn returning_to_start_begins_the_next_level() {
        let mut snapshot = corridor_snapshot(8);
        let mut agent = Agent::default();
        agent.decide(&snapshot);
        move_player(&mut snapshot, Location::new(3, 1));
        agent.decide(&snapshot);
        assert_eq!(agent.level(), 1);

        move_player(&mut snapshot, Location::new(1, 1));
        agent.decide(&snapshot);
        assert_eq!(agent.level(), 2);
        let episodes = agent
            .log()
            .iter()
            .filter(|event| matches!(event, DecisionEvent::EpisodeStarted { .. }))
            .count();
        assert_eq!(episodes, 2);
    }

    #[test]
    fn waiting_on_start_resets_state_without_advancing_level() {
        let mut field = Field::new(5, 3);
        field.set_cell(Location::new(1, 1), CellKind::Start);
        field.set_cell(Location::new(3, 1), CellKind::Exit);
        field.set_cell(Location::new(2, 1), CellKind::Wall);
        let snapshot = LevelSnapshot::new(field, Pawn::new(Location::new(1, 1), 100, 10, 10));
        let mut agent = Agent::default();

        for _ in 0..3 {
            assert_eq!(agent.decide(&snapshot), Action::NoAction);
        }
        assert_eq!(agent.level(), 1);
        assert_eq!(agent.ticks(), 3);
        let episodes = agent
            .log()
            .iter()
            .filter(|event| matches!(event, DecisionEvent::EpisodeStarted { .. }))
            .count();
        assert_eq!(episodes, 3, "every tick on the start cell reinitializes");
    }

    #[test]
    fn panic_threshold_rises_with_levels() {
        let mut snapshot = corridor_snapshot(8);
        let mut agent = Agent::default();
        for _ in 0..3 {
            move_player(&mut snapshot, Location::new(1, 1));
            agent.decide(&snapshot);
            move_player(&mut snapshot, Location::new(2, 1));
            agent.decide(&snapshot);
        }
        assert_eq!(agent.level(), 3);
        assert_eq!(agent.planner().map(Planner::panic_threshold), Some(45));
    }

    #[test]
    fn configured_policy_reaches_the_planner() {
        let policy = PlannerPolicy { panic_per_level: 20, ..PlannerPolicy::default() };
        let mut agent = Agent::new(policy.clone());
        agent.decide(&corridor_snapshot(8));
        assert_eq!(agent.policy(), &policy);
        assert_eq!(agent.planner().map(Planner::panic_threshold), Some(20));
    }

    #[test]
    fn short_cell_grid_yields_no_action() {
        let mut snapshot = corridor_snapshot(8);
        snapshot.field.cells.truncate(5);
        let mut agent = Agent::default();

        assert_eq!(agent.decide(&snapshot), Action::NoAction);
        assert_eq!(agent.level(), 1);
        assert_eq!(agent.active_goal(), Some(Goal::ReachExit));
    }

    #[test]
    fn tracing_records_one_entry_per_tick() {
        let mut snapshot = corridor_snapshot(8);
        let mut agent = Agent::with_tracing(PlannerPolicy::default());
        agent.decide(&snapshot);
        move_player(&mut snapshot, Location::new(2, 1));
        agent.decide(&snapshot);

        let trace = agent.trace().expect("tracing enabled");
        assert_eq!(trace.records.len(), 2);
        assert_eq!(trace.records[1].tick, 1);
        assert_eq!(trace.records[1].fingerprint, snapshot.fingerprint());
        assert_eq!(trace.records[1].goal, Goal::ReachExit);
        assert!(Agent::default().trace().is_none());
    }

    #[test]
    fn take_log_drains_agent_events() {
        let snapshot = corridor_snapshot(8);
        let mut agent = Agent::default();
        agent.decide(&snapshot);
        assert!(!agent.take_log().is_empty());
        assert!(agent.log().is_empty());
    }
}
