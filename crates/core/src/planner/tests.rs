//! Tests for the planner resolve loop, session setup, and goal-stack bookkeeping.


/// Shared imports for planner tests.
mod support {
    pub(super) use super::super::*;
    pub(super) use crate::test_support::*;

    pub(super) fn planner_for(snapshot: &LevelSnapshot) -> Planner {
        Planner::new(snapshot, 1, PlannerPolicy::default())
    }

    pub(super) fn pushed(planner: &Planner, goal: Goal, reason: PushReason) -> bool {
        planner.log().contains(&DecisionEvent::GoalPushed { goal, reason })
    }
}

use support::*;

#[test]
fn first_tick_settles_begin_and_heads_for_exit() {
    let snapshot = corridor_snapshot(8);
    let mut planner = planner_for(&snapshot);
    assert_eq!(planner.stack().top(), Goal::Begin);

    assert_eq!(planner.decide(&snapshot), Action::Step(Offset::new(1, 0)));
    assert_eq!(planner.stack().iter().collect::<Vec<_>>(), vec![Goal::ReachExit]);
    assert!(planner.log().contains(&DecisionEvent::GoalSettled { goal: Goal::Begin }));
}

#[test]
fn bottom_goal_waits_when_exit_is_unreachable() {
    let mut snapshot = corridor_snapshot(8);
    snapshot.field.set_cell(Location::new(4, 1), CellKind::Wall);
    let mut planner = planner_for(&snapshot);

    for _ in 0..3 {
        assert_eq!(planner.decide(&snapshot), Action::NoAction);
    }
    assert_eq!(planner.stack().depth(), 1);
    assert_eq!(planner.stack().bottom(), Goal::ReachExit);
    assert!(
        planner.log().contains(&DecisionEvent::RouteMissing { target: Location::new(6, 1) })
    );
}

#[test]
fn standing_on_the_exit_yields_no_action() {
    let mut snapshot = corridor_snapshot(8);
    move_player(&mut snapshot, Location::new(6, 1));
    let mut planner = planner_for(&snapshot);
    assert_eq!(planner.decide(&snapshot), Action::NoAction);
    assert_eq!(planner.stack().top(), Goal::ReachExit);
}

#[test]
fn final_room_is_flagged_by_configured_hostile_count() {
    let mut snapshot = corridor_snapshot(8);
    add_hostile(&mut snapshot, Location::new(5, 1), 10);
    assert!(planner_for(&snapshot).is_final_room());

    let policy = PlannerPolicy { final_room_hostiles: None, ..PlannerPolicy::default() };
    assert!(!Planner::new(&snapshot, 1, policy).is_final_room());

    add_hostile(&mut snapshot, Location::new(4, 1), 10);
    assert!(!planner_for(&snapshot).is_final_room());
}

#[test]
fn panic_threshold_scales_with_level_up_to_the_cap() {
    let snapshot = corridor_snapshot(8);
    let policy = PlannerPolicy::default();
    assert_eq!(Planner::new(&snapshot, 1, policy.clone()).panic_threshold(), 15);
    assert_eq!(Planner::new(&snapshot, 3, policy.clone()).panic_threshold(), 45);
    assert_eq!(Planner::new(&snapshot, 7, policy).panic_threshold(), 50);
}

#[test]
fn settled_goal_is_not_pushed_again_in_the_same_tick() {
    let mut snapshot = corridor_snapshot(10);
    // Best item sits behind a wall: the equipment goal gives up at once.
    snapshot.add_item(Location::new(8, 1), 4, 0);
    snapshot.field.set_cell(Location::new(7, 1), CellKind::Wall);
    snapshot.field.set_cell(Location::new(5, 1), CellKind::Exit);
    snapshot.field.set_cell(Location::new(8, 1), CellKind::Empty);
    let mut planner = planner_for(&snapshot);

    assert_eq!(planner.decide(&snapshot), Action::Step(Offset::new(1, 0)));
    let pushes = planner
        .log()
        .iter()
        .filter(|event| matches!(event, DecisionEvent::GoalPushed { .. }))
        .count();
    assert_eq!(pushes, 1);
    assert!(planner.log().contains(&DecisionEvent::GoalSettled {
        goal: Goal::AcquireBestEquipment
    }));
    assert!(!planner.log().contains(&DecisionEvent::ResolutionCapReached));
}

#[test]
fn longest_chain_of_interrupts_stays_under_the_cap() {
    let mut snapshot = room_snapshot(10, 10, Location::new(4, 4), Location::new(8, 8));
    snapshot.player.health = 60;
    // Item, hostile, and pack each sealed in a corner, so every pushed goal gives up.
    snapshot.add_item(Location::new(1, 1), 3, 0);
    add_hostile(&mut snapshot, Location::new(8, 1), 10);
    snapshot.add_health_pack(Location::new(1, 8));
    for wall in [(2, 1), (1, 2), (7, 1), (8, 2), (2, 8), (1, 7)] {
        snapshot.field.set_cell(Location::new(wall.0, wall.1), CellKind::Wall);
    }
    let policy = PlannerPolicy { final_room_hostiles: None, ..PlannerPolicy::default() };
    let mut planner = Planner::new(&snapshot, 1, policy);

    let action = planner.decide(&snapshot);
    assert!(matches!(action, Action::Step(_)), "got {action:?}");
    assert!(!planner.log().contains(&DecisionEvent::ResolutionCapReached));
    assert!(pushed(&planner, Goal::AcquireBestEquipment, PushReason::BetterEquipment));
    assert!(pushed(&planner, Goal::GainExperience, PushReason::Experience));
    assert!(pushed(&planner, Goal::Heal, PushReason::TopUpBeforeExit));
    for goal in [Goal::Begin, Goal::AcquireBestEquipment, Goal::GainExperience] {
        assert!(planner.log().contains(&DecisionEvent::GoalSettled { goal }), "{goal:?}");
    }

    let frames = planner
        .log()
        .iter()
        .filter(|event| matches!(event, DecisionEvent::GoalActive { .. }))
        .count();
    assert_eq!(frames, 7);
    assert!(frames <= MAX_RESOLUTION_STEPS);
    assert_eq!(planner.stack().top(), Goal::Heal);
}

#[test]
fn take_log_drains_events() {
    let snapshot = corridor_snapshot(8);
    let mut planner = planner_for(&snapshot);
    planner.decide(&snapshot);
    let events = planner.take_log();
    assert!(matches!(events[0], DecisionEvent::EpisodeStarted { level: 1, final_room: false }));
    assert!(planner.log().is_empty());
}
