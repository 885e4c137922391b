use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct HostileId;
    pub struct ItemId;
    pub struct HealthPackId;
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev range test: both axis distances are at most `range`.
    pub fn within(self, other: Location, range: i32) -> bool {
        (self.x - other.x).abs() <= range && (self.y - other.y).abs() <= range
    }

    pub fn is_adjacent(self, other: Location) -> bool {
        self != other && self.within(other, 1)
    }

    /// Squared straight-line distance; orders candidates the same way the true distance does.
    pub fn distance_sq(self, other: Location) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_orthogonal_unit(self) -> bool {
        self.dx.abs() + self.dy.abs() == 1
    }

    pub fn is_unit(self) -> bool {
        self != Offset::default() && self.dx.abs() <= 1 && self.dy.abs() <= 1
    }
}

impl Sub for Location {
    type Output = Offset;

    fn sub(self, rhs: Location) -> Offset {
        Offset { dx: self.x - rhs.x, dy: self.y - rhs.y }
    }
}

impl Add<Offset> for Location {
    type Output = Location;

    fn add(self, rhs: Offset) -> Location {
        Location { x: self.x + rhs.dx, y: self.y + rhs.dy }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Wall,
    Trap,
    Start,
    Exit,
}

/// The single decision emitted per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[default]
    NoAction,
    Step(Offset),
    Attack(Offset),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Goal {
    ReachExit,
    AcquireBestEquipment,
    GainExperience,
    Heal,
    Begin,
}

impl Goal {
    pub const ALL: [Goal; 5] = [
        Goal::ReachExit,
        Goal::AcquireBestEquipment,
        Goal::GainExperience,
        Goal::Heal,
        Goal::Begin,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Goal::ReachExit => "reach-exit",
            Goal::AcquireBestEquipment => "acquire-best-equipment",
            Goal::GainExperience => "gain-experience",
            Goal::Heal => "heal",
            Goal::Begin => "begin",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Traversability levels, tried in order until a route is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Relaxation {
    Open,
    HealthPacks,
    Items,
    Traps,
}

impl Relaxation {
    pub const LADDER: [Relaxation; 4] =
        [Relaxation::Open, Relaxation::HealthPacks, Relaxation::Items, Relaxation::Traps];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushReason {
    BetterEquipment,
    Experience,
    LowHealth,
    TopUpBeforeExit,
    Escape,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionEvent {
    EpisodeStarted { level: u32, final_room: bool },
    GoalActive { goal: Goal },
    GoalPushed { goal: Goal, reason: PushReason },
    GoalSettled { goal: Goal },
    Engaged { target: Location, hits_to_death: u32 },
    Escaped { adjacent: usize },
    Retreated { adjacent: usize },
    RouteFound { target: Location, relaxation: Relaxation, len: u16 },
    RouteMissing { target: Location },
    ResolutionCapReached,
}

impl fmt::Display for DecisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionEvent::EpisodeStarted { level, final_room } => {
                write!(f, "episode {level} started (final room: {final_room})")
            }
            DecisionEvent::GoalActive { goal } => write!(f, "-----{goal}-----"),
            DecisionEvent::GoalPushed { goal, reason } => write!(f, "push {goal} ({reason:?})"),
            DecisionEvent::GoalSettled { goal } => write!(f, "{goal} done or impossible"),
            DecisionEvent::Engaged { target, hits_to_death } => write!(
                f,
                "attack hostile at ({}, {}), {hits_to_death} hits to kill",
                target.x, target.y
            ),
            DecisionEvent::Escaped { adjacent } => write!(f, "escape from {adjacent} hostiles"),
            DecisionEvent::Retreated { adjacent } => {
                write!(f, "retreat toward exit from {adjacent} hostiles")
            }
            DecisionEvent::RouteFound { target, relaxation, len } => write!(
                f,
                "route to ({}, {}) via {relaxation:?}, {len} steps",
                target.x, target.y
            ),
            DecisionEvent::RouteMissing { target } => {
                write!(f, "no route to ({}, {})", target.x, target.y)
            }
            DecisionEvent::ResolutionCapReached => f.write_str("resolution cap reached"),
        }
    }
}

/// Tunable constants of the decision heuristics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerPolicy {
    pub panic_per_level: i32,
    pub panic_cap: i32,
    pub gang_margin: u32,
    pub heal_below: i32,
    pub final_room_heal_at_or_below: i32,
    pub final_room_hostiles: Option<usize>,
    pub melee_min_health: i32,
    pub vision: i32,
    pub mob_size: usize,
}

impl Default for PlannerPolicy {
    fn default() -> Self {
        Self {
            panic_per_level: 15,
            panic_cap: 50,
            gang_margin: 4,
            heal_below: 100,
            final_room_heal_at_or_below: 30,
            final_room_hostiles: Some(1),
            melee_min_health: 30,
            vision: 100,
            mob_size: 3,
        }
    }
}

impl PlannerPolicy {
    /// Health below which survival outranks combat on the given level.
    pub fn panic_threshold(&self, level: u32) -> i32 {
        let level = i32::try_from(level).unwrap_or(i32::MAX);
        self.panic_per_level.saturating_mul(level).min(self.panic_cap)
    }
}
