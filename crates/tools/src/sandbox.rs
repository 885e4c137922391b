//! Toy host that plays the decision core's actions back into a level.
//! This module exists so the tools can exercise the agent end to end from a seed.
//! It does not own any decision logic; hostiles stand still and only strike back.

use anyhow::{Result, ensure};
use delver_core::pathfinding::{TieBreak, search, traversable_cells};
use delver_core::{
    Action, Agent, CellKind, DecisionEvent, DecisionTrace, Field, Goal, LevelSnapshot, Location,
    Offset, Pawn, PlannerPolicy, Relaxation, assess,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

pub const MAX_HEALTH: i32 = 100;
pub const PACK_HEAL: i32 = 40;
pub const TRAP_DAMAGE: i32 = 10;

fn roll(rng: &mut ChaCha8Rng, below: u64) -> u64 {
    rng.next_u64() % below
}

fn random_interior(rng: &mut ChaCha8Rng, field: &Field) -> Location {
    Location::new(
        1 + roll(rng, field.width as u64 - 2) as i32,
        1 + roll(rng, field.height as u64 - 2) as i32,
    )
}

/// Builds a walled level from `seed` whose exit is always reachable from its start.
pub fn generate_level(seed: u64) -> LevelSnapshot {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let width = 12 + roll(&mut rng, 12) as usize;
    let height = 8 + roll(&mut rng, 8) as usize;
    let mut field = Field::new(width, height);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let kind = match roll(&mut rng, 25) {
                0..=2 => CellKind::Wall,
                3 => CellKind::Trap,
                _ => CellKind::Empty,
            };
            field.set_cell(Location::new(x as i32, y as i32), kind);
        }
    }

    let start = random_interior(&mut rng, &field);
    let mut exit = random_interior(&mut rng, &field);
    for _ in 0..16 {
        if exit.x.abs_diff(start.x) + exit.y.abs_diff(start.y) >= (width + height) as u32 / 3 {
            break;
        }
        exit = random_interior(&mut rng, &field);
    }
    if exit == start {
        exit = Location::new(start.x, if start.y == 1 { 2 } else { 1 });
    }
    field.set_cell(start, CellKind::Start);
    field.set_cell(exit, CellKind::Exit);
    carve_corridor(&mut field, start, exit);

    let mut snapshot = LevelSnapshot::new(field, Pawn::new(start, MAX_HEALTH, 10, 10));
    let free = |snapshot: &LevelSnapshot, loc: Location| {
        snapshot.field.cell_at(loc) == CellKind::Empty
            && snapshot.hostile_at(loc).is_none()
            && snapshot.items.values().all(|item| item.location != loc)
            && snapshot.health_packs.values().all(|pack| pack.location != loc)
    };

    for _ in 0..1 + roll(&mut rng, 5) {
        let loc = random_interior(&mut rng, &snapshot.field);
        if free(&snapshot, loc) {
            let health = 8 + roll(&mut rng, 60) as i32;
            let attack = 2 + roll(&mut rng, 14) as i32;
            let defence = 2 + roll(&mut rng, 14) as i32;
            snapshot.add_hostile(Pawn::new(loc, health, attack, defence));
        }
    }
    for _ in 0..roll(&mut rng, 4) {
        let loc = random_interior(&mut rng, &snapshot.field);
        if free(&snapshot, loc) {
            let attack_bonus = roll(&mut rng, 6) as i32;
            let defence_bonus = roll(&mut rng, 6) as i32;
            snapshot.add_item(loc, attack_bonus, defence_bonus);
        }
    }
    for _ in 0..roll(&mut rng, 4) {
        let loc = random_interior(&mut rng, &snapshot.field);
        if free(&snapshot, loc) {
            snapshot.add_health_pack(loc);
        }
    }
    snapshot
}

/// Clears walls along an L-shaped walk from `from` to `to` unless a route already exists.
fn carve_corridor(field: &mut Field, from: Location, to: Location) {
    let bare = LevelSnapshot::new(field.clone(), Pawn::new(from, MAX_HEALTH, 0, 0));
    let cells = traversable_cells(&bare, Relaxation::Traps);
    if search(from, to, &cells, TieBreak::Direct).is_some() {
        return;
    }
    let mut cursor = from;
    while cursor != to {
        if cursor.x != to.x {
            cursor.x += (to.x - cursor.x).signum();
        } else {
            cursor.y += (to.y - cursor.y).signum();
        }
        if field.cell_at(cursor) == CellKind::Wall {
            field.set_cell(cursor, CellKind::Empty);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Escaped,
    Died,
    OutOfTicks,
}

#[derive(Clone, Debug)]
pub struct Sandbox {
    snapshot: LevelSnapshot,
    tick: u64,
}

impl Sandbox {
    pub fn new(snapshot: LevelSnapshot) -> Self {
        Self { snapshot, tick: 0 }
    }

    pub fn snapshot(&self) -> &LevelSnapshot {
        &self.snapshot
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// `None` while the episode is still running.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.snapshot.player.health <= 0 {
            return Some(Outcome::Died);
        }
        (Some(self.snapshot.player.location) == self.snapshot.field.exit())
            .then_some(Outcome::Escaped)
    }

    /// Applies the agent's action, then lets every adjacent hostile strike back.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::NoAction => {}
            Action::Step(offset) => self.step(offset),
            Action::Attack(offset) => self.attack(offset),
        }
        if self.outcome().is_none() {
            self.retaliate();
        }
        self.tick += 1;
    }

    fn step(&mut self, offset: Offset) {
        if !offset.is_orthogonal_unit() {
            return;
        }
        let dest = self.snapshot.player.location + offset;
        let cell = self.snapshot.field.cell_at(dest);
        if cell == CellKind::Wall || self.snapshot.hostile_at(dest).is_some() {
            return;
        }
        let player = &mut self.snapshot.player;
        player.location = dest;
        if cell == CellKind::Trap {
            player.health -= TRAP_DAMAGE;
        }

        let item = self.snapshot.items.iter().find(|(_, item)| item.location == dest);
        if let Some((id, item)) = item.map(|(id, item)| (id, *item)) {
            self.snapshot.items.remove(id);
            let player = &mut self.snapshot.player;
            player.total_attack = player.attack + item.attack_bonus;
            player.total_defence = player.defence + item.defence_bonus;
        }
        let pack = self.snapshot.health_packs.iter().find(|(_, pack)| pack.location == dest);
        if let Some(id) = pack.map(|(id, _)| id) {
            self.snapshot.health_packs.remove(id);
            let player = &mut self.snapshot.player;
            player.health = (player.health + PACK_HEAL).min(MAX_HEALTH);
        }
    }

    fn attack(&mut self, offset: Offset) {
        if !offset.is_unit() {
            return;
        }
        let target = self.snapshot.player.location + offset;
        let me = self.snapshot.player;
        let Some((id, hostile)) =
            self.snapshot.hostiles.iter_mut().find(|(_, hostile)| hostile.location == target)
        else {
            return;
        };
        hostile.health -= assess(hostile, &me).damage_from_self;
        if hostile.health <= 0 {
            self.snapshot.hostiles.remove(id);
        }
    }

    fn retaliate(&mut self) {
        let me = self.snapshot.player;
        let damage: i32 =
            self.snapshot.adjacent_hostiles().map(|hostile| assess(hostile, &me).damage_to_self).sum();
        self.snapshot.player.health -= damage;
    }
}

/// Checks what must hold after every decision, whatever the level looks like.
pub fn check_tick(agent: &Agent, snapshot: &LevelSnapshot, action: Action) -> Result<()> {
    let planner = agent.planner();
    ensure!(planner.is_some(), "agent decided without an episode");
    if let Some(planner) = planner {
        let stack = planner.stack();
        ensure!(stack.bottom() == Goal::ReachExit, "bottom goal lost: {stack:?}");
        ensure!(stack.depth() <= Goal::ALL.len(), "goal stack too deep: {stack:?}");
    }
    ensure!(
        agent.log().last() != Some(&DecisionEvent::ResolutionCapReached),
        "resolution cap reached on tick {}",
        agent.ticks()
    );
    match action {
        Action::NoAction => {}
        Action::Step(offset) => {
            ensure!(offset.is_orthogonal_unit(), "step {offset:?} is not a single orthogonal move");
        }
        Action::Attack(offset) => {
            let target = snapshot.player.location + offset;
            ensure!(
                offset.is_unit() && snapshot.hostile_at(target).is_some(),
                "attack {offset:?} hits no adjacent hostile"
            );
        }
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub seed: u64,
    pub outcome: Outcome,
    pub ticks: u64,
    pub final_health: i32,
    pub trace: DecisionTrace,
}

impl RunReport {
    pub fn trace_hash(&self) -> u64 {
        self.trace.hash()
    }
}

/// Plays one generated level until the agent escapes, dies, or runs out of ticks.
pub fn simulate(seed: u64, max_ticks: u64, policy: PlannerPolicy) -> Result<RunReport> {
    let mut sandbox = Sandbox::new(generate_level(seed));
    let mut agent = Agent::with_tracing(policy);

    let outcome = loop {
        if let Some(outcome) = sandbox.outcome() {
            break outcome;
        }
        if sandbox.tick() >= max_ticks {
            break Outcome::OutOfTicks;
        }
        let action = agent.decide(sandbox.snapshot());
        check_tick(&agent, sandbox.snapshot(), action)?;
        sandbox.apply(action);
    };

    Ok(RunReport {
        seed,
        outcome,
        ticks: sandbox.tick(),
        final_health: sandbox.snapshot().player.health,
        trace: agent.trace().cloned().unwrap_or_default(),
    })
}
