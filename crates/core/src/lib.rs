pub mod agent;
pub mod pathfinding;
pub mod planner;
pub mod risk;
pub mod snapshot;
pub mod trace;
pub mod types;

#[cfg(test)]
mod test_support;

pub use agent::Agent;
pub use planner::{GoalStack, MAX_RESOLUTION_STEPS, Planner};
pub use risk::{FightAssessment, assess};
pub use snapshot::{Field, HealthPack, ItemView, LevelSnapshot, Pawn, SnapshotError};
pub use trace::{DecisionTrace, TraceRecord};
pub use types::*;
