pub mod files;
pub mod sandbox;

pub use files::{load_policy, load_snapshot, write_trace};
pub use sandbox::{Outcome, RunReport, Sandbox, check_tick, generate_level, simulate};
