//! Per-tick decision traces and their stable hash.
//! This module exists so determinism can be checked by comparing one number across runs.
//! It does not own snapshot hashing or any decision making.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use crate::types::{Action, Goal, Offset};

pub const TRACE_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub tick: u64,
    pub level: u32,
    pub fingerprint: u64,
    /// Top of the goal stack after deciding.
    pub goal: Goal,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub format_version: u16,
    pub records: Vec<TraceRecord>,
}

impl Default for DecisionTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTrace {
    pub fn new() -> Self {
        Self { format_version: TRACE_FORMAT_VERSION, records: Vec::new() }
    }

    pub fn record(&mut self, record: TraceRecord) {
        self.records.push(record);
    }

    pub fn hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u16(self.format_version);
        hasher.write_usize(self.records.len());
        for record in &self.records {
            hasher.write_u64(record.tick);
            hasher.write_u32(record.level);
            hasher.write_u64(record.fingerprint);
            hasher.write_u8(record.goal as u8);
            let (tag, offset) = match record.action {
                Action::NoAction => (0, Offset::default()),
                Action::Step(offset) => (1, offset),
                Action::Attack(offset) => (2, offset),
            };
            hasher.write_u8(tag);
            hasher.write_i32(offset.dx);
            hasher.write_i32(offset.dy);
        }
        hasher.finish()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DecisionTrace {
        let mut trace = DecisionTrace::new();
        trace.record(TraceRecord {
            tick: 0,
            level: 1,
            fingerprint: 7,
            goal: Goal::ReachExit,
            action: Action::Step(Offset::new(1, 0)),
        });
        trace.record(TraceRecord {
            tick: 1,
            level: 1,
            fingerprint: 9,
            goal: Goal::Heal,
            action: Action::Attack(Offset::new(0, 1)),
        });
        trace
    }

    #[test]
    fn hash_depends_on_every_record_field() {
        let base = sample();
        assert_eq!(base.hash(), sample().hash());

        let mut moved = sample();
        moved.records[1].action = Action::Step(Offset::new(0, 1));
        assert_ne!(base.hash(), moved.hash(), "step and attack must not collide");

        let mut other_goal = sample();
        other_goal.records[0].goal = Goal::AcquireBestEquipment;
        assert_ne!(base.hash(), other_goal.hash());
    }

    #[test]
    fn json_round_trip_preserves_hash() {
        let trace = sample();
        let json = trace.to_json().expect("serialize trace");
        let back = DecisionTrace::from_json(&json).expect("parse trace");
        assert_eq!(back, trace);
        assert_eq!(back.hash(), trace.hash());
    }
}
