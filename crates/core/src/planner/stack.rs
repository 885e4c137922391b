//! Last-in-first-out goal stack with a permanent bottom goal.

use crate::types::Goal;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalStack {
    goals: Vec<Goal>,
}

impl GoalStack {
    /// `ReachExit` at the bottom, `Begin` on top.
    pub fn for_episode() -> Self {
        Self { goals: vec![Goal::ReachExit, Goal::Begin] }
    }

    pub fn top(&self) -> Goal {
        *self.goals.last().expect("goal stack is never empty during an episode")
    }

    pub fn bottom(&self) -> Goal {
        self.goals[0]
    }

    pub fn depth(&self) -> usize {
        self.goals.len()
    }

    pub fn contains(&self, goal: Goal) -> bool {
        self.goals.contains(&goal)
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = Goal> + '_ {
        self.goals.iter().copied()
    }

    /// Pushes `goal` unless it is already somewhere on the stack.
    pub fn push(&mut self, goal: Goal) -> bool {
        if self.contains(goal) {
            return false;
        }
        self.goals.push(goal);
        true
    }

    pub fn pop(&mut self) -> Goal {
        assert!(self.goals.len() > 1, "the bottom goal {} must never be popped", self.goals[0]);
        self.goals.pop().expect("stack holds more than the bottom goal")
    }
}
