//! Shared fixtures: a small counter state, test nodes, and test decisions.

use std::time::Duration;

use async_trait::async_trait;

use simmer::graph::{Decision, Node, PipelineState};
use simmer::AdapterError;

/// Minimal state for executor tests: one overwritable value.
#[derive(Debug, Clone, PartialEq)]
pub struct TestState {
    pub value: i32,
}

impl TestState {
    pub fn new(value: i32) -> Self {
        Self { value }
    }
}

/// Partial update: `None` leaves the value untouched.
#[derive(Debug, Clone, Default)]
pub struct TestUpdate {
    pub value: Option<i32>,
}

impl PipelineState for TestState {
    type Update = TestUpdate;

    fn apply(&mut self, update: TestUpdate) {
        if let Some(value) = update.value {
            self.value = value;
        }
    }
}

/// Node that reads the current value and writes `value + delta`.
pub struct AddNode {
    pub id: &'static str,
    pub delta: i32,
}

#[async_trait]
impl Node<TestState> for AddNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, state: &TestState) -> Result<TestUpdate, AdapterError> {
        Ok(TestUpdate {
            value: Some(state.value + self.delta),
        })
    }
}

/// Node that always fails; recovers through `fallback_value` when set.
pub struct FailingNode {
    pub id: &'static str,
    pub fallback_value: Option<i32>,
}

#[async_trait]
impl Node<TestState> for FailingNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, _state: &TestState) -> Result<TestUpdate, AdapterError> {
        Err(AdapterError::Transport("deliberate failure".to_string()))
    }

    fn fallback(&self) -> Option<TestUpdate> {
        self.fallback_value.map(|value| TestUpdate {
            value: Some(value),
        })
    }
}

/// Node that sleeps before writing; used for deadline tests.
pub struct SleepNode {
    pub id: &'static str,
    pub duration: Duration,
}

#[async_trait]
impl Node<TestState> for SleepNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, state: &TestState) -> Result<TestUpdate, AdapterError> {
        tokio::time::sleep(self.duration).await;
        Ok(TestUpdate {
            value: Some(state.value + 1),
        })
    }
}

/// Two-way decision on the sign of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl Decision for Parity {
    const ALL: &'static [Self] = &[Parity::Even, Parity::Odd];

    fn key(&self) -> &'static str {
        match self {
            Parity::Even => "even",
            Parity::Odd => "odd",
        }
    }
}

pub fn parity_router(state: &TestState) -> Parity {
    if state.value % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    }
}

/// Single-variant decision that always routes the same way; used to build a
/// deliberately cyclic graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Always {
    Again,
}

impl Decision for Always {
    const ALL: &'static [Self] = &[Always::Again];

    fn key(&self) -> &'static str {
        "again"
    }
}
