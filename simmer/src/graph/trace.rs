//! Trace events: structured per-node execution reporting.
//!
//! The run loop emits one [`TraceEvent`] per executed node through an
//! injectable [`TraceSink`]. Sinks must not block; the default sink forwards
//! to `tracing` and a recording sink is provided for tests.

use std::sync::Mutex;
use std::time::Duration;

/// Outcome of one node execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// The node's step function succeeded.
    Success,
    /// The step function failed and the node's declared fallback was applied.
    Recovered,
    /// The step function failed with no fallback; the invocation aborts.
    Failed,
}

/// One node execution: name, resolved decision (conditional edges only),
/// outcome, and wall-clock duration of the step function.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub node: String,
    /// Decision key resolved after the node, `None` for static edges and failures.
    pub decision: Option<&'static str>,
    pub outcome: TraceOutcome,
    pub duration: Duration,
}

/// Sink receiving trace events from the run loop.
///
/// Called synchronously between node executions; implementations must return
/// quickly (log, push to a channel, append to a buffer) and never block on I/O.
pub trait TraceSink: Send + Sync {
    fn record(&self, event: TraceEvent);
}

/// Default sink: forwards events to `tracing` with structured fields.
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, event: TraceEvent) {
        match event.outcome {
            TraceOutcome::Success => tracing::debug!(
                node = %event.node,
                decision = event.decision.unwrap_or("-"),
                duration_ms = event.duration.as_millis() as u64,
                "node complete"
            ),
            TraceOutcome::Recovered => tracing::warn!(
                node = %event.node,
                decision = event.decision.unwrap_or("-"),
                duration_ms = event.duration.as_millis() as u64,
                "node failed, fallback applied"
            ),
            TraceOutcome::Failed => tracing::error!(
                node = %event.node,
                duration_ms = event.duration.as_millis() as u64,
                "node failed"
            ),
        }
    }
}

/// Test sink: appends every event to an in-memory list.
pub struct RecordingSink {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().expect("trace sink lock").clone()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSink for RecordingSink {
    fn record(&self, event: TraceEvent) {
        self.events.lock().expect("trace sink lock").push(event);
    }
}
