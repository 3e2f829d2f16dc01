//! Run-loop behavior: merge semantics, fallback policy, step budget,
//! deadlines, checkpoints, and trace events.

use std::sync::Arc;
use std::time::Duration;

use simmer::graph::{
    ConditionalEdge, RecordingSink, RunConfig, StateGraph, TraceOutcome, END, START,
};
use simmer::memory::{Checkpointer, MemorySaver};
use simmer::PipelineError;

use crate::common::{
    parity_router, AddNode, Always, FailingNode, Parity, SleepNode, TestState,
};

fn add(id: &'static str, delta: i32) -> Arc<AddNode> {
    Arc::new(AddNode { id, delta })
}

/// **Scenario**: A linear chain merges each node's update in order: 0 → +1 → +2.
#[tokio::test]
async fn invoke_linear_chain_merges_in_order() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("first", add("first", 1));
    graph.add_node("second", add("second", 2));
    graph.add_edge(START, "first");
    graph.add_edge("first", "second");
    graph.add_edge("second", END);
    let compiled = graph.compile().expect("graph compiles");

    let out = compiled
        .invoke(TestState::new(0), RunConfig::default())
        .await
        .unwrap();
    assert_eq!(out.value, 3);
}

/// **Scenario**: Conditional routing sends even and odd states down different branches.
#[tokio::test]
async fn invoke_conditional_routes_by_state() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("decide", add("decide", 0));
    graph.add_node("even_node", add("even_node", 10));
    graph.add_node("odd_node", add("odd_node", 100));
    graph.add_edge(START, "decide");
    graph.add_conditional_edges(
        "decide",
        ConditionalEdge::new(
            parity_router,
            [(Parity::Even, "even_node"), (Parity::Odd, "odd_node")],
        ),
    );
    graph.add_edge("even_node", END);
    graph.add_edge("odd_node", END);
    let compiled = graph.compile().expect("graph compiles");

    let even = compiled
        .invoke(TestState::new(2), RunConfig::default())
        .await
        .unwrap();
    assert_eq!(even.value, 12, "state 2 -> even_node -> +10");

    let odd = compiled
        .invoke(TestState::new(1), RunConfig::default())
        .await
        .unwrap();
    assert_eq!(odd.value, 101, "state 1 -> odd_node -> +100");
}

/// **Scenario**: A failing node with a declared fallback recovers and the run completes.
#[tokio::test]
async fn invoke_fallback_recovers_and_continues() {
    let sink = Arc::new(RecordingSink::new());
    let mut graph = StateGraph::<TestState>::new().with_trace_sink(sink.clone());
    graph.add_node(
        "flaky",
        Arc::new(FailingNode {
            id: "flaky",
            fallback_value: Some(7),
        }),
    );
    graph.add_node("after", add("after", 1));
    graph.add_edge(START, "flaky");
    graph.add_edge("flaky", "after");
    graph.add_edge("after", END);
    let compiled = graph.compile().expect("graph compiles");

    let out = compiled
        .invoke(TestState::new(0), RunConfig::default())
        .await
        .unwrap();
    assert_eq!(out.value, 8, "fallback 7, then +1");

    let events = sink.events();
    assert_eq!(events[0].outcome, TraceOutcome::Recovered);
    assert_eq!(events[1].outcome, TraceOutcome::Success);
}

/// **Scenario**: A failing node without a fallback aborts the run, naming the node.
#[tokio::test]
async fn invoke_failure_without_fallback_propagates() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node(
        "fatal",
        Arc::new(FailingNode {
            id: "fatal",
            fallback_value: None,
        }),
    );
    graph.add_edge(START, "fatal");
    graph.add_edge("fatal", END);
    let compiled = graph.compile().expect("graph compiles");

    match compiled
        .invoke(TestState::new(0), RunConfig::default())
        .await
    {
        Err(PipelineError::Adapter { node, .. }) => assert_eq!(node, "fatal"),
        other => panic!("expected Adapter error, got {:?}", other),
    }
}

/// **Scenario**: A deliberately cyclic graph hits the step budget instead of hanging.
#[tokio::test]
async fn invoke_cyclic_graph_hits_step_budget() {
    let mut graph = StateGraph::<TestState>::new().with_max_steps(4);
    graph.add_node("spin", add("spin", 1));
    graph.add_edge(START, "spin");
    graph.add_conditional_edges(
        "spin",
        ConditionalEdge::new(|_: &TestState| Always::Again, [(Always::Again, "spin")]),
    );
    let compiled = graph.compile().expect("graph compiles");

    match compiled
        .invoke(TestState::new(0), RunConfig::default())
        .await
    {
        Err(PipelineError::MaxStepsExceeded { limit }) => assert_eq!(limit, 4),
        other => panic!("expected MaxStepsExceeded, got {:?}", other),
    }
}

/// **Scenario**: A deadline shorter than a node's sleep aborts the in-flight step
/// with a distinct Cancelled outcome.
#[tokio::test]
async fn invoke_deadline_aborts_inflight_node() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node(
        "slow",
        Arc::new(SleepNode {
            id: "slow",
            duration: Duration::from_secs(30),
        }),
    );
    graph.add_edge(START, "slow");
    graph.add_edge("slow", END);
    let compiled = graph.compile().expect("graph compiles");

    let config = RunConfig {
        deadline: Some(Duration::from_millis(20)),
        ..Default::default()
    };
    match compiled.invoke(TestState::new(0), config).await {
        Err(PipelineError::Cancelled) => {}
        other => panic!("expected Cancelled, got {:?}", other),
    }
}

/// **Scenario**: An already-expired deadline cancels before the first node runs.
#[tokio::test]
async fn invoke_expired_deadline_cancels_before_first_node() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("first", add("first", 1));
    graph.add_edge(START, "first");
    graph.add_edge("first", END);
    let compiled = graph.compile().expect("graph compiles");

    let config = RunConfig {
        deadline: Some(Duration::ZERO),
        ..Default::default()
    };
    match compiled.invoke(TestState::new(0), config).await {
        Err(PipelineError::Cancelled) => {}
        other => panic!("expected Cancelled, got {:?}", other),
    }
}

/// **Scenario**: With a checkpointer and session id, the final state is loadable.
#[tokio::test]
async fn invoke_with_checkpointer_saves_per_session() {
    let saver = Arc::new(MemorySaver::<TestState>::new());
    let mut graph = StateGraph::<TestState>::new().with_checkpointer(saver.clone());
    graph.add_node("first", add("first", 1));
    graph.add_node("second", add("second", 2));
    graph.add_edge(START, "first");
    graph.add_edge("first", "second");
    graph.add_edge("second", END);
    let compiled = graph.compile().expect("graph compiles");

    let config = RunConfig {
        session_id: Some("session-1".to_string()),
        ..Default::default()
    };
    let out = compiled.invoke(TestState::new(0), config).await.unwrap();
    assert_eq!(out.value, 3);

    let saved = saver.load("session-1").await.unwrap();
    assert_eq!(saved, Some(out));
    assert_eq!(saver.load("other").await.unwrap(), None);
}

/// **Scenario**: Without a session id, nothing is checkpointed.
#[tokio::test]
async fn invoke_without_session_id_skips_checkpoints() {
    let saver = Arc::new(MemorySaver::<TestState>::new());
    let mut graph = StateGraph::<TestState>::new().with_checkpointer(saver.clone());
    graph.add_node("first", add("first", 1));
    graph.add_edge(START, "first");
    graph.add_edge("first", END);
    let compiled = graph.compile().expect("graph compiles");

    compiled
        .invoke(TestState::new(0), RunConfig::default())
        .await
        .unwrap();
    assert_eq!(saver.load("session-1").await.unwrap(), None);
}

/// **Scenario**: One trace event per executed node; conditional nodes carry
/// their resolved decision, static nodes none.
#[tokio::test]
async fn invoke_emits_one_trace_event_per_node() {
    let sink = Arc::new(RecordingSink::new());
    let mut graph = StateGraph::<TestState>::new().with_trace_sink(sink.clone());
    graph.add_node("decide", add("decide", 0));
    graph.add_node("even_node", add("even_node", 10));
    graph.add_node("odd_node", add("odd_node", 100));
    graph.add_edge(START, "decide");
    graph.add_conditional_edges(
        "decide",
        ConditionalEdge::new(
            parity_router,
            [(Parity::Even, "even_node"), (Parity::Odd, "odd_node")],
        ),
    );
    graph.add_edge("even_node", END);
    graph.add_edge("odd_node", END);
    let compiled = graph.compile().expect("graph compiles");

    compiled
        .invoke(TestState::new(2), RunConfig::default())
        .await
        .unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].node, "decide");
    assert_eq!(events[0].decision, Some("even"));
    assert_eq!(events[0].outcome, TraceOutcome::Success);
    assert_eq!(events[1].node, "even_node");
    assert_eq!(events[1].decision, None);
}
