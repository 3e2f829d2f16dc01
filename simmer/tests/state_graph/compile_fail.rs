//! StateGraph compile failure cases: one test per class of malformed definition.

use std::sync::Arc;

use simmer::graph::{CompilationError, ConditionalEdge, StateGraph, END, START};

use crate::common::{parity_router, AddNode, Parity, TestState};

fn add(id: &'static str) -> Arc<AddNode> {
    Arc::new(AddNode { id, delta: 1 })
}

/// **Scenario**: No edge leaves START.
#[tokio::test]
async fn compile_fails_without_start_edge() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_edge("a", END);

    assert_eq!(graph.compile().err(), Some(CompilationError::MissingStart));
}

/// **Scenario**: Two edges leave START.
#[tokio::test]
async fn compile_fails_with_two_start_edges() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_node("b", add("b"));
    graph.add_edge(START, "a");
    graph.add_edge(START, "b");
    graph.add_edge("a", END);
    graph.add_edge("b", END);

    assert_eq!(graph.compile().err(), Some(CompilationError::MultipleStart));
}

/// **Scenario**: A static edge targets a node never registered.
#[tokio::test]
async fn compile_fails_on_dangling_static_target() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_edge(START, "a");
    graph.add_edge("a", "missing");

    match graph.compile() {
        Err(CompilationError::UnknownTarget { from, to }) => {
            assert_eq!(from, "a");
            assert_eq!(to, "missing");
        }
        other => panic!("expected UnknownTarget, got {:?}", other),
    }
}

/// **Scenario**: A decision table targets a node never registered.
#[tokio::test]
async fn compile_fails_on_dangling_conditional_target() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_conditional_edges(
        "a",
        ConditionalEdge::new(
            parity_router,
            [(Parity::Even, END), (Parity::Odd, "missing")],
        ),
    );
    graph.add_edge(START, "a");

    match graph.compile() {
        Err(CompilationError::UnknownTarget { from, to }) => {
            assert_eq!(from, "a");
            assert_eq!(to, "missing");
        }
        other => panic!("expected UnknownTarget, got {:?}", other),
    }
}

/// **Scenario**: The same node id is registered twice.
#[tokio::test]
async fn compile_fails_on_duplicate_node_id() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_node("a", add("a"));
    graph.add_edge(START, "a");
    graph.add_edge("a", END);

    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DuplicateNode {
            node: "a".to_string()
        })
    );
}

/// **Scenario**: END has an outgoing edge.
#[tokio::test]
async fn compile_fails_on_edge_leaving_end() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_edge(START, "a");
    graph.add_edge("a", END);
    graph.add_edge(END, "a");

    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::EdgeFromEnd {
            to: "a".to_string()
        })
    );
}

/// **Scenario**: A node declares both a static edge and conditional edges.
#[tokio::test]
async fn compile_fails_on_conflicting_routes() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_node("b", add("b"));
    graph.add_edge(START, "a");
    graph.add_edge("a", "b");
    graph.add_conditional_edges(
        "a",
        ConditionalEdge::new(parity_router, [(Parity::Even, "b"), (Parity::Odd, END)]),
    );
    graph.add_edge("b", END);

    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::ConflictingRoutes {
            node: "a".to_string()
        })
    );
}

/// **Scenario**: A node has no outgoing route; execution could never leave it.
#[tokio::test]
async fn compile_fails_on_node_without_outgoing_edge() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_edge(START, "a");

    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::NoOutgoing {
            node: "a".to_string()
        })
    );
}

/// **Scenario**: Conditional edges declared with an empty decision table.
#[tokio::test]
async fn compile_fails_on_empty_decision_table() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_edge(START, "a");
    let empty: [(Parity, &str); 0] = [];
    graph.add_conditional_edges("a", ConditionalEdge::new(parity_router, empty));

    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::EmptyDecisionTable {
            node: "a".to_string()
        })
    );
}

/// **Scenario**: A decision table omits a declared routing variant.
#[tokio::test]
async fn compile_fails_on_incomplete_decision_table() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_edge(START, "a");
    graph.add_conditional_edges(
        "a",
        ConditionalEdge::new(parity_router, [(Parity::Even, END)]),
    );

    match graph.compile() {
        Err(CompilationError::IncompleteDecisionTable { node, missing }) => {
            assert_eq!(node, "a");
            assert_eq!(missing, vec!["odd"]);
        }
        other => panic!("expected IncompleteDecisionTable, got {:?}", other),
    }
}

/// **Scenario**: A registered node is not reachable from START.
#[tokio::test]
async fn compile_fails_on_unreachable_node() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("a", add("a"));
    graph.add_node("island", add("island"));
    graph.add_edge(START, "a");
    graph.add_edge("a", END);
    graph.add_edge("island", END);

    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::Unreachable {
            node: "island".to_string()
        })
    );
}

/// **Scenario**: A well-formed graph (branching and rejoining) compiles.
#[tokio::test]
async fn compile_accepts_valid_branching_graph() {
    let mut graph = StateGraph::<TestState>::new();
    graph.add_node("decide", add("decide"));
    graph.add_node("even_node", add("even_node"));
    graph.add_node("odd_node", add("odd_node"));
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

    assert!(graph.compile().is_ok());
}
