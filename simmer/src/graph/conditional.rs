//! Conditional edges: route to the next node through a closed decision table.
//!
//! A source node declares a routing function returning a value of a closed
//! [`Decision`] enum plus a table mapping every decision key to a target node
//! (or END). The key set is fixed at build time; `StateGraph::compile` rejects
//! tables that miss a declared variant, so a run-time lookup miss is a
//! programming error surfaced as `PipelineError::Routing`.
//!
//! **Interaction**: Built by callers, registered via
//! `StateGraph::add_conditional_edges`, resolved in the `CompiledGraph` run loop.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// A closed set of routing outcomes for one conditional edge.
///
/// Implementors are small fieldless enums. `ALL` enumerates every variant so
/// the compiler can check decision tables for completeness; `key` is the
/// stable string used in tables, errors, and trace events.
pub trait Decision: Copy + Debug + Send + Sync + 'static {
    /// Every variant of the decision enum.
    const ALL: &'static [Self];

    /// Stable key for this variant (e.g. "web_search").
    fn key(&self) -> &'static str;
}

/// Routing function plus decision table for one source node.
///
/// The router inspects post-merge state and returns a decision; the table maps
/// the decision key to the next node id or END. The router never mutates state.
#[derive(Clone)]
pub struct ConditionalEdge<S> {
    pub(super) router: Arc<dyn Fn(&S) -> &'static str + Send + Sync>,
    pub(super) table: HashMap<&'static str, String>,
    /// Decision keys declared by the enum but absent from the table.
    /// Non-empty is a compile error, recorded here so `compile` can name them.
    pub(super) missing: Vec<&'static str>,
}

impl<S> ConditionalEdge<S> {
    /// Builds a conditional edge from a typed router and its decision table.
    ///
    /// `targets` must cover every variant of `D`; variants left out are
    /// reported by `StateGraph::compile` as an incomplete table.
    pub fn new<D, F, T, I>(router: F, targets: T) -> Self
    where
        D: Decision,
        F: Fn(&S) -> D + Send + Sync + 'static,
        T: IntoIterator<Item = (D, I)>,
        I: Into<String>,
    {
        let table: HashMap<&'static str, String> = targets
            .into_iter()
            .map(|(decision, target)| (decision.key(), target.into()))
            .collect();
        let missing: Vec<&'static str> = D::ALL
            .iter()
            .map(Decision::key)
            .filter(|key| !table.contains_key(key))
            .collect();
        Self {
            router: Arc::new(move |state| router(state).key()),
            table,
            missing,
        }
    }

    /// Runs the routing function against the given state, returning the decision key.
    pub(super) fn decide(&self, state: &S) -> &'static str {
        (self.router)(state)
    }

    /// Target node (or END) for a decision key, when declared.
    pub fn target_for(&self, key: &str) -> Option<&str> {
        self.table.get(key).map(String::as_str)
    }

    /// Declared decision keys, sorted for stable error messages and tests.
    pub fn declared_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.table.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Declared targets (node ids or END), table order not guaranteed.
    pub(super) fn targets(&self) -> impl Iterator<Item = &str> {
        self.table.values().map(String::as_str)
    }
}

/// How the next node is determined after a given node runs.
///
/// Stored in the compiled graph's route map: one fixed target, or a
/// conditional edge resolved from state at run time.
#[derive(Clone)]
pub enum NextEntry<S> {
    /// Single fixed next node (or END).
    Static(String),
    /// Next node decided by the router from post-merge state.
    Conditional(ConditionalEdge<S>),
}
