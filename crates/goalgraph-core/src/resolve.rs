//! Goal resolution: turning a goal node into an ordered plan of steps.
//!
//! [`PlanResolver`] walks the graph backwards from the goal, from each node to
//! its prerequisites (the sources of its incoming edges), and emits node ids
//! in post-order so every prerequisite precedes the node that needs it.
//!
//! Incoming edges are handled by kind:
//! - `AND` / `IMPLIES`: every source is resolved, in discovery order.
//! - `OR`: only the source with the lexicographically smallest id is
//!   resolved. Other alternatives are never visited.
//! - `NOT`: if any source has a truthy `data["visited"]` (see
//!   [`MetaValue::is_truthy`](crate::MetaValue::is_truthy)), the node is
//!   blocked. It contributes nothing to the plan and none of its
//!   prerequisites are resolved.
//!
//! # Visited guard
//!
//! Each pass keeps a set of nodes already entered. A node is entered at most
//! once, which bounds the walk on cyclic graphs. A blocked node is still
//! marked as entered, so a second path reaching it in the same pass skips it
//! without re-checking its NOT edges. This pass-local set is unrelated to the
//! domain `visited` metadata flag that drives NOT blocking.
//!
//! The walk uses an explicit work stack rather than recursion, so deep
//! prerequisite chains cannot exhaust the call stack. The visit and append
//! order is the same as a recursive depth-first post-order walk.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::edge::{Edge, EdgeKind};
use crate::graph::GoalGraph;
use crate::metadata::keys;
use crate::node::Node;

/// The outcome of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Node ids in dependency-first order. The goal is last unless blocked.
    pub steps: Vec<String>,
    /// Node ids excluded by a NOT edge, in the order they were blocked.
    pub blocked: Vec<String>,
}

impl Plan {
    pub fn into_steps(self) -> Vec<String> {
        self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.steps.iter().any(|step| step == id)
    }
}

enum Frame<'g> {
    /// Visit a node: guard, check blockers, schedule prerequisites.
    Enter(&'g Node),
    /// All prerequisites are done; append the node.
    Exit(&'g Node),
}

/// Resolves plans against a borrowed graph.
///
/// Construction scans every edge once to index incoming edges by target; the
/// index preserves the order a full per-node scan would discover them in.
pub struct PlanResolver<'g> {
    graph: &'g GoalGraph,
    incoming: HashMap<&'g str, Vec<(&'g Edge, &'g Node)>>,
}

impl<'g> PlanResolver<'g> {
    pub fn new(graph: &'g GoalGraph) -> Self {
        let mut incoming: HashMap<&'g str, Vec<(&'g Edge, &'g Node)>> = HashMap::new();
        for node in graph.nodes() {
            for edge in node.outgoing() {
                incoming
                    .entry(edge.target.as_str())
                    .or_default()
                    .push((edge, node));
            }
        }
        PlanResolver { graph, incoming }
    }

    fn incoming(&self, id: &str) -> &[(&'g Edge, &'g Node)] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolves the ordered steps needed to reach `goal_id`.
    ///
    /// An unknown goal yields an empty plan rather than an error.
    pub fn resolve(&self, goal_id: &str) -> Plan {
        let mut plan = Plan::default();

        let Some(goal) = self.graph.get_node(goal_id) else {
            debug!(goal = goal_id, "goal not in graph, empty plan");
            return plan;
        };

        let mut entered: HashSet<&'g str> = HashSet::new();
        let mut stack = vec![Frame::Enter(goal)];

        while let Some(frame) = stack.pop() {
            let node = match frame {
                Frame::Exit(node) => {
                    trace!(step = node.id(), "plan step");
                    plan.steps.push(node.id().to_string());
                    continue;
                }
                Frame::Enter(node) => node,
            };

            if !entered.insert(node.id()) {
                continue;
            }

            let mut mandatory: Vec<&'g Node> = Vec::new();
            let mut alternatives: Vec<&'g Node> = Vec::new();
            let mut blockers: Vec<&'g Node> = Vec::new();
            for &(edge, source) in self.incoming(node.id()) {
                match edge.kind {
                    EdgeKind::And | EdgeKind::Implies => mandatory.push(source),
                    EdgeKind::Or => alternatives.push(source),
                    EdgeKind::Not => blockers.push(source),
                }
            }

            if let Some(blocker) = blockers.iter().find(|b| b.data().truthy(keys::VISITED)) {
                debug!(node = node.id(), blocker = blocker.id(), "blocked by NOT edge");
                plan.blocked.push(node.id().to_string());
                continue;
            }

            stack.push(Frame::Exit(node));

            // Pushed in reverse so they pop in order: mandatory first, then the OR pick.
            if let Some(chosen) = alternatives.iter().copied().min_by(|a, b| a.id().cmp(b.id())) {
                debug!(
                    node = node.id(),
                    chosen = chosen.id(),
                    candidates = alternatives.len(),
                    "chose OR prerequisite"
                );
                stack.push(Frame::Enter(chosen));
            }
            for source in mandatory.into_iter().rev() {
                stack.push(Frame::Enter(source));
            }
        }

        plan
    }
}

impl GoalGraph {
    /// Resolves the ordered node ids required to reach `goal_id`.
    ///
    /// Shorthand for [`PlanResolver::resolve`] returning only the steps.
    pub fn resolve_plan(&self, goal_id: &str) -> Vec<String> {
        PlanResolver::new(self).resolve(goal_id).into_steps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MetaValue, Metadata};
    use proptest::prelude::*;

    fn graph_with(nodes: &[&str], edges: &[(&str, &str, EdgeKind)]) -> GoalGraph {
        let mut graph = GoalGraph::new();
        for id in nodes {
            graph.ensure_node(id, "event", None);
        }
        for (source, target, kind) in edges {
            graph.add_edge(source, target, *kind).unwrap();
        }
        graph
    }

    fn visited() -> Option<Metadata> {
        Some(Metadata::new().with(keys::VISITED, true))
    }

    #[test]
    fn linear_chain_resolves_in_order() {
        let graph = graph_with(
            &["wood", "stick", "pickaxe"],
            &[
                ("wood", "stick", EdgeKind::Implies),
                ("stick", "pickaxe", EdgeKind::Implies),
            ],
        );
        assert_eq!(graph.resolve_plan("pickaxe"), vec!["wood", "stick", "pickaxe"]);
        assert_eq!(graph.resolve_plan("stick"), vec!["wood", "stick"]);
        assert_eq!(graph.resolve_plan("wood"), vec!["wood"]);
    }

    #[test]
    fn or_picks_smallest_id_regardless_of_insertion() {
        let forward = graph_with(
            &["coal", "charcoal", "torch"],
            &[
                ("coal", "torch", EdgeKind::Or),
                ("charcoal", "torch", EdgeKind::Or),
            ],
        );
        let reverse = graph_with(
            &["charcoal", "coal", "torch"],
            &[
                ("charcoal", "torch", EdgeKind::Or),
                ("coal", "torch", EdgeKind::Or),
            ],
        );
        for _ in 0..3 {
            assert_eq!(forward.resolve_plan("torch"), vec!["charcoal", "torch"]);
            assert_eq!(reverse.resolve_plan("torch"), vec!["charcoal", "torch"]);
        }
    }

    #[test]
    fn or_choice_follows_mandatory_prerequisites() {
        let graph = graph_with(
            &["stick", "coal", "charcoal", "torch"],
            &[
                ("coal", "torch", EdgeKind::Or),
                ("stick", "torch", EdgeKind::And),
                ("charcoal", "torch", EdgeKind::Or),
            ],
        );
        assert_eq!(graph.resolve_plan("torch"), vec!["stick", "charcoal", "torch"]);
    }

    #[test]
    fn visited_not_source_blocks_target() {
        let mut graph = GoalGraph::new();
        graph.ensure_node("no_pickaxe", "state", visited());
        graph.ensure_node("mine", "event", None);
        graph.ensure_node("pickaxe", "tool", None);
        graph.add_edge("no_pickaxe", "mine", EdgeKind::Not).unwrap();
        graph.add_edge("pickaxe", "mine", EdgeKind::And).unwrap();

        let plan = PlanResolver::new(&graph).resolve("mine");
        assert!(plan.is_empty());
        assert!(!plan.contains("pickaxe"));
        assert_eq!(plan.blocked, vec!["mine".to_string()]);
    }

    #[test]
    fn unvisited_not_source_neither_blocks_nor_joins_plan() {
        let mut graph = GoalGraph::new();
        graph.ensure_node("rain", "context", Some(Metadata::new().with(keys::VISITED, false)));
        graph.ensure_node("harvest", "event", None);
        graph.add_edge("rain", "harvest", EdgeKind::Not).unwrap();

        assert_eq!(graph.resolve_plan("harvest"), vec!["harvest"]);
    }

    #[test]
    fn truthy_visited_values_block_like_true() {
        for (value, blocks) in [
            (MetaValue::Int(1), true),
            (MetaValue::Text("yes".into()), true),
            (MetaValue::Int(0), false),
            (MetaValue::Text(String::new()), false),
        ] {
            let mut graph = GoalGraph::new();
            let data = Metadata::new().with(keys::VISITED, value.clone());
            graph.ensure_node("torch", "state", Some(data));
            graph.ensure_node("cave", "event", None);
            graph.add_edge("torch", "cave", EdgeKind::Not).unwrap();

            let plan = PlanResolver::new(&graph).resolve("cave");
            assert_eq!(plan.contains("cave"), !blocks, "visited = {value}");
            assert_eq!(plan.blocked.is_empty(), !blocks, "visited = {value}");
        }
    }

    #[test]
    fn blocked_prerequisite_is_skipped_but_dependent_is_kept() {
        let mut graph = GoalGraph::new();
        graph.ensure_node("night", "context", visited());
        graph.ensure_node("sleep", "event", None);
        graph.ensure_node("bed", "tool", None);
        graph.add_edge("night", "bed", EdgeKind::Not).unwrap();
        graph.add_edge("bed", "sleep", EdgeKind::And).unwrap();

        let plan = PlanResolver::new(&graph).resolve("sleep");
        assert_eq!(plan.steps, vec!["sleep".to_string()]);
        assert_eq!(plan.blocked, vec!["bed".to_string()]);
    }

    #[test]
    fn blocked_node_reached_twice_is_checked_once() {
        let mut graph = GoalGraph::new();
        graph.ensure_node("lava", "context", visited());
        for id in ["bucket", "left", "right", "goal"] {
            graph.ensure_node(id, "event", None);
        }
        graph.add_edge("lava", "bucket", EdgeKind::Not).unwrap();
        graph.add_edge("bucket", "left", EdgeKind::And).unwrap();
        graph.add_edge("bucket", "right", EdgeKind::And).unwrap();
        graph.add_edge("left", "goal", EdgeKind::And).unwrap();
        graph.add_edge("right", "goal", EdgeKind::And).unwrap();

        let plan = PlanResolver::new(&graph).resolve("goal");
        assert_eq!(plan.steps, vec!["left", "right", "goal"]);
        assert_eq!(plan.blocked, vec!["bucket".to_string()]);
    }

    #[test]
    fn diamond_appears_once() {
        let graph = graph_with(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", EdgeKind::And),
                ("a", "c", EdgeKind::And),
                ("b", "d", EdgeKind::And),
                ("c", "d", EdgeKind::Implies),
            ],
        );
        assert_eq!(graph.resolve_plan("d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn cycle_terminates() {
        let graph = graph_with(
            &["a", "b"],
            &[("a", "b", EdgeKind::And), ("b", "a", EdgeKind::And)],
        );
        assert_eq!(graph.resolve_plan("a"), vec!["b", "a"]);
        assert_eq!(graph.resolve_plan("b"), vec!["a", "b"]);
    }

    #[test]
    fn self_loop_terminates() {
        let graph = graph_with(&["loop"], &[("loop", "loop", EdgeKind::And)]);
        assert_eq!(graph.resolve_plan("loop"), vec!["loop"]);
    }

    #[test]
    fn unknown_goal_is_empty() {
        let graph = graph_with(&["a"], &[]);
        assert!(graph.resolve_plan("does-not-exist").is_empty());
        assert!(GoalGraph::new().resolve_plan("anything").is_empty());
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut graph = GoalGraph::new();
        let depth = 100_000;
        for i in 0..depth {
            graph.ensure_node(&format!("n{i}"), "event", None);
        }
        for i in 1..depth {
            graph
                .add_edge(&format!("n{}", i - 1), &format!("n{i}"), EdgeKind::And)
                .unwrap();
        }
        let plan = graph.resolve_plan(&format!("n{}", depth - 1));
        assert_eq!(plan.len(), depth);
        assert_eq!(plan[0], "n0");
    }

    fn arb_dag() -> impl Strategy<Value = GoalGraph> {
        (2usize..12)
            .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n, 0u8..3), 0..40)))
            .prop_map(|(n, raw_edges)| {
                let mut graph = GoalGraph::new();
                for i in 0..n {
                    graph.ensure_node(&format!("n{i:02}"), "event", None);
                }
                for (a, b, k) in raw_edges {
                    if a == b {
                        continue;
                    }
                    // Lower index points to higher, which keeps the graph acyclic.
                    let (source, target) = (a.min(b), a.max(b));
                    let kind = match k {
                        0 => EdgeKind::And,
                        1 => EdgeKind::Implies,
                        _ => EdgeKind::Or,
                    };
                    graph
                        .add_edge(&format!("n{source:02}"), &format!("n{target:02}"), kind)
                        .unwrap();
                }
                graph
            })
    }

    proptest! {
        #[test]
        fn plans_are_dependency_first(graph in arb_dag()) {
            for goal in graph.nodes() {
                let steps = graph.resolve_plan(goal.id());
                let position = |id: &str| steps.iter().position(|s| s == id);

                prop_assert_eq!(steps.last().map(String::as_str), Some(goal.id()));
                let unique: HashSet<&String> = steps.iter().collect();
                prop_assert_eq!(unique.len(), steps.len());

                for step in &steps {
                    let here = position(step.as_str()).unwrap();
                    let mut or_sources: Vec<&str> = Vec::new();
                    for (edge, source) in graph.incoming_edges(step) {
                        if edge.kind.is_mandatory() {
                            let there = position(source.id());
                            prop_assert!(there.is_some_and(|p| p < here));
                        } else if edge.kind == EdgeKind::Or {
                            or_sources.push(source.id());
                        }
                    }
                    if let Some(chosen) = or_sources.iter().min() {
                        let there = position(*chosen);
                        prop_assert!(there.is_some_and(|p| p < here));
                    }
                }
            }
        }
    }
}
