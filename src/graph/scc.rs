// src/graph/scc.rs
//! Strongly connected components via Tarjan's algorithm.
//!
//! The depth-first search runs on an explicit frame stack so that long
//! recommendation chains cannot exhaust the call stack.

use super::adjacency::Adjacency;
use super::types::NodeId;

const UNVISITED: u32 = u32::MAX;

/// A strongly connected component. Nodes are stored ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scc {
    nodes: Vec<NodeId>,
}

impl Scc {
    #[must_use]
    pub fn new(mut nodes: Vec<NodeId>) -> Self {
        nodes.sort_unstable();
        Self { nodes }
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Smallest node id; the tie-break key for equally sized components.
    #[must_use]
    pub fn min_node(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }
}

/// Computes the SCCs of every node with at least one incident edge.
///
/// Discovery order is an implementation detail; callers that need an order
/// must sort the result.
#[must_use]
pub fn strongly_connected(adjacency: &Adjacency) -> Vec<Scc> {
    let mut state = TarjanState::new(adjacency.universe_size());

    for root in adjacency.active_nodes() {
        if !state.is_visited(root) {
            state.run_from(root, adjacency);
        }
    }

    state.components
}

/// One suspended DFS call: the node and the index of its next out-neighbor.
struct Frame {
    node: NodeId,
    next: usize,
}

struct TarjanState {
    counter: u32,
    index: Vec<u32>,
    lowlink: Vec<u32>,
    on_stack: Vec<bool>,
    stack: Vec<NodeId>,
    frames: Vec<Frame>,
    components: Vec<Scc>,
}

#[allow(clippy::indexing_slicing)] // Node ids are < universe, checked by the builder
impl TarjanState {
    fn new(universe: usize) -> Self {
        Self {
            counter: 0,
            index: vec![UNVISITED; universe],
            lowlink: vec![UNVISITED; universe],
            on_stack: vec![false; universe],
            stack: Vec::new(),
            frames: Vec::new(),
            components: Vec::new(),
        }
    }

    fn is_visited(&self, node: NodeId) -> bool {
        self.index[node as usize] != UNVISITED
    }

    fn discover(&mut self, node: NodeId) {
        let i = node as usize;
        self.index[i] = self.counter;
        self.lowlink[i] = self.counter;
        self.counter += 1;
        self.stack.push(node);
        self.on_stack[i] = true;
        self.frames.push(Frame { node, next: 0 });
    }

    fn run_from(&mut self, root: NodeId, adjacency: &Adjacency) {
        self.discover(root);

        while let Some(frame) = self.frames.last_mut() {
            let v = frame.node;
            let neighbors = adjacency.out_neighbors(v);

            if let Some(&w) = neighbors.get(frame.next) {
                frame.next += 1;
                self.visit_edge(v, w);
            } else {
                self.frames.pop();
                self.finish(v);
            }
        }
    }

    fn visit_edge(&mut self, v: NodeId, w: NodeId) {
        if !self.is_visited(w) {
            self.discover(w);
        } else if self.on_stack[w as usize] {
            let low = self.lowlink[v as usize].min(self.index[w as usize]);
            self.lowlink[v as usize] = low;
        }
    }

    fn finish(&mut self, v: NodeId) {
        if let Some(parent) = self.frames.last() {
            let p = parent.node as usize;
            self.lowlink[p] = self.lowlink[p].min(self.lowlink[v as usize]);
        }

        if self.lowlink[v as usize] == self.index[v as usize] {
            self.pop_component(v);
        }
    }

    fn pop_component(&mut self, root: NodeId) {
        let mut nodes = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w as usize] = false;
            nodes.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(Scc::new(nodes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::GraphBuilder;
    use crate::graph::types::IncomingRecords;

    fn graph(n: usize, edges: &[(NodeId, NodeId)]) -> Adjacency {
        let triples: Vec<_> = edges.iter().map(|&(s, t)| (s, t, 0)).collect();
        GraphBuilder::new(1)
            .build(&IncomingRecords::from_edges(n, &triples))
            .unwrap()
    }

    fn sorted(mut sccs: Vec<Scc>) -> Vec<Vec<NodeId>> {
        sccs.sort_by_key(|s| s.min_node());
        sccs.into_iter().map(|s| s.nodes().to_vec()).collect()
    }

    #[test]
    fn test_single_cycle() {
        let adj = graph(3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(sorted(strongly_connected(&adj)), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_chain_yields_singletons() {
        let adj = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(
            sorted(strongly_connected(&adj)),
            vec![vec![0], vec![1], vec![2], vec![3]]
        );
    }

    #[test]
    fn test_isolated_nodes_are_excluded() {
        let adj = graph(5, &[(0, 1), (1, 0)]);
        assert_eq!(sorted(strongly_connected(&adj)), vec![vec![0, 1]]);
    }

    #[test]
    fn test_self_loop_is_its_own_component() {
        let adj = graph(2, &[(1, 1)]);
        assert_eq!(sorted(strongly_connected(&adj)), vec![vec![1]]);
    }

    #[test]
    fn test_two_cycles_joined_by_bridge() {
        let adj = graph(6, &[(0, 1), (1, 0), (1, 2), (2, 3), (3, 4), (4, 2), (5, 4)]);
        assert_eq!(
            sorted(strongly_connected(&adj)),
            vec![vec![0, 1], vec![2, 3, 4], vec![5]]
        );
    }

    #[test]
    fn test_nested_back_edges() {
        // 0 → 1 → 2 → 3 → 1, 3 → 0: everything collapses into one component.
        let adj = graph(4, &[(0, 1), (1, 2), (2, 3), (3, 1), (3, 0)]);
        assert_eq!(sorted(strongly_connected(&adj)), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let n: NodeId = 200_000;
        let mut edges: Vec<(NodeId, NodeId)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        edges.push((n - 1, 0));
        let adj = graph(n as usize, &edges);
        let sccs = strongly_connected(&adj);
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].len(), n as usize);
    }

    #[test]
    fn test_scc_contains() {
        let scc = Scc::new(vec![9, 3, 5]);
        assert_eq!(scc.nodes(), &[3, 5, 9]);
        assert!(scc.contains(5));
        assert!(!scc.contains(4));
        assert_eq!(scc.min_node(), Some(3));
    }
}
