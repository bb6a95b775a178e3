use std::collections::{BTreeMap, HashSet};

use crate::error::TourError;

pub type NodeId = i64;

/// An ordered, non-empty visiting sequence. Duplicates are kept in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    stops: Vec<NodeId>,
}

impl Tour {
    pub fn new(stops: Vec<NodeId>) -> Result<Self, TourError> {
        if stops.is_empty() {
            return Err(TourError::empty_tour(""));
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[NodeId] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn first(&self) -> NodeId {
        self.stops[0]
    }

    pub fn last(&self) -> NodeId {
        self.stops[self.stops.len() - 1]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    /// Index of the stop where this identifier first appears.
    pub first_visit: usize,
}

/// Undirected edge, stored with `a <= b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        if from <= to {
            Self { a: from, b: to }
        } else {
            Self { a: to, b: from }
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Nodes in first-appearance order.
    pub nodes: Vec<Node>,
    /// Distinct edges in the order the tour first walks them.
    pub edges: Vec<Edge>,
    index: BTreeMap<NodeId, usize>,
    seen: HashSet<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_node(&mut self, id: NodeId, first_visit: usize) {
        if self.index.contains_key(&id) {
            return;
        }
        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node {
            id,
            label: id.to_string(),
            first_visit,
        });
    }

    /// Adds an undirected edge unless an equal one is already present.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        let edge = Edge::new(from, to);
        if !self.seen.insert(edge) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.seen.contains(&Edge::new(from, to))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Closes a tour into a cycle graph: consecutive stops are joined and the
/// last stop connects back to the first.
pub fn build_cycle_graph(tour: &Tour) -> Graph {
    let mut graph = Graph::new();
    for (idx, &id) in tour.stops().iter().enumerate() {
        graph.ensure_node(id, idx);
    }
    if tour.len() < 2 {
        return graph;
    }
    for pair in tour.stops().windows(2) {
        graph.add_edge(pair[0], pair[1]);
    }
    graph.add_edge(tour.last(), tour.first());
    tracing::debug!(
        stops = tour.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built cycle graph"
    );
    graph
}
