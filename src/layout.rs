use std::collections::BTreeMap;
use std::f32::consts::TAU;

use crate::config::LayoutConfig;
use crate::error::{Stage, TourError};
use crate::ir::{Graph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: NodeId,
    pub point: Point,
}

/// Node positions for one render. Read-only once computed.
#[derive(Debug, Clone)]
pub struct Positions {
    placements: Vec<Placement>,
    index: BTreeMap<NodeId, usize>,
}

impl Positions {
    pub fn get(&self, id: NodeId) -> Option<Point> {
        self.index.get(&id).map(|&idx| self.placements[idx].point)
    }

    /// Placements in layout order (first appearance in the tour).
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Places the graph's nodes evenly on the unit circle, in the order their
/// identifiers first appear in the tour.
pub fn compute_layout(graph: &Graph, config: &LayoutConfig) -> Result<Positions, TourError> {
    let count = graph.node_count();
    if count == 0 {
        return Err(TourError::render(
            Stage::Layout,
            "cannot lay out a graph with no nodes",
        ));
    }

    let start = config.start_angle_deg.to_radians();
    let direction = if config.clockwise { -1.0 } else { 1.0 };
    let step = TAU / count as f32;

    let mut placements = Vec::with_capacity(count);
    let mut index = BTreeMap::new();
    for (slot, node) in graph.nodes.iter().enumerate() {
        let angle = start + direction * step * slot as f32;
        index.insert(node.id, slot);
        placements.push(Placement {
            id: node.id,
            point: Point::new(angle.cos(), angle.sin()),
        });
    }

    tracing::debug!(nodes = count, "computed circular layout");
    Ok(Positions { placements, index })
}
