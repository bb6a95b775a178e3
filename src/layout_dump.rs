use crate::ir::Graph;
use crate::layout::Positions;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: i64,
    pub order: usize,
    pub first_visit: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub a: i64,
    pub b: i64,
    pub self_loop: bool,
}

impl LayoutDump {
    pub fn from_layout(graph: &Graph, positions: &Positions) -> Self {
        let nodes = positions
            .iter()
            .enumerate()
            .map(|(order, placement)| NodeDump {
                id: placement.id,
                order,
                first_visit: graph
                    .node(placement.id)
                    .map(|node| node.first_visit)
                    .unwrap_or(order),
                x: placement.point.x,
                y: placement.point.y,
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| EdgeDump {
                a: edge.a,
                b: edge.b,
                self_loop: edge.is_self_loop(),
            })
            .collect();

        LayoutDump {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, graph: &Graph, positions: &Positions) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(graph, positions);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
