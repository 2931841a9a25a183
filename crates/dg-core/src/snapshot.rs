//! Persisted form of a document.
//!
//! One JSON record per saved diagram:
//!
//! ```json
//! {
//!   "title": "flow",
//!   "nodes": [["node_1", {"id": "node_1", "x": 0, "y": 0, "text": "Hi",
//!              "color": "#4A90E2", "textColor": "#FFFFFF",
//!              "shape": "circle", "size": 84}]],
//!   "edges": [["connection_1", {"id": "connection_1",
//!              "start": "node_1", "end": "node_2"}]],
//!   "nodeCounter": 2,
//!   "edgeCounter": 1,
//!   "savedAt": "2024-05-01T12:00:00Z"
//! }
//! ```
//!
//! `size` is written for older readers; it is recomputed on restore.

use crate::document::Document;
use crate::error::Result;
use crate::geometry::Shape;
use crate::id::{EdgeId, NodeId};
use crate::model::{Color, Edge, Graph, Node, NodeStyle};
use chrono::{DateTime, Utc};
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: Color,
    pub text_color: Color,
    pub shape: Shape,
    #[serde(default)]
    pub size: f64,
}

impl NodeRecord {
    pub fn capture(node: &Node) -> Self {
        Self {
            id: node.id(),
            x: node.position.x,
            y: node.position.y,
            text: node.text().to_string(),
            color: node.fill,
            text_color: node.text_color,
            shape: node.shape(),
            size: node.size(),
        }
    }

    /// Rebuild the node. The stored `size` is ignored.
    pub fn restore(&self) -> Node {
        let style = NodeStyle {
            fill: self.color,
            text_color: self.text_color,
            shape: self.shape,
        };
        Node::new(self.id, Point::new(self.x, self.y), &self.text, style)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id,
            start: edge.start,
            end: edge.end,
        }
    }
}

impl From<EdgeRecord> for Edge {
    fn from(record: EdgeRecord) -> Self {
        Self {
            id: record.id,
            start: record.start,
            end: record.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub title: String,
    pub nodes: Vec<(NodeId, NodeRecord)>,
    pub edges: Vec<(EdgeId, EdgeRecord)>,
    pub node_counter: u64,
    pub edge_counter: u64,
    pub saved_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Snapshot `graph` under `title`.
    pub fn capture(title: &str, graph: &Graph, saved_at: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            nodes: graph
                .nodes()
                .map(|node| (node.id(), NodeRecord::capture(node)))
                .collect(),
            edges: graph
                .edges()
                .map(|edge| (edge.id, EdgeRecord::from(edge)))
                .collect(),
            node_counter: graph.node_counter(),
            edge_counter: graph.edge_counter(),
            saved_at,
        }
    }

    /// Rebuild a document. Fails on dangling edges or duplicate ids.
    ///
    /// The record body is authoritative for ids: the pair key is only an
    /// index and a mismatch is logged, not rejected.
    pub fn restore(&self) -> Result<Document> {
        for (key, record) in &self.nodes {
            if *key != record.id {
                log::warn!("snapshot key {key} does not match node id {}", record.id);
            }
        }
        let mut graph = Graph::new();
        graph.replace_all(
            self.nodes.iter().map(|(_, record)| record.restore()),
            self.edges.iter().map(|(_, record)| Edge::from(*record)),
            self.node_counter,
            self.edge_counter,
        )?;
        Ok(Document {
            title: self.title.clone(),
            graph,
            saved_at: Some(self.saved_at),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        let a = graph.add_node(Point::new(0.0, 0.0), Some("Hello World"), NodeStyle::default());
        let b = graph.add_node(
            Point::new(120.0, 40.0),
            Some("Hi"),
            NodeStyle {
                fill: Color::rgb(0xFF, 0, 0),
                text_color: Color::rgb(0, 0, 0),
                shape: Shape::Rectangle,
            },
        );
        graph.add_edge(a, b).unwrap();
        graph
    }

    fn saved_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn json_shape_matches_record_format() {
        let record = DocumentRecord::capture("flow", &sample_graph(), saved_at());
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(value["title"], "flow");
        assert_eq!(value["nodeCounter"], 2);
        assert_eq!(value["edgeCounter"], 1);
        assert_eq!(value["savedAt"], "2024-05-01T12:00:00Z");
        assert_eq!(value["nodes"][0][0], "node_1");
        assert_eq!(value["nodes"][1][1]["textColor"], "#000000");
        assert_eq!(value["nodes"][1][1]["shape"], "rectangle");
        assert_eq!(value["edges"][0][1]["start"], "node_1");
        assert_eq!(value["edges"][0][1]["end"], "node_2");
    }

    #[test]
    fn restore_reproduces_graph() {
        let graph = sample_graph();
        let json = DocumentRecord::capture("flow", &graph, saved_at())
            .to_json()
            .unwrap();
        let doc = DocumentRecord::from_json(&json).unwrap().restore().unwrap();
        assert_eq!(doc.title, "flow");
        assert_eq!(doc.saved_at, Some(saved_at()));
        assert_eq!(doc.graph.nodes().collect::<Vec<_>>(), graph.nodes().collect::<Vec<_>>());
        assert_eq!(doc.graph.edges().collect::<Vec<_>>(), graph.edges().collect::<Vec<_>>());
        assert_eq!(doc.graph.node_counter(), 2);
        assert_eq!(doc.graph.edge_counter(), 1);
    }

    #[test]
    fn stored_size_is_not_trusted() {
        let mut record = DocumentRecord::capture("flow", &sample_graph(), saved_at());
        record.nodes[0].1.size = 1.0;
        let doc = record.restore().unwrap();
        let node = doc.graph.nodes().next().unwrap();
        assert!((node.size() - 95.2).abs() < 1e-9);
    }

    #[test]
    fn missing_size_field_is_accepted() {
        let json = r##"{
            "title": "old",
            "nodes": [["node_4", {"id": "node_4", "x": 1, "y": 2, "text": "Legacy",
                "color": "#123", "textColor": "#FFFFFF", "shape": "square"}]],
            "edges": [],
            "nodeCounter": 4,
            "edgeCounter": 0,
            "savedAt": "2023-01-01T00:00:00.000Z"
        }"##;
        let doc = DocumentRecord::from_json(json).unwrap().restore().unwrap();
        let node = doc.graph.node(NodeId::intern("node_4")).unwrap();
        assert_eq!(node.fill, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(node.size(), 60.0);
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let mut record = DocumentRecord::capture("flow", &sample_graph(), saved_at());
        record.nodes.pop();
        let err = record.restore().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
    }

    #[test]
    fn garbage_json_is_a_validation_error() {
        let err = DocumentRecord::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
