//! Graph model: nodes, edges, and the aggregate that owns them.
//!
//! Nodes and edges live in a `StableDiGraph` so indices survive removals.
//! Two insertion-ordered indexes map the stable string ids onto graph
//! indices; iteration and persistence follow that order. Edges store node
//! ids, never coordinates: their geometry is always derived from the current
//! node positions.

use crate::error::{Error, Result};
use crate::geometry::{Shape, node_size};
use crate::id::{EdgeId, NodeId};
use indexmap::IndexMap;
use kurbo::Point;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Text given to nodes created without a usable label.
pub const DEFAULT_NODE_TEXT: &str = "New Node";

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit RGBA color, serialized as a hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    /// Default node fill, `#4A90E2`.
    pub const DEFAULT_FILL: Color = Color::rgb(0x4A, 0x90, 0xE2);
    /// Default label color, `#FFFFFF`.
    pub const DEFAULT_TEXT: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let bytes = hex.strip_prefix('#').unwrap_or(hex).as_bytes();
        let short = |i: usize| hex_val(bytes[i]).map(|v| v * 17);
        let long = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);
        match bytes.len() {
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            }),
            6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self {
                r: long(0)?,
                g: long(2)?,
                b: long(4)?,
                a: long(6)?,
            }),
            _ => None,
        }
    }

    /// Like [`Color::from_hex`], reporting a validation error.
    pub fn parse(hex: &str) -> Result<Self> {
        Self::from_hex(hex).ok_or_else(|| Error::InvalidColor {
            value: hex.to_string(),
        })
    }

    /// `#RRGGBB` when opaque, `#RRGGBBAA` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color {s:?}")))
    }
}

// ─── Nodes & edges ───────────────────────────────────────────────────────

/// Visual attributes chosen when a node is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub fill: Color,
    pub text_color: Color,
    pub shape: Shape,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: Color::DEFAULT_FILL,
            text_color: Color::DEFAULT_TEXT,
            shape: Shape::Circle,
        }
    }
}

/// A positioned, styled, textual vertex.
///
/// `position` is the node center in model space. `size` is derived from
/// `text` and `shape` and recomputed whenever either changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: NodeId,
    pub position: Point,
    text: String,
    shape: Shape,
    pub fill: Color,
    pub text_color: Color,
    size: f64,
}

impl Node {
    /// Build a node. Blank `text` falls back to [`DEFAULT_NODE_TEXT`].
    pub fn new(id: NodeId, position: Point, text: &str, style: NodeStyle) -> Self {
        let text = match text.trim() {
            "" => DEFAULT_NODE_TEXT,
            trimmed => trimmed,
        };
        Self {
            id,
            position,
            text: text.to_string(),
            shape: style.shape,
            fill: style.fill,
            text_color: style.text_color,
            size: node_size(text, style.shape),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Replace the label. Blank input keeps the previous text and returns `false`.
    pub fn set_text(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.text = trimmed.to_string();
        self.resize();
        true
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.resize();
    }

    fn resize(&mut self) {
        self.size = node_size(&self.text, self.shape);
    }
}

/// A link between two node ids. Stored directed, drawn undirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
}

impl Edge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.start == node || self.end == node
    }
}

/// Everything a node removal took with it.
#[derive(Debug, Clone)]
pub struct RemovedNode {
    pub node: Node,
    /// Edges removed by the cascade, in insertion order.
    pub edges: Vec<Edge>,
}

// ─── Graph ───────────────────────────────────────────────────────────────

/// The node/edge aggregate. Owns the id counters, so id uniqueness is a
/// property of the graph itself.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    graph: StableDiGraph<Node, Edge>,
    nodes: IndexMap<NodeId, NodeIndex>,
    edges: IndexMap<EdgeId, EdgeIndex>,
    node_counter: u64,
    edge_counter: u64,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and return its freshly assigned id.
    pub fn add_node(&mut self, position: Point, text: Option<&str>, style: NodeStyle) -> NodeId {
        self.node_counter += 1;
        let id = NodeId::numbered(self.node_counter);
        let node = Node::new(id, position, text.unwrap_or(DEFAULT_NODE_TEXT), style);
        log::debug!("add node {id} at ({}, {})", position.x, position.y);
        self.insert_node(node);
        id
    }

    /// Connect two existing nodes. Fails without touching the edge set if
    /// either endpoint is missing.
    pub fn add_edge(&mut self, start: NodeId, end: NodeId) -> Result<EdgeId> {
        let from = self.index_of(start).ok_or_else(|| Error::missing_node(start))?;
        let to = self.index_of(end).ok_or_else(|| Error::missing_node(end))?;
        self.edge_counter += 1;
        let id = EdgeId::numbered(self.edge_counter);
        let idx = self.graph.add_edge(from, to, Edge { id, start, end });
        self.edges.insert(id, idx);
        log::debug!("add edge {id}: {start} -> {end}");
        Ok(id)
    }

    /// Overwrite a node's position. Returns `false` if the id is unknown.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Remove a node and every edge that references it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<RemovedNode> {
        let idx = self.index_of(id)?;
        let edges: Vec<Edge> = self
            .edges_touching(id)
            .into_iter()
            .filter_map(|edge_id| self.remove_edge(edge_id))
            .collect();
        self.nodes.shift_remove(&id);
        let node = self.graph.remove_node(idx)?;
        log::debug!("remove node {id} ({} edges cascaded)", edges.len());
        Some(RemovedNode { node, edges })
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let idx = self.edges.shift_remove(&id)?;
        self.graph.remove_edge(idx)
    }

    /// Drop every node and edge and reset both counters.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Atomically replace the whole graph.
    ///
    /// Every node id must be unique and every edge endpoint must be among
    /// `nodes`; on error the current graph is left untouched. Counters are
    /// raised to the highest numeric id suffix present so newly generated
    /// ids cannot collide with restored ones.
    pub fn replace_all(
        &mut self,
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
        node_counter: u64,
        edge_counter: u64,
    ) -> Result<()> {
        let mut fresh = Self::new();
        for node in nodes {
            if fresh.nodes.contains_key(&node.id) {
                return Err(Error::DuplicateId {
                    id: node.id.to_string(),
                });
            }
            fresh.node_counter = fresh.node_counter.max(node.id.sequence().unwrap_or(0));
            fresh.insert_node(node);
        }
        for edge in edges {
            if fresh.edges.contains_key(&edge.id) {
                return Err(Error::DuplicateId {
                    id: edge.id.to_string(),
                });
            }
            let from = fresh
                .index_of(edge.start)
                .ok_or_else(|| Error::missing_node(edge.start))?;
            let to = fresh
                .index_of(edge.end)
                .ok_or_else(|| Error::missing_node(edge.end))?;
            fresh.edge_counter = fresh.edge_counter.max(edge.id.sequence().unwrap_or(0));
            let idx = fresh.graph.add_edge(from, to, edge);
            fresh.edges.insert(edge.id, idx);
        }
        fresh.node_counter = fresh.node_counter.max(node_counter);
        fresh.edge_counter = fresh.edge_counter.max(edge_counter);
        *self = fresh;
        Ok(())
    }

    fn insert_node(&mut self, node: Node) {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.nodes.insert(id, idx);
    }

    fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.nodes.get(&id).copied()
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Mutable access for restyling. Size stays derived: text and shape are
    /// only reachable through [`Node::set_text`] and [`Node::set_shape`].
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.index_of(id).map(|idx| &mut self.graph[idx])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values().map(|idx| &self.graph[*idx])
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values().map(|idx| &self.graph[*idx])
    }

    /// Ids of every edge with `node` as an endpoint, in creation order.
    pub fn edges_touching(&self, node: NodeId) -> Vec<EdgeId> {
        self.edges()
            .filter(|edge| edge.touches(node))
            .map(|edge| edge.id)
            .collect()
    }

    /// Current endpoint positions of an edge (start center, end center).
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<(Point, Point)> {
        let edge = self.edge(id)?;
        let start = self.node(edge.start)?.position;
        let end = self.node(edge.end)?.position;
        Some((start, end))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_counter(&self) -> u64 {
        self.node_counter
    }

    pub fn edge_counter(&self) -> u64 {
        self.edge_counter
    }
}
