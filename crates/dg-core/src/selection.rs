//! Selection model: which nodes and edges are currently selected.
//!
//! Only ids are stored. The graph stays the source of truth for anything
//! that needs the selected elements themselves.

use crate::id::{EdgeId, NodeId};
use crate::model::Graph;
use serde::Serialize;
use smallvec::{Array, SmallVec};

/// A selectable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Element {
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    nodes: SmallVec<[NodeId; 4]>,
    edges: SmallVec<[EdgeId; 4]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything, then select exactly `element`.
    pub fn select_only(&mut self, element: Element) {
        self.clear();
        match element {
            Element::Node(id) => self.nodes.push(id),
            Element::Edge(id) => self.edges.push(id),
        }
    }

    /// Add `element` if absent, remove it if present. Other selections are kept.
    pub fn toggle(&mut self, element: Element) {
        match element {
            Element::Node(id) => toggle_in(&mut self.nodes, id),
            Element::Edge(id) => toggle_in(&mut self.edges, id),
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn contains(&self, element: Element) -> bool {
        match element {
            Element::Node(id) => self.nodes.contains(&id),
            Element::Edge(id) => self.edges.contains(&id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Selected node ids in selection order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Drop ids that no longer exist in `graph`. Returns `true` if anything changed.
    pub fn retain_existing(&mut self, graph: &Graph) -> bool {
        let before = (self.nodes.len(), self.edges.len());
        self.nodes.retain(|id| graph.contains_node(*id));
        self.edges.retain(|id| graph.contains_edge(*id));
        before != (self.nodes.len(), self.edges.len())
    }
}

fn toggle_in<A: Array>(set: &mut SmallVec<A>, id: A::Item)
where
    A::Item: PartialEq,
{
    match set.iter().position(|x| *x == id) {
        Some(pos) => {
            set.remove(pos);
        }
        None => set.push(id),
    }
}
