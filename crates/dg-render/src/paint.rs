//! Graph + selection + view → drawable primitives.
//!
//! The draw list is in model space; `Scene::transform` carries the view
//! transform for the renderer to apply once. Edges come first so nodes
//! paint over their endpoints, and the connection preview goes on top.

use dg_core::geometry::{Shape, wrap_text};
use dg_core::{Color, EdgeId, Graph, Node, NodeId, Selection, ViewTransform};
use dg_core::{Element, Point};
use serde::Serialize;

/// One line of a node label, offset vertically from the node center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLine {
    pub text: String,
    pub dy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub lines: Vec<LabelLine>,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Primitive {
    Edge {
        id: EdgeId,
        from: Point,
        to: Point,
        selected: bool,
    },
    Node {
        id: NodeId,
        shape: Shape,
        center: Point,
        width: f64,
        height: f64,
        fill: Color,
        text_color: Color,
        selected: bool,
        label: Label,
    },
    /// Transient line from the connection start to the cursor.
    Preview { from: Point, to: Point },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Model → screen affine coefficients `[a, b, c, d, e, f]`.
    pub transform: [f64; 6],
    pub primitives: Vec<Primitive>,
}

/// Project one node. Used both for full scenes and for in-place refresh
/// after a `NodeUpdated` event.
pub fn node_primitive(node: &Node, selected: bool) -> Primitive {
    let extent = node.shape().extent(node.size());
    let wrapped = wrap_text(node.text(), node.size(), node.shape());
    let lines = wrapped
        .lines
        .iter()
        .zip(wrapped.line_offsets())
        .map(|(text, dy)| LabelLine {
            text: text.clone(),
            dy,
        })
        .collect();
    Primitive::Node {
        id: node.id(),
        shape: node.shape(),
        center: node.position,
        width: extent.width,
        height: extent.height,
        fill: node.fill,
        text_color: node.text_color,
        selected,
        label: Label {
            lines,
            font_size: wrapped.font_size,
        },
    }
}

/// Project one edge from the current positions of its endpoints.
pub fn edge_primitive(graph: &Graph, id: EdgeId, selected: bool) -> Option<Primitive> {
    let (from, to) = graph.edge_endpoints(id)?;
    Some(Primitive::Edge {
        id,
        from,
        to,
        selected,
    })
}

/// Build the full draw list.
///
/// `preview` is the `(from, to)` of an in-progress connection, if any.
pub fn build_scene(
    graph: &Graph,
    selection: &Selection,
    view: &ViewTransform,
    preview: Option<(Point, Point)>,
) -> Scene {
    let mut primitives = Vec::with_capacity(graph.edge_count() + graph.node_count() + 1);

    for edge in graph.edges() {
        let selected = selection.contains(Element::Edge(edge.id));
        if let Some(prim) = edge_primitive(graph, edge.id, selected) {
            primitives.push(prim);
        }
    }
    for node in graph.nodes() {
        let selected = selection.contains(Element::Node(node.id()));
        primitives.push(node_primitive(node, selected));
    }
    if let Some((from, to)) = preview {
        primitives.push(Primitive::Preview { from, to });
    }

    log::trace!("scene: {} primitives at zoom {}", primitives.len(), view.zoom());
    Scene {
        transform: view.affine().as_coeffs(),
        primitives,
    }
}
