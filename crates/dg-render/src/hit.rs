//! Hit testing: model-space point → node, edge, or empty canvas.
//!
//! Nodes are painted over edges and later nodes over earlier ones, so nodes
//! are tested newest-first before any edge is considered.

use dg_core::geometry::shape_contains;
use dg_core::{EdgeId, Graph, NodeId, Point};

/// Edge pick distance in screen pixels; divide by zoom for model space.
pub const EDGE_HIT_TOLERANCE: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Node(NodeId),
    Edge(EdgeId),
    Canvas,
}

/// Find what lies under `point`. `edge_tolerance` is in model units.
pub fn hit_test(graph: &Graph, point: Point, edge_tolerance: f64) -> Hit {
    if let Some(id) = hit_test_node(graph, point) {
        return Hit::Node(id);
    }
    match hit_test_edge(graph, point, edge_tolerance) {
        Some(id) => Hit::Edge(id),
        None => Hit::Canvas,
    }
}

/// Topmost node whose shape contains `point`.
pub fn hit_test_node(graph: &Graph, point: Point) -> Option<NodeId> {
    let nodes: Vec<_> = graph.nodes().collect();
    nodes
        .iter()
        .rev()
        .find(|node| shape_contains(node.position, node.shape(), node.size(), point))
        .map(|node| node.id())
}

/// Topmost edge whose segment passes within `tolerance` of `point`.
pub fn hit_test_edge(graph: &Graph, point: Point, tolerance: f64) -> Option<EdgeId> {
    let edges: Vec<_> = graph.edges().collect();
    edges
        .iter()
        .rev()
        .find(|edge| {
            graph
                .edge_endpoints(edge.id)
                .is_some_and(|(a, b)| distance_to_segment(point, a, b) <= tolerance)
        })
        .map(|edge| edge.id)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return (p - a).hypot();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).hypot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{NodeStyle, Shape};

    fn two_nodes_with_edge() -> (Graph, NodeId, NodeId, EdgeId) {
        let mut graph = Graph::new();
        let a = graph.add_node(Point::new(0.0, 0.0), Some("A"), NodeStyle::default());
        let b = graph.add_node(Point::new(300.0, 0.0), Some("B"), NodeStyle::default());
        let e = graph.add_edge(a, b).unwrap();
        (graph, a, b, e)
    }

    #[test]
    fn hit_node_edge_and_canvas() {
        let (graph, a, _, e) = two_nodes_with_edge();
        assert_eq!(hit_test(&graph, Point::new(10.0, 10.0), 6.0), Hit::Node(a));
        assert_eq!(hit_test(&graph, Point::new(150.0, 4.0), 6.0), Hit::Edge(e));
        assert_eq!(hit_test(&graph, Point::new(150.0, 40.0), 6.0), Hit::Canvas);
    }

    #[test]
    fn newest_node_wins_overlap() {
        let mut graph = Graph::new();
        graph.add_node(Point::new(0.0, 0.0), Some("under"), NodeStyle::default());
        let top = graph.add_node(
            Point::new(10.0, 0.0),
            Some("over"),
            NodeStyle {
                shape: Shape::Square,
                ..NodeStyle::default()
            },
        );
        assert_eq!(hit_test_node(&graph, Point::new(5.0, 0.0)), Some(top));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Point::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Point::new(13.0, 4.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Point::new(3.0, 4.0), a, a), 5.0);
    }
}
