//! Scene → standalone SVG document, used for export and snapshot tests.

use crate::paint::{Primitive, Scene};
use dg_core::Shape;
use std::fmt::Write;

const EDGE_STROKE: &str = "#666666";
const SELECTION_STROKE: &str = "#FF6B6B";
const PREVIEW_STROKE: &str = "#999999";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_svg(scene: &Scene, width: f64, height: f64) -> String {
    let mut svg = String::new();
    let [a, b, c, d, e, f] = scene.transform;
    // `write!` into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(svg, r#"<g transform="matrix({a} {b} {c} {d} {e} {f})">"#);

    for prim in &scene.primitives {
        match prim {
            Primitive::Edge {
                from, to, selected, ..
            } => {
                let (stroke, width) = if *selected {
                    (SELECTION_STROKE, 3)
                } else {
                    (EDGE_STROKE, 2)
                };
                let _ = writeln!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{width}"/>"#,
                    from.x, from.y, to.x, to.y
                );
            }
            Primitive::Preview { from, to } => {
                let _ = writeln!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{PREVIEW_STROKE}" stroke-width="2" stroke-dasharray="5,5"/>"#,
                    from.x, from.y, to.x, to.y
                );
            }
            Primitive::Node {
                shape,
                center,
                width,
                height,
                fill,
                text_color,
                selected,
                label,
                ..
            } => {
                let stroke = if *selected {
                    format!(r#" stroke="{SELECTION_STROKE}" stroke-width="3""#)
                } else {
                    String::new()
                };
                match shape {
                    Shape::Circle => {
                        let _ = writeln!(
                            svg,
                            r#"<circle cx="{}" cy="{}" r="{}" fill="{fill}"{stroke}/>"#,
                            center.x,
                            center.y,
                            width / 2.0
                        );
                    }
                    Shape::Square | Shape::Rectangle => {
                        let _ = writeln!(
                            svg,
                            r#"<rect x="{}" y="{}" width="{width}" height="{height}" rx="8" fill="{fill}"{stroke}/>"#,
                            center.x - width / 2.0,
                            center.y - height / 2.0
                        );
                    }
                }
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{text_color}" font-size="{}" text-anchor="middle" dominant-baseline="middle">"#,
                    center.x, center.y, label.font_size
                );
                for line in &label.lines {
                    let _ = write!(
                        svg,
                        r#"<tspan x="{}" y="{}">{}</tspan>"#,
                        center.x,
                        center.y + line.dy,
                        escape(&line.text)
                    );
                }
                svg.push_str("</text>\n");
            }
        }
    }

    svg.push_str("</g>\n</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::build_scene;
    use dg_core::{Element, Graph, NodeStyle, Point, Selection, ViewTransform};

    #[test]
    fn svg_contains_every_primitive() {
        let mut graph = Graph::new();
        let a = graph.add_node(Point::new(0.0, 0.0), Some("A & B"), NodeStyle::default());
        let b = graph.add_node(
            Point::new(200.0, 0.0),
            Some("<square>"),
            NodeStyle {
                shape: Shape::Square,
                ..NodeStyle::default()
            },
        );
        graph.add_edge(a, b).unwrap();
        let mut selection = Selection::new();
        selection.select_only(Element::Node(b));

        let scene = build_scene(&graph, &selection, &ViewTransform::new(), None);
        let svg = render_svg(&scene, 800.0, 600.0);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"<line x1="0" y1="0" x2="200" y2="0""#));
        assert!(svg.contains("<circle"));
        assert!(svg.contains(r##"fill="#4A90E2" stroke="#FF6B6B""##));
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains("&lt;square&gt;"));
        assert!(svg.contains(r#"matrix(1 0 0 1 0 0)"#));
    }
}
