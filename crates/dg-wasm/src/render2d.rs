//! Canvas2D renderer.
//!
//! Paints a `dg_render::Scene` onto an HTML `<canvas>` through
//! `CanvasRenderingContext2d`. The scene is in model space; its transform is
//! applied once up front.

use dg_core::Shape;
use dg_render::paint::Label;
use dg_render::{Primitive, Scene};
use std::f64::consts::TAU;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

const BACKGROUND: &str = "#F8F9FA";
const EDGE_STROKE: &str = "#666666";
const SELECTION_STROKE: &str = "#FF6B6B";
const PREVIEW_STROKE: &str = "#999999";
const CORNER_RADIUS: f64 = 8.0;

/// Clear the canvas and draw every primitive in order.
pub fn render_scene(ctx: &CanvasRenderingContext2d, scene: &Scene, width: f64, height: f64) {
    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.save();
    let [a, b, c, d, e, f] = scene.transform;
    let _ = ctx.set_transform(a, b, c, d, e, f);

    for prim in &scene.primitives {
        match prim {
            Primitive::Edge {
                from, to, selected, ..
            } => {
                let (stroke, width) = if *selected {
                    (SELECTION_STROKE, 3.0)
                } else {
                    (EDGE_STROKE, 2.0)
                };
                draw_line(ctx, (from.x, from.y), (to.x, to.y), stroke, width, false);
            }
            Primitive::Preview { from, to } => {
                draw_line(ctx, (from.x, from.y), (to.x, to.y), PREVIEW_STROKE, 2.0, true);
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
                shape_path(ctx, *shape, center.x, center.y, *width, *height);
                ctx.set_fill_style_str(&fill.to_hex());
                ctx.fill();
                if *selected {
                    ctx.set_stroke_style_str(SELECTION_STROKE);
                    ctx.set_line_width(3.0);
                    ctx.stroke();
                }
                draw_label(ctx, label, center.x, center.y, &text_color.to_hex());
            }
        }
    }

    ctx.restore();
}

fn draw_line(
    ctx: &CanvasRenderingContext2d,
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    stroke: &str,
    width: f64,
    dashed: bool,
) {
    ctx.save();
    ctx.set_stroke_style_str(stroke);
    ctx.set_line_width(width);
    if dashed {
        let _ = ctx.set_line_dash(&js_sys::Array::of2(
            &JsValue::from_f64(5.0),
            &JsValue::from_f64(5.0),
        ));
    }
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
    ctx.restore();
}

fn shape_path(ctx: &CanvasRenderingContext2d, shape: Shape, cx: f64, cy: f64, w: f64, h: f64) {
    match shape {
        Shape::Circle => {
            ctx.begin_path();
            let _ = ctx.arc(cx, cy, w / 2.0, 0.0, TAU);
            ctx.close_path();
        }
        Shape::Square | Shape::Rectangle => {
            rounded_rect_path(ctx, cx - w / 2.0, cy - h / 2.0, w, h, CORNER_RADIUS);
        }
    }
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    let _ = ctx.arc_to(x + w, y, x + w, y + r, r);
    ctx.line_to(x + w, y + h - r);
    let _ = ctx.arc_to(x + w, y + h, x + w - r, y + h, r);
    ctx.line_to(x + r, y + h);
    let _ = ctx.arc_to(x, y + h, x, y + h - r, r);
    ctx.line_to(x, y + r);
    let _ = ctx.arc_to(x, y, x + r, y, r);
    ctx.close_path();
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &Label, cx: f64, cy: f64, color: &str) {
    ctx.set_fill_style_str(color);
    ctx.set_font(&format!("{}px sans-serif", label.font_size));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for line in &label.lines {
        let _ = ctx.fill_text(&line.text, cx, cy + line.dy);
    }
}
