//! Node sizing, text wrapping, and shape bounds.
//!
//! Everything here is a pure function of its inputs. A node's `size` is a
//! single scalar: the diameter of a circle, the side of a square, and the
//! basis of a rectangle's `1.6 × size` by `0.8 × size` extent.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Smallest size any shape can take before the circle boost.
pub const MIN_NODE_SIZE: f64 = 60.0;
/// Circles lose text area to the inscribed square; compensate by 1.4×.
pub const CIRCLE_SCALE: f64 = 1.4;

const CHAR_WIDTH: f64 = 8.0;
const WORD_GAP: f64 = 4.0;
const RECT_WIDTH_RATIO: f64 = 1.6;
const RECT_HEIGHT_RATIO: f64 = 0.8;
const MIN_FONT_SIZE: f64 = 10.0;
const MAX_FONT_SIZE: f64 = 16.0;

/// The outline a node is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Rectangle,
}

impl Shape {
    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Rectangle => "rectangle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "circle" => Some(Shape::Circle),
            "square" => Some(Shape::Square),
            "rectangle" => Some(Shape::Rectangle),
            _ => None,
        }
    }

    /// Drawn width and height for a node of the given `size`.
    pub fn extent(self, size: f64) -> Size {
        match self {
            Shape::Circle | Shape::Square => Size::new(size, size),
            Shape::Rectangle => Size::new(RECT_WIDTH_RATIO * size, RECT_HEIGHT_RATIO * size),
        }
    }

    /// Widest run of text that fits inside the shape.
    ///
    /// Circles use the inscribed-square heuristic (70% of the diameter).
    pub fn text_width(self, size: f64) -> f64 {
        match self {
            Shape::Rectangle => 0.9 * RECT_WIDTH_RATIO * size,
            Shape::Square => 0.9 * size,
            Shape::Circle => 0.7 * size,
        }
    }
}

/// Compute the size of a node from its text and shape.
///
/// `max(60, longest_word × 8 + word_count × 4)`, boosted by 1.4 for circles.
pub fn node_size(text: &str, shape: Shape) -> f64 {
    let (longest, count) = text
        .split_whitespace()
        .fold((0usize, 0usize), |(longest, count), word| {
            (longest.max(word.chars().count()), count + 1)
        });
    let base = (longest as f64 * CHAR_WIDTH + count as f64 * WORD_GAP).max(MIN_NODE_SIZE);
    match shape {
        Shape::Circle => base * CIRCLE_SCALE,
        Shape::Square | Shape::Rectangle => base,
    }
}

/// Font size used to label a node of the given size.
pub fn font_size(size: f64) -> f64 {
    (size / 3.0).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// A node label broken into lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub font_size: f64,
    pub line_height: f64,
}

impl WrappedText {
    /// Vertical offset of each line's baseline from the node center, so the
    /// block of lines is centered on the node.
    pub fn line_offsets(&self) -> Vec<f64> {
        let count = self.lines.len();
        if count == 0 {
            return Vec::new();
        }
        let first = -((count - 1) as f64) * self.line_height / 2.0;
        (0..count)
            .map(|i| first + i as f64 * self.line_height)
            .collect()
    }
}

/// Greedily pack the words of `text` into lines that fit `shape`.
///
/// A word longer than the line limit gets a line of its own and overflows;
/// words are never split or dropped, and there is no cap on line count.
pub fn wrap_text(text: &str, size: f64, shape: Shape) -> WrappedText {
    let font_size = font_size(size);
    let max_chars = (shape.text_width(size) / (font_size * 0.5)).floor() as usize;

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    WrappedText {
        lines,
        font_size,
        line_height: font_size + 2.0,
    }
}

/// Axis-aligned bounds of a shape centered on `center`.
pub fn shape_bounds(center: Point, shape: Shape, size: f64) -> Rect {
    Rect::from_center_size(center, shape.extent(size))
}

/// Whether `point` falls inside the shape centered on `center`.
pub fn shape_contains(center: Point, shape: Shape, size: f64, point: Point) -> bool {
    match shape {
        Shape::Circle => (point - center).hypot() <= size / 2.0,
        Shape::Square | Shape::Rectangle => {
            let b = shape_bounds(center, shape, size);
            point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
        }
    }
}
