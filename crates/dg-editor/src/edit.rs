//! Property edits for a single node or a batch of nodes.

use dg_core::{Color, Error, Node, Result, Shape};
use serde::Deserialize;

/// Changes to one node. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    /// Blank text is ignored and the node keeps its label.
    pub text: Option<String>,
    pub fill: Option<Color>,
    pub text_color: Option<Color>,
    pub shape: Option<Shape>,
}

/// Untyped patch as sent by the properties panel.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPatch {
    text: Option<String>,
    fill: Option<String>,
    text_color: Option<String>,
    shape: Option<String>,
}

impl NodePatch {
    /// Parse `{"text", "fill", "textColor", "shape"}`, all optional.
    /// Colors must be hex; shapes must be a known name.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawPatch =
            serde_json::from_str(json).map_err(|e| Error::MalformedEdit(e.to_string()))?;
        let shape = match raw.shape.as_deref() {
            Some(name) => Some(Shape::from_name(name).ok_or_else(|| Error::UnknownShape {
                name: name.to_string(),
            })?),
            None => None,
        };
        Ok(Self {
            text: raw.text,
            fill: raw.fill.as_deref().map(Color::parse).transpose()?,
            text_color: raw.text_color.as_deref().map(Color::parse).transpose()?,
            shape,
        })
    }

    /// Apply to `node`, returning whether anything changed.
    pub fn apply(&self, node: &mut Node) -> bool {
        let mut changed = false;
        if let Some(text) = &self.text {
            if text.trim() != node.text() {
                changed |= node.set_text(text);
            }
        }
        changed |= self.shared().apply(node);
        changed
    }

    /// The fields that make sense across several nodes.
    pub fn shared(&self) -> BatchPatch {
        BatchPatch {
            fill: self.fill,
            text_color: self.text_color,
            shape: self.shape,
        }
    }
}

/// Changes applied to every node in a multi-selection. Text is per-node
/// and deliberately absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchPatch {
    pub fill: Option<Color>,
    pub text_color: Option<Color>,
    pub shape: Option<Shape>,
}

impl BatchPatch {
    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.text_color.is_none() && self.shape.is_none()
    }

    pub fn apply(&self, node: &mut Node) -> bool {
        let mut changed = false;
        if let Some(fill) = self.fill {
            changed |= node.fill != fill;
            node.fill = fill;
        }
        if let Some(text_color) = self.text_color {
            changed |= node.text_color != text_color;
            node.text_color = text_color;
        }
        if let Some(shape) = self.shape {
            if shape != node.shape() {
                node.set_shape(shape);
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{NodeId, NodeStyle, Point};

    fn node(text: &str) -> Node {
        Node::new(NodeId::numbered(1), Point::ZERO, text, NodeStyle::default())
    }

    #[test]
    fn patch_updates_text_and_size() {
        let mut n = node("A");
        let before = n.size();
        let patch = NodePatch {
            text: Some("A much longer label".into()),
            ..NodePatch::default()
        };
        assert!(patch.apply(&mut n));
        assert_eq!(n.text(), "A much longer label");
        assert!(n.size() > before);
    }

    #[test]
    fn blank_text_keeps_label() {
        let mut n = node("Keep me");
        let patch = NodePatch {
            text: Some("   ".into()),
            ..NodePatch::default()
        };
        assert!(!patch.apply(&mut n));
        assert_eq!(n.text(), "Keep me");
    }

    #[test]
    fn batch_changes_shape_and_resizes() {
        let mut n = node("Hello World");
        let patch = BatchPatch {
            shape: Some(Shape::Rectangle),
            fill: Some(Color::rgb(0xFF, 0, 0)),
            ..BatchPatch::default()
        };
        assert!(patch.apply(&mut n));
        assert_eq!(n.shape(), Shape::Rectangle);
        assert_eq!(n.fill.to_hex(), "#FF0000");
        assert!(!patch.apply(&mut n));
    }

    #[test]
    fn patch_parses_from_camel_case_json() {
        let patch = NodePatch::from_json(r##"{"textColor":"#000","shape":"square"}"##).unwrap();
        assert_eq!(patch.text_color, Some(Color::rgb(0, 0, 0)));
        assert_eq!(patch.shape, Some(Shape::Square));
        assert_eq!(patch.text, None);
    }

    #[test]
    fn patch_rejects_bad_values() {
        assert!(matches!(
            NodePatch::from_json(r#"{"fill":"red"}"#),
            Err(Error::InvalidColor { .. })
        ));
        assert!(matches!(
            NodePatch::from_json(r#"{"shape":"hexagon"}"#),
            Err(Error::UnknownShape { .. })
        ));
        assert!(matches!(
            NodePatch::from_json("[1,2]"),
            Err(Error::MalformedEdit(_))
        ));
    }
}
