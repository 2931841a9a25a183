//! Editor configuration.

use crate::store::DEFAULT_NAMESPACE;
use dg_core::model::DEFAULT_NODE_TEXT;
use dg_core::{NodeStyle, Point};

/// The node a fresh editor starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct WelcomeNode {
    pub text: String,
    pub position: Point,
}

impl Default for WelcomeNode {
    fn default() -> Self {
        Self {
            text: "Welcome! Click Add Node to start".to_string(),
            position: Point::new(400.0, 300.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Key prefix for saved documents.
    pub namespace: String,
    /// Style applied to every new node.
    pub node_style: NodeStyle,
    pub new_node_text: String,
    /// `None` starts with an empty canvas.
    pub welcome: Option<WelcomeNode>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            node_style: NodeStyle::default(),
            new_node_text: DEFAULT_NODE_TEXT.to_string(),
            welcome: Some(WelcomeNode::default()),
        }
    }
}

impl EditorConfig {
    /// Defaults without the welcome node.
    pub fn empty() -> Self {
        Self {
            welcome: None,
            ..Self::default()
        }
    }
}
