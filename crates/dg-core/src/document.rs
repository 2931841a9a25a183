//! The document aggregate: a titled graph with its last save time.

use crate::model::{Graph, NodeStyle};
use chrono::{DateTime, Utc};
use kurbo::Point;

pub const DEFAULT_TITLE: &str = "Untitled Diagram";

#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub graph: Graph,
    /// When the document was last saved or loaded from a save.
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            graph: Graph::new(),
            saved_at: None,
        }
    }
}

impl Document {
    /// An empty, unsaved document.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh document seeded with one welcome node.
    pub fn with_welcome_node(text: &str, position: Point, style: NodeStyle) -> Self {
        let mut doc = Self::new();
        doc.graph.add_node(position, Some(text), style);
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_document_has_one_node() {
        let doc = Document::with_welcome_node("Welcome", Point::new(400.0, 300.0), NodeStyle::default());
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.graph.node_count(), 1);
        assert_eq!(doc.graph.node_counter(), 1);
        assert!(doc.saved_at.is_none());
    }
}
