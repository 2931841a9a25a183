//! Change notifications for the render adapter.
//!
//! Every state change the editor makes is described by one `EditorEvent`.
//! Events are queued for hosts that poll (`drain`) and pushed to any
//! subscribed listeners as they are emitted.

use crate::tools::ToolKind;
use dg_core::{Edge, EdgeId, Node, NodeId, Point, Selection, Vec2, ViewTransform};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditorEvent {
    NodeCreated { node: Node },
    /// A node moved. `edges` lists the edges whose endpoints moved with it.
    NodeMoved {
        id: NodeId,
        position: Point,
        edges: Vec<EdgeId>,
    },
    /// Text, colors, or shape changed (size may have changed with them).
    NodeUpdated { node: Node },
    NodeRemoved { id: NodeId },
    EdgeCreated { edge: Edge },
    EdgeRemoved { id: EdgeId },
    SelectionChanged {
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
    },
    ViewChanged { zoom: f64, pan: Vec2 },
    /// Transient connection line. `to: None` removes it.
    ConnectionPreview { from: Point, to: Option<Point> },
    ToolChanged { tool: ToolKind },
    /// The whole graph was swapped (load or clear); redraw from scratch.
    DocumentReplaced { title: String },
    /// Ctrl/Cmd+S was pressed; the host should ask for a title.
    SaveRequested,
}

impl EditorEvent {
    pub fn selection(selection: &Selection) -> Self {
        Self::SelectionChanged {
            nodes: selection.nodes().to_vec(),
            edges: selection.edges().to_vec(),
        }
    }

    pub fn view(view: &ViewTransform) -> Self {
        Self::ViewChanged {
            zoom: view.zoom(),
            pan: view.pan(),
        }
    }
}

type Listener = Box<dyn FnMut(&EditorEvent)>;

/// Pending events plus push listeners.
#[derive(Default)]
pub struct EventQueue {
    pending: Vec<EditorEvent>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.pending)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: EditorEvent) {
        log::trace!("event: {event:?}");
        for listener in &mut self.listeners {
            listener(&event);
        }
        self.pending.push(event);
    }

    /// Register a listener called synchronously for every future event.
    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Take every event emitted since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
