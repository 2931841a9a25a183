//! The editor: single owner of the document, selection, view, and tools.
//!
//! Every change goes through an `Editor` method, which mutates state and
//! then emits the matching `EditorEvent`s. Hosts either drain the queue
//! after each call or subscribe a listener.

use crate::config::EditorConfig;
use crate::edit::{BatchPatch, NodePatch};
use crate::events::{EditorEvent, EventQueue};
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::store::{KeyValueStore, MemoryStore, SnapshotStore};
use crate::tools::{
    AddNodeTool, ConnectTool, PointerInput, PointerPhase, SelectTool, Tool, ToolAction, ToolKind,
};
use chrono::Utc;
use dg_core::{
    Document, DocumentRecord, EdgeId, Element, Error, Graph, NodeId, Point, Result, Selection,
    ViewTransform,
};
use dg_render::{EDGE_HIT_TOLERANCE, Scene, build_scene, hit_test};

pub struct Editor {
    document: Document,
    selection: Selection,
    view: ViewTransform,
    active_tool: ToolKind,
    select_tool: SelectTool,
    add_node_tool: AddNodeTool,
    connect_tool: ConnectTool,
    /// In-progress connection line `(start center, cursor)` in model space.
    preview: Option<(Point, Point)>,
    store: SnapshotStore,
    events: EventQueue,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Editor backed by an in-memory store.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_store(config, Box::new(MemoryStore::new()))
    }

    pub fn with_store(config: EditorConfig, backend: Box<dyn KeyValueStore>) -> Self {
        let document = match &config.welcome {
            Some(welcome) => {
                Document::with_welcome_node(&welcome.text, welcome.position, config.node_style)
            }
            None => Document::new(),
        };
        Self {
            document,
            selection: Selection::new(),
            view: ViewTransform::new(),
            active_tool: ToolKind::Select,
            select_tool: SelectTool::new(),
            add_node_tool: AddNodeTool::new(),
            connect_tool: ConnectTool::new(),
            preview: None,
            store: SnapshotStore::new(backend, &config.namespace),
            events: EventQueue::new(),
            config,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn graph(&self) -> &Graph {
        &self.document.graph
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn tool(&self) -> ToolKind {
        self.active_tool
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Start node of a pending connection.
    pub fn connection_start(&self) -> Option<NodeId> {
        self.connect_tool.start()
    }

    pub fn is_dragging(&self) -> bool {
        self.select_tool.is_dragging()
    }

    /// Current draw list.
    pub fn scene(&self) -> Scene {
        build_scene(&self.document.graph, &self.selection, &self.view, self.preview)
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) {
        self.events.subscribe(listener);
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Activate `kind`. Always cancels a pending connection and any drag.
    pub fn set_tool(&mut self, kind: ToolKind) {
        let cleanup = self.reset_tools();
        self.apply(cleanup);
        self.active_tool = kind;
        log::debug!("tool: {}", kind.name());
        self.events.emit(EditorEvent::ToolChanged { tool: kind });
    }

    fn reset_tools(&mut self) -> Vec<ToolAction> {
        let mut actions = self.select_tool.reset();
        actions.extend(self.add_node_tool.reset());
        actions.extend(self.connect_tool.reset());
        actions
    }

    // ─── Graph commands ──────────────────────────────────────────────────

    /// Add a node with the configured default text and style.
    pub fn add_node_at(&mut self, position: Point) -> NodeId {
        let id = self.document.graph.add_node(
            position,
            Some(&self.config.new_node_text),
            self.config.node_style,
        );
        if let Some(node) = self.document.graph.node(id) {
            self.events.emit(EditorEvent::NodeCreated { node: node.clone() });
        }
        id
    }

    /// Pick `id` as the start of a new connection and select it. Switches
    /// to the connect tool first so the preview follows the pointer.
    pub fn begin_connection(&mut self, id: NodeId) -> Result<()> {
        if !self.document.graph.contains_node(id) {
            return Err(Error::missing_node(id));
        }
        if self.active_tool != ToolKind::Connect {
            self.set_tool(ToolKind::Connect);
        }
        let mut actions = self.connect_tool.reset();
        actions.extend(self.connect_tool.begin(id));
        self.apply(actions);
        Ok(())
    }

    /// Finish a pending connection at `id`.
    ///
    /// Returns `Ok(None)` when nothing is pending or `id` is the start node;
    /// the latter keeps the connection pending.
    pub fn complete_connection(&mut self, id: NodeId) -> Result<Option<EdgeId>> {
        if !self.document.graph.contains_node(id) {
            return Err(Error::missing_node(id));
        }
        match self.connect_tool.start() {
            Some(start) if start != id => {
                let edge = self.connect(start, id);
                let cleanup = self.connect_tool.reset();
                self.apply(cleanup);
                edge.map(Some)
            }
            _ => Ok(None),
        }
    }

    fn connect(&mut self, start: NodeId, end: NodeId) -> Result<EdgeId> {
        let id = self.document.graph.add_edge(start, end)?;
        if let Some(edge) = self.document.graph.edge(id) {
            self.events.emit(EditorEvent::EdgeCreated { edge: *edge });
        }
        Ok(id)
    }

    /// Move one node's center. Attached edges follow.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> Result<()> {
        if self.move_node_to(id, position) {
            Ok(())
        } else {
            Err(Error::missing_node(id))
        }
    }

    fn move_node_to(&mut self, id: NodeId, position: Point) -> bool {
        if !self.document.graph.move_node(id, position) {
            return false;
        }
        let edges = self.document.graph.edges_touching(id);
        self.events.emit(EditorEvent::NodeMoved {
            id,
            position,
            edges,
        });
        if self.connect_tool.start() == Some(id) {
            if let Some((_, to)) = self.preview {
                self.preview = Some((position, to));
                self.events.emit(EditorEvent::ConnectionPreview {
                    from: position,
                    to: Some(to),
                });
            }
        }
        true
    }

    /// Move the selected nodes so the dragged (or first selected) node
    /// lands on `point`; the rest keep their relative placement.
    pub fn move_selection_to(&mut self, point: Point) -> bool {
        let targets = match self.select_tool.drag_targets(point) {
            Some(targets) => targets,
            None => {
                let Some(primary) = self
                    .selection
                    .nodes()
                    .first()
                    .and_then(|id| self.document.graph.node(*id))
                else {
                    return false;
                };
                let delta = point - primary.position;
                self.selection
                    .nodes()
                    .iter()
                    .filter_map(|id| {
                        self.document
                            .graph
                            .node(*id)
                            .map(|node| (*id, node.position + delta))
                    })
                    .collect()
            }
        };
        self.apply(vec![ToolAction::MoveNodes(targets)])
    }

    /// Delete selected edges, then selected nodes (cascading to their
    /// edges), then clear the selection.
    pub fn delete_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let edges = self.selection.edges().to_vec();
        let nodes = self.selection.nodes().to_vec();

        for id in edges {
            if self.document.graph.remove_edge(id).is_some() {
                self.events.emit(EditorEvent::EdgeRemoved { id });
            }
        }
        for id in nodes {
            if let Some(removed) = self.document.graph.remove_node(id) {
                for edge in removed.edges {
                    self.events.emit(EditorEvent::EdgeRemoved { id: edge.id });
                }
                self.events.emit(EditorEvent::NodeRemoved { id });
            }
        }

        self.selection.clear();
        self.events.emit(EditorEvent::selection(&self.selection));

        // A pending connection cannot outlive its start node.
        if let Some(start) = self.connect_tool.start() {
            if !self.document.graph.contains_node(start) {
                let cleanup = self.connect_tool.reset();
                self.apply(cleanup);
            }
        }
        true
    }

    /// Empty the canvas. The title is kept.
    pub fn clear_all(&mut self) {
        let cleanup = self.reset_tools();
        self.apply(cleanup);
        self.document.graph.clear();
        self.selection.clear();
        log::info!("cleared {}", self.document.title);
        self.events.emit(EditorEvent::DocumentReplaced {
            title: self.document.title.clone(),
        });
        self.events.emit(EditorEvent::selection(&self.selection));
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, element: Element) -> bool {
        self.apply(vec![ToolAction::SelectOnly(element)])
    }

    pub fn toggle_selection(&mut self, element: Element) -> bool {
        self.apply(vec![ToolAction::Toggle(element)])
    }

    pub fn clear_selection(&mut self) -> bool {
        self.apply(vec![ToolAction::ClearSelection])
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.view.zoom_in_step();
        self.view_changed(changed)
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.view.zoom_out_step();
        self.view_changed(changed)
    }

    pub fn reset_zoom(&mut self) -> bool {
        let changed = self.view.reset();
        self.view_changed(changed)
    }

    fn view_changed(&mut self, changed: bool) -> bool {
        if changed {
            self.events.emit(EditorEvent::view(&self.view));
        }
        changed
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    /// Apply `patch` to one node.
    pub fn edit_single(&mut self, id: NodeId, patch: &NodePatch) -> Result<bool> {
        let node = self
            .document
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::missing_node(id))?;
        let changed = patch.apply(node);
        if changed {
            let node = node.clone();
            self.events.emit(EditorEvent::NodeUpdated { node });
        }
        Ok(changed)
    }

    /// Apply shared properties to every node in `ids`. Nothing changes if
    /// any id is unknown. Returns how many nodes actually changed.
    pub fn edit_batch(&mut self, ids: &[NodeId], patch: &BatchPatch) -> Result<usize> {
        if let Some(missing) = ids
            .iter()
            .find(|id| !self.document.graph.contains_node(**id))
        {
            return Err(Error::missing_node(missing));
        }
        if patch.is_empty() {
            return Ok(0);
        }
        let mut count = 0;
        for id in ids {
            let Some(node) = self.document.graph.node_mut(*id) else {
                continue;
            };
            if patch.apply(node) {
                count += 1;
                let node = node.clone();
                self.events.emit(EditorEvent::NodeUpdated { node });
            }
        }
        log::debug!("batch edit: {count}/{} nodes changed", ids.len());
        Ok(count)
    }

    /// Edit whatever is selected: the full patch for one node, the shared
    /// fields for several.
    pub fn edit_selection(&mut self, patch: &NodePatch) -> Result<usize> {
        let nodes = self.selection.nodes().to_vec();
        match nodes.as_slice() {
            [] => Ok(0),
            [id] => self.edit_single(*id, patch).map(usize::from),
            _ => self.edit_batch(&nodes, &patch.shared()),
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Snapshot the graph under `title`, overwriting any earlier save.
    pub fn save(&mut self, title: &str) -> Result<DocumentRecord> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }
        let record = DocumentRecord::capture(title, &self.document.graph, Utc::now());
        self.store.save(&record)?;
        self.document.title = title.to_string();
        self.document.saved_at = Some(record.saved_at);
        Ok(record)
    }

    /// Replace the current document with the save named `title`.
    pub fn load(&mut self, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::NoTitleSelected);
        }
        let record = self
            .store
            .load(title)?
            .ok_or_else(|| Error::DocumentNotFound {
                title: title.to_string(),
            })?;
        let document = record.restore()?;

        let cleanup = self.reset_tools();
        self.apply(cleanup);
        self.document = document;
        self.selection.clear();
        log::info!(
            "loaded {title}: {} nodes, {} edges",
            self.document.graph.node_count(),
            self.document.graph.edge_count()
        );
        self.events.emit(EditorEvent::DocumentReplaced {
            title: self.document.title.clone(),
        });
        self.events.emit(EditorEvent::selection(&self.selection));
        Ok(())
    }

    pub fn saved_titles(&self) -> Result<Vec<String>> {
        self.store.titles()
    }

    pub fn delete_saved(&mut self, title: &str) -> Result<bool> {
        self.store.remove(title.trim())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one host event through the state machine.
    ///
    /// Returns `true` when the event was consumed; hosts should then
    /// suppress the browser default (page scroll, save dialog, ...).
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                self.handle_pointer(PointerPhase::Down, Point::new(*x, *y), *modifiers)
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                self.handle_pointer(PointerPhase::Move, Point::new(*x, *y), *modifiers)
            }
            InputEvent::PointerUp { x, y, modifiers } => {
                self.handle_pointer(PointerPhase::Up, Point::new(*x, *y), *modifiers)
            }
            InputEvent::Click { x, y, modifiers } => {
                self.handle_pointer(PointerPhase::Click, Point::new(*x, *y), *modifiers)
            }
            InputEvent::Wheel { delta_y } => {
                let changed = self.view.wheel_zoom(*delta_y);
                self.view_changed(changed);
                true
            }
            InputEvent::Key {
                key,
                modifiers,
                in_text_input,
            } => match ShortcutMap::resolve(key, *modifiers, *in_text_input) {
                Some(action) => {
                    self.run_shortcut(action);
                    true
                }
                None => false,
            },
        }
    }

    fn handle_pointer(&mut self, phase: PointerPhase, screen: Point, modifiers: Modifiers) -> bool {
        let point = self.view.screen_to_model(screen);
        let tolerance = EDGE_HIT_TOLERANCE / self.view.zoom();
        let hit = hit_test(&self.document.graph, point, tolerance);
        let input = PointerInput {
            phase,
            point,
            hit,
            modifiers,
        };

        let graph = &self.document.graph;
        let selection = &self.selection;
        let actions = match self.active_tool {
            ToolKind::Select => self.select_tool.handle(&input, graph, selection),
            ToolKind::AddNode => self.add_node_tool.handle(&input, graph, selection),
            ToolKind::Connect => self.connect_tool.handle(&input, graph, selection),
        };
        if phase == PointerPhase::Up {
            self.select_tool.end_drag();
        }
        self.apply(actions)
    }

    fn run_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Delete => {
                self.delete_selection();
            }
            ShortcutAction::Escape => {
                self.clear_selection();
                self.set_tool(ToolKind::Select);
            }
            ShortcutAction::RequestSave => self.events.emit(EditorEvent::SaveRequested),
        }
    }

    // ─── Action application ──────────────────────────────────────────────

    fn apply(&mut self, actions: Vec<ToolAction>) -> bool {
        let mut changed = false;
        for action in actions {
            match self.apply_action(action) {
                Ok(c) => changed |= c,
                Err(err) => log::warn!("tool action rejected: {err}"),
            }
        }
        changed
    }

    fn apply_action(&mut self, action: ToolAction) -> Result<bool> {
        match action {
            ToolAction::AddNode { position } => {
                self.add_node_at(position);
                Ok(true)
            }
            ToolAction::MoveNodes(moves) => {
                let mut moved = false;
                for (id, position) in moves {
                    moved |= self.move_node_to(id, position);
                }
                Ok(moved)
            }
            ToolAction::AddEdge { start, end } => self.connect(start, end).map(|_| true),
            ToolAction::SelectOnly(element) => {
                let before = self.selection.clone();
                self.selection.select_only(element);
                Ok(self.selection_changed(before))
            }
            ToolAction::Toggle(element) => {
                self.selection.toggle(element);
                self.events.emit(EditorEvent::selection(&self.selection));
                Ok(true)
            }
            ToolAction::ClearSelection => {
                let before = self.selection.clone();
                self.selection.clear();
                Ok(self.selection_changed(before))
            }
            ToolAction::Preview { start, to: Some(to) } => {
                let Some(node) = self.document.graph.node(start) else {
                    return Err(Error::missing_node(start));
                };
                let from = node.position;
                self.preview = Some((from, to));
                self.events.emit(EditorEvent::ConnectionPreview { from, to: Some(to) });
                Ok(true)
            }
            ToolAction::Preview { to: None, .. } => match self.preview.take() {
                Some((from, _)) => {
                    self.events.emit(EditorEvent::ConnectionPreview { from, to: None });
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    fn selection_changed(&mut self, before: Selection) -> bool {
        let changed = before != self.selection;
        if changed {
            self.events.emit(EditorEvent::selection(&self.selection));
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::ErrorKind;

    fn editor() -> Editor {
        Editor::new(EditorConfig::empty())
    }

    #[test]
    fn welcome_node_seeds_new_editor() {
        let ed = Editor::default();
        assert_eq!(ed.graph().node_count(), 1);
        let welcome = ed.graph().nodes().next().unwrap();
        assert_eq!(welcome.position, Point::new(400.0, 300.0));
        assert_eq!(ed.tool(), ToolKind::Select);
    }

    #[test]
    fn add_node_emits_created() {
        let mut ed = editor();
        let id = ed.add_node_at(Point::new(10.0, 20.0));
        let events = ed.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            EditorEvent::NodeCreated { node } => {
                assert_eq!(node.id(), id);
                assert_eq!(node.text(), "New Node");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn complete_connection_on_start_is_noop() {
        let mut ed = editor();
        let a = ed.add_node_at(Point::new(0.0, 0.0));
        let b = ed.add_node_at(Point::new(200.0, 0.0));
        ed.begin_connection(a).unwrap();
        assert_eq!(ed.complete_connection(a).unwrap(), None);
        assert_eq!(ed.connection_start(), Some(a));
        let edge = ed.complete_connection(b).unwrap();
        assert!(edge.is_some());
        assert_eq!(ed.connection_start(), None);
        assert_eq!(ed.graph().edge_count(), 1);
    }

    #[test]
    fn begin_connection_switches_to_connect_tool() {
        let mut ed = editor();
        let a = ed.add_node_at(Point::new(0.0, 0.0));
        ed.drain_events();
        ed.begin_connection(a).unwrap();
        assert_eq!(ed.tool(), ToolKind::Connect);
        assert_eq!(ed.connection_start(), Some(a));
        assert!(
            ed.drain_events()
                .contains(&EditorEvent::ToolChanged { tool: ToolKind::Connect })
        );

        // Already connecting: the tool stays and no second switch is reported.
        let b = ed.add_node_at(Point::new(200.0, 0.0));
        ed.drain_events();
        ed.begin_connection(b).unwrap();
        assert_eq!(ed.connection_start(), Some(b));
        assert!(
            !ed.drain_events()
                .iter()
                .any(|event| matches!(event, EditorEvent::ToolChanged { .. }))
        );
    }

    #[test]
    fn moving_start_node_drags_preview_along() {
        let mut ed = editor();
        let a = ed.add_node_at(Point::new(100.0, 100.0));
        ed.begin_connection(a).unwrap();
        ed.handle_input(&InputEvent::PointerMove {
            x: 300.0,
            y: 200.0,
            modifiers: Modifiers::NONE,
        });
        ed.drain_events();

        ed.move_node(a, Point::new(150.0, 120.0)).unwrap();
        let events = ed.drain_events();
        assert_eq!(
            events.last(),
            Some(&EditorEvent::ConnectionPreview {
                from: Point::new(150.0, 120.0),
                to: Some(Point::new(300.0, 200.0)),
            })
        );
        assert!(ed.scene().primitives.iter().any(|p| matches!(
            p,
            dg_render::Primitive::Preview { from, .. } if *from == Point::new(150.0, 120.0)
        )));
    }

    #[test]
    fn empty_batch_patch_changes_nothing() {
        let mut ed = editor();
        let a = ed.add_node_at(Point::new(0.0, 0.0));
        ed.drain_events();
        assert_eq!(ed.edit_batch(&[a], &BatchPatch::default()).unwrap(), 0);
        assert!(ed.drain_events().is_empty());
        // Ids are still checked for an empty patch.
        let err = ed
            .edit_batch(&[NodeId::intern("node_404")], &BatchPatch::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
    }

    #[test]
    fn begin_connection_rejects_unknown_node() {
        let mut ed = editor();
        let err = ed.begin_connection(NodeId::intern("node_404")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
    }

    #[test]
    fn zoom_events_only_on_change() {
        let mut ed = editor();
        assert!(!ed.reset_zoom());
        assert!(ed.drain_events().is_empty());
        assert!(ed.zoom_in());
        assert_eq!(ed.drain_events().len(), 1);
    }

    #[test]
    fn edit_batch_is_all_or_nothing() {
        let mut ed = editor();
        let a = ed.add_node_at(Point::new(0.0, 0.0));
        let patch = BatchPatch {
            fill: Some(dg_core::Color::rgb(0, 0, 0)),
            ..BatchPatch::default()
        };
        let err = ed
            .edit_batch(&[a, NodeId::intern("node_999")], &patch)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert_eq!(ed.graph().node(a).unwrap().fill, dg_core::Color::DEFAULT_FILL);
    }

    #[test]
    fn save_rejects_blank_title_and_load_reports_missing() {
        let mut ed = editor();
        assert!(matches!(ed.save("   "), Err(Error::EmptyTitle)));
        assert!(matches!(ed.load(""), Err(Error::NoTitleSelected)));
        assert!(matches!(
            ed.load("nope"),
            Err(Error::DocumentNotFound { .. })
        ));
    }
}
