//! Tool system for canvas interactions.
//!
//! Each tool translates pointer input (already converted to model space and
//! hit-tested) into `ToolAction`s that the `Editor` applies to the document.
//! Tools never touch the graph themselves.
//!
//! | Pointer   | Select              | Add node           | Connect                 |
//! |-----------|---------------------|--------------------|-------------------------|
//! | **Down**  | Select + start drag | —                  | —                       |
//! | **Move**  | Drag selected nodes | —                  | Update preview line     |
//! | **Click** | Select / toggle     | Add node on canvas | Pick start, then end    |

use crate::input::Modifiers;
use dg_core::{Element, Graph, NodeId, Point, Selection, Vec2};
use dg_render::Hit;
use serde::Serialize;

/// The active tool determines how pointer input is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    #[default]
    Select,
    AddNode,
    Connect,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::AddNode => "add-node",
            ToolKind::Connect => "connect",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(ToolKind::Select),
            "add-node" | "addNode" | "add" => Some(ToolKind::AddNode),
            "connect" => Some(ToolKind::Connect),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Click,
}

/// A pointer event after view conversion and hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub phase: PointerPhase,
    /// Model-space position.
    pub point: Point,
    pub hit: Hit,
    pub modifiers: Modifiers,
}

/// What a tool asks the editor to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    AddNode { position: Point },
    MoveNodes(Vec<(NodeId, Point)>),
    AddEdge { start: NodeId, end: NodeId },
    SelectOnly(Element),
    Toggle(Element),
    ClearSelection,
    /// Show (`to: Some`) or clear (`to: None`) the line from `start` to the cursor.
    Preview { start: NodeId, to: Option<Point> },
}

/// Trait for tools that handle pointer input and produce actions.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn handle(&mut self, input: &PointerInput, graph: &Graph, selection: &Selection) -> Vec<ToolAction>;

    /// Drop any in-progress gesture. Called when the tool is switched away.
    fn reset(&mut self) -> Vec<ToolAction> {
        Vec::new()
    }
}

// ─── Select Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct Drag {
    /// Grab offset (pointer − node center) for every dragged node.
    offsets: Vec<(NodeId, Vec2)>,
    moved: bool,
}

#[derive(Debug, Default)]
pub struct SelectTool {
    drag: Option<Drag>,
    /// Set when the last press turned into a drag, so the click the host
    /// delivers after release does not change the selection.
    swallow_click: bool,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Where each dragged node lands if the pointer is at `point`.
    pub fn drag_targets(&self, point: Point) -> Option<Vec<(NodeId, Point)>> {
        let drag = self.drag.as_ref()?;
        Some(
            drag.offsets
                .iter()
                .map(|(id, offset)| (*id, point - *offset))
                .collect(),
        )
    }

    /// Release any drag. Pointer-up ends a drag whatever tool is active.
    pub fn end_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.swallow_click = drag.moved;
        }
    }

    fn start_drag(&mut self, hit: NodeId, point: Point, graph: &Graph, selection: &Selection) {
        // Dragging a selected node carries the rest of the selection along.
        let ids: Vec<NodeId> = if selection.contains(Element::Node(hit)) {
            selection.nodes().to_vec()
        } else {
            vec![hit]
        };
        let offsets = ids
            .into_iter()
            .filter_map(|id| graph.node(id).map(|node| (id, point - node.position)))
            .collect();
        self.drag = Some(Drag {
            offsets,
            moved: false,
        });
        self.swallow_click = false;
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(&mut self, input: &PointerInput, graph: &Graph, selection: &Selection) -> Vec<ToolAction> {
        match input.phase {
            PointerPhase::Down => {
                let Hit::Node(id) = input.hit else {
                    return vec![];
                };
                if input.modifiers.multi_select() {
                    // The click that follows toggles instead.
                    return vec![];
                }
                self.start_drag(id, input.point, graph, selection);
                if selection.contains(Element::Node(id)) {
                    vec![]
                } else {
                    vec![ToolAction::SelectOnly(Element::Node(id))]
                }
            }
            PointerPhase::Move => match self.drag_targets(input.point) {
                Some(targets) if !targets.is_empty() => {
                    if let Some(drag) = self.drag.as_mut() {
                        drag.moved = true;
                    }
                    vec![ToolAction::MoveNodes(targets)]
                }
                _ => vec![],
            },
            PointerPhase::Up => {
                self.end_drag();
                vec![]
            }
            PointerPhase::Click => {
                if std::mem::take(&mut self.swallow_click) {
                    return vec![];
                }
                let element = match input.hit {
                    Hit::Node(id) => Element::Node(id),
                    Hit::Edge(id) => Element::Edge(id),
                    Hit::Canvas => return vec![ToolAction::ClearSelection],
                };
                if input.modifiers.multi_select() {
                    vec![ToolAction::Toggle(element)]
                } else {
                    vec![ToolAction::SelectOnly(element)]
                }
            }
        }
    }

    fn reset(&mut self) -> Vec<ToolAction> {
        self.drag = None;
        self.swallow_click = false;
        vec![]
    }
}

// ─── Add Node Tool ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct AddNodeTool;

impl AddNodeTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for AddNodeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::AddNode
    }

    fn handle(&mut self, input: &PointerInput, _graph: &Graph, _selection: &Selection) -> Vec<ToolAction> {
        match (input.phase, input.hit) {
            (PointerPhase::Click, Hit::Canvas) => vec![ToolAction::AddNode {
                position: input.point,
            }],
            _ => vec![],
        }
    }
}

// ─── Connect Tool ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ConnectTool {
    start: Option<NodeId>,
}

impl ConnectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    pub fn is_connecting(&self) -> bool {
        self.start.is_some()
    }

    /// Pick `node` as the connection start.
    pub fn begin(&mut self, node: NodeId) -> Vec<ToolAction> {
        self.start = Some(node);
        vec![ToolAction::SelectOnly(Element::Node(node))]
    }

    /// Finish on `node`. Clicking the start node again is a no-op and keeps
    /// the connection pending.
    pub fn complete(&mut self, node: NodeId) -> Vec<ToolAction> {
        match self.start {
            Some(start) if start != node => {
                self.start = None;
                vec![
                    ToolAction::AddEdge { start, end: node },
                    ToolAction::Preview { start, to: None },
                ]
            }
            _ => vec![],
        }
    }
}

impl Tool for ConnectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Connect
    }

    fn handle(&mut self, input: &PointerInput, _graph: &Graph, _selection: &Selection) -> Vec<ToolAction> {
        match (input.phase, input.hit, self.start) {
            (PointerPhase::Click, Hit::Node(id), None) => self.begin(id),
            (PointerPhase::Click, Hit::Node(id), Some(_)) => self.complete(id),
            (PointerPhase::Move, _, Some(start)) => vec![ToolAction::Preview {
                start,
                to: Some(input.point),
            }],
            _ => vec![],
        }
    }

    fn reset(&mut self) -> Vec<ToolAction> {
        match self.start.take() {
            Some(start) => vec![ToolAction::Preview { start, to: None }],
            None => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::NodeStyle;

    fn input(phase: PointerPhase, x: f64, y: f64, hit: Hit) -> PointerInput {
        PointerInput {
            phase,
            point: Point::new(x, y),
            hit,
            modifiers: Modifiers::NONE,
        }
    }

    fn graph_with_two() -> (Graph, NodeId, NodeId) {
        let mut graph = Graph::new();
        let a = graph.add_node(Point::new(100.0, 100.0), Some("A"), NodeStyle::default());
        let b = graph.add_node(Point::new(300.0, 100.0), Some("B"), NodeStyle::default());
        (graph, a, b)
    }

    #[test]
    fn tool_names_roundtrip() {
        for kind in [ToolKind::Select, ToolKind::AddNode, ToolKind::Connect] {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("lasso"), None);
        assert_eq!(SelectTool::new().kind(), ToolKind::Select);
        assert_eq!(AddNodeTool::new().kind(), ToolKind::AddNode);
        assert_eq!(ConnectTool::new().kind(), ToolKind::Connect);
    }

    #[test]
    fn select_click_selects_and_toggles() {
        let (graph, a, _) = graph_with_two();
        let sel = Selection::new();
        let mut tool = SelectTool::new();

        let actions = tool.handle(&input(PointerPhase::Click, 100.0, 100.0, Hit::Node(a)), &graph, &sel);
        assert_eq!(actions, vec![ToolAction::SelectOnly(Element::Node(a))]);

        let mut shift = input(PointerPhase::Click, 100.0, 100.0, Hit::Node(a));
        shift.modifiers.shift = true;
        assert_eq!(
            tool.handle(&shift, &graph, &sel),
            vec![ToolAction::Toggle(Element::Node(a))]
        );

        let actions = tool.handle(&input(PointerPhase::Click, 0.0, 0.0, Hit::Canvas), &graph, &sel);
        assert_eq!(actions, vec![ToolAction::ClearSelection]);
    }

    #[test]
    fn select_drag_keeps_grab_offset() {
        let (graph, a, _) = graph_with_two();
        let sel = Selection::new();
        let mut tool = SelectTool::new();

        let down = tool.handle(&input(PointerPhase::Down, 110.0, 95.0, Hit::Node(a)), &graph, &sel);
        assert_eq!(down, vec![ToolAction::SelectOnly(Element::Node(a))]);
        assert!(tool.is_dragging());
        let actions = tool.handle(&input(PointerPhase::Move, 210.0, 195.0, Hit::Canvas), &graph, &sel);
        assert_eq!(
            actions,
            vec![ToolAction::MoveNodes(vec![(a, Point::new(200.0, 200.0))])]
        );

        tool.handle(&input(PointerPhase::Up, 210.0, 195.0, Hit::Node(a)), &graph, &sel);
        assert!(!tool.is_dragging());
        // The click after a real drag is swallowed.
        let click = tool.handle(&input(PointerPhase::Click, 210.0, 195.0, Hit::Node(a)), &graph, &sel);
        assert!(click.is_empty());
    }

    #[test]
    fn dragging_selected_node_moves_whole_selection() {
        let (graph, a, b) = graph_with_two();
        let mut sel = Selection::new();
        sel.select_only(Element::Node(a));
        sel.toggle(Element::Node(b));
        let mut tool = SelectTool::new();

        let down = tool.handle(&input(PointerPhase::Down, 100.0, 100.0, Hit::Node(a)), &graph, &sel);
        assert!(down.is_empty());
        let actions = tool.handle(&input(PointerPhase::Move, 150.0, 120.0, Hit::Canvas), &graph, &sel);
        assert_eq!(
            actions,
            vec![ToolAction::MoveNodes(vec![
                (a, Point::new(150.0, 120.0)),
                (b, Point::new(350.0, 120.0)),
            ])]
        );
    }

    #[test]
    fn add_node_only_on_empty_canvas() {
        let (graph, a, _) = graph_with_two();
        let sel = Selection::new();
        let mut tool = AddNodeTool::new();
        assert!(tool.handle(&input(PointerPhase::Click, 100.0, 100.0, Hit::Node(a)), &graph, &sel).is_empty());
        assert_eq!(
            tool.handle(&input(PointerPhase::Click, 500.0, 40.0, Hit::Canvas), &graph, &sel),
            vec![ToolAction::AddNode {
                position: Point::new(500.0, 40.0)
            }]
        );
    }

    #[test]
    fn connect_flow() {
        let (graph, a, b) = graph_with_two();
        let sel = Selection::new();
        let mut tool = ConnectTool::new();

        let begin = tool.handle(&input(PointerPhase::Click, 100.0, 100.0, Hit::Node(a)), &graph, &sel);
        assert_eq!(begin, vec![ToolAction::SelectOnly(Element::Node(a))]);
        assert_eq!(tool.start(), Some(a));

        let preview = tool.handle(&input(PointerPhase::Move, 200.0, 150.0, Hit::Canvas), &graph, &sel);
        assert_eq!(
            preview,
            vec![ToolAction::Preview {
                start: a,
                to: Some(Point::new(200.0, 150.0))
            }]
        );

        // Clicking the start node again keeps the connection pending.
        assert!(tool.handle(&input(PointerPhase::Click, 100.0, 100.0, Hit::Node(a)), &graph, &sel).is_empty());
        assert!(tool.is_connecting());

        let done = tool.handle(&input(PointerPhase::Click, 300.0, 100.0, Hit::Node(b)), &graph, &sel);
        assert_eq!(
            done,
            vec![
                ToolAction::AddEdge { start: a, end: b },
                ToolAction::Preview { start: a, to: None },
            ]
        );
        assert!(!tool.is_connecting());
    }

    #[test]
    fn connect_reset_clears_preview() {
        let (graph, a, _) = graph_with_two();
        let mut tool = ConnectTool::new();
        tool.handle(&input(PointerPhase::Click, 100.0, 100.0, Hit::Node(a)), &graph, &Selection::new());
        assert_eq!(tool.reset(), vec![ToolAction::Preview { start: a, to: None }]);
        assert!(tool.reset().is_empty());
    }
}
