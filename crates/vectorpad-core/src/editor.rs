//! The interaction state machine.
//!
//! An [`Editor`] turns pointer and keyboard events into reversible edits of
//! the shapes on its [`Surface`]. One editor owns one surface together with
//! the handle set, the history and the state of the gesture in progress.

use crate::config::EditorConfig;
use crate::geometry::span;
use crate::handles::{HandleManager, HandleRef};
use crate::history::{History, HistoryKind, HistoryNode};
use crate::input::{Command, Modifiers, Target, command_for_key};
use crate::mutator::{self, DrawOption};
use crate::shapes::{Shape, ShapeId, ShapeKind};
use crate::surface::Surface;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Drawing tools. `None` on the editor means "no tool": presses on shapes
/// move them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Line,
    Rect,
    Polygon,
    /// Draw a selection marquee.
    Select,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Line => "line",
            ToolKind::Rect => "rect",
            ToolKind::Polygon => "polygon",
            ToolKind::Select => "select",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "line" => Some(ToolKind::Line),
            "rect" => Some(ToolKind::Rect),
            "polygon" => Some(ToolKind::Polygon),
            "select" => Some(ToolKind::Select),
            _ => None,
        }
    }
}

/// What the gesture in progress is doing to the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Empty,
    Create,
    Modify,
    Select,
}

impl Mode {
    fn history_kind(self) -> Option<HistoryKind> {
        match self {
            Mode::Create => Some(HistoryKind::Create),
            Mode::Modify => Some(HistoryKind::Modify),
            Mode::Empty | Mode::Select => None,
        }
    }
}

/// Observable state of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    /// Button down, not moved yet.
    PressedUndetermined,
    DraggingHandle,
    /// Dragging a shape body with no tool selected.
    MovingShape,
    DrawingShape,
    DrawingMarquee,
    PolygonVertexEntry,
    Panning,
}

/// Action attached to a context-menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MenuAction {
    RemovePolygonVertex {
        shape: ShapeId,
        x: f64,
        y: f64,
    },
    /// Insert `(x, y)` after vertex `index`.
    InsertPolygonVertex {
        shape: ShapeId,
        index: usize,
        x: f64,
        y: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub action: MenuAction,
}

/// State of one press-move-release gesture.
#[derive(Debug, Clone, Default)]
struct Session {
    mode: Mode,
    active: Option<Target>,
    /// Press point in surface coordinates; advanced on every step of a move.
    origin: Point,
    last_screen: Point,
    pressed: bool,
    moved: bool,
    panning: bool,
    /// Shapes as they were when the gesture started editing.
    before: Option<Vec<Shape>>,
}

/// A polygon being entered click by click.
#[derive(Debug, Clone, Copy)]
struct PolygonDraft {
    shape: ShapeId,
    /// The last vertex follows the pointer and is not committed yet.
    live: bool,
}

/// An editor instance bound to one surface.
pub struct Editor<S: Surface> {
    surface: S,
    handles: HandleManager,
    history: History,
    session: Session,
    tool: Option<ToolKind>,
    viewport: Viewport,
    draft: Option<PolygonDraft>,
    config: EditorConfig,
    space_held: bool,
}

impl<S: Surface> Editor<S> {
    pub fn new(surface: S, config: EditorConfig) -> Self {
        let viewport = Viewport::default().with_zoom_limits(config.min_zoom, config.max_zoom);
        Self {
            surface,
            handles: HandleManager::new(),
            history: History::with_limit(config.history_limit),
            session: Session::default(),
            tool: None,
            viewport,
            draft: None,
            config,
            space_held: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn handles(&self) -> &HandleManager {
        &self.handles
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> Option<ToolKind> {
        self.tool
    }

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    pub fn state(&self) -> InteractionState {
        if self.session.panning {
            return InteractionState::Panning;
        }
        if self.draft.is_some() {
            return InteractionState::PolygonVertexEntry;
        }
        if !self.session.pressed {
            return InteractionState::Idle;
        }
        if !self.session.moved {
            return InteractionState::PressedUndetermined;
        }
        match (self.session.mode, self.session.active) {
            (Mode::Create, _) => InteractionState::DrawingShape,
            (Mode::Select, _) => InteractionState::DrawingMarquee,
            (Mode::Modify, Some(Target::Handle(_))) => InteractionState::DraggingHandle,
            (Mode::Modify, Some(Target::Shape(_))) => InteractionState::MovingShape,
            _ => InteractionState::PressedUndetermined,
        }
    }

    /// Switch tools. A polygon in progress is finished first.
    pub fn set_tool(&mut self, tool: Option<ToolKind>) {
        if self.draft.is_some() {
            self.finish_polygon();
        }
        log::debug!("Tool: {:?} -> {:?}", self.tool, tool);
        self.tool = tool;
        self.publish();
    }

    pub fn pointer_down(&mut self, target: Target, screen: Point) {
        let point = self.viewport.screen_to_surface(screen);
        self.session = Session {
            origin: point,
            last_screen: screen,
            pressed: true,
            active: (self.tool != Some(ToolKind::Polygon)).then_some(target),
            ..Session::default()
        };
    }

    pub fn pointer_move(&mut self, screen: Point, modifiers: Modifiers) {
        let point = self.viewport.screen_to_surface(screen);
        let pan_held = modifiers.space || self.space_held;

        if self.session.pressed {
            self.session.moved = true;
            if pan_held || self.session.panning {
                self.session.panning = true;
                let delta = screen - self.session.last_screen;
                self.session.last_screen = screen;
                self.pan_by(delta);
                return;
            }
        }
        self.session.last_screen = screen;

        if self.draft.is_some() {
            self.track_polygon_vertex(point);
        } else if self.session.pressed {
            match self.session.active {
                Some(Target::Handle(handle)) => self.drag_handle(handle, point),
                Some(Target::Surface) if self.tool == Some(ToolKind::Select) => {
                    self.start_drawing(point)
                }
                _ if matches!(self.tool, Some(ToolKind::Line | ToolKind::Rect)) => {
                    self.start_drawing(point)
                }
                Some(Target::Shape(id)) if self.tool.is_none() => self.move_shape(id, point),
                _ => {}
            }
        }
        self.publish();
    }

    pub fn pointer_up(&mut self, target: Target, screen: Point) {
        let point = self.viewport.screen_to_surface(screen);
        let session = std::mem::take(&mut self.session);

        if session.panning {
            // A gesture that switched to panning midway still commits its edit.
            if session.mode != Mode::Empty {
                self.commit(session);
            }
            self.publish();
            return;
        }

        if self.tool == Some(ToolKind::Polygon) {
            self.polygon_click(point);
        } else if !session.moved {
            self.click(target);
        } else {
            self.commit(session);
        }
        self.publish();
    }

    /// Abandon the gesture in progress without committing it. Shapes created
    /// by the gesture stay on the surface.
    pub fn pointer_cancel(&mut self) {
        if self.session.pressed {
            log::debug!("Gesture cancelled in mode {:?}", self.session.mode);
        }
        self.session = Session::default();
    }

    /// Handle a key press. Returns true if the key was bound to a command.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let Some(command) = command_for_key(key, modifiers) else {
            return false;
        };
        match command {
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::Pan => self.space_held = true,
            Command::DeleteEdited => {
                self.delete_edited();
            }
            Command::Cancel => self.cancel(),
            Command::SetTool(tool) => self.set_tool(tool),
        }
        true
    }

    pub fn key_up(&mut self, key: &str) {
        if matches!(key, " " | "Spacebar") {
            self.space_held = false;
        }
    }

    pub fn undo(&mut self) -> bool {
        self.prepare_replay();
        let done = self.history.undo(&mut self.surface);
        self.publish();
        done
    }

    pub fn redo(&mut self) -> bool {
        self.prepare_replay();
        let done = self.history.redo(&mut self.surface);
        self.publish();
        done
    }

    /// Delete the shapes currently carrying handles as one undoable step.
    pub fn delete_edited(&mut self) -> bool {
        if self.draft.is_some() {
            self.finish_polygon();
        }
        self.session = Session::default();
        let before = mutator::take_snapshot(&self.handles, &self.surface);
        self.handles.clear();
        if before.is_empty() {
            self.publish();
            return false;
        }
        for shape in &before {
            self.surface.remove_shape(shape.id());
        }
        self.history
            .record(HistoryNode::new(HistoryKind::Delete, before, Vec::new()));
        self.publish();
        true
    }

    /// Finish any polygon in progress and drop the handles.
    pub fn cancel(&mut self) {
        if self.draft.is_some() {
            self.finish_polygon();
        }
        self.session = Session::default();
        self.handles.clear();
        self.publish();
    }

    /// Hit test handles, then shapes front to back.
    pub fn pick(&self, screen: Point) -> Target {
        let point = self.viewport.screen_to_surface(screen);
        let tolerance = self.config.hit_tolerance / self.viewport.zoom();

        if let Some(handle) = self
            .handles
            .hit_test(point, self.config.handle_radius + tolerance)
        {
            return Target::Handle(handle);
        }
        self.surface
            .shapes_at_point(point, tolerance)
            .first()
            .map_or(Target::Surface, |id| Target::Shape(*id))
    }

    /// Entries for a right-click on `target`.
    pub fn context_menu(&self, target: Target, screen: Point) -> Vec<MenuEntry> {
        match target {
            Target::Handle(handle) => {
                let is_polygon = self
                    .surface
                    .shape(handle.owner)
                    .is_some_and(|s| s.kind() == ShapeKind::Polygon);
                match self.handles.get(handle) {
                    Some(h) if is_polygon => vec![MenuEntry {
                        label: "Remove vertex",
                        action: MenuAction::RemovePolygonVertex {
                            shape: handle.owner,
                            x: h.position.x,
                            y: h.position.y,
                        },
                    }],
                    _ => Vec::new(),
                }
            }
            Target::Shape(id) => {
                let point = self.viewport.screen_to_surface(screen);
                let Some(shape) = self.surface.shape(id) else {
                    return Vec::new();
                };
                let Some(poly) = shape.as_polygon() else {
                    return Vec::new();
                };
                match mutator::insertion_segment(&poly.points, point, poly.style.stroke_width) {
                    Some(index) => vec![MenuEntry {
                        label: "Insert vertex",
                        action: MenuAction::InsertPolygonVertex {
                            shape: id,
                            index,
                            x: point.x,
                            y: point.y,
                        },
                    }],
                    None => {
                        log::debug!("No edge of {id} near {point:?}");
                        Vec::new()
                    }
                }
            }
            Target::Surface => Vec::new(),
        }
    }

    /// Apply a context-menu action. Returns false if it no longer applies.
    pub fn handle_menu_action(&mut self, action: MenuAction) -> bool {
        if self.draft.is_some() {
            self.finish_polygon();
        }
        let id = match action {
            MenuAction::RemovePolygonVertex { shape, .. }
            | MenuAction::InsertPolygonVertex { shape, .. } => shape,
        };
        let Some(before) = self.surface.shape(id).cloned() else {
            log::warn!("Menu action on missing shape {id}");
            return false;
        };
        let Some(poly) = self.surface.shape_mut(id).and_then(Shape::as_polygon_mut) else {
            return false;
        };

        match action {
            MenuAction::RemovePolygonVertex { x, y, .. } => {
                let target = Point::new(x, y);
                match poly.points.iter().position(|p| *p == target) {
                    Some(index) => {
                        poly.points.remove(index);
                    }
                    None if poly.points.is_empty() => {}
                    None => return false,
                }
            }
            MenuAction::InsertPolygonVertex { index, x, y, .. } => {
                let at = (index + 1).min(poly.points.len());
                poly.points.insert(at, Point::new(x, y));
            }
        }

        if poly.points.is_empty() {
            log::debug!("Polygon {id} lost its last vertex, deleting");
            self.surface.remove_shape(id);
            self.handles.detach(id);
            self.history
                .record(HistoryNode::new(HistoryKind::Delete, vec![before], Vec::new()));
        } else {
            let after = Shape::Polygon(poly.clone());
            self.handles.refresh(&after);
            self.surface.shape_updated(id);
            self.history
                .record(HistoryNode::new(HistoryKind::Modify, vec![before], vec![after]));
        }
        self.publish();
        true
    }

    /// Wheel zoom around the pointer; negative `delta_y` zooms in.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        let factor = if delta_y < 0.0 {
            self.config.zoom_step
        } else {
            1.0 / self.config.zoom_step
        };
        self.zoom_at(screen, factor);
    }

    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        if self.viewport.zoom_at(screen, factor) {
            self.surface.view_changed(self.viewport.view_box);
        }
    }

    pub fn pan_by(&mut self, screen_delta: Vec2) {
        self.viewport.pan(screen_delta);
        self.surface.view_changed(self.viewport.view_box);
    }

    /// The client area was resized. Sizes without area (no layout yet) and
    /// unchanged sizes are ignored.
    pub fn resize_client(&mut self, client: Size) {
        if client.width <= 0.0 || client.height <= 0.0 || client == self.viewport.client {
            log::debug!("Ignoring client size {client:?}");
            return;
        }
        self.viewport.resize(client);
        self.surface.view_changed(self.viewport.view_box);
    }

    /// Fit the view around the given bounds.
    pub fn fit_view(&mut self, bounds: Rect, padding: f64) {
        self.viewport.fit_to_bounds(bounds, padding);
        self.surface.view_changed(self.viewport.view_box);
    }

    fn prepare_replay(&mut self) {
        if self.draft.is_some() {
            self.finish_polygon();
        }
        self.session = Session::default();
        self.handles.clear();
    }

    fn publish(&mut self) {
        if self.handles.take_dirty() {
            self.surface.handles_changed(self.handles.handles());
        }
    }

    /// Drop handles whose owner vanished from the surface.
    fn drop_dangling(&mut self, owner: ShapeId) {
        log::warn!("Handle owner {owner} is gone; clearing handles");
        self.handles.clear();
        self.session.active = None;
    }

    fn click(&mut self, target: Target) {
        match target {
            Target::Surface => self.handles.clear(),
            Target::Shape(id) => {
                self.handles.clear();
                match self.surface.shape(id) {
                    Some(shape) => {
                        self.handles.attach(shape);
                    }
                    None => log::warn!("Clicked shape {id} is not on the surface"),
                }
            }
            Target::Handle(_) => {}
        }
    }

    fn commit(&mut self, session: Session) {
        match (session.mode, session.active) {
            (Mode::Select, Some(Target::Handle(handle))) => {
                log::debug!("Marquee released, removing {}", handle.owner);
                self.surface.remove_shape(handle.owner);
                self.handles.clear();
            }
            (mode, _) => {
                let Some(kind) = mode.history_kind() else {
                    return;
                };
                let after = mutator::take_snapshot(&self.handles, &self.surface);
                if kind == HistoryKind::Modify && after.is_empty() {
                    log::warn!("Edited shapes vanished before release; nothing recorded");
                    return;
                }
                let before = session.before.unwrap_or_default();
                self.history.record(HistoryNode::new(kind, before, after));
            }
        }
    }

    fn drag_handle(&mut self, handle: HandleRef, point: Point) {
        if !self.surface.contains(handle.owner) || self.handles.get(handle).is_none() {
            self.drop_dangling(handle.owner);
            return;
        }
        if self.session.mode == Mode::Empty {
            self.session.before = Some(mutator::take_snapshot(&self.handles, &self.surface));
            self.session.mode = Mode::Modify;
        }
        let Some(shape) = self.surface.shape_mut(handle.owner) else {
            return;
        };
        let next = mutator::resize_by_handle(shape, &mut self.handles, handle, point);
        self.session.active = Some(Target::Handle(next));
        self.surface.shape_updated(handle.owner);
    }

    fn start_drawing(&mut self, point: Point) {
        let origin = self.session.origin;
        let (option, mode) = match self.tool {
            Some(ToolKind::Line) => (DrawOption::Line { start: origin, end: point }, Mode::Create),
            Some(ToolKind::Rect) => (
                DrawOption::Rect {
                    rect: span(origin, point),
                    marquee: false,
                },
                Mode::Create,
            ),
            Some(ToolKind::Select) => (
                DrawOption::Rect {
                    rect: span(origin, point),
                    marquee: true,
                },
                Mode::Select,
            ),
            Some(ToolKind::Polygon) | None => return,
        };

        self.handles.clear();
        let (shape, default) = mutator::build_shape(option, &self.config);
        let active = self
            .handles
            .attach_with_default(&shape, default.unwrap_or_default());
        log::debug!("Drawing {:?} {}", shape.kind(), shape.id());
        self.surface.insert_shape(shape);
        self.session.active = Some(Target::Handle(active));
        self.session.mode = mode;
    }

    fn move_shape(&mut self, id: ShapeId, point: Point) {
        let Some(shape) = self.surface.shape(id) else {
            self.drop_dangling(id);
            return;
        };
        if !self.handles.is_editing(id) {
            self.handles.clear();
            self.handles.attach(shape);
        }
        if shape.kind() == ShapeKind::Polygon {
            return;
        }
        if self.session.mode != Mode::Modify {
            self.session.before = Some(mutator::take_snapshot(&self.handles, &self.surface));
            self.session.mode = Mode::Modify;
        }

        let delta = point - self.session.origin;
        self.session.origin = point;
        if let Some(shape) = self.surface.shape_mut(id) {
            mutator::translate(shape, delta);
            self.handles.refresh(shape);
            self.surface.shape_updated(id);
        }
    }

    fn polygon_click(&mut self, point: Point) {
        let Some(draft) = self.draft else {
            self.handles.clear();
            let (shape, _) = mutator::build_shape(
                DrawOption::Polygon {
                    points: vec![point],
                },
                &self.config,
            );
            self.handles.attach(&shape);
            self.draft = Some(PolygonDraft {
                shape: shape.id(),
                live: false,
            });
            self.surface.insert_shape(shape);
            return;
        };

        let Some(poly) = self
            .surface
            .shape_mut(draft.shape)
            .and_then(Shape::as_polygon_mut)
        else {
            self.draft = None;
            self.drop_dangling(draft.shape);
            return;
        };

        let committed = poly.points.len().saturating_sub(usize::from(draft.live));
        let closes = poly.points[..committed]
            .last()
            .into_iter()
            .chain(poly.points.first())
            .any(|p| *p == point);
        if closes {
            self.finish_polygon();
            return;
        }

        if draft.live {
            if let Some(last) = poly.points.last_mut() {
                *last = point;
            }
        } else {
            poly.points.push(point);
        }
        let shape = Shape::Polygon(poly.clone());
        self.handles.refresh(&shape);
        self.surface.shape_updated(draft.shape);
        self.draft = Some(PolygonDraft {
            live: false,
            ..draft
        });
    }

    fn track_polygon_vertex(&mut self, point: Point) {
        let Some(draft) = self.draft else {
            return;
        };
        let Some(poly) = self
            .surface
            .shape_mut(draft.shape)
            .and_then(Shape::as_polygon_mut)
        else {
            self.draft = None;
            self.drop_dangling(draft.shape);
            return;
        };

        if draft.live && !poly.points.is_empty() {
            let last = poly.points.len() - 1;
            poly.points[last] = point;
        } else {
            poly.points.push(point);
        }
        let shape = Shape::Polygon(poly.clone());
        self.handles.refresh(&shape);
        self.surface.shape_updated(draft.shape);
        self.draft = Some(PolygonDraft { live: true, ..draft });
    }

    /// Close the polygon in progress: drop the live vertex, record its
    /// creation and switch to the select tool. Its handles stay attached.
    fn finish_polygon(&mut self) {
        let Some(draft) = self.draft.take() else {
            return;
        };
        let Some(poly) = self
            .surface
            .shape_mut(draft.shape)
            .and_then(Shape::as_polygon_mut)
        else {
            self.drop_dangling(draft.shape);
            return;
        };

        if draft.live {
            poly.points.pop();
        }
        if poly.points.is_empty() {
            self.surface.remove_shape(draft.shape);
            self.handles.detach(draft.shape);
        } else {
            let shape = Shape::Polygon(poly.clone());
            log::debug!("Polygon {} closed with {} points", draft.shape, poly.points.len());
            self.handles.refresh(&shape);
            self.surface.shape_updated(draft.shape);
            self.history
                .record(HistoryNode::new(HistoryKind::Create, Vec::new(), vec![shape]));
        }
        self.tool = Some(ToolKind::Select);
        self.publish();
    }
}
