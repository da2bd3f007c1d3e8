//! Editor controller - wires the live graph, the host page and the renderer.
//!
//! The editor owns the graph backend, keeps the current [`Snapshot`] in step
//! with it, and turns user [`Action`]s into graph edits, mounted panels and
//! banners. Deferred work (label normalization after the template loads,
//! view revalidation after a zoom) is queued with a due time and run by
//! [`Editor::tick`] or [`Editor::settle`].

mod action;
mod banner;
mod host;
mod template;
mod view;

pub use action::{parse_script, Action};
pub use banner::{Banner, MessageKind, BANNER_TTL};
pub use host::{HostPage, MemoryHost, MountRole};
pub use template::{insert_template, ElementTemplate};
pub use view::{View, ZOOM_FACTOR};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::graph::{
    child_vertices, graph_bounds, CellId, CellKind, GraphChange, GraphEditor, GraphError,
    SubscriptionId,
};
use crate::reference::{ReferenceImage, ReferencePanel};
use crate::snapshot::build_snapshot;
use crate::style::normalize_label_style;
use crate::svg::{render_comparison, RenderOptions};
use crate::types::{Geometry, Snapshot, StyleTag, Variant};
use log::{error, info, warn};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Delay between loading the template and normalizing it
pub const TEMPLATE_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Delay between a zoom step and revalidating the view
pub const ZOOM_REVALIDATE_DELAY: Duration = Duration::from_millis(10);

const COMPARISON_LOADED: &str =
    "Comparison loaded successfully! Review your diagram against the expert reference.";
const DOWNLOAD_PENDING: &str = "Download functionality coming soon";

/// Source of the current time for banners and deferred tasks
pub type Clock = Box<dyn Fn() -> Instant>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    NormalizeAndFit,
    Revalidate,
}

#[derive(Debug, Clone, Copy)]
struct Deferred {
    due: Instant,
    task: Task,
}

pub struct Editor<G: GraphEditor, H: HostPage> {
    graph: Option<G>,
    host: H,
    render_options: RenderOptions,
    reference: Option<ReferenceImage>,
    view: View,
    snapshot: Snapshot,
    stale: Rc<Cell<bool>>,
    subscription: Option<SubscriptionId>,
    deferred: Vec<Deferred>,
    banner: Option<Banner>,
    clock: Clock,
}

impl<G: GraphEditor, H: HostPage> Editor<G, H> {
    /// Start the editor on a graph backend.
    ///
    /// A missing or unsupported backend is the only fatal error. A page
    /// without a graph container gets an editor with no graph; comparison
    /// and banners keep working.
    pub fn initialize(backend: Option<G>, host: H, config: &AppConfig) -> Result<Self> {
        Self::initialize_with_clock(backend, host, config, Instant::now)
    }

    /// Like [`Editor::initialize`], reading the time from `clock` instead of
    /// the system clock
    pub fn initialize_with_clock(
        backend: Option<G>,
        host: H,
        config: &AppConfig,
        clock: impl Fn() -> Instant + 'static,
    ) -> Result<Self> {
        let Some(graph) = backend else {
            error!("Graph backend is not loaded");
            return Err(Error::MissingDependency(
                "graph backend is not loaded".to_string(),
            ));
        };
        if !graph.is_supported() {
            error!("Graph backend reports an unsupported environment");
            return Err(Error::MissingDependency(
                "graph backend does not support this environment".to_string(),
            ));
        }

        let graph = if host.has_mount(MountRole::GraphContainer) {
            Some(graph)
        } else {
            warn!(
                role = MountRole::GraphContainer.as_str();
                "Mount point not found, editing disabled"
            );
            None
        };

        let mut editor = Self {
            graph,
            host,
            render_options: config.canvas,
            reference: config.reference.clone(),
            view: View::default(),
            snapshot: Snapshot::empty(),
            stale: Rc::new(Cell::new(false)),
            subscription: None,
            deferred: Vec::new(),
            banner: None,
            clock: Box::new(clock),
        };

        if let Some(graph) = editor.graph.as_mut() {
            let stale = Rc::clone(&editor.stale);
            let id = graph.subscribe(Box::new(move |_change: &GraphChange| stale.set(true)));
            editor.subscription = Some(id);
            editor.load_template();
        }

        info!(has_graph = editor.graph.is_some(); "Editor initialized");
        Ok(editor)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn graph(&self) -> Option<&G> {
        self.graph.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Current snapshot, rebuilt first if the graph changed since the last build
    pub fn snapshot(&mut self) -> &Snapshot {
        if self.stale.get() {
            self.refresh_snapshot();
        }
        &self.snapshot
    }

    /// The banner, if one was shown less than [`BANNER_TTL`] before `now`
    pub fn banner(&self, now: Instant) -> Option<&Banner> {
        self.banner.as_ref().filter(|b| b.is_visible(now))
    }

    /// Number of deferred tasks not yet run
    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Run one action. Failures are also reported on the banner.
    pub fn perform(&mut self, action: Action) -> Result<()> {
        info!(action = format!("{:?}", action); "Performing action");
        let result = match action {
            Action::AddNode(tag) => self.add_node(tag).map(|_| ()),
            Action::DeleteSelected => {
                self.delete_selected();
                Ok(())
            }
            Action::ResetTemplate => {
                self.reset_template();
                Ok(())
            }
            Action::ClearDiagram => {
                self.clear_diagram();
                Ok(())
            }
            Action::ZoomIn => {
                self.zoom_in();
                Ok(())
            }
            Action::ZoomOut => {
                self.zoom_out();
                Ok(())
            }
            Action::FitWindow => {
                self.fit_window();
                Ok(())
            }
            Action::ShowComparison => {
                self.show_comparison();
                Ok(())
            }
            Action::DownloadLearner | Action::DownloadReference => {
                self.show_message(MessageKind::Info, DOWNLOAD_PENDING);
                Ok(())
            }
            Action::Select(ids) => self.select(&ids),
            Action::Connect {
                source,
                target,
                label,
            } => self
                .connect(&source, &target, label.as_deref().unwrap_or(""))
                .map(|_| ()),
            Action::SetLabel { id, label } => self.set_label(&id, &label),
            Action::Move { id, x, y } => self.move_node(&id, x, y),
        };

        if let Err(err) = &result {
            warn!(error = err.to_string(); "Action failed");
            self.show_message(MessageKind::Error, err.to_string());
        }
        result
    }

    /// Add a palette element centered in the visible area and select it.
    ///
    /// Returns the new cell id, `None` when there is no graph.
    pub fn add_node(&mut self, tag: StyleTag) -> Result<Option<CellId>> {
        let Some(container) = self.host.container_size(MountRole::GraphContainer) else {
            warn!("No graph container, cannot add node");
            return Ok(None);
        };
        let (cx, cy) = self.view.visible_center(container);
        let Some(graph) = self.graph.as_mut() else {
            warn!("No graph, cannot add node");
            return Ok(None);
        };

        let element = ElementTemplate::for_tag(tag);
        let geometry = Geometry::new(
            cx - element.width / 2.0,
            cy - element.height / 2.0,
            element.width,
            element.height,
        );

        graph.begin_update();
        let result = graph.insert_vertex(
            None,
            element.label,
            geometry,
            &normalize_label_style(&tag.style_name()),
        );
        if let Ok(id) = &result {
            graph.set_selection(std::slice::from_ref(id));
        }
        graph.end_update();

        let id = result?;
        info!(cell = id.as_str(), tag = tag.as_str(); "Added node");
        self.refresh_snapshot();
        Ok(Some(id))
    }

    /// Remove the selected cells. Returns the ids removed.
    pub fn delete_selected(&mut self) -> Vec<CellId> {
        let Some(graph) = self.graph.as_mut() else {
            warn!("No graph, nothing to delete");
            return Vec::new();
        };
        let selection = graph.selection();
        if selection.is_empty() {
            return Vec::new();
        }

        let removed = graph.remove_cells(&selection);
        info!(count = removed.len(); "Deleted selected cells");
        self.refresh_snapshot();
        removed
    }

    pub fn reset_template(&mut self) {
        self.load_template();
    }

    /// Remove every vertex; connected edges go with them
    pub fn clear_diagram(&mut self) {
        let Some(graph) = self.graph.as_mut() else {
            warn!("No graph, nothing to clear");
            return;
        };
        let vertices = child_vertices(&*graph);
        let removed = graph.remove_cells(&vertices);
        info!(count = removed.len(); "Cleared diagram");
        self.refresh_snapshot();
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
        self.schedule(ZOOM_REVALIDATE_DELAY, Task::Revalidate);
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
        self.schedule(ZOOM_REVALIDATE_DELAY, Task::Revalidate);
    }

    /// Fit the graph content into the container. An empty graph leaves the view unchanged.
    pub fn fit_window(&mut self) {
        let Some(container) = self.host.container_size(MountRole::GraphContainer) else {
            return;
        };
        let Some(bounds) = self.graph.as_ref().and_then(|g| graph_bounds(g)) else {
            return;
        };
        self.view.fit(&bounds, container);
        self.view.validate(Some(bounds));
    }

    /// Render the learner panel and the reference panel side by side
    pub fn show_comparison(&mut self) {
        self.refresh_snapshot();

        let svg = render_comparison(&self.snapshot, Variant::Learner, &self.render_options);
        self.mount_or_warn(MountRole::LearnerDiagram, svg);

        let panel = match &self.reference {
            Some(reference) => reference.load(),
            None => ReferencePanel::Unavailable {
                reason: "no reference image configured".to_string(),
            },
        };
        self.mount_or_warn(MountRole::ReferenceDiagram, panel.to_html());

        info!(
            nodes = self.snapshot.nodes().len(),
            edges = self.snapshot.edges().len(),
            reference_loaded = panel.is_loaded();
            "Comparison shown"
        );
        self.show_message(MessageKind::Success, COMPARISON_LOADED);
    }

    pub fn select(&mut self, ids: &[String]) -> Result<()> {
        let Some(graph) = self.graph.as_mut() else {
            warn!("No graph, nothing to select");
            return Ok(());
        };
        if let Some(unknown) = ids.iter().find(|id| graph.kind(id).is_none()) {
            return Err(crate::graph::GraphError::UnknownCell(unknown.clone()).into());
        }
        graph.set_selection(ids);
        Ok(())
    }

    /// Connect two vertices. Returns the new edge id, `None` when there is no graph.
    pub fn connect(&mut self, source: &str, target: &str, label: &str) -> Result<Option<CellId>> {
        let Some(graph) = self.graph.as_mut() else {
            warn!("No graph, cannot connect");
            return Ok(None);
        };
        let id = graph.insert_edge(None, label, source, target)?;
        info!(cell = id.as_str(), source = source, target = target; "Connected");
        self.refresh_snapshot();
        Ok(Some(id))
    }

    pub fn set_label(&mut self, id: &str, label: &str) -> Result<()> {
        let Some(graph) = self.graph.as_mut() else {
            warn!("No graph, cannot set label");
            return Ok(());
        };
        graph.set_label(id, label)?;
        self.refresh_snapshot();
        Ok(())
    }

    /// Move a vertex's top-left corner, keeping its size
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        let Some(graph) = self.graph.as_mut() else {
            warn!("No graph, cannot move");
            return Ok(());
        };
        let current = match (graph.kind(id), graph.geometry(id)) {
            (None, _) => return Err(GraphError::UnknownCell(id.to_string()).into()),
            (Some(CellKind::Vertex), Some(geometry)) => geometry,
            _ => return Err(GraphError::NotAVertex(id.to_string()).into()),
        };
        graph.set_geometry(id, Geometry::new(x, y, current.width, current.height))?;
        self.refresh_snapshot();
        Ok(())
    }

    pub fn show_message(&mut self, kind: MessageKind, text: impl Into<String>) {
        let banner = Banner::new(kind, text, (self.clock)());
        if self.host.has_mount(MountRole::Messages) {
            self.mount_or_warn(MountRole::Messages, banner.to_html());
        }
        self.banner = Some(banner);
    }

    // ========================================================================
    // Deferred work
    // ========================================================================

    /// Run every deferred task due at `now` and drop an expired banner.
    /// Returns the number of tasks run.
    pub fn tick(&mut self, now: Instant) -> usize {
        let (due, pending): (Vec<Deferred>, Vec<Deferred>) =
            self.deferred.drain(..).partition(|d| d.due <= now);
        self.deferred = pending;

        let mut due = due;
        due.sort_by_key(|d| d.due);
        let count = due.len();
        for deferred in due {
            self.run_task(deferred.task);
        }

        if self.banner.as_ref().is_some_and(|b| !b.is_visible(now)) {
            self.banner = None;
            if self.host.has_mount(MountRole::Messages) {
                self.mount_or_warn(MountRole::Messages, String::new());
            }
        }

        count
    }

    /// Run every deferred task regardless of due time
    pub fn settle(&mut self) -> usize {
        let mut ran = 0;
        while let Some(latest) = self.deferred.iter().map(|d| d.due).max() {
            ran += self.tick(latest);
        }
        ran
    }

    fn schedule(&mut self, delay: Duration, task: Task) {
        self.deferred.push(Deferred {
            due: (self.clock)() + delay,
            task,
        });
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::NormalizeAndFit => {
                self.normalize_labels();
                self.fit_window();
            }
            Task::Revalidate => {
                let bounds = self.graph.as_ref().and_then(|g| graph_bounds(g));
                self.view.validate(bounds);
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn load_template(&mut self) {
        let Some(graph) = self.graph.as_mut() else {
            warn!("No graph, cannot load template");
            return;
        };

        graph.begin_update();
        let vertices = child_vertices(&*graph);
        graph.remove_cells(&vertices);
        let result = insert_template(&mut *graph);
        graph.end_update();

        match result {
            Ok(()) => info!("Loaded template"),
            Err(err) => error!(error = err.to_string(); "Failed to load template"),
        }
        self.schedule(TEMPLATE_SETTLE_DELAY, Task::NormalizeAndFit);
        self.refresh_snapshot();
    }

    fn normalize_labels(&mut self) {
        let Some(graph) = self.graph.as_mut() else {
            return;
        };
        graph.begin_update();
        for id in child_vertices(&*graph) {
            let style = graph.style(&id).unwrap_or_default();
            if let Err(err) = graph.set_style(&id, &normalize_label_style(&style)) {
                warn!(
                    cell = id.as_str(),
                    error = err.to_string();
                    "Could not normalize label style"
                );
            }
        }
        graph.end_update();
        self.refresh_snapshot();
    }

    fn refresh_snapshot(&mut self) {
        self.snapshot = build_snapshot(self.graph.as_ref());
        self.stale.set(false);
    }

    fn mount_or_warn(&mut self, role: MountRole, content: String) {
        if let Err(err) = self.host.mount(role, content) {
            warn!(role = role.as_str(), error = err.to_string(); "Mount point not found");
        }
    }
}

impl<G: GraphEditor, H: HostPage> Drop for Editor<G, H> {
    fn drop(&mut self) {
        if let (Some(graph), Some(id)) = (self.graph.as_mut(), self.subscription.take()) {
            graph.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DiagramGraph, MemoryGraph};

    fn editor() -> Editor<MemoryGraph, MemoryHost> {
        Editor::initialize(
            Some(MemoryGraph::new()),
            MemoryHost::full(800.0, 600.0),
            &AppConfig::default(),
        )
        .unwrap()
    }

    /// Editor on a hand-driven clock, with the clock's handle
    fn editor_at(start: Instant) -> (Editor<MemoryGraph, MemoryHost>, Rc<Cell<Instant>>) {
        let time = Rc::new(Cell::new(start));
        let handle = Rc::clone(&time);
        let editor = Editor::initialize_with_clock(
            Some(MemoryGraph::new()),
            MemoryHost::full(800.0, 600.0),
            &AppConfig::default(),
            move || time.get(),
        )
        .unwrap();
        (editor, handle)
    }

    #[test]
    fn test_missing_backend() {
        let result = Editor::<MemoryGraph, _>::initialize(
            None,
            MemoryHost::full(800.0, 600.0),
            &AppConfig::default(),
        );
        assert!(matches!(result, Err(Error::MissingDependency(_))));
    }

    #[test]
    fn test_unsupported_backend() {
        let result = Editor::initialize(
            Some(MemoryGraph::unsupported()),
            MemoryHost::full(800.0, 600.0),
            &AppConfig::default(),
        );
        assert!(matches!(result, Err(Error::MissingDependency(_))));
    }

    #[test]
    fn test_initialize_loads_template() {
        let mut editor = editor();
        let snapshot = editor.snapshot();
        assert_eq!(snapshot.nodes().len(), 4);
        assert_eq!(snapshot.edges().len(), 3);
        assert_eq!(editor.pending_tasks(), 1);
    }

    #[test]
    fn test_settle_normalizes_and_fits() {
        let mut editor = editor();
        assert_eq!(editor.settle(), 1);

        let style = editor.graph().unwrap().style("n1").unwrap();
        assert!(style.starts_with("presentation-node;"));
        assert!(style.contains("whiteSpace=wrap"));
        assert!(editor.view().screen_bounds().is_some());
        assert_ne!(editor.view().scale, 1.0);
    }

    #[test]
    fn test_tick_respects_due_time() {
        let start = Instant::now();
        let (mut editor, _clock) = editor_at(start);
        assert_eq!(editor.tick(start), 0);
        assert_eq!(editor.tick(start + Duration::from_millis(149)), 0);
        assert_eq!(editor.pending_tasks(), 1);
        assert_eq!(editor.tick(start + TEMPLATE_SETTLE_DELAY), 1);
        assert_eq!(editor.pending_tasks(), 0);
    }

    #[test]
    fn test_schedule_reads_injected_clock() {
        let start = Instant::now();
        let (mut editor, clock) = editor_at(start);
        editor.settle();

        clock.set(start + Duration::from_secs(60));
        editor.perform(Action::ZoomIn).unwrap();
        assert_eq!(editor.tick(start + Duration::from_secs(60)), 0);
        assert_eq!(editor.tick(start + Duration::from_secs(60) + ZOOM_REVALIDATE_DELAY), 1);
    }

    #[test]
    fn test_add_node_centered_and_selected() {
        let mut editor = editor();
        let id = editor.add_node(StyleTag::Decision).unwrap().unwrap();

        let graph = editor.graph().unwrap();
        assert_eq!(graph.selection(), vec![id.clone()]);
        assert_eq!(
            graph.geometry(&id),
            Some(Geometry::new(310.0, 250.0, 180.0, 100.0))
        );
        assert_eq!(graph.label(&id).as_deref(), Some("Decision Point"));
        assert_eq!(editor.snapshot().nodes().len(), 5);
    }

    #[test]
    fn test_delete_selected_cascades_edges() {
        let mut editor = editor();
        editor.perform(Action::Select(vec!["n2".to_string()])).unwrap();
        let removed = editor.delete_selected();

        assert_eq!(removed.len(), 4);
        let snapshot = editor.snapshot();
        assert_eq!(snapshot.nodes().len(), 3);
        assert!(snapshot.edges().is_empty());
    }

    #[test]
    fn test_clear_then_reset() {
        let mut editor = editor();
        editor.clear_diagram();
        assert!(editor.snapshot().is_empty());
        assert!(editor.snapshot().edges().is_empty());

        editor.reset_template();
        assert_eq!(editor.snapshot().nodes().len(), 4);
    }

    #[test]
    fn test_snapshot_follows_direct_graph_edits() {
        let mut editor = editor();
        editor
            .graph
            .as_mut()
            .unwrap()
            .set_label("n1", "Puppy")
            .unwrap();
        assert_eq!(editor.snapshot().node("n1").unwrap().label, "Puppy");
    }

    #[test]
    fn test_zoom_schedules_revalidation() {
        let mut editor = editor();
        editor.settle();
        let scale = editor.view().scale;

        editor.perform(Action::ZoomIn).unwrap();
        assert!((editor.view().scale - scale * ZOOM_FACTOR).abs() < 1e-9);
        assert_eq!(editor.pending_tasks(), 1);
        editor.settle();
        assert_eq!(editor.pending_tasks(), 0);
    }

    #[test]
    fn test_show_comparison_mounts_panels() {
        let mut editor = editor();
        editor.perform(Action::ShowComparison).unwrap();

        let host = editor.host();
        assert!(host
            .content(MountRole::LearnerDiagram)
            .unwrap()
            .starts_with("<svg"));
        assert!(host
            .content(MountRole::ReferenceDiagram)
            .unwrap()
            .contains(crate::reference::FALLBACK_TEXT));
        assert!(host
            .content(MountRole::Messages)
            .unwrap()
            .contains("Success!"));
        assert_eq!(
            editor.banner(Instant::now()).map(|b| b.kind),
            Some(MessageKind::Success)
        );
    }

    #[test]
    fn test_banner_expires_on_tick() {
        let start = Instant::now();
        let (mut editor, clock) = editor_at(start);
        clock.set(start + Duration::from_secs(2));
        editor.perform(Action::DownloadLearner).unwrap();

        let shown = start + Duration::from_secs(2);
        let last_visible = shown + BANNER_TTL - Duration::from_millis(1);
        assert_eq!(editor.banner(last_visible).unwrap().text, DOWNLOAD_PENDING);
        editor.tick(last_visible);
        assert!(editor.host().content(MountRole::Messages).unwrap().contains(DOWNLOAD_PENDING));

        let later = shown + BANNER_TTL;
        assert!(editor.banner(later).is_none());
        editor.tick(later);
        assert_eq!(editor.host().content(MountRole::Messages), Some(""));
    }

    #[test]
    fn test_failed_action_shows_error_banner() {
        let mut editor = editor();
        let result = editor.perform(Action::Connect {
            source: "n1".to_string(),
            target: "n1".to_string(),
            label: None,
        });
        assert!(matches!(result, Err(Error::Graph(_))));
        assert_eq!(
            editor.banner(Instant::now()).map(|b| b.kind),
            Some(MessageKind::Error)
        );
    }

    #[test]
    fn test_without_graph_container() {
        let host = MemoryHost::full(800.0, 600.0).without_mount(MountRole::GraphContainer);
        let mut editor =
            Editor::initialize(Some(MemoryGraph::new()), host, &AppConfig::default()).unwrap();

        assert!(editor.graph().is_none());
        assert_eq!(editor.add_node(StyleTag::Outcome).unwrap(), None);
        editor.show_comparison();
        assert!(editor
            .host()
            .content(MountRole::LearnerDiagram)
            .unwrap()
            .contains(crate::svg::EMPTY_CAPTION));
    }

    #[test]
    fn test_move_and_label() {
        let mut editor = editor();
        editor
            .perform(Action::Move {
                id: "n3".to_string(),
                x: 10.0,
                y: 400.0,
            })
            .unwrap();
        editor
            .perform(Action::SetLabel {
                id: "n3".to_string(),
                label: "Acute".to_string(),
            })
            .unwrap();

        let node = editor.snapshot().node("n3").unwrap().clone();
        assert_eq!(node.geometry, Geometry::new(10.0, 400.0, 180.0, 60.0));
        assert_eq!(node.label, "Acute");
    }

    #[test]
    fn test_move_rejects_unknown_and_edge_ids() {
        let mut editor = editor();
        let unknown = editor.move_node("missing", 0.0, 0.0).unwrap_err();
        assert!(matches!(
            unknown,
            Error::Graph(GraphError::UnknownCell(ref id)) if id == "missing"
        ));

        let edge = editor.move_node("e1", 0.0, 0.0).unwrap_err();
        assert!(matches!(
            edge,
            Error::Graph(GraphError::NotAVertex(ref id)) if id == "e1"
        ));
    }
}
