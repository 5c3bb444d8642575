use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::markdown::MarkdownConverter;
use crate::taxonomy::{TaxonomyGraph, load_taxonomy};

mod doc_panel;
mod geometry;
mod interaction;
mod layout;
mod links;
mod physics;
mod view;

use doc_panel::{ClickTarget, DocPanel};

pub struct TaxographApp {
    document_path: PathBuf,
    components_path: Option<PathBuf>,
    markdown: Arc<dyn MarkdownConverter>,
    state: AppState,
    reload_rx: Option<Receiver<Result<TaxonomyGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<TaxonomyGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: TaxonomyGraph,
    diagram: Diagram,
    markdown: Arc<dyn MarkdownConverter>,
    layout_done: bool,
    pan: Vec2,
    zoom: f32,
    live_physics: bool,
    physics_repulsion: f32,
    physics_spring: f32,
    physics_damping: f32,
    panel: DocPanel,
    /// World-space y positions of the level band boundaries, refreshed with
    /// each layout pass.
    band_guides: Vec<f32>,
    /// What this frame's primary click landed on, if anything notable;
    /// resolved into a panel transition after all panels have drawn.
    frame_click: Option<FrameClick>,
}

enum FrameClick {
    Node(usize),
    Anchor,
}

/// Renderable form of the graph. `nodes` is index-aligned with
/// `TaxonomyGraph::nodes`, so a link's endpoints index both collections.
struct Diagram {
    nodes: Vec<DiagramNode>,
    links: Vec<Link>,
    forces: Vec<Vec2>,
}

struct DiagramNode {
    world_pos: Vec2,
    velocity: Vec2,
    /// Position the hierarchical layout assigned; the simulation drifts away
    /// from it but is pulled gently back so the level bands stay readable.
    anchor: Vec2,
}

/// Resolved, renderable relation. Exists only when both endpoints resolved
/// to a node; `left`/`right` say which end carries an arrowhead.
struct Link {
    source: usize,
    target: usize,
    left: bool,
    right: bool,
    label: Option<String>,
}

#[derive(Clone, Copy)]
struct PhysicsConfig {
    repulsion: f32,
    spring: f32,
    damping: f32,
    delta_seconds: f32,
}

impl TaxographApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        document_path: PathBuf,
        components_path: Option<PathBuf>,
        markdown: Arc<dyn MarkdownConverter>,
    ) -> Self {
        // Node icons are arbitrary raster or SVG references.
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let rx = Self::spawn_load(document_path.clone(), components_path.clone());
        Self {
            document_path,
            components_path,
            markdown,
            state: AppState::Loading { rx },
            reload_rx: None,
        }
    }

    fn spawn_load(
        document_path: PathBuf,
        components_path: Option<PathBuf>,
    ) -> Receiver<Result<TaxonomyGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_taxonomy(&document_path, components_path.as_deref())
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn ready_state(&self, graph: TaxonomyGraph) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(graph, Arc::clone(&self.markdown))))
    }
}

impl eframe::App for TaxographApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => self.ready_state(graph),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading taxonomy document...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load taxonomy document");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(AppState::Loading {
                            rx: Self::spawn_load(
                                self.document_path.clone(),
                                self.components_path.clone(),
                            ),
                        });
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.document_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(
                        self.document_path.clone(),
                        self.components_path.clone(),
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(graph) => self.ready_state(graph),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(graph: TaxonomyGraph, markdown: Arc<dyn MarkdownConverter>) -> Self {
        let diagram = Diagram::resolve(&graph);
        Self {
            graph,
            diagram,
            markdown,
            layout_done: false,
            pan: Vec2::ZERO,
            zoom: 1.0,
            live_physics: true,
            physics_repulsion: 1.0,
            physics_spring: 1.0,
            physics_damping: 0.9,
            panel: DocPanel::default(),
            band_guides: Vec::new(),
            frame_click: None,
        }
    }

    fn show(
        &mut self,
        ctx: &Context,
        document_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("taxograph");
                    ui.separator();
                    ui.label(format!("document: {}", document_path.display()));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    // Resolved links can be fewer than declared relations
                    // when endpoints are missing from the document.
                    ui.label(format!(
                        "links: {} of {} relations",
                        self.diagram.links.len(),
                        self.graph.relation_count()
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload document"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(230.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.panel.is_open() {
            egui::SidePanel::right("documentation")
                .resizable(true)
                .default_width(360.0)
                .show(ctx, |ui| self.draw_doc_panel(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading taxonomy document...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });

        self.route_clicks(ctx);
    }

    /// Resolves the frame's click into a documentation panel transition.
    /// Classification happens after every panel has drawn, so the click that
    /// opened the panel can never double as the click that closes it.
    fn route_clicks(&mut self, ctx: &Context) {
        match self.frame_click.take() {
            Some(FrameClick::Node(index)) => {
                if let Some(node) = self.graph.nodes.get(index) {
                    self.panel
                        .handle_click(ClickTarget::Node(node), &*self.markdown);
                }
            }
            Some(FrameClick::Anchor) => {
                self.panel.handle_click(ClickTarget::Anchor, &*self.markdown);
            }
            None => {
                if self.panel.is_open() && ctx.input(|input| input.pointer.primary_clicked()) {
                    self.panel
                        .handle_click(ClickTarget::Elsewhere, &*self.markdown);
                }
            }
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("View");
        ui.add_space(6.0);

        if ui.button("Reset layout").clicked() {
            self.layout_done = false;
            self.pan = Vec2::ZERO;
            self.zoom = 1.0;
        }

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Refinement");
        ui.add_space(6.0);

        ui.checkbox(&mut self.live_physics, "Live refinement");
        ui.add(egui::Slider::new(&mut self.physics_repulsion, 0.2..=2.5).text("repulsion"));
        ui.add(egui::Slider::new(&mut self.physics_spring, 0.2..=2.5).text("attraction"));
        ui.add(egui::Slider::new(&mut self.physics_damping, 0.7..=0.98).text("damping"));

        ui.add_space(8.0);
        ui.separator();
        ui.small("Click a node to open its documentation.");
        ui.small("Scroll to zoom, drag with the right or middle button to pan.");
    }
}
