//! Steam Stats Main Application
//! Main window with sidebar controls and the dashboard pages.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{sample_catalog, Catalog, Cleaner, DataLoader, LoadOutcome, LoadStatus};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use tracing::{error, warn};

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { path: PathBuf, outcome: LoadOutcome },
}

/// Messages received since the last frame.
struct Drained {
    results: Vec<LoadResult>,
    /// The loader thread is gone.
    disconnected: bool,
}

fn drain_load_results(rx: &Receiver<LoadResult>) -> Drained {
    let mut results = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(result) => results.push(result),
            Err(TryRecvError::Empty) => {
                return Drained {
                    results,
                    disconnected: false,
                }
            }
            Err(TryRecvError::Disconnected) => {
                return Drained {
                    results,
                    disconnected: true,
                }
            }
        }
    }
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
    /// Cleaned catalog before sidebar filters.
    catalog: Catalog,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    sidebar_open: bool,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig, data_path: PathBuf) -> Self {
        cc.egui_ctx.set_visuals(if config.plot.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let mut app = Self {
            control_panel: ControlPanel::new(&config.window_title()),
            sidebar_open: config.dashboard.sidebar_expanded,
            config,
            loader: DataLoader::new(),
            catalog: Catalog::empty(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_load(data_path);
        app
    }

    /// Load a dataset, from the memo when this path was loaded before.
    fn start_load(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }
        self.control_panel.data_path = Some(path.clone());

        if self.loader.is_cached(&path) {
            let outcome = self.loader.load(&path);
            self.apply_outcome(path, outcome);
            return;
        }

        self.chart_viewer.clear();
        self.control_panel.set_progress(10.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        // Load CSV in background thread
        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));
            let outcome = DataLoader::read(&path);
            let _ = tx.send(LoadResult::Complete { path, outcome });
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let drained = drain_load_results(&rx);
        let mut complete = false;

        for result in drained.results {
            match result {
                LoadResult::Progress(status) => {
                    self.control_panel.set_progress(30.0, &status);
                }
                LoadResult::Complete { path, outcome } => {
                    if outcome.status.is_loaded() {
                        self.loader.insert(&path, outcome.catalog.clone());
                    }
                    self.apply_outcome(path, outcome);
                    self.is_loading = false;
                    complete = true;
                }
            }
        }

        if complete {
            return;
        }
        if drained.disconnected {
            error!("CSV loader stopped before sending a result");
            self.is_loading = false;
            self.control_panel
                .set_progress(0.0, "Error: loading stopped before finishing");
            return;
        }
        self.load_rx = Some(rx);
    }

    /// Clean the loaded catalog, or fall back to sample data when the file is missing.
    fn apply_outcome(&mut self, path: PathBuf, outcome: LoadOutcome) {
        let (catalog, using_sample, status) = match &outcome.status {
            LoadStatus::Loaded { .. } => {
                let cleaned = Cleaner::clean(&outcome.catalog);
                let status = format!(
                    "{} ({} games after cleaning)",
                    outcome.status.message(),
                    cleaned.len()
                );
                (cleaned, false, status)
            }
            LoadStatus::NotFound(_) => {
                let settings = &self.config.dashboard;
                match sample_catalog(settings.sample_size, settings.sample_seed) {
                    Ok(sample) => {
                        warn!("Dataset {} not found, showing sample data", path.display());
                        (
                            sample,
                            true,
                            "Dataset not found. Using sample data for demonstration.".to_string(),
                        )
                    }
                    Err(e) => {
                        error!("Could not build sample data: {}", e);
                        (Catalog::empty(), false, format!("Error: {}", e))
                    }
                }
            }
            LoadStatus::ParseError(message) => {
                (Catalog::empty(), false, format!("Error: {}", message))
            }
        };

        self.control_panel.using_sample = using_sample;
        self.control_panel.update_options(&catalog);
        self.catalog = catalog;
        self.refresh_view();
        self.control_panel.set_progress(100.0, &status);
    }

    /// Re-run the filters and rebuild the pages.
    fn refresh_view(&mut self) {
        let filtered = self
            .control_panel
            .filters()
            .apply(&self.catalog, self.config.filters.null_release_dates);
        self.chart_viewer.set_catalog(
            filtered,
            &self.config.plot,
            self.config.dashboard.preview_rows,
        );
    }

    fn handle_open_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    fn handle_reload(&mut self) {
        if let Some(path) = self.control_panel.data_path.clone() {
            self.loader.clear_cache();
            self.start_load(path);
        }
    }

    fn handle_export_charts(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        self.control_panel.set_progress(50.0, "Rendering charts...");
        match StaticChartRenderer::export_dashboard(&self.chart_viewer.catalog, &dir, &self.config.plot) {
            Ok(written) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!("Exported {} charts to {}", written.len(), dir.display()),
                );
            }
            Err(e) => {
                error!("Chart export failed: {}", e);
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("☰").on_hover_text("Toggle sidebar").clicked() {
                    self.sidebar_open = !self.sidebar_open;
                }
                ui.label(egui::RichText::new(self.config.window_title()).strong());
            });
        });

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show_animated(ctx, self.sidebar_open, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::OpenCsv => self.handle_open_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::FiltersChanged => self.refresh_view(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard pages
        let page = self.control_panel.page;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, page);
        });
    }
}
