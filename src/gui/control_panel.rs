//! Control Panel Widget
//! Left sidebar with data source, page navigation and catalog filters.

use crate::data::{Aggregator, Catalog, DateRange, NullDatePolicy, PriceRange};
use chrono::Datelike;
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

/// Dashboard pages, in sidebar order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Overview,
    PriceAnalysis,
    GenreAnalysis,
    TimeTrends,
    GameDetails,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::PriceAnalysis,
        Page::GenreAnalysis,
        Page::TimeTrends,
        Page::GameDetails,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Overview => "📊 Overview",
            Page::PriceAnalysis => "💰 Price Analysis",
            Page::GenreAnalysis => "🎯 Genre Analysis",
            Page::TimeTrends => "📈 Time Trends",
            Page::GameDetails => "🔍 Game Details",
        }
    }
}

/// Sidebar filter state. Bounds are `None` while they span the whole catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub genres: Vec<String>,
    pub years: Option<(i32, i32)>,
    pub prices: Option<PriceRange>,
}

impl Filters {
    /// Genre, then release year, then price.
    pub fn apply(&self, catalog: &Catalog, null_dates: NullDatePolicy) -> Catalog {
        let mut filtered = Aggregator::filter_by_genres(catalog, &self.genres);
        if let Some(range) = self.years.and_then(|(first, last)| DateRange::years(first, last)) {
            filtered = Aggregator::filter_by_date_range(&filtered, range, null_dates);
        }
        if let Some(range) = self.prices {
            filtered = Aggregator::filter_by_price_range(&filtered, range);
        }
        filtered
    }
}

/// Left side control panel with data source, navigation and filter controls.
pub struct ControlPanel {
    pub title: String,
    pub data_path: Option<PathBuf>,
    pub using_sample: bool,
    pub page: Page,
    pub genres: Vec<String>,
    pub selected_genres: Vec<bool>,
    pub year_bounds: Option<(i32, i32)>,
    pub year_range: (i32, i32),
    pub price_bounds: Option<(f64, f64)>,
    pub price_range: (f64, f64),
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            title: "Steam Stats Dashboard".to_string(),
            data_path: None,
            using_sample: false,
            page: Page::default(),
            genres: Vec::new(),
            selected_genres: Vec::new(),
            year_bounds: None,
            year_range: (0, 0),
            price_bounds: None,
            price_range: (0.0, 0.0),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Reset filter options to span a freshly loaded catalog.
    pub fn update_options(&mut self, catalog: &Catalog) {
        self.genres = Aggregator::all_genres(catalog);
        self.selected_genres = vec![false; self.genres.len()];

        self.year_bounds = DateRange::of(catalog).map(|r| (r.start.year(), r.end.year()));
        self.year_range = self.year_bounds.unwrap_or((0, 0));

        self.price_bounds = PriceRange::of(catalog).map(|r| (r.min, r.max));
        self.price_range = self.price_bounds.unwrap_or((0.0, 0.0));

        self.export_enabled = !catalog.is_empty();
    }

    pub fn selected_genres(&self) -> Vec<String> {
        self.genres
            .iter()
            .zip(self.selected_genres.iter())
            .filter(|(_, &selected)| selected)
            .map(|(genre, _)| genre.clone())
            .collect()
    }

    /// Current filters. A year or price range left at its bounds is not applied.
    pub fn filters(&self) -> Filters {
        let years = self
            .year_bounds
            .filter(|bounds| *bounds != self.year_range)
            .map(|_| self.year_range);
        let prices = self
            .price_bounds
            .filter(|bounds| *bounds != self.price_range)
            .map(|_| PriceRange::new(self.price_range.0, self.price_range.1));

        Filters {
            genres: self.selected_genres(),
            years,
            prices,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new(&self.title)
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Explore Steam game statistics and insights")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = if self.using_sample {
                        "Sample data".to_string()
                    } else {
                        self.data_path
                            .as_ref()
                            .and_then(|p| p.file_name())
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| "No file selected".to_string())
                    };
                    let color = if self.using_sample {
                        Color32::from_rgb(243, 156, 18)
                    } else {
                        ui.visuals().text_color()
                    };
                    ui.label(RichText::new(&path_text).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::OpenCsv;
                        }
                        if ui.button("🔄").on_hover_text("Reload from disk").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Navigation Section =====
        ui.label(RichText::new("🧭 Navigation").size(14.0).strong());
        ui.add_space(5.0);
        for page in Page::ALL {
            ui.selectable_value(&mut self.page, page, page.title());
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(5.0);

        ui.label("Genres:");
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
                    for (genre, selected) in self.genres.iter().zip(self.selected_genres.iter_mut()) {
                        if ui.checkbox(selected, genre).changed() {
                            action = ControlPanelAction::FiltersChanged;
                        }
                    }
                });
            });
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.selected_genres.iter_mut().for_each(|v| *v = true);
                action = ControlPanelAction::FiltersChanged;
            }
            if ui.small_button("Clear All").clicked() {
                self.selected_genres.iter_mut().for_each(|v| *v = false);
                action = ControlPanelAction::FiltersChanged;
            }
        });

        ui.add_space(8.0);
        if let Some((lo, hi)) = self.year_bounds {
            ui.label("Release year:");
            let from = ui.add(egui::Slider::new(&mut self.year_range.0, lo..=hi).text("from"));
            let to = ui.add(egui::Slider::new(&mut self.year_range.1, lo..=hi).text("to"));
            if from.changed() || to.changed() {
                if self.year_range.0 > self.year_range.1 {
                    self.year_range = (self.year_range.1, self.year_range.0);
                }
                action = ControlPanelAction::FiltersChanged;
            }
        }

        ui.add_space(8.0);
        if let Some((lo, hi)) = self.price_bounds {
            ui.label("Price ($):");
            let min = ui.add(egui::Slider::new(&mut self.price_range.0, lo..=hi).text("min"));
            let max = ui.add(egui::Slider::new(&mut self.price_range.1, lo..=hi).text("max"));
            if min.changed() || max.changed() {
                if self.price_range.0 > self.price_range.1 {
                    self.price_range = (self.price_range.1, self.price_range.0);
                }
                action = ControlPanelAction::FiltersChanged;
            }
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Status Section =====
        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.using_sample || self.status.contains("not found") {
            Color32::from_rgb(243, 156, 18)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenCsv,
    Reload,
    FiltersChanged,
    ExportCharts,
}
