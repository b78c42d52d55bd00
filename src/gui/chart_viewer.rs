//! Chart Viewer Widget
//! Central panel rendering the selected dashboard page for the filtered catalog.

use crate::charts::{ChartPlotter, ACCENT_COLOR, PALETTE};
use crate::config::PlotSettings;
use crate::data::{
    columns, AggregateSummary, Aggregator, Catalog, GameRecord, Measure, PriceRange, ScatterAxis,
    ScatterPoint,
};
use crate::gui::Page;
use crate::stats::{ColumnSummary, HistogramBin, StatsCalculator};
use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeMap;

const CARD_SPACING: f32 = 15.0;
const SEARCH_RESULT_LIMIT: usize = 200;

/// Everything a page draws, derived once per filter change.
#[derive(Debug, Clone)]
pub struct PageData {
    pub games: usize,
    pub average_price: Option<f64>,
    pub average_reviews: Option<f64>,
    pub free_games: usize,
    pub unique_genres: usize,
    pub describe: Vec<ColumnSummary>,
    pub preview: Vec<GameRecord>,
    pub price_bins: Vec<HistogramBin>,
    pub prices_by_genre: BTreeMap<String, Vec<f64>>,
    pub genre_reviews: AggregateSummary,
    pub genre_counts: AggregateSummary,
    pub developers: AggregateSummary,
    pub releases: Vec<[f64; 2]>,
    pub mean_prices: Vec<[f64; 2]>,
}

impl PageData {
    pub fn build(catalog: &Catalog, plot: &PlotSettings, preview_rows: usize) -> Self {
        let prices: Vec<f64> = catalog.prices().into_iter().flatten().collect();
        let genre_counts =
            Aggregator::genre_summary(catalog, Measure::GameCount, Some(plot.top_genres));

        Self {
            games: catalog.len(),
            average_price: Aggregator::column_mean(catalog, columns::PRICE),
            average_reviews: Aggregator::column_mean(catalog, columns::TOTAL_REVIEWS),
            free_games: prices.iter().filter(|&&p| p == 0.0).count(),
            unique_genres: Aggregator::all_genres(catalog).len(),
            describe: StatsCalculator::describe(catalog),
            preview: catalog.head(preview_rows).records(),
            price_bins: StatsCalculator::histogram(&prices, plot.histogram_bins),
            prices_by_genre: Aggregator::prices_by_genre(catalog, &genre_counts.keys()),
            genre_reviews: Aggregator::genre_summary(
                catalog,
                Measure::ReviewSum,
                Some(plot.top_genres),
            ),
            genre_counts,
            developers: Aggregator::developer_summary(catalog, Some(plot.top_developers)),
            releases: Aggregator::releases_per_year(catalog)
                .into_iter()
                .map(|(year, n)| [year as f64, n as f64])
                .collect(),
            mean_prices: Aggregator::mean_price_per_year(catalog)
                .into_iter()
                .map(|(year, price)| [year as f64, price])
                .collect(),
        }
    }
}

/// Axes of the Game Details scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterAxes {
    pub x: ScatterAxis,
    pub y: ScatterAxis,
}

impl Default for ScatterAxes {
    fn default() -> Self {
        Self {
            x: ScatterAxis::Price,
            y: ScatterAxis::TotalReviews,
        }
    }
}

/// Scrollable page area. Holds the filtered catalog and page-local inputs.
#[derive(Default)]
pub struct ChartViewer {
    pub catalog: Catalog,
    pub data: Option<PageData>,
    pub platform_genre: String,
    pub platform_summary: Option<AggregateSummary>,
    pub price_window: (f64, f64),
    pub search_query: String,
    pub search_results: Vec<GameRecord>,
    pub scatter_axes: ScatterAxes,
    pub scatter_points: Vec<ScatterPoint>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Replace the filtered catalog and rebuild every page from it.
    pub fn set_catalog(&mut self, catalog: Catalog, plot: &PlotSettings, preview_rows: usize) {
        let data = PageData::build(&catalog, plot, preview_rows);

        if !data.genre_reviews.keys().contains(&self.platform_genre) {
            self.platform_genre = data.genre_reviews.keys().into_iter().next().unwrap_or_default();
        }
        self.price_window = PriceRange::of(&catalog)
            .map(|r| (r.min, r.max))
            .unwrap_or((0.0, 0.0));

        self.catalog = catalog;
        self.data = Some(data);
        self.refresh_platforms();
        self.refresh_search();
        self.refresh_scatter();
    }

    fn refresh_platforms(&mut self) {
        self.platform_summary = (!self.platform_genre.is_empty())
            .then(|| Aggregator::platform_summary(&self.catalog, &self.platform_genre));
    }

    fn refresh_search(&mut self) {
        self.search_results = if self.search_query.trim().is_empty() {
            Vec::new()
        } else {
            Aggregator::search_by_name(&self.catalog, self.search_query.trim())
                .head(SEARCH_RESULT_LIMIT)
                .records()
        };
    }

    fn refresh_scatter(&mut self) {
        let series = self
            .data
            .as_ref()
            .map(|d| d.genre_counts.keys())
            .unwrap_or_default();
        self.scatter_points = Aggregator::scatter_points(
            &self.catalog,
            self.scatter_axes.x,
            self.scatter_axes.y,
            &series,
        );
    }

    /// Games inside the price page's window.
    pub fn games_in_price_window(&self) -> usize {
        let (min, max) = self.price_window;
        Aggregator::filter_by_price_range(&self.catalog, PriceRange::new(min, max)).len()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, page: Page) {
        if self.data.is_none() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ui.heading(page.title());
        ui.add_space(8.0);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match page {
                Page::Overview => self.show_overview(ui),
                Page::PriceAnalysis => self.show_price_analysis(ui),
                Page::GenreAnalysis => self.show_genre_analysis(ui),
                Page::TimeTrends => self.show_time_trends(ui),
                Page::GameDetails => self.show_game_details(ui),
            });
    }

    fn card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(15.0).strong());
                ui.add_space(6.0);
                add_contents(ui);
            });
        ui.add_space(CARD_SPACING);
    }

    fn metric(ui: &mut egui::Ui, label: &str, value: String) {
        ui.vertical(|ui| {
            ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
            ui.label(RichText::new(value).size(22.0).strong().color(ACCENT_COLOR));
        });
        ui.add_space(40.0);
    }

    fn show_overview(&mut self, ui: &mut egui::Ui) {
        let Some(data) = &self.data else { return };

        ui.horizontal(|ui| {
            Self::metric(ui, "Total Games", data.games.to_string());
            Self::metric(
                ui,
                "Average Price",
                data.average_price
                    .map(|p| format!("${:.2}", p))
                    .unwrap_or_else(|| "-".to_string()),
            );
            Self::metric(
                ui,
                "Average Reviews",
                data.average_reviews
                    .map(|r| format!("{:.0}", r))
                    .unwrap_or_else(|| "-".to_string()),
            );
            Self::metric(ui, "Free Games", data.free_games.to_string());
            Self::metric(ui, "Unique Genres", data.unique_genres.to_string());
        });
        ui.add_space(CARD_SPACING);

        Self::card(ui, "Dataset Preview", |ui| Self::records_table(ui, "preview", &data.preview));
        Self::card(ui, "Basic Statistics", |ui| {
            ChartPlotter::draw_describe_table(ui, &data.describe)
        });
    }

    fn show_price_analysis(&mut self, ui: &mut egui::Ui) {
        let Some(data) = &self.data else { return };

        ui.columns(2, |cols| {
            Self::card(&mut cols[0], "Game Price Distribution", |ui| {
                ChartPlotter::draw_histogram(ui, "price_histogram", &data.price_bins, "Price ($)");
            });
            Self::card(&mut cols[1], "Price by Genre", |ui| {
                ChartPlotter::draw_box_plots(ui, "price_by_genre", &data.prices_by_genre);
            });
        });

        let bounds = PriceRange::of(&self.catalog);
        let mut window = self.price_window;
        Self::card(ui, "Filter by Price Range", |ui| {
            if let Some(bounds) = bounds {
                ui.add(egui::Slider::new(&mut window.0, bounds.min..=bounds.max).text("min"));
                ui.add(egui::Slider::new(&mut window.1, bounds.min..=bounds.max).text("max"));
            }
        });
        if window.0 > window.1 {
            window = (window.1, window.0);
        }
        self.price_window = window;
        ui.label(format!(
            "Games in price range ${:.2} - ${:.2}: {}",
            window.0,
            window.1,
            self.games_in_price_window()
        ));
    }

    fn show_genre_analysis(&mut self, ui: &mut egui::Ui) {
        let Some(data) = &self.data else { return };

        ui.columns(2, |cols| {
            Self::card(&mut cols[0], "Top Genres by Total Reviews", |ui| {
                ChartPlotter::draw_summary_bars(ui, "genre_reviews", &data.genre_reviews, 300.0);
            });
            Self::card(&mut cols[1], "Number of Games by Genre", |ui| {
                ChartPlotter::draw_summary_bars(ui, "genre_counts", &data.genre_counts, 300.0);
            });
        });

        Self::card(ui, "Game Distribution by Genre", |ui| {
            ChartPlotter::draw_share_table(ui, "genre_share", &data.genre_counts);
        });

        let genres = data.genre_reviews.keys();
        let mut selected = self.platform_genre.clone();
        Self::card(ui, "Platforms by Genre", |ui| {
            egui::ComboBox::from_id_salt("platform_genre")
                .width(180.0)
                .selected_text(&selected)
                .show_ui(ui, |ui| {
                    for genre in &genres {
                        ui.selectable_value(&mut selected, genre.clone(), genre);
                    }
                });
        });
        if selected != self.platform_genre {
            self.platform_genre = selected;
            self.refresh_platforms();
        }
        if let Some(summary) = &self.platform_summary {
            if summary.is_empty() {
                ui.label("No games in this genre");
            } else {
                ChartPlotter::draw_summary_bars(ui, "platforms", summary, 220.0);
            }
        }
    }

    fn show_time_trends(&mut self, ui: &mut egui::Ui) {
        let Some(data) = &self.data else { return };

        Self::card(ui, "Games Released by Year", |ui| {
            ChartPlotter::draw_line(ui, "releases", &data.releases, "Year", "Games", PALETTE[2]);
        });
        Self::card(ui, "Average Price by Year", |ui| {
            ChartPlotter::draw_line(
                ui,
                "mean_price",
                &data.mean_prices,
                "Year",
                "Average Price ($)",
                PALETTE[3],
            );
        });
    }

    fn show_game_details(&mut self, ui: &mut egui::Ui) {
        let response = ui
            .horizontal(|ui| {
                ui.label("Search for a game:");
                ui.text_edit_singleline(&mut self.search_query)
            })
            .inner;
        if response.changed() {
            self.refresh_search();
        }

        if self.search_query.trim().is_empty() {
            ui.label("Enter a game name to search");
        } else {
            let title = format!("{} matching games", self.search_results.len());
            let results = &self.search_results;
            Self::card(ui, &title, |ui| Self::records_table(ui, "search", results));
        }

        self.show_interactive_scatter(ui);

        if let Some(data) = &self.data {
            Self::card(ui, "Top Developers by Total Reviews", |ui| {
                ChartPlotter::draw_ranked_bars(ui, "developers", &data.developers, 420.0);
            });
        }
    }

    fn axis_selector(ui: &mut egui::Ui, id: &str, label: &str, axis: &mut ScatterAxis) {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .width(150.0)
            .selected_text(axis.label())
            .show_ui(ui, |ui| {
                for option in ScatterAxis::ALL {
                    ui.selectable_value(axis, option, option.label());
                }
            });
    }

    fn show_interactive_scatter(&mut self, ui: &mut egui::Ui) {
        let mut axes = self.scatter_axes;
        let series = self
            .data
            .as_ref()
            .map(|d| d.genre_counts.keys())
            .unwrap_or_default();
        let points = &self.scatter_points;

        Self::card(ui, "Interactive Analysis", |ui| {
            ui.horizontal(|ui| {
                Self::axis_selector(ui, "scatter_x", "X-axis:", &mut axes.x);
                ui.add_space(20.0);
                Self::axis_selector(ui, "scatter_y", "Y-axis:", &mut axes.y);
            });
            ui.add_space(6.0);

            if axes != self.scatter_axes {
                return;
            }
            if axes.x == axes.y {
                ui.label("Choose two different attributes to compare");
            } else if points.is_empty() {
                ui.label("No games have both values");
            } else {
                ChartPlotter::draw_scatter(
                    ui,
                    "interactive_scatter",
                    points,
                    &series,
                    axes.x.label(),
                    axes.y.label(),
                );
            }
        });

        if axes != self.scatter_axes {
            self.scatter_axes = axes;
            self.refresh_scatter();
        }
    }

    fn records_table(ui: &mut egui::Ui, id: &str, records: &[GameRecord]) {
        ScrollArea::horizontal().id_salt(id).show(ui, |ui| {
            egui::Grid::new(ui.make_persistent_id(id))
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for header in ["Name", "Price", "Genres", "Release", "Reviews", "Platforms", "Developers"] {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for r in records {
                        ui.label(r.name.as_deref().unwrap_or("-"));
                        ui.label(r.price.map(|p| format!("${:.2}", p)).unwrap_or_else(|| "-".into()));
                        ui.label(r.genres.join(", "));
                        ui.label(
                            r.release_date
                                .map(|d| d.format("%Y-%m-%d").to_string())
                                .unwrap_or_else(|| "-".into()),
                        );
                        ui.label(r.total_reviews.to_string());
                        let platforms: Vec<&str> = [("Windows", r.windows), ("Mac", r.mac), ("Linux", r.linux)]
                            .iter()
                            .filter(|(_, on)| *on)
                            .map(|(label, _)| *label)
                            .collect();
                        ui.label(platforms.join(" / "));
                        ui.label(r.developers.as_deref().unwrap_or("-"));
                        ui.end_row();
                    }
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn catalog() -> Catalog {
        let game = |name: &str, genres: &[&str], price: f64, reviews: u64, year: i32| GameRecord {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            price: Some(price),
            total_reviews: reviews,
            windows: true,
            release_date: NaiveDate::from_ymd_opt(year, 3, 1),
            developers: Some("Valve".to_string()),
            ..GameRecord::named(name)
        };
        Catalog::from_records(&[
            game("Portal", &["Puzzle"], 9.99, 100, 2007),
            game("Warframe", &["Action", "RPG"], 0.0, 300, 2013),
            game("Dota", &["Strategy"], 0.0, 500, 2013),
        ])
        .unwrap()
    }

    #[test]
    fn page_data_summarizes_catalog() {
        let data = PageData::build(&catalog(), &PlotSettings::default(), 2);
        assert_eq!(data.games, 3);
        assert_eq!(data.free_games, 2);
        assert_eq!(data.unique_genres, 4);
        assert_eq!(data.preview.len(), 2);
        assert_eq!(data.genre_reviews.keys()[0], "Strategy");
        assert_eq!(data.developers.value_of("Valve"), Some(900));
        assert_eq!(data.releases, vec![[2007.0, 1.0], [2013.0, 2.0]]);
        assert!((data.average_price.unwrap() - 3.33).abs() < 0.01);
    }

    #[test]
    fn viewer_tracks_platform_genre_and_search() {
        let mut viewer = ChartViewer::new();
        viewer.set_catalog(catalog(), &PlotSettings::default(), 5);
        assert_eq!(viewer.platform_genre, "Strategy");
        let platforms = viewer.platform_summary.clone().unwrap();
        assert_eq!(platforms.value_of("Windows"), Some(500));

        viewer.search_query = "WAR".to_string();
        viewer.refresh_search();
        assert_eq!(viewer.search_results.len(), 1);
        assert_eq!(viewer.search_results[0].name.as_deref(), Some("Warframe"));

        assert_eq!(viewer.price_window, (0.0, 9.99));
        assert_eq!(viewer.games_in_price_window(), 3);
        viewer.price_window = (1.0, 20.0);
        assert_eq!(viewer.games_in_price_window(), 1);
        let sidebar = Aggregator::filter_by_price_range(&viewer.catalog, PriceRange::new(1.0, 20.0));
        assert_eq!(viewer.games_in_price_window(), sidebar.len());
    }

    #[test]
    fn empty_catalog_builds_empty_pages() {
        let mut viewer = ChartViewer::new();
        viewer.set_catalog(Catalog::empty(), &PlotSettings::default(), 5);
        let data = viewer.data.as_ref().unwrap();
        assert_eq!(data.games, 0);
        assert!(data.price_bins.is_empty());
        assert!(data.genre_reviews.is_empty());
        assert!(viewer.platform_genre.is_empty());
        assert!(viewer.platform_summary.is_none());
        assert!(viewer.scatter_points.is_empty());
    }

    #[test]
    fn scatter_follows_selected_axes() {
        let mut viewer = ChartViewer::new();
        viewer.set_catalog(catalog(), &PlotSettings::default(), 5);
        assert_eq!(viewer.scatter_points.len(), 3);
        let dota = viewer
            .scatter_points
            .iter()
            .find(|p| p.name == "Dota")
            .unwrap();
        assert_eq!((dota.x, dota.y), (0.0, 500.0));
        assert_eq!(dota.genre, "Strategy");

        viewer.scatter_axes = ScatterAxes {
            x: ScatterAxis::ReleaseYear,
            y: ScatterAxis::ReleaseYear,
        };
        viewer.refresh_scatter();
        assert!(viewer.scatter_points.is_empty());
    }
}
