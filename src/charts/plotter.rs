//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::data::{AggregateSummary, ScatterPoint, OTHER_GENRE};
use crate::stats::{ColumnSummary, HistogramBin, StatsCalculator};
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
};
use std::collections::BTreeMap;

pub const ACCENT_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Five-number summary drawn by a box plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
}

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color_for(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Label for an integer tick, empty between ticks or past the end.
    pub fn tick_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if idx < 0.0 || (value - idx).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Quartiles and 1.5 IQR whiskers of a set of values.
    pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = StatsCalculator::percentile(&sorted, 25.0);
        let median = StatsCalculator::percentile(&sorted, 50.0);
        let q3 = StatsCalculator::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        Some(BoxStats {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
        })
    }

    /// Vertical bars, one per summary row, in ranked order.
    pub fn draw_summary_bars(ui: &mut egui::Ui, id: &str, summary: &AggregateSummary, height: f32) {
        let labels = summary.keys();
        let bars: Vec<Bar> = summary
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, row.value as f64)
                    .name(&row.key)
                    .width(0.7)
                    .fill(Self::color_for(i))
            })
            .collect();

        Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .y_axis_label(summary.measure.label())
            .x_axis_formatter(move |mark, _range| Self::tick_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(summary.measure.label()));
            });
    }

    /// Horizontal bars, largest on top. Used where keys are long (developers).
    pub fn draw_ranked_bars(ui: &mut egui::Ui, id: &str, summary: &AggregateSummary, height: f32) {
        let n = summary.len();
        let labels: Vec<String> = summary.keys().into_iter().rev().collect();
        let bars: Vec<Bar> = summary
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new((n - 1 - i) as f64, row.value as f64)
                    .name(&row.key)
                    .width(0.7)
                    .fill(ACCENT_COLOR)
            })
            .collect();

        Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .x_axis_label(summary.measure.label())
            .y_axis_formatter(move |mark, _range| Self::tick_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
    }

    pub fn draw_histogram(ui: &mut egui::Ui, id: &str, bins: &[HistogramBin], x_label: &str) {
        let bars: Vec<Bar> = bins
            .iter()
            .map(|bin| {
                Bar::new(bin.center(), bin.count as f64)
                    .width(bin.width().max(f64::EPSILON))
                    .fill(ACCENT_COLOR.gamma_multiply(0.7))
            })
            .collect();

        Plot::new(id)
            .height(300.0)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("Frequency")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Games"));
            });
    }

    /// Box plot per group, outliers drawn as points, means joined by a line.
    pub fn draw_box_plots(ui: &mut egui::Ui, id: &str, values_by_group: &BTreeMap<String, Vec<f64>>) {
        let labels: Vec<String> = values_by_group.keys().cloned().collect();

        Plot::new(id)
            .height(300.0)
            .allow_scroll(false)
            .y_axis_label("Price ($)")
            .x_axis_formatter(move |mark, _range| Self::tick_label(&labels, mark.value))
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let mut means: Vec<[f64; 2]> = Vec::new();

                for (i, (group, values)) in values_by_group.iter().enumerate() {
                    let Some(stats) = Self::box_stats(values) else {
                        continue;
                    };
                    let color = Self::color_for(i);
                    let x = i as f64;

                    let box_elem = BoxElem::new(
                        x,
                        BoxSpread::new(
                            stats.whisker_low,
                            stats.q1,
                            stats.median,
                            stats.q3,
                            stats.whisker_high,
                        ),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));
                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(group));

                    let outliers: PlotPoints = values
                        .iter()
                        .filter(|&&v| v < stats.whisker_low || v > stats.whisker_high)
                        .map(|&v| [x, v])
                        .collect();
                    plot_ui.points(Points::new(outliers).radius(2.0).color(color.gamma_multiply(0.7)));

                    means.push([x, values.iter().sum::<f64>() / values.len() as f64]);
                }

                if means.len() > 1 {
                    plot_ui.line(
                        Line::new(PlotPoints::from(means))
                            .color(Color32::GRAY)
                            .width(1.5)
                            .name("Mean"),
                    );
                }
            });
    }

    /// Line with markers, e.g. a yearly series.
    pub fn draw_line(
        ui: &mut egui::Ui,
        id: &str,
        points: &[[f64; 2]],
        x_label: &str,
        y_label: &str,
        color: Color32,
    ) {
        Plot::new(id)
            .height(260.0)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(points.to_vec()))
                        .color(color)
                        .width(2.0)
                        .name(y_label),
                );
                plot_ui.points(Points::new(PlotPoints::from(points.to_vec())).radius(3.0).color(color));
            });
    }

    /// Points grouped into one series per genre, in `series` order with
    /// the remaining games last.
    pub fn scatter_series<'a>(
        points: &'a [ScatterPoint],
        series: &[String],
    ) -> Vec<(String, Vec<&'a ScatterPoint>)> {
        series
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(OTHER_GENRE))
            .map(|genre| {
                let members: Vec<&ScatterPoint> =
                    points.iter().filter(|p| p.genre == genre).collect();
                (genre.to_string(), members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }

    /// Game closest to a plot position, measured relative to the data span.
    pub fn nearest_point<'a>(points: &'a [ScatterPoint], at: &PlotPoint) -> Option<&'a ScatterPoint> {
        let span = |values: Vec<f64>| {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max > min { max - min } else { 1.0 }
        };
        let x_span = span(points.iter().map(|p| p.x).collect());
        let y_span = span(points.iter().map(|p| p.y).collect());
        let distance = |p: &ScatterPoint| ((p.x - at.x) / x_span).powi(2) + ((p.y - at.y) / y_span).powi(2);

        points.iter().min_by(|a, b| {
            distance(a)
                .partial_cmp(&distance(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Scatter of games colored by genre; hovering names the nearest game.
    pub fn draw_scatter(
        ui: &mut egui::Ui,
        id: &str,
        points: &[ScatterPoint],
        series: &[String],
        x_label: &str,
        y_label: &str,
    ) {
        let grouped = Self::scatter_series(points, series);
        let x_name = x_label.to_string();
        let y_name = y_label.to_string();

        Plot::new(id)
            .height(360.0)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .legend(Legend::default())
            .label_formatter(move |_series, at| match Self::nearest_point(points, at) {
                Some(p) => format!(
                    "{}\n{}\n{}: {:.2}\n{}: {:.2}",
                    if p.name.is_empty() { "-" } else { p.name.as_str() },
                    p.genre,
                    x_name,
                    p.x,
                    y_name,
                    p.y
                ),
                None => String::new(),
            })
            .show(ui, |plot_ui| {
                for (i, (genre, members)) in grouped.iter().enumerate() {
                    let coords: PlotPoints = members.iter().map(|p| [p.x, p.y]).collect();
                    plot_ui.points(
                        Points::new(coords)
                            .radius(2.5)
                            .color(Self::color_for(i))
                            .name(genre),
                    );
                }
            });
    }

    /// Share of each summary row in the total, as a table of percentages.
    pub fn draw_share_table(ui: &mut egui::Ui, id: &str, summary: &AggregateSummary) {
        let total: u64 = summary.rows.iter().map(|r| r.value).sum();
        egui::Grid::new(ui.make_persistent_id(id))
            .striped(true)
            .num_columns(3)
            .show(ui, |ui| {
                ui.label(RichText::new("Name").strong());
                ui.label(RichText::new(summary.measure.label()).strong());
                ui.label(RichText::new("Share").strong());
                ui.end_row();
                for (i, row) in summary.rows.iter().enumerate() {
                    ui.label(RichText::new(&row.key).color(Self::color_for(i)));
                    ui.label(row.value.to_string());
                    let share = if total > 0 {
                        row.value as f64 * 100.0 / total as f64
                    } else {
                        0.0
                    };
                    ui.label(format!("{:.1}%", share));
                    ui.end_row();
                }
            });
    }

    /// Draw the `describe` table, one row per numeric column.
    pub fn draw_describe_table(ui: &mut egui::Ui, summaries: &[ColumnSummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id("describe_table"))
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for s in summaries {
                            ui.label(RichText::new(&s.column).size(11.0).color(ACCENT_COLOR));
                            ui.label(RichText::new(s.count.to_string()).size(11.0));
                            for value in [s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max] {
                                let text = if value.is_nan() {
                                    "-".to_string()
                                } else {
                                    format!("{:.2}", value)
                                };
                                ui.label(RichText::new(text).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_labels_only_on_integers() {
        let labels = vec!["RPG".to_string(), "Action".to_string()];
        assert_eq!(ChartPlotter::tick_label(&labels, 0.0), "RPG");
        assert_eq!(ChartPlotter::tick_label(&labels, 1.0), "Action");
        assert_eq!(ChartPlotter::tick_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::tick_label(&labels, 2.0), "");
        assert_eq!(ChartPlotter::tick_label(&labels, -1.0), "");
    }

    #[test]
    fn box_stats_clip_whiskers_at_outliers() {
        let stats = ChartPlotter::box_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 4.0);
    }

    #[test]
    fn box_stats_of_nothing() {
        assert!(ChartPlotter::box_stats(&[]).is_none());
        assert!(ChartPlotter::box_stats(&[f64::NAN]).is_none());
    }

    fn point(x: f64, y: f64, genre: &str, name: &str) -> ScatterPoint {
        ScatterPoint {
            x,
            y,
            genre: genre.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn scatter_series_follow_genre_order_with_other_last() {
        let points = vec![
            point(1.0, 1.0, OTHER_GENRE, "Tetris"),
            point(2.0, 2.0, "RPG", "Skyrim"),
            point(3.0, 3.0, "Action", "Doom"),
            point(4.0, 4.0, "RPG", "Fallout"),
        ];
        let series = vec!["RPG".to_string(), "Puzzle".to_string(), "Action".to_string()];

        let grouped = ChartPlotter::scatter_series(&points, &series);
        let shape: Vec<(&str, usize)> = grouped
            .iter()
            .map(|(genre, members)| (genre.as_str(), members.len()))
            .collect();
        assert_eq!(shape, vec![("RPG", 2), ("Action", 1), (OTHER_GENRE, 1)]);
    }

    #[test]
    fn nearest_point_scales_each_axis() {
        let points = vec![point(0.0, 0.0, "RPG", "Cheap"), point(60.0, 100_000.0, "RPG", "Hit")];
        let hover = |x: f64, y: f64| ChartPlotter::nearest_point(&points, &PlotPoint::new(x, y)).map(|p| p.name.clone());

        assert_eq!(hover(58.0, 40_000.0).as_deref(), Some("Hit"));
        assert_eq!(hover(5.0, 20_000.0).as_deref(), Some("Cheap"));
        assert!(ChartPlotter::nearest_point(&[], &PlotPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(ChartPlotter::color_for(0), ChartPlotter::color_for(PALETTE.len()));
    }
}
