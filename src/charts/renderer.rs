//! Static Chart Renderer
//! Writes dashboard charts to PNG files with plotters.
//!
//! Charts:
//! 1. Price distribution histogram
//! 2. Top genres by total reviews (vertical bars)
//! 3. Top developers by total reviews (vertical bars)
//! 4. Releases per year (line with markers)

use crate::config::PlotSettings;
use crate::data::{AggregateSummary, Aggregator, Catalog, Measure};
use crate::stats::{HistogramBin, StatsCalculator};
use plotters::prelude::*;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const BAR_COLOR: RGBColor = RGBColor(52, 152, 219);
const LINE_COLOR: RGBColor = RGBColor(231, 76, 60);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 30);
const MAX_LABEL_CHARS: usize = 14;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw for {0}")]
    Empty(String),
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
    #[error("Failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn drawing(err: impl Display) -> RenderError {
    RenderError::Drawing(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Shorten an axis label to fit under a bar.
    pub fn short_label(label: &str) -> String {
        if label.chars().count() <= MAX_LABEL_CHARS {
            label.to_string()
        } else {
            let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
            format!("{}…", head)
        }
    }

    pub fn render_histogram(
        path: &Path,
        bins: &[HistogramBin],
        title: &str,
        x_desc: &str,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            return Err(RenderError::Empty(title.to_string()));
        };
        let x_min = first.start;
        let x_max = if last.end > x_min { last.end } else { x_min + 1.0 };
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, CAPTION_FONT)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..(max_count * 1.1).max(1.0))
            .map_err(drawing)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc("Frequency")
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(bins.iter().map(|bin| {
                let end = if bin.end > bin.start { bin.end } else { x_max };
                Rectangle::new([(bin.start, 0.0), (end, bin.count as f64)], BAR_COLOR.filled())
            }))
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }

    pub fn render_bars(
        path: &Path,
        summary: &AggregateSummary,
        title: &str,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        if summary.is_empty() {
            return Err(RenderError::Empty(title.to_string()));
        }
        let n = summary.len() as u32;
        let max = summary.rows.iter().map(|r| r.value).max().unwrap_or(0);
        let labels: Vec<String> = summary.keys().iter().map(|k| Self::short_label(k)).collect();

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, CAPTION_FONT)
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u64..(max + max / 10 + 1))
            .map_err(drawing)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n as usize)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc(summary.measure.label())
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(8)
                    .data(summary.rows.iter().enumerate().map(|(i, r)| (i as u32, r.value))),
            )
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }

    /// Yearly series, points sorted by year.
    pub fn render_yearly_line(
        path: &Path,
        points: &[(i32, f64)],
        title: &str,
        y_desc: &str,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(RenderError::Empty(title.to_string()));
        };
        let x_min = first.0;
        let x_max = last.0.max(x_min + 1);
        let y_max = points.iter().map(|p| p.1).fold(0.0, f64::max);

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, CAPTION_FONT)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..(y_max * 1.1).max(1.0))
            .map_err(drawing)?;
        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc(y_desc)
            .x_label_formatter(&|year| year.to_string())
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(2)))
            .map_err(drawing)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, LINE_COLOR.filled())),
            )
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }

    /// Render the standard chart set for a catalog into `dir`.
    /// Charts with nothing to show are skipped; the written paths are returned.
    pub fn export_dashboard(
        catalog: &Catalog,
        dir: &Path,
        plot: &PlotSettings,
    ) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let size = (plot.export_width, plot.export_height);
        let mut written = Vec::new();

        let prices: Vec<f64> = catalog.prices().into_iter().flatten().collect();
        let bins = StatsCalculator::histogram(&prices, plot.histogram_bins);
        let path = dir.join("price_distribution.png");
        Self::keep(
            Self::render_histogram(&path, &bins, "Game Price Distribution", "Price ($)", size),
            path,
            &mut written,
        )?;

        let genres = Aggregator::genre_summary(catalog, Measure::ReviewSum, Some(plot.top_genres));
        let path = dir.join("top_genres.png");
        Self::keep(
            Self::render_bars(&path, &genres, "Top Genres by Total Reviews", size),
            path,
            &mut written,
        )?;

        let developers = Aggregator::developer_summary(catalog, Some(plot.top_developers));
        let path = dir.join("top_developers.png");
        Self::keep(
            Self::render_bars(&path, &developers, "Top Developers by Total Reviews", size),
            path,
            &mut written,
        )?;

        let releases: Vec<(i32, f64)> = Aggregator::releases_per_year(catalog)
            .into_iter()
            .map(|(year, count)| (year, count as f64))
            .collect();
        let path = dir.join("releases_per_year.png");
        Self::keep(
            Self::render_yearly_line(&path, &releases, "Games Released by Year", "Games", size),
            path,
            &mut written,
        )?;

        info!("Exported {} charts to {}", written.len(), dir.display());
        Ok(written)
    }

    fn keep(
        result: Result<(), RenderError>,
        path: PathBuf,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), RenderError> {
        match result {
            Ok(()) => {
                written.push(path);
                Ok(())
            }
            Err(RenderError::Empty(chart)) => {
                warn!("Skipping export of '{}': no data", chart);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(StaticChartRenderer::short_label("Valve"), "Valve");
        let short = StaticChartRenderer::short_label("Paradox Development Studio");
        assert_eq!(short.chars().count(), MAX_LABEL_CHARS);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn empty_inputs_are_rejected_before_drawing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");

        let err = StaticChartRenderer::render_histogram(&path, &[], "Prices", "Price", (400, 300))
            .unwrap_err();
        assert!(matches!(err, RenderError::Empty(_)));

        let err = StaticChartRenderer::render_bars(
            &path,
            &AggregateSummary::empty(Measure::ReviewSum),
            "Genres",
            (400, 300),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Empty(_)));

        let err = StaticChartRenderer::render_yearly_line(&path, &[], "Years", "Games", (400, 300))
            .unwrap_err();
        assert!(matches!(err, RenderError::Empty(_)));
        assert!(!path.exists());
    }

    #[test]
    fn exporting_an_empty_catalog_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("charts");
        let written =
            StaticChartRenderer::export_dashboard(&Catalog::empty(), &out, &PlotSettings::default())
                .unwrap();
        assert!(written.is_empty());
        assert!(out.is_dir());
    }
}
