//! Aggregator Module
//! Filters and grouped summaries feeding the dashboard charts.
//!
//! All functions are pure: they read a cleaned catalog and return a new
//! catalog or summary. Empty input gives empty output.

use super::catalog::{count_values, float_values, text_values, Catalog};
use super::catalog::columns::*;
use super::Cleaner;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

/// Default number of genres shown in genre charts.
pub const TOP_GENRES: usize = 10;
/// Default number of developers shown in the developer chart.
pub const TOP_DEVELOPERS: usize = 20;

/// Genre column of the exploded view.
pub const GENRE: &str = "genre";

/// What a summary value measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Sum of `num_reviews_total`
    ReviewSum,
    /// Number of games
    GameCount,
}

impl Measure {
    pub fn label(&self) -> &'static str {
        match self {
            Measure::ReviewSum => "Total Reviews",
            Measure::GameCount => "Number of Games",
        }
    }
}

/// One (key, value) row of a ranked summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub key: String,
    pub value: u64,
}

/// Ranked mapping from a grouping key to a measure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSummary {
    pub measure: Measure,
    pub rows: Vec<SummaryRow>,
}

impl AggregateSummary {
    pub fn empty(measure: Measure) -> Self {
        Self {
            measure,
            rows: Vec::new(),
        }
    }

    /// Rank totals by descending value, ties by ascending key, then truncate.
    pub fn from_totals(
        totals: HashMap<String, u64>,
        measure: Measure,
        top_n: Option<usize>,
    ) -> Self {
        let mut rows: Vec<SummaryRow> = totals
            .into_iter()
            .map(|(key, value)| SummaryRow { key, value })
            .collect();
        rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
        if let Some(n) = top_n {
            rows.truncate(n);
        }
        Self { measure, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.key.clone()).collect()
    }

    pub fn value_of(&self, key: &str) -> Option<u64> {
        self.rows.iter().find(|r| r.key == key).map(|r| r.value)
    }

    pub fn as_pairs(&self) -> Vec<(&str, u64)> {
        self.rows.iter().map(|r| (r.key.as_str(), r.value)).collect()
    }
}

/// How records without a release date behave under a date-range filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullDatePolicy {
    #[default]
    Exclude,
    Include,
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// January 1st of `first` through December 31st of `last`.
    pub fn years(first: i32, last: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(first, 1, 1)?,
            end: NaiveDate::from_ymd_opt(last, 12, 31)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Earliest and latest release date present in the catalog.
    pub fn of(catalog: &Catalog) -> Option<Self> {
        let dates: Vec<NaiveDate> = catalog.release_dates().into_iter().flatten().collect();
        let start = dates.iter().min()?;
        let end = dates.iter().max()?;
        Some(Self::new(*start, *end))
    }
}

/// Inclusive price range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Minimum and maximum price present in the catalog.
    pub fn of(catalog: &Catalog) -> Option<Self> {
        let prices: Vec<f64> = catalog.prices().into_iter().flatten().collect();
        if prices.is_empty() {
            return None;
        }
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { min, max })
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Platforms tracked by the catalog flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Mac, Platform::Linux];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Mac => "Mac",
            Platform::Linux => "Linux",
        }
    }
}

/// Series name for games outside the plotted genres.
pub const OTHER_GENRE: &str = "Other";

/// Numeric attribute that can be placed on a scatter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterAxis {
    Price,
    TotalReviews,
    PeakCcu,
    ReleaseYear,
}

impl ScatterAxis {
    pub const ALL: [ScatterAxis; 4] = [
        ScatterAxis::Price,
        ScatterAxis::TotalReviews,
        ScatterAxis::PeakCcu,
        ScatterAxis::ReleaseYear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScatterAxis::Price => "Price ($)",
            ScatterAxis::TotalReviews => "Total Reviews",
            ScatterAxis::PeakCcu => "Peak CCU",
            ScatterAxis::ReleaseYear => "Release Year",
        }
    }

    /// Value of every record, null where the attribute is missing.
    pub fn values(&self, catalog: &Catalog) -> Vec<Option<f64>> {
        match self {
            ScatterAxis::Price => catalog.prices(),
            ScatterAxis::TotalReviews => float_values(catalog.dataframe(), TOTAL_REVIEWS),
            ScatterAxis::PeakCcu => float_values(catalog.dataframe(), PEAK_CCU),
            ScatterAxis::ReleaseYear => catalog
                .release_dates()
                .into_iter()
                .map(|date| date.map(|d| f64::from(d.year())))
                .collect(),
        }
    }
}

/// One game placed on a scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub genre: String,
    pub name: String,
}

/// One row per (game, genre): columns `genre`, `name`, `num_reviews_total`, `price`.
#[derive(Debug, Clone, Default)]
pub struct GenreExplosion {
    df: DataFrame,
}

impl GenreExplosion {
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Genre label of every row.
    pub fn genres(&self) -> Vec<String> {
        text_values(&self.df, GENRE)
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect()
    }

    /// Total per genre for the requested measure.
    pub fn totals(&self, measure: Measure) -> HashMap<String, u64> {
        let genres = self.genres();
        let values = match measure {
            Measure::ReviewSum => count_values(&self.df, TOTAL_REVIEWS),
            Measure::GameCount => vec![1; genres.len()],
        };

        let mut totals: HashMap<String, u64> = HashMap::new();
        for (genre, value) in genres.into_iter().zip(values) {
            *totals.entry(genre).or_default() += value;
        }
        totals
    }
}

/// Handles filtering and aggregation of a cleaned catalog.
pub struct Aggregator;

impl Aggregator {
    /// Keep games sharing at least one genre with `selected`.
    /// An empty selection keeps everything.
    pub fn filter_by_genres(catalog: &Catalog, selected: &[String]) -> Catalog {
        if selected.is_empty() {
            return catalog.clone();
        }
        let wanted: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
        let mask: Vec<bool> = catalog
            .genres()
            .iter()
            .map(|labels| labels.iter().any(|g| wanted.contains(g.as_str())))
            .collect();
        Self::keep_rows(catalog, &mask)
    }

    /// Keep games released inside `range` (inclusive).
    pub fn filter_by_date_range(
        catalog: &Catalog,
        range: DateRange,
        policy: NullDatePolicy,
    ) -> Catalog {
        let mask: Vec<bool> = catalog
            .release_dates()
            .into_iter()
            .map(|date| match date {
                Some(d) => range.contains(d),
                None => policy == NullDatePolicy::Include,
            })
            .collect();
        Self::keep_rows(catalog, &mask)
    }

    /// Keep games priced inside `range` (inclusive). Games without a price are dropped.
    pub fn filter_by_price_range(catalog: &Catalog, range: PriceRange) -> Catalog {
        if catalog.is_empty() {
            return catalog.clone();
        }

        let price = col(PRICE).cast(DataType::Float64);
        let filtered = catalog
            .dataframe()
            .clone()
            .lazy()
            .filter(price.clone().gt_eq(lit(range.min)).and(price.lt_eq(lit(range.max))))
            .collect();

        match filtered {
            Ok(df) => Catalog::new(df),
            Err(e) => {
                warn!("Price filter matched nothing: {}", e);
                Catalog::new(catalog.dataframe().clear())
            }
        }
    }

    /// Case-insensitive substring search on the game name.
    pub fn search_by_name(catalog: &Catalog, query: &str) -> Catalog {
        let needle = query.to_lowercase();
        let mask: Vec<bool> = catalog
            .names()
            .iter()
            .map(|name| {
                name.as_ref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect();
        Self::keep_rows(catalog, &mask)
    }

    /// One row per (game, genre) pair. Games without genres contribute nothing.
    pub fn explode_genres(catalog: &Catalog) -> GenreExplosion {
        let mut genres: Vec<String> = Vec::new();
        let mut names: Vec<Option<String>> = Vec::new();
        let mut reviews: Vec<u64> = Vec::new();
        let mut prices: Vec<Option<f64>> = Vec::new();

        let all_names = catalog.names();
        let all_reviews = catalog.total_reviews();
        let all_prices = catalog.prices();

        for (i, labels) in catalog.genres().into_iter().enumerate() {
            for genre in labels {
                genres.push(genre);
                names.push(all_names[i].clone());
                reviews.push(all_reviews[i]);
                prices.push(all_prices[i]);
            }
        }

        let df = DataFrame::new(vec![
            Column::new(GENRE.into(), genres),
            Column::new(NAME.into(), names),
            Column::new(TOTAL_REVIEWS.into(), reviews),
            Column::new(PRICE.into(), prices),
        ]);

        match df {
            Ok(df) => GenreExplosion { df },
            Err(e) => {
                warn!("Could not build genre view: {}", e);
                GenreExplosion::default()
            }
        }
    }

    /// Genres ranked by review sum or game count.
    pub fn genre_summary(
        catalog: &Catalog,
        measure: Measure,
        top_n: Option<usize>,
    ) -> AggregateSummary {
        let exploded = Self::explode_genres(catalog);
        AggregateSummary::from_totals(exploded.totals(measure), measure, top_n)
    }

    /// Developers ranked by review sum. Games without a developer are skipped.
    pub fn developer_summary(catalog: &Catalog, top_n: Option<usize>) -> AggregateSummary {
        let mut totals: HashMap<String, u64> = HashMap::new();
        for (developer, reviews) in catalog
            .developers()
            .into_iter()
            .zip(catalog.total_reviews())
        {
            if let Some(key) = developer.as_deref().and_then(Self::developer_key) {
                *totals.entry(key).or_default() += reviews;
            }
        }
        AggregateSummary::from_totals(totals, Measure::ReviewSum, top_n)
    }

    /// Display key of a developer cell; list renderings become `"A, B"`.
    pub fn developer_key(raw: &str) -> Option<String> {
        let names = Cleaner::parse_genre_list(raw);
        (!names.is_empty()).then(|| names.join(", "))
    }

    /// Review sum per platform among games of `genre`.
    ///
    /// Ranked by descending reviews; ties keep Windows, Mac, Linux order.
    pub fn platform_summary(catalog: &Catalog, genre: &str) -> AggregateSummary {
        let scoped = Self::filter_by_genres(catalog, &[genre.to_string()]);
        if scoped.is_empty() {
            return AggregateSummary::empty(Measure::ReviewSum);
        }

        let mut totals = [0u64; 3];
        for (flags, reviews) in scoped.platforms().into_iter().zip(scoped.total_reviews()) {
            for (total, on) in totals.iter_mut().zip(flags) {
                if on {
                    *total += reviews;
                }
            }
        }

        let mut rows: Vec<SummaryRow> = Platform::ALL
            .iter()
            .zip(totals)
            .map(|(platform, value)| SummaryRow {
                key: platform.label().to_string(),
                value,
            })
            .collect();
        rows.sort_by(|a, b| b.value.cmp(&a.value));

        AggregateSummary {
            measure: Measure::ReviewSum,
            rows,
        }
    }

    /// Games placed by two different attributes.
    ///
    /// A game joins the first of its genres listed in `series`, or
    /// [`OTHER_GENRE`]. Games missing either value are skipped, and equal
    /// axes give no points.
    pub fn scatter_points(
        catalog: &Catalog,
        x: ScatterAxis,
        y: ScatterAxis,
        series: &[String],
    ) -> Vec<ScatterPoint> {
        if x == y {
            return Vec::new();
        }

        let names = catalog.names();
        let genres = catalog.genres();
        x.values(catalog)
            .into_iter()
            .zip(y.values(catalog))
            .enumerate()
            .filter_map(|(i, values)| match values {
                (Some(x), Some(y)) => Some((i, x, y)),
                _ => None,
            })
            .map(|(i, x, y)| ScatterPoint {
                x,
                y,
                genre: genres[i]
                    .iter()
                    .find(|g| series.contains(g))
                    .cloned()
                    .unwrap_or_else(|| OTHER_GENRE.to_string()),
                name: names[i].clone().unwrap_or_default(),
            })
            .collect()
    }

    /// Sorted distinct genre labels.
    pub fn all_genres(catalog: &Catalog) -> Vec<String> {
        catalog
            .genres()
            .into_iter()
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Prices of the games in each of the given genres.
    pub fn prices_by_genre(catalog: &Catalog, genres: &[String]) -> BTreeMap<String, Vec<f64>> {
        let mut by_genre: BTreeMap<String, Vec<f64>> = genres
            .iter()
            .map(|g| (g.clone(), Vec::new()))
            .collect();

        for (labels, price) in catalog.genres().into_iter().zip(catalog.prices()) {
            let Some(price) = price else { continue };
            for genre in labels {
                if let Some(values) = by_genre.get_mut(&genre) {
                    values.push(price);
                }
            }
        }

        by_genre.retain(|_, values| !values.is_empty());
        by_genre
    }

    /// Number of games released per year, ascending by year.
    pub fn releases_per_year(catalog: &Catalog) -> Vec<(i32, u64)> {
        let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
        for date in catalog.release_dates().into_iter().flatten() {
            *counts.entry(date.year()).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Mean price of the games released per year, ascending by year.
    pub fn mean_price_per_year(catalog: &Catalog) -> Vec<(i32, f64)> {
        let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for (date, price) in catalog.release_dates().into_iter().zip(catalog.prices()) {
            if let (Some(date), Some(price)) = (date, price) {
                let entry = sums.entry(date.year()).or_default();
                entry.0 += price;
                entry.1 += 1;
            }
        }
        sums.into_iter()
            .map(|(year, (sum, n))| (year, sum / n as f64))
            .collect()
    }

    /// Mean of the non-null values of a numeric column.
    pub fn column_mean(catalog: &Catalog, column: &str) -> Option<f64> {
        let values: Vec<f64> = float_values(catalog.dataframe(), column)
            .into_iter()
            .flatten()
            .collect();
        (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
    }

    fn keep_rows(catalog: &Catalog, mask: &[bool]) -> Catalog {
        match catalog.select_rows(mask) {
            Ok(filtered) => filtered,
            Err(e) => {
                warn!("Filter failed, returning no rows: {}", e);
                Catalog::new(catalog.dataframe().clear())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GameRecord;
    use pretty_assertions::assert_eq;

    fn game(name: &str, genres: &[&str], reviews: u64) -> GameRecord {
        GameRecord {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            total_reviews: reviews,
            ..GameRecord::named(name)
        }
    }

    fn priced(name: &str, price: Option<f64>) -> GameRecord {
        GameRecord {
            price,
            ..GameRecord::named(name)
        }
    }

    fn released(name: &str, date: Option<(i32, u32, u32)>) -> GameRecord {
        GameRecord {
            release_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..GameRecord::named(name)
        }
    }

    fn catalog(records: &[GameRecord]) -> Catalog {
        Catalog::from_records(records).unwrap()
    }

    fn names(catalog: &Catalog) -> Vec<String> {
        catalog.names().into_iter().flatten().collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn genre_sum_ranks_descending() {
        let catalog = catalog(&[game("X", &["RPG"], 100), game("Y", &["RPG", "Action"], 50)]);

        let summary = Aggregator::genre_summary(&catalog, Measure::ReviewSum, Some(TOP_GENRES));
        assert_eq!(summary.as_pairs(), vec![("RPG", 150), ("Action", 50)]);

        let counts = Aggregator::genre_summary(&catalog, Measure::GameCount, None);
        assert_eq!(counts.as_pairs(), vec![("RPG", 2), ("Action", 1)]);
    }

    #[test]
    fn genre_summary_truncates_and_breaks_ties_by_name() {
        let records: Vec<GameRecord> = (0..12)
            .map(|i| game(&format!("G{i}"), &[format!("Genre{i:02}").as_str()], 10))
            .collect();
        let summary = Aggregator::genre_summary(&catalog(&records), Measure::ReviewSum, Some(10));

        assert_eq!(summary.len(), 10);
        assert_eq!(summary.rows[0].key, "Genre00");
        assert_eq!(summary.rows[9].key, "Genre09");
    }

    #[test]
    fn explosion_has_one_row_per_genre() {
        let catalog = catalog(&[
            game("X", &["RPG"], 100),
            game("Y", &["RPG", "Action"], 50),
            game("Z", &[], 7),
        ]);
        let exploded = Aggregator::explode_genres(&catalog);
        assert_eq!(exploded.len(), 3);
        assert_eq!(exploded.genres(), strings(&["RPG", "RPG", "Action"]));
    }

    #[test]
    fn genre_filter_uses_intersection() {
        let catalog = catalog(&[
            game("X", &["RPG"], 0),
            game("Y", &["Action", "Indie"], 0),
            game("Z", &["Sports"], 0),
        ]);

        let filtered = Aggregator::filter_by_genres(&catalog, &strings(&["Indie", "RPG"]));
        assert_eq!(names(&filtered), strings(&["X", "Y"]));

        let all = Aggregator::filter_by_genres(&catalog, &[]);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn price_range_is_inclusive_and_skips_nulls() {
        let catalog = catalog(&[
            priced("Cheap", Some(5.0)),
            priced("Mid", Some(15.0)),
            priced("Pricey", Some(25.0)),
            priced("Unknown", None),
        ]);

        let filtered = Aggregator::filter_by_price_range(&catalog, PriceRange::new(10.0, 20.0));
        assert_eq!(names(&filtered), strings(&["Mid"]));

        let edges = Aggregator::filter_by_price_range(&catalog, PriceRange::new(5.0, 25.0));
        assert_eq!(edges.len(), 3);

        assert_eq!(PriceRange::of(&catalog), Some(PriceRange::new(5.0, 25.0)));
    }

    #[test]
    fn date_range_excludes_nulls_by_default() {
        let catalog = catalog(&[
            released("Old", Some((2005, 6, 1))),
            released("Edge", Some((2010, 1, 1))),
            released("New", Some((2020, 12, 31))),
            released("Undated", None),
        ]);
        let range = DateRange::years(2010, 2020).unwrap();

        let excluded = Aggregator::filter_by_date_range(&catalog, range, NullDatePolicy::Exclude);
        assert_eq!(names(&excluded), strings(&["Edge", "New"]));

        let included = Aggregator::filter_by_date_range(&catalog, range, NullDatePolicy::Include);
        assert_eq!(names(&included), strings(&["Edge", "New", "Undated"]));
    }

    #[test]
    fn search_is_case_insensitive_and_skips_null_names() {
        let catalog = catalog(&[
            GameRecord::named("Warframe"),
            GameRecord::named("Portal"),
            GameRecord::default(),
        ]);

        let found = Aggregator::search_by_name(&catalog, "war");
        assert_eq!(names(&found), strings(&["Warframe"]));

        let everything_named = Aggregator::search_by_name(&catalog, "");
        assert_eq!(everything_named.len(), 2);
    }

    #[test]
    fn developer_summary_groups_list_renderings() {
        let mut a = game("A", &[], 10);
        a.developers = Some("['Valve']".to_string());
        let mut b = game("B", &[], 5);
        b.developers = Some("Valve".to_string());
        let mut c = game("C", &[], 30);
        c.developers = Some("['Studio X', 'Studio Y']".to_string());
        let d = game("D", &[], 99);

        let summary = Aggregator::developer_summary(&catalog(&[a, b, c, d]), Some(TOP_DEVELOPERS));
        assert_eq!(
            summary.as_pairs(),
            vec![("Studio X, Studio Y", 30), ("Valve", 15)]
        );
    }

    #[test]
    fn platform_summary_is_scoped_to_one_genre() {
        let mut a = game("A", &["RPG"], 100);
        a.windows = true;
        a.linux = true;
        let mut b = game("B", &["RPG"], 40);
        b.windows = true;
        b.mac = true;
        let mut c = game("C", &["Action"], 1000);
        c.mac = true;

        let summary = Aggregator::platform_summary(&catalog(&[a, b, c]), "RPG");
        assert_eq!(
            summary.as_pairs(),
            vec![("Windows", 140), ("Linux", 100), ("Mac", 40)]
        );

        let none = Aggregator::platform_summary(&catalog(&[game("Z", &["Sports"], 1)]), "RPG");
        assert!(none.is_empty());
    }

    #[test]
    fn time_trends_group_by_year() {
        let mut a = released("A", Some((2019, 3, 1)));
        a.price = Some(10.0);
        let mut b = released("B", Some((2019, 9, 1)));
        b.price = Some(20.0);
        let mut c = released("C", Some((2021, 1, 1)));
        c.price = Some(5.0);
        let d = released("D", None);
        let catalog = catalog(&[a, b, c, d]);

        assert_eq!(
            Aggregator::releases_per_year(&catalog),
            vec![(2019, 2), (2021, 1)]
        );
        assert_eq!(
            Aggregator::mean_price_per_year(&catalog),
            vec![(2019, 15.0), (2021, 5.0)]
        );
    }

    #[test]
    fn prices_by_genre_skips_unpriced_games() {
        let mut a = game("A", &["RPG", "Indie"], 0);
        a.price = Some(9.99);
        let b = game("B", &["RPG"], 0);

        let prices = Aggregator::prices_by_genre(&catalog(&[a, b]), &strings(&["RPG", "Sports"]));
        assert_eq!(prices.len(), 1);
        assert_eq!(prices["RPG"], vec![9.99]);
    }

    #[test]
    fn scatter_points_skip_missing_values() {
        let mut portal = game("Portal", &["Puzzle", "Action"], 100);
        portal.price = Some(9.99);
        portal.release_date = NaiveDate::from_ymd_opt(2007, 10, 10);
        let mut dota = game("Dota", &["Strategy"], 500);
        dota.price = Some(0.0);
        let mut unpriced = game("Unpriced", &["Action"], 50);
        unpriced.release_date = NaiveDate::from_ymd_opt(2015, 1, 1);
        let catalog = catalog(&[portal, dota, unpriced]);

        let series = strings(&["Action"]);
        let points = Aggregator::scatter_points(
            &catalog,
            ScatterAxis::Price,
            ScatterAxis::TotalReviews,
            &series,
        );
        assert_eq!(
            points,
            vec![
                ScatterPoint {
                    x: 9.99,
                    y: 100.0,
                    genre: "Action".to_string(),
                    name: "Portal".to_string(),
                },
                ScatterPoint {
                    x: 0.0,
                    y: 500.0,
                    genre: OTHER_GENRE.to_string(),
                    name: "Dota".to_string(),
                },
            ]
        );

        let by_year = Aggregator::scatter_points(
            &catalog,
            ScatterAxis::ReleaseYear,
            ScatterAxis::Price,
            &series,
        );
        assert_eq!(by_year.len(), 1);
        assert_eq!((by_year[0].x, by_year[0].y), (2007.0, 9.99));
    }

    #[test]
    fn scatter_points_refuse_equal_axes() {
        let mut portal = game("Portal", &["Puzzle"], 100);
        portal.price = Some(9.99);
        let catalog = catalog(&[portal]);

        assert!(
            Aggregator::scatter_points(&catalog, ScatterAxis::Price, ScatterAxis::Price, &[])
                .is_empty()
        );
        let points =
            Aggregator::scatter_points(&catalog, ScatterAxis::Price, ScatterAxis::PeakCcu, &[]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].genre, OTHER_GENRE);
    }

    #[test]
    fn empty_catalog_gives_empty_results() {
        let empty = Catalog::empty();
        assert!(Aggregator::genre_summary(&empty, Measure::ReviewSum, Some(10)).is_empty());
        assert!(Aggregator::developer_summary(&empty, Some(20)).is_empty());
        assert!(Aggregator::platform_summary(&empty, "RPG").is_empty());
        assert!(Aggregator::search_by_name(&empty, "war").is_empty());
        assert!(Aggregator::filter_by_price_range(&empty, PriceRange::new(0.0, 1.0)).is_empty());
        assert!(Aggregator::releases_per_year(&empty).is_empty());
        assert_eq!(PriceRange::of(&empty), None);
        assert_eq!(DateRange::of(&empty), None);
    }
}
