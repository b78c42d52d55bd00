//! Catalog Module
//! In-memory game catalog backed by a Polars DataFrame, plus typed column access.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column names of the Steam catalog export.
pub mod columns {
    pub const NAME: &str = "name";
    pub const PRICE: &str = "price";
    pub const GENRES: &str = "genres";
    pub const WINDOWS: &str = "windows";
    pub const MAC: &str = "mac";
    pub const LINUX: &str = "linux";
    pub const RELEASE_DATE: &str = "release_date";
    pub const TOTAL_REVIEWS: &str = "num_reviews_total";
    pub const PEAK_CCU: &str = "peak_ccu";
    pub const DEVELOPERS: &str = "developers";
    pub const PUBLISHERS: &str = "publishers";
    pub const HEADER_IMAGE: &str = "header_image";
    pub const SHORT_DESCRIPTION: &str = "short_description";
}

use columns::*;

/// Days between 0001-01-01 (CE) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One game of the catalog as a typed row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub genres: Vec<String>,
    pub windows: bool,
    pub mac: bool,
    pub linux: bool,
    pub release_date: Option<NaiveDate>,
    pub total_reviews: u64,
    pub peak_ccu: u64,
    pub developers: Option<String>,
    pub publishers: Option<String>,
    pub short_description: Option<String>,
    pub header_image: Option<String>,
}

impl GameRecord {
    /// Convenience constructor used by sample data and tests.
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}

/// Ordered collection of game records for one session.
///
/// The columns are the CSV header columns as loaded; cleaning swaps
/// `genres` for a list column and `release_date` for a date column.
/// Every transformation returns a new `Catalog`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    df: DataFrame,
}

impl Catalog {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a cleaned catalog from typed records.
    pub fn from_records(records: &[GameRecord]) -> PolarsResult<Self> {
        let names: Vec<Option<String>> = records.iter().map(|r| r.name.clone()).collect();
        let prices: Vec<Option<f64>> = records.iter().map(|r| r.price).collect();
        let windows: Vec<bool> = records.iter().map(|r| r.windows).collect();
        let mac: Vec<bool> = records.iter().map(|r| r.mac).collect();
        let linux: Vec<bool> = records.iter().map(|r| r.linux).collect();
        let reviews: Vec<i64> = records
            .iter()
            .map(|r| i64::try_from(r.total_reviews).unwrap_or(i64::MAX))
            .collect();
        let ccu: Vec<i64> = records
            .iter()
            .map(|r| i64::try_from(r.peak_ccu).unwrap_or(i64::MAX))
            .collect();
        let developers: Vec<Option<String>> =
            records.iter().map(|r| r.developers.clone()).collect();
        let publishers: Vec<Option<String>> =
            records.iter().map(|r| r.publishers.clone()).collect();
        let descriptions: Vec<Option<String>> =
            records.iter().map(|r| r.short_description.clone()).collect();
        let images: Vec<Option<String>> = records.iter().map(|r| r.header_image.clone()).collect();
        let genres: Vec<Vec<String>> = records.iter().map(|r| r.genres.clone()).collect();
        let dates: Vec<Option<NaiveDate>> = records.iter().map(|r| r.release_date).collect();

        let df = DataFrame::new(vec![
            Column::new(NAME.into(), names),
            Column::new(PRICE.into(), prices),
            genre_column(&genres)?,
            Column::new(WINDOWS.into(), windows),
            Column::new(MAC.into(), mac),
            Column::new(LINUX.into(), linux),
            date_column(&dates)?,
            Column::new(TOTAL_REVIEWS.into(), reviews),
            Column::new(PEAK_CCU.into(), ccu),
            Column::new(DEVELOPERS.into(), developers),
            Column::new(PUBLISHERS.into(), publishers),
            Column::new(SHORT_DESCRIPTION.into(), descriptions),
            Column::new(HEADER_IMAGE.into(), images),
        ])?;

        Ok(Self { df })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Keep the rows whose mask entry is true.
    pub fn select_rows(&self, mask: &[bool]) -> PolarsResult<Self> {
        let mask = BooleanChunked::from_slice(PlSmallStr::EMPTY, mask);
        Ok(Self::new(self.df.filter(&mask)?))
    }

    /// First `n` records.
    pub fn head(&self, n: usize) -> Self {
        Self::new(self.df.head(Some(n)))
    }

    /// Typed view of every record.
    pub fn records(&self) -> Vec<GameRecord> {
        let names = self.names();
        let prices = self.prices();
        let genres = self.genres();
        let windows = flag_values(&self.df, WINDOWS);
        let mac = flag_values(&self.df, MAC);
        let linux = flag_values(&self.df, LINUX);
        let dates = self.release_dates();
        let reviews = self.total_reviews();
        let ccu = count_values(&self.df, PEAK_CCU);
        let developers = text_values(&self.df, DEVELOPERS);
        let publishers = text_values(&self.df, PUBLISHERS);
        let descriptions = text_values(&self.df, SHORT_DESCRIPTION);
        let images = text_values(&self.df, HEADER_IMAGE);

        (0..self.len())
            .map(|i| GameRecord {
                name: names[i].clone(),
                price: prices[i],
                genres: genres[i].clone(),
                windows: windows[i],
                mac: mac[i],
                linux: linux[i],
                release_date: dates[i],
                total_reviews: reviews[i],
                peak_ccu: ccu[i],
                developers: developers[i].clone(),
                publishers: publishers[i].clone(),
                short_description: descriptions[i].clone(),
                header_image: images[i].clone(),
            })
            .collect()
    }

    pub fn names(&self) -> Vec<Option<String>> {
        text_values(&self.df, NAME)
    }

    pub fn prices(&self) -> Vec<Option<f64>> {
        float_values(&self.df, PRICE)
    }

    pub fn genres(&self) -> Vec<Vec<String>> {
        genre_values(&self.df)
    }

    pub fn release_dates(&self) -> Vec<Option<NaiveDate>> {
        date_values(&self.df, RELEASE_DATE)
    }

    /// Review counts; missing values count as zero.
    pub fn total_reviews(&self) -> Vec<u64> {
        count_values(&self.df, TOTAL_REVIEWS)
    }

    pub fn developers(&self) -> Vec<Option<String>> {
        text_values(&self.df, DEVELOPERS)
    }

    /// Platform flags in (windows, mac, linux) order.
    pub fn platforms(&self) -> Vec<[bool; 3]> {
        let windows = flag_values(&self.df, WINDOWS);
        let mac = flag_values(&self.df, MAC);
        let linux = flag_values(&self.df, LINUX);
        (0..self.len())
            .map(|i| [windows[i], mac[i], linux[i]])
            .collect()
    }
}

/// Names of the numeric columns, in frame order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Float32
                    | DataType::Float64
                    | DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
            )
        })
        .map(|col| col.name().to_string())
        .collect()
}

/// Text values of a column; a missing column yields all nulls.
pub(crate) fn text_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    let height = df.height();
    let Ok(column) = df.column(name) else {
        return vec![None; height];
    };
    let series = column.as_materialized_series();

    if let DataType::List(_) = series.dtype() {
        return list_values(series)
            .into_iter()
            .map(|labels| (!labels.is_empty()).then(|| labels.join(", ")))
            .collect();
    }

    series
        .cast(&DataType::String)
        .ok()
        .and_then(|s| {
            s.str()
                .ok()
                .map(|ca| ca.into_iter().map(|v| v.map(str::to_string)).collect())
        })
        .unwrap_or_else(|| vec![None; height])
}

/// Float values of a column; unparseable cells become null.
pub(crate) fn float_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    let height = df.height();
    df.column(name)
        .ok()
        .and_then(|col| col.as_materialized_series().cast(&DataType::Float64).ok())
        .and_then(|s| {
            s.f64()
                .ok()
                .map(|ca| ca.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect())
        })
        .unwrap_or_else(|| vec![None; height])
}

/// Non-negative counts of a column; nulls and negatives count as zero.
pub(crate) fn count_values(df: &DataFrame, name: &str) -> Vec<u64> {
    float_values(df, name)
        .into_iter()
        .map(|v| match v {
            Some(x) if x > 0.0 => x.round() as u64,
            _ => 0,
        })
        .collect()
}

/// Boolean flags of a column, accepting native booleans, "True"/"False" text
/// or numbers. Missing values are false.
pub(crate) fn flag_values(df: &DataFrame, name: &str) -> Vec<bool> {
    let height = df.height();
    let Ok(column) = df.column(name) else {
        return vec![false; height];
    };
    let series = column.as_materialized_series();

    match series.dtype() {
        DataType::Boolean => series
            .bool()
            .map(|ca| ca.into_iter().map(|v| v.unwrap_or(false)).collect())
            .unwrap_or_else(|_| vec![false; height]),
        DataType::String => series
            .str()
            .map(|ca| ca.into_iter().map(|v| v.is_some_and(parse_flag)).collect())
            .unwrap_or_else(|_| vec![false; height]),
        _ => float_values(df, name)
            .into_iter()
            .map(|v| v.is_some_and(|x| x != 0.0))
            .collect(),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "t"
    )
}

/// Genre labels per row. Raw text cells are parsed, list cells read as-is.
pub(crate) fn genre_values(df: &DataFrame) -> Vec<Vec<String>> {
    let height = df.height();
    let Ok(column) = df.column(GENRES) else {
        return vec![Vec::new(); height];
    };
    let series = column.as_materialized_series();

    match series.dtype() {
        DataType::List(_) => list_values(series),
        _ => text_values(df, GENRES)
            .into_iter()
            .map(|v| {
                v.map(|raw| crate::data::Cleaner::parse_genre_list(&raw))
                    .unwrap_or_default()
            })
            .collect(),
    }
}

fn list_values(series: &Series) -> Vec<Vec<String>> {
    let height = series.len();
    let Ok(ca) = series.list() else {
        return vec![Vec::new(); height];
    };

    ca.into_iter()
        .map(|inner| {
            inner
                .and_then(|s| s.cast(&DataType::String).ok())
                .and_then(|s| {
                    s.str().ok().map(|labels| {
                        labels
                            .into_iter()
                            .flatten()
                            .map(str::to_string)
                            .collect::<Vec<_>>()
                    })
                })
                .unwrap_or_default()
        })
        .collect()
}

/// Calendar dates per row. Date columns are read natively, text is parsed.
pub(crate) fn date_values(df: &DataFrame, name: &str) -> Vec<Option<NaiveDate>> {
    let height = df.height();
    let Ok(column) = df.column(name) else {
        return vec![None; height];
    };
    let series = column.as_materialized_series();

    match series.dtype() {
        DataType::Date => series
            .cast(&DataType::Int32)
            .ok()
            .and_then(|s| {
                s.i32()
                    .ok()
                    .map(|ca| ca.into_iter().map(|v| v.and_then(days_to_date)).collect())
            })
            .unwrap_or_else(|| vec![None; height]),
        _ => text_values(df, name)
            .into_iter()
            .map(|v| v.and_then(|raw| crate::data::Cleaner::parse_release_date(&raw)))
            .collect(),
    }
}

fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Build a `List(String)` genres column.
pub(crate) fn genre_column(genres: &[Vec<String>]) -> PolarsResult<Column> {
    let mut ca: ListChunked = genres
        .iter()
        .map(|labels| Some(Series::new(PlSmallStr::EMPTY, labels.clone())))
        .collect();
    ca.rename(GENRES.into());

    // An empty iterator cannot infer the inner type.
    let series = ca.into_series();
    let target = DataType::List(Box::new(DataType::String));
    if series.dtype() == &target {
        Ok(Column::from(series))
    } else {
        Ok(Column::from(series.cast(&target)?))
    }
}

/// Build a `Date` column named `release_date`.
pub(crate) fn date_column(dates: &[Option<NaiveDate>]) -> PolarsResult<Column> {
    let days: Vec<Option<i32>> = dates.iter().map(|d| d.map(date_to_days)).collect();
    Column::new(RELEASE_DATE.into(), days).cast(&DataType::Date)
}
