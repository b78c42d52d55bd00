//! Data Cleaner Module
//! Normalizes raw catalog columns (genre lists, release dates) and removes duplicate games.

use super::catalog::{columns::*, date_column, date_values, genre_column, genre_values, Catalog};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{info, warn};

/// Handles catalog cleaning. Every operation returns a new catalog.
pub struct Cleaner;

impl Cleaner {
    /// Normalize genres and release dates, then drop duplicate names.
    ///
    /// Never fails: a step that cannot be applied is logged and skipped,
    /// leaving that column as loaded.
    pub fn clean(catalog: &Catalog) -> Catalog {
        if catalog.is_empty() {
            info!("Data cleaned: 0 rows remaining after preprocessing");
            return catalog.clone();
        }

        let mut df = catalog.dataframe().clone();

        if catalog.has_column(GENRES) {
            let genres = genre_values(&df);
            if let Err(e) = genre_column(&genres).and_then(|col| df.with_column(col).map(|_| ())) {
                warn!("Skipping genre normalization: {}", e);
            }
        }

        if catalog.has_column(RELEASE_DATE) {
            let dates = date_values(&df, RELEASE_DATE);
            let unparsed = dates.iter().filter(|d| d.is_none()).count();
            if unparsed > 0 {
                warn!("{} release dates could not be parsed and were set to null", unparsed);
            }
            if let Err(e) = date_column(&dates).and_then(|col| df.with_column(col).map(|_| ())) {
                warn!("Skipping release date normalization: {}", e);
            }
        }

        let cleaned = Self::dedup_by_name(&Catalog::new(df));
        info!(
            "Data cleaned: {} rows remaining after preprocessing",
            cleaned.len()
        );
        cleaned
    }

    /// Parse a list rendering such as `['Action', 'Indie']` into labels.
    ///
    /// Quotes delimiting a label are dropped; a quote inside a label quoted
    /// with the other quote character is kept (`"Shoot 'Em Up"`).
    pub fn parse_genre_list(raw: &str) -> Vec<String> {
        let trimmed = raw.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(trimmed);

        let mut labels = Vec::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;

        for ch in inner.chars() {
            match quote {
                Some(q) if ch == q => quote = None,
                Some(_) => current.push(ch),
                None => match ch {
                    '\'' | '"' if current.trim().is_empty() => {
                        current.clear();
                        quote = Some(ch);
                    }
                    ',' => Self::push_label(&mut labels, &mut current),
                    _ => current.push(ch),
                },
            }
        }
        Self::push_label(&mut labels, &mut current);

        labels
    }

    fn push_label(labels: &mut Vec<String>, current: &mut String) {
        let label = current.trim().trim_matches(|c| c == '\'' || c == '"').trim();
        if !label.is_empty() {
            labels.push(label.to_string());
        }
        current.clear();
    }

    /// Parse a strict `YYYY-MM-DD` date. Anything else is `None`.
    pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        let bytes = raw.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !shaped {
            return None;
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    /// Drop duplicate names, keeping the last occurrence.
    ///
    /// Survivors keep their relative order. Rows without a name share one key.
    /// A catalog with no name column is returned unchanged.
    pub fn dedup_by_name(catalog: &Catalog) -> Catalog {
        if !catalog.has_column(NAME) {
            warn!("Skipping deduplication: no '{}' column", NAME);
            return catalog.clone();
        }
        let names = catalog.names();

        let mut last_seen: HashMap<Option<&str>, usize> = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            last_seen.insert(name.as_deref(), i);
        }

        if last_seen.len() == names.len() {
            return catalog.clone();
        }

        let mask: Vec<bool> = names
            .iter()
            .enumerate()
            .map(|(i, name)| last_seen.get(&name.as_deref()) == Some(&i))
            .collect();

        match catalog.select_rows(&mask) {
            Ok(deduped) => deduped,
            Err(e) => {
                warn!("Skipping deduplication: {}", e);
                catalog.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GameRecord;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn raw_catalog(names: &[Option<&str>], genres: &[&str], dates: &[&str]) -> Catalog {
        let df = DataFrame::new(vec![
            Column::new(NAME.into(), names.to_vec()),
            Column::new(GENRES.into(), genres.to_vec()),
            Column::new(RELEASE_DATE.into(), dates.to_vec()),
        ])
        .unwrap();
        Catalog::new(df)
    }

    #[test]
    fn parses_list_renderings() {
        assert_eq!(Cleaner::parse_genre_list("['A', 'B']"), labels(&["A", "B"]));
        assert_eq!(Cleaner::parse_genre_list("[]"), Vec::<String>::new());
        assert_eq!(Cleaner::parse_genre_list("['A']"), labels(&["A"]));
        assert_eq!(
            Cleaner::parse_genre_list("  [ 'Free To Play' ,'Massively Multiplayer'  ] "),
            labels(&["Free To Play", "Massively Multiplayer"])
        );
    }

    #[test]
    fn keeps_apostrophes_inside_double_quotes() {
        assert_eq!(
            Cleaner::parse_genre_list(r#"["Shoot 'Em Up", 'Action']"#),
            labels(&["Shoot 'Em Up", "Action"])
        );
    }

    #[test]
    fn accepts_bare_comma_lists() {
        assert_eq!(Cleaner::parse_genre_list("Action, RPG"), labels(&["Action", "RPG"]));
        assert_eq!(Cleaner::parse_genre_list(""), Vec::<String>::new());
    }

    #[test]
    fn parses_strict_iso_dates_only() {
        assert_eq!(
            Cleaner::parse_release_date("2008-11-21"),
            NaiveDate::from_ymd_opt(2008, 11, 21)
        );
        assert_eq!(Cleaner::parse_release_date("2008-1-21"), None);
        assert_eq!(Cleaner::parse_release_date("Nov 21, 2008"), None);
        assert_eq!(Cleaner::parse_release_date("2023-02-30"), None);
        assert_eq!(Cleaner::parse_release_date(""), None);
    }

    #[test]
    fn dedup_keeps_last_occurrence_in_order() {
        let catalog = raw_catalog(
            &[Some("G1"), Some("G2"), Some("G1")],
            &["['A']", "['B']", "['C']"],
            &["2020-01-01", "2020-01-02", "2020-01-03"],
        );

        let deduped = Cleaner::dedup_by_name(&catalog);
        assert_eq!(
            deduped.names(),
            vec![Some("G2".to_string()), Some("G1".to_string())]
        );
        assert_eq!(deduped.genres(), vec![labels(&["B"]), labels(&["C"])]);
    }

    #[test]
    fn null_names_collapse_to_the_last_one() {
        let catalog = raw_catalog(
            &[None, Some("G1"), None],
            &["['A']", "['B']", "['C']"],
            &["", "", ""],
        );

        let deduped = Cleaner::dedup_by_name(&catalog);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped.genres(), vec![labels(&["B"]), labels(&["C"])]);
    }

    #[test]
    fn clean_normalizes_columns_without_touching_input() {
        let catalog = raw_catalog(
            &[Some("Portal"), Some("Broken")],
            &["['Puzzle', 'Action']", "[]"],
            &["2007-10-10", "not a date"],
        );

        let cleaned = Cleaner::clean(&catalog);

        assert_eq!(
            cleaned.dataframe().column(GENRES).unwrap().dtype(),
            &DataType::List(Box::new(DataType::String))
        );
        assert_eq!(
            cleaned.dataframe().column(RELEASE_DATE).unwrap().dtype(),
            &DataType::Date
        );
        assert_eq!(
            cleaned.records(),
            vec![
                GameRecord {
                    genres: labels(&["Puzzle", "Action"]),
                    release_date: NaiveDate::from_ymd_opt(2007, 10, 10),
                    ..GameRecord::named("Portal")
                },
                GameRecord::named("Broken"),
            ]
        );

        // The caller's catalog is left as loaded.
        assert_eq!(
            catalog.dataframe().column(GENRES).unwrap().dtype(),
            &DataType::String
        );
    }

    #[test]
    fn clean_tolerates_missing_columns() {
        let df = DataFrame::new(vec![Column::new(NAME.into(), vec!["A", "A"])]).unwrap();
        let cleaned = Cleaner::clean(&Catalog::new(df));
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.column_names(), vec![NAME.to_string()]);
    }

    #[test]
    fn clean_keeps_every_row_without_a_name_column() {
        let df = DataFrame::new(vec![
            Column::new("title".into(), vec!["A", "B", "C"]),
            Column::new(GENRES.into(), vec!["['RPG']", "['RPG']", "[]"]),
        ])
        .unwrap();
        let catalog = Catalog::new(df);

        let cleaned = Cleaner::clean(&catalog);
        assert_eq!(cleaned.len(), 3);
        assert_eq!(Cleaner::dedup_by_name(&catalog).len(), 3);
    }

    #[test]
    fn clean_on_empty_catalog_is_empty() {
        assert!(Cleaner::clean(&Catalog::empty()).is_empty());
    }

    proptest! {
        #[test]
        fn rendered_lists_parse_back(values in prop::collection::vec("[A-Za-z][A-Za-z &-]{0,12}", 0..6)) {
            let rendered = format!(
                "[{}]",
                values.iter().map(|v| format!("'{}'", v)).collect::<Vec<_>>().join(", ")
            );
            let parsed = Cleaner::parse_genre_list(&rendered);
            let expected: Vec<String> = values.iter().map(|v| v.trim().to_string()).collect();
            prop_assert_eq!(parsed, expected);
        }

        #[test]
        fn clean_is_idempotent(names in prop::collection::vec(prop::option::of("[a-d]"), 0..12)) {
            let genres: Vec<&str> = names.iter().map(|_| "['RPG']").collect();
            let dates: Vec<&str> = names.iter().map(|_| "2021-06-01").collect();
            let names: Vec<Option<&str>> = names.iter().map(|n| n.as_deref()).collect();
            let catalog = raw_catalog(&names, &genres, &dates);

            let once = Cleaner::clean(&catalog);
            let twice = Cleaner::clean(&once);
            prop_assert_eq!(once.records(), twice.records());
        }
    }
}
