//! CSV Data Loader Module
//! Handles catalog loading, the memoized full load and CSV export using Polars.

use super::catalog::{columns::GENRES, genre_values, Catalog};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Rows read by the quick preview load.
pub const PREVIEW_ROWS: usize = 5;

/// Rows scanned for schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a load ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded { rows: usize, columns: usize },
    NotFound(PathBuf),
    ParseError(String),
}

impl LoadStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadStatus::Loaded { .. })
    }

    /// Human-readable status line.
    pub fn message(&self) -> String {
        match self {
            LoadStatus::Loaded { rows, columns } => format!(
                "Successfully loaded dataset with {} rows and {} columns",
                rows, columns
            ),
            LoadStatus::NotFound(path) => format!("File not found: {}", path.display()),
            LoadStatus::ParseError(message) => format!("Error loading data: {}", message),
        }
    }
}

/// A catalog plus the status of the load that produced it.
///
/// Failed loads carry an empty catalog.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub catalog: Catalog,
    pub status: LoadStatus,
}

impl LoadOutcome {
    fn from_result(result: Result<DataFrame, LoaderError>) -> Self {
        match result {
            Ok(df) => {
                let status = LoadStatus::Loaded {
                    rows: df.height(),
                    columns: df.width(),
                };
                info!("{}", status.message());
                Self {
                    catalog: Catalog::new(df),
                    status,
                }
            }
            Err(LoaderError::NotFound(path)) => {
                let status = LoadStatus::NotFound(path);
                warn!("{}", status.message());
                Self {
                    catalog: Catalog::empty(),
                    status,
                }
            }
            Err(e) => {
                let message = match e {
                    LoaderError::CsvError(inner) => inner.to_string(),
                    other => other.to_string(),
                };
                let status = LoadStatus::ParseError(message);
                error!("{}", status.message());
                Self {
                    catalog: Catalog::empty(),
                    status,
                }
            }
        }
    }
}

/// Loads catalogs from CSV, remembering successful full loads per path.
pub struct DataLoader {
    cache: HashMap<PathBuf, Catalog>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Load a CSV file, reusing the catalog of an earlier successful load of
    /// the same path. Failed loads are not remembered.
    pub fn load(&mut self, file_path: impl AsRef<Path>) -> LoadOutcome {
        let path = file_path.as_ref().to_path_buf();

        if let Some(catalog) = self.cache.get(&path) {
            debug!("Reusing cached catalog for {}", path.display());
            return LoadOutcome {
                catalog: catalog.clone(),
                status: LoadStatus::Loaded {
                    rows: catalog.len(),
                    columns: catalog.width(),
                },
            };
        }

        let outcome = Self::read(&path);
        if outcome.status.is_loaded() {
            self.cache.insert(path, outcome.catalog.clone());
        }
        outcome
    }

    /// Load a whole CSV file without touching the cache.
    pub fn read(file_path: impl AsRef<Path>) -> LoadOutcome {
        LoadOutcome::from_result(Self::read_csv(file_path.as_ref(), None))
    }

    /// Load only the first rows of a CSV file for a preview. Never cached.
    pub fn load_quick(file_path: impl AsRef<Path>) -> LoadOutcome {
        LoadOutcome::from_result(Self::read_csv(file_path.as_ref(), Some(PREVIEW_ROWS)))
    }

    fn read_csv(path: &Path, n_rows: Option<usize>) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_n_rows(n_rows)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        Ok(df)
    }

    /// Remember a catalog read elsewhere (e.g. on a background thread).
    pub fn insert(&mut self, file_path: impl AsRef<Path>, catalog: Catalog) {
        self.cache.insert(file_path.as_ref().to_path_buf(), catalog);
    }

    /// Cached catalog for a path, if any.
    pub fn cached(&self, file_path: impl AsRef<Path>) -> Option<&Catalog> {
        self.cache.get(file_path.as_ref())
    }

    pub fn is_cached(&self, file_path: impl AsRef<Path>) -> bool {
        self.cache.contains_key(file_path.as_ref())
    }

    /// Forget every cached catalog.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Write a catalog as CSV with a header row.
    ///
    /// List-valued genres are written back as `['A', 'B']` so the file can be
    /// loaded and cleaned again.
    pub fn save(catalog: &Catalog, file_path: impl AsRef<Path>) -> Result<(), LoaderError> {
        let path = file_path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut df = catalog.dataframe().clone();
        if let Ok(column) = df.column(GENRES) {
            if matches!(column.dtype(), DataType::List(_)) {
                let rendered: Vec<String> = genre_values(&df)
                    .iter()
                    .map(|labels| render_list(labels))
                    .collect();
                df.with_column(Column::new(GENRES.into(), rendered))?;
            }
        }

        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;

        info!("Data saved to {}", path.display());
        Ok(())
    }
}

/// Render labels the way the raw export does: `['A', 'B']`.
pub fn render_list(labels: &[String]) -> String {
    let quoted: Vec<String> = labels
        .iter()
        .map(|label| {
            if label.contains('\'') {
                format!("\"{}\"", label)
            } else {
                format!("'{}'", label)
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Cleaner, GameRecord};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    const SAMPLE_CSV: &str = "\
name,price,genres,windows,mac,linux,release_date,num_reviews_total,peak_ccu,developers,header_image,short_description
Portal,9.99,\"['Puzzle', 'Action']\",True,True,False,2007-10-10,120000,500,['Valve'],img/portal.jpg,Think with portals
Warframe,0.0,\"['Action', 'Free To Play']\",True,False,False,2013-03-25,600000,80000,['Digital Extremes'],img/wf.jpg,Ninjas play free
Broken Date,4.99,[],True,False,True,soon,10,1,['Nobody'],img/bd.jpg,Coming
Portal,19.99,\"['Puzzle']\",True,True,True,2007-10-10,130000,600,['Valve'],img/portal2.jpg,Remaster
";

    fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_keeps_header_and_row_count() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "games.csv", SAMPLE_CSV);

        let outcome = DataLoader::read(&path);
        assert_eq!(outcome.status, LoadStatus::Loaded { rows: 4, columns: 12 });
        assert_eq!(outcome.catalog.len(), 4);
        assert_eq!(
            outcome.catalog.column_names(),
            vec![
                "name",
                "price",
                "genres",
                "windows",
                "mac",
                "linux",
                "release_date",
                "num_reviews_total",
                "peak_ccu",
                "developers",
                "header_image",
                "short_description",
            ]
        );
    }

    #[test]
    fn missing_file_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.csv");

        let outcome = DataLoader::read(&path);
        assert!(outcome.catalog.is_empty());
        assert_eq!(outcome.status, LoadStatus::NotFound(path.clone()));

        let quick = DataLoader::load_quick(&path);
        assert_eq!(quick.status, LoadStatus::NotFound(path));
    }

    #[test]
    fn unreadable_csv_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "empty.csv", "");

        let outcome = DataLoader::read(&path);
        assert!(outcome.catalog.is_empty());
        assert!(matches!(outcome.status, LoadStatus::ParseError(_)));
    }

    #[test]
    fn ragged_rows_are_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "ragged.csv",
            "name,price\nPortal,9.99\nWarframe,0.0,Action,True,extra\n",
        );

        let outcome = DataLoader::read(&path);
        assert!(outcome.catalog.is_empty());
        match &outcome.status {
            LoadStatus::ParseError(message) => assert!(!message.is_empty()),
            other => panic!("expected a parse error, got {:?}", other),
        }
        assert!(outcome.status.message().starts_with("Error"));
    }

    #[test]
    fn quick_load_reads_five_rows() {
        let dir = TempDir::new().unwrap();
        let mut contents = String::from("name,price\n");
        for i in 0..20 {
            contents.push_str(&format!("Game {i},{i}.5\n"));
        }
        let path = write_csv(&dir, "many.csv", &contents);

        let outcome = DataLoader::load_quick(&path);
        assert_eq!(outcome.status, LoadStatus::Loaded { rows: 5, columns: 2 });
    }

    #[test]
    fn full_load_is_memoized_per_path() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "games.csv", SAMPLE_CSV);
        let mut loader = DataLoader::new();

        let first = loader.load(&path);
        assert!(first.status.is_loaded());
        assert!(loader.is_cached(&path));

        fs::remove_file(&path).unwrap();
        let second = loader.load(&path);
        assert_eq!(second.status, first.status);
        assert_eq!(second.catalog.len(), 4);

        loader.clear_cache();
        assert!(matches!(loader.load(&path).status, LoadStatus::NotFound(_)));
    }

    #[test]
    fn failed_loads_are_not_memoized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("later.csv");
        let mut loader = DataLoader::new();

        assert!(!loader.load(&path).status.is_loaded());
        write_csv(&dir, "later.csv", SAMPLE_CSV);
        assert!(loader.load(&path).status.is_loaded());
    }

    #[test]
    fn cleaned_catalog_survives_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let raw = write_csv(&dir, "raw.csv", SAMPLE_CSV);
        let cleaned = Cleaner::clean(&DataLoader::read(&raw).catalog);
        assert_eq!(cleaned.len(), 3);

        let out = dir.path().join("processed").join("steam_clean.csv");
        DataLoader::save(&cleaned, &out).unwrap();

        let reloaded = Cleaner::clean(&DataLoader::read(&out).catalog);
        assert_eq!(reloaded.records(), cleaned.records());

        let portal: &GameRecord = &reloaded.records()[2];
        assert_eq!(portal.name.as_deref(), Some("Portal"));
        assert_eq!(portal.price, Some(19.99));
        assert_eq!(portal.genres, vec!["Puzzle".to_string()]);
        assert_eq!(portal.release_date, NaiveDate::from_ymd_opt(2007, 10, 10));
        assert!(portal.windows && portal.mac && portal.linux);
    }

    #[test]
    fn renders_lists_like_the_export() {
        let labels = vec!["Action".to_string(), "Shoot 'Em Up".to_string()];
        assert_eq!(render_list(&labels), "['Action', \"Shoot 'Em Up\"]");
        assert_eq!(render_list(&[]), "[]");
        assert_eq!(Cleaner::parse_genre_list(&render_list(&labels)), labels);
    }
}
