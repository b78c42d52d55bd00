//! Data module - catalog loading, cleaning and aggregation

mod aggregator;
mod catalog;
mod cleaner;
mod loader;
mod sample;

pub use aggregator::{
    AggregateSummary, Aggregator, DateRange, GenreExplosion, Measure, NullDatePolicy, Platform,
    PriceRange, ScatterAxis, ScatterPoint, SummaryRow, OTHER_GENRE, TOP_DEVELOPERS, TOP_GENRES,
};
pub use catalog::{columns, numeric_columns, Catalog, GameRecord};
pub use cleaner::Cleaner;
pub use loader::{render_list, DataLoader, LoadOutcome, LoadStatus, LoaderError, PREVIEW_ROWS};
pub use sample::sample_catalog;
