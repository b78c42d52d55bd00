//! Sample Data Module
//! Deterministic synthetic catalog shown when the dataset file is missing.

use super::catalog::{Catalog, GameRecord};
use chrono::NaiveDate;
use polars::prelude::PolarsResult;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SAMPLE_GENRES: [&str; 8] = [
    "Action",
    "Adventure",
    "RPG",
    "Strategy",
    "Simulation",
    "Sports",
    "Racing",
    "Puzzle",
];

const MEAN_PRICE: f64 = 15.0;
const MEAN_REVIEWS: f64 = 1000.0;

/// Draw from an exponential distribution with the given mean.
fn exponential(rng: &mut StdRng, mean: f64) -> f64 {
    let u: f64 = rng.gen();
    -mean * (1.0 - u).ln()
}

/// Build `n_games` synthetic games. The same seed always gives the same catalog.
pub fn sample_catalog(n_games: usize, seed: u64) -> PolarsResult<Catalog> {
    let mut rng = StdRng::seed_from_u64(seed);

    let records: Vec<GameRecord> = (0..n_games)
        .map(|i| {
            let genre_count = rng.gen_range(1..=3);
            let genres: Vec<String> = SAMPLE_GENRES
                .choose_multiple(&mut rng, genre_count)
                .map(|g| g.to_string())
                .collect();

            let price = (exponential(&mut rng, MEAN_PRICE) * 100.0).round() / 100.0;
            let total_reviews = exponential(&mut rng, MEAN_REVIEWS) as u64;
            let release_date = NaiveDate::from_ymd_opt(
                rng.gen_range(2010..2024),
                rng.gen_range(1..=12),
                rng.gen_range(1..=28),
            );

            GameRecord {
                price: Some(price),
                genres,
                windows: rng.gen_bool(0.9),
                mac: rng.gen_bool(0.3),
                linux: rng.gen_bool(0.2),
                release_date,
                total_reviews,
                peak_ccu: total_reviews / 10,
                developers: Some(format!("Studio {}", i % 25)),
                publishers: Some(format!("Publisher {}", i % 10)),
                short_description: Some(format!("Sample game number {}", i)),
                header_image: None,
                ..GameRecord::named(&format!("Game_{}", i))
            }
        })
        .collect();

    Catalog::from_records(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Cleaner;

    #[test]
    fn sample_is_deterministic() {
        let a = sample_catalog(50, 42).unwrap();
        let b = sample_catalog(50, 42).unwrap();
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn sample_is_already_clean() {
        let sample = sample_catalog(200, 7).unwrap();
        assert_eq!(sample.len(), 200);

        let records = sample.records();
        assert!(records.iter().all(|r| (1..=3).contains(&r.genres.len())));
        assert!(records.iter().all(|r| r.price.is_some_and(|p| p >= 0.0)));
        assert!(records.iter().all(|r| r.release_date.is_some()));

        assert_eq!(Cleaner::clean(&sample).records(), records);
    }
}
