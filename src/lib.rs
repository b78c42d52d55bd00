//! Steam Stats - Exploratory data analysis of a Steam game catalog
//!
//! Loads a CSV export of game metadata, cleans it, and aggregates it for an
//! egui dashboard and a few headless commands.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod setup;
pub mod stats;
