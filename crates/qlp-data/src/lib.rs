//! Log ingestion and evaluation for the Quake log parser.
//!
//! Responsible for loading log files, segmenting them into matches and kill
//! events, extracting rosters, classifying kills, aggregating per-match
//! statistics and writing the resulting JSON report.

pub mod aggregator;
pub mod analysis;
pub mod classifier;
pub mod reader;
pub mod roster;
pub mod segmenter;
pub mod writer;

pub use qlp_core as core;
