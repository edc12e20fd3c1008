//! Batch runtime for the Quake log parser.
//!
//! Runs one independent pipeline per log file, concurrently, and gathers the
//! outcomes in input order.

pub mod orchestrator;
