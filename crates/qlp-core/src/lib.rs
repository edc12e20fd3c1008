//! Core types shared by the Quake log parser crates: the error type, the
//! report model, the cause-of-death catalog and configuration.

pub mod config;
pub mod error;
pub mod means;
pub mod models;
pub mod settings;

pub use error::{QlpError, Result};
