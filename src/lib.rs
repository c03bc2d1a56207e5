//! Rivalcal - recruitment schedule overlap calendar
//!
//! This library provides the core functionality for Rivalcal, including:
//! - Normalization of raw company hiring schedules
//! - Per-day competitor overlap and heat-map intensity
//! - Advisory insights comparing pinned stages against competitors
//! - Request sequencing and debouncing for schedule fetches
//! - Durable pin storage and configuration
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use rivalcal::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod config;
pub mod db;
pub mod fetch;
pub mod insight;
pub mod models;
pub mod normalize;
pub mod overlap;
pub mod repo;
pub mod state;
pub mod cli;
pub mod utils;
