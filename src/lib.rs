//! Commit record enrichment
//!
//! Records extracted from commits go through an ordered pipeline of expanders
//! pulling data from issue trackers (Jira) or user defined APIs. Every
//! expander is built and validated from environment variables before the
//! pipeline runs.

pub mod config;
pub mod enrichment;
pub mod error;
pub mod http;
pub mod models;

pub use error::{AppError, Result};
