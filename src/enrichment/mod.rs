/// Record enrichment module
///
/// This module provides the expansion of commit records:
/// - Remote clients for Jira and user defined APIs
/// - Expanders merging remote fields into records
/// - Sequential, fail fast pipeline
/// - Service wiring settings into a pipeline

pub mod clients;
pub mod expanders;
pub mod pipeline;
pub mod service;

pub use clients::{CustomApiClient, JiraClient, RemoteSource};
pub use expanders::{ApiExpander, CustomApiExpander, Expander, JiraIssueExpander};
pub use pipeline::ExpanderPipeline;
pub use service::ExpansionService;
