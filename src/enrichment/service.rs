use crate::config::{RuntimeConfig, Settings};
use crate::enrichment::expanders::{CustomApiExpander, JiraIssueExpander};
use crate::enrichment::pipeline::ExpanderPipeline;
use crate::error::Result;
use crate::http::build_client;
use crate::models::Record;
use std::sync::Arc;
use tracing::{info, warn};

/// Expansion service turns validated settings into a runnable pipeline
pub struct ExpansionService {
    pipeline: ExpanderPipeline,
}

impl ExpansionService {
    /// Create a new expansion service
    ///
    /// Expanders are registered in declaration order: Jira first, then the
    /// custom API decorator.
    pub fn new(settings: &Settings, runtime: &RuntimeConfig) -> Result<Self> {
        let client = build_client(runtime.http_timeout_secs, &runtime.user_agent)?;
        let mut pipeline = ExpanderPipeline::new();

        if let Some(jira) = &settings.jira {
            let expander = JiraIssueExpander::from_settings(client.clone(), jira)?;
            pipeline.register_expander(Arc::new(expander));
        }

        if let Some(custom_api) = &settings.custom_api {
            let expander = CustomApiExpander::from_settings(client, custom_api)?;
            pipeline.register_expander(Arc::new(expander));
        }

        if pipeline.expander_count() == 0 {
            warn!("No expander configured, records will pass through unchanged");
        }

        Ok(Self::with_pipeline(pipeline))
    }

    /// Create a service around an already built pipeline
    pub fn with_pipeline(pipeline: ExpanderPipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &ExpanderPipeline {
        &self.pipeline
    }

    /// Get expander count
    pub fn expander_count(&self) -> usize {
        self.pipeline.expander_count()
    }

    /// Authenticate every expander, must be called before `process`
    pub async fn authenticate(&self) -> Result<()> {
        self.pipeline.authenticate().await
    }

    /// Expand a batch of records
    pub async fn process(&self, records: Vec<Record>) -> Result<Vec<Record>> {
        info!(
            "🚀 Expanding {} records through [{}]",
            records.len(),
            self.pipeline.expander_names().join(", ")
        );

        self.pipeline.run(records).await
    }
}
