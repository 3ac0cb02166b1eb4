use crate::enrichment::expanders::Expander;
use crate::error::{AppError, Result};
use crate::models::Record;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Expander pipeline applies every expander to every record, in order
#[derive(Default)]
pub struct ExpanderPipeline {
    /// Registered expanders, in declaration order
    expanders: Vec<Arc<dyn Expander>>,
}

impl ExpanderPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an expander after the ones already registered
    pub fn register_expander(&mut self, expander: Arc<dyn Expander>) {
        debug!("Registered expander: {}", expander.name());
        self.expanders.push(expander);
    }

    /// Get expander count
    pub fn expander_count(&self) -> usize {
        self.expanders.len()
    }

    /// Names of the registered expanders, in order
    pub fn expander_names(&self) -> Vec<&str> {
        self.expanders.iter().map(|e| e.name()).collect()
    }

    /// Authenticate every expander once
    pub async fn authenticate(&self) -> Result<()> {
        for expander in &self.expanders {
            if !expander.authenticate().await? {
                error!(expander = expander.name(), "Authentication refused");
                return Err(AppError::Authentication(format!(
                    "{} refused the provided credentials",
                    expander.name()
                )));
            }

            debug!(expander = expander.name(), "Authenticated");
        }

        Ok(())
    }

    /// Run all expanders over all records
    ///
    /// The first failure aborts the whole batch, no partial output is
    /// returned.
    pub async fn run(&self, records: Vec<Record>) -> Result<Vec<Record>> {
        let start = Instant::now();
        let total = records.len();
        let mut results = Vec::with_capacity(total);

        for (index, mut record) in records.into_iter().enumerate() {
            for expander in &self.expanders {
                if let Err(e) = expander.expand(&mut record).await {
                    error!(
                        expander = expander.name(),
                        record = index,
                        error = %e,
                        "Expansion aborted"
                    );
                    return Err(e);
                }
            }

            results.push(record);
        }

        info!(
            "Expanded {} records with {} expanders in {}ms",
            total,
            self.expanders.len(),
            start.elapsed().as_millis()
        );

        Ok(results)
    }
}
