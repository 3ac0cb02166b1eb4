use crate::config::settings::{CustomApiSettings, JiraSettings};
use crate::enrichment::clients::{CustomApiClient, JiraClient, RemoteSource};
use crate::error::Result;
use crate::models::{merge_fields, string_field, KeyRule, Record};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Trait for record expanders
#[async_trait]
pub trait Expander: Send + Sync + 'static {
    /// Get expander name
    fn name(&self) -> &str;

    /// Enrich one record in place
    ///
    /// On error the record is left untouched.
    async fn expand(&self, record: &mut Record) -> Result<()>;

    /// Authenticate against the remote service, once per run
    async fn authenticate(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Expander looking up one remote entry per record
///
/// The entry id is read from `record_key`. Records without it are left alone.
pub struct ApiExpander<S: RemoteSource> {
    record_key: String,
    keys: Vec<KeyRule>,
    source: S,
}

/// Expander backed by the Jira issue API
pub type JiraIssueExpander = ApiExpander<JiraClient>;

/// Decorator backed by a user defined API
pub type CustomApiExpander = ApiExpander<CustomApiClient>;

impl<S: RemoteSource> ApiExpander<S> {
    pub fn new(source: S, record_key: impl Into<String>, keys: Vec<KeyRule>) -> Self {
        Self {
            record_key: record_key.into(),
            keys,
            source,
        }
    }

    pub fn record_key(&self) -> &str {
        &self.record_key
    }

    pub fn keys(&self) -> &[KeyRule] {
        &self.keys
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl ApiExpander<JiraClient> {
    pub fn from_settings(client: Client, settings: &JiraSettings) -> Result<Self> {
        let source = JiraClient::new(
            client,
            &settings.url,
            &settings.username,
            &settings.password,
        )?;

        Ok(Self::new(source, settings.record_key.clone(), settings.keys.clone()))
    }
}

impl ApiExpander<CustomApiClient> {
    pub fn from_settings(client: Client, settings: &CustomApiSettings) -> Result<Self> {
        let source = CustomApiClient::new(client, &settings.url_template, &settings.token)?;

        Ok(Self::new(source, settings.record_key.clone(), settings.keys.clone()))
    }
}

#[async_trait]
impl<S: RemoteSource> Expander for ApiExpander<S> {
    fn name(&self) -> &str {
        self.source.name()
    }

    async fn expand(&self, record: &mut Record) -> Result<()> {
        let id = match string_field(record, &self.record_key) {
            Some(id) => id.to_string(),
            None => return Ok(()),
        };

        let payload = self.source.fetch(&id).await?;
        let merged = merge_fields(record, &payload, &self.keys);

        debug!(
            expander = self.name(),
            id = %id,
            merged,
            "Record expanded"
        );

        Ok(())
    }

    async fn authenticate(&self) -> Result<bool> {
        self.source.authenticate().await
    }
}
