use crate::error::{AppError, Result};
use crate::http::{fetch_json, send_request, set_headers};
use async_trait::async_trait;
use regex::{NoExpand, Regex};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::form_urlencoded::byte_serialize;

/// Remote service able to return one payload per identifier
#[async_trait]
pub trait RemoteSource: Send + Sync + 'static {
    /// Integration name
    fn name(&self) -> &str;

    /// Fetch the payload describing `id`
    async fn fetch(&self, id: &str) -> Result<Value>;

    /// Open a session, called once before any fetch
    async fn authenticate(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Jira REST client
pub struct JiraClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
    /// `name=value` cookie acquired by `authenticate`
    session: RwLock<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session: SessionInfo,
}

#[derive(Debug, Deserialize)]
struct SessionInfo {
    name: String,
    value: String,
}

impl JiraClient {
    pub fn new(client: Client, url: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = Url::parse(url).map_err(|_| {
            AppError::Validation(format!(
                r#""{}" is not a valid absolute URL defined in "JIRA" config"#,
                url
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                r#""{}" is not a valid absolute URL defined in "JIRA" config"#,
                url
            )));
        }

        Ok(Self {
            client,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
            session: RwLock::new(None),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| AppError::Validation(format!("{} can't be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Whether a session cookie was acquired
    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }
}

#[async_trait]
impl RemoteSource for JiraClient {
    fn name(&self) -> &str {
        "jira"
    }

    async fn fetch(&self, id: &str) -> Result<Value> {
        let url = self.endpoint(&["rest", "api", "2", "issue", id])?;

        let mut request = self.client.get(url);
        request = match self.session.read().await.as_deref() {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie),
            None => request.basic_auth(&self.username, Some(&self.password)),
        };

        let mut request = request.build()?;
        set_headers(&mut request, [("Accept", "application/json")])?;

        debug!(issue = id, "Fetching jira issue");

        fetch_json(&self.client, request).await
    }

    async fn authenticate(&self) -> Result<bool> {
        let url = self.endpoint(&["rest", "auth", "1", "session"])?;
        let target = url.to_string();

        let request = self
            .client
            .post(url)
            .json(&json!({
                "username": self.username,
                "password": self.password,
            }))
            .build()?;

        let (status, body) = send_request(&self.client, request).await?;

        if !status.is_success() {
            return Err(AppError::Authentication(format!(
                "jira session request to {} returned status {}",
                target,
                status.as_u16()
            )));
        }

        match serde_json::from_slice::<SessionResponse>(&body) {
            Ok(response) => {
                let cookie = format!("{}={}", response.session.name, response.session.value);
                *self.session.write().await = Some(cookie);
                info!(user = %self.username, "Jira session acquired");
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Jira answered without a session");
                Ok(false)
            }
        }
    }
}

/// Client for a user defined JSON API
///
/// The endpoint is a URL template holding a `{{ID}}` placeholder.
pub struct CustomApiClient {
    client: Client,
    url_template: String,
    token: String,
    placeholder: Regex,
}

impl CustomApiClient {
    pub fn new(client: Client, url_template: &str, token: &str) -> Result<Self> {
        let placeholder = Regex::new(r"\{\{\s*ID\s*\}\}")
            .map_err(|e| AppError::Validation(format!("invalid placeholder pattern: {}", e)))?;

        Ok(Self {
            client,
            url_template: url_template.to_string(),
            token: token.to_string(),
            placeholder,
        })
    }

    /// URL targeted for `id`, the id is percent-encoded as a single segment
    pub fn url_for(&self, id: &str) -> Result<Url> {
        // byte_serialize turns spaces into '+' and a literal '+' into %2B
        let encoded = byte_serialize(id.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        let raw = self
            .placeholder
            .replace_all(&self.url_template, NoExpand(encoded.as_str()));

        Url::parse(&raw).map_err(|e| {
            AppError::Validation(format!("invalid custom api URL {}: {}", raw, e))
        })
    }
}

#[async_trait]
impl RemoteSource for CustomApiClient {
    fn name(&self) -> &str {
        "customapi"
    }

    async fn fetch(&self, id: &str) -> Result<Value> {
        let mut request = self.client.get(self.url_for(id)?).build()?;

        set_headers(
            &mut request,
            [
                ("Authorization", format!("token {}", self.token)),
                ("Content-Type", "application/json".to_string()),
            ],
        )?;

        debug!(id, "Fetching custom api entry");

        fetch_json(&self.client, request).await
    }
}
