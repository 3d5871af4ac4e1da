//! Elasticsearch REST client
//!
//! Implements [`SearchBackend`] over plain HTTP with `reqwest`. Documents are
//! addressed as `/{index}/{type}/{id}` when mapping types are enabled, and as
//! `/{index}/_doc/{id}` otherwise.

use super::traits::{BackendResult, IndexAnalysis, IndexedDocument, SearchBackend};
use crate::config::{BackendConfig, SecretString};
use crate::domain::{BackendError, DropshareError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Document type segment used by the typeless APIs
const TYPELESS_SEGMENT: &str = "_doc";

/// Elasticsearch implementation of [`SearchBackend`]
///
/// # Example
///
/// ```no_run
/// use dropshare::adapters::search::ElasticsearchClient;
/// use dropshare::config::BackendConfig;
///
/// # fn example() -> dropshare::domain::Result<()> {
/// let client = ElasticsearchClient::new(&BackendConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub struct ElasticsearchClient {
    base_url: Url,
    endpoint: String,
    client: Client,
    username: Option<String>,
    password: Option<SecretString>,
    mapping_types: bool,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<Value>,
}

impl ElasticsearchClient {
    /// Build a client from the backend configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is unusable or the HTTP
    /// client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url).map_err(|e| {
            DropshareError::Configuration(format!("Invalid backend URL {}: {e}", config.url))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(DropshareError::Configuration(format!(
                "Backend URL {} cannot be used as a base URL",
                config.url
            )));
        }

        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                DropshareError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            endpoint: config.url.trim_end_matches('/').to_string(),
            base_url,
            client,
            username: config.username.clone(),
            password: config.password.clone(),
            mapping_types: config.mapping_types,
        })
    }

    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn type_segment<'a>(&self, kind: &'a str) -> &'a str {
        if self.mapping_types {
            kind
        } else {
            TYPELESS_SEGMENT
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(
                username,
                self.password
                    .as_ref()
                    .map(|p| p.expose_secret().as_ref().to_string()),
            ),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        self.authorize(request).send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(e.to_string())
            } else {
                BackendError::ConnectionFailed(e.to_string())
            }
        })
    }

    async fn rejected(response: Response) -> BackendError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        BackendError::Rejected { status, message }
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn index_exists(&self, index: &str) -> BackendResult<bool> {
        let response = self.send(self.client.head(self.url_for(&[index]))).await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::rejected(response).await),
        }
    }

    async fn create_index(&self, index: &str, analysis: IndexAnalysis) -> BackendResult<()> {
        let mut request = self.client.put(self.url_for(&[index]));
        if let Some(body) = analysis.settings_body() {
            request = request.json(&body);
        }

        let response = self.send(request).await?;
        if response.status().is_success() {
            tracing::info!(index = %index, analysis = ?analysis, "Created index");
            return Ok(());
        }

        let error = Self::rejected(response).await;
        match &error {
            BackendError::Rejected { message, .. }
                if message.contains("resource_already_exists_exception")
                    || message.contains("index_already_exists_exception") =>
            {
                tracing::debug!(index = %index, "Index already exists");
                Ok(())
            }
            _ => Err(error),
        }
    }

    async fn index_document(
        &self,
        index: &str,
        kind: &str,
        id: Option<&str>,
        body: &str,
    ) -> BackendResult<IndexedDocument> {
        let kind = self.type_segment(kind);
        let request = match id {
            Some(id) => self.client.put(self.url_for(&[index, kind, id])),
            None => self.client.post(self.url_for(&[index, kind])),
        };

        let response = self
            .send(
                request
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body.to_string()),
            )
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        response
            .json::<IndexedDocument>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    async fn get_document(
        &self,
        index: &str,
        kind: &str,
        id: &str,
    ) -> BackendResult<Option<Value>> {
        let kind = self.type_segment(kind);
        let response = self
            .send(self.client.get(self.url_for(&[index, kind, id])))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body = response
            .json::<GetResponse>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(if body.found { body.source } else { None })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str, mapping_types: bool) -> ElasticsearchClient {
        let config = BackendConfig {
            url: url.to_string(),
            mapping_types,
            ..BackendConfig::default()
        };
        ElasticsearchClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_for_encodes_segments() {
        let es = client("http://localhost:9200", true);
        let url = es.url_for(&["github", "repos", "a/b c"]);
        assert_eq!(url.as_str(), "http://localhost:9200/github/repos/a%2Fb%20c");
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let es = client("https://proxy.example.com/es/", true);
        let url = es.url_for(&["logs"]);
        assert_eq!(url.as_str(), "https://proxy.example.com/es/logs");
        assert_eq!(es.endpoint(), "https://proxy.example.com/es");
    }

    #[test]
    fn test_typeless_segment() {
        assert_eq!(client("http://localhost:9200", true).type_segment("repos"), "repos");
        assert_eq!(client("http://localhost:9200", false).type_segment("repos"), "_doc");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = BackendConfig {
            url: "mailto:ops@example.com".to_string(),
            ..BackendConfig::default()
        };
        assert!(ElasticsearchClient::new(&config).is_err());
    }
}
