//! Remote sync client
//!
//! HTTP client for a JSON collection endpoint that answers `GET` with an
//! array of records and accepts `POST`ed quotes.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::Quote;

/// Identifier of the group that owns a remote record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RemoteGroupId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RemoteGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteGroupId::Number(id) => write!(f, "{}", id),
            RemoteGroupId::Text(id) => f.write_str(id),
        }
    }
}

/// A record as served by the remote endpoint
///
/// Only the fields used for mapping are kept; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRecord {
    pub title: String,
    #[serde(rename = "userId")]
    pub user_id: RemoteGroupId,
}

impl RemoteRecord {
    /// Lossy mapping into local shape
    pub fn into_quote(self) -> Quote {
        Quote {
            text: self.title,
            category: format!("Server-{}", self.user_id),
        }
    }
}

/// What the remote sends back after a push
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteAck {
    /// Remote-assigned id, if any
    #[serde(default)]
    pub id: Option<u64>,
    /// Everything else the remote echoed
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A remote quote collection
///
/// Neither operation fails outward: fetch degrades to an empty list and
/// push to `None`.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch remote quotes, already mapped and capped
    async fn fetch_remote(&self) -> Vec<Quote>;

    /// Push one quote, returning the remote acknowledgement
    async fn push_quote(&self, quote: &Quote) -> Option<RemoteAck>;
}

/// `RemoteSource` over HTTP
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    url: String,
    fetch_limit: usize,
}

impl HttpRemote {
    /// Create a client for `url`
    pub fn new(url: &str, fetch_limit: usize, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quotebook/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            fetch_limit,
        })
    }

    /// Create a client from the configured endpoint, limit and timeout
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.remote_url,
            config.fetch_limit,
            config.request_timeout(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn try_fetch(&self) -> Result<Vec<Quote>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", self.url))?
            .error_for_status()?;

        let records: Vec<Value> = response
            .json()
            .await
            .context("Remote response is not a list of records")?;

        // Records past the limit are never looked at
        Ok(records
            .into_iter()
            .take(self.fetch_limit)
            .filter_map(|record| match serde_json::from_value::<RemoteRecord>(record) {
                Ok(record) => Some(record.into_quote()),
                Err(e) => {
                    warn!("Skipping malformed remote record: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn try_push(&self, quote: &Quote) -> Result<RemoteAck> {
        let response = self
            .client
            .post(&self.url)
            .json(quote)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.url))?
            .error_for_status()?;

        response
            .json()
            .await
            .context("Remote acknowledgement is not a JSON object")
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn fetch_remote(&self) -> Vec<Quote> {
        match self.try_fetch().await {
            Ok(quotes) => {
                debug!("Fetched {} quotes from {}", quotes.len(), self.url);
                quotes
            }
            Err(e) => {
                warn!("Failed to fetch from server: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn push_quote(&self, quote: &Quote) -> Option<RemoteAck> {
        match self.try_push(quote).await {
            Ok(ack) => {
                info!("Quote posted to server (id={:?})", ack.id);
                Some(ack)
            }
            Err(e) => {
                warn!("Failed to post quote to server: {:#}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn remote_for(server: &MockServer, limit: usize) -> HttpRemote {
        HttpRemote::new(
            &format!("{}/posts", server.uri()),
            limit,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn posts(count: u64) -> Value {
        Value::Array(
            (1..=count)
                .map(|id| {
                    json!({
                        "userId": (id + 1) / 2,
                        "id": id,
                        "title": format!("title {}", id),
                        "body": "ignored"
                    })
                })
                .collect(),
        )
    }

    #[test]
    fn test_record_mapping() {
        let record: RemoteRecord =
            serde_json::from_value(json!({ "userId": 3, "id": 9, "title": "Hello" })).unwrap();
        assert_eq!(record.into_quote(), Quote::new("Hello", "Server-3").unwrap());

        let record: RemoteRecord =
            serde_json::from_value(json!({ "userId": "team-a", "title": "Hi" })).unwrap();
        assert_eq!(record.into_quote().category, "Server-team-a");
    }

    #[tokio::test]
    async fn test_fetch_maps_and_caps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts(25)))
            .mount(&server)
            .await;

        let quotes = remote_for(&server, 10).fetch_remote().await;

        assert_eq!(quotes.len(), 10);
        assert_eq!(quotes[0], Quote::new("title 1", "Server-1").unwrap());
        assert_eq!(quotes[9], Quote::new("title 10", "Server-5").unwrap());
    }

    #[tokio::test]
    async fn test_fetch_ignores_bad_records_past_limit() {
        let server = MockServer::start().await;
        let mut body = posts(10);
        if let Value::Array(records) = &mut body {
            records.push(json!({ "userId": 6, "id": 11, "body": "no title" }));
        }
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let quotes = remote_for(&server, 10).fetch_remote().await;

        assert_eq!(quotes.len(), 10);
        assert_eq!(quotes[9], Quote::new("title 10", "Server-5").unwrap());
    }

    #[tokio::test]
    async fn test_fetch_skips_bad_record_within_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "userId": 1, "id": 1, "title": "first" },
                { "userId": 1, "id": 2, "title": null },
                { "userId": 2, "id": 3, "title": "third" }
            ])))
            .mount(&server)
            .await;

        let quotes = remote_for(&server, 10).fetch_remote().await;

        assert_eq!(
            quotes,
            vec![
                Quote::new("first", "Server-1").unwrap(),
                Quote::new("third", "Server-2").unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(remote_for(&server, 10).fetch_remote().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_non_array_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "posts": [] })))
            .mount(&server)
            .await;

        assert!(remote_for(&server, 10).fetch_remote().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_empty() {
        let remote = HttpRemote::new("http://127.0.0.1:9/posts", 10, Duration::from_secs(1)).unwrap();
        assert!(remote.fetch_remote().await.is_empty());
    }

    #[tokio::test]
    async fn test_push_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "text": "Stay curious", "category": "Wisdom" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "text": "Stay curious",
                "category": "Wisdom",
                "id": 101
            })))
            .expect(1)
            .mount(&server)
            .await;

        let quote = Quote::new("Stay curious", "Wisdom").unwrap();
        let ack = remote_for(&server, 10).push_quote(&quote).await.unwrap();

        assert_eq!(ack.id, Some(101));
        assert_eq!(ack.fields.get("text"), Some(&json!("Stay curious")));
    }

    #[tokio::test]
    async fn test_push_failure_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let quote = Quote::new("Stay curious", "Wisdom").unwrap();
        assert!(remote_for(&server, 10).push_quote(&quote).await.is_none());
    }
}
