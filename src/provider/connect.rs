//! Amazon Connect provider using the public REST API.
//!
//! Requests are signed with SigV4 and sent with `reqwest`. Two operations
//! are implemented:
//!
//! - `ListQueues` (`GET /queues-summary/{InstanceId}`)
//! - `GetCurrentMetricData` (`POST /metrics/current/{InstanceId}`)
//!
//! Both follow `NextToken` pagination and return merged results.
//!
//! ## Example
//!
//! ```rust,no_run
//! use connect_wallboard::config::Credentials;
//! use connect_wallboard::provider::{ConnectClient, MetricsProvider};
//!
//! # tokio_test::block_on(async {
//! let client = ConnectClient::builder()
//!     .region("us-west-2")
//!     .credentials(Credentials::new("AKIA...", "secret"))
//!     .build();
//!
//! let queues = client.list_queues("instance-id", &["STANDARD".to_string()]).await;
//! # });
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::signing::{canonical_query, uri_encode, RequestParts, Signer};
use super::types::{CurrentMetricData, CurrentMetricRequest, ListQueuesPage, QueueSummary};
use super::MetricsProvider;
use crate::config::{Credentials, WallboardConfig};
use crate::error::ProviderError;

const SERVICE: &str = "connect";
const PAGE_SIZE: &str = "100";
// Guards against a service that keeps returning the same token.
const MAX_PAGES: usize = 50;

/// Amazon Connect API client.
#[derive(Debug, Clone)]
pub struct ConnectClient {
    client: Client,
    endpoint: String,
    host: String,
    signer: Signer,
}

impl ConnectClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ConnectClientBuilder {
        ConnectClientBuilder::default()
    }

    /// Build a client from the wallboard configuration.
    pub fn from_config(config: &WallboardConfig) -> Self {
        let mut builder = Self::builder()
            .region(config.region.clone())
            .credentials(config.credentials.clone());
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint(endpoint.clone());
        }
        builder.build()
    }

    /// The base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> Result<T, ProviderError> {
        let payload = body.unwrap_or_default();
        let headers = self.signer.sign(
            &RequestParts {
                method: method.as_str(),
                host: &self.host,
                path,
                query,
                payload: &payload,
            },
            Utc::now(),
        );

        let mut url = format!("{}{}", self.endpoint, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&canonical_query(query));
        }

        debug!(%method, %url, "Calling Amazon Connect");

        let mut request = self.client.request(method.clone(), &url);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        if method == Method::POST {
            request = request.header("content-type", "application/json").body(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(classify_error(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MetricsProvider for ConnectClient {
    async fn list_queues(
        &self,
        instance_id: &str,
        queue_types: &[String],
    ) -> Result<Vec<QueueSummary>, ProviderError> {
        let path = format!("/queues-summary/{}", uri_encode(instance_id, true));
        let mut queues = Vec::new();
        let mut next_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut query: Vec<(String, String)> =
                vec![("maxResults".to_string(), PAGE_SIZE.to_string())];
            for queue_type in queue_types {
                query.push(("queueTypes".to_string(), queue_type.clone()));
            }
            if let Some(token) = &next_token {
                query.push(("nextToken".to_string(), token.clone()));
            }

            let page: ListQueuesPage = self.call(Method::GET, &path, &query, None).await?;
            queues.extend(page.queue_summary_list);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => return Ok(queues),
            }
        }

        Ok(queues)
    }

    async fn get_current_metric_data(
        &self,
        instance_id: &str,
        request: &CurrentMetricRequest,
    ) -> Result<CurrentMetricData, ProviderError> {
        let path = format!("/metrics/current/{}", uri_encode(instance_id, true));
        let mut request = request.clone();
        request.next_token = None;

        let mut merged: Option<CurrentMetricData> = None;
        for _ in 0..MAX_PAGES {
            let body = serde_json::to_vec(&request).map_err(|e| ProviderError::Parse(e.to_string()))?;
            let page: CurrentMetricData = self.call(Method::POST, &path, &[], Some(body)).await?;
            let next_token = page.next_token.clone().filter(|t| !t.is_empty());

            match merged.as_mut() {
                Some(data) => data.merge_page(page),
                None => merged = Some(page),
            }

            match next_token {
                Some(token) => request.next_token = Some(token),
                None => break,
            }
        }

        merged.ok_or_else(|| ProviderError::Parse("empty response".to_string()))
    }

    fn description(&self) -> String {
        format!("connect: {}", self.host)
    }
}

/// Map a non-success response onto a provider error.
fn classify_error(status: StatusCode, body: &[u8]) -> ProviderError {
    let message = error_message(body).unwrap_or_else(|| {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::Throttled(message),
        _ => ProviderError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extract the `message` field of an AWS JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "Message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|m| m.as_str()))
        .map(|m| m.to_string())
}

/// Builder for ConnectClient.
#[derive(Debug, Default)]
pub struct ConnectClientBuilder {
    region: Option<String>,
    credentials: Option<Credentials>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    no_proxy: bool,
}

impl ConnectClientBuilder {
    /// Set the AWS region (default: "us-east-1").
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the credentials used to sign requests.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the API endpoint (default: `https://connect.{region}.amazonaws.com`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ignore `HTTPS_PROXY` and friends, e.g. for a local endpoint.
    pub fn no_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    /// Build the client.
    pub fn build(self) -> ConnectClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));
        let region = self.region.unwrap_or_else(|| "us-east-1".to_string());

        let mut client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("connect-wallboard/", env!("CARGO_PKG_VERSION")));
        if self.no_proxy {
            client = client.no_proxy();
        }
        let client = client.build().unwrap_or_else(|_| Client::new());

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| format!("https://connect.{}.amazonaws.com", region))
            .trim_end_matches('/')
            .to_string();
        let host = host_of(&endpoint);

        let credentials = self
            .credentials
            .unwrap_or_else(|| Credentials::new(String::new(), String::new()));

        ConnectClient {
            client,
            signer: Signer::new(credentials, &region, SERVICE),
            endpoint,
            host,
        }
    }
}

/// Host (and port, if any) of an endpoint URL.
fn host_of(endpoint: &str) -> String {
    let without_scheme = endpoint
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(endpoint);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CurrentMetric, Filters};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_builder_defaults() {
        let client = ConnectClient::builder().build();
        assert_eq!(client.endpoint, "https://connect.us-east-1.amazonaws.com");
        assert_eq!(client.host, "connect.us-east-1.amazonaws.com");
        assert_eq!(client.description(), "connect: connect.us-east-1.amazonaws.com");
    }

    #[test]
    fn test_builder_custom() {
        let client = ConnectClient::builder()
            .region("eu-central-1")
            .endpoint("http://localhost:4566/")
            .timeout(Duration::from_secs(2))
            .build();
        assert_eq!(client.endpoint, "http://localhost:4566");
        assert_eq!(client.host, "localhost:4566");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://connect.us-west-2.amazonaws.com"), "connect.us-west-2.amazonaws.com");
        assert_eq!(host_of("http://127.0.0.1:8080/prefix"), "127.0.0.1:8080");
        assert_eq!(host_of("localhost"), "localhost");
    }

    #[test]
    fn test_classify_error() {
        let err = classify_error(StatusCode::FORBIDDEN, br#"{"Message":"not authorized"}"#);
        assert!(matches!(err, ProviderError::Auth(ref m) if m == "not authorized"));

        let err = classify_error(StatusCode::TOO_MANY_REQUESTS, br#"{"message":"Rate exceeded"}"#);
        assert!(matches!(err, ProviderError::Throttled(ref m) if m == "Rate exceeded"));

        let err = classify_error(StatusCode::INTERNAL_SERVER_ERROR, b"<html>");
        assert!(matches!(
            err,
            ProviderError::Http { status: 500, ref message } if message == "Internal Server Error"
        ));
    }

    /// Serve canned responses, one per connection, recording each request.
    async fn serve(responses: Vec<(u16, String)>) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    let text = String::from_utf8_lossy(&buf).to_string();
                    if let Some(head_end) = text.find("\r\n\r\n") {
                        let content_length = text[..head_end]
                            .lines()
                            .find_map(|l| {
                                l.to_ascii_lowercase()
                                    .strip_prefix("content-length:")
                                    .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                            })
                            .unwrap_or(0);
                        if buf.len() >= head_end + 4 + content_length {
                            break;
                        }
                    }
                }
                requests.push(String::from_utf8_lossy(&buf).to_string());

                let response = format!(
                    "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            requests
        });

        (format!("http://{}", addr), handle)
    }

    fn test_client(endpoint: &str) -> ConnectClient {
        ConnectClient::builder()
            .region("us-west-2")
            .credentials(Credentials::new("AKIDEXAMPLE", "secret"))
            .endpoint(endpoint)
            .no_proxy()
            .build()
    }

    #[tokio::test]
    async fn test_list_queues_follows_pagination() {
        let (endpoint, server) = serve(vec![
            (
                200,
                r#"{"QueueSummaryList":[{"Id":"q-1","Name":"Sales"}],"NextToken":"t2"}"#.to_string(),
            ),
            (200, r#"{"QueueSummaryList":[{"Id":"q-2","Name":"Support"}]}"#.to_string()),
        ])
        .await;

        let client = test_client(&endpoint);
        let queues = client
            .list_queues("inst-1", &["STANDARD".to_string()])
            .await
            .unwrap();

        assert_eq!(queues, vec![QueueSummary::new("q-1", "Sales"), QueueSummary::new("q-2", "Support")]);

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with(
            "GET /queues-summary/inst-1?maxResults=100&queueTypes=STANDARD HTTP/1.1"
        ));
        assert!(requests[1].contains("nextToken=t2"));
        assert!(requests[0].to_ascii_lowercase().contains("authorization: aws4-hmac-sha256"));
    }

    #[tokio::test]
    async fn test_metric_data_posts_json_and_maps_auth_errors() {
        let (endpoint, server) = serve(vec![
            (
                200,
                r#"{"DataSnapshotTime":1704067200,"MetricResults":[{"Collections":[{"Metric":{"Name":"CONTACTS_IN_QUEUE","Unit":"COUNT"},"Value":3}]}]}"#.to_string(),
            ),
            (403, r#"{"Message":"User is not authorized"}"#.to_string()),
        ])
        .await;

        let client = test_client(&endpoint);
        let request = CurrentMetricRequest {
            filters: Filters {
                queues: vec!["q-1".into()],
                channels: Vec::new(),
            },
            groupings: Vec::new(),
            current_metrics: vec![CurrentMetric::new("CONTACTS_IN_QUEUE", "COUNT")],
            next_token: None,
        };

        let data = client.get_current_metric_data("inst-1", &request).await.unwrap();
        assert_eq!(data.metric_results.len(), 1);
        assert_eq!(data.metric_results[0].collections[0].value, Some(3.0));

        let err = client.get_current_metric_data("inst-1", &request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Auth(_)));

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("POST /metrics/current/inst-1 HTTP/1.1"));
        assert!(requests[0].contains(r#""Queues":["q-1"]"#));
    }
}
