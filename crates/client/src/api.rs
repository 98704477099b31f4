use crate::error::{ClientError, ClientResult};
use crate::types::{AnalyzeReply, ChunkListing, QueryRequest, UploadReceipt};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const UPLOAD_ENDPOINT: &str = "upload/";
pub const ANALYZE_ENDPOINT: &str = "analyze/query";
pub const LIST_CHUNKS_ENDPOINT: &str = "analyze/list_chunks";
pub const HEALTH_ENDPOINT: &str = "";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    pub top_k: Option<u32>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: None,
            top_k: None,
        }
    }
}

#[derive(Clone)]
pub struct AnalysisClient {
    http: Client,
    base_url: Url,
    top_k: Option<u32>,
}

impl AnalysisClient {
    pub fn new(options: &ClientOptions) -> ClientResult<Self> {
        let base_url = parse_base_url(&options.base_url)?;

        let mut builder = Client::builder()
            .user_agent("codelens/0.1")
            .connect_timeout(options.connect_timeout);
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::HttpClient)?;

        Ok(Self {
            http,
            base_url,
            top_k: options.top_k,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, endpoint: &'static str) -> ClientResult<Url> {
        self.base_url
            .join(endpoint)
            .map_err(|source| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source,
            })
    }

    /// Uploads the file at `path` under the multipart field `file`.
    pub async fn upload_file(&self, path: &Path) -> ClientResult<UploadReceipt> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        self.upload_bytes(file_name, bytes).await
    }

    pub async fn upload_bytes(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadReceipt> {
        info!(file = %file_name, size = bytes.len(), "Uploading file");

        let form = Form::new().part(UPLOAD_FIELD, Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(self.endpoint(UPLOAD_ENDPOINT)?)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::network(UPLOAD_ENDPOINT))?;

        let body = read_json(UPLOAD_ENDPOINT, response).await?;
        let receipt = UploadReceipt::from_body(&body);
        debug!(message = %receipt.message, "Upload acknowledged");
        Ok(receipt)
    }

    pub async fn analyze(&self, query: &str) -> ClientResult<AnalyzeReply> {
        info!(query_len = query.len(), "Sending analyze query");

        let response = self
            .http
            .post(self.endpoint(ANALYZE_ENDPOINT)?)
            .json(&QueryRequest {
                query,
                top_k: self.top_k,
            })
            .send()
            .await
            .map_err(ClientError::network(ANALYZE_ENDPOINT))?;

        let body = read_json(ANALYZE_ENDPOINT, response).await?;
        let reply = AnalyzeReply::from_body(&body);
        debug!(
            structured = reply.result.is_structured(),
            sources = reply.sources.len(),
            "Analyze response received"
        );
        Ok(reply)
    }

    pub async fn list_chunks(&self, limit: u32) -> ClientResult<ChunkListing> {
        let response = self
            .http
            .get(self.endpoint(LIST_CHUNKS_ENDPOINT)?)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(ClientError::network(LIST_CHUNKS_ENDPOINT))?;

        let body = read_json(LIST_CHUNKS_ENDPOINT, response).await?;
        serde_json::from_value(body).map_err(|e| ClientError::parse(LIST_CHUNKS_ENDPOINT, e))
    }

    /// Probes the service root and returns its welcome message.
    pub async fn health_check(&self) -> ClientResult<String> {
        let response = self
            .http
            .get(self.endpoint(HEALTH_ENDPOINT)?)
            .send()
            .await
            .map_err(ClientError::network(HEALTH_ENDPOINT))?;

        let body = read_json(HEALTH_ENDPOINT, response).await?;
        Ok(body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("online")
            .to_string())
    }
}

/// The base URL always ends in `/` so joining keeps any path prefix.
fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalized).map_err(|source| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }
    Ok(url)
}

async fn read_json(endpoint: &'static str, response: Response) -> ClientResult<Value> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status { endpoint, status });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(ClientError::network(endpoint))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::parse(endpoint, e))
}
