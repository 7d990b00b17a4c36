//! Core backend client: authenticated requests against the hosted
//! PostgREST API and storage endpoints.

use reqwest::Method;

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {0}")]
    Status(reqwest::StatusCode),
    #[error("insert returned no row")]
    MissingRow,
    #[error("missing or malformed count header")]
    InvalidCount,
}

/// Anonymous-key client for the hosted backend. Cheap to clone; all
/// methods borrow `&self`.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("top5/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    pub(crate) fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{function}", self.base_url)
    }

    /// Start a request with the anon-key auth headers applied.
    pub(crate) fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    pub(crate) fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SupabaseError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(SupabaseError::Status(resp.status()))
        }
    }

    /// Public (unauthenticated) URL of a stored object.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }

    /// Upload an object, replacing any existing one at the same path.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        let url = format!("{}/storage/v1/object/{bucket}/{path}", self.base_url);
        let resp = self
            .request(Method::POST, &url)
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        Self::check_status(resp)?;
        tracing::debug!(bucket, path, "Uploaded storage object");
        Ok(())
    }
}
