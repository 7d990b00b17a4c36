//! Turning an image locator into an embedded representation: direct load
//! first, then an ordered list of relay endpoints, then give up.

use std::time::Duration;

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;

use crate::data_url;

/// Bound on the direct load attempt.
pub const DIRECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Bound on each individual relay attempt.
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(5);

/// JPEG quality for direct-load re-encoding.
const JPEG_QUALITY: u8 = 90;

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("invalid embedded image data")]
    InvalidDataUrl,
    #[error("all image relays failed")]
    AllProxiesFailed,
}

/// One relay endpoint, expressed as a URL template with a `{url}`
/// placeholder. Relays are tried in order with early exit on first
/// success.
#[derive(Debug, Clone)]
pub struct ProxyEndpoint {
    template: String,
    /// Whether the target URL is percent-encoded before substitution.
    encode_target: bool,
}

impl ProxyEndpoint {
    pub fn new(template: impl Into<String>, encode_target: bool) -> Self {
        Self {
            template: template.into(),
            encode_target,
        }
    }

    /// Substitute the target URL into the template.
    pub fn wrap(&self, target: &str) -> String {
        let target = if self.encode_target {
            url::form_urlencoded::byte_serialize(target.as_bytes()).collect()
        } else {
            target.to_string()
        };
        self.template.replace("{url}", &target)
    }
}

fn default_proxies() -> Vec<ProxyEndpoint> {
    vec![
        ProxyEndpoint::new("https://corsproxy.io/?{url}", true),
        ProxyEndpoint::new("https://api.allorigins.win/raw?url={url}", true),
        ProxyEndpoint::new("https://cors-anywhere.herokuapp.com/{url}", false),
    ]
}

/// Fetches remote images and produces embedded representations. Does no
/// caching; that is the caller's responsibility.
pub struct ImageFetcher {
    client: reqwest::Client,
    proxies: Vec<ProxyEndpoint>,
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("top5/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            proxies: default_proxies(),
        }
    }

    /// Override the relay list (tests point this at a local server).
    pub fn with_proxies(client: reqwest::Client, proxies: Vec<ProxyEndpoint>) -> Self {
        Self { client, proxies }
    }

    /// Produce an embedded representation of the image at `locator`.
    ///
    /// Already-embedded input is returned unchanged. Otherwise a direct
    /// load (bounded by [`DIRECT_TIMEOUT`], re-encoded as JPEG) is
    /// attempted, then each relay in order; only when every relay fails
    /// does this return [`AcquireError::AllProxiesFailed`].
    pub async fn acquire(&self, locator: &str) -> Result<String, AcquireError> {
        if data_url::is_data_url(locator) {
            return Ok(locator.to_string());
        }
        match self.direct_load(locator).await {
            Ok(encoded) => Ok(encoded),
            Err(err) => {
                tracing::debug!(url = locator, error = %err, "Direct image load failed, trying relays");
                self.relay_fetch(locator).await
            },
        }
    }

    async fn direct_load(&self, url: &str) -> Result<String, AcquireError> {
        let resp = self
            .client
            .get(url)
            .timeout(DIRECT_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let bytes = resp.bytes().await?;
        let img =
            image::load_from_memory(&bytes).map_err(|e| AcquireError::Decode(e.to_string()))?;
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
        encoder
            .encode_image(&img.to_rgb8())
            .map_err(|e| AcquireError::Decode(e.to_string()))?;
        Ok(data_url::encode("image/jpeg", &buf))
    }

    async fn relay_fetch(&self, url: &str) -> Result<String, AcquireError> {
        for proxy in &self.proxies {
            let proxy_url = proxy.wrap(url);
            let resp = match self
                .client
                .get(&proxy_url)
                .timeout(PROXY_TIMEOUT)
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => resp,
                Ok(resp) => {
                    tracing::debug!(relay = proxy_url, status = %resp.status(), "Relay rejected request");
                    continue;
                },
                Err(err) => {
                    tracing::debug!(relay = proxy_url, error = %err, "Relay request failed");
                    continue;
                },
            };
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes,
                Err(_) => continue,
            };
            // A relay that answers 200 with a non-image payload counts as
            // a failed attempt.
            if let Some(mime) = data_url::sniff_mime(&bytes) {
                return Ok(data_url::encode(mime, &bytes));
            }
        }
        Err(AcquireError::AllProxiesFailed)
    }

    /// Decode an image for drawing: embedded data directly, anything else
    /// via a plain bounded GET (no relay chain).
    pub async fn load_image(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<DynamicImage, AcquireError> {
        let bytes = if data_url::is_data_url(locator) {
            data_url::decode(locator)
                .ok_or(AcquireError::InvalidDataUrl)?
                .1
        } else {
            self.client
                .get(locator)
                .timeout(timeout)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?
                .to_vec()
        };
        image::load_from_memory(&bytes).map_err(|e| AcquireError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_encodes_target_when_asked() {
        let proxy = ProxyEndpoint::new("https://relay.example/?{url}", true);
        assert_eq!(
            proxy.wrap("https://img.example/a.jpg?x=1"),
            "https://relay.example/?https%3A%2F%2Fimg.example%2Fa.jpg%3Fx%3D1"
        );
    }

    #[test]
    fn wrap_passes_raw_target_through() {
        let proxy = ProxyEndpoint::new("https://relay.example/{url}", false);
        assert_eq!(
            proxy.wrap("https://img.example/a.jpg"),
            "https://relay.example/https://img.example/a.jpg"
        );
    }

    #[test]
    fn default_relay_list_is_ordered() {
        let proxies = default_proxies();
        assert_eq!(proxies.len(), 3);
        assert!(proxies[0].template.contains("corsproxy.io"));
        assert!(proxies[2].template.contains("cors-anywhere"));
    }

    #[tokio::test]
    async fn acquire_is_idempotent_on_embedded_input() {
        let fetcher = ImageFetcher::new();
        let embedded = "data:image/png;base64,AAAA";
        let out = fetcher.acquire(embedded).await.unwrap();
        assert_eq!(out, embedded);
    }
}
