//! RAWG game database client. Search only; everything else the site
//! offers is out of scope here.

use serde::Deserialize;

use top5_core::Game;

pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io";

/// How many results a search page requests.
const PAGE_SIZE: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum RawgError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search API returned {0}")]
    Status(reqwest::StatusCode),
}

/// Partial search response; fields the card builder never looks at are
/// left out.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ApiGame>,
}

#[derive(Debug, Deserialize)]
struct ApiGame {
    id: u64,
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    released: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    metacritic: Option<i64>,
    #[serde(default)]
    background_image: Option<String>,
    #[serde(default)]
    platforms: Vec<PlatformEntry>,
    #[serde(default)]
    genres: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct PlatformEntry {
    #[serde(default)]
    platform: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

impl From<ApiGame> for Game {
    fn from(api: ApiGame) -> Self {
        Game {
            id: api.id,
            name: api.name,
            slug: api.slug,
            released: api.released,
            rating: api.rating,
            metacritic: api.metacritic,
            background_image: api.background_image,
            platforms: api
                .platforms
                .into_iter()
                .filter_map(|p| p.platform.map(|n| n.name))
                .collect(),
            genres: api.genres.into_iter().map(|n| n.name).collect(),
            from_cache: false,
        }
    }
}

pub struct RawgClient {
    client: reqwest::Client,
    key: String,
    base_url: String,
}

impl RawgClient {
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_base_url(key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different host (tests use a local server).
    pub fn with_base_url(key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("top5/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            key: key.into(),
            base_url: base_url.into(),
        }
    }

    /// Search by name, returning up to ten games in API relevance order.
    pub async fn search(&self, query: &str) -> Result<Vec<Game>, RawgError> {
        let url = format!("{}/api/games", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("key", self.key.as_str()),
                ("search", query),
                ("page_size", &PAGE_SIZE.to_string()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(RawgError::Status(resp.status()));
        }
        let parsed: SearchResponse = resp.json().await?;
        tracing::debug!(query, results = parsed.results.len(), "Game search completed");
        Ok(parsed.results.into_iter().map(Game::from).collect())
    }
}
