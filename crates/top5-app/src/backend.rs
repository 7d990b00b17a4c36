//! The seam between the session and the outside world. The session only
//! sees this trait; the binary wires it to the real services.

use std::future::Future;

use top5_core::Game;
use top5_rawg::RawgClient;
use top5_render::ImageFetcher;
use top5_supabase::SupabaseClient;

/// Uniform error for backend operations. The session degrades on any of
/// these rather than surfacing them, so the original error text is enough.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl From<top5_supabase::SupabaseError> for BackendError {
    fn from(e: top5_supabase::SupabaseError) -> Self {
        Self(e.to_string())
    }
}

impl From<top5_rawg::RawgError> for BackendError {
    fn from(e: top5_rawg::RawgError) -> Self {
        Self(e.to_string())
    }
}

impl From<top5_render::AcquireError> for BackendError {
    fn from(e: top5_render::AcquireError) -> Self {
        Self(e.to_string())
    }
}

pub trait Backend: Send + Sync + 'static {
    /// Name-cache search, most-picked first.
    fn search_cache(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Game>, BackendError>> + Send;

    /// Search API supplement.
    fn search_api(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Game>, BackendError>> + Send;

    /// Turn an image locator into an embedded encoding.
    fn resolve_image(
        &self,
        locator: &str,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Record a selected game (and its embedding) in the name cache.
    fn upsert_game_cache(
        &self,
        game: &Game,
        embedded_image: Option<&str>,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Production wiring: hosted backend, search API, and the image fetcher.
pub struct LiveBackend {
    pub supabase: SupabaseClient,
    pub rawg: RawgClient,
    pub fetcher: ImageFetcher,
}

impl Backend for LiveBackend {
    async fn search_cache(&self, query: &str) -> Result<Vec<Game>, BackendError> {
        Ok(self.supabase.search_game_cache(query).await?)
    }

    async fn search_api(&self, query: &str) -> Result<Vec<Game>, BackendError> {
        Ok(self.rawg.search(query).await?)
    }

    async fn resolve_image(&self, locator: &str) -> Result<String, BackendError> {
        Ok(self.fetcher.acquire(locator).await?)
    }

    async fn upsert_game_cache(
        &self,
        game: &Game,
        embedded_image: Option<&str>,
    ) -> Result<(), BackendError> {
        Ok(self.supabase.upsert_game_cache(game, embedded_image).await?)
    }
}
