//! The community name cache: games that have been picked before, with
//! their embedded images and selection counts.

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use top5_core::Game;
use top5_core::search::SEARCH_LIMIT;

use crate::client::{SupabaseClient, SupabaseError};

const SELECT_COLUMNS: &str = "game_id,game_name,game_slug,released,rating,metacritic,\
                              original_image_url,cached_image_base64,times_selected";

#[derive(Debug, Deserialize)]
struct CacheRow {
    game_id: u64,
    game_name: String,
    #[serde(default)]
    game_slug: Option<String>,
    #[serde(default)]
    released: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    metacritic: Option<i64>,
    #[serde(default)]
    original_image_url: Option<String>,
    #[serde(default)]
    cached_image_base64: Option<String>,
}

impl From<CacheRow> for Game {
    fn from(row: CacheRow) -> Self {
        Game {
            id: row.game_id,
            name: row.game_name,
            slug: row.game_slug,
            released: row.released,
            rating: row.rating,
            metacritic: row.metacritic,
            // The embedded encoding wins over the original URL
            background_image: row.cached_image_base64.or(row.original_image_url),
            platforms: vec![],
            genres: vec![],
            from_cache: true,
        }
    }
}

impl SupabaseClient {
    /// Substring name search over the cache, most-picked first, capped at
    /// the search limit.
    pub async fn search_game_cache(&self, query: &str) -> Result<Vec<Game>, SupabaseError> {
        let resp = self
            .request(Method::GET, &self.rest_url("game_cache"))
            .query(&[
                ("select", SELECT_COLUMNS),
                ("game_name", &format!("ilike.*{query}*")),
                ("order", "times_selected.desc"),
                ("limit", &SEARCH_LIMIT.to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<CacheRow> = Self::check_status(resp)?.json().await?;
        Ok(rows.into_iter().map(Game::from).collect())
    }

    /// Record a selected game in the cache (insert or bump its selection
    /// count) along with its embedded image.
    pub async fn upsert_game_cache(
        &self,
        game: &Game,
        embedded_image: Option<&str>,
    ) -> Result<(), SupabaseError> {
        let tags = |v: &[String]| if v.is_empty() { None } else { Some(v.to_vec()) };
        let body = json!({
            "p_game_id": game.id,
            "p_game_name": game.name,
            "p_game_slug": game.slug,
            "p_released": game.released,
            "p_rating": game.rating,
            "p_metacritic": game.metacritic,
            "p_original_image_url": game.background_image,
            "p_cached_image_base64": embedded_image,
            "p_platforms": tags(&game.platforms),
            "p_genres": tags(&game.genres),
        });
        let resp = self
            .request(Method::POST, &self.rpc_url("upsert_game_cache"))
            .json(&body)
            .send()
            .await?;
        Self::check_status(resp)?;
        tracing::debug!(game = game.name, "Upserted game cache entry");
        Ok(())
    }
}
