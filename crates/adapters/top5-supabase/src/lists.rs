//! Persisted lists: the flattened `top5_lists` table plus the read paths
//! the leaderboard and ticker use.

use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use top5_core::ListSubmission;
use top5_core::leaderboard::GameMention;

use crate::client::{SupabaseClient, SupabaseError};

/// A persisted list row, partially decoded. Lists are write-once; the
/// share counter is the only mutable column and it is not managed here.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRecord {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub generated_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: i64,
}

/// The ten name/image columns of one row.
#[derive(Debug, Deserialize)]
struct MentionRow {
    #[serde(default)]
    game_1_name: Option<String>,
    #[serde(default)]
    game_1_image: Option<String>,
    #[serde(default)]
    game_2_name: Option<String>,
    #[serde(default)]
    game_2_image: Option<String>,
    #[serde(default)]
    game_3_name: Option<String>,
    #[serde(default)]
    game_3_image: Option<String>,
    #[serde(default)]
    game_4_name: Option<String>,
    #[serde(default)]
    game_4_image: Option<String>,
    #[serde(default)]
    game_5_name: Option<String>,
    #[serde(default)]
    game_5_image: Option<String>,
}

impl MentionRow {
    fn into_mentions(self) -> Vec<GameMention> {
        [
            (self.game_1_name, self.game_1_image),
            (self.game_2_name, self.game_2_image),
            (self.game_3_name, self.game_3_image),
            (self.game_4_name, self.game_4_image),
            (self.game_5_name, self.game_5_image),
        ]
        .into_iter()
        .filter_map(|(name, image)| name.map(|name| GameMention { name, image }))
        .collect()
    }
}

/// Flatten a submission into the wire row: per-rank
/// `game_N_{id,name,image,year}` columns, social flags, and a zeroed
/// share counter. The username must already be escaped by the caller.
pub fn list_row(submission: &ListSubmission) -> Value {
    let mut row = Map::new();
    row.insert("username".to_string(), json!(submission.username));
    row.insert("is_twitter".to_string(), json!(submission.twitter));
    row.insert("is_instagram".to_string(), json!(submission.instagram));
    for (rank, game) in submission.games.ranked() {
        row.insert(format!("game_{rank}_id"), json!(game.id));
        row.insert(format!("game_{rank}_name"), json!(game.name));
        row.insert(format!("game_{rank}_image"), json!(game.image));
        row.insert(format!("game_{rank}_year"), json!(game.year));
    }
    row.insert(
        "generated_image_url".to_string(),
        json!(submission.generated_image),
    );
    row.insert("share_count".to_string(), json!(0));
    Value::Object(row)
}

impl SupabaseClient {
    /// Insert one list row and return its assigned id.
    pub async fn insert_list(&self, submission: &ListSubmission) -> Result<i64, SupabaseError> {
        let resp = self
            .request(Method::POST, &self.rest_url("top5_lists"))
            .header("Prefer", "return=representation")
            .json(&json!([list_row(submission)]))
            .send()
            .await?;
        let rows: Vec<InsertedRow> = Self::check_status(resp)?.json().await?;
        let id = rows.first().ok_or(SupabaseError::MissingRow)?.id;
        tracing::info!(list_id = id, "List saved");
        Ok(id)
    }

    /// All name/image pairs across every persisted list, in row order.
    pub async fn fetch_list_games(&self) -> Result<Vec<GameMention>, SupabaseError> {
        let select = (1..=5)
            .map(|i| format!("game_{i}_name,game_{i}_image"))
            .collect::<Vec<_>>()
            .join(",");
        let resp = self
            .request(Method::GET, &self.rest_url("top5_lists"))
            .query(&[("select", select.as_str())])
            .send()
            .await?;
        let rows: Vec<MentionRow> = Self::check_status(resp)?.json().await?;
        Ok(rows.into_iter().flat_map(MentionRow::into_mentions).collect())
    }

    /// The newest `n` lists.
    pub async fn fetch_recent_lists(&self, n: usize) -> Result<Vec<ListRecord>, SupabaseError> {
        let resp = self
            .request(Method::GET, &self.rest_url("top5_lists"))
            .query(&[
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", &n.to_string()),
            ])
            .send()
            .await?;
        Ok(Self::check_status(resp)?.json().await?)
    }

    /// Exact list count, via a body-less count request.
    pub async fn count_lists(&self) -> Result<u64, SupabaseError> {
        let resp = self
            .request(Method::HEAD, &self.rest_url("top5_lists"))
            .header("Prefer", "count=exact")
            .query(&[("select", "id")])
            .send()
            .await?;
        let resp = Self::check_status(resp)?;
        resp.headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or(SupabaseError::InvalidCount)
    }
}

/// Total from a `Content-Range` value such as `0-24/3573` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use top5_core::{RankedFive, RankedGame};

    fn submission() -> ListSubmission {
        let games = RankedFive::from_vec(
            (1..=5)
                .map(|i| RankedGame {
                    id: i,
                    name: format!("Game {i}"),
                    image: Some(format!("https://img.example/{i}.jpg")),
                    year: Some(1990 + i as i32),
                })
                .collect(),
        )
        .unwrap();
        ListSubmission {
            username: "player1".to_string(),
            twitter: true,
            instagram: false,
            games,
            generated_image: Some("data:image/png;base64,AAAA".to_string()),
        }
    }

    #[test]
    fn row_flattens_all_five_ranks() {
        let row = list_row(&submission());
        assert_eq!(row["username"], "player1");
        assert_eq!(row["is_twitter"], true);
        assert_eq!(row["is_instagram"], false);
        assert_eq!(row["share_count"], 0);
        for rank in 1..=5 {
            assert_eq!(row[&format!("game_{rank}_id")], rank);
            assert_eq!(
                row[&format!("game_{rank}_name")],
                format!("Game {rank}")
            );
            assert_eq!(row[&format!("game_{rank}_year")], 1990 + rank);
        }
        assert_eq!(row["generated_image_url"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn missing_fields_serialize_as_null() {
        let mut sub = submission();
        sub.generated_image = None;
        let row = list_row(&sub);
        assert!(row["generated_image_url"].is_null());
    }

    #[test]
    fn mention_row_skips_missing_names() {
        let row = MentionRow {
            game_1_name: Some("Doom".to_string()),
            game_1_image: Some("a.jpg".to_string()),
            game_2_name: None,
            game_2_image: Some("orphan.jpg".to_string()),
            game_3_name: Some("Quake".to_string()),
            game_3_image: None,
            game_4_name: None,
            game_4_image: None,
            game_5_name: None,
            game_5_image: None,
        };
        let mentions = row.into_mentions();
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].name, "Doom");
        assert_eq!(mentions[1].name, "Quake");
        assert!(mentions[1].image.is_none());
    }

    #[test]
    fn content_range_totals_parse() {
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("garbage"), None);
    }
}
