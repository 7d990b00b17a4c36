//! Theme rows from the `backgrounds` table.

use reqwest::Method;
use serde::Deserialize;

use top5_core::theme::ThemeRecord;

use crate::client::{SupabaseClient, SupabaseError};

/// Raw `backgrounds` row. `image_path` is relative to the public
/// `backgrounds` storage bucket.
#[derive(Debug, Deserialize)]
struct BackgroundRow {
    key: String,
    name: String,
    kind: String,
    #[serde(default)]
    gradient: Option<String>,
    #[serde(default)]
    image_path: Option<String>,
    text_color: String,
    secondary_color: String,
    accent_color: String,
    #[serde(default)]
    overlay: Option<String>,
    #[serde(default)]
    sort_order: i64,
}

impl SupabaseClient {
    /// Fetch the active theme rows, photographic kind first, then by sort
    /// order. Image paths come back resolved to full public URLs; record
    /// validation happens downstream.
    pub async fn fetch_themes(&self) -> Result<Vec<ThemeRecord>, SupabaseError> {
        let resp = self
            .request(Method::GET, &self.rest_url("backgrounds"))
            .query(&[
                ("select", "*"),
                ("is_active", "eq.true"),
                ("order", "kind.desc,sort_order.asc"),
            ])
            .send()
            .await?;
        let rows: Vec<BackgroundRow> = Self::check_status(resp)?.json().await?;
        Ok(rows
            .into_iter()
            .map(|row| ThemeRecord {
                key: row.key,
                name: row.name,
                kind: row.kind,
                gradient: row.gradient,
                image_url: row
                    .image_path
                    .map(|path| self.public_url("backgrounds", &path)),
                text_color: row.text_color,
                secondary_color: row.secondary_color,
                accent_color: row.accent_color,
                overlay: row.overlay,
                sort_order: row.sort_order,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_deserializes_with_sparse_fields() {
        let json = r##"{
            "key": "midnight",
            "name": "Midnight",
            "kind": "gradient",
            "gradient": "linear-gradient(to bottom, #1a1a2e, #16213e)",
            "text_color": "#ffffff",
            "secondary_color": "rgba(255, 255, 255, 0.7)",
            "accent_color": "#e94560"
        }"##;
        let row: BackgroundRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.key, "midnight");
        assert!(row.image_path.is_none());
        assert_eq!(row.sort_order, 0);
    }
}
