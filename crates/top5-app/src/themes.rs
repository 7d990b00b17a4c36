//! Theme resolution: remote rows when available, the built-in set when
//! anything goes wrong.

use top5_core::theme::ThemeSet;
use top5_supabase::SupabaseClient;

/// Fetch and validate the remote themes. Any failure, and any response
/// with no valid rows, falls back to the built-in gradients.
pub async fn resolve_themes(store: &SupabaseClient) -> ThemeSet {
    match store.fetch_themes().await {
        Ok(records) => match ThemeSet::from_records(&records) {
            Some(set) => set,
            None => {
                tracing::warn!("No valid theme rows, using built-in themes");
                ThemeSet::fallback()
            },
        },
        Err(e) => {
            tracing::warn!(error = %e, "Theme fetch failed, using built-in themes");
            ThemeSet::fallback()
        },
    }
}
