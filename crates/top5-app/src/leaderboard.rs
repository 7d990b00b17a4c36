//! Leaderboard and ticker loaders: thin fetch-then-tally glue.

use top5_core::leaderboard::{LeaderboardEntry, tally};
use top5_supabase::{ListRecord, SupabaseClient, SupabaseError};

/// The community top 10: every persisted list's mentions, tallied fresh.
pub async fn load_leaderboard(
    store: &SupabaseClient,
) -> Result<Vec<LeaderboardEntry>, SupabaseError> {
    let mentions = store.fetch_list_games().await?;
    Ok(tally(mentions))
}

/// The five newest lists.
pub async fn load_recent(store: &SupabaseClient) -> Result<Vec<ListRecord>, SupabaseError> {
    store.fetch_recent_lists(5).await
}

/// Total number of saved lists.
pub async fn load_count(store: &SupabaseClient) -> Result<u64, SupabaseError> {
    store.count_lists().await
}
