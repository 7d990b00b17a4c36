use crate::game::Game;

/// How many results a search surfaces.
pub const SEARCH_LIMIT: usize = 10;

/// Merge name-cache hits (already ordered by historical popularity) with
/// API hits, deduplicating by id, truncated to `limit`. Cache hits always
/// come first.
pub fn merge_results(cached: Vec<Game>, api: Vec<Game>, limit: usize) -> Vec<Game> {
    let mut results = cached;
    results.truncate(limit);
    for game in api {
        if results.len() >= limit {
            break;
        }
        if !results.iter().any(|g| g.id == game.id) {
            results.push(game);
        }
    }
    results
}
