//! The interactive list-building session: debounced search, ranked
//! selection, and background image resolution.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use top5_core::search::{SEARCH_LIMIT, merge_results};
use top5_core::{Game, GameId, Selection};

use crate::backend::Backend;

/// Quiescence window before a typed query is dispatched.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries shorter than this never search.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Default)]
struct SessionState {
    query: String,
    results: Vec<Game>,
    searching: bool,
    selection: Selection,
    /// Bumped per dispatched search; stale responses are discarded.
    generation: u64,
    debounce: Option<JoinHandle<()>>,
    image_tasks: Vec<JoinHandle<()>>,
}

/// One user's session. Clones share state; all mutation goes through the
/// lock.
pub struct Session<B> {
    backend: Arc<B>,
    state: Arc<RwLock<SessionState>>,
}

impl<B> Clone for Session<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Record a keystroke. Cancels any pending dispatch; short queries
    /// clear the results immediately, anything else searches after the
    /// debounce window passes without further edits.
    pub async fn set_query(&self, query: &str) {
        let mut st = self.state.write().await;
        if let Some(handle) = st.debounce.take() {
            handle.abort();
        }
        st.query = query.to_string();
        // Every edit invalidates whatever search is in flight, even one
        // that clears the box without dispatching a new search.
        st.generation += 1;
        if st.query.len() < MIN_QUERY_LEN {
            st.results.clear();
            st.searching = false;
            return;
        }
        let generation = st.generation;
        let session = self.clone();
        let query = st.query.clone();
        st.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            // Once dispatched, a search is never cancelled; a stale
            // result is discarded by the generation check instead.
            tokio::spawn(async move {
                session.run_search(&query, generation).await;
            });
        }));
    }

    /// Perform a search immediately, bypassing the debounce. Used by the
    /// debounce task and by non-interactive callers.
    pub async fn search_now(&self, query: &str) -> Vec<Game> {
        let cached = match self.backend.search_cache(query).await {
            Ok(games) => games,
            Err(e) => {
                tracing::warn!(query, error = %e, "Name-cache search failed");
                Vec::new()
            },
        };
        // Only hit the API when the cache can't fill the page
        let api = if cached.len() < SEARCH_LIMIT {
            match self.backend.search_api(query).await {
                Ok(games) => games,
                Err(e) => {
                    tracing::warn!(query, error = %e, "API search failed");
                    Vec::new()
                },
            }
        } else {
            Vec::new()
        };
        merge_results(cached, api, SEARCH_LIMIT)
    }

    async fn run_search(&self, query: &str, generation: u64) {
        {
            let mut st = self.state.write().await;
            if st.generation != generation {
                return;
            }
            st.searching = true;
        }
        let results = self.search_now(query).await;
        let mut st = self.state.write().await;
        // A newer query was dispatched while this one was in flight
        if st.generation != generation {
            return;
        }
        st.results = results;
        st.searching = false;
    }

    /// Add a game to the selection. Rejection (full list, duplicate) is a
    /// quiet no-op; acceptance clears the search box and starts resolving
    /// the game's image in the background.
    pub async fn select(&self, game: Game) -> bool {
        let mut st = self.state.write().await;
        if !st.selection.select(game.clone()) {
            return false;
        }
        st.query.clear();
        st.results.clear();
        st.searching = false;
        // An in-flight search must not repopulate the cleared results
        st.generation += 1;
        if let Some(handle) = st.debounce.take() {
            handle.abort();
        }
        if game.background_image.is_some() {
            let session = self.clone();
            st.image_tasks
                .push(tokio::spawn(async move { session.resolve_image(game).await }));
        }
        true
    }

    /// Resolve one game's image into its own cache slot. Failure falls
    /// back to the original URL; the slot never stays stuck on loading.
    async fn resolve_image(&self, game: Game) {
        let source = game
            .background_image
            .clone()
            .unwrap_or_default();
        match self.backend.resolve_image(&source).await {
            Ok(encoded) => {
                self.state
                    .write()
                    .await
                    .selection
                    .set_image(game.id, encoded.clone());
                if let Err(e) = self.backend.upsert_game_cache(&game, Some(&encoded)).await {
                    tracing::warn!(game = game.name, error = %e, "Name-cache upsert failed");
                }
            },
            Err(e) => {
                tracing::warn!(game = game.name, error = %e, "Image resolution failed");
                self.state.write().await.selection.set_image(game.id, source);
            },
        }
    }

    pub async fn remove(&self, id: GameId) {
        self.state.write().await.selection.remove(id);
    }

    pub async fn move_up(&self, index: usize) {
        self.state.write().await.selection.move_up(index);
    }

    pub async fn move_down(&self, index: usize) {
        self.state.write().await.selection.move_down(index);
    }

    pub async fn query(&self) -> String {
        self.state.read().await.query.clone()
    }

    pub async fn results(&self) -> Vec<Game> {
        self.state.read().await.results.clone()
    }

    pub async fn is_searching(&self) -> bool {
        self.state.read().await.searching
    }

    /// Snapshot of the current selection (games plus image cache).
    pub async fn selection(&self) -> Selection {
        self.state.read().await.selection.clone()
    }

    /// Wait for every in-flight image resolution to finish.
    pub async fn wait_for_images(&self) {
        let tasks = std::mem::take(&mut self.state.write().await.image_tasks);
        for result in futures::future::join_all(tasks).await {
            if let Err(e) = result
                && !e.is_cancelled()
            {
                tracing::warn!(error = %e, "Image task panicked");
            }
        }
    }
}
