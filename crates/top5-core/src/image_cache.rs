use std::collections::HashMap;

use crate::game::{Game, GameId};

/// Per-game image slot state. Created `Loading` when a game is selected,
/// resolved to an embedded encoding when acquisition finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedImage {
    Loading,
    Resolved(String),
}

/// Mapping from game id to its image slot. Entries are only removed when
/// the game itself is removed from the selection.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    slots: HashMap<GameId, CachedImage>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_loading(&mut self, id: GameId) {
        self.slots.insert(id, CachedImage::Loading);
    }

    pub fn resolve(&mut self, id: GameId, encoded: String) {
        self.slots.insert(id, CachedImage::Resolved(encoded));
    }

    pub fn remove(&mut self, id: GameId) {
        self.slots.remove(&id);
    }

    pub fn get(&self, id: GameId) -> Option<&CachedImage> {
        self.slots.get(&id)
    }

    pub fn is_loading(&self, id: GameId) -> bool {
        matches!(self.slots.get(&id), Some(CachedImage::Loading))
    }

    /// Image source for rendering: a still-loading slot yields `None` (the
    /// composer degrades to a glyph); an absent slot falls back to the
    /// game's original image reference.
    pub fn compose_source<'a>(&'a self, game: &'a Game) -> Option<&'a str> {
        match self.slots.get(&game.id) {
            Some(CachedImage::Resolved(encoded)) => Some(encoded.as_str()),
            Some(CachedImage::Loading) => None,
            None => game.background_image.as_deref(),
        }
    }

    /// Image reference for persistence: the resolved encoding when
    /// available, otherwise the original URL (also while still loading, so
    /// a racing submission never persists a sentinel).
    pub fn persist_url(&self, game: &Game) -> Option<String> {
        match self.slots.get(&game.id) {
            Some(CachedImage::Resolved(encoded)) => Some(encoded.clone()),
            _ => game.background_image.clone(),
        }
    }
}
