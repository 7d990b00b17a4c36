use crate::game::{Game, GameId};
use crate::image_cache::ImageCache;
use crate::list::{RankedFive, RankedGame};

/// Maximum number of games in a list.
pub const MAX_SELECTED: usize = 5;

/// The ranked selection under construction: an ordered list of up to five
/// games plus their image cache. The five-slot cap and duplicate rejection
/// are enforced here and nowhere else.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    games: Vec<Game>,
    images: ImageCache,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.games.len() == MAX_SELECTED
    }

    pub fn contains(&self, id: GameId) -> bool {
        self.games.iter().any(|g| g.id == id)
    }

    /// Append a game. Returns `false` (no-op) when five are already
    /// selected or the game is already in the list. On acceptance the
    /// image slot is marked loading when the game has an image reference.
    pub fn select(&mut self, game: Game) -> bool {
        if self.games.len() >= MAX_SELECTED || self.contains(game.id) {
            return false;
        }
        if game.background_image.is_some() {
            self.images.mark_loading(game.id);
        }
        self.games.push(game);
        true
    }

    /// Remove by id, dropping the image slot with the game.
    pub fn remove(&mut self, id: GameId) {
        self.games.retain(|g| g.id != id);
        self.images.remove(id);
    }

    /// Swap entry `i` with the one above it. No-op at the top.
    pub fn move_up(&mut self, i: usize) {
        if i > 0 && i < self.games.len() {
            self.games.swap(i, i - 1);
        }
    }

    /// Swap entry `i` with the one below it. No-op at the bottom.
    pub fn move_down(&mut self, i: usize) {
        if i + 1 < self.games.len() {
            self.games.swap(i, i + 1);
        }
    }

    /// Store a resolved image, ignored if the game was removed while the
    /// resolution was in flight.
    pub fn set_image(&mut self, id: GameId, encoded: String) {
        if self.contains(id) {
            self.images.resolve(id, encoded);
        }
    }

    /// The finalized five-slot list, `None` unless exactly five are
    /// selected.
    pub fn finalize(&self) -> Option<RankedFive> {
        if !self.is_complete() {
            return None;
        }
        let ranked: Vec<RankedGame> = self
            .games
            .iter()
            .map(|g| RankedGame {
                id: g.id,
                name: g.name.clone(),
                image: self.images.persist_url(g),
                year: g.release_year(),
            })
            .collect();
        RankedFive::from_vec(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: GameId) -> Game {
        Game {
            id,
            name: format!("Game {id}"),
            slug: None,
            released: Some("2010-05-01".to_string()),
            rating: None,
            metacritic: None,
            background_image: Some(format!("https://img.example/{id}.jpg")),
            platforms: vec![],
            genres: vec![],
            from_cache: false,
        }
    }

    fn full_selection() -> Selection {
        let mut sel = Selection::new();
        for i in 1..=5 {
            assert!(sel.select(game(i)));
        }
        sel
    }

    #[test]
    fn sixth_selection_is_a_noop() {
        let mut sel = full_selection();
        assert!(!sel.select(game(6)));
        assert_eq!(sel.len(), 5);
    }

    #[test]
    fn duplicate_selection_is_a_noop() {
        let mut sel = Selection::new();
        assert!(sel.select(game(1)));
        assert!(!sel.select(game(1)));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn selection_marks_image_loading() {
        let mut sel = Selection::new();
        sel.select(game(1));
        assert!(sel.images().is_loading(1));
    }

    #[test]
    fn move_up_at_top_is_noop() {
        let mut sel = full_selection();
        let before: Vec<GameId> = sel.games().iter().map(|g| g.id).collect();
        sel.move_up(0);
        let after: Vec<GameId> = sel.games().iter().map(|g| g.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn move_down_at_bottom_is_noop() {
        let mut sel = full_selection();
        let before: Vec<GameId> = sel.games().iter().map(|g| g.id).collect();
        sel.move_down(4);
        let after: Vec<GameId> = sel.games().iter().map(|g| g.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn move_up_then_down_restores_order() {
        let mut sel = full_selection();
        let before: Vec<GameId> = sel.games().iter().map(|g| g.id).collect();
        sel.move_up(2);
        sel.move_down(1);
        let after: Vec<GameId> = sel.games().iter().map(|g| g.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn remove_drops_game_and_image_slot() {
        let mut sel = full_selection();
        sel.set_image(3, "data:image/png;base64,AA".to_string());
        sel.remove(3);
        assert_eq!(sel.len(), 4);
        assert!(!sel.contains(3));
        assert!(sel.images().get(3).is_none());
    }

    #[test]
    fn set_image_after_removal_is_ignored() {
        let mut sel = full_selection();
        sel.remove(2);
        sel.set_image(2, "data:image/png;base64,AA".to_string());
        assert!(sel.images().get(2).is_none());
    }

    #[test]
    fn finalize_requires_exactly_five() {
        let mut sel = Selection::new();
        sel.select(game(1));
        assert!(sel.finalize().is_none());

        let sel = full_selection();
        let five = sel.finalize().unwrap();
        let ids: Vec<GameId> = five.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(five.as_array()[0].year, Some(2010));
        // No resolved images yet: falls back to original URLs
        assert_eq!(
            five.as_array()[0].image.as_deref(),
            Some("https://img.example/1.jpg")
        );
    }
}
