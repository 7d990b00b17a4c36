use serde::{Deserialize, Serialize};

use crate::game::GameId;

/// One finalized rank slot: the flattened (id, name, image, year) tuple
/// that gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGame {
    pub id: GameId,
    pub name: String,
    pub image: Option<String>,
    pub year: Option<i32>,
}

/// Exactly five games in strict rank order. The fixed-size array makes the
/// "exactly 5" invariant structural; rank is positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFive([RankedGame; 5]);

impl RankedFive {
    pub fn new(games: [RankedGame; 5]) -> Self {
        Self(games)
    }

    pub fn from_vec(games: Vec<RankedGame>) -> Option<Self> {
        let arr: [RankedGame; 5] = games.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn as_array(&self) -> &[RankedGame; 5] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedGame> {
        self.0.iter()
    }

    /// Iterate with 1-based rank numbers.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &RankedGame)> {
        self.0.iter().enumerate().map(|(i, g)| (i + 1, g))
    }
}

/// A finalized submission, ready to persist.
#[derive(Debug, Clone)]
pub struct ListSubmission {
    pub username: String,
    pub twitter: bool,
    pub instagram: bool,
    pub games: RankedFive,
    /// Composed card as a PNG data URL, when generation succeeded.
    pub generated_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(id: GameId, name: &str) -> RankedGame {
        RankedGame {
            id,
            name: name.to_string(),
            image: None,
            year: Some(2000),
        }
    }

    #[test]
    fn from_vec_requires_exactly_five() {
        let four: Vec<_> = (1..=4).map(|i| ranked(i, "g")).collect();
        assert!(RankedFive::from_vec(four).is_none());
        let five: Vec<_> = (1..=5).map(|i| ranked(i, "g")).collect();
        assert!(RankedFive::from_vec(five).is_some());
        let six: Vec<_> = (1..=6).map(|i| ranked(i, "g")).collect();
        assert!(RankedFive::from_vec(six).is_none());
    }

    #[test]
    fn ranked_iteration_is_one_based() {
        let five =
            RankedFive::from_vec((1..=5).map(|i| ranked(i, "g")).collect()).unwrap();
        let ranks: Vec<usize> = five.ranked().map(|(r, _)| r).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }
}
