use serde::{Deserialize, Serialize};

/// External identifier of a game, as assigned by the search API.
pub type GameId = u64;

/// A game as returned by search (API or name cache). Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Release date as `YYYY-MM-DD`, when known.
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub metacritic: Option<i64>,
    /// Original image URL, or an embedded encoding when sourced from the
    /// name cache.
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Set when the entry came from the persistent name cache.
    #[serde(default)]
    pub from_cache: bool,
}

/// Equality is by external identifier.
impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Game {}

impl Game {
    /// Release year parsed from the leading `YYYY` of the release date.
    pub fn release_year(&self) -> Option<i32> {
        let released = self.released.as_deref()?;
        released.get(..4)?.parse().ok()
    }

    /// Year shown on the card; games without a date are "Classic".
    pub fn year_label(&self) -> String {
        match self.release_year() {
            Some(year) => year.to_string(),
            None => "Classic".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: GameId, released: Option<&str>) -> Game {
        Game {
            id,
            name: format!("Game {id}"),
            slug: None,
            released: released.map(String::from),
            rating: None,
            metacritic: None,
            background_image: None,
            platforms: vec![],
            genres: vec![],
            from_cache: false,
        }
    }

    #[test]
    fn equality_is_by_id() {
        let mut a = game(1, None);
        let b = game(1, Some("1998-11-21"));
        a.name = "Different".to_string();
        assert_eq!(a, b);
        assert_ne!(a, game(2, None));
    }

    #[test]
    fn release_year_from_date() {
        assert_eq!(game(1, Some("1998-11-21")).release_year(), Some(1998));
        assert_eq!(game(1, Some("2023-01-01")).year_label(), "2023");
    }

    #[test]
    fn missing_or_bad_date_is_classic() {
        assert_eq!(game(1, None).year_label(), "Classic");
        assert_eq!(game(1, Some("??")).year_label(), "Classic");
    }
}
