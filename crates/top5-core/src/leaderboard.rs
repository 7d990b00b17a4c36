use std::collections::HashMap;

/// How many entries the leaderboard shows.
pub const LEADERBOARD_SIZE: usize = 10;

/// One game's appearance in a persisted list.
#[derive(Debug, Clone)]
pub struct GameMention {
    pub name: String,
    pub image: Option<String>,
}

/// A leaderboard row: derived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub image: Option<String>,
    pub count: usize,
}

/// Tally mentions into the top-N most-picked games. The first-seen image
/// for a name wins. Ties keep first-appearance order across the input
/// (stable sort by descending count).
pub fn tally(mentions: impl IntoIterator<Item = GameMention>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for mention in mentions {
        if mention.name.is_empty() {
            continue;
        }
        match index.get(&mention.name) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(mention.name.clone(), entries.len());
                entries.push(LeaderboardEntry {
                    name: mention.name,
                    image: mention.image,
                    count: 1,
                });
            },
        }
    }
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(LEADERBOARD_SIZE);
    entries
}
