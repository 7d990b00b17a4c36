pub mod color;
pub mod game;
pub mod image_cache;
pub mod leaderboard;
pub mod list;
pub mod search;
pub mod selection;
pub mod share;
pub mod theme;

pub use color::Rgba;
pub use game::{Game, GameId};
pub use image_cache::{CachedImage, ImageCache};
pub use list::{ListSubmission, RankedFive, RankedGame};
pub use selection::Selection;
pub use theme::{Background, GradientSpec, Theme, ThemeSet};
