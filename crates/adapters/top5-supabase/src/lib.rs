pub mod client;
pub mod game_cache;
pub mod lists;
pub mod themes;

pub use client::{SupabaseClient, SupabaseError};
pub use lists::ListRecord;
