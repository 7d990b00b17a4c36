pub mod backend;
pub mod config;
pub mod leaderboard;
pub mod lists;
pub mod session;
pub mod themes;

pub use backend::{Backend, BackendError, LiveBackend};
pub use config::AppConfig;
pub use session::Session;
