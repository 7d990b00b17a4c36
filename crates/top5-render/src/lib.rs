pub mod acquire;
pub mod compose;
pub mod data_url;
mod draw;

pub use acquire::{AcquireError, ImageFetcher, ProxyEndpoint};
pub use compose::{CANVAS_HEIGHT, CANVAS_WIDTH, ComposeError, Composer};
