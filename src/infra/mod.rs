mod default_observer;
mod game_observer;
mod types;

pub use default_observer::DefaultObserver;
pub use game_observer::{EpisodeObserver, NullObserver};
pub use types::{Orientation, Position};
