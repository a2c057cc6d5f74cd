pub mod game;
pub mod infra;
pub mod rl;
pub mod runner;
pub mod state;

// Re-export commonly used types for convenience
pub use game::{ActionKind, Episode, GameConfig, GameError, Phase, RewardConfig};
pub use infra::{Orientation, Position};
pub use state::{Layout, Map};
