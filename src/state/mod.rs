mod layout;
mod map;
mod player_state;
mod world_state;

pub use layout::{Layout, REFERENCE_LAYOUT};
pub use map::{Cell, Map};
pub use player_state::AgentState;
pub use world_state::WorldState;
