pub mod player;

pub use player::{Player, PlayerError};
