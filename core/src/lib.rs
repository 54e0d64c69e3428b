//! Minesweeper episodes behind a reset/step interface for reinforcement-learning agents.

pub use action::*;
pub use config::*;
pub use episode::*;
pub use error::*;
pub use generator::*;
pub use layout::*;
pub use render::*;
pub use reveal::*;
pub use state::*;
pub use types::*;

mod action;
mod config;
mod episode;
mod error;
mod generator;
mod layout;
mod render;
mod reveal;
mod state;
mod types;
