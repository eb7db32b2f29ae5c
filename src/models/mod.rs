//! Core data models for season statistics.

mod playlist;
mod results;
mod roster;

pub use playlist::*;
pub use results::*;
pub use roster::*;
