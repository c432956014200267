pub use ai::*;
pub use cards::*;
pub use config::*;
pub use deck::*;
pub use engine::*;
pub use entities::*;
pub use errors::*;
pub use grid::*;
pub use player::*;
pub use protocol_types::*;
pub use visualization::*;

mod ai;
#[cfg(test)]
mod arbitrary;
mod cards;
mod config;
mod deck;
mod engine;
mod entities;
mod errors;
mod grid;
mod player;
mod protocol_types;
mod visualization;
