pub mod config;
pub mod error;
pub mod events;
pub mod field;
pub mod game;
pub mod input;
pub mod render;
pub mod world;

/// Terminal coordinates
pub type ScreenSize = u16;

/// Signed cell coordinates, wrapped onto a [`field::Field`]
pub type CellOffset = isize;
