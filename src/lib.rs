//! Activity calendar diorama library
//!
//! Turns a year of daily activity counts into a layered isometric landscape.
//! Re-exports modules for use by binaries and tools.

pub mod biome;
pub mod calendar;
pub mod compositor;
pub mod config;
pub mod decorations;
pub mod error;
pub mod export;
pub mod iso;
pub mod landmarks;
pub mod normalize;
pub mod palette;
pub mod render;
pub mod scene;
pub mod seasons;
pub mod seeds;
pub mod sprites;
pub mod tilemap;

pub use error::{DioramaError, Result};
pub use render::{render, Diorama, RenderOptions};
