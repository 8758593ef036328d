//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Frame-driven updates with measured delta time
//! - Seeded RNG only (particles)
//! - Stable iteration order (layout order for bricks)

pub mod collision;
pub mod entities;
pub mod level;
pub mod palette;
pub mod particles;
pub mod state;

pub use collision::{BrickOutcome, Collision, reflect, resolve_frame};
pub use entities::{Ball, Brick, Paddle, Particle, Rect, Stage};
pub use level::{Level, LevelDefinition, LevelOutcome, LevelSet};
pub use palette::{Color, ColorScheme};
pub use particles::ParticleSystem;
pub use state::{GameSnapshot, GameState, GameStateManager, GameStatus};
