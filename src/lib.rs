//! Brickfall - a breakout arcade engine for canvas hosts
//!
//! Core modules:
//! - `sim`: Simulation (physics primitives, collisions, particles, levels, game state)
//! - `game`: Session orchestrator (frame loop, input, resize, rendering)
//! - `renderer`: 2D drawing abstraction and scene painter
//! - `platform`: Frame scheduling and clocks (browser/native)
//! - `persistence`: High score storage backends
//! - `settings` / `tuning`: Data-driven configuration and game balance

pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::EngineError;
pub use game::{GameOrchestrator, InputEvent};
pub use settings::{LayoutPolicy, QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Height reserved at the top of the stage for the HUD
    pub const HUD_HEIGHT: f32 = 36.0;

    /// Paddle defaults
    pub const PADDLE_HEIGHT: f32 = 12.0;
    pub const PADDLE_BOTTOM_MARGIN: f32 = 36.0;
    pub const PADDLE_WIDTH_RATIO: f32 = 0.16;
    pub const PADDLE_MIN_WIDTH: f32 = 60.0;
    pub const PADDLE_MAX_WIDTH: f32 = 140.0;

    /// Widest paddle deflection from vertical (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// Launch angle from vertical for a freshly served ball
    pub const SERVE_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

    /// Brick grid
    pub const BRICK_TOP_MARGIN: f32 = 24.0;
    pub const BRICK_SIDE_MARGIN: f32 = 16.0;
    pub const BRICK_GAP: f32 = 4.0;
    pub const BRICK_HEIGHT_RATIO: f32 = 0.04;
    pub const BRICK_MIN_HEIGHT: f32 = 14.0;
    pub const BRICK_MAX_HEIGHT: f32 = 28.0;
    /// Points per brick hit point when destroyed
    pub const BRICK_POINTS_PER_HP: u32 = 50;
    /// Points for a hit that does not destroy the brick
    pub const HIT_POINTS_AWARD: u32 = 10;

    /// Distance a resolved ball is pushed past a surface
    pub const SEPARATION_EPSILON: f32 = 0.5;

    /// Particle defaults
    pub const PARTICLE_BASE_SPEED: f32 = 360.0;
    pub const PARTICLE_LIFETIME: f32 = 0.6;
    pub const PARTICLE_SIZE: f32 = 3.0;
}

/// Sign of `v` treating zero as positive
#[inline]
pub fn sign_or_positive(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
