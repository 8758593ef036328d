//! Data-driven game balance
//!
//! Everything here affects gameplay. Visual-only knobs live in `Settings`.

use serde::{Deserialize, Serialize};

/// Gameplay tuning values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Serve speed of the ball (pixels/s), scaled per level
    pub ball_speed: f32,
    pub ball_radius: f32,
    /// Fastest the paddle may chase its target (pixels/s)
    pub paddle_max_speed: f32,
    /// Speed multiplier applied on every paddle bounce
    pub paddle_speedup: f32,
    /// Optional ceiling on ball speed; `None` lets it grow without bound
    pub max_ball_speed: Option<f32>,
    /// Particles spawned when a brick is destroyed
    pub explosion_count: usize,
    /// Velocity scale for destruction bursts
    pub explosion_intensity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_speed: 320.0,
            ball_radius: 7.0,
            paddle_max_speed: 1400.0,
            paddle_speedup: 1.02,
            max_ball_speed: None,
            explosion_count: 15,
            explosion_intensity: 0.5,
        }
    }
}

impl Tuning {
    /// Speed after one paddle bounce. Never lower than `speed`.
    pub fn boosted_speed(&self, speed: f32) -> f32 {
        let boosted = speed * self.paddle_speedup;
        match self.max_ball_speed {
            Some(cap) => boosted.min(cap).max(speed),
            None => boosted,
        }
    }
}
