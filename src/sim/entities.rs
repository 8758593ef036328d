//! Physics primitives
//!
//! Plain data plus per-entity update rules. Coordinates are stage pixels with
//! the origin at the top-left corner and y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::palette::Color;
use crate::consts::*;

/// Playable area dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub width: f32,
    pub height: f32,
}

impl Stage {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A stage is usable only with finite, positive dimensions
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size() / 2.0
    }

    /// Closest point of the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Ball at `pos` heading along `direction` at `speed`
    pub fn new(pos: Vec2, direction: Vec2, speed: f32, radius: f32) -> Self {
        Self {
            pos,
            vel: direction.normalize_or_zero() * speed,
            radius,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Advance position by velocity
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// The ball fell past the bottom of the stage
    pub fn is_lost(&self, stage: Stage) -> bool {
        self.pos.y > stage.height
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Center x
    pub x: f32,
    /// Center y (fixed for a level)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Where input wants the paddle to be
    pub target_x: f32,
    /// Pixels per second
    pub max_speed: f32,
}

impl Paddle {
    /// Paddle centered horizontally near the bottom of the stage
    pub fn centered(stage: Stage, max_speed: f32) -> Self {
        let width = (stage.width * PADDLE_WIDTH_RATIO).clamp(PADDLE_MIN_WIDTH, PADDLE_MAX_WIDTH);
        let x = stage.width / 2.0;
        Self {
            x,
            y: stage.height - PADDLE_BOTTOM_MARGIN,
            width,
            height: PADDLE_HEIGHT,
            target_x: x,
            max_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    /// Set the input target, clamped to the stage
    pub fn set_target(&mut self, x: f32, stage: Stage) {
        if x.is_finite() {
            self.target_x = x.clamp(0.0, stage.width);
        }
    }

    /// Move toward target (with smoothing), never leaving the stage
    pub fn move_toward_target(&mut self, dt: f32, stage: Stage) {
        let delta = self.target_x - self.x;
        let max_delta = self.max_speed * dt;
        self.x += delta.clamp(-max_delta, max_delta);
        self.clamp_to(stage);
    }

    /// Keep the whole paddle inside the stage
    pub fn clamp_to(&mut self, stage: Stage) {
        let half = self.width / 2.0;
        self.x = if stage.width <= self.width {
            stage.width / 2.0
        } else {
            self.x.clamp(half, stage.width - half)
        };
    }
}

/// A destructible brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    hit_points: u8,
    max_hit_points: u8,
    active: bool,
    /// Index into the level color scheme's brick shades
    pub shade: usize,
    /// Points awarded when destroyed
    pub value: u32,
}

impl Brick {
    pub fn new(rect: Rect, hit_points: u8, shade: usize) -> Self {
        let hit_points = hit_points.max(1);
        Self {
            rect,
            hit_points,
            max_hit_points: hit_points,
            active: true,
            shade,
            value: u32::from(hit_points) * BRICK_POINTS_PER_HP,
        }
    }

    #[inline]
    pub fn hit_points(&self) -> u8 {
        self.hit_points
    }

    #[inline]
    pub fn max_hit_points(&self) -> u8 {
        self.max_hit_points
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Take one hit. Returns true if this hit destroyed the brick.
    ///
    /// Inactive bricks ignore hits.
    pub fn hit(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.hit_points = self.hit_points.saturating_sub(1);
        if self.hit_points == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Copy damage from another brick (same grid cell after a rebuild)
    pub(crate) fn inherit_damage(&mut self, other: &Brick) {
        self.hit_points = other.hit_points.min(self.max_hit_points);
        self.active = other.active;
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.life = (self.life - dt).max(0.0);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Opacity fading with remaining life
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stage() -> Stage {
        Stage::new(400.0, 600.0)
    }

    #[test]
    fn test_brick_destroyed_at_zero() {
        let mut brick = Brick::new(Rect::from_origin(Vec2::ZERO, Vec2::new(40.0, 16.0)), 2, 0);
        assert!(!brick.hit());
        assert_eq!(brick.hit_points(), 1);
        assert!(brick.is_active());

        assert!(brick.hit());
        assert_eq!(brick.hit_points(), 0);
        assert!(!brick.is_active());

        // Never reactivated, never negative
        assert!(!brick.hit());
        assert_eq!(brick.hit_points(), 0);
        assert!(!brick.is_active());
    }

    #[test]
    fn test_paddle_smoothing_is_bounded() {
        let mut paddle = Paddle::centered(stage(), 600.0);
        paddle.set_target(400.0, stage());
        paddle.move_toward_target(0.1, stage());
        // 60 px max in 0.1 s
        assert!((paddle.x - 260.0).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_clamped_to_stage() {
        let mut paddle = Paddle::centered(stage(), 10_000.0);
        paddle.set_target(-50.0, stage());
        assert_eq!(paddle.target_x, 0.0);
        paddle.move_toward_target(1.0, stage());
        assert!((paddle.x - paddle.width / 2.0).abs() < 1e-3);

        paddle.set_target(1e6, stage());
        assert_eq!(paddle.target_x, 400.0);
        paddle.move_toward_target(1.0, stage());
        assert!((paddle.x - (400.0 - paddle.width / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_ball_lost_below_stage() {
        let mut ball = Ball::new(Vec2::new(100.0, 590.0), Vec2::Y, 200.0, 7.0);
        assert!(!ball.is_lost(stage()));
        ball.integrate(0.1);
        assert!(ball.is_lost(stage()));
    }

    #[test]
    fn test_particle_life_decreases_to_zero() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, 0.0),
            color: Color::WHITE,
            life: 0.2,
            max_life: 0.2,
            size: 2.0,
        };
        p.update(0.1);
        assert!(p.is_alive());
        assert!((p.pos.x - 1.0).abs() < 1e-5);
        p.update(0.5);
        assert!(!p.is_alive());
        assert_eq!(p.life, 0.0);
    }

    proptest! {
        #[test]
        fn prop_hit_points_never_negative(hp in 1u8..10, hits in 0usize..30) {
            let mut brick = Brick::new(Rect::from_origin(Vec2::ZERO, Vec2::ONE), hp, 0);
            let mut previous = brick.hit_points();
            for _ in 0..hits {
                let was_active = brick.is_active();
                brick.hit();
                if was_active {
                    prop_assert_eq!(brick.hit_points(), previous - 1);
                }
                prop_assert_eq!(brick.is_active(), brick.hit_points() > 0);
                previous = brick.hit_points();
            }
        }
    }
}
