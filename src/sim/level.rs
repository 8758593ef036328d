//! Levels: data-driven brick layouts and the playable stage built from them
//!
//! A layout is a list of rows. Each character is one grid cell: `1`-`9` is a
//! brick with that many hit points, `.` or a space is empty.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, BrickOutcome, Collision};
use super::entities::{Ball, Brick, Paddle, Rect, Stage};
use super::palette::ColorScheme;
use super::particles::ParticleSystem;
use crate::consts::*;
use crate::error::EngineError;
use crate::settings::LayoutPolicy;
use crate::tuning::Tuning;

fn default_speed_scale() -> f32 {
    1.0
}

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    pub layout: Vec<String>,
    #[serde(default)]
    pub scheme: ColorScheme,
    /// Multiplier on the tuning's serve speed
    #[serde(default = "default_speed_scale")]
    pub ball_speed_scale: f32,
}

impl LevelDefinition {
    pub fn new(name: &str, layout: &[&str], scheme: ColorScheme, ball_speed_scale: f32) -> Self {
        Self {
            name: name.to_string(),
            layout: layout.iter().map(|row| row.to_string()).collect(),
            scheme,
            ball_speed_scale,
        }
    }

    pub fn rows(&self) -> usize {
        self.layout.len()
    }

    /// Widest row, in cells
    pub fn columns(&self) -> usize {
        self.layout.iter().map(|row| row.chars().count()).max().unwrap_or(0)
    }

    /// (row, column, hit points) for every brick cell
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.layout.iter().enumerate().flat_map(|(row, line)| {
            line.chars().enumerate().filter_map(move |(col, c)| {
                c.to_digit(10)
                    .filter(|hp| *hp > 0)
                    .map(|hp| (row, col, hp as u8))
            })
        })
    }

    pub fn brick_count(&self) -> usize {
        self.cells().count()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: String| EngineError::InvalidLevel {
            name: self.name.clone(),
            reason,
        };

        for (row, line) in self.layout.iter().enumerate() {
            if let Some(c) = line.chars().find(|c| !matches!(c, '1'..='9' | '.' | ' ')) {
                return Err(invalid(format!("unexpected '{}' in row {}", c, row)));
            }
        }
        if self.brick_count() == 0 {
            return Err(invalid("layout has no bricks".to_string()));
        }
        if !(self.ball_speed_scale.is_finite() && self.ball_speed_scale > 0.0) {
            return Err(invalid(format!(
                "ball speed scale must be positive, got {}",
                self.ball_speed_scale
            )));
        }
        Ok(())
    }
}

/// The ordered, validated level sequence
#[derive(Debug, Clone)]
pub struct LevelSet {
    levels: Vec<LevelDefinition>,
}

impl LevelSet {
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, EngineError> {
        if levels.is_empty() {
            return Err(EngineError::EmptyLevelSet);
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// The five stock levels
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                LevelDefinition::new(
                    "Warm-up",
                    &["11111111", "11111111", "11111111"],
                    ColorScheme::neon(),
                    1.0,
                ),
                LevelDefinition::new(
                    "Stripes",
                    &["2222222222", "1111111111", "2222222222", "1111111111"],
                    ColorScheme::ocean(),
                    1.05,
                ),
                LevelDefinition::new(
                    "Fortress",
                    &["3333333333", "3.222222.3", "3.211112.3", "3........3", "1111111111"],
                    ColorScheme::ember(),
                    1.1,
                ),
                LevelDefinition::new(
                    "Checkers",
                    &["1.2.1.2.1.2", ".2.1.2.1.2.", "1.2.1.2.1.2", ".2.1.2.1.2.", "3.3.3.3.3.3"],
                    ColorScheme::forest(),
                    1.15,
                ),
                LevelDefinition::new(
                    "Crown",
                    &["4...44...4", "44.4444.44", "3333333333", "2222222222", "1111111111"],
                    ColorScheme::violet(),
                    1.2,
                ),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }
}

/// Result of one level update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Running,
    /// No active bricks remain
    Cleared,
    /// The ball fell past the bottom edge
    BallLost,
}

/// Lay out a definition's bricks on a stage
fn layout_bricks(definition: &LevelDefinition, stage: Stage) -> Vec<Brick> {
    let cols = definition.columns().max(1) as f32;
    let brick_w =
        ((stage.width - 2.0 * BRICK_SIDE_MARGIN - BRICK_GAP * (cols - 1.0)) / cols).max(1.0);
    let brick_h = (stage.height * BRICK_HEIGHT_RATIO).clamp(BRICK_MIN_HEIGHT, BRICK_MAX_HEIGHT);
    let top = HUD_HEIGHT + BRICK_TOP_MARGIN;

    definition
        .cells()
        .map(|(row, col, hp)| {
            let origin = Vec2::new(
                BRICK_SIDE_MARGIN + col as f32 * (brick_w + BRICK_GAP),
                top + row as f32 * (brick_h + BRICK_GAP),
            );
            Brick::new(Rect::from_origin(origin, Vec2::new(brick_w, brick_h)), hp, row)
        })
        .collect()
}

/// A fresh ball resting above the paddle, heading up and to the right
fn serve_ball(paddle: &Paddle, tuning: &Tuning, speed_scale: f32) -> Ball {
    let radius = tuning.ball_radius;
    let pos = Vec2::new(paddle.x, paddle.top() - radius - 1.0);
    let direction = Vec2::new(SERVE_ANGLE.sin(), -SERVE_ANGLE.cos());
    Ball::new(pos, direction, tuning.ball_speed * speed_scale, radius)
}

/// Fold `x` back into `[lo, hi]` as if bouncing between walls
fn fold_into(x: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span <= 0.0 {
        return lo;
    }
    let mut t = (x - lo).rem_euclid(2.0 * span);
    if t > span {
        t = 2.0 * span - t;
    }
    lo + t
}

/// One playable stage
#[derive(Debug, Clone)]
pub struct Level {
    index: usize,
    definition: LevelDefinition,
    stage: Stage,
    tuning: Tuning,
    pub paddle: Paddle,
    pub ball: Ball,
    bricks: Vec<Brick>,
    particles: ParticleSystem,
    score: u64,
}

impl Level {
    pub fn new(
        index: usize,
        definition: &LevelDefinition,
        stage: Stage,
        tuning: Tuning,
        max_particles: usize,
        seed: u64,
    ) -> Self {
        let paddle = Paddle::centered(stage, tuning.paddle_max_speed);
        let ball = serve_ball(&paddle, &tuning, definition.ball_speed_scale);
        Self {
            index,
            bricks: layout_bricks(definition, stage),
            definition: definition.clone(),
            stage,
            tuning,
            paddle,
            ball,
            particles: ParticleSystem::new(seed, max_particles),
            score: 0,
        }
    }

    /// Full reconstruction: every brick restored, score cleared, ball re-served
    pub fn reset(&mut self) {
        self.bricks = layout_bricks(&self.definition, self.stage);
        self.particles.clear();
        self.score = 0;
        self.respawn();
    }

    /// Re-serve ball and paddle, keeping brick damage and score
    pub fn respawn(&mut self) {
        self.paddle = Paddle::centered(self.stage, self.tuning.paddle_max_speed);
        self.ball = serve_ball(&self.paddle, &self.tuning, self.definition.ball_speed_scale);
    }

    /// Rebuild the layout for new stage dimensions
    pub fn resize(&mut self, stage: Stage, policy: LayoutPolicy) {
        let old = self.stage;
        self.stage = stage;

        match policy {
            LayoutPolicy::Rebuild => self.reset(),
            LayoutPolicy::Preserve => {
                let mut bricks = layout_bricks(&self.definition, stage);
                for (brick, previous) in bricks.iter_mut().zip(&self.bricks) {
                    brick.inherit_damage(previous);
                }
                self.bricks = bricks;

                let scale = Vec2::new(stage.width / old.width, stage.height / old.height);
                let mut paddle = Paddle::centered(stage, self.tuning.paddle_max_speed);
                paddle.x = self.paddle.x * scale.x;
                paddle.target_x = (self.paddle.target_x * scale.x).clamp(0.0, stage.width);
                paddle.clamp_to(stage);
                self.paddle = paddle;
                self.ball.pos *= scale;
            }
        }
    }

    /// Advance one frame: particles, paddle smoothing, ball, one collision
    pub fn update(&mut self, dt: f32) -> LevelOutcome {
        self.particles.update(dt);
        self.paddle.move_toward_target(dt, self.stage);
        self.ball.integrate(dt);

        if let Some(collision) = collision::resolve_frame(
            &mut self.ball,
            &self.paddle,
            &mut self.bricks,
            self.stage,
            &self.tuning,
        ) {
            self.apply_collision(collision);
        }

        if self.is_level_complete() {
            LevelOutcome::Cleared
        } else if self.ball.is_lost(self.stage) {
            LevelOutcome::BallLost
        } else {
            LevelOutcome::Running
        }
    }

    fn apply_collision(&mut self, collision: Collision) {
        log::trace!("Level {} collision: {:?}", self.index, collision);
        if let Collision::Brick { outcome, .. } = collision {
            match outcome {
                BrickOutcome::Damaged { .. } => self.score += u64::from(HIT_POINTS_AWARD),
                BrickOutcome::Destroyed { center, value, .. } => {
                    self.score += u64::from(value);
                    self.particles.create_explosion(
                        center,
                        self.tuning.explosion_count,
                        self.definition.scheme.particle,
                        self.tuning.explosion_intensity,
                    );
                }
            }
        }
    }

    /// Idle/demo mode: steer the paddle under the ball's predicted landing spot
    pub fn autopilot(&mut self) {
        let ball = &self.ball;
        let landing = if ball.vel.y > 0.0 {
            let time_to_paddle = (self.paddle.top() - ball.pos.y).max(0.0) / ball.vel.y;
            let predicted = ball.pos.x + ball.vel.x * time_to_paddle;
            fold_into(predicted, ball.radius, self.stage.width - ball.radius)
        } else {
            ball.pos.x
        };

        // Strike off-center so rallies don't loop forever
        let wobble = (self.bricks_remaining() as f32 * 1.7).sin() * self.paddle.width * 0.3;
        self.paddle.set_target(landing - wobble, self.stage);
    }

    /// True iff every brick is inactive
    pub fn is_level_complete(&self) -> bool {
        self.bricks.iter().all(|b| !b.is_active())
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_active()).count()
    }

    /// Points earned in this level attempt
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn scheme(&self) -> &ColorScheme {
        &self.definition.scheme
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub(crate) fn bricks_mut(&mut self) -> &mut [Brick] {
        &mut self.bricks
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }
}
