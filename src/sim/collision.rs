//! Collision detection and response
//!
//! Detection functions are pure and return descriptors. Resolution functions
//! apply a descriptor to the ball (and brick) handed in. At most one
//! collision is resolved per frame, in priority order walls, paddle, bricks.

use glam::Vec2;

use super::entities::{Ball, Brick, Paddle, Rect, Stage};
use crate::consts::*;
use crate::sign_or_positive;
use crate::tuning::Tuning;

/// Which walls the ball touches this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
}

/// Ball overlapping the paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleContact {
    /// Separating axis, pointing from paddle toward ball
    pub normal: Vec2,
    pub penetration: f32,
    /// Contact offset from paddle center, -1 (left edge) to 1 (right edge)
    pub offset: f32,
    /// Paddle top edge at contact time
    pub surface_y: f32,
}

/// Ball overlapping an active brick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickContact {
    /// Index into the brick slice
    pub index: usize,
    /// Axis of minimum penetration, pointing from brick toward ball
    pub normal: Vec2,
    pub penetration: f32,
}

/// What happened to a brick after a resolved hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrickOutcome {
    Damaged { remaining: u8 },
    Destroyed { center: Vec2, shade: usize, value: u32 },
}

/// The single collision resolved in a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    Wall(WallContact),
    Paddle(PaddleContact),
    Brick { index: usize, outcome: BrickOutcome },
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Circle vs axis-aligned rectangle overlap.
///
/// Returns the minimum-penetration normal (pointing toward the circle) and
/// the penetration depth along it.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> Option<(Vec2, f32)> {
    let closest = rect.closest_point(center);
    if center.distance_squared(closest) > radius * radius {
        return None;
    }

    let d = center - rect.center();
    let half = rect.half_extents();
    let pen_x = half.x + radius - d.x.abs();
    let pen_y = half.y + radius - d.y.abs();

    if pen_x < pen_y {
        Some((Vec2::new(sign_or_positive(d.x), 0.0), pen_x))
    } else {
        Some((Vec2::new(0.0, sign_or_positive(d.y)), pen_y))
    }
}

/// Check the ball against the left, right and top walls.
///
/// The bottom edge is not a wall: crossing it loses the ball.
pub fn wall_contact(ball: &Ball, stage: Stage) -> Option<WallContact> {
    let contact = WallContact {
        left: ball.pos.x - ball.radius <= 0.0,
        right: ball.pos.x + ball.radius >= stage.width,
        top: ball.pos.y - ball.radius <= 0.0,
    };
    (contact.left || contact.right || contact.top).then_some(contact)
}

/// Reflect off walls and move the ball back inside the stage
pub fn resolve_wall(ball: &mut Ball, contact: WallContact, stage: Stage) {
    if contact.left {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = ball.radius + SEPARATION_EPSILON;
    } else if contact.right {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = stage.width - ball.radius - SEPARATION_EPSILON;
    }
    if contact.top {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = ball.radius + SEPARATION_EPSILON;
    }
}

/// Check the ball against the paddle. Only a descending ball can hit it.
pub fn paddle_contact(ball: &Ball, paddle: &Paddle) -> Option<PaddleContact> {
    if ball.vel.y <= 0.0 {
        return None;
    }
    let (normal, penetration) = circle_rect_overlap(ball.pos, ball.radius, &paddle.rect())?;
    let half_width = paddle.width / 2.0;
    let offset = if half_width > 0.0 {
        ((ball.pos.x - paddle.x) / half_width).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    Some(PaddleContact {
        normal,
        penetration,
        offset,
        surface_y: paddle.top(),
    })
}

/// Bounce off the paddle.
///
/// Side hits push the ball out sideways. Any other contact puts it back on
/// top of the paddle, even when it sank past the paddle's center this frame.
/// The ball always leaves upward. Its horizontal direction comes from where
/// it struck: the edges deflect up to `MAX_BOUNCE_ANGLE` from vertical.
/// Speed grows by the tuning's paddle speed-up.
pub fn resolve_paddle(ball: &mut Ball, contact: PaddleContact, tuning: &Tuning) {
    if contact.normal.y == 0.0 {
        ball.pos += contact.normal * (contact.penetration + SEPARATION_EPSILON);
    } else {
        ball.pos.y = contact.surface_y - ball.radius - SEPARATION_EPSILON;
    }

    let speed = tuning.boosted_speed(ball.speed());
    let angle = contact.offset * MAX_BOUNCE_ANGLE;
    ball.vel = Vec2::new(angle.sin(), -angle.cos()) * speed;
}

/// Find the active brick the ball overlaps most closely
pub fn brick_contact(ball: &Ball, bricks: &[Brick]) -> Option<BrickContact> {
    let mut best: Option<(f32, BrickContact)> = None;

    for (index, brick) in bricks.iter().enumerate() {
        if !brick.is_active() {
            continue;
        }
        let Some((normal, penetration)) = circle_rect_overlap(ball.pos, ball.radius, &brick.rect)
        else {
            continue;
        };
        let dist = ball.pos.distance_squared(brick.rect.closest_point(ball.pos));
        if best.as_ref().is_none_or(|(d, _)| dist < *d) {
            best = Some((
                dist,
                BrickContact {
                    index,
                    normal,
                    penetration,
                },
            ));
        }
    }

    best.map(|(_, contact)| contact)
}

/// Bounce off a brick and damage it
pub fn resolve_brick(ball: &mut Ball, brick: &mut Brick, contact: BrickContact) -> BrickOutcome {
    // Only reflect if moving toward the surface
    if ball.vel.dot(contact.normal) < 0.0 {
        ball.vel = reflect(ball.vel, contact.normal);
    }
    ball.pos += contact.normal * (contact.penetration + SEPARATION_EPSILON);

    if brick.hit() {
        BrickOutcome::Destroyed {
            center: brick.center(),
            shade: brick.shade,
            value: brick.value,
        }
    } else {
        BrickOutcome::Damaged {
            remaining: brick.hit_points(),
        }
    }
}

/// Resolve the first collision in priority order (walls, paddle, bricks).
///
/// Anything else overlapping is left for the next frame.
pub fn resolve_frame(
    ball: &mut Ball,
    paddle: &Paddle,
    bricks: &mut [Brick],
    stage: Stage,
    tuning: &Tuning,
) -> Option<Collision> {
    if let Some(contact) = wall_contact(ball, stage) {
        resolve_wall(ball, contact, stage);
        return Some(Collision::Wall(contact));
    }

    if let Some(contact) = paddle_contact(ball, paddle) {
        resolve_paddle(ball, contact, tuning);
        return Some(Collision::Paddle(contact));
    }

    let contact = brick_contact(ball, bricks)?;
    let outcome = resolve_brick(ball, &mut bricks[contact.index], contact);
    Some(Collision::Brick {
        index: contact.index,
        outcome,
    })
}
