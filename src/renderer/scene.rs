//! Paints one frame: playfield, HUD and the overlay for the current status

use glam::Vec2;

use super::{Surface2d, TextAlign};
use crate::consts::HUD_HEIGHT;
use crate::sim::{Color, ColorScheme, GameSnapshot, GameStatus, Level, Rect, Stage};

const HUD_TEXT_SIZE: f32 = 16.0;
const TITLE_SIZE: f32 = 40.0;
const SUBTITLE_SIZE: f32 = 18.0;

/// Draw the whole scene. `level` is `None` before the first game starts.
pub fn render_scene<S: Surface2d + ?Sized>(
    surface: &mut S,
    stage: Stage,
    level: Option<&Level>,
    snapshot: &GameSnapshot,
    fps: Option<u32>,
) {
    let fallback = ColorScheme::default();
    let scheme = level.map(Level::scheme).unwrap_or(&fallback);

    surface.clear(scheme.background);

    if let Some(level) = level {
        draw_playfield(surface, level, scheme);
    }
    draw_hud(surface, stage, level, snapshot, scheme, fps);
    draw_overlay(surface, stage, level, snapshot, scheme);
}

fn draw_playfield<S: Surface2d + ?Sized>(surface: &mut S, level: &Level, scheme: &ColorScheme) {
    for brick in level.bricks().iter().filter(|b| b.is_active()) {
        // Damaged bricks fade toward the background
        let health = f32::from(brick.hit_points()) / f32::from(brick.max_hit_points().max(1));
        surface.fill_rect(brick.rect, scheme.brick(brick.shade).with_alpha(0.35 + 0.65 * health));
    }

    surface.fill_rect(level.paddle.rect(), scheme.paddle);
    surface.fill_circle(level.ball.pos, level.ball.radius, scheme.ball);

    for p in level.particles().particles() {
        surface.fill_circle(p.pos, p.size, p.color.with_alpha(p.alpha()));
    }
}

fn draw_hud<S: Surface2d + ?Sized>(
    surface: &mut S,
    stage: Stage,
    level: Option<&Level>,
    snapshot: &GameSnapshot,
    scheme: &ColorScheme,
    fps: Option<u32>,
) {
    let y = HUD_HEIGHT * 0.5;
    let text = scheme.text;

    surface.text(
        &format!("Score {}", snapshot.display_score()),
        Vec2::new(12.0, y),
        HUD_TEXT_SIZE,
        TextAlign::Left,
        text,
    );

    let level_label = match level {
        Some(l) => format!("Level {}/{} {}", snapshot.level_index + 1, snapshot.total_levels, l.name()),
        None => format!("Best {}", snapshot.high_score),
    };
    surface.text(
        &level_label,
        Vec2::new(stage.width * 0.5, y),
        HUD_TEXT_SIZE,
        TextAlign::Center,
        text,
    );

    surface.text(
        &format!("Lives {}", snapshot.lives),
        Vec2::new(stage.width - 12.0, y),
        HUD_TEXT_SIZE,
        TextAlign::Right,
        text,
    );

    surface.line(
        Vec2::new(0.0, HUD_HEIGHT),
        Vec2::new(stage.width, HUD_HEIGHT),
        1.0,
        text.with_alpha(0.25),
    );

    if let Some(fps) = fps {
        surface.text(
            &format!("{} fps", fps),
            Vec2::new(stage.width - 12.0, stage.height - 10.0),
            HUD_TEXT_SIZE * 0.75,
            TextAlign::Right,
            text.with_alpha(0.6),
        );
    }
}

fn draw_overlay<S: Surface2d + ?Sized>(
    surface: &mut S,
    stage: Stage,
    level: Option<&Level>,
    snapshot: &GameSnapshot,
    scheme: &ColorScheme,
) {
    let (title, subtitle) = match snapshot.status {
        GameStatus::Playing => return,
        GameStatus::Menu => ("BRICKFALL".to_string(), "Press start to play".to_string()),
        GameStatus::Paused => ("PAUSED".to_string(), "Press P to resume".to_string()),
        GameStatus::LevelComplete => {
            let name = level.map(Level::name).unwrap_or_default();
            (
                format!("LEVEL {} COMPLETE", snapshot.level_index + 1),
                format!("{} cleared, score {}", name, snapshot.total_score),
            )
        }
        GameStatus::GameOver => {
            let title = if snapshot.victory { "YOU WIN" } else { "GAME OVER" };
            (
                title.to_string(),
                format!("Score {}  Best {}", snapshot.total_score, snapshot.high_score),
            )
        }
    };

    surface.fill_rect(
        Rect::from_origin(Vec2::ZERO, Vec2::new(stage.width, stage.height)),
        Color::BLACK.with_alpha(0.55),
    );
    let center = Vec2::new(stage.width * 0.5, stage.height * 0.5);
    surface.text(&title, center, TITLE_SIZE, TextAlign::Center, scheme.text);
    surface.text(
        &subtitle,
        center + Vec2::new(0.0, TITLE_SIZE),
        SUBTITLE_SIZE,
        TextAlign::Center,
        scheme.text.with_alpha(0.8),
    );
}
