//! Colors and per-level color schemes

use serde::{Deserialize, Serialize};

/// RGBA color, channels in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(...)` string for canvas hosts
    pub fn to_css(&self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({},{},{},{:.3})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Colors for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub background: Color,
    pub paddle: Color,
    pub ball: Color,
    /// Brick shades, indexed by row (wraps around)
    pub bricks: Vec<Color>,
    /// Destruction burst color
    pub particle: Color,
    pub text: Color,
}

impl ColorScheme {
    /// Shade for a brick row
    pub fn brick(&self, shade: usize) -> Color {
        if self.bricks.is_empty() {
            return Color::WHITE;
        }
        self.bricks[shade % self.bricks.len()]
    }

    pub fn neon() -> Self {
        Self {
            background: Color::rgb(0.02, 0.02, 0.06),
            paddle: Color::rgb(0.2, 0.8, 0.4),
            ball: Color::WHITE,
            bricks: vec![
                Color::rgb(1.0, 0.25, 0.35),
                Color::rgb(1.0, 0.55, 0.15),
                Color::rgb(1.0, 0.85, 0.2),
                Color::rgb(0.3, 0.9, 0.45),
                Color::rgb(0.25, 0.6, 1.0),
            ],
            particle: Color::rgb(1.0, 0.9, 0.6),
            text: Color::rgb(0.9, 0.9, 1.0),
        }
    }

    pub fn ocean() -> Self {
        Self {
            background: Color::rgb(0.01, 0.05, 0.1),
            paddle: Color::rgb(0.9, 0.95, 1.0),
            ball: Color::rgb(1.0, 1.0, 0.85),
            bricks: vec![
                Color::rgb(0.1, 0.35, 0.7),
                Color::rgb(0.15, 0.55, 0.8),
                Color::rgb(0.2, 0.75, 0.85),
                Color::rgb(0.5, 0.9, 0.9),
            ],
            particle: Color::rgb(0.6, 0.95, 1.0),
            text: Color::rgb(0.85, 0.95, 1.0),
        }
    }

    pub fn ember() -> Self {
        Self {
            background: Color::rgb(0.07, 0.02, 0.02),
            paddle: Color::rgb(1.0, 0.75, 0.3),
            ball: Color::rgb(1.0, 0.95, 0.8),
            bricks: vec![
                Color::rgb(0.55, 0.05, 0.05),
                Color::rgb(0.8, 0.2, 0.05),
                Color::rgb(0.95, 0.45, 0.1),
            ],
            particle: Color::rgb(1.0, 0.6, 0.2),
            text: Color::rgb(1.0, 0.9, 0.8),
        }
    }

    pub fn forest() -> Self {
        Self {
            background: Color::rgb(0.02, 0.06, 0.03),
            paddle: Color::rgb(0.85, 0.75, 0.45),
            ball: Color::rgb(0.95, 1.0, 0.9),
            bricks: vec![
                Color::rgb(0.1, 0.4, 0.15),
                Color::rgb(0.25, 0.6, 0.2),
                Color::rgb(0.5, 0.75, 0.25),
                Color::rgb(0.6, 0.45, 0.2),
            ],
            particle: Color::rgb(0.8, 1.0, 0.5),
            text: Color::rgb(0.9, 1.0, 0.9),
        }
    }

    pub fn violet() -> Self {
        Self {
            background: Color::rgb(0.05, 0.0, 0.1),
            paddle: Color::rgb(0.6, 0.2, 0.8),
            ball: Color::WHITE,
            bricks: vec![
                Color::rgb(0.9, 0.85, 0.3),
                Color::rgb(0.75, 0.4, 0.95),
                Color::rgb(0.5, 0.25, 0.85),
                Color::rgb(0.95, 0.4, 0.75),
            ],
            particle: Color::rgb(0.95, 0.8, 1.0),
            text: Color::rgb(0.95, 0.9, 1.0),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::neon()
    }
}
