//! Session orchestrator
//!
//! Owns the drawing surface, the frame scheduler, the state machine and the
//! active level. Each frame runs input, physics, collision, state transition
//! and render in that order.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::persistence::HighScoreStore;
use crate::platform::{FpsCounter, FrameClock, FrameHandle, FrameScheduler};
use crate::renderer::{Surface2d, render_scene};
use crate::settings::{LayoutPolicy, Settings};
use crate::sim::{GameSnapshot, GameStateManager, GameStatus, Level, LevelOutcome, LevelSet, Stage};

/// Host input, in stage coordinates (CSS pixels from the canvas' top-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerMove { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    TogglePause,
}

pub struct GameOrchestrator<S: Surface2d, F: FrameScheduler> {
    surface: S,
    scheduler: F,
    manager: GameStateManager,
    levels: LevelSet,
    settings: Settings,
    stage: Stage,
    level: Option<Level>,
    clock: FrameClock,
    fps: FpsCounter,
    /// Outstanding host frame callback, if any
    pending_frame: Option<FrameHandle>,
    seed: u64,
}

impl<S: Surface2d, F: FrameScheduler> GameOrchestrator<S, F> {
    /// Build a session in `Menu`. Fails only on an invalid level set.
    pub fn new(
        surface: S,
        scheduler: F,
        store: Box<dyn HighScoreStore>,
        settings: Settings,
        stage: Stage,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let levels = match &settings.levels {
            Some(custom) => LevelSet::new(custom.clone())?,
            None => LevelSet::builtin(),
        };
        let lives = settings.starting_lives.max(1);
        let manager = GameStateManager::new(lives, levels.len(), store);

        log::info!(
            "Brickfall ready: {} levels, {:?} quality, stage {}x{}",
            levels.len(),
            settings.quality,
            stage.width,
            stage.height
        );

        Ok(Self {
            surface,
            scheduler,
            manager,
            levels,
            settings,
            stage,
            level: None,
            clock: FrameClock::default(),
            fps: FpsCounter::default(),
            pending_frame: None,
            seed,
        })
    }

    /// Start a fresh session from Menu or GameOver and make sure the loop is
    /// scheduled. Anything else only resumes scheduling if it was stopped.
    pub fn start(&mut self) {
        if self.manager.start_new_game() {
            self.load_level(0);
        }
        if self.pending_frame.is_none() {
            self.clock.reset();
            self.schedule_frame();
        }
    }

    /// Cancel the pending frame. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
            log::info!("Frame loop stopped");
        }
        self.clock.reset();
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.manager.toggle_pause()
    }

    /// Load the following level, or finish the run after the last one
    pub fn next_level(&mut self) -> bool {
        if !self.manager.next_level() {
            return false;
        }
        if self.manager.status() == GameStatus::Playing {
            self.load_level(self.manager.state().level_index);
        }
        true
    }

    /// Rebuild the current level from its definition and resume play
    pub fn restart_level(&mut self) -> bool {
        if !self.manager.restart_level() {
            return false;
        }
        match self.level.as_mut() {
            Some(level) => {
                level.reset();
                log::info!("Level {} restarted", level.index() + 1);
            }
            None => self.load_level(self.manager.state().level_index),
        }
        true
    }

    pub fn get_state(&self) -> GameSnapshot {
        let level_score = self.level.as_ref().map_or(0, Level::score);
        GameSnapshot::new(self.manager.state(), level_score)
    }

    /// Host per-frame callback
    pub fn frame(&mut self, now_ms: f64) {
        if self.pending_frame.take().is_none() {
            log::debug!("Ignoring stale frame at {:.1}ms", now_ms);
            return;
        }

        let dt = self.clock.tick(now_ms);
        self.update(dt);
        self.render();
        self.fps.record(now_ms);
        self.schedule_frame();
    }

    /// Advance the simulation by `dt` seconds. Only runs while Playing.
    pub fn update(&mut self, dt: f32) {
        if self.manager.status() != GameStatus::Playing {
            return;
        }
        let Some(level) = self.level.as_mut() else {
            return;
        };

        if self.settings.autopilot {
            level.autopilot();
        }

        match level.update(dt) {
            LevelOutcome::Running => {}
            LevelOutcome::Cleared => {
                self.manager.complete_level(level.score());
            }
            LevelOutcome::BallLost => {
                self.manager.lose_life();
                if self.manager.status() == GameStatus::Playing {
                    match self.settings.life_loss_policy {
                        LayoutPolicy::Rebuild => level.reset(),
                        LayoutPolicy::Preserve => level.respawn(),
                    }
                }
            }
        }
    }

    /// Adopt new stage dimensions. Unready sizes (zero, negative, NaN) are skipped.
    pub fn resize(&mut self, width: f32, height: f32) {
        let stage = Stage::new(width, height);
        if !stage.is_valid() {
            log::debug!("Skipping resize to {}x{}", width, height);
            return;
        }
        self.stage = stage;

        if let Some(level) = self.level.as_mut() {
            // Nothing to preserve from a level laid out on an unready stage
            let policy = if level.stage().is_valid() {
                self.settings.resize_policy
            } else {
                LayoutPolicy::Rebuild
            };
            level.resize(stage, policy);
            log::debug!("Level {} resized to {}x{} ({:?})", level.index() + 1, width, height, policy);
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, .. } | InputEvent::TouchMove { x, .. } => {
                if let Some(level) = self.level.as_mut() {
                    level.paddle.set_target(x, self.stage);
                }
            }
            InputEvent::TogglePause => {
                self.toggle_pause();
            }
        }
    }

    pub fn render(&mut self) {
        let snapshot = self.get_state();
        let fps = self.settings.show_fps.then(|| self.fps.fps());
        render_scene(&mut self.surface, self.stage, self.level.as_ref(), &snapshot, fps);
    }

    /// True while a frame callback is outstanding
    pub fn is_running(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn status(&self) -> GameStatus {
        self.manager.status()
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Host access to the surface, e.g. to refit a canvas before `resize`
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    fn schedule_frame(&mut self) {
        self.pending_frame = self.scheduler.request_frame();
        if self.pending_frame.is_none() {
            log::warn!("Host refused to schedule a frame");
        }
    }

    fn load_level(&mut self, index: usize) {
        let Some(definition) = self.levels.get(index) else {
            log::warn!("No level at index {}", index);
            return;
        };
        log::info!("Loading level {}: {}", index + 1, definition.name);
        self.level = Some(Level::new(
            index,
            definition,
            self.stage,
            self.settings.tuning,
            self.settings.max_particles(),
            self.seed ^ index as u64,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::ManualScheduler;
    use crate::renderer::RecordingSurface;
    use crate::sim::{ColorScheme, LevelDefinition};

    type TestGame = GameOrchestrator<RecordingSurface, ManualScheduler>;

    fn game_with(settings: Settings) -> TestGame {
        GameOrchestrator::new(
            RecordingSurface::new(),
            ManualScheduler::new(),
            Box::new(MemoryStore::default()),
            settings,
            Stage::new(400.0, 600.0),
            7,
        )
        .unwrap()
    }

    fn two_small_levels() -> Settings {
        Settings {
            levels: Some(vec![
                LevelDefinition::new("One", &["11", "11"], ColorScheme::neon(), 1.0),
                LevelDefinition::new("Two", &["2"], ColorScheme::ember(), 1.0),
            ]),
            ..Settings::default()
        }
    }

    fn clear_bricks(game: &mut TestGame) {
        let level = game.level.as_mut().unwrap();
        for brick in level.bricks_mut() {
            while brick.is_active() {
                brick.hit();
            }
        }
    }

    #[test]
    fn test_empty_custom_levels_rejected() {
        let settings = Settings {
            levels: Some(Vec::new()),
            ..Settings::default()
        };
        let result = GameOrchestrator::new(
            RecordingSurface::new(),
            ManualScheduler::new(),
            Box::new(MemoryStore::default()),
            settings,
            Stage::new(400.0, 600.0),
            1,
        );
        assert!(matches!(result, Err(EngineError::EmptyLevelSet)));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut game = game_with(Settings::default());
        assert_eq!(game.status(), GameStatus::Menu);
        game.start();
        game.start();
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.scheduler().requested(), 1);
        assert!(game.level().is_some());
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut game = game_with(Settings::default());
        game.start();
        game.stop();
        game.stop();
        assert!(!game.is_running());
        assert_eq!(game.scheduler().cancelled(), 1);

        // A stale callback neither renders nor reschedules
        game.frame(16.0);
        assert_eq!(game.surface().frames(), 0);
        assert_eq!(game.scheduler().requested(), 1);

        // Restarting the loop keeps the session
        game.start();
        assert_eq!(game.scheduler().requested(), 2);
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn test_frame_renders_and_reschedules() {
        let mut game = game_with(Settings::default());
        game.start();
        game.frame(0.0);
        game.frame(16.0);
        assert_eq!(game.surface().frames(), 2);
        assert_eq!(game.scheduler().requested(), 3);
        assert!(game.is_running());
    }

    #[test]
    fn test_paused_frames_skip_physics() {
        let mut game = game_with(Settings::default());
        game.start();
        game.frame(0.0);
        game.frame(16.0);
        assert!(game.toggle_pause());

        let before = game.level().unwrap().ball.pos;
        game.frame(32.0);
        game.frame(48.0);
        assert_eq!(game.level().unwrap().ball.pos, before);
        assert!(game.surface().contains_text("PAUSED"));

        game.handle_input(InputEvent::TogglePause);
        game.frame(64.0);
        assert_ne!(game.level().unwrap().ball.pos, before);
    }

    #[test]
    fn test_menu_update_is_noop() {
        let mut game = game_with(Settings::default());
        game.update(0.016);
        assert!(game.level().is_none());
        assert!(!game.toggle_pause());
        assert!(!game.next_level());
        assert!(!game.restart_level());
        assert_eq!(game.status(), GameStatus::Menu);
    }

    #[test]
    fn test_resize_skips_unready_sizes() {
        let mut game = game_with(Settings::default());
        game.start();
        game.resize(0.0, 600.0);
        game.resize(400.0, -1.0);
        game.resize(f32::NAN, 600.0);
        assert_eq!(game.stage(), Stage::new(400.0, 600.0));
        assert_eq!(game.level().unwrap().stage(), Stage::new(400.0, 600.0));
    }

    #[test]
    fn test_resize_rebuild_restores_bricks() {
        let mut game = game_with(two_small_levels());
        game.start();
        game.level.as_mut().unwrap().bricks_mut()[0].hit();
        assert_eq!(game.level().unwrap().bricks_remaining(), 3);

        game.resize(500.0, 700.0);
        let level = game.level().unwrap();
        assert_eq!(level.bricks_remaining(), 4);
        assert_eq!(level.stage(), Stage::new(500.0, 700.0));
    }

    #[test]
    fn test_resize_preserve_keeps_damage() {
        let mut game = game_with(Settings {
            resize_policy: LayoutPolicy::Preserve,
            ..two_small_levels()
        });
        game.start();
        game.level.as_mut().unwrap().bricks_mut()[0].hit();
        let vel = game.level().unwrap().ball.vel;

        game.resize(500.0, 700.0);
        let level = game.level().unwrap();
        assert_eq!(level.bricks_remaining(), 3);
        assert_eq!(level.ball.vel, vel);
    }

    #[test]
    fn test_pointer_input_clamped() {
        let mut game = game_with(Settings::default());
        game.start();
        game.handle_input(InputEvent::PointerMove { x: 9999.0, y: 0.0 });
        assert_eq!(game.level().unwrap().paddle.target_x, 400.0);
        game.handle_input(InputEvent::TouchMove { x: -50.0, y: 10.0 });
        assert_eq!(game.level().unwrap().paddle.target_x, 0.0);
    }

    #[test]
    fn test_ball_lost_costs_a_life() {
        let mut game = game_with(two_small_levels());
        game.start();
        game.level.as_mut().unwrap().bricks_mut()[0].hit();
        {
            let level = game.level.as_mut().unwrap();
            level.ball.pos.y = 650.0;
            level.ball.vel = glam::Vec2::new(0.0, 300.0);
        }

        game.update(0.016);
        assert_eq!(game.get_state().lives, 2);
        assert_eq!(game.status(), GameStatus::Playing);
        // Default policy rebuilds the level and re-serves the ball
        let level = game.level().unwrap();
        assert_eq!(level.bricks_remaining(), 4);
        assert!(level.ball.pos.y < level.paddle.top());
        assert!(level.ball.vel.y < 0.0);
    }

    #[test]
    fn test_ball_lost_preserve_keeps_bricks() {
        let mut game = game_with(Settings {
            life_loss_policy: LayoutPolicy::Preserve,
            ..two_small_levels()
        });
        game.start();
        game.level.as_mut().unwrap().bricks_mut()[0].hit();
        game.level.as_mut().unwrap().ball.pos.y = 650.0;
        game.level.as_mut().unwrap().ball.vel = glam::Vec2::new(0.0, 300.0);

        game.update(0.016);
        assert_eq!(game.get_state().lives, 2);
        assert_eq!(game.level().unwrap().bricks_remaining(), 3);
    }

    #[test]
    fn test_clearing_every_level_wins() {
        let mut game = game_with(two_small_levels());
        game.start();

        clear_bricks(&mut game);
        game.update(0.016);
        assert_eq!(game.status(), GameStatus::LevelComplete);
        assert!(game.next_level());
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.level().unwrap().name(), "Two");

        clear_bricks(&mut game);
        game.update(0.016);
        assert!(game.next_level());
        let state = game.get_state();
        assert_eq!(state.status, GameStatus::GameOver);
        assert!(state.victory);

        game.render();
        assert!(game.surface().contains_text("YOU WIN"));

        // A new session starts over from level one
        game.start();
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.level().unwrap().name(), "One");
    }

    #[test]
    fn test_restart_level_rebuilds_and_resumes() {
        let mut game = game_with(two_small_levels());
        game.start();
        game.level.as_mut().unwrap().bricks_mut()[0].hit();
        game.toggle_pause();

        assert!(game.restart_level());
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.level().unwrap().bricks_remaining(), 4);
    }

    #[test]
    fn test_state_serializes_for_hosts() {
        let mut game = game_with(Settings::default());
        game.start();
        let json = serde_json::to_string(&game.get_state()).unwrap();
        assert!(json.contains("\"status\":\"Playing\""));
        assert!(json.contains("\"lives\":3"));
    }

    #[test]
    fn test_autopilot_tracks_ball() {
        let mut game = game_with(Settings {
            autopilot: true,
            ..Settings::default()
        });
        game.start();
        {
            let level = game.level.as_mut().unwrap();
            level.ball.pos = glam::Vec2::new(100.0, 300.0);
            level.ball.vel = glam::Vec2::new(0.0, 200.0);
        }
        game.update(0.016);

        // Steered under the falling ball without any input events
        let level = game.level().unwrap();
        let off_center_limit = level.paddle.width * 0.3 + 0.01;
        assert!((level.paddle.target_x - 100.0).abs() <= off_center_limit);
        assert!(level.paddle.x < 200.0);
    }
}
