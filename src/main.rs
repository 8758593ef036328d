//! Brickfall entry point
//!
//! Browser: binds the engine to `#game-canvas` and exports the session API to
//! the page. Native: headless autopilot run that exercises a whole session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent, TouchEvent};

    use brickfall::persistence::LocalStorageStore;
    use brickfall::platform::web::AnimationFrameScheduler;
    use brickfall::renderer::CanvasSurface;
    use brickfall::sim::GameStatus;
    use brickfall::{GameOrchestrator, InputEvent, Settings};

    type Game = GameOrchestrator<CanvasSurface, AnimationFrameScheduler>;

    const CANVAS_ID: &str = "game-canvas";

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Run `f` against the live game, if there is one and it is not busy
    fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        let game = GAME.with(|g| g.borrow().clone())?;
        let Ok(mut g) = game.try_borrow_mut() else {
            log::warn!("Game busy, ignoring host call");
            return None;
        };
        Some(f(&mut g))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Brickfall starting...");

        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .expect("page has no #game-canvas element");

        let dpr = window.device_pixel_ratio();
        let mut surface = match CanvasSurface::new(canvas.clone(), dpr) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        let stage = surface.fit_to_display(dpr);

        let scheduler = AnimationFrameScheduler::new();
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let store = Box::new(LocalStorageStore::default());

        let game = match GameOrchestrator::new(surface, scheduler.clone(), store, settings, stage, seed) {
            Ok(game) => Rc::new(RefCell::new(game)),
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };

        // The scheduler lives inside the game, so the callback only holds a weak reference
        let weak = Rc::downgrade(&game);
        scheduler.set_callback(Rc::new(move |time: f64| {
            if let Some(game) = weak.upgrade() {
                game.borrow_mut().frame(time);
            }
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_resize(game.clone());
        setup_auto_pause(game.clone());

        // Show the menu until the page calls start_game()
        game.borrow_mut().render();
        GAME.with(|g| *g.borrow_mut() = Some(game));

        log::info!("Brickfall ready");
    }

    /// Pointer position relative to the canvas' top-left corner
    fn canvas_x(canvas: &HtmlCanvasElement, client_x: i32) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        (client_x as f64 - rect.left()) as f32
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse and pen
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let x = canvas_x(&canvas_clone, event.client_x());
                game.borrow_mut().handle_input(InputEvent::PointerMove {
                    x,
                    y: event.client_y() as f32,
                });
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch drag
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let x = canvas_x(&canvas_clone, touch.client_x());
                    game.borrow_mut().handle_input(InputEvent::TouchMove {
                        x,
                        y: touch.client_y() as f32,
                    });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: pause, and Enter to advance between screens
        {
            let document = web_sys::window().unwrap().document().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Escape" | "p" | "P" => {
                        event.prevent_default();
                        g.handle_input(InputEvent::TogglePause);
                    }
                    "Enter" => match g.status() {
                        GameStatus::Menu | GameStatus::GameOver => g.start(),
                        GameStatus::LevelComplete => {
                            g.next_level();
                        }
                        _ => {}
                    },
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let mut g = game.borrow_mut();
            let stage = g.surface_mut().fit_to_display(dpr);
            g.resize(stage.width, stage.height);
            g.render();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.status() == GameStatus::Playing {
                        g.toggle_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.status() == GameStatus::Playing {
                    g.toggle_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    #[wasm_bindgen]
    pub fn start_game() {
        with_game(|g| g.start());
    }

    #[wasm_bindgen]
    pub fn stop_game() {
        with_game(|g| g.stop());
    }

    #[wasm_bindgen]
    pub fn toggle_pause() -> bool {
        with_game(|g| g.toggle_pause()).unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn next_level() -> bool {
        with_game(|g| g.next_level()).unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn restart_level() -> bool {
        with_game(|g| g.restart_level()).unwrap_or(false)
    }

    /// Current session snapshot as JSON, `null` before the engine is ready
    #[wasm_bindgen]
    pub fn game_state() -> String {
        with_game(|g| serde_json::to_string(&g.get_state()).ok())
            .flatten()
            .unwrap_or_else(|| "null".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;

    use brickfall::persistence::JsonFileStore;
    use brickfall::platform::ManualScheduler;
    use brickfall::renderer::RecordingSurface;
    use brickfall::sim::{GameStatus, Stage};
    use brickfall::{EngineError, GameOrchestrator, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Ten minutes of simulated play
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    pub fn run() -> Result<(), EngineError> {
        let mut settings = match std::env::args().nth(1) {
            Some(path) => Settings::load_from_path(Path::new(&path))?,
            None => Settings::default(),
        };
        settings.autopilot = true;

        let store = JsonFileStore::new(std::env::temp_dir().join("brickfall_high_score.json"));
        let mut game = GameOrchestrator::new(
            RecordingSurface::new(),
            ManualScheduler::new(),
            Box::new(store),
            settings,
            Stage::new(800.0, 600.0),
            42,
        )?;

        game.start();
        let mut frame = 0;
        while frame < MAX_FRAMES {
            match game.status() {
                GameStatus::LevelComplete => {
                    game.next_level();
                }
                GameStatus::GameOver => break,
                _ => {}
            }
            game.frame(frame as f64 * FRAME_MS);
            frame += 1;
        }
        game.stop();

        let state = game.get_state();
        log::info!(
            "Finished after {} frames: {:?}, level {}/{}, score {}, best {}",
            frame,
            state.status,
            state.level_index + 1,
            state.total_levels,
            state.total_score,
            state.high_score
        );
        println!(
            "{} | score {} | best {} | lives {}",
            if state.victory { "victory" } else { "run ended" },
            state.display_score(),
            state.high_score,
            state.lives
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brickfall (native) starting headless autopilot run...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
