//! Browser frame scheduling via requestAnimationFrame

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{FrameHandle, FrameScheduler};

/// Called with the host's high-resolution timestamp (ms)
pub type FrameCallback = Rc<dyn Fn(f64)>;

/// Schedules frames with `window.requestAnimationFrame`.
///
/// The callback is installed after the game is constructed, since it has to
/// reach back into the game. Clones share the callback slot.
#[derive(Clone, Default)]
pub struct AnimationFrameScheduler {
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl AnimationFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_callback(&self, callback: FrameCallback) {
        *self.callback.borrow_mut() = Some(callback);
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.borrow().clone()?;
        let window = web_sys::window()?;
        let closure = Closure::once(move |time: f64| callback(time));
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok()?;
        closure.forget();
        Some(FrameHandle(id))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.cancel_animation_frame(handle.0) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }
}
