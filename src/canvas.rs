// Browser binding. Renders a HeartAnimation into a software pixel buffer and
// copies it into a 2D canvas with put_image_data, either one frame at a time
// via `tick` or continuously via `start`.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{console, CanvasRenderingContext2d, HtmlCanvasElement, ImageData, Window};

use crate::animation::{Frame, HeartAnimation, StopHandle};
use crate::config::Settings;
use crate::floating;
use crate::surface::{PixelBuffer, Surface};
use crate::utils::Timer;

type FrameCallback = Closure<dyn FnMut(f64)>;

#[wasm_bindgen]
pub struct HeartCanvas {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    buffer: PixelBuffer,
    animation: HeartAnimation,
    profiling: bool,
}

#[wasm_bindgen]
impl HeartCanvas {
    /// `settings_json` may be omitted to use the default look.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, settings_json: Option<String>) -> Result<HeartCanvas, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(to_js)?,
            None => Settings::default(),
        };
        let animation = HeartAnimation::new(settings).map_err(to_js)?;
        let context = canvas
            .get_context("2d")?
            .ok_or("canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut heart_canvas = HeartCanvas {
            canvas,
            context,
            buffer: PixelBuffer::new(0, 0),
            animation,
            profiling: false,
        };
        heart_canvas.resize();
        Ok(heart_canvas)
    }

    /// Matches the canvas backing store to its displayed size. Particles
    /// already in flight are kept.
    pub fn resize(&mut self) {
        let width = self.canvas.client_width().max(0) as u32;
        let height = self.canvas.client_height().max(0) as u32;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.buffer.resize(width, height);
    }

    /// Wraps each frame in console.time labels.
    #[wasm_bindgen(js_name = setProfiling)]
    pub fn set_profiling(&mut self, enabled: bool) {
        self.profiling = enabled;
    }

    /// Renders one frame at `now_ms` (a requestAnimationFrame timestamp).
    /// Returns false once the animation has been stopped.
    pub fn tick(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        let frame = {
            let _timer = Timer::when(self.profiling, "HeartCanvas::tick");
            self.animation.tick(now_ms / 1000.0, &mut self.buffer)
        };
        match frame {
            Frame::Stopped => Ok(false),
            Frame::Rendered(stats) => {
                if stats.drawn {
                    self.blit()?;
                }
                Ok(true)
            }
        }
    }

    pub fn stop(&self) {
        self.animation.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    #[wasm_bindgen(js_name = activeCount)]
    pub fn active_count(&self) -> usize {
        self.animation.pool().len()
    }

    /// Hands the canvas over to a requestAnimationFrame loop and a window
    /// resize listener. Both are torn down by the returned handle.
    pub fn start(self) -> Result<LoopHandle, JsValue> {
        let window = window()?;
        let stop = self.animation.stop_handle();
        let state = Rc::new(RefCell::new(self));
        let frame_id = Rc::new(Cell::new(None));

        let on_resize = {
            let state = state.clone();
            Closure::wrap(Box::new(move || state.borrow_mut().resize()) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        // The frame callback reschedules itself, so it needs a handle to its
        // own closure. The cycle is broken by LoopHandle::stop.
        let on_frame: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        {
            let next = on_frame.clone();
            let frame_id = frame_id.clone();
            let window = window.clone();
            let stop = stop.clone();
            *on_frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
                frame_id.set(None);
                let running = match state.borrow_mut().tick(now_ms) {
                    Ok(running) => running,
                    Err(err) => {
                        console::error_2(&"heart animation frame failed:".into(), &err);
                        stop.stop();
                        false
                    }
                };
                if !running {
                    return;
                }
                if let Some(callback) = next.borrow().as_ref() {
                    match request_frame(&window, callback) {
                        Ok(id) => frame_id.set(Some(id)),
                        Err(err) => console::error_1(&err),
                    }
                }
            }) as Box<dyn FnMut(f64)>));
        }

        let first = on_frame
            .borrow()
            .as_ref()
            .map(|callback| request_frame(&window, callback));
        // Built before checking `first` so a failed request still tears
        // everything down through Drop.
        let handle = LoopHandle {
            window,
            stop,
            frame_id,
            on_frame,
            on_resize: Some(on_resize),
        };
        if let Some(id) = first.transpose()? {
            handle.frame_id.set(Some(id));
        }
        console::log_1(&"heart animation started".into());
        Ok(handle)
    }
}

impl HeartCanvas {
    fn blit(&self) -> Result<(), JsValue> {
        let _timer = Timer::when(self.profiling, "ctx.put_image_data");
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(self.buffer.pixels()),
            self.buffer.width(),
            self.buffer.height(),
        )?;
        self.context.put_image_data(&image, 0.0, 0.0)
    }
}

/// Owner of a running animation loop. Dropping it stops the loop.
#[wasm_bindgen]
pub struct LoopHandle {
    window: Window,
    stop: StopHandle,
    frame_id: Rc<Cell<Option<i32>>>,
    on_frame: Rc<RefCell<Option<FrameCallback>>>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl LoopHandle {
    /// Cancels the pending frame and removes the resize listener.
    pub fn stop(&mut self) -> Result<(), JsValue> {
        self.stop.stop();
        if let Some(id) = self.frame_id.take() {
            self.window.cancel_animation_frame(id)?;
        }
        if let Some(on_resize) = self.on_resize.take() {
            self.window
                .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
            console::log_1(&"heart animation stopped".into());
        }
        self.on_frame.borrow_mut().take();
        Ok(())
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            console::error_1(&err);
        }
    }
}

/// JSON array of floating hearts to create for a viewport of this width,
/// each with its spawn delay.
#[wasm_bindgen(js_name = floatingHearts)]
pub fn floating_hearts(viewport_width: f64) -> Result<String, JsValue> {
    let hearts = floating::schedule(viewport_width, &mut rand::thread_rng());
    serde_json::to_string(&hearts).map_err(to_js)
}

/// JSON for one replacement floating heart.
#[wasm_bindgen(js_name = floatingHeart)]
pub fn floating_heart() -> Result<String, JsValue> {
    let heart = floating::FloatingHeart::sample(&mut rand::thread_rng());
    serde_json::to_string(&heart).map_err(to_js)
}

fn request_frame(window: &Window, callback: &FrameCallback) -> Result<i32, JsValue> {
    let function: &js_sys::Function = callback.as_ref().unchecked_ref();
    window.request_animation_frame(function)
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
