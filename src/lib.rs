#![cfg(target_arch = "wasm32")]
use crate::dom::Listener;
use sentiscape_core::{Engine, SceneHandle};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys as web;

mod constants;
mod dom;
mod frame;
mod input;
mod options;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("sentiscape-web loaded");
    Ok(())
}

fn js_err(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

/// A running scene bound to one canvas. Dropping it (or calling `stop`)
/// cancels the animation frame and detaches every listener.
#[wasm_bindgen]
pub struct SceneHost {
    frame_ctx: Rc<RefCell<frame::FrameContext>>,
    handle: SceneHandle,
    frame_loop: Option<frame::LoopHandle>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl SceneHost {
    /// `config_json` is an optional `EngineConfig`; `params_json` an optional
    /// partial scene update applied before the first frame.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: Option<String>, params_json: Option<String>) -> Result<SceneHost, JsValue> {
        init(canvas_id, config_json.as_deref(), params_json.as_deref()).map_err(js_err)
    }

    /// Queues a partial update, e.g. `{"sentimentClass":"negative","sentimentScore":-0.6}`.
    /// It takes effect at the start of the next frame.
    pub fn update(&self, json: &str) -> Result<(), JsValue> {
        let update = options::parse_update(json).map_err(js_err)?;
        if !self.handle.update(update) {
            return Err(JsValue::from_str("scene has been torn down"));
        }
        Ok(())
    }

    /// Copy of the current frame, or `undefined` when nothing has been drawn.
    pub fn snapshot(&self) -> Result<Option<web::ImageData>, JsValue> {
        let ctx = self
            .frame_ctx
            .try_borrow()
            .map_err(|_| JsValue::from_str("scene is busy"))?;
        let Some(snap) = ctx.engine.snapshot() else {
            return Ok(None);
        };
        web::ImageData::new_with_u8_clamped_array_and_sh(Clamped(snap.rgba.as_slice()), snap.width, snap.height).map(Some)
    }

    pub fn stop(&mut self) {
        let Some(frame_loop) = self.frame_loop.take() else {
            return;
        };
        frame_loop.cancel();
        self.listeners.clear();
        if let Ok(mut ctx) = self.frame_ctx.try_borrow_mut() {
            ctx.engine.stop();
        }
        log::info!("[host] stopped");
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.frame_loop.is_some()
    }
}

impl Drop for SceneHost {
    fn drop(&mut self) {
        self.stop();
    }
}

fn init(canvas_id: &str, config_json: Option<&str>, params_json: Option<&str>) -> anyhow::Result<SceneHost> {
    let id = if canvas_id.trim().is_empty() {
        constants::DEFAULT_CANVAS_ID
    } else {
        canvas_id
    };
    let canvas = dom::canvas_by_id(id)?;
    let ctx2d = dom::context_2d(&canvas)?;
    let config = options::parse_config(config_json)?;
    let params = options::initial_params(params_json)?;

    let mut engine = Engine::new(config, params)?;
    dom::sync_canvas_backing_size(&canvas);
    // A zero-sized canvas is fine here; frames are skipped until layout.
    _ = engine.resize(canvas.width(), canvas.height());
    engine.start();
    let handle = engine.handle();

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(engine, canvas.clone(), ctx2d)));
    let listeners = wire_pointer(&canvas, &frame_ctx)?;
    let frame_loop = frame::start_loop(frame_ctx.clone());
    log::info!("[host] scene attached to #{id}");

    Ok(SceneHost {
        frame_ctx,
        handle,
        frame_loop: Some(frame_loop),
        listeners,
    })
}

fn wire_pointer(
    canvas: &web::HtmlCanvasElement,
    frame_ctx: &Rc<RefCell<frame::FrameContext>>,
) -> anyhow::Result<Vec<Listener>> {
    let target: &web::EventTarget = canvas.unchecked_ref();

    let (ctx, cv) = (frame_ctx.clone(), canvas.clone());
    let moved = Listener::pointer(target, "pointermove", move |ev| {
        if let (Some([x, y]), Ok(mut c)) = (input::pointer_canvas_px(&ev, &cv), ctx.try_borrow_mut()) {
            c.engine.pointer_moved(x, y);
        }
    })?;

    let (ctx, cv) = (frame_ctx.clone(), canvas.clone());
    let pressed = Listener::pointer(target, "pointerdown", move |ev| {
        _ = cv.set_pointer_capture(ev.pointer_id());
        if let (Some([x, y]), Ok(mut c)) = (input::pointer_canvas_px(&ev, &cv), ctx.try_borrow_mut()) {
            c.engine.pointer_pressed(x, y);
        }
    })?;

    let mut listeners = vec![moved, pressed];
    for event in ["pointerup", "pointercancel"] {
        let ctx = frame_ctx.clone();
        listeners.push(Listener::pointer(target, event, move |_| {
            if let Ok(mut c) = ctx.try_borrow_mut() {
                c.engine.pointer_released();
            }
        })?);
    }
    Ok(listeners)
}
