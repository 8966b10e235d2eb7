use crate::constants::MAX_HOST_DT_SEC;
use crate::dom;
use instant::Instant;
use sentiscape_core::{Engine, FrameOutcome};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast};
use web_sys as web;

pub struct FrameContext {
    pub engine: Engine,
    pub canvas: web::HtmlCanvasElement,
    pub ctx2d: web::CanvasRenderingContext2d,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn new(engine: Engine, canvas: web::HtmlCanvasElement, ctx2d: web::CanvasRenderingContext2d) -> Self {
        Self {
            engine,
            canvas,
            ctx2d,
            last_instant: Instant::now(),
        }
    }

    /// One display refresh: follow the container size, advance, draw, blit.
    pub fn frame(&mut self) {
        if let Some((w, h)) = dom::sync_canvas_backing_size(&self.canvas) {
            match self.engine.resize(w, h) {
                Ok(_) => log::info!("[frame] surface {}x{}", w, h),
                Err(e) => log::debug!("[frame] surface unavailable: {e}"),
            }
        }

        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_HOST_DT_SEC);
        self.last_instant = now;

        if let FrameOutcome::Drawn(stats) = self.engine.frame(dt_sec) {
            if !stats.overlay_drawn {
                log::debug!("[frame] {:.1}ms, overlay skipped", stats.elapsed_ms);
            }
            self.blit();
        }
    }

    fn blit(&self) {
        let Some(surface) = self.engine.surface() else {
            return;
        };
        let image = web::ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(surface.as_bytes()),
            surface.width(),
            surface.height(),
        );
        match image {
            Ok(image) => {
                _ = self.ctx2d.put_image_data(&image, 0.0, 0.0);
            }
            Err(e) => log::warn!("[frame] ImageData: {:?}", e),
        }
    }
}

type TickClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Owns the requestAnimationFrame chain; `cancel` ends it.
pub struct LoopHandle {
    tick: TickClosure,
    pending: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        self.running.set(false);
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        // Dropping the closure breaks its self-reference.
        self.tick.borrow_mut().take();
    }
}

fn request_frame(tick: &TickClosure, pending: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        pending.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let tick: TickClosure = Rc::new(RefCell::new(None));
    let pending = Rc::new(Cell::new(None));
    let running = Rc::new(Cell::new(true));

    let tick_clone = tick.clone();
    let pending_clone = pending.clone();
    let running_clone = running.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_clone.set(None);
        if !running_clone.get() {
            return;
        }
        if let Ok(mut ctx) = frame_ctx.try_borrow_mut() {
            ctx.frame();
        }
        request_frame(&tick_clone, &pending_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &pending);

    LoopHandle {
        tick,
        pending,
        running,
    }
}
