//! Neural visualization driver.
//!
//! Mounts a canvas under the `.neural` element and drives the scene from
//! `requestAnimationFrame`. The effect is pure decoration: if WebGPU is
//! unavailable the mount logs and bows out, leaving the page untouched.

use std::cell::RefCell;
use std::rc::Rc;

use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use site_core::{DotInstance, NeuralScene, SegmentInstance};

use crate::dom;
use crate::render;

pub fn mount(host: web::Element) -> anyhow::Result<()> {
    let host: web::HtmlElement = host
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("neural mount is not an HTML element"))?;
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(dom::js_err)?
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("created element is not a canvas"))?;
    host.append_child(&canvas).map_err(dom::js_err)?;
    sync_backing_size(&host, &canvas);

    let scene = NeuralScene::new(js_sys::Date::now() as u64);

    spawn_local(async move {
        // Leak a canvas clone to satisfy the surface's 'static lifetime
        let leaked_canvas: &'static web::HtmlCanvasElement = Box::leak(Box::new(canvas.clone()));
        let gpu = match render::GpuState::new(leaked_canvas).await {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("neural renderer unavailable: {e:?}");
                return;
            }
        };

        wire_resize(&host, &canvas);

        let ctx = Rc::new(RefCell::new(FrameContext {
            scene,
            gpu,
            canvas,
            last_instant: Instant::now(),
            dots: Vec::new(),
            segments: Vec::new(),
        }));
        start_loop(ctx);
    });

    Ok(())
}

struct FrameContext {
    scene: NeuralScene,
    gpu: render::GpuState<'static>,
    canvas: web::HtmlCanvasElement,
    last_instant: Instant,
    dots: Vec<DotInstance>,
    segments: Vec<SegmentInstance>,
}

impl FrameContext {
    fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        self.scene.tick(dt_sec);
        self.dots.clear();
        self.scene.dots(&mut self.dots);
        self.segments.clear();
        self.scene.segments(&mut self.segments);

        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        if let Err(e) = self
            .gpu
            .render(self.scene.rotation(), &self.dots, &self.segments)
        {
            log::error!("render error: {:?}", e);
        }
    }
}

fn start_loop(ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        ctx.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn wire_resize(host: &web::HtmlElement, canvas: &web::HtmlCanvasElement) {
    let Some(window) = web::window() else {
        return;
    };
    let host = host.clone();
    let canvas = canvas.clone();
    dom::add_listener(window.as_ref(), "resize", move |_ev| {
        sync_backing_size(&host, &canvas);
    });
}

/// Match the canvas backing store to the host's CSS size times the device
/// pixel ratio. Unchanged sizes are left alone so the surface isn't
/// reconfigured for no-op resize events.
fn sync_backing_size(host: &web::HtmlElement, canvas: &web::HtmlCanvasElement) {
    let Some(window) = web::window() else {
        return;
    };
    let dpr = window.device_pixel_ratio();
    let width = ((host.client_width() as f64 * dpr) as u32).max(1);
    let height = ((host.client_height() as f64 * dpr) as u32).max(1);
    if width == canvas.width() && height == canvas.height() {
        return;
    }
    canvas.set_width(width);
    canvas.set_height(height);
}
