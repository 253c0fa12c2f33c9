#![cfg(target_arch = "wasm32")]
//! WASM entry point for the lumen landing page.
//!
//! Wires the page together: the two carousels, the neural visualization,
//! scroll-driven nav highlighting, and the fixed-header scroll guard. All
//! missing page furniture degrades to a no-op; nothing here throws across
//! the JS boundary.

pub mod constants;
pub mod dom;
pub mod neural;
pub mod orientation;
pub mod page;
pub mod pointer;
pub mod render;
pub mod scroll;
pub mod slider;
pub mod throttle;

use wasm_bindgen::prelude::*;
use web_sys as web;

use crate::orientation::OrientationWatcher;
use crate::pointer::PointerBackend;
use crate::slider::{Slider, SliderOptions};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("site-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let backend = PointerBackend::detect(&window);
    backend.tag_body(&document);
    let watcher = OrientationWatcher::install(&window);

    let header_slider = document
        .query_selector(".header .slider")
        .map_err(dom::js_err)?
        .and_then(|el| {
            Slider::new(
                el,
                SliderOptions {
                    autoinit: true,
                    ..Default::default()
                },
                backend,
                watcher.clone(),
            )
        });

    let _media_slider = document
        .query_selector(".media .slider")
        .map_err(dom::js_err)?
        .and_then(|el| {
            Slider::new(
                el,
                SliderOptions {
                    autoinit: true,
                    ..Default::default()
                },
                backend,
                watcher.clone(),
            )
        });

    match header_slider {
        Some(header_slider) => page::install(&window, &document, header_slider),
        None => log::info!("no header slider found, nav highlighting disabled"),
    }

    if let Some(header) = document.query_selector(".header").map_err(dom::js_err)? {
        scroll::prevent_fixed_scroll(&header);
    }

    if let Some(host) = document.query_selector(".neural").map_err(dom::js_err)? {
        if let Err(e) = neural::mount(host) {
            log::error!("neural mount failed: {e:?}");
        }
    }

    Ok(())
}
