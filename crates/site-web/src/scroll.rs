//! Rubber-band scroll prevention for fixed overlays.
//!
//! A scrollable element inside a fixed container lets single-touch drags at
//! its scroll extremes bleed into the page behind it; swallowing those moves
//! keeps the overlay pinned. Touch-only, inert under mouse input.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;

pub fn prevent_fixed_scroll(elem: &web::Element) {
    let el: web::HtmlElement = match elem.clone().dyn_into() {
        Ok(el) => el,
        Err(_) => return,
    };
    let _ = el.style().set_property("-webkit-overflow-scrolling", "touch");

    let start_y = Rc::new(Cell::new(0.0f32));

    {
        let start_y = start_y.clone();
        dom::add_listener(el.as_ref(), "touchstart", move |ev| {
            if let Some(touch) = single_touch(&ev) {
                start_y.set(touch.client_y() as f32);
            }
        });
    }

    {
        let target = el.clone();
        let el = el.clone();
        dom::add_active_listener(target.as_ref(), "touchmove", move |ev| {
            let Some(touch) = single_touch(&ev) else {
                return;
            };
            let dy = touch.client_y() as f32 - start_y.get();

            let at_top = el.scroll_top() == 0;
            let fully_scrolled = el.scroll_height() - el.scroll_top() <= el.client_height();
            if (at_top && dy > 0.0) || (fully_scrolled && dy < 0.0) {
                ev.prevent_default();
            }
        });
    }
}

fn single_touch(ev: &web::Event) -> Option<web::Touch> {
    let touches = ev.dyn_ref::<web::TouchEvent>()?.target_touches();
    if touches.length() == 1 {
        touches.get(0)
    } else {
        None
    }
}
