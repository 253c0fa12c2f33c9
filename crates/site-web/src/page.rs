//! Page controller: scroll-driven body state and nav highlighting.
//!
//! The section under a fixed probe point decides which nav entry is
//! `current`; changes push the fragment onto the history and scroll the
//! header slider to the active link.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys as web;

use crate::constants::{NAV_PROBE_X, NAV_PROBE_Y, SCROLLED_THRESHOLD_PX, SCROLL_THROTTLE_MS};
use crate::dom;
use crate::slider::Slider;
use crate::throttle::Throttle;

pub fn install(window: &web::Window, document: &web::Document, header_slider: Slider) {
    // Track the section named by the first nav link's fragment.
    let initial = document
        .query_selector(".nav a")
        .ok()
        .flatten()
        .and_then(|el| el.get_attribute("href"))
        .and_then(|href| href.split('#').nth(1).map(str::to_owned))
        .unwrap_or_default();
    let current = Rc::new(RefCell::new(initial));

    let on_scroll = {
        let window = window.clone();
        let document = document.clone();
        let current = current.clone();
        move || {
            update_scrolled(&window, &document);
            update_nav(&document, &current, &header_slider);
        }
    };
    let throttle = Throttle::new(SCROLL_THROTTLE_MS, on_scroll);
    dom::add_listener(window.as_ref(), "scroll", move |_ev| throttle.fire());

    // A nav click scrolls programmatically; re-seat the tracked section so
    // the next scroll event doesn't immediately re-fire the change.
    if let Ok(Some(link)) = document.query_selector(".nav a") {
        let document = document.clone();
        let current = current.clone();
        dom::add_listener(link.as_ref(), "click", move |_ev| {
            *current.borrow_mut() = section_under_probe(&document);
        });
    }
}

fn section_under_probe(document: &web::Document) -> String {
    document
        .element_from_point(NAV_PROBE_X, NAV_PROBE_Y)
        .map(|el| el.id())
        .unwrap_or_default()
}

fn update_scrolled(window: &web::Window, document: &web::Document) {
    let Some(body) = document.body() else {
        return;
    };
    let scrolled = window.scroll_y().unwrap_or(0.0) > SCROLLED_THRESHOLD_PX;
    if scrolled {
        dom::add_class(&body, "scrolled");
    } else {
        dom::remove_class(&body, "scrolled");
    }
}

fn update_nav(document: &web::Document, current: &Rc<RefCell<String>>, slider: &Slider) {
    let section = section_under_probe(document);
    if *current.borrow() != section {
        change_current(document, &section, current, slider);
    }
}

fn change_current(
    document: &web::Document,
    section: &str,
    current: &Rc<RefCell<String>>,
    slider: &Slider,
) {
    *current.borrow_mut() = section.to_owned();

    if let Some(history) = web::window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&format!("#{section}")));
    }

    if let Ok(Some(old)) = document.query_selector(".nav .current") {
        dom::remove_class(&old, "current");
    }

    let selector = if section.is_empty() {
        ".nav a[href=\"/\"]".to_owned()
    } else {
        format!(".nav a[href=\"#{section}\"]")
    };
    if let Ok(Some(link)) = document.query_selector(&selector) {
        dom::add_class(&link, "current");
        slider.move_to_elem(&link);
    }
}
