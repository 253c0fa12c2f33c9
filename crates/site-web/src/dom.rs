use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!(format!("{:?}", e))
}

#[inline]
pub fn add_class(el: &web::Element, name: &str) {
    let _ = el.class_list().add_1(name);
}

#[inline]
pub fn remove_class(el: &web::Element, name: &str) {
    let _ = el.class_list().remove_1(name);
}

#[inline]
pub fn has_class(el: &web::Element, name: &str) -> bool {
    el.class_list().contains(name)
}

/// Write the canvas translation. Offsets apply on the horizontal axis only.
#[inline]
pub fn set_transform_x(el: &web::HtmlElement, x: f32) {
    let _ = el
        .style()
        .set_property("transform", &format!("translate3d({x}px, 0, 0)"));
}

#[inline]
pub fn set_transition(el: &web::HtmlElement, value: &str) {
    let _ = el.style().set_property("transition", value);
}

#[inline]
pub fn transition_value(duration_sec: f32) -> String {
    format!("all {duration_sec}s ease-out")
}

/// All elements under `root` matching `selector`, dropping non-element nodes.
pub fn query_all(root: &web::Element, selector: &str) -> Vec<web::Element> {
    let mut out = Vec::new();
    if let Ok(list) = root.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) {
                out.push(el);
            }
        }
    }
    out
}

/// One-shot timeout on the window's event loop.
pub fn set_timeout(ms: i32, f: impl FnOnce() + 'static) {
    if let Some(w) = web::window() {
        let cb = Closure::once_into_js(f);
        let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms);
    }
}

/// Persistent event listener; the closure is leaked for the page's lifetime.
pub fn add_listener(target: &web::EventTarget, event: &str, handler: impl FnMut(web::Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Like [`add_listener`] but non-passive, for handlers that must be able to
/// prevent native scrolling.
pub fn add_active_listener(
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(web::Event) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(false);
    let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &opts,
    );
    closure.forget();
}

/// Listener removed by the browser after its first invocation.
pub fn add_once_listener(
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(web::Event) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    let opts = web::AddEventListenerOptions::new();
    opts.set_once(true);
    let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &opts,
    );
    closure.forget();
}
