//! Touch/mouse capability descriptor, selected once at startup.
//!
//! The page either runs under touch events or mouse events for its whole
//! lifetime; every consumer binds through the same backend rather than
//! probing per event.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use crate::dom;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerBackend {
    Touch,
    Mouse,
}

impl PointerBackend {
    /// Probe touch capability the way the platform exposes it: an
    /// `ontouchstart` handler slot or a non-zero `maxTouchPoints`.
    pub fn detect(window: &web::Window) -> Self {
        let has_touch_start =
            js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("ontouchstart"))
                .unwrap_or(false);
        if has_touch_start || window.navigator().max_touch_points() > 0 {
            Self::Touch
        } else {
            Self::Mouse
        }
    }

    pub fn down(self) -> &'static str {
        match self {
            Self::Touch => "touchstart",
            Self::Mouse => "mousedown",
        }
    }

    pub fn moved(self) -> &'static str {
        match self {
            Self::Touch => "touchmove",
            Self::Mouse => "mousemove",
        }
    }

    pub fn up(self) -> &'static str {
        match self {
            Self::Touch => "touchend",
            Self::Mouse => "mouseup",
        }
    }

    /// Mouse input has no cancellation event.
    pub fn cancel(self) -> Option<&'static str> {
        match self {
            Self::Touch => Some("touchcancel"),
            Self::Mouse => None,
        }
    }

    pub fn body_class(self) -> &'static str {
        match self {
            Self::Touch => "touch",
            Self::Mouse => "mouse",
        }
    }

    /// Client coordinates of the contact, from the first touch point or the
    /// mouse position. `None` for foreign event types (e.g. a `touchend`
    /// with no remaining touches).
    pub fn pointer(self, ev: &web::Event) -> Option<Vec2> {
        match self {
            Self::Touch => {
                let touch = ev.dyn_ref::<web::TouchEvent>()?.touches().get(0)?;
                Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
            }
            Self::Mouse => {
                let mouse = ev.dyn_ref::<web::MouseEvent>()?;
                Some(Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32))
            }
        }
    }

    /// Tag `<body>` with the input capability so styles can adapt.
    pub fn tag_body(self, document: &web::Document) {
        if let Some(body) = document.body() {
            dom::add_class(&body, self.body_class());
        }
    }
}
