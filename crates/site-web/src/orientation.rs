//! Orientation watcher: notifies subscribers on resize/orientation events,
//! then re-checks after a settle delay for devices that report a stale value
//! mid-transition.

use std::cell::RefCell;
use std::rc::Rc;

use site_core::Orientation;
use web_sys as web;

use crate::constants::ORIENTATION_SETTLE_MS;
use crate::dom;

/// Current orientation from the live viewport.
pub fn current() -> Orientation {
    let (width, height) = web::window()
        .map(|w| {
            (
                w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
                w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
            )
        })
        .unwrap_or((0.0, 0.0));
    Orientation::from_viewport(width as f32, height as f32)
}

#[derive(Clone)]
pub struct OrientationWatcher {
    inner: Rc<WatcherInner>,
}

struct WatcherInner {
    subscribers: RefCell<Vec<Rc<dyn Fn(Orientation)>>>,
}

impl OrientationWatcher {
    /// Install the window listeners. One watcher serves the whole page.
    pub fn install(window: &web::Window) -> Self {
        let inner = Rc::new(WatcherInner {
            subscribers: RefCell::new(Vec::new()),
        });
        for event in ["resize", "orientationchange"] {
            let inner = inner.clone();
            dom::add_listener(window.as_ref(), event, move |_ev| {
                WatcherInner::on_change(&inner);
            });
        }
        Self { inner }
    }

    /// Subscriptions last for the page's lifetime.
    pub fn subscribe(&self, cb: impl Fn(Orientation) + 'static) {
        self.inner.subscribers.borrow_mut().push(Rc::new(cb));
    }
}

impl WatcherInner {
    fn on_change(inner: &Rc<Self>) {
        let seen = current();
        log::debug!("orientation: {}", seen.label());
        inner.notify(seen);

        let inner = inner.clone();
        dom::set_timeout(ORIENTATION_SETTLE_MS, move || {
            let settled = current();
            if settled != seen {
                inner.notify(settled);
            }
        });
    }

    fn notify(&self, orientation: Orientation) {
        // Snapshot first: a callback may subscribe (slider activation does).
        let subscribers: Vec<_> = self.subscribers.borrow().iter().cloned().collect();
        for cb in subscribers {
            cb(orientation);
        }
    }
}
