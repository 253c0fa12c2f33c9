//! Leading-edge throttle with a trailing replay.
//!
//! Each throttle owns its state in its own allocation; there is no global
//! registry keying callbacks by identity.

use std::cell::Cell;
use std::rc::Rc;

use crate::dom;

#[derive(Clone)]
pub struct Throttle {
    state: Rc<ThrottleState>,
}

struct ThrottleState {
    limit_ms: i32,
    callback: Box<dyn Fn()>,
    waiting: Cell<bool>,
    trailing: Cell<bool>,
}

impl Throttle {
    pub fn new(limit_ms: i32, callback: impl Fn() + 'static) -> Self {
        Self {
            state: Rc::new(ThrottleState {
                limit_ms,
                callback: Box::new(callback),
                waiting: Cell::new(false),
                trailing: Cell::new(false),
            }),
        }
    }

    /// Invoke now if outside the limit window; otherwise queue one trailing
    /// invocation for when the window closes.
    pub fn fire(&self) {
        let state = &self.state;
        if state.waiting.get() {
            state.trailing.set(true);
            return;
        }
        (state.callback)();
        state.waiting.set(true);

        let state = self.state.clone();
        dom::set_timeout(state.limit_ms, move || {
            if state.trailing.replace(false) {
                (state.callback)();
            }
            state.waiting.set(false);
        });
    }
}
