//! Carousel view: bridges the DOM to the motion controller.
//!
//! The view owns all measurement and all output. Layout is read into
//! [`Geometry`] snapshots, pointer events are forwarded as plain data, and
//! the controller's answers come back as class toggles and inline
//! `transform`/`transition` writes on the canvas element. Expected markup:
//! `.slider-inner > .slider-canvas > .slider-item*`, with optional
//! `.slider-control.left` / `.slider-control.right` buttons.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use site_core::{
    default_duration, Commit, Edge, Geometry, ItemRect, MotionConfig, MotionController,
    Orientation, SliderParams,
};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::INITIAL_SLIDE_IN_PX;
use crate::dom;
use crate::orientation::{self, OrientationWatcher};
use crate::pointer::PointerBackend;

pub struct SliderOptions {
    /// Advance per committed gesture, px (ignored in per-screen mode).
    pub step: f32,
    /// Minimum shift for a release to commit, px.
    pub threshold: f32,
    /// One item per viewport.
    pub per_screen: bool,
    /// Starting item.
    pub index: usize,
    /// Activate immediately instead of waiting for an explicit `init`.
    pub autoinit: bool,
    /// Fired once after the first layout.
    pub on_init: Option<Rc<dyn Fn(SliderParams)>>,
    /// Fired when a commit clamps against the track start.
    pub on_limit_left: Option<Rc<dyn Fn()>>,
    /// Fired when a commit clamps against the track end.
    pub on_limit_right: Option<Rc<dyn Fn()>>,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            step: site_core::constants::DEFAULT_STEP_PX,
            threshold: site_core::constants::DEFAULT_THRESHOLD_PX,
            per_screen: false,
            index: 0,
            autoinit: false,
            on_init: None,
            on_limit_left: None,
            on_limit_right: None,
        }
    }
}

struct SliderParts {
    inner: web::HtmlElement,
    canvas: web::HtmlElement,
    items: Vec<web::HtmlElement>,
    controls: Vec<web::HtmlElement>,
}

struct SliderShared {
    root: web::HtmlElement,
    backend: PointerBackend,
    watcher: OrientationWatcher,
    opts: SliderOptions,
    core: RefCell<MotionController>,
    parts: RefCell<Option<SliderParts>>,
    initialized: Cell<bool>,
    activated: Cell<bool>,
    controls_wired: Cell<bool>,
    drag_ready: Cell<bool>,
}

#[derive(Clone)]
pub struct Slider {
    shared: Rc<SliderShared>,
}

impl Slider {
    pub fn new(
        root: web::Element,
        opts: SliderOptions,
        backend: PointerBackend,
        watcher: OrientationWatcher,
    ) -> Option<Self> {
        let root: web::HtmlElement = root.dyn_into().ok()?;
        let cfg = MotionConfig {
            step: opts.step,
            threshold: opts.threshold,
            per_screen: opts.per_screen,
        };
        let autoinit = opts.autoinit;
        let slider = Self {
            shared: Rc::new(SliderShared {
                root,
                backend,
                watcher,
                opts,
                core: RefCell::new(MotionController::new(cfg)),
                parts: RefCell::new(None),
                initialized: Cell::new(false),
                activated: Cell::new(false),
                controls_wired: Cell::new(false),
                drag_ready: Cell::new(false),
            }),
        };
        if autoinit {
            slider.init();
        }
        Some(slider)
    }

    /// Begin watching orientation and wait for embedded images before the
    /// first layout. Safe to call once; later calls are no-ops.
    pub fn init(&self) {
        if self.shared.initialized.replace(true) {
            return;
        }
        {
            let this = self.clone();
            self.shared
                .watcher
                .subscribe(move |orientation| this.on_orientation(orientation));
        }

        let pending: Vec<web::HtmlImageElement> = dom::query_all(self.root(), "img")
            .into_iter()
            .filter_map(|el| el.dyn_into().ok())
            .filter(|img: &web::HtmlImageElement| {
                !img.src().is_empty() && img.width() == 0 && !img.complete()
            })
            .collect();

        if pending.is_empty() {
            self.activate(orientation::current());
            return;
        }

        let remaining = Rc::new(Cell::new(pending.len()));
        for img in pending {
            // Load and error both count as settled; neither may fire twice.
            let settled = Rc::new(Cell::new(false));
            for event in ["load", "error"] {
                let this = self.clone();
                let remaining = remaining.clone();
                let settled = settled.clone();
                dom::add_once_listener(img.as_ref(), event, move |_ev| {
                    if settled.replace(true) {
                        return;
                    }
                    remaining.set(remaining.get() - 1);
                    if remaining.get() == 0 {
                        this.activate(orientation::current());
                    }
                });
            }
        }
    }

    /// Scroll so the element's left edge sits at the track origin.
    pub fn move_to_elem(&self, elem: &web::Element) {
        let Some(target) = elem
            .dyn_ref::<web::HtmlElement>()
            .map(|el| -(el.offset_left() as f32))
        else {
            return;
        };
        let commit = self
            .shared
            .core
            .borrow_mut()
            .move_to(target, orientation::current());
        self.play_commit(&commit);
    }

    pub fn left(&self) {
        let commit = self
            .shared
            .core
            .borrow_mut()
            .step_left(orientation::current());
        if let Some(commit) = commit {
            self.play_commit(&commit);
        }
    }

    pub fn right(&self) {
        let commit = self
            .shared
            .core
            .borrow_mut()
            .step_right(orientation::current());
        if let Some(commit) = commit {
            self.play_commit(&commit);
        }
    }

    fn root(&self) -> &web::Element {
        &self.shared.root
    }

    fn activate(&self, orientation: Orientation) {
        if !self.shared.activated.get() {
            let Some(parts) = self.resolve_parts() else {
                log::error!("slider: missing inner or canvas element, staying inactive");
                return;
            };
            *self.shared.parts.borrow_mut() = Some(parts);
            self.shared.activated.set(true);
        }

        if self.shared.opts.per_screen {
            self.apply_item_widths();
        }
        self.relayout_now(orientation);

        if self.shared.core.borrow().active() {
            self.wire_controls_once(orientation);
            self.enable_drag();
        }
    }

    fn resolve_parts(&self) -> Option<SliderParts> {
        let root = self.root();
        let inner: web::HtmlElement = root
            .query_selector(".slider-inner")
            .ok()??
            .dyn_into()
            .ok()?;
        let canvas: web::HtmlElement = root
            .query_selector(".slider-canvas")
            .ok()??
            .dyn_into()
            .ok()?;
        let items = dom::query_all(&canvas, ".slider-item")
            .into_iter()
            .filter_map(|el| el.dyn_into().ok())
            .collect();
        let controls = dom::query_all(root, ".slider-control")
            .into_iter()
            .filter_map(|el| el.dyn_into().ok())
            .collect();
        Some(SliderParts {
            inner,
            canvas,
            items,
            controls,
        })
    }

    /// Orientation changes drive the whole lifecycle: the first one that
    /// finds the slider unactivated retries activation, later ones
    /// re-measure and let the controller recompute, lazily enabling
    /// dragging and controls if the track newly overflows.
    fn on_orientation(&self, orientation: Orientation) {
        if !self.shared.activated.get() {
            self.activate(orientation);
            return;
        }
        if self.shared.opts.per_screen {
            self.apply_item_widths();
        }
        self.relayout_now(orientation);
        if self.shared.core.borrow().active() {
            self.wire_controls_once(orientation);
            self.enable_drag();
        }
    }

    fn measure(&self) -> Option<Geometry> {
        let parts = self.shared.parts.borrow();
        let parts = parts.as_ref()?;
        let items: Vec<ItemRect> = parts
            .items
            .iter()
            .map(|el| ItemRect {
                left: el.offset_left() as f32,
                width: el.offset_width() as f32,
            })
            .collect();
        Some(Geometry::new(
            parts.inner.client_width() as f32,
            parts.canvas.offset_width() as f32,
            items,
        ))
    }

    fn relayout_now(&self, orientation: Orientation) {
        let Some(geometry) = self.measure() else {
            return;
        };
        let offset = self
            .shared
            .core
            .borrow_mut()
            .relayout(geometry, orientation);
        self.apply_offset(offset, None);
        dom::remove_class(self.root(), "animation");
        dom::remove_class(self.root(), "moving");
    }

    /// Per-screen items always span the container exactly.
    fn apply_item_widths(&self) {
        let parts = self.shared.parts.borrow();
        let Some(parts) = parts.as_ref() else {
            return;
        };
        let width = parts.inner.client_width();
        for item in &parts.items {
            let _ = item.style().set_property("width", &format!("{width}px"));
        }
    }

    fn wire_controls_once(&self, orientation: Orientation) {
        if self.shared.controls_wired.replace(true) {
            return;
        }
        let controls: Vec<web::HtmlElement> = match self.shared.parts.borrow().as_ref() {
            Some(parts) if !parts.controls.is_empty() => parts.controls.clone(),
            _ => return,
        };
        dom::add_class(self.root(), "slider_controls");
        for control in controls {
            let this = self.clone();
            let handle = control.clone();
            dom::add_listener(control.as_ref(), "click", move |_ev| {
                if dom::has_class(&handle, "left") {
                    this.left();
                }
                if dom::has_class(&handle, "right") {
                    this.right();
                }
            });
        }
        // The controls class can change the container metrics.
        self.relayout_now(orientation);
    }

    /// First time the track overflows: wire the gesture handlers, place the
    /// starting item, and play the activation slide-in.
    fn enable_drag(&self) {
        if self.shared.drag_ready.replace(true) {
            return;
        }

        if self.shared.opts.index > 0 {
            self.shared
                .core
                .borrow_mut()
                .jump_to_index(self.shared.opts.index);
        }
        let target = self.shared.core.borrow().offset();
        self.apply_offset(target + INITIAL_SLIDE_IN_PX, None);
        {
            let this = self.clone();
            dom::set_timeout(0, move || {
                let duration = default_duration(orientation::current());
                this.apply_offset(target, Some(duration));
            });
        }

        self.wire_pointer();
        self.wire_transition_end();

        if let Some(on_init) = &self.shared.opts.on_init {
            let params = self.shared.core.borrow().params();
            on_init(params);
        }
    }

    fn wire_pointer(&self) {
        let backend = self.shared.backend;

        {
            let this = self.clone();
            dom::add_listener(self.event_target(), backend.down(), move |ev| {
                let Some(p) = backend.pointer(&ev) else {
                    return;
                };
                this.shared
                    .core
                    .borrow_mut()
                    .pointer_down(p.x, p.y, ev.time_stamp());
                // Realtime follow needs the transition gone; this also lands
                // an interrupted animation on its target instantly.
                let offset = this.shared.core.borrow().offset();
                this.apply_offset(offset, None);
            });
        }

        {
            let this = self.clone();
            dom::add_active_listener(self.event_target(), backend.moved(), move |ev| {
                let Some(p) = backend.pointer(&ev) else {
                    return;
                };
                let update = this.shared.core.borrow_mut().pointer_move(p.x, p.y);
                let Some(update) = update else {
                    return;
                };
                if update.suppress_scroll {
                    ev.prevent_default();
                    ev.stop_propagation();
                }
                if update.moving {
                    dom::add_class(this.root(), "moving");
                }
                if let Some(parts) = this.shared.parts.borrow().as_ref() {
                    dom::set_transform_x(&parts.canvas, update.offset);
                }
            });
        }

        // While a slide owns the axis, moves that escape the slider must not
        // scroll the page either.
        if let Some(body) = dom::window_document().and_then(|d| d.body()) {
            let this = self.clone();
            dom::add_active_listener(body.as_ref(), backend.moved(), move |ev| {
                if this.shared.core.borrow().is_sliding() {
                    ev.prevent_default();
                }
            });
        }

        {
            let this = self.clone();
            dom::add_listener(self.event_target(), backend.up(), move |ev| {
                this.finish_gesture(&ev);
            });
        }
        if let Some(cancel) = backend.cancel() {
            let this = self.clone();
            dom::add_listener(self.event_target(), cancel, move |ev| {
                this.finish_gesture(&ev);
            });
        }
    }

    fn wire_transition_end(&self) {
        let Some(canvas) = self
            .shared
            .parts
            .borrow()
            .as_ref()
            .map(|p| p.canvas.clone())
        else {
            return;
        };
        let this = self.clone();
        dom::add_listener(canvas.as_ref(), "transitionend", move |_ev| {
            this.shared.core.borrow_mut().transition_end();
            dom::remove_class(this.root(), "animation");
        });
    }

    fn finish_gesture(&self, ev: &web::Event) {
        dom::remove_class(self.root(), "moving");
        let commit = self
            .shared
            .core
            .borrow_mut()
            .release(ev.time_stamp(), orientation::current());
        if let Some(commit) = commit {
            self.play_commit(&commit);
        }
    }

    fn play_commit(&self, commit: &Commit) {
        dom::add_class(self.root(), "animation");
        self.apply_offset(commit.offset, Some(commit.plan.duration_sec));
        if let Some(edge) = commit.limit {
            self.limit_reached(edge);
        }
    }

    fn limit_reached(&self, edge: Edge) {
        if let Some(control) = self.find_control(edge) {
            dom::add_class(&control, "disabled");
        }
        let hook = match edge {
            Edge::Left => self.shared.opts.on_limit_left.clone(),
            Edge::Right => self.shared.opts.on_limit_right.clone(),
        };
        if let Some(hook) = hook {
            hook();
        }
    }

    fn find_control(&self, edge: Edge) -> Option<web::HtmlElement> {
        let class = match edge {
            Edge::Left => "left",
            Edge::Right => "right",
        };
        self.shared
            .parts
            .borrow()
            .as_ref()?
            .controls
            .iter()
            .find(|control| dom::has_class(control, class))
            .cloned()
    }

    fn apply_offset(&self, x: f32, duration_sec: Option<f32>) {
        let parts = self.shared.parts.borrow();
        let Some(parts) = parts.as_ref() else {
            return;
        };
        match duration_sec {
            Some(d) => dom::set_transition(&parts.canvas, &dom::transition_value(d)),
            None => dom::set_transition(&parts.canvas, "none"),
        }
        dom::set_transform_x(&parts.canvas, x);
    }

    fn event_target(&self) -> &web::EventTarget {
        &self.shared.root
    }
}
