//! Slide motion state machine.
//!
//! Converts a stream of pointer events into committed horizontal offsets for
//! one slider track: live following while a drag is in progress, then an
//! eased, speed-scaled move on release. All inputs arrive as plain data
//! (coordinates, timestamps in milliseconds, [`Geometry`] snapshots); the
//! controller never touches the DOM or a clock.

use glam::Vec2;

use crate::constants::*;
use crate::geometry::Geometry;
use crate::orientation::Orientation;

/// Lifecycle of one slider track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
    Animating,
}

/// Which track edge a commit clamped against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GestureKind {
    Undetermined,
    Slide,
    Scroll,
}

/// Transient per-contact state. Exists only between pointer-down and
/// pointer-up/cancel; at most one per track.
#[derive(Clone, Copy, Debug)]
struct GestureSession {
    start: Vec2,
    start_ms: f64,
    shift: Vec2,
    kind: GestureKind,
}

/// Easing parameters for one committed move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionPlan {
    pub duration_sec: f32,
    pub accel: u32,
}

/// Live-drag update for the view to mirror immediately, without easing.
#[derive(Clone, Copy, Debug)]
pub struct LiveFollow {
    pub offset: f32,
    /// Native scrolling must be suppressed while the gesture owns the axis.
    pub suppress_scroll: bool,
    /// Horizontal shift exceeds the classification distance; drives the
    /// `moving` visual state.
    pub moving: bool,
}

/// Outcome of a release or manual move.
#[derive(Clone, Copy, Debug)]
pub struct Commit {
    pub offset: f32,
    pub plan: TransitionPlan,
    pub limit: Option<Edge>,
    /// False when the gesture fell short of the threshold and the offset
    /// reverted to its pre-drag value.
    pub committed: bool,
}

/// Snapshot handed to the `on_init` hook.
#[derive(Clone, Copy, Debug)]
pub struct SliderParams {
    pub current_x: f32,
    pub limit_x: f32,
    pub step: f32,
    pub index: usize,
    pub count: usize,
    pub active: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct MotionConfig {
    /// Advance per committed gesture, px. Ignored in per-screen mode where
    /// the container width is used instead.
    pub step: f32,
    /// Minimum horizontal shift for a release to commit, px.
    pub threshold: f32,
    /// One item per viewport; navigation moves exactly one item at a time.
    pub per_screen: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP_PX,
            threshold: DEFAULT_THRESHOLD_PX,
            per_screen: false,
        }
    }
}

pub struct MotionController {
    cfg: MotionConfig,
    geometry: Geometry,
    /// Effective advance distance; equals the container width in per-screen
    /// mode, `cfg.step` otherwise.
    step: f32,
    current_x: f32,
    limit_x: f32,
    index: usize,
    phase: Phase,
    session: Option<GestureSession>,
}

impl MotionController {
    pub fn new(cfg: MotionConfig) -> Self {
        Self {
            step: cfg.step,
            cfg,
            geometry: Geometry::default(),
            current_x: 0.0,
            limit_x: 0.0,
            index: 0,
            phase: Phase::Idle,
            session: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn offset(&self) -> f32 {
        self.current_x
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Sliding is available only when the track overflows the container.
    pub fn active(&self) -> bool {
        self.geometry.track_width > self.geometry.container_width
    }

    /// True while an in-progress gesture has claimed the horizontal axis.
    pub fn is_sliding(&self) -> bool {
        matches!(
            self.session,
            Some(GestureSession {
                kind: GestureKind::Slide,
                ..
            })
        )
    }

    pub fn params(&self) -> SliderParams {
        SliderParams {
            current_x: self.current_x,
            limit_x: self.limit_x,
            step: self.step,
            index: self.index,
            count: self.geometry.item_count(),
            active: self.active(),
        }
    }

    /// Adopt a fresh layout snapshot and recompute step, limit, and offset.
    ///
    /// Any in-flight gesture or animation is invalidated: the new metrics
    /// supersede whatever the old ones promised. Returns the offset the view
    /// must apply instantly (no easing).
    pub fn relayout(&mut self, geometry: Geometry, orientation: Orientation) -> f32 {
        self.geometry = geometry;
        self.session = None;
        self.phase = Phase::Idle;

        self.step = if self.cfg.per_screen {
            self.geometry.container_width
        } else {
            self.cfg.step
        };
        self.limit_x = self.geometry.limit();

        if self.limit_x > 0.0 {
            // Track fits: sliding is disabled and the offset pins to zero.
            self.current_x = 0.0;
            self.limit_x = 0.0;
        }

        if self.cfg.per_screen {
            self.index = self
                .index
                .min(self.geometry.item_count().saturating_sub(1));
            self.current_x = -self.step * self.index as f32;
        }

        if orientation.is_landscape() && self.active() && self.current_x < self.limit_x {
            self.current_x = self.limit_x;
        }

        self.current_x = clamp_offset(self.current_x, self.limit_x);
        log::debug!(
            "relayout: step={} limit={} offset={} index={}",
            self.step,
            self.limit_x,
            self.current_x,
            self.index
        );
        self.current_x
    }

    /// Place the track at a configured starting item, without animation or
    /// limit notifications. Returns the resulting offset.
    pub fn jump_to_index(&mut self, index: usize) -> f32 {
        let count = self.geometry.item_count();
        self.index = index.min(count.saturating_sub(1));
        self.current_x = if self.cfg.per_screen {
            -self.step * self.index as f32
        } else {
            self.geometry.item_offset(self.index)
        };
        self.current_x = clamp_offset(self.current_x, self.limit_x);
        self.current_x
    }

    /// Begin a gesture session. The view must drop any CSS transition so the
    /// following offsets apply instantaneously; an in-flight animation is
    /// thereby interrupted at its target.
    pub fn pointer_down(&mut self, x: f32, y: f32, time_ms: f64) {
        if !self.active() {
            return;
        }
        self.session = Some(GestureSession {
            start: Vec2::new(x, y),
            start_ms: time_ms,
            shift: Vec2::ZERO,
            kind: GestureKind::Undetermined,
        });
        self.phase = Phase::Dragging;
    }

    /// Track a pointer move. Returns a live-follow update once the session
    /// is classified as a slide; scroll-classified and undetermined sessions
    /// yield nothing. Classification is sticky for the session's lifetime.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Option<LiveFollow> {
        let current_x = self.current_x;
        let limit_x = self.limit_x;
        let session = self.session.as_mut()?;

        session.shift = Vec2::new(x, y) - session.start;
        let abs = session.shift.abs();

        if session.kind == GestureKind::Undetermined {
            if abs.y >= CLASSIFY_SHIFT_PX && abs.y > abs.x {
                session.kind = GestureKind::Scroll;
            } else if abs.x >= CLASSIFY_SHIFT_PX && abs.x > abs.y {
                session.kind = GestureKind::Slide;
            }
        }
        if session.kind != GestureKind::Slide {
            return None;
        }

        let past_left = current_x >= 0.0 && session.shift.x > 0.0;
        let past_right = current_x <= limit_x && session.shift.x < 0.0;
        let follow = if past_left || past_right {
            session.shift.x / RUBBER_BAND_DIVISOR
        } else {
            session.shift.x
        };

        Some(LiveFollow {
            offset: current_x + follow,
            suppress_scroll: true,
            moving: abs.x > CLASSIFY_SHIFT_PX,
        })
    }

    /// Finish the gesture session on pointer-up or pointer-cancel (the two
    /// are identical here). Returns a commit to animate when the session was
    /// a slide; otherwise the session simply dissolves.
    pub fn release(&mut self, time_ms: f64, orientation: Orientation) -> Option<Commit> {
        let session = self.session.take()?;
        if session.kind != GestureKind::Slide {
            self.phase = Phase::Idle;
            return None;
        }

        let shift_x = session.shift.x;
        let shift_abs = shift_x.abs();
        let elapsed_ms = (time_ms - session.start_ms).max(1.0) as f32;
        let speed = shift_abs / elapsed_ms;

        let accel = if self.cfg.per_screen {
            1
        } else {
            accel_for_speed(speed)
        };
        let plan = TransitionPlan {
            duration_sec: commit_duration(accel, orientation),
            accel,
        };

        let mut limit = None;
        let committed = shift_abs >= self.cfg.threshold;
        if committed {
            if !self.cfg.per_screen && shift_abs > self.step {
                // Long drags first snap by the whole steps they covered.
                self.current_x += (shift_x / self.step).trunc() * self.step;
            }
            if shift_x > 0.0 {
                self.current_x += self.step * accel as f32;
                if self.current_x > 0.0 {
                    self.current_x = 0.0;
                    limit = Some(Edge::Left);
                }
                if self.cfg.per_screen && self.index > 0 {
                    self.index -= 1;
                }
            } else if shift_x < 0.0 {
                self.current_x -= self.step * accel as f32;
                if self.current_x < self.limit_x {
                    self.current_x = self.limit_x;
                    limit = Some(Edge::Right);
                }
                if self.cfg.per_screen && self.index + 1 < self.geometry.item_count() {
                    self.index += 1;
                }
            }
        }

        self.phase = Phase::Animating;
        Some(Commit {
            offset: self.current_x,
            plan,
            limit,
            committed,
        })
    }

    /// The committed move's transition finished; spurious ends outside an
    /// animation are ignored.
    pub fn transition_end(&mut self) {
        if self.phase == Phase::Animating {
            self.phase = Phase::Idle;
        }
    }

    /// Manual navigation toward the track start: align the current item's
    /// left edge, or the previous item's once the current one is flush.
    pub fn step_left(&mut self, orientation: Orientation) -> Option<Commit> {
        if !self.active() {
            return None;
        }
        let index = self.geometry.current_item(self.current_x)?;
        let item = self.geometry.items[index];
        let target = if self.current_x + item.left < 0.0 {
            -item.left
        } else if index > 0 {
            -self.geometry.items[index - 1].left
        } else {
            return None;
        };
        Some(self.move_to(target, orientation))
    }

    /// Manual navigation toward the track end: align the next item's left
    /// edge. A no-op when the track is already at its limit.
    pub fn step_right(&mut self, orientation: Orientation) -> Option<Commit> {
        if !self.active() || self.current_x == self.limit_x {
            return None;
        }
        let index = self.geometry.current_item(self.current_x)?;
        let item = self.geometry.items[index];
        Some(self.move_to(-(item.left + item.width), orientation))
    }

    /// Move to an arbitrary target offset with the default easing, clamping
    /// and notifying like a drag commit. Per-screen index bookkeeping moves
    /// one item in the travel direction.
    pub fn move_to(&mut self, target: f32, orientation: Orientation) -> Commit {
        let last = self.current_x;
        self.current_x = target;

        let mut limit = None;
        if target > last {
            if self.current_x > 0.0 {
                self.current_x = 0.0;
                limit = Some(Edge::Left);
            }
            if self.cfg.per_screen && self.index > 0 {
                self.index -= 1;
            }
        } else if target < last {
            if self.current_x <= self.limit_x {
                self.current_x = self.limit_x;
                limit = Some(Edge::Right);
            }
            if self.cfg.per_screen && self.index + 1 < self.geometry.item_count() {
                self.index += 1;
            }
        }

        self.phase = Phase::Animating;
        Commit {
            offset: self.current_x,
            plan: TransitionPlan {
                duration_sec: default_duration(orientation),
                accel: 1,
            },
            limit,
            committed: self.current_x != last,
        }
    }
}

#[inline]
fn clamp_offset(x: f32, limit_x: f32) -> f32 {
    x.clamp(limit_x.min(0.0), 0.0)
}

/// Acceleration tier for a gesture speed in px/ms.
#[inline]
pub fn accel_for_speed(speed: f32) -> u32 {
    if speed >= ACCEL_TIER_4_SPEED {
        4
    } else if speed >= ACCEL_TIER_3_SPEED {
        3
    } else if speed >= ACCEL_TIER_2_SPEED {
        2
    } else {
        1
    }
}

/// Duration of a gesture-committed move, keyed by tier and orientation.
#[inline]
pub fn commit_duration(accel: u32, orientation: Orientation) -> f32 {
    match (orientation.is_landscape(), accel >= 3) {
        (true, true) => DURATION_LANDSCAPE_FAST_SEC,
        (true, false) => DURATION_LANDSCAPE_SLOW_SEC,
        (false, true) => DURATION_PORTRAIT_FAST_SEC,
        (false, false) => DURATION_PORTRAIT_SLOW_SEC,
    }
}

/// Duration of manual and init-time moves.
#[inline]
pub fn default_duration(orientation: Orientation) -> f32 {
    if orientation.is_landscape() {
        DURATION_DEFAULT_LANDSCAPE_SEC
    } else {
        DURATION_DEFAULT_PORTRAIT_SEC
    }
}
