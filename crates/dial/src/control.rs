//! Circular drag-to-select control.
//!
//! Pointer input moves a thumb around a circular track. The applied angle runs clockwise
//! from the bottom of the track (0°) to a full turn (360°) and maps linearly onto a
//! selection fraction in `[0, 1]`.

use crate::geometry::{Bounds, DialGeometry, DialStyle, Point};
use crate::render::{self, DialPalette, DrawCommand};
use crate::spring::{Spring, SpringSpec};
use std::time::Duration;

pub const FULL_TURN_DEG: f64 = 360.0;
/// Pointer angles are measured from the +x axis; the track starts a quarter turn later.
pub const TRACK_OFFSET_DEG: f64 = 90.0;

// Seam guard. A stabilized angle below the pivot may not wrap forward into the high band,
// and one above it may not wrap back into the low band.
pub const WRAP_PIVOT_DEG: f64 = 270.0;
pub const WRAP_HIGH_DEG: f64 = 330.0;
pub const WRAP_LOW_DEG: f64 = 30.0;

/// Shifts a raw pointer angle onto the track and wraps it into `[0, 360]`.
pub fn normalize_angle(raw: f64) -> f64 {
    let mut angle = raw + TRACK_OFFSET_DEG;
    if angle < 0.0 {
        angle += FULL_TURN_DEG;
    }
    angle.clamp(0.0, FULL_TURN_DEG)
}

/// Rejects jumps across the 0°/360° seam relative to the last stabilized angle.
pub fn guard_wrap(angle: f64, last: f64) -> f64 {
    if last < WRAP_PIVOT_DEG && angle >= WRAP_HIGH_DEG {
        0.0
    } else if last > WRAP_PIVOT_DEG && angle < WRAP_LOW_DEG {
        last
    } else {
        angle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// What the control did with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerResponse {
    Grabbed,
    Tracked,
    Ignored,
    Released,
}

impl PointerResponse {
    pub fn should_redraw(&self) -> bool {
        matches!(self, Self::Grabbed | Self::Tracked)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    /// Last raw pointer angle, before normalization.
    pub angle: f64,
    /// Last stabilized angle, the reference for the seam guard.
    pub last: f64,
    pub applied_angle: f64,
    pub drag: DragState,
    pub geometry: DialGeometry,
}

impl SelectionState {
    pub fn new(selection: f64) -> Self {
        let mut state = Self {
            angle: 0.0,
            last: 0.0,
            applied_angle: 0.0,
            drag: DragState::Idle,
            geometry: DialGeometry::default(),
        };
        state.apply_fraction(selection);
        state
    }

    pub fn applied_fraction(&self) -> f64 {
        (self.applied_angle / FULL_TURN_DEG).clamp(0.0, 1.0)
    }

    pub fn thumb_center(&self) -> Point {
        self.geometry.point_at(self.applied_angle)
    }

    fn apply_fraction(&mut self, fraction: f64) {
        let angle = fraction.clamp(0.0, 1.0) * FULL_TURN_DEG;
        self.angle = angle - TRACK_OFFSET_DEG;
        self.last = angle;
        self.applied_angle = angle;
    }

    /// Feeds a raw pointer angle through normalization and the seam guard. Returns whether
    /// the applied angle moved.
    fn track(&mut self, raw: f64) -> bool {
        self.angle = raw;
        let angle = guard_wrap(normalize_angle(raw), self.last);
        let moved = angle != self.applied_angle;
        self.last = angle;
        self.applied_angle = angle;
        moved
    }
}

pub type ChangeCallback = Box<dyn FnMut(f64)>;

pub struct DialControl {
    state: SelectionState,
    style: DialStyle,
    bounds: Bounds,
    spring: Spring,
    on_change: Option<ChangeCallback>,
}

impl DialControl {
    pub fn new(selection: f64, style: DialStyle) -> Self {
        let selection = selection.clamp(0.0, 1.0);
        Self {
            state: SelectionState::new(selection),
            style,
            bounds: Bounds::default(),
            spring: Spring::new(selection, SpringSpec::default()),
            on_change: None,
        }
    }

    /// Called with the new fraction whenever a drag moves the thumb. Programmatic updates
    /// through `set_selection` never reach it.
    pub fn on_change(&mut self, callback: impl FnMut(f64) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn set_style(&mut self, style: DialStyle) {
        self.style = style;
        self.resize(self.bounds);
    }

    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.state.geometry = DialGeometry::calculate(bounds, &self.style);
    }

    pub fn applied_fraction(&self) -> f64 {
        self.state.applied_fraction()
    }

    pub fn thumb_center(&self) -> Point {
        self.state.thumb_center()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.drag == DragState::Dragging
    }

    pub fn is_animating(&self) -> bool {
        self.spring.is_running()
    }

    pub fn pointer_down(&mut self, p: Point) -> PointerResponse {
        let half_touch = self.style.touch_stroke / 2.0;
        let grabbed = self.state.geometry.on_track(p, half_touch)
            && p.within_box(self.thumb_center(), half_touch);

        if !grabbed {
            log::trace!("Pointer down at ({:.1}, {:.1}) missed the thumb", p.x, p.y);
            self.state.drag = DragState::Idle;
            return PointerResponse::Ignored;
        }

        self.state.drag = DragState::Dragging;
        self.spring.snap_to(self.applied_fraction());
        self.track_pointer(p);
        PointerResponse::Grabbed
    }

    pub fn pointer_move(&mut self, p: Point) -> PointerResponse {
        if !self.is_dragging() {
            return PointerResponse::Ignored;
        }
        // A looser box than on grab. Straying further keeps the drag but freezes the thumb.
        if !p.within_box(self.thumb_center(), self.style.touch_stroke) {
            log::trace!("Pointer at ({:.1}, {:.1}) strayed from the thumb", p.x, p.y);
            return PointerResponse::Ignored;
        }

        self.track_pointer(p);
        PointerResponse::Tracked
    }

    pub fn pointer_up(&mut self) -> PointerResponse {
        if !self.is_dragging() {
            return PointerResponse::Ignored;
        }
        self.state.drag = DragState::Idle;
        PointerResponse::Released
    }

    /// Moves to an externally decided selection: at once while the user is dragging,
    /// otherwise eased in by the spring on subsequent ticks.
    pub fn set_selection(&mut self, selection: f64) {
        let selection = selection.clamp(0.0, 1.0);

        if self.is_dragging() {
            self.spring.snap_to(selection);
            self.state.apply_fraction(selection);
            return;
        }

        if !self.spring.is_running() {
            self.spring.snap_to(self.applied_fraction());
        }
        self.spring.retarget(selection);
        self.state.apply_fraction(self.spring.value());
    }

    /// Advances the animation by `dt`. Returns whether another tick is needed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.is_dragging() || !self.spring.is_running() {
            return false;
        }
        let running = self.spring.step(dt);
        self.state.apply_fraction(self.spring.value());
        running
    }

    pub fn draw_commands(&self, palette: &DialPalette) -> Vec<DrawCommand> {
        render::dial(&self.state, &self.style, palette)
    }

    fn track_pointer(&mut self, p: Point) {
        let raw = self.state.geometry.pointer_angle(p);
        if self.state.track(raw) {
            let fraction = self.applied_fraction();
            if let Some(callback) = self.on_change.as_mut() {
                callback(fraction);
            }
        }
    }
}
