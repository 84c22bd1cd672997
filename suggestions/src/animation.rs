//! Time-based tweens for overlay transitions.
//!
//! Animations here are sampled, not retained: a [`Tween`] records where a
//! value is coming from and where it is going, and every caller passes the
//! current `Instant` to read the interpolated value. Retargeting an in-flight
//! tween starts from the currently displayed value, so transitions never jump.

use std::time::{Duration, Instant};

use crate::geometry::{HoleShape, Point, Rect, Size};

/// Upper bound on the hole move transition.
pub const MAX_HOLE_MOVE_DURATION: Duration = Duration::from_millis(350);
/// Speed the hole travels at, in logical pixels per second.
pub const HOLE_MOVE_SPEED: f32 = 1200.0;
/// Overlay fade in/out duration.
pub const OVERLAY_FADE_DURATION: Duration = Duration::from_millis(200);

/// Duration of a hole move given the positional delta between the old and
/// new hole centers. Zero delta means no animation at all.
pub fn hole_move_duration(delta: f32) -> Duration {
    if delta <= f32::EPSILON {
        return Duration::ZERO;
    }
    let secs = delta / HOLE_MOVE_SPEED;
    if secs >= MAX_HOLE_MOVE_DURATION.as_secs_f32() {
        return MAX_HOLE_MOVE_DURATION;
    }
    Duration::from_secs_f32(secs)
}

/// Cubic ease-in-out mapping.
/// Input: linear progress in [0.0, 1.0].
/// Output: eased progress in [0.0, 1.0].
pub(crate) fn easing(progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Opacity track applied to the text layer while it repositions: the label
/// blanks for an instant at the very start of the transition and settles at
/// full opacity just before the end, masking the content jump-cut.
pub(crate) fn text_opacity(progress: f32) -> f32 {
    const TIMES: [f32; 5] = [0.0, 0.001, 0.99, 0.999, 1.0];
    const VALUES: [f32; 5] = [0.0, 0.0, 1.0, 1.0, 1.0];
    let p = progress.clamp(0.0, 1.0);
    for i in 0..TIMES.len() - 1 {
        if p <= TIMES[i + 1] {
            let span = TIMES[i + 1] - TIMES[i];
            let local = if span > 0.0 { (p - TIMES[i]) / span } else { 1.0 };
            return VALUES[i] + (VALUES[i + 1] - VALUES[i]) * local;
        }
    }
    VALUES[VALUES.len() - 1]
}

/// Interpolation curve for a [`Tween`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
}

impl Easing {
    fn apply(self, progress: f32) -> f32 {
        match self {
            Easing::Linear => progress.clamp(0.0, 1.0),
            Easing::EaseInOut => easing(progress),
        }
    }
}

/// Values that can be linearly interpolated.
pub trait Lerp: Copy {
    fn lerp(from: Self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Lerp for Point {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Point::new(f32::lerp(from.x, to.x, t), f32::lerp(from.y, to.y, t))
    }
}

impl Lerp for Size {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Size::new(
            f32::lerp(from.width, to.width, t),
            f32::lerp(from.height, to.height, t),
        )
    }
}

impl Lerp for Rect {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Rect {
            origin: Point::lerp(from.origin, to.origin, t),
            size: Size::lerp(from.size, to.size, t),
        }
    }
}

impl Lerp for HoleShape {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        HoleShape {
            rect: Rect::lerp(from.rect, to.rect, t),
            corner_radius: f32::lerp(from.corner_radius, to.corner_radius, t),
        }
    }
}

/// A value transitioning from one state to another over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    /// A tween resting at `value` with no transition in flight.
    pub fn fixed(value: T, at: Instant) -> Self {
        Self {
            from: value,
            to: value,
            start: at,
            duration: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Redirects the tween toward `to`, starting from the value currently
    /// displayed at `now`.
    pub fn retarget(&mut self, to: T, duration: Duration, now: Instant) {
        self.from = self.value_at(now);
        self.to = to;
        self.start = now;
        self.duration = duration;
    }

    /// Linear progress in [0.0, 1.0] at `now`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// The eased, interpolated value at `now`.
    pub fn value_at(&self, now: Instant) -> T {
        let t = self.easing.apply(self.progress(now));
        T::lerp(self.from, self.to, t)
    }

    /// The value this tween is heading toward.
    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_running(&self, now: Instant) -> bool {
        self.progress(now) < 1.0
    }
}
