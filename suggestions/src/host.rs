//! Seams between the overlay core and the host toolkit.
//!
//! The core never talks to a concrete view hierarchy. It sees targets as
//! opaque frame providers ([`TargetView`]), subscribes to their geometry
//! changes ([`ObservableView`]), measures text through a [`TextMeasurer`]
//! and emits haptic feedback through [`Haptics`]. Hosts implement these
//! traits over whatever their toolkit actually provides.

use std::sync::Arc;

use crate::{
    config::FontSpec,
    geometry::{Rect, Size},
};

/// Geometry properties a host can report changes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewProperty {
    Frame,
    Bounds,
    Position,
}

impl ViewProperty {
    /// The properties the orchestrator observes on every target.
    pub const ALL: [ViewProperty; 3] =
        [ViewProperty::Frame, ViewProperty::Bounds, ViewProperty::Position];
}

/// Callback a host invokes when an observed property changes.
pub type ChangeSink = Arc<dyn Fn() + Send + Sync>;

/// An active change subscription. Dropping it unsubscribes, so the
/// orchestrator releases a target's observations by clearing its set.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release.
    pub fn noop() -> Self {
        Self { cancel: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// An opaque frame provider for a suggestion target.
pub trait TargetView: Send + Sync {
    /// The target's frame in overlay coordinates, `None` once the view has
    /// been detached from its hierarchy.
    fn frame(&self) -> Option<Rect>;

    fn is_attached(&self) -> bool {
        self.frame().is_some()
    }

    /// The target's immediate container, if the host exposes one. The
    /// orchestrator observes it alongside the target itself so scrolling a
    /// parent re-places the overlay.
    fn container(&self) -> Option<Arc<dyn ObservableView>> {
        None
    }
}

/// A target view whose geometry changes can be observed.
pub trait ObservableView: TargetView {
    /// Registers `sink` for changes of `property`. The returned handle
    /// unsubscribes when dropped.
    fn observe(&self, property: ViewProperty, sink: ChangeSink) -> Subscription;
}

/// Measures suggestion text for the configured font.
pub trait TextMeasurer: Send + Sync {
    /// Size of `text` laid out under `max_width` with unconstrained height.
    fn measure(&self, text: &str, font: &FontSpec, max_width: f32) -> Size;
}

/// Host haptic feedback. Both hooks default to no-ops.
pub trait Haptics: Send + Sync {
    /// Light impact played on every counted tap.
    fn impact_light(&self) {}

    /// Success notification played when the queue empties naturally.
    fn notify_success(&self) {}
}

/// Width-heuristic measurer for hosts without a text stack of their own
/// (terminals, tests, headless demos). Wraps greedily at `max_width`
/// assuming an average advance of a little over half the font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec, max_width: f32) -> Size {
        let advance = font.size * 0.55;
        let total = text.chars().count() as f32 * advance;
        if total <= max_width || max_width <= advance {
            return Size::new(total.max(advance), font.line_height);
        }
        let per_line = (max_width / advance).floor().max(1.0);
        let lines = (text.chars().count() as f32 / per_line).ceil().max(1.0);
        Size::new(per_line * advance, lines * font.line_height)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_subscription_cancels_on_drop() {
        let cancelled = Arc::new(AtomicUsize::new(0));
        let flag = cancelled.clone();
        let sub = Subscription::new(move || {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        drop(sub);
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_heuristic_measurer_single_line() {
        let font = FontSpec::default();
        let size = HeuristicTextMeasurer.measure("short", &font, 1000.0);
        assert_eq!(size.height, font.line_height);
        assert!(size.width < 1000.0);
    }

    #[test]
    fn test_heuristic_measurer_wraps() {
        let font = FontSpec::default();
        let long = "a".repeat(200);
        let size = HeuristicTextMeasurer.measure(&long, &font, 120.0);
        assert!(size.width <= 120.0);
        assert!(size.height > font.line_height);
    }
}
