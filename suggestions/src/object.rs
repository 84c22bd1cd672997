//! The overlay orchestrator.
//!
//! `SuggestionsObject` owns the layer set for one session, observes the
//! current target's geometry, coalesces change notifications into a single
//! re-layout per tick, and routes taps between "advance" and "dismiss"
//! against the geometry it last rendered.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    animation::{Easing, OVERLAY_FADE_DURATION, Tween},
    blur::{BlurEffect, BlurLayer, UnblurLayer},
    bubble::{BubbleLayer, BubbleShape},
    config::SuggestionsConfig,
    fill::{FillLayer, FillShape},
    geometry::{self, EdgeInsets, HoleShape, Point, Rect},
    host::{ChangeSink, Haptics, Subscription, TextMeasurer, ViewProperty},
    suggestion::{Suggestion, SuggestionTarget},
    text::{TextBlock, TextLayer},
};

/// Everything the orchestrator needs from the host to run a session.
#[derive(Clone)]
pub struct OverlayEnvironment {
    /// Overlay bounds in its own coordinate space.
    pub bounds: Rect,
    /// System safe-area insets.
    pub insets: EdgeInsets,
    pub measurer: Arc<dyn TextMeasurer>,
    pub haptics: Option<Arc<dyn Haptics>>,
    /// Whether the host can render live filtered blur.
    pub filtered_blur_supported: bool,
}

/// Session-level state of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Presenting,
}

/// Where a tap landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Interaction was locked or no session is presenting.
    Ignored,
    /// Inside the hole or the bubble: the suggestion itself was tapped.
    Suggestion,
    /// Anywhere else on the overlay.
    Background,
}

/// Renderable state of the whole overlay at one sampling instant.
#[derive(Clone)]
pub struct OverlaySnapshot {
    pub alpha: f32,
    pub fill: FillShape,
    pub bubble: Option<BubbleShape>,
    pub text: Option<TextBlock>,
    pub blur: Option<(Rect, BlurEffect)>,
    pub unblur_window: Option<HoleShape>,
}

/// Coalescing re-layout request shared with the change sinks: any number of
/// notifications within one tick collapse into a single pending pass.
#[derive(Default)]
pub(crate) struct RelayoutFlag(AtomicBool);

impl RelayoutFlag {
    pub(crate) fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub(crate) fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

pub struct SuggestionsObject {
    config: SuggestionsConfig,
    bounds: Rect,
    insets: EdgeInsets,
    haptics: Option<Arc<dyn Haptics>>,

    fill: FillLayer,
    bubble: BubbleLayer,
    text: TextLayer,
    blur: BlurLayer,
    unblur: UnblurLayer,

    state: SessionState,
    last_suggested: Option<Suggestion>,
    relayout: Arc<RelayoutFlag>,
    subscriptions: SmallVec<[Subscription; 6]>,

    hole: HoleShape,
    text_rect: Rect,
    hole_move_duration: Duration,
    locked_until: Option<Instant>,
    alpha: Tween<f32>,
    relayout_passes: u64,

    view_tapped: Option<Arc<dyn Fn() + Send + Sync>>,
    suggestion_tapped: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl SuggestionsObject {
    pub fn new(config: SuggestionsConfig, env: &OverlayEnvironment, now: Instant) -> Self {
        Self {
            fill: FillLayer::new(&config),
            bubble: BubbleLayer::new(&config),
            text: TextLayer::new(&config, env.measurer.clone()),
            blur: BlurLayer::new(&config, env.filtered_blur_supported),
            unblur: UnblurLayer::new(&config),
            config,
            bounds: env.bounds,
            insets: env.insets,
            haptics: env.haptics.clone(),
            state: SessionState::Idle,
            last_suggested: None,
            relayout: Arc::new(RelayoutFlag::default()),
            subscriptions: SmallVec::new(),
            hole: HoleShape::ZERO,
            text_rect: Rect::ZERO,
            hole_move_duration: Duration::ZERO,
            locked_until: None,
            alpha: Tween::fixed(0.0, now).with_easing(Easing::Linear),
            relayout_passes: 0,
            view_tapped: None,
            suggestion_tapped: None,
        }
    }

    /// Binds the callback fired when the background is tapped (dismiss).
    pub fn on_view_tapped(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.view_tapped = Some(Arc::new(f));
    }

    /// Binds the callback fired when the hole or bubble is tapped (advance).
    pub fn on_suggestion_tapped(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.suggestion_tapped = Some(Arc::new(f));
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Hole rect the overlay last laid out against; tap hit-testing uses
    /// this exact rect.
    pub fn hole_rect(&self) -> Rect {
        self.hole.rect
    }

    /// Bubble rect derived from the last text placement.
    pub fn bubble_rect(&self) -> Rect {
        geometry::bubble_rect(self.text_rect)
    }

    pub fn hole_move_duration(&self) -> Duration {
        self.hole_move_duration
    }

    /// Host notification that the overlay itself was resized.
    pub fn set_bounds(&mut self, bounds: Rect, insets: EdgeInsets) {
        self.bounds = bounds;
        self.insets = insets;
        self.relayout.request();
    }

    /// Presents `suggestion`, or tears the overlay down when the queue is
    /// exhausted (`None`).
    pub fn update_for_suggestion(&mut self, suggestion: Option<Suggestion>, now: Instant) {
        match suggestion {
            Some(suggestion) => {
                debug!(text = %suggestion.text, "presenting suggestion");
                self.start_observing(&suggestion);
                self.last_suggested = Some(suggestion);
                self.state = SessionState::Presenting;
                self.relayout_now(now);
                self.alpha.retarget(1.0, OVERLAY_FADE_DURATION, now);
            }
            None => {
                if self.config.haptic_enabled
                    && let Some(haptics) = &self.haptics
                {
                    haptics.notify_success();
                }
                self.suggestions_finished(now);
            }
        }
    }

    /// Fades the overlay out and returns to `Idle`, releasing all target
    /// observations.
    pub fn suggestions_finished(&mut self, now: Instant) {
        debug!("session finished, tearing down overlay");
        self.subscriptions.clear();
        self.last_suggested = None;
        self.state = SessionState::Idle;
        self.locked_until = None;
        self.alpha.retarget(0.0, OVERLAY_FADE_DURATION, now);
    }

    /// Consumes the coalesced re-layout request, if any. Hosts call this
    /// once per run-loop turn; N change notifications since the last tick
    /// produce exactly one pass, using the geometry current at this instant.
    pub fn tick(&mut self, now: Instant) {
        if self.state != SessionState::Presenting {
            return;
        }
        if self.relayout.take() {
            trace!("coalesced re-layout");
            self.relayout_now(now);
        }
    }

    /// Routes a tap against the last-rendered hole and bubble rects.
    pub fn handle_tap(&mut self, point: Point, now: Instant) -> TapOutcome {
        if self.state != SessionState::Presenting {
            return TapOutcome::Ignored;
        }
        if let Some(deadline) = self.locked_until {
            if now < deadline {
                trace!("tap ignored: interaction locked during hole move");
                return TapOutcome::Ignored;
            }
            self.locked_until = None;
        }

        if self.config.haptic_enabled
            && let Some(haptics) = &self.haptics
        {
            haptics.impact_light();
        }

        let outcome = if self.hole.rect.contains(point) || self.bubble_rect().contains(point) {
            TapOutcome::Suggestion
        } else {
            TapOutcome::Background
        };
        debug!(?outcome, x = point.x, y = point.y, "tap routed");

        match outcome {
            TapOutcome::Suggestion => {
                if let Some(f) = &self.suggestion_tapped {
                    f();
                }
            }
            TapOutcome::Background => {
                if let Some(f) = &self.view_tapped {
                    f();
                }
            }
            TapOutcome::Ignored => {}
        }
        outcome
    }

    /// Samples every layer for the host renderer.
    pub fn snapshot(&self, now: Instant) -> Option<OverlaySnapshot> {
        let alpha = self.alpha.value_at(now);
        if self.state == SessionState::Idle && alpha <= 0.0 && !self.alpha.is_running(now) {
            return None;
        }
        Some(OverlaySnapshot {
            alpha,
            fill: self.fill.shape_at(now),
            bubble: self.bubble.shape_at(now),
            text: self.text.block_at(now),
            blur: self.blur.effect(),
            unblur_window: self.unblur.window_at(now),
        })
    }

    #[cfg(test)]
    pub(crate) fn relayout_passes(&self) -> u64 {
        self.relayout_passes
    }

    /// Runs the full layer pipeline for the cached suggestion: fill (hole)
    /// first so every other layer can reuse its animation duration.
    fn relayout_now(&mut self, now: Instant) {
        let Some(suggestion) = self.last_suggested.clone() else {
            return;
        };
        self.relayout_passes += 1;

        let target_frame = suggestion.resolved_frame();
        let update = self.fill.update(target_frame, self.bounds, self.insets, now);
        self.hole = update.hole;
        self.hole_move_duration = update.duration;
        if !update.duration.is_zero() {
            // Taps landing mid-move would hit a stale hole location.
            self.locked_until = Some(now + update.duration);
        }

        let drawing = self.bounds_for_drawing_text();
        let max_text_width = self.max_text_width();
        self.text_rect = self.text.update(
            drawing,
            max_text_width,
            &suggestion,
            target_frame,
            update.duration,
            now,
        );
        self.bubble
            .update(self.text_rect, self.hole, update.duration, now);
        self.blur.update(self.bounds);
        self.unblur.update(self.hole, update.duration, now);

        trace!(
            hole = ?self.hole.rect,
            text = ?self.text_rect,
            duration_ms = update.duration.as_millis() as u64,
            "re-layout pass"
        );
    }

    /// Replaces the observation set with subscriptions on the new target and
    /// its immediate container. The old set is dropped (and thereby
    /// unsubscribed) before the new one is established.
    fn start_observing(&mut self, suggestion: &Suggestion) {
        self.subscriptions.clear();
        let SuggestionTarget::View(view) = &suggestion.target else {
            return;
        };
        let sink: ChangeSink = {
            let relayout = self.relayout.clone();
            Arc::new(move || relayout.request())
        };
        for property in ViewProperty::ALL {
            self.subscriptions.push(view.observe(property, sink.clone()));
        }
        if let Some(container) = view.container() {
            for property in ViewProperty::ALL {
                self.subscriptions
                    .push(container.observe(property, sink.clone()));
            }
        }
    }

    /// Area of the overlay the text may occupy: the bounds inset by a fixed
    /// margin, with the bottom additionally cleared of the system inset.
    fn bounds_for_drawing_text(&self) -> Rect {
        let offset = geometry::TEXT_DRAWING_PARENT_OFFSET;
        self.bounds.inset(EdgeInsets::new(
            offset,
            offset,
            offset + self.insets.bottom,
            offset,
        ))
    }

    fn max_text_width(&self) -> f32 {
        let bounds = self.bounds_for_drawing_text();
        bounds.width() - bounds.min_x() * 2.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        geometry::Size,
        host::testing::{CountingHaptics, FakeView, FixedMeasurer},
    };

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);

    fn env() -> OverlayEnvironment {
        OverlayEnvironment {
            bounds: BOUNDS,
            insets: EdgeInsets::ZERO,
            measurer: Arc::new(FixedMeasurer(Size::new(120.0, 36.0))),
            haptics: None,
            filtered_blur_supported: false,
        }
    }

    fn object() -> SuggestionsObject {
        SuggestionsObject::new(SuggestionsConfig::default(), &env(), Instant::now())
    }

    #[test]
    fn test_presenting_computes_hole_and_fades_in() {
        let mut object = object();
        let now = Instant::now();
        let target = Rect::new(100.0, 400.0, 60.0, 40.0);
        object.update_for_suggestion(Some(Suggestion::for_frame(target, "tap")), now);

        assert_eq!(object.state(), SessionState::Presenting);
        assert!(object.hole_rect().contains_rect(target));
        let snapshot = object.snapshot(now + OVERLAY_FADE_DURATION).unwrap();
        assert_eq!(snapshot.alpha, 1.0);
    }

    #[test]
    fn test_debounce_coalesces_notifications_into_one_pass() {
        let mut object = object();
        let now = Instant::now();
        let view = FakeView::new(Rect::new(10.0, 10.0, 40.0, 20.0));
        object.update_for_suggestion(Some(Suggestion::for_view(view.clone(), "tap")), now);
        let passes_after_present = object.relayout_passes();

        // A burst of frame changes within one tick.
        view.set_frame(Rect::new(20.0, 10.0, 40.0, 20.0));
        view.set_frame(Rect::new(30.0, 10.0, 40.0, 20.0));
        view.set_frame(Rect::new(120.0, 300.0, 40.0, 20.0));

        let tick = now + Duration::from_millis(16);
        object.tick(tick);
        assert_eq!(object.relayout_passes(), passes_after_present + 1);
        // The single pass used the geometry of the last notification.
        assert!(object.hole_rect().contains_rect(Rect::new(120.0, 300.0, 40.0, 20.0)));

        // Nothing pending: the next tick does no work.
        object.tick(tick + Duration::from_millis(16));
        assert_eq!(object.relayout_passes(), passes_after_present + 1);
    }

    #[test]
    fn test_tap_routing_inside_and_outside() {
        let mut object = object();
        let now = Instant::now();
        let target = Rect::new(100.0, 400.0, 60.0, 40.0);
        object.update_for_suggestion(Some(Suggestion::for_frame(target, "tap")), now);

        let inside_hole = Point::new(130.0, 420.0);
        assert_eq!(object.handle_tap(inside_hole, now), TapOutcome::Suggestion);

        let inside_bubble = object.bubble_rect().center();
        assert_eq!(object.handle_tap(inside_bubble, now), TapOutcome::Suggestion);

        let outside = Point::new(390.0, 790.0);
        assert!(!object.hole_rect().contains(outside));
        assert!(!object.bubble_rect().contains(outside));
        assert_eq!(object.handle_tap(outside, now), TapOutcome::Background);
    }

    #[test]
    fn test_tap_callbacks_fire() {
        let mut object = object();
        let now = Instant::now();
        let advances = Arc::new(AtomicUsize::new(0));
        let dismissals = Arc::new(AtomicUsize::new(0));
        {
            let advances = advances.clone();
            object.on_suggestion_tapped(move || {
                advances.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let dismissals = dismissals.clone();
            object.on_view_tapped(move || {
                dismissals.fetch_add(1, Ordering::SeqCst);
            });
        }

        let target = Rect::new(100.0, 400.0, 60.0, 40.0);
        object.update_for_suggestion(Some(Suggestion::for_frame(target, "tap")), now);
        object.handle_tap(Point::new(130.0, 420.0), now);
        object.handle_tap(Point::new(390.0, 790.0), now);
        assert_eq!(advances.load(Ordering::SeqCst), 1);
        assert_eq!(dismissals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interaction_locked_during_hole_move() {
        let mut object = object();
        let now = Instant::now();
        let view = FakeView::new(Rect::new(10.0, 10.0, 40.0, 20.0));
        object.update_for_suggestion(Some(Suggestion::for_view(view.clone(), "tap")), now);

        // Move the target far enough to start an animated hole transition.
        view.set_frame(Rect::new(300.0, 600.0, 40.0, 20.0));
        object.tick(now);
        let duration = object.hole_move_duration();
        assert!(duration > Duration::ZERO);

        let mid_move = now + duration / 2;
        let inside = Point::new(320.0, 610.0);
        assert_eq!(object.handle_tap(inside, mid_move), TapOutcome::Ignored);

        // The lock expires on its own after the animation window.
        let after = now + duration;
        assert_eq!(object.handle_tap(inside, after), TapOutcome::Suggestion);
    }

    #[test]
    fn test_observations_replaced_per_suggestion() {
        let mut object = object();
        let now = Instant::now();
        let first = FakeView::new(Rect::new(10.0, 10.0, 40.0, 20.0));
        let second = FakeView::new(Rect::new(200.0, 200.0, 40.0, 20.0));

        object.update_for_suggestion(Some(Suggestion::for_view(first.clone(), "a")), now);
        assert_eq!(first.live_subscriptions(), 3);

        object.update_for_suggestion(Some(Suggestion::for_view(second.clone(), "b")), now);
        assert_eq!(first.live_subscriptions(), 0);
        assert_eq!(second.live_subscriptions(), 3);

        object.suggestions_finished(now);
        assert_eq!(second.live_subscriptions(), 0);
    }

    #[test]
    fn test_detached_view_mid_session_keeps_last_geometry() {
        let mut object = object();
        let now = Instant::now();
        let view = FakeView::new(Rect::new(100.0, 400.0, 60.0, 40.0));
        object.update_for_suggestion(Some(Suggestion::for_view(view.clone(), "tap")), now);
        let hole_before = object.hole_rect();

        view.detach();
        object.tick(now + Duration::from_millis(16));
        assert_eq!(object.hole_rect(), hole_before);
        assert_eq!(object.state(), SessionState::Presenting);
    }

    #[test]
    fn test_finish_fires_success_haptic_when_enabled() {
        let haptics = Arc::new(CountingHaptics::default());
        let mut environment = env();
        environment.haptics = Some(haptics.clone());
        let config = SuggestionsConfig {
            haptic_enabled: true,
            ..SuggestionsConfig::default()
        };
        let now = Instant::now();
        let mut object = SuggestionsObject::new(config, &environment, now);

        object.update_for_suggestion(
            Some(Suggestion::for_frame(Rect::new(10.0, 400.0, 40.0, 20.0), "tap")),
            now,
        );
        object.update_for_suggestion(None, now);
        assert_eq!(haptics.successes.load(Ordering::SeqCst), 1);
        assert_eq!(object.state(), SessionState::Idle);
    }

    #[test]
    fn test_counted_taps_play_impact_haptic() {
        let haptics = Arc::new(CountingHaptics::default());
        let mut environment = env();
        environment.haptics = Some(haptics.clone());
        let config = SuggestionsConfig {
            haptic_enabled: true,
            ..SuggestionsConfig::default()
        };
        let now = Instant::now();
        let mut object = SuggestionsObject::new(config, &environment, now);

        let view = FakeView::new(Rect::new(10.0, 10.0, 40.0, 20.0));
        object.update_for_suggestion(Some(Suggestion::for_view(view.clone(), "tap")), now);

        assert_eq!(
            object.handle_tap(Point::new(30.0, 20.0), now),
            TapOutcome::Suggestion
        );
        assert_eq!(haptics.impacts.load(Ordering::SeqCst), 1);

        // Start an animated hole move; a tap swallowed by the lock plays
        // nothing.
        view.set_frame(Rect::new(300.0, 600.0, 40.0, 20.0));
        object.tick(now);
        let duration = object.hole_move_duration();
        assert!(duration > Duration::ZERO);
        let mid_move = now + duration / 2;
        assert_eq!(
            object.handle_tap(Point::new(320.0, 610.0), mid_move),
            TapOutcome::Ignored
        );
        assert_eq!(haptics.impacts.load(Ordering::SeqCst), 1);

        // Background taps count too.
        let after = now + duration;
        assert_eq!(
            object.handle_tap(Point::new(5.0, 790.0), after),
            TapOutcome::Background
        );
        assert_eq!(haptics.impacts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_taps_ignored_while_idle() {
        let mut object = object();
        assert_eq!(
            object.handle_tap(Point::new(10.0, 10.0), Instant::now()),
            TapOutcome::Ignored
        );
    }
}
