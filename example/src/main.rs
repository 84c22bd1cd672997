//! Headless walkthrough demo.
//!
//! Drives a two-step session against a tiny fake view toolkit: presents the
//! first suggestion, scrolls the target (exercising the coalesced
//! re-layout), then taps through the queue and prints what the host would
//! render at each step.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::RwLock;
use tracing::info;

use suggestions::{
    ChangeSink, EdgeInsets, HeuristicTextMeasurer, ObservableView, OverlayEnvironment, Rect,
    Subscription, Suggestion, SuggestionsConfigBuilder, SuggestionsManager, TargetView,
    ViewProperty,
};

/// A view whose frame can be moved by the "app", notifying observers the
/// way a real toolkit would.
struct DemoView {
    name: &'static str,
    frame: RwLock<Option<Rect>>,
    sinks: RwLock<Vec<ChangeSink>>,
}

impl DemoView {
    fn new(name: &'static str, frame: Rect) -> Arc<Self> {
        Arc::new(Self {
            name,
            frame: RwLock::new(Some(frame)),
            sinks: RwLock::new(Vec::new()),
        })
    }

    fn set_frame(&self, frame: Rect) {
        *self.frame.write() = Some(frame);
        for sink in self.sinks.read().iter() {
            sink();
        }
    }
}

impl TargetView for DemoView {
    fn frame(&self) -> Option<Rect> {
        *self.frame.read()
    }
}

impl ObservableView for DemoView {
    fn observe(&self, _property: ViewProperty, sink: ChangeSink) -> Subscription {
        self.sinks.write().push(sink);
        Subscription::noop()
    }
}

fn print_frame(manager: &SuggestionsManager, now: Instant, label: &str) {
    match manager.snapshot(now) {
        Some(snapshot) => {
            let hole = snapshot.fill.hole;
            let hole_desc = format!(
                "({:.0},{:.0} {:.0}x{:.0} r{:.0})",
                hole.rect.min_x(),
                hole.rect.min_y(),
                hole.rect.width(),
                hole.rect.height(),
                hole.corner_radius
            );
            let text = snapshot.text.map(|t| t.text).unwrap_or_default();
            info!(
                label,
                alpha = snapshot.alpha,
                hole = %hole_desc,
                text = %text,
                bubble = snapshot.bubble.is_some(),
                "frame"
            );
        }
        None => info!(label, "overlay hidden"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,suggestions=debug".into()),
        )
        .init();

    let compose_button = DemoView::new("compose", Rect::new(320.0, 640.0, 56.0, 56.0));
    let search_field = DemoView::new("search", Rect::new(20.0, 80.0, 360.0, 36.0));

    let env = OverlayEnvironment {
        bounds: Rect::new(0.0, 0.0, 400.0, 720.0),
        insets: EdgeInsets::new(44.0, 0.0, 34.0, 0.0),
        measurer: Arc::new(HeuristicTextMeasurer),
        haptics: None,
        filtered_blur_supported: false,
    };

    let mut now = Instant::now();
    let mut manager = SuggestionsManager::new(env);
    manager.apply(
        vec![
            Suggestion::for_view(compose_button.clone(), "Start a new message here"),
            Suggestion::for_view(search_field.clone(), "Search all conversations"),
        ],
        now,
    );
    manager.completion(|| info!("walkthrough finished"));

    let config = SuggestionsConfigBuilder::default().build().expect("config");
    manager.start_showing(config, now);
    print_frame(&manager, now, "presented");

    // The app scrolls: a burst of frame changes coalesces into one
    // re-layout on the next tick.
    for step in 1..=3 {
        compose_button.set_frame(Rect::new(320.0, 640.0 - 20.0 * step as f32, 56.0, 56.0));
    }
    now += Duration::from_millis(16);
    manager.tick(now);
    print_frame(&manager, now, "after scroll");

    // Wait out the hole-move animation, then tap the highlighted target.
    now += Duration::from_millis(400);
    let hole_center = manager
        .overlay()
        .expect("active session")
        .read()
        .hole_rect()
        .center();
    info!(outcome = ?manager.handle_tap(hole_center, now), "tap on {}", compose_button.name);
    print_frame(&manager, now, "second suggestion");

    // Tap the second target as well: the queue empties and completion runs.
    now += Duration::from_millis(400);
    let hole_center = manager
        .overlay()
        .expect("active session")
        .read()
        .hole_rect()
        .center();
    info!(outcome = ?manager.handle_tap(hole_center, now), "tap on {}", search_field.name);

    now += Duration::from_millis(400);
    print_frame(&manager, now, "after exhaustion");
}
