//! Coach-mark walkthrough overlays.
//!
//! Given a queue of targets (live views or explicit rectangles) and text,
//! this crate dims the screen, cuts a highlighted hole around the current
//! target, places a callout bubble and label next to it, advances through
//! the queue on tap and invokes a completion callback when the queue
//! empties. The hole, bubble and label continuously follow the target as it
//! moves or resizes, with bounded animated transitions and hit-testing that
//! stays consistent with what is actually rendered.
//!
//! The crate is toolkit-agnostic: hosts implement the small traits in
//! [`host`] (frame provider, change subscription, text measurement,
//! haptics), drive [`SuggestionsManager::tick`] once per run-loop turn,
//! forward taps to [`SuggestionsManager::handle_tap`] and draw the
//! [`OverlaySnapshot`] sampled each frame.
//!
//! # Example
//!
//! ```
//! use std::{sync::Arc, time::Instant};
//!
//! use suggestions::{
//!     EdgeInsets, HeuristicTextMeasurer, OverlayEnvironment, Rect, Suggestion,
//!     SuggestionsConfig, SuggestionsManager,
//! };
//!
//! let env = OverlayEnvironment {
//!     bounds: Rect::new(0.0, 0.0, 400.0, 800.0),
//!     insets: EdgeInsets::new(44.0, 0.0, 34.0, 0.0),
//!     measurer: Arc::new(HeuristicTextMeasurer),
//!     haptics: None,
//!     filtered_blur_supported: false,
//! };
//!
//! let now = Instant::now();
//! let mut manager = SuggestionsManager::new(env);
//! manager.apply(
//!     vec![
//!         Suggestion::for_frame(Rect::new(40.0, 120.0, 80.0, 44.0), "Tap here"),
//!         Suggestion::for_frame(Rect::new(280.0, 640.0, 80.0, 44.0), "Now here"),
//!     ],
//!     now,
//! );
//! manager.completion(|| println!("walkthrough done"));
//! manager.start_showing(SuggestionsConfig::default(), now);
//!
//! let snapshot = manager.snapshot(now).expect("overlay visible");
//! assert!(snapshot.fill.hole.rect.width() > 80.0);
//! ```

pub mod animation;
pub mod blur;
pub mod bubble;
pub mod color;
pub mod config;
pub mod fill;
pub mod geometry;
pub mod host;
pub mod manager;
pub mod object;
pub mod suggestion;
pub mod text;

pub use animation::{Easing, Tween};
pub use blur::BlurEffect;
pub use bubble::BubbleShape;
pub use color::Color;
pub use config::{
    BackgroundConfig, BubbleConfig, FontSpec, SuggestionsConfig, SuggestionsConfigBuilder,
    TextConfig,
};
pub use fill::{FillShape, HoleUpdate};
pub use geometry::{
    EdgeInsets, HoleShape, HorizontalSide, Point, Rect, Size, VerticalSide,
};
pub use host::{
    ChangeSink, Haptics, HeuristicTextMeasurer, ObservableView, Subscription, TargetView,
    TextMeasurer, ViewProperty,
};
pub use manager::SuggestionsManager;
pub use object::{
    OverlayEnvironment, OverlaySnapshot, SessionState, SuggestionsObject, TapOutcome,
};
pub use suggestion::{Suggestion, SuggestionTarget};
pub use text::TextBlock;
