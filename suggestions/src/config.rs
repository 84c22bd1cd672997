//! Session configuration.
//!
//! A [`SuggestionsConfig`] is supplied once when a session starts and never
//! mutated mid-session. Use [`SuggestionsConfigBuilder`] to override the
//! defaults.

use derive_builder::Builder;

use crate::color::Color;

/// Font description handed to the host's text measurer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Point size in logical pixels.
    pub size: f32,
    /// Line height in logical pixels.
    pub line_height: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: 14.0,
            line_height: 18.0,
        }
    }
}

/// Dimming / blur background settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundConfig {
    /// Color of the dimming overlay.
    pub color: Color,
    /// Opacity of the dimming overlay.
    pub opacity: f32,
    /// Whether the background behind the overlay is blurred.
    pub blurred: bool,
    /// Blur radius used when `blurred` is set and the host supports it.
    pub blur_radius: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            opacity: 0.6,
            blurred: false,
            blur_radius: 24.0,
        }
    }
}

/// Callout bubble settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleConfig {
    /// Whether the bubble is drawn at all. When false the label is placed
    /// directly against the hole.
    pub should_draw: bool,
    pub color: Color,
    /// Corner radius of the bubble body.
    pub corner_radius: f32,
    /// Height of the triangular tail pointing into the hole.
    pub tail_height: f32,
    /// Extra gap between the tail tip and the hole edge.
    pub focus_offset: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            should_draw: true,
            color: Color::from_rgba_u8(42, 97, 222, 255),
            corner_radius: 10.0,
            tail_height: 8.0,
            focus_offset: 0.0,
        }
    }
}

/// Label settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextConfig {
    pub font: FontSpec,
    pub color: Color,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            color: Color::WHITE,
        }
    }
}

/// Immutable configuration for one overlay session.
#[derive(Builder, Debug, Clone, Default, PartialEq)]
#[builder(pattern = "owned", default)]
pub struct SuggestionsConfig {
    pub background: BackgroundConfig,
    pub bubble: BubbleConfig,
    pub text: TextConfig,
    /// Plays a light impact on counted taps and a success notification when
    /// the queue empties naturally.
    pub haptic_enabled: bool,
}

impl SuggestionsConfig {
    /// Vertical clearance the bubble adds to the text placement, zero when
    /// the bubble is disabled.
    pub(crate) fn bubble_extra(&self) -> f32 {
        if self.bubble.should_draw {
            crate::geometry::BUBBLE_OFFSET + self.bubble.tail_height + self.bubble.focus_offset
        } else {
            0.0
        }
    }
}
