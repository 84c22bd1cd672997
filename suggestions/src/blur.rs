//! Blurred background with a sharp window over the hole.
//!
//! When the host reports that live filtered blur is unavailable the blur
//! layer degrades to a plain translucent fill, matching the dim color.

use std::time::{Duration, Instant};

use crate::{
    animation::Tween,
    color::Color,
    config::SuggestionsConfig,
    geometry::{HoleShape, Rect},
};

/// How the host should render the blurred backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlurEffect {
    /// Live filtered blur over the content behind the overlay.
    Filtered { radius: f32, tint: Color },
    /// Plain translucent layer for hosts without filter support.
    Fallback { color: Color },
}

pub struct BlurLayer {
    enabled: bool,
    filtered_supported: bool,
    radius: f32,
    tint: Color,
    bounds: Rect,
}

impl BlurLayer {
    pub fn new(config: &SuggestionsConfig, filtered_supported: bool) -> Self {
        Self {
            enabled: config.background.blurred,
            filtered_supported,
            radius: config.background.blur_radius,
            tint: config.background.color.with_alpha(config.background.opacity),
            bounds: Rect::ZERO,
        }
    }

    /// Resizes the blur to the full overlay bounds.
    pub fn update(&mut self, parent_bounds: Rect) {
        self.bounds = parent_bounds;
    }

    pub fn effect(&self) -> Option<(Rect, BlurEffect)> {
        if !self.enabled || self.bounds.is_empty() {
            return None;
        }
        let effect = if self.filtered_supported {
            BlurEffect::Filtered {
                radius: self.radius,
                tint: self.tint,
            }
        } else {
            BlurEffect::Fallback { color: self.tint }
        };
        Some((self.bounds, effect))
    }
}

/// The sharp mask window cut into the blur, kept in lockstep with the hole.
pub struct UnblurLayer {
    enabled: bool,
    window: Option<Tween<HoleShape>>,
}

impl UnblurLayer {
    pub fn new(config: &SuggestionsConfig) -> Self {
        Self {
            enabled: config.background.blurred,
            window: None,
        }
    }

    /// Tracks the hole using the fill layer's own animation duration, so the
    /// sharp window and the hole never drift apart mid-transition.
    pub fn update(&mut self, hole: HoleShape, duration: Duration, now: Instant) {
        if !self.enabled {
            return;
        }
        match &mut self.window {
            Some(tween) => tween.retarget(hole, duration, now),
            None => self.window = Some(Tween::fixed(hole, now)),
        }
    }

    pub fn window_at(&self, now: Instant) -> Option<HoleShape> {
        if !self.enabled {
            return None;
        }
        self.window.as_ref().map(|t| t.value_at(now))
    }
}
