//! Label measurement and placement.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    animation::{Tween, text_opacity},
    color::Color,
    config::{FontSpec, SuggestionsConfig},
    geometry::{self, HorizontalSide, Rect},
    host::TextMeasurer,
    suggestion::Suggestion,
};

/// Renderable state of the label at one sampling instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub frame: Rect,
    pub opacity: f32,
    pub alignment: HorizontalSide,
    pub text: String,
    pub font: FontSpec,
    pub color: Color,
}

pub struct TextLayer {
    font: FontSpec,
    color: Color,
    bubble_extra: f32,
    measurer: Arc<dyn TextMeasurer>,
    frame: Option<Tween<Rect>>,
    alignment: HorizontalSide,
    text: String,
}

impl TextLayer {
    pub fn new(config: &SuggestionsConfig, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            font: config.text.font,
            color: config.text.color,
            bubble_extra: config.bubble_extra(),
            measurer,
            frame: None,
            alignment: HorizontalSide::Left,
            text: String::new(),
        }
    }

    /// Measures and places the suggestion text, animating the move over
    /// `duration`. Returns the frame the text is heading toward; the
    /// orchestrator outsets it into the bubble rect.
    ///
    /// A missing target frame leaves the previous placement untouched.
    pub fn update(
        &mut self,
        bounds_for_drawing: Rect,
        max_text_width: f32,
        suggestion: &Suggestion,
        target_frame: Option<Rect>,
        duration: Duration,
        now: Instant,
    ) -> Rect {
        let Some(target) = target_frame else {
            return self.frame.map(|t| t.target()).unwrap_or(Rect::ZERO);
        };

        let measured = self
            .measurer
            .measure(&suggestion.text, &self.font, max_text_width);
        let placement =
            geometry::place_text(target, bounds_for_drawing, measured, self.bubble_extra);

        self.alignment = placement.horizontal;
        self.text = suggestion.text.clone();
        match &mut self.frame {
            Some(tween) => tween.retarget(placement.frame, duration, now),
            None => self.frame = Some(Tween::fixed(placement.frame, now)),
        }

        placement.frame
    }

    /// Frame the label settles at once the current transition finishes.
    pub fn frame_target(&self) -> Rect {
        self.frame.map(|t| t.target()).unwrap_or(Rect::ZERO)
    }

    pub fn block_at(&self, now: Instant) -> Option<TextBlock> {
        let tween = self.frame.as_ref()?;
        Some(TextBlock {
            frame: tween.value_at(now),
            opacity: text_opacity(tween.progress(now)),
            alignment: self.alignment,
            text: self.text.clone(),
            font: self.font,
            color: self.color,
        })
    }
}
