//! The callout bubble: a rounded rectangle with a triangular tail pointing
//! into the hole.

use std::time::{Duration, Instant};

use lyon_path::{
    Path, Winding,
    builder::BorderRadii,
    math::{Box2D, point},
};

use crate::{
    animation::Tween,
    color::Color,
    config::SuggestionsConfig,
    geometry::{self, HoleShape, Rect, VerticalSide},
};

/// Renderable state of the bubble at one sampling instant.
#[derive(Debug, Clone)]
pub struct BubbleShape {
    pub rect: Rect,
    pub path: Path,
    pub color: Color,
}

pub struct BubbleLayer {
    enabled: bool,
    color: Color,
    corner_radius: f32,
    tail_height: f32,
    rect: Option<Tween<Rect>>,
    /// Which side of the hole the bubble sits on; the tail goes on the
    /// opposite edge of the body so it points back into the hole.
    side: VerticalSide,
    tail_x: f32,
}

impl BubbleLayer {
    pub fn new(config: &SuggestionsConfig) -> Self {
        Self {
            enabled: config.bubble.should_draw,
            color: config.bubble.color,
            corner_radius: config.bubble.corner_radius,
            tail_height: config.bubble.tail_height,
            rect: None,
            side: VerticalSide::Above,
            tail_x: 0.0,
        }
    }

    /// Recomputes the bubble body from the text rect and re-aims the tail at
    /// the hole, animating over `duration`. No-op while disabled.
    pub fn update(
        &mut self,
        text_rect: Rect,
        hole: HoleShape,
        duration: Duration,
        now: Instant,
    ) {
        if !self.enabled || text_rect.is_empty() {
            return;
        }

        let rect = geometry::bubble_rect(text_rect);
        self.side = if rect.mid_y() < hole.rect.mid_y() {
            VerticalSide::Above
        } else {
            VerticalSide::Below
        };
        self.tail_x = hole.rect.mid_x();
        match &mut self.rect {
            Some(tween) => tween.retarget(rect, duration, now),
            None => self.rect = Some(Tween::fixed(rect, now)),
        }
    }

    /// The body rect the bubble settles at after the current transition.
    pub fn rect_target(&self) -> Rect {
        self.rect.map(|t| t.target()).unwrap_or(Rect::ZERO)
    }

    pub fn shape_at(&self, now: Instant) -> Option<BubbleShape> {
        if !self.enabled {
            return None;
        }
        let rect = self.rect.as_ref()?.value_at(now);
        Some(BubbleShape {
            rect,
            path: self.path_for(rect),
            color: self.color,
        })
    }

    fn path_for(&self, rect: Rect) -> Path {
        let mut builder = Path::builder();
        builder.add_rounded_rectangle(
            &Box2D::new(
                point(rect.min_x(), rect.min_y()),
                point(rect.max_x(), rect.max_y()),
            ),
            &BorderRadii::new(self.corner_radius),
            Winding::Positive,
        );

        // Tail triangle, drawn as its own subpath overlapping the body edge
        // so the non-zero fill merges the two into one silhouette.
        let half_base = self.tail_height;
        let clearance = self.corner_radius + half_base;
        let lo = rect.min_x() + clearance;
        let hi = rect.max_x() - clearance;
        // A body narrower than twice the clearance leaves no room to slide
        // the tail; pin it to the center instead.
        let tip_x = if lo <= hi {
            self.tail_x.clamp(lo, hi)
        } else {
            rect.mid_x()
        };
        let (base_y, tip_y) = match self.side {
            // Bubble above the hole: tail hangs off the bottom edge.
            VerticalSide::Above => (rect.max_y(), rect.max_y() + self.tail_height),
            // Bubble below the hole: tail rises off the top edge.
            VerticalSide::Below => (rect.min_y(), rect.min_y() - self.tail_height),
        };
        builder.begin(point(tip_x - half_base, base_y));
        builder.line_to(point(tip_x, tip_y));
        builder.line_to(point(tip_x + half_base, base_y));
        builder.end(true);

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BUBBLE_TEXT_OUTSET;

    fn hole_at(y: f32) -> HoleShape {
        HoleShape {
            rect: Rect::new(100.0, y, 80.0, 40.0),
            corner_radius: 10.0,
        }
    }

    #[test]
    fn test_disabled_bubble_produces_no_shape() {
        let mut config = SuggestionsConfig::default();
        config.bubble.should_draw = false;
        let mut bubble = BubbleLayer::new(&config);
        let now = Instant::now();
        bubble.update(
            Rect::new(50.0, 50.0, 200.0, 40.0),
            hole_at(200.0),
            Duration::ZERO,
            now,
        );
        assert!(bubble.shape_at(now).is_none());
        assert_eq!(bubble.rect_target(), Rect::ZERO);
    }

    #[test]
    fn test_body_is_text_rect_outset() {
        let mut bubble = BubbleLayer::new(&SuggestionsConfig::default());
        let now = Instant::now();
        let text_rect = Rect::new(50.0, 50.0, 200.0, 40.0);
        bubble.update(text_rect, hole_at(300.0), Duration::ZERO, now);
        let shape = bubble.shape_at(now).unwrap();
        assert_eq!(shape.rect, text_rect.outset(BUBBLE_TEXT_OUTSET));
        assert!(shape.rect.contains_rect(text_rect));
    }

    #[test]
    fn test_tail_points_down_when_bubble_above_hole() {
        let mut bubble = BubbleLayer::new(&SuggestionsConfig::default());
        let now = Instant::now();
        let text_rect = Rect::new(50.0, 50.0, 200.0, 40.0);
        bubble.update(text_rect, hole_at(300.0), Duration::ZERO, now);
        let shape = bubble.shape_at(now).unwrap();
        // The tail tip extends past the bottom edge of the body.
        let max_y = shape
            .path
            .iter()
            .filter_map(|event| match event {
                lyon_path::Event::Line { to, .. } => Some(to.y),
                _ => None,
            })
            .fold(f32::MIN, f32::max);
        assert!(max_y > shape.rect.max_y());
    }

    #[test]
    fn test_narrow_body_pins_tail_to_center() {
        let mut bubble = BubbleLayer::new(&SuggestionsConfig::default());
        let now = Instant::now();
        // A one-character label: the body ends up narrower than twice the
        // corner-plus-tail clearance.
        let text_rect = Rect::new(50.0, 50.0, 4.0, 18.0);
        bubble.update(text_rect, hole_at(300.0), Duration::ZERO, now);
        let shape = bubble.shape_at(now).unwrap();
        let tip_x = shape
            .path
            .iter()
            .filter_map(|event| match event {
                lyon_path::Event::Line { to, .. } if to.y > shape.rect.max_y() => Some(to.x),
                _ => None,
            })
            .next()
            .unwrap();
        assert_eq!(tip_x, shape.rect.mid_x());
    }

    #[test]
    fn test_tail_points_up_when_bubble_below_hole() {
        let mut bubble = BubbleLayer::new(&SuggestionsConfig::default());
        let now = Instant::now();
        let text_rect = Rect::new(50.0, 400.0, 200.0, 40.0);
        bubble.update(text_rect, hole_at(100.0), Duration::ZERO, now);
        let shape = bubble.shape_at(now).unwrap();
        let min_y = shape
            .path
            .iter()
            .filter_map(|event| match event {
                lyon_path::Event::Line { to, .. } => Some(to.y),
                _ => None,
            })
            .fold(f32::MAX, f32::min);
        assert!(min_y < shape.rect.min_y());
    }
}
