//! The hole-cutting dim overlay.
//!
//! `FillLayer` owns the current hole tween. Every update recomputes the hole
//! for the target frame and, when the hole moved, starts a bounded transition
//! whose duration the orchestrator re-uses to keep the text, bubble and
//! unblur layers moving in lockstep.

use std::time::{Duration, Instant};

use lyon_path::{
    Path, Winding,
    builder::BorderRadii,
    math::{Box2D, point},
};

use crate::{
    animation::{Tween, hole_move_duration},
    color::Color,
    config::SuggestionsConfig,
    geometry::{self, EdgeInsets, HoleShape, Rect},
};

/// Outcome of a fill update, consumed by the orchestrator and the unblur
/// layer so every dependent animates over the same duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleUpdate {
    pub hole: HoleShape,
    pub duration: Duration,
}

/// Renderable state of the fill layer at one sampling instant.
#[derive(Debug, Clone)]
pub struct FillShape {
    pub bounds: Rect,
    pub hole: HoleShape,
    /// Full-bounds rect with the rounded hole as a reversed subpath; fill
    /// with the non-zero rule to dim everything but the hole.
    pub path: Path,
    pub color: Color,
    pub opacity: f32,
}

pub struct FillLayer {
    color: Color,
    opacity: f32,
    bounds: Rect,
    hole: Option<Tween<HoleShape>>,
}

impl FillLayer {
    pub fn new(config: &SuggestionsConfig) -> Self {
        Self {
            color: config.background.color,
            opacity: config.background.opacity,
            bounds: Rect::ZERO,
            hole: None,
        }
    }

    /// Recomputes the hole for `target_frame` inside `parent_bounds`.
    ///
    /// A detached target (`None`) retains the previous hole unchanged so the
    /// overlay neither crashes nor jumps; the next valid suggestion moves it.
    pub fn update(
        &mut self,
        target_frame: Option<Rect>,
        parent_bounds: Rect,
        insets: EdgeInsets,
        now: Instant,
    ) -> HoleUpdate {
        self.bounds = parent_bounds;

        let Some(target) = target_frame else {
            let hole = self.hole.map(|t| t.target()).unwrap_or_default();
            return HoleUpdate {
                hole,
                duration: Duration::ZERO,
            };
        };

        let new_hole = geometry::hole_shape(target, parent_bounds, insets);
        let duration = match &mut self.hole {
            Some(tween) => {
                if tween.target() == new_hole {
                    Duration::ZERO
                } else {
                    let displayed = tween.value_at(now);
                    let delta = displayed
                        .rect
                        .center()
                        .to_vec2()
                        .distance(new_hole.rect.center().to_vec2());
                    let duration = hole_move_duration(delta);
                    tween.retarget(new_hole, duration, now);
                    duration
                }
            }
            None => {
                self.hole = Some(Tween::fixed(new_hole, now));
                Duration::ZERO
            }
        };

        HoleUpdate {
            hole: new_hole,
            duration,
        }
    }

    /// The interpolated hole at `now`.
    pub fn hole_at(&self, now: Instant) -> HoleShape {
        self.hole
            .as_ref()
            .map(|t| t.value_at(now))
            .unwrap_or_default()
    }

    /// The hole the layer is currently heading toward.
    pub fn hole_target(&self) -> HoleShape {
        self.hole.map(|t| t.target()).unwrap_or_default()
    }

    pub fn shape_at(&self, now: Instant) -> FillShape {
        let hole = self.hole_at(now);
        FillShape {
            bounds: self.bounds,
            hole,
            path: dim_path(self.bounds, hole),
            color: self.color,
            opacity: self.opacity,
        }
    }
}

/// Full-bounds rect with the hole as an opposite-winding subpath.
fn dim_path(bounds: Rect, hole: HoleShape) -> Path {
    let mut builder = Path::builder();
    builder.add_rectangle(
        &Box2D::new(
            point(bounds.min_x(), bounds.min_y()),
            point(bounds.max_x(), bounds.max_y()),
        ),
        Winding::Positive,
    );
    if !hole.rect.is_empty() {
        builder.add_rounded_rectangle(
            &Box2D::new(
                point(hole.rect.min_x(), hole.rect.min_y()),
                point(hole.rect.max_x(), hole.rect.max_y()),
            ),
            &BorderRadii::new(hole.corner_radius),
            Winding::Negative,
        );
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::HOLE_OVERDRAW_AMOUNT;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);

    fn layer() -> FillLayer {
        FillLayer::new(&SuggestionsConfig::default())
    }

    #[test]
    fn test_first_update_snaps_without_animation() {
        let mut fill = layer();
        let now = Instant::now();
        let update = fill.update(
            Some(Rect::new(100.0, 100.0, 50.0, 30.0)),
            BOUNDS,
            EdgeInsets::ZERO,
            now,
        );
        assert_eq!(update.duration, Duration::ZERO);
        assert_eq!(fill.hole_at(now), update.hole);
        let expanded = Rect::new(100.0, 100.0, 50.0, 30.0)
            .outset(EdgeInsets::splat(HOLE_OVERDRAW_AMOUNT / 2.0));
        assert!(update.hole.rect.contains_rect(expanded));
    }

    #[test]
    fn test_move_gets_bounded_duration() {
        let mut fill = layer();
        let now = Instant::now();
        fill.update(
            Some(Rect::new(0.0, 0.0, 50.0, 30.0)),
            BOUNDS,
            EdgeInsets::ZERO,
            now,
        );
        let update = fill.update(
            Some(Rect::new(200.0, 400.0, 50.0, 30.0)),
            BOUNDS,
            EdgeInsets::ZERO,
            now,
        );
        assert!(update.duration > Duration::ZERO);
        assert!(update.duration <= crate::animation::MAX_HOLE_MOVE_DURATION);
    }

    #[test]
    fn test_unmoved_hole_has_zero_duration() {
        let mut fill = layer();
        let now = Instant::now();
        let target = Rect::new(40.0, 40.0, 50.0, 30.0);
        fill.update(Some(target), BOUNDS, EdgeInsets::ZERO, now);
        let update = fill.update(Some(target), BOUNDS, EdgeInsets::ZERO, now);
        assert_eq!(update.duration, Duration::ZERO);
    }

    #[test]
    fn test_detached_target_retains_previous_hole() {
        let mut fill = layer();
        let now = Instant::now();
        let first = fill.update(
            Some(Rect::new(40.0, 40.0, 50.0, 30.0)),
            BOUNDS,
            EdgeInsets::ZERO,
            now,
        );
        let update = fill.update(None, BOUNDS, EdgeInsets::ZERO, now);
        assert_eq!(update.hole, first.hole);
        assert_eq!(update.duration, Duration::ZERO);
        assert_eq!(fill.hole_at(now), first.hole);
    }

    #[test]
    fn test_dim_path_has_two_subpaths() {
        let mut fill = layer();
        let now = Instant::now();
        fill.update(
            Some(Rect::new(100.0, 100.0, 50.0, 30.0)),
            BOUNDS,
            EdgeInsets::ZERO,
            now,
        );
        let shape = fill.shape_at(now);
        let closes = shape
            .path
            .iter()
            .filter(|event| matches!(event, lyon_path::Event::End { .. }))
            .count();
        assert_eq!(closes, 2);
    }
}
