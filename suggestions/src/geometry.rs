//! Overlay coordinate types and the hole/bubble/text placement policy.
//!
//! Everything in this module is a pure function of the current target frame
//! and the drawing bounds. The orchestrator re-runs these computations on
//! every observed frame change; no placement state lives here.
//!
//! # Coordinate System
//!
//! - Origin (0, 0) at the top-left corner of the overlay
//! - X-axis increases to the right
//! - Y-axis increases downward
//! - All values are logical pixels (`f32`)

use glam::Vec2;

/// Gap kept between the hole (or bubble) and the suggestion text.
pub const SPACE_BETWEEN_OVERLAY_AND_TEXT: f32 = 10.0;
/// Extra vertical offset applied to the text when the bubble is drawn.
pub const BUBBLE_OFFSET: f32 = 10.0;
/// Floor for the hole corner radius; never scaled below this.
pub const MINIMAL_CORNER_RADIUS: f32 = 5.0;
/// Total overdraw added around the target frame when cutting the hole.
pub const HOLE_OVERDRAW_AMOUNT: f32 = 10.0;
/// Inset from the overlay edges inside which text may be drawn.
pub const TEXT_DRAWING_PARENT_OFFSET: f32 = 20.0;

/// Outset applied to the text frame to obtain the bubble body rect.
pub const BUBBLE_TEXT_OUTSET: EdgeInsets = EdgeInsets {
    top: 13.0,
    left: 15.0,
    bottom: 23.0,
    right: 15.0,
};

/// A 2D point in overlay space.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// A 2D size in overlay space.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The smaller of the two dimensions.
    pub fn min_dimension(self) -> f32 {
        self.width.min(self.height)
    }
}

/// Per-edge insets. Positive values shrink a rect via [`Rect::inset`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::splat(0.0);

    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value, value)
    }
}

/// An axis-aligned rectangle in overlay space.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn mid_x(&self) -> f32 {
        self.origin.x + self.size.width / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        self.origin.y + self.size.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    pub fn contains_rect(&self, other: Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Shrinks the rect by the given insets.
    pub fn inset(&self, insets: EdgeInsets) -> Rect {
        Rect::new(
            self.min_x() + insets.left,
            self.min_y() + insets.top,
            (self.width() - insets.left - insets.right).max(0.0),
            (self.height() - insets.top - insets.bottom).max(0.0),
        )
    }

    /// Grows the rect by the given insets.
    pub fn outset(&self, insets: EdgeInsets) -> Rect {
        Rect::new(
            self.min_x() - insets.left,
            self.min_y() - insets.top,
            self.width() + insets.left + insets.right,
            self.height() + insets.top + insets.bottom,
        )
    }

    /// The overlapping region of two rects, or [`Rect::ZERO`] when disjoint.
    pub fn intersection(&self, other: Rect) -> Rect {
        let min_x = self.min_x().max(other.min_x());
        let min_y = self.min_y().max(other.min_y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        if max_x <= min_x || max_y <= min_y {
            return Rect::ZERO;
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// Horizontal side of the drawing bounds the text gravitates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalSide {
    Left,
    Right,
}

/// Vertical placement of the text relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalSide {
    Above,
    Below,
}

/// The rounded rectangle cut out of the dimming overlay.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct HoleShape {
    pub rect: Rect,
    pub corner_radius: f32,
}

impl HoleShape {
    pub const ZERO: Self = Self {
        rect: Rect::ZERO,
        corner_radius: 0.0,
    };
}

/// Computes the hole cut out of the overlay for a target frame.
///
/// The hole is the target outset by half the overdraw amount on every edge,
/// clamped so it never extends past `bounds` shrunk by `insets`. The corner
/// radius is half the smaller hole dimension, floored at
/// [`MINIMAL_CORNER_RADIUS`].
pub fn hole_shape(target: Rect, bounds: Rect, insets: EdgeInsets) -> HoleShape {
    let overdraw = EdgeInsets::splat(HOLE_OVERDRAW_AMOUNT / 2.0);
    let visible = bounds.inset(insets);
    let mut rect = target.outset(overdraw);
    if !visible.is_empty() {
        let clamped = rect.intersection(visible);
        if !clamped.is_empty() {
            rect = clamped;
        }
    }
    let corner_radius = (rect.size.min_dimension() / 2.0).max(MINIMAL_CORNER_RADIUS);
    HoleShape {
        rect,
        corner_radius,
    }
}

/// Picks the horizontal side for a target: right iff its midpoint sits right
/// of the drawing bounds' half width, with the exact center resolving left.
pub fn horizontal_side(target: Rect, drawing_bounds: Rect) -> HorizontalSide {
    if target.mid_x() > drawing_bounds.width() / 2.0 {
        HorizontalSide::Right
    } else {
        HorizontalSide::Left
    }
}

/// A resolved text placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub frame: Rect,
    pub horizontal: HorizontalSide,
    pub vertical: VerticalSide,
}

/// Places measured text next to a target inside the drawing bounds.
///
/// `bubble_extra` is the additional vertical clearance taken by the bubble
/// (offset + tail height + focus offset), zero when the bubble is disabled.
/// The text goes above the target unless the above candidate would start
/// over the top of the drawing bounds; an exact boundary hit stays above.
pub fn place_text(
    target: Rect,
    drawing_bounds: Rect,
    measured: Size,
    bubble_extra: f32,
) -> TextPlacement {
    let horizontal = horizontal_side(target, drawing_bounds);

    let y_above =
        target.min_y() - measured.height - SPACE_BETWEEN_OVERLAY_AND_TEXT - bubble_extra;
    let y_below = target.max_y() + SPACE_BETWEEN_OVERLAY_AND_TEXT + bubble_extra;

    let vertical = if y_above < drawing_bounds.min_y() {
        VerticalSide::Below
    } else {
        VerticalSide::Above
    };
    let y = match vertical {
        VerticalSide::Above => y_above,
        VerticalSide::Below => y_below,
    };

    let x = match horizontal {
        HorizontalSide::Right => (drawing_bounds.max_x()
            - measured.width
            - SPACE_BETWEEN_OVERLAY_AND_TEXT)
            .max(drawing_bounds.min_x()),
        HorizontalSide::Left => drawing_bounds.min_x() + SPACE_BETWEEN_OVERLAY_AND_TEXT,
    };

    TextPlacement {
        frame: Rect::new(x, y, measured.width, measured.height),
        horizontal,
        vertical,
    }
}

/// The bubble body rect is always the text rect outset by a fixed inset.
pub fn bubble_rect(text_rect: Rect) -> Rect {
    text_rect.outset(BUBBLE_TEXT_OUTSET)
}
