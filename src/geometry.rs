//! Rectangle math shared by the surface, the detector and annotations.
//! Pure and allocation free so every coordinate conversion can be tested in isolation.

use serde::{Deserialize, Serialize};

/// Tolerance applied when snapping fractional edges back onto the pixel grid.
const GRID_EPSILON: f32 = 1e-3;

/// Inclusive pixel bounds on a raster surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Region {
    /// Build a region from two corners in any order.
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Width in pixels, counting both edges.
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels, counting both edges.
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// True when the pixel lies inside the bounds.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Grow by `padding` on every side without leaving a `width`×`height` surface.
    pub fn padded(&self, padding: u32, width: u32, height: u32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(padding),
            min_y: self.min_y.saturating_sub(padding),
            max_x: self
                .max_x
                .saturating_add(padding)
                .min(width.saturating_sub(1)),
            max_y: self
                .max_y
                .saturating_add(padding)
                .min(height.saturating_sub(1)),
        }
    }

    /// Overlapping part of two regions, if any.
    pub fn intersection(&self, other: &Region) -> Option<Region> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        (min_x <= max_x && min_y <= max_y).then_some(Region {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Continuous rectangle covering the same pixels.
    pub fn to_pixel_rect(&self) -> PixelRect {
        PixelRect {
            x: self.min_x as f32,
            y: self.min_y as f32,
            width: self.width() as f32,
            height: self.height() as f32,
        }
    }

    /// Express the region as a fraction of a `width`×`height` surface.
    pub fn to_normalized(&self, width: u32, height: u32) -> NormalizedRect {
        let frame = FrameSize::new(width as f32, height as f32);
        NormalizedRect::from_pixel_rect(self.to_pixel_rect(), frame)
    }
}

/// Pixel dimensions of the reference frame annotations are drawn over.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f32,
    pub height: f32,
}

impl FrameSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// True when either side has no extent.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle in continuous pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanned by a drag from `(x0, y0)` to `(x1, y1)`.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Flip negative extents so width and height are non-negative.
    pub fn normalized(&self) -> Self {
        Self::from_corners(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Area shared with `other`; zero when they do not touch.
    pub fn intersection_area(&self, other: &PixelRect) -> f32 {
        let overlap_w = self.right().min(other.right()) - self.x.max(other.x);
        let overlap_h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if overlap_w <= 0.0 || overlap_h <= 0.0 {
            return 0.0;
        }
        overlap_w * overlap_h
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Rectangle expressed as fractions (0.0 - 1.0) of the reference frame.
///
/// Every constructor clamps, so a value of this type always lies fully within
/// the frame: `x + width <= 1` and `y + height <= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl NormalizedRect {
    /// Create a clamped rectangle. Extents are clamped first, then the origin.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let width = clamp01(width);
        let height = clamp01(height);
        Self {
            x: finite_or_zero(x).clamp(0.0, 1.0 - width),
            y: finite_or_zero(y).clamp(0.0, 1.0 - height),
            width,
            height,
        }
    }

    /// Convert a frame-pixel rectangle, clipping whatever lies outside the frame.
    pub fn from_pixel_rect(rect: PixelRect, frame: FrameSize) -> Self {
        if frame.is_empty() {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }
        let rect = rect.normalized();
        let left = clamp01(rect.x / frame.width);
        let top = clamp01(rect.y / frame.height);
        let right = clamp01(rect.right() / frame.width);
        let bottom = clamp01(rect.bottom() / frame.height);
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// True when the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Shift by a fractional delta, stopping exactly at the frame edges.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.x + finite_or_zero(dx),
            self.y + finite_or_zero(dy),
            self.width,
            self.height,
        )
    }

    /// Scale into the pixel units of `frame`.
    pub fn to_pixel_rect(&self, frame: FrameSize) -> PixelRect {
        PixelRect::new(
            self.x * frame.width,
            self.y * frame.height,
            self.width * frame.width,
            self.height * frame.height,
        )
    }

    /// Smallest pixel region of a `width`×`height` surface covering this rectangle.
    pub fn to_region(&self, width: u32, height: u32) -> Option<Region> {
        if width == 0 || height == 0 || self.is_empty() {
            return None;
        }
        let (w, h) = (width as f32, height as f32);
        let min_x = (self.x * w + GRID_EPSILON).floor().max(0.0) as u32;
        let min_y = (self.y * h + GRID_EPSILON).floor().max(0.0) as u32;
        let end_x = ((self.x + self.width) * w - GRID_EPSILON).ceil().min(w) as u32;
        let end_y = ((self.y + self.height) * h - GRID_EPSILON).ceil().min(h) as u32;
        if end_x <= min_x || end_y <= min_y {
            return None;
        }
        Some(Region {
            min_x,
            min_y,
            max_x: end_x - 1,
            max_y: end_y - 1,
        })
    }
}

fn clamp01(value: f32) -> f32 {
    finite_or_zero(value).clamp(0.0, 1.0)
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

fn sanitize_extent(value: f32) -> f32 {
    finite_or_zero(value).max(0.0)
}
