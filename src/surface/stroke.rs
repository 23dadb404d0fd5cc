use serde::{Deserialize, Serialize};

/// Point along a stroke path in surface pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
}

impl StrokePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// How a stroke combines with existing pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushMode {
    /// Paint the stroke colour over whatever is there.
    Ink,
    /// Clear covered pixels back to full transparency.
    Erase,
}

/// Pen settings applied to a whole stroke.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: [u8; 4],
    pub line_width: f32,
    pub mode: BrushMode,
}

impl StrokeStyle {
    /// Opaque ink pen.
    pub fn ink(color: [u8; 3], line_width: f32) -> Self {
        Self {
            color: [color[0], color[1], color[2], u8::MAX],
            line_width,
            mode: BrushMode::Ink,
        }
    }

    /// Eraser with the given diameter.
    pub fn eraser(line_width: f32) -> Self {
        Self {
            color: [0, 0, 0, 0],
            line_width,
            mode: BrushMode::Erase,
        }
    }

    /// Brush radius, never below half a pixel so single-pixel pens still mark.
    pub(crate) fn radius(&self) -> f32 {
        if self.line_width.is_finite() {
            (self.line_width / 2.0).max(0.5)
        } else {
            0.5
        }
    }

    pub(crate) fn pixel(&self) -> image::Rgba<u8> {
        match self.mode {
            BrushMode::Ink => image::Rgba(self.color),
            BrushMode::Erase => image::Rgba([0, 0, 0, 0]),
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::ink([0x0f, 0x17, 0x2a], 3.0)
    }
}

/// A freehand path delivered by the input layer between pointer down and up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub style: StrokeStyle,
    pub points: Vec<StrokePoint>,
}

impl Stroke {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            style,
            points: Vec::new(),
        }
    }

    /// Build a stroke from `(x, y)` pairs.
    pub fn from_points(style: StrokeStyle, points: impl IntoIterator<Item = (f32, f32)>) -> Self {
        Self {
            style,
            points: points
                .into_iter()
                .map(|(x, y)| StrokePoint::new(x, y))
                .collect(),
        }
    }

    /// Append the next pointer position.
    pub fn push(&mut self, x: f32, y: f32) {
        self.points.push(StrokePoint::new(x, y));
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs; a lone point becomes a zero-length segment (a dot).
    pub(crate) fn segments(&self) -> impl Iterator<Item = (StrokePoint, StrokePoint)> + '_ {
        let lone = (self.points.len() == 1).then(|| (self.points[0], self.points[0]));
        lone.into_iter()
            .chain(self.points.windows(2).map(|pair| (pair[0], pair[1])))
    }
}

/// Squared distance from `p` to the segment `a`-`b`.
pub(crate) fn distance_sq_to_segment(p: StrokePoint, a: StrokePoint, b: StrokePoint) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let (apx, apy) = (p.x - a.x, p.y - a.y);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (dx, dy) = (apx - t * abx, apy - t * aby);
    dx * dx + dy * dy
}
