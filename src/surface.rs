//! Raster ink surface that accumulates freehand strokes.
//!
//! The surface owns nothing but pixels: strokes are rasterized with a round
//! brush, erased back to transparency, cleared, copied into detection buffers
//! and cropped into sample images. Alpha is the only ink signal the rest of
//! the engine reads.

use image::{RgbaImage, imageops};

use crate::geometry::{NormalizedRect, Region};

mod capture;
mod stroke;

pub use capture::{CaptureError, PNG_DATA_URI_PREFIX, decode_png_data_uri, encode_png_data_uri};
pub use stroke::{BrushMode, Stroke, StrokePoint, StrokeStyle};

/// Width×height RGBA pixel buffer written to by strokes.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterSurface {
    pixels: RgbaImage,
}

impl RasterSurface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Wrap an existing image, e.g. a decoded scan.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Borrow the underlying pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Alpha at `(x, y)`, or zero outside the surface.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|pixel| pixel.0[3])
            .unwrap_or(0)
    }

    /// True when any pixel has alpha above `threshold`.
    pub fn has_ink(&self, threshold: u8) -> bool {
        self.pixels.pixels().any(|pixel| pixel.0[3] > threshold)
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Set a single pixel, ignoring coordinates outside the surface.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.width() && y < self.height() {
            self.pixels.put_pixel(x, y, image::Rgba(rgba));
        }
    }

    /// Rasterize a stroke over the whole surface. Returns the number of pixels changed.
    pub fn apply_stroke(&mut self, stroke: &Stroke) -> usize {
        let Some(bounds) = self.bounds() else {
            return 0;
        };
        self.rasterize(stroke, bounds)
    }

    /// Rasterize a stroke, touching only pixels inside `clip`.
    pub fn apply_stroke_clipped(&mut self, stroke: &Stroke, clip: Region) -> usize {
        let Some(bounds) = self.bounds().and_then(|bounds| bounds.intersection(&clip)) else {
            return 0;
        };
        self.rasterize(stroke, bounds)
    }

    /// Independent copy for readers that must not observe later strokes.
    pub fn snapshot(&self) -> RasterSurface {
        self.clone()
    }

    /// Copy this surface into `target`, scaling with nearest-neighbour sampling
    /// when the sizes differ.
    pub fn mirror_into(&self, target: &mut RasterSurface) {
        if target.width() == self.width() && target.height() == self.height() {
            target.pixels.copy_from_slice(&self.pixels);
            return;
        }
        if target.width() == 0 || target.height() == 0 {
            return;
        }
        target.pixels = imageops::resize(
            &self.pixels,
            target.width(),
            target.height(),
            imageops::FilterType::Nearest,
        );
    }

    /// Copy of the pixels inside `region`, or `None` when it misses the surface.
    pub fn crop(&self, region: Region) -> Option<RgbaImage> {
        let region = self.bounds()?.intersection(&region)?;
        Some(
            imageops::crop_imm(
                &self.pixels,
                region.min_x,
                region.min_y,
                region.width(),
                region.height(),
            )
            .to_image(),
        )
    }

    /// Crop the box described by `rect` and encode it as a PNG data URI.
    pub fn capture(&self, rect: NormalizedRect) -> Result<String, CaptureError> {
        let region = rect
            .to_region(self.width(), self.height())
            .ok_or(CaptureError::Empty)?;
        let cropped = self.crop(region).ok_or(CaptureError::Empty)?;
        encode_png_data_uri(&cropped)
    }

    fn bounds(&self) -> Option<Region> {
        (self.width() > 0 && self.height() > 0)
            .then(|| Region::new(0, 0, self.width() - 1, self.height() - 1))
    }

    fn rasterize(&mut self, stroke: &Stroke, clip: Region) -> usize {
        let radius = stroke.style.radius();
        let radius_sq = radius * radius;
        let paint = stroke.style.pixel();
        let mut changed = 0usize;
        for (a, b) in stroke.segments() {
            let Some(area) = segment_bounds(a, b, radius, clip) else {
                continue;
            };
            for y in area.min_y..=area.max_y {
                for x in area.min_x..=area.max_x {
                    let center = StrokePoint::new(x as f32 + 0.5, y as f32 + 0.5);
                    if stroke::distance_sq_to_segment(center, a, b) > radius_sq {
                        continue;
                    }
                    let pixel = self.pixels.get_pixel_mut(x, y);
                    if *pixel != paint {
                        *pixel = paint;
                        changed += 1;
                    }
                }
            }
        }
        changed
    }
}

/// Pixel box around a brushed segment, clipped to `clip`.
fn segment_bounds(a: StrokePoint, b: StrokePoint, radius: f32, clip: Region) -> Option<Region> {
    let coords = [a.x, a.y, b.x, b.y];
    if coords.iter().any(|value| !value.is_finite()) {
        return None;
    }
    let min_x = (a.x.min(b.x) - radius).floor();
    let min_y = (a.y.min(b.y) - radius).floor();
    let max_x = (a.x.max(b.x) + radius).ceil();
    let max_y = (a.y.max(b.y) + radius).ceil();
    if max_x < clip.min_x as f32 || max_y < clip.min_y as f32 {
        return None;
    }
    if min_x > clip.max_x as f32 || min_y > clip.max_y as f32 {
        return None;
    }
    Some(Region {
        min_x: (min_x.max(clip.min_x as f32)) as u32,
        min_y: (min_y.max(clip.min_y as f32)) as u32,
        max_x: (max_x.min(clip.max_x as f32)) as u32,
        max_y: (max_y.min(clip.max_y as f32)) as u32,
    })
}
