//! Ink region detection over a raster surface.
//!
//! Pixels whose alpha exceeds the configured threshold are ink. Ink pixels are
//! grouped into 4-connected components with an iterative flood fill, small
//! components are dropped as noise, and the survivors are padded into
//! [`Region`]s ordered top-to-bottom, then left-to-right.

use tracing::debug;

use crate::config::DetectionSettings;
use crate::geometry::Region;
use crate::surface::RasterSurface;

/// One connected ink blob before noise filtering and padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkComponent {
    /// Tight bounds around the blob's pixels.
    pub bounds: Region,
    /// Number of ink pixels in the blob.
    pub pixel_count: u64,
}

/// Finds glyph-sized ink regions on a surface snapshot.
#[derive(Clone, Debug, Default)]
pub struct RegionDetector {
    settings: DetectionSettings,
}

impl RegionDetector {
    pub fn new(settings: DetectionSettings) -> Self {
        Self {
            settings: settings.normalized(),
        }
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    /// Padded regions for every component at or above the size floor.
    ///
    /// A surface without ink yields an empty list; detection never fails.
    pub fn detect(&self, surface: &RasterSurface) -> Vec<Region> {
        let (width, height) = (surface.width(), surface.height());
        let floor = self.size_floor(width, height);
        let padding = self.padding(width, height);
        let components = self.components(surface);
        let found = components.len();
        let mut regions: Vec<Region> = components
            .into_iter()
            .filter(|component| component.pixel_count >= floor)
            .map(|component| component.bounds.padded(padding, width, height))
            .collect();
        regions.sort_by_key(|region| (region.min_y, region.min_x));
        debug!(
            "Detected {} ink regions ({} components, floor {floor}px, padding {padding}px)",
            regions.len(),
            found
        );
        regions
    }

    /// Every 4-connected ink component, in scan order of its first pixel.
    pub fn components(&self, surface: &RasterSurface) -> Vec<InkComponent> {
        let width = surface.width() as usize;
        let height = surface.height() as usize;
        let raw = surface.image().as_raw();
        let threshold = self.settings.alpha_threshold;
        let is_ink = |index: usize| raw[index * 4 + 3] > threshold;

        let mut visited = vec![false; width * height];
        let mut stack = Vec::new();
        let mut components = Vec::new();
        for start in 0..width * height {
            if visited[start] || !is_ink(start) {
                continue;
            }
            visited[start] = true;
            stack.push(start);
            let (sx, sy) = ((start % width) as u32, (start / width) as u32);
            let mut bounds = Region::new(sx, sy, sx, sy);
            let mut pixel_count = 0u64;

            while let Some(current) = stack.pop() {
                pixel_count += 1;
                let (x, y) = (current % width, current / width);
                bounds.min_x = bounds.min_x.min(x as u32);
                bounds.max_x = bounds.max_x.max(x as u32);
                bounds.min_y = bounds.min_y.min(y as u32);
                bounds.max_y = bounds.max_y.max(y as u32);

                let neighbours = [
                    (x > 0).then(|| current - 1),
                    (x + 1 < width).then(|| current + 1),
                    (y > 0).then(|| current - width),
                    (y + 1 < height).then(|| current + width),
                ];
                for next in neighbours.into_iter().flatten() {
                    if !visited[next] && is_ink(next) {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
            components.push(InkComponent {
                bounds,
                pixel_count,
            });
        }
        components
    }

    /// Minimum pixel count for a component on a `width`×`height` surface.
    pub fn size_floor(&self, width: u32, height: u32) -> u64 {
        let area = u64::from(width) * u64::from(height);
        let scaled = area / u64::from(self.settings.area_divisor.max(1));
        scaled.max(u64::from(self.settings.min_pixel_floor))
    }

    /// Padding added around each kept component on a `width`×`height` surface.
    pub fn padding(&self, width: u32, height: u32) -> u32 {
        let scaled = (width.min(height) as f32 * self.settings.padding_ratio).floor() as u32;
        scaled.max(self.settings.min_padding)
    }
}

/// Convenience wrapper for one-off detection with explicit settings.
pub fn detect_ink_regions(surface: &RasterSurface, settings: &DetectionSettings) -> Vec<Region> {
    RegionDetector::new(settings.clone()).detect(surface)
}


#[cfg(test)]
mod tests {
    use super::test_support::fill_block;
    use super::*;

    fn detector() -> RegionDetector {
        RegionDetector::new(DetectionSettings::default())
    }

    #[test]
    fn blank_surface_has_no_regions() {
        assert!(detector().detect(&RasterSurface::new(64, 64)).is_empty());
        assert!(detector().detect(&RasterSurface::new(0, 0)).is_empty());
    }

    #[test]
    fn single_pixel_is_noise() {
        let mut surface = RasterSurface::new(100, 100);
        surface.put_pixel(50, 50, [0, 0, 0, 255]);
        assert!(detector().detect(&surface).is_empty());
        assert_eq!(detector().components(&surface).len(), 1);
    }

    #[test]
    fn separate_blobs_yield_padded_disjoint_boxes_in_reading_order() {
        let mut surface = RasterSurface::new(200, 100);
        fill_block(&mut surface, 120, 10, 139, 29);
        fill_block(&mut surface, 10, 12, 29, 31);
        fill_block(&mut surface, 60, 60, 79, 79);

        let regions = detector().detect(&surface);

        assert_eq!(
            regions,
            vec![
                Region::new(118, 8, 141, 31),
                Region::new(8, 10, 31, 33),
                Region::new(58, 58, 81, 81),
            ]
        );
        for (i, a) in regions.iter().enumerate() {
            for b in regions.iter().skip(i + 1) {
                assert!(a.intersection(b).is_none());
            }
        }
    }

    #[test]
    fn diagonal_contact_is_not_connected() {
        let mut surface = RasterSurface::new(100, 100);
        fill_block(&mut surface, 10, 10, 19, 19);
        fill_block(&mut surface, 20, 20, 29, 29);

        let components = detector().components(&surface);

        assert_eq!(components.len(), 2);
        assert!(components.iter().all(|c| c.pixel_count == 100));
    }

    #[test]
    fn row_edges_do_not_wrap() {
        let mut surface = RasterSurface::new(10, 20);
        fill_block(&mut surface, 9, 0, 9, 9);
        fill_block(&mut surface, 0, 10, 0, 19);

        assert_eq!(detector().components(&surface).len(), 2);
    }

    #[test]
    fn faint_pixels_below_threshold_are_ignored() {
        let mut surface = RasterSurface::new(50, 50);
        for y in 0..20 {
            for x in 0..20 {
                surface.put_pixel(x, y, [0, 0, 0, 16]);
            }
        }
        assert!(detector().components(&surface).is_empty());
    }

    #[test]
    fn size_floor_scales_with_area() {
        let detector = detector();
        assert_eq!(detector.size_floor(100, 100), 60);
        assert_eq!(detector.size_floor(2000, 2000), 200);
        assert_eq!(detector.padding(100, 100), 2);
        assert_eq!(detector.padding(1000, 2000), 4);
    }

    #[test]
    fn blob_exactly_at_floor_is_kept() {
        let mut surface = RasterSurface::new(100, 100);
        fill_block(&mut surface, 10, 10, 15, 19);
        assert_eq!(detector().components(&surface)[0].pixel_count, 60);
        assert_eq!(detector().detect(&surface).len(), 1);
    }
}
