//! Merging fresh detection output with annotations that already exist.

use crate::annotation::{Annotation, AnnotationId};
use crate::geometry::{FrameSize, Region};

/// Outcome of comparing a detection pass with the current annotations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciliation {
    /// Regions not yet covered by any annotation, in detection order.
    pub novel: Vec<Region>,
    /// Annotations awaiting re-analysis, in annotation order.
    pub review: Vec<AnnotationId>,
    /// Regions dropped as duplicates of an existing annotation.
    pub suppressed: usize,
}

/// Split `regions` into new ones and duplicates of `existing`.
///
/// A region is a duplicate when more than `overlap_fraction` of its own area
/// lies inside any existing annotation, whatever that annotation's state.
/// `surface_width`×`surface_height` is the pixel frame of the regions; the
/// annotations' normalised rectangles are projected into it.
pub fn reconcile(
    regions: &[Region],
    surface_width: u32,
    surface_height: u32,
    existing: &[Annotation],
    overlap_fraction: f32,
) -> Reconciliation {
    let frame = FrameSize::new(surface_width as f32, surface_height as f32);
    let occupied: Vec<_> = existing
        .iter()
        .map(|annotation| annotation.rect().to_pixel_rect(frame))
        .collect();

    let mut result = Reconciliation {
        review: existing
            .iter()
            .filter(|annotation| annotation.needs_review())
            .map(|annotation| annotation.id().clone())
            .collect(),
        ..Reconciliation::default()
    };
    for region in regions {
        let rect = region.to_pixel_rect();
        let area = rect.area();
        let duplicate = area > 0.0
            && occupied
                .iter()
                .any(|other| rect.intersection_area(other) / area > overlap_fraction);
        if duplicate {
            result.suppressed += 1;
        } else {
            result.novel.push(*region);
        }
    }
    result
}
