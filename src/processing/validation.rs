use crate::error::{PhotostimError, Result};
use crate::types::{Dimension, MaskElement, RoiSize};
use ndarray::{ArrayBase, ArrayView2, Data};

/// Check that an ROI size is a positive diameter, or a positive extent with 2
/// or 3 entries.
///
/// When the field dimension is known, an extent must have one entry per axis.
pub fn validate_roi_size(roi_size: &RoiSize, dimension: Option<&Dimension>) -> Result<()> {
    let is_positive = |value: f64| value.is_finite() && value > 0.0;

    match roi_size {
        RoiSize::Diameter(diameter) if is_positive(*diameter) => Ok(()),
        RoiSize::Diameter(diameter) => Err(PhotostimError::InvalidShape(format!(
            "roi_size must be a positive number, got {}",
            diameter
        ))),
        RoiSize::Extent(extent) if extent.len() != 2 && extent.len() != 3 => {
            Err(PhotostimError::InvalidShape(format!(
                "roi_size must be a scalar, a 2D iterable, or a 3D iterable; got {} entries",
                extent.len()
            )))
        }
        RoiSize::Extent(extent) => {
            if let Some(value) = extent.iter().copied().find(|&v| !is_positive(v)) {
                return Err(PhotostimError::InvalidShape(format!(
                    "roi_size entries must be positive numbers, got {}",
                    value
                )));
            }
            match dimension {
                Some(dimension) if dimension.rank() != extent.len() => {
                    Err(PhotostimError::InvalidShape(format!(
                        "roi_size has {} entries but dimension {} has {} axes",
                        extent.len(),
                        dimension,
                        dimension.rank()
                    )))
                }
                _ => Ok(()),
            }
        }
    }
}

/// Check that every cell of an image mask is 0 (off) or 1 (on).
///
/// Empty masks are valid. The first offending value is reported.
pub fn validate_image_mask<S, D>(image_mask: &ArrayBase<S, D>) -> Result<()>
where
    S: Data,
    S::Elem: MaskElement,
    D: ndarray::Dimension,
{
    match image_mask.iter().find(|value| value.is_invalid()) {
        Some(value) => Err(PhotostimError::InvalidMaskValue {
            value: value.to_f64(),
        }),
        None => Ok(()),
    }
}

/// Dimension of the field covered by an image mask, taken from its shape.
pub fn infer_dimension<S, D>(image_mask: &ArrayBase<S, D>) -> Result<Dimension>
where
    S: Data,
    D: ndarray::Dimension,
{
    Dimension::new(image_mask.shape())
}

/// Check that a list of ROI centers has one coordinate per field axis.
pub fn validate_pixel_roi(pixel_roi: ArrayView2<'_, f64>, dimension: &Dimension) -> Result<()> {
    let coords = pixel_roi.ncols();
    if coords != 2 && coords != 3 {
        return Err(PhotostimError::InvalidShape(format!(
            "pixel_roi entries must have 2 or 3 coordinates, got {}",
            coords
        )));
    }
    if coords != dimension.rank() {
        return Err(PhotostimError::InvalidShape(format!(
            "pixel_roi entries have {} coordinates but dimension {} has {} axes",
            coords,
            dimension,
            dimension.rank()
        )));
    }
    Ok(())
}
