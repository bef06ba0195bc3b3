//! Geometric ROI masks and conversions between pixel and image masks
//!
//! Masks are indexed `[x, y]` (or `[x, y, z]`), so a field of dimension
//! `[width, height]` yields an array of shape `(width, height)`.

use crate::error::{PhotostimError, Result};
use crate::processing::validation::validate_roi_size;
use crate::types::{Dimension, MaskElement, PixelMaskEntry, RoiSize, VoxelMaskEntry};
use ndarray::{Array2, Array3, ArrayBase, ArrayD, ArrayView2, Data, Ix2, Ix3, Zip};
use tracing::debug;

/// Circle of the given diameter centered on `center`; boundary cells are included.
pub fn build_circular_mask(
    dimension: (usize, usize),
    center: [f64; 2],
    diameter: f64,
) -> Array2<bool> {
    let radius = diameter / 2.0;
    Array2::from_shape_fn(dimension, |(x, y)| {
        let dx = x as f64 - center[0];
        let dy = y as f64 - center[1];
        (dx * dx + dy * dy).sqrt() <= radius
    })
}

/// Axis-aligned rectangle of `[width, height]` centered on `center`; boundary
/// cells are included.
pub fn build_rectangular_mask(
    dimension: (usize, usize),
    center: [f64; 2],
    size: [f64; 2],
) -> Array2<bool> {
    Array2::from_shape_fn(dimension, |(x, y)| {
        (x as f64 - center[0]).abs() <= size[0] / 2.0
            && (y as f64 - center[1]).abs() <= size[1] / 2.0
    })
}

/// Axis-aligned cuboid of `[width, height, depth]` centered on `center`;
/// boundary cells are included.
pub fn build_cuboid_mask(
    dimension: (usize, usize, usize),
    center: [f64; 3],
    size: [f64; 3],
) -> Array3<bool> {
    Array3::from_shape_fn(dimension, |(x, y, z)| {
        (x as f64 - center[0]).abs() <= size[0] / 2.0
            && (y as f64 - center[1]).abs() <= size[1] / 2.0
            && (z as f64 - center[2]).abs() <= size[2] / 2.0
    })
}

/// Rasterize a single ROI onto a field of the given dimension.
///
/// 2D fields accept both circular and rectangular sizes. 3D fields accept
/// cuboid sizes only: a cylinder has no height to extrude along depth. An
/// extent must have one entry per axis.
pub fn rasterize_roi(dimension: &Dimension, center: &[f64], roi_size: &RoiSize) -> Result<ArrayD<bool>> {
    validate_roi_size(roi_size, Some(dimension))?;
    if center.len() != dimension.rank() {
        return Err(PhotostimError::InvalidShape(format!(
            "ROI center has {} coordinates but dimension {} has {} axes",
            center.len(),
            dimension,
            dimension.rank()
        )));
    }

    let mask = match (dimension.depth(), roi_size) {
        (None, RoiSize::Diameter(diameter)) => build_circular_mask(
            (dimension.width(), dimension.height()),
            [center[0], center[1]],
            *diameter,
        )
        .into_dyn(),
        (None, RoiSize::Extent(extent)) => build_rectangular_mask(
            (dimension.width(), dimension.height()),
            [center[0], center[1]],
            [extent[0], extent[1]],
        )
        .into_dyn(),
        (Some(_), RoiSize::Diameter(_)) => {
            return Err(PhotostimError::UnsupportedDimension {
                operation: "rasterize a cylindrical ROI",
                rank: 3,
            });
        }
        (Some(depth), RoiSize::Extent(extent)) => build_cuboid_mask(
            (dimension.width(), dimension.height(), depth),
            [center[0], center[1], center[2]],
            [extent[0], extent[1], extent[2]],
        )
        .into_dyn(),
    };
    Ok(mask)
}

/// Convert a list of ROI centers into a dense 2D image mask.
///
/// Each ROI is drawn as a circle (scalar `roi_size`) or a rectangle (vector
/// `roi_size`) and the results are merged; overlapping ROIs collapse to 1.
/// Only 2D fields are supported.
pub fn pixel_to_image_mask(
    pixel_rois: ArrayView2<'_, f64>,
    roi_size: &RoiSize,
    dimension: &Dimension,
) -> Result<Array2<u8>> {
    if dimension.is_volumetric() {
        return Err(PhotostimError::UnsupportedDimension {
            operation: "convert pixel_roi to image_mask_roi",
            rank: dimension.rank(),
        });
    }
    validate_roi_size(roi_size, Some(dimension))?;
    if pixel_rois.ncols() != 2 {
        return Err(PhotostimError::InvalidShape(format!(
            "pixel_roi entries must have 2 coordinates for a 2-dimensional field, got {}",
            pixel_rois.ncols()
        )));
    }

    let shape = (dimension.width(), dimension.height());
    let mut mask = Array2::<u8>::zeros(shape);
    for center in pixel_rois.rows() {
        let center = [center[0], center[1]];
        let roi_mask = match roi_size {
            RoiSize::Diameter(diameter) => build_circular_mask(shape, center, *diameter),
            RoiSize::Extent(extent) => build_rectangular_mask(shape, center, [extent[0], extent[1]]),
        };
        Zip::from(&mut mask).and(&roi_mask).for_each(|cell, &on| {
            if on {
                *cell = 1;
            }
        });
    }

    debug!(
        rois = pixel_rois.nrows(),
        dimension = %dimension,
        "converted pixel_roi to image mask"
    );
    Ok(mask)
}

/// List the "on" cells of a 2D image mask as `[x, y, 1]` entries, in row-major
/// order.
pub fn image_to_pixel_mask<S>(image_mask: &ArrayBase<S, Ix2>) -> Vec<PixelMaskEntry>
where
    S: Data,
    S::Elem: MaskElement,
{
    image_mask
        .indexed_iter()
        .filter_map(|((x, y), &value)| {
            value
                .is_nonzero()
                .then(|| PixelMaskEntry::builder().x(x).y(y).build())
        })
        .collect()
}

/// List the "on" cells of a 3D image mask as `[x, y, z, 1]` entries, in
/// row-major order.
pub fn image_to_voxel_mask<S>(image_mask: &ArrayBase<S, Ix3>) -> Vec<VoxelMaskEntry>
where
    S: Data,
    S::Elem: MaskElement,
{
    image_mask
        .indexed_iter()
        .filter_map(|((x, y, z), &value)| {
            value
                .is_nonzero()
                .then(|| VoxelMaskEntry::builder().x(x).y(y).z(z).build())
        })
        .collect()
}
