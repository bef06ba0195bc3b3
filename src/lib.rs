//! ROI masks and metadata containers for holographic photostimulation
//! experiments, following the `ndx-photostim` NWB extension.
//!
//! Stimulation targets are described either as a list of ROI centers with a
//! shared size, or as a dense 0/1 image mask; [`processing::masks`] converts
//! between the two. [`types`] holds the containers that attach patterns to
//! devices, presentation time series and a summary table.

pub mod error;
pub mod processing;
#[cfg(feature = "python")]
pub mod python;
pub mod schema;
pub mod types;
pub mod utils;

pub use error::{PhotostimError, Result};
pub use processing::{
    image_to_pixel_mask, image_to_voxel_mask, pixel_to_image_mask, validate_image_mask,
    validate_roi_size,
};
pub use schema::photostim_namespace;
pub use types::{
    Dimension, HolographicPattern, Laser, PhotostimulationMethod, PhotostimulationSeries,
    PhotostimulationTable, PixelMaskEntry, RoiSize, SpatialLightModulator, StimulusFormat,
    VoxelMaskEntry,
};
