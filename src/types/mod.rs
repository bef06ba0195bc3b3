//! Type definitions for photostimulation metadata and data containers

pub mod device;
pub mod dimension;
pub mod mask;
pub mod pattern;
pub mod series;
pub mod table;

// Re-export the main types for convenience
pub use device::{Laser, PhotostimulationMethod, SpatialLightModulator};
pub use dimension::{Dimension, RoiSize};
pub use mask::{MaskElement, PixelMaskEntry, VoxelMaskEntry};
pub use pattern::{HolographicPattern, HolographicPatternConfig};
pub use series::{PhotostimulationSeries, StimulusFormat, Timing};
pub use table::{PhotostimulationTable, TableRow};
