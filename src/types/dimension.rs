//! Field extents and ROI sizes

use crate::error::{PhotostimError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extent of a stimulation field in pixels, formatted as `[width, height]` or
/// `[width, height, depth]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Dimension {
    extents: Vec<usize>,
}

impl Dimension {
    pub fn new(extents: &[usize]) -> Result<Self> {
        if extents.len() != 2 && extents.len() != 3 {
            return Err(PhotostimError::InvalidShape(format!(
                "dimension must have 2 or 3 entries, got {}",
                extents.len()
            )));
        }
        if extents.contains(&0) {
            return Err(PhotostimError::InvalidShape(format!(
                "dimension entries must be positive, got [{}]",
                extents.iter().join(", ")
            )));
        }
        Ok(Self {
            extents: extents.to_vec(),
        })
    }

    pub fn planar(width: usize, height: usize) -> Result<Self> {
        Self::new(&[width, height])
    }

    pub fn volumetric(width: usize, height: usize, depth: usize) -> Result<Self> {
        Self::new(&[width, height, depth])
    }

    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    pub fn is_volumetric(&self) -> bool {
        self.rank() == 3
    }

    pub fn width(&self) -> usize {
        self.extents[0]
    }

    pub fn height(&self) -> usize {
        self.extents[1]
    }

    pub fn depth(&self) -> Option<usize> {
        self.extents.get(2).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.extents
    }

    /// Number of cells covered by the field
    pub fn cell_count(&self) -> usize {
        self.extents.iter().product()
    }
}

impl TryFrom<Vec<usize>> for Dimension {
    type Error = PhotostimError;

    fn try_from(extents: Vec<usize>) -> Result<Self> {
        Self::new(&extents)
    }
}

impl From<Dimension> for Vec<usize> {
    fn from(dimension: Dimension) -> Self {
        dimension.extents
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extents.iter().join("x"))
    }
}

/// Size of a single stimulation ROI in pixels.
///
/// A scalar is the diameter of a circle (2D) or cylinder (3D) centered on the
/// ROI coordinates. A vector is the `[width, height]` or
/// `[width, height, depth]` of a rectangle or cuboid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoiSize {
    Diameter(f64),
    Extent(Vec<f64>),
}

impl RoiSize {
    pub fn is_scalar(&self) -> bool {
        matches!(self, RoiSize::Diameter(_))
    }
}

impl From<f64> for RoiSize {
    fn from(diameter: f64) -> Self {
        RoiSize::Diameter(diameter)
    }
}

impl From<Vec<f64>> for RoiSize {
    fn from(extent: Vec<f64>) -> Self {
        RoiSize::Extent(extent)
    }
}

impl<const N: usize> From<[f64; N]> for RoiSize {
    fn from(extent: [f64; N]) -> Self {
        RoiSize::Extent(extent.to_vec())
    }
}
