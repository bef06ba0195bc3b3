//! Holographic stimulation pattern

use crate::error::{PhotostimError, Result};
use crate::processing::masks::{
    image_to_pixel_mask, image_to_voxel_mask, pixel_to_image_mask, rasterize_roi,
};
use crate::processing::validation::{
    infer_dimension, validate_image_mask, validate_pixel_roi, validate_roi_size,
};
use crate::types::{Dimension, PhotostimulationMethod, PixelMaskEntry, RoiSize, VoxelMaskEntry};
use bon::bon;
use ndarray::{Array2, ArrayD, ArrayView1, Ix2, Ix3, Zip};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Container to store the pattern used in a photostimulation experiment.
///
/// ROIs are given either as an image mask (`image_mask_roi`) or as a list of
/// ROI centers (`pixel_roi`) together with `roi_size` and `dimension`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HolographicPatternConfig")]
pub struct HolographicPattern {
    name: String,
    image_mask_roi: Option<ArrayD<u8>>,
    pixel_roi: Option<Array2<f64>>,
    roi_size: Option<RoiSize>,
    dimension: Dimension,
    stim_duration: Option<f64>,
    method: Option<PhotostimulationMethod>,
}

/// Unvalidated pattern fields, as read from a JSON config
#[derive(Debug, Clone, Deserialize)]
pub struct HolographicPatternConfig {
    pub name: String,
    #[serde(default)]
    pub image_mask_roi: Option<ArrayD<f64>>,
    #[serde(default)]
    pub pixel_roi: Option<Array2<f64>>,
    #[serde(default)]
    pub roi_size: Option<RoiSize>,
    #[serde(default)]
    pub dimension: Option<Dimension>,
    #[serde(default)]
    pub stim_duration: Option<f64>,
    #[serde(default)]
    pub method: Option<PhotostimulationMethod>,
}

impl TryFrom<HolographicPatternConfig> for HolographicPattern {
    type Error = PhotostimError;

    fn try_from(config: HolographicPatternConfig) -> Result<Self> {
        HolographicPattern::builder()
            .name(config.name)
            .maybe_image_mask_roi(config.image_mask_roi)
            .maybe_pixel_roi(config.pixel_roi)
            .maybe_roi_size(config.roi_size)
            .maybe_dimension(config.dimension)
            .maybe_stim_duration(config.stim_duration)
            .maybe_method(config.method)
            .build()
    }
}

#[bon]
impl HolographicPattern {
    #[builder]
    pub fn new(
        #[builder(into)] name: String,
        image_mask_roi: Option<ArrayD<f64>>,
        pixel_roi: Option<Array2<f64>>,
        #[builder(into)] roi_size: Option<RoiSize>,
        dimension: Option<Dimension>,
        stim_duration: Option<f64>,
        method: Option<PhotostimulationMethod>,
    ) -> Result<Self> {
        trace!(name = %name, "validating holographic pattern");

        if let Some(roi_size) = &roi_size {
            validate_roi_size(roi_size, dimension.as_ref())?;
        }

        if pixel_roi.is_none() && image_mask_roi.is_none() {
            return Err(PhotostimError::missing(
                "pixel_roi or image_mask_roi",
                "when constructing HolographicPattern",
            ));
        }

        if let Some(pixel_roi) = &pixel_roi {
            if roi_size.is_none() {
                return Err(PhotostimError::missing("roi_size", "when using a pixel mask"));
            }
            let Some(dimension) = &dimension else {
                return Err(PhotostimError::missing("dimension", "when using a pixel mask"));
            };
            validate_pixel_roi(pixel_roi.view(), dimension)?;
        }

        let (image_mask_roi, dimension) = match image_mask_roi {
            Some(mask) => {
                let mask_dimension = infer_dimension(&mask)?;
                validate_image_mask(&mask)?;
                let dimension = match dimension {
                    Some(dimension) => {
                        if dimension != mask_dimension {
                            warn!(
                                name = %name,
                                dimension = %dimension,
                                mask_shape = %mask_dimension,
                                "dimension does not match image_mask_roi shape"
                            );
                        }
                        dimension
                    }
                    None => mask_dimension,
                };
                (Some(mask.mapv(|value| value as u8)), dimension)
            }
            None => {
                let dimension = dimension
                    .ok_or_else(|| PhotostimError::missing("dimension", "when using a pixel mask"))?;
                (None, dimension)
            }
        };

        // dimension may only now be known, inferred from the mask
        if let Some(roi_size) = &roi_size {
            validate_roi_size(roi_size, Some(&dimension))?;
        }

        Ok(Self {
            name,
            image_mask_roi,
            pixel_roi,
            roi_size,
            dimension,
            stim_duration,
            method,
        })
    }
}

impl HolographicPattern {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_mask_roi(&self) -> Option<&ArrayD<u8>> {
        self.image_mask_roi.as_ref()
    }

    pub fn pixel_roi(&self) -> Option<&Array2<f64>> {
        self.pixel_roi.as_ref()
    }

    pub fn roi_size(&self) -> Option<&RoiSize> {
        self.roi_size.as_ref()
    }

    /// Field dimension, either supplied or inferred from the image mask
    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    pub fn stim_duration(&self) -> Option<f64> {
        self.stim_duration
    }

    pub fn method(&self) -> Option<&PhotostimulationMethod> {
        self.method.as_ref()
    }

    /// Number of ROI centers, when the pattern was given as a pixel list
    pub fn num_rois(&self) -> Option<usize> {
        self.pixel_roi.as_ref().map(|rois| rois.nrows())
    }

    /// Convert `pixel_roi` into a 2D image mask where ROIs are encoded as 1.
    pub fn pixel_to_image_mask_roi(&self) -> Result<Array2<u8>> {
        let pixel_roi = self.pixel_roi.as_ref().ok_or_else(|| {
            PhotostimError::missing("pixel_roi", "to convert to an image mask")
        })?;
        let roi_size = self.roi_size.as_ref().ok_or_else(|| {
            PhotostimError::missing("roi_size", "to convert to an image mask")
        })?;
        pixel_to_image_mask(pixel_roi.view(), roi_size, &self.dimension)
    }

    /// The pattern as a dense mask: the stored image mask if present,
    /// otherwise the mask drawn from the pixel ROIs.
    pub fn image_mask(&self) -> Result<ArrayD<u8>> {
        match &self.image_mask_roi {
            Some(mask) => Ok(mask.clone()),
            None => Ok(self.pixel_to_image_mask_roi()?.into_dyn()),
        }
    }

    /// "On" pixels of a 2D pattern as `[x, y, weight]` entries
    pub fn pixel_mask(&self) -> Result<Vec<PixelMaskEntry>> {
        let mask = self.image_mask()?;
        let rank = mask.ndim();
        let mask = mask
            .into_dimensionality::<Ix2>()
            .map_err(|_| PhotostimError::UnsupportedDimension {
                operation: "list pixel mask entries",
                rank,
            })?;
        Ok(image_to_pixel_mask(&mask))
    }

    /// "On" voxels of a 3D pattern as `[x, y, z, weight]` entries
    pub fn voxel_mask(&self) -> Result<Vec<VoxelMaskEntry>> {
        let mask = self.image_mask()?;
        let rank = mask.ndim();
        let mask = mask
            .into_dimensionality::<Ix3>()
            .map_err(|_| PhotostimError::UnsupportedDimension {
                operation: "list voxel mask entries",
                rank,
            })?;
        Ok(image_to_voxel_mask(&mask))
    }

    /// Append an ROI centered on `center`.
    ///
    /// The center is added to `pixel_roi`, and when the pattern holds an image
    /// mask the ROI shape is drawn into it as well. Nothing is modified if
    /// either update fails.
    pub fn add_roi(&mut self, center: &[f64]) -> Result<()> {
        let roi_size = self
            .roi_size
            .as_ref()
            .ok_or_else(|| PhotostimError::missing("roi_size", "to add an ROI"))?;
        if center.len() != self.dimension.rank() {
            return Err(PhotostimError::InvalidShape(format!(
                "ROI center has {} coordinates but dimension {} has {} axes",
                center.len(),
                self.dimension,
                self.dimension.rank()
            )));
        }

        let image_mask_roi = match &self.image_mask_roi {
            Some(existing) => {
                let roi_mask = rasterize_roi(&self.dimension, center, roi_size)?;
                if existing.shape() != roi_mask.shape() {
                    return Err(PhotostimError::InvalidShape(format!(
                        "image_mask_roi shape {:?} does not match dimension {}",
                        existing.shape(),
                        self.dimension
                    )));
                }
                let mut merged = existing.clone();
                Zip::from(&mut merged).and(&roi_mask).for_each(|cell, &on| {
                    if on {
                        *cell = 1;
                    }
                });
                Some(merged)
            }
            None => None,
        };

        let pixel_roi = match &self.pixel_roi {
            Some(existing) => {
                let mut rois = existing.clone();
                rois.push_row(ArrayView1::from(center))
                    .map_err(|e| PhotostimError::InvalidShape(e.to_string()))?;
                rois
            }
            None => Array2::from_shape_vec((1, center.len()), center.to_vec())
                .map_err(|e| PhotostimError::InvalidShape(e.to_string()))?,
        };

        if image_mask_roi.is_some() {
            self.image_mask_roi = image_mask_roi;
        }
        self.pixel_roi = Some(pixel_roi);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, Array3, array, s};

    /// Image mask with a single 5x5 ROI on a 50x50 grid
    fn create_image_mask_roi() -> ArrayD<f64> {
        let mut mask = Array2::<f64>::zeros((50, 50));
        mask.slice_mut(s![1..6, 2..7]).fill(1.0);
        mask.into_dyn()
    }

    fn create_pixel_roi() -> Array2<f64> {
        array![[12.0, 40.0], [55.0, 7.0], [80.0, 80.0], [3.0, 3.0], [60.0, 61.0]]
    }

    #[test]
    fn test_init_mask_roi() -> Result<()> {
        let pattern = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(create_image_mask_roi())
            .build()?;
        assert_eq!(pattern.dimension().as_slice(), &[50, 50]);
        assert_eq!(pattern.image_mask_roi().map(|m| m.sum()), Some(25));

        let volume = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(Array3::<f64>::ones((5, 5, 5)).into_dyn())
            .build()?;
        assert!(volume.dimension().is_volumetric());
        Ok(())
    }

    #[test]
    fn test_mask_rank_rejected() {
        let flat = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(Array::<f64, _>::zeros(5).into_dyn())
            .build();
        assert!(matches!(flat, Err(PhotostimError::InvalidShape(_))));

        let hyper = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(Array::<f64, _>::zeros((5, 5, 5, 5)).into_dyn())
            .build();
        assert!(matches!(hyper, Err(PhotostimError::InvalidShape(_))));
    }

    #[test]
    fn test_mask_values_rejected() {
        let scaled = create_image_mask_roi().mapv(|v| v * 10.0);
        let result = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(scaled)
            .build();
        assert!(matches!(result, Err(PhotostimError::InvalidMaskValue { value }) if value == 10.0));

        let negative = create_image_mask_roi().mapv(|v| -v);
        let result = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(negative)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_init_pixel_roi() -> Result<()> {
        let pattern = HolographicPattern::builder()
            .name("hp")
            .pixel_roi(create_pixel_roi())
            .roi_size(8.0)
            .dimension(Dimension::planar(100, 100)?)
            .build()?;
        let mask = pattern.pixel_to_image_mask_roi()?;
        assert_eq!(mask.shape(), &[100, 100]);
        assert_eq!(mask[[12, 40]], 1);
        assert_eq!(pattern.num_rois(), Some(5));

        let rectangular = HolographicPattern::builder()
            .name("hp")
            .pixel_roi(create_pixel_roi())
            .roi_size([8.0, 4.0])
            .dimension(Dimension::planar(100, 100)?)
            .build()?;
        let mask = rectangular.pixel_to_image_mask_roi()?;
        assert_eq!(mask[[16, 42]], 1);
        assert_eq!(mask[[12, 43]], 0);
        Ok(())
    }

    #[test]
    fn test_pixel_roi_requires_companions() -> Result<()> {
        let no_size = HolographicPattern::builder()
            .name("hp")
            .pixel_roi(create_pixel_roi())
            .dimension(Dimension::planar(100, 100)?)
            .build();
        assert!(matches!(
            no_size,
            Err(PhotostimError::MissingRequiredField { field: "roi_size", .. })
        ));

        let no_dimension = HolographicPattern::builder()
            .name("hp")
            .pixel_roi(create_pixel_roi())
            .roi_size([8.0, 4.0])
            .build();
        assert!(matches!(
            no_dimension,
            Err(PhotostimError::MissingRequiredField { field: "dimension", .. })
        ));

        let nothing = HolographicPattern::builder().name("hp").build();
        assert!(matches!(
            nothing,
            Err(PhotostimError::MissingRequiredField { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_invalid_roi_size_rejected() {
        let result = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(create_image_mask_roi())
            .roi_size(vec![1.0, 2.0, 3.0, 4.0])
            .build();
        assert!(matches!(result, Err(PhotostimError::InvalidShape(_))));
    }

    #[test]
    fn test_roi_size_checked_against_dimension() -> Result<()> {
        let negative = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(create_image_mask_roi())
            .roi_size(-2.0)
            .build();
        assert!(matches!(negative, Err(PhotostimError::InvalidShape(_))));

        let cuboid_on_plane = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(create_image_mask_roi())
            .roi_size(vec![8.0, 4.0, 2.0])
            .build();
        assert!(matches!(cuboid_on_plane, Err(PhotostimError::InvalidShape(_))));

        let rectangle_in_volume = HolographicPattern::builder()
            .name("hp")
            .pixel_roi(array![[1.0, 2.0, 3.0]])
            .roi_size(vec![8.0, 4.0])
            .dimension(Dimension::volumetric(16, 16, 4)?)
            .build();
        assert!(matches!(rectangle_in_volume, Err(PhotostimError::InvalidShape(_))));
        Ok(())
    }

    #[test]
    fn test_supplied_dimension_kept_on_mismatch() -> Result<()> {
        let pattern = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(create_image_mask_roi())
            .dimension(Dimension::planar(64, 64)?)
            .build()?;
        assert_eq!(pattern.dimension().as_slice(), &[64, 64]);
        Ok(())
    }

    #[test]
    fn test_pixel_and_voxel_masks() -> Result<()> {
        let pattern = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(create_image_mask_roi())
            .build()?;
        let pixels = pattern.pixel_mask()?;
        assert_eq!(pixels.len(), 25);
        assert_eq!((pixels[0].x, pixels[0].y), (1, 2));
        assert!(pattern.voxel_mask().is_err());

        let mut volume = Array3::<f64>::zeros((4, 4, 4));
        volume[[1, 2, 3]] = 1.0;
        let volume = HolographicPattern::builder()
            .name("hp3d")
            .image_mask_roi(volume.into_dyn())
            .build()?;
        let voxels = volume.voxel_mask()?;
        assert_eq!(voxels.len(), 1);
        assert_eq!((voxels[0].x, voxels[0].y, voxels[0].z), (1, 2, 3));
        assert!(matches!(
            volume.pixel_mask(),
            Err(PhotostimError::UnsupportedDimension { rank: 3, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_add_roi_updates_both_representations() -> Result<()> {
        let mut pattern = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(Array2::<f64>::zeros((5, 5)).into_dyn())
            .roi_size(2.0)
            .build()?;
        pattern.add_roi(&[2.0, 2.0])?;

        assert_eq!(pattern.num_rois(), Some(1));
        assert_eq!(pattern.image_mask_roi().map(|m| m.sum()), Some(5));

        pattern.add_roi(&[0.0, 0.0])?;
        assert_eq!(pattern.num_rois(), Some(2));
        assert_eq!(pattern.image_mask_roi().map(|m| m.sum()), Some(8));
        Ok(())
    }

    #[test]
    fn test_add_roi_failure_leaves_pattern_untouched() -> Result<()> {
        let mut pattern = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(create_image_mask_roi())
            .build()?;
        let before = pattern.clone();
        assert!(matches!(
            pattern.add_roi(&[2.0, 2.0]),
            Err(PhotostimError::MissingRequiredField { field: "roi_size", .. })
        ));

        let mut sized = HolographicPattern::builder()
            .name("hp")
            .image_mask_roi(create_image_mask_roi())
            .roi_size(3.0)
            .build()?;
        let sized_before = sized.clone();
        assert!(sized.add_roi(&[2.0, 2.0, 2.0]).is_err());
        assert_eq!(sized, sized_before);
        assert_eq!(pattern, before);
        Ok(())
    }

    #[test]
    fn test_add_roi_to_pixel_pattern() -> Result<()> {
        let mut pattern = HolographicPattern::builder()
            .name("hp")
            .pixel_roi(array![[10.0, 10.0]])
            .roi_size(4.0)
            .dimension(Dimension::planar(30, 30)?)
            .build()?;
        pattern.add_roi(&[20.0, 20.0])?;
        assert_eq!(pattern.num_rois(), Some(2));
        assert!(pattern.image_mask_roi().is_none());
        assert_eq!(pattern.image_mask()?[[20, 20]], 1);
        Ok(())
    }

    #[test]
    fn test_config_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = r#"{
            "name": "pattern",
            "pixel_roi": {"v": 1, "dim": [2, 2], "data": [10.0, 10.0, 20.0, 5.0]},
            "roi_size": [4, 2],
            "dimension": [32, 32],
            "stim_duration": 0.05
        }"#;
        let pattern: HolographicPattern = serde_json::from_str(json)?;
        assert_eq!(pattern.num_rois(), Some(2));
        assert_eq!(pattern.roi_size(), Some(&RoiSize::Extent(vec![4.0, 2.0])));

        let encoded = serde_json::to_string(&pattern)?;
        let decoded: HolographicPattern = serde_json::from_str(&encoded)?;
        assert_eq!(decoded, pattern);

        let missing = r#"{"name": "pattern", "pixel_roi": {"v": 1, "dim": [1, 2], "data": [1.0, 1.0]}}"#;
        assert!(serde_json::from_str::<HolographicPattern>(missing).is_err());
        Ok(())
    }
}
