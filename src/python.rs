//! Python bindings for the mask converter and the namespace definition

use crate::error::PhotostimError;
use crate::processing::{masks, validation};
use crate::schema::photostim_namespace;
use crate::types::{Dimension, RoiSize};
use crate::utils::array_from_rows;
use ndarray::Array2;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;

impl From<PhotostimError> for PyErr {
    fn from(err: PhotostimError) -> PyErr {
        match err {
            PhotostimError::MissingRequiredField { .. } => PyTypeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// `roi_size` as given from Python: a diameter or a per-axis extent
#[derive(FromPyObject)]
enum PyRoiSize {
    Diameter(f64),
    Extent(Vec<f64>),
}

impl From<PyRoiSize> for RoiSize {
    fn from(value: PyRoiSize) -> Self {
        match value {
            PyRoiSize::Diameter(d) => RoiSize::Diameter(d),
            PyRoiSize::Extent(e) => RoiSize::Extent(e),
        }
    }
}

fn rows_to_array(rows: Vec<Vec<f64>>, ncols: Option<usize>) -> PyResult<Array2<f64>> {
    Ok(array_from_rows(&rows, ncols)?)
}

/// Converts ROI centers into a dense 0/1 image mask.
///
/// Args:
///     pixel_roi (list[list[float]]): `[x, y]` center of each ROI.
///     roi_size (float | list[float]): Circle diameter or `[width, height]`.
///     dimension (list[int]): `[width, height]` of the field.
///
/// Returns:
///     list[list[int]]: Mask indexed `[x][y]`.
#[pyfunction]
fn pixel_to_image_mask(
    pixel_roi: Vec<Vec<f64>>,
    roi_size: PyRoiSize,
    dimension: Vec<usize>,
) -> PyResult<Vec<Vec<u8>>> {
    let dimension = Dimension::new(&dimension)?;
    let pixel_roi = rows_to_array(pixel_roi, Some(dimension.rank()))?;
    let mask = masks::pixel_to_image_mask(pixel_roi.view(), &roi_size.into(), &dimension)?;
    Ok(mask.outer_iter().map(|row| row.to_vec()).collect())
}

/// Lists the `(x, y, weight)` of every nonzero cell of a 2D image mask.
#[pyfunction]
fn image_to_pixel_mask(image_mask: Vec<Vec<f64>>) -> PyResult<Vec<(usize, usize, f64)>> {
    let image_mask = rows_to_array(image_mask, None)?;
    Ok(masks::image_to_pixel_mask(&image_mask)
        .into_iter()
        .map(|entry| (entry.x, entry.y, entry.weight))
        .collect())
}

/// Raises ValueError unless every mask value is 0 or 1.
#[pyfunction]
fn validate_image_mask(image_mask: Vec<Vec<f64>>) -> PyResult<()> {
    let image_mask = rows_to_array(image_mask, None)?;
    Ok(validation::validate_image_mask(&image_mask)?)
}

/// Raises ValueError if `roi_size` doesn't fit the optional dimension.
#[pyfunction]
#[pyo3(signature = (roi_size, dimension = None))]
fn validate_roi_size(roi_size: PyRoiSize, dimension: Option<Vec<usize>>) -> PyResult<()> {
    let dimension = dimension.map(|d| Dimension::new(&d)).transpose()?;
    Ok(validation::validate_roi_size(&roi_size.into(), dimension.as_ref())?)
}

/// The `ndx-photostim` namespace as a JSON string.
#[pyfunction]
fn namespace_json() -> PyResult<String> {
    Ok(photostim_namespace().to_json()?)
}

#[pymodule]
fn ndx_photostim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(pixel_to_image_mask, m)?)?;
    m.add_function(wrap_pyfunction!(image_to_pixel_mask, m)?)?;
    m.add_function(wrap_pyfunction!(validate_image_mask, m)?)?;
    m.add_function(wrap_pyfunction!(validate_roi_size, m)?)?;
    m.add_function(wrap_pyfunction!(namespace_json, m)?)?;
    Ok(())
}
