use crate::error::{PhotostimError, Result};
use ndarray::Array2;

/// Stacks equally long rows into a 2D array, e.g. ROI centers read from JSON
/// or a Python list of lists.
///
/// With `ncols` every row must have that many entries, and no rows give a
/// `(0, ncols)` array. Without it the first row sets the width.
pub fn array_from_rows<T: AsRef<[f64]>>(rows: &[T], ncols: Option<usize>) -> Result<Array2<f64>> {
    let ncols = ncols.unwrap_or_else(|| rows.first().map_or(0, |row| row.as_ref().len()));

    let mut array = Array2::<f64>::zeros((0, ncols));
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != ncols {
            return Err(PhotostimError::InvalidShape(format!(
                "row {} has {} entries, expected {}",
                i,
                row.len(),
                ncols
            )));
        }
        array
            .push_row(row.into())
            .map_err(|e| PhotostimError::InvalidShape(e.to_string()))?;
    }
    Ok(array)
}
