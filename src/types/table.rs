//! Table of an experiment's photostimulation series, one series per row

use crate::error::{PhotostimError, Result};
use crate::types::{PhotostimulationMethod, PhotostimulationSeries};
use crate::utils::frames;
use bon::Builder;
use polars::prelude::DataFrame;
use tracing::debug;

/// A committed row. Start and stop times are resolved when the row is added.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    row_name: String,
    series: PhotostimulationSeries,
    start_time: f64,
    stop_time: f64,
}

impl TableRow {
    pub fn row_name(&self) -> &str {
        &self.row_name
    }

    pub fn series(&self) -> &PhotostimulationSeries {
        &self.series
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn stop_time(&self) -> f64 {
        self.stop_time
    }
}

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct PhotostimulationTable {
    #[builder(into)]
    name: String,
    #[builder(into)]
    description: String,
    /// Method shared by the series in the table
    method: Option<PhotostimulationMethod>,
    #[builder(skip)]
    rows: Vec<TableRow>,
}

impl PhotostimulationTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn method(&self) -> Option<&PhotostimulationMethod> {
        self.method.as_ref()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Add a batch of series, one row each.
    ///
    /// Rows are named `series_{i}` after their row index unless `row_names`
    /// is given. Nothing is committed unless every series in the batch is valid.
    pub fn add_series(
        &mut self,
        series: Vec<PhotostimulationSeries>,
        row_names: Option<Vec<String>>,
    ) -> Result<()> {
        let row_names = match row_names {
            Some(names) if names.len() != series.len() => {
                return Err(PhotostimError::InvalidShape(format!(
                    "'series' and 'row_name' must be the same length ({} vs {})",
                    series.len(),
                    names.len()
                )));
            }
            Some(names) => names,
            None => (self.rows.len()..self.rows.len() + series.len())
                .map(|i| format!("series_{}", i))
                .collect(),
        };

        let batch = series
            .into_iter()
            .zip(row_names)
            .map(|(series, row_name)| {
                let (Some(start_time), Some(stop_time)) = (series.start_time(), series.end_time())
                else {
                    return Err(PhotostimError::EmptySeries {
                        name: series.name().to_string(),
                    });
                };
                Ok(TableRow {
                    row_name,
                    series,
                    start_time,
                    stop_time,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(table = %self.name, added = batch.len(), "adding photostimulation series");
        self.rows.extend(batch);
        Ok(())
    }

    /// Add a single series under an optional row name.
    pub fn add_one(&mut self, series: PhotostimulationSeries, row_name: Option<String>) -> Result<()> {
        self.add_series(vec![series], row_name.map(|name| vec![name]))
    }

    /// Row summary frame with one line per series
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        frames::table_frame(&self.rows)
    }

    /// `(start, stop)` of every presentation, per row
    pub fn presentation_times(&self) -> Result<Vec<(String, Vec<(f64, f64)>)>> {
        self.rows
            .iter()
            .map(|row| Ok((row.row_name.clone(), row.series.start_stop_list()?)))
            .collect()
    }
}
