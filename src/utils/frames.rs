use crate::error::Result;
use crate::types::{StimulusFormat, TableRow};
use polars::prelude::*;

/// Frame of one series' samples with `data` and `timestamps` columns
pub fn series_frame(data: &[i8], timestamps: &[f64]) -> Result<DataFrame> {
    let data: Vec<i32> = data.iter().map(|&v| i32::from(v)).collect();

    Ok(DataFrame::new(vec![
        Series::new("data".into(), &data).into(),
        Series::new("timestamps".into(), timestamps).into(),
    ])?)
}

/// One line per table row summarising the series it references
pub fn table_frame<T: AsRef<[TableRow]>>(rows: T) -> Result<DataFrame> {
    let rows = rows.as_ref();

    let row_names: Vec<&str> = rows.iter().map(|r| r.row_name()).collect();
    let series_names: Vec<&str> = rows.iter().map(|r| r.series().name()).collect();
    let formats: Vec<&str> = rows.iter().map(|r| r.series().format().as_str()).collect();
    let num_samples: Vec<u64> = rows
        .iter()
        .map(|r| r.series().num_samples() as u64)
        .collect();
    let start_times: Vec<f64> = rows.iter().map(|r| r.start_time()).collect();
    let stop_times: Vec<f64> = rows.iter().map(|r| r.stop_time()).collect();
    let pattern_names: Vec<&str> = rows.iter().map(|r| r.series().pattern().name()).collect();

    Ok(DataFrame::new(vec![
        Series::new("row_name".into(), &row_names).into(),
        Series::new("series_name".into(), &series_names).into(),
        Series::new("series_format".into(), &formats).into(),
        Series::new("num_samples".into(), &num_samples).into(),
        Series::new("start_time".into(), &start_times).into(),
        Series::new("stop_time".into(), &stop_times).into(),
        Series::new("pattern_name".into(), &pattern_names).into(),
    ])?)
}

/// Rows whose series uses the given format
pub fn find_by_format(df: &DataFrame, format: StimulusFormat) -> LazyFrame {
    df.clone()
        .lazy()
        .filter(col("series_format").eq(lit(format.as_str())))
}

/// Rows whose series presents the named pattern
pub fn find_by_pattern(df: &DataFrame, pattern_name: &str) -> LazyFrame {
    df.clone()
        .lazy()
        .filter(col("pattern_name").eq(lit(pattern_name)))
}

/// Rows with at least one sample inside `[start, stop]`
pub fn find_in_window(df: &DataFrame, start: f64, stop: f64) -> LazyFrame {
    df.clone().lazy().filter(
        col("start_time")
            .lt_eq(lit(stop))
            .and(col("stop_time").gt_eq(lit(start))),
    )
}
