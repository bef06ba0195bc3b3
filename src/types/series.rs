//! Time series of photostimulus presentation events

use crate::error::{PhotostimError, Result};
use crate::types::HolographicPattern;
use crate::utils::frames;
use bon::bon;
use itertools::Itertools;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

/// How stimulus presentation is encoded in a series' data.
///
/// * `Interval`: `1` marks the onset and `-1` the offset of a presentation,
///   each at the matching timestamp.
/// * `Series`: `1` marks a presentation lasting `stim_duration` seconds from
///   the matching timestamp, `0` marks no presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusFormat {
    Interval,
    Series,
}

impl StimulusFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StimulusFormat::Interval => "interval",
            StimulusFormat::Series => "series",
        }
    }

    fn encode(self, value: f64) -> Result<i8> {
        match (self, value) {
            (StimulusFormat::Interval, v) if v == 1.0 => Ok(1),
            (StimulusFormat::Interval, v) if v == -1.0 => Ok(-1),
            (StimulusFormat::Series, v) if v == 1.0 => Ok(1),
            (StimulusFormat::Series, v) if v == 0.0 => Ok(0),
            (format, value) => Err(PhotostimError::InvalidSeriesValue { format, value }),
        }
    }
}

impl fmt::Display for StimulusFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StimulusFormat {
    type Err = PhotostimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "interval" => Ok(StimulusFormat::Interval),
            "series" => Ok(StimulusFormat::Series),
            other => Err(PhotostimError::UnknownFormat(other.to_string())),
        }
    }
}

/// Sample times of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Timing {
    Timestamps(Vec<f64>),
    /// Uniform sampling in Hz, starting at `starting_time` seconds
    Rate { rate: f64, starting_time: f64 },
}

/// TimeSeries of photostimulus presentation for one holographic pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotostimulationSeries {
    name: String,
    format: StimulusFormat,
    data: Vec<i8>,
    timing: Timing,
    stim_duration: Option<f64>,
    pattern: Arc<HolographicPattern>,
    stimulus_method: Option<String>,
    sweep_pattern: Option<String>,
    time_per_sweep: Option<f64>,
    num_sweeps: Option<f64>,
    description: Option<String>,
    comments: Option<String>,
}

#[bon]
impl PhotostimulationSeries {
    #[builder]
    pub fn new(
        #[builder(into)] name: String,
        format: StimulusFormat,
        #[builder(default)] data: Vec<f64>,
        timestamps: Option<Vec<f64>>,
        rate: Option<f64>,
        starting_time: Option<f64>,
        stim_duration: Option<f64>,
        #[builder(into)] pattern: Arc<HolographicPattern>,
        #[builder(into)] stimulus_method: Option<String>,
        #[builder(into)] sweep_pattern: Option<String>,
        time_per_sweep: Option<f64>,
        num_sweeps: Option<f64>,
        #[builder(into)] description: Option<String>,
        #[builder(into)] comments: Option<String>,
    ) -> Result<Self> {
        trace!(name = %name, format = %format, samples = data.len(), "validating photostimulation series");

        if sweep_pattern.is_some() && stimulus_method.is_none() {
            return Err(PhotostimError::missing(
                "stimulus_method",
                "when 'sweep_pattern' is given",
            ));
        }
        if let Some(duration) = stim_duration {
            if !duration.is_finite() || duration < 0.0 {
                return Err(PhotostimError::InvalidTiming(format!(
                    "'stim_duration' must be a non-negative number of seconds, got {}",
                    duration
                )));
            }
        }
        if format == StimulusFormat::Series && stim_duration.is_none() {
            return Err(PhotostimError::missing(
                "stim_duration",
                "if 'format' is 'series'",
            ));
        }

        match (&timestamps, rate) {
            (Some(_), Some(_)) => {
                return Err(PhotostimError::InvalidTiming(
                    "specify either 'timestamps' or 'rate', not both".to_string(),
                ));
            }
            (None, Some(rate)) if format == StimulusFormat::Interval => {
                return Err(PhotostimError::InvalidTiming(format!(
                    "'interval' data must be timestamped, got a rate of {} Hz",
                    rate
                )));
            }
            (None, Some(rate)) if !(rate.is_finite() && rate > 0.0) => {
                return Err(PhotostimError::InvalidTiming(format!(
                    "'rate' must be a positive number of Hz, got {}",
                    rate
                )));
            }
            (_, None) if starting_time.is_some() => {
                return Err(PhotostimError::InvalidTiming(
                    "'starting_time' can only be used together with 'rate'".to_string(),
                ));
            }
            _ => {}
        }

        if data.is_empty() {
            if timestamps.as_ref().is_some_and(|ts| !ts.is_empty()) {
                return Err(PhotostimError::InvalidTiming(
                    "'timestamps' can't be specified without corresponding 'data'".to_string(),
                ));
            }
        } else if timestamps.is_none() {
            match format {
                StimulusFormat::Interval => {
                    return Err(PhotostimError::missing(
                        "timestamps",
                        "for each entry in 'interval' data",
                    ));
                }
                StimulusFormat::Series if rate.is_none() => {
                    return Err(PhotostimError::missing(
                        "timestamps or rate",
                        "for 'series' data",
                    ));
                }
                StimulusFormat::Series => {}
            }
        }

        if let Some(timestamps) = &timestamps {
            if timestamps.len() != data.len() {
                return Err(PhotostimError::InvalidShape(format!(
                    "'data' and 'timestamps' need to be the same length ({} vs {})",
                    data.len(),
                    timestamps.len()
                )));
            }
        }

        let data = data
            .into_iter()
            .map(|value| format.encode(value))
            .collect::<Result<Vec<i8>>>()?;

        let timing = match rate {
            Some(rate) => Timing::Rate {
                rate,
                starting_time: starting_time.unwrap_or(0.0),
            },
            None => Timing::Timestamps(timestamps.unwrap_or_default()),
        };

        Ok(Self {
            name,
            format,
            data,
            timing,
            stim_duration,
            pattern,
            stimulus_method,
            sweep_pattern,
            time_per_sweep,
            num_sweeps,
            description,
            comments,
        })
    }
}

impl PhotostimulationSeries {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> StimulusFormat {
        self.format
    }

    pub fn data(&self) -> &[i8] {
        &self.data
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn stim_duration(&self) -> Option<f64> {
        self.stim_duration
    }

    pub fn pattern(&self) -> &HolographicPattern {
        &self.pattern
    }

    pub fn stimulus_method(&self) -> Option<&str> {
        self.stimulus_method.as_deref()
    }

    pub fn sweep_pattern(&self) -> Option<&str> {
        self.sweep_pattern.as_deref()
    }

    pub fn time_per_sweep(&self) -> Option<f64> {
        self.time_per_sweep
    }

    pub fn num_sweeps(&self) -> Option<f64> {
        self.num_sweeps
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn num_samples(&self) -> usize {
        self.data.len()
    }

    /// Timestamps of every sample; rate-sampled series are expanded from
    /// `starting_time` in steps of `1 / rate`.
    pub fn timestamps(&self) -> Vec<f64> {
        match &self.timing {
            Timing::Timestamps(timestamps) => timestamps.clone(),
            Timing::Rate {
                rate,
                starting_time,
            } => (0..self.data.len())
                .map(|i| starting_time + i as f64 / rate)
                .collect(),
        }
    }

    /// Time of the first sample, if there is one
    pub fn start_time(&self) -> Option<f64> {
        if self.data.is_empty() {
            return None;
        }
        match &self.timing {
            Timing::Timestamps(timestamps) => timestamps.first().copied(),
            Timing::Rate { starting_time, .. } => Some(*starting_time),
        }
    }

    /// Time of the last sample, if there is one
    pub fn end_time(&self) -> Option<f64> {
        if self.data.is_empty() {
            return None;
        }
        match &self.timing {
            Timing::Timestamps(timestamps) => timestamps.last().copied(),
            Timing::Rate {
                rate,
                starting_time,
            } => Some(starting_time + (self.data.len() - 1) as f64 / rate),
        }
    }

    /// Record a presentation from `start` to `stop`. Requires the interval format.
    pub fn add_interval(&mut self, start: f64, stop: f64) -> Result<()> {
        if self.format != StimulusFormat::Interval {
            return Err(PhotostimError::IncompatibleFormat {
                operation: "add an interval",
                format: self.format,
            });
        }
        if stop < start {
            return Err(PhotostimError::InvalidTiming(format!(
                "interval stop {} precedes its start {}",
                stop, start
            )));
        }
        let Timing::Timestamps(timestamps) = &mut self.timing else {
            return Err(PhotostimError::InvalidTiming(
                "cannot append events to a rate-sampled series".to_string(),
            ));
        };
        timestamps.extend([start, stop]);
        self.data.extend([1, -1]);
        Ok(())
    }

    /// Record a presentation starting at `timestamp`.
    ///
    /// Interval series gain the interval `[timestamp, timestamp + stim_duration]`;
    /// series-format data gains a `1` at `timestamp`.
    pub fn add_onset(&mut self, timestamp: f64) -> Result<()> {
        self.add_onsets(&[timestamp])
    }

    /// Record one presentation per timestamp; see [`Self::add_onset`].
    pub fn add_onsets(&mut self, onsets: &[f64]) -> Result<()> {
        let duration = self.stim_duration.ok_or_else(|| {
            PhotostimError::missing("stim_duration", "to add a presentation onset")
        })?;
        let format = self.format;
        let Timing::Timestamps(timestamps) = &mut self.timing else {
            return Err(PhotostimError::InvalidTiming(
                "cannot append events to a rate-sampled series".to_string(),
            ));
        };

        for &onset in onsets {
            match format {
                StimulusFormat::Interval => {
                    timestamps.extend([onset, onset + duration]);
                    self.data.extend([1, -1]);
                }
                StimulusFormat::Series => {
                    timestamps.push(onset);
                    self.data.push(1);
                }
            }
        }
        Ok(())
    }

    /// `(start, stop)` of every presentation in the series.
    pub fn start_stop_list(&self) -> Result<Vec<(f64, f64)>> {
        let timestamps = self.timestamps();
        let onsets = self
            .data
            .iter()
            .zip(&timestamps)
            .filter(|&(&value, _)| value == 1)
            .map(|(_, &t)| t)
            .collect_vec();

        match self.format {
            StimulusFormat::Interval => {
                let offsets = self
                    .data
                    .iter()
                    .zip(&timestamps)
                    .filter(|&(&value, _)| value == -1)
                    .map(|(_, &t)| t)
                    .collect_vec();
                if onsets.len() != offsets.len() {
                    return Err(PhotostimError::InvalidTiming(format!(
                        "number of starts ({}) does not equal number of stops ({})",
                        onsets.len(),
                        offsets.len()
                    )));
                }
                Ok(onsets.into_iter().zip_eq(offsets).collect())
            }
            StimulusFormat::Series => {
                let duration = self.stim_duration.ok_or_else(|| {
                    PhotostimError::missing("stim_duration", "if 'format' is 'series'")
                })?;
                Ok(onsets.into_iter().map(|t| (t, t + duration)).collect())
            }
        }
    }

    /// `data` and `timestamps` side by side.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        if self.data.is_empty() {
            return Err(PhotostimError::EmptySeries {
                name: self.name.clone(),
            });
        }
        frames::series_frame(&self.data, &self.timestamps())
    }
}
