//! Signal filters for smoothing head pose angles before classification.
//!
//! Each filter smooths one scalar signal ([`AxisFilter`]); [`PairFilter`]
//! runs two independent instances over yaw and pitch and exposes them as an
//! [`AngleFilter`]. Roll is not used for classification and passes through.

/// Exponential smoothing
pub mod exponential;

/// Sliding-window mean
pub mod moving_average;

/// Sliding-window median for outlier rejection
pub mod median;

/// Hampel identifier for robust outlier replacement
pub mod hampel;

use crate::constants::{
    DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_HAMPEL_THRESHOLD, DEFAULT_HAMPEL_WINDOW, DEFAULT_MEDIAN_WINDOW,
    DEFAULT_MOVING_AVERAGE_WINDOW,
};
use crate::{Error, Result};
use exponential::ExponentialFilter;
use hampel::HampelFilter;
use median::MedianFilter;
use moving_average::MovingAverageFilter;

/// Smoothing of a single scalar signal
pub trait AxisFilter: Send {
    /// Feed one value, get the filtered value back
    fn step(&mut self, value: f64) -> f64;

    /// Forget all past values
    fn reset(&mut self);
}

/// Smoothing of the (yaw, pitch) pair used for classification
pub trait AngleFilter: Send {
    /// Apply filter to input angles
    fn apply(&mut self, yaw: f64, pitch: f64) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// Two independent axis filters over yaw and pitch
pub struct PairFilter<F> {
    name: &'static str,
    yaw: F,
    pitch: F,
}

impl<F: AxisFilter + Clone> PairFilter<F> {
    /// Run clones of `filter` over yaw and pitch
    #[must_use]
    pub fn new(name: &'static str, filter: F) -> Self {
        Self {
            name,
            yaw: filter.clone(),
            pitch: filter,
        }
    }
}

/// Non-finite values pass through without touching the filter state
fn step_finite<F: AxisFilter>(filter: &mut F, value: f64) -> f64 {
    if value.is_finite() {
        filter.step(value)
    } else {
        value
    }
}

impl<F: AxisFilter> AngleFilter for PairFilter<F> {
    fn apply(&mut self, yaw: f64, pitch: f64) -> (f64, f64) {
        (step_finite(&mut self.yaw, yaw), step_finite(&mut self.pitch, pitch))
    }

    fn reset(&mut self) {
        self.yaw.reset();
        self.pitch.reset();
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl AngleFilter for NoFilter {
    fn apply(&mut self, yaw: f64, pitch: f64) -> (f64, f64) {
        (yaw, pitch)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

fn parse_param<T: std::str::FromStr>(spec: &str, raw: Option<&str>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid parameter '{raw}' in filter '{spec}'"))),
    }
}

fn window_param(spec: &str, raw: Option<&str>, default: usize, odd: bool) -> Result<usize> {
    let window = parse_param(spec, raw, default)?;
    if window == 0 {
        return Err(Error::FilterError(format!("Window size must be greater than 0 in '{spec}'")));
    }
    if odd && window % 2 == 0 {
        return Err(Error::FilterError(format!("Window size must be odd in '{spec}'")));
    }
    Ok(window)
}

/// Create an angle filter from a `name[:param[:param]]` description.
///
/// Known names: `none`, `exponential[:alpha]`, `moving_average[:window]`,
/// `median[:window]`, `hampel[:window[:threshold]]`. Parameters are validated
/// here rather than by the constructors' assertions.
///
/// # Errors
///
/// Returns `Error::FilterError` for unknown names or invalid parameters
pub fn create_filter(spec: &str) -> Result<Box<dyn AngleFilter>> {
    let mut parts = spec.split(':');
    let name = parts.next().unwrap_or_default().trim().to_lowercase();
    let params: Vec<&str> = parts.collect();
    let max_params = match name.as_str() {
        "none" | "nofilter" => 0,
        "hampel" => 2,
        _ => 1,
    };
    if params.len() > max_params {
        return Err(Error::FilterError(format!("Too many parameters in filter '{spec}'")));
    }
    let first = params.first().copied();
    let second = params.get(1).copied();

    match name.as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" => {
            let alpha = parse_param(spec, first, DEFAULT_EXPONENTIAL_ALPHA)?;
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::FilterError(format!("Alpha must be in (0, 1] in '{spec}'")));
            }
            Ok(Box::new(PairFilter::new("ExponentialFilter", ExponentialFilter::new(alpha))))
        }
        "moving_average" | "movingaverage" => {
            let window = window_param(spec, first, DEFAULT_MOVING_AVERAGE_WINDOW, false)?;
            Ok(Box::new(PairFilter::new("MovingAverageFilter", MovingAverageFilter::new(window))))
        }
        "median" => {
            let window = window_param(spec, first, DEFAULT_MEDIAN_WINDOW, true)?;
            Ok(Box::new(PairFilter::new("MedianFilter", MedianFilter::new(window))))
        }
        "hampel" => {
            let window = window_param(spec, first, DEFAULT_HAMPEL_WINDOW, true)?;
            let threshold = parse_param(spec, second, DEFAULT_HAMPEL_THRESHOLD)?;
            if !(threshold >= 0.0) {
                return Err(Error::FilterError(format!("Threshold must be non-negative in '{spec}'")));
            }
            Ok(Box::new(PairFilter::new("HampelFilter", HampelFilter::new(window, threshold))))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}
