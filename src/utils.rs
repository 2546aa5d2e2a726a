//! Numeric helpers shared by the classifier, filters and calibration.

use crate::constants::MAX_ABS_ANGLE;

/// Clamp a value into `[0, 1]`, mapping NaN to 0
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Replace non-finite angles with 0 and clamp the rest into `±180°`
#[must_use]
pub fn sanitize_angle(angle: f64) -> f64 {
    if angle.is_finite() {
        angle.clamp(-MAX_ABS_ANGLE, MAX_ABS_ANGLE)
    } else {
        0.0
    }
}

/// Non-negative milliseconds between two caller-supplied timestamps.
///
/// Out-of-order, NaN or infinite timestamps yield 0 so duration and velocity
/// arithmetic never goes negative or divides by zero.
#[must_use]
pub fn elapsed_ms(previous: Option<f64>, now: f64) -> f64 {
    match previous {
        Some(prev) => {
            let elapsed = now - prev;
            if elapsed.is_finite() && elapsed > 0.0 {
                elapsed
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}

/// Mean, standard deviation and extent of a window of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Mean value of the data
    pub mean: f64,
    /// Population standard deviation of the data
    pub std_dev: f64,
    /// Minimum value in the window
    pub min: f64,
    /// Maximum value in the window
    pub max: f64,
    /// Range (max - min) of the data
    pub range: f64,
}

impl Statistics {
    /// Summarise a window of values, `None` when it is empty
    #[allow(clippy::cast_precision_loss)] // Window sizes are tiny
    pub fn from_values<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a f64>,
        I::IntoIter: Clone,
    {
        let iter = values.into_iter();
        let n = iter.clone().count();
        if n == 0 {
            return None;
        }
        let n = n as f64;
        let mean = iter.clone().sum::<f64>() / n;
        let variance = iter.clone().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let min = iter.clone().copied().fold(f64::INFINITY, f64::min);
        let max = iter.copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            range: max - min,
        })
    }
}
