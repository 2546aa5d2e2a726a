use super::median::median;
use super::AxisFilter;
use crate::constants::MAD_TO_SIGMA;
use std::collections::VecDeque;

/// Hampel filter: values further than `threshold` robust standard deviations
/// from the window median are replaced by that median
#[derive(Debug, Clone)]
pub struct HampelFilter {
    window_size: usize,
    threshold: f64,
    buffer: VecDeque<f64>,
}

impl HampelFilter {
    /// Create a new Hampel filter
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is not odd or is zero, or if threshold is negative
    #[must_use]
    pub fn new(window_size: usize, threshold: f64) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        assert!(window_size % 2 == 1, "Window size must be odd, got {}", window_size);
        assert!(threshold >= 0.0, "Threshold must be non-negative, got {}", threshold);
        Self {
            window_size,
            threshold,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    fn filter_value(&self, value: f64) -> f64 {
        if self.buffer.is_empty() {
            return value;
        }

        let window = || self.buffer.iter().copied().chain(std::iter::once(value));
        let Some(center) = median(window()) else {
            return value;
        };
        let mad = median(window().map(|x| (x - center).abs())).unwrap_or(0.0);

        if (value - center).abs() > self.threshold * MAD_TO_SIGMA * mad {
            center
        } else {
            value
        }
    }
}

impl AxisFilter for HampelFilter {
    fn step(&mut self, value: f64) -> f64 {
        let filtered = self.filter_value(value);

        // The window keeps raw values so a sustained step change is accepted
        // once it fills half the window
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);

        filtered
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}
