use super::AxisFilter;
use std::collections::VecDeque;

/// Median of the last `window_size` values
#[derive(Debug, Clone)]
pub struct MedianFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MedianFilter {
    /// Create a new median filter
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero or even
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        assert!(window_size % 2 == 1, "Median filter window size must be odd, got {}", window_size);
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }
}

/// Median of `values`; the mean of the two middle values for even counts
pub(crate) fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

impl AxisFilter for MedianFilter {
    fn step(&mut self, value: f64) -> f64 {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);

        median(self.buffer.iter().copied()).unwrap_or(value)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}
