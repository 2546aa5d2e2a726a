use super::AxisFilter;

/// Exponential smoothing filter
#[derive(Debug, Clone)]
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<f64>,
}

impl ExponentialFilter {
    /// Create a new exponential filter; higher `alpha` follows input faster
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, last: None }
    }
}

impl AxisFilter for ExponentialFilter {
    fn step(&mut self, value: f64) -> f64 {
        let filtered = match self.last {
            Some(last) => self.alpha.mul_add(value - last, last),
            None => value,
        };
        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_filter() {
        let mut filter = ExponentialFilter::new(0.5);

        // First value passes through
        assert_eq!(filter.step(10.0), 10.0);

        // Second value is smoothed
        assert_eq!(filter.step(20.0), 15.0); // 10 + 0.5 * (20 - 10)
    }

    #[test]
    fn test_alpha_bounds() {
        // High alpha = less smoothing
        let mut fast = ExponentialFilter::new(0.9);
        fast.step(10.0);
        assert!((fast.step(20.0) - 19.0).abs() < 0.001);

        // Low alpha = more smoothing
        let mut slow = ExponentialFilter::new(0.1);
        slow.step(10.0);
        assert!((slow.step(20.0) - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut filter = ExponentialFilter::new(0.2);
        filter.step(50.0);
        filter.reset();
        assert_eq!(filter.step(-5.0), -5.0);
    }
}
