//! Rolling window for trailing statistics.
//!
//! The window keeps at most `capacity` values; a trailing mean over a whole
//! column is a single pass of pushes.

use std::collections::VecDeque;

/// A fixed-capacity trailing window of values.
///
/// # Example
/// ```
/// use stats::rolling::RollingWindow;
///
/// let mut window = RollingWindow::new(3);
/// window.push(1.0);
/// window.push(2.0);
/// window.push(3.0);
/// assert_eq!(window.mean(), Some(2.0));
///
/// window.push(4.0); // Drops 1.0
/// assert_eq!(window.mean(), Some(3.0));
/// ```
#[derive(Debug, Clone)]
pub struct RollingWindow {
    data: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    /// Create a new rolling window with the given capacity.
    ///
    /// # Panics
    /// Panics if capacity is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RollingWindow capacity must be > 0");
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, evicting and returning the oldest one when full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let removed = if self.data.len() >= self.capacity {
            self.data.pop_front()
        } else {
            None
        };
        self.data.push_back(value);
        removed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mean of the values currently held. `None` when empty.
    ///
    /// Summed from the window contents on each call, so long series do not
    /// accumulate floating-point drift.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.data.iter().sum::<f64>() / self.data.len() as f64)
        }
    }
}

/// Trailing mean over `window` values with a minimum period of 1.
///
/// Element `i` is the mean of `values[max(0, i + 1 - window)..=i]`.
pub fn trailing_means(values: &[f64], window: usize) -> Vec<f64> {
    let mut rolling = RollingWindow::new(window);
    values
        .iter()
        .map(|&v| {
            rolling.push(v);
            rolling.mean().unwrap_or(v)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_evict() {
        let mut w = RollingWindow::new(2);
        assert_eq!(w.push(1.0), None);
        assert_eq!(w.push(2.0), None);
        assert_eq!(w.push(3.0), Some(1.0));
        assert_eq!(w.len(), 2);
        assert_eq!(w.mean(), Some(2.5));
    }

    #[test]
    fn test_empty_mean() {
        let w = RollingWindow::new(3);
        assert!(w.is_empty());
        assert_eq!(w.mean(), None);
    }

    #[test]
    fn test_trailing_means_min_period_one() {
        let means = trailing_means(&[10.0, 20.0, 30.0], 7);
        assert_eq!(means, vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_trailing_means_full_window() {
        let sales = [10.0, 20.0, 10.0, 20.0, 10.0, 20.0, 10.0, 40.0];
        let means = trailing_means(&sales, 7);
        assert!((means[6] - 100.0 / 7.0).abs() < 1e-12);
        // Window slides: drops the first 10, adds 40.
        assert!((means[7] - 130.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_does_not_drift() {
        let mut w = RollingWindow::new(3);
        w.push(1e16);
        for _ in 0..5 {
            w.push(1.0);
        }
        assert_eq!(w.mean(), Some(1.0));
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_panics() {
        let _ = RollingWindow::new(0);
    }
}
