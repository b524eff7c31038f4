//! Percentile-clipped bounds of a value window

use heapless::Vec;

use super::constants::{HIGH_PERCENTILE, LOW_PERCENTILE, SCALE_WINDOW_CAPACITY};

/// Range of a window with the extreme tails discarded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustBounds {
    /// Value at the low percentile
    pub low: f32,
    /// Value at the high percentile
    pub high: f32,
}

/// Compute the 5th/95th percentile bounds of `values`.
///
/// Only the most recent [`SCALE_WINDOW_CAPACITY`] entries are considered and
/// non-finite values are skipped. The caller's slice is never reordered; a
/// private sorted copy is used. Returns `None` when nothing finite remains.
pub fn robust_bounds(values: &[f32]) -> Option<RobustBounds> {
    let start = values.len().saturating_sub(SCALE_WINDOW_CAPACITY);

    let mut sorted: Vec<f32, SCALE_WINDOW_CAPACITY> = Vec::new();
    for value in values[start..].iter().copied().filter(|v| v.is_finite()) {
        // Cannot overflow: the window is at most SCALE_WINDOW_CAPACITY long
        let _ = sorted.push(value);
    }

    if sorted.is_empty() {
        return None;
    }

    sorted.sort_unstable_by(f32::total_cmp);

    let last = sorted.len() - 1;
    Some(RobustBounds {
        low: sorted[percentile_index(LOW_PERCENTILE, last)],
        high: sorted[percentile_index(HIGH_PERCENTILE, last)],
    })
}

/// `round(fraction * last)` clamped to `[0, last]`
fn percentile_index(fraction: f32, last: usize) -> usize {
    let index = libm::roundf(fraction * last as f32);
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_window_uses_extremes() {
        let bounds = robust_bounds(&[3.0, 1.0, 5.0, 2.0, 4.0]);
        assert_eq!(bounds, Some(RobustBounds { low: 1.0, high: 5.0 }));
    }

    #[test]
    fn test_full_window_clips_tails() {
        // 0..64: low index round(0.05 * 63) = 3, high index round(0.95 * 63) = 60
        let mut values = [0.0f32; 64];
        for (i, v) in values.iter_mut().enumerate() {
            *v = (63 - i) as f32;
        }

        let bounds = robust_bounds(&values);
        assert_eq!(bounds, Some(RobustBounds { low: 3.0, high: 60.0 }));
    }

    #[test]
    fn test_single_spike_is_clipped_in_full_window() {
        let mut values = [1.0f32; 64];
        values[40] = 500.0;

        let bounds = robust_bounds(&values);
        assert_eq!(bounds, Some(RobustBounds { low: 1.0, high: 1.0 }));
    }

    #[test]
    fn test_input_is_not_reordered() {
        let values = [5.0, 1.0, 3.0];
        let _ = robust_bounds(&values);
        assert_eq!(values, [5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_long_window_uses_most_recent_values() {
        let mut values = [1000.0f32; 80];
        for v in values[16..].iter_mut() {
            *v = 2.0;
        }

        let bounds = robust_bounds(&values);
        assert_eq!(bounds, Some(RobustBounds { low: 2.0, high: 2.0 }));
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let bounds = robust_bounds(&[f32::NAN, 2.0, f32::INFINITY, 4.0]);
        assert_eq!(bounds, Some(RobustBounds { low: 2.0, high: 4.0 }));

        assert_eq!(robust_bounds(&[f32::NAN, f32::NEG_INFINITY]), None);
        assert_eq!(robust_bounds(&[]), None);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(
            robust_bounds(&[7.5]),
            Some(RobustBounds { low: 7.5, high: 7.5 })
        );
    }
}
