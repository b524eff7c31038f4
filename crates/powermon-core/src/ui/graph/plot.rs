//! Data to plot-space mapping
//!
//! Produces unit-square coordinates; the viewport turns them into pixels.

use heapless::Vec;

use crate::format::{FormattedText, format_time, format_value};
use crate::history::HISTORY_CAPACITY;
use crate::scale::DisplayRange;

/// Point in plot space, both axes in `[0, 1]`, y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f32,
    pub y: f32,
}

/// Normalized series, one point per sample
pub type PlotPoints = Vec<PlotPoint, HISTORY_CAPACITY>;

/// Map a window of samples into plot space.
///
/// `x` spreads the samples over the timestamp span; when the span is zero
/// or not finite the samples are spaced by index instead. `y` goes through
/// `range` and is clamped. Only the first `min(timestamps, values)` pairs,
/// up to [`HISTORY_CAPACITY`], are used.
pub fn normalize_series(timestamps: &[f32], values: &[f32], range: &DisplayRange) -> PlotPoints {
    let n = timestamps.len().min(values.len()).min(HISTORY_CAPACITY);
    let mut points = PlotPoints::new();
    if n == 0 {
        return points;
    }

    let first = timestamps[0];
    let span = timestamps[n - 1] - first;
    let by_time = span > 0.0 && span.is_finite();

    for i in 0..n {
        let x = if by_time {
            ((timestamps[i] - first) / span).clamp(0.0, 1.0)
        } else if n > 1 {
            i as f32 / (n - 1) as f32
        } else {
            // A lone sample sits at the newest edge
            1.0
        };

        // Capacity is never exceeded: n <= HISTORY_CAPACITY
        let _ = points.push(PlotPoint {
            x,
            y: range.normalize(values[i]),
        });
    }

    points
}

/// Text around one graph panel
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    /// Value at the top edge
    pub top: FormattedText,
    /// Value at the bottom edge
    pub bottom: FormattedText,
    /// Time covered by the window
    pub span: FormattedText,
}

impl AxisLabels {
    pub fn new(range: &DisplayRange, unit: &str, digits: u8, timestamps: &[f32]) -> Self {
        let span_s = match (timestamps.first(), timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };

        Self {
            top: format_value(range.max, unit, digits),
            bottom: format_value(range.min, unit, digits),
            span: format_time(span_s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_by_time() {
        let range = DisplayRange::new(0.0, 10.0);
        let points = normalize_series(&[0.0, 1.0, 4.0], &[0.0, 5.0, 10.0], &range);

        assert_eq!(
            points.as_slice(),
            &[
                PlotPoint { x: 0.0, y: 0.0 },
                PlotPoint { x: 0.25, y: 0.5 },
                PlotPoint { x: 1.0, y: 1.0 },
            ]
        );
    }

    #[test]
    fn test_normalize_falls_back_to_index_spacing() {
        let range = DisplayRange::new(0.0, 1.0);
        let points = normalize_series(&[5.0, 5.0, 5.0], &[0.0, 0.0, 0.0], &range);

        let xs: Vec<f32, 3> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs.as_slice(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_clamps_out_of_range_values() {
        let range = DisplayRange::new(1.0, 2.0);
        let points = normalize_series(&[0.0, 1.0], &[-5.0, 50.0], &range);

        assert_eq!(points[0].y, 0.0);
        assert_eq!(points[1].y, 1.0);
    }

    #[test]
    fn test_normalize_uses_shorter_slice() {
        let range = DisplayRange::new(0.0, 1.0);

        assert_eq!(normalize_series(&[0.0, 1.0, 2.0], &[0.5], &range).len(), 1);
        assert!(normalize_series(&[], &[1.0], &range).is_empty());
    }

    #[test]
    fn test_single_sample_sits_at_right_edge() {
        let range = DisplayRange::new(0.0, 1.0);
        let points = normalize_series(&[3.0], &[0.25], &range);

        assert_eq!(points.as_slice(), &[PlotPoint { x: 1.0, y: 0.25 }]);
    }

    #[test]
    fn test_axis_labels() {
        let range = DisplayRange::new(0.1, 0.25);
        let labels = AxisLabels::new(&range, "A", 4, &[10.0, 20.0, 75.0]);

        assert_eq!(labels.top.as_str(), "250.0 mA ");
        assert_eq!(labels.bottom.as_str(), "100.0 mA ");
        assert_eq!(labels.span.as_str(), "01m05s");
    }

    #[test]
    fn test_axis_labels_without_samples() {
        let labels = AxisLabels::new(&DisplayRange::new(0.0, 1.0), "Wh", 4, &[]);
        assert_eq!(labels.span.as_str(), "00s");
    }
}
