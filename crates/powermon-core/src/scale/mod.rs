//! Adaptive graph scale estimation
//!
//! Turns a noisy live window into a y-range that follows the signal without
//! rescaling the axis every frame. Two estimates are kept per series:
//!
//! - a smoothed bound that tracks the robust range with exponential smoothing
//! - a sticky bound that widens on the spot and only contracts after
//!   [`HOLD_FRAMES`] updates without a new extreme
//!
//! The displayed range is the union of the two, padded. Each series needs
//! its own [`GraphScaleState`]; the hold counter encodes that series' past.

pub mod constants;
mod percentile;

pub use constants::*;
pub use percentile::{RobustBounds, robust_bounds};

use log::debug;

/// Per-series scale estimator state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GraphScaleState {
    min: f32,
    max: f32,
    sticky_min: f32,
    sticky_max: f32,
    hold_frames: u32,
    initialized: bool,
}

impl GraphScaleState {
    /// Create an uninitialized estimator
    pub const fn new() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            sticky_min: 0.0,
            sticky_max: 0.0,
            hold_frames: 0,
            initialized: false,
        }
    }

    /// Feed the current full window of display-unit values.
    ///
    /// Call once per render with the whole window, not with the samples added
    /// since the previous call. Returns `false` and leaves the state untouched
    /// when the window holds no finite value.
    pub fn update_with_history(&mut self, values: &[f32]) -> bool {
        let Some(raw) = robust_bounds(values) else {
            return false;
        };

        if !self.initialized {
            self.min = raw.low;
            self.max = raw.high;
            self.sticky_min = raw.low;
            self.sticky_max = raw.high;
            self.hold_frames = HOLD_FRAMES;
            self.initialized = true;
            debug!("Scale seeded at [{}, {}]", raw.low, raw.high);
            return true;
        }

        self.min += (raw.low - self.min) * SMOOTHING_ALPHA;
        self.max += (raw.high - self.max) * SMOOTHING_ALPHA;

        let may_contract = self.hold_frames == 0;
        let mut widened = false;

        if raw.low < self.sticky_min {
            self.sticky_min = raw.low;
            widened = true;
        } else if may_contract && raw.low > self.sticky_min {
            self.sticky_min += (raw.low - self.sticky_min) * STICKY_CREEP_ALPHA;
        }

        if raw.high > self.sticky_max {
            self.sticky_max = raw.high;
            widened = true;
        } else if may_contract && raw.high < self.sticky_max {
            self.sticky_max += (raw.high - self.sticky_max) * STICKY_CREEP_ALPHA;
        }

        if widened {
            debug!(
                "Scale widened to [{}, {}]",
                self.sticky_min, self.sticky_max
            );
            self.hold_frames = HOLD_FRAMES;
        }
        self.hold_frames = self.hold_frames.saturating_sub(1);

        true
    }

    /// Padded range to plot against, `None` before the first update
    pub fn display_range(&self) -> Option<DisplayRange> {
        if !self.initialized {
            return None;
        }

        let low = self.min.min(self.sticky_min);
        let high = self.max.max(self.sticky_max);
        let span = high - low;

        let pad = if span < MIN_DISPLAY_RANGE {
            MIN_DISPLAY_RANGE / 2.0
        } else {
            span * RANGE_PADDING_FRACTION
        };

        Some(DisplayRange::new(low - pad, high + pad))
    }

    /// Whether the first non-empty window has been seen
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Smoothed lower bound
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Smoothed upper bound
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Sticky lower bound
    pub const fn sticky_min(&self) -> f32 {
        self.sticky_min
    }

    /// Sticky upper bound
    pub const fn sticky_max(&self) -> f32 {
        self.sticky_max
    }

    /// Updates left before a sticky bound may contract
    pub const fn hold_frames(&self) -> u32 {
        self.hold_frames
    }

    /// Forget everything; the next update seeds again
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Closed value interval a graph is drawn against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRange {
    /// Value at the bottom edge
    pub min: f32,
    /// Value at the top edge
    pub max: f32,
}

impl DisplayRange {
    /// Create a new range
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Height of the range
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Map `value` into `[0, 1]`, 0 at `min`.
    ///
    /// Out-of-range values are clamped. A degenerate range or a NaN value
    /// maps to the middle.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.span();
        if span <= 0.0 || !span.is_finite() {
            return 0.5;
        }

        let t = (value - self.min) / span;
        if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn seeded(values: &[f32]) -> GraphScaleState {
        let mut state = GraphScaleState::new();
        assert!(state.update_with_history(values));
        state
    }

    #[test]
    fn test_first_update_seeds_from_robust_bounds() {
        let state = seeded(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert!(state.is_initialized());
        assert_eq!(state.min(), 1.0);
        assert_eq!(state.max(), 5.0);
        assert_eq!(state.sticky_min(), 1.0);
        assert_eq!(state.sticky_max(), 5.0);
        assert_eq!(state.hold_frames(), HOLD_FRAMES);
    }

    #[test]
    fn test_first_update_on_full_window_clips_tails() {
        let mut values = [0.0f32; 64];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as f32;
        }
        let state = seeded(&values);

        assert_eq!(state.sticky_min(), 3.0);
        assert_eq!(state.sticky_max(), 60.0);
    }

    #[test]
    fn test_empty_window_leaves_state_unchanged() {
        let mut state = GraphScaleState::new();
        assert!(!state.update_with_history(&[]));
        assert!(!state.is_initialized());
        assert_eq!(state.display_range(), None);

        let mut state = seeded(&[1.0, 2.0]);
        let before = state;
        assert!(!state.update_with_history(&[f32::NAN]));
        assert_eq!(state, before);
    }

    #[test]
    fn test_stable_window_does_not_move_bounds() {
        let window = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut state = seeded(&window);

        for _ in 0..100 {
            state.update_with_history(&window);
            assert_eq!(state.min(), 1.0);
            assert_eq!(state.max(), 5.0);
            assert_eq!(state.sticky_min(), 1.0);
            assert_eq!(state.sticky_max(), 5.0);
        }
    }

    #[test]
    fn test_smoothed_bounds_move_by_alpha() {
        let mut state = seeded(&[0.0, 10.0]);
        state.update_with_history(&[5.0, 6.0]);

        assert!(libm::fabsf(state.min() - 1.0) < TOLERANCE);
        assert!(libm::fabsf(state.max() - 9.2) < TOLERANCE);
    }

    #[test]
    fn test_sticky_bounds_hold_before_contracting() {
        let mut state = seeded(&[0.0, 10.0]);
        let narrow = [4.0, 6.0];

        for update in 1..=HOLD_FRAMES {
            state.update_with_history(&narrow);
            assert_eq!(state.sticky_min(), 0.0, "update {}", update);
            assert_eq!(state.sticky_max(), 10.0, "update {}", update);
        }
        assert_eq!(state.hold_frames(), 0);

        // Hold expired: creep at half the smoothing rate
        state.update_with_history(&narrow);
        assert!(libm::fabsf(state.sticky_min() - 0.4) < TOLERANCE);
        assert!(libm::fabsf(state.sticky_max() - 9.6) < TOLERANCE);
    }

    #[test]
    fn test_sticky_bounds_contract_gradually() {
        let mut state = seeded(&[0.0, 10.0]);
        let narrow = [4.0, 6.0];
        for _ in 0..HOLD_FRAMES {
            state.update_with_history(&narrow);
        }

        let mut previous = state.sticky_min();
        for _ in 0..50 {
            state.update_with_history(&narrow);
            let step = state.sticky_min() - previous;
            assert!(step >= 0.0);
            assert!(step <= (4.0 - previous) * STICKY_CREEP_ALPHA + TOLERANCE);
            previous = state.sticky_min();
        }
        assert!(state.sticky_min() < 4.0);
    }

    #[test]
    fn test_new_extreme_widens_immediately() {
        let mut state = seeded(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        state.update_with_history(&[1.0, 2.0, 3.0, 4.0, 5.0, 50.0]);

        assert_eq!(state.sticky_max(), 50.0);
        assert_eq!(state.sticky_min(), 1.0);
        assert_eq!(state.hold_frames(), HOLD_FRAMES - 1);
        let range = state.display_range().map(|r| r.max);
        assert!(range.is_some_and(|max| max > 50.0));
    }

    #[test]
    fn test_widening_rearms_hold_for_both_bounds() {
        let mut state = seeded(&[0.0, 10.0]);
        for _ in 0..HOLD_FRAMES {
            state.update_with_history(&[0.0, 10.0]);
        }
        assert_eq!(state.hold_frames(), 0);

        // Upper bound extends; lower bound still gets its expired-hold creep
        state.update_with_history(&[5.0, 20.0]);
        assert_eq!(state.sticky_max(), 20.0);
        assert!(libm::fabsf(state.sticky_min() - 0.5) < TOLERANCE);
        assert_eq!(state.hold_frames(), HOLD_FRAMES - 1);

        // Hold is armed again, so the lower bound now stays put
        state.update_with_history(&[5.0, 20.0]);
        assert!(libm::fabsf(state.sticky_min() - 0.5) < TOLERANCE);
    }

    #[test]
    fn test_display_range_pads_by_fraction() {
        let state = seeded(&[0.0, 10.0]);
        let range = state.display_range();

        assert_eq!(range, Some(DisplayRange::new(-1.0, 11.0)));
    }

    #[test]
    fn test_display_range_pads_flat_signal() {
        let state = seeded(&[2.5; 10]);
        let range = state.display_range().unwrap();

        assert!(range.span() > 0.0);
        assert!(libm::fabsf(range.span() - MIN_DISPLAY_RANGE) < TOLERANCE);
        assert!(libm::fabsf(range.normalize(2.5) - 0.5) < 0.01);
    }

    #[test]
    fn test_display_range_uses_wider_estimate() {
        let mut state = seeded(&[0.0, 10.0]);
        state.update_with_history(&[4.0, 6.0]);

        // Sticky bounds still at 0..10 while the smoothed ones moved in
        let range = state.display_range().unwrap();
        assert_eq!(range, DisplayRange::new(-1.0, 11.0));
    }

    #[test]
    fn test_normalize_clamps() {
        let range = DisplayRange::new(0.0, 4.0);

        assert_eq!(range.normalize(1.0), 0.25);
        assert_eq!(range.normalize(-3.0), 0.0);
        assert_eq!(range.normalize(9.0), 1.0);
        assert_eq!(range.normalize(f32::NAN), 0.5);
        assert_eq!(DisplayRange::new(1.0, 1.0).normalize(1.0), 0.5);
    }

    #[test]
    fn test_reset() {
        let mut state = seeded(&[1.0, 2.0]);
        state.reset();

        assert!(!state.is_initialized());
        assert_eq!(state, GraphScaleState::new());
    }
}
