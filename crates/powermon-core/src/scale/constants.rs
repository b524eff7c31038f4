//! Tuning constants for the adaptive graph scale
//!
//! Values are in display units (A for current, Wh for energy) unless a
//! name says otherwise.

use crate::history::HISTORY_CAPACITY;

/// Exponential smoothing factor for the tracking bounds
pub const SMOOTHING_ALPHA: f32 = 0.2;

/// Rate at which a sticky bound contracts once its hold has expired
pub const STICKY_CREEP_ALPHA: f32 = SMOOTHING_ALPHA / 2.0;

/// Updates a sticky bound is held after the range last widened
pub const HOLD_FRAMES: u32 = 30;

/// Lower robust-bound percentile
pub const LOW_PERCENTILE: f32 = 0.05;

/// Upper robust-bound percentile
pub const HIGH_PERCENTILE: f32 = 0.95;

/// Narrowest span shown before a fixed pad is applied
pub const MIN_DISPLAY_RANGE: f32 = 0.0001;

/// Padding added on each side, as a fraction of the span (10%)
pub const RANGE_PADDING_FRACTION: f32 = 0.1;

/// Largest window considered per update
pub const SCALE_WINDOW_CAPACITY: usize = HISTORY_CAPACITY;
