//! Fixed-capacity measurement history
//!
//! Keeps the most recent [`HISTORY_CAPACITY`] accepted sensor samples as
//! three parallel series (current, cumulative energy, timestamp) in a ring.
//! Once full, each new sample silently evicts the oldest one.
//!
//! Physical slots never move. Logical index `0` is the oldest retained
//! sample and `count - 1` the newest; `(head + N - count + i) % N` maps one
//! onto the other.

mod stats;

pub use stats::CurrentStats;

/// Number of samples retained per series
pub const HISTORY_CAPACITY: usize = 64;

/// One accepted sensor reading
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    /// Instantaneous current in mA
    pub current_ma: f32,
    /// Cumulative energy in Ws
    pub energy_ws: f32,
    /// Seconds since boot
    pub timestamp_s: f32,
}

impl Sample {
    /// Create a new sample
    pub const fn new(current_ma: f32, energy_ws: f32, timestamp_s: f32) -> Self {
        Self {
            current_ma,
            energy_ws,
            timestamp_s,
        }
    }
}

/// Circular store of the last `N` samples
///
/// Storage is three inline arrays, so the history never allocates. The
/// capacity defaults to [`HISTORY_CAPACITY`].
#[derive(Debug, Clone)]
pub struct MeasurementHistory<const N: usize = HISTORY_CAPACITY> {
    current: [f32; N],
    energy: [f32; N],
    timestamp: [f32; N],
    /// Slot the next sample is written to
    head: usize,
    /// Valid samples, saturating at `N`
    count: usize,
}

impl<const N: usize> Default for MeasurementHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MeasurementHistory<N> {
    /// Create an empty history
    pub const fn new() -> Self {
        const { assert!(N > 0, "history capacity must be non-zero") };

        Self {
            current: [0.0; N],
            energy: [0.0; N],
            timestamp: [0.0; N],
            head: 0,
            count: 0,
        }
    }

    /// Maximum number of retained samples
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of valid samples (at most `N`)
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Whether no sample has been recorded yet
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether the next sample will evict the oldest one
    pub const fn is_full(&self) -> bool {
        self.count == N
    }

    /// Record a sample, overwriting the oldest one once the ring is full.
    pub fn add_measurement(&mut self, current_ma: f32, energy_ws: f32, timestamp_s: f32) {
        self.current[self.head] = current_ma;
        self.energy[self.head] = energy_ws;
        self.timestamp[self.head] = timestamp_s;

        self.head = (self.head + 1) % N;
        if self.count < N {
            self.count += 1;
        }
    }

    /// Record a [`Sample`]
    pub fn push(&mut self, sample: Sample) {
        self.add_measurement(sample.current_ma, sample.energy_ws, sample.timestamp_s);
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }

    /// Map a logical index (0 = oldest retained) to its physical slot
    fn physical_index(&self, logical: usize) -> usize {
        (self.head + N - self.count + logical) % N
    }

    /// Sample at a logical index, oldest first
    pub fn get(&self, logical: usize) -> Option<Sample> {
        if logical >= self.count {
            return None;
        }

        let idx = self.physical_index(logical);
        Some(Sample::new(
            self.current[idx],
            self.energy[idx],
            self.timestamp[idx],
        ))
    }

    /// Most recently recorded sample
    pub fn latest(&self) -> Option<Sample> {
        self.count.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Iterate over the retained samples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.count).filter_map(move |logical| self.get(logical))
    }

    /// Copy the newest currents (mA) into `dest`, oldest first.
    ///
    /// Writes `min(count, dest.len())` values and returns that number.
    pub fn copy_currents(&self, dest: &mut [f32]) -> usize {
        self.copy_series(&self.current, dest)
    }

    /// Copy the newest cumulative energies (Ws) into `dest`, oldest first.
    pub fn copy_energy(&self, dest: &mut [f32]) -> usize {
        self.copy_series(&self.energy, dest)
    }

    /// Copy the newest timestamps (s) into `dest`, oldest first.
    pub fn copy_timestamps(&self, dest: &mut [f32]) -> usize {
        self.copy_series(&self.timestamp, dest)
    }

    fn copy_series(&self, series: &[f32; N], dest: &mut [f32]) -> usize {
        let to_copy = self.count.min(dest.len());
        let skipped = self.count - to_copy;

        for (offset, slot) in dest[..to_copy].iter_mut().enumerate() {
            *slot = series[self.physical_index(skipped + offset)];
        }

        to_copy
    }

    /// Min, max, mean and standard deviation of the retained currents
    pub fn current_stats(&self) -> CurrentStats {
        CurrentStats::from_values(
            (0..self.count).map(|logical| self.current[self.physical_index(logical)]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> MeasurementHistory {
        let mut history = MeasurementHistory::new();
        for i in 0..n {
            let t = i as f32;
            history.add_measurement(t * 10.0, t * 100.0, t);
        }
        history
    }

    #[test]
    fn test_empty_history() {
        let history: MeasurementHistory = MeasurementHistory::new();
        let mut dest = [0.0; HISTORY_CAPACITY];

        assert_eq!(history.count(), 0);
        assert!(history.is_empty());
        assert_eq!(history.copy_currents(&mut dest), 0);
        assert_eq!(history.copy_energy(&mut dest), 0);
        assert_eq!(history.copy_timestamps(&mut dest), 0);
        assert_eq!(history.current_stats(), CurrentStats::default());
        assert_eq!(history.latest(), None);
    }

    #[test]
    fn test_count_saturates_at_capacity() {
        for n in [0, 1, 10, 63, 64, 65, 200] {
            let history = filled(n);
            assert_eq!(history.count(), n.min(HISTORY_CAPACITY), "after {} samples", n);
        }
        assert!(filled(64).is_full());
        assert!(!filled(63).is_full());
    }

    #[test]
    fn test_ring_keeps_last_timestamps_in_order() {
        let total = HISTORY_CAPACITY + 37;
        let history = filled(total);

        let mut dest = [0.0; HISTORY_CAPACITY];
        let copied = history.copy_timestamps(&mut dest);

        assert_eq!(copied, HISTORY_CAPACITY);
        for (i, ts) in dest.iter().enumerate() {
            assert_eq!(*ts, (total - HISTORY_CAPACITY + i) as f32);
        }
    }

    #[test]
    fn test_copy_series_stay_aligned() {
        let history = filled(HISTORY_CAPACITY + 5);

        let mut currents = [0.0; HISTORY_CAPACITY];
        let mut energy = [0.0; HISTORY_CAPACITY];
        let mut timestamps = [0.0; HISTORY_CAPACITY];
        history.copy_currents(&mut currents);
        history.copy_energy(&mut energy);
        history.copy_timestamps(&mut timestamps);

        for i in 0..HISTORY_CAPACITY {
            assert_eq!(currents[i], timestamps[i] * 10.0);
            assert_eq!(energy[i], timestamps[i] * 100.0);
        }
    }

    #[test]
    fn test_copy_truncates_to_destination() {
        let history = filled(20);
        let mut dest = [0.0; 5];

        assert_eq!(history.copy_timestamps(&mut dest), 5);
        // The newest five, oldest first
        assert_eq!(dest, [15.0, 16.0, 17.0, 18.0, 19.0]);
    }

    #[test]
    fn test_copy_never_reads_past_count() {
        let history = filled(3);
        let mut dest = [-1.0; 10];

        assert_eq!(history.copy_currents(&mut dest), 3);
        assert_eq!(&dest[..3], &[0.0, 10.0, 20.0]);
        assert!(dest[3..].iter().all(|v| *v == -1.0));
    }

    #[test]
    fn test_oldest_sample_when_exactly_full() {
        let history = filled(HISTORY_CAPACITY);

        assert_eq!(history.get(0).map(|s| s.timestamp_s), Some(0.0));
        assert_eq!(
            history.latest().map(|s| s.timestamp_s),
            Some((HISTORY_CAPACITY - 1) as f32)
        );
        assert_eq!(history.get(HISTORY_CAPACITY), None);
    }

    #[test]
    fn test_stats_match_expected_values() {
        let mut history: MeasurementHistory = MeasurementHistory::new();
        history.add_measurement(10.0, 0.0, 0.0);
        history.add_measurement(20.0, 0.0, 1.0);
        history.add_measurement(30.0, 0.0, 2.0);

        let stats = history.current_stats();
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert!(libm::fabsf(stats.mean - 20.0) < 1e-4);
        assert!(libm::fabsf(stats.std_deviation - 8.1650) < 1e-3);
    }

    #[test]
    fn test_stats_ignore_ring_rotation() {
        // Same multiset of currents, different physical layout
        let mut straight: MeasurementHistory<4> = MeasurementHistory::new();
        let mut rotated: MeasurementHistory<4> = MeasurementHistory::new();
        for v in [1.0, 2.0, 3.0, 4.0] {
            straight.add_measurement(v, 0.0, 0.0);
        }
        for v in [9.0, 9.0, 3.0, 4.0, 1.0, 2.0] {
            rotated.add_measurement(v, 0.0, 0.0);
        }

        assert_eq!(straight.current_stats(), rotated.current_stats());
    }

    #[test]
    fn test_iter_is_chronological() {
        let history = filled(HISTORY_CAPACITY * 2);
        let mut previous = f32::MIN;

        for sample in history.iter() {
            assert!(sample.timestamp_s > previous);
            previous = sample.timestamp_s;
        }
        assert_eq!(history.iter().count(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_clear_resets() {
        let mut history = filled(10);
        history.clear();

        assert!(history.is_empty());
        history.push(Sample::new(1.0, 2.0, 3.0));
        assert_eq!(history.latest(), Some(Sample::new(1.0, 2.0, 3.0)));
    }
}
