//! Statistics over the current series

/// Summary of the retained current samples
///
/// Computed on demand in a single pass; never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrentStats {
    /// Smallest current in mA
    pub min: f32,
    /// Largest current in mA
    pub max: f32,
    /// Arithmetic mean in mA
    pub mean: f32,
    /// Population standard deviation in mA
    pub std_deviation: f32,
}

impl CurrentStats {
    /// Compute min, max, mean and population standard deviation in one pass.
    ///
    /// An empty input yields all zeros and a single value has zero spread.
    /// Sums are accumulated in `f64` so `E[x²] - E[x]²` keeps its precision
    /// for large, nearly constant currents; a negative round-off result is
    /// clamped to zero before the square root.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f32>,
    {
        let mut count = 0usize;
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        let mut sum = 0f64;
        let mut sum_sq = 0f64;

        for value in values {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            sum += f64::from(value);
            sum_sq += f64::from(value) * f64::from(value);
        }

        if count == 0 {
            return Self::default();
        }

        let n = count as f64;
        let mean = sum / n;
        let std_deviation = if count >= 2 {
            let variance = sum_sq / n - mean * mean;
            libm::sqrt(variance.max(0.0))
        } else {
            0.0
        };

        Self {
            min,
            max,
            mean: mean as f32,
            std_deviation: std_deviation as f32,
        }
    }
}
