//! Human-readable value and duration formatting
//!
//! Shared by the graph axis labels, the summary screen and the HTML status
//! page. Every formatter writes into a fixed-capacity [`heapless::String`]
//! so rendering a frame never touches the heap.

use core::fmt::Write;

use heapless::String;

/// Maximum length of any formatted value or duration (characters)
pub const MAX_FORMATTED_LENGTH: usize = 24;

/// Fixed-capacity text produced by the formatters
pub type FormattedText = String<MAX_FORMATTED_LENGTH>;

/// Smallest accepted significant digit budget
pub const MIN_DIGITS: u8 = 4;

/// Largest accepted significant digit budget
pub const MAX_DIGITS: u8 = 10;

/// Width of the prefix + unit field; axis labels rely on it for alignment
pub const UNIT_FIELD_WIDTH: usize = 3;

/// Longest unit symbol `format_value` writes; longer units are cut
pub const MAX_UNIT_LENGTH: usize = 7;

/// Widest number: sign, one mantissa digit, point, nine decimals and `e38`
const MAX_NUMBER_LENGTH: usize = 1 + 1 + 1 + (MAX_DIGITS as usize - 1) + 3;

const _: () = assert!(
    MAX_NUMBER_LENGTH + 1 + 1 + MAX_UNIT_LENGTH <= MAX_FORMATTED_LENGTH,
    "formatted values must fit FormattedText"
);

/// Longest duration `format_time` can show (99h59m59s)
pub const MAX_DISPLAY_SECONDS: u32 = 99 * 3600 + 59 * 60 + 59;

/// Scaled magnitude at which the next prefix takes over
const PREFIX_STEP: f32 = 1000.0;

/// SI-style magnitude prefix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuePrefix {
    /// Symbol written in front of the unit ("m", "k", ...)
    pub symbol: &'static str,
    /// Multiplier the prefix stands for
    pub factor: f32,
}

impl ValuePrefix {
    const fn new(symbol: &'static str, factor: f32) -> Self {
        Self { symbol, factor }
    }
}

/// Prefix table, ascending by factor
pub const PREFIXES: [ValuePrefix; 7] = [
    ValuePrefix::new("n", 1e-9),
    ValuePrefix::new("u", 1e-6),
    ValuePrefix::new("m", 1e-3),
    ValuePrefix::new("", 1.0),
    ValuePrefix::new("k", 1e3),
    ValuePrefix::new("M", 1e6),
    ValuePrefix::new("G", 1e9),
];

/// Index of the unit (factor 1) entry in [`PREFIXES`]
const UNIT_PREFIX_INDEX: usize = 3;

/// Pick the largest prefix whose factor does not exceed `abs_value`.
///
/// Values below the smallest factor (including zero and NaN) fall back to
/// the smallest prefix.
pub fn find_value_prefix(abs_value: f32) -> ValuePrefix {
    PREFIXES[prefix_index(abs_value)]
}

fn prefix_index(abs_value: f32) -> usize {
    PREFIXES
        .iter()
        .rposition(|prefix| prefix.factor <= abs_value)
        .unwrap_or(0)
}

/// Format `value` with an automatically chosen prefix and a significant
/// digit budget.
///
/// `digits` is clamped to `[MIN_DIGITS, MAX_DIGITS]`. The decimal count
/// shrinks as the integer part grows so the total digit count stays at the
/// budget. With a non-empty `unit` the output is `"<value> <prefix><unit>"`
/// with the prefix + unit field space-padded to [`UNIT_FIELD_WIDTH`].
///
/// Magnitudes that still round to 1000 or more under the largest prefix
/// switch to exponent notation with the bare unit (`"3.4028e38 W  "`).
/// Negative zero prints as zero.
///
/// ```
/// use powermon_core::format::format_value;
///
/// assert_eq!(format_value(0.0025, "A", 5).as_str(), "2.5000 mA ");
/// assert_eq!(format_value(1500.0, "V", 5).as_str(), "1.5000 kV ");
/// ```
pub fn format_value(value: f32, unit: &str, digits: u8) -> FormattedText {
    let digits = digits.clamp(MIN_DIGITS, MAX_DIGITS);
    let value = if value == 0.0 { 0.0 } else { value };

    let mut index = if value == 0.0 || !value.is_finite() {
        UNIT_PREFIX_INDEX
    } else {
        prefix_index(libm::fabsf(value))
    };
    let mut scaled = value / PREFIXES[index].factor;
    let mut decimals = fit_decimals(libm::fabsf(scaled), digits);

    // 999.99996 m rounds to "1000.00"; move up a prefix instead of printing
    // a four digit integer part.
    if index + 1 < PREFIXES.len() && round_at(libm::fabsf(scaled), decimals) >= PREFIX_STEP {
        index += 1;
        scaled = value / PREFIXES[index].factor;
        decimals = fit_decimals(libm::fabsf(scaled), digits);
    }

    let mut out = FormattedText::new();
    let symbol = if round_at(libm::fabsf(scaled), decimals) >= PREFIX_STEP {
        let _ = write!(out, "{:.*e}", usize::from(digits) - 1, value);
        ""
    } else {
        let _ = write!(out, "{:.*}", decimals, scaled);
        PREFIXES[index].symbol
    };

    if !unit.is_empty() {
        let mut label: String<{ MAX_UNIT_LENGTH + 1 }> = String::new();
        let _ = label.push_str(symbol);
        for c in unit.chars() {
            if label.len() + c.len_utf8() > MAX_UNIT_LENGTH + symbol.len() {
                break;
            }
            let _ = label.push(c);
        }
        let _ = write!(out, " {:<width$}", label.as_str(), width = UNIT_FIELD_WIDTH);
    }

    out
}

/// Decimal places for a scaled magnitude under a digit budget
fn decimals_for(abs_scaled: f32, digits: u8) -> usize {
    let integer_digits = if abs_scaled >= 100.0 {
        3
    } else if abs_scaled >= 10.0 {
        2
    } else {
        1
    };
    usize::from(digits) - integer_digits
}

/// Like [`decimals_for`], but budgets for the magnitude after rounding so
/// 9.99996 is printed as "10.000" rather than "10.0000".
fn fit_decimals(abs_scaled: f32, digits: u8) -> usize {
    let decimals = decimals_for(abs_scaled, digits);
    decimals_for(round_at(abs_scaled, decimals), digits)
}

fn round_at(value: f32, decimals: usize) -> f32 {
    let scale = libm::powf(10.0, decimals as f32);
    libm::roundf(value * scale) / scale
}

/// Format a duration as `"<HH>h<MM>m<SS>s"`.
///
/// Negative and NaN input reads as zero, the value is rounded to whole
/// seconds and capped at 99h59m59s. The hour and minute segments are only
/// written when non-zero; seconds are always written.
///
/// ```
/// use powermon_core::format::format_time;
///
/// assert_eq!(format_time(65.0).as_str(), "01m05s");
/// ```
pub fn format_time(seconds: f32) -> FormattedText {
    let total = if seconds.is_nan() || seconds <= 0.0 {
        0
    } else {
        // `as` saturates, so +inf lands on the cap as well
        (libm::roundf(seconds) as u32).min(MAX_DISPLAY_SECONDS)
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let mut out = FormattedText::new();
    if hours > 0 {
        let _ = write!(out, "{:02}h", hours);
    }
    if minutes > 0 {
        let _ = write!(out, "{:02}m", minutes);
    }
    let _ = write!(out, "{:02}s", secs);
    out
}
