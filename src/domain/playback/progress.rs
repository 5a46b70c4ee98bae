// SPDX-License-Identifier: MPL-2.0
//! Progress track helpers.
//!
//! Pure mappings between pointer positions, playback fractions and
//! time labels. Nothing here touches session state; callers feed the
//! result into the session's `seek`.

/// Maps a pointer offset `x` within a track of width `width` to a
/// playback fraction in `[0, 1]`.
///
/// A degenerate track (zero, negative or non-finite width) maps to `0`.
///
/// # Examples
///
/// ```
/// use playback_controller::domain::playback::progress::fraction_at;
///
/// assert_eq!(fraction_at(50.0, 200.0), 0.25);
/// assert_eq!(fraction_at(-10.0, 200.0), 0.0);
/// assert_eq!(fraction_at(250.0, 200.0), 1.0);
/// ```
#[must_use]
pub fn fraction_at(x: f64, width: f64) -> f64 {
    if !(width.is_finite() && width > 0.0) || x.is_nan() {
        return 0.0;
    }
    clamp_fraction(x / width)
}

/// Clamps a fraction to `[0, 1]`, mapping NaN to `0`.
#[must_use]
pub fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

/// Returns the fraction of `duration` that `position_secs` represents,
/// after clamping the position to `[0, duration]`.
///
/// Returns `0` when the duration is unknown.
#[must_use]
pub fn fraction_of(position_secs: f64, duration_secs: f64) -> f64 {
    if !(duration_secs.is_finite() && duration_secs > 0.0) {
        return 0.0;
    }
    clamp_fraction(position_secs / duration_secs)
}

/// Formats seconds as `M:SS` for the time label.
///
/// # Examples
///
/// ```
/// use playback_controller::domain::playback::progress::format_time;
///
/// assert_eq!(format_time(0.0), "0:00");
/// assert_eq!(format_time(65.4), "1:05");
/// assert_eq!(format_time(f64::NAN), "0:00");
/// ```
#[must_use]
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}
