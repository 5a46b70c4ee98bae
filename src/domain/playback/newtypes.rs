// SPDX-License-Identifier: MPL-2.0
//! Playback newtypes.
//!
//! This module provides type-safe wrappers for playback values,
//! ensuring they are always within valid ranges.

use crate::config::{
    DEFAULT_CONTROLS_HIDE_DELAY_SECS, DEFAULT_KEYBOARD_SEEK_STEP_SECS, DEFAULT_PLAYBACK_RATE,
    DEFAULT_VOLUME, MAX_CONTROLS_HIDE_DELAY_SECS, MAX_KEYBOARD_SEEK_STEP_SECS, MAX_VOLUME,
    MIN_CONTROLS_HIDE_DELAY_SECS, MIN_KEYBOARD_SEEK_STEP_SECS, MIN_VOLUME, PLAYBACK_RATE_PRESETS,
};
use std::time::Duration;

/// Tolerance used when matching a requested rate against the presets.
const RATE_EPSILON: f64 = 0.001;

// =============================================================================
// Volume
// =============================================================================

/// Volume level, guaranteed to be within valid range (0.0–1.0).
///
/// This newtype enforces validity at the type level, making it impossible
/// to create an invalid volume value.
///
/// # Example
///
/// ```
/// use playback_controller::domain::playback::Volume;
///
/// let vol = Volume::new(0.5);
/// assert_eq!(vol.value(), 0.5);
///
/// // Values outside range are clamped
/// let too_loud = Volume::new(2.0);
/// assert_eq!(too_loud.value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Silence.
    pub const ZERO: Volume = Volume(0.0);

    /// Creates a new volume level, clamping to valid range.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        Self(volume.clamp(MIN_VOLUME, MAX_VOLUME))
    }

    /// Returns the volume value as f32.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true if the volume is exactly zero.
    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 <= MIN_VOLUME
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

// =============================================================================
// PlaybackRate
// =============================================================================

/// Playback rate, guaranteed to be one of the allowed presets.
///
/// Unlike [`Volume`], out-of-range values are not clamped: a rate the
/// speed menu does not offer is rejected outright.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRate(f64);

impl PlaybackRate {
    /// Returns the matching preset, or `None` if `rate` is not offered.
    #[must_use]
    pub fn try_new(rate: f64) -> Option<Self> {
        PLAYBACK_RATE_PRESETS
            .iter()
            .find(|&&preset| (preset - rate).abs() < RATE_EPSILON)
            .map(|&preset| Self(preset))
    }

    /// Returns the rate value as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns all allowed rates, slowest first.
    #[must_use]
    pub fn presets() -> &'static [f64] {
        PLAYBACK_RATE_PRESETS
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self(DEFAULT_PLAYBACK_RATE)
    }
}

// =============================================================================
// SeekStep
// =============================================================================

/// Arrow-key seek step in seconds (1–60 seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekStep(f64);

impl SeekStep {
    /// Creates a new seek step value, clamping to valid range.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value.clamp(MIN_KEYBOARD_SEEK_STEP_SECS, MAX_KEYBOARD_SEEK_STEP_SECS))
    }

    /// Returns the value as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for SeekStep {
    fn default() -> Self {
        Self(DEFAULT_KEYBOARD_SEEK_STEP_SECS)
    }
}

// =============================================================================
// ControlsHideDelay
// =============================================================================

/// Inactivity delay in seconds before controls hide during playback.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (1–30 seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsHideDelay(u32);

impl ControlsHideDelay {
    /// Creates a new delay value, clamping to valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(MIN_CONTROLS_HIDE_DELAY_SECS, MAX_CONTROLS_HIDE_DELAY_SECS))
    }

    /// Returns the value as u32.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the delay as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

impl Default for ControlsHideDelay {
    fn default() -> Self {
        Self(DEFAULT_CONTROLS_HIDE_DELAY_SECS)
    }
}
