// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the controller. Constants are organized by category.
//!
//! # Categories
//!
//! - **Controls**: Auto-hide delay for on-screen controls
//! - **Volume**: Audio playback volume settings
//! - **Playback Rate**: Allowed speed presets
//! - **Seeking**: Keyboard seek step

// ==========================================================================
// Controls Defaults
// ==========================================================================

/// Default inactivity delay before controls hide during playback (in seconds).
pub const DEFAULT_CONTROLS_HIDE_DELAY_SECS: u32 = 3;

/// Minimum controls hide delay (in seconds).
pub const MIN_CONTROLS_HIDE_DELAY_SECS: u32 = 1;

/// Maximum controls hide delay (in seconds).
pub const MAX_CONTROLS_HIDE_DELAY_SECS: u32 = 30;

// ==========================================================================
// Volume Defaults
// ==========================================================================

/// Default playback volume (0.0 to 1.0).
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f32 = 1.0;

/// Volume restored on unmute when no audible level was ever set.
pub const UNMUTE_FALLBACK_VOLUME: f32 = 0.5;

// ==========================================================================
// Playback Rate Defaults
// ==========================================================================

/// Default playback rate (normal speed).
pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;

/// Playback rates offered by the speed menu. Anything else is rejected.
pub const PLAYBACK_RATE_PRESETS: &[f64] = &[0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

// ==========================================================================
// Seeking Defaults
// ==========================================================================

/// Default arrow-key seek step (in seconds).
pub const DEFAULT_KEYBOARD_SEEK_STEP_SECS: f64 = 10.0;

/// Minimum arrow-key seek step (in seconds).
pub const MIN_KEYBOARD_SEEK_STEP_SECS: f64 = 1.0;

/// Maximum arrow-key seek step (in seconds).
pub const MAX_KEYBOARD_SEEK_STEP_SECS: f64 = 60.0;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Controls delay validation
    assert!(MIN_CONTROLS_HIDE_DELAY_SECS > 0);
    assert!(MAX_CONTROLS_HIDE_DELAY_SECS >= MIN_CONTROLS_HIDE_DELAY_SECS);
    assert!(DEFAULT_CONTROLS_HIDE_DELAY_SECS >= MIN_CONTROLS_HIDE_DELAY_SECS);
    assert!(DEFAULT_CONTROLS_HIDE_DELAY_SECS <= MAX_CONTROLS_HIDE_DELAY_SECS);

    // Volume validation
    assert!(MIN_VOLUME >= 0.0);
    assert!(MAX_VOLUME > MIN_VOLUME);
    assert!(DEFAULT_VOLUME <= MAX_VOLUME);
    assert!(UNMUTE_FALLBACK_VOLUME > MIN_VOLUME);
    assert!(UNMUTE_FALLBACK_VOLUME <= MAX_VOLUME);

    // Seek step validation
    assert!(MIN_KEYBOARD_SEEK_STEP_SECS > 0.0);
    assert!(MAX_KEYBOARD_SEEK_STEP_SECS >= MIN_KEYBOARD_SEEK_STEP_SECS);
    assert!(DEFAULT_KEYBOARD_SEEK_STEP_SECS >= MIN_KEYBOARD_SEEK_STEP_SECS);
    assert!(DEFAULT_KEYBOARD_SEEK_STEP_SECS <= MAX_KEYBOARD_SEEK_STEP_SECS);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_delay_defaults_are_valid() {
        assert_eq!(DEFAULT_CONTROLS_HIDE_DELAY_SECS, 3);
        assert!(DEFAULT_CONTROLS_HIDE_DELAY_SECS >= MIN_CONTROLS_HIDE_DELAY_SECS);
        assert!(DEFAULT_CONTROLS_HIDE_DELAY_SECS <= MAX_CONTROLS_HIDE_DELAY_SECS);
    }

    #[test]
    fn volume_defaults_are_valid() {
        assert_eq!(DEFAULT_VOLUME, 1.0);
        assert!(DEFAULT_VOLUME >= MIN_VOLUME);
        assert!(UNMUTE_FALLBACK_VOLUME > 0.0);
    }

    #[test]
    fn playback_rate_presets_are_sorted_and_contain_default() {
        assert!(PLAYBACK_RATE_PRESETS.windows(2).all(|w| w[0] < w[1]));
        assert!(PLAYBACK_RATE_PRESETS.contains(&DEFAULT_PLAYBACK_RATE));
        assert!(PLAYBACK_RATE_PRESETS.iter().all(|&r| r > 0.0));
    }

    #[test]
    fn seek_step_defaults_are_valid() {
        assert_eq!(DEFAULT_KEYBOARD_SEEK_STEP_SECS, 10.0);
        assert!(DEFAULT_KEYBOARD_SEEK_STEP_SECS <= MAX_KEYBOARD_SEEK_STEP_SECS);
    }
}
