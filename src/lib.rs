// SPDX-License-Identifier: MPL-2.0
//! `playback_controller` drives embedded media players.
//!
//! Each mounted [`player::PlaybackSession`] tracks playback status, position,
//! volume and rate for one media resource, auto-hides its controls while
//! playing, and reacts to keyboard shortcuts only while it is the active
//! session. Fullscreen and picture-in-picture are platform-wide and owned by
//! at most one session at a time through the [`player::PlatformMediaBridge`].

#![doc(html_root_url = "https://docs.rs/playback_controller/0.1.0")]

pub mod config;
pub mod domain;
pub mod error;
pub mod player;

#[cfg(test)]
mod test_utils;
