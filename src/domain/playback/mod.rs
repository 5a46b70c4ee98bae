// SPDX-License-Identifier: MPL-2.0
//! Playback domain types.
//!
//! This module contains playback value objects and the status state machine,
//! independent of any platform or timer concerns.

pub mod newtypes;
pub mod progress;
pub mod status;

pub use newtypes::{ControlsHideDelay, PlaybackRate, SeekStep, Volume};
pub use status::{PlaybackStatus, Trigger};

use std::fmt;

/// A platform-wide resource that at most one session may hold at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusiveResource {
    Fullscreen,
    PictureInPicture,
}

impl ExclusiveResource {
    /// Both resources, in a stable order.
    pub const ALL: [ExclusiveResource; 2] = [Self::Fullscreen, Self::PictureInPicture];
}

impl fmt::Display for ExclusiveResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fullscreen => f.write_str("fullscreen"),
            Self::PictureInPicture => f.write_str("picture-in-picture"),
        }
    }
}
