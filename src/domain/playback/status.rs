// SPDX-License-Identifier: MPL-2.0
//! Playback status state machine.
//!
//! Manages the lifecycle of a playback session with clear state transitions:
//! - Idle: No media bound yet
//! - Loading: Media bound, waiting for the platform to report metadata
//! - Ready: Metadata known, nothing played yet
//! - Playing / Paused: Actively playing or held at a position
//! - Ended: Playback reached the end of the media
//! - Error: Load failed; only a new bind leaves this state
//!
//! Every status change goes through [`PlaybackStatus::next`]. Callers never
//! assign a status directly.

use std::fmt;

/// Playback status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
    Error,
}

/// Something that may move a session from one status to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A media resource was (re)bound to the session.
    Bind,
    /// The platform reported duration and dimensions.
    MetadataReady,
    /// User asked to start playback.
    Play,
    /// User asked to pause playback.
    Pause,
    /// The platform reported that playback reached the end.
    ReachedEnd,
    /// User seeked to a position before the end of an ended media.
    SeekBeforeEnd,
    /// The platform reported that the media could not be loaded.
    LoadFailed,
}

impl PlaybackStatus {
    /// Returns the status reached by applying `trigger`, or `None` if the
    /// trigger does not apply in the current status.
    #[must_use]
    pub fn next(self, trigger: Trigger) -> Option<PlaybackStatus> {
        use PlaybackStatus::*;

        match (self, trigger) {
            (_, Trigger::Bind) => Some(Loading),

            (Loading, Trigger::MetadataReady) => Some(Ready),

            (Ready | Paused | Ended, Trigger::Play) => Some(Playing),
            (Playing, Trigger::Pause) => Some(Paused),

            (Playing, Trigger::ReachedEnd) => Some(Ended),
            (Ended, Trigger::SeekBeforeEnd) => Some(Playing),

            (Loading | Ready | Playing | Paused, Trigger::LoadFailed) => Some(Error),

            _ => None,
        }
    }

    /// Returns true if the session is currently playing.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if media metadata is known (Ready or later, excluding Error).
    #[must_use]
    pub fn has_media(self) -> bool {
        matches!(self, Self::Ready | Self::Playing | Self::Paused | Self::Ended)
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Ended => "ended",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}
