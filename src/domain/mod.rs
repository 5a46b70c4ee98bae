// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core playback rules with no platform or runtime dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! Nothing here spawns tasks, logs, or talks to the platform, which keeps it
//! trivially testable.
//!
//! # Modules
//!
//! - [`media`]: Media descriptors ([`MediaResource`](media::MediaResource))
//! - [`playback`]: Playback types ([`PlaybackStatus`](playback::PlaybackStatus),
//!   [`Volume`](playback::Volume), [`PlaybackRate`](playback::PlaybackRate),
//!   [`ExclusiveResource`](playback::ExclusiveResource)) and progress helpers

pub mod media;
pub mod playback;
