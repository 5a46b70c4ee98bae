// SPDX-License-Identifier: MPL-2.0
//! Playback sessions and the machinery around them.
//!
//! - [`session`]: the per-player state machine and command surface
//! - [`controls`]: controls auto-hide timer
//! - [`input`]: keyboard and pointer translation
//! - [`registry`]: which session receives keyboard shortcuts
//! - [`bridge`]: platform façade and fullscreen / picture-in-picture holders
//! - [`host`]: event loop routing deferred messages to sessions
//! - [`simulated`]: in-process platform used by the demo and tests

pub mod bridge;
pub mod controls;
pub mod host;
pub mod input;
pub mod message;
pub mod registry;
pub mod session;
pub mod simulated;

pub use bridge::{MediaCommand, MediaPlatform, PlatformMediaBridge, RequestOutcome};
pub use host::SessionHost;
pub use input::{Command, Key, Pointer};
pub use message::{Envelope, PlatformEvent, SessionId, SessionMessage};
pub use registry::ActiveSessionRegistry;
pub use session::{PlaybackSession, PlaybackSnapshot, SessionContext};
pub use simulated::{SimulatedPlatform, Support};
