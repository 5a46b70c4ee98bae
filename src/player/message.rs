// SPDX-License-Identifier: MPL-2.0
//! Messages delivered to sessions by the host event loop.
//!
//! Timer expirations and platform acknowledgements both arrive later than
//! the command that caused them, so they travel on one channel as
//! [`Envelope`]s addressed to a session.

use crate::domain::playback::ExclusiveResource;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one mounted playback session within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocates a process-unique id.
    pub(crate) fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Outcomes reported by the platform's media subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Metadata is available; the media can be played.
    MetadataLoaded { duration_secs: f64 },

    /// Periodic playback position report.
    TimeUpdate { position_secs: f64 },

    /// The media started playing on its own: autoplay, OS media keys or the
    /// picture-in-picture window's controls.
    Playing,

    /// The media paused on its own.
    Paused,

    /// Playback reached the end of the media.
    Ended,

    /// The media could not be loaded. Contains the platform's raw message.
    LoadFailed(String),

    /// The platform granted a requested exclusive resource.
    Granted(ExclusiveResource),

    /// The platform refused a requested exclusive resource.
    Denied {
        resource: ExclusiveResource,
        reason: String,
    },

    /// The session no longer holds the resource, either because it asked to
    /// exit or because the platform left the mode on its own.
    Released(ExclusiveResource),
}

/// Payload of an [`Envelope`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMessage {
    /// Something happened on the platform side.
    Platform(PlatformEvent),

    /// A controls auto-hide deadline elapsed.
    ///
    /// Carries the generation of the timer that fired so that expirations of
    /// already cancelled timers can be told apart from the live one.
    ControlsTimeout { generation: u64 },
}

/// A message addressed to one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub session: SessionId,
    pub message: SessionMessage,
}

impl Envelope {
    pub fn platform(session: SessionId, event: PlatformEvent) -> Self {
        Self {
            session,
            message: SessionMessage::Platform(event),
        }
    }

    pub fn controls_timeout(session: SessionId, generation: u64) -> Self {
        Self {
            session,
            message: SessionMessage::ControlsTimeout { generation },
        }
    }
}

/// Sending half of the host's message channel.
pub type MessageSender = mpsc::UnboundedSender<Envelope>;

/// Receiving half of the host's message channel.
pub type MessageReceiver = mpsc::UnboundedReceiver<Envelope>;

/// Creates the channel sessions, timers and platform adapters post into.
pub fn channel() -> (MessageSender, MessageReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique() {
        let a = SessionId::next();
        let b = SessionId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn session_id_display() {
        let id = SessionId(42);
        assert_eq!(id.to_string(), "session#42");
    }

    #[test]
    fn envelope_constructors_address_session() {
        let id = SessionId::next();
        let env = Envelope::controls_timeout(id, 7);
        assert_eq!(env.session, id);
        assert_eq!(env.message, SessionMessage::ControlsTimeout { generation: 7 });

        let env = Envelope::platform(id, PlatformEvent::Ended);
        assert_eq!(env.message, SessionMessage::Platform(PlatformEvent::Ended));
    }
}
