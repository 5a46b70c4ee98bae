// SPDX-License-Identifier: MPL-2.0
//! In-process stand-in for the platform media subsystem.
//!
//! Records every call it receives and, when given a channel, answers the
//! way a browser would: load results, grants, denials and releases are
//! posted back as platform events instead of being returned.

use super::bridge::{MediaCommand, MediaPlatform};
use super::message::{Envelope, MessageSender, PlatformEvent, SessionId};
use crate::domain::media::MediaResource;
use crate::domain::playback::ExclusiveResource;
use crate::error::CapabilityError;
use std::cell::RefCell;
use std::rc::Rc;

/// Extensions the simulated media element can play.
const PLAYABLE_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mp3"];

/// Duration reported for every playable resource unless overridden.
pub const DEFAULT_SIMULATED_DURATION_SECS: f64 = 120.0;

/// How the simulated platform answers requests for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Support {
    /// Requests are granted.
    #[default]
    Granted,
    /// Requests are accepted but then denied, as when the user declines.
    Denied,
    /// The capability does not exist; requests fail immediately.
    Unsupported,
}

/// A call received by the simulated platform.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    Load(SessionId, String),
    Unload(SessionId),
    Command(SessionId, MediaCommand),
    Request(SessionId, ExclusiveResource),
    Exit(SessionId, ExclusiveResource),
}

/// Shared view of the calls a [`SimulatedPlatform`] received.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<PlatformCall>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, call: PlatformCall) {
        self.0.borrow_mut().push(call);
    }
}

/// Simulated platform.
///
/// Without a sender it only records calls and the caller delivers platform
/// events by hand, which is what most tests want.
#[derive(Debug)]
pub struct SimulatedPlatform {
    sender: Option<MessageSender>,
    fullscreen: Support,
    picture_in_picture: Support,
    duration_secs: f64,
    log: CallLog,
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self {
            sender: None,
            fullscreen: Support::Granted,
            picture_in_picture: Support::Granted,
            duration_secs: DEFAULT_SIMULATED_DURATION_SECS,
            log: CallLog::default(),
        }
    }

    /// Answers requests by posting platform events on `sender`.
    #[must_use]
    pub fn auto_acknowledge(mut self, sender: MessageSender) -> Self {
        self.sender = Some(sender);
        self
    }

    #[must_use]
    pub fn with_fullscreen(mut self, support: Support) -> Self {
        self.fullscreen = support;
        self
    }

    #[must_use]
    pub fn with_picture_in_picture(mut self, support: Support) -> Self {
        self.picture_in_picture = support;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Returns a handle on the recorded calls that outlives the platform
    /// being moved into a bridge.
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    fn support(&self, resource: ExclusiveResource) -> Support {
        match resource {
            ExclusiveResource::Fullscreen => self.fullscreen,
            ExclusiveResource::PictureInPicture => self.picture_in_picture,
        }
    }

    fn post(&self, session: SessionId, event: PlatformEvent) {
        if let Some(sender) = &self.sender {
            if sender.send(Envelope::platform(session, event)).is_err() {
                log::debug!("{session}: host channel closed, dropping platform event");
            }
        }
    }

    fn is_playable(resource: &MediaResource) -> bool {
        let extension = resource
            .url()
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        matches!(extension, Some(ext) if PLAYABLE_EXTENSIONS.contains(&ext.as_str()))
    }
}

impl MediaPlatform for SimulatedPlatform {
    fn load(&mut self, session: SessionId, resource: &MediaResource) {
        self.log
            .push(PlatformCall::Load(session, resource.url().to_string()));

        let event = if Self::is_playable(resource) {
            PlatformEvent::MetadataLoaded {
                duration_secs: self.duration_secs,
            }
        } else {
            PlatformEvent::LoadFailed("MEDIA_ERR_SRC_NOT_SUPPORTED".to_string())
        };
        self.post(session, event);
    }

    fn unload(&mut self, session: SessionId) {
        self.log.push(PlatformCall::Unload(session));
    }

    fn send(&mut self, session: SessionId, command: MediaCommand) {
        self.log.push(PlatformCall::Command(session, command));
    }

    fn request(
        &mut self,
        session: SessionId,
        resource: ExclusiveResource,
    ) -> Result<(), CapabilityError> {
        self.log.push(PlatformCall::Request(session, resource));
        match self.support(resource) {
            Support::Unsupported => Err(CapabilityError::Unsupported(resource)),
            Support::Granted => {
                self.post(session, PlatformEvent::Granted(resource));
                Ok(())
            }
            Support::Denied => {
                self.post(
                    session,
                    PlatformEvent::Denied {
                        resource,
                        reason: "permission denied by user".to_string(),
                    },
                );
                Ok(())
            }
        }
    }

    fn exit(
        &mut self,
        session: SessionId,
        resource: ExclusiveResource,
    ) -> Result<(), CapabilityError> {
        self.log.push(PlatformCall::Exit(session, resource));
        self.post(session, PlatformEvent::Released(resource));
        Ok(())
    }
}
