// SPDX-License-Identifier: MPL-2.0
//! Event loop owning every mounted session.
//!
//! The host wires sessions to one bridge, one active-session registry and
//! one message channel, then routes each [`Envelope`] to its session.

use super::bridge::{MediaPlatform, PlatformMediaBridge};
use super::input::{Command, Key, Pointer};
use super::message::{
    channel, Envelope, MessageReceiver, MessageSender, PlatformEvent, SessionId, SessionMessage,
};
use super::registry::ActiveSessionRegistry;
use super::session::{PlaybackSession, PlaybackSnapshot, SessionContext};
use crate::config::SessionSettings;
use crate::domain::media::MediaResource;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Owns mounted sessions and delivers their deferred messages.
#[derive(Debug)]
pub struct SessionHost {
    ctx: SessionContext,
    receiver: MessageReceiver,
    sessions: BTreeMap<SessionId, PlaybackSession>,
}

impl SessionHost {
    /// Creates a host. `make_platform` receives the sender the platform
    /// posts its events on.
    pub fn new<P, F>(settings: SessionSettings, make_platform: F) -> Self
    where
        P: MediaPlatform + 'static,
        F: FnOnce(MessageSender) -> P,
    {
        let (sender, receiver) = channel();
        let bridge = PlatformMediaBridge::new(make_platform(sender.clone()));
        Self {
            ctx: SessionContext {
                bridge,
                registry: ActiveSessionRegistry::new(),
                sender,
                settings,
            },
            receiver,
            sessions: BTreeMap::new(),
        }
    }

    pub fn sender(&self) -> MessageSender {
        self.ctx.sender.clone()
    }

    pub fn bridge(&self) -> &PlatformMediaBridge {
        &self.ctx.bridge
    }

    pub fn registry(&self) -> &ActiveSessionRegistry {
        &self.ctx.registry
    }

    /// Mounts a session and binds `resource` to it.
    ///
    /// A resource that cannot even be requested leaves the session mounted
    /// in `Error`, the way a broken player still shows its error message.
    pub fn mount(&mut self, resource: MediaResource) -> SessionId {
        let mut session = PlaybackSession::new(&self.ctx);
        let id = session.id();
        if let Err(err) = session.bind(resource) {
            log::warn!("{id}: {err}");
        }
        self.sessions.insert(id, session);
        id
    }

    /// Unmounts a session. Returns false if it was not mounted.
    pub fn unmount(&mut self, id: SessionId) -> bool {
        match self.sessions.remove(&id) {
            Some(session) => {
                session.unmount();
                true
            }
            None => false,
        }
    }

    pub fn session(&self, id: SessionId) -> Option<&PlaybackSession> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut PlaybackSession> {
        self.sessions.get_mut(&id)
    }

    pub fn snapshot(&self, id: SessionId) -> Option<PlaybackSnapshot> {
        self.session(id).map(PlaybackSession::snapshot)
    }

    /// Mounted sessions in mount order.
    pub fn ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Executes `command` on one session.
    pub fn execute(&mut self, id: SessionId, command: Command) -> Result<()> {
        self.session_mut(id)
            .ok_or_else(|| Error::InvalidArgument(format!("{id} is not mounted")))?
            .execute(command)
    }

    /// Offers a document-wide key press to every session.
    ///
    /// Returns the session that reacted, if any.
    pub fn dispatch_key(&mut self, key: Key) -> Result<Option<SessionId>> {
        for (id, session) in &mut self.sessions {
            if session.handle_key(key)? {
                return Ok(Some(*id));
            }
        }
        Ok(None)
    }

    /// Delivers a pointer gesture to the session under the pointer.
    pub fn dispatch_pointer(&mut self, id: SessionId, pointer: Pointer) -> Result<()> {
        self.session_mut(id)
            .ok_or_else(|| Error::InvalidArgument(format!("{id} is not mounted")))?
            .handle_pointer(pointer)
    }

    /// Routes one message to its session.
    ///
    /// Messages for unmounted sessions are dropped, except a grant, which
    /// is handed back to the platform so the resource is not stuck.
    pub fn deliver(&mut self, envelope: Envelope) -> Result<()> {
        let Envelope { session: id, message } = envelope;
        match self.sessions.get_mut(&id) {
            Some(session) => session.update(message),
            None => {
                if let SessionMessage::Platform(PlatformEvent::Granted(resource)) = message {
                    log::info!("{id}: granted {resource} after unmount, releasing");
                    self.ctx.bridge.release_orphan(id, resource);
                } else {
                    log::debug!("{id}: dropping {message:?} for unmounted session");
                }
                Ok(())
            }
        }
    }

    /// Delivers every message already queued without waiting.
    ///
    /// Returns the notices (denials) raised along the way.
    pub fn pump(&mut self) -> Vec<Error> {
        let mut notices = Vec::new();
        while let Ok(envelope) = self.receiver.try_recv() {
            if let Err(err) = self.deliver(envelope) {
                notices.push(err);
            }
        }
        notices
    }

    /// Waits for the next message and delivers it.
    ///
    /// Returns `None` once the channel is closed.
    pub async fn process_next(&mut self) -> Option<Result<()>> {
        let envelope = self.receiver.recv().await?;
        Some(self.deliver(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::playback::{ExclusiveResource, PlaybackStatus};
    use crate::player::simulated::{PlatformCall, SimulatedPlatform};

    fn host() -> SessionHost {
        SessionHost::new(SessionSettings::default(), |tx| {
            SimulatedPlatform::new().auto_acknowledge(tx)
        })
    }

    #[test]
    fn mount_and_pump_reaches_ready() {
        let mut host = host();
        let id = host.mount(MediaResource::video("a.mp4"));
        assert_eq!(host.snapshot(id).map(|s| s.status), Some(PlaybackStatus::Loading));

        assert!(host.pump().is_empty());
        assert_eq!(host.snapshot(id).map(|s| s.status), Some(PlaybackStatus::Ready));
    }

    #[test]
    fn last_mounted_session_receives_keys() {
        let mut host = host();
        let first = host.mount(MediaResource::video("a.mp4"));
        let second = host.mount(MediaResource::video("b.mp4"));
        host.pump();

        assert_eq!(host.dispatch_key(Key::Space), Ok(Some(second)));
        assert_eq!(host.snapshot(first).map(|s| s.status), Some(PlaybackStatus::Ready));

        host.dispatch_pointer(first, Pointer::Move).expect("pointer");
        assert_eq!(host.dispatch_key(Key::Space), Ok(Some(first)));
        assert_eq!(
            host.snapshot(first).map(|s| s.status),
            Some(PlaybackStatus::Playing)
        );
    }

    #[test]
    fn execute_on_unknown_session_fails() {
        let mut host = host();
        let id = host.mount(MediaResource::video("a.mp4"));
        assert!(host.unmount(id));
        assert!(!host.unmount(id));
        assert!(matches!(
            host.execute(id, Command::Play),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn late_grant_for_unmounted_session_is_handed_back() {
        let platform = SimulatedPlatform::new();
        let log = platform.call_log();
        let mut host = SessionHost::new(SessionSettings::default(), |_| platform);
        let id = host.mount(MediaResource::video("a.mp4"));
        host.unmount(id);

        host.deliver(Envelope::platform(
            id,
            PlatformEvent::Granted(ExclusiveResource::Fullscreen),
        ))
        .expect("deliver");

        assert!(log
            .calls()
            .contains(&PlatformCall::Exit(id, ExclusiveResource::Fullscreen)));
        assert_eq!(host.bridge().holder(ExclusiveResource::Fullscreen), None);
    }
}
