// SPDX-License-Identifier: MPL-2.0
//! Façade over the platform media subsystem.
//!
//! The bridge forwards load and transport commands to the platform and owns
//! the process-wide registry of which session holds fullscreen and which
//! holds picture-in-picture. Holder changes happen only when the platform
//! confirms them through [`PlatformEvent`](super::PlatformEvent)s routed back
//! by the host.
//!
//! The bridge is shared by every session of one host via `Rc<RefCell<_>>`.
//! It is `!Send`: all mutation happens on the host's event loop,
//! one message at a time.

use super::message::SessionId;
use crate::domain::media::MediaResource;
use crate::domain::playback::ExclusiveResource;
use crate::error::CapabilityError;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Transport commands forwarded to the platform's media element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaCommand {
    Play,
    Pause,
    Seek { position_secs: f64 },
    SetVolume(f32),
    SetMuted(bool),
    SetRate(f64),
}

/// Platform media primitives.
///
/// Every method returns immediately. Outcomes of `load`, `request` and `exit`
/// are reported later as platform events posted on the host's channel.
/// Implementations must not call back into the bridge synchronously.
pub trait MediaPlatform {
    /// Starts loading `resource` into the session's media element.
    fn load(&mut self, session: SessionId, resource: &MediaResource);

    /// Detaches the session's media element.
    fn unload(&mut self, session: SessionId);

    /// Forwards a transport command.
    fn send(&mut self, session: SessionId, command: MediaCommand);

    /// Asks the platform to give `resource` to `session`.
    ///
    /// An `Err` means the capability is missing and nothing was requested.
    fn request(
        &mut self,
        session: SessionId,
        resource: ExclusiveResource,
    ) -> Result<(), CapabilityError>;

    /// Asks the platform to take `resource` back from `session`.
    fn exit(
        &mut self,
        session: SessionId,
        resource: ExclusiveResource,
    ) -> Result<(), CapabilityError>;
}

/// A grant or release awaiting platform confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTransition {
    Enter(SessionId),
    Exit(SessionId),
}

impl PendingTransition {
    fn session(self) -> SessionId {
        match self {
            Self::Enter(session) | Self::Exit(session) => session,
        }
    }
}

/// What became of a fullscreen or picture-in-picture toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The platform was asked; the flag flips when it confirms.
    Pending,
    /// Nothing was sent: another transition of the resource is in flight,
    /// or the session asked to exit a resource it does not hold.
    Ignored,
}

#[derive(Debug, Default, Clone, Copy)]
struct ResourceSlot {
    holder: Option<SessionId>,
    in_flight: Option<PendingTransition>,
}

struct BridgeInner {
    platform: Box<dyn MediaPlatform>,
    fullscreen: ResourceSlot,
    picture_in_picture: ResourceSlot,
}

impl BridgeInner {
    fn slot(&self, resource: ExclusiveResource) -> &ResourceSlot {
        match resource {
            ExclusiveResource::Fullscreen => &self.fullscreen,
            ExclusiveResource::PictureInPicture => &self.picture_in_picture,
        }
    }

    fn slot_mut(&mut self, resource: ExclusiveResource) -> &mut ResourceSlot {
        match resource {
            ExclusiveResource::Fullscreen => &mut self.fullscreen,
            ExclusiveResource::PictureInPicture => &mut self.picture_in_picture,
        }
    }
}

/// Shared handle to the platform façade and the exclusive-resource registry.
#[derive(Clone)]
pub struct PlatformMediaBridge {
    inner: Rc<RefCell<BridgeInner>>,
}

impl PlatformMediaBridge {
    pub fn new(platform: impl MediaPlatform + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BridgeInner {
                platform: Box::new(platform),
                fullscreen: ResourceSlot::default(),
                picture_in_picture: ResourceSlot::default(),
            })),
        }
    }

    /// Returns the session currently holding `resource`.
    pub fn holder(&self, resource: ExclusiveResource) -> Option<SessionId> {
        self.inner.borrow().slot(resource).holder
    }

    pub fn is_held_by(&self, resource: ExclusiveResource, session: SessionId) -> bool {
        self.holder(resource) == Some(session)
    }

    /// Returns the transition of `resource` awaiting confirmation, if any.
    pub fn in_flight(&self, resource: ExclusiveResource) -> Option<PendingTransition> {
        self.inner.borrow().slot(resource).in_flight
    }

    // ---------------------------------------------------------------------
    // Media element
    // ---------------------------------------------------------------------

    pub fn load(&self, session: SessionId, resource: &MediaResource) {
        self.inner.borrow_mut().platform.load(session, resource);
    }

    pub fn unload(&self, session: SessionId) {
        self.inner.borrow_mut().platform.unload(session);
    }

    pub fn send(&self, session: SessionId, command: MediaCommand) {
        self.inner.borrow_mut().platform.send(session, command);
    }

    // ---------------------------------------------------------------------
    // Exclusive resources
    // ---------------------------------------------------------------------

    /// Requests `resource` for `session` if it does not hold it, exits otherwise.
    pub fn toggle(
        &self,
        session: SessionId,
        resource: ExclusiveResource,
    ) -> Result<RequestOutcome, CapabilityError> {
        if self.is_held_by(resource, session) {
            self.exit(session, resource)
        } else {
            self.request(session, resource)
        }
    }

    /// Asks the platform to grant `resource` to `session`.
    ///
    /// The current holder, if any, keeps the resource until the platform
    /// confirms the grant; a denial leaves every holder untouched.
    pub fn request(
        &self,
        session: SessionId,
        resource: ExclusiveResource,
    ) -> Result<RequestOutcome, CapabilityError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(pending) = inner.slot(resource).in_flight {
            log::debug!("{session}: {resource} request ignored, {pending:?} in flight");
            return Ok(RequestOutcome::Ignored);
        }
        if inner.slot(resource).holder == Some(session) {
            return Ok(RequestOutcome::Ignored);
        }

        inner.platform.request(session, resource)?;
        inner.slot_mut(resource).in_flight = Some(PendingTransition::Enter(session));
        log::debug!("{session}: requested {resource}");
        Ok(RequestOutcome::Pending)
    }

    /// Asks the platform to take `resource` back from `session`.
    ///
    /// Only the holder may exit; other sessions are ignored.
    pub fn exit(
        &self,
        session: SessionId,
        resource: ExclusiveResource,
    ) -> Result<RequestOutcome, CapabilityError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(pending) = inner.slot(resource).in_flight {
            log::debug!("{session}: {resource} exit ignored, {pending:?} in flight");
            return Ok(RequestOutcome::Ignored);
        }
        if inner.slot(resource).holder != Some(session) {
            return Ok(RequestOutcome::Ignored);
        }

        inner.platform.exit(session, resource)?;
        inner.slot_mut(resource).in_flight = Some(PendingTransition::Exit(session));
        log::debug!("{session}: requested {resource} exit");
        Ok(RequestOutcome::Pending)
    }

    /// Records a grant confirmed by the platform.
    ///
    /// The previous holder, if any, implicitly lost the resource.
    /// Returns true if the holder changed.
    pub fn confirm_granted(&self, session: SessionId, resource: ExclusiveResource) -> bool {
        let mut inner = self.inner.borrow_mut();
        let slot = inner.slot_mut(resource);

        if slot.in_flight == Some(PendingTransition::Enter(session)) {
            slot.in_flight = None;
        } else {
            log::debug!("{session}: unsolicited {resource} grant, following the platform");
        }

        let previous = slot.holder.replace(session);
        match previous {
            Some(prev) if prev == session => false,
            Some(prev) => {
                log::info!("{resource} moved from {prev} to {session}");
                true
            }
            None => {
                log::info!("{session}: entered {resource}");
                true
            }
        }
    }

    /// Records a refusal reported by the platform and returns it as a notice.
    ///
    /// Holders are left unchanged.
    pub fn confirm_denied(
        &self,
        session: SessionId,
        resource: ExclusiveResource,
        reason: impl Into<String>,
    ) -> CapabilityError {
        let reason = reason.into();
        let mut inner = self.inner.borrow_mut();
        let slot = inner.slot_mut(resource);
        if slot.in_flight.map(PendingTransition::session) == Some(session) {
            slot.in_flight = None;
        }
        log::warn!("{session}: {resource} denied: {reason}");
        CapabilityError::Denied { resource, reason }
    }

    /// Records that `session` no longer holds `resource`.
    ///
    /// Covers both confirmed exits and exits the platform performed on its
    /// own. Returns true if the holder changed.
    pub fn confirm_released(&self, session: SessionId, resource: ExclusiveResource) -> bool {
        let mut inner = self.inner.borrow_mut();
        let slot = inner.slot_mut(resource);
        if slot.in_flight == Some(PendingTransition::Exit(session)) {
            slot.in_flight = None;
        }
        if slot.holder == Some(session) {
            slot.holder = None;
            log::info!("{session}: left {resource}");
            true
        } else {
            false
        }
    }

    /// Asks the platform to release every resource `session` holds.
    ///
    /// Used when a session is rebound: the flags flip once the platform
    /// confirms, like any other exit.
    pub fn relinquish(&self, session: SessionId) {
        for resource in ExclusiveResource::ALL {
            if self.is_held_by(resource, session) {
                if let Err(err) = self.exit(session, resource) {
                    log::warn!("{session}: could not release {resource}: {err}");
                }
            }
        }
    }

    /// Drops every claim `session` has on the registry.
    ///
    /// The platform is asked to release held resources, best-effort: the
    /// session is going away and cannot observe the confirmation, so the
    /// holder is cleared right away and failures are only logged.
    pub fn release_on_teardown(&self, session: SessionId) {
        let mut inner = self.inner.borrow_mut();
        for resource in ExclusiveResource::ALL {
            let slot = *inner.slot(resource);
            if slot.in_flight.map(PendingTransition::session) == Some(session) {
                inner.slot_mut(resource).in_flight = None;
            }
            if slot.holder == Some(session) {
                let exiting = slot.in_flight == Some(PendingTransition::Exit(session));
                if !exiting {
                    if let Err(err) = inner.platform.exit(session, resource) {
                        log::warn!("{session}: best-effort {resource} release failed: {err}");
                    }
                }
                inner.slot_mut(resource).holder = None;
                log::info!("{session}: released {resource} on teardown");
            }
        }
    }

    /// Hands back a resource the platform granted to a session that no
    /// longer exists.
    pub fn release_orphan(&self, session: SessionId, resource: ExclusiveResource) {
        let mut inner = self.inner.borrow_mut();
        if let Err(err) = inner.platform.exit(session, resource) {
            log::warn!("{session}: orphaned {resource} release failed: {err}");
        }
        if inner.slot(resource).holder == Some(session) {
            inner.slot_mut(resource).holder = None;
        }
    }
}

impl fmt::Debug for PlatformMediaBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PlatformMediaBridge")
            .field("fullscreen", &inner.fullscreen.holder)
            .field("picture_in_picture", &inner.picture_in_picture.holder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::simulated::{PlatformCall, SimulatedPlatform, Support};

    const FS: ExclusiveResource = ExclusiveResource::Fullscreen;
    const PIP: ExclusiveResource = ExclusiveResource::PictureInPicture;

    fn bridge() -> (PlatformMediaBridge, crate::player::simulated::CallLog) {
        let platform = SimulatedPlatform::new();
        let log = platform.call_log();
        (PlatformMediaBridge::new(platform), log)
    }

    #[test]
    fn request_is_pending_until_granted() {
        let (bridge, log) = bridge();
        let a = SessionId::next();

        assert_eq!(bridge.request(a, FS), Ok(RequestOutcome::Pending));
        assert_eq!(bridge.holder(FS), None);
        assert_eq!(bridge.in_flight(FS), Some(PendingTransition::Enter(a)));
        assert!(log.calls().contains(&PlatformCall::Request(a, FS)));

        assert!(bridge.confirm_granted(a, FS));
        assert_eq!(bridge.holder(FS), Some(a));
        assert_eq!(bridge.in_flight(FS), None);
    }

    #[test]
    fn second_request_is_debounced_while_in_flight() {
        let (bridge, log) = bridge();
        let a = SessionId::next();
        let b = SessionId::next();

        bridge.request(a, FS).expect("request");
        assert_eq!(bridge.request(b, FS), Ok(RequestOutcome::Ignored));
        assert_eq!(bridge.toggle(a, FS), Ok(RequestOutcome::Ignored));
        let requests = log
            .calls()
            .into_iter()
            .filter(|c| matches!(c, PlatformCall::Request(..)))
            .count();
        assert_eq!(requests, 1);
    }

    #[test]
    fn grant_to_other_session_displaces_holder() {
        let (bridge, _log) = bridge();
        let a = SessionId::next();
        let b = SessionId::next();

        bridge.request(a, FS).expect("request");
        bridge.confirm_granted(a, FS);

        bridge.request(b, FS).expect("request");
        assert_eq!(bridge.holder(FS), Some(a), "holder unchanged until grant");
        assert!(bridge.confirm_granted(b, FS));
        assert!(!bridge.is_held_by(FS, a));
        assert!(bridge.is_held_by(FS, b));
    }

    #[test]
    fn denial_leaves_holders_unchanged() {
        let (bridge, _log) = bridge();
        let a = SessionId::next();
        let b = SessionId::next();

        bridge.request(a, FS).expect("request");
        bridge.confirm_granted(a, FS);
        bridge.request(b, FS).expect("request");

        let notice = bridge.confirm_denied(b, FS, "user declined");
        assert_eq!(notice.resource(), FS);
        assert_eq!(bridge.holder(FS), Some(a));
        assert_eq!(bridge.in_flight(FS), None);
    }

    #[test]
    fn unsupported_capability_fails_synchronously() {
        let platform = SimulatedPlatform::new().with_picture_in_picture(Support::Unsupported);
        let bridge = PlatformMediaBridge::new(platform);
        let a = SessionId::next();

        assert_eq!(
            bridge.request(a, PIP),
            Err(CapabilityError::Unsupported(PIP))
        );
        assert_eq!(bridge.in_flight(PIP), None);
        assert_eq!(bridge.holder(PIP), None);
    }

    #[test]
    fn only_holder_may_exit() {
        let (bridge, log) = bridge();
        let a = SessionId::next();
        let b = SessionId::next();
        bridge.request(a, FS).expect("request");
        bridge.confirm_granted(a, FS);

        assert_eq!(bridge.exit(b, FS), Ok(RequestOutcome::Ignored));
        assert!(!log.calls().contains(&PlatformCall::Exit(b, FS)));

        assert_eq!(bridge.toggle(a, FS), Ok(RequestOutcome::Pending));
        assert!(bridge.is_held_by(FS, a), "exit needs confirmation");
        assert!(bridge.confirm_released(a, FS));
        assert_eq!(bridge.holder(FS), None);
    }

    #[test]
    fn release_from_non_holder_changes_nothing() {
        let (bridge, _log) = bridge();
        let a = SessionId::next();
        let b = SessionId::next();
        bridge.confirm_granted(a, PIP);

        assert!(!bridge.confirm_released(b, PIP));
        assert_eq!(bridge.holder(PIP), Some(a));
    }

    #[test]
    fn resources_are_tracked_independently() {
        let (bridge, _log) = bridge();
        let a = SessionId::next();
        let b = SessionId::next();

        bridge.request(a, FS).expect("request");
        assert_eq!(bridge.request(b, PIP), Ok(RequestOutcome::Pending));
        bridge.confirm_granted(a, FS);
        bridge.confirm_granted(b, PIP);

        assert_eq!(bridge.holder(FS), Some(a));
        assert_eq!(bridge.holder(PIP), Some(b));
    }

    #[test]
    fn teardown_releases_holder_immediately() {
        let (bridge, log) = bridge();
        let a = SessionId::next();
        bridge.confirm_granted(a, FS);
        bridge.request(a, PIP).expect("request");

        bridge.release_on_teardown(a);

        assert_eq!(bridge.holder(FS), None);
        assert_eq!(bridge.in_flight(PIP), None);
        assert!(log.calls().contains(&PlatformCall::Exit(a, FS)));
    }

    #[test]
    fn teardown_during_exit_does_not_exit_twice() {
        let (bridge, log) = bridge();
        let a = SessionId::next();
        bridge.confirm_granted(a, FS);
        assert_eq!(bridge.exit(a, FS), Ok(RequestOutcome::Pending));

        bridge.release_on_teardown(a);

        let exits = log
            .calls()
            .iter()
            .filter(|call| **call == PlatformCall::Exit(a, FS))
            .count();
        assert_eq!(exits, 1);
        assert_eq!(bridge.holder(FS), None);
        assert_eq!(bridge.in_flight(FS), None);
    }

    #[test]
    fn relinquish_requests_exit_for_held_resources() {
        let (bridge, log) = bridge();
        let a = SessionId::next();
        bridge.confirm_granted(a, PIP);

        bridge.relinquish(a);

        assert_eq!(bridge.in_flight(PIP), Some(PendingTransition::Exit(a)));
        assert!(log.calls().contains(&PlatformCall::Exit(a, PIP)));
        assert!(bridge.is_held_by(PIP, a));
    }
}
