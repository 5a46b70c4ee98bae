// SPDX-License-Identifier: MPL-2.0
//! Active-session registry for document-wide keyboard shortcuts.
//!
//! Every mounted player listens for shortcuts at document scope, but only
//! the session the user interacted with last is allowed to react. A newly
//! attached session becomes active when no other session is.

use super::message::SessionId;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct RegistryInner {
    attached: Vec<SessionId>,
    active: Option<SessionId>,
}

/// Shared handle to the registry. Cloning shares the same registry.
#[derive(Debug, Clone, Default)]
pub struct ActiveSessionRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ActiveSessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session's shortcut listener.
    ///
    /// Returns false, and changes nothing, if it was already attached.
    pub fn attach(&self, session: SessionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.attached.contains(&session) {
            log::warn!("{session}: shortcut listener already attached");
            return false;
        }
        inner.attached.push(session);
        if inner.active.is_none() {
            inner.active = Some(session);
        }
        true
    }

    /// Removes a session's shortcut listener. Returns false if it was not attached.
    pub fn detach(&self, session: SessionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.attached.len();
        inner.attached.retain(|&id| id != session);
        if inner.active == Some(session) {
            inner.active = None;
        }
        inner.attached.len() != before
    }

    /// Makes `session` the one receiving shortcuts. Ignored for detached sessions.
    pub fn activate(&self, session: SessionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.attached.contains(&session) {
            return false;
        }
        if inner.active != Some(session) {
            log::debug!("{session}: now receives keyboard shortcuts");
            inner.active = Some(session);
        }
        true
    }

    pub fn active(&self) -> Option<SessionId> {
        self.inner.borrow().active
    }

    pub fn is_active(&self, session: SessionId) -> bool {
        self.active() == Some(session)
    }

    pub fn is_attached(&self, session: SessionId) -> bool {
        self.inner.borrow().attached.contains(&session)
    }

    /// Number of attached listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
