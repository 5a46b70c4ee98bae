// SPDX-License-Identifier: MPL-2.0
//! Auto-hide timer for on-screen playback controls.
//!
//! While a session is playing, controls hide after a period without user
//! activity. The timer is a tokio task sleeping until the deadline, which
//! then posts a [`SessionMessage::ControlsTimeout`](super::SessionMessage)
//! tagged with the timer's generation. At most one task is alive per
//! session: every reschedule aborts the previous one first, and an
//! expiration carrying an older generation is discarded.

use super::message::{Envelope, MessageSender, SessionId};
use crate::domain::playback::{ControlsHideDelay, PlaybackStatus};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// The live auto-hide timer of a session.
#[derive(Debug)]
pub struct TimerHandle {
    generation: u64,
    deadline: Instant,
    task: AbortHandle,
}

impl TimerHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// Controls visibility plus the single timer driving it.
#[derive(Debug)]
pub struct ControlVisibilityTimer {
    session: SessionId,
    sender: MessageSender,
    delay: Duration,
    visible: bool,
    active: Option<TimerHandle>,
    generation: u64,
}

impl ControlVisibilityTimer {
    pub fn new(session: SessionId, sender: MessageSender, delay: ControlsHideDelay) -> Self {
        Self {
            session,
            sender,
            delay: delay.as_duration(),
            visible: true,
            active: None,
            generation: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the live timer, if one is armed.
    pub fn active(&self) -> Option<&TimerHandle> {
        self.active.as_ref()
    }

    /// Records user activity: shows controls and restarts the deadline if
    /// the session is playing.
    pub fn reset(&mut self, status: PlaybackStatus) {
        self.cancel();
        self.visible = true;
        if status.is_playing() {
            self.arm();
        }
    }

    /// Aligns the timer with a status change that was not user activity,
    /// such as playback reaching the end.
    pub fn sync(&mut self, status: PlaybackStatus) {
        if !status.is_playing() {
            self.cancel();
            self.visible = true;
        } else if self.visible && self.active.is_none() {
            self.arm();
        }
    }

    /// Manual show/hide. Outside playback controls stay visible.
    pub fn toggle(&mut self, status: PlaybackStatus) {
        if !status.is_playing() {
            self.visible = true;
            return;
        }
        if self.visible {
            self.cancel();
            self.visible = false;
        } else {
            self.reset(status);
        }
    }

    /// Handles an expiration posted by a timer task.
    ///
    /// Returns true if the controls were hidden.
    pub fn on_timeout(&mut self, generation: u64, status: PlaybackStatus) -> bool {
        match &self.active {
            Some(handle) if handle.generation == generation => {
                self.active = None;
                if status.is_playing() {
                    self.visible = false;
                    log::debug!("{}: controls hidden after inactivity", self.session);
                    true
                } else {
                    false
                }
            }
            _ => {
                log::debug!(
                    "{}: discarding stale controls timeout #{generation}",
                    self.session
                );
                false
            }
        }
    }

    /// Aborts the live timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.task.abort();
        }
    }

    fn arm(&mut self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!(
                "{}: no tokio runtime, controls will not auto-hide",
                self.session
            );
            return;
        };

        self.generation += 1;
        let generation = self.generation;
        let deadline = Instant::now() + self.delay;
        let session = self.session;
        let sender = self.sender.clone();

        let task = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if sender
                .send(Envelope::controls_timeout(session, generation))
                .is_err()
            {
                log::debug!("{session}: host channel closed, dropping controls timeout");
            }
        });

        self.active = Some(TimerHandle {
            generation,
            deadline,
            task: task.abort_handle(),
        });
    }
}

impl Drop for ControlVisibilityTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::message::{channel, SessionMessage};
    use PlaybackStatus::*;

    fn timer() -> (ControlVisibilityTimer, crate::player::message::MessageReceiver) {
        let (tx, rx) = channel();
        (
            ControlVisibilityTimer::new(SessionId::next(), tx, ControlsHideDelay::default()),
            rx,
        )
    }

    #[test]
    fn starts_visible_without_timer() {
        let (timer, _rx) = timer();
        assert!(timer.is_visible());
        assert!(timer.active().is_none());
    }

    #[test]
    fn reset_without_runtime_keeps_controls_visible() {
        let (mut timer, _rx) = timer();
        timer.reset(Playing);
        assert!(timer.is_visible());
        assert!(timer.active().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_while_not_playing_arms_nothing() {
        let (mut timer, _rx) = timer();
        for status in [Idle, Loading, Ready, Paused, Ended, Error] {
            timer.reset(status);
            assert!(timer.is_visible());
            assert!(timer.active().is_none(), "no timer while {status}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reset_while_playing_arms_deadline() {
        let (mut timer, _rx) = timer();
        let before = Instant::now();
        timer.reset(Playing);

        let handle = timer.active().expect("timer armed");
        assert_eq!(handle.deadline() - before, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_replaces_generation() {
        let (mut timer, mut rx) = timer();
        timer.reset(Playing);
        let first = timer.active().map(TimerHandle::generation).expect("armed");
        timer.reset(Playing);
        let second = timer.active().map(TimerHandle::generation).expect("armed");
        assert_ne!(first, second);

        // Only the live timer ever reports.
        let env = rx.recv().await.expect("timeout");
        assert_eq!(
            env.message,
            SessionMessage::ControlsTimeout { generation: second }
        );
        assert!(timer.on_timeout(second, Playing));
        assert!(!timer.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timeout_is_discarded() {
        let (mut timer, _rx) = timer();
        timer.reset(Playing);
        let stale = timer.active().map(TimerHandle::generation).expect("armed");
        timer.reset(Playing);

        assert!(!timer.on_timeout(stale, Playing));
        assert!(timer.is_visible());
        assert!(timer.active().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_toggle_hides_and_rearms() {
        let (mut timer, _rx) = timer();
        timer.reset(Playing);

        timer.toggle(Playing);
        assert!(!timer.is_visible());
        assert!(timer.active().is_none());

        timer.toggle(Playing);
        assert!(timer.is_visible());
        assert!(timer.active().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_toggle_keeps_controls_visible_when_paused() {
        let (mut timer, _rx) = timer();
        timer.toggle(Paused);
        assert!(timer.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn sync_to_non_playing_cancels_and_shows() {
        let (mut timer, mut rx) = timer();
        timer.reset(Playing);
        timer.sync(Ended);

        assert!(timer.is_visible());
        assert!(timer.active().is_none());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_after_host_shutdown_is_dropped_quietly() {
        let (mut timer, rx) = timer();
        drop(rx);
        timer.reset(Playing);

        tokio::time::sleep(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;

        let handle = timer.active().expect("still the live timer");
        assert!(handle.task.is_finished());
        assert!(timer.is_visible());
    }
}
