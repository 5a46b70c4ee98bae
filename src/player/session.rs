// SPDX-License-Identifier: MPL-2.0
//! Playback session: one mounted player bound to one media resource.
//!
//! The session owns its [`PlaybackStatus`] and orthogonal attributes
//! (position, volume, rate), its controls auto-hide timer and its shortcut
//! listener. Commands run to completion synchronously; platform outcomes
//! (metadata, grants, releases) and timer expirations come back later
//! through [`PlaybackSession::update`].
//!
//! Fullscreen and picture-in-picture are not stored here. The bridge's
//! holder registry is the single source of truth and the snapshot reads
//! from it.

use super::bridge::{MediaCommand, PlatformMediaBridge, RequestOutcome};
use super::controls::ControlVisibilityTimer;
use super::input::{Command, InputDispatcher, Key, Pointer};
use super::message::{MessageSender, PlatformEvent, SessionId, SessionMessage};
use super::registry::ActiveSessionRegistry;
use crate::config::{SessionSettings, UNMUTE_FALLBACK_VOLUME};
use crate::domain::media::MediaResource;
use crate::domain::playback::progress::{clamp_fraction, format_time, fraction_of};
use crate::domain::playback::{ExclusiveResource, PlaybackRate, PlaybackStatus, Trigger, Volume};
use crate::error::{Error, LoadError, Result};

/// Shared collaborators handed to every session of a host.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub bridge: PlatformMediaBridge,
    pub registry: ActiveSessionRegistry,
    pub sender: MessageSender,
    pub settings: SessionSettings,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub id: SessionId,
    pub status: PlaybackStatus,
    pub current_time_secs: f64,
    pub duration_secs: f64,
    pub volume: f32,
    pub muted: bool,
    pub playback_rate: f64,
    pub fullscreen: bool,
    pub picture_in_picture: bool,
    pub controls_visible: bool,
    /// User-visible message while `status` is `Error`.
    pub error_message: Option<String>,
    /// Message-catalog key matching `error_message`.
    pub error_key: Option<&'static str>,
}

impl PlaybackSnapshot {
    /// Position as a fraction of the duration, for the progress bar.
    pub fn progress(&self) -> f64 {
        fraction_of(self.current_time_secs, self.duration_secs)
    }

    /// `"M:SS / M:SS"` time label.
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.current_time_secs),
            format_time(self.duration_secs)
        )
    }
}

/// A mounted playback session.
#[derive(Debug)]
pub struct PlaybackSession {
    id: SessionId,
    bridge: PlatformMediaBridge,
    resource: Option<MediaResource>,
    status: PlaybackStatus,
    current_time: f64,
    duration: f64,
    volume: Volume,
    last_non_zero_volume: Option<Volume>,
    playback_rate: PlaybackRate,
    error: Option<LoadError>,
    controls: ControlVisibilityTimer,
    input: InputDispatcher,
    torn_down: bool,
}

impl PlaybackSession {
    /// Mounts an idle session and attaches its shortcut listener.
    ///
    /// The new session becomes the one receiving keyboard shortcuts.
    pub fn new(ctx: &SessionContext) -> Self {
        let id = SessionId::next();
        let input = InputDispatcher::attach(id, ctx.registry.clone(), ctx.settings.seek_step);
        ctx.registry.activate(id);
        let volume = ctx.settings.initial_volume;

        log::debug!("{id}: mounted");
        Self {
            id,
            bridge: ctx.bridge.clone(),
            resource: None,
            status: PlaybackStatus::Idle,
            current_time: 0.0,
            duration: 0.0,
            volume,
            last_non_zero_volume: (!volume.is_silent()).then_some(volume),
            playback_rate: PlaybackRate::default(),
            error: None,
            controls: ControlVisibilityTimer::new(id, ctx.sender.clone(), ctx.settings.hide_delay),
            input,
            torn_down: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn resource(&self) -> Option<&MediaResource> {
        self.resource.as_ref()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            id: self.id,
            status: self.status,
            current_time_secs: self.current_time,
            duration_secs: self.duration,
            volume: self.volume.value(),
            muted: self.is_muted(),
            playback_rate: self.playback_rate.value(),
            fullscreen: self.bridge.is_held_by(ExclusiveResource::Fullscreen, self.id),
            picture_in_picture: self
                .bridge
                .is_held_by(ExclusiveResource::PictureInPicture, self.id),
            controls_visible: self.controls.is_visible(),
            error_message: self.error.as_ref().map(ToString::to_string),
            error_key: self.error.as_ref().map(LoadError::i18n_key),
        }
    }

    /// Returns the controls auto-hide timer.
    pub fn controls(&self) -> &ControlVisibilityTimer {
        &self.controls
    }

    fn is_muted(&self) -> bool {
        self.volume.is_silent()
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Binds a new media resource and starts loading it.
    ///
    /// Any timer is cleared and held exclusive resources are handed back.
    /// A resource without URL fails immediately and leaves the session in
    /// `Error`.
    pub fn bind(&mut self, resource: MediaResource) -> Result<()> {
        self.controls.cancel();
        self.bridge.relinquish(self.id);
        if self.resource.is_some() {
            self.bridge.unload(self.id);
        }

        self.current_time = 0.0;
        self.duration = 0.0;
        self.error = None;
        self.transition(Trigger::Bind);

        if !resource.has_url() {
            self.resource = None;
            self.fail(LoadError::MissingUrl);
            return Err(LoadError::MissingUrl.into());
        }

        log::debug!("{}: loading {}", self.id, resource.url());
        self.bridge.load(self.id, &resource);
        self.resource = Some(resource);
        self.controls.sync(self.status);
        Ok(())
    }

    /// Starts playback. Playing an ended media restarts it from the beginning.
    pub fn play(&mut self) {
        let from_end = self.status == PlaybackStatus::Ended;
        if self.transition(Trigger::Play) {
            if from_end {
                self.current_time = 0.0;
                self.send(MediaCommand::Seek { position_secs: 0.0 });
            }
            self.send(MediaCommand::Play);
        }
        self.controls.reset(self.status);
    }

    pub fn pause(&mut self) {
        if self.transition(Trigger::Pause) {
            self.send(MediaCommand::Pause);
        }
        self.controls.reset(self.status);
    }

    pub fn toggle(&mut self) {
        if self.status.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seeks to `fraction` of the duration, clamped to `[0, 1]`.
    ///
    /// Does nothing until the duration is known.
    pub fn seek(&mut self, fraction: f64) {
        if self.status.has_media() && self.duration > 0.0 {
            self.current_time = clamp_fraction(fraction) * self.duration;
            self.send(MediaCommand::Seek {
                position_secs: self.current_time,
            });
            if self.status == PlaybackStatus::Ended
                && self.current_time < self.duration
                && self.transition(Trigger::SeekBeforeEnd)
            {
                self.send(MediaCommand::Play);
            }
        }
        self.controls.reset(self.status);
    }

    /// Seeks relative to the current position.
    pub fn seek_by(&mut self, delta_secs: f64) {
        let target = fraction_of(self.current_time + delta_secs, self.duration);
        self.seek(target);
    }

    /// Sets the volume, clamped to `[0, 1]`. Zero mutes.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        if !volume.is_finite() {
            return Err(Error::InvalidArgument(format!("volume {volume}")));
        }
        let volume = Volume::new(volume);
        if !volume.is_silent() {
            self.last_non_zero_volume = Some(volume);
        }
        self.apply_volume(volume);
        self.controls.reset(self.status);
        Ok(())
    }

    pub fn toggle_mute(&mut self) {
        let volume = if self.is_muted() {
            self.last_non_zero_volume
                .unwrap_or(Volume::new(UNMUTE_FALLBACK_VOLUME))
        } else {
            self.last_non_zero_volume = Some(self.volume);
            Volume::ZERO
        };
        self.apply_volume(volume);
        self.controls.reset(self.status);
    }

    /// Sets the playback rate. Only the preset rates are accepted.
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        self.controls.reset(self.status);
        let rate = PlaybackRate::try_new(rate).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "playback rate {rate} (expected one of {:?})",
                PlaybackRate::presets()
            ))
        })?;
        self.playback_rate = rate;
        self.send(MediaCommand::SetRate(rate.value()));
        Ok(())
    }

    /// Requests or exits fullscreen. The flag flips once the platform confirms.
    pub fn toggle_fullscreen(&mut self) -> Result<RequestOutcome> {
        self.toggle_exclusive(ExclusiveResource::Fullscreen)
    }

    /// Requests or exits picture-in-picture. The flag flips once the platform confirms.
    pub fn toggle_picture_in_picture(&mut self) -> Result<RequestOutcome> {
        self.toggle_exclusive(ExclusiveResource::PictureInPicture)
    }

    /// Pointer activity over the player.
    pub fn notify_activity(&mut self) {
        self.controls.reset(self.status);
    }

    /// Manually shows or hides the controls.
    pub fn toggle_controls(&mut self) {
        self.controls.toggle(self.status);
    }

    /// Executes a command from the shared command vocabulary.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Bind(resource) => self.bind(resource)?,
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Toggle => self.toggle(),
            Command::Seek(fraction) => self.seek(fraction),
            Command::SeekBy(delta) => self.seek_by(delta),
            Command::SetVolume(volume) => self.set_volume(volume)?,
            Command::ToggleMute => self.toggle_mute(),
            Command::SetPlaybackRate(rate) => self.set_playback_rate(rate)?,
            Command::ToggleFullscreen => {
                self.toggle_fullscreen()?;
            }
            Command::TogglePictureInPicture => {
                self.toggle_picture_in_picture()?;
            }
            Command::ToggleControls => self.toggle_controls(),
            Command::NotifyActivity => self.notify_activity(),
        }
        Ok(())
    }

    /// Handles a document-wide key press.
    ///
    /// Returns `Ok(false)` if the key was not bound to a command. An unbound
    /// key still counts as activity for the active session.
    pub fn handle_key(&mut self, key: Key) -> Result<bool> {
        match self.input.translate_key(key) {
            Some(command) => {
                self.execute(command)?;
                Ok(true)
            }
            None => {
                if self.input.is_live() {
                    self.controls.reset(self.status);
                }
                Ok(false)
            }
        }
    }

    /// Handles a pointer gesture over this session's player.
    pub fn handle_pointer(&mut self, pointer: Pointer) -> Result<()> {
        let command = self.input.translate_pointer(pointer);
        self.execute(command)
    }

    /// Returns true if keyboard shortcuts currently reach this session.
    pub fn receives_shortcuts(&self) -> bool {
        self.input.is_live()
    }

    // ---------------------------------------------------------------------
    // Deferred outcomes
    // ---------------------------------------------------------------------

    /// Applies a message delivered by the host event loop.
    ///
    /// Returns the platform's refusal when a fullscreen or picture-in-picture
    /// request was denied. The denial is a notice only; nothing changes.
    pub fn update(&mut self, message: SessionMessage) -> Result<()> {
        match message {
            SessionMessage::ControlsTimeout { generation } => {
                self.controls.on_timeout(generation, self.status);
                Ok(())
            }
            SessionMessage::Platform(event) => self.on_platform_event(event),
        }
    }

    fn on_platform_event(&mut self, event: PlatformEvent) -> Result<()> {
        match event {
            PlatformEvent::MetadataLoaded { duration_secs } => {
                if self.transition(Trigger::MetadataReady) {
                    self.duration = if duration_secs.is_finite() && duration_secs > 0.0 {
                        duration_secs
                    } else {
                        0.0
                    };
                    self.current_time = 0.0;
                    self.send(MediaCommand::SetVolume(self.volume.value()));
                    self.send(MediaCommand::SetMuted(self.is_muted()));
                    self.send(MediaCommand::SetRate(self.playback_rate.value()));
                    self.controls.sync(self.status);
                }
            }
            PlatformEvent::TimeUpdate { position_secs } => {
                if self.status.has_media() && position_secs.is_finite() {
                    self.current_time = position_secs.clamp(0.0, self.duration);
                }
            }
            PlatformEvent::Playing => {
                let from_end = self.status == PlaybackStatus::Ended;
                if self.transition(Trigger::Play) {
                    if from_end {
                        self.current_time = 0.0;
                    }
                    self.controls.sync(self.status);
                }
            }
            PlatformEvent::Paused => {
                if self.transition(Trigger::Pause) {
                    self.controls.sync(self.status);
                }
            }
            PlatformEvent::Ended => {
                if self.transition(Trigger::ReachedEnd) {
                    self.current_time = self.duration;
                    self.controls.sync(self.status);
                }
            }
            PlatformEvent::LoadFailed(message) => {
                let error = LoadError::from_message(&message);
                if self.status.next(Trigger::LoadFailed).is_some() {
                    self.fail(error);
                } else {
                    log::debug!("{}: ignoring load failure while {}", self.id, self.status);
                }
            }
            PlatformEvent::Granted(resource) => {
                self.bridge.confirm_granted(self.id, resource);
            }
            PlatformEvent::Denied { resource, reason } => {
                return Err(self.bridge.confirm_denied(self.id, resource, reason).into());
            }
            PlatformEvent::Released(resource) => {
                self.bridge.confirm_released(self.id, resource);
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Teardown
    // ---------------------------------------------------------------------

    /// Unmounts the session.
    ///
    /// The timer is cancelled before anything else, then held resources are
    /// released and the shortcut listener is detached.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.controls.cancel();
        self.bridge.release_on_teardown(self.id);
        if self.resource.take().is_some() {
            self.bridge.unload(self.id);
        }
        self.input.detach();
        log::debug!("{}: unmounted", self.id);
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    /// Applies `trigger` through the status state machine.
    ///
    /// Returns true if the trigger applied.
    fn transition(&mut self, trigger: Trigger) -> bool {
        match self.status.next(trigger) {
            Some(next) => {
                if next != self.status {
                    log::debug!("{}: {} -> {next}", self.id, self.status);
                }
                self.status = next;
                true
            }
            None => {
                log::debug!("{}: {trigger:?} ignored while {}", self.id, self.status);
                false
            }
        }
    }

    fn fail(&mut self, error: LoadError) {
        log::warn!("{}: load failed: {error}", self.id);
        if self.transition(Trigger::LoadFailed) {
            self.error = Some(error);
        }
        self.controls.sync(self.status);
    }

    fn apply_volume(&mut self, volume: Volume) {
        self.volume = volume;
        self.send(MediaCommand::SetVolume(volume.value()));
        self.send(MediaCommand::SetMuted(volume.is_silent()));
    }

    fn send(&self, command: MediaCommand) {
        self.bridge.send(self.id, command);
    }

    fn toggle_exclusive(&mut self, resource: ExclusiveResource) -> Result<RequestOutcome> {
        let outcome = self.bridge.toggle(self.id, resource);
        self.controls.reset(self.status);
        outcome.map_err(|err| {
            log::warn!("{}: {err}", self.id);
            Error::from(err)
        })
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
