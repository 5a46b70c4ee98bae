// SPDX-License-Identifier: MPL-2.0
//! Keyboard and pointer input translation.
//!
//! The dispatcher maps raw input to [`Command`]s for its session. Keyboard
//! shortcuts arrive at document scope and are only honoured while the
//! session is the active one in the [`ActiveSessionRegistry`]; any pointer
//! gesture over the player makes it the active one.

use super::message::SessionId;
use super::registry::ActiveSessionRegistry;
use crate::domain::media::MediaResource;
use crate::domain::playback::progress::fraction_at;
use crate::domain::playback::SeekStep;

/// A key press, named like `KeyboardEvent.key` in a browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    Char(char),
    Other,
}

impl Key {
    /// Parses a `KeyboardEvent.key`-style name (`" "`, `"ArrowLeft"`, `"k"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            " " | "Space" => Key::Space,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// Pointer gestures over the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pointer {
    Enter,
    Move,
    Leave,
    /// Click on the video surface itself.
    SurfaceClick,
    /// Click on the progress track at offset `x` of a track `width` wide.
    TrackClick { x: f64, width: f64 },
}

/// The session command surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Bind(MediaResource),
    Play,
    Pause,
    Toggle,
    /// Seek to a fraction of the duration.
    Seek(f64),
    /// Seek relative to the current position, in seconds.
    SeekBy(f64),
    SetVolume(f32),
    ToggleMute,
    SetPlaybackRate(f64),
    ToggleFullscreen,
    TogglePictureInPicture,
    ToggleControls,
    NotifyActivity,
}

/// Per-session input translator.
#[derive(Debug)]
pub struct InputDispatcher {
    session: SessionId,
    registry: ActiveSessionRegistry,
    seek_step: SeekStep,
    attached: bool,
}

impl InputDispatcher {
    /// Creates the dispatcher and attaches its shortcut listener.
    pub fn attach(session: SessionId, registry: ActiveSessionRegistry, seek_step: SeekStep) -> Self {
        let attached = registry.attach(session);
        Self {
            session,
            registry,
            seek_step,
            attached,
        }
    }

    /// Returns true if keyboard shortcuts currently reach this session.
    pub fn is_live(&self) -> bool {
        self.attached && self.registry.is_active(self.session)
    }

    /// Translates a document-wide key press.
    ///
    /// Returns `None` when the session is not the active one or the key has
    /// no binding.
    pub fn translate_key(&self, key: Key) -> Option<Command> {
        if !self.is_live() {
            return None;
        }
        let step = self.seek_step.value();
        match key {
            Key::Space | Key::Char('k') => Some(Command::Toggle),
            Key::Char('f') => Some(Command::ToggleFullscreen),
            Key::Char('m') => Some(Command::ToggleMute),
            Key::Char('c') => Some(Command::ToggleControls),
            Key::ArrowLeft => Some(Command::SeekBy(-step)),
            Key::ArrowRight => Some(Command::SeekBy(step)),
            Key::Char(_) | Key::Other => None,
        }
    }

    /// Translates a pointer gesture and makes this session the active one.
    pub fn translate_pointer(&self, pointer: Pointer) -> Command {
        if self.attached {
            self.registry.activate(self.session);
        }
        match pointer {
            Pointer::Enter | Pointer::Move | Pointer::Leave => Command::NotifyActivity,
            Pointer::SurfaceClick => Command::Toggle,
            Pointer::TrackClick { x, width } => Command::Seek(fraction_at(x, width)),
        }
    }

    /// Removes the shortcut listener. Safe to call more than once.
    pub fn detach(&mut self) {
        if self.attached {
            self.registry.detach(self.session);
            self.attached = false;
        }
    }
}

impl Drop for InputDispatcher {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    fn dispatcher(registry: &ActiveSessionRegistry) -> InputDispatcher {
        InputDispatcher::attach(SessionId::next(), registry.clone(), SeekStep::default())
    }

    #[test]
    fn key_names_parse_like_browser_keys() {
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_name("k"), Key::Char('k'));
        assert_eq!(Key::from_name("Escape"), Key::Other);
        assert_eq!(Key::from_name(""), Key::Other);
    }

    #[test]
    fn keyboard_table_maps_to_commands() {
        let registry = ActiveSessionRegistry::new();
        let input = dispatcher(&registry);

        assert_eq!(input.translate_key(Key::Space), Some(Command::Toggle));
        assert_eq!(input.translate_key(Key::Char('k')), Some(Command::Toggle));
        assert_eq!(input.translate_key(Key::Char('f')), Some(Command::ToggleFullscreen));
        assert_eq!(input.translate_key(Key::Char('m')), Some(Command::ToggleMute));
        assert_eq!(input.translate_key(Key::Char('c')), Some(Command::ToggleControls));
        assert_eq!(input.translate_key(Key::Char('x')), None);
        assert_eq!(input.translate_key(Key::Char('K')), None);
        assert_eq!(input.translate_key(Key::Other), None);
    }

    #[test]
    fn arrows_seek_by_configured_step() {
        let registry = ActiveSessionRegistry::new();
        let input = InputDispatcher::attach(SessionId::next(), registry, SeekStep::new(5.0));

        match input.translate_key(Key::ArrowLeft) {
            Some(Command::SeekBy(delta)) => assert_abs_diff_eq!(delta, -5.0),
            other => panic!("unexpected {other:?}"),
        }
        match input.translate_key(Key::ArrowRight) {
            Some(Command::SeekBy(delta)) => assert_abs_diff_eq!(delta, 5.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn only_active_session_receives_shortcuts() {
        let registry = ActiveSessionRegistry::new();
        let first = dispatcher(&registry);
        let second = dispatcher(&registry);

        assert!(first.translate_key(Key::Space).is_some());
        assert!(second.translate_key(Key::Space).is_none());

        second.translate_pointer(Pointer::Move);
        assert!(first.translate_key(Key::Space).is_none());
        assert!(second.translate_key(Key::Space).is_some());
    }

    #[test]
    fn pointer_gestures_map_to_commands() {
        let registry = ActiveSessionRegistry::new();
        let input = dispatcher(&registry);

        assert_eq!(input.translate_pointer(Pointer::Enter), Command::NotifyActivity);
        assert_eq!(input.translate_pointer(Pointer::Leave), Command::NotifyActivity);
        assert_eq!(input.translate_pointer(Pointer::SurfaceClick), Command::Toggle);
        assert_eq!(
            input.translate_pointer(Pointer::TrackClick { x: 150.0, width: 600.0 }),
            Command::Seek(0.25)
        );
    }

    #[test]
    fn detach_is_symmetric_and_idempotent() {
        let registry = ActiveSessionRegistry::new();
        let mut input = dispatcher(&registry);
        assert_eq!(registry.len(), 1);

        input.detach();
        input.detach();
        assert!(registry.is_empty());
        assert!(input.translate_key(Key::Space).is_none());
    }

    #[test]
    fn drop_detaches_listener() {
        let registry = ActiveSessionRegistry::new();
        {
            let _input = dispatcher(&registry);
            assert_eq!(registry.len(), 1);
        }
        assert!(registry.is_empty());
    }
}
