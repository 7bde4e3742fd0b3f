//! Keyboard shortcuts for history and drag control

use crate::config::Platform;
use serde::{Deserialize, Serialize};

/// A key press with its modifiers, as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Cmd on mac, Ctrl elsewhere; the other one must not be held
    fn has_primary(&self, platform: Platform) -> bool {
        match platform {
            Platform::Mac => self.meta && !self.ctrl,
            Platform::Other => self.ctrl && !self.meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Undo,
    Redo,
    CancelDrag,
}

impl EditorCommand {
    pub fn from_chord(chord: &KeyChord, platform: Platform) -> Option<Self> {
        if chord.key == "Escape" {
            return Some(EditorCommand::CancelDrag);
        }

        if !chord.key.eq_ignore_ascii_case("z") || chord.alt || !chord.has_primary(platform) {
            return None;
        }

        Some(if chord.shift {
            EditorCommand::Redo
        } else {
            EditorCommand::Undo
        })
    }
}

/// What the session did with a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The command that ran, if any
    pub command: Option<EditorCommand>,

    /// The host must suppress its own handling (e.g. native undo)
    pub prevent_default: bool,
}

impl KeyOutcome {
    pub fn ignored() -> Self {
        Self {
            command: None,
            prevent_default: false,
        }
    }
}
