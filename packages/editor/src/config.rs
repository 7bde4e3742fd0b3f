//! Editor settings, read from the `editor` key of `folio.config.json`

use crate::undo_stack::DEFAULT_HISTORY_DEPTH;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DRAG_ACTIVATION_DISTANCE: f64 = 8.0;

/// Host platform, which decides the primary shortcut modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of undo snapshots kept
    pub history_depth: usize,

    /// Pointer travel in pixels before a press becomes a drag
    pub drag_activation_distance: f64,

    pub platform: Platform,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            drag_activation_distance: DEFAULT_DRAG_ACTIVATION_DISTANCE,
            platform: Platform::default(),
        }
    }
}
