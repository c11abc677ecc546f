use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Pipeline point at which the mirror copy happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTiming {
    /// Copy before the late effects pass, yielding the undecorated scene.
    BeforeEffects,
    /// Copy after the late effects pass, yielding the composited frame.
    AfterEffects,
}

impl CopyTiming {
    #[inline]
    pub fn from_after_effects(after_effects: bool) -> Self {
        if after_effects {
            Self::AfterEffects
        } else {
            Self::BeforeEffects
        }
    }
}

/// Mirror settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Mirror after the late effects pass instead of before it.
    #[serde(default = "default_after_effects")]
    pub after_effects: bool,

    /// Park the mirror window at the hidden anchor below every display.
    #[serde(default = "default_hide_window")]
    pub hide_window: bool,

    // Explicit position used while the window is not hidden.
    #[serde(default = "default_window_x")]
    pub window_x: i32,
    #[serde(default = "default_window_y")]
    pub window_y: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            after_effects: default_after_effects(),
            hide_window: default_hide_window(),
            window_x: default_window_x(),
            window_y: default_window_y(),
        }
    }
}

impl Settings {
    #[inline]
    pub fn copy_timing(&self) -> CopyTiming {
        CopyTiming::from_after_effects(self.after_effects)
    }

    #[inline]
    pub fn visible_position(&self) -> (i32, i32) {
        (self.window_x, self.window_y)
    }
}

/// On-disk layout: a single flat section keyed by [`SECTION_NAME`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(rename = "mirage", default)]
    pub section: Settings,
}

impl SettingsFile {
    pub fn parse(content: &str) -> serde_json::Result<Settings> {
        serde_json::from_str::<SettingsFile>(content).map(|file| file.section)
    }

    pub fn render(settings: &Settings) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&SettingsFile {
            section: *settings,
        })
    }
}
