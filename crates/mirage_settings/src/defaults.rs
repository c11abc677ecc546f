use std::path::{Path, PathBuf};

/// Extension used for the settings file that sits beside the hosting module.
pub const SETTINGS_EXTENSION: &str = "json";

/// Name of the section holding the mirror settings.
pub const SECTION_NAME: &str = "mirage";

// Copy timing default: mirror the fully composited frame.
pub fn default_after_effects() -> bool {
    true
}

// Visibility default: park the mirror window below every display.
pub fn default_hide_window() -> bool {
    true
}

pub fn default_window_x() -> i32 {
    0
}

pub fn default_window_y() -> i32 {
    0
}

/// Settings path for a hosting module: same directory, same base name.
pub fn settings_path_for_module(module_path: &Path) -> PathBuf {
    module_path.with_extension(SETTINGS_EXTENSION)
}
