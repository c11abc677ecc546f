use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::defaults::settings_path_for_module;
use crate::settings::{CopyTiming, Settings, SettingsFile};

/// Settings bound to the file they are persisted in.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load settings for the module at `module_path`.
    pub fn for_module(module_path: &Path) -> Self {
        Self::load(settings_path_for_module(module_path))
    }

    /// Load settings from `path`.
    ///
    /// A missing or malformed file yields defaults. The file is rewritten right away so it always
    /// reflects the settings in effect.
    pub fn load(path: PathBuf) -> Self {
        info!("Loading settings...");
        info!("Settings path: {}", path.display());

        let settings = match fs::read_to_string(&path) {
            Ok(content) => SettingsFile::parse(&content).unwrap_or_else(|e| {
                warn!("Ignoring malformed settings file: {e}");
                Settings::default()
            }),
            Err(_) => Settings::default(),
        };

        let store = Self { path, settings };
        store.save_or_warn();
        store
    }

    /// Save settings to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        info!("Saving settings...");
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let content = SettingsFile::render(&self.settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Save settings, logging instead of failing.
    pub fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to save settings to {}: {e:#}", self.path.display());
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn get(&self) -> Settings {
        self.settings
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    #[inline]
    pub fn copy_timing(&self) -> CopyTiming {
        self.settings.copy_timing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn temp_settings_path(name: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir()
            .join(format!("mirage_settings_{}_{n}", std::process::id()))
            .join(format!("{name}.json"))
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let path = temp_settings_path("round_trip");
        let mut store = SettingsStore::load(path.clone());
        *store.get_mut() = Settings {
            after_effects: false,
            hide_window: false,
            window_x: 100,
            window_y: 200,
        };
        store.save().unwrap();

        let reloaded = SettingsStore::load(path);
        assert_eq!(
            reloaded.get(),
            Settings {
                after_effects: false,
                hide_window: false,
                window_x: 100,
                window_y: 200,
            }
        );
    }

    #[test]
    fn malformed_file_loads_defaults_and_is_rewritten() {
        let path = temp_settings_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[mirage]\nafter_effects = maybe\n").unwrap();

        let store = SettingsStore::load(path.clone());
        assert_eq!(store.get(), Settings::default());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(SettingsFile::parse(&content).unwrap(), Settings::default());
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = temp_settings_path("missing");
        assert!(!path.exists());

        let store = SettingsStore::load(path.clone());
        assert_eq!(store.get(), Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn module_path_maps_to_sibling_file() {
        let module = temp_settings_path("Mirage").with_extension("addon64");
        let store = SettingsStore::for_module(&module);
        assert_eq!(store.path(), module.with_extension("json"));
    }
}
