pub mod defaults;
pub mod manager;
pub mod settings;

pub use manager::SettingsStore;
pub use settings::{CopyTiming, Settings, SettingsFile};
