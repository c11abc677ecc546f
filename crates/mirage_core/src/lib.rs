pub mod config_panel;
pub mod error;
pub mod frame_copy;
pub mod geometry;
pub mod host;
pub mod lifecycle;
pub mod platform;
pub mod surface;
pub mod window_host;

#[cfg(test)]
mod fakes;

pub use config_panel::SettingsUi;
pub use error::{MirrorError, MirrorResult};
pub use geometry::{DisplayRect, HIDDEN_ANCHOR_MARGIN, compute_hidden_anchor};
pub use host::*;
pub use lifecycle::{LifecycleState, MirrorContext};
pub use platform::*;
pub use surface::*;
pub use window_host::{MessageDisposition, WindowHost, WindowMessage};

pub use mirage_settings::{CopyTiming, Settings, SettingsStore};
