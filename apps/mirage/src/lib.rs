//! Mirage add-on DLL.
//!
//! Mirrors the host's primary swap chain into a second window so that OS-level window capture can
//! record the game without the host's overlays. The host drives everything through the C ABI
//! functions in [`exports`].

#![cfg(target_os = "windows")]

mod addon;
pub mod exports;
pub mod logger;
pub mod ui;
