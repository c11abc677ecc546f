#![cfg(target_os = "windows")]

pub mod win32;
pub mod win_api;
pub mod windows;

pub use windows::*;
