pub mod d3d11;
pub mod module;
pub mod monitor;
pub mod window_system;

pub use d3d11::{D3D11Backend, D3D11MirrorSurface, D3D11Runtime, D3D11Swapchain, D3D11View};
pub use window_system::{MessageHook, Win32WindowSystem};

use std::ffi::c_void;

use mirage_core::WindowId;
use windows::Win32::Foundation::HWND;

#[inline]
pub fn window_id(hwnd: HWND) -> WindowId {
    WindowId::from_raw(hwnd.0 as usize)
}

#[inline]
pub fn hwnd(window: WindowId) -> HWND {
    HWND(window.raw() as *mut c_void)
}
