use std::ffi::{OsStr, OsString, c_void};
use std::iter::once;
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::PathBuf;

use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::System::Diagnostics::Debug::OutputDebugStringW;
use windows::Win32::System::LibraryLoader::GetModuleFileNameW;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::{BOOL, PCWSTR};

#[inline]
pub fn def_window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

#[inline]
pub fn load_cursor_arrow() -> windows::core::Result<HCURSOR> {
    unsafe { LoadCursorW(None, IDC_ARROW) }
}

#[inline]
pub fn black_brush() -> HBRUSH {
    HBRUSH(unsafe { GetStockObject(BLACK_BRUSH) }.0)
}

/// Register a window class. Returns `false` when the class could not be registered.
#[inline]
pub fn register_class_ex(window_class: &WNDCLASSEXW) -> bool {
    unsafe { RegisterClassExW(window_class) != 0 }
}

#[inline]
pub fn unregister_class(class_name: PCWSTR, instance: HINSTANCE) -> windows::core::Result<()> {
    unsafe { UnregisterClassW(class_name, Some(instance)) }
}

/// Create a `WS_POPUP` window of `class_name`, initially hidden and zero-sized.
pub fn create_popup(
    instance: HINSTANCE,
    class_name: PCWSTR,
    title: PCWSTR,
    ex_style: WINDOW_EX_STYLE,
    owner: Option<HWND>,
    create_params: Option<*const c_void>,
) -> windows::core::Result<HWND> {
    unsafe {
        CreateWindowExW(
            ex_style,
            class_name,
            title,
            WS_POPUP,
            0,
            0,
            0,
            0,
            owner,
            None,
            Some(instance),
            create_params,
        )
    }
}

/// Destroy a window.
#[inline]
pub fn destroy_window(hwnd: HWND) -> windows::core::Result<()> {
    unsafe {
        DestroyWindow(hwnd)?;
    }
    Ok(())
}

/// Client rectangle of a window.
#[inline]
pub fn get_client_rect(hwnd: HWND) -> windows::core::Result<RECT> {
    let mut rect = RECT::default();
    unsafe {
        GetClientRect(hwnd, &mut rect)?;
    }
    Ok(rect)
}

/// Set window position, size and z-order.
#[inline]
pub fn set_window_pos(
    hwnd: HWND,
    hwnd_insert_after: Option<HWND>,
    x: i32,
    y: i32,
    cx: i32,
    cy: i32,
    flags: SET_WINDOW_POS_FLAGS,
) -> windows::core::Result<()> {
    unsafe {
        SetWindowPos(hwnd, hwnd_insert_after, x, y, cx, cy, flags)?;
    }
    Ok(())
}

/// Rectangles of all active display monitors, in virtual desktop coordinates.
pub fn enum_display_rects() -> Vec<RECT> {
    let mut rects: Vec<RECT> = Vec::new();
    unsafe {
        let _ = EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_callback),
            LPARAM(&mut rects as *mut Vec<RECT> as isize),
        );
    }
    rects
}

/// Collects each monitor rectangle into the `Vec<RECT>` passed through `lparam`.
unsafe extern "system" fn enum_monitor_callback(
    _monitor: HMONITOR,
    _hdc: HDC,
    rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    unsafe {
        let rects = &mut *(lparam.0 as *mut Vec<RECT>);
        if let Some(rect) = rect.as_ref() {
            rects.push(*rect);
        }
        BOOL::from(true)
    }
}

/// Full path of a loaded module.
pub fn module_file_name(module: HMODULE) -> windows::core::Result<PathBuf> {
    let mut buffer: Vec<u16> = Vec::new();
    loop {
        buffer.resize(buffer.len() + MAX_PATH as usize, 0);
        let len = unsafe { GetModuleFileNameW(Some(module), &mut buffer) } as usize;
        if len == 0 {
            return Err(windows::core::Error::from_win32());
        }
        // A full buffer means the path was truncated.
        if len < buffer.len() {
            buffer.truncate(len);
            return Ok(PathBuf::from(OsString::from_wide(&buffer)));
        }
    }
}

/// Write a line to the debugger output stream.
#[inline]
pub fn output_debug_string(message: &str) {
    let wide = to_wide_chars(message);
    unsafe { OutputDebugStringW(PCWSTR(wide.as_ptr())) };
}

/// Convert a Rust string to a NUL-terminated UTF-16 buffer for Win32 APIs.
#[inline]
pub fn to_wide_chars(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(once(0)).collect()
}
