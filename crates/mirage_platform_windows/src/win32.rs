pub use windows::Win32::Foundation::{HINSTANCE, HMODULE, HWND, LPARAM, LRESULT, RECT, WPARAM};

pub use windows::Win32::UI::WindowsAndMessaging::{
    HWND_BOTTOM, SET_WINDOW_POS_FLAGS, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
    SWP_SHOWWINDOW, WINDOW_EX_STYLE, WM_CLOSE, WM_DISPLAYCHANGE, WNDCLASSEXW, WS_EX_TOOLWINDOW,
};
