use std::cell::Cell;

use log::{debug, warn};
use mirage_core::{
    DisplayRect, MessageDisposition, MirrorError, MirrorResult, WindowId, WindowMessage,
    WindowPlacement, WindowSystem,
};
use windows::core::PCWSTR;

use crate::win_api;
use crate::win32::{
    HINSTANCE, HMODULE, HWND, HWND_BOTTOM, LPARAM, LRESULT, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOSIZE, SWP_NOZORDER, SWP_SHOWWINDOW, WINDOW_EX_STYLE, WM_CLOSE, WM_DISPLAYCHANGE,
    WNDCLASSEXW, WPARAM, WS_EX_TOOLWINDOW,
};

pub const CLASS_NAME: &str = "mirage-2c0da0a5-8d8c-44eb-9e4a-f9230ed96691";
pub const WINDOW_TITLE: &str = "Mirage";

/// Receives close and display-change messages for both windows of the pair.
///
/// Returning `None` means the receiver is busy (the message arrived while it was already
/// running); the window procedure then swallows the message.
pub type MessageHook = fn(WindowId, WindowMessage) -> Option<MessageDisposition>;

thread_local! {
    static MESSAGE_HOOK: Cell<Option<MessageHook>> = const { Cell::new(None) };
}

/// Win32 implementation of [`WindowSystem`]: one window class, an invisible owner window and the
/// popup that hosts the mirror swap chain.
pub struct Win32WindowSystem {
    instance: HINSTANCE,
    hook: MessageHook,
    class_name: Vec<u16>,
    title: Vec<u16>,
    class_registered: bool,
}

impl Win32WindowSystem {
    /// `module` is the module the window class is registered for (the addon DLL).
    pub fn new(module: HMODULE, hook: MessageHook) -> Self {
        Self {
            instance: HINSTANCE(module.0),
            hook,
            class_name: win_api::to_wide_chars(CLASS_NAME),
            title: win_api::to_wide_chars(WINDOW_TITLE),
            class_registered: false,
        }
    }

    fn window_err(e: impl std::fmt::Debug) -> MirrorError {
        MirrorError::Window(format!("{e:?}"))
    }

    fn create_popup(
        &self,
        ex_style: WINDOW_EX_STYLE,
        owner: Option<HWND>,
    ) -> MirrorResult<WindowId> {
        let hwnd = win_api::create_popup(
            self.instance,
            PCWSTR(self.class_name.as_ptr()),
            PCWSTR(self.title.as_ptr()),
            ex_style,
            owner,
            None,
        )
        .map_err(Self::window_err)?;
        Ok(super::window_id(hwnd))
    }
}

impl WindowSystem for Win32WindowSystem {
    fn register_window_class(&mut self) -> MirrorResult<()> {
        // Messages are dispatched on the thread that creates the windows.
        MESSAGE_HOOK.with(|hook| hook.set(Some(self.hook)));

        let window_class = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            lpfnWndProc: Some(window_proc),
            hInstance: self.instance,
            hCursor: win_api::load_cursor_arrow().unwrap_or_default(),
            hbrBackground: win_api::black_brush(),
            lpszClassName: PCWSTR(self.class_name.as_ptr()),
            ..Default::default()
        };
        if !win_api::register_class_ex(&window_class) {
            return Err(Self::window_err(windows::core::Error::from_win32()));
        }
        self.class_registered = true;
        debug!("Registered window class {CLASS_NAME}");
        Ok(())
    }

    fn unregister_window_class(&mut self) {
        if !self.class_registered {
            return;
        }
        if let Err(e) =
            win_api::unregister_class(PCWSTR(self.class_name.as_ptr()), self.instance)
        {
            warn!("UnregisterClassW failed: {e:?}");
        }
        self.class_registered = false;
        MESSAGE_HOOK.with(|hook| hook.set(None));
    }

    fn create_owner_window(&mut self) -> MirrorResult<WindowId> {
        // A message-only window would miss the WM_DISPLAYCHANGE broadcast, so the owner is a
        // top-level tool window that is never shown.
        self.create_popup(WS_EX_TOOLWINDOW, None)
    }

    fn create_mirror_window(&mut self, owner: WindowId) -> MirrorResult<WindowId> {
        self.create_popup(WINDOW_EX_STYLE::default(), Some(super::hwnd(owner)))
    }

    fn destroy_window(&mut self, window: WindowId) {
        if let Err(e) = win_api::destroy_window(super::hwnd(window)) {
            warn!("DestroyWindow failed: {e:?}");
        }
    }

    fn client_size(&self, window: WindowId) -> MirrorResult<(i32, i32)> {
        let rect = win_api::get_client_rect(super::hwnd(window)).map_err(Self::window_err)?;
        Ok((rect.right - rect.left, rect.bottom - rect.top))
    }

    fn place_window(&mut self, window: WindowId, placement: WindowPlacement) -> MirrorResult<()> {
        let hwnd = super::hwnd(window);
        match placement {
            WindowPlacement::Move { x, y, activate } => {
                let mut flags = SWP_NOSIZE | SWP_NOZORDER | SWP_SHOWWINDOW;
                if !activate {
                    flags |= SWP_NOACTIVATE;
                }
                win_api::set_window_pos(hwnd, None, x, y, 0, 0, flags)
            }
            WindowPlacement::Resize { width, height } => win_api::set_window_pos(
                hwnd,
                Some(HWND_BOTTOM),
                0,
                0,
                width,
                height,
                SWP_NOMOVE | SWP_NOACTIVATE | SWP_SHOWWINDOW,
            ),
        }
        .map_err(Self::window_err)
    }

    fn display_rects(&self) -> Vec<DisplayRect> {
        super::monitor::display_rects()
    }
}

fn translate_message(msg: u32) -> WindowMessage {
    match msg {
        WM_CLOSE => WindowMessage::Close,
        WM_DISPLAYCHANGE => WindowMessage::DisplayChange,
        _ => WindowMessage::Other,
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let message = translate_message(msg);
    if message == WindowMessage::Other {
        return win_api::def_window_proc(hwnd, msg, wparam, lparam);
    }

    let disposition = MESSAGE_HOOK
        .with(|hook| hook.get())
        .and_then(|hook| hook(super::window_id(hwnd), message))
        .unwrap_or(MessageDisposition::Handled);

    match disposition {
        MessageDisposition::Handled => LRESULT(0),
        MessageDisposition::Default => win_api::def_window_proc(hwnd, msg, wparam, lparam),
    }
}
