use std::cell::RefCell;

use log::{debug, warn};
use parking_lot::ReentrantMutex;

use mirage_core::{
    MessageDisposition, MirrorContext, MirrorResult, SettingsStore, WindowId, WindowMessage,
};
use mirage_platform_windows::win32::HMODULE;
use mirage_platform_windows::{D3D11Backend, Win32WindowSystem};

pub(crate) type Context = MirrorContext<D3D11Backend, Win32WindowSystem>;

/// The single add-on instance, alive between `AddonInit` and `AddonUninit`.
pub(crate) struct Addon {
    pub(crate) context: Context,
}

// SAFETY: the COM interfaces and window handles inside are only used while ADDON is locked, and
// D3D11 immediate-context calls are issued from the host's render thread, as the host requires.
unsafe impl Send for Addon {}

// Re-entrant: creating the mirror swap chain and moving windows can call straight back into the
// host's event handlers on the same thread.
static ADDON: ReentrantMutex<RefCell<Option<Addon>>> =
    parking_lot::const_reentrant_mutex(RefCell::new(None));

impl Addon {
    pub(crate) fn new(module: HMODULE, settings: SettingsStore) -> Self {
        Self {
            context: MirrorContext::new(
                D3D11Backend::new(),
                Win32WindowSystem::new(module, dispatch_window_message),
                settings,
            ),
        }
    }
}

pub(crate) fn install(addon: Addon) {
    let guard = ADDON.lock();
    match guard.try_borrow_mut() {
        Ok(mut slot) => *slot = Some(addon),
        Err(_) => warn!("Add-on installed while busy; ignored"),
    }
}

/// Remove the instance, tearing the mirror down if the host never destroyed the device.
pub(crate) fn uninstall() {
    let guard = ADDON.lock();
    let Ok(mut slot) = guard.try_borrow_mut() else {
        warn!("Add-on unloaded while busy");
        return;
    };
    if let Some(mut addon) = slot.take() {
        report("unload", addon.context.shutdown());
    }
}

/// Run `f` on the add-on. Returns `None` when there is no instance or when called re-entrantly
/// from inside another handler.
pub(crate) fn with_addon<R>(f: impl FnOnce(&mut Addon) -> R) -> Option<R> {
    let guard = ADDON.lock();
    let Ok(mut slot) = guard.try_borrow_mut() else {
        debug!("Re-entrant host event skipped");
        return None;
    };
    slot.as_mut().map(f)
}

/// Log a failed handler. Errors never reach the host.
pub(crate) fn report(event: &str, result: MirrorResult<()>) {
    if let Err(e) = result {
        warn!("{event}: {e}");
    }
}

fn dispatch_window_message(window: WindowId, message: WindowMessage) -> Option<MessageDisposition> {
    with_addon(|addon| {
        addon
            .context
            .handle_window_message(window, message)
            .unwrap_or_else(|e| {
                warn!("window message {message:?}: {e}");
                MessageDisposition::Handled
            })
    })
}
