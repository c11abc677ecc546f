//! C ABI surface the host binds to.
//!
//! Every handler logs failures and returns normally; the host never sees an error.

use std::ffi::{c_char, c_void};

use log::{error, info};

use mirage_core::{DeviceApi, DeviceInfo, LifecycleState, SettingsStore};
use mirage_platform_windows::module::module_path;
use mirage_platform_windows::win32::{HMODULE, HWND};
use mirage_platform_windows::{D3D11Runtime, D3D11Swapchain, D3D11View};

use crate::addon::{self, Addon, report, with_addon};
use crate::logger::{self, LogSink};
use crate::ui::{CallbackUi, UiCallbacks};

/// Exported C string pointer.
#[repr(transparent)]
pub struct AddonString(*const c_char);

// SAFETY: points at a 'static, immutable C string literal.
unsafe impl Sync for AddonString {}

#[unsafe(no_mangle)]
pub static NAME: AddonString = AddonString(c"Mirage".as_ptr());

#[unsafe(no_mangle)]
pub static DESCRIPTION: AddonString = AddonString(
    c"Mirrors the game to a hidden window to aid with screen recording via OBS without overlays."
        .as_ptr(),
);

/// Load the settings beside `addon_module` and create the add-on instance.
///
/// Returns `false` when the module path cannot be resolved; the host should then unload the DLL.
///
/// # Safety
/// `addon_module` must be the handle of this DLL. `log_sink`, when set, must stay callable until
/// [`AddonUninit`] returns.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn AddonInit(addon_module: *mut c_void, log_sink: Option<LogSink>) -> bool {
    logger::init(log_sink);

    let module = HMODULE(addon_module);
    let path = match module_path(module) {
        Ok(path) => path,
        Err(e) => {
            error!("Cannot resolve add-on path: {e}");
            return false;
        }
    };
    let settings = SettingsStore::for_module(&path);
    info!("Settings file: {}", settings.path().display());

    addon::install(Addon::new(module, settings));
    true
}

/// Tear down the add-on instance.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "C" fn AddonUninit() {
    addon::uninstall();
    logger::detach();
}

/// Device created. `device` is the native device pointer (only used as an identity), `api` the
/// host's numeric device API id.
#[unsafe(no_mangle)]
pub extern "C" fn mirage_init_device(device: *mut c_void, api: u32) {
    let device = DeviceInfo::new(DeviceApi::from_host_id(api), device as usize);
    with_addon(|addon| report("init_device", addon.context.on_device_ready(&device)));
}

/// Device about to be destroyed. Only the device that owns the mirror tears it down.
#[unsafe(no_mangle)]
pub extern "C" fn mirage_destroy_device(device: *mut c_void, api: u32) {
    let device = DeviceInfo::new(DeviceApi::from_host_id(api), device as usize);
    with_addon(|addon| report("destroy_device", addon.context.on_device_destroyed(&device)));
}

/// Swap chain created (`resize == false`) or resized.
///
/// # Safety
/// `swapchain` must be the host's live `IDXGISwapChain*` presenting to `hwnd`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn mirage_init_swapchain(
    swapchain: *mut c_void,
    hwnd: *mut c_void,
    resize: bool,
) {
    with_addon(|addon| {
        // Pointers are only DXGI swap chains once a supported device is live.
        if addon.context.state() == LifecycleState::Uninitialized {
            return;
        }
        let result = unsafe { D3D11Swapchain::from_raw(swapchain, HWND(hwnd)) }
            .and_then(|primary| addon.context.on_primary_surface_ready(&primary, resize));
        report("init_swapchain", result);
    });
}

/// Before the host's late effects pass.
///
/// # Safety
/// `context` must be the runtime's live `ID3D11DeviceContext*`, `rtv` the live render target
/// view of the frame, `hwnd` the window the runtime's swap chain presents to.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn mirage_begin_effects(
    hwnd: *mut c_void,
    context: *mut c_void,
    rtv: *mut c_void,
) {
    with_addon(|addon| {
        if !addon.context.has_mirror_surface() {
            return;
        }
        let result = unsafe { wrap_runtime(hwnd, context, rtv) }.and_then(|(runtime, view)| {
            addon.context.on_pre_late_effects(&runtime, &view)
        });
        report("begin_effects", result);
    });
}

/// After the host's late effects pass.
///
/// # Safety
/// Same contract as [`mirage_begin_effects`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn mirage_finish_effects(
    hwnd: *mut c_void,
    context: *mut c_void,
    rtv: *mut c_void,
) {
    with_addon(|addon| {
        if !addon.context.has_mirror_surface() {
            return;
        }
        let result = unsafe { wrap_runtime(hwnd, context, rtv) }.and_then(|(runtime, view)| {
            addon.context.on_post_late_effects(&runtime, &view)
        });
        report("finish_effects", result);
    });
}

/// Draw the settings panel with the host's widgets.
///
/// # Safety
/// `ui` must be null or point to a valid callback table for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn mirage_draw_settings(ui: *const UiCallbacks) {
    let Some(callbacks) = (unsafe { ui.as_ref() }) else {
        return;
    };
    let mut ui = CallbackUi::new(callbacks);
    with_addon(|addon| report("draw_settings", addon.context.draw_settings(&mut ui)));
}

unsafe fn wrap_runtime(
    hwnd: *mut c_void,
    context: *mut c_void,
    rtv: *mut c_void,
) -> mirage_core::MirrorResult<(D3D11Runtime, D3D11View)> {
    let runtime = unsafe { D3D11Runtime::from_raw(context, HWND(hwnd)) }?;
    let view = unsafe { D3D11View::from_raw(rtv) }?;
    Ok((runtime, view))
}
