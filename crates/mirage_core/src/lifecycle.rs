//! Mirror surface lifecycle.
//!
//! Device and swap chain events from the host drive a small state machine:
//!
//! ```text
//! Uninitialized --device ready--> WindowsCreated --surface ready--> MirrorSurfaceLive
//!       ^                                                             |  ^
//!       |                                                             |  | surface resized
//!       +-------------------------device destroyed-------------------+--+
//! ```
//!
//! Everything lives in one [`MirrorContext`] passed to each handler, so the mirror surface has
//! exactly one writer (these handlers) and one per-frame reader (the frame copy engine).

use log::{debug, info, warn};

use crate::error::MirrorResult;
use crate::host::{HostDevice, HostSwapchain, WindowId};
use crate::platform::{MirrorBackend, WindowSystem};
use crate::surface::{MirrorDescriptor, PixelFormat};
use crate::window_host::{MessageDisposition, WindowHost, WindowMessage};
use mirage_settings::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    WindowsCreated,
    MirrorSurfaceLive,
}

/// All mirror state for one device lifetime.
pub struct MirrorContext<B: MirrorBackend, W: WindowSystem> {
    pub(crate) backend: B,
    pub(crate) windows: W,
    pub(crate) host: WindowHost,
    pub(crate) settings: SettingsStore,
    pub(crate) mirror: Option<B::MirrorSurface>,
    pub(crate) multisampled: bool,
    pub(crate) primary_format: PixelFormat,
    device: Option<usize>,
    state: LifecycleState,
}

impl<B: MirrorBackend, W: WindowSystem> MirrorContext<B, W> {
    pub fn new(backend: B, windows: W, settings: SettingsStore) -> Self {
        Self {
            backend,
            windows,
            host: WindowHost::new(),
            settings,
            mirror: None,
            multisampled: false,
            primary_format: PixelFormat::default(),
            device: None,
            state: LifecycleState::Uninitialized,
        }
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    pub fn has_mirror_surface(&self) -> bool {
        self.mirror.is_some()
    }

    #[inline]
    pub fn mirror_surface(&self) -> Option<&B::MirrorSurface> {
        self.mirror.as_ref()
    }

    /// Device that owns the mirror, if any.
    #[inline]
    pub fn owning_device(&self) -> Option<usize> {
        self.device
    }

    #[inline]
    pub fn is_multisampled(&self) -> bool {
        self.multisampled
    }

    #[inline]
    pub fn mirror_window(&self) -> Option<WindowId> {
        self.host.mirror_window()
    }

    #[inline]
    pub fn owner_window(&self) -> Option<WindowId> {
        self.host.owner_window()
    }

    #[inline]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn windows(&self) -> &W {
        &self.windows
    }

    #[inline]
    pub fn windows_mut(&mut self) -> &mut W {
        &mut self.windows
    }

    /// A device became ready. Creates the window pair for the first supported device only; that
    /// device owns the mirror until it is destroyed.
    pub fn on_device_ready<D: HostDevice>(&mut self, device: &D) -> MirrorResult<()> {
        let api = device.api();
        if !api.is_supported() {
            debug!("Ignoring device with unsupported API {api:?}");
            return Ok(());
        }
        if self.state != LifecycleState::Uninitialized || self.host.is_created() {
            debug!("Ignoring device {:#x}, mirror already owned", device.id());
            return Ok(());
        }

        let settings = self.settings.get();
        if let Err(e) = self.host.create(&mut self.windows, &settings) {
            self.host.destroy(&mut self.windows);
            return Err(e);
        }
        self.device = Some(device.id());
        self.state = LifecycleState::WindowsCreated;
        info!("Mirror windows created for device {:#x}", device.id());
        Ok(())
    }

    /// A host swap chain was created (`is_resize == false`) or resized.
    ///
    /// Events for the mirror's own swap chain are ignored. A resize arriving before any mirror
    /// surface exists violates the host's ordering; it is logged and ignored. A second creation
    /// while the mirror is live (the host recreated its swap chain) resizes the existing mirror.
    pub fn on_primary_surface_ready(
        &mut self,
        primary: &B::Swapchain,
        is_resize: bool,
    ) -> MirrorResult<()> {
        if self.state == LifecycleState::Uninitialized {
            return Ok(());
        }
        let primary_window = primary.window();
        if self.host.is_mirror_window(primary_window) {
            return Ok(());
        }
        let Some(mirror_window) = self.host.mirror_window() else {
            return Ok(());
        };
        if is_resize && self.mirror.is_none() {
            warn!("Primary surface resized before the mirror surface was created; ignored");
            return Ok(());
        }

        let source = self.backend.primary_descriptor(primary)?;
        let desc = MirrorDescriptor::derive(&source);

        match self.mirror.as_mut() {
            Some(mirror) => {
                self.backend.resize_mirror_surface(mirror, &desc)?;
                debug!("Resized mirror surface to {}x{}", desc.width, desc.height);
            }
            None => {
                let mirror = self
                    .backend
                    .create_mirror_surface(primary, mirror_window, &desc)?;
                self.mirror = Some(mirror);
                self.state = LifecycleState::MirrorSurfaceLive;
                info!(
                    "Created mirror surface {}x{} (primary sample count {})",
                    desc.width, desc.height, source.sample_count
                );
            }
        }
        // Only reached once the mirror follows the new descriptor.
        self.multisampled = source.is_multisampled();
        self.primary_format = source.format;

        self.host.fit_to_client(&mut self.windows, primary_window)
    }

    /// The owning device went away: release the mirror, tear down the windows and persist
    /// settings. Other devices are ignored.
    pub fn on_device_destroyed<D: HostDevice>(&mut self, device: &D) -> MirrorResult<()> {
        if !device.api().is_supported() || self.device != Some(device.id()) {
            return Ok(());
        }
        self.shutdown()
    }

    /// Tear everything down regardless of which device owns the mirror. No-op when nothing is
    /// live.
    pub fn shutdown(&mut self) -> MirrorResult<()> {
        if self.state == LifecycleState::Uninitialized {
            return Ok(());
        }

        self.mirror = None;
        self.multisampled = false;
        self.device = None;
        self.host.destroy(&mut self.windows);
        self.state = LifecycleState::Uninitialized;
        info!("Mirror torn down");

        self.settings.save()?;
        Ok(())
    }

    /// Window procedure entry point for both windows of the pair.
    pub fn handle_window_message(
        &mut self,
        window: WindowId,
        message: WindowMessage,
    ) -> MirrorResult<MessageDisposition> {
        let settings = self.settings.get();
        self.host
            .handle_message(&mut self.windows, &settings, window, message)
    }
}
