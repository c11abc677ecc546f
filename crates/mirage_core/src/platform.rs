use crate::error::MirrorResult;
use crate::geometry::DisplayRect;
use crate::host::{HostEffectRuntime, HostSwapchain, WindowId};
use crate::surface::{CopyMode, MirrorDescriptor, SurfaceDescriptor};

/// GPU side of the mirror: everything that touches swap chains and resources.
///
/// Implementations wrap the native handles the host hands out; the context never sees them.
pub trait MirrorBackend {
    type Swapchain: HostSwapchain;
    type Runtime: HostEffectRuntime;
    type SourceView;
    /// Owned mirror swap chain. Dropping it releases the surface.
    type MirrorSurface;

    /// Read the current descriptor of a host swap chain.
    fn primary_descriptor(&self, primary: &Self::Swapchain) -> MirrorResult<SurfaceDescriptor>;

    /// Create the mirror swap chain on the primary's device, presenting to `window`.
    fn create_mirror_surface(
        &mut self,
        primary: &Self::Swapchain,
        window: WindowId,
        desc: &MirrorDescriptor,
    ) -> MirrorResult<Self::MirrorSurface>;

    /// Resize the mirror buffers in place, keeping buffer count and presentation model.
    fn resize_mirror_surface(
        &mut self,
        mirror: &mut Self::MirrorSurface,
        desc: &MirrorDescriptor,
    ) -> MirrorResult<()>;

    /// Transfer the resource behind `source` into the mirror's current back buffer, on the
    /// runtime's command context.
    ///
    /// `expected` follows the primary descriptor. The resource behind `source` decides: a
    /// single-sampled source is copied even when a resolve was expected.
    fn copy_to_mirror(
        &mut self,
        runtime: &Self::Runtime,
        source: &Self::SourceView,
        mirror: &mut Self::MirrorSurface,
        expected: CopyMode,
    ) -> MirrorResult<()>;

    /// Present the mirror without waiting for vertical sync.
    fn present_mirror(&mut self, mirror: &Self::MirrorSurface) -> MirrorResult<()>;
}

/// Window placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPlacement {
    /// Move without resizing and show. `activate` is false when activation must be suppressed.
    Move { x: i32, y: i32, activate: bool },
    /// Resize the client area without moving, send to the bottom of the z-order and show without
    /// activating.
    Resize { width: i32, height: i32 },
}

/// OS side of the mirror: the window pair and display queries.
pub trait WindowSystem {
    fn register_window_class(&mut self) -> MirrorResult<()>;
    fn unregister_window_class(&mut self);

    /// Invisible window owning the mirror window.
    fn create_owner_window(&mut self) -> MirrorResult<WindowId>;
    /// Popup window hosting the mirror surface, owned by `owner`.
    fn create_mirror_window(&mut self, owner: WindowId) -> MirrorResult<WindowId>;
    fn destroy_window(&mut self, window: WindowId);

    /// Client area size of any window (including host windows).
    fn client_size(&self, window: WindowId) -> MirrorResult<(i32, i32)>;
    fn place_window(&mut self, window: WindowId, placement: WindowPlacement) -> MirrorResult<()>;

    /// Rectangles of every active display.
    fn display_rects(&self) -> Vec<DisplayRect>;
}
