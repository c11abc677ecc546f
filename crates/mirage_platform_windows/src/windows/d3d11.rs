//! Direct3D 11 side of the mirror.
//!
//! The host hands out raw COM pointers; the wrappers here borrow them, take their own reference
//! and release it on drop.

use std::ffi::c_void;

use log::{debug, info};
use mirage_core::{
    CopyMode, HostEffectRuntime, HostSwapchain, MirrorBackend, MirrorDescriptor, MirrorError,
    MirrorResult, PixelFormat, SurfaceDescriptor, WindowId,
};
use windows::Win32::Graphics::Direct3D11::{
    D3D11_TEXTURE2D_DESC, D3D11_USAGE_DEFAULT, ID3D11Device, ID3D11DeviceContext,
    ID3D11Texture2D, ID3D11View,
};
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::{
    DXGI_PRESENT, DXGI_SCALING_NONE, DXGI_SWAP_CHAIN_DESC1, DXGI_SWAP_CHAIN_FLAG,
    DXGI_SWAP_EFFECT_FLIP_DISCARD, DXGI_USAGE_RENDER_TARGET_OUTPUT, IDXGIFactory2,
    IDXGISwapChain, IDXGISwapChain1,
};
use windows::core::{BOOL, Interface};

use crate::win32::HWND;

/// Host swap chain (the primary surface).
#[derive(Debug, Clone)]
pub struct D3D11Swapchain {
    swapchain: IDXGISwapChain1,
    window: WindowId,
}

impl D3D11Swapchain {
    /// Wrap a host `IDXGISwapChain*` presenting to `hwnd`.
    ///
    /// # Safety
    /// `native` must be null or a live `IDXGISwapChain` pointer for the duration of the call.
    pub unsafe fn from_raw(native: *mut c_void, hwnd: HWND) -> MirrorResult<Self> {
        let swapchain = unsafe { IDXGISwapChain::from_raw_borrowed(&native) }
            .ok_or_else(|| MirrorError::Descriptor("null swap chain".to_string()))?
            .cast::<IDXGISwapChain1>()
            .map_err(descriptor_err)?;
        Ok(Self {
            swapchain,
            window: super::window_id(hwnd),
        })
    }
}

impl HostSwapchain for D3D11Swapchain {
    fn window(&self) -> WindowId {
        self.window
    }
}

/// Host effect runtime: the immediate context the host renders with and the window it renders to.
#[derive(Debug, Clone)]
pub struct D3D11Runtime {
    context: ID3D11DeviceContext,
    window: WindowId,
}

impl D3D11Runtime {
    /// # Safety
    /// `context` must be null or a live `ID3D11DeviceContext` pointer for the duration of the call.
    pub unsafe fn from_raw(context: *mut c_void, hwnd: HWND) -> MirrorResult<Self> {
        let context = unsafe { ID3D11DeviceContext::from_raw_borrowed(&context) }
            .ok_or_else(|| MirrorError::Copy("null device context".to_string()))?
            .clone();
        Ok(Self {
            context,
            window: super::window_id(hwnd),
        })
    }
}

impl HostEffectRuntime for D3D11Runtime {
    fn window(&self) -> WindowId {
        self.window
    }
}

/// Render target view of the frame being copied.
#[derive(Debug, Clone)]
pub struct D3D11View(ID3D11View);

impl D3D11View {
    /// # Safety
    /// `view` must be null or a live `ID3D11View` (usually an `ID3D11RenderTargetView`) pointer
    /// for the duration of the call.
    pub unsafe fn from_raw(view: *mut c_void) -> MirrorResult<Self> {
        let view = unsafe { ID3D11View::from_raw_borrowed(&view) }
            .ok_or_else(|| MirrorError::Copy("null render target view".to_string()))?
            .clone();
        Ok(Self(view))
    }
}

/// The mirror swap chain. Dropping it releases the swap chain.
#[derive(Debug)]
pub struct D3D11MirrorSurface {
    swapchain: IDXGISwapChain1,
    device: ID3D11Device,
    /// Single-sample texture in the source's format, for resolves the back buffer cannot take
    /// directly. Created on first use.
    resolve_target: Option<ID3D11Texture2D>,
}

/// How one frame moves from the source texture into the back buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transfer {
    Copy,
    Resolve(DXGI_FORMAT),
    /// Resolve into the intermediate texture, then copy that into the back buffer.
    ResolveThenCopy,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct D3D11Backend;

impl D3D11Backend {
    pub fn new() -> Self {
        Self
    }
}

impl MirrorBackend for D3D11Backend {
    type Swapchain = D3D11Swapchain;
    type Runtime = D3D11Runtime;
    type SourceView = D3D11View;
    type MirrorSurface = D3D11MirrorSurface;

    fn primary_descriptor(&self, primary: &D3D11Swapchain) -> MirrorResult<SurfaceDescriptor> {
        let desc = unsafe { primary.swapchain.GetDesc1() }.map_err(descriptor_err)?;
        Ok(SurfaceDescriptor {
            width: desc.Width,
            height: desc.Height,
            format: PixelFormat(desc.Format.0 as u32),
            sample_count: desc.SampleDesc.Count,
            stereo: desc.Stereo.as_bool(),
        })
    }

    fn create_mirror_surface(
        &mut self,
        primary: &D3D11Swapchain,
        window: WindowId,
        desc: &MirrorDescriptor,
    ) -> MirrorResult<D3D11MirrorSurface> {
        let device: ID3D11Device =
            unsafe { primary.swapchain.GetDevice() }.map_err(creation_err)?;
        let factory: IDXGIFactory2 =
            unsafe { primary.swapchain.GetParent() }.map_err(creation_err)?;

        let swapchain_desc = swap_chain_desc(desc);
        let swapchain = unsafe {
            factory.CreateSwapChainForHwnd(
                &device,
                super::hwnd(window),
                &swapchain_desc,
                None,
                None,
            )
        }
        .map_err(creation_err)?;

        info!(
            "Created mirror swap chain {}x{} (format {})",
            desc.width, desc.height, swapchain_desc.Format.0
        );
        Ok(D3D11MirrorSurface {
            swapchain,
            device,
            resolve_target: None,
        })
    }

    fn resize_mirror_surface(
        &mut self,
        mirror: &mut D3D11MirrorSurface,
        desc: &MirrorDescriptor,
    ) -> MirrorResult<()> {
        let format = flip_compatible_format(dxgi_format(desc.format));
        mirror.resolve_target = None;
        // Zero keeps the current buffer count.
        unsafe {
            mirror.swapchain.ResizeBuffers(
                0,
                desc.width,
                desc.height,
                format,
                DXGI_SWAP_CHAIN_FLAG(0),
            )
        }
        .map_err(|e| MirrorError::SurfaceResize(format!("{e:?}")))?;
        debug!("Resized mirror swap chain to {}x{}", desc.width, desc.height);
        Ok(())
    }

    fn copy_to_mirror(
        &mut self,
        runtime: &D3D11Runtime,
        source: &D3D11View,
        mirror: &mut D3D11MirrorSurface,
        expected: CopyMode,
    ) -> MirrorResult<()> {
        let source_resource = unsafe { source.0.GetResource() }.map_err(copy_err)?;
        let source_texture: ID3D11Texture2D = source_resource.cast().map_err(copy_err)?;
        let back_buffer: ID3D11Texture2D =
            unsafe { mirror.swapchain.GetBuffer(0) }.map_err(copy_err)?;

        let source_desc = texture_desc(&source_texture);
        let target_desc = texture_desc(&back_buffer);
        let transfer = plan_transfer(&source_desc, &target_desc)?;
        if (transfer == Transfer::Copy) != (expected == CopyMode::Copy) {
            debug!(
                "Primary suggests {expected:?}, source has {} samples; using {transfer:?}",
                source_desc.SampleDesc.Count
            );
        }

        let context = &runtime.context;
        match transfer {
            Transfer::Copy => unsafe { context.CopyResource(&back_buffer, &source_texture) },
            Transfer::Resolve(format) => unsafe {
                context.ResolveSubresource(&back_buffer, 0, &source_texture, 0, format);
            },
            Transfer::ResolveThenCopy => {
                let intermediate =
                    ensure_resolve_target(&mirror.device, &mut mirror.resolve_target, &source_desc)?;
                unsafe {
                    context.ResolveSubresource(
                        intermediate,
                        0,
                        &source_texture,
                        0,
                        source_desc.Format,
                    );
                    context.CopyResource(&back_buffer, intermediate);
                }
            }
        }
        Ok(())
    }

    fn present_mirror(&mut self, mirror: &D3D11MirrorSurface) -> MirrorResult<()> {
        unsafe { mirror.swapchain.Present(0, DXGI_PRESENT(0)) }
            .ok()
            .map_err(|e| MirrorError::Present(format!("{e:?}")))
    }
}

fn swap_chain_desc(desc: &MirrorDescriptor) -> DXGI_SWAP_CHAIN_DESC1 {
    DXGI_SWAP_CHAIN_DESC1 {
        Width: desc.width,
        Height: desc.height,
        Format: flip_compatible_format(dxgi_format(desc.format)),
        Stereo: BOOL::from(desc.stereo),
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: desc.sample_count,
            Quality: 0,
        },
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        BufferCount: desc.buffer_count,
        Scaling: DXGI_SCALING_NONE,
        SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
        Flags: 0,
        ..Default::default()
    }
}

fn texture_desc(texture: &ID3D11Texture2D) -> D3D11_TEXTURE2D_DESC {
    let mut desc = D3D11_TEXTURE2D_DESC::default();
    unsafe { texture.GetDesc(&mut desc) };
    desc
}

/// Pick the transfer from the actual source texture. Single-sampled sources are copied even when
/// the primary swap chain is multisampled (the host may have resolved already).
fn plan_transfer(
    source: &D3D11_TEXTURE2D_DESC,
    target: &D3D11_TEXTURE2D_DESC,
) -> MirrorResult<Transfer> {
    if (source.Width, source.Height) != (target.Width, target.Height) {
        return Err(MirrorError::Copy(format!(
            "source {}x{} does not match mirror {}x{}",
            source.Width, source.Height, target.Width, target.Height
        )));
    }
    if typeless_family(source.Format) != typeless_family(target.Format) {
        return Err(MirrorError::Copy(format!(
            "source format {} cannot be copied into mirror format {}",
            source.Format.0, target.Format.0
        )));
    }

    if source.SampleDesc.Count <= 1 {
        return Ok(Transfer::Copy);
    }
    // Fully typed resources must share one format; a typeless source takes the target's.
    if source.Format == target.Format || is_typeless(source.Format) {
        Ok(Transfer::Resolve(target.Format))
    } else {
        Ok(Transfer::ResolveThenCopy)
    }
}

fn ensure_resolve_target<'a>(
    device: &ID3D11Device,
    slot: &'a mut Option<ID3D11Texture2D>,
    source: &D3D11_TEXTURE2D_DESC,
) -> MirrorResult<&'a ID3D11Texture2D> {
    let stale = match slot.as_ref() {
        Some(existing) => {
            let desc = texture_desc(existing);
            (desc.Width, desc.Height, desc.Format) != (source.Width, source.Height, source.Format)
        }
        None => true,
    };

    if stale {
        let desc = D3D11_TEXTURE2D_DESC {
            Width: source.Width,
            Height: source.Height,
            MipLevels: 1,
            ArraySize: 1,
            Format: source.Format,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: Default::default(),
            CPUAccessFlags: Default::default(),
            MiscFlags: Default::default(),
        };
        let mut texture: Option<ID3D11Texture2D> = None;
        unsafe { device.CreateTexture2D(&desc, None, Some(&mut texture)) }.map_err(copy_err)?;
        debug!("Created resolve target {}x{}", desc.Width, desc.Height);
        *slot = texture;
    }

    slot.as_ref()
        .ok_or_else(|| MirrorError::Copy("CreateTexture2D returned no texture".to_string()))
}

/// Typeless group a format belongs to. Copies and resolves only work within one group.
fn typeless_family(format: DXGI_FORMAT) -> DXGI_FORMAT {
    match format {
        DXGI_FORMAT_R8G8B8A8_TYPELESS
        | DXGI_FORMAT_R8G8B8A8_UNORM
        | DXGI_FORMAT_R8G8B8A8_UNORM_SRGB
        | DXGI_FORMAT_R8G8B8A8_UINT
        | DXGI_FORMAT_R8G8B8A8_SNORM
        | DXGI_FORMAT_R8G8B8A8_SINT => DXGI_FORMAT_R8G8B8A8_TYPELESS,
        DXGI_FORMAT_B8G8R8A8_TYPELESS
        | DXGI_FORMAT_B8G8R8A8_UNORM
        | DXGI_FORMAT_B8G8R8A8_UNORM_SRGB => DXGI_FORMAT_B8G8R8A8_TYPELESS,
        DXGI_FORMAT_B8G8R8X8_TYPELESS
        | DXGI_FORMAT_B8G8R8X8_UNORM
        | DXGI_FORMAT_B8G8R8X8_UNORM_SRGB => DXGI_FORMAT_B8G8R8X8_TYPELESS,
        DXGI_FORMAT_R10G10B10A2_TYPELESS
        | DXGI_FORMAT_R10G10B10A2_UNORM
        | DXGI_FORMAT_R10G10B10A2_UINT => DXGI_FORMAT_R10G10B10A2_TYPELESS,
        DXGI_FORMAT_R16G16B16A16_TYPELESS
        | DXGI_FORMAT_R16G16B16A16_FLOAT
        | DXGI_FORMAT_R16G16B16A16_UNORM
        | DXGI_FORMAT_R16G16B16A16_UINT
        | DXGI_FORMAT_R16G16B16A16_SNORM
        | DXGI_FORMAT_R16G16B16A16_SINT => DXGI_FORMAT_R16G16B16A16_TYPELESS,
        other => other,
    }
}

fn is_typeless(format: DXGI_FORMAT) -> bool {
    matches!(
        format,
        DXGI_FORMAT_R8G8B8A8_TYPELESS
            | DXGI_FORMAT_B8G8R8A8_TYPELESS
            | DXGI_FORMAT_B8G8R8X8_TYPELESS
            | DXGI_FORMAT_R10G10B10A2_TYPELESS
            | DXGI_FORMAT_R16G16B16A16_TYPELESS
    )
}

#[inline]
fn dxgi_format(format: PixelFormat) -> DXGI_FORMAT {
    DXGI_FORMAT(format.0 as i32)
}

/// Flip-model swap chains reject sRGB back buffer formats; use the matching UNORM format.
fn flip_compatible_format(format: DXGI_FORMAT) -> DXGI_FORMAT {
    match format {
        DXGI_FORMAT_R8G8B8A8_UNORM_SRGB => DXGI_FORMAT_R8G8B8A8_UNORM,
        DXGI_FORMAT_B8G8R8A8_UNORM_SRGB => DXGI_FORMAT_B8G8R8A8_UNORM,
        other => other,
    }
}

fn descriptor_err(e: impl std::fmt::Debug) -> MirrorError {
    MirrorError::Descriptor(format!("{e:?}"))
}

fn creation_err(e: impl std::fmt::Debug) -> MirrorError {
    MirrorError::SurfaceCreation(format!("{e:?}"))
}

fn copy_err(e: impl std::fmt::Debug) -> MirrorError {
    MirrorError::Copy(format!("{e:?}"))
}
