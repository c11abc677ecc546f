/// Opaque window identifier.
///
/// This is used to avoid leaking platform window handles (e.g. Win32 `HWND`) across crate
/// boundaries. Platform backends can convert to/from raw handles as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(usize);

impl WindowId {
    #[inline]
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> usize {
        self.0
    }
}

/// Rendering API behind a host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceApi {
    D3D9,
    D3D10,
    D3D11,
    D3D12,
    OpenGL,
    Vulkan,
    Unknown(u32),
}

impl DeviceApi {
    /// The only API the mirror supports.
    pub const SUPPORTED: DeviceApi = DeviceApi::D3D11;

    /// Map the host's numeric API id.
    pub fn from_host_id(id: u32) -> Self {
        match id {
            0x9000 => Self::D3D9,
            0xa000 => Self::D3D10,
            0xb000 => Self::D3D11,
            0xc000 => Self::D3D12,
            0x10000 => Self::OpenGL,
            0x20000 => Self::Vulkan,
            other => Self::Unknown(other),
        }
    }

    #[inline]
    pub fn is_supported(self) -> bool {
        self == Self::SUPPORTED
    }
}

/// Host device handle.
pub trait HostDevice {
    fn api(&self) -> DeviceApi;
    /// Identity of the device (its native pointer). Events for other devices leave the mirror
    /// alone.
    fn id(&self) -> usize;
}

/// Device as the host reports it: API id plus native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub api: DeviceApi,
    pub id: usize,
}

impl DeviceInfo {
    pub fn new(api: DeviceApi, id: usize) -> Self {
        Self { api, id }
    }
}

impl HostDevice for DeviceInfo {
    fn api(&self) -> DeviceApi {
        self.api
    }

    fn id(&self) -> usize {
        self.id
    }
}

/// Host swap chain (the primary surface, or the mirror's own when the host hooks it).
pub trait HostSwapchain {
    /// Window the swap chain presents to.
    fn window(&self) -> WindowId;
}

/// Host effect runtime attached to a swap chain.
pub trait HostEffectRuntime {
    /// Window of the swap chain the runtime renders for.
    fn window(&self) -> WindowId;
}
