/// Raw pixel format value of the rendering backend (a `DXGI_FORMAT` for Direct3D 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelFormat(pub u32);

/// Descriptor of the host-owned primary surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub sample_count: u32,
    pub stereo: bool,
}

impl SurfaceDescriptor {
    #[inline]
    pub fn is_multisampled(&self) -> bool {
        self.sample_count > 1
    }
}

/// Descriptor of the mirror surface. The mirror always presents with the flip-discard model and
/// no scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub sample_count: u32,
    pub stereo: bool,
    pub buffer_count: u32,
}

impl MirrorDescriptor {
    pub const BUFFER_COUNT: u32 = 2;

    /// Mirror of `primary`: same size and format, single-sampled, mono, double-buffered.
    pub fn derive(primary: &SurfaceDescriptor) -> Self {
        Self {
            width: primary.width,
            height: primary.height,
            format: primary.format,
            sample_count: 1,
            stereo: false,
            buffer_count: Self::BUFFER_COUNT,
        }
    }
}

/// How the primary's render target is transferred into the mirror back buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Plain resource copy; source and destination share size, format and sample count.
    Copy,
    /// Multisampled source resolved into the single-sampled back buffer.
    Resolve { format: PixelFormat },
}

impl CopyMode {
    pub fn for_primary(multisampled: bool, format: PixelFormat) -> Self {
        if multisampled {
            Self::Resolve { format }
        } else {
            Self::Copy
        }
    }
}
