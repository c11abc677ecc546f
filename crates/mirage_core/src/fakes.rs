// Recording fakes of the backend and window system traits.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use mirage_settings::{Settings, SettingsStore};

use crate::error::{MirrorError, MirrorResult};
use crate::geometry::DisplayRect;
use crate::host::{DeviceApi, DeviceInfo, HostEffectRuntime, HostSwapchain, WindowId};
use crate::lifecycle::MirrorContext;
use crate::platform::{MirrorBackend, WindowPlacement, WindowSystem};
use crate::surface::{CopyMode, MirrorDescriptor, PixelFormat, SurfaceDescriptor};

pub(crate) const GAME_DEVICE: usize = 0xd3d1;

pub(crate) fn d3d11() -> DeviceInfo {
    DeviceInfo::new(DeviceApi::D3D11, GAME_DEVICE)
}

pub(crate) struct FakeSwapchain {
    pub window: WindowId,
    pub desc: SurfaceDescriptor,
}

impl FakeSwapchain {
    pub fn new(window: usize, width: u32, height: u32, sample_count: u32) -> Self {
        Self {
            window: WindowId::from_raw(window),
            desc: SurfaceDescriptor {
                width,
                height,
                format: PixelFormat(28),
                sample_count,
                stereo: false,
            },
        }
    }
}

impl HostSwapchain for FakeSwapchain {
    fn window(&self) -> WindowId {
        self.window
    }
}

pub(crate) struct FakeRuntime(pub WindowId);

impl HostEffectRuntime for FakeRuntime {
    fn window(&self) -> WindowId {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FakeView(pub u32);

#[derive(Debug)]
pub(crate) struct FakeMirror {
    pub window: WindowId,
    pub desc: MirrorDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BackendCall {
    Create,
    Resize(u32, u32),
    Copy(FakeView, CopyMode),
    Present,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub calls: Vec<BackendCall>,
    pub fail_create: bool,
    pub fail_resize: bool,
}

impl FakeBackend {
    pub fn count(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl MirrorBackend for FakeBackend {
    type Swapchain = FakeSwapchain;
    type Runtime = FakeRuntime;
    type SourceView = FakeView;
    type MirrorSurface = FakeMirror;

    fn primary_descriptor(&self, primary: &FakeSwapchain) -> MirrorResult<SurfaceDescriptor> {
        Ok(primary.desc)
    }

    fn create_mirror_surface(
        &mut self,
        _primary: &FakeSwapchain,
        window: WindowId,
        desc: &MirrorDescriptor,
    ) -> MirrorResult<FakeMirror> {
        if self.fail_create {
            return Err(MirrorError::SurfaceCreation("device removed".to_string()));
        }
        self.calls.push(BackendCall::Create);
        Ok(FakeMirror {
            window,
            desc: *desc,
        })
    }

    fn resize_mirror_surface(
        &mut self,
        mirror: &mut FakeMirror,
        desc: &MirrorDescriptor,
    ) -> MirrorResult<()> {
        if self.fail_resize {
            return Err(MirrorError::SurfaceResize("device removed".to_string()));
        }
        self.calls.push(BackendCall::Resize(desc.width, desc.height));
        mirror.desc.width = desc.width;
        mirror.desc.height = desc.height;
        mirror.desc.format = desc.format;
        Ok(())
    }

    fn copy_to_mirror(
        &mut self,
        _runtime: &FakeRuntime,
        source: &FakeView,
        _mirror: &mut FakeMirror,
        mode: CopyMode,
    ) -> MirrorResult<()> {
        self.calls.push(BackendCall::Copy(*source, mode));
        Ok(())
    }

    fn present_mirror(&mut self, _mirror: &FakeMirror) -> MirrorResult<()> {
        self.calls.push(BackendCall::Present);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WsCall {
    RegisterClass,
    UnregisterClass,
    CreateOwner(WindowId),
    CreateMirror(WindowId),
    Destroy(WindowId),
    Place(WindowId, WindowPlacement),
}

pub(crate) struct FakeWindows {
    pub calls: Vec<WsCall>,
    pub displays: Vec<DisplayRect>,
    pub client_sizes: HashMap<WindowId, (i32, i32)>,
    pub fail_mirror_window: bool,
    next_window: usize,
}

impl Default for FakeWindows {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            displays: vec![
                DisplayRect::new(0, 0, 1920, 1080),
                DisplayRect::new(1920, 0, 3840, 1080),
            ],
            client_sizes: HashMap::new(),
            fail_mirror_window: false,
            next_window: 0x100,
        }
    }
}

impl FakeWindows {
    pub fn count(&self, pred: impl Fn(&WsCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn placements(&self, window: WindowId) -> Vec<WindowPlacement> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                WsCall::Place(w, placement) if *w == window => Some(*placement),
                _ => None,
            })
            .collect()
    }

    fn allocate(&mut self) -> WindowId {
        self.next_window += 0x10;
        WindowId::from_raw(self.next_window)
    }
}

impl WindowSystem for FakeWindows {
    fn register_window_class(&mut self) -> MirrorResult<()> {
        self.calls.push(WsCall::RegisterClass);
        Ok(())
    }

    fn unregister_window_class(&mut self) {
        self.calls.push(WsCall::UnregisterClass);
    }

    fn create_owner_window(&mut self) -> MirrorResult<WindowId> {
        let window = self.allocate();
        self.calls.push(WsCall::CreateOwner(window));
        Ok(window)
    }

    fn create_mirror_window(&mut self, _owner: WindowId) -> MirrorResult<WindowId> {
        if self.fail_mirror_window {
            return Err(MirrorError::Window("CreateWindowExW failed".to_string()));
        }
        let window = self.allocate();
        self.calls.push(WsCall::CreateMirror(window));
        Ok(window)
    }

    fn destroy_window(&mut self, window: WindowId) {
        self.calls.push(WsCall::Destroy(window));
    }

    fn client_size(&self, window: WindowId) -> MirrorResult<(i32, i32)> {
        Ok(self
            .client_sizes
            .get(&window)
            .copied()
            .unwrap_or((1920, 1080)))
    }

    fn place_window(&mut self, window: WindowId, placement: WindowPlacement) -> MirrorResult<()> {
        self.calls.push(WsCall::Place(window, placement));
        Ok(())
    }

    fn display_rects(&self) -> Vec<DisplayRect> {
        self.displays.clone()
    }
}

pub(crate) type FakeContext = MirrorContext<FakeBackend, FakeWindows>;

fn temp_settings_path(name: &str) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir()
        .join(format!("mirage_core_{}_{n}", std::process::id()))
        .join(format!("{name}.json"))
}

pub(crate) fn fake_context(name: &str) -> FakeContext {
    fake_context_with(name, Settings::default())
}

pub(crate) fn fake_context_with(name: &str, settings: Settings) -> FakeContext {
    let mut store = SettingsStore::load(temp_settings_path(name));
    *store.get_mut() = settings;
    MirrorContext::new(FakeBackend::default(), FakeWindows::default(), store)
}
