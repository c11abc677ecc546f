//! Per-frame copy of the primary render target into the mirror.
//!
//! The host calls one hook before its late effects pass and one after. Only the hook matching
//! the configured [`CopyTiming`] does any work, so exactly one copy and one present happen per
//! frame.

use crate::error::MirrorResult;
use crate::host::HostEffectRuntime;
use crate::lifecycle::MirrorContext;
use crate::platform::{MirrorBackend, WindowSystem};
use crate::surface::CopyMode;
use mirage_settings::CopyTiming;

impl<B: MirrorBackend, W: WindowSystem> MirrorContext<B, W> {
    /// Hook invoked before the host's late effects pass.
    pub fn on_pre_late_effects(
        &mut self,
        runtime: &B::Runtime,
        source: &B::SourceView,
    ) -> MirrorResult<()> {
        self.on_effects_hook(CopyTiming::BeforeEffects, runtime, source)
    }

    /// Hook invoked after the host's late effects pass.
    pub fn on_post_late_effects(
        &mut self,
        runtime: &B::Runtime,
        source: &B::SourceView,
    ) -> MirrorResult<()> {
        self.on_effects_hook(CopyTiming::AfterEffects, runtime, source)
    }

    fn on_effects_hook(
        &mut self,
        hook: CopyTiming,
        runtime: &B::Runtime,
        source: &B::SourceView,
    ) -> MirrorResult<()> {
        if self.settings.copy_timing() != hook || self.host.is_mirror_window(runtime.window()) {
            return Ok(());
        }
        self.copy_and_present(runtime, source)
    }

    /// Copy `source` into the mirror back buffer and present it.
    ///
    /// No-op until the mirror surface exists.
    pub fn copy_and_present(
        &mut self,
        runtime: &B::Runtime,
        source: &B::SourceView,
    ) -> MirrorResult<()> {
        let Some(mirror) = self.mirror.as_mut() else {
            return Ok(());
        };
        let mode = CopyMode::for_primary(self.multisampled, self.primary_format);
        self.backend.copy_to_mirror(runtime, source, mirror, mode)?;
        self.backend.present_mirror(mirror)
    }
}
