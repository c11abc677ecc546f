use log::{debug, info};

use crate::error::MirrorResult;
use crate::geometry::compute_hidden_anchor;
use crate::host::WindowId;
use crate::platform::{WindowPlacement, WindowSystem};
use mirage_settings::Settings;

/// Window message kinds the host cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    Close,
    DisplayChange,
    Other,
}

/// What the window procedure should do after [`WindowHost::handle_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDisposition {
    /// Message consumed; return 0.
    Handled,
    /// Fall through to the default window procedure.
    Default,
}

/// Owner + mirror window pair.
#[derive(Debug, Default)]
pub struct WindowHost {
    class_registered: bool,
    owner: Option<WindowId>,
    mirror: Option<WindowId>,
    hidden_anchor: (i32, i32),
}

impl WindowHost {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn owner_window(&self) -> Option<WindowId> {
        self.owner
    }

    #[inline]
    pub fn mirror_window(&self) -> Option<WindowId> {
        self.mirror
    }

    #[inline]
    pub fn is_created(&self) -> bool {
        self.owner.is_some() || self.mirror.is_some()
    }

    #[inline]
    pub fn is_mirror_window(&self, window: WindowId) -> bool {
        self.mirror == Some(window)
    }

    /// Register the class, create both windows and place the mirror per `settings`.
    pub fn create<W: WindowSystem>(&mut self, ws: &mut W, settings: &Settings) -> MirrorResult<()> {
        ws.register_window_class()?;
        self.class_registered = true;

        let owner = ws.create_owner_window()?;
        self.owner = Some(owner);
        let mirror = ws.create_mirror_window(owner)?;
        self.mirror = Some(mirror);
        info!("Created mirror window {:#x}", mirror.raw());

        self.refresh_hidden_anchor(ws);
        self.apply_visibility(ws, settings)
    }

    /// Destroy both windows and unregister the class. Safe on a partially created pair.
    pub fn destroy<W: WindowSystem>(&mut self, ws: &mut W) {
        if let Some(mirror) = self.mirror.take() {
            ws.destroy_window(mirror);
        }
        if let Some(owner) = self.owner.take() {
            ws.destroy_window(owner);
        }
        if self.class_registered {
            ws.unregister_window_class();
            self.class_registered = false;
        }
    }

    fn refresh_hidden_anchor<W: WindowSystem>(&mut self, ws: &W) {
        self.hidden_anchor = compute_hidden_anchor(&ws.display_rects());
        debug!(
            "Hidden anchor at ({}, {})",
            self.hidden_anchor.0, self.hidden_anchor.1
        );
    }

    /// Move the mirror to the hidden anchor or the explicit position, per the visibility policy.
    ///
    /// A visible window may take activation; a hidden one never does.
    pub fn apply_visibility<W: WindowSystem>(
        &self,
        ws: &mut W,
        settings: &Settings,
    ) -> MirrorResult<()> {
        let Some(mirror) = self.mirror else {
            return Ok(());
        };
        let (x, y) = if settings.hide_window {
            self.hidden_anchor
        } else {
            settings.visible_position()
        };
        ws.place_window(
            mirror,
            WindowPlacement::Move {
                x,
                y,
                activate: !settings.hide_window,
            },
        )
    }

    /// Display layout changed: recompute the anchor and re-hide the mirror when hidden.
    pub fn display_changed<W: WindowSystem>(
        &mut self,
        ws: &mut W,
        settings: &Settings,
    ) -> MirrorResult<()> {
        self.refresh_hidden_anchor(ws);
        match self.mirror {
            Some(mirror) if settings.hide_window => ws.place_window(
                mirror,
                WindowPlacement::Move {
                    x: self.hidden_anchor.0,
                    y: self.hidden_anchor.1,
                    activate: false,
                },
            ),
            _ => Ok(()),
        }
    }

    /// Size the mirror's client area to the primary window's actual client rectangle.
    pub fn fit_to_client<W: WindowSystem>(
        &self,
        ws: &mut W,
        primary_window: WindowId,
    ) -> MirrorResult<()> {
        let Some(mirror) = self.mirror else {
            return Ok(());
        };
        let (width, height) = ws.client_size(primary_window)?;
        ws.place_window(mirror, WindowPlacement::Resize { width, height })
    }

    /// Window procedure logic shared by both windows.
    ///
    /// Close requests are swallowed: the pair lives exactly as long as the device. Display changes
    /// only count when they reach the owner window.
    pub fn handle_message<W: WindowSystem>(
        &mut self,
        ws: &mut W,
        settings: &Settings,
        window: WindowId,
        message: WindowMessage,
    ) -> MirrorResult<MessageDisposition> {
        match message {
            WindowMessage::Close => Ok(MessageDisposition::Handled),
            WindowMessage::DisplayChange => {
                if self.owner == Some(window) {
                    self.display_changed(ws, settings)?;
                }
                Ok(MessageDisposition::Handled)
            }
            WindowMessage::Other => Ok(MessageDisposition::Default),
        }
    }
}
