//! Configuration controls drawn inside the host's overlay.

use crate::error::MirrorResult;
use crate::lifecycle::MirrorContext;
use crate::platform::{MirrorBackend, WindowSystem};

/// Immediate-mode widget calls the settings panel needs from the host's UI toolkit.
///
/// Widgets return `true` when the user changed the bound value this frame.
pub trait SettingsUi {
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool;
    fn input_int(&mut self, label: &str, value: &mut i32) -> bool;
    fn text(&mut self, text: &str);
    fn indent(&mut self);
    fn unindent(&mut self);
    fn begin_disabled(&mut self, disabled: bool);
    fn end_disabled(&mut self);
}

pub const LABEL_AFTER_EFFECTS: &str = "Mirror after effects";
pub const LABEL_HIDE_WINDOW: &str = "Hide window";
pub const LABEL_POSITION: &str = "Window position";
pub const LABEL_X: &str = "X";
pub const LABEL_Y: &str = "Y";

impl<B: MirrorBackend, W: WindowSystem> MirrorContext<B, W> {
    /// Draw the settings panel. Position or visibility changes move the mirror window right away;
    /// any change is saved.
    pub fn draw_settings<U: SettingsUi>(&mut self, ui: &mut U) -> MirrorResult<()> {
        let mut settings = self.settings.get();

        let mut settings_changed = ui.checkbox(LABEL_AFTER_EFFECTS, &mut settings.after_effects);
        let mut update_window = ui.checkbox(LABEL_HIDE_WINDOW, &mut settings.hide_window);

        ui.indent();
        ui.begin_disabled(settings.hide_window);
        ui.text(LABEL_POSITION);
        update_window |= ui.input_int(LABEL_X, &mut settings.window_x);
        update_window |= ui.input_int(LABEL_Y, &mut settings.window_y);
        ui.end_disabled();
        ui.unindent();

        settings_changed |= update_window;
        if !settings_changed {
            return Ok(());
        }

        *self.settings.get_mut() = settings;
        if update_window {
            self.host.apply_visibility(&mut self.windows, &settings)?;
        }
        self.settings.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::*;
    use crate::platform::WindowPlacement;
    use mirage_settings::{Settings, SettingsFile};

    /// Scripted UI: applies queued edits when the matching widget is drawn.
    #[derive(Default)]
    struct ScriptedUi {
        toggles: Vec<&'static str>,
        ints: Vec<(&'static str, i32)>,
        disabled: bool,
        disabled_widgets: Vec<&'static str>,
        drawn: Vec<String>,
    }

    impl SettingsUi for ScriptedUi {
        fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
            self.drawn.push(label.to_string());
            if let Some(i) = self.toggles.iter().position(|l| *l == label) {
                self.toggles.remove(i);
                *value = !*value;
                return true;
            }
            false
        }

        fn input_int(&mut self, label: &str, value: &mut i32) -> bool {
            self.drawn.push(label.to_string());
            if self.disabled {
                self.disabled_widgets.push(if label == LABEL_X { LABEL_X } else { LABEL_Y });
                return false;
            }
            if let Some(i) = self.ints.iter().position(|(l, _)| *l == label) {
                *value = self.ints.remove(i).1;
                return true;
            }
            false
        }

        fn text(&mut self, text: &str) {
            self.drawn.push(text.to_string());
        }

        fn indent(&mut self) {}

        fn unindent(&mut self) {}

        fn begin_disabled(&mut self, disabled: bool) {
            self.disabled = disabled;
        }

        fn end_disabled(&mut self) {
            self.disabled = false;
        }
    }

    #[test]
    fn unchanged_panel_has_no_side_effects() {
        let mut ctx = fake_context("panel_idle");
        ctx.on_device_ready(&d3d11()).unwrap();
        let before = ctx.windows().calls.len();

        let mut ui = ScriptedUi::default();
        ctx.draw_settings(&mut ui).unwrap();

        assert_eq!(ctx.windows().calls.len(), before);
        assert_eq!(
            ui.drawn,
            vec![
                LABEL_AFTER_EFFECTS,
                LABEL_HIDE_WINDOW,
                LABEL_POSITION,
                LABEL_X,
                LABEL_Y
            ]
        );
        assert_eq!(ui.disabled_widgets, vec![LABEL_X, LABEL_Y]);
    }

    #[test]
    fn showing_window_moves_it_once_to_explicit_position() {
        let settings = Settings {
            window_x: 50,
            window_y: 50,
            ..Settings::default()
        };
        let mut ctx = fake_context_with("panel_show", settings);
        ctx.on_device_ready(&d3d11()).unwrap();
        let mirror = ctx.mirror_window().unwrap();
        let before = ctx.windows().placements(mirror).len();

        let mut ui = ScriptedUi {
            toggles: vec![LABEL_HIDE_WINDOW],
            ..ScriptedUi::default()
        };
        ctx.draw_settings(&mut ui).unwrap();

        let placements = ctx.windows().placements(mirror);
        assert_eq!(placements.len(), before + 1);
        assert_eq!(
            placements.last(),
            Some(&WindowPlacement::Move {
                x: 50,
                y: 50,
                activate: true,
            })
        );
        assert!(!ctx.settings().get().hide_window);
    }

    #[test]
    fn hiding_window_returns_it_to_anchor() {
        let settings = Settings {
            hide_window: false,
            ..Settings::default()
        };
        let mut ctx = fake_context_with("panel_hide", settings);
        ctx.on_device_ready(&d3d11()).unwrap();
        let mirror = ctx.mirror_window().unwrap();

        let mut ui = ScriptedUi {
            toggles: vec![LABEL_HIDE_WINDOW],
            ..ScriptedUi::default()
        };
        ctx.draw_settings(&mut ui).unwrap();

        assert_eq!(
            ctx.windows().placements(mirror).last(),
            Some(&WindowPlacement::Move {
                x: 0,
                y: 1180,
                activate: false,
            })
        );
    }

    #[test]
    fn position_edit_moves_visible_window_and_saves() {
        let settings = Settings {
            hide_window: false,
            ..Settings::default()
        };
        let mut ctx = fake_context_with("panel_position", settings);
        ctx.on_device_ready(&d3d11()).unwrap();
        let mirror = ctx.mirror_window().unwrap();

        let mut ui = ScriptedUi {
            ints: vec![(LABEL_X, 300), (LABEL_Y, -40)],
            ..ScriptedUi::default()
        };
        ctx.draw_settings(&mut ui).unwrap();

        assert_eq!(
            ctx.windows().placements(mirror).last(),
            Some(&WindowPlacement::Move {
                x: 300,
                y: -40,
                activate: true,
            })
        );
        let saved = std::fs::read_to_string(ctx.settings().path()).unwrap();
        let saved = SettingsFile::parse(&saved).unwrap();
        assert_eq!((saved.window_x, saved.window_y), (300, -40));
    }

    #[test]
    fn timing_toggle_saves_without_moving_window() {
        let mut ctx = fake_context("panel_timing");
        ctx.on_device_ready(&d3d11()).unwrap();
        let before = ctx.windows().calls.len();

        let mut ui = ScriptedUi {
            toggles: vec![LABEL_AFTER_EFFECTS],
            ..ScriptedUi::default()
        };
        ctx.draw_settings(&mut ui).unwrap();

        assert_eq!(ctx.windows().calls.len(), before);
        let saved = std::fs::read_to_string(ctx.settings().path()).unwrap();
        assert!(!SettingsFile::parse(&saved).unwrap().after_effects);
    }
}
