use bevy::{
    app::{App, Plugin, Startup, Update},
    color::{HexColorError, Srgba},
    prelude::{Event, EventReader, IntoSystemConfigs, ResMut},
};
use thiserror::Error;

mod panel;
mod widget;

pub use panel::{handle_key, panel_lines, PanelCommand, PanelState};
pub use widget::{NumericRange, PanelField, FONT_SIZE_INPUT, SCALE_INPUT, TRANSPARENCY_SLIDER};

use crate::animation::AnimationMode;
use crate::config::{FontId, TextConfig};
use crate::plugin::StudioSet;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("invalid color {input:?}")]
    Color {
        input: String,
        #[source]
        source: HexColorError,
    },
}

/// A widget's new value. Applying it replaces exactly one field.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ControlEdit {
    Text(String),
    FontSize(f32),
    Color(Srgba),
    Transparency(f32),
    Scale(f32),
    Font(FontId),
    Animation(AnimationMode),
}

impl ControlEdit {
    /// Color picker input, `#RRGGBB` or `RRGGBB`.
    pub fn color_from_hex(input: &str) -> Result<ControlEdit, ControlError> {
        let color = Srgba::hex(input).map_err(|source| ControlError::Color {
            input: input.to_string(),
            source,
        })?;
        Ok(ControlEdit::Color(Srgba { alpha: 1.0, ..color }))
    }

    pub fn apply(self, config: &mut TextConfig) {
        match self {
            ControlEdit::Text(text) => config.text = text,
            ControlEdit::FontSize(size) => config.font_size = FONT_SIZE_INPUT.clamp(size),
            ControlEdit::Color(color) => config.color = color,
            ControlEdit::Transparency(alpha) => {
                config.transparency = TRANSPARENCY_SLIDER.clamp(alpha)
            }
            ControlEdit::Scale(scale) => config.scale = SCALE_INPUT.clamp(scale),
            ControlEdit::Font(font) => config.font = font,
            ControlEdit::Animation(mode) => config.animation = mode,
        }
    }
}

pub fn apply_control_edits(mut edits: EventReader<ControlEdit>, mut config: ResMut<TextConfig>) {
    for edit in edits.read() {
        bevy::log::debug!("Control edit {edit:?}");
        edit.clone().apply(&mut config);
    }
}

pub struct ControlPanelPlugin;

impl Plugin for ControlPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ControlEdit>()
            .init_resource::<PanelState>()
            .add_systems(Startup, panel::spawn_panel)
            .add_systems(Update, panel::handle_panel_keys.in_set(StudioSet::Input))
            .add_systems(Update, apply_control_edits.in_set(StudioSet::Apply))
            .add_systems(Update, panel::refresh_panel.in_set(StudioSet::Render));
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::*;

    fn edit_app() -> App {
        let mut app = App::new();
        app.add_event::<ControlEdit>()
            .init_resource::<TextConfig>()
            .add_systems(Update, apply_control_edits);
        app
    }

    #[test]
    fn in_range_values_round_trip_exactly() {
        for value in [0.0, 0.1, 0.35, 0.5, 0.9, 1.0] {
            let mut config = TextConfig::default();
            ControlEdit::FontSize(value * 2.0).apply(&mut config);
            ControlEdit::Scale(value).apply(&mut config);
            ControlEdit::Transparency(value).apply(&mut config);
            assert_eq!(config.font_size, value * 2.0);
            assert_eq!(config.scale, value);
            assert_eq!(config.transparency, value);
        }
    }

    #[test]
    fn out_of_range_values_are_clamped_by_the_widget() {
        let mut config = TextConfig::default();
        ControlEdit::FontSize(3.5).apply(&mut config);
        ControlEdit::Scale(-2.0).apply(&mut config);
        ControlEdit::Transparency(1.5).apply(&mut config);
        assert_eq!(config.font_size, 2.0);
        assert_eq!(config.scale, 0.0);
        assert_eq!(config.transparency, 1.0);
    }

    #[test]
    fn an_edit_touches_one_field() {
        let mut config = TextConfig::default();
        ControlEdit::Font(FontId::OptimerRegular).apply(&mut config);
        assert_eq!(
            config,
            TextConfig {
                font: FontId::OptimerRegular,
                ..Default::default()
            }
        );
    }

    #[test]
    fn color_input_accepts_hex() {
        let edit = ControlEdit::color_from_hex("#FF8000").unwrap();
        assert_eq!(edit, ControlEdit::Color(Srgba::rgb_u8(0xFF, 0x80, 0x00)));
        assert!(matches!(
            ControlEdit::color_from_hex("#GG0000"),
            Err(ControlError::Color { .. })
        ));
    }

    #[test]
    fn events_update_the_configuration() {
        let mut app = edit_app();
        app.world_mut().send_event(ControlEdit::Text("r3f".into()));
        app.world_mut()
            .send_event(ControlEdit::Animation(AnimationMode::Spin));
        app.update();

        let config = app.world().resource::<TextConfig>();
        assert_eq!(config.text, "r3f");
        assert_eq!(config.animation, AnimationMode::Spin);
        assert_eq!(config.font, FontId::GentilisRegular);
    }

    #[test]
    fn empty_text_is_allowed() {
        let mut app = edit_app();
        app.world_mut().send_event(ControlEdit::Text(String::new()));
        app.update();
        assert!(app.world().resource::<TextConfig>().text.is_empty());
    }
}
