use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::log;
use bevy::prelude::*;

use super::widget::{PanelField, FONT_SIZE_INPUT, SCALE_INPUT, TRANSPARENCY_SLIDER};
use super::ControlEdit;
use crate::config::TextConfig;
use crate::export::ExportRequested;

const PANEL_FONT_SIZE: f32 = 16.0;
const LABEL_COLOR: Color = Color::srgb(0.85, 0.85, 0.85);
const FOCUS_COLOR: Color = Color::srgb(1.0, 0.8, 0.3);
const HINT: &str = "Up/Down: select  Left/Right: adjust  Enter: apply/export";

/// Focused row plus the colour being typed, before it is committed.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PanelState {
    pub focus: PanelField,
    pub color_draft: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    Edit(ControlEdit),
    Export,
}

#[derive(Component)]
pub struct ControlPanelText;

/// Maps one key press on the focused row to a panel command.
pub fn handle_key(state: &mut PanelState, config: &TextConfig, key: &Key) -> Option<PanelCommand> {
    match key {
        Key::ArrowDown | Key::Tab => {
            state.focus = state.focus.next();
            state.color_draft = None;
            return None;
        }
        Key::ArrowUp => {
            state.focus = state.focus.prev();
            state.color_draft = None;
            return None;
        }
        _ => {}
    }

    let edit = match (state.focus, key) {
        (PanelField::Text, Key::Character(chars)) => {
            let typed: String = chars.chars().filter(|c| !c.is_control()).collect();
            ControlEdit::Text(format!("{}{}", config.text, typed))
        }
        (PanelField::Text, Key::Space) => ControlEdit::Text(format!("{} ", config.text)),
        (PanelField::Text, Key::Backspace) => {
            let mut text = config.text.clone();
            text.pop();
            ControlEdit::Text(text)
        }

        (PanelField::FontSize, Key::ArrowRight) => {
            ControlEdit::FontSize(FONT_SIZE_INPUT.step_up(config.font_size))
        }
        (PanelField::FontSize, Key::ArrowLeft) => {
            ControlEdit::FontSize(FONT_SIZE_INPUT.step_down(config.font_size))
        }
        (PanelField::Transparency, Key::ArrowRight) => {
            ControlEdit::Transparency(TRANSPARENCY_SLIDER.step_up(config.transparency))
        }
        (PanelField::Transparency, Key::ArrowLeft) => {
            ControlEdit::Transparency(TRANSPARENCY_SLIDER.step_down(config.transparency))
        }
        (PanelField::Scale, Key::ArrowRight) => {
            ControlEdit::Scale(SCALE_INPUT.step_up(config.scale))
        }
        (PanelField::Scale, Key::ArrowLeft) => {
            ControlEdit::Scale(SCALE_INPUT.step_down(config.scale))
        }

        (PanelField::Color, Key::Character(chars)) => {
            let draft = state.color_draft.get_or_insert_with(String::new);
            for c in chars.chars().filter(|c| c.is_ascii_hexdigit() || *c == '#') {
                if draft.len() < 7 {
                    draft.push(c);
                }
            }
            return None;
        }
        (PanelField::Color, Key::Backspace) => {
            if let Some(draft) = state.color_draft.as_mut() {
                draft.pop();
            }
            return None;
        }
        (PanelField::Color, Key::Enter) => {
            let draft = state.color_draft.take()?;
            match ControlEdit::color_from_hex(&draft) {
                Ok(edit) => edit,
                Err(err) => {
                    log::warn!("{err}, keeping {}", config.color_hex());
                    return None;
                }
            }
        }

        (PanelField::Font, Key::ArrowRight) => ControlEdit::Font(config.font.next()),
        (PanelField::Font, Key::ArrowLeft) => ControlEdit::Font(config.font.prev()),
        (PanelField::Animation, Key::ArrowRight) => ControlEdit::Animation(config.animation.next()),
        (PanelField::Animation, Key::ArrowLeft) => ControlEdit::Animation(config.animation.prev()),

        (PanelField::Export, Key::Enter) => return Some(PanelCommand::Export),
        _ => return None,
    };
    Some(PanelCommand::Edit(edit))
}

/// One `(text, focused)` line per panel row.
pub fn panel_lines(config: &TextConfig, state: &PanelState) -> Vec<(String, bool)> {
    PanelField::ALL
        .into_iter()
        .map(|field| {
            let value = match field {
                PanelField::Text => format!("{:?}", config.text),
                PanelField::FontSize => format!("{:.2}", config.font_size),
                PanelField::Color => match &state.color_draft {
                    Some(draft) if field == state.focus => format!("{draft}_"),
                    _ => config.color_hex(),
                },
                PanelField::Transparency => format!("{:.1}", config.transparency),
                PanelField::Scale => format!("{:.1}", config.scale),
                PanelField::Font => config.font.label().to_string(),
                PanelField::Animation => config.animation.label().to_string(),
                PanelField::Export => String::new(),
            };
            let focused = field == state.focus;
            let marker = if focused { ">" } else { " " };
            let line = if field == PanelField::Export {
                format!("{marker} [{}]\n", field.label())
            } else {
                format!("{marker} {}: {value}\n", field.label())
            };
            (line, focused)
        })
        .collect()
}

fn line_section(text: String, focused: bool) -> TextSection {
    TextSection::new(
        text,
        TextStyle {
            font_size: PANEL_FONT_SIZE,
            color: if focused { FOCUS_COLOR } else { LABEL_COLOR },
            ..default()
        },
    )
}

pub fn spawn_panel(mut commands: Commands, config: Res<TextConfig>, state: Res<PanelState>) {
    let mut sections: Vec<TextSection> = panel_lines(&config, &state)
        .into_iter()
        .map(|(text, focused)| line_section(text, focused))
        .collect();
    sections.push(line_section(HINT.to_string(), false));

    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                right: Val::Px(12.0),
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            background_color: Color::srgba(0.0, 0.0, 0.0, 0.6).into(),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((TextBundle::from_sections(sections), ControlPanelText));
        });
}

pub fn handle_panel_keys(
    mut keys: EventReader<KeyboardInput>,
    mut state: ResMut<PanelState>,
    config: Res<TextConfig>,
    mut edits: EventWriter<ControlEdit>,
    mut exports: EventWriter<ExportRequested>,
) {
    // several presses can land in one frame, each builds on the previous one
    let mut preview: Option<TextConfig> = None;
    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        let current = preview.get_or_insert_with(|| config.clone());
        match handle_key(&mut state, current, &event.logical_key) {
            Some(PanelCommand::Edit(edit)) => {
                edit.clone().apply(current);
                edits.send(edit);
            }
            Some(PanelCommand::Export) => {
                exports.send(ExportRequested);
            }
            None => {}
        }
    }
}

pub fn refresh_panel(
    config: Res<TextConfig>,
    state: Res<PanelState>,
    mut query: Query<&mut Text, With<ControlPanelText>>,
) {
    if !config.is_changed() && !state.is_changed() {
        return;
    }
    for mut text in query.iter_mut() {
        let lines = panel_lines(&config, &state);
        for (section, (line, focused)) in text.sections.iter_mut().zip(lines) {
            section.value = line;
            section.style.color = if focused { FOCUS_COLOR } else { LABEL_COLOR };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationMode;
    use crate::config::FontId;

    fn press(state: &mut PanelState, config: &mut TextConfig, key: Key) -> Option<PanelCommand> {
        let command = handle_key(state, config, &key);
        if let Some(PanelCommand::Edit(edit)) = &command {
            edit.clone().apply(config);
        }
        command
    }

    #[test]
    fn typing_edits_the_text() {
        let mut state = PanelState::default();
        let mut config = TextConfig::default();
        for _ in 0..5 {
            press(&mut state, &mut config, Key::Backspace);
        }
        assert_eq!(config.text, "");
        press(&mut state, &mut config, Key::Character("r".into()));
        press(&mut state, &mut config, Key::Character("3".into()));
        press(&mut state, &mut config, Key::Character("f".into()));
        press(&mut state, &mut config, Key::Space);
        assert_eq!(config.text, "r3f ");
    }

    #[test]
    fn arrows_step_numeric_rows() {
        let mut state = PanelState {
            focus: PanelField::FontSize,
            ..Default::default()
        };
        let mut config = TextConfig::default();
        press(&mut state, &mut config, Key::ArrowRight);
        assert_eq!(config.font_size, 1.2);

        state.focus = PanelField::Transparency;
        press(&mut state, &mut config, Key::ArrowRight);
        assert_eq!(config.transparency, 1.0);
        press(&mut state, &mut config, Key::ArrowLeft);
        assert_eq!(config.transparency, 0.9);
    }

    #[test]
    fn selects_cycle() {
        let mut state = PanelState {
            focus: PanelField::Font,
            ..Default::default()
        };
        let mut config = TextConfig::default();
        press(&mut state, &mut config, Key::ArrowRight);
        assert_eq!(config.font, FontId::HelvetikerRegular);

        press(&mut state, &mut config, Key::ArrowDown);
        assert_eq!(state.focus, PanelField::Animation);
        press(&mut state, &mut config, Key::ArrowLeft);
        assert_eq!(config.animation, AnimationMode::Spin);
    }

    #[test]
    fn color_commits_on_enter() {
        let mut state = PanelState {
            focus: PanelField::Color,
            ..Default::default()
        };
        let mut config = TextConfig::default();
        press(&mut state, &mut config, Key::Character("#".into()));
        press(&mut state, &mut config, Key::Character("ff0000zz".into()));
        assert_eq!(state.color_draft.as_deref(), Some("#ff0000"));
        assert_eq!(config.color_hex(), "#6495ED");

        press(&mut state, &mut config, Key::Enter);
        assert_eq!(config.color_hex(), "#FF0000");
        assert_eq!(state.color_draft, None);
    }

    #[test]
    fn bad_color_is_discarded() {
        let mut state = PanelState {
            focus: PanelField::Color,
            color_draft: Some("#12".into()),
        };
        let mut config = TextConfig::default();
        assert_eq!(press(&mut state, &mut config, Key::Enter), None);
        assert_eq!(config, TextConfig::default());
        assert_eq!(state.color_draft, None);
    }

    #[test]
    fn enter_on_export_row_requests_export() {
        let mut state = PanelState {
            focus: PanelField::Export,
            ..Default::default()
        };
        let mut config = TextConfig::default();
        assert_eq!(
            press(&mut state, &mut config, Key::Enter),
            Some(PanelCommand::Export)
        );
        assert_eq!(
            press(&mut state, &mut config, Key::Character("x".into())),
            None
        );
    }

    #[test]
    fn panel_marks_the_focused_row() {
        let state = PanelState {
            focus: PanelField::Scale,
            ..Default::default()
        };
        let lines = panel_lines(&TextConfig::default(), &state);
        assert_eq!(lines.len(), PanelField::ALL.len());
        let focused: Vec<_> = lines.iter().filter(|(_, focused)| *focused).collect();
        assert_eq!(focused.len(), 1);
        assert_eq!(focused[0].0, "> Text Scaling: 1.0\n");
        assert_eq!(lines[0].0, "  Text: \"hello\"\n");
    }
}
