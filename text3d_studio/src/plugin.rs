use bevy::app::Plugin;
use bevy::prelude::*;

use super::animation::{self, AnimationClock};
use super::config::{StudioSettings, TextConfig};
use super::control_panel::ControlPanelPlugin;
use super::export::ExportPlugin;
use super::font::TypefacePlugin;
use super::text_mesh::TextMeshPlugin;

/// Frame order: read input, apply edits, redraw, animate, export.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudioSet {
    Input,
    Apply,
    Render,
    Animate,
    Export,
}

#[derive(Default)]
pub struct Text3dStudioPlugin {
    pub settings: StudioSettings,
}

impl Text3dStudioPlugin {
    pub fn new(settings: StudioSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for Text3dStudioPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .init_resource::<TextConfig>()
            .init_resource::<AnimationClock>()
            .configure_sets(
                Update,
                (
                    StudioSet::Input,
                    StudioSet::Apply,
                    StudioSet::Render,
                    StudioSet::Animate,
                    StudioSet::Export,
                )
                    .chain(),
            )
            .add_plugins(TypefacePlugin)
            .add_plugins(TextMeshPlugin)
            .add_plugins(ControlPanelPlugin)
            .add_plugins(ExportPlugin)
            .add_systems(
                Update,
                (
                    animation::tick_animation_clock,
                    animation::apply_animation_offset,
                )
                    .chain()
                    .in_set(StudioSet::Animate),
            );
    }
}
