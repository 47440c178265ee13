use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use text3d_studio::config::StudioSettings;
use text3d_studio::Text3dStudioPlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    level: Level::INFO,
                    filter: "wgpu=error,naga=warn,text3d_studio=debug".to_string(),
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "3D Text Studio".into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(ClearColor(Color::srgb(0.08, 0.08, 0.1)))
        .add_plugins(Text3dStudioPlugin::new(StudioSettings::default()))
        .run();
}
