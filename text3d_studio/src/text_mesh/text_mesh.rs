use bevy::asset::{AssetEvent, AssetServer, Assets, Handle, LoadState};
use bevy::log;
use bevy::pbr::{
    AmbientLight, DirectionalLight, DirectionalLightBundle, PbrBundle, StandardMaterial,
};
use bevy::prelude::*;

use super::geometry::{build_text_geometry, TextGeometry};
use crate::config::{FontId, StudioSettings, TextConfig};
use crate::font::{GlyphSource, Typeface, TypefaceHandles};

/// Marks the entity holding the rendered text mesh.
#[derive(Component, Debug, Default)]
pub struct StudioText;

/// The text exactly as configured, with no animation applied.
pub fn static_geometry(
    config: &TextConfig,
    settings: &StudioSettings,
    source: &impl GlyphSource,
) -> TextGeometry {
    build_text_geometry(source, &config.text, config.font_size, &settings.extrude)
}

pub fn text_material(config: &TextConfig) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::Srgba(config.material_color()),
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        perceptual_roughness: 0.6,
        ..default()
    }
}

pub fn spawn_text_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<TextConfig>,
) {
    commands.spawn(Camera3dBundle {
        projection: PerspectiveProjection {
            fov: 45f32.to_radians(),
            near: 0.1,
            far: 200.0,
            ..default()
        }
        .into(),
        transform: Transform::from_xyz(4.0, -2.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 500.0,
    });
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 4000.0,
            ..default()
        },
        transform: Transform::from_xyz(3.0, 6.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(TextGeometry::default().into_mesh()),
            material: materials.add(text_material(&config)),
            transform: Transform::from_scale(Vec3::splat(config.scale)),
            visibility: Visibility::Hidden,
            ..default()
        },
        StudioText,
    ));
}

/// The configuration fields the mesh itself depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    text: String,
    font: FontId,
    font_size: f32,
}

impl TextShape {
    fn of(config: &TextConfig) -> Self {
        Self {
            text: config.text.clone(),
            font: config.font,
            font_size: config.font_size,
        }
    }

    fn matches(&self, config: &TextConfig) -> bool {
        self.text == config.text && self.font == config.font && self.font_size == config.font_size
    }
}

/// Regenerates the text mesh when the text, font or font size changes, or the
/// selected typeface finishes loading. A typeface that failed to load hides
/// the text until another font is picked.
#[allow(clippy::too_many_arguments)]
pub fn rebuild_text_mesh(
    config: Res<TextConfig>,
    settings: Res<StudioSettings>,
    handles: Res<TypefaceHandles>,
    typefaces: Res<Assets<Typeface>>,
    asset_server: Res<AssetServer>,
    mut typeface_events: EventReader<AssetEvent<Typeface>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut query: Query<(&Handle<Mesh>, &mut Visibility), With<StudioText>>,
    mut built: Local<Option<TextShape>>,
    mut waiting: Local<bool>,
) {
    let Some(handle) = handles.get(config.font) else {
        return;
    };
    let loaded = typeface_events
        .read()
        .fold(false, |loaded, event| {
            loaded | event.is_loaded_with_dependencies(handle.id())
        });
    let reshaped =
        config.is_changed() && !built.as_ref().is_some_and(|shape| shape.matches(&config));
    if !reshaped && !loaded && !*waiting {
        return;
    }
    *built = Some(TextShape::of(&config));

    let Some(typeface) = typefaces.get(handle) else {
        let failed = matches!(asset_server.load_state(handle.id()), LoadState::Failed(_));
        *waiting = !failed;
        if failed {
            log::error!(
                "Typeface {} is unavailable, pick another font",
                config.font.asset_name()
            );
            for (_, mut visibility) in query.iter_mut() {
                *visibility = Visibility::Hidden;
            }
        }
        return;
    };
    *waiting = false;

    let geometry = static_geometry(&config, &settings, typeface);
    log::debug!(
        "Rebuilt {:?}: {} vertices, {} triangles",
        config.text,
        geometry.vertex_count(),
        geometry.triangle_count()
    );
    let empty = geometry.is_empty();
    let mesh = geometry.into_mesh();
    for (mesh_handle, mut visibility) in query.iter_mut() {
        meshes.insert(mesh_handle.id(), mesh.clone());
        *visibility = if empty {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
}

/// Colour, opacity and uniform scale follow the configuration.
pub fn update_text_style(
    config: Res<TextConfig>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&Handle<StandardMaterial>, &mut Transform), With<StudioText>>,
) {
    if !config.is_changed() {
        return;
    }
    for (material_handle, mut transform) in query.iter_mut() {
        if let Some(material) = materials.get_mut(material_handle) {
            material.base_color = Color::Srgba(config.material_color());
        }
        transform.scale = Vec3::splat(config.scale);
    }
}
