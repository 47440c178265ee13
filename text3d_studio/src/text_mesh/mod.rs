use bevy::app::{Plugin, Startup, Update};
use bevy::prelude::{App, IntoSystemConfigs};

mod geometry;
mod text_mesh;

pub use geometry::build_text_geometry;
pub use geometry::TextGeometry;
pub use text_mesh::static_geometry;
pub use text_mesh::StudioText;

use crate::plugin::StudioSet;

pub struct TextMeshPlugin;

impl Plugin for TextMeshPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, text_mesh::spawn_text_scene).add_systems(
            Update,
            (text_mesh::rebuild_text_mesh, text_mesh::update_text_style)
                .chain()
                .in_set(StudioSet::Render),
        );
    }
}
