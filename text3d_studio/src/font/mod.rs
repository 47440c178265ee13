use bevy::{
    app::{App, Plugin, Startup},
    asset::{AssetApp, AssetServer, Handle},
    prelude::{Commands, Res, Resource},
    utils::HashMap,
};
pub(crate) use loader::TypefaceLoader;

use crate::config::{FontId, StudioSettings};

mod loader;
mod typeface;

pub use loader::parse_typeface;
pub use loader::TypefaceLoaderError;
pub use typeface::GlyphOutline;
pub use typeface::GlyphSource;
pub use typeface::Typeface;

/// Handles of every selectable font, loaded once at startup so switching
/// fonts never waits on disk.
#[derive(Resource, Default)]
pub struct TypefaceHandles {
    handles: HashMap<FontId, Handle<Typeface>>,
}

impl TypefaceHandles {
    pub fn get(&self, font: FontId) -> Option<&Handle<Typeface>> {
        self.handles.get(&font)
    }

    pub fn insert(&mut self, font: FontId, handle: Handle<Typeface>) {
        self.handles.insert(font, handle);
    }
}

pub struct TypefacePlugin;

impl Plugin for TypefacePlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<Typeface>()
            .init_asset_loader::<TypefaceLoader>()
            .init_resource::<TypefaceHandles>()
            .add_systems(Startup, load_typefaces);
    }
}

fn load_typefaces(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<StudioSettings>,
) {
    let mut handles = TypefaceHandles::default();
    for font in FontId::ALL {
        let path = settings.font_path(font);
        bevy::log::info!("Loading typeface {path}");
        handles.insert(font, asset_server.load::<Typeface>(path));
    }
    commands.insert_resource(handles);
}
