pub mod animation;
pub mod config;
pub mod control_panel;
pub mod export;
mod font;
mod plugin;
mod text_mesh;

#[cfg(test)]
mod testing;

pub use plugin::StudioSet;
pub use plugin::Text3dStudioPlugin;

pub use font::parse_typeface;
pub use font::GlyphOutline;
pub use font::GlyphSource;
pub use font::Typeface;
pub use font::TypefaceHandles;
pub use font::TypefaceLoaderError;

pub use text_mesh::build_text_geometry;
pub use text_mesh::StudioText;
pub use text_mesh::TextGeometry;
