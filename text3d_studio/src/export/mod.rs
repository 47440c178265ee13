use std::path::PathBuf;

use bevy::{
    app::{App, Plugin, Update},
    asset::Assets,
    log,
    prelude::{Event, EventReader, EventWriter, IntoSystemConfigs, Res},
};
use thiserror::Error;

mod glb;

pub use glb::encode_glb;
pub use glb::GlbScene;

use crate::config::{StudioSettings, TextConfig};
use crate::font::{GlyphSource, Typeface, TypefaceHandles};
use crate::plugin::StudioSet;
use crate::text_mesh::static_geometry;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("typeface {0} is not loaded")]
    TypefaceUnavailable(&'static str),
    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),
    #[error("{0} bytes do not fit in a GLB file")]
    TooLarge(usize),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Ask for the current text to be written to `3d-text.glb`.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ExportRequested;

/// Sent after the file landed on disk.
#[derive(Event, Debug, Clone)]
pub struct TextExported {
    pub path: PathBuf,
    pub bytes: usize,
}

/// GLB bytes of the text as configured, animation excluded.
pub fn encode_text(
    config: &TextConfig,
    settings: &StudioSettings,
    source: &impl GlyphSource,
) -> Result<Vec<u8>, ExportError> {
    let geometry = static_geometry(config, settings, source);
    encode_glb(&GlbScene::new(config, &geometry))
}

/// Encodes first, then writes next to the target and renames, so a failed
/// export never leaves a partial file behind.
pub fn export_text(
    config: &TextConfig,
    settings: &StudioSettings,
    source: &impl GlyphSource,
) -> Result<TextExported, ExportError> {
    let bytes = encode_text(config, settings, source)?;
    let path = settings.export_path();
    let partial = path.with_extension("glb.part");
    let written = std::fs::write(&partial, &bytes).and_then(|()| std::fs::rename(&partial, &path));
    if let Err(err) = written {
        if partial.is_file() {
            let _ = std::fs::remove_file(&partial);
        }
        return Err(err.into());
    }
    Ok(TextExported {
        path,
        bytes: bytes.len(),
    })
}

fn handle_export_requests(
    mut requests: EventReader<ExportRequested>,
    config: Res<TextConfig>,
    settings: Res<StudioSettings>,
    handles: Res<TypefaceHandles>,
    typefaces: Res<Assets<Typeface>>,
    mut exported: EventWriter<TextExported>,
) {
    // a burst of requests in one frame yields one file
    if requests.read().count() == 0 {
        return;
    }

    let result = handles
        .get(config.font)
        .and_then(|handle| typefaces.get(handle))
        .ok_or(ExportError::TypefaceUnavailable(config.font.asset_name()))
        .and_then(|typeface| export_text(&config, &settings, typeface));
    match result {
        Ok(done) => {
            log::info!("Exported {} ({} bytes)", done.path.display(), done.bytes);
            exported.send(done);
        }
        Err(err) => log::error!("Export failed: {err}"),
    }
}

pub struct ExportPlugin;

impl Plugin for ExportPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ExportRequested>()
            .add_event::<TextExported>()
            .add_systems(Update, handle_export_requests.in_set(StudioSet::Export));
    }
}
