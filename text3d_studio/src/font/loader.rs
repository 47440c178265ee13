use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use std::{future::Future, pin::Pin};
use thiserror::Error;

use super::typeface::Typeface;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TypefaceLoaderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The bytes are not a TrueType/OpenType face
    #[error(transparent)]
    FontInvalid(#[from] owned_ttf_parser::FaceParsingError),
    /// Bitmap-only or metrics-only faces cannot be extruded.
    #[error("face has no glyf or CFF outlines")]
    NoOutlines,
    #[error("face has no character map")]
    NoCharacterMap,
}

/// Parses a font file into a [`Typeface`] that can produce outlines for text.
pub fn parse_typeface(bytes: Vec<u8>) -> Result<Typeface, TypefaceLoaderError> {
    let face = OwnedFace::from_vec(bytes, 0)?;
    let tables = face.as_face_ref().tables();
    if tables.glyf.is_none() && tables.cff.is_none() {
        return Err(TypefaceLoaderError::NoOutlines);
    }
    if tables.cmap.is_none() {
        return Err(TypefaceLoaderError::NoCharacterMap);
    }
    Ok(Typeface::from(face))
}

#[derive(Default)]
pub struct TypefaceLoader;

impl AssetLoader for TypefaceLoader {
    type Asset = Typeface;
    type Settings = ();
    type Error = TypefaceLoaderError;
    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        _settings: &'a (),
        load_context: &'a mut LoadContext,
    ) -> Pin<Box<dyn Future<Output = Result<Typeface, Self::Error>> + Send + 'a>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            bevy::asset::AsyncReadExt::read_to_end(reader, &mut bytes).await?;
            let size = bytes.len();
            let typeface = parse_typeface(bytes)?;
            bevy::log::debug!(
                "Parsed typeface {} ({size} bytes)",
                load_context.path().display()
            );
            Ok(typeface)
        })
    }

    fn extensions(&self) -> &[&str] {
        &["ttf", "otf"]
    }
}
