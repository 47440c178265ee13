use std::path::PathBuf;

use bevy::prelude::Resource;

use super::FontId;

pub const EXPORT_FILE_NAME: &str = "3d-text.glb";

/// Fixed shape parameters of the extruded text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrudeSettings {
    /// Distance between the front and back caps, before bevel.
    pub depth: f32,
    /// Line segments each outline curve is flattened into.
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            depth: 0.5,
            curve_segments: 12,
            bevel_enabled: true,
            bevel_thickness: 0.0002,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 1,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct StudioSettings {
    pub export_dir: PathBuf,
    /// Asset sub-directory holding `<font asset name>.ttf` files.
    pub fonts_dir: String,
    pub extrude: ExtrudeSettings,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("."),
            fonts_dir: "fonts".to_string(),
            extrude: ExtrudeSettings::default(),
        }
    }
}

impl StudioSettings {
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_fonts_dir(mut self, dir: impl Into<String>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    pub fn with_extrude(mut self, extrude: ExtrudeSettings) -> Self {
        self.extrude = extrude;
        self
    }

    pub fn font_path(&self, font: FontId) -> String {
        format!("{}/{}.ttf", self.fonts_dir, font.asset_name())
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(EXPORT_FILE_NAME)
    }
}
