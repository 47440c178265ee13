use bevy::{color::Srgba, prelude::Resource};

mod settings;

pub use settings::ExtrudeSettings;
pub use settings::StudioSettings;
pub use settings::EXPORT_FILE_NAME;

use crate::animation::AnimationMode;

/// The fonts the studio ships with. The asset name doubles as the file stem
/// inside the fonts directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontId {
    #[default]
    GentilisRegular,
    HelvetikerRegular,
    OptimerRegular,
    DancingScriptRegular,
}

impl FontId {
    pub const ALL: [FontId; 4] = [
        FontId::GentilisRegular,
        FontId::HelvetikerRegular,
        FontId::OptimerRegular,
        FontId::DancingScriptRegular,
    ];

    pub fn asset_name(self) -> &'static str {
        match self {
            FontId::GentilisRegular => "gentilis_regular",
            FontId::HelvetikerRegular => "helvetiker_regular",
            FontId::OptimerRegular => "optimer_regular",
            FontId::DancingScriptRegular => "dancingScript_regular",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FontId::GentilisRegular => "Gentilis Regular",
            FontId::HelvetikerRegular => "Helvetiker Regular",
            FontId::OptimerRegular => "Optimer Regular",
            FontId::DancingScriptRegular => "Dancing Script Regular",
        }
    }

    pub fn from_asset_name(name: &str) -> Option<FontId> {
        Self::ALL.into_iter().find(|font| font.asset_name() == name)
    }

    pub fn next(self) -> FontId {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> FontId {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The user-adjustable look of the text. Only control panel edits write it.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TextConfig {
    pub text: String,
    pub font: FontId,
    pub font_size: f32,
    /// Alpha is ignored, [`TextConfig::transparency`] drives opacity.
    pub color: Srgba,
    pub transparency: f32,
    pub scale: f32,
    pub animation: AnimationMode,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            text: "hello".to_string(),
            font: FontId::GentilisRegular,
            font_size: 1.0,
            color: Srgba::rgb_u8(0x64, 0x95, 0xED),
            transparency: 1.0,
            scale: 1.0,
            animation: AnimationMode::None,
        }
    }
}

impl TextConfig {
    /// Material colour: the chosen RGB with the transparency as alpha.
    pub fn material_color(&self) -> Srgba {
        Srgba::new(
            self.color.red,
            self.color.green,
            self.color.blue,
            self.transparency,
        )
    }

    pub fn color_hex(&self) -> String {
        Srgba::new(self.color.red, self.color.green, self.color.blue, 1.0).to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_scene() {
        let config = TextConfig::default();
        assert_eq!(config.text, "hello");
        assert_eq!(config.font, FontId::GentilisRegular);
        assert_eq!(config.font_size, 1.0);
        assert_eq!(config.color_hex(), "#6495ED");
        assert_eq!(config.transparency, 1.0);
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.animation, AnimationMode::None);
    }

    #[test]
    fn font_cycle_wraps_both_ways() {
        assert_eq!(FontId::DancingScriptRegular.next(), FontId::GentilisRegular);
        assert_eq!(FontId::GentilisRegular.prev(), FontId::DancingScriptRegular);
        for font in FontId::ALL {
            assert_eq!(font.next().prev(), font);
        }
    }

    #[test]
    fn asset_names_resolve_back() {
        for font in FontId::ALL {
            assert_eq!(FontId::from_asset_name(font.asset_name()), Some(font));
        }
        assert_eq!(FontId::from_asset_name("comic_sans"), None);
    }

    #[test]
    fn material_alpha_follows_transparency() {
        let config = TextConfig {
            transparency: 0.0,
            ..Default::default()
        };
        assert_eq!(config.material_color().alpha, 0.0);
        assert_eq!(config.transparency, 0.0);
    }
}
