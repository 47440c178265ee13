//! Fonts for tests. `BlockGlyphs` turns every letter or digit into a solid
//! block and gives `o` a square counter. The fixture is a real TrueType
//! subset of DejaVu Sans holding `" dehlorw"`.

use bevy::math::Vec2;

use crate::font::{parse_typeface, GlyphOutline, GlyphSource, Typeface};

pub const FIXTURE_FONT: &[u8] = include_bytes!("../assets/fonts/fixtures/dejavu_sans_subset.ttf");

pub fn fixture_typeface() -> Typeface {
    parse_typeface(FIXTURE_FONT.to_vec()).unwrap()
}

pub struct BlockGlyphs;

/// Clockwise, like TrueType outer contours.
fn rect(min: Vec2, max: Vec2) -> Vec<Vec2> {
    vec![
        min,
        Vec2::new(min.x, max.y),
        max,
        Vec2::new(max.x, min.y),
    ]
}

impl GlyphSource for BlockGlyphs {
    fn glyph_outline(&self, code_point: char, _curve_segments: u32) -> Option<GlyphOutline> {
        let contours = match code_point {
            ' ' => vec![],
            'o' => {
                let mut counter = rect(Vec2::splat(0.1), Vec2::splat(0.4));
                counter.reverse();
                vec![rect(Vec2::ZERO, Vec2::splat(0.5)), counter]
            }
            c if c.is_ascii_alphanumeric() => vec![rect(Vec2::ZERO, Vec2::new(0.4, 0.7))],
            _ => return None,
        };
        let advance = if code_point == 'o' { 0.6 } else { 0.5 };
        Some(GlyphOutline { contours, advance })
    }

    fn line_height(&self) -> f32 {
        1.2
    }
}
