use std::sync::Arc;

use bevy::{math::Vec2, prelude::*};
use owned_ttf_parser::{AsFaceRef, OutlineBuilder};

/// A glyph outline flattened into closed polylines, in em units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphOutline {
    /// Closed contours, the closing point is not repeated.
    pub contours: Vec<Vec<Vec2>>,
    pub advance: f32,
}

/// Anything that can hand out glyph outlines for layout.
pub trait GlyphSource {
    /// `None` when the font has no glyph for `code_point`.
    fn glyph_outline(&self, code_point: char, curve_segments: u32) -> Option<GlyphOutline>;

    /// Baseline-to-baseline distance, in em units.
    fn line_height(&self) -> f32;
}

#[derive(Asset, TypePath, Clone)]
pub struct Typeface {
    face: Arc<owned_ttf_parser::OwnedFace>,
}

impl Typeface {
    pub fn from(face: owned_ttf_parser::OwnedFace) -> Self {
        Self {
            face: Arc::new(face),
        }
    }

    fn units_per_em(&self) -> f32 {
        self.face.as_face_ref().units_per_em() as f32
    }
}

impl GlyphSource for Typeface {
    fn glyph_outline(&self, code_point: char, curve_segments: u32) -> Option<GlyphOutline> {
        let face = self.face.as_face_ref();
        let id = face.glyph_index(code_point)?;
        let scale = 1f32 / self.units_per_em();

        let mut flattener = OutlineFlattener::new(scale, curve_segments);
        // Empty glyphs (space) have no outline but still advance.
        face.outline_glyph(id, &mut flattener);

        Some(GlyphOutline {
            contours: flattener.finish(),
            advance: face.glyph_hor_advance(id).unwrap_or_default() as f32 * scale,
        })
    }

    fn line_height(&self) -> f32 {
        let face = self.face.as_face_ref();
        face.height() as f32 / self.units_per_em()
    }
}

/// Turns TrueType/CFF outline commands into polylines. Every curve is split
/// into `segments` straight pieces.
#[derive(Debug)]
struct OutlineFlattener {
    contours: Vec<Vec<Vec2>>,
    current: Vec<Vec2>,
    last_point: Vec2,
    scale: f32,
    segments: u32,
}

impl OutlineFlattener {
    fn new(scale: f32, segments: u32) -> Self {
        Self {
            contours: Vec::new(),
            current: Vec::new(),
            last_point: Vec2::ZERO,
            scale,
            segments: segments.max(1),
        }
    }

    fn point(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) * self.scale
    }

    fn push(&mut self, point: Vec2) {
        if self.current.last() != Some(&point) {
            self.current.push(point);
        }
        self.last_point = point;
    }

    fn end_contour(&mut self) {
        let mut contour = std::mem::take(&mut self.current);
        if contour.len() > 1 && contour.first() == contour.last() {
            contour.pop();
        }
        if contour.len() >= 3 {
            self.contours.push(contour);
        }
    }

    fn finish(mut self) -> Vec<Vec<Vec2>> {
        self.end_contour();
        self.contours
    }
}

impl OutlineBuilder for OutlineFlattener {
    fn move_to(&mut self, x: f32, y: f32) {
        self.end_contour();
        let point = self.point(x, y);
        self.push(point);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let point = self.point(x, y);
        self.push(point);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let from = self.last_point;
        let control = self.point(x1, y1);
        let to = self.point(x, y);
        for step in 1..=self.segments {
            let t = step as f32 / self.segments as f32;
            let mt = 1.0 - t;
            self.push(from * (mt * mt) + control * (2.0 * mt * t) + to * (t * t));
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let from = self.last_point;
        let c1 = self.point(x1, y1);
        let c2 = self.point(x2, y2);
        let to = self.point(x, y);
        for step in 1..=self.segments {
            let t = step as f32 / self.segments as f32;
            let mt = 1.0 - t;
            self.push(
                from * (mt * mt * mt)
                    + c1 * (3.0 * mt * mt * t)
                    + c2 * (3.0 * mt * t * t)
                    + to * (t * t * t),
            );
        }
    }

    fn close(&mut self) {
        self.end_contour();
    }
}
