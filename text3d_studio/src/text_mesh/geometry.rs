use std::f32::consts::FRAC_PI_2;

use bevy::{
    log,
    math::{Vec2, Vec3},
    render::{
        mesh::{Indices, Mesh, PrimitiveTopology},
        render_asset::RenderAssetUsages,
    },
};
use lyon_tessellation::{
    math::point, path::Path, BuffersBuilder, FillOptions, FillTessellator, FillVertex,
    VertexBuffers,
};

use crate::config::ExtrudeSettings;
use crate::font::GlyphSource;

/// Triangle soup of the extruded text, flat-shaded, centred on the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl TextGeometry {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    fn translate(&mut self, by: Vec3) {
        for position in self.positions.iter_mut() {
            *position = (Vec3::from_array(*position) + by).to_array();
        }
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        (self.positions.len() - 1) as u32
    }

    /// Quad `a, b, c, d` in loop order. Winding and normal are flipped to face
    /// `outward` when needed.
    fn push_quad(&mut self, corners: [Vec3; 4], outward: Vec3) {
        let [a, b, c, d] = corners;
        let raw = (c - a).cross(d - b);
        let flip = raw.dot(outward) < 0.0;
        let mut normal = raw.try_normalize().unwrap_or(outward);
        if flip {
            normal = -normal;
        }

        let base = self.positions.len() as u32;
        for corner in corners {
            self.push_vertex(corner, normal);
        }
        if flip {
            self.indices
                .extend([base, base + 2, base + 1, base, base + 3, base + 2]);
        } else {
            self.indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    pub fn into_mesh(self) -> Mesh {
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
        .with_inserted_indices(Indices::U32(self.indices))
    }
}

/// Lays out `text` with glyphs from `source`, extrudes every glyph and centres
/// the result on the origin.
pub fn build_text_geometry(
    source: &impl GlyphSource,
    text: &str,
    font_size: f32,
    extrude: &ExtrudeSettings,
) -> TextGeometry {
    let mut geometry = TextGeometry::default();
    if font_size <= 0.0 {
        return geometry;
    }

    let line_height = source.line_height() * font_size;
    let mut pen = Vec2::ZERO;
    for line in text.split('\n') {
        for code_point in line.chars() {
            let Some(glyph) = source.glyph_outline(code_point, extrude.curve_segments) else {
                log::warn!("No glyph for {code_point:?}, skipping");
                continue;
            };
            let contours: Vec<Vec<Vec2>> = glyph
                .contours
                .iter()
                .filter(|contour| contour.len() >= 3)
                .map(|contour| contour.iter().map(|p| *p * font_size + pen).collect())
                .collect();
            extrude_glyph(&contours, extrude, &mut geometry);
            pen.x += glyph.advance * font_size;
        }
        pen.x = 0.0;
        pen.y -= line_height;
    }

    if let Some((min, max)) = geometry.bounds() {
        geometry.translate(-(min + max) * 0.5);
    }
    geometry
}

/// One level of the side wall: how far the outline is pushed out, and where.
#[derive(Debug, Clone, Copy)]
struct Ring {
    offset: f32,
    z: f32,
}

/// Rings from the front cap to the back cap.
fn rings(extrude: &ExtrudeSettings) -> Vec<Ring> {
    if !extrude.bevel_enabled || extrude.bevel_segments == 0 {
        return vec![
            Ring {
                offset: 0.0,
                z: extrude.depth,
            },
            Ring { offset: 0.0, z: 0.0 },
        ];
    }

    let segments = extrude.bevel_segments;
    let bevel = |step: u32| {
        let angle = step as f32 / segments as f32 * FRAC_PI_2;
        (
            extrude.bevel_offset + extrude.bevel_size * angle.sin(),
            extrude.bevel_thickness * angle.cos(),
        )
    };

    let mut rings = Vec::with_capacity(2 * (segments as usize + 1));
    for step in 0..=segments {
        let (offset, dz) = bevel(step);
        rings.push(Ring {
            offset,
            z: extrude.depth + dz,
        });
    }
    for step in (0..=segments).rev() {
        let (offset, dz) = bevel(step);
        rings.push(Ring { offset, z: -dz });
    }
    rings
}

fn extrude_glyph(contours: &[Vec<Vec2>], extrude: &ExtrudeSettings, geometry: &mut TextGeometry) {
    if contours.is_empty() {
        return;
    }

    let outward: Vec<f32> = contours
        .iter()
        .map(|contour| outward_sign(contour, contours))
        .collect();
    let rings = rings(extrude);
    // per ring, per contour
    let offset_rings: Vec<Vec<Vec<Vec2>>> = rings
        .iter()
        .map(|ring| {
            contours
                .iter()
                .zip(&outward)
                .map(|(contour, sign)| offset_contour(contour, *sign, ring.offset))
                .collect()
        })
        .collect();

    let (Some(front), Some(back)) = (rings.first(), rings.last()) else {
        return;
    };
    append_cap(geometry, &offset_rings[0], front.z, true);
    append_cap(geometry, &offset_rings[rings.len() - 1], back.z, false);

    for (contour_index, (contour, sign)) in contours.iter().zip(&outward).enumerate() {
        let len = contour.len();
        for edge in 0..len {
            let next = (edge + 1) % len;
            let normal_2d = (contour[next] - contour[edge]).perp().normalize_or_zero() * *sign;
            let outward_3d = normal_2d.extend(0.0);
            for level in 0..rings.len() - 1 {
                let upper = &offset_rings[level][contour_index];
                let lower = &offset_rings[level + 1][contour_index];
                geometry.push_quad(
                    [
                        upper[edge].extend(rings[level].z),
                        upper[next].extend(rings[level].z),
                        lower[next].extend(rings[level + 1].z),
                        lower[edge].extend(rings[level + 1].z),
                    ],
                    outward_3d,
                );
            }
        }
    }
}

fn append_cap(geometry: &mut TextGeometry, contours: &[Vec<Vec2>], z: f32, front: bool) {
    let Some(buffers) = tessellate(contours) else {
        log::warn!("Failed to triangulate glyph cap");
        return;
    };

    let normal = if front { Vec3::Z } else { Vec3::NEG_Z };
    let base = geometry.positions.len() as u32;
    for vertex in &buffers.vertices {
        geometry.push_vertex(vertex.extend(z), normal);
    }
    for triangle in buffers.indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]];
        let area = (buffers.vertices[b as usize] - buffers.vertices[a as usize])
            .perp_dot(buffers.vertices[c as usize] - buffers.vertices[a as usize]);
        // front faces wind counter-clockwise seen from +Z, back faces the other way
        if (area >= 0.0) == front {
            geometry.indices.extend([base + a, base + b, base + c]);
        } else {
            geometry.indices.extend([base + a, base + c, base + b]);
        }
    }
}

fn tessellate(contours: &[Vec<Vec2>]) -> Option<VertexBuffers<Vec2, u32>> {
    let mut builder = Path::builder();
    for contour in contours {
        let Some((first, rest)) = contour.split_first() else {
            continue;
        };
        builder.begin(point(first.x, first.y));
        for p in rest {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::non_zero(),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                Vec2::new(vertex.position().x, vertex.position().y)
            }),
        )
        .ok()?;
    Some(buffers)
}

/// `1.0` when the left-hand side of the contour's edges points away from the
/// filled area, `-1.0` otherwise. TrueType and CFF outlines wind in opposite
/// directions, so it is sampled rather than assumed.
fn outward_sign(contour: &[Vec2], all: &[Vec<Vec2>]) -> f32 {
    let len = contour.len();
    let (min, max) = contour
        .iter()
        .fold((contour[0], contour[0]), |(min, max), p| (min.min(*p), max.max(*p)));
    let sample_distance = (max - min).length() * 1e-3;

    for edge in 0..len {
        let a = contour[edge];
        let b = contour[(edge + 1) % len];
        let Some(left) = (b - a).perp().try_normalize() else {
            continue;
        };
        let sample = (a + b) * 0.5 + left * sample_distance;
        return if winding_number(all, sample) != 0 {
            -1.0
        } else {
            1.0
        };
    }
    1.0
}

fn winding_number(contours: &[Vec<Vec2>], p: Vec2) -> i32 {
    let mut winding = 0;
    for contour in contours {
        let len = contour.len();
        for i in 0..len {
            let a = contour[i];
            let b = contour[(i + 1) % len];
            let side = (b - a).perp_dot(p - a);
            if a.y <= p.y {
                if b.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && side < 0.0 {
                winding -= 1;
            }
        }
    }
    winding
}

/// Pushes every vertex `offset` units away from the filled area along the
/// corner bisector.
fn offset_contour(contour: &[Vec2], sign: f32, offset: f32) -> Vec<Vec2> {
    if offset == 0.0 {
        return contour.to_vec();
    }
    let len = contour.len();
    (0..len)
        .map(|i| {
            let prev = contour[(i + len - 1) % len];
            let current = contour[i];
            let next = contour[(i + 1) % len];
            let n0 = (current - prev).perp().normalize_or_zero() * sign;
            let n1 = (next - current).perp().normalize_or_zero() * sign;
            let bisector = (n0 + n1).try_normalize().unwrap_or(n1);
            // miter, capped for very sharp corners
            let miter = 1.0 / bisector.dot(n1).max(0.25);
            current + bisector * miter * offset
        })
        .collect()
}
