//! Binary glTF 2.0 writer for the static text mesh.
//!
//! Layout: 12 byte header, JSON chunk (space padded), optional BIN chunk
//! (zero padded) holding positions, normals and `u32` indices back to back.

use std::collections::BTreeMap;

use bevy::color::LinearRgba;
use serde::Serialize;

use super::ExportError;
use crate::config::TextConfig;
use crate::text_mesh::TextGeometry;

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const COMPONENT_FLOAT: u32 = 5126;
const COMPONENT_UNSIGNED_INT: u32 = 5125;
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;
const MODE_TRIANGLES: u32 = 4;

const GENERATOR: &str = concat!("text3d_studio ", env!("CARGO_PKG_VERSION"));

/// Everything that ends up in the file: the geometry and the frozen look.
#[derive(Debug, Clone, Copy)]
pub struct GlbScene<'a> {
    pub name: &'a str,
    pub geometry: &'a TextGeometry,
    /// Linear RGBA, alpha is the opacity.
    pub base_color: [f32; 4],
    pub scale: f32,
}

impl<'a> GlbScene<'a> {
    pub fn new(config: &'a TextConfig, geometry: &'a TextGeometry) -> Self {
        let linear = LinearRgba::from(config.material_color());
        Self {
            name: &config.text,
            geometry,
            base_color: [linear.red, linear.green, linear.blue, linear.alpha],
            scale: config.scale,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Document<'a> {
    asset: AssetInfo,
    scene: u32,
    scenes: Vec<SceneDef>,
    nodes: Vec<NodeDef<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    meshes: Vec<MeshDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    materials: Vec<MaterialDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    accessors: Vec<AccessorDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    buffer_views: Vec<BufferViewDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    buffers: Vec<BufferDef>,
}

#[derive(Serialize)]
struct AssetInfo {
    version: &'static str,
    generator: &'static str,
}

#[derive(Serialize)]
struct SceneDef {
    nodes: Vec<u32>,
}

#[derive(Serialize)]
struct NodeDef<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<u32>,
    scale: [f32; 3],
}

#[derive(Serialize)]
struct MeshDef {
    primitives: Vec<PrimitiveDef>,
}

#[derive(Serialize)]
struct PrimitiveDef {
    attributes: BTreeMap<&'static str, u32>,
    indices: u32,
    material: u32,
    mode: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MaterialDef {
    name: &'static str,
    pbr_metallic_roughness: PbrDef,
    alpha_mode: &'static str,
    double_sided: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PbrDef {
    base_color_factor: [f32; 4],
    metallic_factor: f32,
    roughness_factor: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessorDef {
    buffer_view: u32,
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<[f32; 3]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BufferViewDef {
    buffer: u32,
    byte_offset: usize,
    byte_length: usize,
    target: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BufferDef {
    byte_length: usize,
}

fn validate(geometry: &TextGeometry) -> Result<(), ExportError> {
    if geometry.normals.len() != geometry.positions.len() {
        return Err(ExportError::MalformedGeometry(format!(
            "{} normals for {} positions",
            geometry.normals.len(),
            geometry.positions.len()
        )));
    }
    if geometry.indices.len() % 3 != 0 {
        return Err(ExportError::MalformedGeometry(format!(
            "{} indices is not a triangle list",
            geometry.indices.len()
        )));
    }
    if let Some(index) = geometry
        .indices
        .iter()
        .find(|index| **index as usize >= geometry.positions.len())
    {
        return Err(ExportError::MalformedGeometry(format!(
            "index {index} out of {} vertices",
            geometry.positions.len()
        )));
    }
    let finite = geometry
        .positions
        .iter()
        .chain(&geometry.normals)
        .flatten()
        .all(|v| v.is_finite());
    if !finite {
        return Err(ExportError::MalformedGeometry(
            "non-finite vertex data".to_string(),
        ));
    }
    Ok(())
}

fn push_floats(bin: &mut Vec<u8>, values: &[[f32; 3]]) {
    for value in values.iter().flatten() {
        bin.extend_from_slice(&value.to_le_bytes());
    }
}

fn push_chunk(out: &mut Vec<u8>, kind: u32, data: &[u8], pad: u8) {
    let padded = data.len().next_multiple_of(4);
    out.extend_from_slice(&(padded as u32).to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(data);
    out.resize(out.len() + padded - data.len(), pad);
}

/// Encodes the whole file in memory. Nothing is returned unless every step
/// succeeded.
pub fn encode_glb(scene: &GlbScene) -> Result<Vec<u8>, ExportError> {
    let geometry = scene.geometry;
    validate(geometry)?;

    let mut document = Document {
        asset: AssetInfo {
            version: "2.0",
            generator: GENERATOR,
        },
        scene: 0,
        scenes: vec![SceneDef { nodes: vec![0] }],
        nodes: vec![NodeDef {
            name: scene.name,
            mesh: None,
            scale: [scene.scale; 3],
        }],
        meshes: Vec::new(),
        materials: Vec::new(),
        accessors: Vec::new(),
        buffer_views: Vec::new(),
        buffers: Vec::new(),
    };

    let mut bin = Vec::new();
    if let Some((min, max)) = geometry.bounds().filter(|_| !geometry.is_empty()) {
        let vertex_bytes = geometry.positions.len() * 12;
        let index_bytes = geometry.indices.len() * 4;

        push_floats(&mut bin, &geometry.positions);
        push_floats(&mut bin, &geometry.normals);
        for index in &geometry.indices {
            bin.extend_from_slice(&index.to_le_bytes());
        }

        document.buffer_views = vec![
            BufferViewDef {
                buffer: 0,
                byte_offset: 0,
                byte_length: vertex_bytes,
                target: TARGET_ARRAY_BUFFER,
            },
            BufferViewDef {
                buffer: 0,
                byte_offset: vertex_bytes,
                byte_length: vertex_bytes,
                target: TARGET_ARRAY_BUFFER,
            },
            BufferViewDef {
                buffer: 0,
                byte_offset: vertex_bytes * 2,
                byte_length: index_bytes,
                target: TARGET_ELEMENT_ARRAY_BUFFER,
            },
        ];
        document.accessors = vec![
            AccessorDef {
                buffer_view: 0,
                component_type: COMPONENT_FLOAT,
                count: geometry.positions.len(),
                kind: "VEC3",
                min: Some(min.to_array()),
                max: Some(max.to_array()),
            },
            AccessorDef {
                buffer_view: 1,
                component_type: COMPONENT_FLOAT,
                count: geometry.normals.len(),
                kind: "VEC3",
                min: None,
                max: None,
            },
            AccessorDef {
                buffer_view: 2,
                component_type: COMPONENT_UNSIGNED_INT,
                count: geometry.indices.len(),
                kind: "SCALAR",
                min: None,
                max: None,
            },
        ];
        document.buffers = vec![BufferDef {
            byte_length: bin.len(),
        }];
        document.materials = vec![MaterialDef {
            name: "text",
            pbr_metallic_roughness: PbrDef {
                base_color_factor: scene.base_color,
                metallic_factor: 0.0,
                roughness_factor: 0.6,
            },
            alpha_mode: "BLEND",
            double_sided: true,
        }];
        document.meshes = vec![MeshDef {
            primitives: vec![PrimitiveDef {
                attributes: BTreeMap::from([("NORMAL", 1), ("POSITION", 0)]),
                indices: 2,
                material: 0,
                mode: MODE_TRIANGLES,
            }],
        }];
        document.nodes[0].mesh = Some(0);
    }

    let json = serde_json::to_vec(&document)?;
    let json_len = json.len().next_multiple_of(4);
    let bin_len = if bin.is_empty() {
        0
    } else {
        8 + bin.len().next_multiple_of(4)
    };
    let total = 12 + 8 + json_len + bin_len;
    let total_u32 = u32::try_from(total).map_err(|_| ExportError::TooLarge(total))?;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&total_u32.to_le_bytes());
    push_chunk(&mut out, CHUNK_JSON, &json, b' ');
    if !bin.is_empty() {
        push_chunk(&mut out, CHUNK_BIN, &bin, 0);
    }
    debug_assert_eq!(out.len(), total);
    Ok(out)
}
