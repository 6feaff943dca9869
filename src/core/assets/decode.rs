//=========================================================================
// Asset Decoders
//=========================================================================
//
// Turns fetched bytes into ready-to-use resources, one strategy per
// `AssetFormat`.
//
// Architecture:
//   bytes ──decode(format)──> LoadedAsset
//     ├─ Font              → FontFace           (BMFont JSON)
//     ├─ Png / Jpeg        → ImageTexture       (RGBA8)
//     ├─ Basis / Dds       → CompressedTexture  (header + payload)
//     └─ Gltf / Glb        → ModelScene         (node graph)
//
// Decoders are pure: no I/O, no shared state. They run on loader
// worker threads.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io::Cursor;
use std::sync::Arc;

use ddsfile::Dds;
use glam::Vec3;
use image::ImageFormat;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::descriptor::{AssetFormat, AssetKind};
use super::error::DecodeError;

//=== LoadedAsset =========================================================

/// A realized resource, owned by the registry and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedAsset {
    Font(FontFace),
    Image(ImageTexture),
    CompressedTexture(CompressedTexture),
    Model(ModelScene),
}

impl LoadedAsset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Font(_) => AssetKind::Font,
            Self::Image(_) => AssetKind::Image,
            Self::CompressedTexture(_) => AssetKind::CompressedTexture,
            Self::Model(_) => AssetKind::Model,
        }
    }

    pub fn as_font(&self) -> Option<&FontFace> {
        match self {
            Self::Font(font) => Some(font),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageTexture> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_compressed_texture(&self) -> Option<&CompressedTexture> {
        match self {
            Self::CompressedTexture(texture) => Some(texture),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelScene> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }
}

/// Decodes `bytes` according to `format`.
pub fn decode(format: AssetFormat, bytes: Vec<u8>) -> Result<LoadedAsset, DecodeError> {
    match format {
        AssetFormat::Font => decode_font(&bytes).map(LoadedAsset::Font),
        AssetFormat::Png => decode_image(&bytes, ImageFormat::Png).map(LoadedAsset::Image),
        AssetFormat::Jpeg => decode_image(&bytes, ImageFormat::Jpeg).map(LoadedAsset::Image),
        AssetFormat::Basis => decode_basis(bytes).map(LoadedAsset::CompressedTexture),
        AssetFormat::Dds => decode_dds(&bytes).map(LoadedAsset::CompressedTexture),
        AssetFormat::Gltf => ModelScene::from_gltf_json(&bytes, None).map(LoadedAsset::Model),
        AssetFormat::Glb => decode_glb(&bytes).map(LoadedAsset::Model),
    }
}

//=========================================================================
// Fonts
//=========================================================================

/// Bitmap font face: glyph metrics over one or more texture pages.
///
/// The page textures are declared as separate image assets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontFace {
    #[serde(default)]
    pub pages: Vec<String>,
    pub chars: Vec<Glyph>,
    #[serde(default)]
    pub info: FontInfo,
    #[serde(default)]
    pub common: FontCommon,
    #[serde(default)]
    pub kernings: Vec<Kerning>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FontInfo {
    #[serde(default)]
    pub face: String,
    #[serde(default)]
    pub size: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontCommon {
    #[serde(default)]
    pub line_height: f32,
    #[serde(default)]
    pub base: f32,
    #[serde(default)]
    pub scale_w: f32,
    #[serde(default)]
    pub scale_h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Glyph {
    pub id: u32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub xoffset: f32,
    #[serde(default)]
    pub yoffset: f32,
    #[serde(default)]
    pub xadvance: f32,
    #[serde(default)]
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Kerning {
    pub first: u32,
    pub second: u32,
    pub amount: f32,
}

impl FontFace {
    /// Glyph metrics for a character code.
    pub fn glyph(&self, id: u32) -> Option<&Glyph> {
        self.chars.iter().find(|glyph| glyph.id == id)
    }

    /// Kerning adjustment between two characters (0 when unspecified).
    pub fn kerning(&self, first: u32, second: u32) -> f32 {
        self.kernings
            .iter()
            .find(|k| k.first == first && k.second == second)
            .map(|k| k.amount)
            .unwrap_or(0.0)
    }
}

fn decode_font(bytes: &[u8]) -> Result<FontFace, DecodeError> {
    let font: FontFace = serde_json::from_slice(bytes)?;
    if font.chars.is_empty() {
        return Err(DecodeError::malformed("font defines no glyphs"));
    }
    Ok(font)
}

//=========================================================================
// Images
//=========================================================================

/// Decoded RGBA8 raster.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTexture {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

fn decode_image(bytes: &[u8], format: ImageFormat) -> Result<ImageTexture, DecodeError> {
    let rgba = image::load_from_memory_with_format(bytes, format)?.to_rgba8();

    Ok(ImageTexture {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

//=========================================================================
// Compressed Textures
//=========================================================================

/// GPU texture payload kept in its container encoding.
///
/// Transcoding to a device format is the renderer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedTexture {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub container: TextureContainer,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureContainer {
    Basis {
        format: BasisFormat,
        images: u32,
        slices: u32,
    },
    Dds {
        format: String,
    },
}

/// Basis Universal base encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisFormat {
    Etc1s,
    Uastc4x4,
    Other(u8),
}

impl From<u8> for BasisFormat {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Etc1s,
            1 => Self::Uastc4x4,
            other => Self::Other(other),
        }
    }
}

//--- Basis header layout (little endian, packed) -------------------------

const BASIS_SIGNATURE: &[u8; 2] = b"sB";
const BASIS_HEADER_SIZE: usize = 77;
const BASIS_OFS_HEADER_SIZE: usize = 4;
const BASIS_OFS_DATA_SIZE: usize = 8;
const BASIS_OFS_TOTAL_SLICES: usize = 14;
const BASIS_OFS_TOTAL_IMAGES: usize = 17;
const BASIS_OFS_TEX_FORMAT: usize = 20;
const BASIS_OFS_SLICE_DESC: usize = 65;
const BASIS_SLICE_DESC_SIZE: usize = 23;
const BASIS_SLICE_OFS_WIDTH: usize = 5;
const BASIS_SLICE_OFS_HEIGHT: usize = 7;

const BASIS_OFS_FLAGS: usize = 21;
const BASIS_FLAG_HAS_ALPHA_SLICES: u8 = 0x4;

fn field<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N], DecodeError> {
    bytes
        .get(offset..offset + N)
        .and_then(|f| f.try_into().ok())
        .ok_or_else(|| DecodeError::malformed(format!("truncated at byte {}", offset)))
}

fn read_u16(bytes: &[u8], offset: usize) -> Result<u32, DecodeError> {
    field::<2>(bytes, offset).map(|f| u16::from_le_bytes(f) as u32)
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, DecodeError> {
    field::<4>(bytes, offset).map(u32::from_le_bytes)
}

/// Packed 24-bit little endian field.
fn read_u24(bytes: &[u8], offset: usize) -> Result<u32, DecodeError> {
    let f = field::<3>(bytes, offset)?;
    Ok(f.iter().rev().fold(0u32, |acc, &byte| (acc << 8) | byte as u32))
}

fn decode_basis(bytes: Vec<u8>) -> Result<CompressedTexture, DecodeError> {
    if bytes.len() < BASIS_HEADER_SIZE {
        return Err(DecodeError::malformed("basis file shorter than its header"));
    }
    if &bytes[..2] != BASIS_SIGNATURE {
        return Err(DecodeError::malformed("missing basis signature"));
    }

    let header_size = read_u16(&bytes, BASIS_OFS_HEADER_SIZE)? as usize;
    if header_size != BASIS_HEADER_SIZE {
        return Err(DecodeError::malformed(format!(
            "unexpected basis header size {}",
            header_size
        )));
    }

    let data_size = read_u32(&bytes, BASIS_OFS_DATA_SIZE)? as usize;
    if header_size + data_size > bytes.len() {
        return Err(DecodeError::malformed("basis payload extends past end of file"));
    }

    let slices = read_u24(&bytes, BASIS_OFS_TOTAL_SLICES)?;
    let images = read_u24(&bytes, BASIS_OFS_TOTAL_IMAGES)?;
    if slices == 0 || images == 0 {
        return Err(DecodeError::malformed("basis file contains no images"));
    }

    let format = BasisFormat::from(bytes[BASIS_OFS_TEX_FORMAT]);

    // First slice is the base level of the first image.
    let slice_ofs = read_u32(&bytes, BASIS_OFS_SLICE_DESC)? as usize;
    if slice_ofs + BASIS_SLICE_DESC_SIZE > bytes.len() {
        return Err(DecodeError::malformed("basis slice table out of range"));
    }
    let width = read_u16(&bytes, slice_ofs + BASIS_SLICE_OFS_WIDTH)?;
    let height = read_u16(&bytes, slice_ofs + BASIS_SLICE_OFS_HEIGHT)?;

    // Alpha slices follow each colour slice.
    let mut levels = slices / images;
    if bytes[BASIS_OFS_FLAGS] & BASIS_FLAG_HAS_ALPHA_SLICES != 0 {
        levels /= 2;
    }

    Ok(CompressedTexture {
        width,
        height,
        mip_levels: levels.max(1),
        container: TextureContainer::Basis { format, images, slices },
        data: bytes,
    })
}

fn decode_dds(bytes: &[u8]) -> Result<CompressedTexture, DecodeError> {
    let mut reader = Cursor::new(bytes);
    let dds = Dds::read(&mut reader)?;

    let format = dds
        .get_dxgi_format()
        .map(|f| format!("{:?}", f))
        .or_else(|| dds.get_d3d_format().map(|f| format!("{:?}", f)))
        .unwrap_or_else(|| "unknown".to_string());

    Ok(CompressedTexture {
        width: dds.get_width(),
        height: dds.get_height(),
        mip_levels: dds.get_num_mipmap_levels(),
        container: TextureContainer::Dds { format },
        data: dds.data,
    })
}

//=========================================================================
// Models
//=========================================================================

/// Parsed glTF scene graph.
///
/// Cloning is cheap for the binary buffer (shared) and copies the node
/// graph, so worlds can keep per-instance copies.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScene {
    nodes: Vec<ModelNode>,
    roots: Vec<usize>,
    meshes: Vec<String>,
    materials: Vec<ModelMaterial>,
    binary: Option<Arc<[u8]>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: String,
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
    pub translation: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelMaterial {
    pub name: String,
    pub base_color: [f32; 4],
}

//--- glTF JSON schema (subset) -------------------------------------------

#[derive(Deserialize)]
struct GltfDocument {
    asset: GltfAssetInfo,
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<GltfScene>,
    #[serde(default)]
    nodes: Vec<GltfNode>,
    #[serde(default)]
    meshes: Vec<GltfNamed>,
    #[serde(default)]
    materials: Vec<GltfMaterial>,
}

#[derive(Deserialize)]
struct GltfAssetInfo {
    version: String,
}

#[derive(Deserialize)]
struct GltfScene {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Deserialize)]
struct GltfNode {
    name: Option<String>,
    mesh: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    translation: Option<[f32; 3]>,
}

#[derive(Deserialize)]
struct GltfNamed {
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GltfMaterial {
    name: Option<String>,
    pbr_metallic_roughness: Option<GltfPbr>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GltfPbr {
    base_color_factor: Option<[f32; 4]>,
}

const DEFAULT_BASE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

impl ModelScene {
    /// Parses a glTF 2.0 JSON document, with an optional BIN chunk.
    pub(crate) fn from_gltf_json(json: &[u8], binary: Option<Arc<[u8]>>) -> Result<Self, DecodeError> {
        let doc: GltfDocument = serde_json::from_slice(json)?;

        if !doc.asset.version.starts_with('2') {
            return Err(DecodeError::malformed(format!(
                "unsupported glTF version {}",
                doc.asset.version
            )));
        }

        let node_count = doc.nodes.len();
        let mut nodes = Vec::with_capacity(node_count);
        for (i, node) in doc.nodes.into_iter().enumerate() {
            if let Some(bad) = node.children.iter().find(|&&c| c >= node_count) {
                return Err(DecodeError::malformed(format!(
                    "node {} references missing child {}",
                    i, bad
                )));
            }
            if let Some(mesh) = node.mesh.filter(|&m| m >= doc.meshes.len()) {
                return Err(DecodeError::malformed(format!(
                    "node {} references missing mesh {}",
                    i, mesh
                )));
            }

            nodes.push(ModelNode {
                name: node.name.unwrap_or_else(|| format!("node_{}", i)),
                mesh: node.mesh,
                children: node.children,
                translation: node.translation.map(Vec3::from).unwrap_or(Vec3::ZERO),
            });
        }

        if let Some(index) = doc.scene.filter(|&i| i >= doc.scenes.len()) {
            return Err(DecodeError::malformed(format!(
                "default scene {} is missing ({} scenes)",
                index,
                doc.scenes.len()
            )));
        }

        let roots = match doc.scenes.get(doc.scene.unwrap_or(0)) {
            Some(scene) => scene.nodes.clone(),
            None => {
                // No scene list: every node that nobody references is a root.
                let mut referenced = vec![false; node_count];
                for node in &nodes {
                    for &child in &node.children {
                        referenced[child] = true;
                    }
                }
                (0..node_count).filter(|&i| !referenced[i]).collect()
            }
        };
        if let Some(bad) = roots.iter().find(|&&r| r >= node_count) {
            return Err(DecodeError::malformed(format!("scene references missing node {}", bad)));
        }

        let meshes = doc
            .meshes
            .into_iter()
            .enumerate()
            .map(|(i, mesh)| mesh.name.unwrap_or_else(|| format!("mesh_{}", i)))
            .collect();

        let materials = doc
            .materials
            .into_iter()
            .enumerate()
            .map(|(i, material)| ModelMaterial {
                name: material.name.unwrap_or_else(|| format!("material_{}", i)),
                base_color: material
                    .pbr_metallic_roughness
                    .and_then(|pbr| pbr.base_color_factor)
                    .unwrap_or(DEFAULT_BASE_COLOR),
            })
            .collect();

        Ok(Self {
            nodes,
            roots,
            meshes,
            materials,
            binary,
        })
    }

    pub fn nodes(&self) -> &[ModelNode] {
        &self.nodes
    }

    /// Indices of the top-level nodes of the default scene.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn meshes(&self) -> &[String] {
        &self.meshes
    }

    pub fn materials(&self) -> &[ModelMaterial] {
        &self.materials
    }

    /// Size of the embedded BIN chunk, if any.
    pub fn binary_len(&self) -> usize {
        self.binary.as_ref().map_or(0, |bin| bin.len())
    }

    /// Finds a node by name.
    pub fn object_by_name(&self, name: &str) -> Option<&ModelNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Finds a node by name for per-instance edits.
    pub fn object_by_name_mut(&mut self, name: &str) -> Option<&mut ModelNode> {
        self.nodes.iter_mut().find(|node| node.name == name)
    }
}

//--- GLB container -------------------------------------------------------

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const GLB_HEADER_LEN: usize = 12;
const GLB_CHUNK_HEADER_LEN: usize = 8;
const GLB_CHUNK_JSON: u32 = 0x4E4F_534A;
const GLB_CHUNK_BIN: u32 = 0x004E_4942;

fn decode_glb(bytes: &[u8]) -> Result<ModelScene, DecodeError> {
    if read_u32(bytes, 0)? != GLB_MAGIC {
        return Err(DecodeError::malformed("missing glTF binary magic"));
    }

    let version = read_u32(bytes, 4)?;
    if version != GLB_VERSION {
        return Err(DecodeError::malformed(format!("unsupported GLB version {}", version)));
    }

    let total = read_u32(bytes, 8)? as usize;
    if total > bytes.len() {
        return Err(DecodeError::malformed("GLB length exceeds payload"));
    }
    let bytes = &bytes[..total];

    let (json_type, json) = read_chunk(bytes, GLB_HEADER_LEN)?;
    if json_type != GLB_CHUNK_JSON {
        return Err(DecodeError::malformed("first GLB chunk is not JSON"));
    }

    let bin_offset = GLB_HEADER_LEN + GLB_CHUNK_HEADER_LEN + json.len();
    let binary = if bin_offset + GLB_CHUNK_HEADER_LEN <= bytes.len() {
        match read_chunk(bytes, bin_offset)? {
            (GLB_CHUNK_BIN, data) => Some(Arc::from(data)),
            _ => None,
        }
    } else {
        None
    };

    ModelScene::from_gltf_json(json, binary)
}

fn read_chunk(bytes: &[u8], offset: usize) -> Result<(u32, &[u8]), DecodeError> {
    let len = read_u32(bytes, offset)? as usize;
    let kind = read_u32(bytes, offset + 4)?;
    let start = offset + GLB_CHUNK_HEADER_LEN;

    let data = bytes
        .get(start..start + len)
        .ok_or_else(|| DecodeError::malformed("GLB chunk extends past end of file"))?;

    Ok((kind, data))
}

//=========================================================================
// Unit Tests
//=========================================================================
