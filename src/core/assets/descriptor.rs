//=========================================================================
// Asset Descriptors
//=========================================================================
//
// Static table mapping logical asset names to source paths.
//
// Architecture:
//   "hall_model" → "hall.gltf" → AssetFormat::Gltf → AssetKind::Model
//
// The format is resolved from the file extension when the descriptor is
// built. Unknown extensions are rejected here, never at load time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

//=== Internal Dependencies ===============================================

use super::error::AssetError;

//=== AssetKind ===========================================================

/// Decoded resource category produced by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Bitmap font descriptor (glyph metrics + page textures).
    Font,

    /// Decoded raster image.
    Image,

    /// GPU-compressed texture container, transcoded by the renderer.
    CompressedTexture,

    /// 3D scene graph (nodes, meshes, materials).
    Model,
}

//=== AssetFormat =========================================================

/// Closed set of on-disk encodings the loader knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetFormat {
    /// `.font` - BMFont JSON descriptor.
    Font,

    /// `.png`
    Png,

    /// `.jpg` / `.jpeg`
    Jpeg,

    /// `.basis` - Basis Universal supercompressed texture.
    Basis,

    /// `.dds` - DirectDraw Surface.
    Dds,

    /// `.gltf` - glTF 2.0 JSON.
    Gltf,

    /// `.glb` - glTF 2.0 binary container.
    Glb,
}

impl AssetFormat {
    /// Resolves a format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "font" => Some(Self::Font),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "basis" => Some(Self::Basis),
            "dds" => Some(Self::Dds),
            "gltf" => Some(Self::Gltf),
            "glb" => Some(Self::Glb),
            _ => None,
        }
    }

    /// Resolves a format from the extension of `path`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Resource category this format decodes into.
    pub fn kind(self) -> AssetKind {
        match self {
            Self::Font => AssetKind::Font,
            Self::Png | Self::Jpeg => AssetKind::Image,
            Self::Basis | Self::Dds => AssetKind::CompressedTexture,
            Self::Gltf | Self::Glb => AssetKind::Model,
        }
    }
}

impl fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Font => "font",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Basis => "basis",
            Self::Dds => "dds",
            Self::Gltf => "gltf",
            Self::Glb => "glb",
        };
        f.write_str(name)
    }
}

//=== AssetDescriptor =====================================================

/// One declared asset: logical name, relative path, resolved format.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    name: String,
    path: PathBuf,
    format: AssetFormat,
}

impl AssetDescriptor {
    /// Builds a descriptor, resolving its format from the path extension.
    ///
    /// # Errors
    ///
    /// [`AssetError::UnknownKind`] if the extension is not recognised.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let name = name.into();
        let path = path.into();

        let format = AssetFormat::from_path(&path).ok_or_else(|| AssetError::UnknownKind {
            name: name.clone(),
            path: path.display().to_string(),
        })?;

        Ok(Self { name, path, format })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> AssetFormat {
        self.format
    }

    pub fn kind(&self) -> AssetKind {
        self.format.kind()
    }
}

//=== AssetTable ==========================================================

/// Ordered set of asset descriptors with unique names.
///
/// Declared once at startup and handed to the loader. Declaration order
/// is kept for logging only; results are addressed by name.
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    descriptors: Vec<AssetDescriptor>,
    names: HashSet<String>,
}

impl AssetTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(name, path)` pairs.
    ///
    /// Stops at the first invalid or duplicate entry.
    pub fn from_pairs<I, N, P>(pairs: I) -> Result<Self, AssetError>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<PathBuf>,
    {
        let mut table = Self::new();
        for (name, path) in pairs {
            table.insert(name, path)?;
        }
        Ok(table)
    }

    /// Parses a JSON manifest of the form `{ "name": "path", ... }`.
    pub fn from_json_str(json: &str) -> Result<Self, AssetError> {
        let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut table = Self::new();
        for (name, value) in entries {
            match value {
                serde_json::Value::String(path) => {
                    table.insert(name, path)?;
                }
                other => {
                    return Err(AssetError::InvalidEntry {
                        name,
                        reason: format!("expected a path string, found {}", other),
                    });
                }
            }
        }

        debug!(target: "assets", "Parsed manifest with {} descriptors", table.len());
        Ok(table)
    }

    /// Reads and parses a JSON manifest file.
    pub fn from_manifest_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Declares an asset.
    ///
    /// # Errors
    ///
    /// - [`AssetError::UnknownKind`] for an unrecognised extension
    /// - [`AssetError::DuplicateName`] if `name` was already declared
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<&AssetDescriptor, AssetError> {
        let descriptor = AssetDescriptor::new(name, path)?;

        if !self.names.insert(descriptor.name.clone()) {
            return Err(AssetError::DuplicateName(descriptor.name));
        }

        self.descriptors.push(descriptor);
        Ok(&self.descriptors[self.descriptors.len() - 1])
    }

    /// Looks up a descriptor by logical name.
    pub fn get(&self, name: &str) -> Option<&AssetDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
