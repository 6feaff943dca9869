//=========================================================================
// Asset Pipeline
//=========================================================================
//
// Declares, fetches and decodes every asset before any world runs.
//
// Architecture:
//   AssetTable ──AssetLoader::load()──> AssetRegistry
//                   │
//                   ├─ AssetSource   (bytes: filesystem or custom)
//                   └─ decode()      (bytes → LoadedAsset)
//
// The registry is all-or-nothing: a single failure fails the batch.
//
//=========================================================================

//=== Module Declarations =================================================

mod decode;
mod descriptor;
mod error;
mod loader;
mod registry;
mod source;

//=== Public API ==========================================================

pub use decode::{
    BasisFormat, CompressedTexture, FontCommon, FontFace, FontInfo, Glyph, ImageTexture, Kerning,
    LoadedAsset, ModelMaterial, ModelNode, ModelScene, TextureContainer,
};
pub use descriptor::{AssetDescriptor, AssetFormat, AssetKind, AssetTable};
pub use error::{AssetError, DecodeError, LoadError};
pub use loader::{AssetLoader, LoadHandle, LoadStatus, RetryPolicy};
pub use registry::AssetRegistry;
pub use source::{AssetSource, FsSource};
