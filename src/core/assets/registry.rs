//=========================================================================
// Asset Registry
//=========================================================================
//
// Name → loaded resource map handed to every world.
//
// Only a fully successful batch produces a populated registry; the
// loader is the sole writer. After that it is read-only and shared.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::Arc;

//=== Internal Dependencies ===============================================

use super::decode::{CompressedTexture, FontFace, ImageTexture, LoadedAsset, ModelScene};

//=== AssetRegistry =======================================================

/// Read-only collection of decoded assets, keyed by logical name.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: HashMap<String, Arc<LoadedAsset>>,
}

impl AssetRegistry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            assets: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, name: String, asset: LoadedAsset) {
        self.assets.insert(name, Arc::new(asset));
    }

    //--- Lookup -----------------------------------------------------------

    /// Shared handle to an asset, regardless of kind.
    pub fn get(&self, name: &str) -> Option<Arc<LoadedAsset>> {
        self.assets.get(name).cloned()
    }

    pub fn font(&self, name: &str) -> Option<&FontFace> {
        self.assets.get(name).and_then(|a| a.as_font())
    }

    pub fn image(&self, name: &str) -> Option<&ImageTexture> {
        self.assets.get(name).and_then(|a| a.as_image())
    }

    pub fn compressed_texture(&self, name: &str) -> Option<&CompressedTexture> {
        self.assets.get(name).and_then(|a| a.as_compressed_texture())
    }

    pub fn model(&self, name: &str) -> Option<&ModelScene> {
        self.assets.get(name).and_then(|a| a.as_model())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Asset names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
