//=========================================================================
// Asset Errors
//=========================================================================
//
// Error taxonomy for asset declaration, decoding and batch loading.
//
//   AssetError   → descriptor / manifest problems (before loading)
//   DecodeError  → one payload could not be turned into a resource
//   LoadError    → batch-level failure; the registry is never exposed
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

//=== Internal Dependencies ===============================================

use super::descriptor::AssetFormat;

//=== AssetError ==========================================================

/// Errors raised while declaring assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset `{name}` has an unrecognized kind (path: {path})")]
    UnknownKind { name: String, path: String },

    #[error("asset `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("asset `{name}` has an invalid manifest entry: {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error("asset manifest is not valid JSON: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//=== DecodeError =========================================================

/// Errors raised while decoding a fetched payload.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DDS parse failed: {0}")]
    Dds(#[from] ddsfile::Error),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}

//=== LoadError ===========================================================

/// Batch-level loading failure.
///
/// Any of these is terminal for the batch: the completion callback is
/// never invoked and no partial registry is produced.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to fetch asset `{name}` from {} after {attempts} attempt(s): {source}", .path.display())]
    Fetch {
        name: String,
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode asset `{name}` as {format}: {source}")]
    Decode {
        name: String,
        format: AssetFormat,
        #[source]
        source: DecodeError,
    },

    #[error("asset loading stopped with {missing} asset(s) unresolved")]
    Incomplete { missing: usize },

    #[error("asset loader thread terminated before reporting a result")]
    LoaderLost,
}

impl LoadError {
    /// Logical name of the offending asset, when the failure is tied to one.
    pub fn asset_name(&self) -> Option<&str> {
        match self {
            Self::Fetch { name, .. } | Self::Decode { name, .. } => Some(name),
            Self::Incomplete { .. } | Self::LoaderLost => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
