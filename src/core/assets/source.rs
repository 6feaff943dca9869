//=========================================================================
// Asset Sources
//=========================================================================
//
// Where asset bytes come from. The loader only sees `AssetSource`, so
// tests and embedders can swap in their own fetch strategy.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::path::{Path, PathBuf};

//=== AssetSource =========================================================

/// Byte provider shared by all loader workers.
///
/// `fetch` receives the descriptor's relative path. Errors returned here
/// are fetch failures and are eligible for retry.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, relative: &Path) -> io::Result<Vec<u8>>;
}

//=== FsSource ============================================================

/// Reads assets from a base directory on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
    base: PathBuf,
}

impl FsSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl AssetSource for FsSource {
    fn fetch(&self, relative: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.base.join(relative))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
