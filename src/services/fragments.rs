//! Page fragment loading
//!
//! Pages are described by JSON fragments named after the page
//! ("downloader", "console", "settings", plus the "queue" panel body).
//! [`AssetFragments`] reads them from an assets directory so they can be
//! edited without rebuilding; [`BuiltinFragments`] serves the compiled-in
//! copies and is the fallback when no assets directory is configured.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

/// Source of page fragment text
#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Fetch the raw JSON for a fragment by name
    async fn fetch(&self, name: &str) -> io::Result<String>;
}

/// Reads fragments from `<root>/pages/<name>.json`
pub struct AssetFragments {
    root: PathBuf,
}

impl AssetFragments {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn fragment_path(&self, name: &str) -> io::Result<PathBuf> {
        // Fragment names are bare identifiers, never paths
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid fragment name: {:?}", name),
            ));
        }
        Ok(self.root.join("pages").join(format!("{}.json", name)))
    }
}

#[async_trait]
impl FragmentSource for AssetFragments {
    async fn fetch(&self, name: &str) -> io::Result<String> {
        let path = self.fragment_path(name)?;
        tokio::fs::read_to_string(&path).await
    }
}

/// Serves the fragments compiled into the binary
pub struct BuiltinFragments;

#[async_trait]
impl FragmentSource for BuiltinFragments {
    async fn fetch(&self, name: &str) -> io::Result<String> {
        let text = match name {
            "downloader" => include_str!("../../assets/pages/downloader.json"),
            "console" => include_str!("../../assets/pages/console.json"),
            "settings" => include_str!("../../assets/pages/settings.json"),
            "queue" => include_str!("../../assets/pages/queue.json"),
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no builtin fragment named {:?}", name),
                ))
            }
        };
        Ok(text.to_string())
    }
}
