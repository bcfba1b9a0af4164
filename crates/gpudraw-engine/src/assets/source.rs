use std::io;
use std::path::{Path, PathBuf};

/// Where asset bytes come from.
///
/// Paths are relative to the source. Implementations must be `Sync` because the
/// loader fetches independent assets concurrently.
pub trait AssetSource: Sync {
    fn fetch(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn fetch_text(&self, path: &Path) -> io::Result<String> {
        let bytes = self.fetch(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists the stems of files in `dir` with the given extension, sorted.
    pub fn list_stems(&self, dir: &Path, extension: &str) -> io::Result<Vec<String>> {
        let mut stems = Vec::new();
        for entry in std::fs::read_dir(self.root.join(dir))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
        stems.sort();
        Ok(stems)
    }
}

impl AssetSource for DirSource {
    fn fetch(&self, path: &Path) -> io::Result<Vec<u8>> {
        let full = self.root.join(path);
        log::debug!("fetching {}", full.display());
        std::fs::read(&full)
    }
}
