//! Host I/O collaborators: reading documents and image headers.

use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use bevy::platform::collections::HashMap;
use normalize_path::NormalizePath;

use crate::config::ImportConfig;
use crate::error::TmxError;

/// Texture identity handed to the host: which file, keyed by which colour.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureKey {
    /// Normalised path relative to the asset root, `/` separated.
    pub path: PathBuf,
    pub transparent_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub texture: TextureKey,
    pub width: u32,
    pub height: u32,
}

/// Everything the import pipeline needs from the outside world.
///
/// Paths passed in are already resolved and normalised relative to the asset root.
pub trait TmxAssetSource {
    /// Read a TMX or TSX document. A missing file is [`TmxError::MissingAsset`].
    fn read_text(&self, path: &Path) -> Result<String, TmxError>;

    /// Resolve an image to a texture identity and its pixel size.
    fn load_image(&self, path: &Path, transparent_color: Option<&str>)
    -> Result<LoadedImage, TmxError>;
}

/// Resolve `reference` against the directory of `document`.
///
/// `..` segments are collapsed and can never climb above the asset root.
/// Rooted references (`/x`, `C:/x`) keep only their file name and are looked
/// up next to `document`.
pub fn resolve_path(document: &Path, reference: &str) -> PathBuf {
    let reference = reference.replace('\\', "/");
    let base = document.parent().unwrap_or_else(|| Path::new(""));
    if is_rooted(&reference) {
        let file_name = reference.rsplit('/').next().unwrap_or_default();
        return base.join(file_name).normalize();
    }
    base.join(reference).normalize()
}

fn is_rooted(reference: &str) -> bool {
    reference.starts_with('/')
        || reference
            .split('/')
            .next()
            .is_some_and(|first| first.ends_with(':'))
}

/// Asset path as Bevy expects it: forward slashes, no leading slash.
pub fn asset_path_string(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .trim_start_matches('/')
        .to_string()
}

/// Reads documents and image headers below a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(config.asset_root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `path` joined below the root; root, prefix and `..` components are dropped.
    fn full_path(&self, path: &Path) -> PathBuf {
        let mut full_path = self.root.clone();
        full_path.extend(
            path.normalize()
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => Some(part),
                    _ => None,
                }),
        );
        full_path
    }
}

impl TmxAssetSource for FileSystemSource {
    fn read_text(&self, path: &Path) -> Result<String, TmxError> {
        let full_path = self.full_path(path);
        std::fs::read_to_string(&full_path)
            .map_err(|err| TmxError::MissingAsset(format!("{}: {err}", full_path.display())))
    }

    fn load_image(
        &self,
        path: &Path,
        transparent_color: Option<&str>,
    ) -> Result<LoadedImage, TmxError> {
        let full_path = self.full_path(path);
        let (width, height) = image::image_dimensions(&full_path)
            .map_err(|err| TmxError::MissingAsset(format!("{}: {err}", full_path.display())))?;

        Ok(LoadedImage {
            texture: TextureKey {
                path: path.to_path_buf(),
                transparent_color: transparent_color.map(str::to_string),
            },
            width,
            height,
        })
    }
}

/// In-memory source, for hosts that already hold their documents and for tests.
///
/// Counts document reads so callers can observe caching.
#[derive(Debug, Default)]
pub struct MemorySource {
    texts: HashMap<PathBuf, String>,
    images: HashMap<PathBuf, (u32, u32)>,
    reads: Mutex<HashMap<PathBuf, usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.texts.insert(path.into(), text.into());
        self
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.images.insert(path.into(), (width, height));
        self
    }

    pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
        self.reads
            .lock()
            .ok()
            .and_then(|reads| reads.get(path.as_ref()).copied())
            .unwrap_or(0)
    }
}

impl TmxAssetSource for MemorySource {
    fn read_text(&self, path: &Path) -> Result<String, TmxError> {
        if let Ok(mut reads) = self.reads.lock() {
            *reads.entry(path.to_path_buf()).or_insert(0) += 1;
        }
        self.texts
            .get(path)
            .cloned()
            .ok_or_else(|| TmxError::MissingAsset(path.display().to_string()))
    }

    fn load_image(
        &self,
        path: &Path,
        transparent_color: Option<&str>,
    ) -> Result<LoadedImage, TmxError> {
        let (width, height) = self
            .images
            .get(path)
            .copied()
            .ok_or_else(|| TmxError::MissingAsset(path.display().to_string()))?;
        Ok(LoadedImage {
            texture: TextureKey {
                path: path.to_path_buf(),
                transparent_color: transparent_color.map(str::to_string),
            },
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path_collapses_parent_segments() {
        assert_eq!(
            resolve_path(Path::new("maps/level1.tmx"), "../tilesets/terrain.tsx"),
            PathBuf::from("tilesets/terrain.tsx")
        );
        assert_eq!(
            resolve_path(Path::new("maps/level1.tmx"), "./props.tsx"),
            PathBuf::from("maps/props.tsx")
        );
    }

    #[test]
    fn test_resolve_path_stays_below_root() {
        assert_eq!(
            resolve_path(Path::new("level.tmx"), "../../shared/tiles.png"),
            PathBuf::from("shared/tiles.png")
        );
    }

    #[test]
    fn test_resolve_path_rewrites_windows_separators() {
        assert_eq!(
            resolve_path(Path::new("maps/a.tmx"), "..\\img\\tiles.png"),
            PathBuf::from("img/tiles.png")
        );
    }

    #[test]
    fn test_memory_source_missing_asset() {
        let source = MemorySource::new().with_text("a.tsx", "<tileset/>");
        assert!(source.read_text(Path::new("a.tsx")).is_ok());
        assert!(matches!(
            source.read_text(Path::new("b.tsx")),
            Err(TmxError::MissingAsset(_))
        ));
        assert!(matches!(
            source.load_image(Path::new("a.png"), None),
            Err(TmxError::MissingAsset(_))
        ));
        assert_eq!(source.read_count("a.tsx"), 1);
    }

    #[test]
    fn test_filesystem_source_missing_file() {
        let source = FileSystemSource::new("definitely/not/a/real/root");
        assert!(matches!(
            source.read_text(Path::new("map.tmx")),
            Err(TmxError::MissingAsset(_))
        ));
    }

    #[test]
    fn test_resolve_path_rooted_reference_stays_beside_document() {
        assert_eq!(
            resolve_path(Path::new("maps/level.tmx"), "/etc/hostname"),
            PathBuf::from("maps/hostname")
        );
        assert_eq!(
            resolve_path(Path::new("maps/level.tmx"), "C:\\art\\tiles.png"),
            PathBuf::from("maps/tiles.png")
        );
        assert_eq!(
            resolve_path(Path::new("maps/level.tmx"), "d:/art/tiles.png"),
            PathBuf::from("maps/tiles.png")
        );
    }

    #[test]
    fn test_filesystem_source_stays_below_root() {
        let source = FileSystemSource::new("assets");
        assert_eq!(
            source.full_path(Path::new("/etc/hostname")),
            PathBuf::from("assets/etc/hostname")
        );
        assert_eq!(
            source.full_path(Path::new("../../secret.tmx")),
            PathBuf::from("assets/secret.tmx")
        );
        assert_eq!(
            source.full_path(Path::new("maps/level.tmx")),
            PathBuf::from("assets/maps/level.tmx")
        );
    }
}
