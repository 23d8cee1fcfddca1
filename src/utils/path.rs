//! Path utilities for output naming and ffmpeg filter arguments

use std::path::{Path, PathBuf};

use crate::domain::model::Container;

/// Suffix appended to the source stem for derived output names
pub const CLIP_SUFFIX: &str = "_clip";

/// Path utilities
#[derive(Debug, Clone, Copy)]
pub struct PathUtils;

impl PathUtils {
    /// Create a new path utils instance
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PathUtils {
    fn default() -> Self {
        Self::new()
    }
}

impl PathUtils {
    /// `<dir>/<stem>_clip.<ext>` next to the source
    pub fn derive_output_path(&self, source: &str, container: Container) -> PathBuf {
        let source = Path::new(source);
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let file_name = format!("{}{}.{}", stem, CLIP_SUFFIX, container.extension());

        match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
            _ => PathBuf::from(file_name),
        }
    }

    /// Get file extension from path
    pub fn get_extension(&self, path: &str) -> Option<String> {
        Path::new(path)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Container implied by the path's extension, if recognised
    pub fn container_for(&self, path: &str) -> Option<Container> {
        self.get_extension(path)
            .and_then(|ext| Container::from_extension(&ext))
    }

    /// Forward slashes, with `:` and `'` escaped for use inside a filter argument
    pub fn escape_filter_path(&self, path: &str) -> String {
        path.replace('\\', "/")
            .replace(':', r"\:")
            .replace('\'', r"\\'")
    }
}
