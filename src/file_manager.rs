//! # File Management Module
//!
//! Questo modulo gestisce la classificazione dei file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Classificazione di ogni file tramite estensione (case-insensitive)
//! - Discovery ricorsiva di immagini supportate in una directory
//! - Utilità per calcoli dimensioni e percentuali
//! - Formattazione human-readable delle dimensioni
//!
//! ## Formati riconosciuti:
//! - **Da convertire**: PNG, JPG, JPEG, GIF, BMP, TIF, TIFF, ICO, TGA, PNM/PBM/PGM/PPM
//! - **Da copiare**: WebP (già nel formato di destinazione)
//!
//! ## Classificazione:
//! La decisione viene presa UNA volta per file e codificata in `FileAction`;
//! nessun altro modulo ri-controlla le estensioni.
//!
//! ## Esempio:
//! ```ignore
//! for file in FileManager::find_image_files(Path::new("/path/to/photos")) {
//!     match FileManager::classify(&file) {
//!         FileAction::Copy => { /* già WebP */ }
//!         FileAction::Convert => { /* decode + encode */ }
//!         FileAction::Unsupported => unreachable!(),
//!     }
//! }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions decoded and re-encoded by the converter
const CONVERTIBLE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "ico", "tga", "pnm", "pbm", "pgm", "ppm",
];

/// Extension already in the target format
const WEBP_EXTENSION: &str = "webp";

/// Per-file decision, taken once from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    /// Decode and re-encode
    Convert,
    /// Already WebP, copied byte for byte
    Copy,
    /// Not an image this tool knows about
    Unsupported,
}

/// Manages file classification and discovery
pub struct FileManager;

impl FileManager {
    /// Classify a file by its extension
    pub fn classify(path: &Path) -> FileAction {
        match Self::lowercase_extension(path).as_deref() {
            Some(WEBP_EXTENSION) => FileAction::Copy,
            Some(ext) if CONVERTIBLE_EXTENSIONS.contains(&ext) => FileAction::Convert,
            _ => FileAction::Unsupported,
        }
    }

    /// Check if a file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        Self::classify(path) != FileAction::Unsupported
    }

    /// Find all supported image files below a directory, in walk order.
    ///
    /// Symlinks to files are kept, symlinked directories are not descended.
    /// Unreadable entries are skipped.
    pub fn find_image_files(dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
        {
            let path = entry.path();
            if Self::is_supported_format(path) {
                files.push(path.to_path_buf());
            } else {
                debug!("Skipping unsupported file: {}", path.display());
            }
        }

        files
    }

    /// Size of a file in bytes, 0 if it cannot be read
    pub fn file_size(path: &Path) -> u64 {
        match std::fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Cannot read size of {}: {}", path.display(), e);
                0
            }
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }

    fn lowercase_extension(path: &Path) -> Option<String> {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(FileManager::classify(Path::new("a.webp")), FileAction::Copy);
        assert_eq!(FileManager::classify(Path::new("a.WEBP")), FileAction::Copy);
        assert_eq!(FileManager::classify(Path::new("a.Png")), FileAction::Convert);
        assert_eq!(FileManager::classify(Path::new("photo.JPEG")), FileAction::Convert);
        assert_eq!(FileManager::classify(Path::new("scan.tif")), FileAction::Convert);
        assert_eq!(FileManager::classify(Path::new("notes.txt")), FileAction::Unsupported);
        assert_eq!(FileManager::classify(Path::new("Makefile")), FileAction::Unsupported);
    }

    #[test]
    fn test_find_image_files_skips_unknown() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("a.png"), b"x").unwrap();
        fs::write(temp.path().join("readme.md"), b"x").unwrap();
        fs::write(temp.path().join("sub").join("b.webp"), b"x").unwrap();

        let mut files = FileManager::find_image_files(temp.path());
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.png"));
        assert!(files[1].ends_with("sub/b.webp"));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_image_files_keeps_symlinked_files() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real.png");
        fs::write(&real, b"x").unwrap();
        let dir = temp.path().join("in");
        fs::create_dir(&dir).unwrap();
        std::os::unix::fs::symlink(&real, dir.join("link.png")).unwrap();

        let files = FileManager::find_image_files(&dir);
        assert_eq!(files, vec![dir.join("link.png")]);
    }

    #[test]
    fn test_file_size_of_missing_file_is_zero() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.bin"), b"12345").unwrap();

        assert_eq!(FileManager::file_size(&temp.path().join("a.bin")), 5);
        assert_eq!(FileManager::file_size(&temp.path().join("gone.bin")), 0);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(0, 10), 0.0);
        assert_eq!(FileManager::calculate_reduction(200, 50), 75.0);
        assert!(FileManager::calculate_reduction(100, 150) < 0.0);
    }
}
