//! # Logo Transform Module
//!
//! Normalizza loghi e icone a una dimensione comune con padding trasparente.
//!
//! ## Responsabilità:
//! - Ridimensiona ogni immagine per stare in un quadrato `target_size`,
//!   mantenendo le proporzioni (Lanczos3)
//! - Centra il risultato su una tela trasparente `(target_size + 2·padding)²`
//! - Salva sempre in PNG come `<stem>.png`
//! - Elabora una directory (non ricorsiva) saltando i file che falliscono
//!
//! ## Esempio:
//! ```ignore
//! let written = process_all_logos(Path::new("logos"), Path::new("out"), &LogoOptions::default())?;
//! println!("{} logos normalised", written.len());
//! ```

use crate::error::{ConvertError, Result};
use crate::image_processor::ImageProcessor;
use image::{imageops, imageops::FilterType, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Extensions picked up by [`process_all_logos`]
const LOGO_EXTENSIONS: &[&str] = &["png", "jpeg", "jpg", "gif", "bmp", "tiff"];

/// Sizing parameters for the logo transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoOptions {
    /// Side of the square the image is scaled to fit in
    pub target_size: u32,
    /// Transparent border added on every side
    pub padding: u32,
}

impl Default for LogoOptions {
    fn default() -> Self {
        Self {
            target_size: 300,
            padding: 10,
        }
    }
}

/// Scale to fit and pad a single image. `None` for zero-sized input.
pub fn fit_and_pad(image: &RgbaImage, options: &LogoOptions) -> Option<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let target = options.target_size;
    let scale = f64::min(
        f64::from(target) / f64::from(width),
        f64::from(target) / f64::from(height),
    );
    let new_width = ((f64::from(width) * scale) as u32).max(1);
    let new_height = ((f64::from(height) * scale) as u32).max(1);
    let resized = imageops::resize(image, new_width, new_height, FilterType::Lanczos3);

    let side = target + 2 * options.padding;
    let mut canvas = RgbaImage::new(side, side);
    let x = options.padding + target.saturating_sub(new_width) / 2;
    let y = options.padding + target.saturating_sub(new_height) / 2;
    imageops::overlay(&mut canvas, &resized, i64::from(x), i64::from(y));

    Some(canvas)
}

/// Transform one image and save it as `<output_dir>/<stem>.png`.
///
/// Returns `Ok(None)` when the image is skipped for having no pixels.
pub fn transform_logo(
    image_path: &Path,
    output_dir: &Path,
    options: &LogoOptions,
) -> Result<Option<PathBuf>> {
    let image = ImageProcessor::to_rgba(&ImageProcessor::decode(image_path)?);

    let Some(padded) = fit_and_pad(&image, options) else {
        warn!("Skipping {}: image has zero width or height", image_path.display());
        return Ok(None);
    };

    let stem = image_path
        .file_stem()
        .ok_or_else(|| ConvertError::InvalidConfig(format!("invalid file name: {}", image_path.display())))?;
    let output_path = output_dir.join(format!("{}.png", stem.to_string_lossy()));

    padded
        .save_with_format(&output_path, image::ImageFormat::Png)
        .map_err(|e| ConvertError::Encode {
            path: output_path.clone(),
            message: e.to_string(),
        })?;

    info!("Transformed and saved: {}", output_path.display());
    Ok(Some(output_path))
}

/// Transform every image directly inside `input_dir` (no recursion).
///
/// Failures are logged and skipped; the written paths are returned.
pub fn process_all_logos(
    input_dir: &Path,
    output_dir: &Path,
    options: &LogoOptions,
) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(ConvertError::InputNotFound(input_dir.to_path_buf()));
    }
    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir).map_err(|source| ConvertError::OutputDirectory {
            path: output_dir.to_path_buf(),
            source,
        })?;
        info!("Created output directory: {}", output_dir.display());
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let mut processed = Vec::new();
    for path in entries {
        if !has_logo_extension(&path) {
            debug!("Skipping non-image file: {}", path.display());
            continue;
        }

        match transform_logo(&path, output_dir, options) {
            Ok(Some(output)) => processed.push(output),
            Ok(None) => {}
            Err(e) => error!("Error processing {}: {}", path.display(), e),
        }
    }

    Ok(processed)
}

fn has_logo_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| LOGO_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fit_and_pad_wide_image() {
        let wide = RgbaImage::from_pixel(600, 300, Rgba([0, 128, 0, 255]));
        let options = LogoOptions::default();

        let out = fit_and_pad(&wide, &options).unwrap();
        assert_eq!(out.dimensions(), (320, 320));

        // scaled to 300x150, centred vertically
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(160, 160)[3], 255);
        assert_eq!(out.get_pixel(160, 80)[3], 0);
        assert_eq!(out.get_pixel(160, 240)[3], 0);
    }

    #[test]
    fn test_fit_and_pad_zero_sized() {
        let empty = RgbaImage::new(0, 10);
        assert!(fit_and_pad(&empty, &LogoOptions::default()).is_none());
    }

    #[test]
    fn test_process_all_logos_skips_bad_files() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let out_dir = output.path().join("logos");

        RgbaImage::from_pixel(40, 80, Rgba([1, 2, 3, 255]))
            .save(input.path().join("tall.jpg.png"))
            .unwrap();
        RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]))
            .save(input.path().join("icon.bmp"))
            .unwrap();
        fs::write(input.path().join("corrupt.png"), b"not an image").unwrap();
        fs::write(input.path().join("readme.txt"), b"hello").unwrap();

        let options = LogoOptions {
            target_size: 50,
            padding: 5,
        };
        let written = process_all_logos(input.path(), &out_dir, &options).unwrap();

        assert_eq!(written.len(), 2);
        assert!(out_dir.join("icon.png").exists());
        assert!(out_dir.join("tall.jpg.png").exists());

        let icon = image::open(out_dir.join("icon.png")).unwrap();
        assert_eq!((icon.width(), icon.height()), (60, 60));
    }
}
