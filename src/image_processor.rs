//! # Image Processing Module
//!
//! Questo modulo incapsula tutte le operazioni di codec sulle immagini, esposte
//! al resto della libreria come semplici funzioni sincrone.
//!
//! ## Responsabilità:
//! - Decodifica con rilevamento del formato dal contenuto (non solo dall'estensione)
//! - Normalizzazione RGBA e controllo trasparenza
//! - Encoding WebP lossy/lossless tramite `libwebp` (crate `webp`)
//! - Ri-salvataggio nel formato originale (modalità "Resize only")
//!
//! ## Pipeline di conversione
//!
//! 1. **Decode**: `ImageReader` + `with_guessed_format()`
//! 2. **RGBA**: ogni immagine viene portata a 8 bit per canale con alpha
//! 3. **Encode**: `webp::Encoder::from_rgba` con qualità 0-100 o lossless
//! 4. **Write**: scrittura su disco del buffer codificato
//!
//! ## Mappatura errori
//!
//! | Situazione | Errore |
//! |------------|--------|
//! | Formato non riconoscibile | `UnidentifiedFormat` |
//! | File troncato / corrotto | `Decode` |
//! | Encoder o scrittura falliti | `Encode` |
//!
//! ## Esempio:
//! ```ignore
//! let image = ImageProcessor::decode(Path::new("photo.jpg"))?;
//! let rgba = ImageProcessor::to_rgba(&image);
//! let written = ImageProcessor::encode_webp(&rgba, Path::new("photo.webp"), 80, false)?;
//! ```

use crate::error::{ConvertError, Result};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Codec wrapper used by the conversion actions
pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode an image, sniffing the format from its content first.
    ///
    /// # Errors
    /// - `UnidentifiedFormat` if neither content nor extension name a known format
    /// - `Decode` for truncated or corrupt data
    pub fn decode(path: &Path) -> Result<DynamicImage> {
        let decode_error = |message: String| ConvertError::Decode {
            path: path.to_path_buf(),
            message,
        };

        let reader = ImageReader::open(path)
            .map_err(|e| decode_error(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| decode_error(e.to_string()))?;

        let Some(format) = reader.format() else {
            return Err(ConvertError::UnidentifiedFormat(path.to_path_buf()));
        };
        debug!("Decoding {} as {:?}", path.display(), format);

        reader.decode().map_err(|e| match e {
            image::ImageError::Unsupported(_) => {
                ConvertError::UnidentifiedFormat(path.to_path_buf())
            }
            other => decode_error(other.to_string()),
        })
    }

    /// Normalise any decoded image to 8-bit RGBA
    pub fn to_rgba(image: &DynamicImage) -> RgbaImage {
        image.to_rgba8()
    }

    /// True when at least one pixel is not fully opaque
    pub fn has_transparency(image: &RgbaImage) -> bool {
        image.pixels().any(|p| p[3] < u8::MAX)
    }

    /// Encode an RGBA image as WebP and write it to `output`.
    ///
    /// `quality` is ignored by libwebp when `lossless` is set.
    /// Returns the number of bytes written.
    pub fn encode_webp(
        image: &RgbaImage,
        output: &Path,
        quality: u8,
        lossless: bool,
    ) -> Result<u64> {
        let encode_error = |message: String| ConvertError::Encode {
            path: output.to_path_buf(),
            message,
        };

        let encoder = webp::Encoder::from_rgba(image.as_raw(), image.width(), image.height());
        let encoded = encoder
            .encode_simple(lossless, f32::from(quality))
            .map_err(|e| encode_error(format!("{:?}", e)))?;

        std::fs::write(output, &*encoded).map_err(|e| encode_error(e.to_string()))?;

        debug!(
            "Encoded {}x{} WebP ({} bytes, quality {}, lossless {})",
            image.width(),
            image.height(),
            encoded.len(),
            quality,
            lossless
        );
        Ok(encoded.len() as u64)
    }

    /// Format implied by a path's extension
    pub fn format_from_path(path: &Path) -> Result<ImageFormat> {
        ImageFormat::from_path(path)
            .map_err(|_| ConvertError::UnidentifiedFormat(path.to_path_buf()))
    }

    /// Write `image` to `output` in `format`
    pub fn save_in_original_format(
        image: &DynamicImage,
        output: &Path,
        format: ImageFormat,
    ) -> Result<()> {
        image
            .save_with_format(output, format)
            .map_err(|e| ConvertError::Encode {
                path: output.to_path_buf(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;
    use tempfile::TempDir;

    fn checkerboard(width: u32, height: u32, alpha: u8) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, alpha])
            } else {
                Rgba([0, 0, 255, alpha])
            }
        })
    }

    #[test]
    fn test_decode_corrupt_png_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.png");
        // valid PNG signature, truncated body
        fs::write(&path, b"\x89PNG\r\n\x1a\n\0\0\0").unwrap();

        let err = ImageProcessor::decode(&path).unwrap_err();
        assert!(matches!(err, ConvertError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn test_decode_unknown_content_is_unidentified() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, b"just some text").unwrap();

        let err = ImageProcessor::decode(&path).unwrap_err();
        assert!(matches!(err, ConvertError::UnidentifiedFormat(_)), "got {err:?}");
    }

    #[test]
    fn test_has_transparency() {
        assert!(!ImageProcessor::has_transparency(&checkerboard(4, 4, 255)));

        let mut image = checkerboard(4, 4, 255);
        image.put_pixel(3, 3, Rgba([0, 0, 0, 254]));
        assert!(ImageProcessor::has_transparency(&image));
    }

    #[test]
    fn test_encode_webp_lossless_preserves_pixels() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("board.webp");
        let image = checkerboard(8, 6, 255);

        let written = ImageProcessor::encode_webp(&image, &output, 80, true).unwrap();
        assert_eq!(written, fs::metadata(&output).unwrap().len());

        let bytes = fs::read(&output).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");

        let decoded = ImageProcessor::decode(&output).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.as_raw(), image.as_raw());
    }

    #[test]
    fn test_save_in_original_format_keeps_dimensions() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.png");
        checkerboard(5, 7, 255).save(&input).unwrap();

        let image = ImageProcessor::decode(&input).unwrap();
        let format = ImageProcessor::format_from_path(&input).unwrap();
        let output = temp.path().join("out.png");
        ImageProcessor::save_in_original_format(&image, &output, format).unwrap();

        let reloaded = image::open(&output).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (5, 7));
    }
}
