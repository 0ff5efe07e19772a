//! # Background Removal Module
//!
//! Questo modulo definisce il punto di estensione per la rimozione dello sfondo.
//!
//! ## Responsabilità:
//! - Definisce il trait `BackgroundRemover` usato da `ConversionAction`
//! - Carica l'implementazione concreta (U²-Net via ONNX Runtime) quando
//!   la feature `onnx` è attiva
//! - Risolve il path di default del modello
//!
//! Senza la feature `onnx` il caricamento fallisce con un errore esplicito:
//! la conversione continua a funzionare, ma ogni file che richiede la
//! rimozione dello sfondo viene registrato come fallito.

use crate::error::{ConvertError, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// File name of the segmentation model looked up in the data directory
pub const DEFAULT_MODEL_FILE: &str = "u2net.onnx";

/// Segmentation collaborator: takes an opaque RGBA image and returns the
/// same image with the background made transparent.
pub trait BackgroundRemover {
    fn remove_background(&mut self, image: &RgbaImage) -> Result<RgbaImage>;
}

/// Default model location: `<data dir>/webp-converter/u2net.onnx`
pub fn default_model_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("webp-converter").join(DEFAULT_MODEL_FILE))
}

/// Whether this build can remove backgrounds at all
pub const fn is_available() -> bool {
    cfg!(feature = "onnx")
}

/// Load the background remover, from `model_path` or the default location.
#[cfg(feature = "onnx")]
pub fn load(model_path: Option<&Path>) -> Result<Box<dyn BackgroundRemover>> {
    let path = resolve_model_path(model_path)?;
    let model = crate::u2net::U2Net::new(&path)?;
    Ok(Box::new(model))
}

/// Load the background remover, from `model_path` or the default location.
#[cfg(not(feature = "onnx"))]
pub fn load(model_path: Option<&Path>) -> Result<Box<dyn BackgroundRemover>> {
    let _ = model_path;
    Err(ConvertError::BackgroundRemoval(
        "this build was compiled without the `onnx` feature".to_string(),
    ))
}

#[cfg_attr(not(feature = "onnx"), allow(dead_code))]
fn resolve_model_path(model_path: Option<&Path>) -> Result<PathBuf> {
    let path = match model_path {
        Some(path) => path.to_path_buf(),
        None => default_model_path().ok_or_else(|| {
            ConvertError::BackgroundRemoval("cannot determine the data directory".to_string())
        })?,
    };

    if !path.is_file() {
        return Err(ConvertError::BackgroundRemoval(format!(
            "model file not found: {}",
            path.display()
        )));
    }
    Ok(path)
}

#[cfg(test)]
pub(crate) mod mocks {
    use super::*;
    use image::Rgba;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Remover that clears the alpha of the left half and counts its calls
    pub struct CountingRemover {
        pub calls: Rc<Cell<usize>>,
    }

    impl CountingRemover {
        pub fn new() -> (Self, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            (Self { calls: Rc::clone(&calls) }, calls)
        }
    }

    impl BackgroundRemover for CountingRemover {
        fn remove_background(&mut self, image: &RgbaImage) -> Result<RgbaImage> {
            self.calls.set(self.calls.get() + 1);
            let half = image.width() / 2;
            Ok(RgbaImage::from_fn(image.width(), image.height(), |x, y| {
                let p = image.get_pixel(x, y);
                if x < half {
                    Rgba([p[0], p[1], p[2], 0])
                } else {
                    *p
                }
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_model_is_reported() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.onnx");

        let err = resolve_model_path(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConvertError::BackgroundRemoval(_)));
        assert!(err.to_string().contains("nope.onnx"));
    }

    #[test]
    fn test_default_model_path_file_name() {
        if let Some(path) = default_model_path() {
            assert!(path.ends_with("webp-converter/u2net.onnx"));
        }
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_load_without_onnx_fails() {
        assert!(!is_available());
        assert!(load(None).is_err());
    }
}
