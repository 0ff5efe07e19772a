//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom della libreria.
//!
//! ## Responsabilità:
//! - Definisce `ConvertError` enum per categorizzare tutti gli errori possibili
//! - Separa gli errori fatali (input mancanti, output root) da quelli per-file
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `InputNotFound`: Uno o più input non esistono (fatale, controllato prima di tutto)
//! - `Decode` / `UnidentifiedFormat`: Immagine illeggibile, troncata o formato sconosciuto
//! - `Encode` / `Copy`: Errori di I/O o dell'encoder durante la scrittura
//! - `InvalidConfig`: Parametri non validi (es. quality fuori range)
//! - `BackgroundRemoval`: Errori del modello di segmentazione
//! - `OutputDirectory`: Impossibile creare la directory di output (fatale)
//!
//! ## Esempio:
//! ```ignore
//! if !path.exists() {
//!     return Err(ConvertError::InputNotFound(path.to_path_buf()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for image conversion
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Input path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Cannot identify image file {}", .0.display())]
    UnidentifiedFormat(PathBuf),

    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Background removal error: {0}")]
    BackgroundRemoval(String),

    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Whether this error must abort the whole run instead of a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InputNotFound(_) | Self::InvalidConfig(_) | Self::OutputDirectory { .. }
        )
    }
}

/// Convert ONNX Runtime errors to background removal errors.
#[cfg(feature = "onnx")]
impl From<ort::Error> for ConvertError {
    fn from(err: ort::Error) -> Self {
        Self::BackgroundRemoval(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ConvertError::InputNotFound(PathBuf::from("missing.png")).is_fatal());
        assert!(ConvertError::InvalidConfig("quality".to_string()).is_fatal());
        assert!(!ConvertError::UnidentifiedFormat(PathBuf::from("x.png")).is_fatal());
        assert!(!ConvertError::Encode {
            path: PathBuf::from("x.webp"),
            message: "disk full".to_string(),
        }
        .is_fatal());
    }

    #[test]
    fn test_messages_include_path() {
        let err = ConvertError::InputNotFound(PathBuf::from("photos/cat.jpg"));
        assert!(err.to_string().contains("photos/cat.jpg"));

        let err = ConvertError::Decode {
            path: PathBuf::from("broken.png"),
            message: "unexpected EOF".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to decode broken.png: unexpected EOF");
    }
}
