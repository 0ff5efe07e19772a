//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione di una singola esecuzione batch.
//!
//! ## Responsabilità:
//! - Definisce la struct `ConversionConfig` con tutti i parametri di conversione
//! - Definisce `OperationMode` (Convert to WebP / Resize only)
//! - Fornisce validazione dei parametri prima che qualsiasi file venga toccato
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `quality`: Qualità WebP (0-100, default: 80)
//! - `lossless`: Encoding WebP lossless (default: false)
//! - `force`: Sovrascrive i file esistenti senza chiedere (default: false)
//! - `remove_background`: Rimozione sfondo con modello AI (default: false)
//! - `mode`: Modalità operativa (default: ConvertToWebp)
//!
//! ## Validazione:
//! - Controlla che quality sia 0-100
//! - La rimozione sfondo è disponibile solo in modalità ConvertToWebp
//!
//! ## Esempio:
//! ```ignore
//! let config = ConversionConfig {
//!     quality: 90,
//!     lossless: true,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::error::{ConvertError, Result};
use serde::Serialize;

/// Maximum accepted WebP quality
pub const MAX_QUALITY: u8 = 100;

/// Default WebP quality used by every entry point
pub const DEFAULT_QUALITY: u8 = 80;

/// What to do with images that are not already WebP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// Re-encode every non-WebP image as WebP
    #[value(name = "convert")]
    ConvertToWebp,
    /// Re-save in the original format.
    ///
    /// Despite the name, pixel dimensions are left untouched: the image is
    /// decoded, its buffer duplicated and written back in the same format.
    ResizeOnly,
}

impl Default for OperationMode {
    fn default() -> Self {
        Self::ConvertToWebp
    }
}

impl OperationMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConvertToWebp => "Convert to WebP",
            Self::ResizeOnly => "Resize Only (retain original format)",
        }
    }
}

/// Configuration for one batch run, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionConfig {
    /// WebP quality (0-100), ignored outside WebP encoding
    pub quality: u8,
    /// Lossless instead of lossy WebP
    pub lossless: bool,
    /// Overwrite existing outputs without asking
    pub force: bool,
    /// Remove the background of opaque images before encoding
    pub remove_background: bool,
    /// Operation mode
    pub mode: OperationMode,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            lossless: false,
            force: false,
            remove_background: false,
            mode: OperationMode::ConvertToWebp,
        }
    }
}

impl ConversionConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.quality > MAX_QUALITY {
            return Err(ConvertError::InvalidConfig(format!(
                "WebP quality must be between 0 and {}, got {}",
                MAX_QUALITY, self.quality
            )));
        }

        if self.remove_background && self.mode == OperationMode::ResizeOnly {
            return Err(ConvertError::InvalidConfig(
                "Background removal is only available when converting to WebP".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse a quality value typed by the user.
///
/// Accepts only plain digits in `0..=100`; signs, spaces inside the number
/// and decimals are rejected.
pub fn parse_quality(raw: &str) -> Result<u8> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConvertError::InvalidConfig(format!(
            "Quality must be a whole number between 0 and {}: '{}'",
            MAX_QUALITY, raw
        )));
    }

    match trimmed.parse::<u32>() {
        Ok(value) if value <= u32::from(MAX_QUALITY) => Ok(value as u8),
        _ => Err(ConvertError::InvalidConfig(format!(
            "Quality must be between 0 and {}, got {}",
            MAX_QUALITY, trimmed
        ))),
    }
}
