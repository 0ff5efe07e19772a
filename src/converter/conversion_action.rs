//! # Conversion Action Module
//!
//! Esegue l'effetto per un singolo `WorkItem`.
//!
//! ## Responsabilità:
//! - Overwrite gate: se l'output esiste e `force` è falso chiede al reporter
//! - Creazione idempotente delle directory parent dell'output
//! - `Copy`: copia byte-per-byte dei file già WebP
//! - `Convert` + `ConvertToWebp`: decode, RGBA, rimozione sfondo opzionale, encode WebP
//! - `Convert` + `ResizeOnly`: decode e ri-salvataggio nel formato originale
//!
//! Ogni errore viene restituito come `Result`: è il `BatchRunner` a decidere
//! che un file fallito non interrompe il batch.

use crate::background::{self, BackgroundRemover};
use crate::config::{ConversionConfig, OperationMode};
use crate::converter::path_resolver::{WorkAction, WorkItem};
use crate::error::{ConvertError, Result};
use crate::file_manager::FileManager;
use crate::image_processor::ImageProcessor;
use crate::progress::ProgressManager;
use crate::reporter::Reporter;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Size report for a WebP conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub original_size: u64,
    pub new_size: u64,
    pub quality: u8,
    pub lossless: bool,
}

impl ConversionStats {
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.new_size as i64
    }

    pub fn reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.original_size, self.new_size)
    }
}

/// What happened to a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Encoded to WebP
    Converted(ConversionStats),
    /// Re-saved in its original format
    Resaved,
    /// Already WebP, copied
    Copied,
    /// Output existed and overwrite was declined
    Skipped,
}

/// Applies the per-item transformation
pub struct ConversionAction {
    remover: Option<Box<dyn BackgroundRemover>>,
}

impl Default for ConversionAction {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionAction {
    /// Action without background removal support
    pub fn new() -> Self {
        Self { remover: None }
    }

    /// Action that uses `remover` when background removal is requested
    pub fn with_remover(remover: Box<dyn BackgroundRemover>) -> Self {
        Self {
            remover: Some(remover),
        }
    }

    /// Build the action a configuration needs, loading the segmentation
    /// model only when background removal is requested.
    pub fn for_config(config: &ConversionConfig, model_path: Option<&Path>) -> Result<Self> {
        if !config.remove_background {
            return Ok(Self::new());
        }

        let spinner = ProgressManager::spinner("Loading background removal model...");
        let loaded = background::load(model_path);
        spinner.finish_and_clear();
        Ok(Self::with_remover(loaded?))
    }

    /// Apply the item's action.
    ///
    /// # Errors
    /// Any per-file failure (decode, encode, copy, background removal).
    pub fn apply(
        &mut self,
        item: &WorkItem,
        config: &ConversionConfig,
        reporter: &mut dyn Reporter,
    ) -> Result<ActionOutcome> {
        if item.action == WorkAction::Copy && is_same_file(&item.input_path, &item.output_path) {
            debug!("{} is its own destination, nothing to copy", item.input_path.display());
            return Ok(ActionOutcome::Copied);
        }

        if item.output_path.exists()
            && !config.force
            && !reporter.confirm_overwrite(&item.output_path)
        {
            info!("Skipped existing output: {}", item.output_path.display());
            return Ok(ActionOutcome::Skipped);
        }

        if let Some(parent) = item.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match (item.action, config.mode) {
            (WorkAction::Copy, _) => self.copy(item),
            (WorkAction::Convert, OperationMode::ConvertToWebp) => {
                self.convert_to_webp(item, config, reporter)
            }
            (WorkAction::Convert, OperationMode::ResizeOnly) => self.resave(item),
        }
    }

    fn copy(&self, item: &WorkItem) -> Result<ActionOutcome> {
        std::fs::copy(&item.input_path, &item.output_path).map_err(|source| ConvertError::Copy {
            from: item.input_path.clone(),
            to: item.output_path.clone(),
            source,
        })?;
        debug!("Copied {} -> {}", item.input_path.display(), item.output_path.display());
        Ok(ActionOutcome::Copied)
    }

    fn convert_to_webp(
        &mut self,
        item: &WorkItem,
        config: &ConversionConfig,
        reporter: &mut dyn Reporter,
    ) -> Result<ActionOutcome> {
        let original_size = FileManager::file_size(&item.input_path);
        let mut rgba = ImageProcessor::to_rgba(&ImageProcessor::decode(&item.input_path)?);

        if config.remove_background {
            if ImageProcessor::has_transparency(&rgba) {
                reporter.notice(
                    "Background Removal",
                    "Image already has transparency. Skipping background removal.",
                );
            } else {
                let remover = self.remover.as_mut().ok_or_else(|| {
                    ConvertError::BackgroundRemoval("no background remover is configured".to_string())
                })?;
                rgba = remover.remove_background(&rgba)?;
            }
        }

        let new_size =
            ImageProcessor::encode_webp(&rgba, &item.output_path, config.quality, config.lossless)?;

        Ok(ActionOutcome::Converted(ConversionStats {
            original_size,
            new_size,
            quality: config.quality,
            lossless: config.lossless,
        }))
    }

    fn resave(&self, item: &WorkItem) -> Result<ActionOutcome> {
        let image = ImageProcessor::decode(&item.input_path)?;
        let format = ImageProcessor::format_from_path(&item.output_path)?;
        let duplicate = image.clone();
        ImageProcessor::save_in_original_format(&duplicate, &item.output_path, format)?;
        Ok(ActionOutcome::Resaved)
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
