//! # Batch Runner Module
//!
//! Orchestratore sequenziale del batch di conversione.
//!
//! ## Responsabilità:
//! - Itera la lista di lavoro un file alla volta, in ordine di risoluzione
//! - Invoca `ConversionAction` per ogni file e raccoglie gli esiti
//! - Un file fallito o saltato NON interrompe il batch
//! - Produce il `BatchResult` aggregato e lo passa al reporter
//!
//! ## Casi particolari:
//! - **Zero file**: il reporter riceve `nothing_to_do`, il loop non parte
//! - **Un file**: niente progress bar né riepilogo, solo `single_result`
//!
//! ## Invarianti del risultato:
//! - `total = converted + copied` (contati sulle azioni risolte)
//! - `succeeded + failed = total`
//! - i file saltati contano come `succeeded` e anche in `skipped`

use crate::config::ConversionConfig;
use crate::converter::conversion_action::{ActionOutcome, ConversionAction};
use crate::converter::path_resolver::{PathResolver, WorkAction, WorkItem};
use crate::error::{ConvertError, Result};
use crate::file_manager::FileManager;
use crate::reporter::Reporter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    pub input_path: PathBuf,
    pub error: String,
}

/// Aggregate outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub converted: usize,
    pub copied: usize,
    pub skipped: usize,
    pub failures: Vec<FailedItem>,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl BatchResult {
    /// Overall size reduction of the WebP conversions in this batch
    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.bytes_before, self.bytes_after)
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, item: &WorkItem, outcome: &Result<ActionOutcome>) {
        match outcome {
            Ok(ActionOutcome::Skipped) => {
                self.succeeded += 1;
                self.skipped += 1;
            }
            Ok(ActionOutcome::Converted(stats)) => {
                self.succeeded += 1;
                self.bytes_before += stats.original_size;
                self.bytes_after += stats.new_size;
            }
            Ok(_) => self.succeeded += 1,
            Err(e) => {
                warn!("Failed to process {}: {}", item.input_path.display(), e);
                self.failed += 1;
                self.failures.push(FailedItem {
                    input_path: item.input_path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Drives `ConversionAction` over a resolved work list
pub struct BatchRunner<'a> {
    action: ConversionAction,
    reporter: &'a mut dyn Reporter,
}

impl<'a> BatchRunner<'a> {
    pub fn new(action: ConversionAction, reporter: &'a mut dyn Reporter) -> Self {
        Self { action, reporter }
    }

    /// Process every item, one at a time, and report the aggregate
    pub fn run(&mut self, items: &[WorkItem], config: &ConversionConfig) -> BatchResult {
        let mut result = BatchResult::default();

        if items.is_empty() {
            info!("No images found to process");
            self.reporter.nothing_to_do();
            return result;
        }

        result.total = items.len();
        result.converted = items.iter().filter(|i| i.action == WorkAction::Convert).count();
        result.copied = items.iter().filter(|i| i.action == WorkAction::Copy).count();

        if let [item] = items {
            let outcome = self.action.apply(item, config, &mut *self.reporter);
            result.record(item, &outcome);
            self.reporter.single_result(item, &outcome);
            return result;
        }

        info!("Processing {} images", items.len());
        self.reporter.batch_started(items.len());

        for item in items {
            debug!("Processing {}", item.input_path.display());
            let outcome = self.action.apply(item, config, &mut *self.reporter);
            result.record(item, &outcome);
            self.reporter.item_finished(item, &outcome);
        }

        info!(
            "Batch complete: {} succeeded, {} failed, {} skipped",
            result.succeeded, result.failed, result.skipped
        );
        self.reporter.summary(&result);
        result
    }
}

/// Resolve `inputs`, create the output root and run the batch.
///
/// # Errors
/// Only the fatal ones: invalid configuration, a missing input or an
/// output root that cannot be created. Per-file failures are in the result.
pub fn convert_inputs(
    inputs: &[PathBuf],
    output_dir: &Path,
    config: &ConversionConfig,
    action: ConversionAction,
    reporter: &mut dyn Reporter,
) -> Result<BatchResult> {
    config.validate()?;
    let items = PathResolver::resolve(inputs, output_dir, config.mode)?;

    std::fs::create_dir_all(output_dir).map_err(|source| ConvertError::OutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    Ok(BatchRunner::new(action, reporter).run(&items, config))
}
