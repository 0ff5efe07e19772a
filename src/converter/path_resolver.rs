//! # Path Resolution Module
//!
//! Centralizza il calcolo della lista di lavoro e dei path di output.
//!
//! ## Responsabilità:
//! - Verifica che TUTTI gli input esistano prima di qualsiasi conversione
//! - Espande le directory ricorsivamente, mantenendo la struttura relativa
//! - Decide per ogni file l'azione (`Convert` / `Copy`) una sola volta
//! - Calcola il path di output per la modalità single-shot
//!
//! ## Esempio di mapping:
//! ```text
//! Input:  photos/            (directory)
//!         photos/a.png
//!         photos/sub/b.webp
//! Output: out/a.webp         (Convert)
//!         out/sub/b.webp     (Copy)
//! ```

use crate::config::OperationMode;
use crate::error::{ConvertError, Result};
use crate::file_manager::{FileAction, FileManager};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Effect to apply to a resolved file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkAction {
    Convert,
    Copy,
}

/// One resolved unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItem {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub action: WorkAction,
}

/// Utility per calcolare la lista di lavoro in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Expand `inputs` into work items rooted at `output_dir`.
    ///
    /// Fails with `InputNotFound` on the first missing input, before
    /// anything else is resolved. Directory contents come in walk order,
    /// top-level inputs in the order given.
    pub fn resolve(
        inputs: &[PathBuf],
        output_dir: &Path,
        mode: OperationMode,
    ) -> Result<Vec<WorkItem>> {
        if let Some(missing) = inputs.iter().find(|input| !input.exists()) {
            return Err(ConvertError::InputNotFound(missing.clone()));
        }

        let mut items = Vec::new();
        for input in inputs {
            if input.is_dir() {
                for file in FileManager::find_image_files(input) {
                    let relative = match file.strip_prefix(input) {
                        Ok(rel) => rel.to_path_buf(),
                        Err(_) => PathBuf::from(file.file_name().unwrap_or_default()),
                    };
                    let action = Self::action_for(&file);
                    let output_path = Self::output_name(&output_dir.join(relative), action, mode);
                    items.push(WorkItem {
                        input_path: file,
                        output_path,
                        action,
                    });
                }
            } else {
                let file_name = input
                    .file_name()
                    .ok_or_else(|| ConvertError::InputNotFound(input.clone()))?;
                let action = Self::action_for(input);
                let output_path = Self::output_name(&output_dir.join(file_name), action, mode);
                items.push(WorkItem {
                    input_path: input.clone(),
                    output_path,
                    action,
                });
            }
        }

        debug!("Resolved {} work items under {}", items.len(), output_dir.display());
        Ok(items)
    }

    /// Resolve the single-shot `convert <input> [output]` form.
    ///
    /// Without an explicit output the result lands beside the input as
    /// `<stem>.webp`.
    pub fn resolve_single(input: &Path, output: Option<&Path>) -> Result<WorkItem> {
        if input.is_dir() {
            return Err(ConvertError::InvalidConfig(format!(
                "convert takes a single file, use `batch` for folders: {}",
                input.display()
            )));
        }
        if !input.is_file() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }

        let action = Self::action_for(input);
        let output_path = match output {
            Some(path) => path.to_path_buf(),
            None => Self::output_name(input, WorkAction::Convert, OperationMode::ConvertToWebp),
        };

        Ok(WorkItem {
            input_path: input.to_path_buf(),
            output_path,
            action,
        })
    }

    /// Explicitly named files are never dropped: unknown extensions are
    /// attempted as conversions and fail at decode time.
    fn action_for(path: &Path) -> WorkAction {
        match FileManager::classify(path) {
            FileAction::Copy => WorkAction::Copy,
            FileAction::Convert | FileAction::Unsupported => WorkAction::Convert,
        }
    }

    fn output_name(candidate: &Path, action: WorkAction, mode: OperationMode) -> PathBuf {
        match (action, mode) {
            (WorkAction::Convert, OperationMode::ConvertToWebp) => candidate.with_extension("webp"),
            _ => candidate.to_path_buf(),
        }
    }
}
