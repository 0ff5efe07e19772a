//! # Reporter Module
//!
//! Tutta l'interazione con l'utente passa da qui: il core non stampa mai
//! direttamente e non legge mai da stdin.
//!
//! ## Responsabilità:
//! - Definisce il trait `Reporter` passato esplicitamente a `BatchRunner`
//! - `ConsoleReporter`: progress bar `indicatif`, prompt `dialoguer`, riepiloghi
//! - `JsonReporter`: una riga JSON per evento su stdout, mai interattivo
//!
//! ## Eventi:
//! - `confirm_overwrite`: l'output esiste già, sovrascrivere?
//! - `notice`: avviso non bloccante
//! - `batch_started` / `item_finished` / `summary`: batch con più file
//! - `single_result`: esito dell'unico file di un batch
//! - `nothing_to_do`: nessuna immagine trovata

use crate::config::ConversionConfig;
use crate::converter::{ActionOutcome, BatchResult, ConversionStats, WorkItem};
use crate::error::Result;
use crate::file_manager::FileManager;
use crate::json_output::JsonMessage;
use crate::progress::ProgressManager;
use dialoguer::Confirm;
use std::path::Path;
use tracing::warn;

/// Interaction gateway used by the conversion core
pub trait Reporter {
    /// Ask whether an existing output may be overwritten
    fn confirm_overwrite(&mut self, path: &Path) -> bool;

    /// Informational message that does not affect the outcome
    fn notice(&mut self, title: &str, message: &str);

    /// A batch of `total` items (more than one) is about to run
    fn batch_started(&mut self, total: usize);

    /// One item of a multi-item batch is done
    fn item_finished(&mut self, item: &WorkItem, outcome: &Result<ActionOutcome>);

    /// Result of a batch made of exactly one item
    fn single_result(&mut self, item: &WorkItem, outcome: &Result<ActionOutcome>);

    /// Aggregate result of a multi-item batch
    fn summary(&mut self, result: &BatchResult);

    /// The inputs resolved to no images at all
    fn nothing_to_do(&mut self);
}

/// Terminal reporter with progress bar and prompts
#[derive(Default)]
pub struct ConsoleReporter {
    progress: Option<ProgressManager>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&self, message: &str) {
        match &self.progress {
            Some(progress) => progress.println(message),
            None => println!("{}", message),
        }
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    fn success_table(item: &WorkItem, stats: &ConversionStats) -> String {
        let saved = stats.bytes_saved();
        let saved_text = if saved >= 0 {
            FileManager::format_size(saved as u64)
        } else {
            format!("-{}", FileManager::format_size(saved.unsigned_abs()))
        };
        let quality = if stats.lossless {
            "lossless".to_string()
        } else {
            format!("{}%", stats.quality)
        };

        [
            "✅ Conversion Successful!".to_string(),
            format!("  Original       {}", Self::file_name(&item.input_path)),
            format!("  WebP           {}", Self::file_name(&item.output_path)),
            format!("  Original Size  {}", FileManager::format_size(stats.original_size)),
            format!("  WebP Size      {}", FileManager::format_size(stats.new_size)),
            format!("  Saved          {} ({:.1}%)", saved_text, stats.reduction_percent()),
            format!("  Quality        {}", quality),
        ]
        .join("\n")
    }
}

impl Reporter for ConsoleReporter {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        let ask = || {
            println!("⚠️  Output file '{}' already exists.", Self::file_name(path));
            Confirm::new()
                .with_prompt("Overwrite this file?")
                .default(false)
                .interact()
                .unwrap_or_else(|e| {
                    warn!("Cannot ask for confirmation ({}), keeping existing file", e);
                    false
                })
        };

        match &self.progress {
            Some(progress) => progress.suspend(ask),
            None => ask(),
        }
    }

    fn notice(&mut self, title: &str, message: &str) {
        self.print(&format!("ℹ️  {}: {}", title, message));
    }

    fn batch_started(&mut self, total: usize) {
        self.progress = Some(ProgressManager::new(total as u64));
    }

    fn item_finished(&mut self, item: &WorkItem, outcome: &Result<ActionOutcome>) {
        let name = Self::file_name(&item.input_path);
        let message = match outcome {
            Ok(ActionOutcome::Converted(stats)) => {
                format!("✅ {}: {:.1}% saved", name, stats.reduction_percent())
            }
            Ok(ActionOutcome::Resaved) => format!("✅ {}: re-saved", name),
            Ok(ActionOutcome::Copied) => {
                self.print(&format!(
                    "Skipped (already WebP), copied to: {} → {}",
                    item.input_path.display(),
                    item.output_path.display()
                ));
                format!("📋 {}", name)
            }
            Ok(ActionOutcome::Skipped) => format!("⏭️  {}: kept existing output", name),
            Err(e) => {
                self.print(&format!("❌ {}: {}", name, e));
                format!("❌ {}", name)
            }
        };

        if let Some(progress) = &self.progress {
            progress.update(&message);
        }
    }

    fn single_result(&mut self, item: &WorkItem, outcome: &Result<ActionOutcome>) {
        match outcome {
            Ok(ActionOutcome::Converted(stats)) => println!("{}", Self::success_table(item, stats)),
            Ok(ActionOutcome::Resaved) => println!(
                "Resized: {} → {}",
                item.input_path.display(),
                item.output_path.display()
            ),
            Ok(ActionOutcome::Copied) => println!(
                "Copied: {} → {}",
                item.input_path.display(),
                item.output_path.display()
            ),
            Ok(ActionOutcome::Skipped) => println!("ℹ️  Conversion skipped by user."),
            Err(e) => eprintln!(
                "❌ Failed to convert: {}\nError: {}",
                item.input_path.display(),
                e
            ),
        }
    }

    fn summary(&mut self, result: &BatchResult) {
        if let Some(progress) = self.progress.take() {
            progress.finish("done");
        }

        let mut lines = vec![
            format!("Processed:            {}", result.total),
            format!("Succeeded:            {}", result.succeeded),
            format!("  Converted/re-saved: {}", result.converted),
            format!("  Copied (WebP):      {}", result.copied),
            format!("  Skipped (existing): {}", result.skipped),
            format!("Failed:               {}", result.failed),
        ];
        if result.bytes_before > 0 {
            lines.push(format!(
                "Total saved:          {} ({:.2}%)",
                FileManager::format_size(result.bytes_before.saturating_sub(result.bytes_after)),
                result.overall_reduction_percent()
            ));
        }
        if !result.failures.is_empty() {
            lines.push(String::new());
            lines.push("Failed files:".to_string());
            for failure in &result.failures {
                lines.push(format!("  {}: {}", Self::file_name(&failure.input_path), failure.error));
            }
        }

        let border = "+".to_string() + &"-".repeat(40) + "+";
        println!("{}", border);
        for line in lines {
            println!("| {}", line);
        }
        println!("{}", border);
    }

    fn nothing_to_do(&mut self) {
        println!("⚠️  No images found to process.");
    }
}

/// Machine-readable reporter: one JSON object per line on stdout.
///
/// Never prompts; an existing output is kept unless `force` is set.
pub struct JsonReporter {
    config: ConversionConfig,
}

impl JsonReporter {
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl Reporter for JsonReporter {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        JsonMessage::notice(
            "File Exists",
            &format!("{} already exists, use --force to overwrite", path.display()),
        )
        .emit();
        false
    }

    fn notice(&mut self, title: &str, message: &str) {
        JsonMessage::notice(title, message).emit();
    }

    fn batch_started(&mut self, total: usize) {
        JsonMessage::start(total, &self.config).emit();
    }

    fn item_finished(&mut self, item: &WorkItem, outcome: &Result<ActionOutcome>) {
        JsonMessage::file_complete(item, outcome).emit();
    }

    fn single_result(&mut self, item: &WorkItem, outcome: &Result<ActionOutcome>) {
        JsonMessage::file_complete(item, outcome).emit();
    }

    fn summary(&mut self, result: &BatchResult) {
        JsonMessage::complete(result).emit();
    }

    fn nothing_to_do(&mut self) {
        JsonMessage::notice("Nothing To Do", "No images found to process.").emit();
    }
}

#[cfg(test)]
pub(crate) mod mocks {
    use super::*;
    use std::path::PathBuf;

    /// Reporter that records every event and answers prompts with a fixed value
    pub struct RecordingReporter {
        pub overwrite_answer: bool,
        pub overwrite_prompts: Vec<PathBuf>,
        pub notices: Vec<(String, String)>,
        pub started: Option<usize>,
        pub finished: Vec<(PathBuf, bool)>,
        pub singles: Vec<(PathBuf, bool)>,
        pub summaries: Vec<BatchResult>,
        pub nothing_to_do: bool,
    }

    impl Default for RecordingReporter {
        fn default() -> Self {
            Self {
                overwrite_answer: true,
                overwrite_prompts: Vec::new(),
                notices: Vec::new(),
                started: None,
                finished: Vec::new(),
                singles: Vec::new(),
                summaries: Vec::new(),
                nothing_to_do: false,
            }
        }
    }

    impl RecordingReporter {
        pub fn declining() -> Self {
            Self {
                overwrite_answer: false,
                ..Default::default()
            }
        }
    }

    impl Reporter for RecordingReporter {
        fn confirm_overwrite(&mut self, path: &Path) -> bool {
            self.overwrite_prompts.push(path.to_path_buf());
            self.overwrite_answer
        }

        fn notice(&mut self, title: &str, message: &str) {
            self.notices.push((title.to_string(), message.to_string()));
        }

        fn batch_started(&mut self, total: usize) {
            self.started = Some(total);
        }

        fn item_finished(&mut self, item: &WorkItem, outcome: &Result<ActionOutcome>) {
            self.finished.push((item.input_path.clone(), outcome.is_ok()));
        }

        fn single_result(&mut self, item: &WorkItem, outcome: &Result<ActionOutcome>) {
            self.singles.push((item.input_path.clone(), outcome.is_ok()));
        }

        fn summary(&mut self, result: &BatchResult) {
            self.summaries.push(result.clone());
        }

        fn nothing_to_do(&mut self) {
            self.nothing_to_do = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::WorkAction;
    use std::path::PathBuf;

    #[test]
    fn test_success_table_contents() {
        let item = WorkItem {
            input_path: PathBuf::from("/tmp/in/photo.jpg"),
            output_path: PathBuf::from("/tmp/out/photo.webp"),
            action: WorkAction::Convert,
        };
        let stats = ConversionStats {
            original_size: 4096,
            new_size: 1024,
            quality: 75,
            lossless: false,
        };

        let table = ConsoleReporter::success_table(&item, &stats);
        assert!(table.contains("photo.jpg"));
        assert!(table.contains("photo.webp"));
        assert!(table.contains("4.00 KB"));
        assert!(table.contains("3.00 KB (75.0%)"));
        assert!(table.contains("75%"));
    }

    #[test]
    fn test_json_reporter_never_overwrites() {
        let mut reporter = JsonReporter::new(&ConversionConfig::default());
        assert!(!reporter.confirm_overwrite(Path::new("out/a.webp")));
    }
}
