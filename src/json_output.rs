//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON (una riga per evento)
//! per l'integrazione con script e altri processi.
//!
//! ## Responsabilità:
//! - Emette messaggi JSON strutturati per eventi di conversione su stdout
//! - Riutilizza le strutture `WorkItem`, `ActionOutcome` e `BatchResult`
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch (numero di file, configurazione)
//! - `file_complete`: Fine elaborazione di un file (esito o errore)
//! - `notice`: Avviso informativo (es. sfondo già trasparente)
//! - `complete`: Fine del batch con statistiche finali
//! - `error`: Errore che interrompe il comando (`fatal` distingue gli errori
//!   di setup da quelli di un singolo file)

use crate::config::ConversionConfig;
use crate::converter::{ActionOutcome, BatchResult, WorkAction, WorkItem};
use crate::error::{ConvertError, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio del batch
    #[serde(rename = "start")]
    Start {
        total_files: usize,
        config: ConversionConfig,
    },

    /// Fine elaborazione di un file specifico
    #[serde(rename = "file_complete")]
    FileComplete {
        input_path: PathBuf,
        output_path: PathBuf,
        action: WorkAction,
        outcome: Option<ActionOutcome>,
        error: Option<String>,
    },

    /// Avviso non bloccante
    #[serde(rename = "notice")]
    Notice { title: String, message: String },

    /// Batch completato
    #[serde(rename = "complete")]
    Complete {
        #[serde(flatten)]
        result: BatchResult,
        average_reduction: f64,
    },

    /// Errore che ha interrotto il comando
    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
        fatal: bool,
    },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di inizio
    pub fn start(total_files: usize, config: &ConversionConfig) -> Self {
        Self::Start {
            total_files,
            config: config.clone(),
        }
    }

    /// Crea un messaggio di completamento file
    pub fn file_complete(item: &WorkItem, outcome: &Result<ActionOutcome>) -> Self {
        let (outcome, error) = match outcome {
            Ok(outcome) => (Some(*outcome), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self::FileComplete {
            input_path: item.input_path.clone(),
            output_path: item.output_path.clone(),
            action: item.action,
            outcome,
            error,
        }
    }

    /// Crea un avviso
    pub fn notice(title: &str, message: &str) -> Self {
        Self::Notice {
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    /// Crea un messaggio di completamento generale
    pub fn complete(result: &BatchResult) -> Self {
        Self::Complete {
            result: result.clone(),
            average_reduction: result.overall_reduction_percent(),
        }
    }

    /// Crea un messaggio di errore fatale
    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error {
            message,
            details,
            fatal: true,
        }
    }

    /// Errore a partire da un `ConvertError`, marcato fatale solo se lo è
    pub fn from_error(err: &ConvertError) -> Self {
        Self::Error {
            message: err.to_string(),
            details: std::error::Error::source(err).map(|source| source.to_string()),
            fatal: err.is_fatal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OperationMode;
    use crate::converter::ConversionStats;
    use serde_json::Value;

    fn item() -> WorkItem {
        WorkItem {
            input_path: PathBuf::from("in/a.png"),
            output_path: PathBuf::from("out/a.webp"),
            action: WorkAction::Convert,
        }
    }

    #[test]
    fn test_file_complete_success_shape() {
        let outcome = Ok(ActionOutcome::Converted(ConversionStats {
            original_size: 1000,
            new_size: 400,
            quality: 80,
            lossless: false,
        }));
        let json = serde_json::to_value(JsonMessage::file_complete(&item(), &outcome)).unwrap();

        assert_eq!(json["type"], "file_complete");
        assert_eq!(json["action"], "convert");
        assert_eq!(json["outcome"]["outcome"], "converted");
        assert_eq!(json["outcome"]["new_size"], 400);
        assert_eq!(json["error"], Value::Null);
    }

    #[test]
    fn test_file_complete_failure_shape() {
        let outcome = Err(ConvertError::UnidentifiedFormat(PathBuf::from("in/a.png")));
        let json = serde_json::to_value(JsonMessage::file_complete(&item(), &outcome)).unwrap();

        assert_eq!(json["outcome"], Value::Null);
        assert!(json["error"].as_str().unwrap().contains("Cannot identify"));
    }

    #[test]
    fn test_complete_flattens_result() {
        let result = BatchResult {
            total: 3,
            succeeded: 2,
            failed: 1,
            converted: 2,
            copied: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(JsonMessage::complete(&result)).unwrap();

        assert_eq!(json["type"], "complete");
        assert_eq!(json["total"], 3);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["average_reduction"], 0.0);
    }

    #[test]
    fn test_start_embeds_config() {
        let config = ConversionConfig {
            mode: OperationMode::ResizeOnly,
            ..Default::default()
        };
        let json = serde_json::to_value(JsonMessage::start(4, &config)).unwrap();

        assert_eq!(json["type"], "start");
        assert_eq!(json["total_files"], 4);
        assert_eq!(json["config"]["quality"], 80);
        assert_eq!(json["config"]["mode"], "resize_only");
    }

    #[test]
    fn test_error_carries_fatal_flag() {
        let missing = ConvertError::InputNotFound(PathBuf::from("photos"));
        let json = serde_json::to_value(JsonMessage::from_error(&missing)).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["fatal"], true);
        assert_eq!(json["details"], Value::Null);

        let copy = ConvertError::Copy {
            from: PathBuf::from("a.webp"),
            to: PathBuf::from("out/a.webp"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let json = serde_json::to_value(JsonMessage::from_error(&copy)).unwrap();
        assert_eq!(json["fatal"], false);
        assert_eq!(json["details"], "denied");
    }
}
