//! # WebP Converter Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione del batch e validazione parametri
//! - `error`: Tipi di errore custom (fatali vs per-file)
//! - `file_manager`: Classificazione dei file e discovery immagini
//! - `image_processor`: Decode / encode WebP / ri-salvataggio
//! - `background`: Trait per la rimozione sfondo (+ `u2net` con feature `onnx`)
//! - `converter`: PathResolver, ConversionAction, BatchRunner
//! - `reporter`: Interazione con l'utente (console o JSON)
//! - `transform`: Normalizzazione loghi con padding trasparente
//! - `interactive`: Menu e wizard
//!
//! ## Utilizzo:
//! ```ignore
//! use webp_converter::{convert_inputs, ConsoleReporter, ConversionAction, ConversionConfig};
//!
//! let config = ConversionConfig::default();
//! let mut reporter = ConsoleReporter::new();
//! let result = convert_inputs(&inputs, &output_dir, &config, ConversionAction::new(), &mut reporter)?;
//! ```

pub mod background;
pub mod config;
pub mod converter;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod interactive;
pub mod json_output;
pub mod platform;
pub mod progress;
pub mod reporter;
pub mod transform;
#[cfg(feature = "onnx")]
pub mod u2net;
pub mod utils;

pub use config::{ConversionConfig, OperationMode};
pub use converter::{convert_inputs, BatchResult, ConversionAction, PathResolver, WorkItem};
pub use error::{ConvertError, Result};
pub use reporter::{ConsoleReporter, JsonReporter, Reporter};
