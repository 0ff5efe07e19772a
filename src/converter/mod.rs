//! # Converter Module
//!
//! Modulo che separa le responsabilità della conversione batch in sottomoduli:
//! - `path_resolver`: Espansione degli input e calcolo dei path di output
//! - `conversion_action`: Effetto su un singolo file (copy / convert / re-save)
//! - `batch_runner`: Orchestratore sequenziale e aggregazione dei risultati

pub mod batch_runner;
pub mod conversion_action;
pub mod path_resolver;

pub use batch_runner::{convert_inputs, BatchResult, BatchRunner, FailedItem};
pub use conversion_action::{ActionOutcome, ConversionAction, ConversionStats};
pub use path_resolver::{PathResolver, WorkAction, WorkItem};
