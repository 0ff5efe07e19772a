//! # WebP Converter - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing` (su stderr)
//! - Senza argomenti avvia la modalità interattiva
//! - Con un sottocomando esegue la conversione in modo scriptabile
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI
//! 2. Configura il logging (WARN, o DEBUG con `--verbose`)
//! 3. Costruisce e valida la `ConversionConfig`
//! 4. Sceglie il reporter (console o JSON) e avvia il batch
//! 5. Exit code 1 se un input manca o una conversione fallisce
//!
//! Gli errori che interrompono il comando diventano un evento `error` in
//! modalità JSON; i fallimenti dei singoli file sono già riportati dal
//! reporter e producono solo l'exit code.
//!
//! ## Esempio di utilizzo:
//! ```bash
//! webp-converter convert photo.jpg --quality 90
//! webp-converter batch photos/ logo.png --output-dir out --json
//! webp-converter logo logos/ normalised/ --size 256 --padding 8
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

use webp_converter::converter::{BatchRunner, PathResolver};
use webp_converter::json_output::JsonMessage;
use webp_converter::transform::{process_all_logos, LogoOptions};
use webp_converter::{
    convert_inputs, interactive, platform, ConsoleReporter, ConversionAction, ConversionConfig,
    ConvertError, JsonReporter, OperationMode, Reporter,
};

#[derive(Parser)]
#[command(name = "webp-converter", version)]
#[command(about = "Convert images to WebP, in batch or interactively")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit one JSON object per event on stdout instead of the console UI
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a single image
    Convert {
        /// Image to convert
        input: PathBuf,

        /// Output file (default: <input-stem>.webp beside the input)
        output: Option<PathBuf>,

        #[command(flatten)]
        encode: EncodeOptions,
    },

    /// Convert files and folders into an output directory
    Batch {
        /// Image files and/or folders
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (default: the Downloads folder)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Operation mode
        #[arg(long, value_enum, default_value_t = OperationMode::ConvertToWebp)]
        mode: OperationMode,

        #[command(flatten)]
        encode: EncodeOptions,
    },

    /// Resize logos to a common size with transparent padding (PNG output)
    Logo {
        /// Folder with the original logos (not recursive)
        input_dir: PathBuf,

        /// Folder for the normalised PNGs
        output_dir: PathBuf,

        /// Side of the square each logo is fitted into
        #[arg(long, default_value_t = 300)]
        size: u32,

        /// Transparent padding around the logo
        #[arg(long, default_value_t = 10)]
        padding: u32,
    },

    /// Show information about the tool
    Info,
}

#[derive(clap::Args)]
struct EncodeOptions {
    /// WebP quality (0-100)
    #[arg(short, long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,

    /// Lossless WebP (may increase file size)
    #[arg(long)]
    lossless: bool,

    /// Overwrite existing outputs without asking
    #[arg(short, long)]
    force: bool,

    /// Remove the background of opaque images (needs the `onnx` feature)
    #[arg(long)]
    remove_bg: bool,

    /// Path to the U²-Net ONNX model
    #[arg(long)]
    bg_model: Option<PathBuf>,
}

impl EncodeOptions {
    fn config(&self, mode: OperationMode) -> ConversionConfig {
        ConversionConfig {
            quality: self.quality,
            lossless: self.lossless,
            force: self.force,
            remove_background: self.remove_bg,
            mode,
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let json = args.json;
    let outcome = match args.command {
        None => interactive::run().map(|()| ExitCode::SUCCESS),
        Some(command) => run_command(command, json),
    };

    if let Err(e) = &outcome {
        if json {
            match e.downcast_ref::<ConvertError>() {
                Some(convert_error) => JsonMessage::from_error(convert_error).emit(),
                None => JsonMessage::error(e.to_string(), None).emit(),
            }
        }
    }
    outcome
}

fn run_command(command: Command, json: bool) -> Result<ExitCode> {
    match command {
        Command::Convert {
            input,
            output,
            encode,
        } => {
            let config = encode.config(OperationMode::ConvertToWebp);
            config.validate()?;

            let item = PathResolver::resolve_single(&input, output.as_deref())?;
            debug!("Single conversion: {:?}", item);

            let action = ConversionAction::for_config(&config, encode.bg_model.as_deref())?;
            let mut reporter = reporter_for(json, &config);
            let result = BatchRunner::new(action, &mut *reporter).run(&[item], &config);

            if !result.is_success() {
                error!("Conversion failed: {}", input.display());
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Batch {
            inputs,
            output_dir,
            mode,
            encode,
        } => {
            let config = encode.config(mode);
            config.validate()?;

            let output_dir = output_dir.unwrap_or_else(platform::downloads_dir);
            info!("Output directory: {}", output_dir.display());

            let action = ConversionAction::for_config(&config, encode.bg_model.as_deref())?;
            let mut reporter = reporter_for(json, &config);
            let result = convert_inputs(&inputs, &output_dir, &config, action, &mut *reporter)?;

            if !result.is_success() {
                error!("{} of {} images failed", result.failed, result.total);
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Logo {
            input_dir,
            output_dir,
            size,
            padding,
        } => {
            let options = LogoOptions {
                target_size: size,
                padding,
            };
            let written = process_all_logos(&input_dir, &output_dir, &options)?;

            if json {
                JsonMessage::notice(
                    "Logos",
                    &format!("{} logos written to {}", written.len(), output_dir.display()),
                )
                .emit();
            } else {
                println!("✅ {} logos written to {}", written.len(), output_dir.display());
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Info => {
            interactive::show_info();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn reporter_for(json: bool, config: &ConversionConfig) -> Box<dyn Reporter> {
    if json {
        Box::new(JsonReporter::new(config))
    } else {
        Box::new(ConsoleReporter::new())
    }
}
