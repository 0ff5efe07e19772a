//! # Interactive Mode
//!
//! Menu principale e wizard di conversione basati su `dialoguer`.
//!
//! ## Flusso del wizard:
//! 1. Input (file o cartelle separati da virgola)
//! 2. Directory di output (default: Downloads)
//! 3. Modalità operativa
//! 4. Compressione WebP (Lossy / Lossless) e qualità, solo per la conversione
//! 5. Sovrascrittura senza conferma
//! 6. Rimozione sfondo, solo per la conversione
//!
//! Tutti gli input vengono validati prima di toccare qualsiasi file.

use crate::background;
use crate::config::{parse_quality, ConversionConfig, OperationMode, DEFAULT_QUALITY};
use crate::converter::{convert_inputs, ConversionAction};
use crate::platform;
use crate::reporter::ConsoleReporter;
use crate::utils::{parse_input_list, unquote};
use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;
use tracing::debug;

const MENU_ITEMS: &[&str] = &["Convert images", "Show information", "Exit"];
const COMPRESSION_ITEMS: &[&str] = &[
    "Lossy (smaller files, recommended)",
    "Lossless (may increase file size)",
];
const MODES: [OperationMode; 2] = [OperationMode::ConvertToWebp, OperationMode::ResizeOnly];

/// Run the menu loop until the user exits
pub fn run() -> Result<()> {
    show_welcome();

    loop {
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match choice {
            Some(0) => convert_images_workflow()?,
            Some(1) => show_info(),
            _ => {
                println!("👋 Goodbye!");
                return Ok(());
            }
        }
    }
}

fn show_welcome() {
    println!(
        "{}",
        [
            "+----------------------------------------+",
            "|            🌎 WebP Converter            |",
            "+----------------------------------------+",
            "Convert images to WebP with style!",
            "",
            "Quick Start:",
            "1. Choose 'Convert images'",
            "2. Select files/folders",
            "3. Set output options",
            "4. Enjoy your WebPs!",
            "",
            "Navigation: ↑/↓ to move, Enter to select, Esc to go back",
        ]
        .join("\n")
    );
}

/// Print the information screen
pub fn show_info() {
    let removal = if background::is_available() {
        "available (ONNX U²-Net)"
    } else {
        "not compiled in (build with --features onnx)"
    };

    println!(
        "ℹ️  About WebP Converter\n\n\
         A command-line tool to convert images to WebP format.\n\n\
         Features:\n\
         • Batch/folder conversion preserving directory structure\n\
         • Lossy or lossless WebP with adjustable quality\n\
         • Re-save in the original format\n\
         • AI background removal\n\
         • Logo normalisation with transparent padding\n\n\
         Supported input: PNG, JPEG, GIF, BMP, TIFF, ICO, TGA, PNM (WebP is copied)\n\
         Background removal: {}\n\
         Platform: {}",
        removal,
        platform::system_info()
    );
}

fn convert_images_workflow() -> Result<()> {
    let raw: String = Input::new()
        .with_prompt("Enter input image file(s) or a folder path (comma-separated for multiple files)")
        .allow_empty(true)
        .interact_text()?;

    let inputs = parse_input_list(&raw);
    if inputs.is_empty() {
        println!("⚠️  No input given.");
        return Ok(());
    }
    if inputs.iter().any(|input| !input.exists()) {
        println!("❌ One or more input paths do not exist.");
        return Ok(());
    }

    let output_dir = prompt_output_dir()?;
    let config = prompt_conversion_options()?;
    debug!("Wizard configuration: {:?}", config);

    let action = match ConversionAction::for_config(&config, None) {
        Ok(action) => action,
        Err(e) => {
            println!("❌ {}", e);
            return Ok(());
        }
    };

    let mut reporter = ConsoleReporter::new();
    if let Err(e) = convert_inputs(&inputs, &output_dir, &config, action, &mut reporter) {
        println!("❌ {}", e);
    }
    Ok(())
}

fn prompt_output_dir() -> Result<PathBuf> {
    let default_dir = platform::downloads_dir();
    let raw: String = Input::new()
        .with_prompt("Enter output directory for all files")
        .default(default_dir.display().to_string())
        .interact_text()?;

    let trimmed = unquote(&raw);
    Ok(if trimmed.is_empty() {
        default_dir
    } else {
        PathBuf::from(trimmed)
    })
}

fn prompt_conversion_options() -> Result<ConversionConfig> {
    let labels: Vec<&str> = MODES.iter().map(|mode| mode.label()).collect();
    let mode_index = Select::new()
        .with_prompt("Choose operation mode")
        .items(&labels)
        .default(0)
        .interact()?;
    let mode = MODES[mode_index];

    let (lossless, quality) = if mode == OperationMode::ConvertToWebp {
        let compression = Select::new()
            .with_prompt("WebP compression mode (smaller files = Lossy, may increase size = Lossless)")
            .items(COMPRESSION_ITEMS)
            .default(0)
            .interact()?;

        let quality: String = Input::new()
            .with_prompt("WebP quality (0-100)")
            .default(DEFAULT_QUALITY.to_string())
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                parse_quality(input).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()?;

        (compression == 1, parse_quality(&quality)?)
    } else {
        (false, DEFAULT_QUALITY)
    };

    let force = Confirm::new()
        .with_prompt("Overwrite output file(s) without prompting?")
        .default(false)
        .interact()?;

    let remove_background = mode == OperationMode::ConvertToWebp
        && Confirm::new()
            .with_prompt("Remove background from images? (uses AI)")
            .default(false)
            .interact()?;

    let config = ConversionConfig {
        quality,
        lossless,
        force,
        remove_background,
        mode,
    };
    config.validate()?;
    Ok(config)
}
