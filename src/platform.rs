//! # Platform-specific utilities
//!
//! Questo modulo centralizza la logica cross-platform: la directory
//! Downloads dell'utente (default per l'output) e le informazioni di sistema
//! mostrate nella schermata informativa.

use std::path::PathBuf;

/// The user's Downloads directory.
///
/// Uses the OS lookup (known folder API on Windows, XDG user dirs on Linux)
/// and falls back to `<home>/Downloads`.
pub fn downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Get system information for the info screen
pub fn system_info() -> SystemInfo {
    SystemInfo {
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        family: std::env::consts::FAMILY,
    }
}

/// System information structure
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
}

impl std::fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.os, self.arch, self.family)
    }
}
