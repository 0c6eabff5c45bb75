//! Zentrale Konfiguration der Pherogramm-Engine.
//!
//! `EngineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Synchronisation ─────────────────────────────────────────────────

/// Editierte Sequenz bei Cut-Änderungen automatisch nachführen.
pub const AUTO_SYNC: bool = true;
/// Kopierte Base-Calls in Großbuchstaben schreiben.
pub const UPPERCASE_COPIED_BASES: bool = true;
/// Darstellung des Gap-Tokens in der editierbaren Sequenz.
pub const GAP_REPRESENTATION: char = '-';

// ── Rendering ───────────────────────────────────────────────────────

/// Standard-Spaltenbreite in Pixeln.
pub const DEFAULT_TOKEN_WIDTH: f64 = 10.0;

// ── Protokoll ───────────────────────────────────────────────────────

/// Maximale Anzahl gespeicherter Commands im Command-Log.
pub const COMMAND_LOG_CAPACITY: usize = 1000;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Engine-Optionen.
/// Wird als `pherogram_align.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineOptions {
    /// Editierte Sequenz bei Cut-Änderungen automatisch nachführen
    pub auto_sync: bool,
    /// Kopierte Base-Calls in Großbuchstaben schreiben
    #[serde(default = "default_uppercase_copied_bases")]
    pub uppercase_copied_bases: bool,
    /// Darstellung des Gap-Tokens
    #[serde(default = "default_gap_representation")]
    pub gap_representation: char,
    /// Standard-Spaltenbreite in Pixeln
    pub default_token_width: f64,
    /// Kapazität des Command-Logs
    #[serde(default = "default_command_log_capacity")]
    pub command_log_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            auto_sync: AUTO_SYNC,
            uppercase_copied_bases: UPPERCASE_COPIED_BASES,
            gap_representation: GAP_REPRESENTATION,
            default_token_width: DEFAULT_TOKEN_WIDTH,
            command_log_capacity: COMMAND_LOG_CAPACITY,
        }
    }
}

/// Serde-Default für `uppercase_copied_bases` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_uppercase_copied_bases() -> bool {
    UPPERCASE_COPIED_BASES
}

/// Serde-Default für `gap_representation` (Abwärtskompatibilität).
fn default_gap_representation() -> char {
    GAP_REPRESENTATION
}

/// Serde-Default für `command_log_capacity` (Abwärtskompatibilität).
fn default_command_log_capacity() -> usize {
    COMMAND_LOG_CAPACITY
}

impl EngineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("pherogram_align"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("pherogram_align.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let opts: EngineOptions =
            toml::from_str("auto_sync = false\ndefault_token_width = 4.0\n").expect("gueltiges TOML");
        assert!(!opts.auto_sync);
        assert_eq!(opts.gap_representation, GAP_REPRESENTATION);
        assert_eq!(opts.command_log_capacity, COMMAND_LOG_CAPACITY);
        assert!(opts.uppercase_copied_bases);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis");
        let path = dir.path().join("pherogram_align.toml");
        let opts = EngineOptions {
            auto_sync: false,
            gap_representation: '.',
            ..EngineOptions::default()
        };
        opts.save_to_file(&path).expect("speicherbar");
        assert_eq!(EngineOptions::load_from_file(&path), opts);
    }

    #[test]
    fn test_broken_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis");
        let path = dir.path().join("kaputt.toml");
        std::fs::write(&path, "auto_sync = [").expect("schreibbar");
        assert_eq!(EngineOptions::load_from_file(&path), EngineOptions::default());
    }
}
