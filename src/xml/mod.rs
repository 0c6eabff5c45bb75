//! XML Import/Export des Pherogramm-Metadatenblocks.
//!
//! Gespeichert werden Cut-Positionen, die erste Sequenzposition und die
//! Liste der Verschiebungen mit ihren Lückenmustern.

pub mod metadata;
pub mod parser;
pub mod writer;

pub use metadata::{PherogramMetadata, ShiftRecord};
pub use parser::parse_pherogram_metadata;
pub use writer::write_pherogram_metadata;

use anyhow::{Context, Result};
use std::path::Path;

/// Liest einen Metadatenblock aus einer Datei.
pub fn load_metadata_file(path: &Path) -> Result<PherogramMetadata> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Metadaten nicht lesbar: {}", path.display()))?;
    let metadata = parse_pherogram_metadata(&content)
        .with_context(|| format!("Metadaten fehlerhaft: {}", path.display()))?;
    log::info!(
        "Metadaten geladen: {} Verschiebungen, Fenster {}..{}",
        metadata.shifts.len(),
        metadata.left,
        metadata.right
    );
    Ok(metadata)
}

/// Schreibt einen Metadatenblock in eine Datei.
pub fn save_metadata_file(path: &Path, metadata: &PherogramMetadata) -> Result<()> {
    std::fs::write(path, write_pherogram_metadata(metadata))
        .with_context(|| format!("Metadaten nicht schreibbar: {}", path.display()))?;
    log::info!("Metadaten gespeichert nach: {}", path.display());
    Ok(())
}
