//! Handler für Spaltenbreiten des Verzerrungsprofils.

use crate::app::PherogramState;

/// Setzt die einheitliche Spaltenbreite.
pub fn set_default_token_width(state: &mut PherogramState, width: f64) -> anyhow::Result<()> {
    anyhow::ensure!(width > 0.0, "Spaltenbreite muss positiv sein: {}", width);
    state.set_default_token_width(width);
    Ok(())
}

/// Überschreibt die Breite einer Spalte.
pub fn set_column_width(state: &mut PherogramState, column: usize, width: f64) -> anyhow::Result<()> {
    anyhow::ensure!(width > 0.0, "Spaltenbreite muss positiv sein: {}", width);
    state.set_column_width(column, width);
    Ok(())
}
