//! Fehlertypen der Koordinaten-Engine.

use thiserror::Error;

/// Fehler bei Ledger-Mutationen und Relationsabfragen.
///
/// `OutOfRange` und `Gap` sind keine Fehler, sondern normale
/// Ergebniswerte in [`Relation`](super::Relation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Index liegt außerhalb der Trace (Programmierfehler des Aufrufers)
    #[error("Ungueltiger Trace-Index {index} (Trace-Laenge {trace_length})")]
    InvalidIndex { index: usize, trace_length: usize },
    /// Mutation würde den Ledger inkonsistent machen; der Ledger bleibt unverändert
    #[error("Ungueltige Verschiebung an Anker {anchor}: {reason}")]
    InvalidShift { anchor: usize, reason: &'static str },
    /// Ledger und Cut-Fenster beziehen sich auf unterschiedliche Traces
    #[error("Trace-Laenge passt nicht: Ledger {ledger}, Fenster {window}")]
    TraceLengthMismatch { ledger: usize, window: usize },
}

impl MappingError {
    pub(crate) fn invalid_shift(anchor: usize, reason: &'static str) -> Self {
        Self::InvalidShift { anchor, reason }
    }
}
