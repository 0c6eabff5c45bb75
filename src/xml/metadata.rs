//! Persistenzform der Anbindung: Cut-Positionen, Startspalte und Verschiebungen.

use crate::core::{CutWindow, GapPattern, MappingError, ShiftLedger};

/// Eine gespeicherte Verschiebung samt optionalem Lückenmuster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRecord {
    pub anchor: usize,
    pub delta: i64,
    pub gaps: Option<GapPattern>,
}

/// Metadatenblock einer angehängten Trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PherogramMetadata {
    pub trace_length: usize,
    pub left: usize,
    pub right: usize,
    pub first_seq_pos: usize,
    /// Aufsteigend nach Anker
    pub shifts: Vec<ShiftRecord>,
}

impl PherogramMetadata {
    /// Erfasst den aktuellen Stand von Ledger und Fenster.
    pub fn capture(ledger: &ShiftLedger, window: &CutWindow) -> Self {
        Self {
            trace_length: window.trace_length(),
            left: window.left(),
            right: window.right(),
            first_seq_pos: window.first_seq_pos(),
            shifts: ledger
                .iter_with_patterns()
                .map(|(event, gaps)| ShiftRecord {
                    anchor: event.anchor,
                    delta: event.delta,
                    gaps: gaps.cloned(),
                })
                .collect(),
        }
    }

    /// Baut Ledger und Fenster; ungültige Verschiebungen oder Grenzen schlagen fehl.
    pub fn to_parts(&self) -> Result<(ShiftLedger, CutWindow), MappingError> {
        let mut ledger = ShiftLedger::new(self.trace_length);
        for record in &self.shifts {
            ledger.add_or_merge_shift(record.anchor, record.delta)?;
            if let Some(gaps) = &record.gaps {
                ledger.set_gap_pattern(record.anchor, gaps.clone())?;
            }
        }
        let window =
            CutWindow::with_bounds(self.trace_length, self.left, self.right, self.first_seq_pos)?;
        Ok((ledger, window))
    }
}
