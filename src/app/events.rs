//! PherogramCommand- und PherogramEvent-Enums für den Command/Event-Datenfluss.

use super::editable::RowId;
use super::sync::SyncOutcome;
use crate::core::{CutChange, CutSide, GapPattern};
use std::ops::Range;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum PherogramCommand {
    /// Verschiebung hinzufügen oder mit bestehender am Anker zusammenführen
    AddOrMergeShift { anchor: usize, delta: i64 },
    /// Lückenmuster an eine Einfügung hängen
    SetGapPattern { anchor: usize, pattern: GapPattern },
    /// Verschiebung an einem Anker entfernen
    RemoveShift { anchor: usize },
    /// Alle Verschiebungen entfernen
    ClearShifts,
    /// Linke Cut-Position setzen
    SetLeftCut { position: usize },
    /// Rechte Cut-Position setzen
    SetRightCut { position: usize },
    /// Anbindung horizontal verschieben
    SetFirstSeqPos { position: usize },
    /// Automatische Synchronisation ein-/ausschalten
    SetAutoSync { enabled: bool },
    /// Trace an eine Alignment-Zeile binden
    AttachRow { row: RowId },
    /// Bindung an die Alignment-Zeile lösen
    DetachRow,
    /// Sichtbare Base-Calls manuell neu in die Zeile schreiben
    ReconcileVisibleRange,
    /// Einheitliche Spaltenbreite setzen
    SetDefaultTokenWidth { width: f64 },
    /// Breite einer einzelnen Spalte überschreiben
    SetColumnWidth { column: usize, width: f64 },
}

/// Benachrichtigungen an den Host, in Ausführungsreihenfolge.
#[derive(Debug, Clone, PartialEq)]
pub enum PherogramEvent {
    /// Ledger wurde geändert
    ShiftsChanged { version: u64 },
    /// Eine Cut-Position hat sich bewegt
    CutChanged(CutChange),
    /// Ergebnis der Synchronisation einer Cut-Änderung
    Synced { side: CutSide, outcome: SyncOutcome },
    /// Sichtbarer Spaltenbereich nach abgeschlossener Synchronisation
    Resized { visible_columns: Range<usize> },
    /// Caches wurden neu berechnet
    Recomputed { ledger_version: u64 },
}
