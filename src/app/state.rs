//! Pherogramm-State: zentrale Datenhaltung einer angehängten Trace.
//!
//! Besitzt Ledger und Cut-Fenster, hält die Offset-Tabelle und das
//! Verzerrungsprofil als Caches und sammelt Events für den Host.

use super::editable::{EditableSequence, RowId};
use super::events::PherogramEvent;
use super::sync::{EditSynchronizer, NotAppliedReason, SyncOutcome};
use super::CommandLog;
use crate::core::{
    CoordinateMapper, CutChange, CutSide, CutWindow, DistortionProfile, GapPattern, MappingError,
    OffsetTable, Relation, ShiftEvent, ShiftLedger, TraceSource,
};
use crate::shared::EngineOptions;
use crate::xml::PherogramMetadata;
use anyhow::{ensure, Result};
use std::collections::BTreeMap;

/// Eine Cut-Änderung samt Ergebnis der Synchronisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutOutcome {
    pub change: CutChange,
    pub sync: SyncOutcome,
}

/// Spaltenbreiten für das Verzerrungsprofil.
#[derive(Debug, Clone)]
struct TokenWidths {
    default: f64,
    overrides: BTreeMap<usize, f64>,
    /// Wird bei jeder Änderung erhöht (Cache-Schlüssel)
    generation: u64,
}

impl TokenWidths {
    fn width(&self, column: usize) -> f64 {
        self.overrides.get(&column).copied().unwrap_or(self.default)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ProfileKey {
    ledger_version: u64,
    window: CutWindow,
    width_generation: u64,
}

#[derive(Debug, Clone)]
struct CachedProfile {
    key: ProfileKey,
    profile: DistortionProfile,
}

/// Zustand einer an eine Alignment-Zeile angehängten Trace.
pub struct PherogramState {
    trace: Box<dyn TraceSource>,
    ledger: ShiftLedger,
    window: CutWindow,
    auto_sync: bool,
    row: Option<RowId>,
    table: OffsetTable,
    widths: TokenWidths,
    distortion: Option<CachedProfile>,
    events: Vec<PherogramEvent>,
    batch_depth: usize,
    pending_recompute: bool,
    recompute_count: u64,
    profile_build_count: u64,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: EngineOptions,
}

impl PherogramState {
    /// Vollständig sichtbare Trace ohne Verschiebungen, ab Spalte 0, nicht angebunden.
    pub fn new(trace: impl TraceSource + 'static, options: EngineOptions) -> Self {
        let len = trace.sequence_length();
        let ledger = ShiftLedger::new(len);
        let table = OffsetTable::from_ledger(&ledger);
        Self {
            trace: Box::new(trace),
            ledger,
            window: CutWindow::new(len),
            auto_sync: options.auto_sync,
            row: None,
            table,
            widths: TokenWidths {
                default: options.default_token_width,
                overrides: BTreeMap::new(),
                generation: 0,
            },
            distortion: None,
            events: Vec::new(),
            batch_depth: 0,
            pending_recompute: false,
            recompute_count: 0,
            profile_build_count: 0,
            command_log: CommandLog::with_capacity(options.command_log_capacity),
            options,
        }
    }

    /// Erstellt den State aus geladenen Metadaten.
    pub fn from_parts(
        trace: impl TraceSource + 'static,
        ledger: ShiftLedger,
        window: CutWindow,
        options: EngineOptions,
    ) -> Result<Self> {
        ensure!(
            ledger.trace_length() == trace.sequence_length(),
            "Metadaten beschreiben {} Base-Calls, die Trace hat {}",
            ledger.trace_length(),
            trace.sequence_length()
        );
        if window.trace_length() != ledger.trace_length() {
            return Err(MappingError::TraceLengthMismatch {
                ledger: ledger.trace_length(),
                window: window.trace_length(),
            }
            .into());
        }
        let mut state = Self::new(trace, options);
        state.table = OffsetTable::from_ledger(&ledger);
        state.ledger = ledger;
        state.window = window;
        Ok(state)
    }

    /// Erstellt den State aus einem gelesenen Metadatenblock.
    pub fn from_metadata(
        trace: impl TraceSource + 'static,
        metadata: &PherogramMetadata,
        options: EngineOptions,
    ) -> Result<Self> {
        let (ledger, window) = metadata.to_parts()?;
        Self::from_parts(trace, ledger, window, options)
    }

    /// Aktueller Stand als speicherbarer Metadatenblock.
    pub fn metadata(&self) -> PherogramMetadata {
        PherogramMetadata::capture(&self.ledger, &self.window)
    }

    pub fn ledger(&self) -> &ShiftLedger {
        &self.ledger
    }

    pub fn window(&self) -> &CutWindow {
        &self.window
    }

    pub fn trace(&self) -> &dyn TraceSource {
        self.trace.as_ref()
    }

    pub fn row(&self) -> Option<RowId> {
        self.row
    }

    pub fn auto_sync(&self) -> bool {
        self.auto_sync
    }

    /// Anzahl der bisherigen Neuberechnungen (Cache-Refresh + `Recomputed`-Event).
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Anzahl tatsächlich neu gebauter Verzerrungsprofile.
    pub fn profile_build_count(&self) -> u64 {
        self.profile_build_count
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    // ── Abfragen ────────────────────────────────────────────────────

    /// Führt `f` mit einem Mapper über den aktuellen Ledger-Stand aus.
    ///
    /// Innerhalb eines Batches kann die gecachte Tabelle veraltet sein; dann
    /// wird eine temporäre Tabelle gebaut.
    pub fn with_mapper<R>(
        &self,
        f: impl FnOnce(&CoordinateMapper<'_>) -> R,
    ) -> Result<R, MappingError> {
        if self.table.is_current(&self.ledger) {
            let mapper = CoordinateMapper::new(&self.table, &self.window)?;
            Ok(f(&mapper))
        } else {
            let table = OffsetTable::from_ledger(&self.ledger);
            let mapper = CoordinateMapper::new(&table, &self.window)?;
            Ok(f(&mapper))
        }
    }

    pub fn to_alignment_index(&self, trace_index: usize) -> Result<Relation, MappingError> {
        self.with_mapper(|m| m.to_alignment_index(trace_index))
    }

    pub fn to_trace_index(&self, alignment_index: usize) -> Result<Relation, MappingError> {
        self.with_mapper(|m| m.to_trace_index(alignment_index))
    }

    /// Alle Verschiebungen in aufsteigender Anker-Reihenfolge.
    pub fn iterate_shifts(&self) -> impl Iterator<Item = ShiftEvent> + '_ {
        self.ledger.iter()
    }

    // ── Ledger-Mutationen ───────────────────────────────────────────

    pub fn add_or_merge_shift(
        &mut self,
        anchor: usize,
        delta: i64,
    ) -> Result<Option<ShiftEvent>, MappingError> {
        let result = self.ledger.add_or_merge_shift(anchor, delta);
        self.after_ledger_mutation(&result);
        result
    }

    pub fn set_gap_pattern(&mut self, anchor: usize, pattern: GapPattern) -> Result<(), MappingError> {
        let result = self.ledger.set_gap_pattern(anchor, pattern);
        self.after_ledger_mutation(&result);
        result
    }

    pub fn remove_shift(&mut self, anchor: usize) -> Option<ShiftEvent> {
        let removed = self.ledger.remove_shift(anchor);
        if removed.is_some() {
            self.shifts_changed();
        }
        removed
    }

    pub fn clear_shifts(&mut self) {
        let version = self.ledger.version();
        self.ledger.clear();
        if self.ledger.version() != version {
            self.shifts_changed();
        }
    }

    fn after_ledger_mutation<T>(&mut self, result: &Result<T, MappingError>) {
        match result {
            Ok(_) => self.shifts_changed(),
            Err(e) => log::warn!("Verschiebung abgelehnt: {}", e),
        }
    }

    fn shifts_changed(&mut self) {
        self.events.push(PherogramEvent::ShiftsChanged {
            version: self.ledger.version(),
        });
        self.mark_changed();
    }

    // ── Cut-Fenster ─────────────────────────────────────────────────

    /// Setzt die linke Cut-Position und synchronisiert die angebundene Zeile.
    pub fn set_left_cut_position<S>(
        &mut self,
        position: usize,
        sequence: &mut S,
    ) -> Result<Vec<CutOutcome>>
    where
        S: EditableSequence + ?Sized,
    {
        self.refresh_table();
        let changes = self.window.set_left(position, &self.table);
        self.finish_cut_changes(changes, sequence)
    }

    /// Setzt die rechte Cut-Position und synchronisiert die angebundene Zeile.
    pub fn set_right_cut_position<S>(
        &mut self,
        position: usize,
        sequence: &mut S,
    ) -> Result<Vec<CutOutcome>>
    where
        S: EditableSequence + ?Sized,
    {
        self.refresh_table();
        let changes = self.window.set_right(position, &self.table);
        self.finish_cut_changes(changes, sequence)
    }

    /// Verschiebt die Anbindung horizontal. Gibt die alte Startspalte zurück.
    pub fn set_first_seq_pos(&mut self, position: usize) -> usize {
        let old = self.window.set_first_seq_pos(position);
        if old != position {
            log::info!("Erste Sequenzposition {} -> {}", old, position);
            self.refresh_table();
            self.events.push(PherogramEvent::Resized {
                visible_columns: self.window.visible_columns(&self.table),
            });
            self.mark_changed();
        }
        old
    }

    fn finish_cut_changes<S>(
        &mut self,
        changes: Vec<CutChange>,
        sequence: &mut S,
    ) -> Result<Vec<CutOutcome>>
    where
        S: EditableSequence + ?Sized,
    {
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        // Das Fenster ist bereits verschoben; der Host erfährt davon auch,
        // wenn die Synchronisation scheitert.
        let mut outcomes = Vec::with_capacity(changes.len());
        let mut failure = None;
        {
            let synchronizer = EditSynchronizer::from_options(&self.options);
            let mapper = CoordinateMapper::new(&self.table, &self.window)?;
            for change in changes {
                log::info!(
                    "{:?}-Cut {} -> {} ({:?}, Spalten {:?})",
                    change.side,
                    change.old_position,
                    change.new_position,
                    change.direction,
                    change.affected_columns
                );
                self.events.push(PherogramEvent::CutChanged(change.clone()));
                if failure.is_some() {
                    continue;
                }
                let sync = if !self.auto_sync {
                    Ok(SyncOutcome::NotApplied(NotAppliedReason::AutoSyncDisabled))
                } else {
                    match change.side {
                        CutSide::Left => synchronizer.react_to_left_cut_change(
                            &mapper,
                            self.trace.as_ref(),
                            sequence,
                            self.row,
                            &change,
                        ),
                        CutSide::Right => synchronizer.react_to_right_cut_change(
                            &mapper,
                            self.trace.as_ref(),
                            sequence,
                            self.row,
                            &change,
                        ),
                    }
                };
                match sync {
                    Ok(sync) => {
                        self.events.push(PherogramEvent::Synced {
                            side: change.side,
                            outcome: sync,
                        });
                        outcomes.push(CutOutcome { change, sync });
                    }
                    Err(e) => {
                        log::warn!(
                            "Synchronisation des {:?}-Cuts fehlgeschlagen: {:#}",
                            change.side,
                            e
                        );
                        failure = Some(e);
                    }
                }
            }
        }

        self.events.push(PherogramEvent::Resized {
            visible_columns: self.window.visible_columns(&self.table),
        });
        self.mark_changed();
        match failure {
            Some(e) => Err(e),
            None => Ok(outcomes),
        }
    }

    // ── Synchronisation ─────────────────────────────────────────────

    pub fn set_auto_sync(&mut self, enabled: bool) {
        if self.auto_sync != enabled {
            log::info!("Automatische Synchronisation: {}", enabled);
        }
        self.auto_sync = enabled;
    }

    pub fn attach_row(&mut self, row: RowId) {
        log::info!("Trace an Zeile {} angebunden", row.0);
        self.row = Some(row);
    }

    pub fn detach_row(&mut self) -> Option<RowId> {
        self.row.take()
    }

    /// Schreibt alle sichtbaren Base-Calls neu in die angebundene Zeile.
    /// Läuft unabhängig von `auto_sync`.
    pub fn reconcile_visible_range<S>(&mut self, sequence: &mut S) -> Result<SyncOutcome>
    where
        S: EditableSequence + ?Sized,
    {
        self.refresh_table();
        let synchronizer = EditSynchronizer::from_options(&self.options);
        let mapper = CoordinateMapper::new(&self.table, &self.window)?;
        let outcome =
            synchronizer.reconcile_visible_range(&mapper, self.trace.as_ref(), sequence, self.row)?;
        log::info!("Sichtbarer Bereich abgeglichen: {:?}", outcome);
        Ok(outcome)
    }

    // ── Verzerrungsprofil ───────────────────────────────────────────

    pub fn set_default_token_width(&mut self, width: f64) {
        self.widths.default = width;
        self.widths.generation += 1;
    }

    pub fn set_column_width(&mut self, column: usize, width: f64) {
        self.widths.overrides.insert(column, width);
        self.widths.generation += 1;
    }

    pub fn token_width(&self, column: usize) -> f64 {
        self.widths.width(column)
    }

    /// Liefert das Verzerrungsprofil; baut es neu, wenn Ledger, Fenster oder
    /// Spaltenbreiten sich seit dem letzten Aufbau geändert haben.
    pub fn rebuild_distortion_profile(&mut self) -> Result<&DistortionProfile, MappingError> {
        self.refresh_table();
        let key = ProfileKey {
            ledger_version: self.ledger.version(),
            window: self.window.clone(),
            width_generation: self.widths.generation,
        };
        let cached = match self.distortion.take() {
            Some(cached) if cached.key == key => cached,
            _ => {
                let mapper = CoordinateMapper::new(&self.table, &self.window)?;
                let widths = &self.widths;
                let profile =
                    DistortionProfile::rebuild(&mapper, self.trace.as_ref(), |c| widths.width(c));
                self.profile_build_count += 1;
                CachedProfile { key, profile }
            }
        };
        Ok(&self.distortion.insert(cached).profile)
    }

    // ── Events & Neuberechnung ──────────────────────────────────────

    /// Entnimmt alle seit dem letzten Aufruf gesammelten Events.
    pub fn drain_events(&mut self) -> Vec<PherogramEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Schließt eine Batch-Ebene; die äußerste führt die aufgeschobene
    /// Neuberechnung aus.
    pub(crate) fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 && self.pending_recompute {
            self.recompute();
        }
    }

    fn mark_changed(&mut self) {
        if self.batch_depth > 0 {
            self.pending_recompute = true;
        } else {
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.pending_recompute = false;
        self.refresh_table();
        self.distortion = None;
        self.recompute_count += 1;
        log::debug!(
            "Neuberechnung #{} (Ledger-Version {})",
            self.recompute_count,
            self.ledger.version()
        );
        self.events.push(PherogramEvent::Recomputed {
            ledger_version: self.ledger.version(),
        });
    }

    fn refresh_table(&mut self) {
        if !self.table.is_current(&self.ledger) {
            self.table = OffsetTable::from_ledger(&self.ledger);
        }
    }
}
