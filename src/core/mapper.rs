//! Koordinaten-Mapper: die beiden inversen Relationsabfragen zwischen
//! Trace-Raum und Alignment-Raum.

use super::{
    Corresponding, CutWindow, GapPattern, MappingError, Relation, ShiftEvent, ShiftLedger,
};
use std::ops::Range;

/// Präfixsummen über den Shift-Ledger, gebunden an dessen Version.
///
/// Ersetzt das implizite "zuletzt abgefragter Index"-Memo: Eine veraltete
/// Tabelle wird komplett neu gebaut, nie inkrementell gepatcht.
#[derive(Debug, Clone)]
pub struct OffsetTable {
    ledger_version: u64,
    trace_length: usize,
    events: Vec<ShiftEvent>,
    patterns: Vec<Option<GapPattern>>,
    /// `prefix[i]` = Summe der `delta` von `events[..i]`
    prefix: Vec<i64>,
}

impl OffsetTable {
    /// Baut die Tabelle aus dem aktuellen Ledger-Stand.
    pub fn from_ledger(ledger: &ShiftLedger) -> Self {
        let mut events = Vec::with_capacity(ledger.len());
        let mut patterns = Vec::with_capacity(ledger.len());
        let mut prefix = Vec::with_capacity(ledger.len() + 1);
        let mut sum = 0i64;
        prefix.push(sum);
        for (event, pattern) in ledger.iter_with_patterns() {
            sum += event.delta;
            events.push(event);
            patterns.push(pattern.cloned());
            prefix.push(sum);
        }
        log::debug!(
            "Offset-Tabelle gebaut: {} Verschiebungen, Ledger-Version {}",
            events.len(),
            ledger.version()
        );
        Self {
            ledger_version: ledger.version(),
            trace_length: ledger.trace_length(),
            events,
            patterns,
            prefix,
        }
    }

    /// Version des Ledgers, aus dem die Tabelle gebaut wurde.
    pub fn ledger_version(&self) -> u64 {
        self.ledger_version
    }

    /// Prüft ob die Tabelle zum Ledger-Stand passt.
    pub fn is_current(&self, ledger: &ShiftLedger) -> bool {
        self.ledger_version == ledger.version() && self.trace_length == ledger.trace_length()
    }

    pub fn trace_length(&self) -> usize {
        self.trace_length
    }

    /// Anzahl der Ereignisse mit `anchor < trace_index`.
    fn events_before(&self, trace_index: usize) -> usize {
        self.events.partition_point(|e| e.anchor < trace_index)
    }

    /// Gecachte Form von [`ShiftLedger::cumulative_offset_before`].
    pub fn cumulative_offset_before(&self, trace_index: usize) -> i64 {
        self.prefix[self.events_before(trace_index)]
    }

    /// Fensterunabhängige Spalte `u(t) = t + Offset`, mit Kompressions-Pinning.
    ///
    /// Monoton nicht fallend auf `[0, trace_length]`.
    pub(crate) fn column(&self, trace_index: usize) -> i64 {
        let before = self.events_before(trace_index);
        if let Some(prev) = before.checked_sub(1).map(|i| self.events[i]) {
            if prev.is_compression() && prev.run_end() >= trace_index {
                return prev.anchor as i64 + self.prefix[before - 1];
            }
        }
        trace_index as i64 + self.cumulative_offset_before(trace_index)
    }

    /// Letzte fensterunabhängige Spalte, die `trace_index` belegt.
    pub(crate) fn span_end(&self, trace_index: usize) -> i64 {
        let extra = self
            .insertion_at(trace_index)
            .map_or(0, |(event, _)| event.delta);
        self.column(trace_index) + extra
    }

    /// Einfügung mit genau diesem Anker samt (ggf. Standard-)Lückenmuster.
    pub(crate) fn insertion_at(&self, trace_index: usize) -> Option<(ShiftEvent, GapPattern)> {
        let idx = self
            .events
            .binary_search_by_key(&trace_index, |e| e.anchor)
            .ok()?;
        let event = self.events[idx];
        if !event.is_insertion() {
            return None;
        }
        let pattern = self.patterns[idx]
            .clone()
            .unwrap_or_else(|| GapPattern::trailing_gaps(event.span_len()));
        Some((event, pattern))
    }

    /// Kompressionslauf, der `trace_index` enthält (Anker eingeschlossen).
    pub fn compression_run(&self, trace_index: usize) -> Option<ShiftEvent> {
        let upto = self.events.partition_point(|e| e.anchor <= trace_index);
        let prev = self.events[..upto].last()?;
        (prev.is_compression() && prev.run_end() >= trace_index).then_some(*prev)
    }

    /// Erster Index in `[lo, hi]` mit `column(t) >= value`.
    pub(crate) fn first_index_at_or_above(&self, lo: usize, hi: usize, value: i64) -> Option<usize> {
        let (mut a, mut b) = (lo, hi + 1);
        while a < b {
            let mid = a + (b - a) / 2;
            if self.column(mid) < value {
                a = mid + 1;
            } else {
                b = mid;
            }
        }
        (a <= hi).then_some(a)
    }

    /// Letzter Index in `[lo, hi)` mit `column(t) <= value`.
    fn last_index_at_or_below(&self, lo: usize, hi: usize, value: i64) -> Option<usize> {
        let (mut a, mut b) = (lo, hi);
        while a < b {
            let mid = a + (b - a) / 2;
            if self.column(mid) <= value {
                a = mid + 1;
            } else {
                b = mid;
            }
        }
        a.checked_sub(1).filter(|&t| t >= lo)
    }
}

/// Abfrage-Sicht auf Offset-Tabelle und Cut-Fenster. Hält keinen eigenen Zustand.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    table: &'a OffsetTable,
    window: &'a CutWindow,
}

impl<'a> CoordinateMapper<'a> {
    /// Erstellt den Mapper; Tabelle und Fenster müssen dieselbe Trace beschreiben.
    pub fn new(table: &'a OffsetTable, window: &'a CutWindow) -> Result<Self, MappingError> {
        if table.trace_length() != window.trace_length() {
            return Err(MappingError::TraceLengthMismatch {
                ledger: table.trace_length(),
                window: window.trace_length(),
            });
        }
        Ok(Self { table, window })
    }

    pub fn window(&self) -> &CutWindow {
        self.window
    }

    pub fn table(&self) -> &OffsetTable {
        self.table
    }

    /// Alignment-Spalte eines Trace-Index.
    ///
    /// Alle Indizes eines Kompressionslaufs liefern dieselbe Spalte. Für den
    /// Anker einer Einfügung ist das Ergebnis die erste Nicht-Lücken-Spalte
    /// des Spans; besteht der Span nur aus Lücken, wird `Gap` mit den Spalten
    /// direkt vor und nach dem Span geliefert.
    pub fn to_alignment_index(&self, trace_index: usize) -> Relation {
        if !self.window.contains(trace_index) {
            return Relation::OutOfRange;
        }
        let base = self.window.start_column(self.table, trace_index);
        match self.table.insertion_at(trace_index) {
            Some((event, pattern)) => match pattern.center_offset() {
                Some(offset) => Relation::direct(base + offset),
                None => Relation::gap(base.saturating_sub(1), base + event.span_len()),
            },
            None => Relation::direct(base),
        }
    }

    /// Trace-Index einer Alignment-Spalte.
    ///
    /// Spalten eines Kompressionslaufs gehören dem ersten (niedrigsten) Index
    /// des Laufs; `before`/`after` nennen dann Anfang und Ende des Laufs.
    pub fn to_trace_index(&self, alignment_index: usize) -> Relation {
        let window = self.window;
        if window.is_empty() || !self.visible_columns().contains(&alignment_index) {
            return Relation::OutOfRange;
        }
        let left_column = self.table.column(window.left());
        let target = left_column + (alignment_index - window.first_seq_pos()) as i64;
        let Some(trace_index) =
            self.table
                .last_index_at_or_below(window.left(), window.right(), target)
        else {
            return Relation::OutOfRange;
        };

        if let Some(run) = self.table.compression_run(trace_index) {
            let start = run.anchor.max(window.left());
            let end = run.run_end().min(window.right() - 1);
            return Relation::Position {
                before: start,
                after: end,
                corresponding: Corresponding::Index(start),
            };
        }

        if let Some((_, pattern)) = self.table.insertion_at(trace_index) {
            let offset = (target - self.table.column(trace_index)) as usize;
            if pattern.is_gap(offset) {
                let before = if pattern.base_before(offset).is_some() {
                    trace_index
                } else {
                    trace_index.saturating_sub(1).max(window.left())
                };
                let after = if pattern.base_after(offset).is_some() {
                    trace_index
                } else {
                    (trace_index + 1).min(window.right() - 1)
                };
                return Relation::gap(before, after);
            }
        }

        Relation::direct(trace_index)
    }

    /// Spalten, die aktuell Trace-Inhalt tragen.
    pub fn visible_columns(&self) -> Range<usize> {
        self.window.visible_columns(self.table)
    }

    /// Alle Spalten, die ein sichtbarer Trace-Index belegt (Span bei Einfügungen).
    pub fn column_span(&self, trace_index: usize) -> Option<Range<usize>> {
        if !self.window.contains(trace_index) {
            return None;
        }
        let start = self.window.start_column(self.table, trace_index);
        let len = self
            .table
            .insertion_at(trace_index)
            .map_or(1, |(event, _)| event.span_len());
        Some(start..start + len)
    }

    /// Lückenmuster des Spans von `trace_index`, falls dort eine Einfügung verankert ist.
    pub fn gap_pattern(&self, trace_index: usize) -> Option<GapPattern> {
        self.table
            .insertion_at(trace_index)
            .map(|(_, pattern)| pattern)
    }
}

#[cfg(test)]
mod tests;
