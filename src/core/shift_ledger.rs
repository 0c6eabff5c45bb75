//! Shift-Ledger: geordnete, dünn besetzte Liste der Verschiebungen zwischen
//! Trace-Raum und Alignment-Raum.

use super::{GapPattern, MappingError};

/// Ein Verschiebungsereignis, verankert an einem Trace-Index.
///
/// - `delta > 0`: `delta` zusätzliche Alignment-Spalten ohne Trace-Fortschritt (Einfügung)
/// - `delta < 0`: `-delta` weitere Trace-Indizes teilen sich die Spalte des Ankers (Kompression)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftEvent {
    /// Trace-Index, an dem die Verschiebung wirkt
    pub anchor: usize,
    /// Vorzeichenbehaftete Verschiebung, nie 0
    pub delta: i64,
}

impl ShiftEvent {
    pub fn new(anchor: usize, delta: i64) -> Self {
        Self { anchor, delta }
    }

    pub fn is_insertion(&self) -> bool {
        self.delta > 0
    }

    pub fn is_compression(&self) -> bool {
        self.delta < 0
    }

    /// Letzter Trace-Index des Laufs (bei Einfügungen der Anker selbst).
    pub fn run_end(&self) -> usize {
        if self.delta < 0 {
            self.anchor + self.delta.unsigned_abs() as usize
        } else {
            self.anchor
        }
    }

    /// Anzahl der Spalten, die der Anker belegt (`delta + 1` bei Einfügungen, sonst 1).
    pub fn span_len(&self) -> usize {
        if self.delta > 0 {
            self.delta as usize + 1
        } else {
            1
        }
    }
}

#[derive(Debug, Clone)]
struct LedgerEntry {
    event: ShiftEvent,
    gap_pattern: Option<GapPattern>,
}

/// Quelle der Wahrheit für die Divergenz der beiden Koordinatenräume.
///
/// Invariante: Anker strikt aufsteigend, kein Anker doppelt, kein `delta == 0`,
/// Kompressionsläufe überlappen weder das Trace-Ende noch andere Ereignisse.
#[derive(Debug, Clone)]
pub struct ShiftLedger {
    trace_length: usize,
    entries: Vec<LedgerEntry>,
    version: u64,
}

impl ShiftLedger {
    /// Erstellt einen leeren Ledger für eine Trace der gegebenen Länge.
    pub fn new(trace_length: usize) -> Self {
        Self {
            trace_length,
            entries: Vec::new(),
            version: 0,
        }
    }

    /// Baut einen Ledger aus `(anker, delta)`-Paaren (z.B. beim Import).
    /// Paare mit gleichem Anker werden addiert.
    pub fn from_pairs(
        trace_length: usize,
        pairs: impl IntoIterator<Item = (usize, i64)>,
    ) -> Result<Self, MappingError> {
        let mut ledger = Self::new(trace_length);
        for (anchor, delta) in pairs {
            ledger.add_or_merge_shift(anchor, delta)?;
        }
        Ok(ledger)
    }

    pub fn trace_length(&self) -> usize {
        self.trace_length
    }

    /// Monoton steigender Zähler, erhöht bei jeder erfolgreichen Mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fügt eine Verschiebung ein oder addiert sie zu einer bestehenden am selben Anker.
    ///
    /// Gibt das resultierende Ereignis zurück, `None` wenn es sich zu 0 aufgehoben hat.
    /// Bei einem Fehler bleibt der Ledger unverändert.
    pub fn add_or_merge_shift(
        &mut self,
        anchor: usize,
        delta: i64,
    ) -> Result<Option<ShiftEvent>, MappingError> {
        if anchor >= self.trace_length {
            return Err(MappingError::InvalidIndex {
                index: anchor,
                trace_length: self.trace_length,
            });
        }
        if delta == 0 {
            return Err(MappingError::invalid_shift(anchor, "delta darf nicht 0 sein"));
        }

        match self.position_of(anchor) {
            Ok(idx) => {
                let existing = &self.entries[idx];
                let merged = existing.event.delta + delta;
                if existing.gap_pattern.is_some() && merged <= 0 {
                    return Err(MappingError::invalid_shift(
                        anchor,
                        "Luecken-Muster wuerde beim Zusammenfuehren mehrdeutig",
                    ));
                }
                if merged == 0 {
                    self.entries.remove(idx);
                    self.bump_version();
                    log::debug!("Verschiebung an {} aufgehoben", anchor);
                    return Ok(None);
                }
                let candidate = ShiftEvent::new(anchor, merged);
                self.validate(idx, &candidate)?;
                let entry = &mut self.entries[idx];
                entry.gap_pattern = entry
                    .gap_pattern
                    .as_ref()
                    .map(|p| p.resized(candidate.span_len()));
                entry.event = candidate;
                self.bump_version();
                Ok(Some(candidate))
            }
            Err(idx) => {
                let candidate = ShiftEvent::new(anchor, delta);
                self.validate(idx, &candidate)?;
                self.entries.insert(
                    idx,
                    LedgerEntry {
                        event: candidate,
                        gap_pattern: None,
                    },
                );
                self.bump_version();
                Ok(Some(candidate))
            }
        }
    }

    /// Hängt ein Lückenmuster an eine bestehende Einfügung.
    /// Die Musterlänge muss `delta + 1` entsprechen.
    pub fn set_gap_pattern(
        &mut self,
        anchor: usize,
        pattern: GapPattern,
    ) -> Result<(), MappingError> {
        let idx = self
            .position_of(anchor)
            .map_err(|_| MappingError::invalid_shift(anchor, "keine Verschiebung an diesem Anker"))?;
        let entry = &mut self.entries[idx];
        if !entry.event.is_insertion() {
            return Err(MappingError::invalid_shift(
                anchor,
                "Luecken-Muster nur fuer Einfuegungen",
            ));
        }
        if pattern.len() != entry.event.span_len() {
            return Err(MappingError::invalid_shift(
                anchor,
                "Laenge des Luecken-Musters passt nicht zum Span",
            ));
        }
        entry.gap_pattern = Some(pattern);
        self.bump_version();
        Ok(())
    }

    /// Entfernt die Verschiebung an einem Anker samt Muster.
    pub fn remove_shift(&mut self, anchor: usize) -> Option<ShiftEvent> {
        let idx = self.position_of(anchor).ok()?;
        let removed = self.entries.remove(idx);
        self.bump_version();
        Some(removed.event)
    }

    /// Entfernt alle Verschiebungen.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.bump_version();
        }
    }

    /// Aufsteigender, neu startbarer Iterator über alle Ereignisse.
    pub fn iter(&self) -> impl Iterator<Item = ShiftEvent> + '_ {
        self.entries.iter().map(|e| e.event)
    }

    /// Wie [`ShiftLedger::iter`], inklusive angehängter Lückenmuster.
    pub fn iter_with_patterns(
        &self,
    ) -> impl Iterator<Item = (ShiftEvent, Option<&GapPattern>)> + '_ {
        self.entries.iter().map(|e| (e.event, e.gap_pattern.as_ref()))
    }

    /// Ereignis mit genau diesem Anker.
    pub fn event_at(&self, anchor: usize) -> Option<ShiftEvent> {
        self.position_of(anchor).ok().map(|idx| self.entries[idx].event)
    }

    /// Lückenmuster einer Einfügung; fehlt es, gilt [`GapPattern::trailing_gaps`].
    pub fn gap_pattern_at(&self, anchor: usize) -> Option<&GapPattern> {
        self.position_of(anchor)
            .ok()
            .and_then(|idx| self.entries[idx].gap_pattern.as_ref())
    }

    /// Summe aller `delta` mit `anchor < trace_index`.
    ///
    /// Lineare Referenz; Abfragen laufen über die Präfixsummen der `OffsetTable`.
    pub fn cumulative_offset_before(&self, trace_index: usize) -> i64 {
        let end = self.entries.partition_point(|e| e.event.anchor < trace_index);
        self.entries[..end].iter().map(|e| e.event.delta).sum()
    }

    fn position_of(&self, anchor: usize) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&anchor, |e| e.event.anchor)
    }

    /// Prüft einen Kandidaten gegen seine Nachbarn. `idx` ist die Einfügeposition
    /// bzw. die Position des ersetzten Eintrags.
    fn validate(&self, idx: usize, candidate: &ShiftEvent) -> Result<(), MappingError> {
        let anchor = candidate.anchor;
        if candidate.is_compression() && candidate.run_end() >= self.trace_length {
            return Err(MappingError::invalid_shift(
                anchor,
                "Kompression ragt ueber das Trace-Ende",
            ));
        }

        if let Some(prev) = idx.checked_sub(1).map(|i| self.entries[i].event) {
            if prev.is_compression() && prev.run_end() >= anchor {
                return Err(MappingError::invalid_shift(
                    anchor,
                    "Anker liegt in einem Kompressionslauf",
                ));
            }
        }

        let next = self
            .entries
            .iter()
            .skip(idx)
            .map(|e| e.event)
            .find(|e| e.anchor > anchor);
        if let Some(next) = next {
            if candidate.run_end() >= next.anchor {
                return Err(MappingError::invalid_shift(
                    anchor,
                    "Kompressionslauf ueberlappt folgende Verschiebung",
                ));
            }
        }
        Ok(())
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }
}
