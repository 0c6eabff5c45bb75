//! Nachführen der editierbaren Sequenz bei Änderungen des Cut-Fensters.
//!
//! Alle Zielspalten werden zuerst als [`WritePlan`] berechnet und erst danach
//! geschrieben, damit spätere Schreibvorgänge frühere Ziele nicht verschieben.

use super::editable::{EditableSequence, RowId};
use crate::core::{CoordinateMapper, CutChange, CutDirection, CutSide, TraceSource};
use crate::shared::EngineOptions;
use anyhow::{anyhow, Context, Result};
use std::ops::Range;

/// Warum eine Synchronisation nicht ausgeführt wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotAppliedReason {
    /// Keine Alignment-Zeile angebunden
    Detached,
    /// Automatische Synchronisation ist abgeschaltet
    AutoSyncDisabled,
}

/// Ergebnis einer Synchronisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Geschrieben; `written` zählt die ersetzten Spalten
    Applied { written: usize },
    NotApplied(NotAppliedReason),
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied { .. })
    }

    /// Anzahl geschriebener Spalten (0 wenn nicht ausgeführt).
    pub fn written(&self) -> usize {
        match self {
            SyncOutcome::Applied { written } => *written,
            SyncOutcome::NotApplied(_) => 0,
        }
    }
}

/// Geplanter Inhalt einer Spalte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedToken {
    Base(u8),
    Gap,
}

/// Aufsteigend sortierte Liste geplanter Spalten-Schreibvorgänge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritePlan {
    writes: Vec<(usize, PlannedToken)>,
}

impl WritePlan {
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[(usize, PlannedToken)] {
        &self.writes
    }

    fn push(&mut self, column: usize, token: PlannedToken) {
        debug_assert!(self.writes.last().is_none_or(|&(c, _)| c < column));
        self.writes.push((column, token));
    }

    /// Zusammenhängende Spaltenbereiche als `(start, tokens)`.
    fn runs(&self) -> Vec<(usize, Vec<PlannedToken>)> {
        let mut runs: Vec<(usize, Vec<PlannedToken>)> = Vec::new();
        for &(column, token) in &self.writes {
            match runs.last_mut() {
                Some((start, tokens)) if *start + tokens.len() == column => tokens.push(token),
                _ => runs.push((column, vec![token])),
            }
        }
        runs
    }
}

/// Kopiert Base-Calls in die editierbare Sequenz oder schreibt Lücken.
#[derive(Debug, Clone, Copy)]
pub struct EditSynchronizer {
    uppercase: bool,
}

impl Default for EditSynchronizer {
    fn default() -> Self {
        Self { uppercase: true }
    }
}

impl EditSynchronizer {
    pub fn new(uppercase: bool) -> Self {
        Self { uppercase }
    }

    pub fn from_options(options: &EngineOptions) -> Self {
        Self::new(options.uppercase_copied_bases)
    }

    /// Reagiert auf eine Änderung der linken Cut-Position.
    ///
    /// Verengen schreibt nichts. Beim Verbreitern werden die neu sichtbaren
    /// Trace-Indizes in ihre Spalten kopiert. `mapper` beschreibt das Fenster
    /// nach der Änderung.
    pub fn react_to_left_cut_change<S>(
        &self,
        mapper: &CoordinateMapper<'_>,
        trace: &(impl TraceSource + ?Sized),
        sequence: &mut S,
        row: Option<RowId>,
        change: &CutChange,
    ) -> Result<SyncOutcome>
    where
        S: EditableSequence + ?Sized,
    {
        debug_assert_eq!(change.side, CutSide::Left);
        let Some(row) = row else {
            return Ok(SyncOutcome::NotApplied(NotAppliedReason::Detached));
        };
        let plan = match change.direction {
            CutDirection::Widened => {
                let window = mapper.window();
                let end = change.old_position.min(window.right());
                self.plan_copy(mapper, trace, change.new_position..end)
            }
            CutDirection::Narrowed | CutDirection::Unchanged => WritePlan::default(),
        };
        apply_plan(&plan, sequence, row).map(|written| SyncOutcome::Applied { written })
    }

    /// Reagiert auf eine Änderung der rechten Cut-Position.
    ///
    /// Verbreitern kopiert die neu sichtbaren Indizes, Verengen schreibt
    /// Lücken in die frei gewordenen Spalten.
    pub fn react_to_right_cut_change<S>(
        &self,
        mapper: &CoordinateMapper<'_>,
        trace: &(impl TraceSource + ?Sized),
        sequence: &mut S,
        row: Option<RowId>,
        change: &CutChange,
    ) -> Result<SyncOutcome>
    where
        S: EditableSequence + ?Sized,
    {
        debug_assert_eq!(change.side, CutSide::Right);
        let Some(row) = row else {
            return Ok(SyncOutcome::NotApplied(NotAppliedReason::Detached));
        };
        let plan = match change.direction {
            CutDirection::Widened => {
                let start = change.old_position.max(mapper.window().left());
                self.plan_copy(mapper, trace, start..change.new_position)
            }
            CutDirection::Narrowed => plan_gaps(change.affected_columns.clone()),
            CutDirection::Unchanged => WritePlan::default(),
        };
        apply_plan(&plan, sequence, row).map(|written| SyncOutcome::Applied { written })
    }

    /// Schreibt alle sichtbaren Base-Calls neu, z.B. nachdem die automatische
    /// Synchronisation abgeschaltet war.
    pub fn reconcile_visible_range<S>(
        &self,
        mapper: &CoordinateMapper<'_>,
        trace: &(impl TraceSource + ?Sized),
        sequence: &mut S,
        row: Option<RowId>,
    ) -> Result<SyncOutcome>
    where
        S: EditableSequence + ?Sized,
    {
        let Some(row) = row else {
            return Ok(SyncOutcome::NotApplied(NotAppliedReason::Detached));
        };
        let window = mapper.window();
        let plan = self.plan_copy(mapper, trace, window.left()..window.right());
        apply_plan(&plan, sequence, row).map(|written| SyncOutcome::Applied { written })
    }

    /// Plant das Kopieren der Base-Calls von `indices` in ihre Spalten.
    ///
    /// Lücken-Spalten eines Spans bleiben unberührt, reine Lücken-Spans werden
    /// übersprungen. Von einem Kompressionslauf schreibt nur der erste sichtbare
    /// Index.
    pub fn plan_copy(
        &self,
        mapper: &CoordinateMapper<'_>,
        trace: &(impl TraceSource + ?Sized),
        indices: Range<usize>,
    ) -> WritePlan {
        let window = mapper.window();
        let mut plan = WritePlan::default();
        for trace_index in indices {
            if mapper.to_alignment_index(trace_index).is_gap() {
                continue;
            }
            let owns_column = mapper
                .table()
                .compression_run(trace_index)
                .is_none_or(|run| trace_index == run.anchor.max(window.left()));
            if !owns_column {
                continue;
            }
            let Some(columns) = mapper.column_span(trace_index) else {
                continue;
            };
            let Some(base) = trace.base_call(trace_index) else {
                log::warn!("Kein Base-Call fuer Trace-Index {}", trace_index);
                continue;
            };
            let base = if self.uppercase {
                base.to_ascii_uppercase()
            } else {
                base
            };
            let pattern = mapper.gap_pattern(trace_index);
            for (offset, column) in columns.enumerate() {
                if pattern.as_ref().is_some_and(|p| p.is_gap(offset)) {
                    continue;
                }
                plan.push(column, PlannedToken::Base(base));
            }
        }
        log::debug!("Kopierplan: {} Spalten", plan.len());
        plan
    }
}

/// Plant Lücken-Token für alle Spalten in `columns`.
pub fn plan_gaps(columns: Range<usize>) -> WritePlan {
    WritePlan {
        writes: columns.map(|c| (c, PlannedToken::Gap)).collect(),
    }
}

/// Führt einen Plan aus; zusammenhängende Spalten gehen in einen Aufruf.
///
/// Alle Token werden vor dem ersten Schreibvorgang aufgelöst. Kennt das
/// Alphabet einen Base-Call nicht, bleibt die Zeile unverändert.
fn apply_plan<S>(plan: &WritePlan, sequence: &mut S, row: RowId) -> Result<usize>
where
    S: EditableSequence + ?Sized,
{
    let runs = plan
        .runs()
        .into_iter()
        .map(|(start, planned)| {
            let tokens = planned
                .iter()
                .map(|token| match *token {
                    PlannedToken::Gap => Ok(sequence.gap_token()),
                    PlannedToken::Base(base) => sequence.token_for_base(base).ok_or_else(|| {
                        anyhow!("Base-Call '{}' hat kein Token im Alphabet", base as char)
                    }),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((start, tokens))
        })
        .collect::<Result<Vec<_>>>()?;

    for (start, tokens) in runs {
        sequence
            .set_tokens_at(row, start, &tokens)
            .with_context(|| format!("Schreiben ab Spalte {} fehlgeschlagen", start))?;
    }
    Ok(plan.len())
}
