//! Cut-Fenster: sichtbarer Ausschnitt `[left, right)` des Trace-Raums und
//! die Alignment-Spalte, an der er beginnt.

use super::mapper::OffsetTable;
use super::MappingError;
use std::ops::Range;

/// Welche Cut-Position sich geändert hat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutSide {
    Left,
    Right,
}

/// Richtung einer Cut-Änderung aus Sicht des sichtbaren Bereichs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutDirection {
    /// Mehr Trace-Inhalt sichtbar
    Widened,
    /// Trace-Inhalt wurde abgeschnitten
    Narrowed,
    Unchanged,
}

/// Vorher/Nachher-Beschreibung einer Cut-Änderung.
///
/// `affected_columns` sind die Alignment-Spalten, die Trace-Inhalt gewinnen
/// (`Widened`) oder verlieren (`Narrowed`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutChange {
    pub side: CutSide,
    pub old_position: usize,
    pub new_position: usize,
    pub direction: CutDirection,
    pub affected_columns: Range<usize>,
}

impl CutChange {
    fn between(side: CutSide, old_position: usize, new_position: usize) -> Self {
        let widened = match side {
            CutSide::Left => new_position < old_position,
            CutSide::Right => new_position > old_position,
        };
        let direction = if old_position == new_position {
            CutDirection::Unchanged
        } else if widened {
            CutDirection::Widened
        } else {
            CutDirection::Narrowed
        };
        Self {
            side,
            old_position,
            new_position,
            direction,
            affected_columns: 0..0,
        }
    }
}

/// Sichtbarer Ausschnitt einer angehängten Trace.
///
/// Invariante: `0 <= left <= right <= trace_length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutWindow {
    trace_length: usize,
    left: usize,
    right: usize,
    first_seq_pos: usize,
}

impl CutWindow {
    /// Vollständig sichtbare Trace ab Spalte 0.
    pub fn new(trace_length: usize) -> Self {
        Self {
            trace_length,
            left: 0,
            right: trace_length,
            first_seq_pos: 0,
        }
    }

    /// Erstellt ein Fenster mit expliziten Grenzen (z.B. beim Laden von Metadaten).
    pub fn with_bounds(
        trace_length: usize,
        left: usize,
        right: usize,
        first_seq_pos: usize,
    ) -> Result<Self, MappingError> {
        if right > trace_length {
            return Err(MappingError::InvalidIndex {
                index: right,
                trace_length,
            });
        }
        if left > right {
            return Err(MappingError::InvalidIndex {
                index: left,
                trace_length,
            });
        }
        Ok(Self {
            trace_length,
            left,
            right,
            first_seq_pos,
        })
    }

    pub fn trace_length(&self) -> usize {
        self.trace_length
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    /// Alignment-Spalte des Trace-Index `left`.
    pub fn first_seq_pos(&self) -> usize {
        self.first_seq_pos
    }

    pub fn is_empty(&self) -> bool {
        self.left == self.right
    }

    /// Prüft ob ein Trace-Index sichtbar ist.
    pub fn contains(&self, trace_index: usize) -> bool {
        (self.left..self.right).contains(&trace_index)
    }

    /// Verschiebt die gesamte Anbindung horizontal, ohne die Grenzen zu ändern.
    pub fn set_first_seq_pos(&mut self, first_seq_pos: usize) -> usize {
        std::mem::replace(&mut self.first_seq_pos, first_seq_pos)
    }

    /// Erste Spalte von `trace_index` (gültig für `trace_index >= left`).
    pub(crate) fn start_column(&self, table: &OffsetTable, trace_index: usize) -> usize {
        let offset = table.column(trace_index) - table.column(self.left);
        (self.first_seq_pos as i64 + offset).max(0) as usize
    }

    /// Exklusives Spaltenende aller Trace-Indizes `< trace_end`.
    ///
    /// Wird aus dem Spanende des letzten Index berechnet und braucht daher
    /// keinen Sonderfall für `trace_end == trace_length`.
    pub(crate) fn end_column(&self, table: &OffsetTable, trace_end: usize) -> usize {
        if trace_end <= self.left {
            return self.first_seq_pos;
        }
        let last = trace_end - 1;
        let offset = table.span_end(last) - table.column(self.left);
        (self.first_seq_pos as i64 + offset + 1).max(0) as usize
    }

    /// Alignment-Spalten, die aktuell Trace-Inhalt tragen.
    pub fn visible_columns(&self, table: &OffsetTable) -> Range<usize> {
        self.first_seq_pos..self.end_column(table, self.right)
    }

    /// Setzt die linke Cut-Position.
    ///
    /// Gibt die Änderung der linken Grenze zurück, gefolgt von einer Änderung
    /// der rechten Grenze, falls diese mitgeschoben wurde.
    pub fn set_left(&mut self, position: usize, table: &OffsetTable) -> Vec<CutChange> {
        let before = self.clone();
        let requested = position.min(self.trace_length);
        let new_left = self.move_left(requested, table);
        if new_left > self.right {
            self.right = new_left;
        }
        self.describe(&before, table)
    }

    /// Setzt die rechte Cut-Position. Liegt sie links von `left`, wird `left` mitgeschoben.
    pub fn set_right(&mut self, position: usize, table: &OffsetTable) -> Vec<CutChange> {
        let before = self.clone();
        let requested = position.min(self.trace_length);
        if requested < self.left {
            let new_left = self.move_left(requested, table);
            self.right = new_left;
        } else {
            self.right = requested;
        }
        let mut changes = self.describe(&before, table);
        // Rechte Grenze ist hier die primäre Änderung
        changes.sort_by_key(|c| c.side != CutSide::Right);
        changes
    }

    /// Verschiebt `left` und passt `first_seq_pos` so an, dass sichtbar
    /// bleibender Inhalt seine Spalte behält. Eine Verbreiterung, die eine
    /// negative Startspalte erfordern würde, wird begrenzt.
    fn move_left(&mut self, requested: usize, table: &OffsetTable) -> usize {
        let old_column = table.column(self.left);
        let budget = old_column - self.first_seq_pos as i64;
        let mut new_left = requested;
        if table.column(new_left) < budget {
            new_left = table
                .first_index_at_or_above(new_left, self.left, budget)
                .unwrap_or(self.left);
            log::warn!(
                "Linker Cut {} braucht negative Spalten, begrenzt auf {}",
                requested,
                new_left
            );
        }
        let new_first = self.first_seq_pos as i64 + table.column(new_left) - old_column;
        self.first_seq_pos = new_first.max(0) as usize;
        self.left = new_left;
        new_left
    }

    fn describe(&self, before: &CutWindow, table: &OffsetTable) -> Vec<CutChange> {
        let mut changes = Vec::with_capacity(2);

        if before.left != self.left {
            let mut change = CutChange::between(CutSide::Left, before.left, self.left);
            change.affected_columns = match change.direction {
                CutDirection::Widened => {
                    let end = before.left.min(self.right).max(self.left);
                    self.first_seq_pos..self.start_column(table, end).max(self.first_seq_pos)
                }
                _ => {
                    let end = self.left.min(before.right).max(before.left);
                    before.first_seq_pos
                        ..before.start_column(table, end).max(before.first_seq_pos)
                }
            };
            changes.push(change);
        }

        if before.right != self.right {
            let mut change = CutChange::between(CutSide::Right, before.right, self.right);
            change.affected_columns = match change.direction {
                CutDirection::Widened => {
                    let start = self.end_column(table, before.right.max(self.left));
                    start..self.end_column(table, self.right).max(start)
                }
                _ => {
                    let start = before.end_column(table, self.right.max(before.left));
                    start..before.end_column(table, before.right).max(start)
                }
            };
            changes.push(change);
        }

        changes
    }
}
