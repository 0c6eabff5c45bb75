//! Ergebnis einer Relationsabfrage zwischen Trace- und Alignment-Raum.

use serde::Serialize;

/// Gegenstück einer Position im jeweils anderen Koordinatenraum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Corresponding {
    /// Direkter Treffer
    Index(usize),
    /// Die Position liegt auf einer Lücke im anderen Raum
    Gap,
}

impl Corresponding {
    /// Gibt den Index zurück, falls keine Lücke vorliegt.
    pub fn index(self) -> Option<usize> {
        match self {
            Corresponding::Index(i) => Some(i),
            Corresponding::Gap => None,
        }
    }

    pub fn is_gap(self) -> bool {
        matches!(self, Corresponding::Gap)
    }
}

/// Ergebnis von `to_alignment_index` / `to_trace_index`.
///
/// `before`/`after` sind die nächsten gültigen Nachbarn im Zielraum und nur
/// bei `Corresponding::Gap` oder Kompressionsläufen von den Treffern verschieden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Relation {
    Position {
        before: usize,
        after: usize,
        corresponding: Corresponding,
    },
    /// Abfrage liegt außerhalb des Cut-Fensters oder der Sequenz
    OutOfRange,
}

impl Relation {
    /// Direkter Treffer ohne Nachbarschafts-Information.
    pub fn direct(index: usize) -> Self {
        Relation::Position {
            before: index,
            after: index,
            corresponding: Corresponding::Index(index),
        }
    }

    /// Lücke zwischen zwei gültigen Nachbarn.
    pub fn gap(before: usize, after: usize) -> Self {
        Relation::Position {
            before,
            after,
            corresponding: Corresponding::Gap,
        }
    }

    /// Gegenstück als `Option`: `None` bei `OutOfRange` oder Lücke.
    pub fn corresponding_index(&self) -> Option<usize> {
        match self {
            Relation::Position { corresponding, .. } => corresponding.index(),
            Relation::OutOfRange => None,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Relation::OutOfRange)
    }

    pub fn is_gap(&self) -> bool {
        matches!(
            self,
            Relation::Position {
                corresponding: Corresponding::Gap,
                ..
            }
        )
    }
}
