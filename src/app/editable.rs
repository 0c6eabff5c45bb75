//! Schnittstelle zur editierbaren Alignment-Sequenz.
//!
//! Die Engine schreibt nur über diesen Trait; Speicherung, Undo und Selektion
//! der Alignment-Zeilen liegen beim Host.

use crate::shared::EngineOptions;
use anyhow::{bail, Result};
use std::ops::Range;

/// Zeile des Alignments, an die eine Trace angehängt ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(pub usize);

/// Schreib-/Lesezugriff auf die Zeilen eines Alignments.
pub trait EditableSequence {
    /// Token-Typ des Alignment-Modells.
    type Token: Clone;

    /// Token einer Spalte, `None` hinter dem Zeilenende.
    fn token_at(&self, row: RowId, column: usize) -> Option<Self::Token>;

    /// Ersetzt das Token einer Spalte.
    fn set_token_at(&mut self, row: RowId, column: usize, token: Self::Token) -> Result<()>;

    /// Ersetzt zusammenhängende Spalten ab `column`.
    fn set_tokens_at(&mut self, row: RowId, column: usize, tokens: &[Self::Token]) -> Result<()> {
        for (i, token) in tokens.iter().enumerate() {
            self.set_token_at(row, column + i, token.clone())?;
        }
        Ok(())
    }

    /// Token, das eine Lücke darstellt.
    fn gap_token(&self) -> Self::Token;

    /// Token für einen Base-Call, `None` wenn das Alphabet ihn nicht kennt.
    fn token_for_base(&self, base: u8) -> Option<Self::Token>;

    /// Darstellungszeichen eines Tokens.
    fn representation(&self, token: &Self::Token) -> char;

    /// Textdarstellung der Spalten `columns` einer Zeile. Spalten hinter dem
    /// Zeilenende erscheinen als Lücke.
    fn render(&self, row: RowId, columns: Range<usize>) -> String {
        let gap = self.representation(&self.gap_token());
        columns
            .map(|column| {
                self.token_at(row, column)
                    .map_or(gap, |token| self.representation(&token))
            })
            .collect()
    }
}

/// Einfaches zeichenbasiertes Alignment im Speicher.
///
/// Wird von der CLI und den Tests verwendet. Schreiben hinter das Zeilenende
/// füllt die Zeile mit Lücken auf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryAlignment {
    rows: Vec<Vec<char>>,
    gap: char,
}

impl InMemoryAlignment {
    /// Erstellt ein Alignment mit `row_count` leeren Zeilen.
    pub fn new(row_count: usize, gap: char) -> Self {
        Self {
            rows: vec![Vec::new(); row_count],
            gap,
        }
    }

    /// Erstellt ein Alignment aus Textzeilen.
    pub fn from_rows<I, S>(rows: I, gap: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|r| r.as_ref().chars().collect())
                .collect(),
            gap,
        }
    }

    /// Erstellt ein Alignment mit dem Lückenzeichen aus den Optionen.
    pub fn from_options<I, S>(rows: I, options: &EngineOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_rows(rows, options.gap_representation)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Zeile als Text.
    pub fn row_text(&self, row: RowId) -> Option<String> {
        self.rows.get(row.0).map(|r| r.iter().collect())
    }

    fn row_mut(&mut self, row: RowId) -> Result<&mut Vec<char>> {
        let count = self.rows.len();
        match self.rows.get_mut(row.0) {
            Some(r) => Ok(r),
            None => bail!("Zeile {} existiert nicht ({} Zeilen)", row.0, count),
        }
    }
}

impl EditableSequence for InMemoryAlignment {
    type Token = char;

    fn token_at(&self, row: RowId, column: usize) -> Option<char> {
        self.rows.get(row.0)?.get(column).copied()
    }

    fn set_token_at(&mut self, row: RowId, column: usize, token: char) -> Result<()> {
        self.set_tokens_at(row, column, &[token])
    }

    fn set_tokens_at(&mut self, row: RowId, column: usize, tokens: &[char]) -> Result<()> {
        let gap = self.gap;
        let r = self.row_mut(row)?;
        let end = column + tokens.len();
        if r.len() < end {
            r.resize(end, gap);
        }
        r[column..end].copy_from_slice(tokens);
        Ok(())
    }

    fn gap_token(&self) -> char {
        self.gap
    }

    fn token_for_base(&self, base: u8) -> Option<char> {
        base.is_ascii_alphabetic().then_some(base as char)
    }

    fn representation(&self, token: &char) -> char {
        *token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_past_end_pads_with_gaps() {
        let mut alignment = InMemoryAlignment::from_rows(["AC"], '-');
        alignment
            .set_tokens_at(RowId(0), 4, &['G', 'T'])
            .expect("Schreiben hinter das Ende muss gehen");
        assert_eq!(alignment.row_text(RowId(0)).as_deref(), Some("AC--GT"));
    }

    #[test]
    fn test_unknown_row_is_an_error() {
        let mut alignment = InMemoryAlignment::new(1, '-');
        assert!(alignment.set_token_at(RowId(3), 0, 'A').is_err());
        assert_eq!(alignment.token_at(RowId(3), 0), None);
    }

    #[test]
    fn test_token_for_base_rejects_non_letters() {
        let alignment = InMemoryAlignment::new(1, '.');
        assert_eq!(alignment.token_for_base(b'a'), Some('a'));
        assert_eq!(alignment.token_for_base(b'*'), None);
        assert_eq!(alignment.gap_token(), '.');
    }

    #[test]
    fn test_from_options_uses_gap_representation() {
        let options = EngineOptions {
            gap_representation: '~',
            ..EngineOptions::default()
        };
        let mut alignment = InMemoryAlignment::from_options(["AC"], &options);
        alignment
            .set_token_at(RowId(0), 3, 'T')
            .expect("Schreiben hinter das Ende muss gehen");
        assert_eq!(alignment.row_text(RowId(0)).as_deref(), Some("AC~T"));
        assert_eq!(alignment.render(RowId(0), 0..6), "AC~T~~");
    }
}
