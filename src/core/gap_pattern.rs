//! Lückenmuster einer Einfügung: welche Spalten eines Spans Gap-Tokens sind.

/// Beschreibt die `delta + 1` Spalten, die eine positive Verschiebung belegt.
///
/// Nicht-Lücken-Spalten tragen eine Kopie der Base des Ankers. Die erste
/// Nicht-Lücken-Spalte ist das "Zentrum", in dem der Anker selbst steht.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapPattern {
    gaps: Vec<bool>,
    gaps_before_center: usize,
}

impl GapPattern {
    /// Erstellt ein Muster aus einer Liste von Lücken-Flags (eine pro Spalte).
    pub fn new(gaps: Vec<bool>) -> Self {
        let gaps_before_center = gaps.iter().take_while(|&&g| g).count();
        Self {
            gaps,
            gaps_before_center,
        }
    }

    /// Standardmuster: Base in der ersten Spalte, alle weiteren Spalten Lücken.
    pub fn trailing_gaps(span_len: usize) -> Self {
        Self::new((0..span_len).map(|i| i > 0).collect())
    }

    /// Erstellt ein Muster der Länge `span_len` mit Lücken an den angegebenen Offsets.
    /// Offsets außerhalb des Spans werden ignoriert.
    pub fn with_gaps_at(span_len: usize, offsets: &[usize]) -> Self {
        let mut gaps = vec![false; span_len];
        for &offset in offsets {
            if let Some(slot) = gaps.get_mut(offset) {
                *slot = true;
            }
        }
        Self::new(gaps)
    }

    /// Anzahl der Spalten im Span (`delta + 1`).
    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Prüft ob die Spalte mit dem gegebenen Offset eine Lücke ist.
    /// Offsets außerhalb des Spans gelten nicht als Lücke.
    pub fn is_gap(&self, offset: usize) -> bool {
        self.gaps.get(offset).copied().unwrap_or(false)
    }

    pub fn gap_count(&self) -> usize {
        self.gaps.iter().filter(|&&g| g).count()
    }

    /// Anzahl der Lücken vor der Zentrumsspalte (O(1), beim Erstellen berechnet).
    pub fn count_gaps_before_center(&self) -> usize {
        self.gaps_before_center
    }

    /// Offset der Spalte, in der die Base des Ankers steht; `None` bei reinem Lückenmuster.
    pub fn center_offset(&self) -> Option<usize> {
        (self.gaps_before_center < self.gaps.len()).then_some(self.gaps_before_center)
    }

    /// Nächster Nicht-Lücken-Offset strikt vor `offset`.
    pub fn base_before(&self, offset: usize) -> Option<usize> {
        (0..offset.min(self.gaps.len())).rev().find(|&i| !self.gaps[i])
    }

    /// Nächster Nicht-Lücken-Offset strikt nach `offset`.
    pub fn base_after(&self, offset: usize) -> Option<usize> {
        (offset + 1..self.gaps.len()).find(|&i| !self.gaps[i])
    }

    /// Iterator über die Lücken-Flags in Spaltenreihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.gaps.iter().copied()
    }

    /// Passt das Muster an eine neue Spanlänge an: neue Spalten werden als
    /// Lücken angehängt, überzählige Spalten am Ende verworfen.
    pub(crate) fn resized(&self, span_len: usize) -> Self {
        let mut gaps = self.gaps.clone();
        gaps.resize(span_len, true);
        Self::new(gaps)
    }

    /// Kompakte Textform für die Persistenz: `-` für Lücke, `B` für Base.
    pub fn to_mask(&self) -> String {
        self.gaps.iter().map(|&g| if g { '-' } else { 'B' }).collect()
    }

    /// Parst die Textform aus [`GapPattern::to_mask`].
    pub fn from_mask(mask: &str) -> Option<Self> {
        mask.chars()
            .map(|c| match c {
                '-' => Some(true),
                'B' | 'b' => Some(false),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>()
            .map(Self::new)
    }
}
