//! Verzerrungsprofil: horizontale Skalierung und Zeichenanker pro Trace-Index.
//!
//! Rein abgeleitet und jederzeit verwerfbar. Wird bei jeder Änderung von
//! Ledger, Cut-Fenster oder Spaltenbreiten vollständig neu gebaut.

use super::{CoordinateMapper, GapPattern, TraceSource};

/// Zeichenparameter eines Trace-Index.
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionEntry {
    /// Pixel pro Rohdaten-Sample
    pub horizontal_scale: f64,
    /// X-Position, an der die Spalten des Index beginnen
    pub paint_start_x: f64,
    /// X-Position, unter der der Peak des Base-Calls zentriert wird
    pub paint_center_x: f64,
    /// Lückenmuster, falls der Index eine Einfügung verankert
    pub gap_pattern: Option<GapPattern>,
}

/// Tabelle der Zeichenparameter für alle sichtbaren Trace-Indizes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistortionProfile {
    first_trace_index: usize,
    entries: Vec<DistortionEntry>,
}

impl DistortionProfile {
    /// Baut das Profil für das Fenster des Mappers neu auf.
    ///
    /// `token_width` liefert die Breite einer Alignment-Spalte.
    pub fn rebuild(
        mapper: &CoordinateMapper<'_>,
        trace: &(impl TraceSource + ?Sized),
        token_width: impl Fn(usize) -> f64,
    ) -> Self {
        let window = mapper.window();
        let first_column = window.first_seq_pos();
        let mut x: f64 = (0..first_column).map(&token_width).sum();
        let mut entries = Vec::with_capacity(window.right() - window.left());

        let mut trace_index = window.left();
        while trace_index < window.right() {
            let Some(columns) = mapper.column_span(trace_index) else {
                break;
            };
            let widths: Vec<f64> = columns.clone().map(&token_width).collect();
            let total_width: f64 = widths.iter().sum();

            if let Some(run) = mapper.table().compression_run(trace_index) {
                // Ganzer Lauf teilt sich eine Spalte und eine Skalierung
                let run_end = run.run_end().min(window.right() - 1);
                let scale = scale_for(trace, trace_index, run.run_end() + 1, total_width);
                let entry = DistortionEntry {
                    horizontal_scale: scale,
                    paint_start_x: x,
                    paint_center_x: x + total_width / 2.0,
                    gap_pattern: None,
                };
                entries.extend(std::iter::repeat_n(entry, run_end - trace_index + 1));
                x += total_width;
                trace_index = run_end + 1;
                continue;
            }

            let gap_pattern = mapper.gap_pattern(trace_index);
            let paint_center_x = match &gap_pattern {
                Some(pattern) => {
                    let gaps_before = pattern.count_gaps_before_center();
                    match widths.get(gaps_before) {
                        Some(center_width) => {
                            x + widths[..gaps_before].iter().sum::<f64>() + center_width / 2.0
                        }
                        None => x + total_width / 2.0,
                    }
                }
                None => x + total_width / 2.0,
            };
            entries.push(DistortionEntry {
                horizontal_scale: scale_for(trace, trace_index, trace_index + 1, total_width),
                paint_start_x: x,
                paint_center_x,
                gap_pattern,
            });
            x += total_width;
            trace_index += 1;
        }

        log::debug!(
            "Verzerrungsprofil neu gebaut: {} Eintraege ab Trace-Index {}",
            entries.len(),
            window.left()
        );
        Self {
            first_trace_index: window.left(),
            entries,
        }
    }

    /// Eintrag eines sichtbaren Trace-Index.
    pub fn entry(&self, trace_index: usize) -> Option<&DistortionEntry> {
        trace_index
            .checked_sub(self.first_trace_index)
            .and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterator über `(trace_index, eintrag)` in aufsteigender Reihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &DistortionEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (self.first_trace_index + i, e))
    }
}

/// Breite pro Rohdaten-Sample zwischen zwei Base-Calls; `1.0` ohne gültige Spanne.
fn scale_for(trace: &(impl TraceSource + ?Sized), from: usize, to: usize, width: f64) -> f64 {
    match (trace.sample_position(from), trace.sample_position(to)) {
        (Some(start), Some(end)) if end > start => width / (end - start) as f64,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BaseCallTrace, CutWindow, OffsetTable, ShiftLedger};
    use approx::assert_relative_eq;

    fn profile(ledger: &ShiftLedger, window: &CutWindow, width: f64) -> DistortionProfile {
        let trace = BaseCallTrace::evenly_spaced(&"ACGT".repeat(5), 10);
        let table = OffsetTable::from_ledger(ledger);
        let mapper = CoordinateMapper::new(&table, window).expect("gleiche Trace");
        DistortionProfile::rebuild(&mapper, &trace, |_| width)
    }

    #[test]
    fn one_to_one_steps_by_token_width() {
        let ledger = ShiftLedger::new(20);
        let window = CutWindow::new(20);
        let profile = profile(&ledger, &window, 1.0);

        assert_eq!(profile.len(), 20);
        let e = profile.entry(5).expect("Eintrag");
        assert_relative_eq!(e.paint_start_x, 5.0);
        assert_relative_eq!(e.paint_center_x, 5.5);
        assert_relative_eq!(e.horizontal_scale, 0.1);
    }

    #[test]
    fn compression_run_shares_scale_and_column() {
        let ledger = ShiftLedger::from_pairs(20, [(5, -2)]).expect("gueltig");
        let window = CutWindow::new(20);
        let profile = profile(&ledger, &window, 10.0);

        let anchor = profile.entry(5).expect("Eintrag").clone();
        // 3 Base-Calls (30 Samples) in einer Spalte von 10 px
        assert_relative_eq!(anchor.horizontal_scale, 10.0 / 30.0);
        assert_eq!(profile.entry(6), Some(&anchor));
        assert_eq!(profile.entry(7), Some(&anchor));
        assert_relative_eq!(profile.entry(8).expect("Eintrag").paint_start_x, 60.0);
    }

    #[test]
    fn insertion_centers_under_first_base_column() {
        let mut ledger = ShiftLedger::new(20);
        ledger.add_or_merge_shift(5, 2).expect("gueltig");
        ledger
            .set_gap_pattern(5, GapPattern::with_gaps_at(3, &[0, 2]))
            .expect("Muster passt");
        let window = CutWindow::new(20);
        let profile = profile(&ledger, &window, 1.0);

        let e = profile.entry(5).expect("Eintrag");
        assert_relative_eq!(e.paint_start_x, 5.0);
        assert_relative_eq!(e.paint_center_x, 6.5);
        assert_relative_eq!(e.horizontal_scale, 0.3);
        assert!(e.gap_pattern.is_some());
        assert_relative_eq!(profile.entry(6).expect("Eintrag").paint_start_x, 8.0);
    }

    #[test]
    fn window_offsets_start_by_preceding_columns() {
        let ledger = ShiftLedger::new(20);
        let window = CutWindow::with_bounds(20, 4, 8, 6).expect("gueltig");
        let profile = profile(&ledger, &window, 2.0);

        assert_eq!(profile.len(), 4);
        assert!(profile.entry(3).is_none());
        assert!(profile.entry(8).is_none());
        assert_relative_eq!(profile.entry(4).expect("Eintrag").paint_start_x, 12.0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let ledger = ShiftLedger::from_pairs(20, [(2, 1), (9, -3)]).expect("gueltig");
        let window = CutWindow::with_bounds(20, 1, 18, 3).expect("gueltig");
        assert_eq!(
            profile(&ledger, &window, 7.5),
            profile(&ledger, &window, 7.5)
        );
    }
}
