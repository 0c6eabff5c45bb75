//! Trace-Datenquelle: Base-Calls und ihre Positionen in den Rohdaten.

use anyhow::{bail, Result};

/// Lesezugriff auf die unveränderliche Base-Call-Sequenz einer Trace.
pub trait TraceSource {
    /// Anzahl der Base-Calls (Länge des Trace-Raums).
    fn sequence_length(&self) -> usize;

    /// Base-Call an einem Trace-Index.
    fn base_call(&self, trace_index: usize) -> Option<u8>;

    /// Sample-Position des Base-Calls in den Rohdaten.
    /// Für `trace_index == sequence_length()` liefert die Quelle das Trace-Ende.
    fn sample_position(&self, trace_index: usize) -> Option<usize>;
}

/// Base-Calls mit Peak-Positionen, wie sie aus einer AB1/SCF-Datei gelesen werden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCallTrace {
    base_calls: Vec<u8>,
    peak_positions: Vec<usize>,
    sample_count: usize,
}

impl BaseCallTrace {
    /// Erstellt eine Trace; Peak-Positionen müssen streng steigend und kleiner
    /// als `sample_count` sein.
    pub fn new(base_calls: Vec<u8>, peak_positions: Vec<usize>, sample_count: usize) -> Result<Self> {
        if base_calls.len() != peak_positions.len() {
            bail!(
                "{} Base-Calls, aber {} Peak-Positionen",
                base_calls.len(),
                peak_positions.len()
            );
        }
        if peak_positions.windows(2).any(|w| w[0] >= w[1]) {
            bail!("Peak-Positionen sind nicht streng steigend");
        }
        if peak_positions.last().is_some_and(|&p| p >= sample_count) {
            bail!("Peak-Position liegt hinter dem Trace-Ende ({})", sample_count);
        }
        Ok(Self {
            base_calls,
            peak_positions,
            sample_count,
        })
    }

    /// Gleichmäßig verteilte Peaks, z.B. für synthetische Traces und die CLI.
    pub fn evenly_spaced(sequence: &str, samples_per_base: usize) -> Self {
        let step = samples_per_base.max(1);
        let base_calls: Vec<u8> = sequence.bytes().collect();
        let peak_positions = (0..base_calls.len()).map(|i| i * step + step / 2).collect();
        let sample_count = base_calls.len() * step;
        Self {
            base_calls,
            peak_positions,
            sample_count,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }
}

impl TraceSource for BaseCallTrace {
    fn sequence_length(&self) -> usize {
        self.base_calls.len()
    }

    fn base_call(&self, trace_index: usize) -> Option<u8> {
        self.base_calls.get(trace_index).copied()
    }

    fn sample_position(&self, trace_index: usize) -> Option<usize> {
        if trace_index == self.base_calls.len() {
            return Some(self.sample_count);
        }
        self.peak_positions.get(trace_index).copied()
    }
}
