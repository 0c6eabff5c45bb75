//! Begrenztes Command-Log der ausgeführten Commands.

use super::PherogramCommand;
use crate::shared::options::COMMAND_LOG_CAPACITY;

/// Speichert ausgeführte Commands in Reihenfolge.
#[derive(Debug, Clone)]
pub struct CommandLog {
    entries: Vec<PherogramCommand>,
    capacity: usize,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLog {
    /// Erstellt ein leeres Command-Log mit Standard-Kapazität.
    pub fn new() -> Self {
        Self::with_capacity(COMMAND_LOG_CAPACITY)
    }

    /// Erstellt ein leeres Command-Log mit eigener Kapazität (mindestens 2).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(2),
        }
    }

    /// Fügt einen ausgeführten Command hinzu.
    /// Bei voller Kapazität wird die ältere Hälfte verworfen.
    pub fn record(&mut self, command: &PherogramCommand) {
        if self.entries.len() >= self.capacity {
            self.entries.drain(..self.capacity / 2);
        }
        self.entries.push(command.clone());
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Gibt die Anzahl der geloggten Commands zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Commands vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[PherogramCommand] {
        &self.entries
    }
}
