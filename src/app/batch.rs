//! Batch-Scope für mehrere zusammengehörige Mutationen.

use super::PherogramState;
use std::ops::{Deref, DerefMut};

/// Guard, der Neuberechnungen bis zum Schließen des äußersten Batches aufschiebt.
///
/// Über `Deref`/`DerefMut` sind alle State-Operationen erreichbar; Batches
/// lassen sich verschachteln.
pub struct ChangeBatch<'a> {
    state: &'a mut PherogramState,
}

impl PherogramState {
    /// Öffnet einen Batch; beim Drop des äußersten Guards wird genau einmal
    /// neu berechnet.
    pub fn batch(&mut self) -> ChangeBatch<'_> {
        self.begin_batch();
        ChangeBatch { state: self }
    }
}

impl Deref for ChangeBatch<'_> {
    type Target = PherogramState;

    fn deref(&self) -> &PherogramState {
        self.state
    }
}

impl DerefMut for ChangeBatch<'_> {
    fn deref_mut(&mut self) -> &mut PherogramState {
        self.state
    }
}

impl Drop for ChangeBatch<'_> {
    fn drop(&mut self) {
        self.state.end_batch();
    }
}
