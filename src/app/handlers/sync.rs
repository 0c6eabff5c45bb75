//! Handler für Zeilenbindung und Synchronisation.

use crate::app::editable::{EditableSequence, RowId};
use crate::app::PherogramState;

pub fn set_auto_sync(state: &mut PherogramState, enabled: bool) {
    state.set_auto_sync(enabled);
}

pub fn attach(state: &mut PherogramState, row: RowId) {
    state.attach_row(row);
}

pub fn detach(state: &mut PherogramState) {
    if let Some(row) = state.detach_row() {
        log::info!("Trace von Zeile {} geloest", row.0);
    }
}

/// Schreibt den sichtbaren Bereich neu; "nicht ausgeführt" ist kein Fehler.
pub fn reconcile<S>(state: &mut PherogramState, sequence: &mut S) -> anyhow::Result<()>
where
    S: EditableSequence + ?Sized,
{
    let outcome = state.reconcile_visible_range(sequence)?;
    if !outcome.is_applied() {
        log::warn!("Abgleich nicht ausgefuehrt: {:?}", outcome);
    }
    Ok(())
}
