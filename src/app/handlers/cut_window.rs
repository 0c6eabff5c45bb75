//! Handler für Cut-Positionen und die Startspalte der Anbindung.

use crate::app::editable::EditableSequence;
use crate::app::PherogramState;

/// Setzt die linke Cut-Position.
pub fn set_left<S>(state: &mut PherogramState, sequence: &mut S, position: usize) -> anyhow::Result<()>
where
    S: EditableSequence + ?Sized,
{
    state.set_left_cut_position(position, sequence)?;
    Ok(())
}

/// Setzt die rechte Cut-Position.
pub fn set_right<S>(state: &mut PherogramState, sequence: &mut S, position: usize) -> anyhow::Result<()>
where
    S: EditableSequence + ?Sized,
{
    state.set_right_cut_position(position, sequence)?;
    Ok(())
}

/// Verschiebt die Anbindung horizontal.
pub fn set_first_seq_pos(state: &mut PherogramState, position: usize) {
    state.set_first_seq_pos(position);
}
