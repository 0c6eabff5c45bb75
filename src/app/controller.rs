//! Controller für die zentrale Command-Verarbeitung.

use super::editable::EditableSequence;
use super::{PherogramCommand, PherogramState};

/// Führt Commands auf dem PherogramState aus.
#[derive(Default)]
pub struct PherogramController;

impl PherogramController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Führt mehrere Commands in einem Batch aus; neu berechnet wird einmal am Ende.
    pub fn handle_commands<S>(
        &mut self,
        state: &mut PherogramState,
        sequence: &mut S,
        commands: impl IntoIterator<Item = PherogramCommand>,
    ) -> anyhow::Result<()>
    where
        S: EditableSequence + ?Sized,
    {
        let mut batch = state.batch();
        for command in commands {
            self.handle_command(&mut batch, sequence, command)?;
        }
        Ok(())
    }

    /// Führt mutierende Commands auf dem State aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command<S>(
        &mut self,
        state: &mut PherogramState,
        sequence: &mut S,
        command: PherogramCommand,
    ) -> anyhow::Result<()>
    where
        S: EditableSequence + ?Sized,
    {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Verschiebungen ===
            PherogramCommand::AddOrMergeShift { anchor, delta } => {
                handlers::shifts::add_or_merge(state, anchor, delta)?
            }
            PherogramCommand::SetGapPattern { anchor, pattern } => {
                handlers::shifts::set_gap_pattern(state, anchor, pattern)?
            }
            PherogramCommand::RemoveShift { anchor } => handlers::shifts::remove(state, anchor),
            PherogramCommand::ClearShifts => handlers::shifts::clear(state),

            // === Cut-Fenster ===
            PherogramCommand::SetLeftCut { position } => {
                handlers::cut_window::set_left(state, sequence, position)?
            }
            PherogramCommand::SetRightCut { position } => {
                handlers::cut_window::set_right(state, sequence, position)?
            }
            PherogramCommand::SetFirstSeqPos { position } => {
                handlers::cut_window::set_first_seq_pos(state, position)
            }

            // === Synchronisation ===
            PherogramCommand::SetAutoSync { enabled } => {
                handlers::sync::set_auto_sync(state, enabled)
            }
            PherogramCommand::AttachRow { row } => handlers::sync::attach(state, row),
            PherogramCommand::DetachRow => handlers::sync::detach(state),
            PherogramCommand::ReconcileVisibleRange => handlers::sync::reconcile(state, sequence)?,

            // === Spaltenbreiten ===
            PherogramCommand::SetDefaultTokenWidth { width } => {
                handlers::rendering::set_default_token_width(state, width)?
            }
            PherogramCommand::SetColumnWidth { column, width } => {
                handlers::rendering::set_column_width(state, column, width)?
            }
        }

        Ok(())
    }
}
