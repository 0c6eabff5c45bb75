//! Application-Layer: State, Controller, Commands/Events und Synchronisation.

pub mod batch;
pub mod command_log;
pub mod controller;
pub mod editable;
pub mod events;
pub mod handlers;
/// Pherogramm-State und Caches
pub mod state;
pub mod sync;

pub use batch::ChangeBatch;
pub use command_log::CommandLog;
pub use controller::PherogramController;
pub use editable::{EditableSequence, InMemoryAlignment, RowId};
pub use events::{PherogramCommand, PherogramEvent};
pub use state::{CutOutcome, PherogramState};
pub use sync::{EditSynchronizer, NotAppliedReason, PlannedToken, SyncOutcome, WritePlan};
