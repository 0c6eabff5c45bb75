//! Pherogramm-Alignment Library.
//! Koordinaten-Mapping zwischen Trace-Raum und Alignment-Raum, Cut-Fenster,
//! Synchronisation der editierten Sequenz und Verzerrungsprofil.

pub mod app;
pub mod core;
pub mod shared;
pub mod xml;

pub use app::{
    ChangeBatch, CommandLog, CutOutcome, EditSynchronizer, EditableSequence, InMemoryAlignment,
    NotAppliedReason, PherogramCommand, PherogramController, PherogramEvent, PherogramState, RowId,
    SyncOutcome,
};
pub use core::{
    BaseCallTrace, CoordinateMapper, Corresponding, CutChange, CutDirection, CutSide, CutWindow,
    DistortionEntry, DistortionProfile, GapPattern, MappingError, OffsetTable, Relation,
    ShiftEvent, ShiftLedger, TraceSource,
};
pub use shared::EngineOptions;
pub use xml::{parse_pherogram_metadata, write_pherogram_metadata, PherogramMetadata};
