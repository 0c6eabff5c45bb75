//! Core-Domänentypen: Shift-Ledger, Cut-Fenster, Koordinaten-Mapper und
//! Verzerrungsprofil.

pub mod cut_window;
pub mod distortion;
pub mod error;
pub mod gap_pattern;
/// Relationsabfragen zwischen Trace- und Alignment-Raum
pub mod mapper;
pub mod relation;
pub mod shift_ledger;
pub mod trace;

pub use cut_window::{CutChange, CutDirection, CutSide, CutWindow};
pub use distortion::{DistortionEntry, DistortionProfile};
pub use error::MappingError;
pub use gap_pattern::GapPattern;
pub use mapper::{CoordinateMapper, OffsetTable};
pub use relation::{Corresponding, Relation};
pub use shift_ledger::{ShiftEvent, ShiftLedger};
pub use trace::{BaseCallTrace, TraceSource};
