//! Feature-Handler für PherogramCommand-Verarbeitung.
//!
//! Jeder Handler gruppiert die Command-Ausführung eines Feature-Bereichs.
//! Der Controller dispatcht an die passende Handler-Funktion.

pub mod cut_window;
pub mod rendering;
pub mod shifts;
pub mod sync;
