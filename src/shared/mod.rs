//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die `app` und die Binary teilen.
pub mod options;

pub use options::EngineOptions;
