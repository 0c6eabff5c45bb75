//! Handler für Verschiebungen und Lückenmuster.

use crate::app::PherogramState;
use crate::core::GapPattern;

/// Fügt eine Verschiebung hinzu oder führt sie mit der am Anker zusammen.
pub fn add_or_merge(state: &mut PherogramState, anchor: usize, delta: i64) -> anyhow::Result<()> {
    match state.add_or_merge_shift(anchor, delta)? {
        Some(event) => log::info!("Verschiebung an {}: delta {}", event.anchor, event.delta),
        None => log::info!("Verschiebung an {} aufgehoben", anchor),
    }
    Ok(())
}

/// Hängt ein Lückenmuster an eine bestehende Einfügung.
pub fn set_gap_pattern(
    state: &mut PherogramState,
    anchor: usize,
    pattern: GapPattern,
) -> anyhow::Result<()> {
    let mask = pattern.to_mask();
    state.set_gap_pattern(anchor, pattern)?;
    log::info!("Lueckenmuster an {}: {}", anchor, mask);
    Ok(())
}

/// Entfernt die Verschiebung an einem Anker.
pub fn remove(state: &mut PherogramState, anchor: usize) {
    if state.remove_shift(anchor).is_none() {
        log::debug!("Keine Verschiebung an {}", anchor);
    }
}

/// Entfernt alle Verschiebungen.
pub fn clear(state: &mut PherogramState) {
    state.clear_shifts();
    log::info!("Alle Verschiebungen entfernt");
}
