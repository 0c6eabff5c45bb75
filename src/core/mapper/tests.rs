use super::*;
use crate::core::Corresponding;

fn setup(pairs: &[(usize, i64)], len: usize) -> (ShiftLedger, CutWindow) {
    let ledger = ShiftLedger::from_pairs(len, pairs.iter().copied()).expect("gueltige Paare");
    (ledger, CutWindow::new(len))
}

#[test]
fn test_identity_mapping_without_shifts() {
    let (ledger, window) = setup(&[], 10);
    let table = OffsetTable::from_ledger(&ledger);
    let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Trace");

    assert_eq!(mapper.to_alignment_index(5), Relation::direct(5));
    assert_eq!(mapper.to_trace_index(5), Relation::direct(5));
    assert_eq!(mapper.visible_columns(), 0..10);
}

#[test]
fn test_insertion_with_trailing_gaps() {
    let (mut ledger, window) = setup(&[], 10);
    ledger.add_or_merge_shift(5, 2).expect("gueltig");
    ledger
        .set_gap_pattern(5, GapPattern::with_gaps_at(3, &[1, 2]))
        .expect("Muster passt");
    let table = OffsetTable::from_ledger(&ledger);
    let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Trace");

    assert_eq!(mapper.to_alignment_index(5), Relation::direct(5));
    assert_eq!(mapper.to_alignment_index(6), Relation::direct(8));
    assert_eq!(mapper.to_trace_index(6), Relation::gap(5, 6));
    assert_eq!(mapper.to_trace_index(7), Relation::gap(5, 6));
    assert_eq!(mapper.to_trace_index(8), Relation::direct(6));
    assert_eq!(mapper.column_span(5), Some(5..8));
}

#[test]
fn test_insertion_with_leading_gaps_moves_anchor_column() {
    let (mut ledger, window) = setup(&[], 10);
    ledger.add_or_merge_shift(3, 2).expect("gueltig");
    ledger
        .set_gap_pattern(3, GapPattern::with_gaps_at(3, &[0, 2]))
        .expect("Muster passt");
    let table = OffsetTable::from_ledger(&ledger);
    let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Trace");

    assert_eq!(mapper.to_alignment_index(3), Relation::direct(4));
    // Spalte 3: Lücke vor der Base -> Nachbarn sind Trace 2 und der Anker
    assert_eq!(mapper.to_trace_index(3), Relation::gap(2, 3));
    assert_eq!(mapper.to_trace_index(4), Relation::direct(3));
    // Spalte 5: Lücke nach der Base -> Nachbarn sind Anker und Trace 4
    assert_eq!(mapper.to_trace_index(5), Relation::gap(3, 4));
}

#[test]
fn test_all_gap_span_maps_trace_index_to_gap() {
    let (mut ledger, window) = setup(&[], 10);
    ledger.add_or_merge_shift(4, 1).expect("gueltig");
    ledger
        .set_gap_pattern(4, GapPattern::with_gaps_at(2, &[0, 1]))
        .expect("Muster passt");
    let table = OffsetTable::from_ledger(&ledger);
    let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Trace");

    assert_eq!(mapper.to_alignment_index(4), Relation::gap(3, 6));
    assert_eq!(mapper.to_trace_index(4), Relation::gap(3, 5));
}

#[test]
fn test_compression_shares_one_column() {
    let (ledger, window) = setup(&[(5, -2)], 10);
    let table = OffsetTable::from_ledger(&ledger);
    let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Trace");

    for t in 5..=7 {
        assert_eq!(
            mapper.to_alignment_index(t).corresponding_index(),
            Some(5),
            "Trace {} muss auf Spalte 5 liegen",
            t
        );
    }
    assert_eq!(mapper.to_alignment_index(8), Relation::direct(6));
    assert_eq!(
        mapper.to_trace_index(5),
        Relation::Position {
            before: 5,
            after: 7,
            corresponding: Corresponding::Index(5)
        }
    );
    assert_eq!(mapper.to_trace_index(6), Relation::direct(8));
}

#[test]
fn test_out_of_range_outside_window() {
    let ledger = ShiftLedger::new(20);
    let window = CutWindow::with_bounds(20, 4, 12, 10).expect("gueltig");
    let table = OffsetTable::from_ledger(&ledger);
    let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Trace");

    assert!(mapper.to_alignment_index(3).is_out_of_range());
    assert!(mapper.to_alignment_index(12).is_out_of_range());
    assert_eq!(mapper.to_alignment_index(4), Relation::direct(10));
    assert!(mapper.to_trace_index(9).is_out_of_range());
    assert!(mapper.to_trace_index(18).is_out_of_range());
    assert_eq!(mapper.to_trace_index(17), Relation::direct(11));
}

#[test]
fn test_events_left_of_window_do_not_move_first_column() {
    let ledger = ShiftLedger::from_pairs(20, [(1, 3), (6, -2)]).expect("gueltig");
    // Kompression 6..=8 wird vom linken Cut bei 7 angeschnitten
    let window = CutWindow::with_bounds(20, 7, 20, 0).expect("gueltig");
    let table = OffsetTable::from_ledger(&ledger);
    let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Trace");

    assert_eq!(mapper.to_alignment_index(7), Relation::direct(0));
    assert_eq!(mapper.to_alignment_index(8), Relation::direct(0));
    assert_eq!(mapper.to_alignment_index(9), Relation::direct(1));
    assert_eq!(
        mapper.to_trace_index(0),
        Relation::Position {
            before: 7,
            after: 8,
            corresponding: Corresponding::Index(7)
        }
    );
}

#[test]
fn test_empty_window_maps_nothing() {
    let ledger = ShiftLedger::new(10);
    let window = CutWindow::with_bounds(10, 4, 4, 2).expect("gueltig");
    let table = OffsetTable::from_ledger(&ledger);
    let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Trace");

    assert!(mapper.to_alignment_index(4).is_out_of_range());
    assert!(mapper.to_trace_index(2).is_out_of_range());
    assert_eq!(mapper.visible_columns(), 2..2);
}

#[test]
fn test_mismatched_trace_length_is_rejected() {
    let ledger = ShiftLedger::new(10);
    let window = CutWindow::new(11);
    let table = OffsetTable::from_ledger(&ledger);
    assert!(matches!(
        CoordinateMapper::new(&table, &window),
        Err(MappingError::TraceLengthMismatch {
            ledger: 10,
            window: 11
        })
    ));
}

#[test]
fn test_table_tracks_ledger_version() {
    let mut ledger = ShiftLedger::new(10);
    let table = OffsetTable::from_ledger(&ledger);
    assert!(table.is_current(&ledger));
    ledger.add_or_merge_shift(2, 1).expect("gueltig");
    assert!(!table.is_current(&ledger));
    assert_eq!(OffsetTable::from_ledger(&ledger).ledger_version(), 1);
}

#[test]
fn test_table_offsets_match_ledger() {
    let (ledger, _) = setup(&[(2, 3), (10, -2), (20, 1)], 30);
    let table = OffsetTable::from_ledger(&ledger);
    for t in 0..=30 {
        assert_eq!(
            table.cumulative_offset_before(t),
            ledger.cumulative_offset_before(t),
            "Offset vor {}",
            t
        );
    }
    // Ausserhalb von Kompressionslaeufen ist die Spalte t + Offset
    assert_eq!(table.column(15), 15 + ledger.cumulative_offset_before(15));
    assert_eq!(table.compression_run(11), Some(ShiftEvent::new(10, -2)));
    assert_eq!(table.compression_run(13), None);
}
