use pherogram_align::{
    BaseCallTrace, EditableSequence, EngineOptions, InMemoryAlignment, NotAppliedReason,
    PherogramCommand, PherogramController, PherogramEvent, PherogramState, Relation, RowId,
    SyncOutcome,
};

const ROW: RowId = RowId(0);

fn setup() -> (PherogramController, PherogramState, InMemoryAlignment) {
    let state = PherogramState::new(
        BaseCallTrace::evenly_spaced("acgtacgtac", 10),
        EngineOptions::default(),
    );
    (
        PherogramController::new(),
        state,
        InMemoryAlignment::new(1, '-'),
    )
}

fn run(
    controller: &mut PherogramController,
    state: &mut PherogramState,
    alignment: &mut InMemoryAlignment,
    command: PherogramCommand,
) {
    controller
        .handle_command(state, alignment, command)
        .expect("Command sollte ohne Fehler durchlaufen");
}

#[test]
fn test_rejected_shift_is_logged_and_propagated() {
    let (mut controller, mut state, mut alignment) = setup();

    let result = controller.handle_command(
        &mut state,
        &mut alignment,
        PherogramCommand::AddOrMergeShift {
            anchor: 50,
            delta: 1,
        },
    );

    assert!(result.is_err());
    assert_eq!(state.ledger().len(), 0);
    let last = state
        .command_log
        .entries()
        .last()
        .expect("Es sollte ein Command geloggt sein");
    match last {
        PherogramCommand::AddOrMergeShift { anchor, .. } => assert_eq!(*anchor, 50),
        other => panic!("Unerwarteter letzter Command: {other:?}"),
    }
}

#[test]
fn test_right_cut_narrow_then_widen_restores_row() {
    let (mut controller, mut state, mut alignment) = setup();
    run(&mut controller, &mut state, &mut alignment, PherogramCommand::AttachRow { row: ROW });
    run(&mut controller, &mut state, &mut alignment, PherogramCommand::ReconcileVisibleRange);
    assert_eq!(alignment.row_text(ROW).as_deref(), Some("ACGTACGTAC"));

    run(&mut controller, &mut state, &mut alignment, PherogramCommand::SetRightCut { position: 7 });
    assert_eq!(alignment.row_text(ROW).as_deref(), Some("ACGTACG---"));
    assert_eq!(state.to_alignment_index(8).expect("Mapping"), Relation::OutOfRange);

    run(&mut controller, &mut state, &mut alignment, PherogramCommand::SetRightCut { position: 10 });
    assert_eq!(alignment.row_text(ROW).as_deref(), Some("ACGTACGTAC"));
}

#[test]
fn test_left_widening_fills_every_newly_visible_base() {
    let (mut controller, mut state, mut alignment) = setup();
    run(&mut controller, &mut state, &mut alignment, PherogramCommand::AttachRow { row: ROW });
    run(
        &mut controller,
        &mut state,
        &mut alignment,
        PherogramCommand::AddOrMergeShift { anchor: 3, delta: 2 },
    );
    run(&mut controller, &mut state, &mut alignment, PherogramCommand::ReconcileVisibleRange);
    assert_eq!(alignment.row_text(ROW).as_deref(), Some("ACGT--ACGTAC"));

    run(&mut controller, &mut state, &mut alignment, PherogramCommand::SetLeftCut { position: 6 });
    assert_eq!(state.window().first_seq_pos(), 8);

    // Vom Host überschriebene Spalten
    alignment
        .set_tokens_at(ROW, 0, &['x'; 8])
        .expect("Zeile beschreibbar");

    run(&mut controller, &mut state, &mut alignment, PherogramCommand::SetLeftCut { position: 0 });
    assert_eq!(state.window().first_seq_pos(), 0);

    for t in 0..6 {
        let Relation::Position { corresponding, .. } =
            state.to_alignment_index(t).expect("Mapping")
        else {
            panic!("Trace {t} sollte sichtbar sein");
        };
        let column = corresponding.index().expect("keine reine Luecke");
        let expected = state
            .trace()
            .base_call(t)
            .map(|b| b.to_ascii_uppercase() as char);
        assert_eq!(alignment.token_at(ROW, column), expected, "Trace {t}");
    }
    // Lücken-Spalten des Spans bleiben unberührt
    assert_eq!(alignment.token_at(ROW, 4), Some('x'));
    assert_eq!(alignment.token_at(ROW, 5), Some('x'));
}

#[test]
fn test_left_cut_past_right_pushes_right() {
    let (mut controller, mut state, mut alignment) = setup();
    run(&mut controller, &mut state, &mut alignment, PherogramCommand::SetRightCut { position: 5 });
    state.drain_events();

    run(&mut controller, &mut state, &mut alignment, PherogramCommand::SetLeftCut { position: 8 });

    assert_eq!(state.window().left(), 8);
    assert_eq!(state.window().right(), 8);
    let cut_changes = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PherogramEvent::CutChanged(_)))
        .count();
    assert_eq!(cut_changes, 2);
}

#[test]
fn test_detached_row_reports_not_applied() {
    let (mut controller, mut state, mut alignment) = setup();
    run(&mut controller, &mut state, &mut alignment, PherogramCommand::AttachRow { row: ROW });
    run(&mut controller, &mut state, &mut alignment, PherogramCommand::DetachRow);
    run(&mut controller, &mut state, &mut alignment, PherogramCommand::SetRightCut { position: 4 });

    let synced: Vec<SyncOutcome> = state
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            PherogramEvent::Synced { outcome, .. } => Some(outcome),
            _ => None,
        })
        .collect();
    assert_eq!(
        synced,
        vec![SyncOutcome::NotApplied(NotAppliedReason::Detached)]
    );
    assert_eq!(alignment.row_text(ROW).as_deref(), Some(""));
}

#[test]
fn test_command_batch_recomputes_once() {
    let (mut controller, mut state, mut alignment) = setup();

    controller
        .handle_commands(
            &mut state,
            &mut alignment,
            [
                PherogramCommand::AddOrMergeShift { anchor: 2, delta: 1 },
                PherogramCommand::AddOrMergeShift { anchor: 7, delta: -1 },
                PherogramCommand::SetFirstSeqPos { position: 2 },
                PherogramCommand::SetLeftCut { position: 1 },
            ],
        )
        .expect("Batch sollte durchlaufen");

    assert_eq!(state.recompute_count(), 1);
    assert_eq!(state.command_log.len(), 4);
    let recomputed = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PherogramEvent::Recomputed { .. }))
        .count();
    assert_eq!(recomputed, 1);
    assert_eq!(state.window().first_seq_pos(), 3);
}

#[test]
fn test_invalid_token_width_is_rejected() {
    let (mut controller, mut state, mut alignment) = setup();
    let result = controller.handle_command(
        &mut state,
        &mut alignment,
        PherogramCommand::SetDefaultTokenWidth { width: 0.0 },
    );
    assert!(result.is_err());
}
