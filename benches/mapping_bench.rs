use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pherogram_align::{
    BaseCallTrace, CoordinateMapper, CutWindow, DistortionProfile, OffsetTable, ShiftLedger,
};
use std::hint::black_box;

/// Synthetischer Ledger mit abwechselnden Einfügungen und Kompressionen.
fn build_synthetic_ledger(trace_length: usize, every: usize) -> ShiftLedger {
    let mut ledger = ShiftLedger::new(trace_length);
    for (i, anchor) in (every..trace_length.saturating_sub(4)).step_by(every).enumerate() {
        let delta = if i % 2 == 0 { 2 } else { -2 };
        ledger
            .add_or_merge_shift(anchor, delta)
            .expect("synthetische Verschiebung gueltig");
    }
    ledger
}

fn bench_relation_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("relation_queries");

    for &trace_length in &[1_000usize, 20_000usize] {
        let ledger = build_synthetic_ledger(trace_length, 7);
        let table = OffsetTable::from_ledger(&ledger);
        let window = CutWindow::with_bounds(trace_length, 10, trace_length - 10, 0)
            .expect("gueltiges Fenster");
        let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Laenge");
        let columns = mapper.visible_columns();

        group.bench_with_input(
            BenchmarkId::new("to_alignment_index", trace_length),
            &mapper,
            |b, mapper| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for t in (0..trace_length).step_by(3) {
                        if !mapper.to_alignment_index(black_box(t)).is_out_of_range() {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("to_trace_index", trace_length),
            &mapper,
            |b, mapper| {
                b.iter(|| {
                    let mut gaps = 0usize;
                    for column in columns.clone().step_by(3) {
                        if mapper.to_trace_index(black_box(column)).is_gap() {
                            gaps += 1;
                        }
                    }
                    black_box(gaps)
                })
            },
        );
    }

    group.finish();
}

fn bench_rebuilds(c: &mut Criterion) {
    let trace_length = 20_000usize;
    let ledger = build_synthetic_ledger(trace_length, 7);
    let sequence: String = "ACGT".chars().cycle().take(trace_length).collect();
    let trace = BaseCallTrace::evenly_spaced(&sequence, 12);

    c.bench_function("offset_table_rebuild", |b| {
        b.iter(|| black_box(OffsetTable::from_ledger(black_box(&ledger))))
    });

    let table = OffsetTable::from_ledger(&ledger);
    let window = CutWindow::new(trace_length);
    let mapper = CoordinateMapper::new(&table, &window).expect("gleiche Laenge");
    c.bench_function("distortion_profile_rebuild", |b| {
        b.iter(|| black_box(DistortionProfile::rebuild(&mapper, &trace, |_| 10.0).len()))
    });
}

criterion_group!(benches, bench_relation_queries, bench_rebuilds);
criterion_main!(benches);
