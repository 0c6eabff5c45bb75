//! pherogram-inspect: gibt die Trace→Alignment-Relationen einer angehängten Trace aus.

use anyhow::{Context, Result};
use clap::Parser;
use pherogram_align::xml::load_metadata_file;
use pherogram_align::{
    BaseCallTrace, EditableSequence, EngineOptions, InMemoryAlignment, PherogramState, Relation,
    RowId,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pherogram-inspect",
    about = "Relationstabelle einer angehaengten Trace",
    version
)]
struct Cli {
    /// XML-Datei mit dem <pherogramAlignment>-Block
    #[arg(long)]
    metadata: PathBuf,

    /// Base-Call-Sequenz der Trace
    #[arg(long)]
    base_calls: String,

    /// Optionen-Datei (Standard: pherogram_align.toml neben der Binary)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Samples pro Base-Call der synthetischen Trace
    #[arg(long, default_value = "10")]
    samples_per_base: usize,

    /// Ausgabe als JSON
    #[arg(long)]
    json: bool,

    /// Zusätzlich die synchronisierte Alignment-Zeile ausgeben
    #[arg(long)]
    show_row: bool,
}

#[derive(Serialize)]
struct Report {
    relations: Vec<RelationRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aligned_row: Option<String>,
}

#[derive(Serialize)]
struct RelationRow {
    trace_index: usize,
    base_call: char,
    relation: Relation,
    paint_center_x: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    log::info!("pherogram-inspect v{} startet...", env!("CARGO_PKG_VERSION"));

    let options_path = cli.options.unwrap_or_else(EngineOptions::config_path);
    let options = EngineOptions::load_from_file(&options_path);

    let metadata = load_metadata_file(&cli.metadata)?;
    let trace = BaseCallTrace::evenly_spaced(&cli.base_calls, cli.samples_per_base);
    let mut state = PherogramState::from_metadata(trace, &metadata, options)
        .context("Metadaten passen nicht zur Base-Call-Sequenz")?;

    let report = Report {
        relations: collect_rows(&mut state)?,
        aligned_row: if cli.show_row {
            Some(synced_row(&mut state)?)
        } else {
            None
        },
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for row in &report.relations {
            println!(
                "{:>6}  {}  {}",
                row.trace_index,
                row.base_call,
                describe(&row.relation)
            );
        }
        if let Some(aligned) = &report.aligned_row {
            println!("Zeile: {}", aligned);
        }
    }
    Ok(())
}

/// Schreibt die sichtbaren Base-Calls in eine leere Zeile und gibt sie als Text zurück.
fn synced_row(state: &mut PherogramState) -> Result<String> {
    const ROW: RowId = RowId(0);
    let mut alignment = InMemoryAlignment::from_options([""], &state.options);
    state.attach_row(ROW);
    state.reconcile_visible_range(&mut alignment)?;
    let columns = state.with_mapper(|m| m.visible_columns())?;
    Ok(alignment.render(ROW, 0..columns.end))
}

fn collect_rows(state: &mut PherogramState) -> Result<Vec<RelationRow>> {
    let len = state.trace().sequence_length();
    let bases: Vec<char> = (0..len)
        .map(|t| state.trace().base_call(t).map_or('?', char::from))
        .collect();
    let relations = state.with_mapper(|m| {
        (0..len)
            .map(|t| m.to_alignment_index(t))
            .collect::<Vec<_>>()
    })?;
    let profile = state.rebuild_distortion_profile()?;

    Ok(relations
        .into_iter()
        .zip(bases)
        .enumerate()
        .map(|(trace_index, (relation, base_call))| RelationRow {
            trace_index,
            base_call,
            relation,
            paint_center_x: profile.entry(trace_index).map(|e| e.paint_center_x),
        })
        .collect())
}

fn describe(relation: &Relation) -> String {
    match relation {
        Relation::OutOfRange => "ausserhalb".to_string(),
        Relation::Position {
            before,
            after,
            corresponding,
        } => match corresponding.index() {
            Some(column) => format!("Spalte {}", column),
            None => format!("Luecke zwischen {} und {}", before, after),
        },
    }
}
