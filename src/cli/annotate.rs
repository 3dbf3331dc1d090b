use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{load_reference_set, MatchingArgs};
use crate::matching::batch::{annotate_batch, BatchSummary};
use crate::matching::engine::MatchingEngine;
use crate::parsing::tsv::{parse_query_table_file, write_annotated_table};

#[derive(Args)]
pub struct AnnotateArgs {
    /// Reference sequences (FASTA, or FASTQ with --numbered)
    #[arg(required = true)]
    pub references: PathBuf,

    /// Tab-delimited query table with a 'seq' column
    #[arg(required = true)]
    pub queries: PathBuf,

    /// Output table path
    #[arg(required = true)]
    pub output: PathBuf,

    #[command(flatten)]
    pub matching: MatchingArgs,

    /// Append the value of the 'count' column to each annotation
    #[arg(short, long)]
    pub count: bool,

    /// Number of worker threads
    #[arg(short = 'n', long, default_value = "1")]
    pub threads: usize,

    /// Column index at which the annotation column is inserted
    #[arg(short, long, default_value = "0")]
    pub out_col: usize,
}

/// Execute annotate subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be parsed or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AnnotateArgs, verbose: bool) -> anyhow::Result<()> {
    let references = load_reference_set(&args.references, args.matching.numbered)?;
    let config = args.matching.to_config();

    let table = parse_query_table_file(&args.queries, args.count)
        .with_context(|| format!("Failed to read query table {}", args.queries.display()))?;
    info!(
        "Read {} queries from {}",
        table.len(),
        args.queries.display()
    );

    let engine = MatchingEngine::new(&references, config);
    let results = annotate_batch(&engine, &table.sequences(), args.threads)?;

    let counts = if args.count { table.counts() } else { None };
    let annotations: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let count = counts.as_ref().map_or("", |c| c[i]);
            result.to_annotation().with_count(count).to_string()
        })
        .collect();

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    write_annotated_table(&mut writer, &table, &annotations, args.out_col)?;

    let summary = BatchSummary::from_results(&results);
    info!(
        "Wrote {} annotations to {}",
        summary.total,
        args.output.display()
    );
    if verbose {
        eprintln!(
            "{} queries: {} exact, {} approximate ({} tied), {} unresolved",
            summary.total, summary.exact, summary.approximate, summary.tied, summary.unresolved
        );
    }
    if summary.aligner_failures > 0 {
        eprintln!(
            "Warning: {} queries could not be aligned and were left unresolved",
            summary.aligner_failures
        );
    }

    Ok(())
}
