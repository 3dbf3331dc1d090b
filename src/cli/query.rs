use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_reference_set, MatchingArgs, OutputFormat};
use crate::matching::batch::annotate_batch;
use crate::matching::engine::{MatchResult, MatchingEngine};

#[derive(Args)]
pub struct QueryArgs {
    /// Reference sequences (FASTA, or FASTQ with --numbered)
    #[arg(required = true)]
    pub references: PathBuf,

    /// Sequences to annotate
    #[arg(required = true)]
    pub sequences: Vec<String>,

    #[command(flatten)]
    pub matching: MatchingArgs,

    /// Number of worker threads
    #[arg(short = 'n', long, default_value = "1")]
    pub threads: usize,
}

/// Execute query subcommand
///
/// # Errors
///
/// Returns an error if the references cannot be loaded or output fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: QueryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let references = load_reference_set(&args.references, args.matching.numbered)?;
    let config = args.matching.to_config();

    if verbose {
        eprintln!(
            "Matching {} sequences against {} references ({} mode)",
            args.sequences.len(),
            references.len(),
            config.mode
        );
    }

    let engine = MatchingEngine::new(&references, config);
    let results = annotate_batch(&engine, &args.sequences, args.threads)?;

    match format {
        OutputFormat::Text => print_text_results(&args.sequences, &results),
        OutputFormat::Json => print_json_results(&args.sequences, &results)?,
        OutputFormat::Tsv => print_tsv_results(&args.sequences, &results),
    }

    Ok(())
}

fn print_text_results(sequences: &[String], results: &[MatchResult]) {
    for (sequence, result) in sequences.iter().zip(results) {
        println!("{sequence}");
        match result {
            MatchResult::Exact { reference } => {
                println!("  Reference:  {reference} (exact)");
            }
            MatchResult::Approximate {
                reference,
                distance,
                differences,
                tied,
            } => {
                println!("  Reference:  {reference} (distance {distance})");
                println!(
                    "  Changes:    {} mismatches, {} insertions, {} deletions",
                    differences.mismatches.len(),
                    differences.insertions.len(),
                    differences.deletions.len()
                );
                if !tied.is_empty() {
                    let others: Vec<String> = tied.iter().map(ToString::to_string).collect();
                    println!("  Tied with:  {}", others.join(", "));
                }
            }
            MatchResult::Unresolved { reason } => {
                println!("  Reference:  none ({reason})");
            }
        }
        println!("  Annotation: {}", result.to_annotation());
        println!();
    }
}

fn print_json_results(sequences: &[String], results: &[MatchResult]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = sequences
        .iter()
        .zip(results)
        .map(|(sequence, result)| {
            serde_json::json!({
                "query": sequence,
                "result": result,
                "annotation": result.to_annotation().to_string(),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(sequences: &[String], results: &[MatchResult]) {
    println!("query\treference\tdistance\ttied\tannotation");
    for (sequence, result) in sequences.iter().zip(results) {
        let (distance, tied) = match result {
            MatchResult::Exact { .. } => ("0".to_string(), String::new()),
            MatchResult::Approximate { distance, tied, .. } => (
                distance.to_string(),
                tied.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            MatchResult::Unresolved { .. } => ("NA".to_string(), String::new()),
        };
        println!(
            "{}\t{}\t{}\t{}\t{}",
            sequence,
            result.reference().map_or("NA", |r| r.as_str()),
            distance,
            tied,
            result.to_annotation()
        );
    }
}
