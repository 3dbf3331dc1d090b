//! Readers and writers for the files around the matching engine.
//!
//! - **Reference files**: FASTA for sequential numbering, FASTQ when base
//!   positions are labeled through the quality string
//! - **Query tables**: tab-delimited tables with a `seq` column, written back
//!   out with an `annotation` column inserted
//!
//! ## Example
//!
//! ```rust,no_run
//! use variant_annotator::parsing::fasta::load_references;
//! use variant_annotator::parsing::tsv::parse_query_table_file;
//! use std::path::Path;
//!
//! let references = load_references(Path::new("variants.fa"), false).unwrap();
//! let table = parse_query_table_file(Path::new("reads.tsv"), false).unwrap();
//! ```
//!
//! ## Position labels
//!
//! In numbered mode each base's label is stored in the quality string of a
//! FASTQ reference: label = Phred quality - 15, i.e. `byte - 33 - 15`.

use thiserror::Error;

pub mod fasta;
pub mod tsv;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),
}
