//! Reference loading from FASTA and FASTQ files using noodles.
//!
//! Supports both uncompressed and gzip/bgzip compressed files.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (FASTA)
//! - `.fq`, `.fastq` (FASTQ)
//! - any of the above followed by `.gz` or `.bgz`

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::{fasta, fastq};
use tracing::debug;

use crate::core::reference::Reference;
use crate::parsing::ParseError;
use crate::utils::validation::check_reference_limit;

/// ASCII offset of Phred+33 quality strings
pub const PHRED_OFFSET: i64 = 33;

/// Subtracted from the Phred score to give the position label
pub const LABEL_OFFSET: i64 = 15;

const FASTA_EXTENSIONS: &[&str] = &["fa", "fasta", "fna"];
const FASTQ_EXTENSIONS: &[&str] = &["fq", "fastq"];

/// Lowercased extension, looking through a trailing compression suffix
fn sequence_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    let name = name
        .strip_suffix(".gz")
        .or_else(|| name.strip_suffix(".bgz"))
        .unwrap_or(&name);
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_string())
}

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    sequence_extension(path).is_some_and(|ext| FASTA_EXTENSIONS.contains(&ext.as_str()))
}

/// Check if the path has a FASTQ extension
pub fn is_fastq_file(path: &Path) -> bool {
    sequence_extension(path).is_some_and(|ext| FASTQ_EXTENSIONS.contains(&ext.as_str()))
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub(crate) fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a file for buffered reading, decompressing gzip/bgzip by extension
pub(crate) fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Load the reference records for a run.
///
/// In numbered mode the file must be FASTQ so that every base carries a
/// position label. Otherwise FASTA or FASTQ are accepted and references use
/// sequential numbering.
///
/// # Errors
///
/// Returns `ParseError::UnsupportedFormat` for unknown extensions,
/// `ParseError::InvalidFormat` if numbered mode is requested with a FASTA file
/// or the file holds no sequences, and IO/noodles errors from reading.
pub fn load_references(path: &Path, numbered: bool) -> Result<Vec<Reference>, ParseError> {
    let references = if is_fastq_file(path) {
        parse_fastq_file(path, numbered)?
    } else if is_fasta_file(path) {
        if numbered {
            return Err(ParseError::InvalidFormat(format!(
                "Numbered mode needs position labels from a FASTQ file, got {}",
                path.display()
            )));
        }
        parse_fasta_file(path)?
    } else {
        return Err(ParseError::UnsupportedFormat(path.display().to_string()));
    };

    debug!(
        "Loaded {} references from {}",
        references.len(),
        path.display()
    );
    Ok(references)
}

/// Parse a FASTA file into unlabeled references
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, or `ParseError::InvalidFormat` if no sequences are found.
pub fn parse_fasta_file(path: &Path) -> Result<Vec<Reference>, ParseError> {
    let mut reader = fasta::io::Reader::new(open_reader(path)?);
    parse_fasta_reader(&mut reader)
}

/// Parse from a noodles FASTA reader
fn parse_fasta_reader<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<Reference>, ParseError> {
    let mut references = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if let Some(msg) = check_reference_limit(references.len()) {
            return Err(ParseError::InvalidFormat(msg));
        }

        let name = String::from_utf8_lossy(record.name()).to_string();
        let sequence: &[u8] = record.sequence().as_ref();
        references.push(Reference::new(name, sequence));
    }

    if references.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(references)
}

/// Parse a FASTQ file, decoding position labels from the quality string when `labeled`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, or `ParseError::InvalidFormat` if no sequences are found or
/// a quality string does not match its sequence length.
pub fn parse_fastq_file(path: &Path, labeled: bool) -> Result<Vec<Reference>, ParseError> {
    let mut reader = fastq::io::Reader::new(open_reader(path)?);
    parse_fastq_reader(&mut reader, labeled)
}

/// Parse from a noodles FASTQ reader
fn parse_fastq_reader<R: BufRead>(
    reader: &mut fastq::io::Reader<R>,
    labeled: bool,
) -> Result<Vec<Reference>, ParseError> {
    let mut references = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTQ record: {e}")))?;

        if let Some(msg) = check_reference_limit(references.len()) {
            return Err(ParseError::InvalidFormat(msg));
        }

        let name = String::from_utf8_lossy(record.name()).to_string();
        let sequence = record.sequence();
        let qualities = record.quality_scores();

        if qualities.len() != sequence.len() {
            return Err(ParseError::InvalidFormat(format!(
                "Record {name} has {} quality scores for {} bases",
                qualities.len(),
                sequence.len()
            )));
        }

        let mut reference = Reference::new(name, sequence);
        if labeled {
            reference = reference.with_labels(decode_labels(qualities));
        }
        references.push(reference);
    }

    if references.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTQ file".to_string(),
        ));
    }

    Ok(references)
}

/// Position labels encoded in a Phred+33 quality string
#[must_use]
pub fn decode_labels(qualities: &[u8]) -> Vec<i64> {
    qualities
        .iter()
        .map(|&q| i64::from(q) - PHRED_OFFSET - LABEL_OFFSET)
        .collect()
}
