//! Command-line tests for the `annotate` and `query` subcommands.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REFERENCES_FASTA: &str = ">WT\nACGTACGT\n>A4T\nACGAACGT\n";

/// Labels 2..=9 from quality characters '2'..='9'
const REFERENCES_FASTQ: &str = "@WT\nACGTACGT\n+\n23456789\n@A4T\nACGAACGT\n+\n23456789\n";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn annotator() -> Command {
    Command::cargo_bin("variant-annotator").unwrap()
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_annotate_mismatch_only() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);
    let queries = write(
        &dir,
        "queries.tsv",
        "barcode\tseq\nb1\tACGTACGT\nb2\tACGTACGA\nb3\tACG\n",
    );
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .assert()
        .success();

    assert_eq!(
        read_lines(&output),
        vec![
            "annotation\tbarcode\tseq",
            "WT:0:0:0::::\tb1\tACGTACGT",
            "WT:1:0:0:T8A:::\tb2\tACGTACGA",
            "NA:nan:nan:nan::::\tb3\tACG",
        ]
    );
}

#[test]
fn test_annotate_with_count_as_last_column() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);
    let queries = write(
        &dir,
        "queries.tsv",
        "barcode\tseq\tcount\nb1\tacgaacgt\t12\nb2\tACGTACGA\t7\n",
    );
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .args(["-c", "-o", "99"])
        .assert()
        .success();

    assert_eq!(
        read_lines(&output),
        vec![
            "barcode\tseq\tcount\tannotation",
            "b1\tacgaacgt\t12\tA4T:0:0:0::::12",
            "b2\tACGTACGA\t7\tWT:1:0:0:T8A:::7",
        ]
    );
}

#[test]
fn test_annotate_count_requires_column() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);
    let queries = write(&dir, "queries.tsv", "seq\nACGTACGT\n");
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .arg("--count")
        .assert()
        .failure()
        .stderr(predicate::str::contains("count"));
}

#[test]
fn test_annotate_indel() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);
    let queries = write(&dir, "queries.tsv", "seq\nACGTGACGT\nACGACGT\n");
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .arg("--indel")
        .assert()
        .success();

    let lines = read_lines(&output);
    assert_eq!(lines[1], "WT:0:1:0::-5G::\tACGTGACGT");
    // One deletion from either reference; the tie goes to the lower ID
    assert!(lines[2].starts_with("A4T:0:0:1:::"), "got {}", lines[2]);
}

#[test]
fn test_annotate_mismatch_cutoff() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);
    let queries = write(&dir, "queries.tsv", "seq\nACGTACGA\nTTGTACGA\n");
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .args(["-m", "1"])
        .assert()
        .success();

    let lines = read_lines(&output);
    assert_eq!(lines[1], "WT:1:0:0:T8A:::\tACGTACGA");
    assert_eq!(lines[2], "NA:nan:nan:nan::::\tTTGTACGA");
}

#[test]
fn test_annotate_numbered_positions() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fq", REFERENCES_FASTQ);
    let queries = write(&dir, "queries.tsv", "seq\nACGTACGA\n");
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .arg("-q")
        .assert()
        .success();

    assert_eq!(read_lines(&output)[1], "WT:1:0:0:T9A:::\tACGTACGA");
}

#[test]
fn test_annotate_start_position() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);
    let queries = write(&dir, "queries.tsv", "seq\nTCGTACGT\n");
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .args(["-s", "-3"])
        .assert()
        .success();

    assert_eq!(read_lines(&output)[1], "WT:1:0:0:A-3T:::\tTCGTACGT");
}

#[test]
fn test_numbered_mode_rejects_fasta() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);
    let queries = write(&dir, "queries.tsv", "seq\nACGTACGA\n");
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .arg("--numbered")
        .assert()
        .failure()
        .stderr(predicate::str::contains("FASTQ"));
}

#[test]
fn test_duplicate_reference_ids_fail() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", ">WT\nACGT\n>WT\nACGA\n");
    let queries = write(&dir, "queries.tsv", "seq\nACGT\n");
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WT"));
}

#[test]
fn test_indel_conflicts_with_cutoff() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);

    annotator()
        .arg("query")
        .arg(&refs)
        .arg("ACGT")
        .args(["-i", "-m", "2"])
        .assert()
        .failure();
}

#[test]
fn test_threads_preserve_row_order() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);

    let mut table = String::from("id\tseq\n");
    for i in 0..200 {
        let seq = if i % 2 == 0 { "ACGTACGT" } else { "ACGAACGT" };
        table.push_str(&format!("{i}\t{seq}\n"));
    }
    let queries = write(&dir, "queries.tsv", &table);
    let output = dir.path().join("out.tsv");

    annotator()
        .arg("annotate")
        .arg(&refs)
        .arg(&queries)
        .arg(&output)
        .args(["-n", "4"])
        .assert()
        .success();

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 201);
    for (i, line) in lines[1..].iter().enumerate() {
        let expected = if i % 2 == 0 { "WT:" } else { "A4T:" };
        assert!(line.starts_with(expected), "row {i}: {line}");
        assert!(line.contains(&format!("\t{i}\t")), "row {i}: {line}");
    }
}

#[test]
fn test_query_json() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);

    annotator()
        .arg("query")
        .arg(&refs)
        .args(["ACGTACGA", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"annotation\": \"WT:1:0:0:T8A::\"",
        ))
        .stdout(predicate::str::contains("\"kind\": \"approximate\""));
}

#[test]
fn test_query_text_reports_unresolved() {
    let dir = TempDir::new().unwrap();
    let refs = write(&dir, "refs.fa", REFERENCES_FASTA);

    annotator()
        .arg("query")
        .arg(&refs)
        .arg("ACGTAC")
        .assert()
        .success()
        .stdout(predicate::str::contains("Annotation: NA:nan:nan:nan:::"));
}
