use std::io::{Read, Write};
use std::path::Path;

use crate::parsing::fasta::open_reader;
use crate::parsing::ParseError;

/// Column holding the query sequences
pub const SEQUENCE_COLUMN: &str = "seq";

/// Column holding per-row counts, appended to annotations in count mode
pub const COUNT_COLUMN: &str = "count";

/// Name of the inserted output column
pub const ANNOTATION_COLUMN: &str = "annotation";

/// A tab-delimited query table with a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    sequence_col: usize,
    count_col: Option<usize>,
}

impl QueryTable {
    /// Query sequences in row order
    pub fn sequences(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| row[self.sequence_col].as_str())
            .collect()
    }

    /// Values of the count column in row order, if the table has one
    pub fn counts(&self) -> Option<Vec<&str>> {
        let col = self.count_col?;
        Some(self.rows.iter().map(|row| row[col].as_str()).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a query table file, optionally gzip-compressed
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_query_table_file(path: &Path, require_count: bool) -> Result<QueryTable, ParseError> {
    let mut content = String::new();
    open_reader(path)?.read_to_string(&mut content)?;
    parse_query_table_text(&content, require_count)
}

/// Parse query table text: a header row naming the columns, then one row per query
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the header is missing or a row has
/// the wrong number of fields, or `ParseError::MissingColumn` if the `seq`
/// column (or the `count` column when `require_count` is set) is absent.
pub fn parse_query_table_text(text: &str, require_count: bool) -> Result<QueryTable, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| ParseError::InvalidFormat("Query table has no header".to_string()))?;
    let header: Vec<String> = header_line.split('\t').map(str::to_string).collect();

    let find = |name: &str| header.iter().position(|h| h.trim() == name);
    let sequence_col =
        find(SEQUENCE_COLUMN).ok_or_else(|| ParseError::MissingColumn(SEQUENCE_COLUMN.to_string()))?;
    let count_col = find(COUNT_COLUMN);
    if require_count && count_col.is_none() {
        return Err(ParseError::MissingColumn(COUNT_COLUMN.to_string()));
    }

    let mut rows = Vec::new();
    for (line_num, line) in lines {
        let fields: Vec<String> = line.split('\t').map(str::to_string).collect();
        if fields.len() != header.len() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has {} fields, expected {}",
                fields.len(),
                header.len()
            )));
        }
        rows.push(fields);
    }

    Ok(QueryTable {
        header,
        rows,
        sequence_col,
        count_col,
    })
}

/// Write the table with an `annotation` column inserted at `out_col`.
///
/// `out_col` is clamped to the number of columns, so a large value appends
/// the annotation as the last column.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the number of annotations does not
/// match the number of rows, or `ParseError::Io` if writing fails.
pub fn write_annotated_table<W: Write>(
    writer: &mut W,
    table: &QueryTable,
    annotations: &[String],
    out_col: usize,
) -> Result<(), ParseError> {
    if annotations.len() != table.rows.len() {
        return Err(ParseError::InvalidFormat(format!(
            "{} annotations for {} rows",
            annotations.len(),
            table.rows.len()
        )));
    }

    let col = out_col.min(table.header.len());
    write_row(writer, &table.header, col, ANNOTATION_COLUMN)?;
    for (row, annotation) in table.rows.iter().zip(annotations) {
        write_row(writer, row, col, annotation)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_row<W: Write>(
    writer: &mut W,
    fields: &[String],
    col: usize,
    inserted: &str,
) -> std::io::Result<()> {
    let (before, after) = fields.split_at(col);
    let mut out: Vec<&str> = Vec::with_capacity(fields.len() + 1);
    out.extend(before.iter().map(String::as_str));
    out.push(inserted);
    out.extend(after.iter().map(String::as_str));
    writeln!(writer, "{}", out.join("\t"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "barcode\tseq\tcount\nAAAA\tacgt\t3\nCCCC\tACGA\t1\n";

    #[test]
    fn test_parse_query_table() {
        let table = parse_query_table_text(TABLE, false).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.sequences(), vec!["acgt", "ACGA"]);
        assert_eq!(table.counts(), Some(vec!["3", "1"]));
    }

    #[test]
    fn test_missing_seq_column() {
        let result = parse_query_table_text("barcode\tsequence\nAAAA\tACGT\n", false);
        assert!(matches!(result, Err(ParseError::MissingColumn(c)) if c == "seq"));
    }

    #[test]
    fn test_count_column_required_in_count_mode() {
        let text = "seq\nACGT\n";
        assert!(parse_query_table_text(text, false).unwrap().counts().is_none());
        assert!(matches!(
            parse_query_table_text(text, true),
            Err(ParseError::MissingColumn(c)) if c == "count"
        ));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let result = parse_query_table_text("seq\tcount\nACGT\n", false);
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let table = parse_query_table_text("seq\r\n\r\nACGT\r\nTTTT\r\n\n", false).unwrap();
        assert_eq!(table.sequences(), vec!["ACGT", "TTTT"]);
    }

    #[test]
    fn test_write_annotation_column() {
        let table = parse_query_table_text(TABLE, false).unwrap();
        let annotations = vec!["WT:0:0:0:::".to_string(), "NA:nan:nan:nan:::".to_string()];

        let mut out = Vec::new();
        write_annotated_table(&mut out, &table, &annotations, 1).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "barcode\tannotation\tseq\tcount\n\
             AAAA\tWT:0:0:0:::\tacgt\t3\n\
             CCCC\tNA:nan:nan:nan:::\tACGA\t1\n"
        );

        let mut out = Vec::new();
        write_annotated_table(&mut out, &table, &annotations, 99).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("barcode\tseq\tcount\tannotation\n"));
    }

    #[test]
    fn test_write_rejects_count_mismatch() {
        let table = parse_query_table_text(TABLE, false).unwrap();
        let mut out = Vec::new();
        assert!(write_annotated_table(&mut out, &table, &[], 0).is_err());
    }
}
