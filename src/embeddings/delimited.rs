// Delimited text reader for embedding tables and labelled corpora.
//
// GloVe files are space-separated with no header and no quoting at all (the
// vocabulary contains bare `"` tokens), while spreadsheet-style exports quote
// fields that contain the delimiter. Both disciplines go through here.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// How quote characters inside a line are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Fields may be wrapped in double quotes; `""` inside a quoted field is a literal quote.
    Minimal,
    /// Quotes are ordinary characters.
    None,
}

/// Layout of a delimited text file.
#[derive(Debug, Clone)]
pub struct DelimitedFormat {
    pub delimiter: char,
    /// First non-blank line holds column names
    pub header: bool,
    pub quoting: Quoting,
}

impl DelimitedFormat {
    /// GloVe distribution format: space separated, no header, no quoting.
    pub fn glove() -> Self {
        Self {
            delimiter: ' ',
            header: false,
            quoting: Quoting::None,
        }
    }

    /// Tab separated with a header row. Tweets quote freely, so quotes
    /// are left alone.
    pub fn tsv() -> Self {
        Self {
            delimiter: '\t',
            header: true,
            quoting: Quoting::None,
        }
    }
}

impl Default for DelimitedFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            header: true,
            quoting: Quoting::Minimal,
        }
    }
}

/// Split a single line into fields.
pub fn split_record(line: &str, format: &DelimitedFormat) -> Result<Vec<String>> {
    match format.quoting {
        Quoting::None => Ok(line.split(format.delimiter).map(str::to_string).collect()),
        Quoting::Minimal => split_quoted(line, format.delimiter),
    }
}

fn split_quoted(line: &str, delimiter: char) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' && at_field_start {
            in_quotes = true;
            at_field_start = false;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
            at_field_start = true;
        } else {
            field.push(c);
            at_field_start = false;
        }
    }

    if in_quotes {
        anyhow::bail!("Unterminated quoted field in line: {line}");
    }
    fields.push(field);
    Ok(fields)
}

/// Read every record of a delimited text source.
///
/// Returns the header fields (when the format has a header) and the data
/// records with their 1-based line numbers. Blank lines are skipped and a
/// trailing `\r` is stripped.
pub fn read_records(
    text: &str,
    format: &DelimitedFormat,
) -> Result<(Option<Vec<String>>, Vec<(usize, Vec<String>)>)> {
    let mut header = None;
    let mut records = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_record(line, format).with_context(|| format!("line {}", i + 1))?;
        if format.header && header.is_none() {
            header = Some(fields);
        } else {
            records.push((i + 1, fields));
        }
    }

    Ok((header, records))
}

/// A parsed numeric table: row names, their values, and optional column names.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub rows: Vec<Vec<f64>>,
    pub row_names: Vec<String>,
    /// Header fields after the row-name column
    pub col_names: Option<Vec<String>>,
}

/// Parse a numeric table: first field of each record is the row name,
/// the remaining fields must all parse as `f64`.
///
/// Row widths are not checked here.
pub fn parse_table(text: &str, format: &DelimitedFormat) -> Result<RawTable> {
    let (header, records) = read_records(text, format)?;

    let mut rows = Vec::with_capacity(records.len());
    let mut row_names = Vec::with_capacity(records.len());

    for (line_no, fields) in records {
        let mut fields = fields.into_iter();
        let name = fields.next().unwrap_or_default();
        let values = fields
            .map(|f| {
                f.trim().parse::<f64>().with_context(|| {
                    format!("line {line_no}: non-numeric field {f:?} for row {name:?}")
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        row_names.push(name);
        rows.push(values);
    }

    Ok(RawTable {
        rows,
        row_names,
        col_names: header.map(|h| h.into_iter().skip(1).collect()),
    })
}

/// Read and parse a numeric table from disk.
pub fn read_table(path: &Path, format: &DelimitedFormat) -> Result<RawTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_table(&text, format).with_context(|| format!("Failed to parse {}", path.display()))
}
