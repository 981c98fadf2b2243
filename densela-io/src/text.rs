//! Delimited text files of numbers.
//!
//! One matrix row per line, fields separated by tabs, commas, or runs of
//! spaces (detected from the first data line). Blank lines and `#`
//! comments are skipped.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

use densela_linalg::{Matrix, Vector};

use crate::traits::ArrayCodec;

/// Field delimiter for text files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
    Whitespace,
}

impl Delimiter {
    fn detect(line: &str) -> Self {
        if line.contains('\t') {
            Delimiter::Tab
        } else if line.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        }
    }

    fn split<'a>(self, line: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            Delimiter::Tab => Box::new(line.split('\t').map(str::trim)),
            Delimiter::Comma => Box::new(line.split(',').map(str::trim)),
            Delimiter::Whitespace => Box::new(line.split_whitespace()),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Delimiter::Tab => "\t",
            Delimiter::Comma => ",",
            Delimiter::Whitespace => " ",
        }
    }
}

/// Parse delimited rows. Fails on unparsable fields and ragged rows.
pub fn parse_rows(contents: &str) -> Result<Vec<Vec<f64>>> {
    let mut delim = None;
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_num, raw) in contents.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }
        let d = *delim.get_or_insert_with(|| Delimiter::detect(line));

        let row = d
            .split(line)
            .map(|field| {
                field.parse::<f64>().with_context(|| {
                    format!("Line {}: invalid number '{}'", line_num + 1, field)
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                bail!(
                    "Line {} has {} fields (expected {})",
                    line_num + 1,
                    row.len(),
                    first.len()
                );
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        bail!("No numeric data found");
    }
    Ok(rows)
}

/// Parse a matrix from delimited text.
pub fn parse_matrix(contents: &str) -> Result<Matrix> {
    let rows = parse_rows(contents)?;
    Ok(Matrix::from_rows(&rows)?)
}

/// Parse a vector: either one value per line or a single row.
pub fn parse_vector(contents: &str) -> Result<Vector> {
    let rows = parse_rows(contents)?;
    let values: Vec<f64> = if rows.len() == 1 {
        rows.into_iter().flatten().collect()
    } else if rows[0].len() == 1 {
        rows.into_iter().map(|r| r[0]).collect()
    } else {
        bail!(
            "Expected a single row or a single column, got {} rows of {} fields",
            rows.len(),
            rows[0].len()
        );
    };
    Ok(Vector::from_slice(&values)?)
}

/// One line per row, newline-terminated.
pub fn format_matrix(m: &Matrix, delim: Delimiter, precision: usize) -> String {
    m.to_rows()
        .iter()
        .map(|row| {
            let fields: Vec<String> = row.iter().map(|v| format!("{:.*}", precision, v)).collect();
            fields.join(delim.as_str()) + "\n"
        })
        .collect()
}

/// One value per line, newline-terminated.
pub fn format_vector(v: &Vector, precision: usize) -> String {
    v.iter().map(|x| format!("{:.*}\n", precision, x)).collect()
}

/// Text codec; the delimiter is auto-detected on read.
#[derive(Debug, Clone, Copy)]
pub struct TextCodec {
    pub delimiter: Delimiter,
    pub precision: usize,
}

impl TextCodec {
    /// Delimiter chosen from the file extension: comma for `.csv`,
    /// tab otherwise.
    pub fn for_path(path: &Path, precision: usize) -> Self {
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Delimiter::Comma,
            _ => Delimiter::Tab,
        };
        Self {
            delimiter,
            precision,
        }
    }
}

impl ArrayCodec for TextCodec {
    fn read_matrix(&self, path: &Path) -> Result<Matrix> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read matrix file: {}", path.display()))?;
        let m = parse_matrix(&contents)
            .with_context(|| format!("Failed to parse matrix file: {}", path.display()))?;
        debug!(rows = m.rows(), cols = m.cols(), "Read text matrix");
        Ok(m)
    }

    fn read_vector(&self, path: &Path) -> Result<Vector> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vector file: {}", path.display()))?;
        let v = parse_vector(&contents)
            .with_context(|| format!("Failed to parse vector file: {}", path.display()))?;
        debug!(len = v.len(), "Read text vector");
        Ok(v)
    }

    fn write_matrix(&self, m: &Matrix, path: &Path) -> Result<()> {
        std::fs::write(path, format_matrix(m, self.delimiter, self.precision))
            .with_context(|| format!("Failed to write matrix file: {}", path.display()))
    }

    fn write_vector(&self, v: &Vector, path: &Path) -> Result<()> {
        std::fs::write(path, format_vector(v, self.precision))
            .with_context(|| format!("Failed to write vector file: {}", path.display()))
    }
}
