use crate::domain::{EmdplerError, EmdplerResult};
use std::path::{Path, PathBuf};

/// Whitespace-delimited numeric table with a fixed column count, decoded
/// from one solver result file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    columns: usize,
    rows: Vec<Vec<f64>>,
}

impl ResultTable {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Extract one column.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.columns()`.
    pub fn column(&self, index: usize) -> Vec<f64> {
        assert!(
            index < self.columns,
            "column index {index} out of range for a {}-column table",
            self.columns
        );
        self.rows.iter().map(|row| row[index]).collect()
    }
}

/// Decode `text` into a table of exactly `columns` numeric columns. Empty
/// lines are skipped; any other deviation is a `MalformedRow` carrying
/// `path` and the 1-based source line.
pub fn decode_table(text: &str, columns: usize, path: &Path) -> EmdplerResult<ResultTable> {
    let mut rows = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.len() != columns {
            return Err(malformed(
                path,
                index + 1,
                format!("expected {} columns, found {}", columns, tokens.len()),
            ));
        }

        let mut row = Vec::with_capacity(columns);
        for token in tokens {
            row.push(parse_numeric_token(token).ok_or_else(|| {
                malformed(path, index + 1, format!("token '{token}' is not numeric"))
            })?);
        }
        rows.push(row);
    }

    Ok(ResultTable { columns, rows })
}

// Fortran list-directed output may carry D exponents. It also writes
// `Infinity`/`NaN` on overflow, which `f64::from_str` would happily accept;
// a table is only usable if every value is finite, so those are rejected
// here rather than left to poison downstream arithmetic.
fn parse_numeric_token(token: &str) -> Option<f64> {
    let normalized = token.replace(['D', 'd'], "E");
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn malformed(path: &Path, line: usize, detail: String) -> EmdplerError {
    EmdplerError::MalformedRow {
        path: PathBuf::from(path),
        line,
        detail,
    }
}
