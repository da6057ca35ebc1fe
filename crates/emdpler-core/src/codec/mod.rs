//! Fixed-column record codec for the solver's legacy deck format.
//!
//! Every value in the input deck occupies a fixed character width with a
//! fixed decimal precision, right-justified, no delimiters beyond the column
//! boundaries themselves. The specifiers mirror the Fortran edit descriptors
//! the solver reads with: `I5`, `F9.2`, `F12.2`, `F9.3`, `F8.3`.

mod table;

pub use table::{ResultTable, decode_table};

use crate::domain::{EmdplerError, EmdplerResult};

/// One fixed-width field: total character width, fractional digits (0 for
/// integer fields), and how many values a full record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFormat {
    pub width: usize,
    pub decimals: usize,
    pub repeat: usize,
}

impl FieldFormat {
    pub const fn integer(width: usize, repeat: usize) -> Self {
        Self {
            width,
            decimals: 0,
            repeat,
        }
    }

    pub const fn fixed(width: usize, decimals: usize, repeat: usize) -> Self {
        Self {
            width,
            decimals,
            repeat,
        }
    }

    /// Rendered width of a full record: `repeat` fields plus the
    /// single-space separators `wrap` puts between them.
    pub const fn record_width(&self) -> usize {
        self.repeat * (self.width + 1) - 1
    }
}

/// Deck format table. Names follow the deck sections, specifiers the
/// solver's edit descriptors.
pub const COMPONENT_FLAG: FieldFormat = FieldFormat::integer(5, 2); // (2I5)
pub const GEOMETRY: FieldFormat = FieldFormat::fixed(9, 2, 3); // (3F9.2)
pub const FREQUENCY: FieldFormat = FieldFormat::fixed(12, 2, 2); // (2F12.2)
pub const SOURCE_STRENGTH: FieldFormat = FieldFormat::fixed(9, 2, 3); // (3F9.2)
pub const RECEIVER_OFFSET: FieldFormat = FieldFormat::fixed(9, 3, 2); // (2F9.3)
pub const LAYER_COUNT: FieldFormat = FieldFormat::integer(5, 2); // (2I5)
pub const LAYER_VALUE: FieldFormat = FieldFormat::fixed(8, 3, 10); // (10F8.3)

/// Render `value` into exactly `format.width` characters, rounded to
/// `format.decimals` fractional digits and right-justified. A representation
/// wider than the field is an error, never a truncation.
pub fn encode(value: f64, format: FieldFormat) -> EmdplerResult<String> {
    if !value.is_finite() {
        return Err(overflow(value, format));
    }

    let rendered = format!(
        "{value:>width$.decimals$}",
        width = format.width,
        decimals = format.decimals
    );
    if rendered.len() > format.width {
        return Err(overflow(value, format));
    }

    Ok(rendered)
}

/// Integer variant: right-justified base-10, no decimal point.
pub fn encode_int(value: i64, format: FieldFormat) -> EmdplerResult<String> {
    let rendered = format!("{value:>width$}", width = format.width);
    if rendered.len() > format.width {
        return Err(overflow(value as f64, format));
    }

    Ok(rendered)
}

pub fn encode_all(values: &[f64], format: FieldFormat) -> EmdplerResult<Vec<String>> {
    values.iter().map(|value| encode(*value, format)).collect()
}

/// Greedily pack already-encoded fields onto lines, single-space separated,
/// never splitting a field across lines. `None` leaves the sequence on one
/// line (the legacy-compatible default). Stripped of separators, the output
/// reproduces every input field exactly once, in order.
pub fn wrap(fields: &[String], max_width: Option<usize>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for field in fields {
        if current.is_empty() {
            current.push_str(field);
            continue;
        }

        let fits = match max_width {
            Some(limit) => current.len() + 1 + field.len() <= limit,
            None => true,
        };
        if fits {
            current.push(' ');
            current.push_str(field);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(field);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Fold a phase angle by repeated +-180 degree steps until it sits within
/// the legacy band. The solver's published curves use this 180-degree fold
/// (not the conventional 360-degree wrap); downstream comparisons depend on
/// it, so it is kept bit-for-bit.
pub fn normalize_phase(mut degrees: f64) -> f64 {
    while degrees > 180.0 {
        degrees -= 180.0;
    }
    while degrees < -180.0 {
        degrees += 180.0;
    }
    degrees
}

pub fn normalize_phases(degrees: &mut [f64]) {
    for value in degrees.iter_mut() {
        *value = normalize_phase(*value);
    }
}

fn overflow(value: f64, format: FieldFormat) -> EmdplerError {
    EmdplerError::FieldOverflow {
        value,
        width: format.width,
        decimals: format.decimals,
    }
}
