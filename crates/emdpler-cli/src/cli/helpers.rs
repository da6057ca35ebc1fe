use super::CliError;
use anyhow::Context;
use emdpler_core::domain::SoundingResponse;
use serde::Deserialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// JSON layer-model file accepted by `--model`.
#[derive(Debug, Deserialize, Clone)]
pub(super) struct ModelFile {
    pub(super) res: Vec<f64>,
    #[serde(default)]
    pub(super) thk: Vec<f64>,
    #[serde(default)]
    pub(super) layers: Option<usize>,
}

pub(super) fn load_model_file(path: &Path) -> Result<ModelFile, CliError> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read model file '{}'", path.display()))?;
    let model: ModelFile = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse model file '{}'", path.display()))?;
    Ok(model)
}

pub(super) fn parse_f64_list(flag: &str, list: &str) -> Result<Vec<f64>, CliError> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                CliError::Usage(format!("{flag}: '{token}' is not a number"))
            })
        })
        .collect()
}

pub(super) fn render_response_table(response: &SoundingResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# freq[Hz]  ampl  phase[deg]  norm_ampl  norm_phase[deg]");
    let freq = &response.frequency;
    for index in 0..freq.freq.len() {
        let _ = writeln!(
            out,
            "{:14.6e} {:14.6e} {:10.3} {:14.6e} {:10.3}",
            freq.freq[index],
            freq.ampl[index],
            freq.phase[index],
            freq.norm_ampl[index],
            freq.norm_phase[index],
        );
    }

    let _ = writeln!(out, "# induction_number  ampl  phase[deg]");
    let induction = &response.induction;
    for index in 0..induction.induction_number.len() {
        let _ = writeln!(
            out,
            "{:14.6e} {:14.6e} {:10.3}",
            induction.induction_number[index],
            induction.ampl[index],
            induction.phase[index],
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{parse_f64_list, render_response_table};
    use crate::cli::CliError;
    use emdpler_core::domain::{FrequencySweep, InductionSweep, SoundingResponse};

    #[test]
    fn comma_lists_parse_with_whitespace_tolerance() {
        let values = parse_f64_list("--res", "100, 50.5 ,1e3").expect("list parses");
        assert_eq!(values, vec![100.0, 50.5, 1000.0]);
    }

    #[test]
    fn non_numeric_list_entry_is_a_usage_error() {
        let error = parse_f64_list("--res", "100,abc").expect_err("abc is not a number");
        assert!(matches!(error, CliError::Usage(_)));
    }

    #[test]
    fn response_table_has_one_line_per_row_plus_headers() {
        let response = SoundingResponse {
            frequency: FrequencySweep {
                freq: vec![100000.0, 10.0],
                ampl: vec![1.0, 2.0],
                phase: vec![10.0, -10.0],
                norm_ampl: vec![0.9, 0.8],
                norm_phase: vec![1.0, -1.0],
            },
            induction: InductionSweep {
                induction_number: vec![31.6],
                ampl: vec![0.5],
                phase: vec![45.0],
            },
        };

        let table = render_response_table(&response);
        assert_eq!(table.lines().count(), 5);
        assert!(table.starts_with("# freq[Hz]"));
    }
}
