use super::CliError;
use super::helpers::{load_model_file, parse_f64_list, render_response_table};
use anyhow::Context;
use emdpler_core::deck::assemble_input_deck;
use emdpler_core::domain::{LayeredModel, SoundingRequest};
use emdpler_core::runner::{ForwardRunner, default_executable};
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub(super) struct VmdArgs {
    /// Source-receiver offset in metres
    #[arg(long)]
    offset: f64,
    /// Source height above ground in metres
    #[arg(long, default_value_t = 0.0)]
    height: f64,
    /// Receiver level in metres
    #[arg(long, default_value_t = 0.0)]
    level: f64,
    /// Comma-separated layer resistivities in ohm-m
    #[arg(long, value_name = "LIST")]
    res: Option<String>,
    /// Comma-separated interface thicknesses in metres
    #[arg(long, value_name = "LIST")]
    thk: Option<String>,
    /// JSON layer-model file; explicit --res/--thk take precedence
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,
    /// Explicit layer-count override (NLYR)
    #[arg(long)]
    layers: Option<usize>,
    /// Highest sweep frequency in Hz
    #[arg(long, default_value_t = 1.0e5)]
    freq_high: f64,
    /// Lowest sweep frequency in Hz
    #[arg(long, default_value_t = 10.0)]
    freq_low: f64,
    /// Source current in amperes
    #[arg(long, default_value_t = 1.0)]
    current: f64,
    /// Dipole area
    #[arg(long, default_value_t = 1.0)]
    area: f64,
    /// Dipole moment
    #[arg(long, default_value_t = 1.0)]
    moment: f64,
    /// Receiver x position w.r.t. the dipole
    #[arg(long, default_value_t = 0.0)]
    rec_x: f64,
    /// Receiver y position w.r.t. the dipole
    #[arg(long, default_value_t = 0.0)]
    rec_y: f64,
    /// Include displacement currents (IFACT=2)
    #[arg(long)]
    displacement_currents: bool,
    /// Path to the emdpler solver executable
    #[arg(long, value_name = "PATH")]
    exe: Option<PathBuf>,
    /// Assemble and print the input deck without invoking the solver
    #[arg(long)]
    print_input: bool,
    /// Emit the decoded response as JSON
    #[arg(long)]
    json: bool,
}

pub(super) fn run_vmd_command(args: VmdArgs) -> Result<i32, CliError> {
    let request = build_request(&args)?;
    tracing::debug!(
        layers = request.model.layer_count(),
        freq_high = request.freq_high,
        freq_low = request.freq_low,
        "assembled sounding request"
    );

    if args.print_input {
        let deck = assemble_input_deck(&request).map_err(CliError::Compute)?;
        print!("{deck}");
        return Ok(0);
    }

    let executable = match &args.exe {
        Some(path) => path.clone(),
        None => default_executable().map_err(CliError::Compute)?,
    };

    let response = ForwardRunner::new(executable)
        .run(&request)
        .map_err(CliError::Compute)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&response)
            .context("failed to serialize solver response")?;
        println!("{rendered}");
    } else {
        print!("{}", render_response_table(&response));
    }

    Ok(0)
}

fn build_request(args: &VmdArgs) -> Result<SoundingRequest, CliError> {
    let file = match &args.model {
        Some(path) => Some(load_model_file(path)?),
        None => None,
    };

    let resistivities = match &args.res {
        Some(list) => parse_f64_list("--res", list)?,
        None => match &file {
            Some(file) => file.res.clone(),
            None => {
                return Err(CliError::Usage(
                    "a layered model is required: pass --res or --model".to_string(),
                ));
            }
        },
    };

    let thicknesses = match &args.thk {
        Some(list) => parse_f64_list("--thk", list)?,
        None => file.as_ref().map(|file| file.thk.clone()).unwrap_or_default(),
    };

    let mut model = LayeredModel::new(resistivities, thicknesses);
    if let Some(layers) = args.layers.or(file.as_ref().and_then(|file| file.layers)) {
        model = model.with_layer_count(layers);
    }

    let mut request = SoundingRequest::vmd(args.offset, args.height, args.level, model);
    request.displacement_currents = args.displacement_currents;
    request.freq_high = args.freq_high;
    request.freq_low = args.freq_low;
    request.current = args.current;
    request.dipole_area = args.area;
    request.dipole_moment = args.moment;
    request.rec_x = args.rec_x;
    request.rec_y = args.rec_y;
    Ok(request)
}
