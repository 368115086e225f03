//! # Depth-of-Field CLI
//!
//! Terminal front end for `dof_core`. Picks a body, lens and distance range
//! from the catalog, asks for any slider value not given on the command
//! line, and prints the near/far limits as a table and as JSON.
//!
//! ```text
//! dof_cli --lens "50mm f/1.8 prime" --aperture 8 --distance 5
//! dof_cli --imperial --defaults --json
//! RUST_LOG=debug dof_cli --list
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Serialize;

use dof_core::aperture::f_number_label;
use dof_core::calculations::{Distance, DofResult};
use dof_core::catalog::{CameraBody, Catalog, DistanceRange, Lens};
use dof_core::display::{format_circle_of_confusion, DisplaySettings};
use dof_core::{CalcResult, Session, SliderInputs, Units};

#[derive(Parser, Debug)]
#[command(name = "dof_cli", about = "Depth-of-field calculator")]
struct Args {
    /// Show distances in feet
    #[arg(long)]
    imperial: bool,

    /// Catalog JSON to use instead of the bundled one
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Camera body name
    #[arg(long)]
    body: Option<String>,

    /// Lens name
    #[arg(long)]
    lens: Option<String>,

    /// Distance range name
    #[arg(long)]
    range: Option<String>,

    /// Focal length (mm)
    #[arg(long, value_name = "MM")]
    focal_length: Option<u32>,

    /// Aperture as an f-number (e.g. 8 or 5.6); snapped to the lens's stops
    #[arg(long, value_name = "F_NUMBER")]
    aperture: Option<f64>,

    /// Subject distance in display units
    #[arg(long)]
    distance: Option<f64>,

    /// Use catalog starting values instead of prompting
    #[arg(long)]
    defaults: bool,

    /// Print only JSON
    #[arg(long)]
    json: bool,

    /// List catalog entries and exit
    #[arg(long)]
    list: bool,
}

/// Everything needed to reproduce one calculation.
#[derive(Serialize)]
struct Report<'a> {
    settings: DisplaySettings,
    body: &'a CameraBody,
    lens: &'a Lens,
    range: &'a DistanceRange,
    inputs: SliderInputs,
    result: DofResult,
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    let value = prompt_f64(prompt, f64::from(default));
    if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) {
        value.round() as u32
    } else {
        default
    }
}

fn load_catalog(path: Option<&PathBuf>) -> CalcResult<Catalog> {
    match path {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    }
}

fn print_catalog(catalog: &Catalog) {
    println!("Bodies:");
    for body in catalog.list_bodies() {
        let marker = if body.name == catalog.default_body().name { "*" } else { " " };
        println!(" {} {:<28} CoC {}", marker, body.name, format_circle_of_confusion(body.circle_of_confusion_mm));
    }
    println!();
    println!("Lenses:");
    for lens in catalog.list_lenses() {
        let marker = if lens.name == catalog.default_lens().name { "*" } else { " " };
        let scales: Vec<String> = lens.stop_scales.iter().map(|s| s.to_string()).collect();
        println!(
            " {} {:<36} {}-{}mm  {} to {}  ({})",
            marker,
            lens.name,
            lens.min_length_mm,
            lens.max_length_mm,
            f_number_label(lens.min_aperture),
            f_number_label(lens.max_aperture),
            scales.join(", ")
        );
    }
    println!();
    println!("Ranges:");
    for range in catalog.list_ranges() {
        let marker = if range.name == catalog.default_range().name { "*" } else { " " };
        println!(" {} {:<28} {}-{} m", marker, range.name, range.min_distance_m, range.max_distance_m);
    }
    println!();
    println!("* default");
}

/// Work out slider values from flags, prompting for anything missing.
fn gather_inputs(args: &Args, session: &Session, units: Units) -> CalcResult<SliderInputs> {
    let start = session.starting_inputs();
    let lens = session.lens();
    let prompt = !args.defaults && !args.json;

    let focal_length_mm = match args.focal_length {
        Some(mm) => mm,
        None if prompt && !lens.is_prime() => prompt_u32(
            &format!(
                "Focal length ({}-{} mm) [{}]: ",
                lens.min_length_mm, lens.max_length_mm, start.focal_length_mm
            ),
            start.focal_length_mm,
        ),
        None => start.focal_length_mm,
    };
    if !lens.covers_focal_length(focal_length_mm) {
        log::warn!("{}mm is outside the range of {}", focal_length_mm, lens.name);
    }

    let detents = session.aperture_detents()?;
    let requested = match args.aperture {
        Some(f_number) => (f_number * 100.0).round() as u32,
        None if prompt => {
            let default = f64::from(start.aperture_code) / 100.0;
            let f_number = prompt_f64(
                &format!(
                    "Aperture ({} to {}) [{}]: ",
                    f_number_label(detents.first()),
                    f_number_label(detents.last()),
                    f_number_label(start.aperture_code)
                ),
                default,
            );
            (f_number * 100.0).round() as u32
        }
        None => start.aperture_code,
    };
    let aperture_code = detents.snap(requested);
    if aperture_code != requested {
        log::info!("Aperture f/{:.1} snapped to {}", f64::from(requested) / 100.0, f_number_label(aperture_code));
    }

    let slider = session.distance_slider(units);
    let (min, max) = slider.bounds();
    let distance = match args.distance {
        Some(distance) => distance,
        None if prompt => prompt_f64(
            &format!(
                "Subject distance ({}-{} {}) [{}]: ",
                min,
                max,
                units.suffix(),
                slider.starting_position()
            ),
            f64::from(slider.starting_position()),
        ),
        None => f64::from(slider.starting_position()),
    };
    let subject_distance_m = units.to_metres(distance);
    if !session.range().contains(subject_distance_m) {
        log::warn!("{} {} is outside the {} range", distance, units.suffix(), session.range().name);
    }

    Ok(SliderInputs {
        focal_length_mm,
        aperture_code,
        subject_distance_m,
    })
}

fn print_result(session: &Session, inputs: &SliderInputs, result: &DofResult, settings: &DisplaySettings) {
    let show = |distance_m: Distance| settings.format_distance(distance_m);

    println!();
    println!("═══════════════════════════════════════");
    println!("  DEPTH OF FIELD");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!(
        "  Body:     {} (CoC {})",
        session.body().name,
        format_circle_of_confusion(session.body().circle_of_confusion_mm)
    );
    println!("  Lens:     {}", session.lens().name);
    println!("  Focal:    {} mm", inputs.focal_length_mm);
    println!(
        "  Aperture: {} (exact f/{:.3})",
        f_number_label(inputs.aperture_code),
        result.exact_f_stop
    );
    println!("  Subject:  {}", show(Distance::Finite(inputs.subject_distance_m)));
    println!();
    println!("Result:");
    println!("  Hyperfocal:      {}", show(Distance::Finite(result.hyperfocal_distance_m)));
    println!("  Near limit:      {}", show(Distance::Finite(result.near_limit_m)));
    println!("  Far limit:       {}", show(result.far_limit_m));
    println!("  Total depth:     {}", show(result.total_depth_m));
    println!("  In front:        {}", show(Distance::Finite(result.in_front_of_subject_m)));
    println!("  Behind:          {}", show(result.behind_subject_m));
    println!();
    println!("═══════════════════════════════════════");
    println!("  Subject is {}", result.position);
    println!("═══════════════════════════════════════");
}

fn run(args: &Args) -> CalcResult<()> {
    let catalog = load_catalog(args.catalog.as_ref())?;
    if args.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let settings = if args.imperial {
        DisplaySettings::imperial()
    } else {
        DisplaySettings::default()
    };

    let mut session = Session::with_defaults(&catalog);
    if let Some(name) = &args.body {
        session.change_body(&catalog, name)?;
    }
    if let Some(name) = &args.lens {
        session.change_lens(&catalog, name)?;
    }
    if let Some(name) = &args.range {
        session.change_range(&catalog, name)?;
    }

    let inputs = gather_inputs(args, &session, settings.units)?;
    let result = session.update(inputs)?;

    if !args.json {
        print_result(&session, &inputs, &result, &settings);
        println!();
        println!("JSON Output:");
    }

    let report = Report {
        settings,
        body: session.body(),
        lens: session.lens(),
        range: session.range(),
        inputs,
        result,
    };
    if let Ok(json) = serde_json::to_string_pretty(&report) {
        println!("{}", json);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        process::exit(1);
    }
}
