#![allow(non_snake_case)]
use clap::{Parser, Subcommand};
use log::{LevelFilter, error};
use std::path::PathBuf;
use std::process::ExitCode;
use step_calculus::Utils::logger::{init_logging, save_discontinuities_to_csv, save_plot_sample_to_csv};
use step_calculus::Utils::plots::render_plot_png;
use step_calculus::Utils::report::{discontinuity_table, steps_table, verification_table};
use step_calculus::calculus::Calculus;
use step_calculus::calculus::errors::CalculusError;
use step_calculus::calculus::notation::{denormalize, normalize};
use step_calculus::calculus::orchestrator::explain_epsilon_delta;
use step_calculus::calculus::settings::CalculusSettings;
use step_calculus::calculus::types::LimitPoint;
use step_calculus::calculus::worked_examples::{WorkedExample, find_example, worked_examples};

#[derive(Parser)]
#[command(author, version, about = "Step-by-step derivatives, limits and epsilon-delta proofs", long_about = None)]
struct Cli {
    /// settings document with defaults (plot window, limit point, epsilon, search constants)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// variable of the function, overrides the settings
    #[arg(long = "var", global = true)]
    variable: Option<String>,
    #[arg(long, global = true, default_value = "warn", value_parser = parse_level)]
    log_level: LevelFilter,
    /// also write the log into this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derivative with every step explained
    Derivative {
        #[arg(allow_hyphen_values = true)]
        function: String,
    },
    /// Limit at a point, a number or ±infinity
    Limit {
        #[arg(allow_hyphen_values = true)]
        function: String,
        #[arg(long, allow_hyphen_values = true)]
        point: Option<LimitPoint>,
    },
    /// Search a delta for the given epsilon and verify it
    EpsilonDelta {
        #[arg(allow_hyphen_values = true)]
        function: String,
        #[arg(long, allow_hyphen_values = true)]
        point: Option<LimitPoint>,
        #[arg(long)]
        epsilon: Option<f64>,
    },
    /// Sample the function and export it as csv and/or png
    Plot {
        #[arg(allow_hyphen_values = true)]
        function: String,
        #[arg(long, allow_hyphen_values = true)]
        x_min: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        x_max: Option<f64>,
        #[arg(long)]
        samples: Option<usize>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        png: Option<PathBuf>,
    },
    /// Probe for vertical asymptotes and log-domain violations
    Scan {
        #[arg(allow_hyphen_values = true)]
        function: String,
        /// save the findings as csv
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List the built-in epsilon-delta exercises, or work through one of them
    Examples {
        #[arg(long)]
        id: Option<usize>,
    },
    /// Value of the function at a point
    Evaluate {
        #[arg(allow_hyphen_values = true)]
        function: String,
        #[arg(long, allow_hyphen_values = true)]
        at: f64,
    },
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not one of off, error, warn, info, debug, trace", s))
}

fn print_example(calculus: &Calculus, example: &WorkedExample) -> Result<(), CalculusError> {
    println!("{}. {}", example.id, example.title);
    println!("{}", example.description);
    for (i, step) in example.proof_steps.iter().enumerate() {
        println!("  {}) {}", i + 1, step);
    }
    println!("{}\n", example.explanation);
    // the exercises are written in x whatever the configured variable is
    let (result, explanation) = explain_epsilon_delta(
        calculus.engine(),
        example.function,
        "x",
        example.point,
        example.epsilon,
        &calculus.settings().delta_search,
    )?;
    println!("{}", steps_table(&explanation));
    println!("{}", verification_table(&result.verification));
    Ok(())
}

fn run(cli: Cli) -> Result<(), CalculusError> {
    let mut settings = match &cli.settings {
        Some(path) => CalculusSettings::from_file(path)?,
        None => CalculusSettings::default(),
    };
    if let Some(variable) = cli.variable {
        settings.variable = variable.to_lowercase();
        settings.validate()?;
    }
    let calculus = Calculus::with_settings(settings);

    match cli.command {
        Commands::Derivative { function } => {
            let result = calculus.differentiate(&function)?;
            println!("{}", steps_table(&result));
            println!("d/d{} = {}", calculus.settings().variable, result.final_value);
        }
        Commands::Limit { function, point } => {
            let result = calculus.limit(&function, point)?;
            println!("{}", steps_table(&result));
            println!("limit = {}", result.final_value);
        }
        Commands::EpsilonDelta {
            function,
            point,
            epsilon,
        } => {
            let (result, explanation) = calculus.epsilon_delta(&function, point, epsilon)?;
            println!("{}", steps_table(&explanation));
            println!("{}", verification_table(&result.verification));
        }
        Commands::Plot {
            function,
            x_min,
            x_max,
            samples,
            csv,
            png,
        } => {
            let window = &calculus.settings().plot;
            let sample = calculus.plot_sample_in(
                &function,
                x_min.unwrap_or(window.x_min),
                x_max.unwrap_or(window.x_max),
                samples.unwrap_or(window.samples),
            )?;
            println!("{} finite samples", sample.len());
            if let Some(path) = csv {
                save_plot_sample_to_csv(&sample, &calculus.settings().variable, &path)?;
            }
            if let Some(path) = png {
                let markers = calculus.discontinuities(&function);
                render_plot_png(&sample, &markers, &path, &function)?;
            }
        }
        Commands::Scan { function, csv } => {
            let found = calculus.discontinuities(&function);
            if found.is_empty() {
                println!("no discontinuities found at the probe points");
            } else {
                println!("{}", discontinuity_table(&found));
            }
            if let Some(path) = csv {
                save_discontinuities_to_csv(&found, &path)?;
            }
        }
        Commands::Examples { id: Some(id) } => {
            let example = find_example(id).ok_or_else(|| {
                CalculusError::InvalidArgument(format!("there is no example {}", id))
            })?;
            print_example(&calculus, &example)?;
        }
        Commands::Examples { id: None } => {
            for example in worked_examples() {
                println!(
                    "{}. {}  [f = {}, ε = {}]",
                    example.id, example.title, example.function, example.epsilon
                );
            }
        }
        Commands::Evaluate { function, at } => {
            let value = calculus.evaluate_at(&function, at)?;
            println!("{} at {} = {}", denormalize(&normalize(&function)), at, value);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_level, cli.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
