use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tvm_cli::config::load_config;
use tvm_cli::logging::init_logging;
use tvm_cli::{ScenarioLoader, Session};
use tvm_core::calculations::common::format_value;
use tvm_core::{CalculatorConfig, TvmRegistry, TvmSolver};

/// Time-value-of-money calculator.
#[derive(Parser, Debug)]
#[command(name = "tvm-calc")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Press keys and print the display after each change.
    ///
    /// Keys come from the arguments, from --file, or line by line from stdin.
    /// Example: tvm-calc keys 10 N 5 I 1000 +/- PV CPT FV
    Keys {
        /// Keystroke script file
        #[arg(short, long, conflicts_with = "keys")]
        file: Option<PathBuf>,

        /// Keystroke tokens
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },

    /// Solve for one variable from the given inputs.
    Solve {
        /// Variable to solve for: N, I, PV, PMT or FV
        #[arg(short, long)]
        target: String,

        /// Number of periods
        #[arg(long, allow_negative_numbers = true)]
        n: Option<f64>,

        /// Periodic interest rate in percent
        #[arg(long, allow_negative_numbers = true)]
        i: Option<f64>,

        /// Present value
        #[arg(long, allow_negative_numbers = true)]
        pv: Option<f64>,

        /// Payment per period
        #[arg(long, allow_negative_numbers = true)]
        pmt: Option<f64>,

        /// Future value
        #[arg(long, allow_negative_numbers = true)]
        fv: Option<f64>,
    },

    /// Solve every scenario in a CSV file.
    ///
    /// Columns: n, i, pv, pmt, fv, target. Empty cells are unset.
    Batch {
        /// Path to the scenario CSV file
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.log_file.as_deref())?;

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Mode::Keys { file, keys } => run_keys(config, file, keys),
        Mode::Solve {
            target,
            n,
            i,
            pv,
            pmt,
            fv,
        } => {
            let registry = TvmRegistry { n, i, pv, pmt, fv };
            let solver = TvmSolver::new(config.solver);
            let (var, value) = solver
                .solve_named(&target, &registry)
                .with_context(|| format!("Failed to solve for {target}"))?;
            println!("{var} = {}", format_value(value));
            Ok(())
        }
        Mode::Batch { file } => run_batch(config, file),
    }
}

fn run_keys(
    config: CalculatorConfig,
    file: Option<PathBuf>,
    keys: Vec<String>,
) -> Result<()> {
    let mut session = Session::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(path) = file {
        let script = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        let lines = session
            .run_script(&script)
            .with_context(|| format!("Failed to parse script: {}", path.display()))?;
        print_lines(&mut out, &lines)?;
    } else if !keys.is_empty() {
        let lines = session.run_script(&keys.join(" "))?;
        print_lines(&mut out, &lines)?;
    } else {
        // Interactive: a bad line is reported and skipped.
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            match session.run_script(&line) {
                Ok(lines) => print_lines(&mut out, &lines)?,
                Err(err) => eprintln!("{err}"),
            }
        }
    }

    Ok(())
}

fn run_batch(
    config: CalculatorConfig,
    path: PathBuf,
) -> Result<()> {
    let file =
        File::open(&path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let records = ScenarioLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
    info!(count = records.len(), path = %path.display(), "scenarios parsed");

    let solver = TvmSolver::new(config.solver);
    let outcomes = ScenarioLoader::solve_all(&solver, &records);

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(value) => println!(
                "row {}: {} = {}",
                outcome.row,
                outcome.target,
                format_value(*value)
            ),
            Err(err) => {
                failed += 1;
                println!("row {}: {} error: {err}", outcome.row, outcome.target);
            }
        }
    }
    info!(solved = outcomes.len() - failed, failed, "batch complete");

    Ok(())
}

fn print_lines(
    out: &mut impl Write,
    lines: &[String],
) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}").context("Failed to write output")?;
    }
    Ok(())
}
