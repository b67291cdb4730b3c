//! Calc CLI
//!
//! Command-line front end for the calculator registry
//!
//! ```bash
//! calc list
//! calc run npv --set rate=0.08 --flows=-100000,25000,30000,35000,40000,45000
//! calc run irr --flows-csv flows.csv --set periods_per_year=12 --json
//! calc run ab-test-sample-size --set baseline_rate=0.025 --set mde=0.005
//! ```

use anyhow::{bail, Context, Result};
use calc_numerics::cashflow::load_schedule;
use calc_numerics::{CalcConfig, CalculatorInputs, CalculatorOutput, Metric, Registry, Unit};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Calc - business calculator numerics
#[derive(Parser)]
#[command(name = "calc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available calculators and their inputs
    List,

    /// Run one calculator
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Calculator key, e.g. npv or irr
    key: String,

    /// Named input, repeatable: --set rate=0.1
    #[arg(long = "set", value_parser = parse_assignment)]
    values: Vec<(String, f64)>,

    /// Cash flows for periods 0, 1, 2, ...
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    flows: Vec<f64>,

    /// CSV file with period,amount columns
    #[arg(long, conflicts_with = "flows")]
    flows_csv: Option<PathBuf>,

    /// JSON file holding a full set of inputs
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CalcConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CalcConfig::default(),
    }
    .with_env_overrides();

    let registry = Registry::new(config);

    match cli.command {
        Commands::List => list(&registry),
        Commands::Run(args) => run(&registry, args)?,
    }

    Ok(())
}

fn list(registry: &Registry) {
    for entry in registry.entries() {
        println!("{:<22} {}", entry.key, entry.title);
        println!("{:<22} inputs: {}", "", entry.inputs.join(", "));
    }
}

fn run(registry: &Registry, args: RunArgs) -> Result<()> {
    let mut inputs = match &args.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            serde_json::from_reader(std::io::BufReader::new(file))
                .with_context(|| format!("Failed to parse inputs in {}", path.display()))?
        }
        None => CalculatorInputs::new(),
    };

    for (name, value) in &args.values {
        inputs.set(name, *value);
    }

    if let Some(path) = &args.flows_csv {
        let schedule = load_schedule(path)
            .with_context(|| format!("Failed to load cash flows from {}", path.display()))?;
        inputs.cash_flows = schedule.amounts().to_vec();
    } else if !args.flows.is_empty() {
        inputs.cash_flows = args.flows.clone();
    }

    let output = match registry.run(&args.key, &inputs) {
        Ok(output) => output,
        Err(err) if err.is_domain() => bail!("Invalid input: {}", err),
        Err(err) => return Err(err).context(format!("Calculator '{}' failed", args.key)),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&output);
    }

    Ok(())
}

fn print_text(output: &CalculatorOutput) {
    println!("{}: {}", output.headline.label, render(&output.headline));
    for metric in &output.secondary {
        println!("  {}: {}", metric.label, render(metric));
    }
    for warning in &output.warnings {
        println!("warning: {}", warning);
    }
}

fn render(metric: &Metric) -> String {
    let Some(value) = metric.value else {
        return "not available".to_string();
    };
    match metric.unit {
        Unit::Currency => format!("{:.2}", value),
        Unit::Percent => format!("{:.4}%", value * 100.0),
        Unit::Periods => format!("{:.2} periods", value),
        Unit::Count => format!("{:.0}", value),
        Unit::Ratio => format!("{:.4}", value),
        Unit::Number => format!("{:.6}", value),
    }
}
