//! Philosophers simulator CLI
//!
//! Runs one dinner from the positional arguments, or the scenario harness
//! with `--scenario`.

use clap::Parser;
use philo_core::{Dinner, DinnerConfig};
use philo_env::StdoutSink;
use philo_sim::scenarios::ScenarioId;
use philo_sim::{parse_dinner, record_dinner, Oracle, ScenarioResult, ScenarioRunner, SimExport};
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Dining philosophers simulator
#[derive(Parser, Debug)]
#[command(name = "philo")]
#[command(about = "Simulate the dining philosophers problem", long_about = None)]
struct Args {
    /// number_of_philosophers time_to_die time_to_eat time_to_sleep [number_of_times_each_philosopher_must_eat]
    #[arg(num_args = 0..=5, value_name = "ARGS", allow_negative_numbers = true, required_unless_present = "scenario")]
    values: Vec<String>,
    
    /// Observation window in milliseconds (the dinner ends without a death after it)
    #[arg(long)]
    duration: Option<u64>,
    
    /// Scenario to run instead of a dinner (lone_philosopher, even_table, odd_table, meal_cap, starvation, zero_meals, random, all)
    #[arg(short = 'S', long)]
    scenario: Option<String>,
    
    /// Seed for the random scenario
    #[arg(long, default_value = "42")]
    seed: u64,
    
    /// Number of consecutive seeds to run
    #[arg(long, default_value = "1")]
    seeds: usize,
    
    /// JSON summary for CI parsing
    #[arg(long)]
    json: bool,
    
    /// Export the recorded transcript and report to a JSON file
    #[arg(long)]
    export: Option<String>,
    
    /// Verbose diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    
    // Diagnostics go to stderr so they never mix with status lines.
    let default = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
    
    let code = match args.scenario.as_deref() {
        Some(scenario) => run_scenarios(&args, scenario),
        None => run_dinner(&args),
    };
    
    // Exit with proper code for CI
    if code != 0 {
        std::process::exit(code);
    }
}

/// Runs one dinner from the positional arguments.
fn run_dinner(args: &Args) -> i32 {
    let config = match parse_dinner(&args.values, args.duration.map(Duration::from_millis)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Syntax error : {}", err);
            return 1;
        }
    };
    debug!("Config: {:?}", config);
    
    match &args.export {
        Some(path) => run_with_export(config, path),
        None => match Dinner::new(config, Box::new(StdoutSink::stdout())).run() {
            Ok(report) => {
                info!("Dinner over: {:?} after {}ms", report.outcome, report.elapsed_ms);
                0
            }
            Err(err) => {
                error!("Dinner failed: {}", err);
                eprintln!("Error: {}", err);
                1
            }
        },
    }
}

/// Runs a dinner that prints as usual and also records into an export file.
fn run_with_export(config: DinnerConfig, export_path: &str) -> i32 {
    let mut export = SimExport::new("cli", 0, config.clone());
    
    let code = match record_dinner(config.clone(), true) {
        Ok((report, transcript)) => {
            let violations = Oracle::new(&config).check(&transcript, &report);
            for violation in &violations {
                error!("Violation: {}", violation);
            }
            export.record(transcript, report);
            export.finalize(violations);
            0
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            export.finalize(Vec::new());
            1
        }
    };
    
    write_export(&export, export_path);
    code
}

fn write_export(export: &SimExport, export_path: &str) {
    if let Err(e) = export.write_to_file(export_path) {
        error!("Failed to write export: {:?}", e);
    } else {
        info!("Exported {} lines to {}", export.transcript.len(), export_path);
    }
}

/// One `name - description` line per scenario, plus `all`.
fn scenario_listing() -> String {
    let mut listing: Vec<String> = ScenarioId::all()
        .iter()
        .map(|s| format!("  {:<18} {}", s.name(), s.description()))
        .collect();
    listing.push(format!("  {:<18} {}", "all", "every scenario above"));
    listing.join("\n")
}

/// Runs harness scenarios over one or more seeds.
fn run_scenarios(args: &Args, name: &str) -> i32 {
    let scenarios: Vec<ScenarioId> = if name == "all" {
        ScenarioId::all()
    } else {
        match name.parse() {
            Ok(id) => vec![id],
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Available scenarios:\n{}", scenario_listing());
                return 1;
            }
        }
    };
    
    if args.export.is_some() && (scenarios.len() > 1 || args.seeds > 1) {
        eprintln!("Error: --export only supports a single scenario and seed");
        return 1;
    }
    
    let mut all_results: Vec<ScenarioResult> = Vec::new();
    let mut failed_count = 0;
    
    for seed_offset in 0..args.seeds {
        let seed = args.seed.wrapping_add(seed_offset as u64);
        let runner = ScenarioRunner::new(seed);
        
        for scenario in &scenarios {
            // Fixed tables only need one run.
            if seed_offset > 0 && !scenario.is_seeded() {
                continue;
            }
            
            let result = runner.run(*scenario);
            
            if !args.json {
                if result.passed {
                    eprintln!("✓ {} (seed={}) PASSED", scenario.name(), seed);
                } else {
                    eprintln!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }
            
            if !result.passed {
                failed_count += 1;
            }
            
            all_results.push(result);
        }
    }
    
    if let (Some(path), Some(result)) = (&args.export, all_results.first()) {
        if let Ok(config) = result.scenario.config(result.seed) {
            let mut export = SimExport::new(result.scenario.name(), result.seed, config);
            export.transcript = result.transcript.clone();
            export.violations = result.violations.clone();
            export.passed = result.passed;
            write_export(&export, path);
        }
    }
    
    let total = all_results.len();
    let passed = total - failed_count;
    
    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "outcome": r.outcome,
                    "metrics": r.metrics,
                    "failure_reason": r.failure_reason,
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize summary: {}", e);
                return 1;
            }
        }
    } else if failed_count == 0 {
        eprintln!("All {} scenario runs passed", total);
    } else {
        eprintln!("{}/{} scenario runs failed", failed_count, total);
    }
    
    if failed_count > 0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_args_dinner_line() {
        let args = Args::try_parse_from(["philo", "5", "800", "200", "200", "7"]).unwrap();
        
        assert_eq!(args.values.len(), 5);
        assert!(args.scenario.is_none());
    }
    
    #[test]
    fn test_args_negative_reaches_validation() {
        let args = Args::try_parse_from(["philo", "5", "-800", "200", "200"]).unwrap();
        
        assert_eq!(args.values[1], "-800");
        assert!(parse_dinner(&args.values, None).is_err());
    }
    
    #[test]
    fn test_args_scenario_needs_no_values() {
        let args = Args::try_parse_from(["philo", "-S", "all", "--seeds", "3", "--json"]).unwrap();
        
        assert_eq!(args.scenario.as_deref(), Some("all"));
        assert_eq!(args.seeds, 3);
        assert!(args.json);
    }
    
    #[test]
    fn test_args_values_required_without_scenario() {
        assert!(Args::try_parse_from(["philo"]).is_err());
    }
    
    #[test]
    fn test_scenario_listing_describes_every_scenario() {
        let listing = scenario_listing();
        
        for scenario in ScenarioId::all() {
            assert!(listing.contains(scenario.name()));
            assert!(listing.contains(scenario.description()));
        }
        assert!(listing.lines().last().is_some_and(|l| l.trim_start().starts_with("all")));
    }
    
    #[test]
    fn test_unknown_scenario_fails() {
        let args = Args::try_parse_from(["philo", "-S", "banquet"]).unwrap();
        assert_eq!(run_scenarios(&args, "banquet"), 1);
    }
    
    #[test]
    fn test_zero_meal_dinner_exits_cleanly() {
        let args = Args::try_parse_from(["philo", "3", "800", "200", "200", "0"]).unwrap();
        assert_eq!(run_dinner(&args), 0);
    }
}
