use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use track_chain::harness::{
	Outcome, Scenario, echo_sink, fire, generate_init_template, load_harness, parse_assignment,
	run_harness,
};
use track_chain::merge::Fields;

#[derive(Parser)]
#[command(name = "track-chain")]
#[command(author, version, about = "Resolve and check nested event-tracking scopes")]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template track-chain.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing track-chain.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Log scope resolution details to stderr
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Run every scenario in a harness file and report the outcome
	Check {
		/// Harness file
		file: PathBuf,
	},
	/// Print the resolved snapshot of every level as JSON
	Show {
		/// Harness file
		file: PathBuf,

		/// Only show this scenario
		#[arg(long)]
		scenario: Option<String>,
	},
	/// Resolve one event through a scenario's scopes and print it as JSON
	Trigger {
		/// Harness file
		file: PathBuf,

		/// Scenario whose scopes to use
		#[arg(long)]
		scenario: String,

		/// Event name (defaults to the scenario's trigger event)
		#[arg(long)]
		event: Option<String>,

		/// Call-time payload entry, repeatable
		#[arg(long = "payload", value_name = "KEY=VALUE")]
		payload: Vec<String>,

		/// Call-time option entry, repeatable
		#[arg(long = "option", value_name = "KEY=VALUE")]
		options: Vec<String>,
	},
}

const HARNESS_FILE: &str = "track-chain.toml";

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	match cli.command {
		Some(Commands::Check { file }) => handle_check(&file),
		Some(Commands::Show { file, scenario }) => handle_show(&file, scenario.as_deref()),
		Some(Commands::Trigger {
			file,
			scenario,
			event,
			payload,
			options,
		}) => handle_trigger(&file, &scenario, event, &payload, &options),
		// No command specified - this shouldn't happen due to arg_required_else_help
		None => Ok(ExitCode::SUCCESS),
	}
}

fn init_logging(verbose: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_env("TRACK_CHAIN_LOG")
		.unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(filter)
		.init();
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let harness_path = PathBuf::from(HARNESS_FILE);

	if harness_path.exists() && !force {
		anyhow::bail!("{HARNESS_FILE} already exists. Use --force to overwrite.");
	}

	std::fs::write(&harness_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", harness_path.display()))?;

	println!("Created {HARNESS_FILE}");
	Ok(ExitCode::SUCCESS)
}

fn handle_check(file: &Path) -> Result<ExitCode> {
	let loaded = load_harness(file).context("Failed to load harness")?;
	let report = run_harness(&loaded.harness);

	println!("Checking {}\n", loaded.path.display());
	for scenario in &report.scenarios {
		match &scenario.outcome {
			Outcome::Passed => println!("PASS  {}", scenario.name),
			Outcome::Failed { expected, actual } => {
				println!("FAIL  {}", scenario.name);
				println!("      expected: {expected}");
				println!("      actual:   {actual}");
			}
			Outcome::Errored(message) => println!("ERROR {}: {message}", scenario.name),
		}
	}
	println!("\n{} passed, {} failed", report.passed(), report.failed());

	if report.all_passed() {
		Ok(ExitCode::SUCCESS)
	} else {
		Ok(ExitCode::FAILURE)
	}
}

fn handle_show(file: &Path, only: Option<&str>) -> Result<ExitCode> {
	let loaded = load_harness(file).context("Failed to load harness")?;
	let scenarios: Vec<&Scenario> = match only {
		Some(name) => vec![loaded.harness.scenario(name)?],
		None => loaded.harness.scenarios.iter().collect(),
	};

	for scenario in scenarios {
		println!("# Scenario: {}", scenario.name);
		let chain = track_chain::harness::build_chain(scenario, None);
		if chain.is_empty() {
			println!("  (no levels)\n");
			continue;
		}
		for (depth, level) in chain.levels().iter().enumerate() {
			let mode = if level.contribution().overwrite {
				"overwrite"
			} else {
				"merge"
			};
			println!("## Level {depth} ({mode})");
			if let Some(snapshot) = level.snapshot() {
				let json = serde_json::to_string_pretty(snapshot)
					.context("Failed to serialize snapshot")?;
				println!("{json}");
			}
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_trigger(
	file: &Path,
	scenario_name: &str,
	event: Option<String>,
	payload: &[String],
	options: &[String],
) -> Result<ExitCode> {
	let loaded = load_harness(file).context("Failed to load harness")?;
	let mut scenario = loaded.harness.scenario(scenario_name)?.clone();

	if let Some(event) = event {
		scenario.trigger.event = event;
	}

	let spec = &mut scenario.trigger;
	let mut call_payload = spec.payload.take().or(spec.fields.take()).unwrap_or_default();
	apply_assignments(&mut call_payload, payload).context("Invalid --payload")?;
	spec.payload = Some(call_payload);
	apply_assignments(&mut spec.options, options).context("Invalid --option")?;

	let resolved = fire(&scenario, Some(echo_sink()))
		.with_context(|| format!("Failed to trigger scenario '{scenario_name}'"))?;
	let json = serde_json::to_string_pretty(&resolved).context("Failed to serialize event")?;
	println!("{json}");

	Ok(ExitCode::SUCCESS)
}

fn apply_assignments(target: &mut Fields, assignments: &[String]) -> Result<()> {
	for assignment in assignments {
		let (key, value) = parse_assignment(assignment)?;
		target.insert(key, value);
	}
	Ok(())
}
