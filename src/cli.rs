use clap::{ArgAction, Parser};

use crate::corpus::QueryFormat;

/// Scheduled DNS traffic generator
#[derive(Parser, Debug)]
#[command(name = "dns-traffic-gen")]
#[command(about = "Generate paced synthetic DNS query traffic on a recurring schedule")]
pub struct Cli {
	/// Configuration file (YAML)
	#[arg(short = 'c', long = "config", default_value = "config.yml")]
	pub config: String,

	/// Query input file
	#[arg(short = 'q', long = "queryfile", default_value = "sample_queries")]
	pub queryfile: String,

	/// Query input file format
	#[arg(long = "format", value_enum, default_value_t = QueryFormat::Queryperf)]
	pub format: QueryFormat,

	/// Run exactly one pass, ignoring the schedule
	#[arg(long = "run-once")]
	pub run_once: bool,

	/// Upstream DNS server (repeatable, e.g. 10.0.0.53 or 10.0.0.53:5353);
	/// defaults to the system resolver configuration
	#[arg(short = 'r', long = "server")]
	pub servers: Vec<String>,

	/// Per-query lookup timeout in milliseconds
	#[arg(short = 't', long = "timeout", default_value = "5000")]
	pub timeout: u64,

	/// CSV file to log per-pass outcomes to
	#[arg(short = 'o', long = "output")]
	pub output: Option<String>,

	/// Random seed for reproducible shuffles and delays
	#[arg(short = 's', long = "seed")]
	pub seed: Option<u64>,

	/// Increase log verbosity (-v: debug, -vv: trace)
	#[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
	pub verbose: u8,
}
