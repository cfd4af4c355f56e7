mod cli;
mod config;
mod corpus;
mod dispatch;
mod orchestrator;
mod output;
mod resolver;
mod schedule;
mod stats;

use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::Cli;
use crate::orchestrator::Orchestrator;
use crate::resolver::UpstreamResolver;
use crate::schedule::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	init_logging(cli.verbose);

	// Config errors are fatal before the loop; the corpus falls back to the
	// built-in demonstration set instead
	let config = config::load_config(&cli.config)?;
	let corpus = corpus::load_corpus(&cli.queryfile, cli.format);

	let timeout = Duration::from_millis(cli.timeout);
	let (upstream, servers_label) = if cli.servers.is_empty() {
		(UpstreamResolver::from_system_conf(timeout)?, "system".to_string())
	} else {
		let mut servers = Vec::new();
		for s in &cli.servers {
			servers.push(resolver::parse_server(s)?);
		}
		let label = servers.iter()
			.map(|addr| addr.to_string())
			.collect::<Vec<_>>()
			.join(", ");
		(UpstreamResolver::new(&servers, timeout), label)
	};

	output::print_config_summary(
		&config, corpus.len(), cli.format, &servers_label, cli.run_once,
	);

	let rng = match cli.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_entropy(),
	};

	let pass_log = match &cli.output {
		Some(path) => Some(output::PassLog::create(path)?),
		None => None,
	};

	let mut orchestrator = Orchestrator::new(
		config,
		corpus,
		Box::new(upstream),
		Box::new(SystemClock),
		rng,
		pass_log,
	);
	let stats = orchestrator.run(cli.run_once).await?;

	output::print_summary_table(&stats);
	Ok(())
}

fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "info",
		1 => "debug",
		_ => "trace",
	};
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
		)
		.init();
}
