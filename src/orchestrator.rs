use std::time::{Duration, Instant};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::TrafficConfig;
use crate::corpus::QueryRecord;
use crate::dispatch;
use crate::output::PassLog;
use crate::resolver::QueryResolver;
use crate::schedule::{self, Clock};
use crate::stats::RunStats;

/// Top-level control loop: decides when passes run, paces the idle waits,
/// and accumulates pass outcomes.
///
/// The loop is strictly sequential. Every suspension point is a bounded
/// sleep (per-query delay, window wait, inter-cycle pause); passes never
/// overlap.
pub struct Orchestrator {
	config: TrafficConfig,
	corpus: Vec<QueryRecord>,
	resolver: Box<dyn QueryResolver>,
	clock: Box<dyn Clock>,
	rng: StdRng,
	pass_log: Option<PassLog>,
}

impl Orchestrator {
	pub fn new(
		config: TrafficConfig,
		corpus: Vec<QueryRecord>,
		resolver: Box<dyn QueryResolver>,
		clock: Box<dyn Clock>,
		rng: StdRng,
		pass_log: Option<PassLog>,
	) -> Orchestrator {
		Orchestrator { config, corpus, resolver, clock, rng, pass_log }
	}

	/// Run the traffic loop until the schedule says stop.
	///
	/// In run-once mode a single pass executes unconditionally, with no
	/// schedule evaluation. Otherwise the loop runs until no schedule is
	/// defined; an open window runs a pass, a closed one sleeps until the
	/// window next opens and then re-evaluates rather than assuming
	/// eligibility.
	pub async fn run(&mut self, run_once: bool) -> Result<RunStats> {
		let mut stats = RunStats::default();

		if run_once {
			self.run_pass(&mut stats).await?;
			return Ok(stats);
		}

		loop {
			let now = self.clock.now();
			if schedule::is_scheduled(self.config.schedule.as_ref(), now) {
				info!("traffic window open, running pass");
				self.run_pass(&mut stats).await?;
			} else {
				let Some(window) = self.config.schedule.as_ref() else {
					warn!("no schedule defined, stopping");
					return Ok(stats);
				};
				let wait = schedule::wait_until_window(
					now.time(), window.start_time, window.end_time,
				);
				info!(wait_secs = wait.as_secs(), "traffic window closed, waiting");
				tokio::time::sleep(wait).await;
			}

			// Randomized pause between cycles to avoid a tight re-check loop
			let pause = self.rng.gen_range(1..=21);
			debug!(pause_secs = pause, "inter-cycle pause");
			tokio::time::sleep(Duration::from_secs(pause)).await;
		}
	}

	async fn run_pass(&mut self, stats: &mut RunStats) -> Result<()> {
		let started = Instant::now();
		let result = dispatch::run_pass(
			&self.corpus, self.resolver.as_ref(), self.config.rtime, &mut self.rng,
		).await;

		let summary = stats.record(result, self.corpus.len(), started.elapsed());
		info!(
			pass = summary.pass,
			successful = summary.successful,
			failed = summary.failed,
			"pass complete",
		);
		if let Some(log) = &mut self.pass_log {
			log.record(&summary)?;
		}
		Ok(())
	}
}
