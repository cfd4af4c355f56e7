use std::time::Duration;

use crate::dispatch::RunResult;

/// Outcome of a single completed pass.
#[derive(Debug, Clone)]
pub struct PassSummary {
	pub pass: usize,
	pub queries: usize,
	pub successful: usize,
	pub failed: usize,
	pub duration: Duration,
}

/// Cumulative counters across all passes of a run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
	pub passes: usize,
	pub total_queries: usize,
	pub total_successful: usize,
	pub total_failed: usize,
	pub total_duration: Duration,
}

impl RunStats {
	/// Fold one finished pass into the totals and return its summary row.
	pub fn record(
		&mut self,
		result: RunResult,
		queries: usize,
		duration: Duration,
	) -> PassSummary {
		self.passes += 1;
		self.total_queries += queries;
		self.total_successful += result.successful;
		self.total_failed += result.failed;
		self.total_duration += duration;
		PassSummary {
			pass: self.passes,
			queries,
			successful: result.successful,
			failed: result.failed,
			duration,
		}
	}

	/// Percentage of successful queries across all passes.
	pub fn success_rate(&self) -> f64 {
		if self.total_queries == 0 {
			return 0.0;
		}
		(self.total_successful as f64 / self.total_queries as f64) * 100.0
	}
}
