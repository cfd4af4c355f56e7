use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::corpus::QueryRecord;
use crate::resolver::QueryResolver;

/// Aggregate outcome of one pass over the corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunResult {
	pub successful: usize,
	pub failed: usize,
}

/// Run one pass: shuffle the corpus order, then resolve each record in turn
/// with a delay drawn uniformly from [0, max_delay_secs] before each
/// attempt.
///
/// Per-record failures are counted, never propagated, so every record is
/// attempted exactly once and successful + failed always equals the corpus
/// length. The corpus itself is left untouched; only the pass order is
/// shuffled.
pub async fn run_pass(
	corpus: &[QueryRecord],
	resolver: &dyn QueryResolver,
	max_delay_secs: u64,
	rng: &mut StdRng,
) -> RunResult {
	let mut order: Vec<&QueryRecord> = corpus.iter().collect();
	order.shuffle(rng);

	info!("generating {} queries", order.len());
	let mut result = RunResult::default();
	for record in order {
		let delay = rng.gen_range(0.0..=max_delay_secs as f64);
		tokio::time::sleep(Duration::from_secs_f64(delay)).await;

		match resolver.resolve(&record.name, &record.record_type).await {
			Ok(answers) => {
				debug!(name = %record.name, answers, "query successful");
				result.successful += 1;
			}
			Err(reason) => {
				debug!(name = %record.name, %reason, "query failed");
				result.failed += 1;
			}
		}
	}
	result
}
