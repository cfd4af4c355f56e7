use std::fs::File;

use anyhow::{anyhow, Result};
use chrono::Local;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};

use crate::config::TrafficConfig;
use crate::corpus::QueryFormat;
use crate::stats::{PassSummary, RunStats};

/// Print a summary of the run configuration before the loop starts.
pub fn print_config_summary(
	config: &TrafficConfig,
	corpus_len: usize,
	format: QueryFormat,
	servers: &str,
	run_once: bool,
) {
	println!("DNS Traffic Generator");
	println!("=====================");
	println!("Corpus:     {} queries ({})", corpus_len, format_label(format));
	println!("Servers:    {}", servers);
	println!("Schedule:   {}", describe_schedule(config));
	println!("Max delay:  {} s", config.rtime);
	let mode = if run_once { "run-once" } else { "scheduled" };
	println!("Mode:       {}", mode);
	println!();
}

fn format_label(format: QueryFormat) -> &'static str {
	match format {
		QueryFormat::Queryperf => "queryperf",
		QueryFormat::Bind => "bind",
	}
}

fn describe_schedule(config: &TrafficConfig) -> String {
	match &config.schedule {
		None => "none".to_string(),
		Some(s) if s.continuous => "continuous".to_string(),
		Some(s) => {
			let days: Vec<String> = s.days.iter().map(|d| format!("{:?}", d)).collect();
			format!(
				"{} {}-{}",
				days.join(","),
				s.start_time.format("%H:%M"),
				s.end_time.format("%H:%M"),
			)
		}
	}
}

/// Print the cumulative traffic summary as a formatted table.
pub fn print_summary_table(stats: &RunStats) {
	let mut table = Table::new();
	table.load_preset(UTF8_FULL);
	table.set_content_arrangement(ContentArrangement::Dynamic);
	table.set_header(vec![
		"Passes", "Queries", "Successful", "Failed", "Success %", "Query time",
	]);
	table.add_row(vec![
		stats.passes.to_string(),
		stats.total_queries.to_string(),
		stats.total_successful.to_string(),
		stats.total_failed.to_string(),
		format!("{:.1}%", stats.success_rate()),
		format!("{:.1} s", stats.total_duration.as_secs_f64()),
	]);

	println!("\nTraffic Summary");
	println!("===============\n");
	println!("{table}");
}

/// CSV log of per-pass outcomes, one row appended per completed pass.
pub struct PassLog {
	writer: csv::Writer<File>,
}

impl PassLog {
	/// Create the log file and write the header row.
	pub fn create(path: &str) -> Result<PassLog> {
		let mut writer = csv::Writer::from_path(path)
			.map_err(|e| anyhow!("failed to open pass log '{}': {}", path, e))?;
		writer.write_record([
			"timestamp", "pass", "queries", "successful", "failed", "duration_s",
		])?;
		writer.flush()?;
		Ok(PassLog { writer })
	}

	/// Write one pass row and flush, so rows survive an external kill.
	pub fn record(&mut self, summary: &PassSummary) -> Result<()> {
		self.writer.write_record([
			Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
			summary.pass.to_string(),
			summary.queries.to_string(),
			summary.successful.to_string(),
			summary.failed.to_string(),
			format!("{:.1}", summary.duration.as_secs_f64()),
		])?;
		self.writer.flush()?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::ScheduleConfig;
	use chrono::{NaiveTime, Weekday};
	use std::time::Duration;

	#[test]
	fn test_describe_no_schedule() {
		let config = TrafficConfig { schedule: None, rtime: 11 };
		assert_eq!(describe_schedule(&config), "none");
	}

	#[test]
	fn test_describe_continuous() {
		let config = TrafficConfig {
			schedule: Some(ScheduleConfig {
				continuous: true,
				days: Vec::new(),
				start_time: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
				end_time: NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
			}),
			rtime: 11,
		};
		assert_eq!(describe_schedule(&config), "continuous");
	}

	#[test]
	fn test_describe_window() {
		let config = TrafficConfig {
			schedule: Some(ScheduleConfig {
				continuous: false,
				days: vec![Weekday::Mon, Weekday::Fri],
				start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
				end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
			}),
			rtime: 11,
		};
		assert_eq!(describe_schedule(&config), "Mon,Fri 09:00-17:00");
	}

	#[test]
	fn test_pass_log_rows() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("passes.csv");
		let path = path.to_str().unwrap();

		let mut log = PassLog::create(path).unwrap();
		log.record(&PassSummary {
			pass: 1,
			queries: 4,
			successful: 3,
			failed: 1,
			duration: Duration::from_secs(12),
		}).unwrap();
		drop(log);

		let content = std::fs::read_to_string(path).unwrap();
		let mut lines = content.lines();
		assert_eq!(
			lines.next().unwrap(),
			"timestamp,pass,queries,successful,failed,duration_s",
		);
		let row = lines.next().unwrap();
		assert!(row.ends_with(",1,4,3,1,12.0"), "unexpected row: {}", row);
	}
}
