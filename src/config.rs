use anyhow::{anyhow, Result};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Top-level configuration document loaded at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct TrafficConfig {
	/// Recurring traffic window; absent means no schedule is defined.
	pub schedule: Option<ScheduleConfig>,
	/// Maximum per-query delay in seconds
	#[serde(default = "default_rtime")]
	pub rtime: u64,
}

/// Recurring daily traffic window: eligible weekdays plus a time-of-day
/// range. When `continuous` is set the day and time fields are ignored
/// entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
	#[serde(default)]
	pub continuous: bool,
	#[serde(default, deserialize_with = "deserialize_days")]
	pub days: Vec<Weekday>,
	#[serde(default = "default_start_time", deserialize_with = "deserialize_time")]
	pub start_time: NaiveTime,
	#[serde(default = "default_end_time", deserialize_with = "deserialize_time")]
	pub end_time: NaiveTime,
}

fn default_rtime() -> u64 {
	11
}

fn default_start_time() -> NaiveTime {
	NaiveTime::from_hms_opt(0, 0, 0).unwrap()
}

fn default_end_time() -> NaiveTime {
	NaiveTime::from_hms_opt(23, 59, 0).unwrap()
}

/// Parse a time of day in either "HHMM" or "HH:MM" form.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
	let trimmed = input.trim();
	NaiveTime::parse_from_str(trimmed, "%H%M")
		.or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
		.map_err(|e| anyhow!("invalid time of day '{}': {}", trimmed, e))
}

fn deserialize_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;
	parse_time(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_days<'de, D>(deserializer: D) -> Result<Vec<Weekday>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Vec::<String>::deserialize(deserializer)?;
	raw.iter()
		.map(|day| {
			day.trim().parse::<Weekday>().map_err(|_| {
				serde::de::Error::custom(format!("invalid day of week '{}'", day))
			})
		})
		.collect()
}

/// Load the YAML configuration document.
///
/// A missing or malformed file is fatal; per the startup contract there is
/// no fallback configuration.
pub fn load_config(path: &str) -> Result<TrafficConfig> {
	let content = std::fs::read_to_string(path)
		.map_err(|e| anyhow!("failed to read config file '{}': {}", path, e))?;
	let config: TrafficConfig = serde_yaml::from_str(&content)
		.map_err(|e| anyhow!("failed to parse config file '{}': {}", path, e))?;

	if let Some(schedule) = &config.schedule {
		if !schedule.continuous && schedule.start_time > schedule.end_time {
			warn!(
				start = %schedule.start_time, end = %schedule.end_time,
				"window start is after window end; the window will never open",
			);
		}
	}

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_parse_time_compact() {
		let t = parse_time("0900").unwrap();
		assert_eq!(t, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
	}

	#[test]
	fn test_parse_time_colon() {
		let t = parse_time("17:30").unwrap();
		assert_eq!(t, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
	}

	#[test]
	fn test_parse_time_invalid() {
		assert!(parse_time("2500").is_err());
		assert!(parse_time("not-a-time").is_err());
	}

	#[test]
	fn test_full_document() {
		let yaml = "\
schedule:
  continuous: false
  days: [monday, tuesday, friday]
  start_time: '0900'
  end_time: '1700'
rtime: 5
";
		let config: TrafficConfig = serde_yaml::from_str(yaml).unwrap();
		let schedule = config.schedule.unwrap();
		assert!(!schedule.continuous);
		assert_eq!(schedule.days, vec![Weekday::Mon, Weekday::Tue, Weekday::Fri]);
		assert_eq!(schedule.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
		assert_eq!(schedule.end_time, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
		assert_eq!(config.rtime, 5);
	}

	#[test]
	fn test_schedule_defaults() {
		// Only days restricted: window defaults to the whole day
		let yaml = "\
schedule:
  days: [saturday, sunday]
";
		let config: TrafficConfig = serde_yaml::from_str(yaml).unwrap();
		let schedule = config.schedule.unwrap();
		assert!(!schedule.continuous);
		assert_eq!(schedule.start_time, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
		assert_eq!(schedule.end_time, NaiveTime::from_hms_opt(23, 59, 0).unwrap());
		assert_eq!(config.rtime, 11);
	}

	#[test]
	fn test_no_schedule_section() {
		let config: TrafficConfig = serde_yaml::from_str("rtime: 3\n").unwrap();
		assert!(config.schedule.is_none());
		assert_eq!(config.rtime, 3);
	}

	#[test]
	fn test_continuous_schedule() {
		let yaml = "\
schedule:
  continuous: true
";
		let config: TrafficConfig = serde_yaml::from_str(yaml).unwrap();
		assert!(config.schedule.unwrap().continuous);
	}

	#[test]
	fn test_invalid_day_rejected() {
		let yaml = "\
schedule:
  days: [funday]
";
		assert!(serde_yaml::from_str::<TrafficConfig>(yaml).is_err());
	}

	#[test]
	fn test_invalid_time_rejected() {
		let yaml = "\
schedule:
  start_time: '9am'
";
		assert!(serde_yaml::from_str::<TrafficConfig>(yaml).is_err());
	}

	#[test]
	fn test_load_config_missing_file() {
		let result = load_config("/nonexistent/config.yml");
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("failed to read"));
	}

	#[test]
	fn test_load_config_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "schedule:\n  continuous: true\nrtime: 2").unwrap();
		let config = load_config(file.path().to_str().unwrap()).unwrap();
		assert!(config.schedule.unwrap().continuous);
		assert_eq!(config.rtime, 2);
	}
}
