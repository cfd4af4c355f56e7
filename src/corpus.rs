use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing::warn;

/// Flat-file formats understood by the corpus loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryFormat {
	/// `name type` pairs, one per line (queryperf input format)
	Queryperf,
	/// BIND query-log lines (`... query: <name> IN <type> ...`)
	Bind,
}

/// A single query to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
	pub name: String,
	pub record_type: String,
}

impl QueryRecord {
	fn new(name: &str, record_type: &str) -> QueryRecord {
		QueryRecord {
			name: name.to_string(),
			record_type: record_type.to_string(),
		}
	}
}

/// Return the built-in demonstration corpus, used when no query file is
/// readable. One entry is a known-unresolvable name so both counters move.
pub fn default_corpus() -> Vec<QueryRecord> {
	vec![
		QueryRecord::new("www.google.com", "A"),
		QueryRecord::new("www.infoblox.com", "A"),
		QueryRecord::new("failme.infoblox.com", "A"),
		QueryRecord::new("csp.infoblox.com", "A"),
	]
}

/// Parse one queryperf-style line: whitespace-separated `name type`.
fn parse_queryperf_line(line: &str) -> Option<QueryRecord> {
	let mut fields = line.split_whitespace();
	let name = fields.next()?;
	let record_type = fields.next()?;
	Some(QueryRecord::new(name, record_type))
}

/// Parse one BIND query-log line.
///
/// Looks for the `query:` token and takes the `<name> IN <type>` triple
/// that follows it; anything else is malformed.
fn parse_bind_line(line: &str) -> Option<QueryRecord> {
	let fields: Vec<&str> = line.split_whitespace().collect();
	let marker = fields.iter().position(|f| *f == "query:")?;
	let name = fields.get(marker + 1)?;
	let class = fields.get(marker + 2)?;
	if !class.eq_ignore_ascii_case("IN") {
		return None;
	}
	let record_type = fields.get(marker + 3)?;
	Some(QueryRecord::new(name, record_type))
}

/// Read a query corpus from a file in the given format.
///
/// Blank lines and lines starting with '#' or ';' are skipped. Malformed
/// lines are skipped with a line-number diagnostic, never fatal. An
/// unreadable file is an error; the caller decides the fallback.
pub fn read_query_file(path: &str, format: QueryFormat) -> Result<Vec<QueryRecord>> {
	let content = std::fs::read_to_string(path)
		.map_err(|e| anyhow!("failed to read query file '{}': {}", path, e))?;

	let mut records = Vec::new();
	for (idx, line) in content.lines().enumerate() {
		let trimmed = line.trim();
		if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
			continue;
		}
		let parsed = match format {
			QueryFormat::Queryperf => parse_queryperf_line(trimmed),
			QueryFormat::Bind => parse_bind_line(trimmed),
		};
		match parsed {
			Some(record) => records.push(record),
			None => warn!(line = idx + 1, "skipping malformed query line in '{}'", path),
		}
	}
	Ok(records)
}

/// Load the corpus, falling back to the demonstration corpus when the file
/// cannot be read.
pub fn load_corpus(path: &str, format: QueryFormat) -> Vec<QueryRecord> {
	match read_query_file(path, format) {
		Ok(records) => records,
		Err(e) => {
			warn!("{}; using built-in demonstration corpus", e);
			default_corpus()
		}
	}
}
