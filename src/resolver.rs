use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hickory_proto::rr::RecordType;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{ResolveError, TokioResolver};
use thiserror::Error;
use tracing::debug;

/// Why a single resolution attempt failed.
///
/// Kinds are logged per query but collapse to a single failure count in the
/// pass aggregate.
#[derive(Debug, Error)]
pub enum ResolveFailure {
	#[error("invalid record type '{0}'")]
	RecordType(String),
	#[error("{0}")]
	Lookup(#[from] ResolveError),
}

/// Resolution collaborator: resolves one (name, record type) pair and
/// reports success with the answer count, or the failure reason.
#[async_trait]
pub trait QueryResolver: Send + Sync {
	async fn resolve(&self, name: &str, record_type: &str) -> Result<usize, ResolveFailure>;
}

/// Production resolver backed by hickory, querying either explicit upstream
/// servers or the system resolver configuration.
pub struct UpstreamResolver {
	inner: TokioResolver,
}

impl UpstreamResolver {
	/// Build a resolver that queries the given upstream servers over UDP.
	pub fn new(servers: &[SocketAddr], timeout: Duration) -> UpstreamResolver {
		let mut group = NameServerConfigGroup::new();
		for addr in servers {
			let single = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
			for ns in single.iter() {
				group.push(ns.clone());
			}
		}
		let config = ResolverConfig::from_parts(None, Vec::new(), group);
		let mut builder =
			TokioResolver::builder_with_config(config, TokioConnectionProvider::default());
		builder.options_mut().timeout = timeout;
		UpstreamResolver { inner: builder.build() }
	}

	/// Build a resolver from the system configuration (/etc/resolv.conf).
	pub fn from_system_conf(timeout: Duration) -> Result<UpstreamResolver> {
		let mut builder = TokioResolver::builder_tokio()
			.map_err(|e| anyhow!("failed to read system resolver configuration: {}", e))?;
		builder.options_mut().timeout = timeout;
		Ok(UpstreamResolver { inner: builder.build() })
	}
}

#[async_trait]
impl QueryResolver for UpstreamResolver {
	async fn resolve(&self, name: &str, record_type: &str) -> Result<usize, ResolveFailure> {
		let rtype = record_type
			.to_uppercase()
			.parse::<RecordType>()
			.map_err(|_| ResolveFailure::RecordType(record_type.to_string()))?;

		let lookup = self.inner.lookup(name, rtype).await?;
		for record in lookup.records() {
			debug!(%record, "answer");
		}
		Ok(lookup.records().len())
	}
}

/// Parse an upstream server address string.
///
/// Supports formats:
///   "10.0.0.53"            -- IPv4, default port 53
///   "10.0.0.53:5353"       -- IPv4 with explicit port
///   "2606:4700::1111"      -- bare IPv6, default port 53
///   "[2606:4700::1111]:53" -- bracketed IPv6 with port
pub fn parse_server(input: &str) -> Result<SocketAddr> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return Err(anyhow!("empty server address"));
	}

	let addr: SocketAddr = if trimmed.starts_with('[') {
		// Bracketed IPv6 with port: [::1]:53
		trimmed.parse()
			.map_err(|e| anyhow!("invalid bracketed IPv6 address '{}': {}", trimmed, e))?
	} else if trimmed.contains("::") || trimmed.matches(':').count() > 1 {
		// Bare IPv6 address without port
		let ip = trimmed.parse()
			.map_err(|e| anyhow!("invalid IPv6 address '{}': {}", trimmed, e))?;
		SocketAddr::new(ip, 53)
	} else if let Ok(addr) = trimmed.parse::<SocketAddr>() {
		// IPv4 with port (e.g. "10.0.0.53:5353")
		addr
	} else {
		// Plain IPv4 without port
		let ip = trimmed.parse()
			.map_err(|e| anyhow!("invalid IP address '{}': {}", trimmed, e))?;
		SocketAddr::new(ip, 53)
	};

	Ok(addr)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ipv4_no_port() {
		let addr = parse_server("10.0.0.53").unwrap();
		assert_eq!(addr.port(), 53);
		assert_eq!(addr.ip().to_string(), "10.0.0.53");
	}

	#[test]
	fn test_ipv4_with_port() {
		let addr = parse_server("10.0.0.53:5353").unwrap();
		assert_eq!(addr.port(), 5353);
		assert_eq!(addr.ip().to_string(), "10.0.0.53");
	}

	#[test]
	fn test_ipv6_bare() {
		let addr = parse_server("2606:4700::1111").unwrap();
		assert_eq!(addr.port(), 53);
	}

	#[test]
	fn test_ipv6_bracketed() {
		let addr = parse_server("[2606:4700::1111]:5353").unwrap();
		assert_eq!(addr.port(), 5353);
	}

	#[test]
	fn test_invalid_input() {
		assert!(parse_server("not-an-ip").is_err());
		assert!(parse_server("").is_err());
	}

	#[test]
	fn test_record_type_parses_case_insensitively() {
		// Corpus files from the original tool carry lowercase types
		assert!("a".to_uppercase().parse::<RecordType>().is_ok());
		assert!("aaaa".to_uppercase().parse::<RecordType>().is_ok());
		assert!("Mx".to_uppercase().parse::<RecordType>().is_ok());
	}
}
