//! Dispatch configuration loaded from TOML.
//!
//! ```toml
//! policy = "collect-and-continue"
//! slow-callback-threshold-ms = 25
//! ```
//!
//! A missing key falls back to its default. A threshold of `0` disables the
//! slow-callback warning.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RoutingError};

/// Callbacks running longer than this are logged at `warn`.
pub const DEFAULT_SLOW_CALLBACK_THRESHOLD: Duration = Duration::from_millis(50);

/// How a dispatch reacts to a failing interceptor callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchPolicy {
	/// Abort delivery at the first failure and return it.
	#[default]
	FailFast,
	/// Deliver to every interceptor, then report all failures together.
	CollectAndContinue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
	pub policy: DispatchPolicy,
	/// `None` disables the slow-callback warning.
	pub slow_callback_threshold: Option<Duration>,
}

impl Default for DispatchConfig {
	fn default() -> Self {
		Self {
			policy: DispatchPolicy::FailFast,
			slow_callback_threshold: Some(DEFAULT_SLOW_CALLBACK_THRESHOLD),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawDispatchConfig {
	policy: Option<DispatchPolicy>,
	slow_callback_threshold_ms: Option<u64>,
}

impl DispatchConfig {
	pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn with_slow_callback_threshold(mut self, threshold: Option<Duration>) -> Self {
		self.slow_callback_threshold = threshold;
		self
	}

	/// Parses a config from TOML text.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let raw: RawDispatchConfig = toml::from_str(input)?;
		let defaults = Self::default();

		let slow_callback_threshold = match raw.slow_callback_threshold_ms {
			None => defaults.slow_callback_threshold,
			Some(0) => None,
			Some(ms) => Some(Duration::from_millis(ms)),
		};

		let config = Self {
			policy: raw.policy.unwrap_or(defaults.policy),
			slow_callback_threshold,
		};
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::from_toml_str(&text)?;
		tracing::debug!(path = %path.display(), policy = ?config.policy, "Loaded dispatch config");
		Ok(config)
	}

	fn validate(&self) -> Result<(), RoutingError> {
		if let Some(threshold) = self.slow_callback_threshold
			&& threshold > Duration::from_secs(60)
		{
			return Err(RoutingError::InvalidArgument(format!(
				"slow-callback-threshold-ms must not exceed 60000, got {}",
				threshold.as_millis()
			)));
		}
		Ok(())
	}
}
