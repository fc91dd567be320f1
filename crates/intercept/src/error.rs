use std::path::PathBuf;

use thiserror::Error;

use crate::event::InterceptEvent;

/// Errors raised by argument validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
}

/// A single interceptor callback failure.
#[derive(Error, Debug)]
#[error("interceptor {interceptor:?} failed on {event}: {source}")]
pub struct InterceptorFailure {
	pub interceptor: String,
	pub event: InterceptEvent,
	#[source]
	pub source: anyhow::Error,
}

/// Errors returned by [`crate::Dispatcher`].
#[derive(Error, Debug)]
pub enum DispatchError {
	/// First failing callback under fail-fast delivery. Later interceptors
	/// were not invoked.
	#[error(transparent)]
	Interceptor(#[from] InterceptorFailure),
	/// Every failure seen under collect-and-continue delivery, in dispatch
	/// order.
	#[error("{} interceptor(s) failed on {event}", .failures.len())]
	Collected {
		event: InterceptEvent,
		failures: Vec<InterceptorFailure>,
	},
	#[error(transparent)]
	InvalidArgument(#[from] RoutingError),
}

impl DispatchError {
	/// Failures carried by this error, in dispatch order.
	pub fn failures(&self) -> &[InterceptorFailure] {
		match self {
			Self::Interceptor(failure) => std::slice::from_ref(failure),
			Self::Collected { failures, .. } => failures.as_slice(),
			Self::InvalidArgument(_) => &[],
		}
	}
}

/// Errors loading a [`crate::DispatchConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse dispatch config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error(transparent)]
	InvalidArgument(#[from] RoutingError),
}

/// Errors raised at the data-access call points.
#[derive(Error, Debug)]
pub enum ProbeError {
	#[error(transparent)]
	Dispatch(#[from] DispatchError),
}
