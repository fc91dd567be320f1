//! The dispatch points used by the data-access layer.
//!
//! [`scan_server`] wraps a reachability probe between the two server-state
//! events. [`retarget_command`] wraps a connection-string change between
//! the two connection-string events. Only the dispatch is done here. Which
//! server gets picked is the caller's decision.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::context::ContextType;
use crate::dispatch::Dispatcher;
use crate::error::ProbeError;
use crate::event::{
	ConnectionStringUpdated, ConnectionStringUpdating, ServerRole, ServerStateScanned,
	ServerStateScanning,
};

/// Checks whether a server accepts connections.
pub trait ServerProbe: Send + Sync {
	fn probe(&self, connection_string: &str, role: ServerRole) -> anyhow::Result<bool>;
}

impl<F> ServerProbe for F
where
	F: Fn(&str, ServerRole) -> anyhow::Result<bool> + Send + Sync,
{
	fn probe(&self, connection_string: &str, role: ServerRole) -> anyhow::Result<bool> {
		self(connection_string, role)
	}
}

/// Result of [`scan_server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerState {
	pub connection_string: String,
	pub role: ServerRole,
	pub available: bool,
	pub elapsed: Duration,
}

/// Probes one server, dispatching the scanning and scanned events around it.
///
/// A probe error counts as "unavailable" and is logged rather than returned.
/// Interceptor failures are returned as configured on `dispatcher`. A
/// failure in the scanning event skips the probe.
pub fn scan_server(
	dispatcher: &Dispatcher,
	context: &ContextType,
	probe: &dyn ServerProbe,
	connection_string: &str,
	role: ServerRole,
) -> Result<ServerState, ProbeError> {
	let scanning = ServerStateScanning {
		connection_string: connection_string.to_owned(),
		role,
	};
	dispatcher.server_state_scanning(context, &scanning)?;

	let start = Instant::now();
	let available = match probe.probe(connection_string, role) {
		Ok(available) => available,
		Err(error) => {
			warn!(%context, %role, %error, "Server probe failed; treating as unavailable");
			false
		}
	};
	let elapsed = start.elapsed();
	debug!(%context, %role, available, elapsed_ms = elapsed.as_millis() as u64, "Server scanned");

	let scanned = ServerStateScanned {
		connection_string: scanning.connection_string,
		role,
		available,
		elapsed,
	};
	dispatcher.server_state_scanned(context, &scanned)?;

	Ok(ServerState {
		connection_string: scanned.connection_string,
		role,
		available,
		elapsed,
	})
}

/// Moves a command from `current` to `target`, dispatching the updating and
/// updated events around the change.
///
/// Interceptors on the updating event may rewrite the target. The string
/// they leave is the one reported as `current` to the updated event and
/// returned.
pub fn retarget_command(
	dispatcher: &Dispatcher,
	context: &ContextType,
	command_text: &str,
	current: &str,
	target: &str,
	role: ServerRole,
) -> Result<String, ProbeError> {
	let mut updating = ConnectionStringUpdating {
		command_text: command_text.to_owned(),
		connection_string: target.to_owned(),
		role,
	};
	dispatcher.connection_string_updating(context, &mut updating)?;

	if updating.connection_string != target {
		debug!(%context, %role, "Connection string rewritten by interceptor");
	}

	let updated = ConnectionStringUpdated {
		command_text: updating.command_text,
		previous: current.to_owned(),
		current: updating.connection_string,
		role,
	};
	dispatcher.connection_string_updated(context, &updated)?;

	Ok(updated.current)
}
