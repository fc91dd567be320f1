//! Dispatch events and their payloads.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;

/// Role of a server within a read/write split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerRole {
	/// Primary that accepts writes.
	Master,
	/// Read replica.
	Slave,
}

impl ServerRole {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Master => "master",
			Self::Slave => "slave",
		}
	}
}

impl fmt::Display for ServerRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The four points at which the data-access layer dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterceptEvent {
	/// Before probing a server's reachability.
	ServerStateScanning,
	/// After probing a server's reachability.
	ServerStateScanned,
	/// Before a command's connection string is replaced.
	ConnectionStringUpdating,
	/// After a command's connection string was replaced.
	ConnectionStringUpdated,
}

impl InterceptEvent {
	pub const ALL: [InterceptEvent; 4] = [
		Self::ServerStateScanning,
		Self::ServerStateScanned,
		Self::ConnectionStringUpdating,
		Self::ConnectionStringUpdated,
	];

	/// Stable event name.
	pub const fn name(self) -> &'static str {
		match self {
			Self::ServerStateScanning => "server-state:scanning",
			Self::ServerStateScanned => "server-state:scanned",
			Self::ConnectionStringUpdating => "connection-string:updating",
			Self::ConnectionStringUpdated => "connection-string:updated",
		}
	}
}

impl fmt::Display for InterceptEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for InterceptEvent {
	type Err = RoutingError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|event| event.name() == s)
			.ok_or_else(|| RoutingError::InvalidArgument(format!("unknown event: {s:?}")))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStateScanning {
	pub connection_string: String,
	pub role: ServerRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStateScanned {
	pub connection_string: String,
	pub role: ServerRole,
	/// Whether the probe found the server reachable.
	pub available: bool,
	pub elapsed: Duration,
}

/// Payload for [`InterceptEvent::ConnectionStringUpdating`].
///
/// Interceptors receive this mutably and may replace `connection_string`
/// before the command is retargeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStringUpdating {
	pub command_text: String,
	/// Proposed target for the command.
	pub connection_string: String,
	pub role: ServerRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStringUpdated {
	pub command_text: String,
	pub previous: String,
	pub current: String,
	pub role: ServerRole,
}

/// Borrowed event payload handed through a dispatch unchanged.
#[derive(Debug)]
pub enum EventArgs<'a> {
	ServerStateScanning(&'a ServerStateScanning),
	ServerStateScanned(&'a ServerStateScanned),
	ConnectionStringUpdating(&'a mut ConnectionStringUpdating),
	ConnectionStringUpdated(&'a ConnectionStringUpdated),
}

impl EventArgs<'_> {
	pub fn event(&self) -> InterceptEvent {
		match self {
			Self::ServerStateScanning(_) => InterceptEvent::ServerStateScanning,
			Self::ServerStateScanned(_) => InterceptEvent::ServerStateScanned,
			Self::ConnectionStringUpdating(_) => InterceptEvent::ConnectionStringUpdating,
			Self::ConnectionStringUpdated(_) => InterceptEvent::ConnectionStringUpdated,
		}
	}

	pub fn role(&self) -> ServerRole {
		match self {
			Self::ServerStateScanning(args) => args.role,
			Self::ServerStateScanned(args) => args.role,
			Self::ConnectionStringUpdating(args) => args.role,
			Self::ConnectionStringUpdated(args) => args.role,
		}
	}
}
