//! The interceptor capability trait.

use crate::context::ContextType;
use crate::event::{
	ConnectionStringUpdated, ConnectionStringUpdating, EventArgs, ServerStateScanned,
	ServerStateScanning,
};

/// Receives routing events for one database-context type and its subtypes.
///
/// Callbacks run synchronously on the thread that issued the dispatch,
/// usually the thread executing a database command. They must be short and
/// must not block. The dispatcher does not enforce a timeout.
///
/// Every callback defaults to a no-op, so implementors override only the
/// events they care about.
pub trait Interceptor: Send + Sync {
	/// Context type this interceptor applies to. Derived contexts match too.
	fn target_context(&self) -> &'static ContextType;

	/// Name used in logs and failure reports.
	fn name(&self) -> &str {
		self.target_context().name()
	}

	fn on_server_state_scanning(&self, _args: &ServerStateScanning) -> anyhow::Result<()> {
		Ok(())
	}

	fn on_server_state_scanned(&self, _args: &ServerStateScanned) -> anyhow::Result<()> {
		Ok(())
	}

	/// May rewrite `args.connection_string` to redirect the command.
	fn on_connection_string_updating(
		&self,
		_args: &mut ConnectionStringUpdating,
	) -> anyhow::Result<()> {
		Ok(())
	}

	fn on_connection_string_updated(&self, _args: &ConnectionStringUpdated) -> anyhow::Result<()> {
		Ok(())
	}

	/// Routes an event to its callback.
	fn handle(&self, args: &mut EventArgs<'_>) -> anyhow::Result<()> {
		match args {
			EventArgs::ServerStateScanning(a) => self.on_server_state_scanning(a),
			EventArgs::ServerStateScanned(a) => self.on_server_state_scanned(a),
			EventArgs::ConnectionStringUpdating(a) => self.on_connection_string_updating(a),
			EventArgs::ConnectionStringUpdated(a) => self.on_connection_string_updated(a),
		}
	}
}
