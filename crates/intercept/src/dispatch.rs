//! Synchronous fan-out of routing events to matching interceptors.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::config::{DispatchConfig, DispatchPolicy};
use crate::context::{ContextType, matches};
use crate::error::{DispatchError, InterceptorFailure, RoutingError};
use crate::event::{
	ConnectionStringUpdated, ConnectionStringUpdating, EventArgs, InterceptEvent,
	ServerStateScanned, ServerStateScanning,
};
use crate::interceptor::Interceptor;
use crate::registry::InterceptorRegistry;

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
	pub event: InterceptEvent,
	/// Number of callbacks invoked.
	pub delivered: usize,
}

/// Delivers events to the interceptors registered for a context type.
///
/// Each dispatch loads one registry snapshot and works from it to the end,
/// so concurrent registration changes are seen either entirely or not at
/// all. Delivery follows snapshot order. Nothing orders one dispatch against
/// another.
pub struct Dispatcher {
	registry: Arc<InterceptorRegistry>,
	config: DispatchConfig,
}

impl Dispatcher {
	pub fn new(registry: Arc<InterceptorRegistry>) -> Self {
		Self::with_config(registry, DispatchConfig::default())
	}

	pub fn with_config(registry: Arc<InterceptorRegistry>, config: DispatchConfig) -> Self {
		Self { registry, config }
	}

	#[inline]
	pub fn registry(&self) -> &Arc<InterceptorRegistry> {
		&self.registry
	}

	#[inline]
	pub fn config(&self) -> &DispatchConfig {
		&self.config
	}

	/// Interceptors in the current snapshot whose target context is `context`
	/// or one of its bases, in snapshot order.
	pub fn applicable(&self, context: &ContextType) -> Vec<Arc<dyn Interceptor>> {
		self.registry
			.snapshot()
			.iter()
			.filter(|i| matches(i.target_context(), context))
			.cloned()
			.collect()
	}

	/// Invokes the callback for `args` on every applicable interceptor.
	///
	/// Under [`DispatchPolicy::FailFast`] the first failure ends delivery and
	/// is returned. Under [`DispatchPolicy::CollectAndContinue`] delivery
	/// always completes and any failures are returned together. Panics from
	/// a callback are not caught.
	pub fn dispatch(
		&self,
		context: &ContextType,
		args: &mut EventArgs<'_>,
	) -> Result<DispatchReport, DispatchError> {
		let event = args.event();
		let snap = self.registry.snapshot();
		let mut delivered = 0;
		let mut failures = Vec::new();

		for interceptor in snap.iter().filter(|i| matches(i.target_context(), context)) {
			delivered += 1;
			let Err(source) = self.invoke(interceptor.as_ref(), event, args) else {
				continue;
			};

			let failure = InterceptorFailure {
				interceptor: interceptor.name().to_owned(),
				event,
				source,
			};
			match self.config.policy {
				DispatchPolicy::FailFast => {
					debug!(
						%event,
						%context,
						interceptor = %failure.interceptor,
						delivered,
						"Dispatch aborted by interceptor failure"
					);
					return Err(failure.into());
				}
				DispatchPolicy::CollectAndContinue => {
					warn!(
						%event,
						%context,
						interceptor = %failure.interceptor,
						error = %failure.source,
						"Interceptor failed; continuing delivery"
					);
					failures.push(failure);
				}
			}
		}

		debug!(%event, %context, delivered, failed = failures.len(), "Dispatched");

		if failures.is_empty() {
			Ok(DispatchReport { event, delivered })
		} else {
			Err(DispatchError::Collected { event, failures })
		}
	}

	/// Like [`Dispatcher::dispatch`], selecting the event by its stable name.
	///
	/// Fails with [`DispatchError::InvalidArgument`] if `name` is unknown or
	/// names a different event than `args` carries.
	pub fn dispatch_named(
		&self,
		name: &str,
		context: &ContextType,
		args: &mut EventArgs<'_>,
	) -> Result<DispatchReport, DispatchError> {
		let event: InterceptEvent = name.parse()?;
		if event != args.event() {
			return Err(RoutingError::InvalidArgument(format!(
				"event {event} does not match {} payload",
				args.event()
			))
			.into());
		}
		self.dispatch(context, args)
	}

	pub fn server_state_scanning(
		&self,
		context: &ContextType,
		args: &ServerStateScanning,
	) -> Result<DispatchReport, DispatchError> {
		self.dispatch(context, &mut EventArgs::ServerStateScanning(args))
	}

	pub fn server_state_scanned(
		&self,
		context: &ContextType,
		args: &ServerStateScanned,
	) -> Result<DispatchReport, DispatchError> {
		self.dispatch(context, &mut EventArgs::ServerStateScanned(args))
	}

	pub fn connection_string_updating(
		&self,
		context: &ContextType,
		args: &mut ConnectionStringUpdating,
	) -> Result<DispatchReport, DispatchError> {
		self.dispatch(context, &mut EventArgs::ConnectionStringUpdating(args))
	}

	pub fn connection_string_updated(
		&self,
		context: &ContextType,
		args: &ConnectionStringUpdated,
	) -> Result<DispatchReport, DispatchError> {
		self.dispatch(context, &mut EventArgs::ConnectionStringUpdated(args))
	}

	fn invoke(
		&self,
		interceptor: &dyn Interceptor,
		event: InterceptEvent,
		args: &mut EventArgs<'_>,
	) -> anyhow::Result<()> {
		trace!(%event, interceptor = interceptor.name(), "Invoking interceptor");
		let start = Instant::now();
		let result = interceptor.handle(args);
		let elapsed = start.elapsed();

		if let Some(threshold) = self.config.slow_callback_threshold
			&& elapsed > threshold
		{
			warn!(
				%event,
				interceptor = interceptor.name(),
				elapsed_ms = elapsed.as_millis() as u64,
				threshold_ms = threshold.as_millis() as u64,
				"Slow interceptor callback"
			);
		}
		result
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("registry", &self.registry)
			.field("config", &self.config)
			.finish()
	}
}
