//! Interceptor registry and event dispatch for read/write-split routing.
//!
//! The data-access layer calls into this crate at four fixed points. Two
//! bracket a server reachability probe. Two bracket the retargeting of a
//! command's connection string. At each point, every registered
//! [`Interceptor`] whose target context matches the calling context receives
//! the event synchronously.
//!
//! # Registration
//!
//! [`InterceptorRegistry`] is an explicit value owned by whatever performs
//! connection routing. Writers serialise on one mutex and publish a fresh
//! list. Readers load the latest published list without locking, so a
//! dispatch never observes a half-updated registry.
//!
//! # Matching
//!
//! Context types form a single-parent hierarchy declared with [`ContextType`].
//! An interceptor registered for a base context also fires for every derived
//! context (see [`matches`]). The reverse never holds.
//!
//! # Failure policy
//!
//! [`DispatchPolicy::FailFast`] stops at the first failing callback and
//! returns its error. [`DispatchPolicy::CollectAndContinue`] delivers to every
//! interceptor and reports all failures together. Panics are never caught.
//!
//! ```ignore
//! static APP: ContextType = ContextType::root::<AppDb>("AppDb");
//!
//! let registry = Arc::new(InterceptorRegistry::new());
//! registry.register(Arc::new(AuditInterceptor::new(&APP)));
//!
//! let dispatcher = Dispatcher::new(registry.clone());
//! let state = scan_server(&dispatcher, &APP, &probe, "Server=db1", ServerRole::Slave)?;
//! ```

mod config;
mod context;
mod dispatch;
mod error;
mod event;
mod interceptor;
mod probe;
mod registry;

pub use config::{DEFAULT_SLOW_CALLBACK_THRESHOLD, DispatchConfig, DispatchPolicy};
pub use context::{Ancestors, ContextType, DbContext, context_of, matches};
pub use dispatch::{DispatchReport, Dispatcher};
pub use error::{ConfigError, DispatchError, InterceptorFailure, ProbeError, RoutingError};
pub use event::{
	ConnectionStringUpdated, ConnectionStringUpdating, EventArgs, InterceptEvent,
	ServerRole, ServerStateScanned, ServerStateScanning,
};
pub use interceptor::Interceptor;
pub use probe::{ServerProbe, ServerState, retarget_command, scan_server};
pub use registry::{InterceptorRegistry, Snapshot};
