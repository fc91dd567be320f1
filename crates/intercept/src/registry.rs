//! Copy-on-write interceptor registry.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::debug;

use crate::interceptor::Interceptor;

/// A published, immutable view of the registry.
pub type Snapshot = Arc<Vec<Arc<dyn Interceptor>>>;

/// Ordered set of registered interceptors.
///
/// Writers serialise on a single mutex, copy the current list, modify the
/// copy and publish it with one atomic swap. Readers never lock: they load
/// whichever list was last published and keep it alive for as long as they
/// hold the [`Snapshot`].
///
/// Duplicate registration is not collapsed. An interceptor registered twice
/// appears twice and fires twice per matching dispatch.
pub struct InterceptorRegistry {
	snap: ArcSwap<Vec<Arc<dyn Interceptor>>>,
	write: Mutex<()>,
}

impl Default for InterceptorRegistry {
	fn default() -> Self {
		Self {
			snap: ArcSwap::from_pointee(Vec::new()),
			write: Mutex::new(()),
		}
	}
}

impl InterceptorRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `interceptor` and publishes the new list.
	pub fn register(&self, interceptor: Arc<dyn Interceptor>) {
		let _guard = self.write.lock();
		let cur = self.snap.load();

		let mut next = Vec::with_capacity(cur.len() + 1);
		next.extend(cur.iter().cloned());
		debug!(
			interceptor = interceptor.name(),
			context = %interceptor.target_context(),
			registered = next.len() + 1,
			"Registering interceptor"
		);
		next.push(interceptor);

		self.snap.store(Arc::new(next));
	}

	/// Removes the first registration of `interceptor`, compared by identity.
	///
	/// Returns `false` and leaves the registry untouched if it was not
	/// registered.
	pub fn unregister(&self, interceptor: &Arc<dyn Interceptor>) -> bool {
		let _guard = self.write.lock();
		let cur = self.snap.load();

		let Some(pos) = cur.iter().position(|i| same_instance(i, interceptor)) else {
			return false;
		};

		let mut next: Vec<_> = cur.iter().cloned().collect();
		next.remove(pos);
		debug!(
			interceptor = interceptor.name(),
			registered = next.len(),
			"Unregistered interceptor"
		);

		self.snap.store(Arc::new(next));
		true
	}

	/// Removes every registration.
	pub fn clear(&self) {
		let _guard = self.write.lock();
		self.snap.store(Arc::new(Vec::new()));
	}

	/// Returns the latest published list without taking the writer lock.
	#[inline]
	pub fn snapshot(&self) -> Snapshot {
		self.snap.load_full()
	}

	/// Returns true if `interceptor` is registered at least once.
	pub fn contains(&self, interceptor: &Arc<dyn Interceptor>) -> bool {
		self.snap.load().iter().any(|i| same_instance(i, interceptor))
	}

	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.load().is_empty()
	}
}

impl fmt::Debug for InterceptorRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let snap = self.snap.load();
		f.debug_list().entries(snap.iter().map(|i| i.name())).finish()
	}
}

/// Identity comparison on the data pointer only. Vtable pointers for the
/// same type may differ between codegen units.
fn same_instance(a: &Arc<dyn Interceptor>, b: &Arc<dyn Interceptor>) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests;
