//! Database-context type descriptors and covariant matching.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Static descriptor for a database-context type.
///
/// Rust has no runtime subtyping between nominal types, so the hierarchy is
/// declared explicitly: each descriptor names its Rust type and, optionally,
/// the descriptor of its base context. Descriptors live in `static` items so
/// parents can be referenced by `&'static`.
///
/// ```ignore
/// struct AppDb;
/// struct ReportingDb;
///
/// static APP: ContextType = ContextType::root::<AppDb>("AppDb");
/// static REPORTING: ContextType = ContextType::derived::<ReportingDb>("ReportingDb", &APP);
/// ```
pub struct ContextType {
	type_id: fn() -> TypeId,
	name: &'static str,
	parent: Option<&'static ContextType>,
}

impl ContextType {
	/// Declares a context type with no base context.
	pub const fn root<T: ?Sized + 'static>(name: &'static str) -> Self {
		Self {
			type_id: TypeId::of::<T>,
			name,
			parent: None,
		}
	}

	/// Declares a context type derived from `parent`.
	pub const fn derived<T: ?Sized + 'static>(
		name: &'static str,
		parent: &'static ContextType,
	) -> Self {
		Self {
			type_id: TypeId::of::<T>,
			name,
			parent: Some(parent),
		}
	}

	#[inline]
	pub fn type_id(&self) -> TypeId {
		(self.type_id)()
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.name
	}

	#[inline]
	pub fn parent(&self) -> Option<&'static ContextType> {
		self.parent
	}

	/// Returns true if this descriptor is for the Rust type `T`.
	pub fn is<T: ?Sized + 'static>(&self) -> bool {
		self.type_id() == TypeId::of::<T>()
	}

	/// Iterates this type followed by its bases, nearest first.
	pub fn ancestors(&self) -> Ancestors<'_> {
		Ancestors { next: Some(self) }
	}

	/// Returns true if `self` is `base` or is derived from it, transitively.
	pub fn is_subtype_of(&self, base: &ContextType) -> bool {
		let target = base.type_id();
		self.ancestors().any(|ty| ty.type_id() == target)
	}

	/// Number of bases above this type. Root types have depth zero.
	pub fn depth(&self) -> usize {
		self.ancestors().count() - 1
	}
}

/// Iterator returned by [`ContextType::ancestors`].
pub struct Ancestors<'a> {
	next: Option<&'a ContextType>,
}

impl<'a> Iterator for Ancestors<'a> {
	type Item = &'a ContextType;

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.next?;
		self.next = current.parent;
		Some(current)
	}
}

impl PartialEq for ContextType {
	fn eq(&self, other: &Self) -> bool {
		self.type_id() == other.type_id()
	}
}

impl Eq for ContextType {}

impl Hash for ContextType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id().hash(state);
	}
}

impl fmt::Debug for ContextType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContextType")
			.field("name", &self.name)
			.field("parent", &self.parent.map(ContextType::name))
			.finish()
	}
}

impl fmt::Display for ContextType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Rust types that stand for a database context.
pub trait DbContext: 'static {
	const CONTEXT: &'static ContextType;
}

/// Returns the descriptor for `T`.
#[inline]
pub fn context_of<T: DbContext>() -> &'static ContextType {
	T::CONTEXT
}

/// Whether an interceptor registered for `registered` applies to a dispatch
/// for `actual`.
///
/// Matching is covariant in one direction only: a base registration covers
/// derived contexts, a derived registration never covers its base.
#[inline]
pub fn matches(registered: &ContextType, actual: &ContextType) -> bool {
	actual.is_subtype_of(registered)
}

#[cfg(test)]
mod tests;
