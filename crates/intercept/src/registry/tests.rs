use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::context::ContextType;

struct AppDb;

static APP: ContextType = ContextType::root::<AppDb>("AppDb");

struct Named(&'static str);

impl Interceptor for Named {
	fn target_context(&self) -> &'static ContextType {
		&APP
	}

	fn name(&self) -> &str {
		self.0
	}
}

fn named(name: &'static str) -> Arc<dyn Interceptor> {
	Arc::new(Named(name))
}

fn names(snap: &Snapshot) -> Vec<String> {
	snap.iter().map(|i| i.name().to_owned()).collect()
}

#[test]
fn test_register_preserves_insertion_order() {
	let registry = InterceptorRegistry::new();
	assert!(registry.is_empty());

	registry.register(named("a"));
	registry.register(named("b"));
	registry.register(named("c"));

	assert_eq!(registry.len(), 3);
	assert_eq!(names(&registry.snapshot()), ["a", "b", "c"]);
}

#[test]
fn test_duplicate_registration_is_kept() {
	let registry = InterceptorRegistry::new();
	let a = named("a");

	registry.register(a.clone());
	registry.register(a.clone());

	assert_eq!(registry.len(), 2);
	assert!(registry.contains(&a));
}

#[test]
fn test_unregister_removes_first_match_only() {
	let registry = InterceptorRegistry::new();
	let a = named("a");
	let b = named("b");

	registry.register(a.clone());
	registry.register(b.clone());
	registry.register(a.clone());

	assert!(registry.unregister(&a));
	assert_eq!(names(&registry.snapshot()), ["b", "a"]);
	assert!(registry.contains(&a));
}

#[test]
fn test_unregister_absent_is_noop() {
	let registry = InterceptorRegistry::new();
	let a = named("a");
	registry.register(a);

	let before = registry.snapshot();
	// Same name, different instance.
	assert!(!registry.unregister(&named("a")));

	let after = registry.snapshot();
	assert!(Arc::ptr_eq(&before, &after));
	assert_eq!(registry.len(), 1);
}

#[test]
fn test_snapshot_is_unaffected_by_later_writes() {
	let registry = InterceptorRegistry::new();
	let a = named("a");
	registry.register(a.clone());

	let held = registry.snapshot();
	registry.register(named("b"));
	registry.unregister(&a);

	assert_eq!(names(&held), ["a"]);
	assert_eq!(names(&registry.snapshot()), ["b"]);
}

#[test]
fn test_clear() {
	let registry = InterceptorRegistry::new();
	registry.register(named("a"));
	registry.register(named("b"));
	registry.clear();
	assert!(registry.is_empty());
	assert_eq!(format!("{registry:?}"), "[]");
}

#[derive(Debug, Clone)]
enum Op {
	Register(usize),
	Unregister(usize),
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		(0..4usize).prop_map(Op::Register),
		(0..4usize).prop_map(Op::Unregister),
	]
}

proptest! {
	#[test]
	fn test_register_unregister_matches_model(ops in prop::collection::vec(op(), 0..64)) {
		let pool: Vec<Arc<dyn Interceptor>> =
			vec![named("i0"), named("i1"), named("i2"), named("i3")];
		let registry = InterceptorRegistry::new();
		let mut model: Vec<usize> = Vec::new();

		for op in ops {
			match op {
				Op::Register(i) => {
					registry.register(pool[i].clone());
					model.push(i);
				}
				Op::Unregister(i) => {
					let removed = registry.unregister(&pool[i]);
					let pos = model.iter().position(|&m| m == i);
					prop_assert_eq!(removed, pos.is_some());
					if let Some(pos) = pos {
						model.remove(pos);
					}
				}
			}
		}

		let snap = registry.snapshot();
		prop_assert_eq!(snap.len(), model.len());
		for (entry, &i) in snap.iter().zip(&model) {
			prop_assert!(same_instance(entry, &pool[i]));
		}
	}
}
