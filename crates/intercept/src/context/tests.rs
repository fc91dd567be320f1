use super::*;

struct AppDb;
struct ReportingDb;
struct ArchiveDb;
struct BillingDb;

static APP: ContextType = ContextType::root::<AppDb>("AppDb");
static REPORTING: ContextType = ContextType::derived::<ReportingDb>("ReportingDb", &APP);
static ARCHIVE: ContextType = ContextType::derived::<ArchiveDb>("ArchiveDb", &REPORTING);
static BILLING: ContextType = ContextType::root::<BillingDb>("BillingDb");

impl DbContext for ReportingDb {
	const CONTEXT: &'static ContextType = &REPORTING;
}

#[test]
fn test_exact_type_matches() {
	assert!(matches(&APP, &APP));
	assert!(matches(&BILLING, &BILLING));
}

#[test]
fn test_base_registration_covers_derived() {
	assert!(matches(&APP, &REPORTING));
	// Transitive through ReportingDb.
	assert!(matches(&APP, &ARCHIVE));
	assert!(matches(&REPORTING, &ARCHIVE));
}

#[test]
fn test_derived_registration_never_covers_base() {
	assert!(!matches(&REPORTING, &APP));
	assert!(!matches(&ARCHIVE, &REPORTING));
}

#[test]
fn test_unrelated_types_never_match() {
	assert!(!matches(&BILLING, &APP));
	assert!(!matches(&BILLING, &ARCHIVE));
	assert!(!matches(&APP, &BILLING));
}

#[test]
fn test_ancestors_nearest_first() {
	let names: Vec<_> = ARCHIVE.ancestors().map(ContextType::name).collect();
	assert_eq!(names, ["ArchiveDb", "ReportingDb", "AppDb"]);
	assert_eq!(ARCHIVE.depth(), 2);
	assert_eq!(APP.depth(), 0);
}

#[test]
fn test_context_of_and_is() {
	let ctx = context_of::<ReportingDb>();
	assert_eq!(ctx, &REPORTING);
	assert!(ctx.is::<ReportingDb>());
	assert!(!ctx.is::<AppDb>());
	assert_eq!(ctx.parent(), Some(&APP));
	assert_eq!(ctx.to_string(), "ReportingDb");
}
