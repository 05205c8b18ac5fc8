use std::collections::BTreeSet;
use std::sync::Arc;

use tracing_test::traced_test;

use super::*;
use crate::Router;
use crate::error::LoadError;
use crate::loader::{GroupsIndex, RouteLoader, RouteTableDef, RoutesIndex, instantiate};
use crate::postcard::Postcard;
use crate::test_fixtures::{AppGroup, FixtureRoot, PROVIDERS_TABLE, ROOT_TABLE, fixture_source};

fn env(config: RouterConfig, source: impl TableSource + 'static, cache: Arc<MemoryCache>) -> Environment {
	Environment::new(config).with_source(Arc::new(source)).with_cache(cache)
}

fn release(version: &str) -> RouterConfig {
	RouterConfig {
		app_version: version.to_string(),
		..RouterConfig::default()
	}
}

#[derive(Default)]
struct FailingRoot;

impl RouteLoader<GroupsIndex> for FailingRoot {
	fn load_into(&self, _groups: &mut GroupsIndex) -> Result<(), LoadError> {
		Err(LoadError::new("root table corrupted"))
	}
}

#[derive(Default)]
struct AppOnlyRoot;

impl RouteLoader<GroupsIndex> for AppOnlyRoot {
	fn load_into(&self, groups: &mut GroupsIndex) -> Result<(), LoadError> {
		groups.insert("app".into(), instantiate::<AppGroup, RoutesIndex>);
		Ok(())
	}
}

#[test]
fn test_debuggable_rescans_and_loads_all_tables() {
	let cache = Arc::new(MemoryCache::default());
	let config = RouterConfig {
		debuggable: true,
		..release("1.0")
	};
	let router = Router::new();
	let report = router.init(&env(config, fixture_source(), cache.clone()));

	assert!(report.is_ok());
	assert!(report.rescanned);
	assert_eq!(report.tables, vec![PROVIDERS_TABLE.to_string(), ROOT_TABLE.to_string()]);
	assert_eq!(report.groups, 6);
	assert_eq!(report.providers, 3);
	assert_eq!(cache.get(ROUTE_MAP_KEY).unwrap().map(|l| l.len()), Some(2));
	assert_eq!(cache.last_version().unwrap().as_deref(), Some("1.0"));
}

#[test]
fn test_same_version_reuses_cached_listing() {
	let cache = Arc::new(MemoryCache::default());

	let first = Router::new().init(&env(release("1.0"), fixture_source(), cache.clone()));
	assert!(first.rescanned);

	let second_router = Router::new();
	let second = second_router.init(&env(release("1.0"), fixture_source(), cache.clone()));
	assert!(!second.rescanned);
	assert_eq!(second.tables, first.tables);
	assert!(second_router.has_group("app"));
}

#[test]
fn test_version_change_forces_rescan() {
	let cache = Arc::new(MemoryCache::default());
	Router::new().init(&env(release("1.0"), fixture_source(), cache.clone()));

	let report = Router::new().init(&env(release("1.1"), fixture_source(), cache.clone()));
	assert!(report.rescanned);
	assert_eq!(cache.last_version().unwrap().as_deref(), Some("1.1"));
}

#[test]
fn test_cached_listing_drives_bootstrap_without_rescan() {
	let cache = Arc::new(MemoryCache::default());
	cache.record_version("1.0").unwrap();
	let listing: BTreeSet<String> = [ROOT_TABLE.to_string()].into();
	cache.put(ROUTE_MAP_KEY, &listing).unwrap();

	let router = Router::new();
	let report = router.init(&env(release("1.0"), fixture_source(), cache));

	assert!(!report.rescanned);
	assert_eq!(report.tables, vec![ROOT_TABLE.to_string()]);
	assert_eq!(report.providers, 0, "providers table was not in the cached listing");
}

#[traced_test]
#[test]
fn test_empty_registry_warns() {
	let cache = Arc::new(MemoryCache::default());
	let router = Router::new();
	let report = router.init(&env(release("1.0"), StaticSource::new(), cache.clone()));

	assert!(report.is_ok());
	assert_eq!(report.groups, 0);
	assert_eq!(cache.get(ROUTE_MAP_KEY).unwrap(), None, "empty listings are not persisted");
	assert_eq!(cache.last_version().unwrap().as_deref(), Some("1.0"));
	assert!(logs_contain("no route groups registered"));
}

#[traced_test]
#[test]
fn test_stale_listing_is_fail_soft() {
	let cache = Arc::new(MemoryCache::default());
	cache.record_version("1.0").unwrap();
	let listing: BTreeSet<String> = ["courier.routes.Courier$$Root$$gone".to_string()].into();
	cache.put(ROUTE_MAP_KEY, &listing).unwrap();

	let router = Router::new();
	let report = router.init(&env(release("1.0"), fixture_source(), cache));

	assert!(matches!(report.error, Some(BootstrapError::MissingTable(ref name)) if name.ends_with("$$gone")));
	assert_eq!(router.stats(), Default::default());
	assert!(logs_contain("router bootstrap failed"));
}

#[test]
fn test_loader_failure_stops_bootstrap() {
	let source = StaticSource::new()
		.with_table(RouteTableDef::root("courier.routes.Courier$$Root$$a", instantiate::<FailingRoot, GroupsIndex>))
		.with_table(RouteTableDef::root("courier.routes.Courier$$Root$$b", instantiate::<FixtureRoot, GroupsIndex>));
	let router = Router::new();
	let report = router.init(&env(release("1.0"), source, Arc::new(MemoryCache::default())));

	assert!(matches!(report.error, Some(BootstrapError::Load { ref table, .. }) if table.ends_with("$$a")));
	assert!(report.tables.is_empty());
	assert_eq!(report.groups, 0);
}

#[test]
fn test_role_mismatch_is_reported() {
	let source = StaticSource::new().with_table(RouteTableDef::root("courier.routes.Courier$$Providers$$x", instantiate::<FixtureRoot, GroupsIndex>));
	let report = Router::new().init(&env(release("1.0"), source, Arc::new(MemoryCache::default())));
	assert!(matches!(report.error, Some(BootstrapError::RoleMismatch { .. })));
}

#[test]
fn test_names_outside_convention_are_ignored() {
	let source = fixture_source()
		.with_table(RouteTableDef::root("courier.routes.Courier$$Group$$x", instantiate::<FailingRoot, GroupsIndex>))
		.with_table(RouteTableDef::root("elsewhere.Courier$$Root$$y", instantiate::<FailingRoot, GroupsIndex>));
	let router = Router::new();
	let report = router.init(&env(release("1.0"), source, Arc::new(MemoryCache::default())));

	assert!(report.is_ok());
	assert_eq!(report.tables.len(), 2);
	assert_eq!(report.groups, 6);
}

#[test]
fn test_custom_namespace() {
	let source = StaticSource::new().with_table(RouteTableDef::root("shop.routes.Courier$$Root$$main", instantiate::<FixtureRoot, GroupsIndex>));
	let config = RouterConfig {
		namespace: "shop.routes".to_string(),
		..release("1.0")
	};
	let router = Router::new();
	let report = router.init(&env(config, source, Arc::new(MemoryCache::default())));
	assert!(report.is_ok());
	assert!(router.has_group("app"));
}

#[traced_test]
#[test]
fn test_reinit_after_full_expansion_does_not_warn() {
	let source = Arc::new(StaticSource::new().with_table(RouteTableDef::root(ROOT_TABLE, instantiate::<AppOnlyRoot, GroupsIndex>)));
	let env = Environment::new(release("1.0")).with_source(source).with_cache(Arc::new(MemoryCache::default()));
	let router = Router::new();
	router.init(&env);

	let mut postcard = Postcard::new("/app/main").unwrap();
	router.complete(&mut postcard).unwrap();

	let report = router.init(&env);
	assert!(report.is_ok());
	assert_eq!(report.groups, 0);
	assert!(router.is_expanded("app"));
	assert!(!logs_contain("no route groups registered"));
}
