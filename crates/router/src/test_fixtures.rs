//! Hand-written stand-ins for generated route tables.
//!
//! Groups: `app` (destinations and a fragment), `shop` (a destination and the echo
//! service), `svc` (services with counted or failing construction), `broken` (loader
//! fails while populating), `half` (loader fails after inserting a route) and `faulty`
//! (loader fails to construct).

use std::cell::RefCell;
use std::collections::HashMap as StdHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::bootstrap::{Environment, MemoryCache, StaticSource};
use crate::config::RouterConfig;
use crate::error::{LoadError, ProviderInitError};
use crate::loader::{GroupsIndex, ProvidersIndex, RouteLoader, RouteTableDef, RoutesIndex, instantiate};
use crate::meta::{Destination, RouteKind, RouteMeta};
use crate::param::ParamKind;
use crate::provider::Provider;
use crate::router::Router;

pub(crate) const ROOT_TABLE: &str = "courier.routes.Courier$$Root$$fixture";
pub(crate) const PROVIDERS_TABLE: &str = "courier.routes.Courier$$Providers$$fixture";

thread_local! {
	static GROUP_LOADS: RefCell<StdHashMap<&'static str, usize>> = RefCell::new(StdHashMap::new());
}

fn record_load(group: &'static str) {
	GROUP_LOADS.with(|loads| *loads.borrow_mut().entry(group).or_default() += 1);
}

/// Number of times `group` was expanded on this thread since the last [`fixture_router`].
pub(crate) fn group_loads(group: &str) -> usize {
	GROUP_LOADS.with(|loads| loads.borrow().get(group).copied().unwrap_or(0))
}

pub(crate) struct MainScreen;
pub(crate) struct DetailScreen;
pub(crate) struct PanelFragment;
pub(crate) struct CartScreen;

#[derive(Default)]
pub(crate) struct EchoService;
impl Provider for EchoService {}

/// Only resolved by the concurrent construction invariant.
pub(crate) static COUNTED_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

pub(crate) struct CountedService;
impl Provider for CountedService {}

impl Default for CountedService {
	fn default() -> Self {
		COUNTED_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
		// widen the race window for concurrent first requests
		std::thread::sleep(std::time::Duration::from_millis(5));
		Self
	}
}

fn failing_service() -> Result<Arc<dyn Provider>, ProviderInitError> {
	Err(ProviderInitError::new("constructor panicked in generated code"))
}

pub(crate) fn echo_meta() -> RouteMeta {
	RouteMeta::build(RouteKind::Service, Destination::service::<EchoService>(), "/shop/echo", "shop")
}

#[derive(Default)]
pub(crate) struct FixtureRoot;

impl RouteLoader<GroupsIndex> for FixtureRoot {
	fn load_into(&self, groups: &mut GroupsIndex) -> Result<(), LoadError> {
		groups.insert("app".into(), instantiate::<AppGroup, RoutesIndex>);
		groups.insert("shop".into(), instantiate::<ShopGroup, RoutesIndex>);
		groups.insert("svc".into(), instantiate::<SvcGroup, RoutesIndex>);
		groups.insert("broken".into(), instantiate::<BrokenGroup, RoutesIndex>);
		groups.insert("half".into(), instantiate::<HalfGroup, RoutesIndex>);
		groups.insert("faulty".into(), || Err(LoadError::new("group loader missing from build")));
		Ok(())
	}
}

#[derive(Default)]
pub(crate) struct AppGroup;

impl RouteLoader<RoutesIndex> for AppGroup {
	fn load_into(&self, routes: &mut RoutesIndex) -> Result<(), LoadError> {
		record_load("app");
		routes.insert("/app/main".into(), RouteMeta::build(RouteKind::Destination, Destination::of::<MainScreen>(), "/app/main", "app").with_priority(5));
		routes.insert(
			"/app/detail".into(),
			RouteMeta::build(RouteKind::Destination, Destination::of::<DetailScreen>(), "/app/detail", "app")
				.with_param("id", ParamKind::Int)
				.with_param("flag", ParamKind::Boolean)
				.with_param("name", ParamKind::String)
				.with_param("ratio", ParamKind::Double)
				.with_param("blob", ParamKind::Parcelable)
				.with_extra(0b101),
		);
		routes.insert("/app/panel".into(), RouteMeta::build(RouteKind::Fragment, Destination::of::<PanelFragment>(), "/app/panel", "app"));
		routes.insert("/app/café menu".into(), RouteMeta::build(RouteKind::Destination, Destination::of::<MainScreen>(), "/app/café menu", "app"));
		Ok(())
	}
}

#[derive(Default)]
pub(crate) struct ShopGroup;

impl RouteLoader<RoutesIndex> for ShopGroup {
	fn load_into(&self, routes: &mut RoutesIndex) -> Result<(), LoadError> {
		record_load("shop");
		routes.insert("/shop/cart".into(), RouteMeta::build(RouteKind::Destination, Destination::of::<CartScreen>(), "/shop/cart", ""));
		routes.insert("/shop/echo".into(), echo_meta());
		Ok(())
	}
}

#[derive(Default)]
pub(crate) struct SvcGroup;

impl RouteLoader<RoutesIndex> for SvcGroup {
	fn load_into(&self, routes: &mut RoutesIndex) -> Result<(), LoadError> {
		record_load("svc");
		routes.insert(
			"/svc/counted".into(),
			RouteMeta::build(RouteKind::Service, Destination::service::<CountedService>(), "/svc/counted", "svc"),
		);
		routes.insert(
			"/svc/failing".into(),
			RouteMeta::build(RouteKind::Service, Destination::service_with("fixture::FailingService", failing_service), "/svc/failing", "svc"),
		);
		routes.insert(
			"/svc/unbacked".into(),
			RouteMeta::build(RouteKind::Service, Destination::named("fixture::Unbacked"), "/svc/unbacked", "svc"),
		);
		Ok(())
	}
}

#[derive(Default)]
pub(crate) struct BrokenGroup;

impl RouteLoader<RoutesIndex> for BrokenGroup {
	fn load_into(&self, _routes: &mut RoutesIndex) -> Result<(), LoadError> {
		record_load("broken");
		Err(LoadError::new("route table references a missing destination"))
	}
}

#[derive(Default)]
pub(crate) struct HalfGroup;

impl RouteLoader<RoutesIndex> for HalfGroup {
	fn load_into(&self, routes: &mut RoutesIndex) -> Result<(), LoadError> {
		record_load("half");
		routes.insert("/half/a".into(), RouteMeta::build(RouteKind::Destination, Destination::of::<CartScreen>(), "/half/a", "half"));
		Err(LoadError::new("route table truncated after /half/a"))
	}
}

#[derive(Default)]
pub(crate) struct FixtureProviders;

impl RouteLoader<ProvidersIndex> for FixtureProviders {
	fn load_into(&self, providers: &mut ProvidersIndex) -> Result<(), LoadError> {
		providers.insert("echo".into(), echo_meta());
		providers.insert(std::any::type_name::<EchoService>().into(), echo_meta());
		providers.insert(
			"counted".into(),
			RouteMeta::build(RouteKind::Service, Destination::service::<CountedService>(), "/svc/counted", "svc"),
		);
		Ok(())
	}
}

pub(crate) fn fixture_source() -> StaticSource {
	StaticSource::new()
		.with_table(RouteTableDef::root(ROOT_TABLE, instantiate::<FixtureRoot, GroupsIndex>))
		.with_table(RouteTableDef::providers(PROVIDERS_TABLE, instantiate::<FixtureProviders, ProvidersIndex>))
}

pub(crate) fn fixture_env() -> Environment {
	let config = RouterConfig {
		debuggable: true,
		..RouterConfig::default()
	};
	Environment::new(config)
		.with_source(Arc::new(fixture_source()))
		.with_cache(Arc::new(MemoryCache::default()))
}

/// A router bootstrapped from the fixture tables, with load counters reset.
pub(crate) fn fixture_router() -> Router {
	GROUP_LOADS.with(|loads| loads.borrow_mut().clear());
	let router = Router::new();
	let report = router.init(&fixture_env());
	assert!(report.is_ok(), "fixture bootstrap failed: {:?}", report.error);
	router
}
