use std::sync::Arc;

use tracing_test::traced_test;
use url::Url;

use super::*;
use crate::param::ParamValue;
use crate::test_fixtures::{CountedService, DetailScreen, EchoService, MainScreen, fixture_router, group_loads};

fn detail_uri(query: &str) -> Url {
	Url::parse(&format!("courier://host/app/detail?{query}")).unwrap()
}

#[test]
fn test_direct_hit_copies_metadata() {
	let router = fixture_router();
	let mut postcard = Postcard::new("/app/main").unwrap();
	router.complete(&mut postcard).unwrap();

	assert_eq!(postcard.destination(), Some(Destination::of::<MainScreen>()));
	assert_eq!(postcard.kind(), Some(RouteKind::Destination));
	assert_eq!(postcard.priority(), 5);
	assert!(!postcard.is_green_channel());
	assert!(postcard.provider().is_none());
}

#[test]
fn test_uri_parameters_bound_by_declared_type() {
	let router = fixture_router();
	let mut postcard = Postcard::from_uri(detail_uri("id=42&flag=true&name=x%20y&ratio=0.5&blob=opaque&extra=ignored")).unwrap();
	router.complete(&mut postcard).unwrap();

	let extras = postcard.extras();
	assert_eq!(postcard.destination(), Some(Destination::of::<DetailScreen>()));
	assert_eq!(postcard.extra(), 0b101);
	assert_eq!(extras.get("id"), Some(&ParamValue::Int(42)));
	assert_eq!(extras.get("flag"), Some(&ParamValue::Bool(true)));
	assert_eq!(extras.get("name"), Some(&ParamValue::String("x y".into())));
	assert_eq!(extras.get("ratio"), Some(&ParamValue::Double(0.5)));
	assert!(!extras.contains_key("blob"), "parcelable values cannot be carried by a query");
	assert!(!extras.contains_key("extra"), "undeclared parameters are not bound");
}

#[traced_test]
#[test]
fn test_malformed_parameter_does_not_abort_resolution() {
	let router = fixture_router();
	let mut postcard = Postcard::from_uri(detail_uri("id=forty-two&flag=notabool&name=ok")).unwrap();
	router.complete(&mut postcard).unwrap();

	assert!(postcard.extras().get("id").is_none());
	assert!(postcard.extras().get("flag").is_none());
	assert_eq!(postcard.extras()["name"].as_str(), Some("ok"));
	assert!(logs_contain("failed to bind route parameter"));
}

#[test]
fn test_escaped_uri_path_resolves() {
	let router = fixture_router();

	let mut escaped = Postcard::from_uri(Url::parse("courier://host/app/m%61in").unwrap()).unwrap();
	router.complete(&mut escaped).unwrap();
	assert_eq!(escaped.destination(), Some(Destination::of::<MainScreen>()));

	let mut accented = Postcard::from_uri(Url::parse("courier://host/app/caf%C3%A9%20menu").unwrap()).unwrap();
	router.complete(&mut accented).unwrap();
	assert_eq!(accented.destination(), Some(Destination::of::<MainScreen>()));
}

#[test]
fn test_without_uri_no_parameters_bound() {
	let router = fixture_router();
	let mut postcard = Postcard::new("/app/detail").unwrap().with_int("preset", 1);
	router.complete(&mut postcard).unwrap();
	assert_eq!(postcard.extras().len(), 1);
}

#[test]
fn test_fragment_marks_green_channel() {
	let router = fixture_router();
	let mut postcard = Postcard::new("/app/panel").unwrap();
	router.complete(&mut postcard).unwrap();

	assert_eq!(postcard.kind(), Some(RouteKind::Fragment));
	assert!(postcard.is_green_channel());
	assert!(postcard.provider().is_none());
}

#[test]
fn test_service_route_returns_cached_singleton() {
	let router = fixture_router();

	let mut first = Postcard::new("/shop/echo").unwrap();
	router.complete(&mut first).unwrap();
	let mut second = Postcard::new("/shop/echo").unwrap();
	router.complete(&mut second).unwrap();

	assert!(first.is_green_channel());
	let (a, b) = (first.provider().unwrap(), second.provider().unwrap());
	assert!(Arc::ptr_eq(a, b));
	assert_eq!(router.stats().instances, 1);
}

#[test]
fn test_service_by_name_and_type() {
	let router = fixture_router();

	let by_name = router.service::<EchoService>("echo").unwrap().unwrap();
	let by_type = router.service_of::<EchoService>().unwrap().unwrap();
	assert!(Arc::ptr_eq(&by_name, &by_type));

	assert!(router.service::<EchoService>("unknown").unwrap().is_none());
	assert!(router.service::<CountedService>("echo").unwrap().is_none(), "wrong type downcasts to None");
}

#[test]
fn test_build_provider_carries_path_and_group() {
	let router = fixture_router();
	let postcard = router.build_provider("echo").unwrap();
	assert_eq!(postcard.path(), "/shop/echo");
	assert_eq!(postcard.group(), "shop");
	assert!(postcard.destination().is_none());

	assert!(router.build_provider("nope").is_none());
}

#[test]
fn test_failing_provider_is_handler_error_and_not_cached() {
	let router = fixture_router();

	let mut postcard = Postcard::new("/svc/failing").unwrap();
	let err = router.complete(&mut postcard).unwrap_err();
	assert!(err.is_handler_error());
	assert!(matches!(err, RouteError::ProviderInit { destination: "fixture::FailingService", .. }));

	let mut again = Postcard::new("/svc/failing").unwrap();
	assert!(matches!(router.complete(&mut again), Err(RouteError::ProviderInit { .. })));
	assert_eq!(router.stats().instances, 0);
}

#[test]
fn test_service_without_constructor_fails() {
	let router = fixture_router();
	let mut postcard = Postcard::new("/svc/unbacked").unwrap();
	assert!(matches!(router.complete(&mut postcard), Err(RouteError::ProviderInit { .. })));
}

#[test]
fn test_group_loader_failure_keeps_group_registered() {
	let router = fixture_router();

	let mut postcard = Postcard::new("/broken/page").unwrap();
	let err = router.complete(&mut postcard).unwrap_err();
	assert!(err.is_handler_error());
	assert!(matches!(err, RouteError::GroupLoad { ref group, .. } if group == "broken"));
	assert!(router.has_group("broken"));
	assert!(!router.is_expanded("broken"));

	let mut again = Postcard::new("/broken/page").unwrap();
	assert!(matches!(router.complete(&mut again), Err(RouteError::GroupLoad { .. })));
	assert_eq!(group_loads("broken"), 2);
}

#[test]
fn test_group_loader_construction_failure() {
	let router = fixture_router();
	let mut postcard = Postcard::new("/faulty/page").unwrap();
	let err = router.complete(&mut postcard).unwrap_err();
	assert!(matches!(err, RouteError::GroupLoad { ref group, .. } if group == "faulty"));
	assert!(router.has_group("faulty"));
}

#[test]
fn test_explicit_group_overrides_path_segment() {
	let router = fixture_router();
	// path segment says "app" but the group index is keyed by the postcard's group
	let mut postcard = Postcard::with_group("/app/main", "shop");
	let err = router.complete(&mut postcard).unwrap_err();
	assert!(matches!(err, RouteError::NoRoute { .. }));
	assert_eq!(group_loads("shop"), 1);
	assert_eq!(group_loads("app"), 0);
}

#[test]
fn test_uninitialized_router_has_no_routes() {
	let router = Router::new();
	let mut postcard = Postcard::new("/app/main").unwrap();
	assert!(matches!(router.complete(&mut postcard), Err(RouteError::NoRoute { .. })));
}
