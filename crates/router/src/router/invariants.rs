use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::RouteError;
use crate::postcard::Postcard;
use crate::test_fixtures::{self, COUNTED_CONSTRUCTIONS, CountedService, fixture_env, fixture_router, group_loads};

/// Invariant: Lazy group expansion.
///
/// Before any lookup touching a group none of its routes are resolved; after the first
/// successful lookup all of them are, and the group has left the group index.
pub(crate) fn inv_group_expanded_lazily() {
	let router = fixture_router();

	assert!(router.has_group("app"));
	assert!(!router.has_route("/app/main"));
	assert!(!router.has_route("/app/detail"));

	let mut postcard = Postcard::new("/app/main").unwrap();
	router.complete(&mut postcard).unwrap();

	assert!(router.has_route("/app/main"));
	assert!(router.has_route("/app/detail"));
	assert!(router.has_route("/app/panel"));
	assert!(!router.has_group("app"));
	assert!(router.is_expanded("app"));

	// untouched groups stay lazy
	assert!(router.has_group("shop"));
	assert!(!router.has_route("/shop/cart"));
}

#[cfg_attr(test, test)]
pub(crate) fn test_group_expanded_lazily() {
	inv_group_expanded_lazily()
}

/// Invariant: A group loader runs at most once, and repeated lookups are identical.
pub(crate) fn inv_group_expanded_once() {
	let router = fixture_router();

	let mut first = Postcard::new("/app/main").unwrap();
	router.complete(&mut first).unwrap();
	let mut second = Postcard::new("/app/main").unwrap();
	router.complete(&mut second).unwrap();
	let mut sibling = Postcard::new("/app/panel").unwrap();
	router.complete(&mut sibling).unwrap();

	assert_eq!(group_loads("app"), 1);
	assert_eq!(first.destination(), second.destination());
	assert_eq!(first.kind(), second.kind());
	assert_eq!(first.priority(), second.priority());
	assert_eq!(first.extra(), second.extra());
}

#[cfg_attr(test, test)]
pub(crate) fn test_group_expanded_once() {
	inv_group_expanded_once()
}

/// Invariant: A missing path in a known group expands it once, then fails.
pub(crate) fn inv_missing_path_in_known_group() {
	let router = fixture_router();

	let mut postcard = Postcard::new("/app/missing").unwrap();
	let err = router.complete(&mut postcard).unwrap_err();

	assert!(matches!(err, RouteError::NoRoute { ref path, ref group } if path == "/app/missing" && group == "app"));
	assert_eq!(group_loads("app"), 1);
	assert!(!router.has_group("app"));

	// a second miss does not expand again
	let mut again = Postcard::new("/app/missing").unwrap();
	assert!(matches!(router.complete(&mut again), Err(RouteError::NoRoute { .. })));
	assert_eq!(group_loads("app"), 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_missing_path_in_known_group() {
	inv_missing_path_in_known_group()
}

/// Invariant: A hard miss leaves both indices untouched.
pub(crate) fn inv_unknown_group_untouched() {
	let router = fixture_router();
	let before = router.stats();

	let mut postcard = Postcard::new("/nowhere/page").unwrap();
	let err = router.complete(&mut postcard).unwrap_err();

	assert_eq!(
		err,
		RouteError::NoRoute {
			path: "/nowhere/page".into(),
			group: "nowhere".into(),
		}
	);
	assert_eq!(router.stats(), before);
	assert!(postcard.destination().is_none());
}

#[cfg_attr(test, test)]
pub(crate) fn test_unknown_group_untouched() {
	inv_unknown_group_untouched()
}

/// Invariant: Concurrent first requests of a service construct exactly one instance.
pub(crate) fn inv_concurrent_service_constructed_once() {
	let router = Arc::new(fixture_router());
	let before = COUNTED_CONSTRUCTIONS.load(Ordering::SeqCst);

	let handles: Vec<_> = (0..8)
		.map(|_| {
			let router = Arc::clone(&router);
			std::thread::spawn(move || router.service::<CountedService>("counted").unwrap().unwrap())
		})
		.collect();
	let instances: Vec<Arc<CountedService>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

	assert_eq!(COUNTED_CONSTRUCTIONS.load(Ordering::SeqCst) - before, 1);
	assert!(instances.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[cfg_attr(test, test)]
pub(crate) fn test_concurrent_service_constructed_once() {
	inv_concurrent_service_constructed_once()
}

/// Invariant: After `clear` the router behaves as if never initialized.
pub(crate) fn inv_clear_resets_registry() {
	let router = fixture_router();
	let echo = router.service::<test_fixtures::EchoService>("echo").unwrap().unwrap();

	router.clear();
	assert_eq!(router.stats(), Default::default());

	let mut postcard = Postcard::new("/app/main").unwrap();
	assert!(matches!(router.complete(&mut postcard), Err(RouteError::NoRoute { .. })));
	assert!(router.build_provider("echo").is_none());

	router.init(&fixture_env());
	let fresh = router.service::<test_fixtures::EchoService>("echo").unwrap().unwrap();
	assert!(!Arc::ptr_eq(&echo, &fresh));
}

#[cfg_attr(test, test)]
pub(crate) fn test_clear_resets_registry() {
	inv_clear_resets_registry()
}

/// Invariant: Re-running bootstrap never re-registers an expanded group.
pub(crate) fn inv_reinit_keeps_expanded_groups_out() {
	let router = fixture_router();
	let mut postcard = Postcard::new("/app/main").unwrap();
	router.complete(&mut postcard).unwrap();

	let report = router.init(&fixture_env());
	assert!(report.is_ok());
	assert!(!router.has_group("app"));
	assert!(router.has_group("shop"));

	let mut missing = Postcard::new("/app/missing").unwrap();
	assert!(matches!(router.complete(&mut missing), Err(RouteError::NoRoute { .. })));
	assert_eq!(group_loads("app"), 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_reinit_keeps_expanded_groups_out() {
	inv_reinit_keeps_expanded_groups_out()
}

/// Invariant: A group whose loader fails publishes none of its routes.
pub(crate) fn inv_failed_group_load_publishes_nothing() {
	let router = fixture_router();

	let mut postcard = Postcard::new("/half/b").unwrap();
	assert!(matches!(router.complete(&mut postcard), Err(RouteError::GroupLoad { ref group, .. }) if group == "half"));
	assert!(router.has_group("half"));
	assert!(!router.is_expanded("half"));
	assert!(!router.has_route("/half/a"));

	// the route the loader inserted before failing is not a direct hit
	let mut partial = Postcard::new("/half/a").unwrap();
	assert!(matches!(router.complete(&mut partial), Err(RouteError::GroupLoad { .. })));
	assert!(partial.destination().is_none());
	assert_eq!(group_loads("half"), 2);
}

#[cfg_attr(test, test)]
pub(crate) fn test_failed_group_load_publishes_nothing() {
	inv_failed_group_load_publishes_nothing()
}
