#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Resolution engine.
//!
//! # Role
//!
//! [`Router`] turns a [`Postcard`] carrying a path and group into a completed request:
//! destination metadata, typed parameters bound from the URI query, and for service
//! routes a cached singleton.
//!
//! # Lookup States
//!
//! 1. **Direct hit:** the path is in `routes`; metadata is copied and parameters bound.
//! 2. **Group known:** the path is missing but its group still has a loader; the group
//!    is expanded into `routes`, removed from the group index, and the lookup retried
//!    exactly once.
//! 3. **Hard miss:** neither index knows the request; [`RouteError::NoRoute`].
//!
//! # Concurrency
//!
//! Every operation takes the same warehouse lock. Group expansion and the
//! check-construct-store of singletons are therefore atomic with respect to other
//! resolutions.
//!
//! # Invariants
//!
//! - A group is expanded at most once per registry lifetime.
//!   - Enforced in: [`expand_group`] (removes the loader and records the group as expanded).
//!   - Tested by: [`invariants::test_group_expanded_once`]
//! - A service is constructed at most once per registry lifetime.
//!   - Enforced in: [`provide`] (under the warehouse lock).
//!   - Tested by: [`invariants::test_concurrent_service_constructed_once`]
//! - A group in the group index has none of its routes in `routes`.
//!   - Enforced in: [`expand_group`] (merges only after the loader succeeds).
//!   - Tested by: [`invariants::test_failed_group_load_publishes_nothing`]
//! - Expanded groups never re-enter the group index.
//!   - Enforced in: [`expand_group`], [`crate::bootstrap`] (drops re-registered groups).
//!   - Tested by: [`invariants::test_reinit_keeps_expanded_groups_out`]

use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

use crate::bootstrap::{self, BootstrapReport, Environment};
use crate::error::RouteError;
use crate::loader::{LoaderFactory, RoutesIndex};
use crate::meta::{Destination, RouteKind};
use crate::param::bind;
use crate::postcard::Postcard;
use crate::provider::{Provider, downcast_provider};
use crate::query::parse_query;
use crate::warehouse::{Warehouse, WarehouseStats};

/// Registry of routes and services with lazy group expansion.
#[derive(Default)]
pub struct Router {
	warehouse: Mutex<Warehouse>,
}

impl Router {
	/// Creates an empty router. Call [`Self::init`] before resolving.
	pub fn new() -> Self {
		Self::default()
	}

	/// Populates the group and provider indices. Never fails; see [`BootstrapReport`].
	pub fn init(&self, env: &Environment) -> BootstrapReport {
		let mut warehouse = self.warehouse.lock();
		bootstrap::run(&mut warehouse, env)
	}

	/// Completes `postcard` in place.
	///
	/// On error the postcard may be partially filled and must be discarded.
	pub fn complete(&self, postcard: &mut Postcard) -> Result<(), RouteError> {
		let mut warehouse = self.warehouse.lock();
		complete_locked(&mut warehouse, postcard, false)
	}

	/// Returns a request for the service registered as `service_name`.
	pub fn build_provider(&self, service_name: &str) -> Option<Postcard> {
		let warehouse = self.warehouse.lock();
		let meta = warehouse.providers_index.get(service_name)?;
		Some(Postcard::with_group(meta.path(), meta.group()))
	}

	/// Resolves the service registered as `service_name` and downcasts it to `T`.
	///
	/// Returns `Ok(None)` if no service has that name or the instance is not a `T`.
	pub fn service<T: Provider>(&self, service_name: &str) -> Result<Option<Arc<T>>, RouteError> {
		let Some(mut postcard) = self.build_provider(service_name) else {
			return Ok(None);
		};
		self.complete(&mut postcard)?;
		Ok(postcard.provider().cloned().and_then(downcast_provider::<T>))
	}

	/// Resolves the service registered under the type name of `T`.
	pub fn service_of<T: Provider>(&self) -> Result<Option<Arc<T>>, RouteError> {
		self.service::<T>(std::any::type_name::<T>())
	}

	/// Drops every index and cached instance.
	pub fn clear(&self) {
		self.warehouse.lock().clear();
	}

	pub fn stats(&self) -> WarehouseStats {
		self.warehouse.lock().stats()
	}

	/// True while `group` is registered and not yet expanded.
	pub fn has_group(&self, group: &str) -> bool {
		self.warehouse.lock().groups_index.contains_key(group)
	}

	pub fn has_route(&self, path: &str) -> bool {
		self.warehouse.lock().routes.contains_key(path)
	}

	pub fn is_expanded(&self, group: &str) -> bool {
		self.warehouse.lock().expanded.contains(group)
	}
}

fn complete_locked(warehouse: &mut Warehouse, postcard: &mut Postcard, retried: bool) -> Result<(), RouteError> {
	if let Some(meta) = warehouse.routes.get(postcard.path()) {
		postcard.fill_from(meta);

		if let Some(params) = postcard.uri().map(|uri| parse_query(uri.query())) {
			for (name, kind) in meta.params_type() {
				bind(postcard.extras_mut(), *kind, name, params.get(name).map(String::as_str));
			}
		}

		match meta.kind() {
			RouteKind::Service => {
				let provider = provide(&mut warehouse.providers, meta.destination())?;
				postcard.set_provider(provider);
				postcard.green_channel();
			}
			RouteKind::Fragment => postcard.green_channel(),
			RouteKind::Destination | RouteKind::Unknown => {}
		}
		return Ok(());
	}

	let no_route = || RouteError::NoRoute {
		path: postcard.path().to_string(),
		group: postcard.group().to_string(),
	};

	if retried {
		return Err(no_route());
	}
	let Some(factory) = warehouse.groups_index.get(postcard.group()).copied() else {
		return Err(no_route());
	};

	expand_group(warehouse, postcard.group(), factory)?;
	complete_locked(warehouse, postcard, true)
}

fn expand_group(warehouse: &mut Warehouse, group: &str, factory: LoaderFactory<RoutesIndex>) -> Result<(), RouteError> {
	let load_error = |source| RouteError::GroupLoad {
		group: group.to_string(),
		source,
	};

	// a loader failing midway must not leave half of its group resolvable
	let mut loaded = RoutesIndex::default();
	let loader = factory().map_err(load_error)?;
	loader.load_into(&mut loaded).map_err(load_error)?;

	warehouse.routes.extend(loaded);
	warehouse.groups_index.remove(group);
	warehouse.expanded.insert(group.to_string());
	tracing::debug!(group, routes = warehouse.routes.len(), "expanded route group");
	Ok(())
}

fn provide(providers: &mut HashMap<Destination, Arc<dyn Provider>>, destination: Destination) -> Result<Arc<dyn Provider>, RouteError> {
	match providers.entry(destination) {
		Entry::Occupied(entry) => Ok(entry.get().clone()),
		Entry::Vacant(entry) => {
			let instance = destination.construct().map_err(|source| RouteError::ProviderInit {
				destination: destination.name(),
				source,
			})?;
			tracing::debug!(destination = destination.name(), "instantiated service provider");
			Ok(entry.insert(instance).clone())
		}
	}
}

#[cfg(any(test, doc))]
pub(crate) mod invariants;

#[cfg(test)]
mod tests;
