//! Startup population of the group and provider indices.
//!
//! # Mental Model
//!
//! 1. **Listing:** Decide whether to rescan route tables. A rescan happens in debuggable
//!    configurations or when the recorded version differs from `app_version`; otherwise
//!    the listing persisted by the previous rescan is reused.
//! 2. **Loading:** Every listed root table fills the group index, every providers table
//!    fills the provider index. Group loaders themselves are not run here.
//!
//! # Failure Policy
//!
//! Bootstrap is fail-soft. The first error stops processing, is logged and recorded in
//! the [`BootstrapReport`], and the registry keeps whatever was loaded so far. Missing
//! routes then surface per request as [`crate::RouteError::NoRoute`].

mod cache;
mod source;

use std::collections::BTreeSet;
use std::sync::Arc;

pub use cache::{FileCache, MemoryCache, ROUTE_MAP_KEY, RouteTableCache};
pub use source::{InventorySource, StaticSource, TableSource};

use crate::config::RouterConfig;
use crate::error::BootstrapError;
use crate::loader::{TableFactory, TableRole, table_role};
use crate::warehouse::Warehouse;

/// Collaborators consumed by [`crate::Router::init`].
#[derive(Clone)]
pub struct Environment {
	pub config: RouterConfig,
	pub source: Arc<dyn TableSource>,
	pub cache: Arc<dyn RouteTableCache>,
}

impl Environment {
	/// Link-time tables, with a [`FileCache`] when `cache_dir` is configured.
	pub fn new(config: RouterConfig) -> Self {
		let cache: Arc<dyn RouteTableCache> = match &config.cache_dir {
			Some(dir) => Arc::new(FileCache::new(dir)),
			None => Arc::new(MemoryCache::default()),
		};
		Self {
			config,
			source: Arc::new(InventorySource),
			cache,
		}
	}

	pub fn with_source(mut self, source: Arc<dyn TableSource>) -> Self {
		self.source = source;
		self
	}

	pub fn with_cache(mut self, cache: Arc<dyn RouteTableCache>) -> Self {
		self.cache = cache;
		self
	}
}

/// Outcome of one bootstrap pass.
#[derive(Debug, Default)]
pub struct BootstrapReport {
	/// Whether the listing came from a fresh scan.
	pub rescanned: bool,
	/// Tables loaded, in listing order.
	pub tables: Vec<String>,
	/// Unexpanded groups after bootstrap.
	pub groups: usize,
	/// Registered service routes after bootstrap.
	pub providers: usize,
	/// The error that stopped bootstrap early, if any.
	pub error: Option<BootstrapError>,
}

impl BootstrapReport {
	pub fn is_ok(&self) -> bool {
		self.error.is_none()
	}
}

pub(crate) fn run(warehouse: &mut Warehouse, env: &Environment) -> BootstrapReport {
	let mut report = BootstrapReport::default();

	if let Err(error) = load_tables(warehouse, env, &mut report) {
		tracing::error!(%error, "router bootstrap failed");
		report.error = Some(error);
	}

	let registered = warehouse.groups_index.len();
	let Warehouse { groups_index, expanded, .. } = warehouse;
	groups_index.retain(|group, _| !expanded.contains(group));

	report.groups = warehouse.groups_index.len();
	report.providers = warehouse.providers_index.len();

	if registered == 0 {
		tracing::warn!(namespace = %env.config.namespace, "no route groups registered; check route table configuration");
	}
	if env.config.debuggable {
		tracing::debug!(groups = report.groups, providers = report.providers, "router bootstrap complete");
	}

	report
}

fn load_tables(warehouse: &mut Warehouse, env: &Environment, report: &mut BootstrapReport) -> Result<(), BootstrapError> {
	let listing = read_listing(env, report)?;

	for name in &listing {
		let Some(role) = table_role(&env.config.namespace, name) else {
			continue;
		};
		let factory = env.source.table(name).ok_or_else(|| BootstrapError::MissingTable(name.clone()))?;
		let load_error = |source| BootstrapError::Load {
			table: name.clone(),
			source,
		};

		match (role, factory) {
			(TableRole::Root, TableFactory::Root(factory)) => {
				factory().and_then(|table| table.load_into(&mut warehouse.groups_index)).map_err(load_error)?;
			}
			(TableRole::Providers, TableFactory::Providers(factory)) => {
				factory().and_then(|table| table.load_into(&mut warehouse.providers_index)).map_err(load_error)?;
			}
			_ => return Err(BootstrapError::RoleMismatch { table: name.clone() }),
		}
		report.tables.push(name.clone());
	}

	Ok(())
}

fn read_listing(env: &Environment, report: &mut BootstrapReport) -> Result<BTreeSet<String>, BootstrapError> {
	let config = &env.config;
	let recorded = env.cache.last_version()?;

	if config.debuggable || recorded.as_deref() != Some(config.app_version.as_str()) {
		tracing::info!(debuggable = config.debuggable, version = %config.app_version, "rescanning route tables");
		let listing = env.source.scan(&config.namespace).map_err(BootstrapError::Scan)?;
		if !listing.is_empty() {
			env.cache.put(ROUTE_MAP_KEY, &listing)?;
		}
		env.cache.record_version(&config.app_version)?;
		report.rescanned = true;
		return Ok(listing);
	}

	tracing::info!(version = %config.app_version, "reading cached route table listing");
	Ok(env.cache.get(ROUTE_MAP_KEY)?.unwrap_or_default())
}

#[cfg(test)]
mod tests;
