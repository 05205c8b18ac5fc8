//! Registration surface targeted by generated route tables.
//!
//! Generated code provides three kinds of units, all implementing [`RouteLoader`]:
//!
//! - **root** tables fill the [`GroupsIndex`] with one lazy factory per group,
//! - **group** loaders fill the [`RoutesIndex`] with every route of their group,
//! - **providers** tables fill the [`ProvidersIndex`] with every service route.
//!
//! Root and providers tables are submitted at link time with [`root_table!`] or
//! [`providers_table!`]; each submission becomes a named [`RouteTableDef`] in the
//! `inventory` collection. Group loaders are only reachable through a root table.
//!
//! [`root_table!`]: crate::root_table
//! [`providers_table!`]: crate::providers_table

use rustc_hash::FxHashMap as HashMap;

use crate::error::LoadError;
use crate::meta::RouteMeta;

/// Default namespace under which route tables are registered.
pub const ROUTE_ROOT_NAMESPACE: &str = "courier.routes";
pub const SDK_NAME: &str = "Courier";
pub const SEPARATOR: &str = "$$";
pub const SUFFIX_ROOT: &str = "Root";
pub const SUFFIX_PROVIDERS: &str = "Providers";

/// Populates one index. The single capability shared by all generated units.
pub trait RouteLoader<I> {
	fn load_into(&self, index: &mut I) -> Result<(), LoadError>;
}

/// Constructs a loader on demand.
pub type LoaderFactory<I> = fn() -> Result<Box<dyn RouteLoader<I>>, LoadError>;

/// Resolved routes keyed by path.
pub type RoutesIndex = HashMap<String, RouteMeta>;
/// Group loader factories keyed by group name.
pub type GroupsIndex = HashMap<String, LoaderFactory<RoutesIndex>>;
/// Service routes keyed by service name.
pub type ProvidersIndex = HashMap<String, RouteMeta>;

/// Factory for any loader constructible through [`Default`].
pub fn instantiate<L, I>() -> Result<Box<dyn RouteLoader<I>>, LoadError>
where
	L: RouteLoader<I> + Default + 'static,
{
	Ok(Box::new(L::default()))
}

/// Role implied by a route table's registered factory.
#[derive(Clone, Copy)]
pub enum TableFactory {
	Root(LoaderFactory<GroupsIndex>),
	Providers(LoaderFactory<ProvidersIndex>),
}

/// A named route table registered at link time.
pub struct RouteTableDef {
	/// Fully qualified table name, e.g. `courier.routes.Courier$$Root$$app`.
	pub name: &'static str,
	pub factory: TableFactory,
}

inventory::collect!(RouteTableDef);

impl RouteTableDef {
	pub const fn root(name: &'static str, factory: LoaderFactory<GroupsIndex>) -> Self {
		Self {
			name,
			factory: TableFactory::Root(factory),
		}
	}

	pub const fn providers(name: &'static str, factory: LoaderFactory<ProvidersIndex>) -> Self {
		Self {
			name,
			factory: TableFactory::Providers(factory),
		}
	}
}

/// Role a table name claims through the naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
	Root,
	Providers,
}

/// Classifies a table name under `namespace`; `None` for names outside the convention.
pub fn table_role(namespace: &str, name: &str) -> Option<TableRole> {
	let rest = name.strip_prefix(namespace)?.strip_prefix('.')?.strip_prefix(SDK_NAME)?.strip_prefix(SEPARATOR)?;
	if rest.starts_with(SUFFIX_ROOT) {
		Some(TableRole::Root)
	} else if rest.starts_with(SUFFIX_PROVIDERS) {
		Some(TableRole::Providers)
	} else {
		None
	}
}

/// Registers a root table for `$module`, under the default namespace or an explicit
/// `$namespace` matching [`RouterConfig::namespace`](crate::RouterConfig::namespace).
///
/// `$loader` must implement `RouteLoader<GroupsIndex>` and [`Default`].
#[macro_export]
macro_rules! root_table {
	($namespace:literal, $module:literal, $loader:ty) => {
		$crate::__private::inventory::submit! {
			$crate::loader::RouteTableDef::root(
				concat!($namespace, ".Courier$$Root$$", $module),
				$crate::loader::instantiate::<$loader, $crate::loader::GroupsIndex>,
			)
		}
	};
	($module:literal, $loader:ty) => {
		$crate::root_table!("courier.routes", $module, $loader);
	};
}

/// Registers a providers table for `$module`; namespace handling as in [`root_table!`].
///
/// `$loader` must implement `RouteLoader<ProvidersIndex>` and [`Default`].
#[macro_export]
macro_rules! providers_table {
	($namespace:literal, $module:literal, $loader:ty) => {
		$crate::__private::inventory::submit! {
			$crate::loader::RouteTableDef::providers(
				concat!($namespace, ".Courier$$Providers$$", $module),
				$crate::loader::instantiate::<$loader, $crate::loader::ProvidersIndex>,
			)
		}
	};
	($module:literal, $loader:ty) => {
		$crate::providers_table!("courier.routes", $module, $loader);
	};
}
