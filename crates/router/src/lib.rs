//! Symbolic route and service resolution.
//!
//! # Purpose
//!
//! Callers address destinations and services by stable string paths (`/group/name`)
//! or service names instead of referencing them directly. Route tables are
//! registered in bulk at link time, but only a small root table is loaded at startup:
//! each group of routes is expanded into memory the first time one of its paths is
//! requested.
//!
//! # Mental Model
//!
//! 1. **Registration:** Generated code submits root and providers tables with
//!    [`root_table!`] / [`providers_table!`]. Root tables map group names to lazy
//!    group loaders; providers tables list every service route.
//! 2. **Bootstrap:** [`Router::init`] loads the root and providers tables named by the
//!    current listing (rescanned or cached, see [`bootstrap`]).
//! 3. **Resolution:** [`Router::complete`] fills a [`Postcard`]: route metadata,
//!    parameters bound from the URI query by declared type, and for service routes a
//!    cached singleton [`Provider`].
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Router`] | Owns the registry; every operation is serialized on one lock. |
//! | [`Postcard`] | Request in, completed destination metadata out. |
//! | [`RouteMeta`] | Immutable descriptor of one route. |
//! | [`RouteLoader`] | The one capability implemented by generated tables. |
//! | [`Environment`] | Config, table source and listing cache used by bootstrap. |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use courier_router::loader::{GroupsIndex, RouteLoader, RoutesIndex, RouteTableDef, instantiate};
//! use courier_router::{Destination, Environment, LoadError, Postcard, RouteKind, RouteMeta, Router, RouterConfig, StaticSource};
//!
//! struct Home;
//!
//! #[derive(Default)]
//! struct AppRoot;
//! impl RouteLoader<GroupsIndex> for AppRoot {
//!     fn load_into(&self, groups: &mut GroupsIndex) -> Result<(), LoadError> {
//!         groups.insert("app".into(), instantiate::<AppGroup, RoutesIndex>);
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct AppGroup;
//! impl RouteLoader<RoutesIndex> for AppGroup {
//!     fn load_into(&self, routes: &mut RoutesIndex) -> Result<(), LoadError> {
//!         routes.insert("/app/home".into(), RouteMeta::build(RouteKind::Destination, Destination::of::<Home>(), "/app/home", "app"));
//!         Ok(())
//!     }
//! }
//!
//! let source = StaticSource::new().with_table(RouteTableDef::root("courier.routes.Courier$$Root$$app", instantiate::<AppRoot, GroupsIndex>));
//! let router = Router::new();
//! router.init(&Environment::new(RouterConfig::default()).with_source(Arc::new(source)));
//!
//! let mut postcard = Postcard::new("/app/home").unwrap();
//! router.complete(&mut postcard).unwrap();
//! assert_eq!(postcard.destination(), Some(Destination::of::<Home>()));
//! ```

pub mod bootstrap;
mod config;
mod error;
pub mod loader;
mod meta;
pub mod param;
mod postcard;
mod provider;
pub mod query;
mod router;
mod warehouse;

#[cfg(any(test, doc))]
pub(crate) mod test_fixtures;

pub use bootstrap::{BootstrapReport, Environment, FileCache, InventorySource, MemoryCache, RouteTableCache, StaticSource, TableSource};
pub use config::RouterConfig;
pub use error::{BootstrapError, CacheError, ConfigError, LoadError, ProviderInitError, RouteError};
pub use loader::{GroupsIndex, ProvidersIndex, RouteLoader, RouteTableDef, RoutesIndex};
pub use meta::{Destination, RouteKind, RouteMeta, extract_group};
pub use param::{BindOutcome, Extras, ParamKind, ParamValue};
pub use postcard::Postcard;
#[doc(hidden)]
pub use provider::ProviderAny;
pub use provider::{Provider, ProviderConstructor, downcast_provider};
pub use router::Router;
pub use warehouse::WarehouseStats;

#[doc(hidden)]
pub mod __private {
	pub use inventory;
}
