//! Registry store backing a [`crate::Router`].

use std::sync::Arc;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::loader::{GroupsIndex, ProvidersIndex, RoutesIndex};
use crate::meta::Destination;
use crate::provider::Provider;

/// The four route indices plus the set of already expanded groups.
///
/// `groups_index` and `expanded` are disjoint: a group leaves the index in the same
/// critical section that records it as expanded.
#[derive(Default)]
pub(crate) struct Warehouse {
	pub(crate) groups_index: GroupsIndex,
	pub(crate) routes: RoutesIndex,
	pub(crate) providers_index: ProvidersIndex,
	pub(crate) providers: HashMap<Destination, Arc<dyn Provider>>,
	pub(crate) expanded: HashSet<String>,
}

impl Warehouse {
	pub(crate) fn clear(&mut self) {
		self.groups_index.clear();
		self.routes.clear();
		self.providers_index.clear();
		self.providers.clear();
		self.expanded.clear();
	}

	pub(crate) fn stats(&self) -> WarehouseStats {
		WarehouseStats {
			groups: self.groups_index.len(),
			routes: self.routes.len(),
			services: self.providers_index.len(),
			instances: self.providers.len(),
			expanded: self.expanded.len(),
		}
	}
}

/// Index sizes, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarehouseStats {
	/// Groups registered but not yet expanded.
	pub groups: usize,
	/// Resolved routes.
	pub routes: usize,
	/// Registered service routes.
	pub services: usize,
	/// Instantiated service singletons.
	pub instances: usize,
	/// Groups already expanded into `routes`.
	pub expanded: usize,
}
