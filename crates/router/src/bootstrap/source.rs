//! Where route tables are discovered.

use std::collections::BTreeSet;

use crate::error::LoadError;
use crate::loader::{RouteTableDef, TableFactory};

/// Enumerates registered route tables and resolves them by name.
pub trait TableSource: Send + Sync {
	/// Names of every table registered under `namespace`.
	fn scan(&self, namespace: &str) -> Result<BTreeSet<String>, LoadError>;

	/// Factory of the table registered as `name`.
	fn table(&self, name: &str) -> Option<TableFactory>;
}

fn in_namespace(namespace: &str, name: &str) -> bool {
	name.strip_prefix(namespace).is_some_and(|rest| rest.starts_with('.'))
}

/// Tables submitted at link time via [`crate::root_table!`] and [`crate::providers_table!`].
#[derive(Debug, Default, Clone, Copy)]
pub struct InventorySource;

impl TableSource for InventorySource {
	fn scan(&self, namespace: &str) -> Result<BTreeSet<String>, LoadError> {
		Ok(inventory::iter::<RouteTableDef>
			.into_iter()
			.filter(|def| in_namespace(namespace, def.name))
			.map(|def| def.name.to_string())
			.collect())
	}

	fn table(&self, name: &str) -> Option<TableFactory> {
		inventory::iter::<RouteTableDef>.into_iter().find(|def| def.name == name).map(|def| def.factory)
	}
}

/// Explicit list of tables, for hosts that register without link-time collection.
#[derive(Default)]
pub struct StaticSource {
	tables: Vec<RouteTableDef>,
}

impl StaticSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_table(mut self, def: RouteTableDef) -> Self {
		self.tables.push(def);
		self
	}
}

impl TableSource for StaticSource {
	fn scan(&self, namespace: &str) -> Result<BTreeSet<String>, LoadError> {
		Ok(self
			.tables
			.iter()
			.filter(|def| in_namespace(namespace, def.name))
			.map(|def| def.name.to_string())
			.collect())
	}

	fn table(&self, name: &str) -> Option<TableFactory> {
		self.tables.iter().find(|def| def.name == name).map(|def| def.factory)
	}
}
