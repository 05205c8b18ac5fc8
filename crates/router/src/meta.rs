//! Route metadata produced by generated loader code.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{ProviderInitError, RouteError};
use crate::param::ParamKind;
use crate::provider::{Provider, ProviderConstructor, construct_default};

/// What a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
	/// A navigable target; the destination handle is all the caller needs.
	Destination,
	/// A singleton service, materialized and cached on resolution.
	Service,
	/// An embeddable view fragment.
	Fragment,
	Unknown,
}

/// Opaque handle to a generated target type.
///
/// Identity is the name alone. Service destinations also carry the constructor used
/// to materialize their singleton.
#[derive(Clone, Copy)]
pub struct Destination {
	name: &'static str,
	constructor: Option<ProviderConstructor>,
}

impl Destination {
	pub const fn named(name: &'static str) -> Self {
		Self { name, constructor: None }
	}

	/// Handle named after `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self::named(std::any::type_name::<T>())
	}

	/// Service handle constructing `T` through [`Default`].
	pub fn service<T>() -> Self
	where
		T: Provider + Default,
	{
		Self {
			name: std::any::type_name::<T>(),
			constructor: Some(construct_default::<T>),
		}
	}

	/// Service handle with an explicit constructor.
	pub const fn service_with(name: &'static str, constructor: ProviderConstructor) -> Self {
		Self {
			name,
			constructor: Some(constructor),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn is_constructible(&self) -> bool {
		self.constructor.is_some()
	}

	pub(crate) fn construct(&self) -> Result<Arc<dyn Provider>, ProviderInitError> {
		match self.constructor {
			Some(constructor) => constructor(),
			None => Err(ProviderInitError::new("destination has no service constructor")),
		}
	}
}

impl PartialEq for Destination {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for Destination {}

impl Hash for Destination {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl std::fmt::Debug for Destination {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Destination")
			.field("name", &self.name)
			.field("service", &self.constructor.is_some())
			.finish()
	}
}

/// Immutable descriptor of one destination.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMeta {
	path: String,
	group: String,
	kind: RouteKind,
	destination: Destination,
	params_type: IndexMap<String, ParamKind>,
	priority: i32,
	extra: i32,
}

impl RouteMeta {
	/// Starts a route record. An empty `group` is derived from the first path segment.
	pub fn build(kind: RouteKind, destination: Destination, path: impl Into<String>, group: impl Into<String>) -> Self {
		let path = path.into();
		let mut group = group.into();
		if group.is_empty() {
			group = extract_group(&path).unwrap_or_default();
		}
		Self {
			path,
			group,
			kind,
			destination,
			params_type: IndexMap::new(),
			priority: -1,
			extra: i32::MIN,
		}
	}

	pub fn with_param(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
		self.params_type.insert(name.into(), kind);
		self
	}

	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	pub fn with_extra(mut self, extra: i32) -> Self {
		self.extra = extra;
		self
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn group(&self) -> &str {
		&self.group
	}

	pub fn kind(&self) -> RouteKind {
		self.kind
	}

	pub fn destination(&self) -> Destination {
		self.destination
	}

	pub fn params_type(&self) -> &IndexMap<String, ParamKind> {
		&self.params_type
	}

	pub fn priority(&self) -> i32 {
		self.priority
	}

	pub fn extra(&self) -> i32 {
		self.extra
	}
}

/// Returns the group encoded in a `/group/...` path.
pub fn extract_group(path: &str) -> Result<String, RouteError> {
	let invalid = || RouteError::InvalidPath(path.to_string());
	let rest = path.strip_prefix('/').ok_or_else(invalid)?;
	let (group, _) = rest.split_once('/').ok_or_else(invalid)?;
	if group.is_empty() {
		return Err(invalid());
	}
	Ok(group.to_string())
}
