//! Request descriptor filled in by resolution.

use std::sync::Arc;

use url::Url;

use crate::error::RouteError;
use crate::meta::{Destination, RouteKind, RouteMeta, extract_group};
use crate::param::{Extras, ParamValue};
use crate::provider::Provider;
use crate::query::decode;

/// A single resolution request and its result.
///
/// Callers own the postcard; [`crate::Router::complete`] mutates it in place. After a
/// failed resolution the output fields may be partially set and must not be used.
#[derive(Clone)]
pub struct Postcard {
	path: String,
	group: String,
	uri: Option<Url>,
	destination: Option<Destination>,
	kind: Option<RouteKind>,
	priority: i32,
	extra: i32,
	provider: Option<Arc<dyn Provider>>,
	extras: Extras,
	green_channel: bool,
}

impl Postcard {
	/// Builds a request for `path`, deriving the group from its first segment.
	pub fn new(path: impl Into<String>) -> Result<Self, RouteError> {
		let path = path.into();
		let group = extract_group(&path)?;
		Ok(Self::with_group(path, group))
	}

	pub fn with_group(path: impl Into<String>, group: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			group: group.into(),
			uri: None,
			destination: None,
			kind: None,
			priority: -1,
			extra: 0,
			provider: None,
			extras: Extras::new(),
			green_channel: false,
		}
	}

	/// Builds a request from a URI; its decoded path selects the route and its query
	/// carries the parameters.
	pub fn from_uri(uri: Url) -> Result<Self, RouteError> {
		let mut postcard = Self::new(decode(uri.path()))?;
		postcard.uri = Some(uri);
		Ok(postcard)
	}

	pub fn with_uri(mut self, uri: Url) -> Self {
		self.uri = Some(uri);
		self
	}

	pub fn with_bool(self, key: impl Into<String>, value: bool) -> Self {
		self.with_value(key, ParamValue::Bool(value))
	}

	pub fn with_int(self, key: impl Into<String>, value: i32) -> Self {
		self.with_value(key, ParamValue::Int(value))
	}

	pub fn with_long(self, key: impl Into<String>, value: i64) -> Self {
		self.with_value(key, ParamValue::Long(value))
	}

	pub fn with_double(self, key: impl Into<String>, value: f64) -> Self {
		self.with_value(key, ParamValue::Double(value))
	}

	pub fn with_string(self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.with_value(key, ParamValue::String(value.into()))
	}

	pub fn with_value(mut self, key: impl Into<String>, value: ParamValue) -> Self {
		self.extras.insert(key.into(), value);
		self
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn group(&self) -> &str {
		&self.group
	}

	pub fn uri(&self) -> Option<&Url> {
		self.uri.as_ref()
	}

	pub fn destination(&self) -> Option<Destination> {
		self.destination
	}

	pub fn kind(&self) -> Option<RouteKind> {
		self.kind
	}

	pub fn priority(&self) -> i32 {
		self.priority
	}

	pub fn extra(&self) -> i32 {
		self.extra
	}

	pub fn provider(&self) -> Option<&Arc<dyn Provider>> {
		self.provider.as_ref()
	}

	pub fn extras(&self) -> &Extras {
		&self.extras
	}

	/// True when no further interceptor processing is required.
	pub fn is_green_channel(&self) -> bool {
		self.green_channel
	}

	pub(crate) fn fill_from(&mut self, meta: &RouteMeta) {
		self.destination = Some(meta.destination());
		self.kind = Some(meta.kind());
		self.priority = meta.priority();
		self.extra = meta.extra();
	}

	pub(crate) fn extras_mut(&mut self) -> &mut Extras {
		&mut self.extras
	}

	pub(crate) fn set_provider(&mut self, provider: Arc<dyn Provider>) {
		self.provider = Some(provider);
	}

	pub(crate) fn green_channel(&mut self) {
		self.green_channel = true;
	}
}

impl std::fmt::Debug for Postcard {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Postcard")
			.field("path", &self.path)
			.field("group", &self.group)
			.field("uri", &self.uri.as_ref().map(Url::as_str))
			.field("destination", &self.destination)
			.field("kind", &self.kind)
			.field("priority", &self.priority)
			.field("extra", &self.extra)
			.field("provider", &self.provider.is_some())
			.field("extras", &self.extras)
			.field("green_channel", &self.green_channel)
			.finish()
	}
}
