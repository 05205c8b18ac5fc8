//! Error types shared across the router.

use std::path::PathBuf;

/// Failure reported by generated loader code.
///
/// Loaders are expected to be infallible; seeing one of these means the generated
/// tables and the runtime disagree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoadError {
	message: String,
}

impl LoadError {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Failure to construct a service singleton.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderInitError {
	message: String,
}

impl ProviderInitError {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// Errors surfaced to callers of [`crate::Router::complete`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
	/// Neither the resolved routes nor the group index know the request.
	#[error("no route matches path [{path}] in group [{group}]")]
	NoRoute { path: String, group: String },

	/// A group loader could not be constructed or failed while populating routes.
	#[error("fatal error while loading group [{group}]: {source}")]
	GroupLoad {
		group: String,
		#[source]
		source: LoadError,
	},

	/// A service destination could not be instantiated.
	#[error("failed to initialise provider [{destination}]: {source}")]
	ProviderInit {
		destination: &'static str,
		#[source]
		source: ProviderInitError,
	},

	/// The path does not follow the `/group/...` convention.
	#[error("invalid route path [{0}]: expected `/group/...`")]
	InvalidPath(String),
}

impl RouteError {
	/// Returns true for loader and provider failures, which indicate a broken build rather
	/// than a missing registration.
	pub fn is_handler_error(&self) -> bool {
		matches!(self, Self::GroupLoad { .. } | Self::ProviderInit { .. })
	}
}

/// Errors raised by a [`crate::bootstrap::RouteTableCache`].
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
	#[error("route cache I/O failed at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("route cache is corrupt: {0}")]
	Json(#[from] serde_json::Error),
}

/// Errors caught during bootstrap. Recorded in the report, never propagated.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
	#[error(transparent)]
	Cache(#[from] CacheError),

	#[error("route table scan failed: {0}")]
	Scan(#[source] LoadError),

	#[error("route table [{0}] is listed but not registered")]
	MissingTable(String),

	#[error("route table [{table}] is registered with a different role than its name implies")]
	RoleMismatch { table: String },

	#[error("route table [{table}] failed to load: {source}")]
	Load {
		table: String,
		#[source]
		source: LoadError,
	},
}

/// Errors raised while loading a [`crate::RouterConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid router config: {0}")]
	Parse(#[from] toml::de::Error),
}
