//! Router configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::loader::ROUTE_ROOT_NAMESPACE;

/// Settings consumed by [`crate::Router::init`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
	/// Rescan route tables on every init instead of trusting the cached listing.
	pub debuggable: bool,
	/// Version fingerprint; a change invalidates the cached listing.
	pub app_version: String,
	/// Namespace route tables are registered under. Macro-registered tables need the
	/// same namespace passed to `root_table!` / `providers_table!`.
	pub namespace: String,
	/// Directory for the persisted listing. In-memory when unset.
	pub cache_dir: Option<PathBuf>,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			debuggable: false,
			app_version: "0.0.0".to_string(),
			namespace: ROUTE_ROOT_NAMESPACE.to_string(),
			cache_dir: None,
		}
	}
}

impl RouterConfig {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_when_empty() {
		assert_eq!(RouterConfig::from_toml_str("").unwrap(), RouterConfig::default());
	}

	#[test]
	fn test_parse_all_fields() {
		let config = RouterConfig::from_toml_str(
			r#"
debuggable = true
app_version = "2.1.0+41"
namespace = "shop.routes"
cache_dir = "/tmp/courier"
"#,
		)
		.unwrap();

		assert!(config.debuggable);
		assert_eq!(config.app_version, "2.1.0+41");
		assert_eq!(config.namespace, "shop.routes");
		assert_eq!(config.cache_dir.as_deref(), Some(Path::new("/tmp/courier")));
	}

	#[test]
	fn test_unknown_field_rejected() {
		assert!(matches!(RouterConfig::from_toml_str("verbose = true"), Err(ConfigError::Parse(_))));
	}

	#[test]
	fn test_load_missing_file() {
		let err = RouterConfig::load(Path::new("/nonexistent/courier.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));
	}
}
