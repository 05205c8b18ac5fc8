//! Persisted route-table listings.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Key under which the route-table listing is stored.
pub const ROUTE_MAP_KEY: &str = "courier.route_map";

/// Small key-value store remembering the last scanned listing and the version it
/// was scanned for.
pub trait RouteTableCache: Send + Sync {
	fn get(&self, key: &str) -> Result<Option<BTreeSet<String>>, CacheError>;
	fn put(&self, key: &str, names: &BTreeSet<String>) -> Result<(), CacheError>;
	fn last_version(&self) -> Result<Option<String>, CacheError>;
	fn record_version(&self, version: &str) -> Result<(), CacheError>;
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct CacheDocument {
	version: Option<String>,
	#[serde(default)]
	entries: BTreeMap<String, BTreeSet<String>>,
}

/// Process-local cache; every new process rescans.
#[derive(Debug, Default)]
pub struct MemoryCache {
	doc: Mutex<CacheDocument>,
}

impl RouteTableCache for MemoryCache {
	fn get(&self, key: &str) -> Result<Option<BTreeSet<String>>, CacheError> {
		Ok(self.doc.lock().entries.get(key).cloned())
	}

	fn put(&self, key: &str, names: &BTreeSet<String>) -> Result<(), CacheError> {
		self.doc.lock().entries.insert(key.to_string(), names.clone());
		Ok(())
	}

	fn last_version(&self) -> Result<Option<String>, CacheError> {
		Ok(self.doc.lock().version.clone())
	}

	fn record_version(&self, version: &str) -> Result<(), CacheError> {
		self.doc.lock().version = Some(version.to_string());
		Ok(())
	}
}

/// JSON document stored in a directory, surviving restarts.
#[derive(Debug)]
pub struct FileCache {
	path: PathBuf,
	lock: Mutex<()>,
}

impl FileCache {
	pub const FILE_NAME: &'static str = "route-cache.json";

	pub fn new(dir: impl AsRef<Path>) -> Self {
		Self {
			path: dir.as_ref().join(Self::FILE_NAME),
			lock: Mutex::new(()),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn read(&self) -> Result<CacheDocument, CacheError> {
		match std::fs::read(&self.path) {
			Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CacheDocument::default()),
			Err(source) => Err(self.io_error(source)),
		}
	}

	fn write(&self, doc: &CacheDocument) -> Result<(), CacheError> {
		if let Some(dir) = self.path.parent() {
			std::fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;
		}
		let bytes = serde_json::to_vec_pretty(doc)?;
		std::fs::write(&self.path, bytes).map_err(|source| self.io_error(source))
	}

	fn update(&self, f: impl FnOnce(&mut CacheDocument)) -> Result<(), CacheError> {
		let _guard = self.lock.lock();
		let mut doc = self.read()?;
		f(&mut doc);
		self.write(&doc)
	}

	fn io_error(&self, source: std::io::Error) -> CacheError {
		CacheError::Io {
			path: self.path.clone(),
			source,
		}
	}
}

impl RouteTableCache for FileCache {
	fn get(&self, key: &str) -> Result<Option<BTreeSet<String>>, CacheError> {
		let _guard = self.lock.lock();
		Ok(self.read()?.entries.remove(key))
	}

	fn put(&self, key: &str, names: &BTreeSet<String>) -> Result<(), CacheError> {
		self.update(|doc| {
			doc.entries.insert(key.to_string(), names.clone());
		})
	}

	fn last_version(&self) -> Result<Option<String>, CacheError> {
		let _guard = self.lock.lock();
		Ok(self.read()?.version)
	}

	fn record_version(&self, version: &str) -> Result<(), CacheError> {
		self.update(|doc| doc.version = Some(version.to_string()))
	}
}
