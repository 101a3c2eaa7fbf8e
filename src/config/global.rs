//! Process-wide configuration accessor.
//!
//! Prefer passing a [`ConfigStore`] explicitly. This module exists for hosts
//! that want a single shared store: it is initialized once, either by an
//! explicit [`init`] or lazily with [`LoadOptions::default`] on first access,
//! and guarded by a read-write lock.
//!
//! A failed load is never cached. Every accessor returns the load error, and
//! the next call (or an explicit [`init`]) tries again.

use crate::config::store::{ConfigStore, LoadOptions};
use crate::config::value::{ConfigTree, ConfigValue};
use crate::error::Result;
use std::sync::{OnceLock, RwLock};

static STORE: OnceLock<RwLock<ConfigStore>> = OnceLock::new();

/// Load the global store. Calls after the first successful one are no-ops.
pub fn init(options: LoadOptions) -> Result<()> {
	load_once(options).map(|_| ())
}

/// Whether the global store has been loaded.
pub fn is_initialized() -> bool {
	STORE.get().is_some()
}

fn load_once(options: LoadOptions) -> Result<&'static RwLock<ConfigStore>> {
	if let Some(store) = STORE.get() {
		return Ok(store);
	}

	// Another thread may finish loading first; its store wins and ours is dropped.
	let store = ConfigStore::load(options)?;
	Ok(STORE.get_or_init(|| RwLock::new(store)))
}

fn store() -> Result<&'static RwLock<ConfigStore>> {
	load_once(LoadOptions::default())
}

/// Run `f` with shared access to the global store.
pub fn with_store<R>(f: impl FnOnce(&ConfigStore) -> R) -> Result<R> {
	let guard = store()?
		.read()
		.unwrap_or_else(|poisoned| poisoned.into_inner());
	Ok(f(&guard))
}

/// Run `f` with exclusive access to the global store.
pub fn with_store_mut<R>(f: impl FnOnce(&mut ConfigStore) -> R) -> Result<R> {
	let mut guard = store()?
		.write()
		.unwrap_or_else(|poisoned| poisoned.into_inner());
	Ok(f(&mut guard))
}

/// Get the value at a dotted path, or `default`.
pub fn get(key: &str, default: impl Into<ConfigValue>) -> Result<ConfigValue> {
	with_store(|s| s.get_or(key, default))
}

/// Set a value at a dotted path.
pub fn set(key: &str, value: impl Into<ConfigValue>) -> Result<()> {
	with_store_mut(|s| s.set(key, value))
}

/// Resolve an environment variable through the layered lookup.
pub fn env(key: &str, default: &str) -> Result<String> {
	with_store(|s| s.env(key, default))
}

/// Snapshot of the whole tree.
pub fn all() -> Result<ConfigTree> {
	with_store(|s| s.all().clone())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::env::SystemEnv;

	// The global store is shared by every test in this binary, so all
	// assertions against it live in one test. Lazy initialization is
	// covered by tests/global_lazy.rs, which owns its own process.
	#[test]
	fn test_global_store_lifecycle() {
		let temp_dir = tempfile::tempdir().unwrap();
		std::fs::write(temp_dir.path().join(".env"), "APP_NAME=Global").unwrap();

		// A failed init leaves the store unset
		let broken = tempfile::tempdir().unwrap();
		std::fs::create_dir(broken.path().join(".env")).unwrap();
		let result = init(LoadOptions::default().with_root(broken.path()));
		assert!(matches!(
			result,
			Err(crate::EnvtreeError::EnvFileUnreadable { .. })
		));
		assert!(!is_initialized());

		let options = LoadOptions::default()
			.with_root(temp_dir.path())
			.with_system_env(SystemEnv::empty());
		init(options).unwrap();
		assert!(is_initialized());

		// Second init is a no-op, even with different options
		let other = LoadOptions::default()
			.with_root(temp_dir.path())
			.with_system_env(SystemEnv::empty())
			.with_override("APP_NAME", "Other");
		init(other).unwrap();

		assert_eq!(get("app.name", "x").unwrap(), ConfigValue::from("Global"));
		assert_eq!(env("APP_NAME", "x").unwrap(), "Global");

		set("a.b.c", 5).unwrap();
		assert_eq!(get("a.b.c", 0).unwrap(), ConfigValue::Int(5));
		set("a.b", 9).unwrap();
		assert_eq!(
			get("a.b.c", "default").unwrap(),
			ConfigValue::from("default")
		);

		let snapshot = all().unwrap();
		assert_eq!(snapshot.get("a.b"), Some(&ConfigValue::Int(9)));
	}
}
