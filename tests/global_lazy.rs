//! Lazy initialization of the global store.
//!
//! The store is process-wide and lazy loading reads the current directory,
//! so this binary holds a single test that owns both.

use envtree::EnvtreeError;
use envtree::config::{ConfigValue, global};
use std::fs;

#[test]
fn test_lazy_init_propagates_errors_then_loads() {
	let temp_dir = tempfile::tempdir().unwrap();
	let env_path = temp_dir.path().join(".env");
	fs::create_dir(&env_path).unwrap();
	std::env::set_current_dir(temp_dir.path()).unwrap();

	// First access tries to load and reports the unreadable file
	match global::get("app.name", "x") {
		Err(EnvtreeError::EnvFileUnreadable { path, .. }) => assert!(path.ends_with(".env")),
		other => panic!("Expected EnvFileUnreadable, got {other:?}"),
	}
	assert!(!global::is_initialized());

	// Nothing was cached, so an explicit init sees the same failure
	assert!(matches!(
		global::init(Default::default()),
		Err(EnvtreeError::EnvFileUnreadable { .. })
	));
	assert!(global::env("ENVTREE_LAZY_MARKER", "unset").is_err());

	// Once the file is readable the next access loads it
	fs::remove_dir(&env_path).unwrap();
	fs::write(&env_path, "ENVTREE_LAZY_MARKER=from-file\n").unwrap();

	assert_eq!(
		global::env("ENVTREE_LAZY_MARKER", "unset").unwrap(),
		"from-file"
	);
	assert!(global::is_initialized());
	assert_eq!(
		global::get("cache.stores.file.driver", "x").unwrap(),
		ConfigValue::from("file")
	);
}
