use crate::config::defaults::build_default_tree;
use crate::config::env::{EnvResolver, SystemEnv};
use crate::config::value::{ConfigTree, ConfigValue, LookupError};
use crate::dotenv::{EnvFile, EnvVariables, SkippedLine};
use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default env file name looked up under the root directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Where and how a [`ConfigStore`] loads its configuration.
#[derive(Debug, Clone)]
pub struct LoadOptions {
	/// Directory containing the env file. Also the base for default file paths.
	pub root: PathBuf,

	/// Env file name (or relative path) under `root`.
	pub env_file: PathBuf,

	/// Initial override table, checked before the OS environment.
	pub overrides: HashMap<String, String>,

	/// OS environment source.
	pub system_env: SystemEnv,
}

impl Default for LoadOptions {
	fn default() -> Self {
		Self {
			root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
			env_file: PathBuf::from(DEFAULT_ENV_FILE),
			overrides: HashMap::new(),
			system_env: SystemEnv::real(),
		}
	}
}

impl LoadOptions {
	pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.root = root.into();
		self
	}

	pub fn with_env_file(mut self, env_file: impl Into<PathBuf>) -> Self {
		self.env_file = env_file.into();
		self
	}

	pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.overrides.insert(key.into(), value.into());
		self
	}

	pub fn with_system_env(mut self, system_env: SystemEnv) -> Self {
		self.system_env = system_env;
		self
	}

	/// Full path of the env file.
	pub fn env_path(&self) -> PathBuf {
		self.root.join(&self.env_file)
	}
}

/// Loaded configuration: the env resolver plus the derived config tree.
///
/// Built once with [`ConfigStore::load`] and passed by reference to consumers.
/// The tree is never rebuilt; [`ConfigStore::set`] changes are runtime-only.
#[derive(Debug, Clone)]
pub struct ConfigStore {
	resolver: EnvResolver,
	tree: ConfigTree,
	root: PathBuf,
	env_path: Option<PathBuf>,
	skipped: Vec<SkippedLine>,
}

impl ConfigStore {
	/// Load the env file (if present) and populate the default sections.
	///
	/// A missing env file is not an error. An env file that exists but
	/// cannot be read is.
	pub fn load(options: LoadOptions) -> Result<Self> {
		let env_path = options.env_path();

		let (variables, skipped, loaded_path) = if env_path.exists() {
			let parsed = EnvFile::new(&env_path)?.load()?;
			(parsed.variables, parsed.skipped, Some(env_path))
		} else {
			tracing::debug!(
				"No env file at {}, using environment and defaults",
				env_path.display()
			);
			(EnvVariables::default(), Vec::new(), None)
		};

		let resolver = EnvResolver::new(options.overrides, options.system_env, variables);
		let mut store = Self::from_resolver(resolver, options.root);
		store.env_path = loaded_path;
		store.skipped = skipped;
		Ok(store)
	}

	/// Build a store from an existing resolver without touching the filesystem.
	pub fn from_resolver(resolver: EnvResolver, root: impl Into<PathBuf>) -> Self {
		let root = root.into();
		let tree = build_default_tree(&resolver, &root);
		Self {
			resolver,
			tree,
			root,
			env_path: None,
			skipped: Vec::new(),
		}
	}

	/// Walk a dotted path, reporting why it failed.
	pub fn lookup(&self, key: &str) -> std::result::Result<&ConfigValue, LookupError> {
		self.tree.lookup(key)
	}

	/// Get the value at a dotted path.
	pub fn get(&self, key: &str) -> Option<&ConfigValue> {
		self.tree.get(key)
	}

	/// Get the value at a dotted path, or `default` if the path is broken.
	pub fn get_or(&self, key: &str, default: impl Into<ConfigValue>) -> ConfigValue {
		match self.tree.get(key) {
			Some(value) => value.clone(),
			None => default.into(),
		}
	}

	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(ConfigValue::as_str)
	}

	pub fn get_bool(&self, key: &str) -> Option<bool> {
		self.get(key).and_then(ConfigValue::as_bool)
	}

	pub fn get_int(&self, key: &str) -> Option<i64> {
		self.get(key).and_then(ConfigValue::as_int)
	}

	/// Set a value at a dotted path for the lifetime of this store.
	pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
		self.tree.set(key, value);
	}

	/// The whole configuration tree.
	pub fn all(&self) -> &ConfigTree {
		&self.tree
	}

	/// Resolve an environment variable through the override table, OS
	/// environment and env file.
	pub fn env(&self, key: &str, default: &str) -> String {
		self.resolver.env(key, default)
	}

	/// Set an override. The config tree is not rebuilt.
	pub fn set_env_override(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.resolver.set_override(key, value);
	}

	pub fn resolver(&self) -> &EnvResolver {
		&self.resolver
	}

	/// Variables loaded from the env file.
	pub fn env_variables(&self) -> &EnvVariables {
		self.resolver.file_variables()
	}

	/// The env file that was loaded, if one existed.
	pub fn env_path(&self) -> Option<&Path> {
		self.env_path.as_deref()
	}

	/// Lines of the env file that were ignored for lacking `=`.
	pub fn skipped_lines(&self) -> &[SkippedLine] {
		&self.skipped
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Copy env-file variables into the process environment.
	///
	/// Variables already present in the process environment are left alone.
	/// Returns the number of variables exported.
	///
	/// # Safety
	///
	/// Modifies the process environment. The caller must ensure no other
	/// thread reads or writes the environment concurrently.
	pub unsafe fn export_to_process_env(&self) -> usize {
		let mut exported = 0;
		for (name, value) in self.env_variables().iter() {
			if std::env::var_os(name).is_some() {
				continue;
			}
			// SAFETY: upheld by the caller.
			unsafe { std::env::set_var(name, value) };
			exported += 1;
		}
		tracing::debug!("Exported {} env file variables", exported);
		exported
	}
}
