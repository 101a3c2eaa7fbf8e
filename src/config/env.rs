//! Layered environment variable resolution.
//!
//! A variable is resolved from, in order:
//! 1. the in-process override table
//! 2. the OS environment
//! 3. variables loaded from the env file
//! 4. the caller's default

use crate::config::value::ConfigValue;
use crate::dotenv::EnvVariables;
use std::collections::HashMap;

/// OS environment reader.
///
/// Production code uses [`SystemEnv::real()`] which delegates to
/// [`std::env::var`]. Tests and embedding hosts can supply a fixed set of
/// values instead, so lookups never depend on the real process environment.
#[derive(Debug, Clone)]
pub struct SystemEnv {
	fixed: Option<HashMap<String, String>>,
}

impl SystemEnv {
	/// Read from the real process environment.
	pub fn real() -> Self {
		Self { fixed: None }
	}

	/// Use an explicit set of variables in place of the process environment.
	pub fn from_pairs(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
		Self {
			fixed: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
		}
	}

	/// An environment with no variables at all.
	pub fn empty() -> Self {
		Self {
			fixed: Some(HashMap::new()),
		}
	}

	/// Look up a variable. Values that are not valid unicode count as unset.
	pub fn var(&self, name: &str) -> Option<String> {
		match &self.fixed {
			Some(map) => map.get(name).cloned(),
			None => std::env::var(name).ok(),
		}
	}
}

impl Default for SystemEnv {
	fn default() -> Self {
		Self::real()
	}
}

/// Resolves variables through the override table, OS environment and env file.
#[derive(Debug, Clone, Default)]
pub struct EnvResolver {
	overrides: HashMap<String, String>,
	system: SystemEnv,
	file: EnvVariables,
}

impl EnvResolver {
	pub fn new(
		overrides: HashMap<String, String>,
		system: SystemEnv,
		file: EnvVariables,
	) -> Self {
		Self {
			overrides,
			system,
			file,
		}
	}

	/// Resolve a variable, `None` if no layer has it.
	pub fn resolve(&self, key: &str) -> Option<String> {
		if let Some(value) = self.overrides.get(key) {
			return Some(value.clone());
		}
		if let Some(value) = self.system.var(key) {
			return Some(value);
		}
		self.file.get(key).map(str::to_string)
	}

	/// Resolve a variable, falling back to `default`.
	pub fn env(&self, key: &str, default: &str) -> String {
		self.resolve(key).unwrap_or_else(|| default.to_string())
	}

	/// Resolve a variable as a string config value, or use a typed default.
	pub fn env_value(&self, key: &str, default: impl Into<ConfigValue>) -> ConfigValue {
		match self.resolve(key) {
			Some(value) => ConfigValue::String(value),
			None => default.into(),
		}
	}

	/// Set a variable in the override table.
	pub fn set_override(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.overrides.insert(key.into(), value.into());
	}

	pub fn remove_override(&mut self, key: &str) -> Option<String> {
		self.overrides.remove(key)
	}

	pub fn overrides(&self) -> &HashMap<String, String> {
		&self.overrides
	}

	pub fn system(&self) -> &SystemEnv {
		&self.system
	}

	pub fn file_variables(&self) -> &EnvVariables {
		&self.file
	}
}
