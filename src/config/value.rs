use indexmap::IndexMap;
use serde::Serialize;

/// A nested table of config values, in insertion order.
pub type Table = IndexMap<String, ConfigValue>;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
	Null,
	Bool(bool),
	Int(i64),
	String(String),
	Table(Table),
}

impl ConfigValue {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			ConfigValue::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			ConfigValue::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			ConfigValue::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_table(&self) -> Option<&Table> {
		match self {
			ConfigValue::Table(t) => Some(t),
			_ => None,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, ConfigValue::Null)
	}

	pub fn is_table(&self) -> bool {
		matches!(self, ConfigValue::Table(_))
	}

	/// Plain-text form of a scalar. `None` for tables.
	pub fn to_scalar_string(&self) -> Option<String> {
		match self {
			ConfigValue::Null => Some(String::new()),
			ConfigValue::Bool(b) => Some(b.to_string()),
			ConfigValue::Int(i) => Some(i.to_string()),
			ConfigValue::String(s) => Some(s.clone()),
			ConfigValue::Table(_) => None,
		}
	}

	/// Copy of this value with every null leaf removed from tables.
	fn without_nulls(&self) -> ConfigValue {
		match self {
			ConfigValue::Table(table) => ConfigValue::Table(
				table
					.iter()
					.filter(|(_, v)| !v.is_null())
					.map(|(k, v)| (k.clone(), v.without_nulls()))
					.collect(),
			),
			other => other.clone(),
		}
	}
}

impl From<&str> for ConfigValue {
	fn from(value: &str) -> Self {
		ConfigValue::String(value.to_string())
	}
}

impl From<String> for ConfigValue {
	fn from(value: String) -> Self {
		ConfigValue::String(value)
	}
}

impl From<bool> for ConfigValue {
	fn from(value: bool) -> Self {
		ConfigValue::Bool(value)
	}
}

impl From<i64> for ConfigValue {
	fn from(value: i64) -> Self {
		ConfigValue::Int(value)
	}
}

impl From<i32> for ConfigValue {
	fn from(value: i32) -> Self {
		ConfigValue::Int(value.into())
	}
}

impl From<Table> for ConfigValue {
	fn from(value: Table) -> Self {
		ConfigValue::Table(value)
	}
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(ConfigValue::Null, Into::into)
	}
}

/// Why a dotted-path lookup found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
	/// A segment of the path does not exist.
	#[error("No config value at {path}")]
	Missing { path: String },

	/// The path continues through a scalar value.
	#[error("Config value at {path} is not a table")]
	NotATable { path: String },
}

/// The root of the configuration, addressed by dotted paths like `a.b.c`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigTree {
	root: Table,
}

impl ConfigTree {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn as_table(&self) -> &Table {
		&self.root
	}

	pub fn is_empty(&self) -> bool {
		self.root.is_empty()
	}

	/// Walk a dotted path, reporting where and why it stopped.
	pub fn lookup(&self, key: &str) -> Result<&ConfigValue, LookupError> {
		let mut current: Option<&ConfigValue> = None;
		let mut walked: Vec<&str> = Vec::new();

		for segment in key.split('.') {
			let table = match current {
				None => &self.root,
				Some(ConfigValue::Table(table)) => table,
				Some(_) => {
					return Err(LookupError::NotATable {
						path: walked.join("."),
					});
				}
			};

			walked.push(segment);
			let value = table.get(segment).ok_or_else(|| LookupError::Missing {
				path: walked.join("."),
			})?;
			current = Some(value);
		}

		current.ok_or_else(|| LookupError::Missing {
			path: key.to_string(),
		})
	}

	/// Get the value at a dotted path.
	pub fn get(&self, key: &str) -> Option<&ConfigValue> {
		self.lookup(key).ok()
	}

	/// Get the value at a dotted path, or `default` if the path is broken.
	pub fn get_or<'a>(&'a self, key: &str, default: &'a ConfigValue) -> &'a ConfigValue {
		self.get(key).unwrap_or(default)
	}

	/// Set the value at a dotted path.
	///
	/// Missing intermediate tables are created and scalars on the path are
	/// replaced by tables.
	pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
		let segments: Vec<&str> = key.split('.').collect();
		let Some((last, parents)) = segments.split_last() else {
			return;
		};

		let mut table = &mut self.root;
		for segment in parents {
			let entry = table
				.entry(segment.to_string())
				.or_insert_with(|| ConfigValue::Table(Table::new()));
			table = ensure_table(entry);
		}

		table.insert(last.to_string(), value.into());
	}

	/// All scalar leaves as `(dotted.path, value)` pairs in tree order.
	pub fn flatten(&self) -> Vec<(String, &ConfigValue)> {
		let mut leaves = Vec::new();
		flatten_into(&self.root, "", &mut leaves);
		leaves
	}

	/// Render the tree as TOML. Null leaves have no TOML form and are omitted.
	pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
		render_toml(&ConfigValue::Table(self.root.clone()))
	}
}

impl From<Table> for ConfigTree {
	fn from(root: Table) -> Self {
		ConfigTree { root }
	}
}

/// Render a table value as TOML, dropping null leaves.
pub fn render_toml(value: &ConfigValue) -> Result<String, toml::ser::Error> {
	toml::to_string(&value.without_nulls())
}

fn ensure_table(value: &mut ConfigValue) -> &mut Table {
	if !value.is_table() {
		*value = ConfigValue::Table(Table::new());
	}
	match value {
		ConfigValue::Table(table) => table,
		_ => unreachable!("non-table values were replaced above"),
	}
}

fn flatten_into<'a>(table: &'a Table, prefix: &str, leaves: &mut Vec<(String, &'a ConfigValue)>) {
	for (key, value) in table {
		let path = if prefix.is_empty() {
			key.clone()
		} else {
			format!("{prefix}.{key}")
		};

		match value {
			ConfigValue::Table(inner) => flatten_into(inner, &path, leaves),
			leaf => leaves.push((path, leaf)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_tree() -> ConfigTree {
		let mut tree = ConfigTree::new();
		tree.set("database.default", "mysql");
		tree.set("database.connections.mysql.host", "localhost");
		tree.set("database.connections.mysql.port", "3306");
		tree.set("app.debug", false);
		tree
	}

	#[test]
	fn test_get_nested_value() {
		let tree = sample_tree();
		assert_eq!(
			tree.get("database.connections.mysql.host"),
			Some(&ConfigValue::from("localhost"))
		);
		assert_eq!(tree.get("app.debug"), Some(&ConfigValue::Bool(false)));
	}

	#[test]
	fn test_get_intermediate_table() {
		let tree = sample_tree();
		let mysql = tree.get("database.connections.mysql").unwrap();
		assert_eq!(mysql.as_table().unwrap().len(), 2);
	}

	#[test]
	fn test_get_or_missing_root_key() {
		let tree = ConfigTree::new();
		let fallback = ConfigValue::from("fallback");
		assert_eq!(
			tree.get_or("database.connections.mysql.host", &fallback),
			&fallback
		);
	}

	#[test]
	fn test_get_or_non_table_intermediate() {
		let mut tree = ConfigTree::new();
		tree.set("database.connections", "not a table");
		let fallback = ConfigValue::from("fallback");
		assert_eq!(
			tree.get_or("database.connections.mysql.host", &fallback),
			&fallback
		);
	}

	#[test]
	fn test_lookup_distinguishes_missing_from_wrong_shape() {
		let mut tree = ConfigTree::new();
		tree.set("database.connections", "scalar");

		assert_eq!(
			tree.lookup("database.missing.host"),
			Err(LookupError::Missing {
				path: "database.missing".to_string()
			})
		);
		assert_eq!(
			tree.lookup("database.connections.mysql"),
			Err(LookupError::NotATable {
				path: "database.connections".to_string()
			})
		);
	}

	#[test]
	fn test_set_then_get() {
		let mut tree = ConfigTree::new();
		tree.set("a.b.c", 5);
		assert_eq!(tree.get("a.b.c"), Some(&ConfigValue::Int(5)));
	}

	#[test]
	fn test_set_scalar_over_table_breaks_path() {
		let mut tree = ConfigTree::new();
		tree.set("a.b.c", 5);
		tree.set("a.b", 9);

		assert_eq!(tree.get("a.b"), Some(&ConfigValue::Int(9)));
		let fallback = ConfigValue::from("default");
		assert_eq!(tree.get_or("a.b.c", &fallback), &fallback);
	}

	#[test]
	fn test_set_through_scalar_replaces_it() {
		let mut tree = ConfigTree::new();
		tree.set("a", "scalar");
		tree.set("a.b", true);
		assert_eq!(tree.get("a.b"), Some(&ConfigValue::Bool(true)));
	}

	#[test]
	fn test_set_existing_key_keeps_position() {
		let mut tree = sample_tree();
		tree.set("database", "flat");
		let keys: Vec<_> = tree.as_table().keys().cloned().collect();
		assert_eq!(keys, vec!["database", "app"]);
	}

	#[test]
	fn test_null_is_present_value() {
		let mut tree = ConfigTree::new();
		tree.set("cache.redis.password", ConfigValue::Null);
		let fallback = ConfigValue::from("fallback");
		assert_eq!(
			tree.get_or("cache.redis.password", &fallback),
			&ConfigValue::Null
		);
	}

	#[test]
	fn test_option_conversion() {
		assert_eq!(ConfigValue::from(None::<&str>), ConfigValue::Null);
		assert_eq!(ConfigValue::from(Some("x")), ConfigValue::from("x"));
	}

	#[test]
	fn test_flatten() {
		let tree = sample_tree();
		let flat: Vec<_> = tree
			.flatten()
			.into_iter()
			.map(|(k, v)| (k, v.to_scalar_string().unwrap()))
			.collect();

		assert_eq!(
			flat,
			vec![
				("database.default".to_string(), "mysql".to_string()),
				(
					"database.connections.mysql.host".to_string(),
					"localhost".to_string()
				),
				(
					"database.connections.mysql.port".to_string(),
					"3306".to_string()
				),
				("app.debug".to_string(), "false".to_string()),
			]
		);
	}

	#[test]
	fn test_to_toml_string_omits_nulls() {
		let mut tree = ConfigTree::new();
		tree.set("cache.stores.redis.host", "127.0.0.1");
		tree.set("cache.stores.redis.port", 6379);
		tree.set("cache.stores.redis.password", ConfigValue::Null);

		let rendered = tree.to_toml_string().unwrap();
		assert!(!rendered.contains("password"));

		let parsed: toml::Table = toml::from_str(&rendered).unwrap();
		let redis = &parsed["cache"]["stores"]["redis"];
		assert_eq!(redis["host"].as_str(), Some("127.0.0.1"));
		assert_eq!(redis["port"].as_integer(), Some(6379));
	}
}
