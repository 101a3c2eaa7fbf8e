use crate::error::{EnvtreeError, Result};
use indexmap::IndexMap;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\.env(\.[A-Za-z0-9_-]+)?$").expect("env filename pattern is valid")
});

/// Fields written by [`EnvTemplate::standard`], in output order.
const STANDARD_FIELDS: &[(&str, &str)] = &[
	("APP_NAME", "MyApp"),
	("APP_ENV", "local"),
	("APP_DEBUG", "true"),
	("APP_URL", "http://localhost"),
	("DB_CONNECTION", "mysql"),
	("DB_HOST", "localhost"),
	("DB_PORT", "3306"),
	("DB_DATABASE", "test"),
	("DB_USERNAME", "root"),
	("DB_PASSWORD", "123456"),
	("DB_CHARSET", "utf8mb4"),
	("DB_COLLATION", "utf8mb4_unicode_ci"),
	("DB_PREFIX", ""),
];

/// An ordered set of fields to be written as an env file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvTemplate {
	fields: IndexMap<String, String>,
}

impl EnvTemplate {
	/// The standard application/database field set with its defaults.
	pub fn standard() -> Self {
		STANDARD_FIELDS
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	/// Set a field. Known fields keep their position, unknown ones are appended.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.fields.insert(key.into(), value.into());
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.fields.get(key).map(String::as_str)
	}

	pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Reject values that contain `..` path segments.
	pub fn validate(&self) -> Result<()> {
		for (key, value) in &self.fields {
			if has_path_traversal(value) {
				return Err(EnvtreeError::PathTraversal { key: key.clone() });
			}
		}
		Ok(())
	}

	/// Render as `KEY="value"` lines with escaped values.
	pub fn render(&self) -> String {
		self.fields
			.iter()
			.map(|(key, value)| format!("{}=\"{}\"", key, escape_value(value)))
			.collect::<Vec<_>>()
			.join("\n")
	}
}

impl FromIterator<(String, String)> for EnvTemplate {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		EnvTemplate {
			fields: iter.into_iter().collect(),
		}
	}
}

/// Validate an env filename, returning its final path component.
///
/// Accepts `.env` and `.env.<suffix>` where the suffix is made of
/// letters, digits, `_` and `-`. Any directory part is discarded first.
pub fn validate_filename(input: &str) -> Result<String> {
	let invalid = || EnvtreeError::InvalidFilename {
		name: input.to_string(),
	};

	let name = Path::new(input)
		.file_name()
		.and_then(|n| n.to_str())
		.ok_or_else(invalid)?;

	if !ENV_FILENAME.is_match(name) {
		return Err(invalid());
	}

	Ok(name.to_string())
}

/// Backslash-escape newline, carriage return, double quote and backslash.
pub fn escape_value(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'\n' => escaped.push_str("\\n"),
			'\r' => escaped.push_str("\\r"),
			'"' => escaped.push_str("\\\""),
			'\\' => escaped.push_str("\\\\"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Parse a `KEY=VALUE` assignment as given on the command line.
pub fn parse_assignment(input: &str) -> Result<(String, String)> {
	match input.split_once('=') {
		Some((key, value)) if !key.trim().is_empty() => {
			Ok((key.trim().to_string(), value.to_string()))
		}
		_ => Err(EnvtreeError::InvalidAssignment {
			input: input.to_string(),
		}),
	}
}

/// Write `template` into `dir` under a validated env filename.
///
/// Returns the path written. An existing file is overwritten.
pub fn write_env_file(dir: &Path, filename: &str, template: &EnvTemplate) -> Result<PathBuf> {
	let name = validate_filename(filename)?;
	template.validate()?;

	if !is_writable_dir(dir) {
		return Err(EnvtreeError::DirectoryNotWritable {
			path: dir.to_path_buf(),
		});
	}

	let path = dir.join(name);
	std::fs::write(&path, template.render()).map_err(|source| EnvtreeError::WriteFailed {
		path: path.clone(),
		source,
	})?;

	tracing::debug!("Wrote env file {}", path.display());
	Ok(path)
}

/// Permission bits alone miss ownership and ACLs, so try creating a file.
fn is_writable_dir(dir: &Path) -> bool {
	dir.is_dir() && tempfile::NamedTempFile::new_in(dir).is_ok()
}

fn has_path_traversal(value: &str) -> bool {
	value.split(['/', '\\']).any(|segment| segment == "..")
}
