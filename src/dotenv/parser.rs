use crate::error::{EnvtreeError, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Variables parsed from an env file, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVariables {
	vars: IndexMap<String, String>,
}

impl EnvVariables {
	/// Get a variable by name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.vars.get(name).map(String::as_str)
	}

	/// Get a variable by name, falling back to `default`.
	pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
		self.get(name).unwrap_or(default)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.vars.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.vars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vars.is_empty()
	}

	/// Iterate over `(name, value)` pairs in file order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Insert a variable. An existing name keeps its position and takes the new value.
	pub(crate) fn insert(&mut self, name: String, value: String) {
		self.vars.insert(name, value);
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVariables {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut vars = EnvVariables::default();
		for (k, v) in iter {
			vars.insert(k.into(), v.into());
		}
		vars
	}
}

/// A line that was ignored because it has no `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
	/// 1-based line number in the source.
	pub line: usize,

	/// The raw line content.
	pub content: String,
}

/// Result of parsing an env file: the variables plus any malformed lines.
#[derive(Debug, Clone, Default)]
pub struct ParsedEnv {
	pub variables: EnvVariables,
	pub skipped: Vec<SkippedLine>,
}

/// Classification of a single env-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvLine<'a> {
	Comment,
	Malformed,
	Assignment { name: &'a str, value: String },
}

/// A handle to an env file on disk.
#[derive(Debug, Clone)]
pub struct EnvFile {
	path: PathBuf,
}

impl EnvFile {
	/// Create a handle, failing if the path does not exist.
	pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		if !path.exists() {
			return Err(EnvtreeError::EnvFileNotFound { path });
		}
		Ok(EnvFile { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Read and parse the file.
	pub fn load(&self) -> Result<ParsedEnv> {
		let bytes = std::fs::read(&self.path).map_err(|source| EnvtreeError::EnvFileUnreadable {
			path: self.path.clone(),
			source,
		})?;
		let content = String::from_utf8(bytes).map_err(|source| EnvtreeError::EnvFileNotUtf8 {
			path: self.path.clone(),
			source,
		})?;

		let parsed = parse_env_str(&content);
		tracing::debug!(
			"Loaded {} variables from {}",
			parsed.variables.len(),
			self.path.display()
		);
		for skipped in &parsed.skipped {
			tracing::warn!(
				"{}: line {} ignored (no '='): {}",
				self.path.display(),
				skipped.line,
				skipped.content
			);
		}

		Ok(parsed)
	}
}

/// Lazily yield non-empty lines with their 1-based line numbers.
pub fn env_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
	content
		.lines()
		.enumerate()
		.filter(|(_, line)| !line.is_empty())
		.map(|(i, line)| (i + 1, line))
}

/// Characters stripped from both ends of names and values. Other Unicode
/// whitespace is kept.
const TRIMMED: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Classify and decode a single line.
pub fn parse_line(line: &str) -> EnvLine<'_> {
	if trim(line).starts_with('#') {
		return EnvLine::Comment;
	}

	let Some((name, value)) = line.split_once('=') else {
		return EnvLine::Malformed;
	};

	let value = strip_quotes(trim(value));
	let value = value.replace("\\n", "\n").replace("\\r", "\r");

	EnvLine::Assignment {
		name: trim(name),
		value,
	}
}

fn trim(s: &str) -> &str {
	s.trim_matches(TRIMMED)
}

/// Parse env-file content. Malformed lines are skipped and reported, never fatal.
pub fn parse_env_str(content: &str) -> ParsedEnv {
	let mut parsed = ParsedEnv::default();

	for (line_no, line) in env_lines(content) {
		match parse_line(line) {
			EnvLine::Comment => {}
			EnvLine::Malformed => parsed.skipped.push(SkippedLine {
				line: line_no,
				content: line.to_string(),
			}),
			EnvLine::Assignment { name, value } => {
				parsed.variables.insert(name.to_string(), value);
			}
		}
	}

	parsed
}

/// Strip exactly one layer of matching single or double quotes.
fn strip_quotes(value: &str) -> &str {
	for quote in ['"', '\''] {
		if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
			return &value[1..value.len() - 1];
		}
	}
	value
}
