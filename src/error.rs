use std::path::PathBuf;

/// Library-level structured errors for envtree.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum EnvtreeError {
	#[error("Env file not found: {path}")]
	EnvFileNotFound { path: PathBuf },

	#[error("Env file is not readable: {path}")]
	EnvFileUnreadable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Env file is not valid UTF-8: {path}")]
	EnvFileNotUtf8 {
		path: PathBuf,
		#[source]
		source: std::string::FromUtf8Error,
	},

	#[error("Invalid env filename: {name} (expected .env or .env.<name>)")]
	InvalidFilename { name: String },

	#[error("Value for {key} contains a path traversal segment")]
	PathTraversal { key: String },

	#[error("Directory is not writable: {path}")]
	DirectoryNotWritable { path: PathBuf },

	#[error("Failed to write env file: {path}")]
	WriteFailed {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid assignment (expected KEY=VALUE): {input}")]
	InvalidAssignment { input: String },
}

/// Result type alias using EnvtreeError.
pub type Result<T> = std::result::Result<T, EnvtreeError>;
