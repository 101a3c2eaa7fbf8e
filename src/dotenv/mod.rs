//! Reading and writing `.env` files.
//!
//! This module handles:
//! - Parsing `KEY=VALUE` lines with comments, quoting and `\n`/`\r` escapes
//! - Generating env files from a field template with filename validation

pub mod parser;
pub mod writer;

pub use parser::{
	EnvFile, EnvLine, EnvVariables, ParsedEnv, SkippedLine, env_lines, parse_env_str, parse_line,
};
pub use writer::{
	EnvTemplate, escape_value, parse_assignment, validate_filename, write_env_file,
};
