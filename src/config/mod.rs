//! Layered configuration for envtree.
//!
//! This module handles:
//! - The `ConfigValue` tree with dotted-path lookup and mutation
//! - Environment resolution (override table, OS environment, env file)
//! - Default application, database, cache and logging sections
//! - The explicit `ConfigStore` and an optional process-wide accessor

pub mod defaults;
pub mod env;
pub mod global;
pub mod store;
pub mod value;

pub use defaults::build_default_tree;
pub use env::{EnvResolver, SystemEnv};
pub use store::{ConfigStore, DEFAULT_ENV_FILE, LoadOptions};
pub use value::{ConfigTree, ConfigValue, LookupError, Table, render_toml};
