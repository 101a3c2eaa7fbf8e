//! Envtree - load `.env` files into a layered, dot-addressable configuration tree.
//!
//! This library provides:
//! - `.env` parsing with comments, quoting and `\n`/`\r` escapes
//! - Environment resolution: override table, OS environment, env file, default
//! - A configuration tree with dotted-path `get`/`set` and default sections
//! - Env file generation with filename validation and value escaping
//!
//! # Example
//!
//! ```no_run
//! use envtree::config::{ConfigStore, LoadOptions};
//!
//! let mut store = ConfigStore::load(LoadOptions::default()).unwrap();
//!
//! let host = store.get_or("database.connections.mysql.host", "localhost");
//! println!("Database host: {:?}", host);
//!
//! store.set("custom.key", "custom value");
//! assert_eq!(store.get_str("custom.key"), Some("custom value"));
//! ```

pub mod config;
pub mod dotenv;
pub mod error;

pub use error::{EnvtreeError, Result};
