use crate::config::env::EnvResolver;
use crate::config::value::{ConfigTree, ConfigValue};
use std::path::Path;

/// Build the default configuration sections.
///
/// Every field is resolved through `env` with a hardcoded fallback.
/// Paths for file-backed stores are placed under `root`.
pub fn build_default_tree(env: &EnvResolver, root: &Path) -> ConfigTree {
	let mut tree = ConfigTree::new();
	let path_under = |rel: &str| root.join(rel).to_string_lossy().to_string();

	// Application
	tree.set("app.name", env.env("APP_NAME", "My Application"));
	tree.set("app.env", env.env("APP_ENV", "production"));
	tree.set("app.debug", env.env("APP_DEBUG", "false") == "true");
	tree.set("app.url", env.env("APP_URL", "http://localhost"));
	tree.set("app.timezone", env.env("APP_TIMEZONE", "UTC"));

	// Database
	tree.set("database.default", env.env("DB_CONNECTION", "mysql"));
	let mysql = "database.connections.mysql";
	tree.set(&format!("{mysql}.driver"), "mysql");
	tree.set(&format!("{mysql}.host"), env.env("DB_HOST", "localhost"));
	tree.set(&format!("{mysql}.port"), env.env("DB_PORT", "3306"));
	tree.set(&format!("{mysql}.database"), env.env("DB_DATABASE", "test"));
	tree.set(&format!("{mysql}.username"), env.env("DB_USERNAME", "root"));
	tree.set(&format!("{mysql}.password"), env.env("DB_PASSWORD", ""));
	tree.set(&format!("{mysql}.charset"), env.env("DB_CHARSET", "utf8mb4"));
	tree.set(
		&format!("{mysql}.collation"),
		env.env("DB_COLLATION", "utf8mb4_unicode_ci"),
	);
	tree.set(&format!("{mysql}.prefix"), env.env("DB_PREFIX", ""));

	tree.set("database.connections.sqlite.driver", "sqlite");
	tree.set(
		"database.connections.sqlite.database",
		env.env("DB_DATABASE", &path_under("database.sqlite")),
	);

	// Cache
	tree.set("cache.default", env.env("CACHE_DRIVER", "file"));
	tree.set("cache.stores.file.driver", "file");
	tree.set("cache.stores.file.path", path_under("cache"));
	tree.set("cache.stores.redis.driver", "redis");
	tree.set("cache.stores.redis.host", env.env("REDIS_HOST", "127.0.0.1"));
	tree.set("cache.stores.redis.port", env.env_value("REDIS_PORT", 6379));
	tree.set(
		"cache.stores.redis.password",
		env.env_value("REDIS_PASSWORD", ConfigValue::Null),
	);

	// Logging
	tree.set("logging.default", env.env("LOG_CHANNEL", "single"));
	tree.set("logging.channels.single.driver", "single");
	tree.set("logging.channels.single.path", path_under("logs/app.log"));
	tree.set("logging.channels.single.level", env.env("LOG_LEVEL", "debug"));

	tree
}
