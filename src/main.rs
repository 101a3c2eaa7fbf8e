use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use envtree::config::{ConfigStore, ConfigValue, DEFAULT_ENV_FILE, LoadOptions, render_toml};
use envtree::dotenv::{EnvFile, EnvTemplate, escape_value, parse_assignment, write_env_file};

#[derive(Parser)]
#[command(name = "envtree")]
#[command(
	author,
	version,
	about = "Load .env files into a layered, dot-addressable configuration tree"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Directory containing the env file (defaults to the current directory)
	#[arg(long, global = true, value_name = "DIR")]
	root: Option<PathBuf>,

	/// Env file name under the root directory
	#[arg(long, global = true, value_name = "NAME", default_value = DEFAULT_ENV_FILE)]
	env_file: PathBuf,

	/// Enable debug logging
	#[arg(long, global = true)]
	debug: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the config value at a dotted key, e.g. database.connections.mysql.host
	Get {
		key: String,

		/// Value to print when the key does not exist
		#[arg(long)]
		default: Option<String>,
	},
	/// Print the whole configuration tree
	Show {
		/// Print dotted.key=value lines instead of TOML
		#[arg(long)]
		flat: bool,
	},
	/// Resolve a variable through overrides, the OS environment and the env file
	Env {
		name: String,

		/// Value to print when the variable is not set anywhere
		#[arg(long)]
		default: Option<String>,
	},
	/// List variables parsed from the env file, in file order
	Vars,
	/// Write a new env file from the standard template
	Generate {
		/// Name of the file to write (.env or .env.<name>)
		#[arg(long, default_value = DEFAULT_ENV_FILE)]
		file: String,

		/// Directory to write into (defaults to --root or the current directory)
		#[arg(long, value_name = "DIR")]
		dir: Option<PathBuf>,

		/// Override a template field
		#[arg(long = "set", value_name = "KEY=VALUE")]
		assignments: Vec<String>,

		/// Also print the written content
		#[arg(long)]
		print: bool,
	},
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	setup_logging(cli.debug);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

/// Set up logging/tracing on stderr.
fn setup_logging(debug: bool) {
	let filter = if debug {
		EnvFilter::try_new("envtree=debug,warn").unwrap_or_else(|_| EnvFilter::new("warn"))
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_target(false)
				.with_writer(std::io::stderr),
		)
		.init();

	if debug {
		tracing::debug!("Debug logging enabled");
	}
}

fn run(cli: Cli) -> Result<ExitCode> {
	let root = match cli.root {
		Some(root) => root,
		None => std::env::current_dir().context("Failed to get current directory")?,
	};

	match cli.command {
		Commands::Get { key, default } => {
			let store = load_store(&root, &cli.env_file)?;
			handle_get(&store, &key, default.as_deref())
		}
		Commands::Show { flat } => {
			let store = load_store(&root, &cli.env_file)?;
			handle_show(&store, flat)
		}
		Commands::Env { name, default } => {
			let store = load_store(&root, &cli.env_file)?;
			handle_env(&store, &name, default.as_deref())
		}
		Commands::Vars => handle_vars(&root.join(&cli.env_file)),
		Commands::Generate {
			file,
			dir,
			assignments,
			print,
		} => handle_generate(dir.as_deref().unwrap_or(root.as_path()), &file, &assignments, print),
	}
}

fn load_store(root: &Path, env_file: &Path) -> Result<ConfigStore> {
	let options = LoadOptions::default()
		.with_root(root)
		.with_env_file(env_file);
	let env_path = options.env_path();

	ConfigStore::load(options)
		.with_context(|| format!("Failed to load configuration from {}", env_path.display()))
}

fn handle_get(store: &ConfigStore, key: &str, default: Option<&str>) -> Result<ExitCode> {
	match store.lookup(key) {
		Ok(value) => {
			print_value(value)?;
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => match default {
			Some(default) => {
				println!("{}", default);
				Ok(ExitCode::SUCCESS)
			}
			None => {
				eprintln!("{}", e);
				Ok(ExitCode::FAILURE)
			}
		},
	}
}

fn print_value(value: &ConfigValue) -> Result<()> {
	match value.to_scalar_string() {
		Some(scalar) => println!("{}", scalar),
		None => print!("{}", render_toml(value).context("Failed to render table")?),
	}
	Ok(())
}

fn handle_show(store: &ConfigStore, flat: bool) -> Result<ExitCode> {
	if let Some(path) = store.env_path() {
		tracing::debug!("Configuration loaded from {}", path.display());
	}

	if flat {
		for (key, value) in store.all().flatten() {
			println!("{}={}", key, value.to_scalar_string().unwrap_or_default());
		}
	} else {
		let rendered = store
			.all()
			.to_toml_string()
			.context("Failed to render configuration")?;
		print!("{}", rendered);
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_env(store: &ConfigStore, name: &str, default: Option<&str>) -> Result<ExitCode> {
	match (store.resolver().resolve(name), default) {
		(Some(value), _) => println!("{}", value),
		(None, Some(default)) => println!("{}", default),
		(None, None) => {
			eprintln!("{} is not set", name);
			return Ok(ExitCode::FAILURE);
		}
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_vars(env_path: &Path) -> Result<ExitCode> {
	let parsed = EnvFile::new(env_path)
		.and_then(|file| file.load())
		.context("Failed to read env file")?;

	if parsed.variables.is_empty() {
		println!("No variables found in {}", env_path.display());
	}
	for (name, value) in parsed.variables.iter() {
		println!("{}=\"{}\"", name, escape_value(value));
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_generate(
	dir: &Path,
	filename: &str,
	assignments: &[String],
	print: bool,
) -> Result<ExitCode> {
	let mut template = EnvTemplate::standard();
	for assignment in assignments {
		let (key, value) = parse_assignment(assignment)?;
		template.set(key, value);
	}

	let path = write_env_file(dir, filename, &template)
		.with_context(|| format!("Failed to generate {}", filename))?;

	println!("Created {}", path.display());
	if print {
		println!();
		println!("{}", template.render());
	}

	Ok(ExitCode::SUCCESS)
}
