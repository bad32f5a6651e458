use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gitconf_cli::config::{ConfigModel, GitConfigManager};
use gitconf_cli::error::GitConfigError;

#[derive(Parser)]
#[command(name = "gitconf")]
#[command(
	author,
	version,
	about = "Read and edit git-format configuration files"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	/// Config key to read or write, e.g. user.name or remote.origin.url
	path: Option<String>,

	/// Value to store at the key (a read is performed when omitted)
	value: Option<String>,

	/// Operate on an explicit config file
	#[arg(long, value_name = "FILE")]
	file: Option<PathBuf>,

	/// Operate on ~/.gitconfig
	#[arg(long, conflicts_with = "file")]
	global: bool,

	/// Working tree whose .git/config to operate on (default: current directory)
	#[arg(long, value_name = "DIR", conflicts_with_all = ["file", "global"])]
	dir: Option<PathBuf>,

	/// Print every value for the key, not just the last one
	#[arg(long)]
	all: bool,

	/// Add a new entry instead of replacing the last matching one
	#[arg(long, requires = "value")]
	add: bool,

	/// Remove the last entry matching the key
	#[arg(long, conflicts_with_all = ["value", "add", "all"])]
	unset: bool,

	/// Remove every entry matching the key
	#[arg(long, conflicts_with_all = ["value", "add", "all", "unset"])]
	unset_all: bool,

	/// List every entry as path=value lines
	#[arg(
		long,
		short = 'l',
		conflicts_with_all = ["path", "value", "all", "add", "unset", "unset_all"]
	)]
	list: bool,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	let file = config_file_path(&cli)?;
	let model = GitConfigManager::load(|| std::fs::read(&file))
		.with_context(|| format!("Failed to load {}", file.display()))?;

	if cli.list {
		return handle_list(&model);
	}

	let Some(ref path) = cli.path else {
		anyhow::bail!("a config key is required unless --list is given");
	};

	if cli.unset || cli.unset_all {
		return handle_unset(model, &file, path, cli.unset_all);
	}
	if let Some(ref value) = cli.value {
		return handle_write(model, &file, path, value, cli.add);
	}
	handle_read(&model, path, cli.all)
}

/// Pick the config file to operate on. This is caller-side logic: the
/// engine itself never chooses paths.
fn config_file_path(cli: &Cli) -> Result<PathBuf> {
	if let Some(ref file) = cli.file {
		return Ok(file.clone());
	}
	if cli.global {
		let home = dirs::home_dir().ok_or(GitConfigError::HomeDirectoryNotFound)?;
		return Ok(home.join(".gitconfig"));
	}
	let dir = cli.dir.clone().unwrap_or_else(|| PathBuf::from("."));
	Ok(dir.join(".git").join("config"))
}

fn handle_read(model: &ConfigModel, path: &str, all: bool) -> Result<ExitCode> {
	if all {
		let values = model.get_all(path)?;
		if values.is_empty() {
			return Ok(ExitCode::from(1));
		}
		for value in values {
			println!("{}", value);
		}
		return Ok(ExitCode::SUCCESS);
	}

	match model.get(path)? {
		Some(value) => {
			println!("{}", value);
			Ok(ExitCode::SUCCESS)
		}
		// Matches git: no output, exit code 1.
		None => Ok(ExitCode::from(1)),
	}
}

fn handle_write(
	mut model: ConfigModel,
	file: &Path,
	path: &str,
	value: &str,
	add: bool,
) -> Result<ExitCode> {
	if add {
		model.append(path, value)?;
	} else {
		model.set(path, value)?;
	}
	save(&model, file)?;
	Ok(ExitCode::SUCCESS)
}

fn handle_unset(
	mut model: ConfigModel,
	file: &Path,
	path: &str,
	unset_all: bool,
) -> Result<ExitCode> {
	let removed = if unset_all {
		model.unset_all(path)? > 0
	} else {
		model.unset(path)?
	};
	if !removed {
		return Ok(ExitCode::from(1));
	}
	save(&model, file)?;
	Ok(ExitCode::SUCCESS)
}

fn handle_list(model: &ConfigModel) -> Result<ExitCode> {
	for (path, value) in model.entries() {
		println!("{}={}", path, value);
	}
	Ok(ExitCode::SUCCESS)
}

fn save(model: &ConfigModel, file: &Path) -> Result<()> {
	GitConfigManager::save(model, |bytes| std::fs::write(file, bytes))
		.with_context(|| format!("Failed to save {}", file.display()))
}
