//! Readable rendering of task results.
//!
//! Reads JSON results (one document, an array, or JSON lines) and prints each
//! one as filtered, YAML-shaped text.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;

use readable::core::types::FilterOptions;
use readable::exit_codes;
use readable::io::config::{RenderConfig, config_toml, load_config, write_config};
use readable::io::input::{parse_documents, parse_events, read_input};
use readable::logging;
use readable::render::{render_diff, render_event};

#[derive(Parser)]
#[command(
    name = "readable",
    version,
    about = "Render task results as readable YAML-style text"
)]
struct Cli {
    /// TOML config with indentation and filter rules.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter and render results (stdin when PATH is omitted or `-`).
    ///
    /// A record with exactly the keys of `{"host": <string>, "result": ...}`
    /// is read as a host envelope: its `result` is rendered after a status
    /// headline for that host. Any other record is rendered as a bare result.
    Render {
        path: Option<PathBuf>,
        /// Raise verbosity; `-vvv` keeps `invocation` and `diff`.
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
        /// Keep `invocation` regardless of verbosity.
        #[arg(long)]
        keep_invocation: bool,
    },
    /// Render diff values inline, without literal blocks.
    Diff { path: Option<PathBuf> },
    /// Print the default config, or write it with `--write`.
    Config {
        #[arg(long)]
        write: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            path,
            verbose,
            keep_invocation,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            let options = FilterOptions {
                verbosity: verbose,
                keep_invocation,
            };
            cmd_render(path.as_deref(), &options, &config)
        }
        Command::Diff { path } => {
            let config = resolve_config(cli.config.as_deref())?;
            cmd_diff(path.as_deref(), &config)
        }
        Command::Config { write, force } => cmd_config(write.as_deref(), force),
    }
}

fn resolve_config(path: Option<&Path>) -> Result<RenderConfig> {
    match path {
        Some(path) if !path.exists() => bail!("config {} not found", path.display()),
        Some(path) => load_config(path).with_context(|| "load config"),
        None => Ok(RenderConfig::default()),
    }
}

fn cmd_render(path: Option<&Path>, options: &FilterOptions, config: &RenderConfig) -> Result<()> {
    let raw = read_input(path)?;
    let events = parse_events(&raw)?;
    debug!(records = events.len(), verbosity = options.verbosity, "rendering");
    for (index, event) in events.iter().enumerate() {
        let text = render_event(event, options, config)
            .with_context(|| format!("render record {}", index + 1))?;
        println!("{text}");
    }
    Ok(())
}

fn cmd_diff(path: Option<&Path>, config: &RenderConfig) -> Result<()> {
    let raw = read_input(path)?;
    for diff in parse_documents(&raw)? {
        println!("{}", render_diff(&diff, config));
    }
    Ok(())
}

fn cmd_config(write: Option<&Path>, force: bool) -> Result<()> {
    let config = RenderConfig::default();
    let Some(path) = write else {
        print!("{}", config_toml(&config)?);
        return Ok(());
    };
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_render_defaults() {
        let cli = Cli::parse_from(["readable", "render"]);
        assert!(matches!(
            cli.command,
            Command::Render {
                path: None,
                verbose: 0,
                keep_invocation: false
            }
        ));
    }

    #[test]
    fn parse_render_verbosity_count() {
        let cli = Cli::parse_from(["readable", "render", "-vvv", "--keep-invocation", "r.json"]);
        match cli.command {
            Command::Render {
                path,
                verbose,
                keep_invocation,
            } => {
                assert_eq!(path, Some(PathBuf::from("r.json")));
                assert_eq!(verbose, 3);
                assert!(keep_invocation);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn parse_global_config_after_subcommand() {
        let cli = Cli::parse_from(["readable", "diff", "--config", "c.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(cli.command, Command::Diff { path: None }));
    }

    #[test]
    fn parse_config_write_force() {
        let cli = Cli::parse_from(["readable", "config", "--write", "out.toml", "--force"]);
        assert!(matches!(cli.command, Command::Config { force: true, .. }));
    }
}
