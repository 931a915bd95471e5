//! Argument definitions and dispatch

use crate::commands;
use crate::config::Config;
use crate::logging;
use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// The `bt` command tree
#[must_use]
pub fn build_cli() -> Command {
    Command::new("bt")
        .version(crate::VERSION)
        .about("Build task utilities: platform attribute extraction and artifact filtering")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to bt.toml (default: ./bt.toml if present)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level"),
        )
        .subcommand(
            Command::new("extract-attrs")
                .about("Write the integer attribute IDs of a platform archive as R.txt lines")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Platform archive (android.jar)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Report file to (over)write"),
                ),
        )
        .subcommand(
            Command::new("write-transitive-deps")
                .about("Write the identity of every artifact in a manifest, one per line")
                .arg(
                    Arg::new("manifest")
                        .long("manifest")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Artifact manifest (TOML)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("List file to (over)write"),
                ),
        )
        .subcommand(
            Command::new("filter")
                .about("Print the files of manifest artifacts not named in any exclusion list")
                .arg(
                    Arg::new("manifest")
                        .long("manifest")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Artifact manifest (TOML)"),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(PathBuf))
                        .help("Exclusion list file; may be repeated"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .with_context(|| format!("missing --{name}"))
}

/// Configure logging and run the selected subcommand
///
/// Returns the text destined for stdout.
///
/// # Errors
/// Returns error if configuration cannot be loaded or the subcommand fails
pub fn run(matches: &ArgMatches) -> Result<String> {
    let config = Config::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .context("failed to load configuration")?;
    logging::init(&config.log, matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("extract-attrs", args)) => {
            let report =
                commands::extract_attrs(&config, path_arg(args, "input")?, path_arg(args, "output")?)?;
            if !report.entry_found {
                tracing::warn!(entry = %config.attr.entry, "archive has no attribute class");
            }
            Ok(String::new())
        }
        Some(("write-transitive-deps", args)) => {
            commands::write_transitive_deps(path_arg(args, "manifest")?, path_arg(args, "output")?)?;
            Ok(String::new())
        }
        Some(("filter", args)) => {
            let exclude: Vec<PathBuf> = args
                .get_many::<PathBuf>("exclude")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            commands::filter(path_arg(args, "manifest")?, &exclude, args.get_flag("json"))
        }
        Some((other, _)) => anyhow::bail!("unknown subcommand {other}"),
        None => anyhow::bail!("no subcommand given"),
    }
}
