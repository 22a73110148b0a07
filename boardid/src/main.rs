mod cli;
mod config;

use anyhow::{anyhow, Result};
use boardid_core::{Resolver, SystemRoot};
use clap::FromArgMatches;
use cli::Cli;
use std::env;
use std::ffi::OsString;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // A first pass over the command line finds the root the config file lives under.
    let cli_args: Vec<OsString> = env::args_os().collect();
    let root = root_of(&Cli::from_arg_matches(
        &cli::command().get_matches_from(cli_args.clone()),
    )?);

    let config_args = config::read_args(&root.resolve(config::CONFIG_PATH))?;
    let args = config::merge(&cli_args, config_args)?;

    let matches = cli::command().get_matches_from(args);
    let options = Cli::from_arg_matches(&matches)?;
    let sources = cli::sources(&matches);
    log::debug!(
        "trying {}",
        sources.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", ")
    );

    let resolver =
        Resolver::new(sources, root_of(&options)).map_err(|e| anyhow!(e.user_message()))?;
    let resolved = resolver.resolve().map_err(|e| anyhow!(e.user_message()))?;

    if options.json {
        println!("{}", serde_json::to_string(&resolved)?);
    } else {
        println!("{}", resolved.id);
    }

    Ok(())
}

fn root_of(cli: &Cli) -> SystemRoot {
    cli.root.as_deref().map(SystemRoot::new).unwrap_or_default()
}
