use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};

use bast::ConfigStore;
use bast::cli::{Cli, Commands};
use bast::commands::{self, InfoSections};
use bast::logging;
use bast::settings::{APP_NAME, BastConfig};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut store = ConfigStore::<BastConfig>::builder()
        .app_name(APP_NAME)
        .cli_override("features.verbose", cli.verbose.then_some(true))
        .build()?;
    let loaded = store.init(cli.config.as_deref());

    let config = store.snapshot().clone();
    logging::init_logging(
        config.logging.level,
        config.logging.format,
        config.features.verbose,
    );
    match loaded {
        Ok(()) => match store.source_path() {
            Some(path) => debug!(path = %path.display(), "Using config file"),
            None => debug!("No config file, using defaults"),
        },
        Err(e) => warn!(error = %e, "Failed to load configuration, continuing with defaults"),
    }
    store.report_unknown_keys();

    match cli.command {
        None => println!("{}", commands::welcome(&config)),
        Some(Commands::Greet { name, greeting }) => {
            println!(
                "{}",
                commands::greeting(name.as_deref(), greeting.as_deref())
            );
        }
        Some(Commands::Version) => println!("{}", commands::version_text(&config)),
        Some(Commands::Info { os, build, env }) => {
            let sections = InfoSections::from_flags(os, build, env);
            println!(
                "{}",
                commands::info_text(sections, |var| std::env::var(var).ok())
            );
        }
        Some(Commands::Config(args)) => {
            let result = store.handle(&args.into_action())?;
            println!("{result}");
        }
    }

    Ok(())
}
