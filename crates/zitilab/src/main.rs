mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = context::release_config(&cli.repo).and_then(|config| match cli.command {
        Commands::Fetch {
            version,
            add_to_path,
            json,
        } => commands::fetch::run(&config, version, add_to_path, json),
        Commands::Quickstart {
            version,
            health_url,
            timeout,
            grace,
            ziti_args,
            command,
        } => commands::quickstart::run(
            &config,
            commands::quickstart::QuickstartArgs {
                version,
                health_url,
                timeout,
                grace,
                ziti_args,
                command,
            },
        ),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
