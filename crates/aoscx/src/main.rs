mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use aoscx_api::Session;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "aoscx", &mut std::io::stdout());
            Ok(())
        }

        // Probing needs no login.
        Command::Version => commands::version::handle(&cli.global).await,

        cmd => {
            let switch = config::load(&cli.global)?;
            let session_config = switch.to_session_config()?;
            let host = session_config.host.clone();

            let session = Session::connect(session_config)
                .await
                .map_err(|e| CliError::from_connect(e, &host))?;

            tracing::debug!(command = ?cmd, version = session.version(), "dispatching command");
            let result = commands::dispatch(cmd, &session, &cli.global).await;

            if let Err(e) = session.logout().await {
                tracing::warn!(error = %e, "logout failed");
            }
            result
        }
    }
}
