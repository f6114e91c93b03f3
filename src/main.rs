use clap::Parser;
use fernlock::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so `--json` stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FERNLOCK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => fernlock::cli::commands::init::execute(&cli),
        Commands::List => fernlock::cli::commands::list::execute(&cli),
        Commands::Set {
            ref name,
            ref value,
        } => fernlock::cli::commands::set::execute(&cli, name, value.as_deref()),
        Commands::Generate {
            ref name,
            length,
            ref format,
            force,
        } => fernlock::cli::commands::generate::execute(
            &cli,
            name,
            length,
            format.as_deref(),
            force,
        ),
        Commands::Exists { ref name } => {
            match fernlock::cli::commands::exists::execute(&cli, name) {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => Err(e),
            }
        }
        Commands::Reveal { ref name } => fernlock::cli::commands::reveal::execute(&cli, name),
        Commands::Delete { ref name, force } => {
            fernlock::cli::commands::delete::execute(&cli, name, force)
        }
        Commands::MarkDeployed {
            ref name,
            ref target,
        } => fernlock::cli::commands::mark_deployed::execute(&cli, name, target),
        Commands::RotateKey => fernlock::cli::commands::rotate::execute(&cli),
    };

    if let Err(e) = result {
        fernlock::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
