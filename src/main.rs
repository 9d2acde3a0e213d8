use clap::Parser;

use jobwatch::adapter::inbound::cli::{check, run, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match cli.command() {
        Commands::Run => run::execute(&cli.config).await,
        Commands::Check { json } => check::execute(&cli.config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
