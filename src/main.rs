//! Diabetes classifier - Main Entry Point
//!
//! Trains the classifier or serves it over HTTP.

use clap::{CommandFactory, Parser};
use diabetes_classifier::cli::{Cli, Commands, cmd_train, cmd_serve, cmd_predict};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diabetes_classifier=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train { model, scaler, no_scale, test_size, seed, threshold }) => {
            cmd_train(model, scaler, no_scale, test_size, seed, threshold)?;
        }
        Some(Commands::Serve { host, port, model, scaler, labels }) => {
            cmd_serve(host, port, model, scaler, labels).await?;
        }
        Some(Commands::Predict { input, model, scaler, labels }) => {
            cmd_predict(&input, model, scaler, labels)?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
