use crate::cli::{Codegen, Error};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clientgen=info,compiler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::parse();
    match cli::run(&cli, &Codegen).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error @ (Error::Usage | Error::UnknownLanguage(_))) => {
            println!("{error}");
            ExitCode::FAILURE
        }
        Err(error) => {
            tracing::debug!(?error, "generation failed");
            eprintln!("Generation failed: {error}");
            ExitCode::FAILURE
        }
    }
}
