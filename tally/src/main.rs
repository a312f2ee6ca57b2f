use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::{debug, warn};
use tally_series::Service;

mod cli;
mod config;
mod ops;
mod sheets;

use cli::{Cli, GraphRequest};
use config::Config;
use ops::GraphOutcome;
use sheets::SheetsClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Validate arguments before touching configuration or the store.
    let graph = cli.graph.as_deref().map(GraphRequest::parse).transpose()?;

    load_dotenv();
    let config = Config::from_env();
    debug!("series {} at {}", config.series_key, config.redis_url);

    let source = if cli.fetch {
        Some(SheetsClient::connect(&config.sampler()?).await?)
    } else {
        None
    };
    if source.is_none() && graph.is_none() {
        return Ok(());
    }

    let store = Service::connect(&config.redis_url).await?;

    if let Some(source) = source {
        let sample = ops::fetch(&source, &store, &config.series_key).await?;
        println!("Stored {} into {}", sample.value, config.series_key);
    }

    if let Some(req) = graph {
        match ops::graph(&store, &config.series_key, req.samples, &req.output).await? {
            GraphOutcome::Empty => eprintln!("No data for key {}", config.series_key),
            GraphOutcome::Saved { .. } => println!("Saved plot to {}", req.output.display()),
        }
    }

    Ok(())
}

/// Pick up a `.env` in the working directory if there is one.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("ignoring unreadable .env: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli::UsageError;

    #[tokio::test]
    async fn bad_sample_count_fails_before_any_io() {
        let cli = Cli {
            fetch: false,
            graph: Some(vec!["ten".into(), "out.png".into()]),
        };

        let err = run(cli).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<UsageError>(),
            Some(&UsageError::SampleCount("ten".into()))
        );
    }
}
