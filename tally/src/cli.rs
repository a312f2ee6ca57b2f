use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(version, about = "Fetch and graph the total signatures")]
#[command(group(ArgGroup::new("action").args(["fetch", "graph"])))]
pub struct Cli {
    /// Fetch signature total and add to Redis
    #[arg(short, long)]
    pub fetch: bool,

    /// Generate graph from signature data in Redis
    #[arg(short, long, num_args = 2, value_names = ["SAMPLES", "OUTPUT_FILE"])]
    pub graph: Option<Vec<String>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Number of samples must be an integer, got {0:?}")]
    SampleCount(String),
    #[error("Number of samples must be at least 1")]
    NoSamples,
    #[error("--graph takes SAMPLES and OUTPUT_FILE")]
    GraphArgs,
}

/// A validated `--graph SAMPLES OUTPUT_FILE` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    pub samples: usize,
    pub output: PathBuf,
}

impl GraphRequest {
    pub fn parse(values: &[String]) -> Result<Self, UsageError> {
        let [samples, output] = values else {
            return Err(UsageError::GraphArgs);
        };
        let samples = samples
            .trim()
            .parse::<usize>()
            .map_err(|_| UsageError::SampleCount(samples.clone()))?;
        if samples == 0 {
            return Err(UsageError::NoSamples);
        }

        Ok(Self {
            samples,
            output: PathBuf::from(output),
        })
    }
}
