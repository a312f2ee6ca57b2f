use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_CELL: &str = "A2";
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";
pub const DEFAULT_SERIES_KEY: &str = "total";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing SERVICE_ACCOUNT_FILE/API_KEY or SHEET_ID environment variable")]
    MissingSheetAccess,
    #[error("SHEET must be a zero-based worksheet index, got {0:?}")]
    InvalidWorksheet(String),
}

/// How the spreadsheet is accessed. Both modes are read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    ServiceAccountFile(PathBuf),
    ApiKey(String),
}

/// Process configuration, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub credential: Option<Credential>,
    pub sheet_id: Option<String>,
    /// Raw `SHEET`; only the fetch path interprets it.
    pub worksheet: Option<String>,
    pub cell: String,
    pub redis_url: String,
    pub series_key: String,
}

/// Everything the fetch path needs, all of it present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    pub credential: Credential,
    pub sheet_id: String,
    pub worksheet: usize,
    pub cell: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // API_KEY takes precedence when both are given.
        let credential = var("API_KEY")
            .map(Credential::ApiKey)
            .or_else(|| var("SERVICE_ACCOUNT_FILE").map(|p| Credential::ServiceAccountFile(p.into())));

        Self {
            credential,
            sheet_id: var("SHEET_ID"),
            worksheet: var("SHEET"),
            cell: var("CELL").unwrap_or_else(|| DEFAULT_CELL.to_string()),
            redis_url: var("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            series_key: var("REDIS_TS_KEY").unwrap_or_else(|| DEFAULT_SERIES_KEY.to_string()),
        }
    }

    pub fn sampler(&self) -> Result<SamplerConfig, ConfigError> {
        let (Some(credential), Some(sheet_id)) = (&self.credential, &self.sheet_id) else {
            return Err(ConfigError::MissingSheetAccess);
        };
        let worksheet = match &self.worksheet {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidWorksheet(raw.clone()))?,
            None => 0,
        };

        Ok(SamplerConfig {
            credential: credential.clone(),
            sheet_id: sheet_id.clone(),
            worksheet,
            cell: self.cell.clone(),
        })
    }
}
