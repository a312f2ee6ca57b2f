use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use reqwest::{RequestBuilder, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::{Credential, SamplerConfig};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Cell {0} is not numeric")]
    NotNumeric(String),
    #[error("worksheet {index} not found in spreadsheet {sheet_id}")]
    WorksheetNotFound { index: usize, sheet_id: String },
    #[error("failed to load service account {}", path.display())]
    ServiceAccount {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("service account token request failed")]
    Token(#[from] yup_oauth2::Error),
    #[error("service account token response carried no access token")]
    EmptyToken,
    #[error("cannot build sheets api url for {0}")]
    Url(String),
    #[error("sheets api request failed")]
    Http(#[from] reqwest::Error),
}

/// Something that yields the current numeric value of the tracked cell.
#[async_trait]
pub trait CellSource {
    async fn read_cell(&self) -> Result<f64, SheetError>;
}

/// A cell as returned with `valueRenderOption=UNFORMATTED_VALUE`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
            Value::String(s) if s.is_empty() => CellValue::Empty,
            Value::String(s) => CellValue::Text(s),
            Value::Bool(b) => CellValue::Bool(b),
            _ => CellValue::Empty,
        }
    }
}

impl CellValue {
    /// The finite number this cell holds, if any. Text only counts when it
    /// parses as a number on its own, so `"1,204"` does not.
    pub fn numeric(&self) -> Option<f64> {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse().ok()?,
            CellValue::Empty | CellValue::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }
}

enum Auth {
    ApiKey(String),
    Bearer(String),
}

#[derive(Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl ValueRange {
    fn first_cell(self) -> CellValue {
        self.values
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .map_or(CellValue::Empty, CellValue::from)
    }
}

/// Read-only Google Sheets v4 client for a single cell.
pub struct SheetsClient {
    http: reqwest::Client,
    auth: Auth,
    base: Url,
    sheet_id: String,
    worksheet: usize,
    cell: String,
}

impl SheetsClient {
    pub async fn connect(cfg: &SamplerConfig) -> Result<Self, SheetError> {
        let auth = match &cfg.credential {
            Credential::ApiKey(key) => Auth::ApiKey(key.clone()),
            Credential::ServiceAccountFile(path) => Auth::Bearer(service_account_token(path).await?),
        };
        let base = Url::parse(SHEETS_API).map_err(|_| SheetError::Url(SHEETS_API.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            auth,
            base,
            sheet_id: cfg.sheet_id.clone(),
            worksheet: cfg.worksheet,
            cell: cfg.cell.clone(),
        })
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let req = self.http.get(url);
        match &self.auth {
            Auth::ApiKey(key) => req.query(&[("key", key)]),
            Auth::Bearer(token) => req.bearer_auth(token),
        }
    }

    /// Title of the worksheet at the configured zero-based position.
    async fn worksheet_title(&self) -> Result<String, SheetError> {
        let url = endpoint(&self.base, &[&self.sheet_id])?;
        let doc: Spreadsheet = self
            .get(url)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        doc.sheets
            .into_iter()
            .nth(self.worksheet)
            .map(|entry| entry.properties.title)
            .ok_or_else(|| SheetError::WorksheetNotFound {
                index: self.worksheet,
                sheet_id: self.sheet_id.clone(),
            })
    }
}

#[async_trait]
impl CellSource for SheetsClient {
    async fn read_cell(&self) -> Result<f64, SheetError> {
        let title = self.worksheet_title().await?;
        let range = a1_range(&title, &self.cell);
        debug!("reading {range} from spreadsheet {}", self.sheet_id);

        let url = endpoint(&self.base, &[&self.sheet_id, "values", &range])?;
        let values: ValueRange = self
            .get(url)
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let cell = values.first_cell();
        debug!("{range} holds {cell:?}");
        cell.numeric().ok_or_else(|| SheetError::NotNumeric(self.cell.clone()))
    }
}

async fn service_account_token(path: &Path) -> Result<String, SheetError> {
    let io_err = |source| SheetError::ServiceAccount {
        path: path.to_path_buf(),
        source,
    };
    let key = yup_oauth2::read_service_account_key(path).await.map_err(io_err)?;
    let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(io_err)?;
    let token = auth.token(&[READONLY_SCOPE]).await?;

    token.token().map(str::to_string).ok_or(SheetError::EmptyToken)
}

/// `'Title'!A2`, quoting the title so spaces and apostrophes survive.
fn a1_range(title: &str, cell: &str) -> String {
    format!("'{}'!{}", title.replace('\'', "''"), cell)
}

/// Append percent-encoded path segments to `base`.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, SheetError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SheetError::Url(base.to_string()))?
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(42), Some(42.0))]
    #[case(json!(3.25), Some(3.25))]
    #[case(json!("17"), Some(17.0))]
    #[case(json!(" 1204 "), Some(1204.0))]
    #[case(json!("1,204"), None)]
    #[case(json!("1e3"), Some(1000.0))]
    #[case(json!("n/a"), None)]
    #[case(json!("NaN"), None)]
    #[case(json!("inf"), None)]
    #[case(json!(""), None)]
    #[case(json!(true), None)]
    #[case(json!(null), None)]
    fn numeric_cells(#[case] raw: Value, #[case] expected: Option<f64>) {
        assert_eq!(CellValue::from(raw).numeric(), expected);
    }

    #[test]
    fn empty_value_range_is_empty_cell() {
        let range: ValueRange = serde_json::from_value(json!({ "range": "Sheet1!A2" })).unwrap();
        assert_eq!(range.first_cell(), CellValue::Empty);
    }

    #[test]
    fn first_cell_of_value_range() {
        let range: ValueRange =
            serde_json::from_value(json!({ "range": "Sheet1!A2", "values": [[42]] })).unwrap();
        assert_eq!(range.first_cell(), CellValue::Number(42.0));
    }

    #[test]
    fn worksheet_titles_in_order() {
        let doc: Spreadsheet = serde_json::from_value(json!({
            "sheets": [
                { "properties": { "title": "Summary" } },
                { "properties": { "title": "Raw data" } }
            ]
        }))
        .unwrap();
        let titles: Vec<_> = doc.sheets.into_iter().map(|s| s.properties.title).collect();
        assert_eq!(titles, ["Summary", "Raw data"]);
    }

    #[test]
    fn a1_range_quotes_title() {
        assert_eq!(a1_range("Sheet1", "A2"), "'Sheet1'!A2");
        assert_eq!(a1_range("Bob's data", "C3"), "'Bob''s data'!C3");
    }

    #[test]
    fn endpoint_encodes_segments() {
        let base = Url::parse(SHEETS_API).unwrap();
        let url = endpoint(&base, &["abc123", "values", "'Raw data'!A2"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/'Raw%20data'!A2"
        );
    }
}
