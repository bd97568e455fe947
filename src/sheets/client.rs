//! HTTP client for the Google Sheets v4 API.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Response, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::{ServiceAccount, SheetsApi, SheetsError};
use crate::constants::{GOOGLE_TOKEN_URL, SHEETS_API_BASE, TOKEN_REFRESH_MARGIN_SECS};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
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

struct CachedToken {
    value: String,
    expires_at: i64,
}

/// Sheets client authenticated as a service account
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    account: ServiceAccount,
    spreadsheet_id: String,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleSheetsClient {
    pub fn new(account: ServiceAccount, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            account,
            spreadsheet_id: spreadsheet_id.into(),
            token: Mutex::new(None),
        }
    }

    /// Bearer token for the next call, refreshed shortly before it expires
    async fn access_token(&self) -> Result<String, SheetsError> {
        let mut cached = self.token.lock().await;
        let now = Utc::now().timestamp();

        if let Some(token) = cached.as_ref() {
            if now < token.expires_at - TOKEN_REFRESH_MARGIN_SECS {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!(
            "Requesting access token for {}",
            self.account.client_email()
        );
        let assertion = self.account.assertion(now)?;
        let resp = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let token: TokenResponse = check_status(resp).await?.json().await?;

        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        });
        Ok(value)
    }

    fn endpoint(&self, suffix: &str, tail: &[&str]) -> Result<Url, SheetsError> {
        build_url(SHEETS_API_BASE, &self.spreadsheet_id, suffix, tail)
    }
}

/// `{base}/{spreadsheet_id}{suffix}/{tail...}`, each segment percent-encoded
fn build_url(
    base: &str,
    spreadsheet_id: &str,
    suffix: &str,
    tail: &[&str],
) -> Result<Url, SheetsError> {
    let mut url = Url::parse(base).map_err(|e| SheetsError::Url(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| SheetsError::Url(format!("{} cannot hold a path", base)))?
        .push(&format!("{}{}", spreadsheet_id, suffix))
        .extend(tail);
    Ok(url)
}

/// Quote a sheet title for use in A1 notation (`'It''s here'`)
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

async fn check_status(resp: Response) -> Result<Response, SheetsError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SheetsError::Api {
        status: status.as_u16(),
        body,
    })
}

/// batchUpdate rejects an addSheet whose title is taken with a 400 naming the sheet
fn is_duplicate_sheet(status: u16, body: &str) -> bool {
    status == 400 && body.contains("already exists")
}

#[async_trait]
impl SheetsApi for GoogleSheetsClient {
    async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError> {
        let token = self.access_token().await?;
        let url = self.endpoint("", &[])?;

        let resp = self
            .client
            .get(url)
            .query(&[("fields", "sheets.properties.title")])
            .bearer_auth(token)
            .send()
            .await?;
        let meta: SpreadsheetMeta = check_status(resp).await?.json().await?;

        Ok(meta
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }

    async fn add_sheet(&self, title: &str) -> Result<(), SheetsError> {
        let token = self.access_token().await?;
        let url = self.endpoint(":batchUpdate", &[])?;
        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }]
        });

        let resp = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        match check_status(resp).await {
            Err(SheetsError::Api { status, body }) if is_duplicate_sheet(status, &body) => {
                Err(SheetsError::SheetExists(title.to_string()))
            }
            other => other.map(|_| ()),
        }
    }

    async fn write_header(&self, title: &str, row: &[String]) -> Result<(), SheetsError> {
        let token = self.access_token().await?;
        let range = format!("{}!A1", quote_title(title));
        let url = self.endpoint("", &["values", range.as_str()])?;

        let resp = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn append_row(&self, title: &str, row: &[String]) -> Result<(), SheetsError> {
        let token = self.access_token().await?;
        let range = format!("{}!A1:append", quote_title(title));
        let url = self.endpoint("", &["values", range.as_str()])?;

        let resp = self
            .client
            .post(url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn read_rows(&self, title: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let token = self.access_token().await?;
        let range = quote_title(title);
        let url = self.endpoint("", &["values", range.as_str()])?;

        let resp = self.client.get(url).bearer_auth(token).send().await?;
        let values: ValueRange = check_status(resp).await?.json().await?;

        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}
