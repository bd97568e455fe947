use std::env;
use std::str::FromStr;

use crate::sheets::normalize_private_key;

/// Where submissions are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per category under `data_dir`
    File,
    /// Google Sheets spreadsheet
    Sheets,
    /// In-process workbook, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "sheets" => Ok(StorageBackend::Sheets),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "Invalid STORAGE_BACKEND '{}': expected file, sheets or memory",
                other
            )),
        }
    }
}

/// Service account credentials for the spreadsheet backend
#[derive(Clone)]
pub struct SheetsCredentials {
    pub client_email: String,
    /// PEM private key, already normalized
    pub private_key: String,
    pub sheet_id: String,
}

impl std::fmt::Debug for SheetsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsCredentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("sheet_id", &self.sheet_id)
            .finish()
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    pub storage_backend: StorageBackend,
    pub data_dir: String,
    pub sheets: Option<SheetsCredentials>,
    pub admin_secret_key: Option<String>,
    pub log_requests: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (the process environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let server_host = var("SERVER_HOST", "0.0.0.0");
        let server_port = var("SERVER_PORT", "8080")
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let allowed_origins = var("ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = var("ENVIRONMENT", "development");
        let storage_backend = var("STORAGE_BACKEND", "file").parse()?;
        let data_dir = var("DATA_DIR", "./data");

        let sheets = match (
            lookup("GOOGLE_CLIENT_EMAIL"),
            lookup("GOOGLE_PRIVATE_KEY"),
            lookup("GOOGLE_SHEET_ID"),
        ) {
            (Some(client_email), Some(private_key), Some(sheet_id)) => Some(SheetsCredentials {
                client_email: client_email.trim().to_string(),
                private_key: normalize_private_key(&private_key),
                sheet_id: sheet_id.trim().to_string(),
            }),
            _ => None,
        };

        let admin_secret_key = lookup("ADMIN_SECRET_KEY").filter(|k| !k.is_empty());

        let log_requests = match var("LOG_REQUESTS", "true").to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => return Err("Invalid LOG_REQUESTS".to_string()),
        };

        let config = Config {
            server_host,
            server_port,
            allowed_origins,
            environment,
            storage_backend,
            data_dir,
            sheets,
            admin_secret_key,
            log_requests,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field requirements once at startup
    pub fn validate(&self) -> Result<(), String> {
        if self.storage_backend == StorageBackend::Sheets {
            let creds = self.sheets.as_ref().ok_or(
                "GOOGLE_CLIENT_EMAIL, GOOGLE_PRIVATE_KEY and GOOGLE_SHEET_ID must be set for the sheets backend",
            )?;
            if creds.client_email.is_empty() || creds.sheet_id.is_empty() {
                return Err("GOOGLE_CLIENT_EMAIL and GOOGLE_SHEET_ID must not be empty".to_string());
            }
            if !creds.private_key.contains("PRIVATE KEY") {
                return Err("GOOGLE_PRIVATE_KEY does not look like a PEM private key".to_string());
            }
        }

        if self.storage_backend == StorageBackend::File && self.data_dir.trim().is_empty() {
            return Err("DATA_DIR must not be empty".to_string());
        }

        Ok(())
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
