use std::env;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

pub const DEFAULT_CSV_FILE: &str = "daily_recap.csv";
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub endpoint: String,
    pub bearer_token: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub csv_path: PathBuf,
    pub sheets: Option<SheetsConfig>,
    /// Lowercase hex SHA-256 of the submit passcode. None disables the gate.
    pub passcode_sha256: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<AppConfig> {
        let csv_path = env::var("RECAP_CSV_FILE")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILE));

        let sheets = env::var("RECAP_SHEETS_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .map(|endpoint| SheetsConfig {
                endpoint,
                bearer_token: env::var("RECAP_SHEETS_TOKEN")
                    .ok()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty()),
                connect_timeout_ms: timeout_from_env(
                    "RECAP_HTTP_CONNECT_TIMEOUT_MS",
                    DEFAULT_CONNECT_TIMEOUT_MS,
                ),
                request_timeout_ms: timeout_from_env(
                    "RECAP_HTTP_REQUEST_TIMEOUT_MS",
                    DEFAULT_REQUEST_TIMEOUT_MS,
                ),
            });

        let passcode_sha256 = match env::var("RECAP_PASSCODE_SHA256") {
            Ok(raw) => {
                let digest = raw.trim().to_ascii_lowercase();
                if digest.is_empty() {
                    None
                } else if digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit()) {
                    Some(digest)
                } else {
                    anyhow::bail!(
                        "RECAP_PASSCODE_SHA256 must be a 64-character hex SHA-256 digest"
                    );
                }
            }
            Err(_) => None,
        };

        Ok(AppConfig {
            csv_path,
            sheets,
            passcode_sha256,
        })
    }

    /// True when the gate is off, or when the entered passcode hashes to the
    /// configured digest.
    pub fn passcode_ok(&self, entered: Option<&str>) -> bool {
        match (&self.passcode_sha256, entered) {
            (None, _) => true,
            (Some(expected), Some(entered)) => sha256_hex(entered) == *expected,
            (Some(_), None) => false,
        }
    }
}

fn timeout_from_env(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|ms| (100..=120_000).contains(ms))
        .unwrap_or(default)
}

pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
