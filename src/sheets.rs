use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::SheetsConfig;
use crate::record::{labels, DailyRecord};

#[derive(Serialize)]
struct AppendBody {
    header: Vec<&'static str>,
    row: Vec<String>,
}

#[derive(Deserialize)]
struct RowsBody {
    header: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

/// Client for the shared-sheet relay. The relay exposes two endpoints:
/// POST `{base}/append` taking `{"header": [...], "row": [...]}` and
/// GET `{base}/rows` returning `{"header": [...], "rows": [[...], ...]}`.
pub struct SheetsClient {
    endpoint: String,
    bearer_token: Option<String>,
    agent: ureq::Agent,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig) -> SheetsClient {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(config.connect_timeout_ms))
            .timeout_read(Duration::from_millis(config.request_timeout_ms))
            .timeout_write(Duration::from_millis(config.request_timeout_ms))
            .build();
        SheetsClient {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
            agent,
        }
    }

    pub fn append(&self, record: &DailyRecord) -> anyhow::Result<()> {
        let body = AppendBody {
            header: labels().collect(),
            row: record.to_row(),
        };
        let payload = serde_json::to_string(&body).context("failed to encode append payload")?;
        let url = format!("{}/append", self.endpoint);
        let request = self
            .request(self.agent.post(&url))
            .set("content-type", "application/json");
        check(request.send_string(&payload))?;
        Ok(())
    }

    pub fn read_all(&self) -> anyhow::Result<Vec<DailyRecord>> {
        let url = format!("{}/rows", self.endpoint);
        let response = check(self.request(self.agent.get(&url)).call())?;
        let body = response
            .into_string()
            .context("failed to read sheet response body")?;
        parse_rows(&body)
    }

    fn request(&self, request: ureq::Request) -> ureq::Request {
        match &self.bearer_token {
            Some(token) => request.set("authorization", &format!("Bearer {token}")),
            None => request,
        }
    }
}

fn check(result: Result<ureq::Response, ureq::Error>) -> anyhow::Result<ureq::Response> {
    match result {
        Ok(response) if (200..=299).contains(&response.status()) => Ok(response),
        Ok(response) => anyhow::bail!("sheet service returned status {}", response.status()),
        Err(ureq::Error::Status(code, _)) => {
            anyhow::bail!("sheet service returned status {code}")
        }
        Err(ureq::Error::Transport(err)) => {
            Err(anyhow::anyhow!(err)).context("sheet service unreachable")
        }
    }
}

/// Decodes the `/rows` payload. Rows come back keyed by the relay's header
/// order, which may predate the current schema, so each row is normalized
/// into canonical column order.
fn parse_rows(json: &str) -> anyhow::Result<Vec<DailyRecord>> {
    let body: RowsBody = serde_json::from_str(json).context("malformed sheet response")?;
    Ok(body
        .rows
        .iter()
        .map(|row| DailyRecord::from_row(&body.header, row))
        .collect())
}
