use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Context;

use crate::config::AppConfig;
use crate::record::{labels, DailyRecord};
use crate::sheets::SheetsClient;

/// Append-only local backend: one CSV file, header row written when the file
/// is missing or empty, rows in canonical column order.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> CsvStore {
        CsvStore { path: path.into() }
    }

    pub fn append(&self, record: &DailyRecord) -> anyhow::Result<()> {
        // A pre-existing zero-byte file still needs the header row.
        let write_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let mut writer = csv::Writer::from_writer(file);
        if write_header {
            writer.write_record(labels())?;
        }
        writer.write_record(record.to_row())?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_all(&self) -> anyhow::Result<Vec<DailyRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            records.push(DailyRecord::from_row(&headers, &cells));
        }
        Ok(records)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    RemotePreferred,
    LocalFallback,
    LocalOnly,
}

impl BackendState {
    /// The first failed remote call drops the session into local fallback;
    /// every other state is sticky.
    pub fn after_remote_failure(self) -> BackendState {
        match self {
            BackendState::RemotePreferred => BackendState::LocalFallback,
            other => other,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            BackendState::RemotePreferred => "remote sheet preferred",
            BackendState::LocalFallback => "local CSV (remote failed this session)",
            BackendState::LocalOnly => "local CSV only",
        }
    }
}

/// The store the shell talks to: remote sheet when configured, with local CSV
/// fallback on the first remote failure. The backend state is exposed so the
/// fallback is observable rather than buried in control flow.
pub struct RecapStore {
    state: BackendState,
    local: CsvStore,
    remote: Option<SheetsClient>,
}

impl RecapStore {
    pub fn from_config(config: &AppConfig) -> RecapStore {
        let remote = config.sheets.as_ref().map(SheetsClient::new);
        let state = if remote.is_some() {
            BackendState::RemotePreferred
        } else {
            BackendState::LocalOnly
        };
        RecapStore {
            state,
            local: CsvStore::new(&config.csv_path),
            remote,
        }
    }

    pub fn state(&self) -> BackendState {
        self.state
    }

    /// Appends one record. `Ok(Some(warning))` means the remote failed and the
    /// row went to the local fallback instead.
    pub fn append(&mut self, record: &DailyRecord) -> anyhow::Result<Option<String>> {
        if self.state == BackendState::RemotePreferred {
            if let Some(remote) = &self.remote {
                match remote.append(record) {
                    Ok(()) => return Ok(None),
                    Err(err) => {
                        self.state = self.state.after_remote_failure();
                        self.local.append(record)?;
                        return Ok(Some(format!(
                            "remote append failed ({err:#}); row saved to local CSV"
                        )));
                    }
                }
            }
        }
        self.local.append(record)?;
        Ok(None)
    }

    pub fn read_all(&mut self) -> anyhow::Result<(Vec<DailyRecord>, Option<String>)> {
        if self.state == BackendState::RemotePreferred {
            if let Some(remote) = &self.remote {
                match remote.read_all() {
                    Ok(rows) => return Ok((rows, None)),
                    Err(err) => {
                        self.state = self.state.after_remote_failure();
                        let rows = self.local.read_all()?;
                        return Ok((
                            rows,
                            Some(format!("remote read failed ({err:#}); reading local CSV")),
                        ));
                    }
                }
            }
        }
        Ok((self.local.read_all()?, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetsConfig;
    use crate::record::{FieldKey, FIELD_COUNT};
    use tempfile::TempDir;

    fn record_for_day(date: &str, packages: &str) -> DailyRecord {
        let mut record = DailyRecord::blank();
        record.set(FieldKey::Date, date);
        record.set(FieldKey::TotalPackages, packages);
        record.set(FieldKey::StationFeedback, "quiet day, nothing flagged");
        record
    }

    #[test]
    fn append_then_read_round_trips_in_order() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("daily_recap.csv"));
        let first = record_for_day("2026-02-01", "120");
        let second = record_for_day("2026-02-02", "150");
        let third = record_for_day("2026-02-03", "90");
        store.append(&first).unwrap();
        store.append(&second).unwrap();
        store.append(&third).unwrap();

        let rows = store.read_all().unwrap();
        assert_eq!(rows, vec![first, second, third]);
    }

    #[test]
    fn header_row_is_written_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily_recap.csv");
        let store = CsvStore::new(&path);
        store.append(&record_for_day("2026-02-01", "120")).unwrap();
        store.append(&record_for_day("2026-02-02", "150")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Date,Day,Total Routes"));
        assert_eq!(contents.matches("Date,Day,Total Routes").count(), 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn empty_existing_file_still_gets_the_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily_recap.csv");
        std::fs::write(&path, "").unwrap();

        let store = CsvStore::new(&path);
        let record = record_for_day("2026-02-01", "120");
        store.append(&record).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Date,Day,Total Routes"));
        assert_eq!(store.read_all().unwrap(), vec![record]);
    }

    #[test]
    fn values_with_delimiters_survive_the_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("daily_recap.csv"));
        let mut record = record_for_day("2026-02-01", "120");
        record.set(
            FieldKey::StationFeedback,
            "missorts up, \"dock B\" blocked\nsecond shift short",
        );
        store.append(&record).unwrap();

        let rows = store.read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], record);
    }

    #[test]
    fn read_normalizes_legacy_headers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily_recap.csv");
        // An earlier iteration's file: no Day column, shuffled order, one
        // retired column.
        std::fs::write(
            &path,
            "Total Packages,Date,Retired Column\n200,2026-01-05,old\n",
        )
        .unwrap();

        let rows = CsvStore::new(&path).read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(FieldKey::Date), "2026-01-05");
        assert_eq!(rows[0].get(FieldKey::TotalPackages), "200");
        assert_eq!(rows[0].get(FieldKey::Day), "");
        assert_eq!(rows[0].to_row().len(), FIELD_COUNT);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("absent.csv"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn backend_state_transitions() {
        assert_eq!(
            BackendState::RemotePreferred.after_remote_failure(),
            BackendState::LocalFallback
        );
        assert_eq!(
            BackendState::LocalFallback.after_remote_failure(),
            BackendState::LocalFallback
        );
        assert_eq!(
            BackendState::LocalOnly.after_remote_failure(),
            BackendState::LocalOnly
        );
    }

    #[test]
    fn store_without_remote_is_local_only() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            csv_path: dir.path().join("daily_recap.csv"),
            sheets: None,
            passcode_sha256: None,
        };
        let mut store = RecapStore::from_config(&config);
        assert_eq!(store.state(), BackendState::LocalOnly);

        let record = record_for_day("2026-02-01", "120");
        assert!(store.append(&record).unwrap().is_none());
        let (rows, warning) = store.read_all().unwrap();
        assert!(warning.is_none());
        assert_eq!(rows, vec![record]);
        assert_eq!(store.state(), BackendState::LocalOnly);
    }

    #[test]
    fn remote_failure_falls_back_to_local_and_sticks() {
        let dir = TempDir::new().unwrap();
        // Port 9 (discard) refuses the connection, so every remote call fails.
        let config = AppConfig {
            csv_path: dir.path().join("daily_recap.csv"),
            sheets: Some(SheetsConfig {
                endpoint: "http://127.0.0.1:9".to_string(),
                bearer_token: None,
                connect_timeout_ms: 200,
                request_timeout_ms: 200,
            }),
            passcode_sha256: None,
        };
        let mut store = RecapStore::from_config(&config);
        assert_eq!(store.state(), BackendState::RemotePreferred);

        let record = record_for_day("2026-02-01", "120");
        let warning = store.append(&record).unwrap();
        assert!(warning.unwrap().contains("row saved to local CSV"));
        assert_eq!(store.state(), BackendState::LocalFallback);

        // The fallback is sticky: the read goes straight to the CSV without
        // retrying the remote, so no further warning is raised.
        let (rows, warning) = store.read_all().unwrap();
        assert!(warning.is_none());
        assert_eq!(rows, vec![record]);
        assert_eq!(store.state(), BackendState::LocalFallback);
    }
}
