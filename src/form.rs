use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use chrono::{Local, NaiveDate};

use crate::record::{DailyRecord, FieldKey, FieldKind, FIELDS};

/// Walks the schema field by field on the terminal. Empty input accepts the
/// shown default; Date defaults to today and Day is derived from whatever
/// date was just entered.
pub fn collect_interactive() -> anyhow::Result<DailyRecord> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    prompt_record(&mut input, &mut output)
}

pub fn prompt_record(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<DailyRecord> {
    let mut record = DailyRecord::blank();
    for field in &FIELDS {
        let default = match field.key {
            FieldKey::Date => Local::now().date_naive().format("%Y-%m-%d").to_string(),
            FieldKey::Day => day_default(record.get(FieldKey::Date)),
            _ => String::new(),
        };
        let hint = match field.kind {
            FieldKind::Counter => " (number)",
            _ => "",
        };
        if default.is_empty() {
            write!(output, "{}{}: ", field.label, hint)?;
        } else {
            write!(output, "{}{} [{}]: ", field.label, hint, default)?;
        }
        output.flush()?;

        let mut line = String::new();
        input
            .read_line(&mut line)
            .context("failed to read form input")?;
        let entered = line.trim();
        if entered.is_empty() {
            record.set(field.key, default);
        } else {
            record.set(field.key, entered);
        }
    }
    Ok(record)
}

/// Weekday name for a `YYYY-MM-DD` date, or empty when the date does not
/// parse.
pub fn day_default(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%A").to_string(),
        Err(_) => String::new(),
    }
}

pub fn record_from_json(path: &Path) -> anyhow::Result<DailyRecord> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    record_from_json_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Accepts a label-keyed JSON object. Scalars are stored as their text form,
/// null as empty; unknown labels are ignored like everywhere else.
pub fn record_from_json_str(text: &str) -> anyhow::Result<DailyRecord> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let object = value
        .as_object()
        .context("expected a JSON object mapping field labels to values")?;
    let pairs = object.iter().map(|(label, value)| {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        (label.clone(), text)
    });
    Ok(DailyRecord::from_pairs(pairs))
}
