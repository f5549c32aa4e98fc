use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

mod config;
mod export;
mod form;
mod metrics;
mod pdf;
mod record;
mod report;
mod sheets;
mod store;
mod validate;

#[derive(Parser)]
#[command(name = "daily-recap")]
#[command(about = "Daily operations recap tracker for delivery stations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a day's recap, validate it, and save it
    Submit {
        /// Read field values from a JSON file instead of prompting
        #[arg(long)]
        from: Option<PathBuf>,
        /// Validate and preview without saving
        #[arg(long)]
        no_save: bool,
        /// Also write the submitted record as CSV to this path
        #[arg(long)]
        csv_out: Option<PathBuf>,
        /// Also write the submitted record as XLSX to this path
        #[arg(long)]
        xlsx_out: Option<PathBuf>,
        /// Also write the submitted record as PDF to this path
        #[arg(long)]
        pdf_out: Option<PathBuf>,
        /// Submit passcode, required when the gate is configured
        #[arg(long)]
        passcode: Option<String>,
    },
    /// Write the full text recap for a stored row
    Report {
        /// 1-based row number; defaults to the latest row
        #[arg(long)]
        row: Option<usize>,
        #[arg(long, default_value = "recap.txt")]
        out: PathBuf,
    },
    /// Export a stored row as csv, xlsx, or pdf
    Export {
        /// Export format: csv, xlsx, or pdf
        #[arg(long)]
        kind: String,
        /// 1-based row number; defaults to the latest row
        #[arg(long)]
        row: Option<usize>,
        /// Output path; defaults to daily_recap_<date>.<extension>
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the most recently stored rows
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show configuration, backends, and export availability
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::AppConfig::from_env()?;

    match cli.command {
        Commands::Submit {
            from,
            no_save,
            csv_out,
            xlsx_out,
            pdf_out,
            passcode,
        } => {
            if !config.passcode_ok(passcode.as_deref()) {
                anyhow::bail!("passcode missing or incorrect");
            }
            let record = match from {
                Some(path) => form::record_from_json(&path)?,
                None => form::collect_interactive()?,
            };

            let problems = validate::validate(&record);
            if !problems.is_empty() {
                println!("Record not saved; {} check(s) failed:", problems.len());
                for problem in &problems {
                    println!("  - {problem}");
                }
            } else if no_save {
                println!("Not saved (--no-save).");
            } else {
                let mut store = store::RecapStore::from_config(&config);
                match store.append(&record) {
                    Ok(None) => println!("Saved."),
                    Ok(Some(warning)) => {
                        eprintln!("warning: {warning}");
                        println!("Saved (local fallback).");
                    }
                    Err(err) => eprintln!("warning: save failed: {err:#}"),
                }
            }

            for (kind, out) in [
                (export::ExportKind::Csv, csv_out),
                (export::ExportKind::Xlsx, xlsx_out),
                (export::ExportKind::Pdf, pdf_out),
            ] {
                if let Some(path) = out {
                    write_export(kind, &record, &path);
                }
            }

            println!();
            print!("{}", report::overview_summary(&record));
        }
        Commands::Report { row, out } => {
            let mut store = store::RecapStore::from_config(&config);
            let (rows, warning) = store.read_all()?;
            if let Some(warning) = warning {
                eprintln!("warning: {warning}");
            }
            let record = pick_row(&rows, row)?;
            let mut content = report::full_recap(record);
            content.push('\n');
            content.push_str(&report::overview_summary(record));
            std::fs::write(&out, content)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { kind, row, out } => {
            let kind = export::ExportKind::from_name(&kind).with_context(|| {
                format!("unknown export kind '{kind}' (expected csv, xlsx, or pdf)")
            })?;
            if export::availability(kind) == export::Availability::Unavailable {
                anyhow::bail!(
                    "{} export is not available in this build (available: {})",
                    kind.name(),
                    export::available_kinds().join(", ")
                );
            }
            let mut store = store::RecapStore::from_config(&config);
            let (rows, warning) = store.read_all()?;
            if let Some(warning) = warning {
                eprintln!("warning: {warning}");
            }
            let record = pick_row(&rows, row)?;
            let out =
                out.unwrap_or_else(|| PathBuf::from(export::suggested_file_name(kind, record)));
            let bytes = export::export_bytes(kind, record)?;
            std::fs::write(&out, bytes)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Exported row as {} to {}.", kind.name(), out.display());
        }
        Commands::Recent { limit } => {
            let mut store = store::RecapStore::from_config(&config);
            let (rows, warning) = store.read_all()?;
            if let Some(warning) = warning {
                eprintln!("warning: {warning}");
            }
            if rows.is_empty() {
                println!("No rows saved yet.");
                return Ok(());
            }
            let skip = rows.len().saturating_sub(limit);
            for (index, row) in rows.iter().enumerate().skip(skip) {
                let overview = metrics::compute_overview(row);
                let label = report::day_date_label(row);
                let label = if label.is_empty() {
                    "(undated)".to_string()
                } else {
                    label
                };
                println!(
                    "{:>3}. {label}: delivered {}/{} ({}), violations {}",
                    index + 1,
                    row.count(record::FieldKey::PackagesDelivered),
                    row.count(record::FieldKey::TotalPackages),
                    report::format_pct(overview.delivery_rate_pct),
                    row.count(record::FieldKey::Violations),
                );
            }
        }
        Commands::Status => {
            println!("Local CSV: {}", config.csv_path.display());
            match &config.sheets {
                Some(sheets) => println!("Remote sheet: {}", sheets.endpoint),
                None => println!("Remote sheet: not configured"),
            }
            println!(
                "Passcode gate: {}",
                if config.passcode_sha256.is_some() {
                    "on"
                } else {
                    "off"
                }
            );
            for kind in export::ExportKind::ALL {
                let state = match export::availability(kind) {
                    export::Availability::Available => "available",
                    export::Availability::Unavailable => "unavailable",
                };
                println!("Export {}: {state}", kind.name());
            }
            let mut store = store::RecapStore::from_config(&config);
            match store.read_all() {
                Ok((rows, warning)) => {
                    if let Some(warning) = warning {
                        eprintln!("warning: {warning}");
                    }
                    println!("Rows stored: {}", rows.len());
                }
                Err(err) => eprintln!("warning: could not count rows: {err:#}"),
            }
            println!("Store backend: {}", store.state().describe());
        }
    }

    Ok(())
}

fn write_export(kind: export::ExportKind, record: &record::DailyRecord, path: &Path) {
    if export::availability(kind) == export::Availability::Unavailable {
        eprintln!(
            "warning: {} export skipped: not available in this build (available: {})",
            kind.name(),
            export::available_kinds().join(", ")
        );
        return;
    }
    let written = export::export_bytes(kind, record).and_then(|bytes| {
        std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
    });
    match written {
        Ok(()) => println!("Wrote {}.", path.display()),
        Err(err) => eprintln!("warning: {} export failed: {err:#}", kind.name()),
    }
}

fn pick_row(
    rows: &[record::DailyRecord],
    row: Option<usize>,
) -> anyhow::Result<&record::DailyRecord> {
    match row {
        None => rows.last().context("no records stored yet"),
        Some(0) => anyhow::bail!("row numbers start at 1"),
        Some(n) => rows
            .get(n - 1)
            .with_context(|| format!("row {n} not found ({} stored)", rows.len())),
    }
}
