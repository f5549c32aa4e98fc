use crate::pdf;
use crate::record::{labels, DailyRecord, FieldKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [ExportKind::Csv, ExportKind::Xlsx, ExportKind::Pdf];

    pub fn name(self) -> &'static str {
        match self {
            ExportKind::Csv => "csv",
            ExportKind::Xlsx => "xlsx",
            ExportKind::Pdf => "pdf",
        }
    }

    pub fn from_name(name: &str) -> Option<ExportKind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportKind::Csv),
            "xlsx" => Some(ExportKind::Xlsx),
            "pdf" => Some(ExportKind::Pdf),
            _ => None,
        }
    }
}

/// Whether an export kind is usable in this build. XLSX and PDF are feature
/// gated; asking is always safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
}

pub fn availability(kind: ExportKind) -> Availability {
    let compiled_in = match kind {
        ExportKind::Csv => true,
        ExportKind::Xlsx => cfg!(feature = "xlsx"),
        ExportKind::Pdf => cfg!(feature = "pdf"),
    };
    if compiled_in {
        Availability::Available
    } else {
        Availability::Unavailable
    }
}

pub fn available_kinds() -> Vec<&'static str> {
    ExportKind::ALL
        .iter()
        .filter(|kind| availability(**kind) == Availability::Available)
        .map(|kind| kind.name())
        .collect()
}

pub fn suggested_file_name(kind: ExportKind, record: &DailyRecord) -> String {
    let date = record.get(FieldKey::Date).trim();
    let stem = if date.is_empty() { "undated" } else { date };
    format!("daily_recap_{}.{}", stem, kind.name())
}

pub fn export_bytes(kind: ExportKind, record: &DailyRecord) -> anyhow::Result<Vec<u8>> {
    match kind {
        ExportKind::Csv => csv_bytes(record),
        ExportKind::Xlsx => xlsx_bytes(record),
        ExportKind::Pdf => pdf::pdf_bytes(record),
    }
}

/// Single-record CSV: header row plus one data row, canonical column order.
fn csv_bytes(record: &DailyRecord) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut bytes);
        writer.write_record(labels())?;
        writer.write_record(record.to_row())?;
        writer.flush()?;
    }
    Ok(bytes)
}

#[cfg(feature = "xlsx")]
fn xlsx_bytes(record: &DailyRecord) -> anyhow::Result<Vec<u8>> {
    use crate::metrics::{classify_count, CountInput};
    use crate::record::{FieldKind, FIELDS};
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Daily Recap")?;

    let header_format = Format::new().set_bold();
    for (column, field) in FIELDS.iter().enumerate() {
        worksheet.write_string_with_format(0, column as u16, field.label, &header_format)?;
    }
    for (column, field) in FIELDS.iter().enumerate() {
        let raw = record.get(field.key);
        // Clean counter values land as numbers so the sheet can sum them;
        // anything else is kept verbatim as text.
        match (field.kind, classify_count(raw)) {
            (FieldKind::Counter, CountInput::Value(n)) => {
                worksheet.write_number(1, column as u16, n as f64)?;
            }
            _ => {
                worksheet.write_string(1, column as u16, raw)?;
            }
        }
    }
    worksheet.autofit();

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

#[cfg(not(feature = "xlsx"))]
fn xlsx_bytes(_record: &DailyRecord) -> anyhow::Result<Vec<u8>> {
    anyhow::bail!("xlsx export is not available in this build")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FIELD_COUNT;

    fn sample_record() -> DailyRecord {
        let mut record = DailyRecord::blank();
        record.set(FieldKey::Date, "2026-02-01");
        record.set(FieldKey::Day, "Sunday");
        record.set(FieldKey::TotalPackages, "200");
        record.set(FieldKey::PackagesDelivered, "180");
        record.set(FieldKey::CoachingReasons, "late starts, phone usage");
        record
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in ExportKind::ALL {
            assert_eq!(ExportKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ExportKind::from_name(" XLSX "), Some(ExportKind::Xlsx));
        assert_eq!(ExportKind::from_name("doc"), None);
    }

    #[test]
    fn csv_is_always_available() {
        assert_eq!(availability(ExportKind::Csv), Availability::Available);
        assert!(available_kinds().contains(&"csv"));
    }

    #[test]
    fn suggested_names_use_the_record_date() {
        let record = sample_record();
        assert_eq!(
            suggested_file_name(ExportKind::Csv, &record),
            "daily_recap_2026-02-01.csv"
        );
        assert_eq!(
            suggested_file_name(ExportKind::Pdf, &DailyRecord::blank()),
            "daily_recap_undated.pdf"
        );
    }

    #[test]
    fn csv_bytes_reparse_to_the_same_record() {
        let record = sample_record();
        let bytes = csv_bytes(&record).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, labels().map(String::from).collect::<Vec<_>>());
        assert_eq!(headers.len(), FIELD_COUNT);

        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let cells: Vec<String> = rows[0].iter().map(String::from).collect();
        assert_eq!(DailyRecord::from_row(&headers, &cells), record);
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn xlsx_bytes_are_a_zip_container() {
        let bytes = xlsx_bytes(&sample_record()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
