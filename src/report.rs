use std::fmt::Write;

use crate::metrics;
use crate::record::{DailyRecord, FieldKey, Section, FIELDS};

/// Short derived-metrics block: header, rates with raw counts, category
/// breakdowns. Percentages carry exactly one decimal place.
pub fn overview_summary(record: &DailyRecord) -> String {
    let overview = metrics::compute_overview(record);
    let total = record.count(FieldKey::TotalPackages);
    let delivered = record.count(FieldKey::PackagesDelivered);
    let returned = record.count(FieldKey::PackagesReturned);
    let violations = record.count(FieldKey::Violations);

    let mut output = String::new();
    let label = day_date_label(record);
    if label.is_empty() {
        let _ = writeln!(output, "Daily Overview");
    } else {
        let _ = writeln!(output, "Daily Overview – {label}");
    }
    let _ = writeln!(
        output,
        "Delivered {} of {} packages ({}); returned {} ({})",
        group_thousands(delivered),
        group_thousands(total),
        format_pct(overview.delivery_rate_pct),
        group_thousands(returned),
        format_pct(overview.return_rate_pct),
    );
    let _ = writeln!(
        output,
        "Returns: UTA {}, BC {}, OODT {}, Other {}",
        format_pct(overview.uta_pct),
        format_pct(overview.bc_pct),
        format_pct(overview.oodt_pct),
        format_pct(overview.other_pct),
    );
    let _ = writeln!(
        output,
        "Violations ({}): Seatbelt {}, Speeding {}, Hard Braking {}",
        group_thousands(violations),
        format_pct(overview.seatbelt_pct),
        format_pct(overview.speeding_pct),
        format_pct(overview.hard_braking_pct),
    );
    output
}

/// Fixed-template projection of every field, grouped by section in canonical
/// order. No computation: values are echoed exactly as stored.
pub fn full_recap(record: &DailyRecord) -> String {
    let mut output = String::new();
    for (index, section) in Section::ALL.iter().enumerate() {
        if index > 0 {
            let _ = writeln!(output);
        }
        let _ = writeln!(output, "== {} ==", section.heading());
        for field in FIELDS.iter().filter(|field| field.section == *section) {
            let _ = writeln!(output, "{}: {}", field.label, record.get(field.key));
        }
    }
    output
}

pub fn day_date_label(record: &DailyRecord) -> String {
    let day = record.get(FieldKey::Day).trim();
    let date = record.get(FieldKey::Date).trim();
    match (day.is_empty(), date.is_empty()) {
        (false, false) => format!("{day} {date}"),
        (true, false) => date.to_string(),
        (false, true) => day.to_string(),
        (true, true) => String::new(),
    }
}

pub fn format_pct(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
