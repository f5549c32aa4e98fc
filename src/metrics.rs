use crate::record::{DailyRecord, FieldKey};

/// What the operator actually typed into a counter field, before the lenient
/// zero-default flattens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountInput {
    Blank,
    Value(i64),
    Unparseable,
}

pub fn classify_count(raw: &str) -> CountInput {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CountInput::Blank;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return CountInput::Value(value);
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return CountInput::Value(value.trunc() as i64);
        }
    }
    CountInput::Unparseable
}

/// Best-effort integer coercion: anything that does not parse becomes zero so
/// a recap can always be produced.
pub fn coerce_count(raw: &str) -> i64 {
    match classify_count(raw) {
        CountInput::Value(value) => value,
        CountInput::Blank | CountInput::Unparseable => 0,
    }
}

/// `numerator / denominator * 100`, with a zero denominator reading as 0.0 so
/// a zero-activity day never needs special casing downstream.
pub fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewMetrics {
    pub delivery_rate_pct: f64,
    pub return_rate_pct: f64,
    pub uta_pct: f64,
    pub bc_pct: f64,
    pub oodt_pct: f64,
    pub other_pct: f64,
    pub seatbelt_pct: f64,
    pub speeding_pct: f64,
    pub hard_braking_pct: f64,
}

pub fn compute_overview(record: &DailyRecord) -> OverviewMetrics {
    let total = record.count(FieldKey::TotalPackages);
    let delivered = record.count(FieldKey::PackagesDelivered);
    let returned = record.count(FieldKey::PackagesReturned);
    let violations = record.count(FieldKey::Violations);

    // Category shares use a denominator floor of 1: a zero-return or
    // zero-violation day reads as 0% shares without leaning on the
    // percentage() zero guard.
    let return_base = returned.max(1);
    let violation_base = violations.max(1);

    OverviewMetrics {
        delivery_rate_pct: percentage(delivered, total),
        return_rate_pct: percentage(returned, total),
        uta_pct: percentage(record.count(FieldKey::ReturnedUta), return_base),
        bc_pct: percentage(record.count(FieldKey::ReturnedBc), return_base),
        oodt_pct: percentage(record.count(FieldKey::ReturnedOodt), return_base),
        other_pct: percentage(record.count(FieldKey::ReturnedOther), return_base),
        seatbelt_pct: percentage(record.count(FieldKey::Seatbelt), violation_base),
        speeding_pct: percentage(record.count(FieldKey::Speeding), violation_base),
        hard_braking_pct: percentage(record.count(FieldKey::HardBraking), violation_base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> DailyRecord {
        let mut record = DailyRecord::blank();
        record.set(FieldKey::TotalPackages, "200");
        record.set(FieldKey::PackagesDelivered, "180");
        record.set(FieldKey::PackagesReturned, "20");
        record.set(FieldKey::ReturnedUta, "5");
        record.set(FieldKey::ReturnedBc, "5");
        record.set(FieldKey::ReturnedOodt, "5");
        record.set(FieldKey::ReturnedOther, "5");
        record.set(FieldKey::Violations, "10");
        record.set(FieldKey::Seatbelt, "2");
        record.set(FieldKey::Speeding, "3");
        record.set(FieldKey::HardBraking, "5");
        record
    }

    #[test]
    fn coercion_defaults_to_zero_on_failure() {
        assert_eq!(coerce_count(""), 0);
        assert_eq!(coerce_count("   "), 0);
        assert_eq!(coerce_count("abc"), 0);
        assert_eq!(coerce_count("12 routes"), 0);
        assert_eq!(coerce_count("NaN"), 0);
    }

    #[test]
    fn coercion_accepts_integers_and_floats() {
        assert_eq!(coerce_count("7"), 7);
        assert_eq!(coerce_count("7.0"), 7);
        assert_eq!(coerce_count("3.9"), 3);
        assert_eq!(coerce_count(" 12 "), 12);
        assert_eq!(coerce_count("-3"), -3);
    }

    #[test]
    fn classification_separates_blank_from_unparseable() {
        assert_eq!(classify_count(""), CountInput::Blank);
        assert_eq!(classify_count("  "), CountInput::Blank);
        assert_eq!(classify_count("15"), CountInput::Value(15));
        assert_eq!(classify_count("abc"), CountInput::Unparseable);
        assert_eq!(classify_count("NaN"), CountInput::Unparseable);
    }

    #[test]
    fn percentage_guards_zero_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(17, 0), 0.0);
        assert_eq!(percentage(-5, 0), 0.0);
    }

    #[test]
    fn percentage_is_exact_for_nonzero_denominator() {
        assert!((percentage(1, 3) - 100.0 / 3.0).abs() < 1e-12);
        assert_eq!(percentage(50, 200), 25.0);
        assert_eq!(percentage(200, 100), 200.0);
    }

    #[test]
    fn overview_matches_worked_example() {
        let overview = compute_overview(&sample_record());
        assert_eq!(overview.delivery_rate_pct, 90.0);
        assert_eq!(overview.return_rate_pct, 10.0);
        assert_eq!(overview.uta_pct, 25.0);
        assert_eq!(overview.bc_pct, 25.0);
        assert_eq!(overview.oodt_pct, 25.0);
        assert_eq!(overview.other_pct, 25.0);
        assert_eq!(overview.seatbelt_pct, 20.0);
        assert_eq!(overview.speeding_pct, 30.0);
        assert_eq!(overview.hard_braking_pct, 50.0);
    }

    #[test]
    fn overview_of_blank_record_is_all_zero() {
        let overview = compute_overview(&DailyRecord::blank());
        assert_eq!(overview.delivery_rate_pct, 0.0);
        assert_eq!(overview.return_rate_pct, 0.0);
        assert_eq!(overview.uta_pct, 0.0);
        assert_eq!(overview.seatbelt_pct, 0.0);
    }

    #[test]
    fn consistent_return_categories_sum_to_hundred() {
        let mut record = DailyRecord::blank();
        record.set(FieldKey::PackagesReturned, "12");
        record.set(FieldKey::ReturnedUta, "1");
        record.set(FieldKey::ReturnedBc, "2");
        record.set(FieldKey::ReturnedOodt, "4");
        record.set(FieldKey::ReturnedOther, "5");
        let overview = compute_overview(&record);
        let sum = overview.uta_pct + overview.bc_pct + overview.oodt_pct + overview.other_pct;
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn inconsistent_data_is_surfaced_not_clamped() {
        let mut record = DailyRecord::blank();
        record.set(FieldKey::TotalPackages, "100");
        record.set(FieldKey::PackagesDelivered, "150");
        let overview = compute_overview(&record);
        assert_eq!(overview.delivery_rate_pct, 150.0);
    }
}
