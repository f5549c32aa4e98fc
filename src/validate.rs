use crate::metrics::{classify_count, CountInput};
use crate::record::{DailyRecord, FieldKey, FieldKind, FIELDS};

/// Cross-field consistency checks, every rule evaluated independently. An
/// empty result accepts the record for persistence; a non-empty result means
/// every message must be surfaced and the record must not be saved.
pub fn validate(record: &DailyRecord) -> Vec<String> {
    let mut problems = Vec::new();

    let total = record.count(FieldKey::TotalPackages);
    let delivered = record.count(FieldKey::PackagesDelivered);
    let returned = record.count(FieldKey::PackagesReturned);
    // Counters are free text; sums saturate rather than overflow.
    if delivered.saturating_add(returned) > total {
        problems.push(format!(
            "Packages Delivered ({delivered}) + Packages Returned ({returned}) exceeds Total Packages ({total})"
        ));
    }

    let category_sum = [
        FieldKey::ReturnedUta,
        FieldKey::ReturnedBc,
        FieldKey::ReturnedOodt,
        FieldKey::ReturnedOther,
    ]
    .into_iter()
    .fold(0i64, |sum, key| sum.saturating_add(record.count(key)));
    if category_sum != returned {
        problems.push(format!(
            "UTA + BC + OODT + Other sum to {category_sum} but Packages Returned is {returned}"
        ));
    }

    for field in FIELDS.iter().filter(|field| field.kind == FieldKind::Counter) {
        if classify_count(record.get(field.key)) == CountInput::Unparseable {
            problems.push(format!(
                "{}: '{}' is not a number (treated as 0)",
                field.label,
                record.get(field.key)
            ));
        }
    }

    problems
}
