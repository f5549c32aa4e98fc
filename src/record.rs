use crate::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Counter,
    Text,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    VolumeRoutes,
    DriverPerformance,
    SafetyCompliance,
    LaborCost,
    FleetHealth,
    Escalations,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::General,
        Section::VolumeRoutes,
        Section::DriverPerformance,
        Section::SafetyCompliance,
        Section::LaborCost,
        Section::FleetHealth,
        Section::Escalations,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            Section::General => "General",
            Section::VolumeRoutes => "Volume & Routes",
            Section::DriverPerformance => "Driver Performance",
            Section::SafetyCompliance => "Safety & Compliance",
            Section::LaborCost => "Labor & Cost Metrics",
            Section::FleetHealth => "Fleet & Vehicle Health",
            Section::Escalations => "Escalations & Issues",
        }
    }
}

// Variants are declared in canonical column order; `key as usize` is the
// column index into a record's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Date,
    Day,
    TotalRoutes,
    AmzlLateCancels,
    AdditionalRoutes,
    TotalTrainings,
    TotalPackages,
    PackagesDelivered,
    RescuesCompleted,
    RescueDrivers,
    PackagesReturned,
    ReturnedUta,
    ReturnedBc,
    ReturnedOodt,
    ReturnedOther,
    Violations,
    Seatbelt,
    Speeding,
    HardBraking,
    Injuries,
    DriversNeedingCoaching,
    CoachingReasons,
    DasExceedingFourDays,
    AdpVsPaidHours,
    GroundedVehicles,
    GroundedReasons,
    Damages,
    CustomerComplaints,
    StationFeedback,
    RouteFailures,
}

pub struct FieldSpec {
    pub key: FieldKey,
    pub label: &'static str,
    pub section: Section,
    pub kind: FieldKind,
}

pub const FIELD_COUNT: usize = 30;

pub const FIELDS: [FieldSpec; FIELD_COUNT] = [
    FieldSpec {
        key: FieldKey::Date,
        label: "Date",
        section: Section::General,
        kind: FieldKind::Date,
    },
    FieldSpec {
        key: FieldKey::Day,
        label: "Day",
        section: Section::General,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::TotalRoutes,
        label: "Total Routes",
        section: Section::VolumeRoutes,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::AmzlLateCancels,
        label: "AMZL Late Cancels",
        section: Section::VolumeRoutes,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::AdditionalRoutes,
        label: "Additional Routes Picked Up",
        section: Section::VolumeRoutes,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::TotalTrainings,
        label: "Total Trainings",
        section: Section::VolumeRoutes,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::TotalPackages,
        label: "Total Packages",
        section: Section::VolumeRoutes,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::PackagesDelivered,
        label: "Packages Delivered",
        section: Section::DriverPerformance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::RescuesCompleted,
        label: "Rescues Completed",
        section: Section::DriverPerformance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::RescueDrivers,
        label: "Rescue Drivers",
        section: Section::DriverPerformance,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::PackagesReturned,
        label: "Packages Returned",
        section: Section::DriverPerformance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::ReturnedUta,
        label: "UTA",
        section: Section::DriverPerformance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::ReturnedBc,
        label: "BC",
        section: Section::DriverPerformance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::ReturnedOodt,
        label: "OODT",
        section: Section::DriverPerformance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::ReturnedOther,
        label: "Other",
        section: Section::DriverPerformance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::Violations,
        label: "Violations",
        section: Section::SafetyCompliance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::Seatbelt,
        label: "Seatbelt",
        section: Section::SafetyCompliance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::Speeding,
        label: "Speeding",
        section: Section::SafetyCompliance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::HardBraking,
        label: "Hard Braking",
        section: Section::SafetyCompliance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::Injuries,
        label: "Injuries",
        section: Section::SafetyCompliance,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::DriversNeedingCoaching,
        label: "Drivers Needing Coaching",
        section: Section::SafetyCompliance,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::CoachingReasons,
        label: "Coaching Reasons",
        section: Section::SafetyCompliance,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::DasExceedingFourDays,
        label: "DAs Exceeding 4 Days",
        section: Section::LaborCost,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::AdpVsPaidHours,
        label: "ADP vs Paid Hours",
        section: Section::LaborCost,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::GroundedVehicles,
        label: "Grounded Vehicles",
        section: Section::FleetHealth,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::GroundedReasons,
        label: "Grounded Reasons",
        section: Section::FleetHealth,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::Damages,
        label: "Damages",
        section: Section::FleetHealth,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::CustomerComplaints,
        label: "Customer Complaints",
        section: Section::Escalations,
        kind: FieldKind::Counter,
    },
    FieldSpec {
        key: FieldKey::StationFeedback,
        label: "Amazon Station Feedback",
        section: Section::Escalations,
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: FieldKey::RouteFailures,
        label: "Route Failures",
        section: Section::Escalations,
        kind: FieldKind::Counter,
    },
];

pub fn labels() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|field| field.label)
}

pub fn field_by_label(label: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|field| field.label == label)
}

/// One day's submission: every schema field present in canonical order,
/// stored as entered text. Counters are coerced at the point of use.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    values: Vec<String>,
}

impl DailyRecord {
    pub fn blank() -> DailyRecord {
        DailyRecord {
            values: vec![String::new(); FIELD_COUNT],
        }
    }

    pub fn get(&self, key: FieldKey) -> &str {
        &self.values[key as usize]
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values[key as usize] = value.into();
    }

    pub fn count(&self, key: FieldKey) -> i64 {
        metrics::coerce_count(self.get(key))
    }

    /// Normalizes label-keyed pairs onto the canonical schema: unknown labels
    /// are ignored, absent fields stay empty.
    pub fn from_pairs<I>(pairs: I) -> DailyRecord
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut record = DailyRecord::blank();
        for (label, value) in pairs {
            if let Some(field) = field_by_label(label.trim()) {
                record.set(field.key, value);
            }
        }
        record
    }

    /// Normalizes one stored row against whatever header it was written
    /// under: shuffled columns are re-ordered, unknown columns dropped,
    /// missing columns synthesized as empty.
    pub fn from_row(headers: &[String], row: &[String]) -> DailyRecord {
        let mut record = DailyRecord::blank();
        for (position, header) in headers.iter().enumerate() {
            if let Some(field) = field_by_label(header.trim()) {
                if let Some(value) = row.get(position) {
                    record.set(field.key, value.clone());
                }
            }
        }
        record
    }

    pub fn to_row(&self) -> Vec<String> {
        self.values.clone()
    }
}
