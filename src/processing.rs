use crate::types::{ClassifiedCountry, CountryRecord, Platform};

const IOS_MAJORITY_THRESHOLD: f64 = 50.0;

/// Strict majority on iOS share alone. A missing share never exceeds the threshold, so
/// it falls back to Android along with every other non-iOS row.
pub fn dominant_platform(record: &CountryRecord) -> Platform {
    match record.ios_percentage {
        Some(share) if share > IOS_MAJORITY_THRESHOLD => Platform::Ios,
        _ => Platform::Android,
    }
}

pub fn classify_all(records: Vec<CountryRecord>) -> Vec<ClassifiedCountry> {
    let mut classified = Vec::with_capacity(records.len());
    for record in records {
        let dominant_platform = dominant_platform(&record);
        classified.push(ClassifiedCountry {
            record,
            dominant_platform,
        });
    }

    let ios = classified
        .iter()
        .filter(|c| c.dominant_platform == Platform::Ios)
        .count();
    tracing::debug!(
        countries = classified.len(),
        ios,
        android = classified.len() - ios,
        "classified countries"
    );

    classified
}
