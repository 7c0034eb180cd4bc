pub const COUNTRY_COLUMN: &str = "Country";
pub const IOS_COLUMN: &str = "iOS_Percentage";
pub const ANDROID_COLUMN: &str = "Android_Percentage";

pub const REQUIRED_COLUMNS: [&str; 3] = [COUNTRY_COLUMN, IOS_COLUMN, ANDROID_COLUMN];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub fn label(self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Android => "Android",
        }
    }

    /// Position on the choropleth color scale.
    pub fn z(self) -> u8 {
        match self {
            Platform::Ios => 1,
            Platform::Android => 0,
        }
    }
}

/// One input row after numeric coercion. `None` marks a cell that was not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub country: String,
    pub ios_percentage: Option<f64>,
    pub android_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedCountry {
    pub record: CountryRecord,
    pub dominant_platform: Platform,
}

/// A percentage cell that failed to parse and was replaced by the missing marker.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionWarning {
    pub row: usize,
    pub column: &'static str,
    pub value: String,
}
