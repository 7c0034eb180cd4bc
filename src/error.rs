use std::fmt;

use crate::types::REQUIRED_COLUMNS;

/// Failures that end an upload request. Both are reported to the user as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Parse { cause: String },
    Schema { required: Vec<&'static str>, missing: Vec<&'static str> },
}

impl PipelineError {
    pub fn parse(cause: impl fmt::Display) -> Self {
        PipelineError::Parse {
            cause: cause.to_string(),
        }
    }

    pub fn schema(missing: Vec<&'static str>) -> Self {
        PipelineError::Schema {
            required: REQUIRED_COLUMNS.to_vec(),
            missing,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Parse { cause } => write!(f, "Error processing the file: {}", cause),
            // Lists every required column, not only the missing ones.
            PipelineError::Schema { required, .. } => write!(
                f,
                "Missing required columns. Please ensure your CSV file contains: {}",
                required.join(", ")
            ),
        }
    }
}

impl std::error::Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ANDROID_COLUMN;

    #[test]
    fn schema_message_names_all_required_columns() {
        let err = PipelineError::schema(vec![ANDROID_COLUMN]);
        assert_eq!(
            err.to_string(),
            "Missing required columns. Please ensure your CSV file contains: Country, iOS_Percentage, Android_Percentage"
        );
    }

    #[test]
    fn parse_message_carries_cause() {
        let err = PipelineError::parse("Invalid byte 33, offset 0.");
        assert_eq!(err.to_string(), "Error processing the file: Invalid byte 33, offset 0.");
    }
}
