//! The upload pipeline: decode, validate, coerce, classify and build the figure.
//!
//! Every request runs the whole pipeline from scratch; nothing survives between uploads.

use crate::data::{coerce_records, decode_data_url, log_coercion_warnings, parse_table, validate_schema};
use crate::error::PipelineError;
use crate::processing::classify_all;
use crate::render::{build_upload_figure, Figure, PlotConfig};
use serde::{Deserialize, Serialize};

pub const AWAITING_UPLOAD_MESSAGE: &str = "Please upload a CSV file to display the map.";

#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    /// Data URL produced by the browser's `FileReader.readAsDataURL`; absent until a file is chosen.
    pub contents: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// What the output area shows after an upload event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadOutcome {
    Idle { message: String },
    Rendered { figure: Figure, config: PlotConfig },
    Failed { message: String },
}

/// Shared, read-only state for the upload handler.
#[derive(Debug, Clone, Default)]
pub struct UploadContext {
    pub plot_config: PlotConfig,
}

pub fn handle_upload(ctx: &UploadContext, request: UploadRequest) -> UploadOutcome {
    let Some(contents) = request.contents else {
        return UploadOutcome::Idle {
            message: AWAITING_UPLOAD_MESSAGE.to_string(),
        };
    };
    let filename = request.filename.as_deref().unwrap_or("<unnamed>");

    match run_pipeline(&contents, filename) {
        Ok(figure) => UploadOutcome::Rendered {
            figure,
            config: ctx.plot_config.clone(),
        },
        Err(err) => {
            if let PipelineError::Schema { missing, .. } = &err {
                tracing::warn!(filename, ?missing, "upload is missing required columns");
            }
            tracing::warn!(filename, error = %err, "upload rejected");
            UploadOutcome::Failed {
                message: err.to_string(),
            }
        }
    }
}

fn run_pipeline(contents: &str, filename: &str) -> Result<Figure, PipelineError> {
    let text = decode_data_url(contents)?;
    let table = parse_table(&text)?;
    let columns = validate_schema(&table)?;

    let (records, warnings) = coerce_records(&table, columns);
    log_coercion_warnings(filename, &warnings);

    let classified = classify_all(records);
    tracing::info!(filename, countries = classified.len(), "rendering uploaded map");

    Ok(build_upload_figure(&classified))
}
