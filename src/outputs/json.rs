//! JSON output of the report.
//!
//! # Output Structure
//!
//! Files are organized by run date:
//! ```text
//! json_output_dir/
//! └── 2025-10-02/
//!     └── earnings_growth.json
//! ```
//!
//! A later run on the same day replaces the file.

use crate::models::Report;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

pub const REPORT_FILE_NAME: &str = "earnings_growth.json";

/// Where [`write_report`] puts the report for its run date.
pub fn report_path(report: &Report, json_output_dir: &str) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(&report.local_date)
        .join(REPORT_FILE_NAME)
}

/// Write a [`Report`] as pretty-printed JSON.
///
/// Creates `{json_output_dir}/{date}/` as needed and returns the file path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(report: &Report, json_output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = report_path(report, json_output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = report.articles.len(), "Wrote JSON report");
    Ok(path)
}
