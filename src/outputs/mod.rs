//! Output generation for the console report and the JSON copy.
//!
//! # Submodules
//!
//! - [`report`]: Builds the [`crate::models::Report`] and renders it as text
//! - [`json`]: Writes the report to a JSON file for other tools
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-10-02/
//!     └── earnings_growth.json
//! ```

pub mod json;
pub mod report;
