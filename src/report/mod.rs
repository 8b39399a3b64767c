//! Status report
//!
//! A two-column CSV (`File`, `Status`) listing every bundle that is still
//! valid, followed by a `TIME` row holding the completion timestamp.

mod errors;
mod writer;

use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::keybox::EvaluationResult;

pub use errors::ReportError;
pub use writer::ReportWriter;

/// `File` value of the trailing timestamp row.
pub const TIME_SENTINEL: &str = "TIME";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current time, shifted to `offset` when one is configured.
pub fn timestamp_now(offset: Option<FixedOffset>) -> DateTime<FixedOffset> {
    match offset {
        Some(offset) => Utc::now().with_timezone(&offset),
        None => Local::now().fixed_offset(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    rows: Vec<EvaluationResult>,
    generated_at: DateTime<FixedOffset>,
}

impl Report {
    pub fn new(rows: Vec<EvaluationResult>, generated_at: DateTime<FixedOffset>) -> Self {
        Self { rows, generated_at }
    }

    pub fn rows(&self) -> &[EvaluationResult] {
        &self.rows
    }

    pub fn generated_at(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Render the report, header and timestamp row included.
    pub fn to_csv(&self) -> Result<Vec<u8>, ReportError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());

        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.serialize(EvaluationResult {
            file: TIME_SENTINEL.to_string(),
            status: self.generated_at(),
        })?;

        writer
            .into_inner()
            .map_err(|e| ReportError::Encode(e.into_error()))
    }
}
