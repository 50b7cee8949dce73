//! Generator error types

use thiserror::Error;

/// Result type for planner generation
pub type PlannerResult<T> = std::result::Result<T, PlannerError>;

/// Errors surfaced by a generation run.
///
/// Every variant is recovered at the outermost boundary of the generate
/// call and rendered as a single user-facing message; no partial-state
/// cleanup happens, so a half-written destination file may remain on disk.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The template package has no "Template" sheet to read styles from
    #[error("Template sheet not found")]
    TemplateSheetMissing,

    /// The template package has no "Planner" sheet to fill
    #[error("Planner sheet not found")]
    PlannerSheetMissing,

    /// The requested date span covers no months
    #[error("The requested period covers no months")]
    EmptySpan,

    /// IO error (template copy, destination file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Package engine error
    #[error(transparent)]
    Xlsx(#[from] wallplan_xlsx::XlsxError),

    /// Core error
    #[error(transparent)]
    Core(#[from] wallplan_core::Error),
}
