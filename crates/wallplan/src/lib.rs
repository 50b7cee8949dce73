//! # wallplan
//!
//! A wall-planner spreadsheet generator: one column group per month, one
//! styled row pair per day, with weekends, public holidays and user
//! milestones picked out by pre-authored template styles.
//!
//! The visual styling lives entirely in a template package shipped next to
//! the application: its hidden "Template" sheet carries style indices and
//! layout constants at fixed addresses, and its "Planner" sheet is the
//! canvas the generator fills. See [`PlannerStyles`] for the template
//! contract and [`PlannerGenerator`] for the layout algorithm.
//!
//! ## Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use wallplan::{PlannerGenerator, PlannerRequest, Span};
//!
//! let generator = PlannerGenerator::new("planner-template.xlsx");
//! let request = PlannerRequest {
//!     from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     span: Span::Months(12),
//!     holidays: &[],
//!     milestones: &[],
//!     first_country: Some("DE"),
//!     second_country: Some("HU"),
//!     year_label: Some("2024"),
//! };
//! generator.generate(&request, "Planner.xlsx".as_ref())?;
//! # Ok::<(), wallplan::PlannerError>(())
//! ```

pub mod error;
pub mod generator;
pub mod styles;
pub mod text;

pub use error::{PlannerError, PlannerResult};
pub use generator::{FooterBlock, PlannerGenerator, PlannerRequest, Span, PLANNER_SHEET};
pub use styles::{CellStyleKind, PlannerStyles, TEMPLATE_SHEET};

// Re-export the layers underneath for callers that assemble templates or
// inspect generated output
pub use wallplan_core as core;
pub use wallplan_xlsx as xlsx;
