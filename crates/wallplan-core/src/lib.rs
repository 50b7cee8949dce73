//! # wallplan-core
//!
//! Core data structures for the wallplan planner generator.
//!
//! This crate provides the fundamental types used throughout wallplan:
//! - [`CellRef`] and [`RangeRef`] - spreadsheet addressing
//! - [`Holiday`] and [`Milestone`] - the calendar annotation records
//! - [`calendar`] - month/weekday labels and week numbering
//!
//! ## Example
//!
//! ```rust
//! use wallplan_core::CellRef;
//!
//! let cell = CellRef::parse("AA4").unwrap();
//! assert_eq!(cell.column, 27);
//! assert_eq!(cell.row, 4);
//! assert_eq!(cell.to_string(), "AA4");
//! ```

pub mod calendar;
pub mod error;
pub mod holiday;
pub mod milestone;
pub mod reference;

pub use error::{Error, Result};
pub use holiday::Holiday;
pub use milestone::Milestone;
pub use reference::{CellRef, RangeRef};
