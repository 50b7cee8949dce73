//! # wallplan-xlsx
//!
//! The spreadsheet package engine behind the wallplan generator: just the
//! subset of cell/row/column/merge/style-index operations the planner
//! layout needs, over a zipped-XML package edited in memory.
//!
//! The engine is deliberately single-threaded: row and cell insertion order
//! and shared-string index assignment are order-dependent, so there is one
//! writer per open package and the types are not `Send`.
//!
//! ## Example
//!
//! ```no_run
//! use wallplan_core::CellRef;
//! use wallplan_xlsx::{CellValue, XlsxFile};
//!
//! let mut file = XlsxFile::open("planner.xlsx")?;
//! let sheet = file.sheets_mut().by_name_mut("Planner").unwrap();
//! sheet.set_value(CellRef::parse("A1")?, CellValue::shared("Januar 2024", Some(1)));
//! sheet.save();
//! file.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cell;
pub mod error;
pub mod file;
pub mod shared_strings;
pub mod sheet;

mod package;
mod reader;
mod writer;

pub use cell::CellValue;
pub use error::{XlsxError, XlsxResult};
pub use file::XlsxFile;
pub use shared_strings::SharedStrings;
pub use sheet::{Sheet, Sheets};
