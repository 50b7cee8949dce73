//! Template style and layout-constant reading
//!
//! All visual styling of the generated planner is pre-authored in a hidden
//! "Template" sheet of the shipped package: single-cell roles carry their
//! style index at fixed addresses in column B, layout doubles sit in column
//! E, and the day-cell styles are authored as 2x2 blocks in columns A/B at
//! fixed row offsets. The generator reads them once per run and never
//! touches the stylesheet itself.

use wallplan_core::CellRef;
use wallplan_xlsx::{Sheet, XlsxFile};

use crate::error::{PlannerError, PlannerResult};

/// Name of the hidden sheet carrying the pre-authored styles
pub const TEMPLATE_SHEET: &str = "Template";

/// Semantic style group for a day's text and week-number cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyleKind {
    /// Plain day
    Default,
    /// Holiday in the first country only
    Holiday1,
    /// Holiday in the second country only
    Holiday2,
    /// Holiday in both countries
    Holiday12,
    /// Milestone
    Milestone,
}

/// A 2x2 block of style indices: column 1 = text column, column 2 =
/// week-number column; rows are the upper/lower halves of a day pair.
#[derive(Debug, Clone, Copy, Default)]
struct TableStyle {
    cells: [[Option<u32>; 2]; 2],
}

impl TableStyle {
    fn read(sheet: &Sheet, start_row: u32) -> Self {
        let mut cells = [[None; 2]; 2];
        for (row, row_cells) in cells.iter_mut().enumerate() {
            for (column, slot) in row_cells.iter_mut().enumerate() {
                *slot = sheet
                    .cell_style_index(CellRef::new(column as u32 + 1, start_row + row as u32));
            }
        }
        Self { cells }
    }

    fn get(&self, column: u32, row: u32) -> Option<u32> {
        self.cells[(row - 1) as usize][(column - 1) as usize]
    }
}

/// Styles and layout constants read from the Template sheet.
///
/// Missing individual cells degrade to `None` (no explicit style) or to the
/// hardcoded layout defaults; only a missing Template sheet fails the run.
#[derive(Debug)]
pub struct PlannerStyles {
    pub month: Option<u32>,
    pub week: Option<u32>,
    pub month_day: Option<u32>,
    pub week_day: Option<u32>,
    pub month_day_saturday: Option<u32>,
    pub week_day_saturday: Option<u32>,
    pub month_day_sunday: Option<u32>,
    pub week_day_sunday: Option<u32>,
    pub year: Option<u32>,
    pub header: Option<u32>,
    pub footer1: Option<u32>,
    pub footer2: Option<u32>,
    pub footer0: Option<u32>,

    pub column1_width: f64,
    pub column2_width: f64,
    pub column3_width: f64,
    pub column4_width: f64,
    pub row1_height: f64,
    pub row2_height: f64,
    pub day_row_height: f64,
    pub footer0_row_height: f64,
    pub footer1_row_height: f64,
    pub footer2_row_height: f64,

    default_style: TableStyle,
    holiday1: TableStyle,
    holiday2: TableStyle,
    holiday12: TableStyle,
    milestone: TableStyle,
}

impl PlannerStyles {
    /// Read all styles and constants out of the package's Template sheet.
    pub fn read(file: &XlsxFile) -> PlannerResult<Self> {
        let template = file
            .sheets()
            .by_name(TEMPLATE_SHEET)
            .ok_or(PlannerError::TemplateSheetMissing)?;

        let style_at = |row: u32| template.cell_style_index(CellRef::new(2, row));
        let double_at = |row: u32, default: f64| {
            template
                .try_get_double(CellRef::new(5, row))
                .unwrap_or(default)
        };

        Ok(Self {
            month: style_at(1),
            week: style_at(2),
            month_day: style_at(3),
            week_day: style_at(4),
            month_day_saturday: style_at(5),
            week_day_saturday: style_at(6),
            month_day_sunday: style_at(7),
            week_day_sunday: style_at(8),
            year: style_at(9),
            header: style_at(10),
            footer1: style_at(11),
            footer2: style_at(12),
            footer0: style_at(13),

            column1_width: double_at(1, 9.0),
            column2_width: double_at(2, 5.0),
            column3_width: double_at(3, 18.0),
            column4_width: double_at(4, 7.5),
            row1_height: double_at(5, 350.0),
            row2_height: double_at(6, 130.0),
            day_row_height: double_at(7, 40.0),
            footer0_row_height: double_at(8, 20.0),
            footer1_row_height: double_at(9, 100.0),
            footer2_row_height: double_at(10, 200.0),

            default_style: TableStyle::read(template, 16),
            holiday1: TableStyle::read(template, 20),
            holiday2: TableStyle::read(template, 24),
            holiday12: TableStyle::read(template, 28),
            milestone: TableStyle::read(template, 32),
        })
    }

    /// Style index for one quadrant of a day's 2x2 cell block.
    ///
    /// `column` and `row` must be 1 or 2; anything else is a bug in the
    /// layout code and panics.
    pub fn style_index(&self, kind: CellStyleKind, column: u32, row: u32) -> Option<u32> {
        assert!(
            (1..=2).contains(&column) && (1..=2).contains(&row),
            "table style lookup is 2x2, got ({}, {})",
            column,
            row
        );

        let table = match kind {
            CellStyleKind::Default => &self.default_style,
            CellStyleKind::Holiday1 => &self.holiday1,
            CellStyleKind::Holiday2 => &self.holiday2,
            CellStyleKind::Holiday12 => &self.holiday12,
            CellStyleKind::Milestone => &self.milestone,
        };
        table.get(column, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_style_quadrants() {
        let style = TableStyle {
            cells: [[Some(1), Some(2)], [Some(3), Some(4)]],
        };
        assert_eq!(style.get(1, 1), Some(1));
        assert_eq!(style.get(2, 1), Some(2));
        assert_eq!(style.get(1, 2), Some(3));
        assert_eq!(style.get(2, 2), Some(4));
    }
}
