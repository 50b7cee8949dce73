//! The planner layout algorithm
//!
//! One column group of four per month (day number, weekday, text,
//! week number), two rows per day. Weekends, holidays and milestones pick
//! their cell styles out of [`PlannerStyles`]; all styling is pre-authored
//! in the template package this generator copies to the destination.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Weekday};
use log::{info, warn};

use wallplan_core::{calendar, CellRef, Holiday, Milestone, RangeRef};
use wallplan_core::calendar::MonthRange;
use wallplan_xlsx::{CellValue, Sheet, XlsxFile};

use crate::error::{PlannerError, PlannerResult};
use crate::styles::{CellStyleKind, PlannerStyles};
use crate::text;

/// Name of the sheet the planner is written into
pub const PLANNER_SHEET: &str = "Planner";

/// Columns per month group
const GROUP_WIDTH: u32 = 4;
/// First row of the day area; rows 1-2 hold the header
const DAY_START_ROW: u32 = 3;
/// Day slots per month column; every month shares the 31-day grid
const DAY_SLOTS: u32 = 31;
/// Spacer row between the day area and the footer
const FOOTER_SPACER_ROW: u32 = DAY_START_ROW + DAY_SLOTS * 2;
const FOOTER_TITLE_ROW: u32 = FOOTER_SPACER_ROW + 1;
const FOOTER_ADDRESS_ROW: u32 = FOOTER_SPACER_ROW + 2;

/// How many months the planner covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// A fixed number of months starting at the `from` month
    Months(u32),
    /// Every month from the `from` month through this date's month inclusive
    Until(NaiveDate),
}

impl Span {
    /// Resolve the span into a month count relative to `from`
    pub fn month_count(&self, from: NaiveDate) -> u32 {
        match *self {
            Span::Months(n) => n,
            Span::Until(to) => MonthRange::until(from, to).len() as u32,
        }
    }
}

/// One footer block: a title row entry and its address lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterBlock {
    /// Company/location name shown in the first footer row
    pub title: String,
    /// Address lines shown newline-joined in the second footer row
    pub lines: Vec<String>,
}

impl FooterBlock {
    /// Create a footer block
    pub fn new<S: Into<String>>(title: S, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }
}

/// Everything one generation run consumes
#[derive(Debug, Clone)]
pub struct PlannerRequest<'a> {
    /// Start date; generation begins at the first of its month
    pub from: NaiveDate,
    /// Month span to cover
    pub span: Span,
    /// Holiday records, filtered per day by exact country-code match
    pub holidays: &'a [Holiday],
    /// Milestones; same-day descriptions are joined with ", "
    pub milestones: &'a [Milestone],
    /// First country code, if any
    pub first_country: Option<&'a str>,
    /// Second country code, if any
    pub second_country: Option<&'a str>,
    /// Year-range label; enables the decorative header band when present
    pub year_label: Option<&'a str>,
}

/// The planner generator: copies the template package to the destination
/// and fills its "Planner" sheet.
#[derive(Debug, Clone)]
pub struct PlannerGenerator {
    template_path: PathBuf,
    brand_text: String,
    footer_blocks: Vec<FooterBlock>,
}

impl PlannerGenerator {
    /// Create a generator over the given template package
    pub fn new<P: Into<PathBuf>>(template_path: P) -> Self {
        Self {
            template_path: template_path.into(),
            brand_text: String::new(),
            footer_blocks: Vec::new(),
        }
    }

    /// Brand text shown in the decorative header band
    pub fn with_brand_text<S: Into<String>>(mut self, text: S) -> Self {
        self.brand_text = text.into();
        self
    }

    /// Footer blocks laid out across the full width below the day area
    pub fn with_footer_blocks(mut self, blocks: Vec<FooterBlock>) -> Self {
        self.footer_blocks = blocks;
        self
    }

    /// Generate a planner at `destination`.
    ///
    /// The template is copied first, then filled in place. On error the
    /// copied file stays on disk; it never was the user's original data.
    pub fn generate(&self, request: &PlannerRequest<'_>, destination: &Path) -> PlannerResult<()> {
        let month_count = request.span.month_count(request.from);
        if month_count == 0 {
            return Err(PlannerError::EmptySpan);
        }

        fs::copy(&self.template_path, destination)?;

        let mut file = XlsxFile::open(destination)?;
        let styles = PlannerStyles::read(&file)?;

        let total_width = month_count * GROUP_WIDTH;
        let has_band = request.year_label.is_some();

        info!(
            "generating planner: {} month(s) from {} into {}",
            month_count,
            request.from,
            destination.display()
        );

        {
            let sheet = file
                .sheets_mut()
                .by_name_mut(PLANNER_SHEET)
                .ok_or(PlannerError::PlannerSheetMissing)?;

            sheet.pre_fill_to_row(RangeRef::from_indices(1, 1, total_width, 1));
            sheet.pre_fill_to_row(RangeRef::from_indices(1, 2, total_width, 2));

            sheet.set_row_height(1, styles.row1_height);
            sheet.set_row_height(2, styles.row2_height);
            for slot in 0..DAY_SLOTS {
                let row = DAY_START_ROW + slot * 2;
                sheet.set_row_height(row, styles.day_row_height);
                sheet.set_row_height(row + 1, styles.day_row_height);
            }

            if let Some(label) = request.year_label {
                write_band(sheet, &styles, total_width, &self.brand_text, label);
            }

            for (i, month) in MonthRange::new(request.from, month_count).enumerate() {
                let base = i as u32 * GROUP_WIDTH + 1;
                write_month(sheet, &styles, request, base, month, has_band);
            }

            if !self.footer_blocks.is_empty() {
                write_footer(sheet, &styles, total_width, &self.footer_blocks);
            }

            sheet.save();
        }

        file.close()?;
        info!("planner saved to {}", destination.display());
        Ok(())
    }
}

/// Decorative header band in row 1: brand text, year-range label, brand
/// text again, each merged across a third of the full width.
fn write_band(
    sheet: &mut Sheet,
    styles: &PlannerStyles,
    total_width: u32,
    brand_text: &str,
    year_label: &str,
) {
    let span = (total_width / 3).max(1);
    let sections = [
        (1, span, brand_text, styles.header),
        (span + 1, 2 * span, year_label, styles.year),
        (2 * span + 1, total_width, brand_text, styles.header),
    ];

    for (start, end, label, style) in sections {
        sheet.set_value(CellRef::new(start, 1), CellValue::shared(label, style));
        for column in start + 1..=end {
            sheet.set_value(CellRef::new(column, 1), CellValue::empty(style));
        }
        sheet.merge(RangeRef::from_indices(start, 1, end, 1));
    }
}

/// One month's column group: header label, column widths, and all day pairs.
fn write_month(
    sheet: &mut Sheet,
    styles: &PlannerStyles,
    request: &PlannerRequest<'_>,
    base: u32,
    month: NaiveDate,
    has_band: bool,
) {
    sheet.set_column_width(base, styles.column1_width);
    sheet.set_column_width(base + 1, styles.column2_width);
    sheet.set_column_width(base + 2, styles.column3_width);
    sheet.set_column_width(base + 3, styles.column4_width);

    let label = calendar::month_label(month);
    if has_band {
        // Band occupies row 1; the month header fills row 2
        sheet.set_value(CellRef::new(base, 2), CellValue::shared(label, styles.month));
        for column in base + 1..=base + 3 {
            sheet.set_value(CellRef::new(column, 2), CellValue::empty(styles.month));
        }
        sheet.merge(RangeRef::from_indices(base, 2, base + 3, 2));
    } else {
        // No band: the month header spans rows 1-2
        sheet.set_value(CellRef::new(base, 1), CellValue::shared(label, styles.month));
        for row in 1..=2 {
            for column in base..=base + 3 {
                if row == 1 && column == base {
                    continue;
                }
                sheet.set_value(CellRef::new(column, row), CellValue::empty(styles.month));
            }
        }
        sheet.merge(RangeRef::from_indices(base, 1, base + 3, 2));
    }

    for day in 1..=calendar::days_in_month(month) {
        let date = month.with_day(day).expect("day is within the month");
        write_day(sheet, styles, request, base, date);
    }
}

/// One day: a two-row pair of day number, weekday, milestone/holiday text
/// and week number cells.
fn write_day(
    sheet: &mut Sheet,
    styles: &PlannerStyles,
    request: &PlannerRequest<'_>,
    base: u32,
    date: NaiveDate,
) {
    let row = DAY_START_ROW + (date.day() - 1) * 2;

    let (day_style, weekday_style) = if calendar::is_saturday(date) {
        (styles.month_day_saturday, styles.week_day_saturday)
    } else if calendar::is_sunday(date) {
        (styles.month_day_sunday, styles.week_day_sunday)
    } else {
        (styles.month_day, styles.week_day)
    };

    sheet.set_value(
        CellRef::new(base, row),
        CellValue::integer(date.day() as i64, day_style),
    );
    sheet.set_value(CellRef::new(base, row + 1), CellValue::empty(day_style));
    sheet.merge(RangeRef::from_indices(base, row, base, row + 1));

    let weekday_column = base + 1;
    sheet.set_value(
        CellRef::new(weekday_column, row),
        CellValue::shared(calendar::weekday_abbreviation(date), weekday_style),
    );
    sheet.set_value(
        CellRef::new(weekday_column, row + 1),
        CellValue::empty(weekday_style),
    );
    sheet.merge(RangeRef::from_indices(
        weekday_column,
        row,
        weekday_column,
        row + 1,
    ));

    let milestone = text::milestone_text(date, request.milestones);
    let holiday = text::holiday_text(
        date,
        request.first_country,
        request.second_country,
        request.holidays,
    );

    // Style pair for the day's upper/lower halves: a milestone takes the
    // upper half, the holiday keeps its own style in the lower half.
    let (upper_kind, lower_kind) = match (&milestone, &holiday) {
        (Some(_), Some((_, holiday_kind))) => (CellStyleKind::Milestone, *holiday_kind),
        (Some(_), None) => (CellStyleKind::Milestone, CellStyleKind::Milestone),
        (None, Some((_, holiday_kind))) => (*holiday_kind, *holiday_kind),
        (None, None) => (CellStyleKind::Default, CellStyleKind::Default),
    };

    let text_column = base + 2;
    match (milestone, holiday) {
        (Some(milestone_text), Some((holiday_text, _))) => {
            // Two distinct sub-cells, not merged
            sheet.set_value(
                CellRef::new(text_column, row),
                CellValue::shared(milestone_text, styles.style_index(upper_kind, 1, 1)),
            );
            sheet.set_value(
                CellRef::new(text_column, row + 1),
                CellValue::shared(holiday_text, styles.style_index(lower_kind, 1, 2)),
            );
        }
        (Some(single_text), None) | (None, Some((single_text, _))) => {
            // A lone text gets the whole pair merged, so no empty half-cell
            // with inconsistent borders remains
            sheet.set_value(
                CellRef::new(text_column, row),
                CellValue::shared(single_text, styles.style_index(upper_kind, 1, 1)),
            );
            sheet.set_value(
                CellRef::new(text_column, row + 1),
                CellValue::empty(styles.style_index(lower_kind, 1, 2)),
            );
            sheet.merge(RangeRef::from_indices(
                text_column,
                row,
                text_column,
                row + 1,
            ));
        }
        (None, None) => {
            sheet.set_value(
                CellRef::new(text_column, row),
                CellValue::empty(styles.style_index(upper_kind, 1, 1)),
            );
            sheet.set_value(
                CellRef::new(text_column, row + 1),
                CellValue::empty(styles.style_index(lower_kind, 1, 2)),
            );
        }
    }

    let week_column = base + 3;
    if date.weekday() == Weekday::Mon {
        sheet.set_value(
            CellRef::new(week_column, row),
            CellValue::integer(calendar::week_number(date) as i64, styles.week),
        );
        sheet.set_value(CellRef::new(week_column, row + 1), CellValue::empty(styles.week));
        sheet.merge(RangeRef::from_indices(
            week_column,
            row,
            week_column,
            row + 1,
        ));
    } else {
        // Keep the week column's borders consistent with the day's styling
        sheet.set_value(
            CellRef::new(week_column, row),
            CellValue::empty(styles.style_index(upper_kind, 2, 1)),
        );
        sheet.set_value(
            CellRef::new(week_column, row + 1),
            CellValue::empty(styles.style_index(lower_kind, 2, 2)),
        );
    }
}

/// Footer: a merged spacer row, then a title row and an address row with
/// one merged block per entry, equal spans across the full width.
fn write_footer(
    sheet: &mut Sheet,
    styles: &PlannerStyles,
    total_width: u32,
    blocks: &[FooterBlock],
) {
    let block_count = blocks.len() as u32;
    if total_width < block_count {
        warn!(
            "footer skipped: {} blocks do not fit into {} columns",
            block_count, total_width
        );
        return;
    }

    for column in 1..=total_width {
        sheet.set_value(
            CellRef::new(column, FOOTER_SPACER_ROW),
            CellValue::empty(styles.footer0),
        );
    }
    sheet.merge(RangeRef::from_indices(
        1,
        FOOTER_SPACER_ROW,
        total_width,
        FOOTER_SPACER_ROW,
    ));

    let span = total_width / block_count;
    for (i, block) in blocks.iter().enumerate() {
        let start = i as u32 * span + 1;
        let end = if i as u32 == block_count - 1 {
            total_width
        } else {
            start + span - 1
        };

        sheet.set_value(
            CellRef::new(start, FOOTER_TITLE_ROW),
            CellValue::shared(block.title.as_str(), styles.footer1),
        );
        sheet.set_value(
            CellRef::new(start, FOOTER_ADDRESS_ROW),
            CellValue::shared(block.lines.join("\n"), styles.footer2),
        );
        for column in start + 1..=end {
            sheet.set_value(
                CellRef::new(column, FOOTER_TITLE_ROW),
                CellValue::empty(styles.footer1),
            );
            sheet.set_value(
                CellRef::new(column, FOOTER_ADDRESS_ROW),
                CellValue::empty(styles.footer2),
            );
        }
        sheet.merge(RangeRef::from_indices(
            start,
            FOOTER_TITLE_ROW,
            end,
            FOOTER_TITLE_ROW,
        ));
        sheet.merge(RangeRef::from_indices(
            start,
            FOOTER_ADDRESS_ROW,
            end,
            FOOTER_ADDRESS_ROW,
        ));
    }

    sheet.set_row_height(FOOTER_SPACER_ROW, styles.footer0_row_height);
    sheet.set_row_height(FOOTER_TITLE_ROW, styles.footer1_row_height);
    sheet.set_row_height(FOOTER_ADDRESS_ROW, styles.footer2_row_height);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_span_month_count() {
        assert_eq!(Span::Months(12).month_count(date(2024, 1, 1)), 12);
        assert_eq!(
            Span::Until(date(2024, 12, 31)).month_count(date(2024, 1, 15)),
            12
        );
        assert_eq!(
            Span::Until(date(2024, 1, 1)).month_count(date(2024, 1, 31)),
            1
        );
        assert_eq!(
            Span::Until(date(2023, 12, 31)).month_count(date(2024, 1, 1)),
            0
        );
    }
}
