//! Worksheet wrapper
//!
//! A [`Sheet`] owns one worksheet's parsed state (columns, rows, merges) and
//! shares the package parts and shared-string table with its [`crate::XlsxFile`].
//! The `Rc<RefCell<..>>` handles make the whole engine single-threaded by
//! construction; generation is inherently sequential because row/cell
//! insertion order and shared-string index assignment are order-dependent.

use std::cell::RefCell;
use std::rc::Rc;

use wallplan_core::{CellRef, RangeRef};

use crate::cell::{CellContent, CellValue, ColumnSpec, Row};
use crate::error::XlsxResult;
use crate::package::Package;
use crate::reader;
use crate::shared_strings::SharedStrings;
use crate::writer;

/// Package path of the shared-string part
pub(crate) const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// One worksheet of an open package
#[derive(Debug)]
pub struct Sheet {
    name: String,
    part_path: String,
    columns: Vec<ColumnSpec>,
    rows: Vec<Row>,
    merges: Vec<RangeRef>,
    package: Rc<RefCell<Package>>,
    shared: Rc<RefCell<SharedStrings>>,
    owns_shared_strings: bool,
    dirty: bool,
}

impl Sheet {
    /// Parse a sheet from its package part. A missing part yields an empty
    /// sheet (a worksheet that has never been written).
    pub(crate) fn from_part(
        name: String,
        part_path: String,
        package: Rc<RefCell<Package>>,
        shared: Rc<RefCell<SharedStrings>>,
        owns_shared_strings: bool,
    ) -> XlsxResult<Self> {
        let dom = match package.borrow().part(&part_path) {
            Some(bytes) => reader::parse_worksheet(bytes)?,
            None => reader::WorksheetDom::default(),
        };

        Ok(Self {
            name,
            part_path,
            columns: dom.columns,
            rows: dom.rows,
            merges: dom.merges,
            package,
            shared,
            owns_shared_strings,
            dirty: false,
        })
    }

    /// Create a brand-new empty sheet (no backing part yet)
    pub(crate) fn new_empty(
        name: String,
        part_path: String,
        package: Rc<RefCell<Package>>,
        shared: Rc<RefCell<SharedStrings>>,
        owns_shared_strings: bool,
    ) -> Self {
        Self {
            name,
            part_path,
            columns: Vec::new(),
            rows: Vec::new(),
            merges: Vec::new(),
            package,
            shared,
            owns_shared_strings,
            // Dirty from birth so close() writes the part out
            dirty: true,
        }
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn part_path(&self) -> &str {
        &self.part_path
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set a cell's value and style, creating the row and cell slots at
    /// their sorted positions as needed. Setting the same address twice
    /// leaves only the second value in place.
    pub fn set_value(&mut self, at: CellRef, value: CellValue) {
        let (content, style) = match value {
            CellValue::Empty { style } => (CellContent::Empty, style),
            CellValue::SharedString { text, style } => {
                let index = self.shared.borrow_mut().get_index(&text);
                (CellContent::Shared(index), style)
            }
            CellValue::Integer { value, style } => (CellContent::Number(value as f64), style),
        };

        let row = self.row_at_mut(at.row);
        let i = row.cell_position(at.column);
        let cell = &mut row.cells[i];
        cell.content = content;
        cell.style = style;
        self.dirty = true;
    }

    /// Record a merged region. No overlap or ordering validation happens
    /// here; callers produce well-formed, top-left-first ranges.
    pub fn merge(&mut self, range: RangeRef) {
        self.merges.push(range);
        self.dirty = true;
    }

    /// The merged regions recorded so far
    pub fn merged_cells(&self) -> &[RangeRef] {
        &self.merges
    }

    /// Override a column's width. The custom-width flag is set explicitly,
    /// otherwise readers ignore the override.
    pub fn set_column_width(&mut self, column: u32, width: f64) {
        match self
            .columns
            .iter_mut()
            .find(|c| c.min == column && c.max == column)
        {
            Some(spec) => {
                spec.width = Some(width);
                spec.custom_width = true;
            }
            None => self.columns.push(ColumnSpec {
                min: column,
                max: column,
                width: Some(width),
                custom_width: true,
            }),
        }
        self.dirty = true;
    }

    /// Override a row's height
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_at_mut(row).height = Some(height);
        self.dirty = true;
    }

    /// Style index at `at`, or `None` when the cell does not exist or
    /// carries no explicit style. Used to read template cells.
    pub fn cell_style_index(&self, at: CellRef) -> Option<u32> {
        self.cell(at).and_then(|c| c.style)
    }

    /// Numeric value at `at`, if the cell holds one. Used to read template
    /// layout constants.
    pub fn try_get_double(&self, at: CellRef) -> Option<f64> {
        match self.cell(at)?.content {
            CellContent::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Text at `at`, resolving shared strings through the table
    pub fn cell_text(&self, at: CellRef) -> Option<String> {
        match &self.cell(at)?.content {
            CellContent::Shared(i) => self.shared.borrow().get(*i).map(String::from),
            CellContent::Inline(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Whether any cell exists at `at`
    pub fn has_cell(&self, at: CellRef) -> bool {
        self.cell(at).is_some()
    }

    /// If the row at `range.to.row` has no cells yet, pre-create empty
    /// placeholders across the whole column span so later sparse writes
    /// land at their expected positions without rescanning.
    pub fn pre_fill_to_row(&mut self, range: RangeRef) {
        let row = self.row_at_mut(range.to.row);
        if row.cells.is_empty() {
            for column in range.from.column..=range.to.column {
                row.cells.push(crate::cell::Cell::placeholder(column));
            }
            self.dirty = true;
        }
    }

    /// Flush this worksheet into its package part; the shared-string table
    /// is flushed only by the sheet that owns it, so multiple sheets never
    /// write it twice.
    pub fn save(&mut self) {
        let xml = writer::worksheet_xml(&self.columns, &self.rows, &self.merges);
        self.package
            .borrow_mut()
            .set_part(self.part_path.clone(), xml.into_bytes());

        if self.owns_shared_strings {
            let xml = writer::shared_strings_xml(&self.shared.borrow());
            self.package
                .borrow_mut()
                .set_part(SHARED_STRINGS_PART, xml.into_bytes());
        }

        self.dirty = false;
    }

    fn cell(&self, at: CellRef) -> Option<&crate::cell::Cell> {
        self.rows
            .iter()
            .find(|r| r.index == at.row)
            .and_then(|r| r.cell(at.column))
    }

    /// Position of the row with `index`, creating it at its sorted slot if
    /// absent. Fast path: on sheets filled from row 1 the row already sits
    /// at the expected positional index.
    fn row_position(&mut self, index: u32) -> usize {
        let guess = index.saturating_sub(1) as usize;
        if self.rows.get(guess).map_or(false, |r| r.index == index) {
            return guess;
        }

        match self.rows.binary_search_by_key(&index, |r| r.index) {
            Ok(i) => i,
            Err(i) => {
                self.rows.insert(i, Row::new(index));
                i
            }
        }
    }

    fn row_at_mut(&mut self, index: u32) -> &mut Row {
        let i = self.row_position(index);
        &mut self.rows[i]
    }
}

/// Named lookup collection of [`Sheet`]
#[derive(Debug, Default)]
pub struct Sheets {
    items: Vec<Sheet>,
}

impl Sheets {
    pub(crate) fn push(&mut self, sheet: Sheet) {
        self.items.push(sheet);
    }

    /// Number of sheets
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a sheet by name
    pub fn by_name(&self, name: &str) -> Option<&Sheet> {
        self.items.iter().find(|s| s.name() == name)
    }

    /// Look up a sheet by name, mutably
    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.items.iter_mut().find(|s| s.name() == name)
    }

    /// Iterate sheets in workbook order
    pub fn iter(&self) -> impl Iterator<Item = &Sheet> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sheet> {
        self.items.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_sheet() -> Sheet {
        let dir = tempfile::tempdir().unwrap();
        let package = Rc::new(RefCell::new(
            Package::create(&dir.path().join("test.xlsx")).unwrap(),
        ));
        let shared = Rc::new(RefCell::new(SharedStrings::new()));
        Sheet::new_empty(
            "Test".to_string(),
            "xl/worksheets/sheet1.xml".to_string(),
            package,
            shared,
            true,
        )
    }

    #[test]
    fn test_set_value_is_idempotent_per_address() {
        let mut sheet = test_sheet();
        let at = CellRef::parse("B2").unwrap();

        sheet.set_value(at, CellValue::shared("first", Some(1)));
        sheet.set_value(at, CellValue::shared("second", Some(2)));

        assert_eq!(sheet.cell_text(at).as_deref(), Some("second"));
        assert_eq!(sheet.cell_style_index(at), Some(2));
        // Only one cell exists at the address
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].cells.len(), 1);
    }

    #[test]
    fn test_empty_value_clears_content_but_keeps_style() {
        let mut sheet = test_sheet();
        let at = CellRef::parse("A1").unwrap();

        sheet.set_value(at, CellValue::shared("text", Some(4)));
        sheet.set_value(at, CellValue::empty(Some(7)));

        assert_eq!(sheet.cell_text(at), None);
        assert_eq!(sheet.cell_style_index(at), Some(7));
    }

    #[test]
    fn test_rows_stay_sorted() {
        let mut sheet = test_sheet();

        sheet.set_value(CellRef::parse("A5").unwrap(), CellValue::integer(5, None));
        sheet.set_value(CellRef::parse("A2").unwrap(), CellValue::integer(2, None));
        sheet.set_value(CellRef::parse("A9").unwrap(), CellValue::integer(9, None));

        let indices: Vec<_> = sheet.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 5, 9]);
    }

    #[test]
    fn test_long_column_names_sort_after_short_ones() {
        let mut sheet = test_sheet();

        // "Z4" then "AA4": numeric comparison keeps Z (26) before AA (27)
        sheet.set_value(CellRef::parse("AA4").unwrap(), CellValue::integer(1, None));
        sheet.set_value(CellRef::parse("Z4").unwrap(), CellValue::integer(2, None));

        let columns: Vec<_> = sheet.rows[0].cells.iter().map(|c| c.column).collect();
        assert_eq!(columns, vec![26, 27]);
    }

    #[test]
    fn test_pre_fill_to_row() {
        let mut sheet = test_sheet();
        sheet.pre_fill_to_row(RangeRef::parse("A3:D3").unwrap());

        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].index, 3);
        assert_eq!(sheet.rows[0].cells.len(), 4);

        // A second call on a populated row is a no-op
        sheet.pre_fill_to_row(RangeRef::parse("A3:H3").unwrap());
        assert_eq!(sheet.rows[0].cells.len(), 4);
    }

    #[test]
    fn test_merge_records_range() {
        let mut sheet = test_sheet();
        let range = RangeRef::parse("A1:D2").unwrap();
        sheet.merge(range);
        assert_eq!(sheet.merged_cells(), &[range]);
    }

    #[test]
    fn test_try_get_double() {
        let mut sheet = test_sheet();
        let at = CellRef::parse("E1").unwrap();

        assert_eq!(sheet.try_get_double(at), None);

        sheet.set_value(at, CellValue::integer(18, None));
        assert_eq!(sheet.try_get_double(at), Some(18.0));

        sheet.set_value(at, CellValue::shared("not a number", None));
        assert_eq!(sheet.try_get_double(at), None);
    }
}
