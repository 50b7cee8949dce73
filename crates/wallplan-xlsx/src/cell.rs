//! Cell values and the worksheet's row/cell/column storage types

/// A value to write into a sheet cell.
///
/// Each variant knows how to materialize itself when passed to
/// [`crate::Sheet::set_value`]; the optional style index is applied in every
/// case, including `Empty`: a visually blank cell still needs its style so
/// borders and fills render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Clears any previous content and datatype, keeping only the style
    Empty {
        /// Style index to apply, if any
        style: Option<u32>,
    },
    /// Text resolved through the workbook's shared-string table
    SharedString {
        /// The text to deduplicate into the table
        text: String,
        /// Style index to apply, if any
        style: Option<u32>,
    },
    /// Numeric cell (day numbers, week numbers)
    Integer {
        /// The value
        value: i64,
        /// Style index to apply, if any
        style: Option<u32>,
    },
}

impl CellValue {
    /// An empty cell carrying only a style
    pub fn empty(style: Option<u32>) -> Self {
        CellValue::Empty { style }
    }

    /// A shared-string cell
    pub fn shared<S: Into<String>>(text: S, style: Option<u32>) -> Self {
        CellValue::SharedString {
            text: text.into(),
            style,
        }
    }

    /// An integer cell
    pub fn integer(value: i64, style: Option<u32>) -> Self {
        CellValue::Integer { value, style }
    }
}

/// Materialized cell content as stored in a row
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellContent {
    Empty,
    /// Index into the shared-string table
    Shared(u32),
    Number(f64),
    /// Inline text preserved from parsed worksheets
    Inline(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Cell {
    pub column: u32,
    pub content: CellContent,
    pub style: Option<u32>,
}

impl Cell {
    pub fn placeholder(column: u32) -> Self {
        Self {
            column,
            content: CellContent::Empty,
            style: None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub index: u32,
    pub height: Option<f64>,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            height: None,
            cells: Vec::new(),
        }
    }

    /// Position of the cell for `column`, creating it at its sorted slot if
    /// absent. Fast path: on densely filled rows the cell for column N
    /// already sits at position N-1.
    ///
    /// Comparison is by numeric column value; reference strings of different
    /// lengths ("Z4" vs "AA4") do not sort lexically.
    pub fn cell_position(&mut self, column: u32) -> usize {
        let guess = column.saturating_sub(1) as usize;
        if self.cells.get(guess).map_or(false, |c| c.column == column) {
            return guess;
        }

        match self.cells.binary_search_by_key(&column, |c| c.column) {
            Ok(i) => i,
            Err(i) => {
                self.cells.insert(i, Cell::placeholder(column));
                i
            }
        }
    }

    pub fn cell(&self, column: u32) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column == column)
    }
}

/// Width override for a column range
#[derive(Debug, Clone)]
pub(crate) struct ColumnSpec {
    pub min: u32,
    pub max: u32,
    pub width: Option<f64>,
    pub custom_width: bool,
}
