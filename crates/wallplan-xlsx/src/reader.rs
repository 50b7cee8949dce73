//! XML parsing for the package parts the engine edits

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use wallplan_core::{CellRef, RangeRef};

use crate::cell::{Cell, CellContent, ColumnSpec, Row};
use crate::error::{XlsxError, XlsxResult};

/// Parsed worksheet state
#[derive(Debug, Default)]
pub(crate) struct WorksheetDom {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Row>,
    pub merges: Vec<RangeRef>,
}

/// One `<sheet>` entry of workbook.xml
#[derive(Debug)]
pub(crate) struct SheetRef {
    pub name: String,
    pub sheet_id: u32,
    pub rid: String,
    pub hidden: bool,
}

/// One `<Relationship>` entry of a .rels part
#[derive(Debug, Clone)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// Read the shared-string table part into a plain list, entry order intact.
pub(crate) fn parse_shared_strings(bytes: &[u8]) -> XlsxResult<Vec<String>> {
    let mut xml_reader = Reader::from_reader(bytes);
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"si" => {
                    strings.push(current.clone());
                    current.clear();
                    in_si = false;
                }
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    current.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Read the sheet list out of workbook.xml.
pub(crate) fn parse_workbook(bytes: &[u8]) -> XlsxResult<Vec<SheetRef>> {
    let mut xml_reader = Reader::from_reader(bytes);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut sheet_id = None;
                let mut rid = None;
                let mut hidden = false;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => {
                            name = attr.unescape_value().ok().map(|s| s.to_string());
                        }
                        b"sheetId" => {
                            sheet_id = attr
                                .unescape_value()
                                .ok()
                                .and_then(|s| s.parse::<u32>().ok());
                        }
                        b"r:id" => {
                            rid = attr.unescape_value().ok().map(|s| s.to_string());
                        }
                        b"state" => {
                            hidden = attr
                                .unescape_value()
                                .ok()
                                .map(|s| s == "hidden" || s == "veryHidden")
                                .unwrap_or(false);
                        }
                        _ => {}
                    }
                }

                if let (Some(name), Some(rid)) = (name, rid) {
                    let sheet_id = sheet_id.unwrap_or(sheets.len() as u32 + 1);
                    sheets.push(SheetRef {
                        name,
                        sheet_id,
                        rid,
                        hidden,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Read every relationship of a .rels part.
pub(crate) fn parse_relationships(bytes: &[u8]) -> XlsxResult<Vec<Relationship>> {
    let mut xml_reader = Reader::from_reader(bytes);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut rel_type = None;
                let mut target = None;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => {
                            id = attr.unescape_value().ok().map(|s| s.to_string());
                        }
                        b"Type" => {
                            rel_type = attr.unescape_value().ok().map(|s| s.to_string());
                        }
                        b"Target" => {
                            target = attr.unescape_value().ok().map(|s| s.to_string());
                        }
                        _ => {}
                    }
                }

                if let (Some(id), Some(rel_type), Some(target)) = (id, rel_type, target) {
                    rels.push(Relationship {
                        id,
                        rel_type,
                        target,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Parse a worksheet part into columns, rows and merged regions.
pub(crate) fn parse_worksheet(bytes: &[u8]) -> XlsxResult<WorksheetDom> {
    let mut xml_reader = Reader::from_reader(bytes);
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut dom = WorksheetDom::default();
    let mut current_row: Option<Row> = None;
    let mut pending_cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"col" => {
                if let Some(spec) = parse_col(&e) {
                    dom.columns.push(spec);
                }
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"row" => {
                current_row = Some(parse_row_start(&e, &dom.rows));
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"row" => {
                dom.rows.push(parse_row_start(&e, &dom.rows));
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"row" => {
                if let Some(row) = current_row.take() {
                    dom.rows.push(row);
                }
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"c" => {
                pending_cell = Some(parse_cell_start(&e, current_row.as_ref())?);
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"c" => {
                let pending = parse_cell_start(&e, current_row.as_ref())?;
                if let Some(row) = current_row.as_mut() {
                    row.cells.push(pending.finish());
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"c" => {
                if let (Some(row), Some(pending)) = (current_row.as_mut(), pending_cell.take()) {
                    row.cells.push(pending.finish());
                }
                in_value = false;
                in_inline_text = false;
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"v" => {
                in_value = pending_cell.is_some();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"v" => {
                in_value = false;
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"t" => {
                in_inline_text = pending_cell.is_some();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"t" => {
                in_inline_text = false;
            }
            Ok(Event::Text(e)) if in_value || in_inline_text => {
                if let (Some(pending), Ok(text)) = (pending_cell.as_mut(), e.unescape()) {
                    pending.raw.push_str(&text);
                }
            }
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"mergeCell" => {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"ref" {
                        if let Ok(value) = attr.unescape_value() {
                            dom.merges.push(RangeRef::parse(&value)?);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(dom)
}

/// Cell under construction while its value children stream in
struct PendingCell {
    column: u32,
    style: Option<u32>,
    cell_type: CellType,
    raw: String,
}

enum CellType {
    Number,
    Shared,
    Inline,
}

impl PendingCell {
    fn finish(self) -> Cell {
        let content = if self.raw.is_empty() {
            CellContent::Empty
        } else {
            match self.cell_type {
                CellType::Shared => match self.raw.parse::<u32>() {
                    Ok(i) => CellContent::Shared(i),
                    Err(_) => CellContent::Inline(self.raw),
                },
                CellType::Number => match self.raw.parse::<f64>() {
                    Ok(n) => CellContent::Number(n),
                    Err(_) => CellContent::Inline(self.raw),
                },
                CellType::Inline => CellContent::Inline(self.raw),
            }
        };

        Cell {
            column: self.column,
            content,
            style: self.style,
        }
    }
}

fn parse_col(e: &quick_xml::events::BytesStart<'_>) -> Option<ColumnSpec> {
    let mut min = None;
    let mut max = None;
    let mut width = None;
    let mut custom_width = false;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"min" => {
                min = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok());
            }
            b"max" => {
                max = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok());
            }
            b"width" => {
                width = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse::<f64>().ok());
            }
            b"customWidth" => {
                custom_width = attr
                    .unescape_value()
                    .ok()
                    .map(|s| s == "1" || s == "true")
                    .unwrap_or(false);
            }
            _ => {}
        }
    }

    let min = min?;
    Some(ColumnSpec {
        min,
        max: max.unwrap_or(min),
        width,
        custom_width,
    })
}

fn parse_row_start(e: &quick_xml::events::BytesStart<'_>, rows: &[Row]) -> Row {
    let mut index = None;
    let mut height = None;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                index = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok());
            }
            b"ht" => {
                height = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse::<f64>().ok());
            }
            _ => {}
        }
    }

    // A row without an index follows its predecessor
    let index = index.unwrap_or_else(|| rows.last().map(|r| r.index + 1).unwrap_or(1));
    let mut row = Row::new(index);
    row.height = height;
    row
}

fn parse_cell_start(
    e: &quick_xml::events::BytesStart<'_>,
    current_row: Option<&Row>,
) -> XlsxResult<PendingCell> {
    let mut column = None;
    let mut style = None;
    let mut cell_type = CellType::Number;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                if let Ok(value) = attr.unescape_value() {
                    column = Some(CellRef::parse(&value)?.column);
                }
            }
            b"s" => {
                style = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok());
            }
            b"t" => {
                if let Ok(value) = attr.unescape_value() {
                    cell_type = match value.as_ref() {
                        "s" => CellType::Shared,
                        "n" => CellType::Number,
                        _ => CellType::Inline,
                    };
                }
            }
            _ => {}
        }
    }

    // A cell without a reference follows its predecessor in the row
    let column = column.unwrap_or_else(|| {
        current_row
            .and_then(|r| r.cells.last())
            .map(|c| c.column + 1)
            .unwrap_or(1)
    });

    Ok(PendingCell {
        column,
        style,
        cell_type,
        raw: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shared_strings() {
        let xml = br#"<?xml version="1.0"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="2">
    <si><t>Januar 2024</t></si>
    <si><t xml:space="preserve">MS: Launch</t></si>
</sst>"#;
        let strings = parse_shared_strings(xml).unwrap();
        assert_eq!(strings, vec!["Januar 2024", "MS: Launch"]);
    }

    #[test]
    fn test_parse_worksheet() {
        let xml = br#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <cols>
        <col min="1" max="1" width="9" customWidth="1"/>
    </cols>
    <sheetData>
        <row r="1" ht="350" customHeight="1">
            <c r="A1" s="3" t="s"><v>0</v></c>
            <c r="B1" s="4"/>
            <c r="C1"><v>7.5</v></c>
        </row>
        <row r="2">
            <c r="A2" t="inlineStr"><is><t>inline text</t></is></c>
        </row>
    </sheetData>
    <mergeCells count="1">
        <mergeCell ref="A1:B1"/>
    </mergeCells>
</worksheet>"#;

        let dom = parse_worksheet(xml).unwrap();

        assert_eq!(dom.columns.len(), 1);
        assert_eq!(dom.columns[0].width, Some(9.0));
        assert!(dom.columns[0].custom_width);

        assert_eq!(dom.rows.len(), 2);
        assert_eq!(dom.rows[0].index, 1);
        assert_eq!(dom.rows[0].height, Some(350.0));
        assert_eq!(dom.rows[0].cells.len(), 3);
        assert_eq!(dom.rows[0].cells[0].content, CellContent::Shared(0));
        assert_eq!(dom.rows[0].cells[0].style, Some(3));
        assert_eq!(dom.rows[0].cells[1].content, CellContent::Empty);
        assert_eq!(dom.rows[0].cells[1].style, Some(4));
        assert_eq!(dom.rows[0].cells[2].content, CellContent::Number(7.5));

        assert_eq!(
            dom.rows[1].cells[0].content,
            CellContent::Inline("inline text".to_string())
        );

        assert_eq!(dom.merges.len(), 1);
        assert_eq!(dom.merges[0].to_string(), "A1:B1");
    }

    #[test]
    fn test_parse_workbook() {
        let xml = br#"<?xml version="1.0"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="Planner" sheetId="1" r:id="rId1"/>
        <sheet name="Template" sheetId="2" state="hidden" r:id="rId2"/>
    </sheets>
</workbook>"#;

        let sheets = parse_workbook(xml).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "Planner");
        assert_eq!(sheets[0].sheet_id, 1);
        assert_eq!(sheets[0].rid, "rId1");
        assert!(!sheets[0].hidden);
        assert!(sheets[1].hidden);
    }

    #[test]
    fn test_parse_relationships() {
        let xml = br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

        let rels = parse_relationships(xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].id, "rId1");
        assert_eq!(rels[0].target, "worksheets/sheet1.xml");
        assert!(rels[1].rel_type.ends_with("/styles"));
    }
}
