//! XML serialization for the package parts the engine owns

use wallplan_core::{CellRef, RangeRef};

use crate::cell::{CellContent, ColumnSpec, Row};
use crate::file::SheetEntry;
use crate::reader::Relationship;
use crate::shared_strings::SharedStrings;

pub(crate) const EMPTY_STYLESHEET_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#;

pub(crate) const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Serialize a worksheet part. Element order is fixed by the schema:
/// cols, sheetData, mergeCells.
pub(crate) fn worksheet_xml(columns: &[ColumnSpec], rows: &[Row], merges: &[RangeRef]) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    if !columns.is_empty() {
        content.push_str("\n    <cols>");
        for col in columns {
            let mut attrs = format!(" min=\"{}\" max=\"{}\"", col.min, col.max);
            if let Some(width) = col.width {
                attrs.push_str(&format!(" width=\"{}\"", width));
            }
            if col.custom_width {
                attrs.push_str(" customWidth=\"1\"");
            }
            content.push_str(&format!("\n        <col{}/>", attrs));
        }
        content.push_str("\n    </cols>");
    }

    content.push_str("\n    <sheetData>");
    for row in rows {
        let mut attrs = format!(" r=\"{}\"", row.index);
        if let Some(height) = row.height {
            attrs.push_str(&format!(" ht=\"{}\" customHeight=\"1\"", height));
        }

        if row.cells.is_empty() {
            content.push_str(&format!("\n        <row{}/>", attrs));
            continue;
        }

        content.push_str(&format!("\n        <row{}>", attrs));
        for cell in &row.cells {
            let reference = CellRef::new(cell.column, row.index);
            let style_attr = match cell.style {
                Some(s) => format!(" s=\"{}\"", s),
                None => String::new(),
            };

            match &cell.content {
                CellContent::Empty => {
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{}/>",
                        reference, style_attr
                    ));
                }
                CellContent::Shared(index) => {
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{} t=\"s\"><v>{}</v></c>",
                        reference, style_attr, index
                    ));
                }
                CellContent::Number(n) => {
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{}><v>{}</v></c>",
                        reference, style_attr, n
                    ));
                }
                CellContent::Inline(text) => {
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t>{}</t></is></c>",
                        reference,
                        style_attr,
                        escape_xml(text)
                    ));
                }
            }
        }
        content.push_str("\n        </row>");
    }
    content.push_str("\n    </sheetData>");

    if !merges.is_empty() {
        content.push_str(&format!("\n    <mergeCells count=\"{}\">", merges.len()));
        for range in merges {
            content.push_str(&format!("\n        <mergeCell ref=\"{}\"/>", range));
        }
        content.push_str("\n    </mergeCells>");
    }

    content.push_str("\n</worksheet>");
    content
}

/// Serialize the shared-string table, entries in index order.
pub(crate) fn shared_strings_xml(strings: &SharedStrings) -> String {
    let mut content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );

    for text in strings.iter() {
        content.push_str(&format!(
            "\n    <si><t xml:space=\"preserve\">{}</t></si>",
            escape_xml(text)
        ));
    }

    content.push_str("\n</sst>");
    content
}

/// Serialize workbook.xml: book view (active tab), sheet list with hidden
/// states, and the full-recalculation flag.
pub(crate) fn workbook_xml(entries: &[SheetEntry], active_tab: u32, force_full_calc: bool) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );

    content.push_str(&format!(
        "\n    <bookViews>\n        <workbookView activeTab=\"{}\"/>\n    </bookViews>",
        active_tab
    ));

    content.push_str("\n    <sheets>");
    for entry in entries {
        let state_attr = if entry.hidden {
            " state=\"hidden\""
        } else {
            ""
        };
        content.push_str(&format!(
            "\n        <sheet name=\"{}\" sheetId=\"{}\"{} r:id=\"{}\"/>",
            escape_xml(&entry.name),
            entry.sheet_id,
            state_attr,
            entry.rid
        ));
    }
    content.push_str("\n    </sheets>");

    if force_full_calc {
        content.push_str("\n    <calcPr fullCalcOnLoad=\"1\"/>");
    }

    content.push_str("\n</workbook>");
    content
}

/// Serialize a .rels part from the maintained relationship list.
pub(crate) fn relationships_xml(rels: &[Relationship]) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for rel in rels {
        content.push_str(&format!(
            "\n    <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>",
            rel.id,
            rel.rel_type,
            escape_xml(&rel.target)
        ));
    }

    content.push_str("\n</Relationships>");
    content
}

/// Serialize [Content_Types].xml for a package built from scratch.
pub(crate) fn content_types_xml(worksheet_parts: &[&str]) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
    );

    for part in worksheet_parts {
        content.push_str(&format!(
            "\n    <Override PartName=\"/{}\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
            part
        ));
    }

    content.push_str("\n</Types>");
    content
}

/// Splice extra worksheet overrides into an existing [Content_Types].xml,
/// preserving everything the original declares.
pub(crate) fn append_content_type_overrides(original: &str, worksheet_parts: &[&str]) -> String {
    let mut additions = String::new();
    for part in worksheet_parts {
        let part_name = format!("/{}", part);
        if original.contains(&format!("PartName=\"{}\"", part_name)) {
            continue;
        }
        additions.push_str(&format!(
            "\n    <Override PartName=\"{}\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
            part_name
        ));
    }

    match original.rfind("</Types>") {
        Some(pos) => {
            let mut patched = String::with_capacity(original.len() + additions.len());
            patched.push_str(&original[..pos]);
            patched.push_str(&additions);
            patched.push('\n');
            patched.push_str(&original[pos..]);
            patched
        }
        None => original.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("DE&HU: <Tag>"), "DE&amp;HU: &lt;Tag&gt;");
    }

    #[test]
    fn test_worksheet_xml_shapes() {
        let columns = vec![ColumnSpec {
            min: 1,
            max: 1,
            width: Some(7.5),
            custom_width: true,
        }];
        let mut row = Row::new(1);
        row.height = Some(40.0);
        row.cells.push(Cell {
            column: 1,
            content: CellContent::Shared(0),
            style: Some(2),
        });
        row.cells.push(Cell {
            column: 2,
            content: CellContent::Empty,
            style: Some(3),
        });
        row.cells.push(Cell {
            column: 3,
            content: CellContent::Number(5.0),
            style: None,
        });
        let merges = vec![RangeRef::parse("A1:B1").unwrap()];

        let xml = worksheet_xml(&columns, &[row], &merges);

        assert!(xml.contains(r#"<col min="1" max="1" width="7.5" customWidth="1"/>"#));
        assert!(xml.contains(r#"<row r="1" ht="40" customHeight="1">"#));
        assert!(xml.contains(r#"<c r="A1" s="2" t="s"><v>0</v></c>"#));
        // Styled empty cells are written so borders render
        assert!(xml.contains(r#"<c r="B1" s="3"/>"#));
        // Integer-valued numbers serialize without a fraction
        assert!(xml.contains(r#"<c r="C1"><v>5</v></c>"#));
        assert!(xml.contains(r#"<mergeCells count="1">"#));
        assert!(xml.contains(r#"<mergeCell ref="A1:B1"/>"#));
        // cols must precede sheetData
        assert!(xml.find("<cols>").unwrap() < xml.find("<sheetData>").unwrap());
        assert!(xml.find("</sheetData>").unwrap() < xml.find("<mergeCells").unwrap());
    }

    #[test]
    fn test_shared_strings_xml() {
        let mut strings = SharedStrings::new();
        strings.get_index("Januar 2024");
        strings.get_index("DE&HU: Neujahr");

        let xml = shared_strings_xml(&strings);
        assert!(xml.contains(r#"count="2" uniqueCount="2""#));
        assert!(xml.contains("<si><t xml:space=\"preserve\">Januar 2024</t></si>"));
        assert!(xml.contains("DE&amp;HU: Neujahr"));
    }

    #[test]
    fn test_append_content_type_overrides() {
        let original = r#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

        let patched = append_content_type_overrides(
            original,
            &["xl/worksheets/sheet1.xml", "xl/worksheets/sheet2.xml"],
        );

        assert_eq!(patched.matches("sheet1.xml").count(), 1);
        assert!(patched.contains("/xl/worksheets/sheet2.xml"));
        assert!(patched.trim_end().ends_with("</Types>"));
    }
}
