//! End-to-end tests for the package engine (create -> save -> reopen)

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use wallplan_core::{CellRef, RangeRef};
use wallplan_xlsx::{CellValue, XlsxFile};

fn cell(s: &str) -> CellRef {
    CellRef::parse(s).unwrap()
}

#[test]
fn test_create_fill_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roundtrip.xlsx");

    let mut file = XlsxFile::create(&path).unwrap();
    {
        let sheet = file.add_sheet("Planner").unwrap();
        sheet.set_value(cell("A1"), CellValue::shared("Januar 2024", Some(1)));
        sheet.set_value(cell("B2"), CellValue::integer(42, None));
        sheet.set_value(cell("C3"), CellValue::empty(Some(5)));
        sheet.set_value(cell("D1"), CellValue::shared("Sonderzeichen <&>", None));
        sheet.set_column_width(1, 9.5);
        sheet.set_row_height(1, 350.0);
        sheet.merge(RangeRef::parse("A1:D2").unwrap());
        sheet.save();
    }
    file.close().unwrap();

    let reopened = XlsxFile::open(&path).unwrap();
    let sheet = reopened.sheets().by_name("Planner").unwrap();

    assert_eq!(sheet.cell_text(cell("A1")).as_deref(), Some("Januar 2024"));
    assert_eq!(sheet.cell_style_index(cell("A1")), Some(1));
    assert_eq!(sheet.try_get_double(cell("B2")), Some(42.0));
    assert_eq!(sheet.cell_text(cell("B2")), None);
    // Styled empty cells survive the roundtrip, so borders keep rendering
    assert_eq!(sheet.cell_style_index(cell("C3")), Some(5));
    assert_eq!(
        sheet.cell_text(cell("D1")).as_deref(),
        Some("Sonderzeichen <&>")
    );
    assert_eq!(sheet.merged_cells().len(), 1);
    assert_eq!(sheet.merged_cells()[0].to_string(), "A1:D2");
}

#[test]
fn test_shared_strings_deduplicate_across_cells() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dedup.xlsx");

    let mut file = XlsxFile::create(&path).unwrap();
    {
        let sheet = file.add_sheet("Data").unwrap();
        for row in 1..=20 {
            sheet.set_value(CellRef::new(1, row), CellValue::shared("Mo", None));
        }
        sheet.save();
    }
    file.close().unwrap();

    let reopened = XlsxFile::open(&path).unwrap();
    let sheet = reopened.sheets().by_name("Data").unwrap();
    for row in 1..=20 {
        assert_eq!(sheet.cell_text(CellRef::new(1, row)).as_deref(), Some("Mo"));
    }
}

#[test]
fn test_open_activates_planner_and_hides_template() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tabs.xlsx");

    let mut file = XlsxFile::create(&path).unwrap();
    file.add_sheet("Template").unwrap();
    file.add_sheet("Planner").unwrap();
    file.close().unwrap();

    let reopened = XlsxFile::open(&path).unwrap();
    assert_eq!(reopened.active_tab(), 1);
    assert_eq!(reopened.sheet_hidden("Template"), Some(true));
    assert_eq!(reopened.sheet_hidden("Planner"), Some(false));

    // The hidden state is persisted by close and visible on the next open
    reopened.close().unwrap();
    let third = XlsxFile::open(&path).unwrap();
    assert_eq!(third.sheet_hidden("Template"), Some(true));
}

#[test]
fn test_clone_sheet_copies_contents_under_fresh_id() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clone.xlsx");

    let mut file = XlsxFile::create(&path).unwrap();
    {
        let sheet = file.add_sheet("Template").unwrap();
        sheet.set_value(cell("B3"), CellValue::shared("vorlage", Some(9)));
        sheet.merge(RangeRef::parse("A1:B1").unwrap());
    }
    file.clone_sheet("Template", "Planner").unwrap();

    {
        let copy = file.sheets().by_name("Planner").unwrap();
        assert_eq!(copy.cell_text(cell("B3")).as_deref(), Some("vorlage"));
        assert_eq!(copy.cell_style_index(cell("B3")), Some(9));
        assert_eq!(copy.merged_cells().len(), 1);
    }

    // Mutating the copy leaves the source untouched
    file.sheets_mut()
        .by_name_mut("Planner")
        .unwrap()
        .set_value(cell("B3"), CellValue::shared("kopie", None));
    assert_eq!(
        file.sheets()
            .by_name("Template")
            .unwrap()
            .cell_text(cell("B3"))
            .as_deref(),
        Some("vorlage")
    );

    file.close().unwrap();

    let reopened = XlsxFile::open(&path).unwrap();
    assert_eq!(reopened.sheets().len(), 2);
    assert_eq!(
        reopened
            .sheets()
            .by_name("Planner")
            .unwrap()
            .cell_text(cell("B3"))
            .as_deref(),
        Some("kopie")
    );
}

#[test]
fn test_open_missing_file_fails_cleanly() {
    let dir = tempdir().unwrap();
    assert!(XlsxFile::open(dir.path().join("does-not-exist.xlsx")).is_err());
}

#[test]
fn test_open_non_package_fails_cleanly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("not-a-package.xlsx");
    std::fs::write(&path, b"plain text, not a zip").unwrap();
    assert!(XlsxFile::open(&path).is_err());
}

#[test]
fn test_create_on_invalid_path_fails_at_create_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing-subdir").join("out.xlsx");
    assert!(XlsxFile::create(&path).is_err());
}
