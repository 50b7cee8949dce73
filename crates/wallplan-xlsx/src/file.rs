//! The package-level entry point
//!
//! An [`XlsxFile`] is read fully into memory on open and written back in one
//! pass on [`XlsxFile::close`]. Exactly one instance is open per generation
//! run; closing consumes the value, so disposal happens exactly once.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use log::debug;

use crate::error::{XlsxError, XlsxResult};
use crate::package::Package;
use crate::reader::{self, Relationship};
use crate::shared_strings::SharedStrings;
use crate::sheet::{Sheet, Sheets, SHARED_STRINGS_PART};
use crate::writer;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const STYLES_PART: &str = "xl/styles.xml";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const ROOT_RELS_PART: &str = "_rels/.rels";

const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

/// Sheet the active tab points at when present
const PLANNER_SHEET_NAME: &str = "Planner";
/// Sheet hidden from the end user when present
const TEMPLATE_SHEET_NAME: &str = "Template";

/// One `<sheet>` entry of the workbook, as maintained by the engine
#[derive(Debug)]
pub(crate) struct SheetEntry {
    pub name: String,
    pub sheet_id: u32,
    pub rid: String,
    pub part_path: String,
    pub hidden: bool,
}

/// An open spreadsheet package
#[derive(Debug)]
pub struct XlsxFile {
    package: Rc<RefCell<Package>>,
    shared: Rc<RefCell<SharedStrings>>,
    sheets: Sheets,
    entries: Vec<SheetEntry>,
    relationships: Vec<Relationship>,
    active_tab: u32,
    force_full_calc: bool,
    created: bool,
    structure_dirty: bool,
}

impl XlsxFile {
    /// Open an existing package in editable mode.
    ///
    /// Loads the shared-string table and every worksheet, points the active
    /// tab at "Planner" when present, hides "Template" when present, and
    /// flags a full recalculation so volatile template formulas refresh on
    /// next open.
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let package = Package::read(path.as_ref())?;

        let workbook_bytes = package
            .part(WORKBOOK_PART)
            .ok_or_else(|| XlsxError::MissingPart(WORKBOOK_PART.into()))?
            .to_vec();
        let sheet_refs = reader::parse_workbook(&workbook_bytes)?;

        let rels_bytes = package
            .part(WORKBOOK_RELS_PART)
            .ok_or_else(|| XlsxError::MissingPart(WORKBOOK_RELS_PART.into()))?
            .to_vec();
        let relationships = reader::parse_relationships(&rels_bytes)?;

        let shared_bytes = package
            .part(SHARED_STRINGS_PART)
            .ok_or_else(|| XlsxError::MissingPart(SHARED_STRINGS_PART.into()))?
            .to_vec();
        let shared = SharedStrings::from_table(reader::parse_shared_strings(&shared_bytes)?);

        let package = Rc::new(RefCell::new(package));
        let shared = Rc::new(RefCell::new(shared));

        let mut sheets = Sheets::default();
        let mut entries = Vec::with_capacity(sheet_refs.len());
        for (i, sheet_ref) in sheet_refs.into_iter().enumerate() {
            let target = relationships
                .iter()
                .find(|r| r.id == sheet_ref.rid)
                .map(|r| r.target.clone())
                .ok_or_else(|| {
                    XlsxError::InvalidFormat(format!(
                        "sheet '{}' references unknown relationship {}",
                        sheet_ref.name, sheet_ref.rid
                    ))
                })?;
            let part_path = normalize_target(&target);

            let sheet = Sheet::from_part(
                sheet_ref.name.clone(),
                part_path.clone(),
                Rc::clone(&package),
                Rc::clone(&shared),
                i == 0,
            )?;
            sheets.push(sheet);
            entries.push(SheetEntry {
                name: sheet_ref.name,
                sheet_id: sheet_ref.sheet_id,
                rid: sheet_ref.rid,
                part_path,
                hidden: sheet_ref.hidden,
            });
        }

        debug!("opened package with {} sheet(s)", entries.len());

        let mut file = Self {
            package,
            shared,
            sheets,
            entries,
            relationships,
            active_tab: 0,
            force_full_calc: true,
            created: false,
            structure_dirty: false,
        };

        if let Some(i) = file
            .entries
            .iter()
            .position(|e| e.name == PLANNER_SHEET_NAME)
        {
            file.active_tab = i as u32;
        }
        if let Some(entry) = file
            .entries
            .iter_mut()
            .find(|e| e.name == TEMPLATE_SHEET_NAME)
        {
            entry.hidden = true;
        }

        file.flush_workbook();
        Ok(file)
    }

    /// Initialize an empty package destined for `path`: empty sheet list,
    /// empty shared-string table, empty stylesheet.
    pub fn create<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let mut package = Package::create(path.as_ref())?;
        package.set_part(STYLES_PART, writer::EMPTY_STYLESHEET_XML.as_bytes().to_vec());

        let relationships = vec![Relationship {
            id: "rId1".to_string(),
            rel_type: REL_STYLES.to_string(),
            target: "styles.xml".to_string(),
        }];

        Ok(Self {
            package: Rc::new(RefCell::new(package)),
            shared: Rc::new(RefCell::new(SharedStrings::new())),
            sheets: Sheets::default(),
            entries: Vec::new(),
            relationships,
            active_tab: 0,
            force_full_calc: false,
            created: true,
            structure_dirty: true,
        })
    }

    /// The sheets of this package
    pub fn sheets(&self) -> &Sheets {
        &self.sheets
    }

    /// Index of the sheet the workbook view opens on
    pub fn active_tab(&self) -> u32 {
        self.active_tab
    }

    /// Whether the named sheet is hidden from the end user
    pub fn sheet_hidden(&self, name: &str) -> Option<bool> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.hidden)
    }

    /// The sheets of this package, mutably
    pub fn sheets_mut(&mut self) -> &mut Sheets {
        &mut self.sheets
    }

    /// Add a new empty worksheet and return it for filling.
    pub fn add_sheet(&mut self, name: &str) -> XlsxResult<&mut Sheet> {
        if self.sheets.by_name(name).is_some() {
            return Err(XlsxError::InvalidFormat(format!(
                "sheet '{}' already exists",
                name
            )));
        }

        let (sheet_id, part_path, target) = self.next_sheet_slot();
        let rid = self.next_rid();
        self.relationships.push(Relationship {
            id: rid.clone(),
            rel_type: REL_WORKSHEET.to_string(),
            target,
        });

        let owns_shared_strings = self.sheets.is_empty();
        let sheet = Sheet::new_empty(
            name.to_string(),
            part_path.clone(),
            Rc::clone(&self.package),
            Rc::clone(&self.shared),
            owns_shared_strings,
        );
        self.sheets.push(sheet);
        self.entries.push(SheetEntry {
            name: name.to_string(),
            sheet_id,
            rid,
            part_path,
            hidden: false,
        });
        self.structure_dirty = true;

        Ok(self.sheets.by_name_mut(name).expect("sheet just added"))
    }

    /// Deep-copy a sheet's worksheet part into a new part under this
    /// workbook, with a fresh sheet id and the given name.
    pub fn clone_sheet(&mut self, source_name: &str, new_name: &str) -> XlsxResult<()> {
        if self.sheets.by_name(new_name).is_some() {
            return Err(XlsxError::InvalidFormat(format!(
                "sheet '{}' already exists",
                new_name
            )));
        }

        let source = self
            .sheets
            .by_name_mut(source_name)
            .ok_or_else(|| XlsxError::InvalidFormat(format!("sheet '{}' not found", source_name)))?;
        if source.is_dirty() {
            source.save();
        }
        let source_part = source.part_path().to_string();

        let bytes = self
            .package
            .borrow()
            .part(&source_part)
            .map(|b| b.to_vec())
            .ok_or_else(|| XlsxError::MissingPart(source_part.clone()))?;

        let (sheet_id, part_path, target) = self.next_sheet_slot();
        self.package
            .borrow_mut()
            .set_part(part_path.clone(), bytes);

        let rid = self.next_rid();
        self.relationships.push(Relationship {
            id: rid.clone(),
            rel_type: REL_WORKSHEET.to_string(),
            target,
        });

        let sheet = Sheet::from_part(
            new_name.to_string(),
            part_path.clone(),
            Rc::clone(&self.package),
            Rc::clone(&self.shared),
            false,
        )?;
        self.sheets.push(sheet);
        self.entries.push(SheetEntry {
            name: new_name.to_string(),
            sheet_id,
            rid,
            part_path,
            hidden: false,
        });
        self.structure_dirty = true;

        Ok(())
    }

    /// Flush unsaved state and write the package back to disk. Must run
    /// before any external consumer (file browser, spreadsheet reader)
    /// touches the destination.
    pub fn close(mut self) -> XlsxResult<()> {
        for sheet in self.sheets.iter_mut() {
            if sheet.is_dirty() {
                sheet.save();
            }
        }

        // Rewritten unconditionally: sheets that do not own the table may
        // still have appended entries to it
        let shared_xml = writer::shared_strings_xml(&self.shared.borrow());
        self.package
            .borrow_mut()
            .set_part(SHARED_STRINGS_PART, shared_xml.into_bytes());
        self.ensure_relationship(REL_SHARED_STRINGS, "sharedStrings.xml");

        self.flush_workbook();
        let rels_xml = writer::relationships_xml(&self.relationships);
        self.package
            .borrow_mut()
            .set_part(WORKBOOK_RELS_PART, rels_xml.into_bytes());

        let worksheet_parts: Vec<&str> = self.entries.iter().map(|e| e.part_path.as_str()).collect();
        if self.created {
            let content_types = writer::content_types_xml(&worksheet_parts);
            let mut package = self.package.borrow_mut();
            package.set_part(CONTENT_TYPES_PART, content_types.into_bytes());
            package.set_part(ROOT_RELS_PART, writer::ROOT_RELS_XML.as_bytes().to_vec());
        } else if self.structure_dirty {
            let original = self
                .package
                .borrow()
                .part(CONTENT_TYPES_PART)
                .map(|b| String::from_utf8_lossy(b).into_owned());
            if let Some(original) = original {
                let patched = writer::append_content_type_overrides(&original, &worksheet_parts);
                self.package
                    .borrow_mut()
                    .set_part(CONTENT_TYPES_PART, patched.into_bytes());
            }
        }

        debug!("writing package with {} sheet(s)", self.entries.len());
        self.package.borrow().write()
    }

    fn flush_workbook(&self) {
        let xml = writer::workbook_xml(&self.entries, self.active_tab, self.force_full_calc);
        self.package
            .borrow_mut()
            .set_part(WORKBOOK_PART, xml.into_bytes());
    }

    fn ensure_relationship(&mut self, rel_type: &str, target: &str) {
        if self.relationships.iter().any(|r| r.rel_type == rel_type) {
            return;
        }
        let id = self.next_rid();
        self.relationships.push(Relationship {
            id,
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
    }

    /// Next free sheet id, worksheet part path and relationship target
    fn next_sheet_slot(&self) -> (u32, String, String) {
        let mut sheet_id = self.entries.iter().map(|e| e.sheet_id).max().unwrap_or(0) + 1;
        loop {
            let part_path = format!("xl/worksheets/sheet{}.xml", sheet_id);
            let taken = self.package.borrow().has_part(&part_path)
                || self.entries.iter().any(|e| e.part_path == part_path);
            if !taken {
                let target = format!("worksheets/sheet{}.xml", sheet_id);
                return (sheet_id, part_path, target);
            }
            sheet_id += 1;
        }
    }

    fn next_rid(&self) -> String {
        let max = self
            .relationships
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()))
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }
}

/// Relationship targets are relative to xl/ unless rooted.
fn normalize_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(rooted) => rooted.to_string(),
        None => format!("xl/{}", target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_target() {
        assert_eq!(
            normalize_target("worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            normalize_target("/xl/worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
    }
}
