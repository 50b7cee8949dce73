//! In-memory package of zip parts
//!
//! A package is read fully into memory, mutated part-by-part, and written
//! back in one pass when the owning [`crate::XlsxFile`] is closed.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::XlsxResult;

#[derive(Debug)]
pub(crate) struct Package {
    path: PathBuf,
    parts: BTreeMap<String, Vec<u8>>,
}

impl Package {
    /// Read every entry of the zip container at `path` into memory.
    pub fn read(path: &Path) -> XlsxResult<Self> {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

        let mut parts = BTreeMap::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.insert(name, data);
        }

        Ok(Self {
            path: path.to_path_buf(),
            parts,
        })
    }

    /// Start an empty package destined for `path`.
    ///
    /// The destination is probed immediately so a locked or invalid path
    /// fails here instead of at close time.
    pub fn create(path: &Path) -> XlsxResult<Self> {
        File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            parts: BTreeMap::new(),
        })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(|v| v.as_slice())
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn set_part<S: Into<String>>(&mut self, name: S, data: Vec<u8>) {
        self.parts.insert(name.into(), data);
    }

    /// Write all parts back into the zip container.
    pub fn write(&self) -> XlsxResult<()> {
        let file = File::create(&self.path)?;
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }

        zip.finish()?;
        Ok(())
    }
}
