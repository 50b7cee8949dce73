//! Shared-string table and its deduplication cache
//!
//! The on-disk table's entry order must exactly match the index values
//! handed out by [`SharedStrings::get_index`], so get-or-create only ever
//! appends and never reorders.

use ahash::AHashMap;

/// Deduplicating shared-string table.
///
/// Not thread-safe; the single generation worker is the only writer.
#[derive(Debug, Default)]
pub struct SharedStrings {
    table: Vec<String>,
    index: AHashMap<String, u32>,
}

impl SharedStrings {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the cache over an existing table, enumerating entries in order
    /// so indices match on-disk positions.
    pub fn from_table(table: Vec<String>) -> Self {
        let mut index = AHashMap::with_capacity(table.len());
        for (i, text) in table.iter().enumerate() {
            // First occurrence wins, matching what lookups resolve to
            index.entry(text.clone()).or_insert(i as u32);
        }
        Self { table, index }
    }

    /// Return the index of `text`, appending it to the table if new.
    pub fn get_index(&mut self, text: &str) -> u32 {
        if let Some(&i) = self.index.get(text) {
            return i;
        }
        let i = self.table.len() as u32;
        self.table.push(text.to_string());
        self.index.insert(text.to_string(), i);
        i
    }

    /// Look up an entry by index
    pub fn get(&self, index: u32) -> Option<&str> {
        self.table.get(index as usize).map(|s| s.as_str())
    }

    /// Number of unique entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate entries in table (= index) order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.table.iter().map(|s| s.as_str())
    }
}
