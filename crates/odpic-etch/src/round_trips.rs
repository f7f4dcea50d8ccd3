//! Round-trip classification table
//!
//! ODPI-C's user guide lists, per function, whether calling it requires a
//! round trip to the database (`Yes`, `No`, `Maybe`). The table is read from
//! the rendered `user_guide/round_trips.xml` and looked up by exact name.

use crate::diagnostics::{EtchError, EtchResult};
use crate::xml::{self, Element};
use std::collections::HashMap;
use std::path::Path;

/// Function name -> round-trip label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundTripTable {
    entries: HashMap<String, String>,
}

impl RoundTripTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `(function, label)` from every `tbody/row` below `root`.
    ///
    /// The first cell reads like `dpiConn_close()`; trailing parentheses are
    /// dropped. A row with fewer than two cells is malformed.
    pub fn from_element(root: &Element, source: &Path) -> EtchResult<Self> {
        let mut table = Self::new();
        for row in root.table_rows() {
            let entries: Vec<&Element> = row.children_named("entry").collect();
            if entries.len() < 2 {
                return Err(EtchError::malformed(
                    source,
                    format!("round-trip row with {} cells", entries.len()),
                ));
            }
            let name = entries[0]
                .text_content()
                .trim()
                .trim_end_matches(['(', ')'])
                .to_string();
            let label = entries[1].text_content().trim().to_string();
            table.entries.insert(name, label);
        }
        Ok(table)
    }

    /// Parse the table from XML text; `source` names it in errors
    pub fn from_xml_str(xml: &str, source: &Path) -> EtchResult<Self> {
        match xml::parse_str(xml)? {
            Some(root) => Self::from_element(&root, source),
            None => Ok(Self::new()),
        }
    }

    /// Read the table from a file
    pub fn from_path(path: &Path) -> EtchResult<Self> {
        let root = xml::parse_file(path)?
            .ok_or_else(|| EtchError::malformed(path, "empty round-trip document"))?;
        let table = Self::from_element(&root, path)?;
        tracing::info!(
            "Read {} round-trip entries from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Add or replace an entry
    pub fn insert(&mut self, function: impl Into<String>, label: impl Into<String>) {
        self.entries.insert(function.into(), label.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_entry(mut self, function: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(function, label);
        self
    }

    /// Label for a function, if listed
    pub fn get(&self, function: &str) -> Option<&str> {
        self.entries.get(function).map(String::as_str)
    }

    /// Label for a function; unlisted functions are an error
    pub fn lookup(&self, function: &str) -> EtchResult<&str> {
        self.get(function).ok_or_else(|| EtchError::LookupMiss {
            function: function.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
