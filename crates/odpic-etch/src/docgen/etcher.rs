//! Etcher - documentation extraction orchestrator
//!
//! Runs the whole pipeline in order and fails on the first inconsistency:
//! 1. Build the reference model from `dpi.h`
//! 2. Read the round-trip table
//! 3. Extract every entity document
//! 4. Validate, apply hints and merge opaque structs
//!
//! `extra_round_trips` in [`EtchConfig`] extends the user guide's round-trip
//! table before extraction. Entries are added to the table, never consulted
//! as a fallback: with the key empty (the default) a function missing from
//! the table still aborts the run.

use super::detect::DocDetector;
use crate::diagnostics::{EtchError, EtchResult};
use crate::extract::Extractor;
use crate::header::ReferenceModel;
use crate::node::EntityDef;
use crate::printer::DocPrinter;
use crate::reconcile::{HintTable, Reconciler};
use crate::round_trips::RoundTripTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input locations for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtchConfig {
    /// Path to `dpi.h`
    pub header: PathBuf,
    /// Root of the Sphinx XML build (`enums/`, `structs/`, ...)
    pub doc_dir: PathBuf,
    /// Rendered round-trip table of the user guide
    pub round_trips: PathBuf,
    /// Entries added to the round-trip table, for functions the user guide
    /// does not list yet. Empty by default.
    pub extra_round_trips: IndexMap<String, String>,
}

impl Default for EtchConfig {
    fn default() -> Self {
        Self {
            header: PathBuf::from("../odpic-sys/odpi/include/dpi.h"),
            doc_dir: PathBuf::from("doc/xml"),
            round_trips: PathBuf::from("doc/xml/user_guide/round_trips.xml"),
            extra_round_trips: IndexMap::new(),
        }
    }
}

impl EtchConfig {
    /// Config with the header and documentation root set; the round-trip
    /// table is expected at `<doc_dir>/user_guide/round_trips.xml`
    pub fn new(header: impl Into<PathBuf>, doc_dir: impl Into<PathBuf>) -> Self {
        let doc_dir = doc_dir.into();
        Self {
            header: header.into(),
            round_trips: doc_dir.join("user_guide").join("round_trips.xml"),
            doc_dir,
            extra_round_trips: IndexMap::new(),
        }
    }

    /// Parse a TOML config; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> EtchResult<Self> {
        toml::from_str(text).map_err(|e| EtchError::config(e.to_string()))
    }

    /// Read a TOML config file
    pub fn from_path(path: &Path) -> EtchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| EtchError::config(format!("{}: {}", path.display(), e)))
    }
}

/// Reconciled entities in output order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiDoc {
    pub entities: Vec<EntityDef>,
}

impl ApiDoc {
    /// Get entity by name
    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// `doc.yaml` text
    pub fn to_yaml(&self) -> String {
        DocPrinter::new(&self.entities).to_string()
    }

    /// Pretty-printed JSON of the same model
    pub fn to_json(&self) -> EtchResult<String> {
        Ok(serde_json::to_string_pretty(&self.entities)?)
    }
}

/// The main documentation extractor
pub struct Etcher {
    config: EtchConfig,
    hints: HintTable,
}

impl Etcher {
    /// Create an etcher using the default ODPI-C hint table
    pub fn new(config: EtchConfig) -> Self {
        Self {
            config,
            hints: HintTable::default(),
        }
    }

    /// Replace the hint table
    pub fn with_hints(mut self, hints: HintTable) -> Self {
        self.hints = hints;
        self
    }

    pub fn config(&self) -> &EtchConfig {
        &self.config
    }

    /// Entity documents that a run would read, in output order
    pub fn discover(&self) -> EtchResult<Vec<PathBuf>> {
        DocDetector::new(&self.config.doc_dir).find_entity_files()
    }

    /// Run the extraction pipeline
    pub fn run(&self) -> EtchResult<ApiDoc> {
        // Step 1: reference model
        let reference = ReferenceModel::from_path(&self.config.header)?;

        // Step 2: round trips
        let mut round_trips = RoundTripTable::from_path(&self.config.round_trips)?;
        for (function, label) in &self.config.extra_round_trips {
            round_trips.insert(function.clone(), label.clone());
        }

        // Step 3: extraction
        let extractor = Extractor::new(&reference, &round_trips);
        let files = self.discover()?;
        tracing::info!(
            "Found {} entity documents in {}",
            files.len(),
            self.config.doc_dir.display()
        );
        let mut entities = Vec::with_capacity(files.len());
        for path in &files {
            if let Some(entity) = extractor.extract_file(&self.config.doc_dir, path)? {
                entities.push(entity);
            }
        }

        // Step 4: reconciliation
        let entities = Reconciler::new(&reference, &self.hints).reconcile(entities)?;
        tracing::info!("Reconciled {} entities", entities.len());

        Ok(ApiDoc { entities })
    }
}
