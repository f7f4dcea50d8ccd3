//! Shared helpers for pipeline tests

#![allow(dead_code)]

use odpic_etch::test::round_trips_document;
use odpic_etch::{EtchConfig, Etcher, HintTable};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Header declaring the entities used across the pipeline tests
pub const HEADER: &str = "\
typedef uint32_t dpiAuthMode;
typedef uint8_t dpiNativeTypeNum;

typedef struct dpiConn dpiConn;
typedef struct dpiExample dpiExample;

struct dpiExample {
    const char *name;
    uint32_t count;
    dpiConn *conn;
};

typedef union {
    int asBoolean;
    double asDouble;
} dpiDataBuffer;
";

/// A documentation tree and header in a temporary directory
pub struct DocTree {
    dir: TempDir,
}

impl DocTree {
    pub fn new() -> Self {
        let tree = Self {
            dir: TempDir::new().unwrap(),
        };
        tree.header(HEADER);
        tree.round_trips(&[]);
        tree
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn doc_dir(&self) -> PathBuf {
        self.path().join("xml")
    }

    /// Replace `dpi.h`
    pub fn header(&self, text: &str) -> &Self {
        fs::write(self.path().join("dpi.h"), text).unwrap();
        self
    }

    /// Write `<doc_dir>/<rel>`
    pub fn file(&self, rel: &str, xml: &str) -> &Self {
        let path = self.doc_dir().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, xml).unwrap();
        self
    }

    /// Replace the round-trip table
    pub fn round_trips(&self, rows: &[(&str, &str)]) -> &Self {
        self.file("user_guide/round_trips.xml", &round_trips_document(rows))
    }

    pub fn config(&self) -> EtchConfig {
        EtchConfig::new(self.path().join("dpi.h"), self.doc_dir())
    }

    /// Etcher without hints
    pub fn etcher(&self) -> Etcher {
        Etcher::new(self.config()).with_hints(HintTable::empty())
    }
}
