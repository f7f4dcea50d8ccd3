//! odpic-etch: Documentation extractor for ODPI-C
//!
//! This crate turns the Sphinx XML build of the ODPI-C reference manual into
//! `doc.yaml`, the description source for generated bindings. On the way it
//! cross-checks every documented struct against `dpi.h` and stops at the
//! first disagreement, so stale docs never reach the bindings.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────┐   ┌────────────────────┐
//! │   dpi.h     │   │ enums/ structs/  │   │ user_guide/        │
//! │ (regex scan)│   │ unions/ functions│   │ round_trips.xml    │
//! └──────┬──────┘   └────────┬─────────┘   └─────────┬──────────┘
//!        │                   ▼                       │
//!        │           ┌──────────────┐                │
//!        ├──────────►│  Extractor   │◄───────────────┘
//!        │           └──────┬───────┘
//!        │                  ▼
//!        │           ┌──────────────┐   ┌───────────┐
//!        └──────────►│  Reconciler  │◄──│ HintTable │
//!                    └──────┬───────┘   └───────────┘
//!                           ▼
//!                    ┌──────────────┐
//!                    │  DocPrinter  │──► doc.yaml
//!                    └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use odpic_etch::{EtchConfig, Etcher};
//!
//! let doc = Etcher::new(EtchConfig::new("odpi/include/dpi.h", "doc/xml"))
//!     .run()
//!     .expect("documentation is inconsistent with dpi.h");
//! print!("{}", doc.to_yaml());
//! ```

// Core types
pub mod diagnostics;
pub mod node;

// Inputs
pub mod header;
pub mod round_trips;
pub mod xml;

// Pipeline stages
pub mod extract;
pub mod reconcile;
pub mod render;

// Output
pub mod catalog;
pub mod printer;

pub mod docgen;

// Re-exports for convenience
pub use catalog::OdpicDoc;
pub use diagnostics::{EtchError, EtchResult};
pub use docgen::{ApiDoc, DocDetector, EtchConfig, Etcher};
pub use extract::Extractor;
pub use header::ReferenceModel;
pub use node::{Desc, EntityDef, EntityKind, FieldDef, FunctionDef, Hints};
pub use printer::DocPrinter;
pub use reconcile::{HintTable, Reconciler};
pub use round_trips::RoundTripTable;
