//! Documentation generation pipeline
//!
//! [`Etcher`] drives a full run: read `dpi.h` and the round-trip table,
//! discover entity documents with [`DocDetector`], extract, reconcile and
//! hand back an [`ApiDoc`] ready to print.

mod detect;
mod etcher;

pub use detect::DocDetector;
pub use etcher::{ApiDoc, EtchConfig, Etcher};
