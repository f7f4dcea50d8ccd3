//! odpic-etch - extract ODPI-C documentation into doc.yaml
//!
//! ```text
//! odpic-etch [--config <file>] [--header <dpi.h>] [--doc-dir <dir>]
//!            [--round-trips <file>] [--format yaml|json] [--output <file>]
//! ```
//!
//! Logging goes to stderr and is controlled by `ODPIC_ETCH_LOG`
//! (default `warn`), so stdout carries only the generated document.

mod docs;

use anyhow::Result;
use std::env;

fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_env("ODPIC_ETCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    docs::run(&args)
}
