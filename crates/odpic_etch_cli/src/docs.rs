//! The extraction command
//!
//! Flags override values from the optional `--config` TOML file, which in
//! turn override the built-in defaults.

use anyhow::{bail, Context, Result};
use odpic_etch::{EtchConfig, Etcher};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

const USAGE: &str = "\
Usage: odpic-etch [OPTIONS]

Options:
  -c, --config <file>        TOML file with header/doc_dir/round_trips/extra_round_trips
      --header <file>        Path to dpi.h
  -d, --doc-dir <dir>        Root of the Sphinx XML build
      --round-trips <file>   Rendered round-trip table
  -f, --format <format>      yaml (default) or json
  -o, --output <file>        Write to a file instead of stdout
  -h, --help                 Print this help";

/// Run the extraction command with the given arguments
pub fn run(args: &[String]) -> Result<()> {
    let cmd = DocsCommand::parse(args)?;
    if cmd.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = cmd.config()?;
    tracing::debug!("Using {:?}", config);

    // Nothing is written unless the whole run succeeds.
    let doc = Etcher::new(config).run()?;
    let text = match cmd.format {
        OutputFormat::Yaml => doc.to_yaml(),
        OutputFormat::Json => doc.to_json()? + "\n",
    };

    match &cmd.output {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Command configuration
#[derive(Debug, Default)]
struct DocsCommand {
    /// TOML config file
    config: Option<PathBuf>,
    header: Option<PathBuf>,
    doc_dir: Option<PathBuf>,
    round_trips: Option<PathBuf>,
    format: OutputFormat,
    /// Output file; stdout when absent
    output: Option<PathBuf>,
    help: bool,
}

fn flag_value<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    match args.get(i + 1) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} requires a value", name),
    }
}

impl DocsCommand {
    fn parse(args: &[String]) -> Result<Self> {
        let mut cmd = DocsCommand::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    cmd.config = Some(PathBuf::from(flag_value(args, i, "--config")?));
                    i += 2;
                }
                "--header" => {
                    cmd.header = Some(PathBuf::from(flag_value(args, i, "--header")?));
                    i += 2;
                }
                "--doc-dir" | "-d" => {
                    cmd.doc_dir = Some(PathBuf::from(flag_value(args, i, "--doc-dir")?));
                    i += 2;
                }
                "--round-trips" => {
                    cmd.round_trips = Some(PathBuf::from(flag_value(args, i, "--round-trips")?));
                    i += 2;
                }
                "--format" | "-f" => {
                    cmd.format = match flag_value(args, i, "--format (yaml or json)")? {
                        "yaml" => OutputFormat::Yaml,
                        "json" => OutputFormat::Json,
                        other => bail!("Unknown format: {} (expected yaml or json)", other),
                    };
                    i += 2;
                }
                "--output" | "-o" => {
                    cmd.output = Some(PathBuf::from(flag_value(args, i, "--output")?));
                    i += 2;
                }
                "--help" | "-h" => {
                    cmd.help = true;
                    i += 1;
                }
                _ => {
                    bail!("Unknown flag: {}\n\n{}", args[i], USAGE);
                }
            }
        }

        Ok(cmd)
    }

    /// Defaults, then the config file, then flags
    fn config(&self) -> Result<EtchConfig> {
        let mut config = match &self.config {
            Some(path) => EtchConfig::from_path(path)?,
            None => EtchConfig::default(),
        };
        if let Some(header) = &self.header {
            config.header = header.clone();
        }
        if let Some(doc_dir) = &self.doc_dir {
            config.doc_dir = doc_dir.clone();
            if self.round_trips.is_none() && self.config.is_none() {
                config.round_trips = doc_dir.join("user_guide").join("round_trips.xml");
            }
        }
        if let Some(round_trips) = &self.round_trips {
            config.round_trips = round_trips.clone();
        }
        Ok(config)
    }
}
