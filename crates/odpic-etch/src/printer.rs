//! `doc.yaml` printer
//!
//! Writes entities in the block layout consumed by the binding generator.
//! Descriptions use `|` block scalars; empty description lines are printed
//! without indentation so paragraph breaks survive.
//!
//! # Example
//!
//! ```
//! use odpic_etch::node::{Desc, EntityDef, EntityKind};
//! use odpic_etch::printer::DocPrinter;
//!
//! let entities = vec![EntityDef::new("dpiConn", EntityKind::OpaqueStruct, Desc::from_lines(["Connection."]))];
//! let text = DocPrinter::new(&entities).to_string();
//! assert!(text.starts_with("- name: dpiConn\n  kind: opaque struct\n"));
//! ```

use crate::node::{Desc, EntityDef, FieldDef, FunctionDef, Hints};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;

/// Prints entities as `doc.yaml` text
pub struct DocPrinter<'a> {
    entities: &'a [EntityDef],
}

impl<'a> DocPrinter<'a> {
    pub fn new(entities: &'a [EntityDef]) -> Self {
        Self { entities }
    }

    /// Write the whole document to `writer`
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{}", self)
    }

    fn format(&self, f: &mut Formatter<'_>) -> FmtResult {
        for entity in self.entities {
            format_entity(f, entity)?;
        }
        Ok(())
    }
}

impl Display for DocPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.format(f)
    }
}

fn format_desc(f: &mut Formatter<'_>, desc: &Desc, indent: &str) -> FmtResult {
    for line in &desc.lines {
        if line.is_empty() {
            writeln!(f)?;
        } else {
            writeln!(f, "{}{}", indent, line)?;
        }
    }
    Ok(())
}

fn format_hints(f: &mut Formatter<'_>, hints: &Option<Hints>, prefix: &str) -> FmtResult {
    if let Some(hints) = hints {
        writeln!(f, "{}  hints:", prefix)?;
        for (key, value) in hints {
            writeln!(f, "{}    {}: {}", prefix, key, value)?;
        }
    }
    Ok(())
}

fn format_entity(f: &mut Formatter<'_>, entity: &EntityDef) -> FmtResult {
    writeln!(f, "- name: {}", entity.name)?;
    writeln!(f, "  kind: {}", entity.kind)?;
    if let Some(underlying) = &entity.underlying_type {
        writeln!(f, "  underlying_type: {}", underlying)?;
    }
    format_hints(f, &entity.hints, "")?;
    writeln!(f, "  desc: |")?;
    format_desc(f, &entity.desc, "    ")?;
    if !entity.members.is_empty() {
        writeln!(f, "  members:")?;
        for member in &entity.members {
            format_field(f, member, "    ")?;
        }
    }
    if !entity.functions.is_empty() {
        writeln!(f, "  functions:")?;
        for function in &entity.functions {
            format_function(f, function)?;
        }
    }
    writeln!(f)
}

fn format_field(f: &mut Formatter<'_>, field: &FieldDef, prefix: &str) -> FmtResult {
    writeln!(f, "{}- name: {}", prefix, field.name)?;
    if let Some(c_type) = &field.c_type {
        writeln!(f, "{}  type: {}", prefix, c_type)?;
    }
    if let Some(mode) = &field.mode {
        writeln!(f, "{}  mode: {}", prefix, mode)?;
    }
    format_hints(f, &field.hints, prefix)?;
    writeln!(f, "{}  desc: |", prefix)?;
    format_desc(f, &field.desc, &format!("{}    ", prefix))
}

fn format_function(f: &mut Formatter<'_>, function: &FunctionDef) -> FmtResult {
    writeln!(f, "    - name: {}", function.name)?;
    writeln!(f, "      desc: |")?;
    format_desc(f, &function.desc, "        ")?;
    writeln!(f, "      round_trips: {}", function.round_trips)?;
    writeln!(f, "      return: {}", function.return_type)?;
    // Printed even without parameters; readers treat the null as empty.
    writeln!(f, "      params:")?;
    for param in &function.params {
        format_field(f, param, "        ")?;
    }
    Ok(())
}
