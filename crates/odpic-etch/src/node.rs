//! Documentation model
//!
//! One [`EntityDef`] per documented ODPI-C type. Enum values and struct
//! fields are [`FieldDef`]s; each function of an opaque struct is a
//! [`FunctionDef`] whose parameters are again [`FieldDef`]s.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Override hints (`type: bitflags`, `encoding: ansi`, ...) in insertion order
pub type Hints = IndexMap<String, String>;

/// Rendered description: one entry per output line, `""` separating paragraphs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Desc {
    pub lines: Vec<String>,
}

impl Desc {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Build from a single line per item
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl Serialize for Desc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text())
    }
}

/// Kind of documented entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "struct")]
    Struct,
    #[serde(rename = "union")]
    Union,
    /// A handle type documented only through its functions
    #[serde(rename = "opaque struct")]
    OpaqueStruct,
}

impl EntityKind {
    /// Map the singular of a documentation directory (`enums` -> `enum`)
    pub fn from_doc_dir(kind: &str) -> Option<Self> {
        match kind {
            "enum" => Some(EntityKind::Enum),
            "struct" => Some(EntityKind::Struct),
            "union" => Some(EntityKind::Union),
            "function" => Some(EntityKind::OpaqueStruct),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Enum => "enum",
            EntityKind::Struct => "struct",
            EntityKind::Union => "union",
            EntityKind::OpaqueStruct => "opaque struct",
        }
    }

    /// Whether members are checked against `dpi.h`
    pub fn has_declared_members(&self) -> bool {
        matches!(self, EntityKind::Struct | EntityKind::Union)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An enum value, struct/union field or function parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub c_type: Option<String>,

    /// Parameter direction as written in the docs (`IN`, `OUT`, `IN/OUT`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Hints>,

    pub desc: Desc,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, desc: Desc) -> Self {
        Self {
            name: name.into(),
            c_type: None,
            mode: None,
            hints: None,
            desc,
        }
    }

    /// Set the C type
    pub fn with_type(mut self, c_type: impl Into<String>) -> Self {
        self.c_type = Some(c_type.into());
        self
    }

    /// Set the parameter mode
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }
}

/// A documented library function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub desc: Desc,
    /// Label from the round-trip table (`Yes`, `No`, `Maybe`)
    pub round_trips: String,
    #[serde(rename = "return")]
    pub return_type: String,
    pub params: Vec<FieldDef>,
}

/// A documented enum, struct, union or opaque struct
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDef {
    pub name: String,
    pub kind: EntityKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Hints>,

    pub desc: Desc,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<FieldDef>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionDef>,

    /// Documentation file relative to the doc root; defines output order
    #[serde(skip)]
    pub source: PathBuf,
}

impl EntityDef {
    pub fn new(name: impl Into<String>, kind: EntityKind, desc: Desc) -> Self {
        Self {
            name: name.into(),
            kind,
            underlying_type: None,
            hints: None,
            desc,
            members: vec![],
            functions: vec![],
            source: PathBuf::new(),
        }
    }

    /// Set the source file
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = source.into();
        self
    }

    /// Get member by name
    pub fn member(&self, name: &str) -> Option<&FieldDef> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Get function by name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }
}
