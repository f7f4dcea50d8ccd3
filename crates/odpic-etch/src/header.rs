//! Reference model built from `dpi.h`
//!
//! This is a line-pattern matcher, not a C parser. It recognizes exactly the
//! shapes ODPI-C uses for enum typedefs and struct/union blocks and silently
//! ignores everything else. Anything it misses shows up later as a
//! reconciliation failure.

use crate::diagnostics::EtchResult;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

lazy_static! {
    /// `typedef uint32_t dpiAuthMode;`
    static ref ENUM_TYPEDEF: Regex = Regex::new(r"^typedef\s+(\w+_t)\s+(\w+);").unwrap();

    /// `struct dpiAppContext {` or `typedef union {`
    static ref BLOCK_OPEN: Regex =
        Regex::new(r"^(?:typedef )?(?:struct|union)\s+(\w*)\s*\{$").unwrap();

    /// `    const char *name;`
    static ref BLOCK_MEMBER: Regex = Regex::new(r"^\s+(.+?)\s*(\w+);$").unwrap();

    /// `};` or `} dpiDataBuffer;`
    static ref BLOCK_CLOSE: Regex = Regex::new(r"^\s*\}\s*(\w*);").unwrap();
}

/// Enum types documented by ODPI-C whose typedef is not in `dpi.h`.
pub const SEEDED_ENUM_TYPES: &[(&str, &str)] =
    &[("dpiJsonOptions", "uint32_t"), ("dpiSodaFlags", "uint32_t")];

/// A struct/union member as declared in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMember {
    /// Declared C type, e.g. `const char *`
    pub c_type: String,
    /// Member name
    pub name: String,
}

impl DeclaredMember {
    pub fn new(c_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            c_type: c_type.into(),
            name: name.into(),
        }
    }
}

/// Ground truth for enum base types and struct/union layouts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceModel {
    enum_underlying_types: HashMap<String, String>,
    struct_member_types: HashMap<String, Vec<DeclaredMember>>,
}

impl ReferenceModel {
    /// Build the model from header text, including [`SEEDED_ENUM_TYPES`].
    pub fn from_header(text: &str) -> Self {
        let mut model = Self::default();
        for (name, c_type) in SEEDED_ENUM_TYPES {
            model
                .enum_underlying_types
                .insert((*name).to_string(), (*c_type).to_string());
        }
        model.scan(text);
        model
    }

    /// Read and scan a header file.
    pub fn from_path(path: &Path) -> EtchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let model = Self::from_header(&text);
        tracing::info!(
            "Parsed {} enum types and {} structs from {}",
            model.enum_underlying_types.len(),
            model.struct_member_types.len(),
            path.display()
        );
        Ok(model)
    }

    fn scan(&mut self, text: &str) {
        // (opening name, members so far) while inside a block
        let mut pending: Option<(String, Vec<DeclaredMember>)> = None;

        for line in text.lines() {
            if let Some(caps) = ENUM_TYPEDEF.captures(line) {
                self.enum_underlying_types
                    .insert(caps[2].to_string(), caps[1].to_string());
            }

            match pending.as_mut() {
                None => {
                    if let Some(caps) = BLOCK_OPEN.captures(line) {
                        pending = Some((caps[1].to_string(), Vec::new()));
                    }
                }
                Some((_, members)) => {
                    if let Some(caps) = BLOCK_MEMBER.captures(line) {
                        members.push(DeclaredMember::new(&caps[1], &caps[2]));
                    } else if let Some(caps) = BLOCK_CLOSE.captures(line) {
                        let closing_name = caps[1].to_string();
                        if let Some((opening_name, members)) = pending.take() {
                            let name = if closing_name.is_empty() {
                                opening_name
                            } else {
                                closing_name
                            };
                            self.struct_member_types.insert(name, members);
                        }
                    }
                }
            }
        }
    }

    /// Underlying integer type of an enum
    pub fn enum_underlying_type(&self, name: &str) -> Option<&str> {
        self.enum_underlying_types.get(name).map(String::as_str)
    }

    /// Declared members of a struct or union, in header order
    pub fn struct_members(&self, name: &str) -> Option<&[DeclaredMember]> {
        self.struct_member_types.get(name).map(Vec::as_slice)
    }

    /// Number of known enum types
    pub fn enum_count(&self) -> usize {
        self.enum_underlying_types.len()
    }

    /// Number of known structs and unions
    pub fn struct_count(&self) -> usize {
        self.struct_member_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\
#include <stdint.h>
typedef uint32_t dpiAuthMode;
typedef uint16_t dpiOracleTypeNum;
typedef struct dpiConn dpiConn;

// forward reference
struct dpiAppContext {
    const char *namespaceName;
    uint32_t namespaceNameLength;
};

typedef union {
    int asBoolean;
    dpiBytes asBytes;
} dpiDataBuffer;

int dpiConn_close(dpiConn *conn, uint32_t mode);
";

    #[test]
    fn test_enum_typedefs() {
        let model = ReferenceModel::from_header(HEADER);
        assert_eq!(model.enum_underlying_type("dpiAuthMode"), Some("uint32_t"));
        assert_eq!(
            model.enum_underlying_type("dpiOracleTypeNum"),
            Some("uint16_t")
        );
        // `struct dpiConn` does not end in `_t`
        assert_eq!(model.enum_underlying_type("dpiConn"), None);
    }

    #[test]
    fn test_seeded_enums() {
        let model = ReferenceModel::from_header("");
        assert_eq!(model.enum_underlying_type("dpiJsonOptions"), Some("uint32_t"));
        assert_eq!(model.enum_underlying_type("dpiSodaFlags"), Some("uint32_t"));
        assert_eq!(model.enum_count(), 2);
        assert_eq!(model.struct_count(), 0);
    }

    #[test]
    fn test_struct_named_at_opening() {
        let model = ReferenceModel::from_header(HEADER);
        assert_eq!(
            model.struct_members("dpiAppContext").unwrap(),
            &[
                DeclaredMember::new("const char *", "namespaceName"),
                DeclaredMember::new("uint32_t", "namespaceNameLength"),
            ]
        );
    }

    #[test]
    fn test_union_named_at_closing() {
        let model = ReferenceModel::from_header(HEADER);
        assert_eq!(
            model.struct_members("dpiDataBuffer").unwrap(),
            &[
                DeclaredMember::new("int", "asBoolean"),
                DeclaredMember::new("dpiBytes", "asBytes"),
            ]
        );
        assert_eq!(model.struct_count(), 2);
    }

    #[test]
    fn test_closing_name_wins() {
        let model = ReferenceModel::from_header(
            "typedef struct dpiInner {\n    int a;\n} dpiOuter;\n",
        );
        assert!(model.struct_members("dpiInner").is_none());
        assert_eq!(model.struct_members("dpiOuter").unwrap().len(), 1);
    }

    #[test]
    fn test_prototypes_outside_blocks_ignored() {
        let model = ReferenceModel::from_header("    int stray;\nvoid f(void);\n");
        assert_eq!(model.struct_count(), 0);
    }

    #[test]
    fn test_unclosed_block_is_dropped() {
        let model = ReferenceModel::from_header("struct dpiBroken {\n    int a;\n");
        assert!(model.struct_members("dpiBroken").is_none());
    }
}
