//! Error types
//!
//! Every inconsistency between the documentation tree and `dpi.h` is a
//! defect in the inputs, so all of them surface as an [`EtchError`] and abort
//! the run. Nothing is downgraded to a warning.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for odpic-etch operations
pub type EtchResult<T> = Result<T, EtchError>;

/// Main error type for odpic-etch
#[derive(Debug, Error)]
pub enum EtchError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error below the documentation root
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// XML syntax error in a documentation file
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// YAML error while reading a generated document back
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A name referenced by the docs has no entry in the header model
    #[error("{kind} {name} is not declared in dpi.h")]
    ReferenceGap { kind: &'static str, name: String },

    /// Parameter table disagrees with the parsed function signature
    #[error("parameter table mismatch in {function}: {message}")]
    ShapeMismatch { function: String, message: String },

    /// Documented member count differs from dpi.h
    #[error("{documented} != {declared} members for struct {entity}")]
    MemberCountMismatch {
        entity: String,
        documented: usize,
        declared: usize,
    },

    /// Documented member name or type differs from dpi.h
    #[error("mismatched member {field} of struct {entity}: '{documented}' != '{declared}'")]
    MemberMismatch {
        entity: String,
        field: String,
        documented: String,
        declared: String,
    },

    /// Two output entities share a name
    #[error("{name} is documented twice: {} and {}", first.display(), second.display())]
    DuplicateEntity {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Function absent from the round-trip table
    #[error("{function} is not listed in the round-trip table")]
    LookupMiss { function: String },

    /// Expected markup is missing from a documentation file
    #[error("malformed documentation in {}: {message}", file.display())]
    Malformed { file: PathBuf, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EtchError {
    /// Create a malformed-input error
    pub fn malformed(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        EtchError::Malformed {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape(function: impl Into<String>, message: impl Into<String>) -> Self {
        EtchError::ShapeMismatch {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        EtchError::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_mismatch_message() {
        let err = EtchError::MemberMismatch {
            entity: "dpiExample".into(),
            field: "count".into(),
            documented: "int".into(),
            declared: "uint32_t".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dpiExample"));
        assert!(msg.contains("count"));
        assert!(msg.contains("'int' != 'uint32_t'"));
    }

    #[test]
    fn test_malformed_names_file() {
        let err = EtchError::malformed("structs/dpiFoo.xml", "missing desc_content");
        assert!(err.to_string().contains("structs/dpiFoo.xml"));
        assert!(err.to_string().contains("missing desc_content"));
    }
}
