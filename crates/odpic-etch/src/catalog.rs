//! Typed reader for generated `doc.yaml`
//!
//! The binding generator reads the printer's output back to attach
//! documentation to generated items. [`OdpicDoc`] parses it into typed records
//! and indexes descriptions, round-trip labels and enum value types by name.

use crate::diagnostics::EtchResult;
use crate::node::Hints;
use serde::{Deserialize, Deserializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

/// Parameter direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Mode {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
    #[serde(rename = "IN/OUT")]
    InOut,
}

/// Integer type backing an enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum UnderlyingType {
    #[serde(rename = "uint8_t")]
    Uint8,
    #[serde(rename = "uint16_t")]
    Uint16,
    #[serde(rename = "uint32_t")]
    Uint32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DataKind {
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "struct")]
    Struct,
    #[serde(rename = "union")]
    Union,
    #[serde(rename = "opaque struct")]
    OpaqueStruct,
}

/// Whether a function call needs a round trip to the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RoundTrips {
    Yes,
    No,
    Maybe,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(rename = "type", default)]
    pub c_type: Option<String>,
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub hints: Option<Hints>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub round_trips: RoundTrips,
    #[serde(rename = "return")]
    pub return_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Vec<MemberRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataTypeRecord {
    pub name: String,
    pub kind: DataKind,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub underlying_type: Option<UnderlyingType>,
    #[serde(default)]
    pub hints: Option<Hints>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub members: Vec<MemberRecord>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub functions: Vec<FunctionRecord>,
}

/// `params:` with nothing after it is a YAML null
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parsed `doc.yaml` with lookup indices
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct OdpicDoc {
    pub data_types: Vec<DataTypeRecord>,
    /// Function name -> round-trip label
    pub round_trips_map: HashMap<String, RoundTrips>,
    /// Enum value name -> underlying type of its enum
    pub underlying_type_map: HashMap<String, UnderlyingType>,
    /// Entity, enum value, `Struct::field` or function name -> description
    pub name_to_desc: HashMap<String, String>,
}

impl OdpicDoc {
    /// Build indices over already parsed records
    pub fn new(data_types: Vec<DataTypeRecord>) -> Self {
        let mut round_trips_map = HashMap::new();
        let mut underlying_type_map = HashMap::new();
        let mut name_to_desc = HashMap::new();

        for dt in &data_types {
            name_to_desc.insert(dt.name.clone(), dt.desc.clone());
            if let Some(underlying) = dt.underlying_type {
                for member in &dt.members {
                    underlying_type_map.insert(member.name.clone(), underlying);
                }
            }
            match dt.kind {
                DataKind::Enum => {
                    for member in &dt.members {
                        name_to_desc.insert(member.name.clone(), member.desc.clone());
                    }
                }
                DataKind::Struct | DataKind::Union => {
                    for member in &dt.members {
                        name_to_desc.insert(
                            format!("{}::{}", dt.name, member.name),
                            member.desc.clone(),
                        );
                    }
                }
                DataKind::OpaqueStruct => {}
            }
            for function in &dt.functions {
                round_trips_map.insert(function.name.clone(), function.round_trips);
                name_to_desc.insert(function.name.clone(), function.desc.clone());
            }
        }

        Self {
            data_types,
            round_trips_map,
            underlying_type_map,
            name_to_desc,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> EtchResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::new(Vec::new()));
        }
        let data_types: Option<Vec<DataTypeRecord>> = serde_yaml::from_str(yaml)?;
        Ok(Self::new(data_types.unwrap_or_default()))
    }

    pub fn from_path(path: &Path) -> EtchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn find_desc<Q>(&self, name: &Q) -> Option<&str>
    where
        String: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.name_to_desc.get(name).map(String::as_str)
    }

    pub fn find_underlying_type<Q>(&self, name: &Q) -> Option<UnderlyingType>
    where
        String: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.underlying_type_map.get(name).copied()
    }

    pub fn round_trips<Q>(&self, name: &Q) -> Option<RoundTrips>
    where
        String: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.round_trips_map.get(name).copied()
    }

    /// Get a data type by name
    pub fn data_type(&self, name: &str) -> Option<&DataTypeRecord> {
        self.data_types.iter().find(|dt| dt.name == name)
    }
}
