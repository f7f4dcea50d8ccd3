//! Reconciliation against `dpi.h` and override hints
//!
//! Struct and union members extracted from the docs must match the header
//! one-for-one, by name and by type with whitespace removed. After that,
//! hints that neither source carries (bit flags, C strings, booleans) are
//! attached from a [`HintTable`].

use crate::diagnostics::{EtchError, EtchResult};
use crate::header::ReferenceModel;
use crate::node::{EntityDef, EntityKind, Hints};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Structs whose documented members are not checked against the header
pub const UNVALIDATED_STRUCTS: &[&str] = &["dpiStringList"];

/// Manually curated hints keyed by `"Type"` or `"Type.member"`
#[derive(Debug, Clone, PartialEq)]
pub struct HintTable {
    entries: IndexMap<String, Hints>,
}

impl Default for HintTable {
    /// The hints used for ODPI-C
    fn default() -> Self {
        let mut table = Self::empty();
        for name in [
            "dpiAuthMode",
            "dpiConnCloseMode",
            "dpiCreateMode",
            "dpiExecMode",
            "dpiJsonOptions",
            "dpiOpCode",
            "dpiPoolCloseMode",
            "dpiSodaFlags",
            "dpiStartupMode",
            "dpiSubscrQOS",
            "dpiVectorFlags",
        ] {
            table.insert(name, "type", "bitflags");
        }
        for member in ["defaultDriverName", "defaultEncoding", "loadErrorUrl"] {
            table.insert(format!("dpiContextCreateParams.{}", member), "type", "c-string");
        }
        for member in ["oracleClientLibDir", "oracleClientConfigDir"] {
            let key = format!("dpiContextCreateParams.{}", member);
            table.insert(key.clone(), "type", "c-string");
            table.insert(key, "encoding", "ansi");
        }
        for member in ["sodaUseJsonDesc", "useJsonId"] {
            table.insert(format!("dpiContextCreateParams.{}", member), "type", "boolean");
        }
        table
    }
}

impl HintTable {
    /// A table without any hints
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add a hint for `"Type"` or `"Type.member"`
    pub fn insert(&mut self, key: impl Into<String>, hint: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .insert(hint.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_hint(
        mut self,
        key: impl Into<String>,
        hint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.insert(key, hint, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Hints> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Remove all whitespace from a C type (`const char *` -> `constchar*`)
pub fn normalize_type(c_type: &str) -> String {
    c_type.chars().filter(|c| !c.is_whitespace()).collect()
}

fn merge_hints(target: &mut Option<Hints>, hints: &Hints) {
    let target = target.get_or_insert_with(Hints::new);
    for (key, value) in hints {
        target.insert(key.clone(), value.clone());
    }
}

/// Validates entities against the header model and attaches hints
pub struct Reconciler<'a> {
    reference: &'a ReferenceModel,
    hints: &'a HintTable,
    unvalidated: Vec<String>,
}

impl<'a> Reconciler<'a> {
    pub fn new(reference: &'a ReferenceModel, hints: &'a HintTable) -> Self {
        Self {
            reference,
            hints,
            unvalidated: UNVALIDATED_STRUCTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the list of structs exempt from validation
    pub fn with_unvalidated<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unvalidated = names.into_iter().map(Into::into).collect();
        self
    }

    /// Check a struct/union against `dpi.h`; other kinds always pass
    pub fn validate(&self, entity: &EntityDef) -> EtchResult<()> {
        if !entity.kind.has_declared_members() || self.unvalidated.contains(&entity.name) {
            return Ok(());
        }
        let declared = self
            .reference
            .struct_members(&entity.name)
            .ok_or_else(|| EtchError::ReferenceGap {
                kind: "struct",
                name: entity.name.clone(),
            })?;
        if entity.members.len() != declared.len() {
            return Err(EtchError::MemberCountMismatch {
                entity: entity.name.clone(),
                documented: entity.members.len(),
                declared: declared.len(),
            });
        }
        for (member, decl) in entity.members.iter().zip(declared) {
            if member.name != decl.name {
                return Err(EtchError::MemberMismatch {
                    entity: entity.name.clone(),
                    field: decl.name.clone(),
                    documented: member.name.clone(),
                    declared: decl.name.clone(),
                });
            }
            let documented = member.c_type.as_deref().unwrap_or_default();
            if normalize_type(documented) != normalize_type(&decl.c_type) {
                return Err(EtchError::MemberMismatch {
                    entity: entity.name.clone(),
                    field: member.name.clone(),
                    documented: documented.to_string(),
                    declared: decl.c_type.clone(),
                });
            }
        }
        Ok(())
    }

    /// Attach entity hints and, for structs/unions, member hints
    pub fn apply_hints(&self, entity: &mut EntityDef) {
        if let Some(hints) = self.hints.get(&entity.name) {
            merge_hints(&mut entity.hints, hints);
        }
        if !entity.kind.has_declared_members() {
            return;
        }
        for member in &mut entity.members {
            let key = format!("{}.{}", entity.name, member.name);
            if let Some(hints) = self.hints.get(&key) {
                merge_hints(&mut member.hints, hints);
            }
        }
    }

    /// Validate every entity, attach hints and fold opaque structs into
    /// same-named structs. Names must be unique after the merge.
    pub fn reconcile(&self, entities: Vec<EntityDef>) -> EtchResult<Vec<EntityDef>> {
        let mut entities = entities;
        for entity in &mut entities {
            self.validate(entity)?;
            self.apply_hints(entity);
        }
        let entities = merge_opaque_structs(entities);
        ensure_unique_names(&entities)?;
        Ok(entities)
    }
}

/// Move the functions of an opaque struct onto the struct of the same name
/// and drop the opaque entry. The struct keeps its position.
pub fn merge_opaque_structs(entities: Vec<EntityDef>) -> Vec<EntityDef> {
    let struct_names: Vec<String> = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Struct)
        .map(|e| e.name.clone())
        .collect();

    let mut moved: IndexMap<String, Vec<_>> = IndexMap::new();
    let mut kept = Vec::with_capacity(entities.len());
    for entity in entities {
        if entity.kind == EntityKind::OpaqueStruct && struct_names.contains(&entity.name) {
            tracing::debug!(
                "Merging {} functions of opaque struct {} into its struct",
                entity.functions.len(),
                entity.name
            );
            moved.entry(entity.name).or_default().extend(entity.functions);
        } else {
            kept.push(entity);
        }
    }

    for entity in &mut kept {
        if entity.kind == EntityKind::Struct {
            if let Some(functions) = moved.shift_remove(&entity.name) {
                entity.functions.extend(functions);
            }
        }
    }
    kept
}

/// Fail on the first name that two entities share
pub fn ensure_unique_names(entities: &[EntityDef]) -> EtchResult<()> {
    let mut seen: HashMap<&str, &EntityDef> = HashMap::with_capacity(entities.len());
    for entity in entities {
        if let Some(first) = seen.insert(&entity.name, entity) {
            return Err(EtchError::DuplicateEntity {
                name: entity.name.clone(),
                first: first.source.clone(),
                second: entity.source.clone(),
            });
        }
    }
    Ok(())
}
