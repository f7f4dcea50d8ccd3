//! Entity extraction from documentation files
//!
//! Each file `<kind>s/<name>.xml` documents one entity. Enums are read from
//! the value table, structs and unions from their `c member` descriptions, and
//! opaque structs from their `c function` descriptions.

use crate::diagnostics::{EtchError, EtchResult};
use crate::header::ReferenceModel;
use crate::node::{EntityDef, EntityKind, FieldDef, FunctionDef};
use crate::render::render_paragraphs;
use crate::round_trips::RoundTripTable;
use crate::xml::{self, Element};
use std::path::Path;

/// Member types documented wrongly in ODPI-C 5.4.1:
/// `(entity, field, documented, corrected)`.
///
/// Remove once the docs of the next ODPI-C release are used.
pub const STALE_MEMBER_TYPES: &[(&str, &str, &str, &str)] = &[
    ("dpiDataTypeInfo", "fsPrecision", "int16_t", "uint8_t"),
    ("dpiDataTypeInfo", "annotations", "uint32_t", "dpiAnnotation *"),
    ("dpiErrorInfo", "offset", "uint16_t", "uint32_t"),
    ("dpiDataBuffer", "asJson", "dpiJsonNode", "dpiJson *"),
    ("dpiDataBuffer", "asJsonObject", "dpiJsonNode", "dpiJsonObject"),
    ("dpiDataBuffer", "asJsonArray", "dpiJsonNode", "dpiJsonArray"),
    ("dpiDataBuffer", "asObject", "int", "dpiObject *"),
    ("dpiDataBuffer", "asStmt", "int", "dpiStmt *"),
    ("dpiDataBuffer", "asRowid", "int", "dpiRowid *"),
];

/// Corrected type for a known stale `(entity, field, documented)` triple
pub fn corrected_member_type(entity: &str, field: &str, documented: &str) -> Option<&'static str> {
    STALE_MEMBER_TYPES
        .iter()
        .find(|(e, f, d, _)| *e == entity && *f == field && *d == documented)
        .map(|(_, _, _, corrected)| *corrected)
}

/// Entity kind and name encoded in a documentation path (`structs/dpiFoo.xml`)
pub fn classify_path(path: &Path) -> Option<(EntityKind, String)> {
    if path.extension().and_then(|e| e.to_str()) != Some("xml") {
        return None;
    }
    let name = path.file_stem()?.to_str()?;
    let dir = path.parent()?.file_name()?.to_str()?;
    let kind = EntityKind::from_doc_dir(dir.strip_suffix('s')?)?;
    Some((kind, name.to_string()))
}

fn has_class(node: &Element, classes: &str) -> bool {
    node.tag == "desc" && node.attr("classes") == Some(classes)
}

/// Extracts [`EntityDef`]s from documentation files
pub struct Extractor<'a> {
    reference: &'a ReferenceModel,
    round_trips: &'a RoundTripTable,
}

impl<'a> Extractor<'a> {
    pub fn new(reference: &'a ReferenceModel, round_trips: &'a RoundTripTable) -> Self {
        Self {
            reference,
            round_trips,
        }
    }

    /// Extract the entity documented by `path`.
    ///
    /// `path` is resolved against `doc_dir`; files whose location does not
    /// name a known kind yield `Ok(None)`.
    pub fn extract_file(&self, doc_dir: &Path, path: &Path) -> EtchResult<Option<EntityDef>> {
        let source = path.strip_prefix(doc_dir).unwrap_or(path);
        let Some((kind, name)) = classify_path(source) else {
            tracing::debug!("Skipping {}: not an entity document", source.display());
            return Ok(None);
        };
        tracing::debug!("Extracting {} {} from {}", kind, name, source.display());

        let root = xml::parse_file(path)?
            .ok_or_else(|| EtchError::malformed(source, "empty document"))?;
        self.extract_document(kind, &name, &root, source).map(Some)
    }

    /// Extract an entity from a parsed `document` element
    pub fn extract_document(
        &self,
        kind: EntityKind,
        name: &str,
        root: &Element,
        source: &Path,
    ) -> EtchResult<EntityDef> {
        let section = root
            .child("section")
            .ok_or_else(|| EtchError::malformed(source, "no section element"))?;

        let mut entity =
            EntityDef::new(name, kind, render_paragraphs(section)).with_source(source);
        match kind {
            EntityKind::Enum => {
                let underlying = self.reference.enum_underlying_type(name).ok_or_else(|| {
                    EtchError::ReferenceGap {
                        kind: "enum",
                        name: name.to_string(),
                    }
                })?;
                entity.underlying_type = Some(underlying.to_string());
                entity.members = enum_members(section, source)?;
            }
            EntityKind::Struct | EntityKind::Union => {
                entity.members = struct_members(section, name, source)?;
            }
            EntityKind::OpaqueStruct => {
                entity.functions = self.functions(section, source)?;
            }
        }
        Ok(entity)
    }

    fn functions(&self, section: &Element, source: &Path) -> EtchResult<Vec<FunctionDef>> {
        section
            .children
            .iter()
            .filter(|node| has_class(node, "c function"))
            .map(|node| self.function(node, source))
            .collect()
    }

    fn function(&self, node: &Element, source: &Path) -> EtchResult<FunctionDef> {
        let mut tokens = Vec::new();
        let mut params = Vec::new();
        for signature in node.children_named("desc_signature") {
            for line in signature.children_named("desc_signature_line") {
                for token in &line.children {
                    if token.tag != "desc_parameterlist" {
                        tokens.push(token.text_content());
                        continue;
                    }
                    for param in &token.children {
                        let mut parts: Vec<String> =
                            param.children.iter().map(Element::text_content).collect();
                        let param_name = parts.pop().ok_or_else(|| {
                            EtchError::malformed(source, "parameter without tokens")
                        })?;
                        params.push((param_name, parts.concat().trim().to_string()));
                    }
                }
            }
        }

        let name = tokens
            .pop()
            .ok_or_else(|| EtchError::malformed(source, "function signature without name"))?;
        let content = node.child("desc_content").ok_or_else(|| {
            EtchError::malformed(source, format!("{} has no desc_content", name))
        })?;
        let round_trips = self.round_trips.lookup(&name)?.to_string();

        let rows = content.table_rows();
        if rows.len() != params.len() {
            return Err(EtchError::shape(
                &name,
                format!(
                    "{} table rows != {} signature parameters",
                    rows.len(),
                    params.len()
                ),
            ));
        }

        let mut fields = Vec::with_capacity(params.len());
        for (row, (param_name, param_type)) in rows.into_iter().zip(params) {
            let entries: Vec<&Element> = row.children_named("entry").collect();
            if entries.len() < 3 {
                return Err(EtchError::malformed(
                    source,
                    format!("parameter row of {} has {} cells", name, entries.len()),
                ));
            }
            let row_name = entries[0].text_content().trim().to_string();
            if row_name != param_name {
                return Err(EtchError::shape(
                    &name,
                    format!("'{}' != '{}'", param_name, row_name),
                ));
            }
            let mode = entries[1].text_content().trim().to_string();
            fields.push(
                FieldDef::new(row_name, render_paragraphs(entries[2]))
                    .with_type(param_type)
                    .with_mode(mode),
            );
        }

        Ok(FunctionDef {
            desc: render_paragraphs(content),
            round_trips,
            return_type: tokens.concat().trim().to_string(),
            params: fields,
            name,
        })
    }
}

fn enum_members(section: &Element, source: &Path) -> EtchResult<Vec<FieldDef>> {
    section
        .table_rows()
        .into_iter()
        .map(|row| {
            let entries: Vec<&Element> = row.children_named("entry").collect();
            match entries.as_slice() {
                [name, desc, ..] => Ok(FieldDef::new(
                    name.text_content().trim(),
                    render_paragraphs(desc),
                )),
                _ => Err(EtchError::malformed(source, "enum row with fewer than 2 cells")),
            }
        })
        .collect()
}

fn struct_members(section: &Element, entity: &str, source: &Path) -> EtchResult<Vec<FieldDef>> {
    let mut members = Vec::new();
    for node in section.children.iter().filter(|n| has_class(n, "c member")) {
        let mut c_type = String::new();
        for line in node.descendants_named("desc_signature_line") {
            for token in &line.children {
                if token.tag != "desc_addname" && token.tag != "desc_name" {
                    c_type.push_str(&token.text_content());
                }
            }
        }
        let c_type = c_type.trim();

        let name = node
            .descendants_named("desc_name")
            .into_iter()
            .find_map(|n| n.child("desc_sig_name"))
            .and_then(|n| n.text.clone())
            .ok_or_else(|| {
                EtchError::malformed(source, format!("member of {} without a name", entity))
            })?;
        let content = node.child("desc_content").ok_or_else(|| {
            EtchError::malformed(source, format!("{}.{} has no desc_content", entity, name))
        })?;

        let c_type = corrected_member_type(entity, &name, c_type).unwrap_or(c_type);
        let desc = render_paragraphs(content);
        members.push(FieldDef::new(name, desc).with_type(c_type));
    }
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Desc;
    use crate::test::{enum_document, function_document, struct_document, MockFunction};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn reference() -> ReferenceModel {
        ReferenceModel::from_header(
            "typedef uint32_t dpiExampleEnum;\n\
             struct dpiExample {\n    const char *name;\n    uint32_t count;\n};\n",
        )
    }

    fn round_trips() -> RoundTripTable {
        RoundTripTable::new()
            .with_entry("dpiExample_open", "Yes")
            .with_entry("dpiExample_close", "No")
    }

    fn extract(kind: EntityKind, name: &str, xml: &str) -> EtchResult<EntityDef> {
        let reference = reference();
        let round_trips = round_trips();
        let root = xml::parse_str(xml).unwrap().unwrap();
        Extractor::new(&reference, &round_trips).extract_document(
            kind,
            name,
            &root,
            Path::new("test.xml"),
        )
    }

    #[test]
    fn test_classify_path() {
        assert_eq!(
            classify_path(Path::new("enums/dpiAuthMode.xml")),
            Some((EntityKind::Enum, "dpiAuthMode".to_string()))
        );
        assert_eq!(
            classify_path(Path::new("doc/xml/functions/dpiConn.xml")),
            Some((EntityKind::OpaqueStruct, "dpiConn".to_string()))
        );
        assert_eq!(classify_path(Path::new("user_guide/round_trips.xml")), None);
        assert_eq!(classify_path(Path::new("structs/dpiFoo.html")), None);
    }

    #[test]
    fn test_enum_extraction() {
        let xml = enum_document(
            "An example enumeration.",
            &[("VALUE_A", "desc A"), ("VALUE_B", "desc B")],
        );
        let entity = extract(EntityKind::Enum, "dpiExampleEnum", &xml).unwrap();
        assert_eq!(entity.kind, EntityKind::Enum);
        assert_eq!(entity.underlying_type.as_deref(), Some("uint32_t"));
        assert_eq!(entity.desc, Desc::from_lines(["An example enumeration."]));
        assert_eq!(
            entity.members,
            vec![
                FieldDef::new("VALUE_A", Desc::from_lines(["desc A"])),
                FieldDef::new("VALUE_B", Desc::from_lines(["desc B"])),
            ]
        );
        assert_eq!(entity.source, PathBuf::from("test.xml"));
    }

    #[test]
    fn test_enum_without_typedef_is_reference_gap() {
        let xml = enum_document("x", &[("A", "a")]);
        let err = extract(EntityKind::Enum, "dpiUnknownEnum", &xml).unwrap_err();
        assert!(matches!(err, EtchError::ReferenceGap { kind: "enum", ref name } if name == "dpiUnknownEnum"));
    }

    #[test]
    fn test_struct_extraction() {
        let xml = struct_document(
            "An example structure.",
            &[("const char *", "name", "The name."), ("uint32_t", "count", "The count.")],
        );
        let entity = extract(EntityKind::Struct, "dpiExample", &xml).unwrap();
        assert_eq!(entity.members.len(), 2);
        assert_eq!(entity.members[0].name, "name");
        assert_eq!(entity.members[0].c_type.as_deref(), Some("const char *"));
        assert_eq!(entity.members[1].c_type.as_deref(), Some("uint32_t"));
        assert_eq!(entity.members[1].desc, Desc::from_lines(["The count."]));
        assert!(entity.functions.is_empty());
    }

    #[test]
    fn test_stale_member_type_patched() {
        let xml = struct_document("x", &[("int16_t", "fsPrecision", "p"), ("int16_t", "other", "o")]);
        let entity = extract(EntityKind::Struct, "dpiDataTypeInfo", &xml).unwrap();
        assert_eq!(entity.members[0].c_type.as_deref(), Some("uint8_t"));
        assert_eq!(entity.members[1].c_type.as_deref(), Some("int16_t"));
        assert_eq!(corrected_member_type("dpiDataTypeInfo", "fsPrecision", "uint8_t"), None);
    }

    #[test]
    fn test_member_without_name_is_malformed() {
        let xml = "<document><section><desc classes=\"c member\">\
                   <desc_signature><desc_signature_line><desc_type>int</desc_type></desc_signature_line></desc_signature>\
                   <desc_content/></desc></section></document>";
        let err = extract(EntityKind::Struct, "dpiExample", xml).unwrap_err();
        assert!(matches!(err, EtchError::Malformed { .. }));
    }

    #[test]
    fn test_function_extraction() {
        let xml = function_document(
            "Handle functions.",
            &[
                MockFunction::new("dpiExample_open")
                    .param("const char *", "name", "IN", "The name.")
                    .param("dpiExample **", "handle", "OUT", "The &lt;new&gt; handle."),
                MockFunction::new("dpiExample_close").returns("void"),
            ],
        );
        let entity = extract(EntityKind::OpaqueStruct, "dpiExample", &xml).unwrap();
        assert_eq!(entity.kind, EntityKind::OpaqueStruct);
        assert!(entity.members.is_empty());
        assert_eq!(entity.functions.len(), 2);

        let open = &entity.functions[0];
        assert_eq!(open.name, "dpiExample_open");
        assert_eq!(open.return_type, "int");
        assert_eq!(open.round_trips, "Yes");
        assert_eq!(open.desc, Desc::from_lines(["Mock function dpiExample_open."]));
        assert_eq!(
            open.params,
            vec![
                FieldDef::new("name", Desc::from_lines(["The name."]))
                    .with_type("const char *")
                    .with_mode("IN"),
                FieldDef::new("handle", Desc::from_lines(["The &lt;new&gt; handle."]))
                    .with_type("dpiExample **")
                    .with_mode("OUT"),
            ]
        );

        let close = &entity.functions[1];
        assert_eq!(close.return_type, "void");
        assert_eq!(close.round_trips, "No");
        assert!(close.params.is_empty());
    }

    #[test]
    fn test_function_round_trip_miss() {
        let xml = function_document("x", &[MockFunction::new("dpiExample_ping")]);
        let err = extract(EntityKind::OpaqueStruct, "dpiExample", &xml).unwrap_err();
        assert!(matches!(err, EtchError::LookupMiss { ref function } if function == "dpiExample_ping"));
    }

    #[test]
    fn test_function_extra_row() {
        let f = MockFunction::new("dpiExample_open")
            .param("int", "a", "IN", "a")
            .table_row("b", "IN", "b");
        let err = extract(EntityKind::OpaqueStruct, "dpiExample", &function_document("x", &[f]))
            .unwrap_err();
        assert!(matches!(err, EtchError::ShapeMismatch { ref function, .. } if function == "dpiExample_open"));
    }

    #[test]
    fn test_function_missing_row() {
        let f = MockFunction::new("dpiExample_open")
            .param("int", "a", "IN", "a")
            .signature_param("int", "b");
        let err = extract(EntityKind::OpaqueStruct, "dpiExample", &function_document("x", &[f]))
            .unwrap_err();
        assert!(matches!(err, EtchError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_function_reordered_rows() {
        let f = MockFunction::new("dpiExample_open")
            .signature_param("int", "a")
            .signature_param("int", "b")
            .table_row("b", "IN", "b")
            .table_row("a", "IN", "a");
        let err = extract(EntityKind::OpaqueStruct, "dpiExample", &function_document("x", &[f]))
            .unwrap_err();
        assert!(err.to_string().contains("'a' != 'b'"));
    }
}
