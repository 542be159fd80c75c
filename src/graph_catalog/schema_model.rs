//! Object-graph schema model.
//!
//! A schema is loaded once per request from JSON of the form
//!
//! ```json
//! {
//!   "types": { "Provider": { "fields": { "name": "string", "affiliations": "Affiliation[]" } } },
//!   "relations": [["Provider", "Affiliation"]],
//!   "root_queries": ["providers"]
//! }
//! ```
//!
//! Field type strings are either a declared type name, optionally suffixed
//! with `[]` to mark a list, or anything else, which is taken as a scalar. Declaration order of
//! types and fields is preserved and drives every deterministic tie-break
//! downstream (chain resolution, join derivation).
//!
//! The model is immutable after load and safe to share read-only.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::errors::GraphSchemaError;
use super::type_graph::TypeGraph;

/// Suffix marking a list field type (`Affiliation[]`).
pub const LIST_SUFFIX: &str = "[]";

/// Common scalar spellings; other non-declared types still load as scalars
/// but are logged in case they are misspelled type names.
const SCALAR_KEYWORDS: &[&str] = &[
    "string", "str", "text", "id", "uuid", "int", "integer", "long", "float", "double",
    "decimal", "number", "boolean", "bool", "date", "datetime", "time", "timestamp", "json",
];

/// Strip the list marker from a raw field type string.
pub fn base_type(raw: &str) -> &str {
    raw.strip_suffix(LIST_SUFFIX).unwrap_or(raw)
}

fn is_scalar_keyword(name: &str) -> bool {
    SCALAR_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    /// Field whose base type is a declared schema type
    Reference,
}

/// Resolved type of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    name: String,
    is_list: bool,
    kind: FieldKind,
}

impl FieldType {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_list: false,
            kind: FieldKind::Scalar,
        }
    }

    pub fn reference(type_name: impl Into<String>, is_list: bool) -> Self {
        Self {
            name: type_name.into(),
            is_list,
            kind: FieldKind::Reference,
        }
    }

    /// Type name with the list marker stripped.
    pub fn base_type(&self) -> &str {
        &self.name
    }

    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_scalar(&self) -> bool {
        self.kind == FieldKind::Scalar
    }

    /// The declared type this field points at, if it is a reference.
    pub fn referenced_type(&self) -> Option<&str> {
        match self.kind {
            FieldKind::Reference => Some(&self.name),
            FieldKind::Scalar => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_list {
            write!(f, "{}{}", self.name, LIST_SUFFIX)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeDef {
    /// Field name → type, in declaration order
    pub fields: IndexMap<String, FieldType>,
}

/// Schema JSON exactly as it appears on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSchema {
    #[serde(default)]
    pub types: IndexMap<String, RawTypeDef>,
    #[serde(default)]
    pub relations: Vec<(String, String)>,
    #[serde(default)]
    pub root_queries: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTypeDef {
    #[serde(default)]
    pub fields: IndexMap<String, String>,
}

/// Validated, immutable schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct SchemaModel {
    types: IndexMap<String, TypeDef>,
    relations: Vec<(String, String)>,
    root_queries: Vec<String>,
}

impl TryFrom<RawSchema> for SchemaModel {
    type Error = GraphSchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        let mut types = IndexMap::with_capacity(raw.types.len());

        for (type_name, raw_def) in &raw.types {
            let mut fields = IndexMap::with_capacity(raw_def.fields.len());
            for (field_name, raw_type) in &raw_def.fields {
                let base = base_type(raw_type.trim());
                let is_list = raw_type.trim().ends_with(LIST_SUFFIX);
                let field_type = if raw.types.contains_key(base) {
                    FieldType::reference(base, is_list)
                } else {
                    if !is_scalar_keyword(base) {
                        log::warn!(
                            "Field '{}.{}' has non-declared type '{}'; treating it as scalar",
                            type_name,
                            field_name,
                            raw_type
                        );
                    }
                    FieldType {
                        name: base.to_string(),
                        is_list,
                        kind: FieldKind::Scalar,
                    }
                };
                fields.insert(field_name.clone(), field_type);
            }
            types.insert(type_name.clone(), TypeDef { fields });
        }

        for (from_type, to_type) in &raw.relations {
            for endpoint in [from_type, to_type] {
                if !types.contains_key(endpoint) {
                    return Err(GraphSchemaError::UndeclaredRelationEndpoint {
                        from_type: from_type.clone(),
                        to_type: to_type.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        Ok(SchemaModel {
            types,
            relations: raw.relations,
            root_queries: raw.root_queries,
        })
    }
}

impl SchemaModel {
    pub fn from_json_str(json: &str) -> Result<Self, GraphSchemaError> {
        let raw: RawSchema =
            serde_json::from_str(json).map_err(|e| GraphSchemaError::SchemaParseError {
                error: e.to_string(),
            })?;
        Self::try_from(raw)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, GraphSchemaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GraphSchemaError::read_error_with_context(path.display().to_string(), e.to_string())
        })?;
        let schema = Self::from_json_str(&content)?;
        log::info!(
            "Loaded schema from {}: {} types, {} relations, {} root queries",
            path.display(),
            schema.types.len(),
            schema.relations.len(),
            schema.root_queries.len()
        );
        Ok(schema)
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeDef)> {
        self.types.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn type_def(&self, type_name: &str) -> Option<&TypeDef> {
        self.types.get(type_name)
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn relations(&self) -> &[(String, String)] {
        &self.relations
    }

    pub fn root_queries(&self) -> &[String] {
        &self.root_queries
    }

    /// Canonical spelling of a declared type name, matched case-insensitively.
    pub fn resolve_type_name(&self, name: &str) -> Option<&str> {
        if let Some((canonical, _)) = self.types.get_key_value(name) {
            return Some(canonical);
        }
        self.types
            .keys()
            .find(|candidate| candidate.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Exact (canonical) field lookup.
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldType> {
        self.types.get(type_name)?.fields.get(field_name)
    }

    /// Case-insensitive field lookup returning the canonical field name.
    ///
    /// An exact match wins; otherwise the first declared field that matches
    /// ignoring ASCII case.
    pub fn resolve_field(&self, type_name: &str, field_name: &str) -> Option<(&str, &FieldType)> {
        let fields = &self.types.get(type_name)?.fields;
        if let Some((canonical, field_type)) = fields.get_key_value(field_name) {
            return Some((canonical, field_type));
        }
        fields
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(field_name))
            .map(|(canonical, field_type)| (canonical.as_str(), field_type))
    }

    /// Fresh type graph over reference-typed fields.
    pub fn build_type_graph(&self) -> TypeGraph {
        TypeGraph::from_schema(self)
    }
}
