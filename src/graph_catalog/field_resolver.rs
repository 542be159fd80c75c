//! Field-path resolution shared by the plan builder, the plan validator and
//! both query renderers.
//!
//! A filter path such as `Facility.location.city` names a top-level type
//! followed by a walk of its fields. Resolving it *from a root* prepends the
//! type-graph chain leading from the root to that top-level type, giving the
//! full field walk the renderers emit, e.g.
//! `affiliations.facility.location.city` for root `Provider`.
//!
//! Case folding happens only with [`FieldLookup::CaseInsensitive`], which the
//! plan builder uses at intake. Everything downstream resolves canonical names
//! with [`FieldLookup::Exact`].

use super::errors::PathResolutionError;
use super::schema_model::{FieldType, SchemaModel};
use super::type_graph::TypeGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLookup {
    Exact,
    CaseInsensitive,
}

/// One field step of a resolved path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    /// Type declaring the field
    pub owner_type: String,
    /// Canonical field name
    pub field: String,
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    /// Canonical top-level type of the filter path
    pub top_type: String,
    /// Field steps; for rooted resolution the type-graph chain comes first
    pub segments: Vec<PathSegment>,
    /// Number of leading segments contributed by the type-graph chain
    pub chain_len: usize,
}

impl ResolvedPath {
    /// Canonical dotted form of the filter path (`Type.field.field`).
    pub fn canonical_path(&self) -> String {
        let mut parts = vec![self.top_type.as_str()];
        parts.extend(self.segments[self.chain_len..].iter().map(|s| s.field.as_str()));
        parts.join(".")
    }

    /// Field names from the start of the walk, chain included.
    pub fn field_names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.field.as_str()).collect()
    }

    /// Relation steps leading to the terminal field's owner.
    pub fn relation_segments(&self) -> &[PathSegment] {
        &self.segments[..self.segments.len().saturating_sub(1)]
    }

    /// The terminal scalar field.
    pub fn terminal(&self) -> &PathSegment {
        // resolution never yields an empty walk
        &self.segments[self.segments.len() - 1]
    }
}

/// Resolver bound to one schema and a type graph built for it.
pub struct FieldResolver<'a> {
    schema: &'a SchemaModel,
    graph: TypeGraph,
}

impl<'a> FieldResolver<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        FieldResolver {
            schema,
            graph: schema.build_type_graph(),
        }
    }

    /// Resolve `Type.field...` to a walk ending on a scalar field.
    pub fn resolve_path(
        &self,
        field_path: &str,
        lookup: FieldLookup,
    ) -> Result<ResolvedPath, PathResolutionError> {
        let (top_type, rest) = self.split_top_type(field_path, lookup)?;
        let segments = self.walk_fields(top_type, &rest, field_path, lookup)?;
        Ok(ResolvedPath {
            top_type: top_type.to_string(),
            segments,
            chain_len: 0,
        })
    }

    /// Resolve a filter path relative to `root`, prefixing the shortest chain
    /// from `root` to the path's top-level type.
    pub fn resolve_from_root(
        &self,
        root: &str,
        field_path: &str,
        lookup: FieldLookup,
    ) -> Result<ResolvedPath, PathResolutionError> {
        let (top_type, rest) = self.split_top_type(field_path, lookup)?;

        let chain = self.graph.find_field_chain(root, top_type).ok_or_else(|| {
            PathResolutionError::Unreachable {
                field_path: field_path.to_string(),
                root: root.to_string(),
                target: top_type.to_string(),
            }
        })?;

        let mut segments = Vec::with_capacity(chain.len() + rest.len());
        let mut current = root.to_string();
        for field in chain {
            let field_type = self.schema.field(&current, &field).cloned().ok_or_else(|| {
                PathResolutionError::UnknownField {
                    field_path: field_path.to_string(),
                    type_name: current.clone(),
                    field: field.clone(),
                }
            })?;
            let next = field_type.base_type().to_string();
            segments.push(PathSegment {
                owner_type: current,
                field,
                field_type,
            });
            current = next;
        }
        let chain_len = segments.len();
        segments.extend(self.walk_fields(top_type, &rest, field_path, lookup)?);

        Ok(ResolvedPath {
            top_type: top_type.to_string(),
            segments,
            chain_len,
        })
    }

    fn split_top_type<'p>(
        &self,
        field_path: &'p str,
        lookup: FieldLookup,
    ) -> Result<(&'a str, Vec<&'p str>), PathResolutionError> {
        let trimmed = field_path.trim();
        if trimmed.is_empty() {
            return Err(PathResolutionError::EmptyPath);
        }
        let mut parts = trimmed.split('.');
        let head = parts.next().unwrap_or_default();
        let top_type = match lookup {
            FieldLookup::Exact => self
                .schema
                .type_names()
                .find(|name| *name == head),
            FieldLookup::CaseInsensitive => self.schema.resolve_type_name(head),
        }
        .ok_or_else(|| PathResolutionError::UnknownType {
            field_path: field_path.to_string(),
            type_name: head.to_string(),
        })?;

        let rest: Vec<&str> = parts.collect();
        if rest.is_empty() {
            return Err(PathResolutionError::MissingField {
                field_path: field_path.to_string(),
            });
        }
        Ok((top_type, rest))
    }

    fn walk_fields(
        &self,
        start_type: &str,
        fields: &[&str],
        field_path: &str,
        lookup: FieldLookup,
    ) -> Result<Vec<PathSegment>, PathResolutionError> {
        let mut segments = Vec::with_capacity(fields.len());
        let mut current = start_type.to_string();

        for (idx, name) in fields.iter().enumerate() {
            let found = match lookup {
                FieldLookup::Exact => self
                    .schema
                    .field(&current, name)
                    .map(|field_type| (*name, field_type)),
                FieldLookup::CaseInsensitive => self.schema.resolve_field(&current, name),
            };
            let (canonical, field_type) =
                found.ok_or_else(|| PathResolutionError::UnknownField {
                    field_path: field_path.to_string(),
                    type_name: current.clone(),
                    field: name.to_string(),
                })?;

            let is_last = idx + 1 == fields.len();
            match (field_type.referenced_type(), is_last) {
                (Some(target), true) => {
                    return Err(PathResolutionError::NonScalarTerminal {
                        field_path: field_path.to_string(),
                        type_name: current,
                        field: canonical.to_string(),
                        target: target.to_string(),
                    });
                }
                (None, false) => {
                    return Err(PathResolutionError::ScalarTraversal {
                        field_path: field_path.to_string(),
                        type_name: current,
                        field: canonical.to_string(),
                    });
                }
                _ => {}
            }

            let next = field_type.base_type().to_string();
            segments.push(PathSegment {
                owner_type: std::mem::replace(&mut current, next),
                field: canonical.to_string(),
                field_type: field_type.clone(),
            });
        }

        Ok(segments)
    }
}
