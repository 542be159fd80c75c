//! Directed graph over schema types.
//!
//! Every reference-typed field `A.f: B` (or `B[]`) becomes an edge
//! `(A, f, B)`. Edges keep the schema's field declaration order and nodes
//! keep the type declaration order, so breadth-first chain lookup is
//! reproducible across runs.
//!
//! A `TypeGraph` is cheap to build and is rebuilt per render call; it is never
//! shared between concurrent requests.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use super::schema_model::SchemaModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEdge {
    pub field: String,
    pub target: String,
}

#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    adjacency: IndexMap<String, Vec<TypeEdge>>,
}

impl TypeGraph {
    pub fn from_schema(schema: &SchemaModel) -> Self {
        let adjacency = schema
            .types()
            .map(|(type_name, def)| {
                let edges = def
                    .fields
                    .iter()
                    .filter_map(|(field, field_type)| {
                        field_type.referenced_type().map(|target| TypeEdge {
                            field: field.clone(),
                            target: target.to_string(),
                        })
                    })
                    .collect();
                (type_name.to_string(), edges)
            })
            .collect();
        TypeGraph { adjacency }
    }

    /// Outgoing edges of a type, in field declaration order.
    pub fn edges(&self, type_name: &str) -> &[TypeEdge] {
        self.adjacency
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Shortest field-name chain leading from `from_type` to `to_type`.
    ///
    /// Returns `Some(vec![])` when both types are the same and `None` when the
    /// target is unreachable. Among equally short chains the one found first
    /// in declaration order wins.
    pub fn find_field_chain(&self, from_type: &str, to_type: &str) -> Option<Vec<String>> {
        if from_type == to_type {
            return Some(Vec::new());
        }
        if !self.adjacency.contains_key(from_type) {
            return None;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(from_type);
        let mut queue: VecDeque<(&str, Vec<String>)> = VecDeque::new();
        queue.push_back((from_type, Vec::new()));

        while let Some((node, chain)) = queue.pop_front() {
            for edge in self.edges(node) {
                if !visited.insert(edge.target.as_str()) {
                    continue;
                }
                let mut next_chain = chain.clone();
                next_chain.push(edge.field.clone());
                if edge.target == to_type {
                    log::debug!(
                        "find_field_chain: {} -> {} via [{}]",
                        from_type,
                        to_type,
                        next_chain.join(".")
                    );
                    return Some(next_chain);
                }
                queue.push_back((edge.target.as_str(), next_chain));
            }
        }

        log::debug!("find_field_chain: {} -> {} unreachable", from_type, to_type);
        None
    }

    pub fn is_reachable(&self, from_type: &str, to_type: &str) -> bool {
        self.find_field_chain(from_type, to_type).is_some()
    }
}
