//! Literal formatting for the two target languages.

use crate::query_planner::FilterValue;

/// GraphQL input literal: strings double-quoted and escaped, numbers and
/// booleans bare, lists bracketed.
pub fn graphql_literal(value: &FilterValue) -> String {
    match value {
        FilterValue::Null => "null".to_string(),
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::Number(n) => n.to_string(),
        // serde_json's string encoding matches GraphQL's escaping rules
        FilterValue::String(_) => value.to_string(),
        FilterValue::Array(items) => {
            let inner: Vec<String> = items.iter().map(graphql_literal).collect();
            format!("[{}]", inner.join(", "))
        }
        FilterValue::Object(entries) => {
            let inner: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", k, graphql_literal(v)))
                .collect();
            format!("{{ {} }}", inner.join(", "))
        }
    }
}

/// Cypher literal: strings single-quoted with `\` and `'` escaped, lists
/// formatted recursively.
pub fn cypher_literal(value: &FilterValue) -> String {
    match value {
        FilterValue::Null => "null".to_string(),
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::String(s) => format!("'{}'", escape_cypher_string(s)),
        FilterValue::Array(items) => {
            let inner: Vec<String> = items.iter().map(cypher_literal).collect();
            format!("[{}]", inner.join(","))
        }
        FilterValue::Object(entries) => {
            let inner: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", k, cypher_literal(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

fn escape_cypher_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
