//! Translation from descriptors to engine query syntax.
//!
//! Per-entity knowledge (index name, which fields carry full-text and how
//! hard to boost them) lives in a [`SearchProfile`] value injected into the
//! generic service — the translation sits alongside the core, not inside it.

use serde_json::{Map, Value, json};

use super::descriptor::{QueryDescriptor, SortDirection, SortSpec};

/// Per-entity search configuration.
#[derive(Debug, Clone, Copy)]
pub struct SearchProfile {
    /// Engine index the entity kind is stored in.
    pub index: &'static str,
    /// Full-text fields in `field^boost` engine notation.
    pub text_fields: &'static [&'static str],
}

/// Compile a descriptor into the engine's query body.
pub fn compile(profile: &SearchProfile, descriptor: &QueryDescriptor) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), query_clause(profile, descriptor));
    if let Some(sort) = descriptor.sort() {
        body.insert("sort".to_string(), sort_clause(sort));
    }
    let page = descriptor.page();
    body.insert("from".to_string(), json!(page.offset()));
    body.insert("size".to_string(), json!(page.limit()));
    Value::Object(body)
}

fn query_clause(profile: &SearchProfile, descriptor: &QueryDescriptor) -> Value {
    let mut must = Vec::new();
    if let Some(text) = descriptor.text() {
        must.push(json!({
            "multi_match": {
                "query": text,
                "fields": profile.text_fields,
            }
        }));
    }

    let mut filter = Vec::new();
    for clause in descriptor.filters() {
        let term = term_object(&clause.field, &clause.value);
        match clause.nested_path.as_deref() {
            Some(path) => filter.push(json!({
                "nested": {
                    "path": path,
                    "query": { "bool": { "filter": term } },
                }
            })),
            None => filter.push(term),
        }
    }

    if must.is_empty() && filter.is_empty() {
        return json!({ "match_all": {} });
    }

    let mut bool_body = Map::new();
    if !must.is_empty() {
        bool_body.insert("must".to_string(), Value::Array(must));
    }
    if !filter.is_empty() {
        bool_body.insert("filter".to_string(), Value::Array(filter));
    }
    json!({ "bool": bool_body })
}

fn term_object(field: &str, value: &str) -> Value {
    let mut term = Map::new();
    term.insert(field.to_string(), Value::String(value.to_string()));
    json!({ "term": term })
}

fn sort_clause(sort: &SortSpec) -> Value {
    let order = match sort.direction() {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    };
    let mut clause = Map::new();
    clause.insert(sort.field().to_string(), json!({ "order": order }));
    Value::Array(vec![Value::Object(clause)])
}
