//! Attribute declarations for the CX2 `attributeDeclarations` aspect.
//!
//! On read, declarations rename aliased attribute keys back to their declared
//! names and fill in declared defaults. On write, a declaration is inferred
//! for every attribute from the first value seen under that name.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Value, json};

use super::super::AttributeMap;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(super) struct AttributeDeclaration {
    #[serde(rename = "a", default)]
    alias: Option<String>,
    #[serde(rename = "v", default)]
    default: Option<Value>,
}

type ScopeDeclarations = BTreeMap<String, AttributeDeclaration>;

/// Declarations grouped by aspect scope.
#[derive(Clone, Debug, Default)]
pub(super) struct Declarations {
    scopes: BTreeMap<String, ScopeDeclarations>,
}

impl Declarations {
    /// Absorbs one decoded `attributeDeclarations` body.
    pub(super) fn extend(&mut self, entries: Vec<BTreeMap<String, ScopeDeclarations>>) {
        for entry in entries {
            for (scope, declared) in entry {
                self.scopes.entry(scope).or_default().extend(declared);
            }
        }
    }

    /// Rewrites aliased keys and fills defaults for the given scope.
    pub(super) fn expand(&self, scope: &str, attributes: AttributeMap) -> AttributeMap {
        let Some(declared) = self.scopes.get(scope) else {
            return attributes;
        };

        let mut expanded = AttributeMap::new();
        for (key, value) in attributes {
            let name = declared
                .iter()
                .find(|(_, declaration)| declaration.alias.as_deref() == Some(key.as_str()))
                .map_or(key, |(name, _)| name.clone());
            expanded.insert(name, value);
        }
        for (name, declaration) in declared {
            if let Some(default) = &declaration.default
                && !expanded.contains_key(name)
            {
                expanded.insert(name.clone(), default.clone());
            }
        }
        expanded
    }
}

/// Builds declarations for the attributes found in one scope.
pub(super) fn infer_scope<'a>(maps: impl IntoIterator<Item = &'a AttributeMap>) -> Value {
    let mut declared = serde_json::Map::new();
    for map in maps {
        for (name, value) in map {
            if declared.contains_key(name) {
                continue;
            }
            if let Some(data_type) = declared_type(value) {
                declared.insert(name.clone(), json!({ "d": data_type }));
            }
        }
    }
    Value::Object(declared)
}

/// Maps a JSON value to its CX2 data type.
///
/// Lists take the type of their first element; empty lists are declared as
/// lists of strings. Nulls and objects carry no declaration.
pub(super) fn declared_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::Array(items) => Some(match items.first().and_then(scalar_type) {
            Some("boolean") => "list_of_boolean",
            Some("integer") => "list_of_integer",
            Some("long") => "list_of_long",
            Some("double") => "list_of_double",
            _ => "list_of_string",
        }),
        other => scalar_type(other),
    }
}

fn scalar_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::String(_) => Some("string"),
        Value::Bool(_) => Some("boolean"),
        Value::Number(number) => Some(match number.as_i64() {
            Some(integer) if i32::try_from(integer).is_ok() => "integer",
            Some(_) => "long",
            None if number.is_u64() => "long",
            None => "double",
        }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
