//! Read-only views over JSON-Schema-like nodes.

use serde_json::{Map, Value};

/// JSON-Schema composition keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Composition {
    AllOf,
    AnyOf,
    OneOf,
}

impl Composition {
    pub const ALL: [Composition; 3] = [Composition::AllOf, Composition::AnyOf, Composition::OneOf];

    pub fn keyword(self) -> &'static str {
        match self {
            Composition::AllOf => "allOf",
            Composition::AnyOf => "anyOf",
            Composition::OneOf => "oneOf",
        }
    }

    /// Composition members present on `node`, in keyword order.
    pub fn members_of(node: &Value) -> impl Iterator<Item = (Composition, &[Value])> {
        Self::ALL.into_iter().filter_map(move |kind| {
            node.get(kind.keyword())
                .and_then(Value::as_array)
                .map(|members| (kind, members.as_slice()))
        })
    }
}

/// The shape of a schema node.
///
/// Precedence when keywords overlap: `$ref` wins, then an explicit `type`,
/// then composition keywords, then bare `properties` (an implicit object).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaNode<'a> {
    /// `$ref` is never followed.
    Reference(&'a str),
    Composition {
        kind: Composition,
        members: &'a [Value],
    },
    Object {
        properties: Option<&'a Map<String, Value>>,
        required: Option<&'a [Value]>,
    },
    Array {
        items: Option<&'a Value>,
    },
    Primitive(&'a str),
    /// Not a mapping, or a mapping with none of the recognised keywords.
    Untyped,
}

impl<'a> SchemaNode<'a> {
    pub fn classify(node: &'a Value) -> Self {
        let Some(map) = node.as_object() else {
            return SchemaNode::Untyped;
        };

        if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
            return SchemaNode::Reference(reference);
        }

        match map.get("type").and_then(Value::as_str) {
            Some("object") => return object_view(map),
            Some("array") => {
                return SchemaNode::Array {
                    items: map.get("items"),
                }
            }
            Some(other) => return SchemaNode::Primitive(other),
            None => {}
        }

        if let Some((kind, members)) = Composition::members_of(node).next() {
            return SchemaNode::Composition { kind, members };
        }

        if map.contains_key("properties") {
            return object_view(map);
        }

        SchemaNode::Untyped
    }
}

fn object_view(map: &Map<String, Value>) -> SchemaNode<'_> {
    SchemaNode::Object {
        properties: map.get("properties").and_then(Value::as_object),
        required: map
            .get("required")
            .and_then(Value::as_array)
            .map(Vec::as_slice),
    }
}

/// String field accessor.
pub fn str_field<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    node.get(key).and_then(Value::as_str)
}

/// Names listed in a node's `required` array, ignoring non-strings.
pub fn required_names(node: &Value) -> Vec<&str> {
    node.get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// True if the node carries `example` or `examples`.
pub fn has_example(node: &Value) -> bool {
    node.get("example").is_some() || node.get("examples").is_some()
}

/// True if the node declares any shape: `type`, a composition keyword, or `$ref`.
pub fn declares_shape(node: &Value) -> bool {
    node.get("type").is_some()
        || node.get("$ref").is_some()
        || Composition::members_of(node).next().is_some()
}

/// True if `node` has none of `$ref`, `type`, composition keywords, or
/// `properties`.
pub fn is_structurally_empty(node: &Value) -> bool {
    !declares_shape(node) && node.get("properties").is_none()
}

/// Extracts `Name` from `#/components/schemas/Name` (JSON-pointer unescaped).
pub fn component_schema_name(reference: &str) -> Option<String> {
    let rest = reference.strip_prefix("#/components/schemas/")?;
    let name = rest.split('/').next().unwrap_or(rest);
    if name.is_empty() {
        return None;
    }
    Some(name.replace("~1", "/").replace("~0", "~"))
}

pub fn is_primitive_type(type_name: &str) -> bool {
    matches!(type_name, "string" | "integer" | "number" | "boolean")
}
