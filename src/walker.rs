//! Recursive property traversal over schema nodes.

use serde_json::{Map, Value};

use crate::location::Location;
use crate::schema::{Composition, SchemaNode};

/// Traversal switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Descend into `allOf`/`anyOf`/`oneOf` members.
    pub compositions: bool,
}

impl WalkOptions {
    pub fn with_compositions() -> Self {
        Self { compositions: true }
    }
}

/// Visit every property reachable from `schema` through `properties`,
/// `items` and (optionally) composition members.
///
/// `visit` receives `(property_name, property_schema, location)`. `$ref` nodes
/// are visited when they are a property but never descended into, so the walk
/// always terminates.
pub fn walk<'a, F>(schema: &'a Value, base: &Location, options: WalkOptions, visit: &mut F)
where
    F: FnMut(&'a str, &'a Value, &Location),
{
    match SchemaNode::classify(schema) {
        SchemaNode::Reference(_) | SchemaNode::Primitive(_) | SchemaNode::Untyped => {}
        SchemaNode::Object { properties, .. } => {
            walk_properties(properties, base, options, visit);
            // An object may also mix in composed members.
            if options.compositions {
                walk_compositions(schema, base, options, visit);
            }
        }
        SchemaNode::Array { items } => {
            if let Some(items) = items {
                walk(items, &base.items(), options, visit);
            }
        }
        SchemaNode::Composition { .. } => {
            // Untyped compositions often carry sibling properties, e.g.
            // `{ allOf: [{ $ref: Base }], properties: { ... } }`.
            let own = schema.get("properties").and_then(Value::as_object);
            walk_properties(own, base, options, visit);
            if options.compositions {
                walk_compositions(schema, base, options, visit);
            }
        }
    }
}

fn walk_properties<'a, F>(
    properties: Option<&'a Map<String, Value>>,
    base: &Location,
    options: WalkOptions,
    visit: &mut F,
) where
    F: FnMut(&'a str, &'a Value, &Location),
{
    for (name, property) in properties.into_iter().flatten() {
        let location = base.property(name.as_str());
        visit(name.as_str(), property, &location);
        walk(property, &location, options, visit);
    }
}

fn walk_compositions<'a, F>(schema: &'a Value, base: &Location, options: WalkOptions, visit: &mut F)
where
    F: FnMut(&'a str, &'a Value, &Location),
{
    for (kind, members) in Composition::members_of(schema) {
        for (index, member) in members.iter().enumerate() {
            walk(member, &base.composition(kind, index), options, visit);
        }
    }
}
