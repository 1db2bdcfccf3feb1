//! Default-value injection pre-pass
//!
//! Mirrors the descent a validator makes: `properties`, `items`, `allOf`
//! and local `$ref`s. At each object level, absent properties whose
//! subschema declares a `default` receive a copy of it. Injection is
//! shallow per level; deeper levels are only reached through properties
//! that exist (or were just defaulted) in the instance.

use serde_json::Value;

/// Fill in schema defaults on `instance`, in place
pub fn inject_defaults(schema: &Value, instance: &mut Value) {
    inject(schema, schema, instance, 0);
}

// Guards against self-referencing `$ref` cycles
const MAX_DEPTH: usize = 64;

fn inject(root: &Value, schema: &Value, instance: &mut Value, depth: usize) {
    if depth > MAX_DEPTH {
        return;
    }
    let Some(schema) = schema.as_object() else {
        return;
    };

    if let Some(target) = schema
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|reference| resolve_local(root, reference))
    {
        inject(root, target, instance, depth + 1);
    }

    if let (Some(properties), Some(object)) = (
        schema.get("properties").and_then(Value::as_object),
        instance.as_object_mut(),
    ) {
        for (name, subschema) in properties {
            if object.contains_key(name) {
                continue;
            }
            if let Some(default) = subschema.get("default") {
                object.insert(name.clone(), default.clone());
            }
        }

        for (name, subschema) in properties {
            if let Some(child) = object.get_mut(name) {
                inject(root, subschema, child, depth + 1);
            }
        }
    }

    if let (Some(items), Some(array)) = (schema.get("items"), instance.as_array_mut()) {
        match items {
            Value::Array(tuple) => {
                for (subschema, element) in tuple.iter().zip(array.iter_mut()) {
                    inject(root, subschema, element, depth + 1);
                }
            }
            subschema => {
                for element in array.iter_mut() {
                    inject(root, subschema, element, depth + 1);
                }
            }
        }
    }

    if let Some(branches) = schema.get("allOf").and_then(Value::as_array) {
        for branch in branches {
            inject(root, branch, instance, depth + 1);
        }
    }
}

/// Resolve `#/...` references against the root schema
fn resolve_local<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    match reference.strip_prefix('#')? {
        "" => Some(root),
        pointer => root.pointer(pointer),
    }
}
