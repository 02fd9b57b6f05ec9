use std::collections::HashMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A JSON Patch document applied to flat request bodies.
///
/// Paths name a single top-level member (`/age`), matched case-insensitively.
/// `remove` resets a member to `null`, so required members then fail the
/// body's own validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPatch(pub Vec<PatchOperation>);

impl JsonPatch {
    /// Applies every operation in order to a copy of `target`. Errors are keyed
    /// by the member the failing operation addressed.
    pub fn apply_to<T>(&self, target: &T) -> Result<T, HashMap<String, String>>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut doc = match serde_json::to_value(target) {
            Ok(Value::Object(map)) => map,
            _ => return Err(single("patch", "The patch target is not an object.".to_string())),
        };

        for operation in &self.0 {
            apply_operation(&mut doc, operation)?;
        }

        serde_json::from_value(Value::Object(doc)).map_err(|e| single("patch", e.to_string()))
    }
}

fn apply_operation(doc: &mut Map<String, Value>, operation: &PatchOperation) -> Result<(), HashMap<String, String>> {
    let key = member(doc, &operation.path)?;
    let value = || operation.value.clone().unwrap_or(Value::Null);

    match operation.op {
        PatchOp::Add | PatchOp::Replace => {
            doc.insert(key, value());
        }
        PatchOp::Remove => {
            doc.insert(key, Value::Null);
        }
        PatchOp::Copy | PatchOp::Move => {
            let from = operation
                .from
                .as_deref()
                .ok_or_else(|| single(&key, "'from' is required for copy and move operations.".to_string()))?;
            let source = member(doc, from)?;
            let moved = doc.get(&source).cloned().unwrap_or(Value::Null);
            if operation.op == PatchOp::Move {
                doc.insert(source, Value::Null);
            }
            doc.insert(key, moved);
        }
        PatchOp::Test => {
            let current = doc.get(&key).cloned().unwrap_or(Value::Null);
            if current != value() {
                return Err(single(
                    &key,
                    format!(
                        "The current value '{}' at path '{}' is not equal to the test value '{}'.",
                        current,
                        key,
                        value()
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Resolves `/name` to the existing member key it addresses.
fn member(doc: &Map<String, Value>, path: &str) -> Result<String, HashMap<String, String>> {
    let segment = path.strip_prefix('/').unwrap_or(path);
    if segment.is_empty() || segment.contains('/') {
        return Err(single("patch", format!("The path '{}' does not address a member.", path)));
    }
    let segment = segment.replace("~1", "/").replace("~0", "~");
    doc.keys()
        .find(|k| k.eq_ignore_ascii_case(&segment))
        .cloned()
        .ok_or_else(|| {
            single(
                &segment,
                format!("The target location specified by path segment '{}' was not found.", segment),
            )
        })
}

fn single(key: &str, message: String) -> HashMap<String, String> {
    HashMap::from([(key.to_string(), message)])
}
