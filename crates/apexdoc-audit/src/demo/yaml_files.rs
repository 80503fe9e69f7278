//! YAML resource inventory and documentation quality scoring

use super::{DocQuality, YamlFileInfo};
use serde_json::{Map, Value as JsonValue};
use serde_yaml::Value;

/// Metadata fields that each earn a quality point when present
const QUALITY_FIELDS: [&str; 4] = ["name", "description", "version", "type"];

/// Describe one YAML file from its text. `path` is relative to the resources root.
pub fn inspect(path: String, size: u64, content: &str) -> YamlFileInfo {
    let metadata = match serde_yaml::from_str::<Value>(content) {
        Ok(document) => match document.get("metadata") {
            Some(Value::Mapping(mapping)) => mapping_to_json(mapping),
            _ => Map::new(),
        },
        Err(e) => {
            tracing::debug!(file = %path, error = %e, "metadata unreadable, treating as empty");
            Map::new()
        }
    };

    let tags = match metadata.get("tags") {
        Some(JsonValue::Array(items)) => items.iter().map(render_scalar).collect(),
        _ => Vec::new(),
    };

    YamlFileInfo {
        path,
        exists: true,
        size,
        documentation_quality: assess_quality(content, &metadata),
        metadata,
        tags,
    }
}

/// Score header comment, metadata presence, key fields and tags
pub fn assess_quality(content: &str, metadata: &Map<String, JsonValue>) -> DocQuality {
    let mut score = 0;

    if content.starts_with('#') {
        score += 1;
    }
    if !metadata.is_empty() {
        score += 1;
        score += QUALITY_FIELDS
            .iter()
            .filter(|field| metadata.contains_key(**field))
            .count();
    }
    if metadata.get("tags").is_some_and(is_truthy) {
        score += 1;
    }

    DocQuality::from_score(score)
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(map) => !map.is_empty(),
    }
}

fn render_scalar(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn mapping_to_json(mapping: &serde_yaml::Mapping) -> Map<String, JsonValue> {
    mapping
        .iter()
        .filter_map(|(key, value)| {
            let key = match key {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, yaml_to_json(value)))
        })
        .collect()
}

fn yaml_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => serde_json::to_value(n).unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Sequence(items) => JsonValue::Array(items.iter().map(yaml_to_json).collect()),
        Value::Mapping(mapping) => JsonValue::Object(mapping_to_json(mapping)),
        Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
