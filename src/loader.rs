//! Document loading from files, strings, and HTTP URLs.
//!
//! Both JSON and YAML are accepted; YAML is converted into a
//! `serde_json::Value` tree so validators only ever see one representation.

use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::LoadError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a document from a file path.
///
/// `.json` files are parsed as JSON, `.yaml`/`.yml` as YAML. Anything else is
/// tried as JSON first, then YAML.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist, or a parse
/// error if the content is neither valid JSON nor valid YAML.
pub fn load_spec(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json(&content),
        Some("yaml") | Some("yml") => parse_yaml(&content),
        _ => load_spec_str(&content),
    }
}

/// Load a document from a JSON or YAML string.
///
/// Content that looks like JSON (leading `{` or `[`) is parsed as JSON so
/// error messages point at JSON syntax; everything else is parsed as YAML.
pub fn load_spec_str(content: &str) -> Result<Value, LoadError> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        parse_json(content)
    } else {
        parse_yaml(content)
    }
}

/// Load a document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
#[cfg(feature = "remote")]
pub fn load_spec_url(url: &str) -> Result<Value, LoadError> {
    let network_error = |source: reqwest::Error| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    let body = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(network_error)?;

    load_spec_str(&body)
}

/// Load from a file path or, with the `remote` feature, a URL.
pub fn load_spec_auto(source: &str) -> Result<Value, LoadError> {
    #[cfg(feature = "remote")]
    {
        if is_url(source) {
            return load_spec_url(source);
        }
    }
    load_spec(Path::new(source))
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Navigate a local JSON Pointer fragment (e.g. `#/components/schemas/Pet`).
///
/// Returns `None` when any segment is missing. `~1` and `~0` are unescaped.
pub fn navigate_fragment<'a>(root: &'a Value, fragment: &str) -> Option<&'a Value> {
    let path = fragment.trim_start_matches('#').trim_start_matches('/');
    if path.is_empty() {
        return Some(root);
    }

    let mut current = root;
    for part in path.split('/') {
        let key = part.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            other => other.get(&key)?,
        };
    }
    Some(current)
}

/// Follow a single local `$ref` hop from `node`, if it has one.
///
/// Returns the node itself when it has no local reference, and `None` when the
/// reference target is missing. Chained references are not followed further.
pub fn follow_local_ref<'a>(root: &'a Value, node: &'a Value) -> Option<&'a Value> {
    match node.get("$ref").and_then(Value::as_str) {
        Some(reference) if reference.starts_with('#') => navigate_fragment(root, reference),
        Some(_) => None,
        None => Some(node),
    }
}

fn parse_json(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

fn parse_yaml(content: &str) -> Result<Value, LoadError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|source| LoadError::InvalidYaml { source })?;
    yaml_to_json(yaml)
}

/// Convert a YAML tree into JSON. Scalar mapping keys are stringified so
/// response codes written as `200:` become `"200"`.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, LoadError> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number(&n)?,
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, val) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(val)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Result<Value, LoadError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Number(i.into()));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::Number(u.into()));
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| LoadError::UnsupportedYaml {
            message: format!("non-finite number {}", n),
        })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, LoadError> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => Err(LoadError::UnsupportedYaml {
            message: "mapping keys must be scalars".to_string(),
        }),
    }
}
