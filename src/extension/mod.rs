//! Extension extraction, from one profile extension record to one script.
//!
//! Each record goes through the same steps: resolve the active code body,
//! render the record's descriptive fields as a comment header, wrap the code
//! for its scope, then decide whether it is emitted at all.

mod scope;

pub use scope::{is_numeric_like, Scope};

use serde_json::{Map, Value};

use crate::error::TiqResult;

/// Fields left out of the metadata comment.
pub const METADATA_EXCLUDED_FIELDS: [&str; 3] =
    ["configuration", "selectedTargets", "environmentVersions"];

/// Snippet name that marks the production variant.
pub const PROD_SNIPPET: &str = "prod";

pub const INACTIVE_STATUS: &str = "inactive";

/// A rendered script ready to be written under its extension id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeArtifact {
    pub id: String,
    pub scope: Scope,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotAnObject,
    MissingId,
    NoCode,
}

/// What happened to one extension record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Emit(CodeArtifact),
    /// Code resolved but the extension is switched off.
    Inactive { id: String },
    Skipped(SkipReason),
}

/// Extension id as a string. Numeric ids are accepted; empty strings and zero
/// count as missing.
pub fn extension_id(extension: &Map<String, Value>) -> Option<String> {
    match extension.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Pick the code body: direct `configuration.code` first, otherwise the last
/// promoted snippet named `prod`.
pub fn resolve_code(extension: &Map<String, Value>) -> Option<String> {
    let configuration = extension.get("configuration")?.as_object()?;

    if let Some(code) = non_empty_str(configuration.get("code")) {
        return Some(code.to_string());
    }

    let snippets = configuration
        .get("codeDevData")
        .and_then(|dev| dev.get("promotedSnippets"))?;
    let prod = find_prod_snippet(snippets)?;
    non_empty_str(prod.get("code")).map(str::to_string)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Last snippet whose `name` is `prod`, scanning in stored order.
fn find_prod_snippet(snippets: &Value) -> Option<&Value> {
    let is_prod = |snippet: &&Value| {
        snippet.get("name").and_then(Value::as_str) == Some(PROD_SNIPPET)
    };
    match snippets {
        Value::Object(map) => map.values().filter(is_prod).last(),
        Value::Array(items) => items.iter().filter(is_prod).last(),
        _ => None,
    }
}

/// Every field except the excluded ones, pretty-printed and commented out.
pub fn metadata_comment(extension: &Map<String, Value>) -> TiqResult<String> {
    let metadata: Map<String, Value> = extension
        .iter()
        .filter(|(key, _)| !METADATA_EXCLUDED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let pretty = serde_json::to_string_pretty(&Value::Object(metadata))?;
    Ok(pretty
        .lines()
        .map(|line| format!("// {line}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn is_inactive(extension: &Map<String, Value>) -> bool {
    extension.get("status").and_then(Value::as_str) == Some(INACTIVE_STATUS)
}

/// Run one extension record through resolution, rendering and the
/// emission gate.
pub fn extract(extension: &Value) -> TiqResult<Extraction> {
    let Some(record) = extension.as_object() else {
        return Ok(Extraction::Skipped(SkipReason::NotAnObject));
    };
    let Some(id) = extension_id(record) else {
        return Ok(Extraction::Skipped(SkipReason::MissingId));
    };
    let Some(code) = resolve_code(record) else {
        return Ok(Extraction::Skipped(SkipReason::NoCode));
    };

    if is_inactive(record) {
        return Ok(Extraction::Inactive { id });
    }

    let scope = Scope::classify(record.get("scope"));
    let header = metadata_comment(record)?;
    let body = scope.wrap(&code);

    Ok(Extraction::Emit(CodeArtifact {
        id,
        scope,
        content: format!("{header}\n\n{body}"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn emitted(extension: Value) -> CodeArtifact {
        match extract(&extension).unwrap() {
            Extraction::Emit(artifact) => artifact,
            other => panic!("expected artifact, got {other:?}"),
        }
    }

    #[test]
    fn direct_code_wins_over_snippet() {
        let ext = obj(json!({
            "id": "7",
            "configuration": {
                "code": "A",
                "codeDevData": {"promotedSnippets": {"s1": {"name": "prod", "code": "B"}}}
            }
        }));
        assert_eq!(resolve_code(&ext).as_deref(), Some("A"));
    }

    #[test]
    fn empty_direct_code_falls_back_to_snippet() {
        let ext = obj(json!({
            "configuration": {
                "code": "",
                "codeDevData": {"promotedSnippets": {"s1": {"name": "prod", "code": "B"}}}
            }
        }));
        assert_eq!(resolve_code(&ext).as_deref(), Some("B"));
    }

    #[test]
    fn snippet_without_prod_resolves_nothing() {
        let ext = obj(json!({
            "configuration": {
                "codeDevData": {"promotedSnippets": {
                    "s1": {"name": "dev", "code": "D"},
                    "s2": {"name": "qa", "code": "Q"}
                }}
            }
        }));
        assert_eq!(resolve_code(&ext), None);
    }

    #[test]
    fn last_prod_snippet_wins() {
        let ext: Map<String, Value> = serde_json::from_str(
            r#"{"configuration":{"codeDevData":{"promotedSnippets":{
                "b":{"name":"prod","code":"first"},
                "a":{"name":"prod","code":"second"}
            }}}}"#,
        )
        .unwrap();
        assert_eq!(resolve_code(&ext).as_deref(), Some("second"));
    }

    #[test]
    fn last_prod_snippet_without_code_resolves_nothing() {
        let ext = obj(json!({
            "configuration": {"codeDevData": {"promotedSnippets": [
                {"name": "prod", "code": "old"},
                {"name": "prod"}
            ]}}
        }));
        assert_eq!(resolve_code(&ext), None);
    }

    #[test]
    fn no_configuration_resolves_nothing() {
        assert_eq!(resolve_code(&obj(json!({"id": "1"}))), None);
        assert_eq!(resolve_code(&obj(json!({"configuration": null}))), None);
    }

    #[test]
    fn ids() {
        assert_eq!(extension_id(&obj(json!({"id": "12"}))).as_deref(), Some("12"));
        assert_eq!(extension_id(&obj(json!({"id": 12}))).as_deref(), Some("12"));
        assert_eq!(extension_id(&obj(json!({"id": ""}))), None);
        assert_eq!(extension_id(&obj(json!({"id": 0}))), None);
        assert_eq!(extension_id(&obj(json!({}))), None);
    }

    #[test]
    fn metadata_excludes_configuration_fields() {
        let ext = obj(json!({
            "configuration": {"code": "x"},
            "environmentVersions": {},
            "id": "3",
            "label": "Set cookie",
            "selectedTargets": {"dev": true}
        }));
        let comment = metadata_comment(&ext).unwrap();
        assert_eq!(
            comment,
            "// {\n//   \"id\": \"3\",\n//   \"label\": \"Set cookie\"\n// }"
        );
    }

    #[test]
    fn metadata_of_only_excluded_fields_is_empty_object() {
        let ext = obj(json!({"configuration": {}}));
        assert_eq!(metadata_comment(&ext).unwrap(), "// {}");
    }

    #[test]
    fn named_scope_artifact() {
        let artifact = emitted(json!({
            "id": "5",
            "scope": "After Tags",
            "status": "active",
            "configuration": {"code": "x();"}
        }));
        assert_eq!(artifact.id, "5");
        assert_eq!(artifact.scope, Scope::AfterTags);
        assert!(artifact
            .content
            .ends_with("\n\n(function(a,b){\nx();\n})(eventType, eventPayload);"));
        assert!(artifact.content.starts_with("// {\n"));
        assert!(!artifact.content.contains("configuration"));
    }

    #[test]
    fn list_scope_artifact() {
        let artifact = emitted(json!({
            "id": "6",
            "scope": "12,34",
            "configuration": {"code": "x();"}
        }));
        assert!(artifact.content.ends_with(
            "\n\n(function(a,b,u){\nx();\n})(eventType, eventPayload, tagObject);"
        ));
    }

    #[test]
    fn unscoped_artifact_keeps_raw_code() {
        let artifact = emitted(json!({
            "id": "8",
            "configuration": {"code": "x();"}
        }));
        assert_eq!(artifact.scope, Scope::Unscoped);
        assert!(artifact.content.ends_with("}\n\nx();"));
    }

    #[test]
    fn inactive_is_suppressed() {
        let ext = json!({
            "id": "9",
            "status": "inactive",
            "configuration": {"code": "x();"}
        });
        assert_eq!(
            extract(&ext).unwrap(),
            Extraction::Inactive { id: "9".into() }
        );
    }

    #[test]
    fn skip_reasons() {
        assert_eq!(
            extract(&json!(null)).unwrap(),
            Extraction::Skipped(SkipReason::NotAnObject)
        );
        assert_eq!(
            extract(&json!({"configuration": {"code": "x"}})).unwrap(),
            Extraction::Skipped(SkipReason::MissingId)
        );
        assert_eq!(
            extract(&json!({"id": "1", "status": "inactive"})).unwrap(),
            Extraction::Skipped(SkipReason::NoCode)
        );
    }
}
