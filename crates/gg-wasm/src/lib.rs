#![forbid(unsafe_code)]

use gg_core::{FamilyGraph, GedError, ParseConfig};
use gg_graph::synthesize;
use gg_parser::parse_with_config;
#[cfg(target_arch = "wasm32")]
use serde::Serialize;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

const EMPTY_GRAPH_JSON: &str = r#"{"nodes":[],"links":[]}"#;

/// Parse and synthesize in one step.
#[must_use]
pub fn build_graph(input: &str, config: &ParseConfig) -> FamilyGraph {
    let parsed = parse_with_config(input, config);
    synthesize(&parsed.document)
}

/// Read a JSON config object. Blank input and `null` mean defaults.
pub fn parse_config_json(config_json: &str) -> Result<ParseConfig, GedError> {
    let trimmed = config_json.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ParseConfig::default());
    }
    let config: ParseConfig = serde_json::from_str(trimmed)?;
    config.validate()?;
    Ok(config)
}

/// `{nodes, links}` JSON for `input` with the default tag vocabulary.
#[must_use]
pub fn graph_json(input: &str) -> String {
    let graph = build_graph(input, &ParseConfig::default());
    serde_json::to_string(&graph).unwrap_or_else(|_| EMPTY_GRAPH_JSON.to_string())
}

pub fn graph_json_with_config(input: &str, config_json: &str) -> Result<String, GedError> {
    let config = parse_config_json(config_json)?;
    let graph = build_graph(input, &config);
    Ok(serde_json::to_string(&graph)?)
}

#[cfg(target_arch = "wasm32")]
fn js_error(message: impl Into<String>) -> JsValue {
    JsValue::from_str(&message.into())
}

#[cfg(target_arch = "wasm32")]
fn to_js_value<T>(value: &T) -> Result<JsValue, JsValue>
where
    T: Serialize,
{
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| js_error(format!("failed to serialize graph: {err}")))
}

#[cfg(target_arch = "wasm32")]
fn config_from_js(value: Option<JsValue>) -> Result<ParseConfig, JsValue> {
    let config: ParseConfig = match value {
        None => return Ok(ParseConfig::default()),
        Some(raw) if raw.is_undefined() || raw.is_null() => return Ok(ParseConfig::default()),
        Some(raw) => serde_wasm_bindgen::from_value(raw)
            .map_err(|err| js_error(format!("invalid config: {err}")))?,
    };
    config.validate().map_err(|err| js_error(err.to_string()))?;
    Ok(config)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = parseGedcom)]
pub fn parse_gedcom_js(input: &str) -> Result<JsValue, JsValue> {
    to_js_value(&build_graph(input, &ParseConfig::default()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = parseGedcomWithConfig)]
pub fn parse_gedcom_with_config_js(input: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    to_js_value(&build_graph(input, &config))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = looksLikeGedcom)]
pub fn looks_like_gedcom_js(input: &str) -> bool {
    gg_parser::looks_like_gedcom(input)
}

#[cfg(test)]
mod tests {
    use gg_core::GedError;
    use serde_json::Value;

    use super::{graph_json, graph_json_with_config, parse_config_json};

    const COUPLE: &str = "\
0 @I1@ INDI
1 NAME Ann /Lee/
0 @I2@ INDI
1 NAME Bo /Lee/
0 @F1@ FAM
1 HUSB @I2@
1 WIFE @I1@
";

    #[test]
    fn graph_json_has_nodes_and_links() {
        let value: Value = serde_json::from_str(&graph_json(COUPLE)).expect("valid json");
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["links"][0]["relation"], "Spouse");
        assert_eq!(value["links"][0]["type"], "family");
        assert_eq!(value["links"][0]["source"], "@I2@");
    }

    #[test]
    fn empty_input_yields_empty_graph() {
        let value: Value = serde_json::from_str(&graph_json("")).expect("valid json");
        assert_eq!(value, serde_json::json!({"nodes": [], "links": []}));
    }

    #[test]
    fn custom_prefix_is_honoured() {
        let json = graph_json_with_config(
            "0 @P1@ INDI\n1 NAME Ann /Lee/\n0 @I2@ INDI\n",
            r#"{"individual_prefix": "@P"}"#,
        )
        .expect("config should be accepted");
        let value: Value = serde_json::from_str(&json).expect("valid json");
        let nodes = value["nodes"].as_array().expect("nodes array");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0]["name"], "Ann LEE");
    }

    #[test]
    fn blank_and_null_configs_use_defaults() {
        assert_eq!(parse_config_json("").expect("blank"), Default::default());
        assert_eq!(parse_config_json(" null ").expect("null"), Default::default());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = graph_json_with_config(COUPLE, r#"{"concatenation_tag": "CONT"}"#)
            .expect_err("identical continuation tags");
        assert!(matches!(err, GedError::Config { ref field, .. } if field == "continuation_tag"));

        let err = graph_json_with_config(COUPLE, "{not json").expect_err("malformed json");
        assert!(matches!(err, GedError::Json(_)));
    }
}
