//! Integration tests for the gedgraph pipeline.
//!
//! These tests cover the flow from raw text through parsing and graph synthesis, both through
//! the library crates and through the `gg-cli` binary.

use std::io::Write;
use std::process::{Command, Output};

use gg_core::ParseConfig;
use gg_graph::{dangling_links, neighbors, synthesize};
use gg_parser::{GedcomParser, parse, parse_with_config};
use serde_json::Value;

const TREE: &str = "\
0 HEAD
0 @I1@ INDI
1 NAME Walter /Grey/
1 OCCU Miller
0 @I2@ INDI
1 NAME Edith /Grey/
1 NOTE @N1@
0 @I3@ INDI
1 NAME Hal /Grey/
0 @I4@ INDI
1 NAME Ivy /Grey/
1 ASSO @I3@
2 RELA Twin
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
1 CHIL @I4@
0 @N1@ NOTE Ran the village school
0 TRLR
";

fn gg_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gg-cli"))
        .args(args)
        .output()
        .expect("gg-cli should run")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "gg-cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn tree_parses_and_synthesizes_expected_links() {
    let parsed = parse(TREE);
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    assert_eq!(parsed.document.individuals.len(), 4);
    assert_eq!(
        parsed.document.individuals[1].notes,
        vec!["Ran the village school"]
    );

    let graph = synthesize(&parsed.document);
    let relations: Vec<&str> = graph
        .links
        .iter()
        .filter_map(|link| link.relation.as_deref())
        .collect();
    assert_eq!(
        relations,
        vec!["Sibling", "Twin", "Spouse", "Parent", "Parent", "Parent", "Parent"]
    );
    assert!(dangling_links(&graph).is_empty());
    assert_eq!(neighbors(&graph, "@I3@"), vec!["@I4@", "@I1@", "@I2@"]);
}

#[test]
fn streamed_chunks_build_the_same_graph() {
    let expected = synthesize(&parse(TREE).document);

    let mut parser = GedcomParser::new();
    for chunk in TREE.as_bytes().chunks(7) {
        parser.feed_chunk(std::str::from_utf8(chunk).expect("fixture is ASCII"));
    }
    let streamed = synthesize(&parser.finish().document);

    assert_eq!(streamed, expected);
}

#[test]
fn custom_vocabulary_flows_through_the_pipeline() {
    let config = ParseConfig {
        individual_prefix: "@P".to_string(),
        concatenation_tag: "CNC".to_string(),
        ..ParseConfig::default()
    };
    let input = "0 @P1@ INDI\n1 NOTE Long\n2 CNC hand\n0 @I2@ INDI\n";

    let parsed = parse_with_config(input, &config);
    let graph = synthesize(&parsed.document);

    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].notes, vec!["Longhand"]);
}

#[test]
fn cli_graph_reads_file_and_prints_json() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(TREE.as_bytes()).expect("write fixture");
    let path = file.path().to_string_lossy().to_string();

    let value = stdout_json(&gg_cli(&["graph", &path]));

    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["links"].as_array().map(Vec::len), Some(7));
    assert_eq!(value["nodes"][1]["notes"][0], "Ran the village school");
}

#[test]
fn cli_graph_writes_output_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("graph.json");
    let out_path = out.to_string_lossy().to_string();

    let output = gg_cli(&["graph", TREE, "--pretty", "--output", &out_path]);
    assert!(output.status.success());

    let written = std::fs::read_to_string(&out).expect("output file");
    let value: Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(value["links"][1]["type"], "association");
}

#[test]
fn cli_parse_summary_counts_records() {
    let value = stdout_json(&gg_cli(&["parse", TREE]));

    assert_eq!(value["individual_count"], 4);
    assert_eq!(value["family_count"], 1);
    assert_eq!(value["note_count"], 1);
    assert_eq!(value["warning_count"], 0);
}

#[test]
fn cli_validate_strict_fails_on_dangling_links() {
    let input = "0 @I1@ INDI\n0 @F1@ FAM\n1 HUSB @I1@\n1 CHIL @I7@\n";

    let lenient = gg_cli(&["validate", input, "--json"]);
    let report = stdout_json(&lenient);
    assert_eq!(report["valid"], true);
    assert_eq!(report["dangling_link_count"], 1);

    let strict = gg_cli(&["validate", input, "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn cli_inspect_reports_relationships_both_ways() {
    let value = stdout_json(&gg_cli(&["inspect", TREE, "--id", "@I4@", "--json"]));

    assert_eq!(value["person"]["name"], "Ivy GREY");
    let twin = value["relationships"]
        .as_array()
        .expect("relationships")
        .iter()
        .find(|view| view["relation"] == "Twin")
        .expect("association view");
    assert_eq!(twin["target_name"], "Hal GREY");
    assert_eq!(twin["reverse_relation"], "Sibling");

    let missing = gg_cli(&["inspect", TREE, "--id", "@I99@"]);
    assert!(!missing.status.success());
}

#[test]
fn cli_config_file_changes_vocabulary() {
    let mut config = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(config, "individual_prefix = \"@P\"").expect("write config");
    let config_path = config.path().to_string_lossy().to_string();

    let value = stdout_json(&gg_cli(&[
        "graph",
        "0 @P1@ INDI\n1 NAME Ann /Lee/\n0 @I1@ INDI\n",
        "--config",
        &config_path,
    ]));

    let nodes = value["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["id"], "@P1@");
}
