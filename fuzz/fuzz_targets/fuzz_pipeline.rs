#![no_main]

use gg_core::{FamilyGraph, FamilyRelation};
use gg_graph::{dangling_links, synthesize, validate_links};
use gg_parser::parse;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 16 * 1024 {
        return;
    }

    let parsed = parse(text);
    let graph = synthesize(&parsed.document);

    // One node per individual, in table order.
    assert_eq!(graph.nodes, parsed.document.individuals);

    // Sibling links are exactly the unordered child pairs of every family.
    let expected_siblings: usize = parsed
        .document
        .families
        .iter()
        .map(|family| family.children.len() * family.children.len().saturating_sub(1) / 2)
        .sum();
    let siblings = graph
        .links
        .iter()
        .filter(|link| link.relation.as_deref() == Some(FamilyRelation::Sibling.as_str()))
        .filter(|link| link.notes.is_none())
        .count();
    assert_eq!(siblings, expected_siblings);

    // Every dangling endpoint yields one validation warning.
    let dangling_ends: usize = dangling_links(&graph)
        .iter()
        .map(|link| {
            usize::from(graph.node(&link.source).is_none())
                + usize::from(graph.node(&link.target).is_none())
        })
        .sum();
    assert_eq!(validate_links(&graph).len(), dangling_ends);

    // The render contract must survive a JSON round trip.
    let json = serde_json::to_string(&graph).expect("graph should serialize");
    let back: FamilyGraph = serde_json::from_str(&json).expect("graph should deserialize");
    assert_eq!(back, graph);
});
