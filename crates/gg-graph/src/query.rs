//! Read-only lookups over a synthesized graph.

use gg_core::{Diagnostic, DiagnosticCategory, FamilyGraph, GraphLink};
use rustc_hash::FxHashSet;

/// Links that have `id` as source or target, in emission order.
pub fn links_of<'a>(graph: &'a FamilyGraph, id: &'a str) -> impl Iterator<Item = &'a GraphLink> {
    graph.links.iter().filter(move |link| link.touches(id))
}

/// Ids connected to `id` in either direction, first-seen order, without `id` itself.
#[must_use]
pub fn neighbors<'a>(graph: &'a FamilyGraph, id: &str) -> Vec<&'a str> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for link in &graph.links {
        let other = if link.source == id {
            link.target.as_str()
        } else if link.target == id {
            link.source.as_str()
        } else {
            continue;
        };
        if other != id && seen.insert(other) {
            out.push(other);
        }
    }
    out
}

/// Relation of the first link running the opposite way (target to source).
#[must_use]
pub fn reverse_relation<'a>(graph: &'a FamilyGraph, link: &GraphLink) -> Option<&'a str> {
    graph
        .links
        .iter()
        .find(|candidate| candidate.source == link.target && candidate.target == link.source)
        .and_then(|candidate| candidate.relation.as_deref())
}

/// Links whose source or target does not name a node.
#[must_use]
pub fn dangling_links(graph: &FamilyGraph) -> Vec<&GraphLink> {
    let ids: FxHashSet<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    graph
        .links
        .iter()
        .filter(|link| !ids.contains(link.source.as_str()) || !ids.contains(link.target.as_str()))
        .collect()
}

/// One reference warning per missing link endpoint.
#[must_use]
pub fn validate_links(graph: &FamilyGraph) -> Vec<Diagnostic> {
    let ids: FxHashSet<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    let mut diagnostics = Vec::new();

    for link in &graph.links {
        for (end, id) in [("source", &link.source), ("target", &link.target)] {
            if ids.contains(id.as_str()) {
                continue;
            }
            let relation = link.relation.as_deref().unwrap_or(link.link_type.as_str());
            diagnostics.push(
                Diagnostic::warning(format!(
                    "{relation} link {} -> {} has no individual for its {end}",
                    link.source, link.target
                ))
                .with_category(DiagnosticCategory::Reference)
                .with_found(id.as_str()),
            );
        }
    }

    diagnostics
}
