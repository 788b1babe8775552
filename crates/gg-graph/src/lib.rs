#![forbid(unsafe_code)]

//! Relationship graph synthesis.
//!
//! Links are emitted in a fixed order so renderers see the same sequence for the same
//! document:
//!
//! 1. sibling links, per family, for every child pair in child order
//! 2. association links, per individual, in declaration order
//! 3. spouse and parent links, per family
//!
//! Nothing is deduplicated.

mod query;

pub use query::{dangling_links, links_of, neighbors, reverse_relation, validate_links};

use gg_core::{
    Family, FamilyGraph, FamilyRelation, GedcomDocument, GraphLink, Individual, LinkType,
};
use tracing::debug;

/// Build the `{nodes, links}` value from resolved entity tables.
#[must_use]
pub fn synthesize(document: &GedcomDocument) -> FamilyGraph {
    let mut links = Vec::new();

    push_sibling_links(&document.families, &mut links);
    let siblings = links.len();

    push_association_links(&document.individuals, &mut links);
    let associations = links.len() - siblings;

    push_family_links(&document.families, &mut links);
    let family = links.len() - siblings - associations;

    debug!(
        nodes = document.individuals.len(),
        siblings, associations, family, "synthesized graph"
    );

    FamilyGraph {
        nodes: document.individuals.clone(),
        links,
    }
}

fn push_sibling_links(families: &[Family], links: &mut Vec<GraphLink>) {
    for family in families {
        for (index, elder) in family.children.iter().enumerate() {
            for younger in &family.children[index + 1..] {
                links.push(GraphLink::family(
                    elder.as_str(),
                    younger.as_str(),
                    FamilyRelation::Sibling,
                ));
            }
        }
    }
}

fn push_association_links(individuals: &[Individual], links: &mut Vec<GraphLink>) {
    for individual in individuals {
        for association in &individual.associations {
            links.push(GraphLink {
                source: individual.id.clone(),
                target: association.person.clone(),
                relation: association.relation.clone(),
                link_type: LinkType::Association,
                notes: Some(association.notes.clone()),
            });
        }
    }
}

fn push_family_links(families: &[Family], links: &mut Vec<GraphLink>) {
    for family in families {
        if let (Some(husband), Some(wife)) = (&family.husband, &family.wife) {
            links.push(GraphLink::family(
                husband.as_str(),
                wife.as_str(),
                FamilyRelation::Spouse,
            ));
        }
        for child in &family.children {
            for parent in [&family.husband, &family.wife].into_iter().flatten() {
                links.push(GraphLink::family(
                    parent.as_str(),
                    child.as_str(),
                    FamilyRelation::Parent,
                ));
            }
        }
    }
}
