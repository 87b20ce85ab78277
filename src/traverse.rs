use std::collections::HashSet;

use scraper::Html;
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::fetcher::RecordSource;
use crate::model::{PersonRecord, Store};
use crate::parser::{self, facts, relations};

/// Assemble one `PersonRecord` from a parsed page. Name extraction is
/// mandatory; vitals and relationships degrade gracefully.
pub fn extract_record(doc: &Html, id: &str) -> Result<PersonRecord, ScrapeError> {
    let name = facts::extract_name(doc)?;

    let (birth, death) = match facts::vitals_container(doc) {
        Some(dl) => (facts::extract_birth(dl), facts::extract_death(dl)),
        None => Default::default(),
    };

    let sections = relations::family_sections(doc);
    let relations = relations::extract_relationships(&sections);

    Ok(PersonRecord {
        memorial_id: id.to_string(),
        name,
        birth,
        death,
        relations,
    })
}

/// Depth-first, pre-order: fetch, extract, merge into the store, then
/// recurse into each parent before returning. Fetch and structure failures
/// propagate unchanged and abort the whole run; the store keeps whatever it
/// had accumulated.
///
/// The visited set is the cycle guard: the source data is not trusted to be
/// acyclic, so a re-visited identifier is reported and skipped instead of
/// recursing without bound. No parents left to visit is the normal
/// termination.
pub fn collect<S: RecordSource>(
    source: &S,
    id: &str,
    store: &mut Store,
    visited: &mut HashSet<String>,
) -> Result<(), ScrapeError> {
    if !visited.insert(id.to_string()) {
        warn!(id, "already visited, skipping (cycle or shared ancestor)");
        return Ok(());
    }

    let html = source.fetch(id)?;
    let doc = parser::parse_document(&html);
    let record = extract_record(&doc, id)?;
    info!(id, name = %record.name, "record assembled");

    let next = next_parent_ids(&record);
    store.insert(id.to_string(), record);

    for parent_id in next {
        println!("Looking up {}", parent_id);
        collect(source, &parent_id, store, visited)?;
    }

    Ok(())
}

/// Identifiers of the next generation, read from the record's "Parents"
/// group. Absent group means an empty list.
pub fn next_parent_ids(record: &PersonRecord) -> Vec<String> {
    let Some(parents) = record.relations.get("Parents") else {
        return Vec::new();
    };
    parents
        .values()
        .filter_map(|r| parent_id_from_link(&r.link))
        .collect()
}

// Link format: /memorial/<identifier>/<name-slug>
fn parent_id_from_link(link: &str) -> Option<String> {
    match link.splitn(4, '/').nth(2) {
        Some(seg) if !seg.is_empty() => Some(seg.to_string()),
        _ => {
            warn!(link, "parent link missing identifier segment");
            None
        }
    }
}

// ── Tests ──
