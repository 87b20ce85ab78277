use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::clean_text;
use crate::model::{RelatedPersonRef, RelationMap};

/// Stand-in when a relative's page lists no machine-readable date.
pub const PLACEHOLDER_DATE: &str = "1 Jan 1001";

static SECTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.col-12.col-sm-6.col-print-auto").unwrap());
static LABEL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("b").unwrap());
static MEMBER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.member-item.d-flex.mb-2").unwrap());
static NAME_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());
static BDAY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"span[itemprop="birthDate"]"#).unwrap());
static DDAY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"span[itemprop="deathDate"]"#).unwrap());

/// All relationship-group sections on the page, document order.
pub fn family_sections(doc: &Html) -> Vec<ElementRef<'_>> {
    doc.select(&SECTION_SEL).collect()
}

/// Group related persons by the section's label. A label repeated across
/// sections merges into one inner map; a repeated member name within a label
/// overwrites the earlier entry's fields.
pub fn extract_relationships(sections: &[ElementRef<'_>]) -> RelationMap {
    let mut out = RelationMap::new();

    for section in sections {
        let Some(label_el) = section.select(&LABEL_SEL).next() else {
            debug!("relationship section without a label, skipping");
            continue;
        };
        let label = clean_text(label_el);

        for member in section.select(&MEMBER_SEL) {
            let Some(name_el) = member.select(&NAME_SEL).next() else {
                debug!(%label, "member entry without a name heading, skipping");
                continue;
            };
            let name = clean_text(name_el);
            let Some(link) = member.value().attr("data-href") else {
                debug!(%label, %name, "member entry without data-href, skipping");
                continue;
            };

            let birth = member
                .select(&BDAY_SEL)
                .next()
                .map(clean_text)
                .unwrap_or_else(|| PLACEHOLDER_DATE.to_string());
            let death = member
                .select(&DDAY_SEL)
                .next()
                .map(clean_text)
                .unwrap_or_else(|| PLACEHOLDER_DATE.to_string());

            out.entry(label.clone()).or_default().insert(
                name,
                RelatedPersonRef {
                    link: link.to_string(),
                    birth,
                    death,
                },
            );
        }
    }

    out
}

// ── Tests ──
