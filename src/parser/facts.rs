use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{clean_text, compile_chain, select_chain};
use crate::error::ScrapeError;
use crate::model::{BirthInfo, DeathInfo};

// The page layout is version-fragile; these chains pin the one observed
// structure. The name chain is mandatory, the vitals chains are not.
static NAME_CHAIN: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    compile_chain(&[
        "div.main-wrap",
        "section#content",
        "div.container-xl.section-bio-cover",
        "div.row.flex-print-nowrap",
        "div.col-12.col-md-7.col-print-auto.mt-sm-3",
        "h1",
    ])
});

// "Notable" memorials carry an extra promod class on the wrapper.
static VITALS_CHAIN_PROMOD: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    compile_chain(&[
        "div.main-wrap",
        "section#content",
        "div.nonfamous-mem.promod.on-photo",
        "div.section-first.memorial-overview.theme-bg",
        "div.container-xl.section-bio-cover",
        "div.row.flex-print-nowrap",
        "div.col-12.col-md-7.col-print-auto.mt-sm-3",
        "dl.mem-events.row.row-cols-2.gx-2",
    ])
});

static VITALS_CHAIN_PLAIN: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    compile_chain(&[
        "div.main-wrap",
        "section#content",
        "div.nonfamous-mem.on-photo",
        "div.section-first.memorial-overview.theme-bg",
        "div.container-xl.section-bio-cover",
        "div.row.flex-print-nowrap",
        "div.col-12.col-md-7.col-print-auto.mt-sm-3",
        "dl.mem-events.row.row-cols-2.gx-2",
    ])
});

static DD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dd").unwrap());
static BIRTH_DATE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"time[itemprop="birthDate"]"#).unwrap());
static BIRTH_PLACE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"div[itemprop="birthPlace"]"#).unwrap());
static DEATH_DATE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"span[itemprop="deathDate"]"#).unwrap());
static DEATH_PLACE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"div[itemprop="deathPlace"]"#).unwrap());

/// The person's display name. A record without a name is useless, so a
/// broken chain is a hard failure. Text is whitespace-collapsed and the
/// "VVeteran" rendering artifact corrected.
pub fn extract_name(doc: &Html) -> Result<String, ScrapeError> {
    let h1 = select_chain(doc.root_element(), &NAME_CHAIN)
        .ok_or(ScrapeError::Structure("name heading"))?;
    Ok(clean_text(h1).replace("VVeteran", "Veteran"))
}

/// The `dl` holding birth/death events, if either layout variant resolves.
/// Callers tolerate `None`; many records have no machine-readable vitals.
pub fn vitals_container(doc: &Html) -> Option<ElementRef<'_>> {
    select_chain(doc.root_element(), &VITALS_CHAIN_PROMOD)
        .or_else(|| select_chain(doc.root_element(), &VITALS_CHAIN_PLAIN))
}

/// Scan the container's `dd` entries for birth facts. The date marker gates
/// each entry: a child without it contributes nothing, even if it carries a
/// place. Misses are swallowed and the scan continues; zero, one, or two
/// fields may come back populated. First seen wins.
pub fn extract_birth(container: ElementRef<'_>) -> BirthInfo {
    let mut info = BirthInfo::default();
    for dd in container.select(&DD_SEL) {
        let Some(date_el) = dd.select(&BIRTH_DATE_SEL).next() else {
            continue;
        };
        if info.birthdate.is_none() {
            info.birthdate = Some(clean_text(date_el));
        }
        if info.birthplace.is_none() {
            if let Some(el) = dd.select(&BIRTH_PLACE_SEL).next() {
                info.birthplace = Some(clean_text(el));
            }
        }
        if info.birthdate.is_some() && info.birthplace.is_some() {
            break;
        }
    }
    info
}

/// Same scan policy as [`extract_birth`], for the death markers.
pub fn extract_death(container: ElementRef<'_>) -> DeathInfo {
    let mut info = DeathInfo::default();
    for dd in container.select(&DD_SEL) {
        let Some(date_el) = dd.select(&DEATH_DATE_SEL).next() else {
            continue;
        };
        if info.deathdate.is_none() {
            info.deathdate = Some(clean_text(date_el));
        }
        if info.deathplace.is_none() {
            if let Some(el) = dd.select(&DEATH_PLACE_SEL).next() {
                info.deathplace = Some(clean_text(el));
            }
        }
        if info.deathdate.is_some() && info.deathplace.is_some() {
            break;
        }
    }
    info
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn fixture(name: &str) -> Html {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        parse_document(&html)
    }

    #[test]
    fn name_is_cleaned() {
        let doc = fixture("root");
        let name = extract_name(&doc).unwrap();
        assert_eq!(name, "John Doe Veteran");
        assert!(!name.contains("  "));
        assert!(!name.contains("VVeteran"));
    }

    #[test]
    fn missing_name_chain_is_a_hard_failure() {
        let doc = fixture("noname");
        let err = extract_name(&doc).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    #[test]
    fn promod_vitals_chain() {
        let doc = fixture("root");
        let dl = vitals_container(&doc).expect("promod chain should resolve");
        let birth = extract_birth(dl);
        assert_eq!(birth.birthdate.as_deref(), Some("4 Jul 1900"));
        assert_eq!(birth.birthplace.as_deref(), Some("Springfield, Illinois, USA"));
        let death = extract_death(dl);
        assert_eq!(death.deathdate.as_deref(), Some("12 Mar 1980"));
        assert_eq!(death.deathplace.as_deref(), Some("Chicago, Illinois, USA"));
    }

    #[test]
    fn plain_variant_falls_back_and_partial_facts_never_error() {
        let doc = fixture("father");
        let dl = vitals_container(&doc).expect("plain chain should resolve");
        let birth = extract_birth(dl);
        // Date without place: the place key stays absent, no error.
        assert_eq!(birth.birthdate.as_deref(), Some("2 Feb 1870"));
        assert_eq!(birth.birthplace, None);
        let death = extract_death(dl);
        assert_eq!(death.deathdate.as_deref(), Some("9 Sep 1940"));
        assert_eq!(death.deathplace.as_deref(), Some("Springfield, Illinois, USA"));
    }

    #[test]
    fn place_only_entry_contributes_nothing() {
        let doc = parse_document(
            r#"<dl class="mem-events row row-cols-2 gx-2">
                <dd><div itemprop="birthPlace">Nowhere, USA</div></dd>
                <dd><div itemprop="deathPlace">Somewhere, USA</div></dd>
                <dd><span itemprop="deathDate">1 Jan 1950</span></dd>
               </dl>"#,
        );
        let sel = Selector::parse("dl").unwrap();
        let dl = doc.select(&sel).next().unwrap();

        // No date marker on the first children, so their places are ignored.
        assert_eq!(extract_birth(dl), BirthInfo::default());
        let death = extract_death(dl);
        assert_eq!(death.deathdate.as_deref(), Some("1 Jan 1950"));
        assert_eq!(death.deathplace, None);
    }

    #[test]
    fn missing_vitals_container_is_tolerated() {
        let doc = fixture("mother");
        assert!(vitals_container(&doc).is_none());
        assert_eq!(extract_name(&doc).unwrap(), "Mary Doe");
    }
}
