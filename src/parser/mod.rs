pub mod facts;
pub mod relations;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Compile selector steps once; chains live in `LazyLock` statics.
pub(crate) fn compile_chain(steps: &[&str]) -> Vec<Selector> {
    steps.iter().map(|s| Selector::parse(s).unwrap()).collect()
}

/// Walk an ordered list of selector steps, taking the first match at each
/// step. `None` as soon as any link in the chain is missing; alternate
/// chains are tried by the caller.
pub(crate) fn select_chain<'a>(root: ElementRef<'a>, steps: &[Selector]) -> Option<ElementRef<'a>> {
    let mut cur = root;
    for sel in steps {
        cur = cur.select(sel).next()?;
    }
    Some(cur)
}

/// Element text, trimmed, with whitespace runs collapsed to one space.
pub(crate) fn clean_text(el: ElementRef) -> String {
    let raw: String = el.text().collect();
    WS_RE.replace_all(&raw, " ").trim().to_string()
}

// ── Tests ──
