//! Line classification for cypress spec files
//!
//! Recognition is prefix-based and case-sensitive. A line matching no
//! prefix is silently skipped; comments, blank lines and arbitrary code
//! all fall through to `None`.

use regex::Regex;
use std::sync::OnceLock;

const GROUP_PREFIX: &str = "describe(";
const CASE_PREFIX: &str = "it(";
const LOG_PREFIX: &str = "cy.log(";

/// Metadata keys recognized inside a test case body, in check order.
const META_PREFIXES: [(&str, MetaKey); 3] = [
    ("TBCS_AUTID", MetaKey::ExternalId),
    ("TBCS_DESCRIPTION", MetaKey::Description),
    ("TBCS_CATEGORY", MetaKey::Category),
];

/// Kind of a metadata assignment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    ExternalId,
    Description,
    /// Recognized but has no modeled effect.
    Category,
}

/// One recognized directive extracted from a single spec line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    GroupStart(String),
    CaseStart(String),
    Meta(MetaKey, String),
    LogStep(String),
}

/// Classify one left-trimmed line of spec text.
pub fn classify(line: &str) -> Option<Directive> {
    if line.starts_with(GROUP_PREFIX) {
        return Some(Directive::GroupStart(captured_title(line)));
    }
    if line.starts_with(CASE_PREFIX) {
        return Some(Directive::CaseStart(captured_title(line)));
    }
    for (prefix, key) in META_PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Some(Directive::Meta(key, meta_value(rest)));
        }
    }
    if line.starts_with(LOG_PREFIX) {
        return Some(Directive::LogStep(captured_title(line)));
    }
    None
}

/// First single-quoted literal on the line. Falls back to the whole raw
/// line when the authoring file omits the quotes; that fallback is kept
/// for compatibility with malformed input.
fn captured_title(line: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"'([^']*)'").unwrap());
    re.captures(line)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| line.to_string())
}

/// Value of a `KEY('value')` assignment; `rest` is the text after the
/// key. Yields an empty string rather than an error when the quoted
/// segment is absent.
fn meta_value(rest: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\('(.*)'\)").unwrap());
    re.captures(rest)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}
