//! Structural pattern templates.
//!
//! Recognizes the common shapes registry submissions take (time-of-day
//! prefixes, geography prefixes, publication-type suffixes). The result is
//! explanatory metadata only; it never influences scoring.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StructuralPattern {
    TimeBased,
    LocationBased,
    PublicationType,
}

impl std::fmt::Display for StructuralPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructuralPattern::TimeBased => write!(f, "TimeBased"),
            StructuralPattern::LocationBased => write!(f, "LocationBased"),
            StructuralPattern::PublicationType => write!(f, "PublicationType"),
        }
    }
}

static TEMPLATES: Lazy<[(StructuralPattern, Regex); 3]> = Lazy::new(|| {
    [
        (
            StructuralPattern::TimeBased,
            Regex::new(r"^(morning|evening|daily|weekly|dawn|dusk|sunrise|sunset)\s+\w+").unwrap(),
        ),
        (
            StructuralPattern::LocationBased,
            Regex::new(r"^(indian|bharat|hindu|national|global)\s+\w+").unwrap(),
        ),
        (
            StructuralPattern::PublicationType,
            Regex::new(r".*\s+(chronicle|express|herald|times|news|diary|post|journal|mail)$")
                .unwrap(),
        ),
    ]
});

pub fn detect(title: &str) -> Vec<StructuralPattern> {
    let lowered = title.to_lowercase();
    TEMPLATES
        .iter()
        .filter(|(_, re)| re.is_match(&lowered))
        .map(|(p, _)| *p)
        .collect()
}
