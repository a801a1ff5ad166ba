//! Part normalization.
//!
//! A part file either wraps a known résumé section in a single-key envelope
//! (`{"work": [...]}`) or is an arbitrary object. Each loaded part is
//! classified once into a [`Part`] before it is placed in the composed
//! document.

use serde_json::{Map, Value};

/// Section names whose single-key envelopes are unwrapped during composition.
pub const SECTION_NAMES: &[&str] = &[
    "basics",
    "work",
    "practicalExperiences",
    "caseStudies",
    "education",
    "awards",
    "certificates",
    "courses",
    "publications",
    "skills",
    "languages",
    "interests",
    "projects",
];

/// Returns `true` if `name` is a recognized section name.
pub fn is_section_name(name: &str) -> bool {
    SECTION_NAMES.contains(&name)
}

/// A loaded part in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// A recognized section, already unwrapped from its envelope.
    Section { name: String, value: Value },
    /// Any other content, kept whole under its manifest part name.
    Raw { name: String, value: Value },
}

impl Part {
    /// Classify the parsed content of the part declared as `part_name`.
    pub fn classify(part_name: &str, content: Value) -> Self {
        match content {
            Value::Object(map) if is_section_envelope(&map) => {
                let (name, value) = map
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| (part_name.to_string(), Value::Null));
                Part::Section { name, value }
            }
            value => Part::Raw {
                name: part_name.to_string(),
                value,
            },
        }
    }

    /// The key this part occupies in the composed document.
    pub fn key(&self) -> &str {
        match self {
            Part::Section { name, .. } | Part::Raw { name, .. } => name,
        }
    }

    /// Place the part into the composed document, replacing any previous
    /// value at its key.
    pub fn insert_into(self, document: &mut Map<String, Value>) {
        let (Part::Section { name, value } | Part::Raw { name, value }) = self;
        document.insert(name, value);
    }
}

fn is_section_envelope(map: &Map<String, Value>) -> bool {
    map.len() == 1 && map.keys().all(|key| is_section_name(key))
}
