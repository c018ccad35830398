use lazy_static::*;
use regex::Regex;

lazy_static! {
    static ref DATASET_PAREN_REGEX: Regex =
        Regex::new(r#"^(.+) with \(['"](.+)['"]\)\s*$"#).expect("Regex compilation error");
    static ref DATASET_SET_REGEX: Regex =
        Regex::new(r#"^(.+) with data set "(.+)"\s*$"#).expect("Regex compilation error");
}

/// A test identifier split into its base name and the optional dataset
/// label carried by data-provider style tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    name: String,
    dataset: Option<String>,
}

impl Name {
    pub fn make(raw: &str) -> Self {
        let (name, dataset) = Name::parse(raw);
        Self { name, dataset }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    pub fn has_dataset(&self) -> bool {
        self.dataset.is_some()
    }

    /// Split a raw identifier. The parenthesised form wins over the
    /// "with data set" form; only one pattern ever applies.
    pub fn parse(raw: &str) -> (String, Option<String>) {
        if let Some(captures) = DATASET_PAREN_REGEX.captures(raw) {
            let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let dataset = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
            return (capitalise(name.trim()), Some(dataset.trim().to_owned()));
        }

        if let Some(captures) = DATASET_SET_REGEX.captures(raw) {
            let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let dataset = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
            return (capitalise(name.trim()), Some(dataset.trim().to_owned()));
        }

        (capitalise(raw.trim()), None)
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
