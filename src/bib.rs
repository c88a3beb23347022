//! Typed access to parsed BibTeX entries
//!
//! Parsing is delegated to `biblatex`'s raw parser. Field values keep their
//! TeX source as written: only the outer `{}` or `""` delimiter is dropped and
//! `@string` abbreviations are expanded. Inner braces and escapes such as `\&`
//! are left alone.

use crate::error::{Error, Result};
use biblatex::{Pair, RawBibliography, RawChunk, RawEntry};
use std::collections::{BTreeMap, HashMap};

/// Month abbreviations every BibTeX style predefines
const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// One bibliography entry with its fields as raw strings.
///
/// Field names are stored lowercased, so `archivePrefix` and `archiveprefix`
/// resolve to the same accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    key: String,
    fields: BTreeMap<String, String>,
}

impl BibEntry {
    pub fn from_fields<K, V>(key: &str, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            key: key.to_string(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
        }
    }

    fn from_raw(entry: &RawEntry, strings: &Abbreviations) -> Self {
        Self::from_fields(
            entry.key.v,
            entry
                .fields
                .iter()
                .map(|pair| (pair.key.v, strings.expand(pair))),
        )
    }

    /// Citation key (`@article{key, ...}`)
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn author(&self) -> Option<&str> {
        self.get("author")
    }

    pub fn journal(&self) -> Option<&str> {
        self.get("journal")
    }

    pub fn booktitle(&self) -> Option<&str> {
        self.get("booktitle")
    }

    pub fn archive_prefix(&self) -> Option<&str> {
        self.get("archiveprefix")
    }

    pub fn year(&self) -> Option<&str> {
        self.get("year")
    }

    pub fn publisher(&self) -> Option<&str> {
        self.get("publisher")
    }

    pub fn doi(&self) -> Option<&str> {
        self.get("doi")
    }
}

/// `@string` definitions, keyed by lowercased name
struct Abbreviations(HashMap<String, String>);

impl Abbreviations {
    fn new(defs: &[Pair]) -> Self {
        let mut strings = Abbreviations(
            MONTHS
                .iter()
                .map(|(name, month)| (name.to_string(), month.to_string()))
                .collect(),
        );
        // A definition may use the ones above it
        for def in defs {
            let value = strings.expand(def);
            strings.0.insert(def.key.v.to_ascii_lowercase(), value);
        }
        strings
    }

    /// Concatenate a field's parts, expanding abbreviations.
    ///
    /// An undefined abbreviation is kept as its name.
    fn expand(&self, pair: &Pair) -> String {
        pair.value
            .v
            .iter()
            .map(|chunk| match chunk.v {
                RawChunk::Normal(text) => text,
                RawChunk::Abbreviation(name) => self
                    .0
                    .get(&name.to_ascii_lowercase())
                    .map(String::as_str)
                    .unwrap_or(name),
            })
            .collect()
    }
}

/// Parse BibTeX source into entries, in file order.
pub fn parse_bibliography(src: &str) -> Result<Vec<BibEntry>> {
    let raw = RawBibliography::parse(src).map_err(|e| Error::Bib(e.to_string()))?;
    let strings = Abbreviations::new(&raw.abbreviations);
    Ok(raw
        .entries
        .iter()
        .map(|entry| BibEntry::from_raw(&entry.v, &strings))
        .collect())
}

/// Remove literal `{` and `}` characters
pub fn strip_braces(s: &str) -> String {
    s.replace(['{', '}'], "")
}

/// Everything before the first `" and "` separator
pub fn first_author(authors: &str) -> &str {
    authors.split(" and ").next().unwrap_or_default()
}
