//! Metadata blocks at the top of Markdown documents.
//!
//! Two flavours are understood: pandoc-like `% key: value` lines (md2epub, md2xml)
//! and a YAML block between `---` delimiters (md2pdf).

use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

lazy_static::lazy_static! {
    static ref YAML_BLOCK: Regex =
        Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)(?m:^(?:---|\.\.\.)[ \t]*\r?$)")
            .expect("couldn't compile regex");
}

/// Front matter values by key, kept sorted so generated command lines are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, treating an empty value as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets `key` only when it has no value yet.
    pub fn set_default(&mut self, key: &str, value: impl Into<String>) {
        if self.get(key).is_none() {
            self.insert(key, value);
        }
    }

    /// Title block understood by pandoc, built from `title`, `author` and `lang`.
    /// Empty when none of them is set.
    pub fn to_yaml_header(&self) -> String {
        if ["title", "author", "lang"].iter().all(|key| self.get(key).is_none()) {
            return String::new();
        }
        let mut header = String::from("---\n");
        if let Some(title) = self.get("title") {
            header.push_str(&format!("title: {title}\n"));
        }
        if let Some(author) = self.get("author") {
            header.push_str(&format!("author: {author}\n"));
        }
        if let Some(lang) = self.get("lang") {
            header.push_str(&format!("language: {lang}\n"));
        }
        header.push_str("---\n");
        header
    }
}

/// Typed YAML front matter. Null values read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocumentMeta {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lang: String,
    #[serde(deserialize_with = "null_as_default")]
    pub toc: String,
    #[serde(deserialize_with = "null_as_default")]
    pub logo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub header: String,
    #[serde(deserialize_with = "null_as_default")]
    pub footer: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DocumentMeta {
    /// Flattens the non-empty fields; tags are joined with `", "`.
    pub fn to_metadata(&self) -> Metadata {
        let mut data = Metadata::new();
        let fields = [
            ("title", &self.title),
            ("author", &self.author),
            ("date", &self.date),
            ("id", &self.id),
            ("email", &self.email),
            ("lang", &self.lang),
            ("toc", &self.toc),
            ("logo", &self.logo),
            ("header", &self.header),
            ("footer", &self.footer),
        ];
        for (key, value) in fields {
            if !value.is_empty() {
                data.insert(key, value.as_str());
            }
        }
        if !self.tags.is_empty() {
            data.insert("tags", self.tags.join(", "));
        }
        data
    }
}

fn percent_entry(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.strip_prefix("% ")?.split_once(':')?;
    Some((name.trim(), value.trim()))
}

/// Collects the leading `% key: value` lines and returns the rest of the document.
///
/// The scan stops at the first line that is not such an entry; that line and
/// everything after it make up the body.
pub fn split_percent_header(text: &str) -> (Metadata, String) {
    let mut data = Metadata::new();
    let lines: Vec<&str> = text.split('\n').collect();
    let mut limit = lines.len();
    for (index, line) in lines.iter().enumerate() {
        match percent_entry(line) {
            Some((name, value)) => data.insert(name, value),
            None => {
                limit = index;
                break;
            }
        }
    }
    (data, lines[limit..].join("\n"))
}

/// Parses a YAML block opening the document and returns it with the rest of the text.
pub fn split_yaml_header(text: &str) -> Result<(DocumentMeta, &str)> {
    let Some(captures) = YAML_BLOCK.captures(text) else {
        return Ok((DocumentMeta::default(), text));
    };
    let whole = captures.get(0).map_or(0, |m| m.end());
    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let meta = if yaml.trim().is_empty() {
        DocumentMeta::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    tracing::debug!(bytes = whole, "parsed YAML front matter");
    Ok((meta, &text[whole..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_lines_become_metadata() {
        let (data, body) =
            split_percent_header("% title: My Book\n% author :  Jane Doe \n\n# Chapter\n");
        assert_eq!(data.get("title"), Some("My Book"));
        assert_eq!(data.get("author"), Some("Jane Doe"));
        assert_eq!(body, "\n# Chapter\n");
    }

    #[test]
    fn percent_scan_stops_at_first_other_line() {
        let (data, body) = split_percent_header("% id: 1\nText\n% date: 2020\n");
        assert_eq!(data.len(), 1);
        assert_eq!(body, "Text\n% date: 2020\n");
    }

    #[test]
    fn percent_line_without_colon_ends_header() {
        let (data, body) = split_percent_header("% just a title\nbody");
        assert!(data.is_empty());
        assert_eq!(body, "% just a title\nbody");
    }

    #[test]
    fn value_keeps_later_colons() {
        let (data, _) = split_percent_header("% date: 2020-01-01 10:30\n");
        assert_eq!(data.get("date"), Some("2020-01-01 10:30"));
    }

    #[test]
    fn header_only_document_has_empty_body() {
        let (data, body) = split_percent_header("% title: T");
        assert_eq!(data.get("title"), Some("T"));
        assert_eq!(body, "");
    }

    #[test]
    fn yaml_header_lists_known_fields_in_order() {
        let mut data = Metadata::new();
        data.insert("lang", "en");
        data.insert("title", "Hello");
        data.insert("id", "ignored");
        assert_eq!(
            data.to_yaml_header(),
            "---\ntitle: Hello\nlanguage: en\n---\n"
        );
        assert_eq!(Metadata::new().to_yaml_header(), "");
    }

    #[test]
    fn yaml_front_matter_is_parsed() {
        let text = "---\ntitle: Report\nauthor: Me\ntags:\n  - a\n  - b\nid: 42\n---\n# Body\n";
        let (meta, body) = split_yaml_header(text).unwrap();
        assert_eq!(meta.title, "Report");
        assert_eq!(meta.id, "42");
        assert_eq!(body, "\n# Body\n");

        let data = meta.to_metadata();
        assert_eq!(data.get("tags"), Some("a, b"));
        assert_eq!(data.get("email"), None);
    }

    #[test]
    fn yaml_block_may_end_with_dots() {
        let (meta, body) = split_yaml_header("---\nlang: en\n...\ntext").unwrap();
        assert_eq!(meta.lang, "en");
        assert_eq!(body, "\ntext");
    }

    #[test]
    fn yaml_delimiter_must_be_a_whole_line() {
        let (meta, body) =
            split_yaml_header("---\ntitle: Wait... what---no\n---\nrest").unwrap();
        assert_eq!(meta.title, "Wait... what---no");
        assert_eq!(body, "\nrest");
    }

    #[test]
    fn missing_or_empty_yaml_block() {
        let (meta, body) = split_yaml_header("# No front matter").unwrap();
        assert_eq!(meta, DocumentMeta::default());
        assert_eq!(body, "# No front matter");

        let (meta, body) = split_yaml_header("---\n---\nbody").unwrap();
        assert_eq!(meta, DocumentMeta::default());
        assert_eq!(body, "\nbody");
    }

    #[test]
    fn yaml_nulls_read_as_empty() {
        let (meta, _) =
            split_yaml_header("---\ntitle: ~\nauthor: null\nemail:\ntags: ~\nlang: en\n---\n")
                .unwrap();
        assert_eq!(meta.title, "");
        assert_eq!(meta.author, "");
        assert_eq!(meta.email, "");
        assert!(meta.tags.is_empty());

        let data = meta.to_metadata();
        assert_eq!(data.get("title"), None);
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let err = split_yaml_header("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(err.to_string().starts_with("invalid YAML front matter"));
    }

    #[test]
    fn set_default_keeps_existing_values() {
        let mut data = Metadata::new();
        data.insert("lang", "en");
        data.set_default("lang", "fr");
        data.set_default("date", "20240101");
        assert_eq!(data.get("lang"), Some("en"));
        assert_eq!(data.get("date"), Some("20240101"));
    }
}
