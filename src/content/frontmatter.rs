//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// Front-matter data from a content file, in source key order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter(IndexMap<String, Value>);

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Never fails: a document without a metadata block, or with one that
    /// cannot be parsed, yields empty front-matter and the full text as body.
    pub fn parse(content: &str) -> (Self, &str) {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        // YAML front-matter (---), but not a `----` thematic break
        if content.starts_with("---") && !content.starts_with("----") {
            return Self::parse_yaml(content);
        }

        // JSON front-matter (;;;)
        if content.starts_with(";;;") {
            return Self::parse_json(content);
        }

        (FrontMatter::default(), content)
    }

    fn parse_yaml(content: &str) -> (Self, &str) {
        let Some((yaml_content, remaining)) = split_block(&content[3..], "---") else {
            return (FrontMatter::default(), content);
        };

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        match serde_yaml::from_str::<IndexMap<String, Value>>(yaml_content) {
            Ok(map) => (FrontMatter(map), remaining),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    fn parse_json(content: &str) -> (Self, &str) {
        let Some((json_content, remaining)) = split_block(&content[3..], ";;;") else {
            return (FrontMatter::default(), content);
        };

        match serde_json::from_str::<IndexMap<String, Value>>(json_content) {
            Ok(map) => (FrontMatter(map), remaining),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse JSON front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A field counts as present when it holds a truthy value
    pub fn is_present(&self, key: &str) -> bool {
        self.0.get(key).map(is_truthy).unwrap_or(false)
    }

    /// Required fields that are absent or falsy, in the order given
    pub fn missing(&self, required: &[&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|key| !self.is_present(key))
            .collect()
    }

    /// Deserialize into a typed view (PostFrontMatter, ProjectFrontMatter, ...)
    pub fn to_typed<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_yaml::Error> {
        let mapping = self
            .0
            .iter()
            .map(|(k, v)| (Value::String(k.clone()), v.clone()))
            .collect();
        serde_yaml::from_value(Value::Mapping(mapping))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

/// Split `rest` (the text after an opening delimiter) into the block and the body.
///
/// The opening delimiter must end its line; the block closes at the first
/// line that consists solely of `delimiter`. The body starts on the line after.
fn split_block<'a>(rest: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let newline = rest.find('\n')?;
    if !rest[..newline].trim().is_empty() {
        return None;
    }
    let rest = &rest[newline + 1..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// JavaScript-style truthiness, which is what "present" means for required fields
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => true,
    }
}

/// Render a scalar as a string; collections and null have no string form
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Custom deserializer that accepts any scalar where a string is expected
pub(crate) fn opt_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

/// Custom deserializer that handles both a single string and a list of strings
pub(crate) fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(&other).into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
tags:
  - rust
  - networking
---
This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.get("title"), Some(&Value::from("Hello World")));
        assert_eq!(fm.get("date"), Some(&Value::from("2024-01-15")));
        assert_eq!(remaining, "This is the content.\n");
        let keys: Vec<_> = fm.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["title", "date", "tags"]);
    }

    #[test]
    fn test_no_frontmatter_keeps_full_text() {
        let content = "\n# Heading\n\nJust body content";
        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_empty_block() {
        let (fm, remaining) = FrontMatter::parse("---\n---\nBody");
        assert!(fm.is_empty());
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_crlf_delimiters() {
        let (fm, remaining) = FrontMatter::parse("---\r\ntitle: T\r\n---\r\nHello");
        assert_eq!(fm.get("title"), Some(&Value::from("T")));
        assert_eq!(remaining, "Hello");
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let content = "---\ntitle: T\nno closing delimiter";
        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        // A horizontal rule pair around prose is not a metadata block
        let content = r#"---
Just a paragraph between two rules.
---
More content here.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_thematic_break_is_not_frontmatter() {
        let content = "----\ntitle: T\n----\nBody";
        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = ";;;\n{\"title\": \"Test Post\", \"tags\": [\"a\", \"b\"]}\n;;;\nThis is content.\n";

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.get("title"), Some(&Value::from("Test Post")));
        assert_eq!(remaining, "This is content.\n");
    }

    #[test]
    fn test_bom_is_skipped() {
        let (fm, remaining) = FrontMatter::parse("\u{feff}---\ntitle: T\n---\nHi");
        assert!(fm.is_present("title"));
        assert_eq!(remaining, "Hi");
    }

    #[test]
    fn test_missing_uses_truthiness() {
        let (fm, _) = FrontMatter::parse(
            "---\ntitle: \"\"\ndate: 2024-01-01\nexcerpt: ~\ndraft: false\ntags: []\n---\n",
        );
        assert_eq!(
            fm.missing(&["title", "date", "excerpt", "author", "tags"]),
            vec!["title", "excerpt", "author"]
        );
        assert!(!fm.is_present("draft"));
    }

    #[test]
    fn test_scalar_coercion() {
        #[derive(Deserialize)]
        struct View {
            #[serde(default, deserialize_with = "opt_scalar_string")]
            title: Option<String>,
            #[serde(default, deserialize_with = "string_or_vec")]
            tags: Vec<String>,
        }

        let (fm, _) = FrontMatter::parse("---\ntitle: 1984\ntags: [rust, 2024, ~]\n---\n");
        let view: View = fm.to_typed().unwrap();
        assert_eq!(view.title.as_deref(), Some("1984"));
        assert_eq!(view.tags, vec!["rust", "2024"]);

        let (fm, _) = FrontMatter::parse("---\ntags: Notes\n---\n");
        let view: View = fm.to_typed().unwrap();
        assert_eq!(view.title, None);
        assert_eq!(view.tags, vec!["Notes"]);
    }
}
