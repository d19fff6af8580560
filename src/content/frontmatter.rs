//! Front-matter parsing and rendering

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::ContentError;

/// Format used when writing timestamps back into a header.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// Header keys with a dedicated [`FrontMatter`] field
pub const RESERVED_KEYS: [&str; 7] = [
    "layout",
    "title",
    "date",
    "updated",
    "categories",
    "tags",
    "published",
];

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut items = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                items.push(item);
            }
            Ok(items)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Like [`string_or_vec`], but list entries may themselves be lists:
/// `[[Programming, Rust], [Notes]]` flattens to `[Programming, Rust, Notes]`
fn category_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Name(String),
        Path(#[serde(deserialize_with = "string_or_vec")] Vec<String>),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Categories {
        One(String),
        Many(Vec<Entry>),
        Empty(()),
    }

    Ok(match Categories::deserialize(deserializer)? {
        Categories::One(name) => vec![name],
        Categories::Many(entries) => entries
            .into_iter()
            .flat_map(|entry| match entry {
                Entry::Name(name) => vec![name],
                Entry::Path(path) => path,
            })
            .collect(),
        Categories::Empty(()) => Vec::new(),
    })
}

fn default_published() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// The metadata header of a document.
///
/// Recognised keys get their own fields; everything else is kept verbatim,
/// in source order, in `extra` so it survives a write/read cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(deserialize_with = "category_list", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "string_or_vec", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default = "default_published", skip_serializing_if = "is_true")]
    pub published: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            layout: None,
            title: None,
            date: None,
            updated: None,
            categories: Vec::new(),
            tags: Vec::new(),
            published: true,
            extra: IndexMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    ///
    /// A file without a header yields the default front-matter and the whole
    /// content as body. A header that is present but does not deserialize is
    /// an error.
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let trimmed = content.trim_start();

        if trimmed.starts_with("---") {
            return Self::parse_yaml(content, trimmed);
        }

        if trimmed.starts_with(";;;") || starts_with_json_object(trimmed) {
            return Self::parse_json(trimmed);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml<'a>(
        original: &'a str,
        trimmed: &'a str,
    ) -> Result<(Self, &'a str), ContentError> {
        let Some((yaml, body)) = split_fenced(trimmed, "---") else {
            // No closing fence: a leading horizontal rule, not a header
            return Ok((FrontMatter::default(), original));
        };

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        // Markdown may open with `---` rules around prose; only treat the
        // block as a header when it has `key: value` lines
        if !looks_like_yaml(yaml) {
            return Ok((FrontMatter::default(), original));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok((fm, body))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), ContentError> {
        if content.starts_with(";;;") {
            if let Some((json, body)) = split_fenced(content, ";;;") {
                let fm = serde_json::from_str::<FrontMatter>(json)?;
                return Ok((fm, body));
            }
            return Ok((FrontMatter::default(), content));
        }

        // A bare JSON object at the start of the file
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<FrontMatter>();
        match stream.next() {
            Some(Ok(fm)) => {
                let body = strip_line_ending(&content[stream.byte_offset()..]);
                Ok((fm, body))
            }
            Some(Err(e)) => Err(e.into()),
            None => Ok((FrontMatter::default(), content)),
        }
    }

    /// Serialize the header as a fenced YAML block, ready to prepend to a body
    pub fn render(&self) -> Result<String, ContentError> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n", yaml))
    }

    /// Parse the date string into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.date.as_deref().and_then(parse_date_string)
    }

    /// Parse the updated date string into a DateTime
    pub fn parse_updated(&self) -> Option<DateTime<Local>> {
        self.updated.as_deref().and_then(parse_date_string)
    }
}

/// Split `content` into the text between an opening and closing fence line
/// and the text after the closing line.
fn split_fenced<'a>(content: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let after_open = content.strip_prefix(fence)?;
    let rest = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == fence {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// `{"key"` or `{}`, not a template tag such as `{% raw %}`
fn starts_with_json_object(s: &str) -> bool {
    s.strip_prefix('{')
        .map(|rest| {
            let rest = rest.trim_start();
            rest.starts_with('"') || rest.starts_with('}')
        })
        .unwrap_or(false)
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

/// Whether a fenced block has at least one `key: value` line
fn looks_like_yaml(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp" | "mailto");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

const DATE_ONLY_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date string in various formats.
///
/// Strings without an offset are read as local time.
pub fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Local));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_from_naive(dt);
        }
    }

    for fmt in DATE_ONLY_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return local_from_naive(d.and_hms_opt(0, 0, 0)?);
        }
    }

    None
}

pub(crate) fn local_from_naive(dt: NaiveDateTime) -> Option<DateTime<Local>> {
    resolve_local(&Local, dt)
}

/// Map a wall-clock time into `tz`. Times skipped by a DST change move
/// forward to the first valid quarter hour after the gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, dt: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&dt).earliest().or_else(|| {
        (1..=12).find_map(|step| {
            tz.from_local_datetime(&(dt + Duration::minutes(15 * step)))
                .earliest()
        })
    })
}

/// Format a timestamp the way headers are written
pub fn format_date(dt: &DateTime<Local>) -> String {
    dt.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
layout: post
title: Hello World
date: 2024-01-15 10:30:00
tags:
  - rust
  - blogging
categories:
  - programming
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.layout.as_deref(), Some("post"));
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.tags, vec!["rust", "blogging"]);
        assert_eq!(fm.categories, vec!["programming"]);
        assert!(fm.published);
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test Post", "tags": ["a", "b"]}

This is content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Test Post"));
        assert_eq!(fm.tags, vec!["a", "b"]);
        assert!(body.contains("This is content."));
    }

    #[test]
    fn test_parse_fenced_json_frontmatter() {
        let content = ";;;\n{\"title\": \"Fenced\", \"date\": \"2024-03-01\"}\n;;;\nBody\n";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Fenced"));
        assert_eq!(fm.date.as_deref(), Some("2024-03-01"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = r#"---
title: Single Tag Post
date: 2024-01-15
tags: Notes
categories: Blog
---

Content here.
"#;

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Single Tag Post"));
        assert_eq!(fm.tags, vec!["Notes"]);
        assert_eq!(fm.categories, vec!["Blog"]);
    }

    #[test]
    fn test_nested_categories_flatten() {
        let content = r#"---
title: Nested
date: 2024-01-15
categories:
  - [Programming, Rust]
  - [Notes]
---
"#;

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.categories, vec!["Programming", "Rust", "Notes"]);

        let (mixed, _) =
            FrontMatter::parse("---\ntitle: Mixed\ncategories: [Essays, [Rust, Async]]\n---\n").unwrap();
        assert_eq!(mixed.categories, vec!["Essays", "Rust", "Async"]);

        let (none, _) = FrontMatter::parse("---\ntitle: Empty\ncategories:\n---\n").unwrap();
        assert!(none.categories.is_empty());
    }

    #[test]
    fn test_template_tag_is_not_json() {
        let content = "{% raw %}\n{{ not.a.header }}\n{% endraw %}\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_dst_gap_moves_forward() {
        use chrono_tz::America::New_York;

        // Clocks jumped from 02:00 to 03:00 on this day
        let skipped = NaiveDate::from_ymd_opt(2026, 3, 8)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_local(&New_York, skipped).unwrap();
        assert_eq!(resolved.format("%Y-%m-%d %H:%M").to_string(), "2026-03-08 03:00");

        let ordinary = NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(resolve_local(&New_York, ordinary).unwrap().naive_local(), ordinary);
    }

    #[test]
    fn test_extra_keys_keep_source_order() {
        let content = "---\ntitle: T\nzeta: 1\nalpha: two\nmiddle: [x]\n---\n";

        let (fm, _) = FrontMatter::parse(content).unwrap();
        let keys: Vec<_> = fm.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "middle"]);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\ndate: 2024-01-01\n---\nbody\n";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(ContentError::Yaml(_))
        ));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "Just some prose.\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_crlf_frontmatter() {
        let content = "---\r\ntitle: Windows\r\n---\r\nbody\r\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_unclosed_fence_is_body() {
        let content = "---\ntitle: Never closed\n\nbody\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(body, content);
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Some random text with markdown lists:
- Item 1
- Item 2

-- 2025-11-09

---
More content here.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(body.contains("Some random text"));
    }

    #[test]
    fn test_content_with_url_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(body.contains("https://example.com"));
    }

    #[test]
    fn test_render_parses_back() {
        let mut extra = IndexMap::new();
        extra.insert("comments".to_string(), serde_yaml::Value::Bool(false));
        let fm = FrontMatter {
            layout: Some("post".to_string()),
            title: Some("Ownership: a field guide".to_string()),
            date: Some("2026-02-18 09:30:00 +0000".to_string()),
            categories: vec!["engineering".to_string()],
            tags: vec!["rust".to_string(), "memory".to_string()],
            published: false,
            extra,
            ..Default::default()
        };

        let rendered = fm.render().unwrap();
        assert!(rendered.starts_with("---\nlayout: post\ntitle:"));
        let (parsed, body) = FrontMatter::parse(&rendered).unwrap();
        assert_eq!(parsed, fm);
        assert_eq!(body, "");
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-01-15 10:30:00".to_string()),
            ..Default::default()
        };

        let dt = fm.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");
    }

    #[test]
    fn test_parse_date_variants() {
        for s in [
            "2026-01-05",
            "2026/01/05",
            "2026-01-05 08:15",
            "2026-01-05T08:15:00",
            "2026-01-05 08:15:00.250",
        ] {
            let dt = parse_date_string(s).unwrap_or_else(|| panic!("failed on {s}"));
            assert_eq!(dt.format("%Y-%m-%d").to_string(), "2026-01-05");
        }
        assert!(parse_date_string("last tuesday").is_none());
    }

    #[test]
    fn test_parse_date_with_offset() {
        let a = parse_date_string("2026-01-05 10:00:00 +0100").unwrap();
        let b = parse_date_string("2026-01-05T09:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_date_parses_back() {
        let dt = parse_date_string("2026-02-18T09:30:12.5+02:00").unwrap();
        assert_eq!(parse_date_string(&format_date(&dt)), Some(dt));
    }
}
