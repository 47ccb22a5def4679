//! Anchor extraction from rendered listings and catalog pages.

use regex::Regex;
use std::sync::OnceLock;

static ANCHOR: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();

/// One `<a>` element: its target and CSS classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    pub href: String,
    pub classes: Vec<String>,
}

impl Hyperlink {
    /// True when the anchor carries `class` among its CSS classes.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Every anchor with an `href` attribute, in document order.
///
/// This is a tag scanner, not an HTML parser: it reads the attributes of
/// each `<a ...>` start tag and ignores everything else.
pub fn parse_hyperlinks(html: &str) -> Vec<Hyperlink> {
    // Quoted attribute values may contain `>`.
    let anchor = ANCHOR.get_or_init(|| {
        Regex::new(r#"(?is)<a\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).expect("anchor pattern")
    });
    let attribute = ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"(?is)([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
            .expect("attribute pattern")
    });

    anchor
        .captures_iter(html)
        .filter_map(|tag| {
            let attrs = tag.get(1)?.as_str();
            let mut href = None;
            let mut classes = Vec::new();

            for attr in attribute.captures_iter(attrs) {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .or_else(|| attr.get(4))
                    .map_or("", |m| m.as_str());
                match attr[1].to_ascii_lowercase().as_str() {
                    "href" => href = Some(decode_entities(value.trim())),
                    "class" => classes = value.split_whitespace().map(str::to_string).collect(),
                    _ => {}
                }
            }

            href.map(|href| Hyperlink { href, classes })
        })
        .collect()
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
