//! HTML page with addressable containers.
//!
//! Containers are located by their `id` attribute with a small tag scanner;
//! the page is never parsed into a tree.

use std::ops::Range;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Failed to read page {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write page {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Elements that cannot hold content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is not scanned for tags.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    html: String,
}

impl Page {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn from_path(path: &Path) -> Result<Self, PageError> {
        std::fs::read_to_string(path)
            .map(Self::new)
            .map_err(|source| PageError::Read {
                path: path.display().to_string(),
                source,
            })
    }

    pub fn write_to(&self, path: &Path) -> Result<(), PageError> {
        std::fs::write(path, &self.html).map_err(|source| PageError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    /// Whether an element with this id exists and can hold content.
    pub fn has_container(&self, id: &str) -> bool {
        self.container_range(id).is_some()
    }

    /// Replace the content of the element with the given id.
    ///
    /// Returns `false` and leaves the page untouched when the id does not
    /// resolve to a content-bearing element.
    pub fn replace_inner(&mut self, id: &str, fragment: &str) -> bool {
        match self.container_range(id) {
            Some(range) => {
                self.html.replace_range(range, fragment);
                true
            }
            None => false,
        }
    }

    /// Byte range of the content of the element with the given id.
    fn container_range(&self, id: &str) -> Option<Range<usize>> {
        let mut tags = Tags::new(&self.html, 0);
        let (name, content_start) = loop {
            let tag = tags.next()?;
            if !tag.closing && attr_value(tag.attrs, "id") == Some(id) {
                break (tag.name, tag.end);
            }
        };

        let name = name.to_ascii_lowercase();
        if VOID_ELEMENTS.contains(&name.as_str()) {
            return None;
        }

        let mut depth = 1usize;
        for tag in Tags::new(&self.html, content_start) {
            if !tag.name.eq_ignore_ascii_case(&name) {
                continue;
            }
            if tag.closing {
                depth -= 1;
                if depth == 0 {
                    return Some(content_start..tag.start);
                }
            } else if !tag.self_closing {
                depth += 1;
            }
        }
        None
    }
}

#[derive(Debug)]
struct Tag<'a> {
    name: &'a str,
    attrs: &'a str,
    closing: bool,
    self_closing: bool,
    /// Offset of `<`.
    start: usize,
    /// Offset just past `>`.
    end: usize,
}

/// Iterator over element tags, skipping comments, doctypes and raw text.
struct Tags<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> Tags<'a> {
    fn new(html: &'a str, pos: usize) -> Self {
        Self { html, pos }
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        loop {
            let start = self.pos + self.html.get(self.pos..)?.find('<')?;
            let rest = &self.html[start..];

            // A `<` only opens markup when followed by a letter, `/` or `!`.
            if !rest[1..].starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!') {
                self.pos = start + 1;
                continue;
            }

            if rest.starts_with("<!--") {
                self.pos = start + rest.find("-->").map_or(rest.len(), |i| i + 3);
                continue;
            }

            let end = start + rest.find('>')? + 1;
            self.pos = end;

            let inner = &self.html[start + 1..end - 1];
            let (closing, inner) = match inner.strip_prefix('/') {
                Some(stripped) => (true, stripped),
                None => (false, inner),
            };
            let name_len = inner
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(inner.len());
            if name_len == 0 {
                // `<!DOCTYPE>` or `</ >`
                continue;
            }

            let name = &inner[..name_len];
            let attrs = &inner[name_len..];
            let self_closing = attrs.trim_end().ends_with('/');

            if !closing && !self_closing && is_raw_text(name) {
                self.pos = raw_text_end(self.html, end, name);
            }

            return Some(Tag {
                name,
                attrs,
                closing,
                self_closing,
                start,
                end,
            });
        }
    }
}

/// Elements whose content is text, never markup.
fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|raw| raw.eq_ignore_ascii_case(name))
}

/// Offset of the closing tag of a raw-text element opened at `from`, or the
/// end of the document when it is never closed.
fn raw_text_end(html: &str, from: usize, name: &str) -> usize {
    let close = format!("</{}", name.to_ascii_lowercase());
    html[from..]
        .to_ascii_lowercase()
        .find(&close)
        .map_or(html.len(), |i| from + i)
}

/// Value of an attribute in a tag's attribute text.
fn attr_value<'a>(attrs: &'a str, wanted: &str) -> Option<&'a str> {
    let mut rest = attrs;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            return None;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after) => {
                let after = after.trim_start();
                let (value, remaining) = match after.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let body = &after[1..];
                        let close = body.find(quote).unwrap_or(body.len());
                        (&body[..close], body.get(close + 1..).unwrap_or(""))
                    }
                    _ => {
                        let end = after.find(char::is_whitespace).unwrap_or(after.len());
                        (&after[..end], &after[end..])
                    }
                };
                rest = remaining;
                Some(value)
            }
            None => None,
        };

        if name.eq_ignore_ascii_case(wanted) {
            return Some(value.unwrap_or(""));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <!-- <div id="events-container">commented out</div> -->
  <section id="events-container" class="posts"><p>Loading…</p><div><div>nested</div></div></section>
  <div id='sidebar'><img id="logo" src="logo.png"></div>
</body>
</html>"#;

    #[test]
    fn test_replace_inner() {
        let mut page = Page::new(PAGE);
        assert!(page.replace_inner("events-container", "<article>new</article>"));
        assert!(page
            .as_str()
            .contains(r#"<section id="events-container" class="posts"><article>new</article></section>"#));
        assert!(page.as_str().contains("commented out"));
    }

    #[test]
    fn test_nested_same_name_elements() {
        let mut page = Page::new(r#"<div id="outer"><div>a</div><div>b</div></div><div>after</div>"#);
        assert!(page.replace_inner("outer", "x"));
        assert_eq!(page.as_str(), r#"<div id="outer">x</div><div>after</div>"#);
    }

    #[test]
    fn test_single_quoted_id() {
        let mut page = Page::new(PAGE);
        assert!(page.replace_inner("sidebar", ""));
        assert!(page.as_str().contains("<div id='sidebar'></div>"));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut page = Page::new(PAGE);
        assert!(!page.replace_inner("missing", "<p>x</p>"));
        assert_eq!(page.as_str(), PAGE);
    }

    #[test]
    fn test_void_element_is_not_a_container() {
        let page = Page::new(PAGE);
        assert!(!page.has_container("logo"));
    }

    #[test]
    fn test_unclosed_container_is_not_resolved() {
        let page = Page::new(r#"<div id="events-container"><p>never closed"#);
        assert!(!page.has_container("events-container"));
    }

    #[test]
    fn test_markup_inside_script_is_ignored() {
        let html = r#"<head><script>const tpl = '<div id="events-container">';</script></head>
<body><div id="events-container">old</div></body>"#;
        let mut page = Page::new(html);

        assert!(page.replace_inner("events-container", "X"));
        assert!(page.as_str().contains(r#"'<div id="events-container">';</script>"#));
        assert!(page.as_str().contains(r#"<body><div id="events-container">X</div></body>"#));
    }

    #[test]
    fn test_style_body_is_skipped() {
        let mut page = Page::new(r#"<style>a::before { content: "</div>"; }</style><div id="c">old</div>"#);
        assert!(page.replace_inner("c", "new"));
        assert!(page.as_str().ends_with(r#"<div id="c">new</div>"#));
    }

    #[test]
    fn test_bare_less_than_in_text() {
        let mut page = Page::new(r#"<div id="events-container">1 < 2</div><div>x</div>"#);
        assert!(page.has_container("events-container"));
        assert!(page.replace_inner("events-container", "X"));
        assert_eq!(page.as_str(), r#"<div id="events-container">X</div><div>x</div>"#);
    }

    #[test]
    fn test_attr_value() {
        assert_eq!(attr_value(r#" class="a b" id="x""#, "id"), Some("x"));
        assert_eq!(attr_value(" hidden id=plain", "id"), Some("plain"));
        assert_eq!(attr_value(r#" data-id="y""#, "id"), None);
        assert_eq!(attr_value(" hidden", "hidden"), Some(""));
    }

    #[test]
    fn test_read_and_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, PAGE).unwrap();

        let mut page = Page::from_path(&path).unwrap();
        page.replace_inner("events-container", "");
        page.write_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"class="posts"></section>"#));
    }

    #[test]
    fn test_missing_file() {
        let result = Page::from_path(Path::new("/definitely/not/here.html"));
        assert!(matches!(result, Err(PageError::Read { .. })));
    }
}
