//! Optional description formatting capabilities.
//!
//! A [`Renderer`](crate::Renderer) is given these once at construction; when
//! one is missing the description degrades to escaped plain text or
//! unsanitized markdown output rather than failing.

/// Converts markdown text to HTML.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, text: &str) -> String;
}

/// Strips unsafe markup from HTML.
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, text: &str) -> String {
        self(text)
    }
}

/// CommonMark rendering via pulldown-cmark.
#[cfg(feature = "markdown")]
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMark;

#[cfg(feature = "markdown")]
impl MarkdownRenderer for CommonMark {
    fn render(&self, text: &str) -> String {
        use pulldown_cmark::{html, Options, Parser};

        let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
        let parser = Parser::new_ext(text, options);
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

/// HTML sanitizing with ammonia's default allow-list.
#[cfg(feature = "markdown")]
#[derive(Debug, Clone, Copy, Default)]
pub struct AmmoniaSanitizer;

#[cfg(feature = "markdown")]
impl HtmlSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str) -> String {
        ammonia::clean(html)
    }
}

#[cfg(all(test, feature = "markdown"))]
mod tests {
    use super::*;

    #[test]
    fn test_commonmark_renders_emphasis() {
        let html = CommonMark.render("Join us **Saturday**");
        assert_eq!(html.trim(), "<p>Join us <strong>Saturday</strong></p>");
    }

    #[test]
    fn test_ammonia_strips_scripts() {
        let html = AmmoniaSanitizer.sanitize("<p>Hi<script>alert(1)</script></p>");
        assert_eq!(html, "<p>Hi</p>");
    }

    #[test]
    fn test_closure_as_renderer() {
        let upper = |text: &str| text.to_uppercase();
        assert_eq!(MarkdownRenderer::render(&upper, "abc"), "ABC");
    }
}
