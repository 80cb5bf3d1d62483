//! Event card rendering.

use eventfeed_sheets::{EventRecord, EventSource};

use crate::escape::html_escape;
use crate::markdown::{HtmlSanitizer, MarkdownRenderer};
use crate::page::Page;

pub const DEFAULT_EMPTY_MESSAGE: &str = "No events available at this time.";

/// Per-call view options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show at most this many records. `None` and `Some(0)` show all.
    pub limit: Option<usize>,
    /// Only show records whose publish flag is set.
    pub published_only: bool,
}

impl RenderOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn published_only(mut self) -> Self {
        self.published_only = true;
        self
    }
}

/// Renders event records as `post-card` articles.
pub struct Renderer {
    markdown: Option<Box<dyn MarkdownRenderer>>,
    sanitizer: Option<Box<dyn HtmlSanitizer>>,
    empty_message: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("markdown", &self.markdown.is_some())
            .field("sanitizer", &self.sanitizer.is_some())
            .field("empty_message", &self.empty_message)
            .finish()
    }
}

impl Renderer {
    /// Plain-text renderer: descriptions are escaped, not interpreted.
    pub fn new() -> Self {
        Self {
            markdown: None,
            sanitizer: None,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }

    /// Renderer with markdown descriptions and sanitized output.
    #[cfg(feature = "markdown")]
    pub fn with_markdown_support() -> Self {
        Self::new()
            .with_markdown(crate::markdown::CommonMark)
            .with_sanitizer(crate::markdown::AmmoniaSanitizer)
    }

    pub fn with_markdown(mut self, markdown: impl MarkdownRenderer + 'static) -> Self {
        self.markdown = Some(Box::new(markdown));
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: impl HtmlSanitizer + 'static) -> Self {
        self.sanitizer = Some(Box::new(sanitizer));
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Render the fragment for a record list.
    pub fn render(&self, records: &[EventRecord], options: RenderOptions) -> String {
        let visible = records
            .iter()
            .filter(|r| !options.published_only || r.published);
        let shown: Vec<&EventRecord> = match options.limit {
            Some(limit) if limit > 0 => visible.take(limit).collect(),
            _ => visible.collect(),
        };

        if shown.is_empty() {
            return format!("<p>{}</p>", html_escape(&self.empty_message));
        }

        let mut out = String::new();
        for record in shown {
            out.push_str(&self.render_card(record));
        }
        out
    }

    /// Render `records`, loading from `source` first when the list is empty.
    pub async fn render_or_load<S: EventSource>(
        &self,
        records: &[EventRecord],
        source: &S,
        options: RenderOptions,
    ) -> String {
        if !records.is_empty() {
            return self.render(records, options);
        }
        tracing::debug!("No records supplied, loading from source");
        let loaded = source.load().await;
        self.render(&loaded, options)
    }

    /// Render into the container with the given id.
    ///
    /// Nothing is loaded or rendered when the container cannot be found;
    /// returns whether the page was updated.
    pub async fn render_into<S: EventSource>(
        &self,
        page: &mut Page,
        container_id: &str,
        records: &[EventRecord],
        source: &S,
        options: RenderOptions,
    ) -> bool {
        if !page.has_container(container_id) {
            tracing::warn!(container_id, "Container not found, skipping render");
            return false;
        }
        let fragment = self.render_or_load(records, source, options).await;
        page.replace_inner(container_id, &fragment)
    }

    fn render_card(&self, record: &EventRecord) -> String {
        format!(
            r#"
<article class="post-card">
  <div class="post-image">
    <img src="{image}" alt="{alt}">
  </div>
  <div class="post-content">
    <div class="post-date">{date}</div>
    <h3>{title}</h3>
    {description}
  </div>
</article>
"#,
            image = html_escape(&record.image),
            alt = html_escape(&record.alt),
            date = html_escape(&record.display_date),
            title = html_escape(&record.title),
            description = self.render_description(&record.description),
        )
    }

    fn render_description(&self, text: &str) -> String {
        match &self.markdown {
            Some(markdown) => {
                let html = markdown.render(text);
                let html = match &self.sanitizer {
                    Some(sanitizer) => sanitizer.sanitize(&html),
                    None => html,
                };
                format!(r#"<div class="post-description">{}</div>"#, html.trim())
            }
            None => format!("<p>{}</p>", html_escape(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use eventfeed_sheets::StaticSource;

    fn record(day: u32, title: &str, published: bool) -> EventRecord {
        let sort_key = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        EventRecord {
            display_date: format!("March {}, 2024", day),
            sort_key,
            title: title.to_string(),
            description: format!("About {}", title),
            image: "images/placeholder.png".to_string(),
            alt: title.to_string(),
            published,
        }
    }

    fn cards(html: &str) -> usize {
        html.matches(r#"<article class="post-card">"#).count()
    }

    #[test]
    fn test_published_only_filter() {
        let records = vec![record(15, "Shown", true), record(10, "Hidden", false)];
        let html = Renderer::new().render(&records, RenderOptions::default().published_only());

        assert_eq!(cards(&html), 1);
        assert!(html.contains("Shown"));
        assert!(!html.contains("Hidden"));
    }

    #[test]
    fn test_limit_takes_most_recent() {
        let records = vec![
            record(15, "First", true),
            record(10, "Second", true),
            record(5, "Third", true),
            record(1, "Fourth", true),
        ];
        let html = Renderer::new().render(&records, RenderOptions::default().with_limit(2));

        assert_eq!(cards(&html), 2);
        assert!(html.contains("First") && html.contains("Second"));
        assert!(!html.contains("Third"));
    }

    #[test]
    fn test_zero_limit_shows_all() {
        let records = vec![record(15, "First", true), record(10, "Second", true)];
        let html = Renderer::new().render(&records, RenderOptions::default().with_limit(0));
        assert_eq!(cards(&html), 2);
    }

    #[test]
    fn test_empty_placeholder() {
        let html = Renderer::new().render(&[], RenderOptions::default());
        assert_eq!(html, "<p>No events available at this time.</p>");

        let records = vec![record(15, "Draft", false)];
        let html = Renderer::new()
            .with_empty_message("Nothing yet")
            .render(&records, RenderOptions::default().published_only());
        assert_eq!(html, "<p>Nothing yet</p>");
    }

    #[test]
    fn test_card_template() {
        let html = Renderer::new().render(&[record(15, "Garden", true)], RenderOptions::default());

        assert!(html.contains(r#"<img src="images/placeholder.png" alt="Garden">"#));
        assert!(html.contains(r#"<div class="post-date">March 15, 2024</div>"#));
        assert!(html.contains("<h3>Garden</h3>"));
        assert!(html.contains("<p>About Garden</p>"));
    }

    #[test]
    fn test_plain_descriptions_are_escaped() {
        let mut rec = record(15, "A <b>bold</b> title", true);
        rec.description = "<script>alert(1)</script>".to_string();
        let html = Renderer::new().render(&[rec], RenderOptions::default());

        assert!(html.contains("<h3>A &lt;b&gt;bold&lt;/b&gt; title</h3>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_markdown_without_sanitizer_is_used_as_is() {
        let renderer = Renderer::new().with_markdown(|text: &str| format!("<em>{}</em>", text));
        let html = renderer.render(&[record(15, "Garden", true)], RenderOptions::default());
        assert!(html.contains(r#"<div class="post-description"><em>About Garden</em></div>"#));
    }

    #[test]
    fn test_sanitizer_applied_after_markdown() {
        struct StripEm;
        impl HtmlSanitizer for StripEm {
            fn sanitize(&self, html: &str) -> String {
                html.replace("<em>", "").replace("</em>", "")
            }
        }

        let renderer = Renderer::new()
            .with_markdown(|text: &str| format!("<em>{}</em>", text))
            .with_sanitizer(StripEm);
        let html = renderer.render(&[record(15, "Garden", true)], RenderOptions::default());
        assert!(html.contains(r#"<div class="post-description">About Garden</div>"#));
    }

    #[cfg(feature = "markdown")]
    #[test]
    fn test_markdown_support() {
        let mut rec = record(15, "Garden", true);
        rec.description = "Bring **gloves**<script>x()</script>".to_string();
        let html = Renderer::with_markdown_support().render(&[rec], RenderOptions::default());

        assert!(html.contains("<strong>gloves</strong>"));
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn test_render_or_load_fetches_when_empty() {
        let source = StaticSource::new(vec![record(15, "Loaded", true)]);
        let html = Renderer::new()
            .render_or_load(&[], &source, RenderOptions::default())
            .await;
        assert!(html.contains("Loaded"));
    }

    #[tokio::test]
    async fn test_render_or_load_uses_given_records() {
        let source = StaticSource::new(vec![record(15, "Loaded", true)]);
        let html = Renderer::new()
            .render_or_load(&[record(10, "Given", true)], &source, RenderOptions::default())
            .await;
        assert!(html.contains("Given"));
        assert!(!html.contains("Loaded"));
    }

    #[tokio::test]
    async fn test_render_into_missing_container() {
        let mut page = Page::new("<main id=\"other\"></main>");
        let source = StaticSource::sample();
        let updated = Renderer::new()
            .render_into(&mut page, "events-container", &[], &source, RenderOptions::default())
            .await;

        assert!(!updated);
        assert_eq!(page.as_str(), "<main id=\"other\"></main>");
    }
}
