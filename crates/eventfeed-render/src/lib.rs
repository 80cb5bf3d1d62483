//! HTML presentation for event records.
//!
//! Renders records into a card fragment and places that fragment inside a
//! page container.

pub mod escape;
pub mod markdown;
pub mod page;
pub mod renderer;

pub use escape::html_escape;
pub use markdown::{HtmlSanitizer, MarkdownRenderer};
#[cfg(feature = "markdown")]
pub use markdown::{AmmoniaSanitizer, CommonMark};
pub use page::{Page, PageError};
pub use renderer::{RenderOptions, Renderer, DEFAULT_EMPTY_MESSAGE};
