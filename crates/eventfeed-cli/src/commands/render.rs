use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use eventfeed_core::Config;
use eventfeed_render::{Page, RenderOptions, Renderer};
use eventfeed_sheets::{EventRecord, EventSource, StaticSource};

use super::{fetch_strict, Source};

#[derive(Args)]
pub struct RenderArgs {
    /// Show at most this many events
    #[arg(short, long)]
    limit: Option<usize>,

    /// Only show events marked for publishing
    #[arg(long)]
    published_only: bool,

    /// Treat descriptions as plain text
    #[arg(long)]
    no_markdown: bool,

    /// Use the built-in sample events instead of the sheet
    #[arg(long)]
    sample: bool,

    /// HTML page to render into (overrides page.template)
    #[arg(long)]
    template: Option<PathBuf>,

    /// Id of the container element (overrides page.container_id)
    #[arg(long)]
    container: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with an error when the sheet cannot be loaded
    #[arg(long)]
    strict: bool,
}

pub async fn run(config: &Config, args: RenderArgs) -> Result<()> {
    let source = Source::from_config(config, args.sample)?;
    let renderer = build_renderer(config, !args.no_markdown);
    let options = RenderOptions {
        limit: args.limit.or(config.render.limit),
        published_only: args.published_only || config.render.published_only,
    };

    // Strict mode loads up front so a failure is reported; otherwise the
    // renderer loads on demand and degrades to the empty message.
    let records = if args.strict {
        fetch_strict(&source).await?
    } else {
        Vec::new()
    };

    let template = args.template.or_else(|| config.page.template.clone());
    let html = match template {
        Some(path) => {
            let container_id = args
                .container
                .unwrap_or_else(|| config.page.container_id.clone());
            let mut page = Page::from_path(&path)?;

            let updated = if args.strict {
                let empty = StaticSource::default();
                render_page(&renderer, &mut page, &container_id, &records, &empty, options).await
            } else {
                render_page(&renderer, &mut page, &container_id, &records, &source, options).await
            };
            if !updated {
                tracing::warn!(
                    "No element with id \"{}\" in {}, page left unchanged",
                    container_id,
                    path.display()
                );
            }
            page.into_html()
        }
        None if args.strict => renderer.render(&records, options),
        None => renderer.render_or_load(&records, &source, options).await,
    };

    write_output(args.output.as_deref(), &html)
}

async fn render_page<S: EventSource>(
    renderer: &Renderer,
    page: &mut Page,
    container_id: &str,
    records: &[EventRecord],
    source: &S,
    options: RenderOptions,
) -> bool {
    renderer
        .render_into(page, container_id, records, source, options)
        .await
}

fn build_renderer(config: &Config, markdown: bool) -> Renderer {
    let renderer = if markdown && config.render.markdown {
        Renderer::with_markdown_support()
    } else {
        Renderer::new()
    };
    renderer.with_empty_message(config.render.empty_message.as_str())
}

fn write_output(output: Option<&Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}
