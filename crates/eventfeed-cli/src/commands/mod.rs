pub mod config;
pub mod fetch;
pub mod render;

use std::time::Duration;

use anyhow::Result;
use eventfeed_core::{AppError, Config};
use eventfeed_sheets::{EventRecord, EventSource, FeedError, FeedLoader, RowParser, StaticSource};

/// The sheet, or the built-in sample events.
pub enum Source {
    Feed(FeedLoader),
    Sample(StaticSource),
}

impl Source {
    pub fn from_config(config: &Config, sample: bool) -> Result<Self> {
        if sample {
            return Ok(Source::Sample(StaticSource::sample()));
        }

        if !config.feed.is_configured() {
            anyhow::bail!(
                "No sheet configured.\n\n\
                Set feed.sheet_id in your config file, or preview with:\n  \
                eventfeed render --sample"
            );
        }

        let endpoint = config.feed.endpoint()?;
        let parser = RowParser::new(config.columns.column_map())
            .with_placeholder_image(config.render.placeholder_image.as_str());
        let loader = FeedLoader::with_timeout(
            &endpoint,
            parser,
            Duration::from_secs(config.feed.timeout_secs),
        )?;

        Ok(Source::Feed(loader))
    }
}

impl EventSource for Source {
    async fn fetch(&self) -> Result<Vec<EventRecord>, FeedError> {
        match self {
            Source::Feed(loader) => loader.fetch().await,
            Source::Sample(sample) => sample.fetch().await,
        }
    }
}

/// Fetch records, failing on any load error.
pub async fn fetch_strict(source: &Source) -> Result<Vec<EventRecord>> {
    source.fetch().await.map_err(|e| {
        let err = AppError::from(e);
        tracing::error!("Failed to load events: {}", err);
        anyhow::anyhow!("{} ({})", err.user_message(), err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_sheet_is_rejected() {
        let err = match Source::from_config(&Config::default(), false) {
            Err(err) => err,
            Ok(_) => panic!("placeholder sheet id should be rejected"),
        };
        assert!(err.to_string().contains("No sheet configured"));
        assert!(err.to_string().contains("eventfeed render --sample"));
    }

    #[test]
    fn test_sample_ignores_sheet_config() {
        let source = Source::from_config(&Config::default(), true).unwrap();
        assert!(matches!(source, Source::Sample(_)));
    }

    #[test]
    fn test_configured_sheet_builds_loader() {
        let mut config = Config::default();
        config.feed.sheet_id = "abc123".to_string();

        match Source::from_config(&config, false).unwrap() {
            Source::Feed(loader) => {
                assert!(loader.endpoint().contains("/d/abc123/gviz/tq"));
                assert!(loader.endpoint().contains("tqx=out%3Ajson"));
            }
            Source::Sample(_) => panic!("expected the sheet loader"),
        }
    }

    #[tokio::test]
    async fn test_strict_fetch_of_sample_events() {
        let source = Source::from_config(&Config::default(), true).unwrap();
        let records = fetch_strict(&source).await.unwrap();
        assert_eq!(records.len(), 4);
    }
}
