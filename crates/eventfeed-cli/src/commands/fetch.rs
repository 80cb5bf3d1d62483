use anyhow::Result;
use eventfeed_core::{AppError, Config};
use eventfeed_sheets::{EventRecord, EventSource};

use super::{fetch_strict, Source};

pub async fn run(config: &Config, json: bool, sample: bool, strict: bool) -> Result<()> {
    let source = Source::from_config(config, sample)?;

    let records = if strict {
        fetch_strict(&source).await?
    } else {
        match source.fetch().await {
            Ok(records) => records,
            Err(e) => {
                let err = AppError::from(e);
                tracing::warn!("Failed to load events: {}", err);
                eprintln!("{}", err.user_message());
                Vec::new()
            }
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_table(&records);
    }

    Ok(())
}

fn print_table(records: &[EventRecord]) {
    if records.is_empty() {
        println!("No events.");
        return;
    }

    let width = records
        .iter()
        .map(|r| r.display_date.chars().count())
        .max()
        .unwrap_or(0);

    for record in records {
        let marker = if record.published { ' ' } else { '*' };
        println!(
            "{} {:<width$}  {}",
            marker,
            record.display_date,
            record.title,
            width = width
        );
    }

    if records.iter().any(|r| !r.published) {
        println!("\n* not marked for publishing");
    }
}
