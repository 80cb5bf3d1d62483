use std::path::Path;

use anyhow::Result;
use eventfeed_core::Config;

pub fn run(path: Option<&Path>, validate: bool) -> Result<()> {
    let (config, location) = match path {
        Some(p) => (Config::load_from(p)?, p.to_path_buf()),
        None => (Config::load()?, Config::config_path()?),
    };

    println!("Config file: {}", location.display());

    match config.feed.endpoint() {
        Ok(endpoint) => println!("Endpoint:    {}", endpoint),
        Err(e) => println!("Endpoint:    <invalid: {}>", e),
    }

    println!("Columns:");
    for (role, index) in config.columns.column_map().roles() {
        println!("  {:<12} {}", role, index);
    }

    let result = config.validate();
    for warning in &result.warnings {
        println!("warning: {}", warning);
    }
    for error in &result.errors {
        println!("error:   {}", error);
    }

    if result.is_valid() {
        println!("Configuration OK");
    } else if validate {
        anyhow::bail!(
            "Configuration validation failed: {}",
            result.error_summary()
        );
    }

    Ok(())
}
